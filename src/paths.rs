//! Where rallymap keeps its config file and logs.
//!
//! Development runs (cargo run, debug builds) use the working directory.
//! Installed builds use the platform's per-user directories from `dirs`,
//! under a `rallymap` folder (`Rallymap` on Windows and macOS).

use std::path::PathBuf;

const APP_DIR_NAME: &str = if cfg!(target_os = "linux") {
    "rallymap"
} else {
    "Rallymap"
};

/// Which per-user base directory a path lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BaseDir {
    Config,
    Data,
}

/// True under cargo run or in any debug build.
pub fn is_dev_mode() -> bool {
    std::env::var("CARGO").is_ok() || cfg!(debug_assertions)
}

fn app_dir(base: BaseDir) -> Option<PathBuf> {
    if is_dev_mode() {
        return Some(PathBuf::from("."));
    }
    let root = match base {
        // Only Linux separates config from data
        BaseDir::Config if cfg!(target_os = "linux") => dirs::config_dir(),
        BaseDir::Config | BaseDir::Data => dirs::data_dir(),
    };
    root.map(|p| p.join(APP_DIR_NAME))
}

/// `./config.json` in dev mode, otherwise inside the config directory.
pub fn config_file() -> PathBuf {
    app_dir(BaseDir::Config)
        .map(|p| p.join("config.json"))
        .unwrap_or_else(|| PathBuf::from("config.json"))
}

/// `./logs/` in dev mode, otherwise inside the data directory.
pub fn logs_dir() -> PathBuf {
    app_dir(BaseDir::Data)
        .map(|p| p.join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Create the config and log directories for installed builds.
pub fn ensure_directories() -> std::io::Result<()> {
    if is_dev_mode() {
        return Ok(());
    }
    if let Some(config) = app_dir(BaseDir::Config) {
        std::fs::create_dir_all(config)?;
    }
    std::fs::create_dir_all(logs_dir())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_has_json_extension() {
        assert!(config_file().to_string_lossy().ends_with("config.json"));
    }

    #[test]
    fn test_logs_dir_ends_with_logs() {
        assert!(logs_dir().ends_with("logs"));
    }

    #[test]
    fn test_dev_mode_uses_working_directory() {
        // Tests build with debug assertions
        assert!(is_dev_mode());
        assert_eq!(app_dir(BaseDir::Config), Some(PathBuf::from(".")));
        assert_eq!(app_dir(BaseDir::Data), Some(PathBuf::from(".")));
        assert_eq!(config_file(), PathBuf::from("./config.json"));
    }
}
