mod annotate;
mod config;
mod constants;
mod geolocation;
mod icons;
mod map;
mod paths;
pub mod theme;
mod ui;

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use constants::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};

#[cfg(debug_assertions)]
const LOG_FILE_NAME: &str = "rallymap.log";

/// Mark where this run starts in the appended log file.
#[cfg(debug_assertions)]
fn write_session_banner(log_file: &std::path::Path) -> std::io::Result<()> {
    use std::io::Write;

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;
    let rule = "=".repeat(80);
    writeln!(
        file,
        "\n{rule}\n=== rallymap session {} ===\n{rule}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    )
}

/// Debug builds log to stdout and to `logs/rallymap.log`.
#[cfg(debug_assertions)]
fn setup_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let logs_dir = paths::logs_dir();
    if let Err(e) = std::fs::create_dir_all(&logs_dir) {
        eprintln!("Cannot create log directory {}: {}", logs_dir.display(), e);
        return None;
    }
    if let Err(e) = write_session_banner(&logs_dir.join(LOG_FILE_NAME)) {
        eprintln!("Cannot write to {}: {}", LOG_FILE_NAME, e);
    }

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(&logs_dir, LOG_FILE_NAME));

    // RUST_LOG wins over the built-in filter
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,rallymap=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(fmt::layer().with_writer(std::io::stdout))
        .init();

    Some(guard)
}

/// Release builds keep Bevy's default console logging.
#[cfg(not(debug_assertions))]
fn setup_logging() -> Option<()> {
    None
}

fn main() {
    // Dropping the guard flushes and stops the file writer
    let _log_guard = setup_logging();
    App::new()
        .insert_resource(ClearColor(theme::MAP_BACKGROUND))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Rallymap".into(),
                resolution: (DEFAULT_WINDOW_WIDTH as u32, DEFAULT_WINDOW_HEIGHT as u32).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .add_plugins(config::ConfigPlugin)
        .add_plugins(map::MapPlugin)
        .add_plugins(icons::IconsPlugin)
        .add_plugins(annotate::AnnotatePlugin)
        .add_plugins(geolocation::GeolocationPlugin)
        .add_plugins(ui::UiPlugin)
        .run();
}
