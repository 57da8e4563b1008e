use bevy::prelude::KeyCode;

/// The fixed set of event classifications a marker can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    ActiveProtest,
    FutureProtest,
    Police,
    Clash,
}

impl EventCategory {
    pub fn all() -> &'static [EventCategory] {
        &[
            EventCategory::ActiveProtest,
            EventCategory::FutureProtest,
            EventCategory::Police,
            EventCategory::Clash,
        ]
    }

    /// Stable identifier, also used in logs.
    pub fn key(&self) -> &'static str {
        match self {
            EventCategory::ActiveProtest => "active-protest",
            EventCategory::FutureProtest => "future-protest",
            EventCategory::Police => "police",
            EventCategory::Clash => "clash",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EventCategory::ActiveProtest => "Active Protest",
            EventCategory::FutureProtest => "Future Protest",
            EventCategory::Police => "Police Activity",
            EventCategory::Clash => "Clash",
        }
    }

    /// Icon asset path relative to `assets/`.
    pub fn icon_path(&self) -> &'static str {
        match self {
            EventCategory::ActiveProtest => "icons/protest.png",
            EventCategory::FutureProtest => "icons/future-protest.png",
            EventCategory::Police => "icons/police.png",
            EventCategory::Clash => "icons/clash.png",
        }
    }

    /// Popup heading: the key with its first `-` replaced by a space, upper-cased.
    pub fn popup_title(&self) -> String {
        self.key().replacen('-', " ", 1).to_uppercase()
    }

    /// Confirmation shown after the category is chosen.
    pub fn selection_notice(&self) -> String {
        format!("You have selected the {} marker.", self.display_name())
    }

    pub fn shortcut(&self) -> KeyCode {
        match self {
            EventCategory::ActiveProtest => KeyCode::Digit1,
            EventCategory::FutureProtest => KeyCode::Digit2,
            EventCategory::Police => KeyCode::Digit3,
            EventCategory::Clash => KeyCode::Digit4,
        }
    }

    /// Button label with its keyboard shortcut.
    pub fn button_label(&self) -> String {
        let digit = match self {
            EventCategory::ActiveProtest => 1,
            EventCategory::FutureProtest => 2,
            EventCategory::Police => 3,
            EventCategory::Clash => 4,
        };
        format!("{} [{}]", self.display_name(), digit)
    }

    /// Swatch color (RGBA) used in the toolbar and for fallback pins.
    pub fn color(&self) -> [u8; 4] {
        match self {
            EventCategory::ActiveProtest => [220, 60, 50, 255],
            EventCategory::FutureProtest => [240, 160, 40, 255],
            EventCategory::Police => [40, 90, 200, 255],
            EventCategory::Clash => [130, 40, 160, 255],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_has_four_distinct_categories() {
        let all = EventCategory::all();
        assert_eq!(all.len(), 4);
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_keys_are_distinct() {
        let keys: Vec<_> = EventCategory::all().iter().map(EventCategory::key).collect();
        for (i, key) in keys.iter().enumerate() {
            assert!(!keys[i + 1..].contains(key));
        }
    }

    #[test]
    fn test_popup_titles() {
        assert_eq!(EventCategory::ActiveProtest.popup_title(), "ACTIVE PROTEST");
        assert_eq!(EventCategory::FutureProtest.popup_title(), "FUTURE PROTEST");
        assert_eq!(EventCategory::Police.popup_title(), "POLICE");
        assert_eq!(EventCategory::Clash.popup_title(), "CLASH");
    }

    #[test]
    fn test_icon_paths() {
        assert_eq!(EventCategory::ActiveProtest.icon_path(), "icons/protest.png");
        assert_eq!(
            EventCategory::FutureProtest.icon_path(),
            "icons/future-protest.png"
        );
        assert_eq!(EventCategory::Police.icon_path(), "icons/police.png");
        assert_eq!(EventCategory::Clash.icon_path(), "icons/clash.png");
    }

    #[test]
    fn test_selection_notices() {
        assert_eq!(
            EventCategory::ActiveProtest.selection_notice(),
            "You have selected the Active Protest marker."
        );
        assert_eq!(
            EventCategory::FutureProtest.selection_notice(),
            "You have selected the Future Protest marker."
        );
        assert_eq!(
            EventCategory::Police.selection_notice(),
            "You have selected the Police Activity marker."
        );
        assert_eq!(
            EventCategory::Clash.selection_notice(),
            "You have selected the Clash marker."
        );
    }

    #[test]
    fn test_shortcuts_are_unique() {
        let keys: Vec<KeyCode> = EventCategory::all().iter().map(|c| c.shortcut()).collect();
        for (i, a) in keys.iter().enumerate() {
            assert!(!keys[i + 1..].contains(a));
        }
    }

    #[test]
    fn test_button_labels_contain_shortcuts() {
        assert_eq!(EventCategory::Police.button_label(), "Police Activity [3]");
        for category in EventCategory::all() {
            let label = category.button_label();
            assert!(label.contains('['), "Label should contain shortcut: {}", label);
        }
    }
}
