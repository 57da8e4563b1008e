use bevy::prelude::*;

/// One labelled line under a popup title, e.g. `Time: 14:00`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupLine {
    pub label: String,
    pub value: String,
}

/// Text shown in a marker popup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PopupContent {
    pub title: String,
    pub lines: Vec<PopupLine>,
}

impl PopupContent {
    pub fn text(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
        }
    }

    pub fn with_line(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.lines.push(PopupLine {
            label: label.into(),
            value: value.into(),
        });
        self
    }

    /// HTML rendering in the usual web-map popup markup, used for logging.
    pub fn to_html(&self) -> String {
        let mut html = self.title.clone();
        for line in &self.lines {
            html.push_str(&format!(
                "<br><strong>{}:</strong> {}",
                line.label, line.value
            ));
        }
        html
    }
}

/// Popup bound to a marker.
#[derive(Component, Debug, Clone)]
pub struct Popup {
    pub content: PopupContent,
    pub open: bool,
}

/// Open the popup of `entity` (closing all others) or close it if it is
/// already open.
pub fn toggle_popup(entity: Entity, popups: &mut Query<(Entity, &mut Popup)>) {
    for (other, mut popup) in popups.iter_mut() {
        if other == entity {
            popup.open = !popup.open;
        } else if popup.open {
            popup.open = false;
        }
    }
}
