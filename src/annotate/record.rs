use crate::map::{LatLng, PopupContent};

use super::category::EventCategory;

/// Everything the user told us about one event.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerRecord {
    pub position: LatLng,
    pub category: EventCategory,
    pub time: Option<String>,
    pub notes: Option<String>,
}

impl MarkerRecord {
    pub fn new(
        position: LatLng,
        category: EventCategory,
        time: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            position,
            category,
            time: non_empty(time.into()),
            notes: non_empty(notes.into()),
        }
    }

    pub fn popup_content(&self) -> PopupContent {
        let title = format!(
            "{} AT {}",
            self.category.popup_title(),
            self.position.format_short()
        );
        let mut content = PopupContent::text(title);
        if let Some(time) = &self.time {
            content = content.with_line("Time", time);
        }
        if let Some(notes) = &self.notes {
            content = content.with_line("Notes", notes);
        }
        content
    }
}

/// Only the empty string counts as "nothing entered"; whitespace is kept.
fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANKARA: LatLng = LatLng::new(39.9208, 32.8541);

    #[test]
    fn test_title_only_when_nothing_entered() {
        let record = MarkerRecord::new(ANKARA, EventCategory::Police, "", "");
        assert_eq!(record.time, None);
        assert_eq!(record.notes, None);
        assert_eq!(record.popup_content().to_html(), "POLICE AT 39.92, 32.85");
    }

    #[test]
    fn test_time_and_notes_lines() {
        let record = MarkerRecord::new(
            ANKARA,
            EventCategory::ActiveProtest,
            "2025-05-10 14:00",
            "Large crowd",
        );
        assert_eq!(
            record.popup_content().to_html(),
            "ACTIVE PROTEST AT 39.92, 32.85<br><strong>Time:</strong> 2025-05-10 14:00\
             <br><strong>Notes:</strong> Large crowd"
        );
    }

    #[test]
    fn test_notes_without_time() {
        let record = MarkerRecord::new(ANKARA, EventCategory::Clash, "", "tear gas");
        let content = record.popup_content();
        assert_eq!(content.lines.len(), 1);
        assert_eq!(content.lines[0].label, "Notes");
        assert_eq!(content.lines[0].value, "tear gas");
    }

    #[test]
    fn test_whitespace_is_kept() {
        let record = MarkerRecord::new(ANKARA, EventCategory::FutureProtest, " ", "");
        assert_eq!(record.time.as_deref(), Some(" "));
        assert_eq!(record.popup_content().lines.len(), 1);
    }

    #[test]
    fn test_negative_coordinates_round_to_two_places() {
        let record = MarkerRecord::new(
            LatLng::new(-33.8688, 151.2093),
            EventCategory::FutureProtest,
            "",
            "",
        );
        assert_eq!(
            record.popup_content().title,
            "FUTURE PROTEST AT -33.87, 151.21"
        );
    }
}
