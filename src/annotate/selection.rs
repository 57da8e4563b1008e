use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::ui::ShowNotice;

use super::category::EventCategory;

/// The category new markers are created with, if the user picked one.
#[derive(Resource, Default, Debug)]
pub struct SelectedCategory {
    category: Option<EventCategory>,
}

impl SelectedCategory {
    pub fn get(&self) -> Option<EventCategory> {
        self.category
    }

    /// Set the slot to `category` and return the confirmation notice.
    pub fn select(&mut self, category: EventCategory) -> String {
        self.category = Some(category);
        category.selection_notice()
    }
}

/// Choose the category for subsequent markers.
#[derive(Message, Debug, Clone, Copy)]
pub struct SelectCategoryRequest {
    pub category: EventCategory,
}

pub fn apply_category_selection(
    mut requests: MessageReader<SelectCategoryRequest>,
    mut selected: ResMut<SelectedCategory>,
    mut notices: MessageWriter<ShowNotice>,
) {
    for request in requests.read() {
        let notice = selected.select(request.category);
        info!("Selected category {}", request.category.key());
        notices.write(ShowNotice::new(notice));
    }
}

/// Digit keys 1-4 pick a category.
pub fn handle_category_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut requests: MessageWriter<SelectCategoryRequest>,
    mut contexts: EguiContexts,
) {
    // Don't react while typing in a text field
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    for category in EventCategory::all() {
        if keyboard.just_pressed(category.shortcut()) {
            requests.write(SelectCategoryRequest {
                category: *category,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_starts_empty() {
        assert_eq!(SelectedCategory::default().get(), None);
    }

    #[test]
    fn test_select_sets_exactly_that_category() {
        for category in EventCategory::all() {
            let mut selected = SelectedCategory::default();
            let notice = selected.select(*category);
            assert_eq!(selected.get(), Some(*category));
            assert_eq!(notice, category.selection_notice());
        }
    }

    #[test]
    fn test_select_replaces_previous_choice() {
        let mut selected = SelectedCategory::default();
        selected.select(EventCategory::Police);
        selected.select(EventCategory::Clash);
        assert_eq!(selected.get(), Some(EventCategory::Clash));
    }
}
