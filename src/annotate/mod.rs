//! Categorized event markers: picking a category, the long-press gesture and
//! the time/notes prompts that turn a press into a marker.

mod category;
pub mod conditions;
mod creation;
mod long_press;
mod record;
mod selection;

pub use category::EventCategory;
pub use creation::CreationFlow;
pub use long_press::{LongPressRecognizer, LongPressTriggered};
pub use selection::{SelectCategoryRequest, SelectedCategory};

use std::time::Duration;

use bevy::prelude::*;

use crate::config::{AppConfig, ConfigLoaded};

/// Apply the configured long-press hold time.
fn apply_long_press_config(config: Res<AppConfig>, mut recognizer: ResMut<LongPressRecognizer>) {
    recognizer.set_threshold(Duration::from_millis(config.data.long_press_ms));
    info!("Long press threshold {} ms", recognizer.threshold().as_millis());
}

pub struct AnnotatePlugin;

impl Plugin for AnnotatePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SelectedCategory>()
            .init_resource::<LongPressRecognizer>()
            .init_resource::<CreationFlow>()
            .add_message::<SelectCategoryRequest>()
            .add_message::<LongPressTriggered>()
            .add_systems(Startup, apply_long_press_config.after(ConfigLoaded))
            .add_systems(
                Update,
                (
                    selection::handle_category_shortcuts.run_if(conditions::no_dialog_open),
                    selection::apply_category_selection
                        .run_if(on_message::<SelectCategoryRequest>),
                    long_press::recognize_long_press,
                    creation::start_marker_creation.run_if(on_message::<LongPressTriggered>),
                    creation::commit_marker.run_if(conditions::flow_is_committing),
                )
                    .chain()
                    .after(crate::map::MapInputSet),
            );
    }
}
