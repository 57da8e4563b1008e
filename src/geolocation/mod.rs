//! "Show My Location": resolves the user's position in the background and
//! marks it on the map with an accuracy circle.
//!
//! Desktop machines have no browser location API, so the position comes from
//! the configured [`GeolocationSource`](crate::config::GeolocationSource): a
//! JSON lookup service (IP based by default) or a fixed position.

mod operations;
mod state;
mod systems;

#[cfg(test)]
mod tests;

pub use state::{LocateRequest, LocateState};

use bevy::prelude::*;

pub struct GeolocationPlugin;

impl Plugin for GeolocationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LocateState>()
            .add_message::<LocateRequest>()
            .add_systems(
                Update,
                (
                    systems::start_locate.run_if(on_message::<LocateRequest>),
                    systems::poll_locate_task,
                )
                    .chain()
                    .after(crate::map::MapInputSet),
            );
    }
}
