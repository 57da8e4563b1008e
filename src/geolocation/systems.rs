//! Bevy systems for the location lookup.

use bevy::prelude::*;
use bevy::tasks::AsyncComputeTaskPool;
use futures_lite::future;

use crate::config::AppConfig;
use crate::map::{
    fit_zoom, AddCircleRequest, IconSpec, LatLng, MapView, PlaceMarkerRequest, PopupContent,
};
use crate::ui::ShowNotice;

use super::operations::locate;
use super::state::{LocateRequest, LocateState, LocateTask, LocationFix, LOCATION_ERROR_NOTICE};

pub const YOU_ARE_HERE: &str = "You are here";

/// Center and zoom that show the whole uncertainty area of `fix`: a box
/// twice the accuracy across, zoomed in no further than `max_zoom`.
pub fn located_view(view: &MapView, fix: &LocationFix, max_zoom: u8) -> (LatLng, u8) {
    let max_zoom = max_zoom.min(view.max_zoom).max(view.min_zoom);
    let zoom = fit_zoom(
        fix.position.lat,
        fix.accuracy_m * 2.0,
        view.viewport.as_dvec2(),
        view.min_zoom,
        max_zoom,
    );
    (fix.position, zoom)
}

/// The "you are here" pin, popup open, and the accuracy circle around it.
pub fn location_overlays(fix: &LocationFix) -> (PlaceMarkerRequest, AddCircleRequest) {
    let marker = PlaceMarkerRequest {
        position: fix.position,
        icon: IconSpec::default_pin(),
        popup: PopupContent::text(YOU_ARE_HERE),
        open_popup: true,
        category: None,
    };
    let circle = AddCircleRequest {
        center: fix.position,
        radius_m: fix.circle_radius_m(),
    };
    (marker, circle)
}

/// Start a lookup for each request, unless one is already running.
pub fn start_locate(
    mut commands: Commands,
    mut requests: MessageReader<LocateRequest>,
    mut state: ResMut<LocateState>,
    config: Res<AppConfig>,
) {
    // Several clicks in one frame still start a single lookup
    if requests.read().count() == 0 {
        return;
    }
    if state.in_progress {
        debug!("Location lookup already running");
        return;
    }

    state.in_progress = true;
    let source = config.data.geolocation.source.clone();
    let default_accuracy_m = config.data.geolocation.default_accuracy_m;
    info!("Looking up location");

    let task_pool = AsyncComputeTaskPool::get();
    let task = task_pool.spawn(async move { locate(&source, default_accuracy_m) });

    commands.spawn(LocateTask(task));
}

/// Poll the lookup task and show the result on the map.
#[allow(clippy::too_many_arguments)]
pub fn poll_locate_task(
    mut commands: Commands,
    mut state: ResMut<LocateState>,
    mut tasks: Query<(Entity, &mut LocateTask)>,
    mut view: ResMut<MapView>,
    config: Res<AppConfig>,
    mut markers: MessageWriter<PlaceMarkerRequest>,
    mut circles: MessageWriter<AddCircleRequest>,
    mut notices: MessageWriter<ShowNotice>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut task.0)) else {
            continue;
        };
        state.in_progress = false;
        commands.entity(entity).despawn();

        match result {
            Ok(fix) => {
                let (center, zoom) =
                    located_view(&view, &fix, config.data.geolocation.locate_max_zoom);
                view.set_view(center, zoom);
                info!(
                    "Located at {} (accuracy {:.0} m), zoom {}",
                    fix.position.format_short(),
                    fix.accuracy_m,
                    view.zoom
                );

                let (marker, circle) = location_overlays(&fix);
                markers.write(marker);
                circles.write(circle);
            }
            Err(e) => {
                warn!("Location lookup failed: {}", e);
                notices.write(ShowNotice::new(LOCATION_ERROR_NOTICE));
            }
        }
    }
}
