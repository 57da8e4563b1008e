//! Raster tile layer.
//!
//! Tiles are fetched over HTTP on the async compute pool, decoded with the
//! `image` crate and kept in memory for the session. A failed tile stays
//! blank. Nothing is written to disk.

use std::collections::{HashMap, HashSet};
use std::io::Read;

use bevy::math::DVec2;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::tasks::{AsyncComputeTaskPool, Task};
use futures_lite::future;
use thiserror::Error;

use crate::config::TileLayerConfig;
use crate::constants::{MAX_CACHED_TILES, MAX_TILE_FETCHES_IN_FLIGHT, TILE_SIZE, USER_AGENT};

use super::view::MapView;

/// Upper bound on a tile response body.
const MAX_TILE_BYTES: u64 = 4 * 1024 * 1024;

/// A tile as addressed on the server (x already wrapped).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

/// A tile as positioned on screen. `x` is not wrapped, so the same server
/// tile may appear several times when the world repeats horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TilePlacement {
    pub zoom: u8,
    pub x: i64,
    pub y: u32,
}

impl TilePlacement {
    pub fn source(&self) -> TileId {
        let count = 1i64 << self.zoom;
        TileId {
            zoom: self.zoom,
            x: self.x.rem_euclid(count) as u32,
            y: self.y,
        }
    }

    /// World position of the tile center for `view`.
    pub fn world_center(&self, view: &MapView) -> Vec2 {
        let top_left = DVec2::new(self.x as f64, self.y as f64) * TILE_SIZE;
        let center = top_left + DVec2::splat(TILE_SIZE / 2.0) - view.center_pixel();
        Vec2::new(center.x as f32, -center.y as f32)
    }
}

/// Tiles needed to cover the viewport of `view`.
pub fn visible_tiles(view: &MapView) -> Vec<TilePlacement> {
    let half = view.viewport.as_dvec2() / 2.0;
    let center = view.center_pixel();
    let min = ((center - half) / TILE_SIZE).floor();
    let max = ((center + half) / TILE_SIZE).floor();
    let rows = 1i64 << view.zoom;

    let mut tiles = Vec::new();
    for y in (min.y as i64).max(0)..=(max.y as i64).min(rows - 1) {
        for x in min.x as i64..=max.x as i64 {
            tiles.push(TilePlacement {
                zoom: view.zoom,
                x,
                y: y as u32,
            });
        }
    }
    tiles
}

/// Expand a `{s}/{z}/{x}/{y}` URL template for `tile`.
pub fn tile_url(layer: &TileLayerConfig, tile: TileId) -> String {
    let subdomain = if layer.subdomains.is_empty() {
        ""
    } else {
        let index = (tile.x as usize + tile.y as usize) % layer.subdomains.len();
        layer.subdomains[index].as_str()
    };

    layer
        .url_template
        .replace("{s}", subdomain)
        .replace("{z}", &tile.zoom.to_string())
        .replace("{x}", &tile.x.to_string())
        .replace("{y}", &tile.y.to_string())
        .replace("{r}", "")
}

#[derive(Debug, Error)]
pub enum TileError {
    #[error("tile server answered {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("failed to read response: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Decoded RGBA8 pixels of one tile.
#[derive(Debug)]
pub struct DecodedTile {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedTile {
    pub fn into_image(self) -> Image {
        Image::new(
            Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            self.rgba,
            TextureFormat::Rgba8UnormSrgb,
            default(),
        )
    }
}

pub fn decode_tile(bytes: &[u8]) -> Result<DecodedTile, TileError> {
    let image = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = image.dimensions();
    Ok(DecodedTile {
        width,
        height,
        rgba: image.into_raw(),
    })
}

/// Download and decode a tile. Blocking; run it off the main thread.
pub fn fetch_tile(url: &str) -> Result<DecodedTile, TileError> {
    let response = ureq::get(url)
        .set("User-Agent", USER_AGENT)
        .call()
        .map_err(|e| match e {
            ureq::Error::Status(code, _) => TileError::Status(code),
            other => TileError::Transport(other.to_string()),
        })?;

    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(MAX_TILE_BYTES)
        .read_to_end(&mut bytes)?;

    decode_tile(&bytes)
}

/// The tile source in use, built from config.
#[derive(Resource, Debug, Clone, Default)]
pub struct TileSource {
    pub layer: TileLayerConfig,
}

#[derive(Debug, Clone)]
pub enum TileSlot {
    Pending,
    Ready(Handle<Image>),
    Failed,
}

/// Session-lifetime tile cache.
#[derive(Resource, Default)]
pub struct TileCache {
    slots: HashMap<TileId, TileSlot>,
    in_flight: usize,
}

impl TileCache {
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Drop cached tiles that are not in `keep` once the cache grows past its
    /// bound. Pending slots are kept so their results still land.
    fn evict(&mut self, keep: &HashSet<TileId>) {
        if self.slots.len() <= MAX_CACHED_TILES {
            return;
        }
        self.slots
            .retain(|id, slot| keep.contains(id) || matches!(slot, TileSlot::Pending));
    }
}

/// Background tile download
#[derive(Component)]
pub struct TileFetchTask {
    pub id: TileId,
    pub task: Task<Result<DecodedTile, TileError>>,
}

/// A tile sprite on screen.
#[derive(Component, Debug, Clone, Copy)]
pub struct MapTile {
    pub placement: TilePlacement,
}

/// Spawn sprites for visible tiles, despawn the rest, and queue downloads.
pub fn update_visible_tiles(
    mut commands: Commands,
    view: Res<MapView>,
    source: Res<TileSource>,
    mut cache: ResMut<TileCache>,
    tiles: Query<(Entity, &MapTile)>,
) {
    let wanted = visible_tiles(&view);
    let wanted_set: HashSet<TilePlacement> = wanted.iter().copied().collect();

    let mut shown: HashSet<TilePlacement> = HashSet::new();
    for (entity, tile) in tiles.iter() {
        if wanted_set.contains(&tile.placement) {
            shown.insert(tile.placement);
        } else {
            commands.entity(entity).despawn();
        }
    }

    let task_pool = AsyncComputeTaskPool::get();
    for placement in wanted {
        if shown.contains(&placement) {
            continue;
        }

        let id = placement.source();
        match cache.slots.get(&id) {
            Some(TileSlot::Ready(handle)) => {
                commands.spawn((
                    Sprite {
                        image: handle.clone(),
                        custom_size: Some(Vec2::splat(TILE_SIZE as f32)),
                        ..default()
                    },
                    Transform::from_translation(placement.world_center(&view).extend(0.0)),
                    MapTile { placement },
                ));
            }
            Some(TileSlot::Pending) | Some(TileSlot::Failed) => {}
            None => {
                if cache.in_flight >= MAX_TILE_FETCHES_IN_FLIGHT {
                    continue;
                }
                let url = tile_url(&source.layer, id);
                trace!("Fetching tile {}", url);
                let task = task_pool.spawn(async move { fetch_tile(&url) });
                commands.spawn(TileFetchTask { id, task });
                cache.slots.insert(id, TileSlot::Pending);
                cache.in_flight += 1;
            }
        }
    }

    let keep: HashSet<TileId> = wanted_set.iter().map(TilePlacement::source).collect();
    cache.evict(&keep);
}

pub fn poll_tile_fetches(
    mut commands: Commands,
    mut cache: ResMut<TileCache>,
    mut images: ResMut<Assets<Image>>,
    mut tasks: Query<(Entity, &mut TileFetchTask)>,
) {
    for (entity, mut fetch) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut fetch.task)) else {
            continue;
        };

        cache.in_flight = cache.in_flight.saturating_sub(1);
        let slot = match result {
            Ok(decoded) => TileSlot::Ready(images.add(decoded.into_image())),
            Err(e) => {
                warn!(
                    "Tile {}/{}/{} failed: {}",
                    fetch.id.zoom, fetch.id.x, fetch.id.y, e
                );
                TileSlot::Failed
            }
        };
        cache.slots.insert(fetch.id, slot);

        commands.entity(entity).despawn();
    }
}

/// Keep tile sprites aligned with the view center.
pub fn position_tiles(view: Res<MapView>, mut tiles: Query<(&MapTile, &mut Transform)>) {
    if !view.is_changed() {
        return;
    }
    for (tile, mut transform) in tiles.iter_mut() {
        transform.translation = tile.placement.world_center(&view).extend(0.0);
    }
}
