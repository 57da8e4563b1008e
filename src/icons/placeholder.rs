//! Generated pin images for icons that are missing or fail to load.
//!
//! The pin is a filled disc with a point underneath, drawn in the marker's
//! fallback color with a darker outline, so a marker with a broken icon file
//! is still visible and keeps its category color.

use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

/// Side length of generated pins in pixels. Sprites scale it to the icon size.
pub const PIN_TEXTURE_SIZE: u32 = 64;

const OUTLINE_WIDTH: f32 = 3.0;

/// Distance inside the pin shape, negative outside. `x`/`y` are pixel centers
/// in a `size`×`size` image with y down.
fn pin_depth(x: f32, y: f32, size: f32) -> f32 {
    let radius = size * 0.34;
    let center = Vec2::new(size / 2.0, radius + 1.0);
    let tip = Vec2::new(size / 2.0, size - 1.0);
    let p = Vec2::new(x, y);

    let disc = radius - p.distance(center);

    // Point: triangle from the disc's widest row down to the tip
    let point = if y >= center.y && y <= tip.y {
        let t = (tip.y - y) / (tip.y - center.y);
        let half_width = radius * t;
        half_width - (x - center.x).abs()
    } else {
        f32::NEG_INFINITY
    };

    disc.max(point)
}

fn darken(color: [u8; 4]) -> [u8; 4] {
    [
        (color[0] as f32 * 0.55) as u8,
        (color[1] as f32 * 0.55) as u8,
        (color[2] as f32 * 0.55) as u8,
        color[3],
    ]
}

/// RGBA pixels of a pin in `color`.
pub fn pin_pixels(color: [u8; 4], size: u32) -> Vec<u8> {
    let side = size as usize;
    let mut data = vec![0u8; side * side * 4];
    let outline = darken(color);

    for y in 0..side {
        for x in 0..side {
            let depth = pin_depth(x as f32 + 0.5, y as f32 + 0.5, size as f32);
            let pixel = if depth < 0.0 {
                continue;
            } else if depth < OUTLINE_WIDTH {
                outline
            } else {
                color
            };
            let idx = (y * side + x) * 4;
            data[idx..idx + 4].copy_from_slice(&pixel);
        }
    }

    data
}

pub fn create_pin_image(color: [u8; 4]) -> Image {
    Image::new(
        Extent3d {
            width: PIN_TEXTURE_SIZE,
            height: PIN_TEXTURE_SIZE,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        pin_pixels(color, PIN_TEXTURE_SIZE),
        TextureFormat::Rgba8UnormSrgb,
        default(),
    )
}
