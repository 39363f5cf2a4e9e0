//! Per-pixel importance weights for sampling.
//!
//! Importance combines three cues: vibrancy (saturated, bright pixels carry
//! the theme), edge gradient magnitude (structure over flat background), and
//! a center prior (subjects tend to sit near the middle of a wallpaper).

use crate::color::{Hsv, Rgb};

const VIBRANCY_WEIGHT: f32 = 0.55;
const EDGE_WEIGHT: f32 = 0.30;
const CENTER_WEIGHT: f32 = 0.15;

/// Saturation below this is treated as grey and damped.
const GREY_SATURATION: f32 = 0.08;

/// Weights stay strictly positive so they remain valid sampling
/// probabilities even for uniform images.
const WEIGHT_FLOOR: f32 = 1e-4;

/// Per-pixel importance map.
#[derive(Clone, Debug)]
pub struct WeightMap {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl WeightMap {
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    pub fn total(&self) -> f32 {
        self.data.iter().sum()
    }
}

/// Build the importance map for an image.
///
/// `hsvs` must be the per-pixel HSV conversion of `pixels`; the caller
/// computes it once and shares it with the sampler.
pub fn build_weight_map(
    pixels: &[Rgb],
    hsvs: &[Hsv],
    width: usize,
    height: usize,
) -> WeightMap {
    debug_assert_eq!(pixels.len(), width * height);
    debug_assert_eq!(hsvs.len(), pixels.len());

    let edges = edge_magnitude(pixels, width, height);
    let max_edge = edges.iter().cloned().fold(0.0f32, f32::max);

    let cx = (width.saturating_sub(1)) as f32 / 2.0;
    let cy = (height.saturating_sub(1)) as f32 / 2.0;
    let half_w = (width as f32 / 2.0).max(1.0);
    let half_h = (height as f32 / 2.0).max(1.0);

    let mut data = Vec::with_capacity(pixels.len());
    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let hsv = hsvs[idx];

            let edge = if max_edge > 0.0 { edges[idx] / max_edge } else { 0.0 };
            let center = center_prior(x as f32, y as f32, cx, cy, half_w, half_h);

            let mut w = VIBRANCY_WEIGHT * hsv.vibrancy()
                + EDGE_WEIGHT * edge
                + CENTER_WEIGHT * center;

            // Near-greys keep some weight so dominant backgrounds still
            // register, but never outvote chroma at equal area.
            if hsv.s < GREY_SATURATION {
                let damp = 0.5 + 0.5 * (hsv.s / GREY_SATURATION);
                w *= damp;
            }

            data.push(w.max(WEIGHT_FLOOR));
        }
    }

    WeightMap { width, height, data }
}

/// Gaussian-like falloff from image center, clamped to [0.2, 1.0].
fn center_prior(x: f32, y: f32, cx: f32, cy: f32, half_w: f32, half_h: f32) -> f32 {
    let dx = (x - cx) / half_w;
    let dy = (y - cy) / half_h;
    let d2 = dx * dx + dy * dy;
    (-1.5 * d2).exp().clamp(0.2, 1.0)
}

/// Scharr gradient magnitude of L* luma.
///
/// Kernel:
/// ```text
/// [ 3 10  3]      [ 3  0  -3]
/// [ 0  0  0]      [10  0 -10]
/// [-3 -10 -3]     [ 3  0  -3]
/// ```
fn edge_magnitude(pixels: &[Rgb], width: usize, height: usize) -> Vec<f32> {
    let mut edges = vec![0.0f32; width * height];
    if width < 3 || height < 3 {
        return edges;
    }

    let luma: Vec<f32> = pixels.iter().map(|p| p.luminance()).collect();

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut gx = 0.0;
            let mut gy = 0.0;

            for dy in -1i32..=1 {
                for dx in -1i32..=1 {
                    let idx = (y as i32 + dy) as usize * width + (x as i32 + dx) as usize;
                    let lum = luma[idx];

                    let weight_x = match (dx, dy) {
                        (-1, -1) => 3.0, (-1, 0) => 10.0, (-1, 1) => 3.0,
                        (1, -1) => -3.0, (1, 0) => -10.0, (1, 1) => -3.0,
                        _ => 0.0,
                    };
                    let weight_y = match (dx, dy) {
                        (-1, -1) => 3.0, (0, -1) => 10.0, (1, -1) => 3.0,
                        (-1, 1) => -3.0, (0, 1) => -10.0, (1, 1) => -3.0,
                        _ => 0.0,
                    };

                    gx += lum * weight_x;
                    gy += lum * weight_y;
                }
            }

            edges[y * width + x] = (gx * gx + gy * gy).sqrt();
        }
    }

    edges
}
