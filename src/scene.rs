//! Weighted global statistics over a finished palette.

use crate::color::{clamp_u8_f32, Lab, Rgb};
use crate::palette::Palette;

/// Saturation below this is treated as achromatic for hue statistics.
const HUE_MIN_SATURATION: f32 = 0.08;

/// Dominant hue requires at least this much saturation.
const DOMINANT_MIN_SATURATION: f32 = 0.12;

/// Hue gaps wider than this split the top entries into separate clusters.
const CLUSTER_GAP: f32 = 30.0 / 360.0;

/// Aggregate scene statistics. Computed once per palette; read-only input
/// to every strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SceneAnalysis {
    pub mean_rgb: Rgb,
    pub mean_lab: Lab,
    /// L* of the weighted mean color, normalized to [0, 1].
    pub mean_luminance: f32,
    /// Hue of the first sufficiently saturated entry, in palette order.
    pub dominant_hue: f32,
    /// Weighted circular standard deviation of chromatic hues.
    pub hue_spread: f32,
    /// Gap-based count of distinct hue groups among the top entries.
    pub hue_cluster_count: usize,
    pub saturation_mean: f32,
    pub saturation_std: f32,
}

/// Compute scene statistics from the finished palette.
pub fn analyze(palette: &Palette) -> SceneAnalysis {
    if palette.is_empty() {
        return SceneAnalysis::default();
    }
    let total: f64 = palette.entries.iter().map(|e| e.weight as f64).sum();

    let mut sum = [0.0f64; 3];
    for e in &palette.entries {
        let w = e.weight as f64;
        sum[0] += e.rgb.r as f64 * w;
        sum[1] += e.rgb.g as f64 * w;
        sum[2] += e.rgb.b as f64 * w;
    }
    let mean_rgb = Rgb::new(
        clamp_u8_f32((sum[0] / total).round() as f32),
        clamp_u8_f32((sum[1] / total).round() as f32),
        clamp_u8_f32((sum[2] / total).round() as f32),
    );
    let mean_lab = mean_rgb.to_lab();
    let mean_luminance = mean_rgb.luminance();

    let dominant_hue = palette
        .entries
        .iter()
        .find(|e| e.hsv.s >= DOMINANT_MIN_SATURATION)
        .map(|e| e.hsv.h)
        .unwrap_or(0.0);

    let hue_spread = circular_spread(palette);
    let hue_cluster_count = count_hue_clusters(palette);

    let (saturation_mean, saturation_std) = saturation_stats(palette, total);

    SceneAnalysis {
        mean_rgb,
        mean_lab,
        mean_luminance,
        dominant_hue,
        hue_spread,
        hue_cluster_count,
        saturation_mean,
        saturation_std,
    }
}

/// Weighted circular standard deviation of hue over chromatic entries.
fn circular_spread(palette: &Palette) -> f32 {
    let mut sin_sum = 0.0f64;
    let mut cos_sum = 0.0f64;
    let mut weight = 0.0f64;
    for e in &palette.entries {
        if e.hsv.s >= HUE_MIN_SATURATION {
            let angle = (e.hsv.h as f64) * std::f64::consts::TAU;
            let w = e.weight as f64;
            sin_sum += angle.sin() * w;
            cos_sum += angle.cos() * w;
            weight += w;
        }
    }
    if weight <= 0.0 {
        return 0.0;
    }
    let r = (sin_sum.hypot(cos_sum) / weight).clamp(1e-9, 1.0);
    (-2.0 * r.ln()).sqrt() as f32
}

/// Crude hue cluster count: sort the top chromatic entries around the hue
/// circle and count gaps wider than 30°.
fn count_hue_clusters(palette: &Palette) -> usize {
    let mut hues: Vec<f32> = palette
        .entries
        .iter()
        .take(12)
        .filter(|e| e.hsv.s >= HUE_MIN_SATURATION)
        .map(|e| e.hsv.h)
        .collect();
    if hues.is_empty() {
        return 1;
    }
    if hues.len() == 1 {
        return 1;
    }
    hues.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut big_gaps = 0;
    for i in 0..hues.len() {
        let a = hues[i];
        let b = hues[(i + 1) % hues.len()];
        let gap = (b - a).rem_euclid(1.0);
        if gap > CLUSTER_GAP {
            big_gaps += 1;
        }
    }
    big_gaps.max(1)
}

fn saturation_stats(palette: &Palette, total: f64) -> (f32, f32) {
    let mean: f64 = palette
        .entries
        .iter()
        .map(|e| e.hsv.s as f64 * e.weight as f64)
        .sum::<f64>()
        / total;
    let var: f64 = palette
        .entries
        .iter()
        .map(|e| {
            let d = e.hsv.s as f64 - mean;
            d * d * e.weight as f64
        })
        .sum::<f64>()
        / total;
    (mean as f32, var.sqrt() as f32)
}
