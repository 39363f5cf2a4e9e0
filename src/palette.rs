//! Palette assembly: cluster merging and accent promotion.
//!
//! Turns final cluster assignments into an ordered palette. Near-duplicate
//! clusters are merged, and a small number of high-vibrancy entries are
//! promoted into the final set even when weight-based truncation would drop
//! them, so minority accent colors survive.

use crate::cluster::Clustering;
use crate::color::{clamp_u8_f32, Hsv, Lab, Rgb};
use crate::sample::Sample;
use ordered_float::OrderedFloat;

/// One palette color with its derived records and aggregate sampling weight.
///
/// HSV and Lab are pure functions of the RGB value; weight is strictly
/// positive. Entries are immutable once built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaletteEntry {
    pub rgb: Rgb,
    pub hsv: Hsv,
    pub lab: Lab,
    pub weight: f32,
}

impl PaletteEntry {
    fn new(rgb: Rgb, weight: f32) -> Self {
        Self {
            rgb,
            hsv: rgb.to_hsv(),
            lab: rgb.to_lab(),
            weight,
        }
    }

    pub fn vibrancy(&self) -> f32 {
        self.hsv.vibrancy()
    }
}

/// Ordered palette: descending weight, vibrancy breaking ties.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Palette {
    pub entries: Vec<PaletteEntry>,
}

impl Palette {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_weight(&self) -> f32 {
        self.entries.iter().map(|e| e.weight).sum()
    }
}

/// Palette assembly configuration. The merge threshold and promotion cap are
/// empirical constants from the source material; they are kept configurable
/// rather than baked into the algorithm.
#[derive(Clone, Copy, Debug)]
pub struct PaletteConfig {
    /// Entries closer than this ΔE are merged.
    pub merge_delta_e: f32,
    /// Upper bound on entries force-promoted by vibrancy.
    pub max_promoted: usize,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            merge_delta_e: 5.0,
            max_promoted: 3,
        }
    }
}

/// Build the final palette from cluster assignments.
///
/// Steps: weighted-mean RGB per cluster, near-duplicate merge, vibrancy
/// promotion, exact-RGB dedup, weight-ranked truncation with vibrant
/// backfill, final ordering.
pub fn build_palette(
    samples: &[Sample],
    clustering: &Clustering,
    target_size: usize,
    config: &PaletteConfig,
) -> Palette {
    let mut entries = cluster_means(samples, clustering);
    entries = merge_near_duplicates(entries, config.merge_delta_e);

    // Promotion count: min(cap, max(1, target/8))
    let promoted_count = config
        .max_promoted
        .min((target_size / 8).max(1))
        .min(entries.len());

    let mut by_vibrancy: Vec<usize> = (0..entries.len()).collect();
    by_vibrancy.sort_by_key(|&i| std::cmp::Reverse(OrderedFloat(entries[i].vibrancy())));

    let mut by_weight: Vec<usize> = (0..entries.len()).collect();
    by_weight.sort_by_key(|&i| {
        (
            std::cmp::Reverse(OrderedFloat(entries[i].weight)),
            std::cmp::Reverse(OrderedFloat(entries[i].vibrancy())),
        )
    });

    let mut selected: Vec<usize> = Vec::with_capacity(target_size);
    let mut seen_rgb: Vec<Rgb> = Vec::new();
    let mut push_unique = |idx: usize, selected: &mut Vec<usize>, seen: &mut Vec<Rgb>| {
        let rgb = entries[idx].rgb;
        if !seen.contains(&rgb) {
            seen.push(rgb);
            selected.push(idx);
        }
    };

    for &idx in by_vibrancy.iter().take(promoted_count) {
        push_unique(idx, &mut selected, &mut seen_rgb);
    }
    for &idx in &by_weight {
        if selected.len() >= target_size {
            break;
        }
        push_unique(idx, &mut selected, &mut seen_rgb);
    }
    // Backfill from the next most vibrant unused entries
    for &idx in &by_vibrancy {
        if selected.len() >= target_size {
            break;
        }
        push_unique(idx, &mut selected, &mut seen_rgb);
    }

    let mut final_entries: Vec<PaletteEntry> =
        selected.into_iter().map(|i| entries[i]).collect();
    final_entries.sort_by_key(|e| {
        (
            std::cmp::Reverse(OrderedFloat(e.weight)),
            std::cmp::Reverse(OrderedFloat(e.vibrancy())),
        )
    });

    Palette { entries: final_entries }
}

/// Weighted-mean RGB per cluster, rounded and clamped to [0, 255].
fn cluster_means(samples: &[Sample], clustering: &Clustering) -> Vec<PaletteEntry> {
    let n = clustering.centers.len();
    let mut sums = vec![[0.0f64; 3]; n];
    let mut weights = vec![0.0f64; n];

    for (s, &ci) in samples.iter().zip(clustering.assignments.iter()) {
        let w = s.weight as f64;
        sums[ci][0] += s.rgb.r as f64 * w;
        sums[ci][1] += s.rgb.g as f64 * w;
        sums[ci][2] += s.rgb.b as f64 * w;
        weights[ci] += w;
    }

    sums.iter()
        .zip(weights.iter())
        .filter(|(_, &w)| w > 0.0)
        .map(|(sum, &w)| {
            let rgb = Rgb::new(
                clamp_u8_f32((sum[0] / w).round() as f32),
                clamp_u8_f32((sum[1] / w).round() as f32),
                clamp_u8_f32((sum[2] / w).round() as f32),
            );
            PaletteEntry::new(rgb, w as f32)
        })
        .collect()
}

/// Merge entries pairwise until no two remain within `threshold` ΔE.
/// Merging averages by weight and re-derives HSV/Lab from the merged RGB.
fn merge_near_duplicates(mut entries: Vec<PaletteEntry>, threshold: f32) -> Vec<PaletteEntry> {
    if threshold <= 0.0 {
        return entries;
    }
    loop {
        let mut merged_any = false;
        'outer: for i in 0..entries.len() {
            for j in (i + 1)..entries.len() {
                if entries[i].lab.distance(entries[j].lab) < threshold {
                    let a = entries[i];
                    let b = entries.remove(j);
                    let w = a.weight + b.weight;
                    let blend = |x: u8, y: u8| {
                        clamp_u8_f32(
                            ((x as f32 * a.weight + y as f32 * b.weight) / w).round(),
                        )
                    };
                    entries[i] = PaletteEntry::new(
                        Rgb::new(
                            blend(a.rgb.r, b.rgb.r),
                            blend(a.rgb.g, b.rgb.g),
                            blend(a.rgb.b, b.rgb.b),
                        ),
                        w,
                    );
                    merged_any = true;
                    break 'outer;
                }
            }
        }
        if !merged_any {
            return entries;
        }
    }
}
