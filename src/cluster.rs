//! Weighted k-means clustering in Lab space.
//!
//! Seeding runs in two phases. The majority phase spreads roughly 70% of the
//! centers across the whole sample with weighted k-means++. The accent phase
//! spends the remaining centers on saturated samples that sit far from every
//! majority center, so small vivid regions get centers of their own instead
//! of being absorbed into background clusters. A joint Lloyd refinement then
//! polishes the combined set.

use crate::color::{Lab, LabAccumulator};
use crate::sample::Sample;
use rand::rngs::StdRng;
use rand::Rng;

/// Accent-phase pool bounds.
const ACCENT_MIN_SATURATION: f32 = 0.55;
const ACCENT_VALUE_RANGE: (f32, f32) = (0.60, 0.92);

/// Share of centers seeded in the majority phase.
const MAJORITY_SHARE: f32 = 0.7;

/// Lloyd iterations used while refining the majority seed set alone.
const MAJORITY_REFINE_ITERATIONS: usize = 3;

#[derive(Clone, Copy, Debug)]
pub struct ClusterConfig {
    /// Joint weighted Lloyd iterations over the combined center set.
    pub lloyd_iterations: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self { lloyd_iterations: 8 }
    }
}

/// Final centers and per-sample assignments.
#[derive(Clone, Debug)]
pub struct Clustering {
    pub centers: Vec<Lab>,
    pub assignments: Vec<usize>,
}

/// Cluster `samples` into at most `target_size` centers.
///
/// Identical samples, seed state and target size yield identical centers.
/// `target_size` is capped to the sample count.
pub fn cluster_samples(
    samples: &[Sample],
    target_size: usize,
    config: &ClusterConfig,
    rng: &mut StdRng,
) -> Clustering {
    if samples.is_empty() || target_size == 0 {
        return Clustering { centers: Vec::new(), assignments: Vec::new() };
    }
    let k = target_size.min(samples.len());
    let k_major = (((k as f32) * MAJORITY_SHARE).round() as usize).clamp(1, k);

    // Majority phase
    let mut centers = seed_plus_plus(samples, k_major, &[], rng, |_, s| s.weight);
    lloyd_refine(samples, &mut centers, MAJORITY_REFINE_ITERATIONS, rng, true);

    // Accent phase
    let k_accent = k - centers.len();
    if k_accent > 0 {
        let accent_weights = accent_selection_weights(samples, &centers);
        let has_accent_pool = accent_weights.iter().any(|&w| w > 0.0);
        let extra = if has_accent_pool {
            seed_plus_plus(samples, k_accent, &centers, rng, |i, _| accent_weights[i])
        } else {
            seed_plus_plus(samples, k_accent, &centers, rng, |_, s| s.weight)
        };
        centers.extend(extra);
    }

    // Joint refinement with farthest-point reseeding for orphaned centers
    lloyd_refine(samples, &mut centers, config.lloyd_iterations, rng, false);

    let assignments = samples
        .iter()
        .map(|s| nearest_center(s.lab, &centers).0)
        .collect();
    Clustering { centers, assignments }
}

/// Accent-selection weight per sample: vibrancy × normalized squared
/// distance to the nearest majority center × sampling weight, zeroed
/// outside the saturation/value bounds.
fn accent_selection_weights(samples: &[Sample], majority: &[Lab]) -> Vec<f32> {
    let dist2: Vec<f32> = samples
        .iter()
        .map(|s| nearest_center(s.lab, majority).1)
        .collect();
    let max_d2 = dist2.iter().cloned().fold(0.0f32, f32::max);

    samples
        .iter()
        .zip(dist2.iter())
        .map(|(s, &d2)| {
            let qualifies = s.hsv.s >= ACCENT_MIN_SATURATION
                && s.hsv.v >= ACCENT_VALUE_RANGE.0
                && s.hsv.v <= ACCENT_VALUE_RANGE.1;
            if !qualifies || max_d2 <= 0.0 {
                0.0
            } else {
                s.hsv.vibrancy() * (d2 / max_d2) * s.weight
            }
        })
        .collect()
}

/// Weighted k-means++: the first center (when `existing` is empty) is drawn
/// weight-proportionally; every subsequent center proportionally to
/// weight × squared distance to its nearest already-chosen center.
fn seed_plus_plus(
    samples: &[Sample],
    count: usize,
    existing: &[Lab],
    rng: &mut StdRng,
    weight_of: impl Fn(usize, &Sample) -> f32,
) -> Vec<Lab> {
    let mut centers: Vec<Lab> = Vec::with_capacity(count);
    let base_weights: Vec<f64> = samples
        .iter()
        .enumerate()
        .map(|(i, s)| weight_of(i, s) as f64)
        .collect();

    for _ in 0..count {
        let all_centers: Vec<Lab> = existing.iter().chain(centers.iter()).cloned().collect();
        let scores: Vec<f64> = if all_centers.is_empty() {
            base_weights.clone()
        } else {
            samples
                .iter()
                .zip(base_weights.iter())
                .map(|(s, &w)| w * nearest_center(s.lab, &all_centers).1 as f64)
                .collect()
        };

        let total: f64 = scores.iter().sum();
        let idx = if total > 0.0 {
            weighted_pick(&scores, total, rng)
        } else {
            // All mass collapsed onto existing centers; any positive-weight
            // sample is as good as another.
            let base_total: f64 = base_weights.iter().sum();
            if base_total > 0.0 {
                weighted_pick(&base_weights, base_total, rng)
            } else {
                rng.gen_range(0..samples.len())
            }
        };
        centers.push(samples[idx].lab);
    }
    centers
}

/// Draw an index proportional to `weights`; `total` must be their sum.
fn weighted_pick(weights: &[f64], total: f64, rng: &mut StdRng) -> usize {
    let r: f64 = rng.gen::<f64>() * total;
    let mut acc = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        acc += w;
        if r < acc {
            return i;
        }
    }
    weights.len() - 1
}

/// Weighted Lloyd iterations. Orphaned centers are re-seeded: during the
/// majority phase to a random sample point, during joint refinement to the
/// sample farthest from its nearest center.
fn lloyd_refine(
    samples: &[Sample],
    centers: &mut [Lab],
    iterations: usize,
    rng: &mut StdRng,
    reseed_random: bool,
) {
    if centers.is_empty() {
        return;
    }
    for _ in 0..iterations {
        let mut acc = vec![LabAccumulator::new(); centers.len()];

        for s in samples {
            let (ci, _) = nearest_center(s.lab, centers);
            acc[ci].add(s.lab, s.weight);
        }

        for ci in 0..centers.len() {
            if acc[ci].weight > 0.0 {
                centers[ci] = acc[ci].mean();
            } else if reseed_random {
                centers[ci] = samples[rng.gen_range(0..samples.len())].lab;
            } else if let Some(si) = farthest_sample(samples, centers) {
                centers[ci] = samples[si].lab;
            }
        }
    }
}

/// Sample with the maximum distance to its nearest center.
fn farthest_sample(samples: &[Sample], centers: &[Lab]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (si, s) in samples.iter().enumerate() {
        let d2 = nearest_center(s.lab, centers).1;
        if best.map_or(true, |(_, bd)| d2 > bd) {
            best = Some((si, d2));
        }
    }
    best.map(|(si, _)| si)
}

fn nearest_center(lab: Lab, centers: &[Lab]) -> (usize, f32) {
    let mut best_idx = 0;
    let mut best_d2 = f32::INFINITY;
    for (i, &c) in centers.iter().enumerate() {
        let d2 = lab.distance_squared(c);
        if d2 < best_d2 {
            best_d2 = d2;
            best_idx = i;
        }
    }
    (best_idx, best_d2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use rand::SeedableRng;

    fn sample_of(rgb: Rgb, weight: f32) -> Sample {
        Sample {
            rgb,
            hsv: rgb.to_hsv(),
            lab: rgb.to_lab(),
            weight,
        }
    }

    fn three_blob_samples() -> Vec<Sample> {
        let mut samples = Vec::new();
        for i in 0..50u8 {
            samples.push(sample_of(Rgb::new(250 - i % 5, 20, 20), 1.0));
            samples.push(sample_of(Rgb::new(20, 250 - i % 5, 20), 1.0));
            samples.push(sample_of(Rgb::new(20, 20, 250 - i % 5), 1.0));
        }
        samples
    }

    #[test]
    fn test_clustering_is_deterministic() {
        let samples = three_blob_samples();
        let config = ClusterConfig::default();
        let a = cluster_samples(&samples, 6, &config, &mut StdRng::seed_from_u64(99));
        let b = cluster_samples(&samples, 6, &config, &mut StdRng::seed_from_u64(99));
        assert_eq!(a.centers.len(), b.centers.len());
        for (ca, cb) in a.centers.iter().zip(b.centers.iter()) {
            assert_eq!(ca.l, cb.l);
            assert_eq!(ca.a, cb.a);
            assert_eq!(ca.b, cb.b);
        }
        assert_eq!(a.assignments, b.assignments);
    }

    #[test]
    fn test_separated_blobs_get_separate_centers() {
        let samples = three_blob_samples();
        let result = cluster_samples(
            &samples,
            3,
            &ClusterConfig::default(),
            &mut StdRng::seed_from_u64(5),
        );
        assert_eq!(result.centers.len(), 3);

        // Every blob should map to its own center
        let red = result.assignments[0];
        let green = result.assignments[1];
        let blue = result.assignments[2];
        assert_ne!(red, green);
        assert_ne!(green, blue);
        assert_ne!(red, blue);
    }

    #[test]
    fn test_k_capped_to_sample_count() {
        let samples = vec![sample_of(Rgb::new(10, 200, 90), 1.0); 4];
        let result = cluster_samples(
            &samples,
            16,
            &ClusterConfig::default(),
            &mut StdRng::seed_from_u64(0),
        );
        assert!(result.centers.len() <= 4);
        assert_eq!(result.assignments.len(), 4);
    }

    #[test]
    fn test_empty_input() {
        let result = cluster_samples(
            &[],
            8,
            &ClusterConfig::default(),
            &mut StdRng::seed_from_u64(0),
        );
        assert!(result.centers.is_empty());
        assert!(result.assignments.is_empty());
    }

    #[test]
    fn test_accent_phase_reaches_vivid_minority() {
        // Large dull background cluster plus a tiny vivid orange region
        let mut samples = Vec::new();
        for _ in 0..500 {
            samples.push(sample_of(Rgb::new(100, 100, 105), 1.0));
        }
        for _ in 0..10 {
            samples.push(sample_of(Rgb::new(230, 140, 20), 1.0));
        }
        let result = cluster_samples(
            &samples,
            8,
            &ClusterConfig::default(),
            &mut StdRng::seed_from_u64(11),
        );

        let orange_lab = Rgb::new(230, 140, 20).to_lab();
        let has_orange_center = result
            .centers
            .iter()
            .any(|c| c.distance(orange_lab) < 10.0);
        assert!(has_orange_center);
    }
}
