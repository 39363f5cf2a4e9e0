//! Stratified, weighted, reproducible pixel sampling.
//!
//! Pixels are split into a "vivid" stratum and the rest before sampling, so
//! small saturated regions survive into the sample even when a muted
//! background dominates the image by area.

use crate::color::{Hsv, Lab, Rgb};
use crate::weight::WeightMap;
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::Rng;

/// Vivid stratum bounds.
pub const VIVID_SATURATION: f32 = 0.35;
pub const VIVID_VALUE: f32 = 0.50;

/// A sampled pixel with its derived color records and sampling weight.
#[derive(Clone, Copy, Debug)]
pub struct Sample {
    pub rgb: Rgb,
    pub hsv: Hsv,
    pub lab: Lab,
    pub weight: f32,
}

/// Sampling configuration.
#[derive(Clone, Copy, Debug)]
pub struct SampleConfig {
    /// Total sample budget across both strata.
    pub budget: usize,
    /// Share of the budget reserved for the vivid stratum, at most.
    pub vivid_share: f32,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            budget: 40_000,
            vivid_share: 0.70,
        }
    }
}

/// Draw a weighted sample without replacement from each stratum.
///
/// The vivid stratum (s ≥ 0.35 ∧ v ≥ 0.50) receives up to `vivid_share` of
/// the budget; whatever it does not use goes to the rest. All randomness
/// comes from the provided generator, so identical inputs and seed always
/// produce the identical sample, in the identical order.
pub fn stratified_sample(
    pixels: &[Rgb],
    hsvs: &[Hsv],
    weights: &WeightMap,
    config: &SampleConfig,
    rng: &mut StdRng,
) -> Vec<Sample> {
    debug_assert_eq!(pixels.len(), hsvs.len());
    debug_assert_eq!(pixels.len(), weights.data.len());

    let mut vivid = Vec::new();
    let mut rest = Vec::new();
    for (idx, hsv) in hsvs.iter().enumerate() {
        if hsv.s >= VIVID_SATURATION && hsv.v >= VIVID_VALUE {
            vivid.push(idx);
        } else {
            rest.push(idx);
        }
    }

    let vivid_budget = ((config.budget as f32 * config.vivid_share) as usize).min(vivid.len());
    let rest_budget = (config.budget - vivid_budget).min(rest.len());

    let mut samples = Vec::with_capacity(vivid_budget + rest_budget);
    draw_without_replacement(&vivid, vivid_budget, weights, rng, &mut |idx| {
        samples.push(make_sample(pixels[idx], hsvs[idx], weights.data[idx]));
    });
    draw_without_replacement(&rest, rest_budget, weights, rng, &mut |idx| {
        samples.push(make_sample(pixels[idx], hsvs[idx], weights.data[idx]));
    });
    samples
}

fn make_sample(rgb: Rgb, hsv: Hsv, weight: f32) -> Sample {
    Sample {
        rgb,
        hsv,
        lab: rgb.to_lab(),
        weight,
    }
}

/// Efraimidis–Spirakis key method: assign each item the key u^(1/w) for
/// u ~ U(0,1) and keep the k largest keys. Equivalent to sequential
/// weighted draws without replacement.
fn draw_without_replacement(
    indices: &[usize],
    k: usize,
    weights: &WeightMap,
    rng: &mut StdRng,
    emit: &mut impl FnMut(usize),
) {
    if k == 0 || indices.is_empty() {
        return;
    }
    if k >= indices.len() {
        for &idx in indices {
            emit(idx);
        }
        return;
    }

    let mut keyed: Vec<(OrderedFloat<f64>, usize)> = indices
        .iter()
        .map(|&idx| {
            let u: f64 = rng.gen();
            let w = weights.data[idx].max(f32::MIN_POSITIVE) as f64;
            (OrderedFloat(u.powf(1.0 / w)), idx)
        })
        .collect();

    // Sort keys descending; index tie-break keeps the order deterministic.
    keyed.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    for &(_, idx) in keyed.iter().take(k) {
        emit(idx);
    }
}
