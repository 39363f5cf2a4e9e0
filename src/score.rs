//! Candidate scoring, ranking, and final selection.
//!
//! Every strategy proposal is scored with the same weighted multi-term
//! model; the guardrail flag discounts rather than excludes, so a degenerate
//! image still produces a full ranked field and a winner.

use crate::color::{hue_gap_degrees, Hsv, Rgb};
use crate::palette::Palette;
use crate::scene::SceneAnalysis;
use crate::strategy::{Proposal, Strategy};
use ordered_float::OrderedFloat;

/// Scoring weights, threaded explicitly through every call so alternate
/// weight sets are testable in isolation.
#[derive(Clone, Copy, Debug)]
pub struct ScoreWeights {
    pub vibrancy: f32,
    pub contrast: f32,
    pub harmony: f32,
    pub scene_fit: f32,
    pub proximity: f32,
    pub mud_penalty: f32,
    /// Multiplier applied to the score of guardrail-failed proposals.
    pub guardrail_discount: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            vibrancy: 0.40,
            contrast: 0.20,
            harmony: 0.15,
            scene_fit: 0.05,
            proximity: 0.15,
            mud_penalty: 0.15,
            guardrail_discount: 0.85,
        }
    }
}

/// Per-term score breakdown, kept for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub vibrancy: f32,
    pub contrast: f32,
    pub harmony: f32,
    pub scene_fit: f32,
    pub proximity: f32,
    pub mud_penalty: f32,
}

/// A scored strategy proposal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub strategy: Strategy,
    pub rgb: Rgb,
    pub score: f32,
    pub breakdown: ScoreBreakdown,
    pub guardrail_failed: bool,
}

/// Final accent and its hue complement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub accent: Rgb,
    pub complement: Rgb,
}

/// Score a single proposal.
pub fn score_candidate(
    strategy: Strategy,
    proposal: Proposal,
    palette: &Palette,
    scene: &SceneAnalysis,
    weights: &ScoreWeights,
) -> Candidate {
    let hsv = proposal.rgb.to_hsv();
    let lab = proposal.rgb.to_lab();

    let breakdown = ScoreBreakdown {
        vibrancy: hsv.vibrancy(),
        contrast: (lab.distance(scene.mean_lab) / 60.0).clamp(0.0, 1.0),
        harmony: harmony_bonus(hsv.h, scene.dominant_hue),
        scene_fit: scene_fit(hsv, scene),
        proximity: palette_proximity(hsv, palette),
        mud_penalty: mud_penalty(hsv),
    };

    let mut score = weights.vibrancy * breakdown.vibrancy
        + weights.contrast * breakdown.contrast
        + weights.harmony * breakdown.harmony
        + weights.scene_fit * breakdown.scene_fit
        + weights.proximity * breakdown.proximity
        - weights.mud_penalty * breakdown.mud_penalty;

    if proposal.guardrail_failed {
        score *= weights.guardrail_discount;
    }

    Candidate {
        strategy,
        rgb: proposal.rgb,
        score,
        breakdown,
        guardrail_failed: proposal.guardrail_failed,
    }
}

/// Run every strategy, score the proposals, and rank them. The sort is
/// stable, so tied scores keep the strategy declaration order.
pub fn rank_candidates(
    palette: &Palette,
    scene: &SceneAnalysis,
    weights: &ScoreWeights,
) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = Strategy::ALL
        .iter()
        .map(|&strategy| {
            let proposal = strategy.propose(palette, scene);
            score_candidate(strategy, proposal, palette, scene, weights)
        })
        .collect();
    candidates.sort_by_key(|c| std::cmp::Reverse(OrderedFloat(c.score)));
    candidates
}

/// Select the top candidate, floor its lightness, and derive the complement.
///
/// `min_luminance` is the lowest acceptable perceived luminance (L*/100);
/// the floor only ever raises lightness. The winning candidate record is
/// updated in place so diagnostics show the color that was actually chosen.
pub fn select(candidates: &mut [Candidate], min_luminance: f32) -> Option<Selection> {
    let winner = candidates.first_mut()?;
    let accent = floor_luminance(winner.rgb, min_luminance);
    winner.rgb = accent;
    Some(Selection {
        accent,
        complement: complement(accent),
    })
}

/// Raise L* to at least `min_luminance × 100`, never lowering it.
pub fn floor_luminance(rgb: Rgb, min_luminance: f32) -> Rgb {
    let mut lab = rgb.to_lab();
    let floor = min_luminance.clamp(0.0, 1.0) * 100.0;
    if lab.l >= floor {
        return rgb;
    }
    lab.l = floor;
    lab.to_rgb()
}

/// 180°-hue complement with identical saturation and value.
pub fn complement(rgb: Rgb) -> Rgb {
    let hsv = rgb.to_hsv();
    Hsv {
        h: (hsv.h + 0.5).rem_euclid(1.0),
        s: hsv.s,
        v: hsv.v,
    }
    .to_rgb()
}

/// Harmony bonus: reward hues near the dominant hue's complement, or near
/// either split complement (±120°), with a triangular peak that is 1.0 at
/// 0° gap and reaches zero at 30°.
fn harmony_bonus(hue: f32, dominant_hue: f32) -> f32 {
    const WIDTH: f32 = 30.0;
    let comp = (dominant_hue + 0.5).rem_euclid(1.0);
    let split_a = (dominant_hue + 120.0 / 360.0).rem_euclid(1.0);
    let split_b = (dominant_hue - 120.0 / 360.0).rem_euclid(1.0);

    let comp_peak = triangular_peak(hue_gap_degrees(hue, comp), WIDTH);
    let split_gap = hue_gap_degrees(hue, split_a).min(hue_gap_degrees(hue, split_b));
    let split_peak = triangular_peak(split_gap, WIDTH);

    (0.4 * comp_peak).max(0.25 * split_peak)
}

fn triangular_peak(gap_degrees: f32, width_degrees: f32) -> f32 {
    (1.0 - gap_degrees / width_degrees).max(0.0)
}

/// Binary fit against the scene's brightness regime.
fn scene_fit(hsv: Hsv, scene: &SceneAnalysis) -> f32 {
    let in_band = hsv.s >= 0.55 && hsv.s <= 0.95 && hsv.v >= 0.60 && hsv.v <= 0.90;
    if !in_band {
        return 0.0;
    }
    let lum_ok = if scene.mean_luminance < 0.40 {
        hsv.v >= 0.70
    } else if scene.mean_luminance > 0.72 {
        hsv.v <= 0.85
    } else {
        true
    };
    if lum_ok { 1.0 } else { 0.0 }
}

/// Closeness to a hue that actually exists in the palette, gated by the
/// candidate's own saturation. Zero when the palette has no vivid hues.
fn palette_proximity(hsv: Hsv, palette: &Palette) -> f32 {
    let nearest_gap = palette
        .entries
        .iter()
        .filter(|e| e.hsv.s >= 0.25)
        .map(|e| OrderedFloat(hue_gap_degrees(hsv.h, e.hsv.h)))
        .min();

    match nearest_gap {
        Some(OrderedFloat(gap)) => {
            let closeness = (1.0 - gap / 40.0).max(0.0);
            let gate = ((hsv.s - 0.40) / 0.40).clamp(0.0, 1.0);
            closeness * gate
        }
        None => 0.0,
    }
}

/// Muddy olive/ochre band: hue in [30°, 75°] without strong saturation.
fn mud_penalty(hsv: Hsv) -> f32 {
    let deg = hsv.h * 360.0;
    if (30.0..=75.0).contains(&deg) && hsv.s < 0.80 {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PaletteEntry;
    use crate::scene::analyze;

    fn entry(rgb: Rgb, weight: f32) -> PaletteEntry {
        PaletteEntry {
            rgb,
            hsv: rgb.to_hsv(),
            lab: rgb.to_lab(),
            weight,
        }
    }

    fn test_palette() -> Palette {
        Palette {
            entries: vec![
                entry(Rgb::new(40, 70, 180), 50.0),
                entry(Rgb::new(230, 150, 40), 10.0),
                entry(Rgb::new(100, 100, 100), 5.0),
            ],
        }
    }

    #[test]
    fn test_guardrail_discount_applied() {
        let palette = test_palette();
        let scene = analyze(&palette);
        let weights = ScoreWeights::default();
        let rgb = Rgb::new(230, 150, 40);

        let clean = score_candidate(
            Strategy::DominantVibrant,
            Proposal { rgb, guardrail_failed: false },
            &palette,
            &scene,
            &weights,
        );
        let failed = score_candidate(
            Strategy::DominantVibrant,
            Proposal { rgb, guardrail_failed: true },
            &palette,
            &scene,
            &weights,
        );
        assert!((failed.score - clean.score * 0.85).abs() < 1e-6);
    }

    #[test]
    fn test_mud_penalty_hits_dull_olive() {
        let olive = Rgb::new(140, 130, 60).to_hsv();
        assert_eq!(mud_penalty(olive), 1.0);
        let saturated_gold = Hsv::new(45.0 / 360.0, 0.9, 0.9);
        assert_eq!(mud_penalty(saturated_gold), 0.0);
        let blue = Rgb::new(30, 60, 200).to_hsv();
        assert_eq!(mud_penalty(blue), 0.0);
    }

    #[test]
    fn test_harmony_peaks_at_complement() {
        let dominant = 0.0; // red
        let at_complement = harmony_bonus(0.5, dominant);
        let off_by_20 = harmony_bonus(0.5 + 20.0 / 360.0, dominant);
        let far = harmony_bonus(0.25, dominant);
        assert!((at_complement - 0.4).abs() < 1e-6);
        assert!(off_by_20 < at_complement && off_by_20 > 0.0);
        assert_eq!(far, 0.0);
    }

    #[test]
    fn test_harmony_split_complement() {
        let dominant = 0.0;
        let at_split = harmony_bonus(120.0 / 360.0, dominant);
        assert!((at_split - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_proximity_zero_without_vivid_hues() {
        let grey_palette = Palette {
            entries: vec![entry(Rgb::new(120, 120, 120), 1.0)],
        };
        let hsv = Hsv::new(0.1, 0.9, 0.9);
        assert_eq!(palette_proximity(hsv, &grey_palette), 0.0);
    }

    #[test]
    fn test_proximity_gated_by_saturation() {
        let palette = test_palette();
        let blue_h = Rgb::new(40, 70, 180).to_hsv().h;
        let saturated = Hsv::new(blue_h, 0.9, 0.8);
        let washed = Hsv::new(blue_h, 0.42, 0.8);
        assert!(palette_proximity(saturated, &palette) > palette_proximity(washed, &palette));
        let dull = Hsv::new(blue_h, 0.30, 0.8);
        assert_eq!(palette_proximity(dull, &palette), 0.0);
    }

    #[test]
    fn test_scene_fit_luminance_regimes() {
        let mut scene = SceneAnalysis { mean_luminance: 0.3, ..Default::default() };
        // Dark scene demands v >= 0.70
        assert_eq!(scene_fit(Hsv::new(0.5, 0.7, 0.65), &scene), 0.0);
        assert_eq!(scene_fit(Hsv::new(0.5, 0.7, 0.80), &scene), 1.0);

        scene.mean_luminance = 0.8;
        // Bright scene caps v at 0.85
        assert_eq!(scene_fit(Hsv::new(0.5, 0.7, 0.88), &scene), 0.0);
        assert_eq!(scene_fit(Hsv::new(0.5, 0.7, 0.80), &scene), 1.0);
    }

    #[test]
    fn test_ranking_covers_all_strategies() {
        let palette = test_palette();
        let scene = analyze(&palette);
        let ranked = rank_candidates(&palette, &scene, &ScoreWeights::default());
        assert_eq!(ranked.len(), Strategy::ALL.len());
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_luminance_floor_never_darkens() {
        for &rgb in &[
            Rgb::new(10, 10, 10),
            Rgb::new(30, 60, 200),
            Rgb::new(240, 240, 100),
            Rgb::new(255, 255, 255),
        ] {
            let before = rgb.to_lab().l;
            let after = floor_luminance(rgb, 0.45).to_lab().l;
            assert!(after >= before - 0.5, "{:?}: {} -> {}", rgb, before, after);
            assert!(after >= 45.0 - 1.0 || before >= 45.0);
        }
    }

    #[test]
    fn test_complement_preserves_saturation_and_value() {
        let rgb = Rgb::new(200, 80, 40);
        let hsv = rgb.to_hsv();
        let comp = complement(rgb).to_hsv();
        assert!((hue_gap_degrees(comp.h, (hsv.h + 0.5).rem_euclid(1.0))) < 1.5);
        assert!((comp.s - hsv.s).abs() < 0.02);
        assert!((comp.v - hsv.v).abs() < 0.02);
    }

    #[test]
    fn test_selection_from_ranked_field() {
        let palette = test_palette();
        let scene = analyze(&palette);
        let mut ranked = rank_candidates(&palette, &scene, &ScoreWeights::default());
        let selection = select(&mut ranked, 0.45).unwrap();
        assert!(selection.accent.to_lab().l >= 44.0);
        assert_eq!(ranked[0].rgb, selection.accent);
    }

    #[test]
    fn test_select_writes_floored_rgb_into_winner() {
        let mut candidates = vec![Candidate {
            strategy: Strategy::DominantVibrant,
            rgb: Rgb::new(20, 10, 60), // well below the luminance floor
            score: 1.0,
            breakdown: ScoreBreakdown::default(),
            guardrail_failed: false,
        }];
        let selection = select(&mut candidates, 0.45).unwrap();
        assert_eq!(candidates[0].rgb, selection.accent);
        assert!(candidates[0].rgb.to_lab().l >= 44.0);
    }
}
