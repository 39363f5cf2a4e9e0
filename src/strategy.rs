//! Accent candidate strategies.
//!
//! Six independent heuristics, each a pure function of the palette and
//! scene. A strategy whose precondition cannot be met never errors: it falls
//! back to a documented entry and raises the guardrail flag, which the
//! scoring engine turns into a discount.

use crate::color::{hue_gap_degrees, hue_midpoint, Hsv, Rgb};
use crate::palette::{Palette, PaletteEntry};
use crate::scene::SceneAnalysis;
use ordered_float::OrderedFloat;

/// Fixed strategy set; the declaration order is the ranking tie-break order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    DominantVibrant,
    ComplementOfDominant,
    ContrastSafeVivid,
    DualToneBridge,
    CoolContrast,
    MinorHighlight,
}

impl Strategy {
    pub const ALL: [Strategy; 6] = [
        Strategy::DominantVibrant,
        Strategy::ComplementOfDominant,
        Strategy::ContrastSafeVivid,
        Strategy::DualToneBridge,
        Strategy::CoolContrast,
        Strategy::MinorHighlight,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::DominantVibrant => "Dominant Vibrant",
            Strategy::ComplementOfDominant => "Complement of Dominant",
            Strategy::ContrastSafeVivid => "Contrast-Safe Vivid",
            Strategy::DualToneBridge => "Dual-Tone Bridge",
            Strategy::CoolContrast => "Cool Contrast",
            Strategy::MinorHighlight => "Minor Highlight",
        }
    }

    /// Propose an accent for this strategy. Pure; never fails.
    pub fn propose(&self, palette: &Palette, scene: &SceneAnalysis) -> Proposal {
        debug_assert!(!palette.is_empty());
        match self {
            Strategy::DominantVibrant => dominant_vibrant(palette),
            Strategy::ComplementOfDominant => complement_of_dominant(palette),
            Strategy::ContrastSafeVivid => contrast_safe_vivid(palette, scene),
            Strategy::DualToneBridge => dual_tone_bridge(palette),
            Strategy::CoolContrast => cool_contrast(palette),
            Strategy::MinorHighlight => minor_highlight(palette),
        }
    }
}

/// A strategy's proposed accent.
#[derive(Clone, Copy, Debug)]
pub struct Proposal {
    pub rgb: Rgb,
    pub guardrail_failed: bool,
}

impl Proposal {
    fn ok(hsv: Hsv) -> Self {
        Self { rgb: clamp_legible(hsv).to_rgb(), guardrail_failed: false }
    }

    fn fallback(hsv: Hsv) -> Self {
        Self { rgb: clamp_legible(hsv).to_rgb(), guardrail_failed: true }
    }
}

/// Final legibility clamp applied to every strategy output. Value is pulled
/// into a readable band; saturation is only ever capped, never fabricated.
fn clamp_legible(hsv: Hsv) -> Hsv {
    Hsv {
        h: hsv.h,
        s: hsv.s.min(0.95),
        v: hsv.v.clamp(0.40, 0.95),
    }
}

fn hue_in_degrees(h: f32, lo: f32, hi: f32) -> bool {
    let deg = h * 360.0;
    deg >= lo && deg <= hi
}

/// Among vivid entries (or the top 6 when none qualify), the entry with the
/// highest weight × vibrancy.
fn dominant_vibrant(palette: &Palette) -> Proposal {
    let vivid: Vec<&PaletteEntry> = palette
        .entries
        .iter()
        .filter(|e| e.hsv.s >= 0.35 && e.hsv.v >= 0.50)
        .collect();

    let (pool, failed): (Vec<&PaletteEntry>, bool) = if vivid.is_empty() {
        (palette.entries.iter().take(6).collect(), true)
    } else {
        (vivid, false)
    };

    let best = pool
        .iter()
        .max_by_key(|e| OrderedFloat(e.weight * e.vibrancy()))
        .map(|e| e.hsv)
        .unwrap_or_default();

    if failed { Proposal::fallback(best) } else { Proposal::ok(best) }
}

/// Hue-opposite of the top-weight entry, brightened for readability.
fn complement_of_dominant(palette: &Palette) -> Proposal {
    let dom = &palette.entries[0];
    if dom.hsv.s < 0.08 {
        // Complement of a grey is meaningless
        return Proposal::fallback(dom.hsv);
    }
    Proposal::ok(Hsv {
        h: (dom.hsv.h + 0.5).rem_euclid(1.0),
        s: dom.hsv.s.clamp(0.55, 0.92),
        v: (dom.hsv.v * 1.10).clamp(0.60, 0.92),
    })
}

/// The vivid-bounded entry farthest (ΔE) from the scene mean color.
fn contrast_safe_vivid(palette: &Palette, scene: &SceneAnalysis) -> Proposal {
    let vivid: Vec<&PaletteEntry> = palette
        .entries
        .iter()
        .filter(|e| e.hsv.s >= 0.40 && e.hsv.v >= 0.55 && e.hsv.v <= 0.92)
        .collect();

    let (pool, failed): (Vec<&PaletteEntry>, bool) = if vivid.is_empty() {
        (palette.entries.iter().take(8).collect(), true)
    } else {
        (vivid, false)
    };

    let best = pool
        .iter()
        .max_by_key(|e| OrderedFloat(e.lab.distance(scene.mean_lab)))
        .map(|e| e.hsv)
        .unwrap_or_default();

    let polished = Hsv {
        h: best.h,
        s: (best.s * 1.05).clamp(0.50, 0.95),
        v: best.v,
    };
    if failed { Proposal::fallback(polished) } else { Proposal::ok(polished) }
}

/// Bridge hue between two well-separated vivid tones, realized by the most
/// vibrant palette entry near either circular midpoint.
fn dual_tone_bridge(palette: &Palette) -> Proposal {
    let top = palette.entries[0].hsv;
    let vivid: Vec<&PaletteEntry> = palette
        .entries
        .iter()
        .filter(|e| e.hsv.s >= 0.30 && e.hsv.v >= 0.45)
        .collect();
    if vivid.len() < 2 {
        return Proposal::fallback(top);
    }

    let first = vivid[0].hsv.h;
    let second = vivid[1..]
        .iter()
        .find(|e| hue_gap_degrees(e.hsv.h, first) >= 60.0)
        .map(|e| e.hsv.h);
    let second = match second {
        Some(h) => h,
        None => return Proposal::fallback(top),
    };

    let short_mid = hue_midpoint(first, second);
    let long_mid = (short_mid + 0.5).rem_euclid(1.0);

    let near_mid = palette
        .entries
        .iter()
        .filter(|e| {
            e.hsv.s >= 0.45
                && (hue_gap_degrees(e.hsv.h, short_mid) <= 15.0
                    || hue_gap_degrees(e.hsv.h, long_mid) <= 15.0)
        })
        .max_by_key(|e| OrderedFloat(e.vibrancy()));

    match near_mid {
        Some(e) => Proposal::ok(e.hsv),
        None => Proposal::fallback(top),
    }
}

/// Cool accent for warm, earthy scenes: requires at least two muted warm
/// tones among the top 5 entries and a qualifying cool pool.
fn cool_contrast(palette: &Palette) -> Proposal {
    let top = palette.entries[0].hsv;
    let warm_count = palette
        .entries
        .iter()
        .take(5)
        .filter(|e| hue_in_degrees(e.hsv.h, 20.0, 60.0) && e.hsv.s < 0.6)
        .count();
    if warm_count < 2 {
        return Proposal::fallback(top);
    }

    let cool = palette
        .entries
        .iter()
        .filter(|e| {
            hue_in_degrees(e.hsv.h, 190.0, 230.0)
                && e.hsv.s >= 0.55
                && e.hsv.v >= 0.60
                && e.hsv.v <= 0.90
        })
        .max_by_key(|e| OrderedFloat(e.weight * e.vibrancy()));

    match cool {
        Some(e) => Proposal::ok(e.hsv),
        None => Proposal::fallback(top),
    }
}

/// A saturated secondary hue with a modest pixel share, scored by vibrancy
/// and contrast to the dominant entry under a Gaussian share prior.
fn minor_highlight(palette: &Palette) -> Proposal {
    const SHARE_PEAK: f32 = 0.08;
    const SHARE_SIGMA: f32 = 0.06;

    let dominant = &palette.entries[0];
    let total = palette.total_weight();
    if total <= 0.0 {
        return Proposal::fallback(dominant.hsv);
    }

    let best = palette
        .entries
        .iter()
        .skip(1)
        .filter(|e| {
            let share = e.weight / total;
            hue_gap_degrees(e.hsv.h, dominant.hsv.h) >= 50.0
                && e.hsv.s >= 0.55
                && e.hsv.v >= 0.60
                && e.hsv.v <= 0.92
                && share >= 0.015
                && share <= 0.28
        })
        .max_by_key(|e| {
            let share = e.weight / total;
            let contrast = (e.lab.distance(dominant.lab) / 100.0).clamp(0.0, 1.0);
            let base = 0.65 * e.vibrancy() + 0.35 * contrast;
            let d = share - SHARE_PEAK;
            let prior = (-(d * d) / (2.0 * SHARE_SIGMA * SHARE_SIGMA)).exp();
            OrderedFloat(base * prior)
        });

    match best {
        Some(e) => Proposal::ok(e.hsv),
        None => Proposal::fallback(dominant.hsv),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::hue_gap;
    use crate::scene::analyze;

    fn entry(rgb: Rgb, weight: f32) -> PaletteEntry {
        PaletteEntry {
            rgb,
            hsv: rgb.to_hsv(),
            lab: rgb.to_lab(),
            weight,
        }
    }

    fn palette(colors: &[(Rgb, f32)]) -> Palette {
        Palette {
            entries: colors.iter().map(|&(c, w)| entry(c, w)).collect(),
        }
    }

    #[test]
    fn test_all_strategies_guardrail_on_grey_palette() {
        let p = palette(&[(Rgb::new(128, 128, 128), 10.0)]);
        let scene = analyze(&p);
        for strategy in Strategy::ALL {
            let prop = strategy.propose(&p, &scene);
            assert!(
                prop.guardrail_failed,
                "{} should guardrail on an achromatic palette",
                strategy.name()
            );
        }
    }

    #[test]
    fn test_dominant_vibrant_skips_grey() {
        let p = palette(&[
            (Rgb::new(128, 128, 128), 50.0), // heavy grey
            (Rgb::new(220, 40, 40), 10.0),
            (Rgb::new(40, 200, 60), 8.0),
        ]);
        let scene = analyze(&p);
        let prop = Strategy::DominantVibrant.propose(&p, &scene);
        assert!(!prop.guardrail_failed);
        let hsv = prop.rgb.to_hsv();
        assert!(hsv.s > 0.3, "picked a grey: {:?}", prop.rgb);
    }

    #[test]
    fn test_complement_is_opposite_hue() {
        let p = palette(&[(Rgb::new(220, 60, 30), 10.0)]);
        let scene = analyze(&p);
        let prop = Strategy::ComplementOfDominant.propose(&p, &scene);
        assert!(!prop.guardrail_failed);
        let dom_h = Rgb::new(220, 60, 30).to_hsv().h;
        let got_h = prop.rgb.to_hsv().h;
        // Output passes through clamps and u8 rounding, so allow slack
        assert!(hue_gap(got_h, (dom_h + 0.5).rem_euclid(1.0)) < 0.02);
    }

    #[test]
    fn test_contrast_safe_prefers_far_color() {
        // Scene dominated by red; a mid-value blue is the far pole
        let p = palette(&[
            (Rgb::new(200, 50, 40), 40.0),
            (Rgb::new(190, 70, 60), 20.0),
            (Rgb::new(50, 90, 200), 5.0),
        ]);
        let scene = analyze(&p);
        let prop = Strategy::ContrastSafeVivid.propose(&p, &scene);
        assert!(!prop.guardrail_failed);
        let hsv = prop.rgb.to_hsv();
        let blue_h = Rgb::new(50, 90, 200).to_hsv().h;
        assert!(hue_gap(hsv.h, blue_h) < 0.05);
    }

    #[test]
    fn test_dual_tone_bridge_finds_midpoint_entry() {
        // Red and blue anchors 120°+ apart; a magenta entry sits on the long
        // midpoint between them
        let p = palette(&[
            (Rgb::new(230, 30, 30), 30.0),  // red, h~0
            (Rgb::new(40, 60, 230), 25.0),  // blue, h~0.65
            (Rgb::new(220, 40, 200), 5.0),  // magenta near long midpoint
        ]);
        let scene = analyze(&p);
        let prop = Strategy::DualToneBridge.propose(&p, &scene);
        assert!(!prop.guardrail_failed);
        let magenta_h = Rgb::new(220, 40, 200).to_hsv().h;
        assert!(hue_gap(prop.rgb.to_hsv().h, magenta_h) < 0.06);
    }

    #[test]
    fn test_dual_tone_bridge_guardrails_without_gap() {
        let p = palette(&[
            (Rgb::new(230, 30, 30), 30.0),
            (Rgb::new(220, 60, 50), 25.0), // same hue family
        ]);
        let scene = analyze(&p);
        let prop = Strategy::DualToneBridge.propose(&p, &scene);
        assert!(prop.guardrail_failed);
    }

    #[test]
    fn test_cool_contrast_on_earthy_scene() {
        // Two muted warm tones plus a vivid teal pool entry
        let p = palette(&[
            (Rgb::new(170, 120, 70), 30.0), // muted amber
            (Rgb::new(150, 110, 80), 25.0), // muted brown
            (Rgb::new(30, 150, 190), 6.0),  // cool cyan-blue
        ]);
        let scene = analyze(&p);
        let prop = Strategy::CoolContrast.propose(&p, &scene);
        assert!(!prop.guardrail_failed);
        let teal_h = Rgb::new(30, 150, 190).to_hsv().h;
        assert!(hue_gap(prop.rgb.to_hsv().h, teal_h) < 0.05);
    }

    #[test]
    fn test_cool_contrast_guardrails_on_cool_scene() {
        let p = palette(&[
            (Rgb::new(40, 90, 200), 30.0),
            (Rgb::new(60, 120, 210), 20.0),
        ]);
        let scene = analyze(&p);
        let prop = Strategy::CoolContrast.propose(&p, &scene);
        assert!(prop.guardrail_failed);
    }

    #[test]
    fn test_minor_highlight_picks_modest_share_secondary() {
        let p = palette(&[
            (Rgb::new(40, 70, 180), 90.0),  // dominant blue
            (Rgb::new(230, 150, 40), 8.0),  // vivid orange, ~8% share
            (Rgb::new(90, 90, 90), 2.0),
        ]);
        let scene = analyze(&p);
        let prop = Strategy::MinorHighlight.propose(&p, &scene);
        assert!(!prop.guardrail_failed);
        let orange_h = Rgb::new(230, 150, 40).to_hsv().h;
        assert!(hue_gap(prop.rgb.to_hsv().h, orange_h) < 0.05);
    }

    #[test]
    fn test_minor_highlight_rejects_oversized_share() {
        let p = palette(&[
            (Rgb::new(40, 70, 180), 50.0),
            (Rgb::new(230, 150, 40), 45.0), // way past the 28% share ceiling
        ]);
        let scene = analyze(&p);
        let prop = Strategy::MinorHighlight.propose(&p, &scene);
        assert!(prop.guardrail_failed);
    }
}
