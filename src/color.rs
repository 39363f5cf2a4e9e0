//! Color space conversions and perceptual distance calculations.
//!
//! Every layer above this one reasons about color exclusively through these
//! types: HSV for hue/saturation logic, CIE Lab for perceptual distance.
//! Raw RGB values are never compared directly.

use std::ops::{Add, Div, Mul};

/// RGB color in 8-bit per channel format (sRGB gamma-encoded)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[inline(always)]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_array(arr: [u8; 3]) -> Self {
        Self { r: arr[0], g: arr[1], b: arr[2] }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_hsv(self) -> Hsv {
        Hsv::from_rgb(self)
    }

    pub fn to_lab(self) -> Lab {
        Lab::from_rgb(self)
    }

    pub fn to_linear(self) -> LinearRgb {
        LinearRgb::from_srgb(self)
    }

    /// Perceived luminance: L* normalized to [0, 1].
    pub fn luminance(self) -> f32 {
        (self.to_lab().l / 100.0).clamp(0.0, 1.0)
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.trim().trim_start_matches('#');
        if s.len() != 6 || !s.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }
}

// =============================================================================
// HSV (cylindrical hue / saturation / value)
// =============================================================================

/// HSV color with all channels in [0, 1]; hue wraps in [0, 1).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

impl Hsv {
    pub const fn new(h: f32, s: f32, v: f32) -> Self {
        Self { h, s, v }
    }

    pub fn from_rgb(rgb: Rgb) -> Self {
        let r = rgb.r as f32 / 255.0;
        let g = rgb.g as f32 / 255.0;
        let b = rgb.b as f32 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let diff = max - min;

        let h = if diff == 0.0 {
            0.0
        } else if max == r {
            ((g - b) / diff).rem_euclid(6.0) / 6.0
        } else if max == g {
            ((b - r) / diff + 2.0) / 6.0
        } else {
            ((r - g) / diff + 4.0) / 6.0
        };

        let s = if max == 0.0 { 0.0 } else { diff / max };
        Self { h: h.rem_euclid(1.0), s, v: max }
    }

    pub fn to_rgb(self) -> Rgb {
        let h = self.h.rem_euclid(1.0) * 6.0;
        let i = (h as u32) % 6;
        let f = h - h.floor();
        let v = self.v;
        let p = v * (1.0 - self.s);
        let q = v * (1.0 - self.s * f);
        let t = v * (1.0 - self.s * (1.0 - f));

        let (r, g, b) = match i {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Rgb {
            r: clamp_u8_f32((r * 255.0).round()),
            g: clamp_u8_f32((g * 255.0).round()),
            b: clamp_u8_f32((b * 255.0).round()),
        }
    }

    /// Vibrancy score: nonlinear bump for saturation, soft preference for
    /// brightness.
    pub fn vibrancy(self) -> f32 {
        self.s.powf(1.2) * 0.65 + self.v.powf(1.1) * 0.35
    }
}

// =============================================================================
// Linear RGB
// =============================================================================

#[derive(Clone, Copy, Debug, Default)]
pub struct LinearRgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl LinearRgb {
    pub fn from_srgb(rgb: Rgb) -> Self {
        Self {
            r: srgb_to_linear(rgb.r as f32 / 255.0),
            g: srgb_to_linear(rgb.g as f32 / 255.0),
            b: srgb_to_linear(rgb.b as f32 / 255.0),
        }
    }

    pub fn to_srgb(self) -> Rgb {
        Rgb {
            r: clamp_u8_f32((linear_to_srgb(self.r) * 255.0).round()),
            g: clamp_u8_f32((linear_to_srgb(self.g) * 255.0).round()),
            b: clamp_u8_f32((linear_to_srgb(self.b) * 255.0).round()),
        }
    }
}

// =============================================================================
// CIE Lab (D65)
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Lab {
    pub l: f32, // Lightness [0, 100]
    pub a: f32, // Green-Red axis
    pub b: f32, // Blue-Yellow axis
}

impl Lab {
    pub const fn new(l: f32, a: f32, b: f32) -> Self {
        Self { l, a, b }
    }

    const XN: f32 = 0.95047;
    const YN: f32 = 1.00000;
    const ZN: f32 = 1.08883;

    pub fn from_rgb(rgb: Rgb) -> Self {
        let lin = rgb.to_linear();
        let x = lin.r * 0.4124564 + lin.g * 0.3575761 + lin.b * 0.1804375;
        let y = lin.r * 0.2126729 + lin.g * 0.7151522 + lin.b * 0.0721750;
        let z = lin.r * 0.0193339 + lin.g * 0.1191920 + lin.b * 0.9503041;

        let fx = Self::xyz_to_lab_f(x / Self::XN);
        let fy = Self::xyz_to_lab_f(y / Self::YN);
        let fz = Self::xyz_to_lab_f(z / Self::ZN);

        Lab {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }

    pub fn to_rgb(self) -> Rgb {
        let fy = (self.l + 16.0) / 116.0;
        let fx = self.a / 500.0 + fy;
        let fz = fy - self.b / 200.0;

        let x = Self::XN * Self::lab_to_xyz_f(fx);
        let y = Self::YN * Self::lab_to_xyz_f(fy);
        let z = Self::ZN * Self::lab_to_xyz_f(fz);

        let lin = LinearRgb {
            r: (x * 3.2404542 + y * -1.5371385 + z * -0.4985314).clamp(0.0, 1.0),
            g: (x * -0.9692660 + y * 1.8760108 + z * 0.0415560).clamp(0.0, 1.0),
            b: (x * 0.0556434 + y * -0.2040259 + z * 1.0572252).clamp(0.0, 1.0),
        };
        lin.to_srgb()
    }

    pub fn distance_squared(self, other: Self) -> f32 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        dl * dl + da * da + db * db
    }

    /// ΔE*ab: Euclidean distance in Lab. Plain ΔE (not CIEDE2000) is
    /// sufficient for ranking.
    pub fn distance(self, other: Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    fn xyz_to_lab_f(t: f32) -> f32 {
        // DELTA_CUBE = (6/29)^3 = 0.008856
        const DELTA: f32 = 6.0 / 29.0;
        const DELTA_CUBE: f32 = DELTA * DELTA * DELTA;
        if t > DELTA_CUBE {
            t.cbrt()
        } else {
            t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
        }
    }

    fn lab_to_xyz_f(t: f32) -> f32 {
        const DELTA: f32 = 6.0 / 29.0;
        if t > DELTA {
            t * t * t
        } else {
            3.0 * DELTA * DELTA * (t - 4.0 / 29.0)
        }
    }
}

impl Add for Lab {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Lab {
            l: self.l + other.l,
            a: self.a + other.a,
            b: self.b + other.b,
        }
    }
}

impl Mul<f32> for Lab {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Lab {
            l: self.l * scalar,
            a: self.a * scalar,
            b: self.b * scalar,
        }
    }
}

impl Div<f32> for Lab {
    type Output = Self;
    fn div(self, scalar: f32) -> Self {
        Lab {
            l: self.l / scalar,
            a: self.a / scalar,
            b: self.b / scalar,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LabAccumulator {
    pub sum: Lab,
    pub weight: f32,
}

impl LabAccumulator {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn add(&mut self, lab: Lab, weight: f32) {
        self.sum = self.sum + lab * weight;
        self.weight += weight;
    }
    pub fn mean(&self) -> Lab {
        if self.weight > 0.0 {
            self.sum / self.weight
        } else {
            Lab::default()
        }
    }
}

// =============================================================================
// Hue circle helpers
// =============================================================================

/// Shortest circular distance between two hues, in hue units [0, 0.5].
#[inline]
pub fn hue_gap(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(1.0);
    d.min(1.0 - d)
}

/// Shortest circular distance between two hues, in degrees [0, 180].
#[inline]
pub fn hue_gap_degrees(a: f32, b: f32) -> f32 {
    hue_gap(a, b) * 360.0
}

/// Circular midpoint of the arc from `a` to `b` (counter-clockwise).
/// The midpoint of the opposite arc is this plus 0.5.
#[inline]
pub fn hue_midpoint(a: f32, b: f32) -> f32 {
    let da = (b - a).rem_euclid(1.0);
    (a + da / 2.0).rem_euclid(1.0)
}

// =============================================================================
// Transfer functions & utils
// =============================================================================

#[inline]
pub fn srgb_to_linear(v: f32) -> f32 {
    if v > 0.04045 { ((v + 0.055) / 1.055).powf(2.4) } else { v / 12.92 }
}

#[inline]
pub fn linear_to_srgb(v: f32) -> f32 {
    if v > 0.0031308 { 1.055 * v.powf(1.0 / 2.4) - 0.055 } else { 12.92 * v }
}

#[inline(always)]
pub fn clamp_u8_f32(v: f32) -> u8 {
    v.max(0.0).min(255.0) as u8
}
