//! End-to-end accent selection pipeline.
//!
//! Single-threaded, synchronous, CPU-bound; all randomness flows from one
//! explicitly seeded generator, so identical input, configuration and seed
//! reproduce identical output bit-for-bit.

use crate::cluster::{cluster_samples, ClusterConfig};
use crate::color::{Hsv, Rgb};
use crate::palette::{build_palette, Palette, PaletteConfig};
use crate::sample::{stratified_sample, SampleConfig};
use crate::scene::{analyze, SceneAnalysis};
use crate::score::{rank_candidates, select, Candidate, ScoreWeights, Selection};
use crate::weight::build_weight_map;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

/// Seed used when the caller does not supply one; fixed so default runs are
/// reproducible.
pub const DEFAULT_SEED: u64 = 0x1D6C_0FA3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccentError {
    #[error("image has zero area")]
    EmptyImage,
    #[error("pixel buffer length {actual} does not match {width}x{height}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        actual: usize,
    },
    #[error("palette size must be positive")]
    InvalidPaletteSize,
}

/// Pipeline configuration. Defaults match the documented scoring model;
/// every empirical constant the selection depends on is overridable.
#[derive(Clone, Copy, Debug)]
pub struct AccentConfig {
    /// Target palette size.
    pub palette_size: usize,
    /// Explicit random seed; `None` uses [`DEFAULT_SEED`].
    pub seed: Option<u64>,
    /// Total pixel sample budget.
    pub sample_budget: usize,
    /// Share of the budget reserved for the vivid stratum.
    pub vivid_share: f32,
    /// Joint Lloyd refinement iterations.
    pub lloyd_iterations: usize,
    /// Palette merge threshold (ΔE).
    pub merge_delta_e: f32,
    /// Cap on vibrancy-promoted entries.
    pub max_promoted: usize,
    /// Minimum perceived luminance (L*/100) for the winning accent.
    pub min_luminance: f32,
    /// Scoring weights.
    pub weights: ScoreWeights,
}

impl Default for AccentConfig {
    fn default() -> Self {
        Self {
            palette_size: 24,
            seed: None,
            sample_budget: 40_000,
            vivid_share: 0.70,
            lloyd_iterations: 8,
            merge_delta_e: 5.0,
            max_promoted: 3,
            min_luminance: 0.45,
            weights: ScoreWeights::default(),
        }
    }
}

/// Everything the pipeline produces: the ordered palette, scene statistics,
/// the full ranked candidate field, and the final selection.
#[derive(Clone, Debug, PartialEq)]
pub struct AccentResult {
    pub palette: Palette,
    pub scene: SceneAnalysis,
    pub candidates: Vec<Candidate>,
    pub selection: Selection,
}

/// Run the full pipeline over an RGB pixel buffer.
pub fn pick_accent(
    pixels: &[Rgb],
    width: usize,
    height: usize,
    config: &AccentConfig,
) -> Result<AccentResult, AccentError> {
    if width == 0 || height == 0 {
        return Err(AccentError::EmptyImage);
    }
    if pixels.len() != width * height {
        return Err(AccentError::DimensionMismatch {
            width,
            height,
            actual: pixels.len(),
        });
    }
    if config.palette_size == 0 {
        return Err(AccentError::InvalidPaletteSize);
    }

    let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or(DEFAULT_SEED));

    let hsvs: Vec<Hsv> = pixels.iter().map(|p| p.to_hsv()).collect();
    let weights = build_weight_map(pixels, &hsvs, width, height);

    let sample_config = SampleConfig {
        budget: config.sample_budget,
        vivid_share: config.vivid_share,
    };
    let samples = stratified_sample(pixels, &hsvs, &weights, &sample_config, &mut rng);

    let cluster_config = ClusterConfig {
        lloyd_iterations: config.lloyd_iterations,
    };
    let clustering = cluster_samples(&samples, config.palette_size, &cluster_config, &mut rng);

    let palette_config = PaletteConfig {
        merge_delta_e: config.merge_delta_e,
        max_promoted: config.max_promoted,
    };
    let palette = build_palette(&samples, &clustering, config.palette_size, &palette_config);

    let scene = analyze(&palette);
    let mut candidates = rank_candidates(&palette, &scene, &config.weights);

    // A validated non-empty image always yields at least one candidate.
    let selection = select(&mut candidates, config.min_luminance)
        .unwrap_or(Selection {
            accent: Rgb::default(),
            complement: Rgb::default(),
        });

    Ok(AccentResult {
        palette,
        scene,
        candidates,
        selection,
    })
}
