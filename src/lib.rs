//! Accent Picker Library
//!
//! Derives a single legible, thematically fitting accent color from a
//! wallpaper or photograph, for use by downstream theming tools.
//!
//! The pipeline: perceptually-weighted stratified sampling, weighted
//! k-means clustering in Lab space with a minority-accent seeding phase,
//! scene analysis, six accent-proposal strategies, and a weighted scoring
//! model that ranks them. Image decoding and output formatting live in the
//! CLI and wasm collaborators, not in the core.

pub mod cluster;
pub mod color;
pub mod palette;
pub mod pipeline;
pub mod sample;
pub mod scene;
pub mod score;
pub mod strategy;
pub mod weight;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export key types for easy usage
pub use color::{Hsv, Lab, Rgb};
pub use palette::{Palette, PaletteConfig, PaletteEntry};
pub use pipeline::{pick_accent, AccentConfig, AccentError, AccentResult, DEFAULT_SEED};
pub use scene::SceneAnalysis;
pub use score::{Candidate, ScoreBreakdown, ScoreWeights, Selection};
pub use strategy::{Proposal, Strategy};

pub mod prelude {
    pub use crate::color::{Hsv, Lab, Rgb};
    pub use crate::palette::{Palette, PaletteEntry};
    pub use crate::pipeline::{pick_accent, AccentConfig, AccentError, AccentResult};
    pub use crate::scene::SceneAnalysis;
    pub use crate::score::{Candidate, ScoreWeights, Selection};
    pub use crate::strategy::Strategy;
}
