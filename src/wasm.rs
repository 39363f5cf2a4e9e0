//! WebAssembly interface for the accent picker.

use crate::color::Rgb;
use crate::pipeline::{pick_accent, AccentConfig};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct AccentPicker {
    config: AccentConfig,
}

#[wasm_bindgen]
impl AccentPicker {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            config: AccentConfig::default(),
        }
    }

    pub fn set_palette_size(&mut self, size: usize) {
        self.config.palette_size = size;
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.config.seed = Some(seed);
    }

    pub fn set_sample_budget(&mut self, budget: usize) {
        self.config.sample_budget = budget;
    }

    pub fn set_min_luminance(&mut self, min_luminance: f32) {
        self.config.min_luminance = min_luminance;
    }

    pub fn set_merge_threshold(&mut self, delta_e: f32) {
        self.config.merge_delta_e = delta_e;
    }

    /// Process RGBA image data and return the result flat buffer.
    pub fn pick(
        &self,
        image_data: &[u8],
        width: usize,
        height: usize,
    ) -> Result<WasmAccentResult, JsError> {
        let pixel_count = width * height;
        let mut pixels = Vec::with_capacity(pixel_count);
        for i in 0..pixel_count.min(image_data.len() / 4) {
            let base = i * 4;
            pixels.push(Rgb::new(
                image_data[base],
                image_data[base + 1],
                image_data[base + 2],
            ));
        }

        let result = pick_accent(&pixels, width, height, &self.config)
            .map_err(|e| JsError::new(&e.to_string()))?;

        let mut palette_data = Vec::with_capacity(result.palette.len() * 3);
        for e in &result.palette.entries {
            palette_data.extend_from_slice(&e.rgb.to_array());
        }

        Ok(WasmAccentResult {
            accent: result.selection.accent.to_array().to_vec(),
            complement: result.selection.complement.to_array().to_vec(),
            palette_data,
        })
    }
}

impl Default for AccentPicker {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
pub struct WasmAccentResult {
    accent: Vec<u8>,
    complement: Vec<u8>,
    palette_data: Vec<u8>,
}

#[wasm_bindgen]
impl WasmAccentResult {
    pub fn get_accent(&self) -> Vec<u8> {
        self.accent.clone()
    }
    pub fn get_complement(&self) -> Vec<u8> {
        self.complement.clone()
    }
    pub fn get_palette_data(&self) -> Vec<u8> {
        self.palette_data.clone()
    }
}
