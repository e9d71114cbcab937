// src/types.rs

use crate::data_analysis::spectral_profile::FrequencyProfile;

/// Whether a series is the simulation reference or a model prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    GroundTruth,
    Prediction,
}

/// Spectrum of one configured model, ready to be drawn.
#[derive(Debug, Clone)]
pub struct ModelSpectrum {
    /// Key from the config (`Simulation`, `ACDM`, ...), used for color and label lookup.
    pub name: String,
    pub kind: SeriesKind,
    pub profile: FrequencyProfile,
}

/// Everything the figure needs besides the config.
#[derive(Debug, Clone)]
pub struct LineFreqAnalysis {
    pub spectra: Vec<ModelSpectrum>,
    pub line_index: usize,
    pub x_len: usize,
}

// src/types.rs
