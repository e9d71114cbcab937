// src/data_analysis/mod.rs

pub mod fft_utils;
pub mod line_slicer;
pub mod spectral_profile;

// src/data_analysis/mod.rs
