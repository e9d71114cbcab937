// src/lib.rs - Library interface for the line frequency pipeline

pub mod config;
pub mod constants;
pub mod data_analysis;
pub mod data_input;
pub mod error;
pub mod model_names;
pub mod plot_framework;
pub mod plot_functions;
pub mod types;

use ndarray::{ArrayD, Axis};

use crate::config::{AnalysisConfig, ModelEntry};
use crate::data_analysis::line_slicer::{extract_line, select_ranges};
use crate::constants::AXIS_Y;
use crate::data_analysis::spectral_profile::{compute_profile, grid_spacing_note};
use crate::data_input::tensor_loader::{apply_obstacle_mask, load_ground_truth, load_prediction};
use crate::error::LineFreqResult;
use crate::types::{LineFreqAnalysis, ModelSpectrum, SeriesKind};

pub fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

fn model_spectrum(
    entry: &ModelEntry,
    kind: SeriesKind,
    tensor: &ArrayD<f32>,
    config: &AnalysisConfig,
) -> LineFreqResult<(ModelSpectrum, usize, usize)> {
    let selected = select_ranges(tensor, config, kind)?;
    log::info!("Sliced {} shape: {:?}", entry.name, selected.shape());
    let sample = extract_line(&selected, config)?;
    let profile = compute_profile(&sample, config.dataset)?;
    log::debug!(
        "{}: mean amplitude range {:.3e}..{:.3e}",
        entry.name,
        profile.mean.iter().copied().fold(f64::INFINITY, f64::min),
        profile.mean.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    );
    let spectrum = ModelSpectrum {
        name: entry.name.clone(),
        kind,
        profile,
    };
    Ok((spectrum, sample.line_index, sample.x_len))
}

/// Loads every configured model, cuts the downstream line and reduces it to
/// a wavenumber spectrum. The ground truth is always read first since its
/// obstacle mask also applies to the predictions.
pub fn run_analysis(config: &AnalysisConfig) -> LineFreqResult<LineFreqAnalysis> {
    config.validate()?;
    let folder = config.prediction_folder();
    let ground_truth = load_ground_truth(&config.ground_truth_path())?;
    let y_len = ground_truth.data.len_of(Axis(AXIS_Y));
    if let Some(note) = grid_spacing_note(config.dataset, y_len) {
        log::warn!("{}", note);
    }

    let mut spectra = Vec::with_capacity(config.models.len());
    let mut line: Option<(usize, usize)> = None;
    for entry in &config.models {
        let (spectrum, line_index, x_len) = if config.is_ground_truth(entry) {
            model_spectrum(entry, SeriesKind::GroundTruth, &ground_truth.data, config)?
        } else {
            let mut prediction = load_prediction(&folder.join(&entry.file), &config.prediction_key)?;
            log::info!("Original {} shape: {:?}", entry.name, prediction.shape());
            if let Some(mask) = &ground_truth.obs_mask {
                apply_obstacle_mask(&mut prediction, mask)?;
            }
            model_spectrum(entry, SeriesKind::Prediction, &prediction, config)?
        };

        match line {
            None => {
                log::info!("Line index: {} of {} (downstream {})", line_index, x_len, config.downstream);
                line = Some((line_index, x_len));
            }
            Some((first_index, first_len)) if (first_index, first_len) != (line_index, x_len) => {
                log::warn!(
                    "{} uses line {} of {}, expected {} of {}",
                    entry.name,
                    line_index,
                    x_len,
                    first_index,
                    first_len
                );
            }
            Some(_) => {}
        }
        spectra.push(spectrum);
    }

    let (line_index, x_len) = line.unwrap_or((0, 0));
    Ok(LineFreqAnalysis {
        spectra,
        line_index,
        x_len,
    })
}

// src/lib.rs
