// src/data_analysis/spectral_profile.rs

use ndarray::{s, Array1, Array2, Axis};
use ndarray_stats::interpolate::Linear;
use ndarray_stats::QuantileExt;
use noisy_float::types::n64;

use crate::constants::{
    AXIS_TIME, AXIS_Y, MIN_LINE_LENGTH, PRE_EMPHASIS_EXPONENT, QUANTILE_LOWER, QUANTILE_UPPER,
};
use crate::data_analysis::fft_utils::{fftfreq, positive_bins, LineFft};
use crate::data_analysis::line_slicer::LineSample;
use crate::data_input::dataset::{DatasetName, GridSpacing};
use crate::error::{LineFreqError, LineFreqResult};

/// Wavenumber spectrum statistics of one model, already multiplied by kappa^4.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyProfile {
    pub frequencies: Array1<f64>,
    pub mean: Array1<f64>,
    pub std: Array1<f64>,
    pub quantile_lower: Array1<f64>,
    pub quantile_upper: Array1<f64>,
}

impl FrequencyProfile {
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// (frequency, mean) pairs for plotting.
    pub fn mean_points(&self) -> Vec<(f64, f64)> {
        self.frequencies
            .iter()
            .zip(self.mean.iter())
            .map(|(&f, &m)| (f, m))
            .collect()
    }
}

/// Power of every line in the sample, one row per (model, eval, sequence)
/// combination, restricted to the positive frequency bins.
///
/// Each line is first averaged over time.
pub fn line_power_spectra(sample: &LineSample) -> LineFreqResult<Array2<f64>> {
    let n = sample.data.len_of(Axis(AXIS_Y));
    if n < MIN_LINE_LENGTH {
        return Err(LineFreqError::LineTooShort(n));
    }

    let time_mean = sample
        .data
        .mapv(f64::from)
        .mean_axis(Axis(AXIS_TIME))
        .ok_or_else(|| LineFreqError::Statistics("time axis is empty".to_string()))?;

    let rows = time_mean.len() / n;
    let lines = time_mean.into_shape_with_order((rows, n))?;

    let bins = positive_bins(n);
    let mut power = Array2::<f64>::zeros((rows, bins.len()));
    let mut fft = LineFft::new(n);
    for (line, mut out) in lines.outer_iter().zip(power.outer_iter_mut()) {
        let spectrum = match line.as_slice() {
            Some(values) => fft.power(values),
            None => fft.power(&line.to_vec()),
        };
        out.assign(&spectrum.slice(s![bins.clone()]));
    }
    Ok(power)
}

/// Warning for datasets without a physical grid spacing, `None` otherwise.
pub fn grid_spacing_note(dataset: DatasetName, n: usize) -> Option<String> {
    match dataset.grid_spacing(n) {
        GridSpacing::Index => Some(format!(
            "No physical grid spacing known for dataset '{}'; wavenumbers are in cycles per grid cell.",
            dataset
        )),
        GridSpacing::Physical(_) => None,
    }
}

/// Positive wavenumbers of an `n`-sample line for the dataset's grid.
/// Lines shorter than two samples have none.
pub fn frequency_axis(dataset: DatasetName, n: usize) -> Array1<f64> {
    if n < 2 {
        return Array1::zeros(0);
    }
    fftfreq(n, dataset.grid_spacing(n).value())
        .slice(s![positive_bins(n)])
        .to_owned()
}

/// Mean, standard deviation and 5%/95% quantiles over all rows of `power`.
///
/// The standard deviation is unbiased (ddof = 1) unless there is a single row.
pub fn aggregate(power: &Array2<f64>, frequencies: Array1<f64>) -> LineFreqResult<FrequencyProfile> {
    if power.ncols() != frequencies.len() {
        return Err(LineFreqError::Statistics(format!(
            "{} power bins but {} frequencies",
            power.ncols(),
            frequencies.len()
        )));
    }
    let mean = power
        .mean_axis(Axis(0))
        .ok_or_else(|| LineFreqError::Statistics("no spectra to aggregate".to_string()))?;
    let ddof = if power.nrows() > 1 { 1.0 } else { 0.0 };
    let std = power.std_axis(Axis(0), ddof);

    let mut lanes = power.clone();
    let quantile_lower = lanes
        .quantile_axis_skipnan_mut(Axis(0), n64(QUANTILE_LOWER), &Linear)
        .map_err(|e| LineFreqError::Statistics(e.to_string()))?;
    let quantile_upper = lanes
        .quantile_axis_skipnan_mut(Axis(0), n64(QUANTILE_UPPER), &Linear)
        .map_err(|e| LineFreqError::Statistics(e.to_string()))?;

    Ok(FrequencyProfile {
        frequencies,
        mean,
        std,
        quantile_lower,
        quantile_upper,
    })
}

/// Multiplies every curve by kappa^4 so the inertial range flattens out.
pub fn pre_emphasize(profile: &mut FrequencyProfile) {
    let weight = profile.frequencies.mapv(|f| f.powi(PRE_EMPHASIS_EXPONENT));
    profile.mean *= &weight;
    profile.std *= &weight;
    profile.quantile_lower *= &weight;
    profile.quantile_upper *= &weight;
}

/// Full spectral reduction of one line sample.
pub fn compute_profile(sample: &LineSample, dataset: DatasetName) -> LineFreqResult<FrequencyProfile> {
    let power = line_power_spectra(sample)?;
    let n = sample.data.len_of(Axis(AXIS_Y));
    let mut profile = aggregate(&power, frequency_axis(dataset, n))?;
    pre_emphasize(&mut profile);
    log::debug!(
        "Spectrum over {} lines: {} bins, kappa range {:.4}..{:.4}",
        power.nrows(),
        profile.len(),
        profile.frequencies.first().copied().unwrap_or(0.0),
        profile.frequencies.last().copied().unwrap_or(0.0)
    );
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, ArrayD, IxDyn};

    fn sample_from_fn(shape: &[usize], f: impl Fn(&IxDyn) -> f32) -> LineSample {
        let data = ArrayD::from_shape_fn(IxDyn(shape), |idx| f(&idx));
        LineSample {
            data,
            line_index: 0,
            x_len: 1,
        }
    }

    #[test]
    fn test_time_mean_before_fft() {
        // two time steps that cancel: the time mean is zero, so is the power
        let n = 16;
        let sample = sample_from_fn(&[1, 1, 1, 2, 1, 1, n], |idx| {
            let sign = if idx[AXIS_TIME] == 0 { 1.0 } else { -1.0 };
            sign * (idx[AXIS_Y] as f32).sin()
        });
        let power = line_power_spectra(&sample).unwrap();
        assert_eq!(power.dim(), (1, n / 2 - 1));
        assert!(power.iter().all(|&p| p.abs() < 1e-9));
    }

    #[test]
    fn test_one_row_per_model_eval_sequence() {
        let sample = sample_from_fn(&[3, 2, 2, 4, 1, 1, 32], |idx| idx[AXIS_Y] as f32);
        let power = line_power_spectra(&sample).unwrap();
        assert_eq!(power.dim(), (12, 15));
        assert!(power.iter().all(|&p| p >= 0.0));
    }

    #[test]
    fn test_short_line_is_rejected() {
        let sample = sample_from_fn(&[1, 1, 1, 1, 1, 1, 3], |_| 1.0);
        assert!(matches!(
            line_power_spectra(&sample),
            Err(LineFreqError::LineTooShort(3))
        ));
    }

    #[test]
    fn test_frequency_axis() {
        let freqs = frequency_axis(DatasetName::LowRey, 128);
        assert_eq!(freqs.len(), 63);
        assert!((freqs[0] - 1.0 / 128.0).abs() < 1e-15);
        assert!((freqs[62] - 63.0 / 128.0).abs() < 1e-15);

        // Tra: d = 6 / n, so kappa_k = k / 6
        let freqs = frequency_axis(DatasetName::Extrap, 64);
        assert!((freqs[5] - 6.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_frequency_axis_of_degenerate_lines_is_empty() {
        assert!(frequency_axis(DatasetName::LowRey, 0).is_empty());
        assert!(frequency_axis(DatasetName::Extrap, 1).is_empty());
        assert!(frequency_axis(DatasetName::ZInterp, 2).is_empty());
        assert_eq!(frequency_axis(DatasetName::LowRey, 4).len(), 1);
    }

    #[test]
    fn test_grid_spacing_note_only_for_index_spacing() {
        let note = grid_spacing_note(DatasetName::LowRey, 128).unwrap();
        assert!(note.contains("lowRey"));
        assert!(grid_spacing_note(DatasetName::Extrap, 128).is_none());
        assert!(grid_spacing_note(DatasetName::ZInterp, 512).is_none());
    }

    #[test]
    fn test_aggregate_statistics() {
        let power = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [4.0, 40.0], [5.0, 50.0]];
        let profile = aggregate(&power, array![0.5, 1.0]).unwrap();
        assert_eq!(profile.mean, array![3.0, 30.0]);
        // unbiased std of 1..=5
        assert!((profile.std[0] - 2.5f64.sqrt()).abs() < 1e-12);
        // linear interpolation: position q * (n - 1)
        assert!((profile.quantile_lower[0] - 1.2).abs() < 1e-12);
        assert!((profile.quantile_upper[0] - 4.8).abs() < 1e-12);
        assert!((profile.quantile_upper[1] - 48.0).abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_single_row_has_zero_std() {
        let power = array![[2.0, 4.0, 8.0]];
        let profile = aggregate(&power, array![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(profile.std, array![0.0, 0.0, 0.0]);
        assert_eq!(profile.quantile_lower, profile.mean);
        assert_eq!(profile.quantile_upper, profile.mean);
    }

    #[test]
    fn test_aggregate_length_mismatch() {
        let power = array![[2.0, 4.0]];
        assert!(aggregate(&power, array![1.0]).is_err());
    }

    #[test]
    fn test_pre_emphasis_scales_by_kappa_to_the_fourth() {
        let mut profile = FrequencyProfile {
            frequencies: array![0.5, 2.0],
            mean: array![16.0, 1.0],
            std: array![1.0, 1.0],
            quantile_lower: array![0.0, 0.5],
            quantile_upper: array![32.0, 2.0],
        };
        pre_emphasize(&mut profile);
        assert_eq!(profile.mean, array![1.0, 16.0]);
        assert_eq!(profile.std, array![0.0625, 16.0]);
        assert_eq!(profile.quantile_lower, array![0.0, 8.0]);
        assert_eq!(profile.quantile_upper, array![2.0, 32.0]);
    }

    #[test]
    fn test_compute_profile_lengths() {
        let sample = sample_from_fn(&[2, 1, 1, 3, 1, 1, 128], |idx| {
            ((idx[AXIS_Y] * 7 + idx[AXIS_TIME]) % 11) as f32
        });
        let profile = compute_profile(&sample, DatasetName::LowRey).unwrap();
        assert_eq!(profile.len(), 63);
        assert_eq!(profile.mean.len(), profile.len());
        assert_eq!(profile.quantile_upper.len(), profile.len());
        assert_eq!(profile.mean_points().len(), 63);
    }
}

// src/data_analysis/spectral_profile.rs
