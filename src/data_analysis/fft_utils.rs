// src/data_analysis/fft_utils.rs

use ndarray::Array1;
use num_complex::Complex64;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// Forward real FFT planned once for a fixed line length and reused per line.
pub struct LineFft {
    plan: Arc<dyn RealToComplex<f64>>,
    scratch_in: Vec<f64>,
    scratch_out: Vec<Complex64>,
}

impl LineFft {
    pub fn new(n: usize) -> Self {
        let plan = RealFftPlanner::<f64>::new().plan_fft_forward(n);
        let scratch_in = plan.make_input_vec();
        let scratch_out = plan.make_output_vec();
        Self {
            plan,
            scratch_in,
            scratch_out,
        }
    }

    pub fn len(&self) -> usize {
        self.scratch_in.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scratch_in.is_empty()
    }

    /// Power |X_k|^2 of the non-negative frequency bins 0..=n/2.
    /// Returns zeros if the input length does not match the plan.
    pub fn power(&mut self, line: &[f64]) -> Array1<f64> {
        if line.len() != self.scratch_in.len() {
            log::warn!(
                "FFT input length mismatch. Expected {}, got {}. Returning zeros.",
                self.scratch_in.len(),
                line.len()
            );
            return Array1::zeros(self.scratch_out.len());
        }
        self.scratch_in.copy_from_slice(line);
        if self
            .plan
            .process(&mut self.scratch_in, &mut self.scratch_out)
            .is_err()
        {
            log::warn!("FFT forward processing failed.");
            return Array1::zeros(self.scratch_out.len());
        }
        self.scratch_out.iter().map(|c| c.norm_sqr()).collect()
    }
}

/// Sample frequencies of an n-point DFT with sample spacing `d`, in the
/// order numpy's `fftfreq` returns them (non-negative first, then negative).
pub fn fftfreq(n: usize, d: f64) -> Array1<f64> {
    if n == 0 || d <= 0.0 {
        return Array1::zeros(0);
    }
    let scale = 1.0 / (n as f64 * d);
    let positive_count = (n - 1) / 2 + 1;
    Array1::from_iter((0..n).map(|i| {
        let k = if i < positive_count {
            i as f64
        } else {
            i as f64 - n as f64
        };
        k * scale
    }))
}

/// Bin indices strictly between DC and the Nyquist / negative mirror: 1..n/2.
pub fn positive_bins(n: usize) -> std::ops::Range<usize> {
    1..(n / 2).max(1)
}


// src/data_analysis/fft_utils.rs
