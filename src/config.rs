// src/config.rs

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{
    GROUND_TRUTH_FILE, INSET_BOUNDS, INSET_MAIN_Y_LOG10, INSET_X_LIMITS, INSET_Y_LOG10,
    PREDICTION_KEY,
};
use crate::data_input::dataset::DatasetName;
use crate::error::{LineFreqError, LineFreqResult};

/// Half-open index range along one tensor axis, written as `[start, end]` in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct AxisRange {
    pub start: usize,
    pub end: usize,
}

impl AxisRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Clamps the range to an axis of length `len`, like NumPy slicing does.
    pub fn clamp_to(&self, len: usize) -> Range<usize> {
        let end = self.end.min(len);
        self.start.min(end)..end
    }
}

impl From<[usize; 2]> for AxisRange {
    fn from(value: [usize; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<AxisRange> for [usize; 2] {
    fn from(value: AxisRange) -> Self {
        [value.start, value.end]
    }
}

/// One series of the figure: display key and archive file inside the prediction folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub name: String,
    pub file: String,
}

impl ModelEntry {
    pub fn new(name: &str, file: &str) -> Self {
        Self {
            name: name.to_string(),
            file: file.to_string(),
        }
    }
}

/// File type of the rendered figure. PDF is rendered as SVG and converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Pdf,
    Svg,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

/// Zoom window of the inset panel. Amplitude limits are log10 exponents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsetConfig {
    pub main_y_log10: (f64, f64),
    pub bounds: [f64; 4],
    pub x_limits: (f64, f64),
    pub y_log10: (f64, f64),
}

impl Default for InsetConfig {
    fn default() -> Self {
        Self {
            main_y_log10: INSET_MAIN_Y_LOG10,
            bounds: INSET_BOUNDS,
            x_limits: INSET_X_LIMITS,
            y_log10: INSET_Y_LOG10,
        }
    }
}

/// Everything one run needs. Passed explicitly to every stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub dataset: DatasetName,
    pub model_range: AxisRange,
    pub eval_range: AxisRange,
    pub sequence_range: AxisRange,
    pub time_range: AxisRange,
    /// Defaults to `results/sampling/<dataset>` when absent.
    pub prediction_folder: Option<PathBuf>,
    pub output_folder: PathBuf,
    pub ground_truth_file: String,
    pub prediction_key: String,
    /// Plot order. The entry whose file is `ground_truth_file` is the reference series.
    pub models: Vec<ModelEntry>,
    /// Line position in cylinder diameters downstream (fraction of the domain for Iso).
    pub downstream: f64,
    pub field: String,
    pub with_inset: bool,
    pub inset: InsetConfig,
    /// Legend in the upper-right corner; off for figures that share a separate legend.
    pub with_legend: bool,
    pub output_format: OutputFormat,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetName::LowRey,
            model_range: AxisRange::new(0, 3),
            eval_range: AxisRange::new(0, 5),
            sequence_range: AxisRange::new(4, 5),
            time_range: AxisRange::new(0, 240),
            prediction_folder: None,
            output_folder: PathBuf::from("results"),
            ground_truth_file: GROUND_TRUTH_FILE.to_string(),
            prediction_key: PREDICTION_KEY.to_string(),
            models: vec![
                ModelEntry::new("Simulation", GROUND_TRUTH_FILE),
                ModelEntry::new("Dil-ResNet", "dil-resnet-s2.npz"),
                ModelEntry::new("FNO16", "fno-16modes-s2.npz"),
                ModelEntry::new("TF-Enc", "tf-enc.npz"),
                ModelEntry::new("U-Net", "unet-s2.npz"),
                ModelEntry::new("ACDM-ncn", "direct-ddpm+Prev20_ncn.npz"),
                ModelEntry::new("ACDM", "direct-ddpm+Prev20.npz"),
            ],
            downstream: 1.0,
            field: "velX".to_string(),
            with_inset: true,
            inset: InsetConfig::default(),
            with_legend: false,
            output_format: OutputFormat::Pdf,
        }
    }
}

impl AnalysisConfig {
    /// Reads a JSON config; keys that are absent keep their defaults.
    pub fn from_json_file(path: &Path) -> LineFreqResult<Self> {
        if !path.exists() {
            return Err(LineFreqError::MissingFile(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        let config: AnalysisConfig = serde_json::from_str(&text)?;
        Ok(config)
    }

    pub fn prediction_folder(&self) -> PathBuf {
        self.prediction_folder
            .clone()
            .unwrap_or_else(|| PathBuf::from("results").join("sampling").join(self.dataset.as_str()))
    }

    pub fn ground_truth_path(&self) -> PathBuf {
        self.prediction_folder().join(&self.ground_truth_file)
    }

    pub fn is_ground_truth(&self, entry: &ModelEntry) -> bool {
        entry.file == self.ground_truth_file
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_folder.join(format!(
            "downstream_line_freq_{}_{}.{}",
            self.dataset,
            self.field,
            self.output_format.extension()
        ))
    }

    /// Rejects configurations that cannot produce a figure, before any file is read.
    pub fn validate(&self) -> LineFreqResult<()> {
        let ranges = [
            ("model", self.model_range),
            ("eval", self.eval_range),
            ("sequence", self.sequence_range),
            ("time", self.time_range),
        ];
        for (name, range) in ranges {
            if range.is_empty() {
                return Err(LineFreqError::ConfigError(format!(
                    "{name} range {}..{} is empty",
                    range.start, range.end
                )));
            }
        }
        if self.models.is_empty() {
            return Err(LineFreqError::ConfigError("no models configured".to_string()));
        }
        if !self.downstream.is_finite() {
            return Err(LineFreqError::ConfigError(format!(
                "downstream position {} is not finite",
                self.downstream
            )));
        }
        let field_index = self.dataset.field_index(&self.field)?;
        let relevant = self.dataset.loss_relevant_fields();
        if !relevant.contains(&field_index) {
            return Err(LineFreqError::FieldNotLossRelevant {
                field: self.field.clone(),
                index: field_index,
                start: relevant.start,
                end: relevant.end,
            });
        }
        if self.with_inset {
            let (x0, x1) = self.inset.x_limits;
            if !(x0 > 0.0 && x1 > x0) {
                return Err(LineFreqError::ConfigError(format!(
                    "inset x limits ({x0}, {x1}) must be positive and increasing"
                )));
            }
            if self.inset.y_log10.1 <= self.inset.y_log10.0
                || self.inset.main_y_log10.1 <= self.inset.main_y_log10.0
            {
                return Err(LineFreqError::ConfigError(
                    "inset amplitude limits must be increasing".to_string(),
                ));
            }
        }
        Ok(())
    }
}


// src/config.rs
