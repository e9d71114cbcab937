// src/error.rs

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LineFreqError {
    #[error("Unknown dataset '{0}'. Expected one of: extrap, interp, longer, highRey, lowRey, varReyIn, zInterp")]
    UnknownDataset(String),

    #[error("Unknown field '{field}' for dataset '{dataset}'")]
    UnknownField { dataset: String, field: String },

    #[error("Field '{field}' (index {index}) lies outside the loss-relevant fields {start}..{end}")]
    FieldNotLossRelevant {
        field: String,
        index: usize,
        start: usize,
        end: usize,
    },

    #[error("Input file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Array '{key}' not found in '{}'", .path.display())]
    MissingKey { path: PathBuf, key: String },

    #[error("Array '{name}' has rank {actual}, expected {expected}")]
    RankMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Cannot broadcast mask of shape {mask:?} onto tensor of shape {tensor:?}")]
    ShapeMismatch {
        tensor: Vec<usize>,
        mask: Vec<usize>,
    },

    #[error("Empty selection on {axis} axis: range {start}..{end} of length {len}")]
    EmptySelection {
        axis: &'static str,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("Line position {position} for downstream {downstream} is outside the x axis (length {len})")]
    LinePositionOutOfRange {
        downstream: f64,
        position: i64,
        len: usize,
    },

    #[error("Line of length {0} is too short for a spectrum (need at least 4 samples)")]
    LineTooShort(usize),

    #[error("Statistics error: {0}")]
    Statistics(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("NPZ read error: {0}")]
    Npz(#[from] ndarray_npy::ReadNpzError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type LineFreqResult<T> = Result<T, LineFreqError>;

// src/error.rs
