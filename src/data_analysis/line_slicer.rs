// src/data_analysis/line_slicer.rs

use ndarray::{ArrayD, Axis, Slice};

use crate::config::{AnalysisConfig, AxisRange};
use crate::constants::{
    AXIS_EVAL, AXIS_FIELD, AXIS_MODEL, AXIS_SEQUENCE, AXIS_TIME, AXIS_X, TENSOR_RANK,
};
use crate::data_input::dataset::{DatasetFamily, DatasetName};
use crate::error::{LineFreqError, LineFreqResult};
use crate::types::SeriesKind;

/// One field along one vertical line: (model, eval, sequence, time, 1, 1, y).
#[derive(Debug, Clone)]
pub struct LineSample {
    pub data: ArrayD<f32>,
    /// Position of the line on the x axis.
    pub line_index: usize,
    /// Length of the x axis the line was taken from.
    pub x_len: usize,
}

/// x index of the vertical line `downstream` units behind the obstacle.
///
/// The position is truncated toward zero. Positions outside `[0, x_len)`
/// are rejected, so the returned index is always valid for the x axis.
pub fn line_index(dataset: DatasetName, downstream: f64, x_len: usize) -> LineFreqResult<usize> {
    let fraction = match dataset.family() {
        // cylinder at 2 of 12 length units
        DatasetFamily::Transonic => (downstream + 2.0) / 12.0,
        DatasetFamily::Incompressible => (0.6 * downstream + 1.3) / 4.0,
        DatasetFamily::Isotropic => downstream,
    };
    let position = (fraction * x_len as f64).trunc();
    if !position.is_finite() || position < 0.0 || position >= x_len as f64 {
        return Err(LineFreqError::LinePositionOutOfRange {
            downstream,
            position: if position.is_finite() { position as i64 } else { i64::MAX },
            len: x_len,
        });
    }
    Ok(position as usize)
}

fn slice_axis_checked(
    view: &mut ndarray::ArrayViewD<'_, f32>,
    axis: usize,
    name: &'static str,
    range: AxisRange,
) -> LineFreqResult<()> {
    let len = view.len_of(Axis(axis));
    let clamped = range.clamp_to(len);
    if clamped.is_empty() {
        return Err(LineFreqError::EmptySelection {
            axis: name,
            start: range.start,
            end: range.end,
            len,
        });
    }
    if clamped.end != range.end {
        log::warn!(
            "{} range {}..{} clamped to {}..{} (axis length {})",
            name,
            range.start,
            range.end,
            clamped.start,
            clamped.end,
            len
        );
    }
    view.slice_axis_inplace(Axis(axis), Slice::from(clamped));
    Ok(())
}

/// Applies the configured model, eval, sequence and time ranges and keeps
/// only the dataset's loss-relevant fields.
///
/// Ground truth carries length-1 model and eval axes, which are left as is.
pub fn select_ranges(
    tensor: &ArrayD<f32>,
    config: &AnalysisConfig,
    kind: SeriesKind,
) -> LineFreqResult<ArrayD<f32>> {
    if tensor.ndim() != TENSOR_RANK {
        return Err(LineFreqError::RankMismatch {
            name: "tensor".to_string(),
            expected: TENSOR_RANK,
            actual: tensor.ndim(),
        });
    }
    let fields = config.dataset.loss_relevant_fields();
    let mut view = tensor.view();
    if kind == SeriesKind::Prediction {
        slice_axis_checked(&mut view, AXIS_MODEL, "model", config.model_range)?;
        slice_axis_checked(&mut view, AXIS_EVAL, "eval", config.eval_range)?;
    }
    slice_axis_checked(&mut view, AXIS_SEQUENCE, "sequence", config.sequence_range)?;
    slice_axis_checked(&mut view, AXIS_TIME, "time", config.time_range)?;
    slice_axis_checked(
        &mut view,
        AXIS_FIELD,
        "field",
        AxisRange::new(fields.start, fields.end),
    )?;
    Ok(view.to_owned())
}

/// Cuts the configured field along the downstream line out of a tensor
/// already reduced by [`select_ranges`]. Field and x axes keep length 1.
pub fn extract_line(tensor: &ArrayD<f32>, config: &AnalysisConfig) -> LineFreqResult<LineSample> {
    let dataset = config.dataset;
    let relevant = dataset.loss_relevant_fields();
    let field_index = dataset.field_index(&config.field)?;
    if !relevant.contains(&field_index) {
        return Err(LineFreqError::FieldNotLossRelevant {
            field: config.field.clone(),
            index: field_index,
            start: relevant.start,
            end: relevant.end,
        });
    }
    let field_offset = field_index - relevant.start;

    let x_len = tensor.len_of(Axis(AXIS_X));
    let line = line_index(dataset, config.downstream, x_len)?;

    let mut view = tensor.view();
    slice_axis_checked(
        &mut view,
        AXIS_FIELD,
        "field",
        AxisRange::new(field_offset, field_offset + 1),
    )?;
    view.slice_axis_inplace(Axis(AXIS_X), Slice::from(line..line + 1));

    Ok(LineSample {
        data: view.to_owned(),
        line_index: line,
        x_len,
    })
}


// src/data_analysis/line_slicer.rs
