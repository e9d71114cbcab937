// src/constants.rs

use plotters::style::colors::BLACK;
use plotters::style::RGBColor;

// --- Tensor layout ---
// Predictions: (model, eval, sequence, time, field, x, y).
pub const AXIS_MODEL: usize = 0;
pub const AXIS_EVAL: usize = 1;
pub const AXIS_SEQUENCE: usize = 2;
pub const AXIS_TIME: usize = 3;
pub const AXIS_FIELD: usize = 4;
pub const AXIS_X: usize = 5;
pub const AXIS_Y: usize = 6;
pub const TENSOR_RANK: usize = 7;

// Ground truth is stored without the model/eval axes: (sequence, time, field, x, y).
pub const GROUND_TRUTH_RANK: usize = 5;
// Obstacle mask: (sequence, x, y).
pub const OBS_MASK_RANK: usize = 3;

// --- Archive layout ---
pub const GROUND_TRUTH_FILE: &str = "groundTruth.npz";
pub const GROUND_TRUTH_DATA_KEY: &str = "data";
pub const OBS_MASK_KEY: &str = "obsMask";
pub const PREDICTION_KEY: &str = "arr_0"; // numpy.savez default name

// --- Physical grids ---
// Tra data is interpolated onto a 12x6 area; the vertical line spans 6 units.
pub const TRA_INTERPOLATION_HEIGHT: f64 = 6.0;
// Iso: 2pi x 2pi domain at 1024x1024, queried with stride 2.
pub const ISO_GRID_SPACING: f64 = 2.0 * ((2.0 * 3.1415) / 1024.0);

// --- Spectral statistics ---
pub const QUANTILE_LOWER: f64 = 0.05;
pub const QUANTILE_UPPER: f64 = 0.95;
pub const PRE_EMPHASIS_EXPONENT: i32 = 4;
pub const MIN_LINE_LENGTH: usize = 4;

// --- Plot dimensions (4.5 x 1.8 inch at 300 dpi) ---
pub const PLOT_WIDTH: u32 = 1350;
pub const PLOT_HEIGHT: u32 = 540;
pub const PIXELS_PER_POINT: f64 = 300.0 / 72.0;

// Font sizes in pixels.
pub const FONT_SIZE_AXIS_LABEL: i32 = 30;
pub const FONT_SIZE_TICK_LABEL: i32 = 26;
pub const FONT_SIZE_INSET_TICK_LABEL: i32 = 22;
pub const FONT_SIZE_DATASET_LABEL: i32 = 28;

// Stroke widths for lines
pub const LINE_WIDTH_PLOT: u32 = 6; // 1.5 pt
pub const LINE_WIDTH_INSET_LINK: u32 = 2;

// Shaded quantile band opacity.
pub const BAND_OPACITY: f64 = 0.15;

// Ground-truth markers: matplotlib scatter areas (pt^2) shrinking log-uniformly.
pub const MARKER_AREA_LOG2_START: f64 = 5.0;
pub const MARKER_AREA_LOG2_END: f64 = 2.0;
// Dotted ground-truth line: dash and gap lengths in pixels.
pub const DOT_LENGTH_PX: f64 = 6.0;
pub const DOT_GAP_PX: f64 = 9.0;

// --- Inset layout ---
// Main axes y-limits when the inset is shown.
pub const INSET_MAIN_Y_LOG10: (f64, f64) = (-7.5, -3.5);
// Inset bounds as fractions of the main plotting area: x0, y0 (from bottom), width, height.
pub const INSET_BOUNDS: [f64; 4] = [0.27, 0.02, 0.45, 0.50];
pub const INSET_X_LIMITS: (f64, f64) = (0.40, 0.487);
pub const INSET_Y_LOG10: (f64, f64) = (-6.7, -4.6);

// Padding (in decades / octaves) around auto-fitted log ranges.
pub const LOG_RANGE_PADDING: f64 = 0.05;

// --- Colors ---
pub const COLOR_TEXT: &RGBColor = &BLACK;
pub const COLOR_GRID: RGBColor = RGBColor(176, 176, 176);
pub const COLOR_INSET_BACKGROUND: RGBColor = RGBColor(242, 242, 242);
pub const COLOR_INSET_LINK: RGBColor = RGBColor(128, 128, 128);
pub const COLOR_LABEL_BOX_FILL: RGBColor = RGBColor(245, 245, 245); // whitesmoke
pub const COLOR_LABEL_BOX_EDGE: RGBColor = RGBColor(47, 79, 79); // darkslategray

// src/constants.rs
