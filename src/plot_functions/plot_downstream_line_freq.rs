// src/plot_functions/plot_downstream_line_freq.rs

use std::error::Error;
use std::path::PathBuf;

use crate::config::AnalysisConfig;
use crate::constants::{ISO_GRID_SPACING, LINE_WIDTH_PLOT, LOG_RANGE_PADDING};
use crate::data_input::dataset::DatasetFamily;
use crate::model_names::{model_color, model_label};
use crate::plot_framework::{
    draw_log_log_plot, marker_radii, padded_log_range, Band, InsetLayout, LineStyle, PlotConfig,
    PlotSeries,
};
use crate::types::{LineFreqAnalysis, SeriesKind};

/// Horizontal axis title. Isotropic turbulence reports the physical x position of the line.
pub fn x_axis_label(config: &AnalysisConfig, x_len: usize) -> String {
    match config.dataset.family() {
        DatasetFamily::Isotropic => format!(
            "Wavenumber of {} for Flow along Vertical Line at x Position {:.2}",
            config.field,
            config.downstream * x_len as f64 * ISO_GRID_SPACING
        ),
        DatasetFamily::Transonic | DatasetFamily::Incompressible => {
            "Wavenumber κ along vertical line downstream".to_string()
        }
    }
}

pub fn y_axis_label(field: &str) -> String {
    format!("Mean {} Amplitude * κ⁴", field)
}

fn build_series(analysis: &LineFreqAnalysis) -> Vec<PlotSeries> {
    analysis
        .spectra
        .iter()
        .enumerate()
        .map(|(position, spectrum)| {
            let profile = &spectrum.profile;
            let color = model_color(&spectrum.name, position);
            let label = model_label(&spectrum.name);
            match spectrum.kind {
                SeriesKind::GroundTruth => PlotSeries {
                    data: profile.mean_points(),
                    label,
                    color,
                    stroke_width: LINE_WIDTH_PLOT,
                    line_style: LineStyle::Dotted,
                    band: None,
                    marker_radii: marker_radii(profile.len()),
                },
                SeriesKind::Prediction => PlotSeries {
                    data: profile.mean_points(),
                    label,
                    color,
                    stroke_width: LINE_WIDTH_PLOT,
                    line_style: LineStyle::Solid,
                    band: Some(Band {
                        lower: profile.quantile_lower.to_vec(),
                        upper: profile.quantile_upper.to_vec(),
                    }),
                    marker_radii: Vec::new(),
                },
            }
        })
        .collect()
}

/// Assembles the figure description: curves, axis ranges, labels and the optional inset.
pub fn build_plot_config(
    analysis: &LineFreqAnalysis,
    config: &AnalysisConfig,
) -> Result<PlotConfig, Box<dyn Error>> {
    let frequencies = analysis
        .spectra
        .iter()
        .flat_map(|s| s.profile.frequencies.iter().copied());
    let x_range = padded_log_range(frequencies, 2.0, LOG_RANGE_PADDING)
        .ok_or("No positive wavenumbers to plot")?;

    let (y_range, inset) = if config.with_inset {
        let inset = &config.inset;
        let main_y = 10f64.powf(inset.main_y_log10.0)..10f64.powf(inset.main_y_log10.1);
        let layout = InsetLayout {
            bounds: inset.bounds,
            x_range: inset.x_limits.0..inset.x_limits.1,
            y_range: 10f64.powf(inset.y_log10.0)..10f64.powf(inset.y_log10.1),
        };
        (main_y, Some(layout))
    } else {
        let amplitudes = analysis.spectra.iter().flat_map(|s| {
            let p = &s.profile;
            p.mean
                .iter()
                .chain(p.quantile_lower.iter())
                .chain(p.quantile_upper.iter())
                .copied()
                .collect::<Vec<f64>>()
        });
        let y_range = padded_log_range(amplitudes, 10.0, LOG_RANGE_PADDING)
            .ok_or("No positive amplitudes to plot")?;
        (y_range, None)
    };

    Ok(PlotConfig {
        x_range,
        y_range,
        x_label: x_axis_label(config, analysis.x_len),
        y_label: y_axis_label(&config.field),
        series: build_series(analysis),
        corner_label: Some(config.dataset.display_name().to_string()),
        inset,
        show_legend: config.with_legend,
    })
}

/// Renders the comparison figure and returns the written path.
pub fn plot_downstream_line_freq(
    analysis: &LineFreqAnalysis,
    config: &AnalysisConfig,
) -> Result<PathBuf, Box<dyn Error>> {
    let plot_config = build_plot_config(analysis, config)?;
    let output_path = config.output_path();
    draw_log_log_plot(&output_path, config.output_format, &plot_config)?;
    log::info!("Line frequency plot saved as '{}'.", output_path.display());
    Ok(output_path)
}


// src/plot_functions/plot_downstream_line_freq.rs
