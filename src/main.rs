// src/main.rs

use std::env;
use std::error::Error;
use std::path::Path;

use downstream_line_freq::config::AnalysisConfig;
use downstream_line_freq::crate_version;
use downstream_line_freq::plot_functions::plot_downstream_line_freq::plot_downstream_line_freq;
use downstream_line_freq::run_analysis;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // --- Argument Parsing ---
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("downstream_line_freq");
    if args.len() > 2 || args.iter().skip(1).any(|a| a == "-h" || a == "--help") {
        eprintln!("Usage: {} [config.json]", program);
        std::process::exit(1);
    }

    let config = match args.get(1) {
        Some(path) => AnalysisConfig::from_json_file(Path::new(path))?,
        None => AnalysisConfig::default(),
    };
    log::info!(
        "downstream_line_freq {}: dataset {}, field {}, {} models",
        crate_version(),
        config.dataset,
        config.field,
        config.models.len()
    );

    let analysis = run_analysis(&config)?;
    plot_downstream_line_freq(&analysis, &config)?;
    Ok(())
}

// src/main.rs
