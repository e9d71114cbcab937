// src/model_names.rs

//! Display names and plot colors for the compared models.
//!
//! Known models use a fixed slot of the Tableau-10 palette so that a model keeps
//! its color across figures. Unknown names fall back to the palette cycle by
//! their position in the model list and are labelled with their raw name.

use plotters::style::RGBColor;

/// Reference simulation key in the model list.
pub const SIMULATION: &str = "Simulation";

// (config key, legend label, Tableau-10 slot); None means dark gray
static KNOWN_MODELS: [(&str, &str, Option<usize>); 11] = [
    (SIMULATION, "Simulation", None),
    ("ResNet", "ResNet", Some(5)),
    ("Dil-ResNet", "Dil-ResNet", Some(0)),
    ("FNO16", "FNO-16", Some(1)),
    ("FNO32", "FNO-32", Some(9)),
    ("TF-MGN", "TF-MGN", Some(7)),
    ("TF-Enc", "TF-Enc", Some(4)),
    ("TF-VAE", "TF-VAE", Some(8)),
    ("U-Net", "U-Net", Some(2)),
    ("ACDM-ncn", "ACDM-ncn", Some(6)),
    ("ACDM", "ACDM", Some(3)),
];

const SIMULATION_COLOR: RGBColor = RGBColor(64, 64, 64);

fn palette_color(slot: usize) -> RGBColor {
    let color = colorous::TABLEAU10[slot % colorous::TABLEAU10.len()];
    RGBColor(color.r, color.g, color.b)
}

fn lookup(name: &str) -> Option<&'static (&'static str, &'static str, Option<usize>)> {
    KNOWN_MODELS.iter().find(|(key, _, _)| *key == name)
}

/// Legend label for a model key.
pub fn model_label(name: &str) -> String {
    match lookup(name) {
        Some((_, label, _)) => label.to_string(),
        None => name.to_string(),
    }
}

/// Plot color for a model key; `position` is its index in the model list.
pub fn model_color(name: &str, position: usize) -> RGBColor {
    match lookup(name) {
        Some((_, _, Some(slot))) => palette_color(*slot),
        Some((_, _, None)) => SIMULATION_COLOR,
        None => palette_color(position),
    }
}


// src/model_names.rs
