// src/plot_functions/mod.rs

pub mod plot_downstream_line_freq;

// src/plot_functions/mod.rs
