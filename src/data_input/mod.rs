// src/data_input/mod.rs

pub mod dataset;
pub mod tensor_loader;

// src/data_input/mod.rs
