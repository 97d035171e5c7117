pub mod generation;
pub mod settings;
