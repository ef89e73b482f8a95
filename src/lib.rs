// src/lib.rs

pub mod catalog_definitions;
pub mod cli;
pub mod forms;
pub mod settings;

pub use forms::FormsPlugin;
pub use settings::AppSettings;
