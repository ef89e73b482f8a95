// src/forms/systems/io/mod.rs

pub mod catalog;
pub mod startup;

pub use startup::{
    add_builtin_forms, add_forms_from_dir, register_builtin_forms, scan_forms_directory,
};
