// src/forms/systems/mod.rs

pub mod io;
pub mod logic;
