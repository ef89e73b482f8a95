// src/forms/table/mod.rs

pub mod column_key;
pub mod editor;

pub use column_key::derive_column_key;
pub use editor::{editor_for, TableEditor};
