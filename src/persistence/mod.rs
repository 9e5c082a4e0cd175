// src/persistence/mod.rs
pub mod json_file;
