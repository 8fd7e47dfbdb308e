// src/config/mod.rs
pub mod content;

pub use content::ContentConfig;
