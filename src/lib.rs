//! Content studio for a mascot-driven brand: prompt building, script
//! generation and scoring, per-scene storyboard images, and zip packaging.

pub mod api;
pub mod brand;
pub mod config;
pub mod content;
pub mod error;
pub mod package;
pub mod prompt;
pub mod scene;
pub mod studio;

pub use error::{Result, StudioError};
