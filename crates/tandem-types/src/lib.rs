//! Tandem Types - Pure data types shared across the workspace
//!
//! This crate contains only plain serde types with no runtime or database
//! dependencies, so every other crate can depend on it freely.

pub mod post;

pub use post::*;
