//! Haze Core - Foundational types for the Haze background engine
//!
//! This crate provides the types that all other Haze crates depend on:
//! - `Color` - RGBA color with hex string parsing
//! - `Extent` - Width/height of a drawing surface
//! - Error types and Result alias

mod error;
mod types;

pub use error::{HazeError, Result};
pub use types::{Color, Extent};
