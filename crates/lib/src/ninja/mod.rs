//! Ninja build description.
//!
//! # Submodules
//!
//! - [`syntax`] - statement emitter and escaping
//! - [`writer`] - `BuildSpec` to `build.ninja` synthesis

pub mod syntax;
pub mod writer;

pub use writer::{render, write};
