//! # rowdef Configuration Module
//!
//! Centralizes the constants that define the binary and SQL text layouts and
//! the runtime options of the text codec.
//!
//! ## Module Organization
//!
//! - [`constants`]: wire widths, NA defaults, SQL markers, DDL padding
//! - [`text`]: `TextOptions` builder for delimiter and comment marker

pub mod constants;
pub mod text;

pub use constants::*;
pub use text::TextOptions;
