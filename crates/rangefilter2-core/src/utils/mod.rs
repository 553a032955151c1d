//! Utility functions.
//!
//! - [`text`]: slugs, capitalization, verbose names and HTML escaping.

pub mod text;
