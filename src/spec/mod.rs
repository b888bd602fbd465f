//! # Metadata Extraction
//!
//! Finds the functions whose documentation starts with the annotation marker
//! and turns each one into an [`ApiSpec`]: owner type, handler name, route,
//! verb, auth flag and the parameter record it consumes.

mod extract;
mod types;

pub use extract::*;
pub use types::*;
