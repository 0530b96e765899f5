//! Core library for converting Haar-style cascade classifiers into the
//! fixed-point forms consumed by the embedded detection runtime.
//!
//! The pipeline is loader -> quantizer -> emitter: `parse` turns the
//! training tool's XML export into a nested descriptor, `quant` maps it
//! to fixed-point columnar arrays, and `emit` renders those arrays as a
//! packed binary stream, a C header, or an info summary.

pub mod emit;
pub mod model;
pub mod parse;
pub mod prelude;
pub mod quant;

pub use prelude::{ConvertError, ConvertResult};
