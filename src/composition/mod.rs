//! # Composition Module
//!
//! The top-level engine that turns an asset bundle into an encoded video.

pub mod engine;

pub use engine::{CompositionEngine, EncodedOutput};
