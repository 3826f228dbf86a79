//! # Rendering Module
//!
//! The raster surface, the per-timestamp frame compositor, and the
//! deterministic scheduling loop that drives them.

pub mod compositor;
pub mod frame;
pub mod scheduler;

pub use compositor::{cover_fit, CoverFit, FrameCompositor};
pub use frame::{surface_resolution, Frame, LANDSCAPE_RESOLUTION, PORTRAIT_RESOLUTION};
pub use scheduler::FrameScheduler;
