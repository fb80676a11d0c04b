//! BoardLens Detection Model
//!
//! Defines the core data contracts shared between the camera engine, the
//! analysis client, and the overlay layout engine:
//! - **Detection:** one analysis result with a normalized bounding box
//! - **BoundingBox:** fractional frame coordinates, top-left origin
//! - **ViewportSize:** pixel dimensions of the rendering surface
//!
//! Bounding boxes are normalized to `[0.0, 1.0]` relative to the source
//! frame so placements survive resolution changes between the captured
//! frame and the rendering surface.

pub mod detection;
pub mod viewport;

pub use detection::*;
pub use viewport::*;
