//! BoardLens Overlay Layout — screen placement for detections
//!
//! Computes where to draw a detection's marker box and detail panel so
//! they never run off-screen:
//! - **Primary marker:** direct fractional mapping of the bounding box
//! - **Detail panel:** placed to the right when it fits, below otherwise
//!
//! This crate is pure computation — no I/O, no platform dependencies.
//! All inputs are data; all outputs are data.

pub mod layout;

pub use layout::*;
