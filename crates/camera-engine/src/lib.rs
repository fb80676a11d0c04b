//! BoardLens Camera Engine
//!
//! Owns the lifecycle of the live capture device and turns live frames
//! into transmittable still images.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               CameraManager                  │
//! │  ┌──────────────┐      ┌─────────────────┐  │
//! │  │ Negotiation  │      │ Active session  │  │
//! │  │ rich→minimal │─────▶│ (one at a time) │  │
//! │  └──────────────┘      └────────┬────────┘  │
//! │                                 │ pull       │
//! │                                 ▼            │
//! │                        ┌─────────────────┐  │
//! │                        │  Frame Encoder  │  │
//! │                        │  JPEG + base64  │  │
//! │                        └─────────────────┘  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Device access goes through the [`backend::CameraBackend`] trait so the
//! same session logic runs against real hardware (`gst-camera` feature)
//! and the synthetic test-pattern source.

pub mod backend;
pub mod constraints;
pub mod encoder;
pub mod frame;
pub mod session;

pub use constraints::*;
pub use encoder::{encode_frame, EncodedFrame, JPEG_QUALITY};
pub use frame::RawFrame;
pub use session::{CameraManager, SessionInfo};
