//! Abstract interface to the platform media API.
//!
//! The session manager never talks to hardware directly; it acquires
//! devices through [`CameraBackend`] and pulls frames through
//! [`CameraDevice`]. The `gst-camera` feature provides the GStreamer/V4L2
//! implementation; the synthetic backend is always available for
//! development and tests.

use boardlens_common::BoardlensResult;

use crate::constraints::{CaptureConstraints, DeviceSettings};
use crate::frame::RawFrame;

/// One granted device handle exposing the live frame source.
///
/// Readers only consume the current handle; the session manager is the
/// single writer that replaces or releases it.
#[async_trait::async_trait]
pub trait CameraDevice: Send + Sync {
    /// Pull the current live frame at native dimensions.
    ///
    /// Suspends until the next frame is ready; never blocks the caller's
    /// thread.
    async fn current_frame(&self) -> BoardlensResult<RawFrame>;

    /// Effective settings granted by the device.
    fn settings(&self) -> DeviceSettings;

    /// Release the underlying hardware. Infallible; failures are logged.
    async fn release(&mut self);
}

/// Acquires device handles for one platform media API.
#[async_trait::async_trait]
pub trait CameraBackend: Send + Sync {
    /// Backend name for diagnostics.
    fn name(&self) -> &str;

    /// Attempt acquisition with one immutable constraint set.
    ///
    /// Errors map permission refusals to `PermissionDenied` and
    /// everything else to `DeviceUnavailable`.
    async fn open(
        &self,
        constraints: &CaptureConstraints,
    ) -> BoardlensResult<Box<dyn CameraDevice>>;
}

#[cfg(feature = "gst-camera")]
pub mod gst;
pub mod synthetic;

pub use synthetic::SyntheticBackend;

/// Get the default backend for this build.
pub fn default_backend() -> Box<dyn CameraBackend> {
    #[cfg(feature = "gst-camera")]
    {
        Box::new(gst::GstCameraBackend::default())
    }
    #[cfg(not(feature = "gst-camera"))]
    {
        Box::new(SyntheticBackend::new())
    }
}
