//! Synthetic whiteboard test-pattern backend.
//!
//! Renders a whiteboard-style frame with grid lines and a handful of
//! dark strokes so the full capture → encode → analyze path can run
//! without hardware. Used by tests, `boardlens check`, and builds
//! without the `gst-camera` feature.

use image::{ImageBuffer, Rgb, RgbImage};

use boardlens_common::BoardlensResult;

use crate::constraints::{CaptureConstraints, DeviceSettings, Facing};
use crate::frame::RawFrame;

use super::{CameraBackend, CameraDevice};

const MINIMAL_WIDTH: u32 = 640;
const MINIMAL_HEIGHT: u32 = 480;

/// Backend producing synthetic frames, always available.
#[derive(Debug, Default)]
pub struct SyntheticBackend;

impl SyntheticBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl CameraBackend for SyntheticBackend {
    fn name(&self) -> &str {
        "synthetic"
    }

    async fn open(
        &self,
        constraints: &CaptureConstraints,
    ) -> BoardlensResult<Box<dyn CameraDevice>> {
        // The synthetic device grants exactly what the tier asks for:
        // the ideal resolution when hinted, a small default otherwise.
        let (width, height) = constraints
            .resolution
            .map(|r| (r.ideal_width, r.ideal_height))
            .unwrap_or((MINIMAL_WIDTH, MINIMAL_HEIGHT));
        let frame_rate = constraints
            .frame_rate
            .map(|f| f.ideal_fps as f64)
            .unwrap_or(30.0);

        tracing::debug!(
            facing = constraints.facing.as_str(),
            width,
            height,
            "Opening synthetic camera"
        );

        Ok(Box::new(SyntheticDevice {
            facing: constraints.facing,
            settings: DeviceSettings {
                width,
                height,
                frame_rate,
            },
        }))
    }
}

struct SyntheticDevice {
    facing: Facing,
    settings: DeviceSettings,
}

#[async_trait::async_trait]
impl CameraDevice for SyntheticDevice {
    async fn current_frame(&self) -> BoardlensResult<RawFrame> {
        let image = whiteboard_pattern(self.settings.width, self.settings.height, self.facing);
        RawFrame::new(image.into_raw(), self.settings.width, self.settings.height)
    }

    fn settings(&self) -> DeviceSettings {
        self.settings
    }

    async fn release(&mut self) {
        tracing::debug!(facing = self.facing.as_str(), "Released synthetic camera");
    }
}

/// Whiteboard-style pattern: off-white board, faint grid, dark strokes.
///
/// The front camera gets a horizontally mirrored pattern so tests can
/// tell the two facings apart.
fn whiteboard_pattern(width: u32, height: u32, facing: Facing) -> RgbImage {
    let mut img = ImageBuffer::from_pixel(width, height, Rgb([245, 245, 240]));

    let grid_spacing = (width / 12).max(1);
    let grid_color = Rgb([225, 225, 220]);
    for x in (0..width).step_by(grid_spacing as usize) {
        for y in 0..height {
            img.put_pixel(x, y, grid_color);
        }
    }
    for y in (0..height).step_by(grid_spacing as usize) {
        for x in 0..width {
            img.put_pixel(x, y, grid_color);
        }
    }

    // A few marker strokes in the upper-left quadrant.
    let ink = Rgb([40, 45, 60]);
    let stroke_y = height / 4;
    for x in width / 10..width * 4 / 10 {
        for dy in 0..3u32 {
            let y = (stroke_y + dy).min(height - 1);
            img.put_pixel(x, y, ink);
        }
    }
    let stroke_x = width / 10;
    for y in height / 4..height / 2 {
        for dx in 0..3u32 {
            let x = (stroke_x + dx).min(width - 1);
            img.put_pixel(x, y, ink);
        }
    }

    if facing == Facing::Front {
        image::imageops::flip_horizontal_in_place(&mut img);
    }

    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::ConstraintTier;

    #[tokio::test]
    async fn rich_tier_grants_ideal_resolution() {
        let backend = SyntheticBackend::new();
        let constraints = CaptureConstraints::rich(Facing::Rear);
        let device = backend.open(&constraints).await.unwrap();
        let settings = device.settings();
        assert_eq!(settings.width, 1920);
        assert_eq!(settings.height, 1080);
        assert_eq!(constraints.tier, ConstraintTier::Rich);
    }

    #[tokio::test]
    async fn minimal_tier_grants_fallback_resolution() {
        let backend = SyntheticBackend::new();
        let device = backend
            .open(&CaptureConstraints::minimal(Facing::Front))
            .await
            .unwrap();
        assert_eq!(device.settings().width, MINIMAL_WIDTH);
        assert_eq!(device.settings().height, MINIMAL_HEIGHT);
    }

    #[tokio::test]
    async fn frames_match_granted_dimensions() {
        let backend = SyntheticBackend::new();
        let device = backend
            .open(&CaptureConstraints::minimal(Facing::Rear))
            .await
            .unwrap();
        let frame = device.current_frame().await.unwrap();
        assert_eq!(frame.width(), MINIMAL_WIDTH);
        assert_eq!(frame.height(), MINIMAL_HEIGHT);
        assert_eq!(
            frame.pixels().len(),
            (MINIMAL_WIDTH * MINIMAL_HEIGHT * 3) as usize
        );
    }

    #[tokio::test]
    async fn front_and_rear_patterns_differ() {
        let backend = SyntheticBackend::new();
        let front = backend
            .open(&CaptureConstraints::minimal(Facing::Front))
            .await
            .unwrap();
        let rear = backend
            .open(&CaptureConstraints::minimal(Facing::Rear))
            .await
            .unwrap();
        let f = front.current_frame().await.unwrap();
        let r = rear.current_frame().await.unwrap();
        assert_ne!(f.pixels(), r.pixels());
    }
}
