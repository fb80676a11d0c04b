//! Detections returned by the analysis service.
//!
//! Field names mirror the wire format of the `/process_image` endpoint.

use serde::{Deserialize, Serialize};

use crate::viewport::ViewportSize;

/// A rectangular region of the source frame.
///
/// Coordinates are normalized: `(0.0, 0.0)` is top-left,
/// `(1.0, 1.0)` is bottom-right of the full frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge (normalized).
    pub x: f64,
    /// Top edge (normalized).
    pub y: f64,
    /// Width (normalized).
    pub width: f64,
    /// Height (normalized).
    pub height: f64,
}

impl BoundingBox {
    /// Create a new bounding box, clamping values to the valid range.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        let x = x.clamp(0.0, 1.0);
        let y = y.clamp(0.0, 1.0);
        Self {
            x,
            y,
            width: width.clamp(0.0, 1.0 - x),
            height: height.clamp(0.0, 1.0 - y),
        }
    }

    /// Right edge (normalized).
    pub fn right(&self) -> f64 {
        (self.x + self.width).min(1.0)
    }

    /// Bottom edge (normalized).
    pub fn bottom(&self) -> f64 {
        (self.y + self.height).min(1.0)
    }

    /// Whether all coordinates already lie within `[0.0, 1.0]`.
    pub fn is_normalized(&self) -> bool {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        in_unit(self.x) && in_unit(self.y) && in_unit(self.right()) && in_unit(self.bottom())
            && self.width >= 0.0
            && self.height >= 0.0
    }

    /// A copy with every coordinate clamped into `[0.0, 1.0]`.
    ///
    /// Used on deserialized responses so a misbehaving service can never
    /// push an overlay off the unit square.
    pub fn clamped(&self) -> Self {
        Self::new(self.x, self.y, self.width, self.height)
    }

    /// Width in pixels on the given viewport.
    pub fn width_px(&self, viewport: ViewportSize) -> f64 {
        self.width * viewport.width
    }

    /// Left edge in pixels on the given viewport.
    pub fn left_px(&self, viewport: ViewportSize) -> f64 {
        self.x * viewport.width
    }
}

/// One analysis result tied to a region of the captured frame.
///
/// The set of detections from a response fully replaces the prior set;
/// detections are never merged across capture cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Stable identifier within one response.
    pub id: u32,

    /// Short heading for the marker box.
    pub title: String,

    /// One-line summary shown next to the marker.
    pub fact: String,

    /// Full explanation shown in the detail panel.
    pub full_text: String,

    /// Region of the source frame this detection refers to.
    #[serde(rename = "boundingBox")]
    pub bounding_box: BoundingBox,

    /// Service-reported confidence, defaulting to certain.
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    1.0
}

impl Detection {
    /// A copy whose bounding box is clamped into the unit square.
    pub fn with_clamped_box(mut self) -> Self {
        self.bounding_box = self.bounding_box.clamped();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_clamps_on_construction() {
        let b = BoundingBox::new(0.9, -0.1, 0.5, 0.3);
        assert!(b.is_normalized());
        assert!((b.x - 0.9).abs() < 1e-9);
        assert_eq!(b.y, 0.0);
        assert!(b.right() <= 1.0);
    }

    #[test]
    fn bounding_box_edges() {
        let b = BoundingBox::new(0.1, 0.2, 0.3, 0.4);
        assert!((b.right() - 0.4).abs() < 1e-9);
        assert!((b.bottom() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn detection_deserializes_wire_format() {
        let json = r#"{
            "id": 1,
            "title": "Whiteboard Analysis",
            "fact": "Quadratic formula",
            "full_text": "The quadratic formula solves ax^2 + bx + c = 0.",
            "boundingBox": {"x": 0.1, "y": 0.2, "width": 0.3, "height": 0.4}
        }"#;
        let d: Detection = serde_json::from_str(json).unwrap();
        assert_eq!(d.id, 1);
        assert!((d.confidence - 1.0).abs() < 1e-9);
        assert!((d.bounding_box.width - 0.3).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_box_is_clamped_not_rejected() {
        let json = r#"{
            "id": 2,
            "title": "t",
            "fact": "f",
            "full_text": "ft",
            "boundingBox": {"x": 0.8, "y": 0.8, "width": 0.5, "height": 0.5},
            "confidence": 0.4
        }"#;
        let d: Detection = serde_json::from_str::<Detection>(json).unwrap().with_clamped_box();
        assert!(d.bounding_box.is_normalized());
        assert!((d.confidence - 0.4).abs() < 1e-9);
    }
}
