//! Detail-panel placement: the "right-or-below" algorithm.
//!
//! The marker box always sits at the detection's own coordinates. The
//! detail panel prefers the space to the right of the marker; when the
//! marker plus a capped panel width would overflow the viewport, the
//! panel drops below the marker instead.
//!
//! Placements are recomputed on every viewport resize and every new
//! detection set. Nothing here caches: the same inputs always produce
//! the same placement.

use serde::{Deserialize, Serialize};

use boardlens_detection_model::{BoundingBox, Detection, ViewportSize};

/// Hard cap on the detail panel width, in logical pixels.
pub const DETAIL_MAX_WIDTH_PX: f64 = 400.0;

/// Fixed max height of a below-placed panel, in logical pixels.
/// Content beyond this scrolls.
pub const DETAIL_BELOW_MAX_HEIGHT_PX: f64 = 180.0;

/// Which side of the marker the detail panel landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailSide {
    /// To the right of the marker.
    Right,
    /// Below the marker (right side would overflow).
    Below,
}

/// Vertical extent of the detail panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DetailExtent {
    /// Tracks the marker height, as a fraction of the viewport.
    Fraction(f64),
    /// Fixed pixel cap; content scrolls beyond it.
    MaxPx(f64),
}

/// Marker box placement, all values fractions of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrimaryPlacement {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PrimaryPlacement {
    /// CSS-style percent positioning for UI clients.
    pub fn css_style(&self) -> String {
        format!(
            "left:{:.3}%;top:{:.3}%;width:{:.3}%;height:{:.3}%",
            self.left * 100.0,
            self.top * 100.0,
            self.width * 100.0,
            self.height * 100.0
        )
    }
}

/// Detail panel placement. Horizontal values are viewport fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetailPlacement {
    pub side: DetailSide,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub extent: DetailExtent,
}

impl DetailPlacement {
    /// Panel width in pixels on the given viewport.
    pub fn width_px(&self, viewport: ViewportSize) -> f64 {
        self.width * viewport.width
    }
}

/// Computed placement for one detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayLayout {
    pub primary: PrimaryPlacement,
    pub detail: DetailPlacement,
}

/// Compute marker and detail-panel placement for one bounding box.
pub fn layout(bounds: &BoundingBox, viewport: ViewportSize) -> OverlayLayout {
    let bounds = bounds.clamped();

    let primary = PrimaryPlacement {
        left: bounds.x,
        top: bounds.y,
        width: bounds.width,
        height: bounds.height,
    };

    let detection_left_px = bounds.left_px(viewport);
    let detection_width_px = bounds.width_px(viewport);
    let detail_width_px = detection_width_px.min(DETAIL_MAX_WIDTH_PX);

    let detail = if detection_left_px + detection_width_px + detail_width_px > viewport.width {
        DetailPlacement {
            side: DetailSide::Below,
            left: bounds.x,
            top: bounds.bottom(),
            width: bounds.width,
            extent: DetailExtent::MaxPx(DETAIL_BELOW_MAX_HEIGHT_PX),
        }
    } else {
        DetailPlacement {
            side: DetailSide::Right,
            left: bounds.right(),
            top: bounds.y,
            width: bounds
                .width
                .min(viewport.px_to_frac_x(DETAIL_MAX_WIDTH_PX)),
            extent: DetailExtent::Fraction(bounds.height),
        }
    };

    OverlayLayout { primary, detail }
}

/// Layout every detection in a set against the current viewport.
///
/// Called with a freshly read viewport on each resize or detection
/// update; results are positionally paired with the input slice.
pub fn layout_detections(detections: &[Detection], viewport: ViewportSize) -> Vec<OverlayLayout> {
    detections
        .iter()
        .map(|d| layout(&d.bounding_box, viewport))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn viewport() -> ViewportSize {
        ViewportSize::new(1000.0, 800.0)
    }

    #[test]
    fn wide_right_edge_detection_places_detail_below() {
        // 150px wide at x=800: 800 + 150 + 150 > 1000.
        let bounds = BoundingBox::new(0.8, 0.1, 0.15, 0.1);
        let result = layout(&bounds, viewport());

        assert_eq!(result.detail.side, DetailSide::Below);
        assert!((result.detail.left - 0.8).abs() < 1e-9);
        assert!((result.detail.top - 0.2).abs() < 1e-9);
        assert!((result.detail.width - 0.15).abs() < 1e-9);
        assert_eq!(
            result.detail.extent,
            DetailExtent::MaxPx(DETAIL_BELOW_MAX_HEIGHT_PX)
        );
    }

    #[test]
    fn left_side_detection_places_detail_right() {
        // 200px wide at x=100: 100 + 200 + 200 <= 1000.
        let bounds = BoundingBox::new(0.1, 0.1, 0.2, 0.1);
        let result = layout(&bounds, viewport());

        assert_eq!(result.detail.side, DetailSide::Right);
        assert!((result.detail.left - 0.3).abs() < 1e-9);
        assert!((result.detail.top - 0.1).abs() < 1e-9);
        // min(0.2, 400/1000) = 0.2 → 200px.
        assert!((result.detail.width - 0.2).abs() < 1e-9);
        assert!((result.detail.width_px(viewport()) - 200.0).abs() < 1e-9);
        assert_eq!(result.detail.extent, DetailExtent::Fraction(0.1));
    }

    #[test]
    fn detail_width_is_capped_at_400px() {
        // 600px-wide detection on the left: right side fits only because
        // the panel is capped (100 + 600 + 400 > 1000 → below).
        let bounds = BoundingBox::new(0.1, 0.2, 0.6, 0.3);
        let result = layout(&bounds, viewport());
        assert_eq!(result.detail.side, DetailSide::Below);

        // Narrower viewport-relative case where the cap bites and the
        // panel still fits: 2000px viewport, detection 0.05..0.55.
        let wide_vp = ViewportSize::new(2000.0, 800.0);
        let result = layout(&BoundingBox::new(0.05, 0.2, 0.5, 0.3), wide_vp);
        assert_eq!(result.detail.side, DetailSide::Right);
        assert!((result.detail.width_px(wide_vp) - DETAIL_MAX_WIDTH_PX).abs() < 1e-9);
    }

    #[test]
    fn primary_placement_is_direct_mapping() {
        let bounds = BoundingBox::new(0.25, 0.3, 0.2, 0.15);
        let result = layout(&bounds, viewport());
        assert!((result.primary.left - 0.25).abs() < 1e-9);
        assert!((result.primary.top - 0.3).abs() < 1e-9);
        assert!((result.primary.width - 0.2).abs() < 1e-9);
        assert!((result.primary.height - 0.15).abs() < 1e-9);
    }

    #[test]
    fn layout_is_idempotent_for_fixed_inputs() {
        let bounds = BoundingBox::new(0.42, 0.13, 0.31, 0.27);
        let vp = ViewportSize::new(1366.0, 768.0);
        assert_eq!(layout(&bounds, vp), layout(&bounds, vp));
    }

    #[test]
    fn resize_changes_the_side_decision() {
        let bounds = BoundingBox::new(0.5, 0.1, 0.3, 0.2);
        // 1000px: 500 + 300 + 300 > 1000 → below.
        assert_eq!(
            layout(&bounds, ViewportSize::new(1000.0, 800.0)).detail.side,
            DetailSide::Below
        );
        // 3000px: 1500 + 900 + 400 <= 3000 → right.
        assert_eq!(
            layout(&bounds, ViewportSize::new(3000.0, 800.0)).detail.side,
            DetailSide::Right
        );
    }

    #[test]
    fn css_style_renders_percentages() {
        let result = layout(&BoundingBox::new(0.1, 0.2, 0.3, 0.4), viewport());
        let css = result.primary.css_style();
        assert!(css.contains("left:10.000%"));
        assert!(css.contains("width:30.000%"));
    }

    #[test]
    fn layout_detections_pairs_positionally() {
        let detections = vec![
            Detection {
                id: 1,
                title: "a".into(),
                fact: "a".into(),
                full_text: "a".into(),
                bounding_box: BoundingBox::new(0.1, 0.1, 0.2, 0.1),
                confidence: 1.0,
            },
            Detection {
                id: 2,
                title: "b".into(),
                fact: "b".into(),
                full_text: "b".into(),
                bounding_box: BoundingBox::new(0.8, 0.1, 0.15, 0.1),
                confidence: 1.0,
            },
        ];
        let layouts = layout_detections(&detections, viewport());
        assert_eq!(layouts.len(), 2);
        assert_eq!(layouts[0].detail.side, DetailSide::Right);
        assert_eq!(layouts[1].detail.side, DetailSide::Below);
    }

    proptest! {
        #[test]
        fn right_side_placement_always_fits_the_viewport(
            x in 0.0f64..1.0,
            y in 0.0f64..1.0,
            w in 0.0f64..1.0,
            h in 0.0f64..1.0,
            vw in 100.0f64..4000.0,
            vh in 100.0f64..4000.0,
        ) {
            let bounds = BoundingBox::new(x, y, w, h);
            let vp = ViewportSize::new(vw, vh);
            let result = layout(&bounds, vp);

            if result.detail.side == DetailSide::Right {
                let right_edge_px =
                    (result.detail.left + result.detail.width) * vp.width;
                prop_assert!(right_edge_px <= vp.width + 1e-6);
            }
        }

        #[test]
        fn placements_stay_in_the_unit_square_horizontally(
            x in 0.0f64..1.0,
            y in 0.0f64..1.0,
            w in 0.0f64..1.0,
            h in 0.0f64..1.0,
        ) {
            let bounds = BoundingBox::new(x, y, w, h);
            let result = layout(&bounds, ViewportSize::new(1280.0, 720.0));

            prop_assert!(result.primary.left >= 0.0);
            prop_assert!(result.primary.left + result.primary.width <= 1.0 + 1e-9);
            prop_assert!(result.detail.left >= 0.0);
            prop_assert!(result.detail.left <= 1.0 + 1e-9);
        }
    }
}
