//! Deterministic sweep over box/viewport combinations.
//!
//! Re-derives the placement rule independently for every sample and
//! checks the engine agrees, so a regression in either the branch
//! condition or the emitted geometry shows up as a specific case.

use boardlens_detection_model::{BoundingBox, ViewportSize};
use boardlens_overlay_layout::{
    layout, DetailExtent, DetailSide, DETAIL_BELOW_MAX_HEIGHT_PX, DETAIL_MAX_WIDTH_PX,
};

fn sample_boxes() -> Vec<BoundingBox> {
    let mut boxes = Vec::new();
    for xi in 0..10 {
        for wi in 1..=6 {
            boxes.push(BoundingBox::new(
                xi as f64 * 0.1,
                0.05 + (xi as f64) * 0.08,
                wi as f64 * 0.12,
                0.1 + (wi as f64) * 0.05,
            ));
        }
    }
    boxes
}

fn sample_viewports() -> Vec<ViewportSize> {
    vec![
        ViewportSize::new(320.0, 568.0),
        ViewportSize::new(390.0, 844.0),
        ViewportSize::new(768.0, 1024.0),
        ViewportSize::new(1000.0, 800.0),
        ViewportSize::new(1280.0, 720.0),
        ViewportSize::new(1920.0, 1080.0),
        ViewportSize::new(2560.0, 1440.0),
    ]
}

#[test]
fn side_decision_matches_the_pixel_rule_everywhere() {
    for viewport in sample_viewports() {
        for bounds in sample_boxes() {
            let result = layout(&bounds, viewport);

            let left_px = bounds.x * viewport.width;
            let width_px = bounds.width * viewport.width;
            let detail_px = width_px.min(DETAIL_MAX_WIDTH_PX);
            let overflows = left_px + width_px + detail_px > viewport.width;

            let expected = if overflows {
                DetailSide::Below
            } else {
                DetailSide::Right
            };
            assert_eq!(
                result.detail.side, expected,
                "box {bounds:?} on viewport {viewport:?}"
            );
        }
    }
}

#[test]
fn emitted_geometry_follows_the_chosen_side() {
    for viewport in sample_viewports() {
        for bounds in sample_boxes() {
            let result = layout(&bounds, viewport);

            match result.detail.side {
                DetailSide::Right => {
                    assert!((result.detail.left - bounds.right()).abs() < 1e-9);
                    assert!((result.detail.top - bounds.y).abs() < 1e-9);
                    let width_px = result.detail.width * viewport.width;
                    assert!(width_px <= DETAIL_MAX_WIDTH_PX + 1e-6);
                    assert_eq!(result.detail.extent, DetailExtent::Fraction(bounds.height));
                }
                DetailSide::Below => {
                    assert!((result.detail.left - bounds.x).abs() < 1e-9);
                    assert!((result.detail.top - bounds.bottom()).abs() < 1e-9);
                    assert!((result.detail.width - bounds.width).abs() < 1e-9);
                    assert_eq!(
                        result.detail.extent,
                        DetailExtent::MaxPx(DETAIL_BELOW_MAX_HEIGHT_PX)
                    );
                }
            }

            // The marker is always a direct mapping.
            assert!((result.primary.left - bounds.x).abs() < 1e-9);
            assert!((result.primary.top - bounds.y).abs() < 1e-9);
            assert!((result.primary.width - bounds.width).abs() < 1e-9);
            assert!((result.primary.height - bounds.height).abs() < 1e-9);
        }
    }
}

#[test]
fn recomputation_after_resize_is_consistent() {
    let bounds = BoundingBox::new(0.55, 0.2, 0.3, 0.25);
    let narrow = layout(&bounds, ViewportSize::new(800.0, 600.0));
    let wide = layout(&bounds, ViewportSize::new(3200.0, 600.0));

    assert_eq!(narrow.detail.side, DetailSide::Below);
    assert_eq!(wide.detail.side, DetailSide::Right);

    // Same viewport again gives the identical placement back.
    assert_eq!(narrow, layout(&bounds, ViewportSize::new(800.0, 600.0)));
}
