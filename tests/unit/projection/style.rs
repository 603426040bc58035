use super::*;
use crate::foundation::core::Point;
use crate::state::model::Crop;

#[test]
fn dash_offset_spans_full_circumference() {
    let c = ring_circumference();
    assert_eq!(ring_dash_offset(0.0), c);
    assert_eq!(ring_dash_offset(1.0), 0.0);
    assert!((ring_dash_offset(0.25) - 0.75 * c).abs() < 1e-9);
    assert_eq!(ring_dash_offset(2.0), 0.0);
}

#[test]
fn transform_translates_from_canvas_center_then_scales() {
    let canvas = CanvasGeometry::default();
    let t = ElementTransform::at(10.0, -20.0, 2.0, 0.5);
    let s = element_style(ElementId::Countdown, &t, &canvas, false);
    let origin = s.transform * Point::ORIGIN;
    assert_eq!(origin, Point::new(190.0, 300.0));
    let corner = s.transform * Point::new(1.0, 1.0);
    assert_eq!(corner, Point::new(192.0, 302.0));
    assert_eq!(s.opacity, 0.5);
    assert!(!s.outlined);
}

#[test]
fn crop_insets_the_local_bounds() {
    let canvas = CanvasGeometry::default();
    let t = ElementTransform {
        crop: Crop {
            top: 10.0,
            right: 20.0,
            bottom: 0.0,
            left: 5.0,
        },
        ..ElementTransform::default()
    };
    let s = element_style(ElementId::Ring, &t, &canvas, true);
    assert_eq!(s.clip, Rect::new(-145.0, -140.0, 130.0, 150.0));
    assert!(s.outlined);
}

#[test]
fn oversized_crop_collapses_to_empty() {
    let canvas = CanvasGeometry::default();
    let t = ElementTransform {
        crop: Crop {
            left: 400.0,
            ..Crop::default()
        },
        ..ElementTransform::default()
    };
    let s = element_style(ElementId::Percentage, &t, &canvas, false);
    assert!(s.clip.width() <= 0.0);
}

#[test]
fn uncropped_clip_equals_local_bounds() {
    let canvas = CanvasGeometry::default();
    let s = element_style(ElementId::Status, &ElementTransform::default(), &canvas, false);
    assert_eq!(s.clip, local_bounds(ElementId::Status));
    assert_eq!(local_bounds(ElementId::Ring), Rect::new(-150.0, -150.0, 150.0, 150.0));
}
