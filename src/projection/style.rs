use crate::foundation::core::{Affine, ElementId, Point, Rect, Vec2};
use crate::state::model::{CanvasGeometry, ElementTransform};

/// Radius of the progress ring in its 240-unit design box.
pub const RING_RADIUS: f64 = 110.0;

pub fn ring_circumference() -> f64 {
    2.0 * std::f64::consts::PI * RING_RADIUS
}

/// Stroke dash offset that reveals `progress` of the ring.
pub fn ring_dash_offset(progress: f64) -> f64 {
    let c = ring_circumference();
    c - progress.clamp(0.0, 1.0) * c
}

/// Resolved placement for one element.
///
/// Local coordinates are centered on the element with its estimated size; `transform` maps them
/// into canvas pixels and `clip` is the visible part in local coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ElementStyle {
    pub transform: Affine,
    pub opacity: f64,
    pub clip: Rect,
    /// Selection outline. Not part of the animation data and never captured on export.
    pub outlined: bool,
}

/// Uncropped local box of an element, centered on its origin.
pub fn local_bounds(id: ElementId) -> Rect {
    let size = id.size_estimate();
    Rect::from_center_size(Point::ORIGIN, (size.x, size.y))
}

pub fn element_style(
    id: ElementId,
    t: &ElementTransform,
    canvas: &CanvasGeometry,
    selected: bool,
) -> ElementStyle {
    let center = Vec2::new(f64::from(canvas.width) / 2.0, f64::from(canvas.height) / 2.0);
    let transform = Affine::translate(center + Vec2::new(t.x, t.y)) * Affine::scale(t.scale);

    let full = local_bounds(id);
    let x0 = full.x0 + t.crop.left;
    let y0 = full.y0 + t.crop.top;
    let x1 = (full.x1 - t.crop.right).max(x0);
    let y1 = (full.y1 - t.crop.bottom).max(y0);

    ElementStyle {
        transform,
        opacity: t.opacity.clamp(0.0, 1.0),
        clip: Rect::new(x0, y0, x1, y1),
        outlined: selected,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/projection/style.rs"]
mod tests;
