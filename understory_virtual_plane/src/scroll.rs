// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll offset arithmetic: clamping, show-item resolution, and smooth-scroll
//! guidance vectors.

use kurbo::Vec2;

use crate::geom::{Offset, Rect};

/// Clamps a scroll position on one axis to `[0, scrollable - viewport]`.
///
/// When the content does not exceed the viewport on that axis the offset is
/// pinned to zero. Idempotent.
#[must_use]
pub fn clamp_axis(value: i32, scrollable_extent: i32, viewport_extent: i32) -> i32 {
    value.clamp(0, (scrollable_extent - viewport_extent).max(0))
}

/// Clamps a scroll offset to the valid range on both axes.
#[must_use]
pub fn clamp_offset(
    offset: Offset,
    scrollable_width: i32,
    scrollable_height: i32,
    viewport_width: i32,
    viewport_height: i32,
) -> Offset {
    Offset::new(
        clamp_axis(offset.x, scrollable_width, viewport_width),
        clamp_axis(offset.y, scrollable_height, viewport_height),
    )
}

/// Computes the minimal scroll offset that brings `item` fully into view.
///
/// Each axis is resolved independently: if the item starts before the
/// viewport's near edge the near edges are aligned; if it ends past the far
/// edge the far edges are aligned; otherwise the axis keeps the viewport's
/// current position. An item already fully visible therefore yields the
/// unchanged current offset.
#[must_use]
pub fn offset_to_show_item(item: Rect, viewport: Rect) -> Offset {
    let mut offset = Offset::new(viewport.x0, viewport.y0);
    if item.x0 < viewport.x0 {
        offset.x = item.x0;
    } else if item.x1 > viewport.x1 {
        offset.x = item.x1 - viewport.width();
    }
    if item.y0 < viewport.y0 {
        offset.y = item.y0;
    } else if item.y1 > viewport.y1 {
        offset.y = item.y1 - viewport.height();
    }
    offset
}

/// Normalized direction from one offset to another.
///
/// Returns [`Vec2::ZERO`] when `from == to`; a zero vector is a valid "no
/// movement" answer for animation drivers, not a failure.
#[must_use]
pub fn unit_vector(from: Offset, to: Offset) -> Vec2 {
    let vector = Vec2::new(f64::from(to.x - from.x), f64::from(to.y - from.y));
    let norm = vector.hypot();
    if norm == 0.0 { Vec2::ZERO } else { vector / norm }
}

#[cfg(test)]
mod tests {
    use kurbo::Vec2;

    use super::{clamp_axis, clamp_offset, offset_to_show_item, unit_vector};
    use crate::geom::{Offset, Rect};

    #[test]
    fn clamp_axis_pins_small_content_to_zero() {
        assert_eq!(clamp_axis(50, 400, 600), 0);
        assert_eq!(clamp_axis(-50, 400, 600), 0);
    }

    #[test]
    fn clamp_is_idempotent() {
        for value in [-100, 0, 350, 1399, 1400, 9000] {
            let once = clamp_axis(value, 2000, 600);
            assert_eq!(clamp_axis(once, 2000, 600), once, "clamp must be idempotent");
        }
    }

    #[test]
    fn clamp_offset_clamps_both_axes() {
        let clamped = clamp_offset(Offset::new(5000, -3), 2000, 2000, 800, 600);
        assert_eq!(clamped, Offset::new(1200, 0));
    }

    #[test]
    fn show_item_aligns_near_edge_when_item_is_before_viewport() {
        let viewport = Rect::new(500, 500, 1300, 1100);
        let item = Rect::new(100, 600, 300, 700);
        assert_eq!(offset_to_show_item(item, viewport), Offset::new(100, 500));
    }

    #[test]
    fn show_item_aligns_far_edge_when_item_is_past_viewport() {
        let viewport = Rect::new(0, 0, 800, 600);
        let item = Rect::new(1700, 100, 1900, 300);
        assert_eq!(offset_to_show_item(item, viewport), Offset::new(1100, 0));
    }

    #[test]
    fn show_item_keeps_offset_for_visible_item() {
        let viewport = Rect::new(200, 300, 1000, 900);
        let item = Rect::new(400, 400, 600, 500);
        assert_eq!(offset_to_show_item(item, viewport), Offset::new(200, 300));
    }

    #[test]
    fn unit_vector_is_normalized_or_zero() {
        assert_eq!(unit_vector(Offset::new(7, 7), Offset::new(7, 7)), Vec2::ZERO);
        let v = unit_vector(Offset::ZERO, Offset::new(3, 4));
        assert!((v.x - 0.6).abs() < 1e-12);
        assert!((v.y - 0.8).abs() < 1e-12);
        assert!((v.hypot() - 1.0).abs() < 1e-12);
    }
}
