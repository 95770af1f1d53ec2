// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer plane geometry used by the fill engine.
//!
//! Layout space is measured in integer units (typically device pixels), so the
//! crate defines its own axis-aligned [`Rect`] over `i32` rather than reusing a
//! floating-point rectangle type. The API shape follows kurbo conventions
//! (`x0`/`y0`/`x1`/`y1`, min corner first).

/// Axis-aligned integer rectangle.
///
/// Invariant: `x0 <= x1` and `y0 <= y1` for all rects produced by this crate.
/// A rect with zero width or height on either axis is *empty*; empty rects
/// intersect nothing and act as identity elements for [`Rect::union`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Minimum x coordinate (left edge).
    pub x0: i32,
    /// Minimum y coordinate (top edge).
    pub y0: i32,
    /// Maximum x coordinate (right edge).
    pub x1: i32,
    /// Maximum y coordinate (bottom edge).
    pub y1: i32,
}

impl Rect {
    /// The empty rect at the origin.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Creates a new rect from edge coordinates.
    #[must_use]
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Creates a new rect from its min corner and size.
    #[must_use]
    pub const fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Returns the width of the rect.
    #[must_use]
    pub const fn width(self) -> i32 {
        self.x1 - self.x0
    }

    /// Returns the height of the rect.
    #[must_use]
    pub const fn height(self) -> i32 {
        self.y1 - self.y0
    }

    /// Returns `true` if the rect has zero area.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// Returns `true` if `self` and `other` overlap with positive area.
    ///
    /// Rects that merely share an edge (zero-width overlap) do not intersect.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }

    /// Returns `true` if `inner` lies entirely within `self`.
    ///
    /// Containment is inclusive of shared edges, and an empty `inner` inside
    /// `self`'s bounds is contained.
    #[must_use]
    pub const fn contains_rect(self, inner: Self) -> bool {
        self.x0 <= inner.x0 && self.y0 <= inner.y0 && inner.x1 <= self.x1 && inner.y1 <= self.y1
    }

    /// Returns the smallest rect covering both `self` and `other`.
    ///
    /// Empty rects are identity elements: the union with an empty rect is the
    /// other operand, regardless of where the empty rect sits.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Self::new(
            self.x0.min(other.x0),
            self.y0.min(other.y0),
            self.x1.max(other.x1),
            self.y1.max(other.y1),
        )
    }

    /// Returns the overlap of `self` and `other`, or `None` when they do not
    /// intersect with positive area.
    #[must_use]
    pub fn intersection(self, other: Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }
        Some(Self::new(
            self.x0.max(other.x0),
            self.y0.max(other.y0),
            self.x1.min(other.x1),
            self.y1.min(other.y1),
        ))
    }

    /// Grows the rect symmetrically by `round(extent * scale)` on each axis,
    /// half per side, keeping it centered on the original.
    ///
    /// Rounding: both the scaled delta and the half-delta origin shift use
    /// [`f64::round`], i.e. ties round away from zero. The origin shift can be
    /// a negative tie, so a half-up rule would differ there.
    #[must_use]
    pub fn expanded(self, scale: f64) -> Self {
        let delta_width = (f64::from(self.width()) * scale).round();
        let delta_height = (f64::from(self.height()) * scale).round();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "Scaled extents of on-screen rects are far below i32 range"
        )]
        let (x, y, dw, dh) = (
            (f64::from(self.x0) - delta_width / 2.0).round() as i32,
            (f64::from(self.y0) - delta_height / 2.0).round() as i32,
            delta_width as i32,
            delta_height as i32,
        );
        Self::from_origin_size(x, y, self.width() + dw, self.height() + dh)
    }

    /// Returns the slab of `maximum` lying strictly beyond `self` in the given
    /// direction, spanning `maximum`'s extent on that axis and `self`'s extent
    /// on the other.
    ///
    /// Returns [`Rect::ZERO`] when `self` and `maximum` do not intersect, in
    /// which case there is no adjacent slab to extend into.
    #[must_use]
    pub fn slab_toward(self, maximum: Self, direction: Direction) -> Self {
        if !self.intersects(maximum) {
            return Self::ZERO;
        }
        match direction {
            Direction::Left => Self::new(maximum.x0, self.y0, self.x0 - 1, self.y1),
            Direction::Top => Self::new(self.x0, maximum.y0, self.x1, self.y0 - 1),
            Direction::Right => Self::new(self.x1 + 1, self.y0, maximum.x1, self.y1),
            Direction::Bottom => Self::new(self.x0, self.y1 + 1, self.x1, maximum.y1),
        }
    }

    /// Returns the rect moved by `(dx, dy)`.
    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x0 + dx, self.y0 + dy, self.x1 + dx, self.y1 + dy)
    }
}

/// Integer point in absolute layout space, used for scroll offsets and deltas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    /// Horizontal component.
    pub x: i32,
    /// Vertical component.
    pub y: i32,
}

impl Offset {
    /// The zero offset.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a new offset.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Padding between the viewport edges and its content area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Insets {
    /// Left padding.
    pub left: i32,
    /// Top padding.
    pub top: i32,
    /// Right padding.
    pub right: i32,
    /// Bottom padding.
    pub bottom: i32,
}

impl Insets {
    /// Zero padding on all sides.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Creates new insets.
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// Edge of the filled rect a scroll is currently extending toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Scrolling toward smaller x.
    Left,
    /// Scrolling toward smaller y.
    Top,
    /// Scrolling toward larger x.
    Right,
    /// Scrolling toward larger y.
    Bottom,
}
