// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout provider contract.
//!
//! The engine does not compute item placement itself; an external
//! [`LayoutProvider`] supplies the absolute rect of every item and the total
//! content extent. The trait is deliberately small: hosts typically wrap a
//! spatial index or a precomputed table, and the engine only asks for items
//! overlapping a query rect.

use alloc::vec::Vec;

use crate::geom::Rect;

/// Snapshot of the layout inputs a provider computed against.
///
/// This is the staleness key for the provider cache: whenever the current
/// viewport's layout space or the item count differs from the snapshot of the
/// last prepared layout, the provider must be prepared again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutSpace {
    /// Width of the layout space (viewport width minus horizontal padding).
    pub width: i32,
    /// Height of the layout space (viewport height minus vertical padding).
    pub height: i32,
    /// Number of items in the collection.
    pub item_count: usize,
}

impl LayoutSpace {
    /// Creates a new layout-space snapshot.
    #[must_use]
    pub const fn new(width: i32, height: i32, item_count: usize) -> Self {
        Self {
            width,
            height,
            item_count,
        }
    }
}

/// Absolute placement of a single item.
///
/// Returned by value; the engine never holds references into provider-owned
/// state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutAttribute {
    /// Position of the item in the collection.
    pub position: usize,
    /// Absolute rect of the item in layout space.
    pub rect: Rect,
}

impl LayoutAttribute {
    /// Creates layout attributes for the item at `position`.
    #[must_use]
    pub const fn new(position: usize, rect: Rect) -> Self {
        Self { position, rect }
    }
}

/// External strategy supplying item placement and content extent.
///
/// Queries take `&mut self` so implementations may build caches lazily.
/// All queries after [`LayoutProvider::prepare_layout`] must be consistent
/// with the prepared [`LayoutSpace`] until the next `prepare_layout` call.
///
/// Queries should be fast — ideally `O(overlapping items)` via a spatial
/// index, not `O(total items)` — since they run on every fill pass.
pub trait LayoutProvider {
    /// Recomputes internal layout for the given layout space.
    ///
    /// Called only when the engine detects the provider is stale.
    fn prepare_layout(&mut self, space: LayoutSpace);

    /// Total content width in layout space, valid after `prepare_layout`.
    fn scroll_content_width(&self) -> i32;

    /// Total content height in layout space, valid after `prepare_layout`.
    fn scroll_content_height(&self) -> i32;

    /// Returns all items overlapping `rect`.
    ///
    /// Order is irrelevant. Well-behaved providers return each position at
    /// most once; duplicates are tolerated but not deduplicated.
    fn layout_attributes_in_rect(&mut self, rect: Rect) -> Vec<LayoutAttribute>;

    /// Returns the placement of the item at `position`.
    ///
    /// Contract: `position` is less than the item count of the last prepared
    /// [`LayoutSpace`]; the engine checks the range before calling.
    fn layout_attribute_for_position(&mut self, position: usize) -> LayoutAttribute;
}
