// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Persisted scroll state.

use crate::geom::Offset;

/// Scroll offset snapshot surviving an engine recreation.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
/// Both fields are required; a persisted payload missing either one fails to
/// deserialize, which is the rejection point for malformed state — the engine
/// itself only ever sees fully formed snapshots and is never mutated by a bad
/// payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SavedState {
    /// Horizontal scroll offset in layout space.
    pub scroll_offset_x: i32,
    /// Vertical scroll offset in layout space.
    pub scroll_offset_y: i32,
}

impl SavedState {
    /// Creates a snapshot from an offset.
    #[must_use]
    pub const fn from_offset(offset: Offset) -> Self {
        Self {
            scroll_offset_x: offset.x,
            scroll_offset_y: offset.y,
        }
    }

    /// Returns the snapshot as an offset.
    #[must_use]
    pub const fn offset(self) -> Offset {
        Offset::new(self.scroll_offset_x, self.scroll_offset_y)
    }
}
