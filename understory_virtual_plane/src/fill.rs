// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental fill planning.
//!
//! Given the currently filled rect and the visible rect, [`plan_fill`] decides
//! whether anything needs to happen at all, and if so whether the filled
//! region can be extended by a single slab in the scroll direction or must be
//! rebuilt from scratch. The plan is pure data; executing it (querying the
//! provider, producing [`FillCommands`]) is the controller's job.

use alloc::vec::Vec;

use crate::geom::{Direction, Rect};

/// Scale factor for the rect that must be covered before a fill pass can be
/// skipped. Zero means the viewport itself.
pub const MINIMUM_FILL_SCALE_FACTOR: f64 = 0.0;

/// Scale factor for the look-ahead margin filled around the viewport.
///
/// One third of the viewport extent per axis, split across both sides.
pub const MAXIMUM_FILL_SCALE_FACTOR: f64 = 0.33;

/// Decision produced by [`plan_fill`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FillPlan {
    /// Rect whose overlapping items should be fetched from the provider.
    pub fetch_rect: Rect,
    /// Items overlapping this rect are already materialized and are skipped
    /// during the fetch. `None` on the full path (everything was detached).
    pub exclude_rect: Option<Rect>,
    /// The filled rect after executing the plan.
    pub filled_rect: Rect,
    /// `true` when only the newly exposed slab is fetched.
    pub incremental: bool,
}

/// Decides how to reconcile the filled rect with the visible rect.
///
/// Returns `None` when the filled rect already covers the minimum rect and no
/// work is needed — the common case while scrolling well inside the
/// materialized margin.
///
/// # Panics
///
/// Panics if the incremental path's shrink-to-maximum intersection is empty.
/// Both rects are derived to overlap whenever the incremental union covers the
/// minimum rect, so an empty intersection means the fill invariant itself is
/// broken.
#[must_use]
pub fn plan_fill(filled: Rect, visible: Rect, direction: Option<Direction>) -> Option<FillPlan> {
    let minimum = visible.expanded(MINIMUM_FILL_SCALE_FACTOR);
    if filled.contains_rect(minimum) {
        return None;
    }

    let maximum = visible.expanded(MAXIMUM_FILL_SCALE_FACTOR);
    if let Some(direction) = direction {
        let slab = filled.slab_toward(maximum, direction);
        let incrementally_filled = filled.union(slab);
        if incrementally_filled.contains_rect(minimum) {
            let Some(new_filled) = incrementally_filled.intersection(maximum) else {
                panic!("incrementally filled rect does not overlap the maximum fill rect");
            };
            return Some(FillPlan {
                fetch_rect: slab,
                exclude_rect: Some(filled),
                filled_rect: new_filled,
                incremental: true,
            });
        }
    }

    Some(FillPlan {
        fetch_rect: maximum,
        exclude_rect: None,
        filled_rect: maximum,
        incremental: false,
    })
}

/// Child placement instruction for the host's view layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Position of the item to obtain a view for.
    pub position: usize,
    /// Viewport-local rect; the view is sized to the rect's exact extent and
    /// laid out at its coordinates.
    pub rect: Rect,
}

/// Materialization work produced by one fill pass, in execution order.
///
/// Hosts apply the commands in field order: detach everything if requested,
/// recycle the discarded positions, then create and place the listed views.
/// Discard always precedes placement, so an item can never be materialized
/// twice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FillCommands {
    /// When `true`, every currently materialized view is detached before any
    /// placement happens (full rebuild path).
    pub detach_all: bool,
    /// Positions whose views scrolled out of the filled rect and should be
    /// recycled. Empty on the full path.
    pub discard: Vec<usize>,
    /// Views to create and place, in provider-returned order.
    pub place: Vec<Placement>,
}

impl FillCommands {
    /// Returns `true` when the pass produced no work.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.detach_all && self.discard.is_empty() && self.place.is_empty()
    }

    /// Folds a later pass's commands into this batch so that applying the
    /// merged batch once has the same effect as applying the two in sequence.
    ///
    /// A later `detach_all` supersedes everything before it. A later discard
    /// of a position this batch placed cancels against that placement: the
    /// host never held the view, so it must see neither command.
    pub(crate) fn merge(&mut self, other: Self) {
        if other.detach_all {
            *self = other;
            return;
        }
        let mut discard = other.discard;
        self.place.retain(|placement| {
            if let Some(index) = discard.iter().position(|d| *d == placement.position) {
                discard.remove(index);
                false
            } else {
                true
            }
        });
        self.discard.extend(discard);
        self.place.extend(other.place);
    }
}
