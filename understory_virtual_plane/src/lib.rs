// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_virtual_plane --heading-base-level=0

//! Understory Virtual Plane: core 2D virtualization primitives.
//!
//! This crate provides a small, renderer-agnostic core for virtualizing a
//! large collection of absolutely positioned items inside a scrollable
//! viewport: only items intersecting (or near) the visible area are
//! materialized, everything else is discarded and recreated on demand. It is
//! the 2D sibling of `understory_virtual_list`, for layouts where items sit at
//! arbitrary rects in a plane rather than in a dense index strip.
//!
//! The core concepts are:
//!
//! - [`Rect`], [`Offset`], [`Insets`]: integer plane geometry.
//! - [`LayoutProvider`]: a trait describing the external layout strategy —
//!   item rects and total content extent.
//! - [`plan_fill`]: the decision procedure that tracks which region of layout
//!   space is materialized (the *filled rect*) and chooses between extending
//!   it by one slab in the scroll direction and rebuilding it from scratch.
//! - [`VirtualPlane`]: the controller wrapping a [`LayoutProvider`], scroll
//!   state, viewport geometry, and the materialized set. Scroll and layout
//!   entry points return [`FillCommands`] for the host to execute against its
//!   own view layer.
//!
//! This crate deliberately does **not** know about widgets, display trees, or
//! any particular UI framework. Host frameworks are responsible for:
//!
//! - Owning the actual view/widget instances and recycling pools.
//! - Shifting attached views by the negated applied delta after a scroll.
//! - Executing [`FillCommands`] in order: detach, discard, then place.
//! - Running [`VirtualPlane::layout_children`] whenever
//!   [`VirtualPlane::needs_layout`] reports a pending pass.
//!
//! ## Minimal example
//!
//! A provider with three fixed items on a plane:
//!
//! ```rust
//! use understory_virtual_plane::{
//!     Insets, LayoutAttribute, LayoutProvider, LayoutSpace, Rect, VirtualPlane,
//! };
//!
//! struct ThreeItems;
//!
//! impl LayoutProvider for ThreeItems {
//!     fn prepare_layout(&mut self, _space: LayoutSpace) {}
//!     fn scroll_content_width(&self) -> i32 {
//!         2000
//!     }
//!     fn scroll_content_height(&self) -> i32 {
//!         1000
//!     }
//!     fn layout_attributes_in_rect(&mut self, rect: Rect) -> Vec<LayoutAttribute> {
//!         self.rects()
//!             .into_iter()
//!             .filter(|a| a.rect.intersects(rect))
//!             .collect()
//!     }
//!     fn layout_attribute_for_position(&mut self, position: usize) -> LayoutAttribute {
//!         self.rects()[position]
//!     }
//! }
//!
//! impl ThreeItems {
//!     fn rects(&self) -> Vec<LayoutAttribute> {
//!         vec![
//!             LayoutAttribute::new(0, Rect::new(0, 0, 300, 300)),
//!             LayoutAttribute::new(1, Rect::new(600, 100, 900, 400)),
//!             LayoutAttribute::new(2, Rect::new(1500, 500, 1900, 900)),
//!         ]
//!     }
//! }
//!
//! let mut plane = VirtualPlane::new(ThreeItems);
//! plane.set_viewport(800, 600, Insets::ZERO);
//! plane.set_item_count(3);
//!
//! // First pass materializes items 0 and 1; item 2 is outside the margin.
//! let pass = plane.layout_children();
//! assert!(pass.commands.detach_all);
//! assert_eq!(pass.commands.place.len(), 2);
//!
//! // Scrolling far to the right brings item 2 in.
//! let (applied, commands) = plane.scroll_by(1100, 300);
//! assert_eq!((applied.x, applied.y), (1100, 300));
//! assert!(commands.place.iter().any(|p| p.position == 2));
//! ```
//!
//! Scroll-to-position requests ([`VirtualPlane::scroll_to_position`]) are
//! deferred and resolved on the next layout pass; smooth scrolls
//! ([`VirtualPlane::smooth_scroll_to_position`]) hand the host's animation
//! driver a per-frame unit vector instead. The scroll offset survives engine
//! recreation via [`SavedState`].
//!
//! All coordinates live in integer layout-space units (typically device
//! pixels). This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod fill;
mod geom;
mod plane;
mod provider;
mod scroll;
mod state;

pub use fill::{
    FillCommands, FillPlan, MAXIMUM_FILL_SCALE_FACTOR, MINIMUM_FILL_SCALE_FACTOR, Placement,
    plan_fill,
};
pub use geom::{Direction, Insets, Offset, Rect};
pub use plane::{LayoutPass, LayoutWarning, SmoothScroll, VirtualPlane};
pub use provider::{LayoutAttribute, LayoutProvider, LayoutSpace};
pub use scroll::{clamp_axis, clamp_offset, offset_to_show_item, unit_vector};
pub use state::SavedState;
