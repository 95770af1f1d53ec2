// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`VirtualPlane`] controller.
//!
//! `VirtualPlane` owns a [`LayoutProvider`] plus all fill state: the current
//! scroll offset, the cached content extent, the filled rect, staleness
//! tracking, a pending scroll-to-position request, and the set of currently
//! materialized items. Hosts drive it from their scroll and layout hooks and
//! execute the returned [`FillCommands`] against their own view layer.

use alloc::vec::Vec;
use core::fmt::Debug;

use hashbrown::HashMap;
use kurbo::Vec2;

use crate::fill::{FillCommands, Placement, plan_fill};
use crate::geom::{Direction, Insets, Offset, Rect};
use crate::provider::{LayoutProvider, LayoutSpace};
use crate::scroll::{clamp_offset, offset_to_show_item, unit_vector};
use crate::state::SavedState;

/// Recoverable condition reported by a layout pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutWarning {
    /// A pending scroll-to-position target was beyond the item range and was
    /// dropped without moving the scroll offset.
    ScrollTargetOutOfRange {
        /// The requested target position.
        position: usize,
        /// The item count the layout was prepared with.
        item_count: usize,
    },
}

/// Result of one [`VirtualPlane::layout_children`] pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayoutPass {
    /// Materialization work for the host to execute.
    pub commands: FillCommands,
    /// Recoverable condition encountered during the pass, if any.
    pub warning: Option<LayoutWarning>,
}

/// Explicit smooth-scroll state machine.
///
/// Obtained from [`VirtualPlane::smooth_scroll_to_position`]. The host's
/// animation driver polls [`SmoothScroll::scroll_vector`] once per frame; the
/// resolution always runs against the plane's *current* scroll offset, so
/// guidance stays correct while the animation itself moves the viewport.
/// `None` means the target fell out of range and guidance has stopped; the
/// driver decides whether to finish or abort.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SmoothScroll {
    target_position: usize,
}

impl SmoothScroll {
    /// The position this scroll is heading toward.
    #[must_use]
    pub const fn target_position(self) -> usize {
        self.target_position
    }

    /// Normalized direction from the plane's current offset toward the target.
    ///
    /// Returns `Vec2::ZERO` once the target is fully in view, and `None` when
    /// the target position is no longer in range.
    #[must_use]
    pub fn scroll_vector<P: LayoutProvider>(self, plane: &mut VirtualPlane<P>) -> Option<Vec2> {
        let target = plane.scroll_offset_to_show_position(self.target_position)?;
        Some(unit_vector(plane.scroll_offset(), target))
    }
}

/// Viewport fill engine for a plane of absolutely positioned items.
///
/// See the [crate docs](crate) for the overall flow. All operations are
/// synchronous and complete on the caller's thread; the engine performs no
/// internal locking and expects hosts to serialize access.
pub struct VirtualPlane<P: LayoutProvider> {
    provider: P,
    provider_dirty: bool,
    prepared_space: LayoutSpace,
    viewport_width: i32,
    viewport_height: i32,
    insets: Insets,
    item_count: usize,
    scroll_offset: Offset,
    scroll_content_width: i32,
    scroll_content_height: i32,
    filled_rect: Rect,
    pending_scroll: Option<usize>,
    /// Materialized items by position, with their absolute rects.
    children: HashMap<usize, Rect>,
    needs_layout: bool,
}

impl<P: LayoutProvider> VirtualPlane<P> {
    /// Creates a plane over `provider` with a zero-sized viewport.
    ///
    /// The provider starts stale, so the first layout pass always prepares it.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            provider_dirty: true,
            prepared_space: LayoutSpace::default(),
            viewport_width: 0,
            viewport_height: 0,
            insets: Insets::ZERO,
            item_count: 0,
            scroll_offset: Offset::ZERO,
            scroll_content_width: 0,
            scroll_content_height: 0,
            filled_rect: Rect::ZERO,
            pending_scroll: None,
            children: HashMap::new(),
            needs_layout: true,
        }
    }

    /// Returns a shared reference to the layout provider.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns a mutable reference to the layout provider.
    ///
    /// Mutations that change item placement must be followed by
    /// [`VirtualPlane::invalidate_layout`] or one of the notify hooks so the
    /// next pass rebuilds from scratch.
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// Sets the viewport size and padding as reported by the host.
    ///
    /// A changed layout space is picked up as staleness on the next pass.
    pub fn set_viewport(&mut self, width: i32, height: i32, insets: Insets) {
        if self.viewport_width == width && self.viewport_height == height && self.insets == insets
        {
            return;
        }
        self.viewport_width = width;
        self.viewport_height = height;
        self.insets = insets;
        self.needs_layout = true;
    }

    /// Sets the number of items in the collection.
    ///
    /// A change is a structural change: the provider is marked stale and a
    /// layout pass is requested.
    pub fn set_item_count(&mut self, count: usize) {
        if self.item_count != count {
            self.item_count = count;
            self.provider_dirty = true;
            self.needs_layout = true;
        }
    }

    /// Explicitly requests a [`LayoutProvider::prepare_layout`] call on the
    /// next layout pass.
    ///
    /// Any structural change notification implies this.
    pub fn invalidate_layout(&mut self) {
        self.provider_dirty = true;
        self.needs_layout = true;
    }

    /// Notifies the engine that the item set changed structurally.
    pub fn notify_structure_changed(&mut self) {
        self.invalidate_layout();
    }

    /// Notifies the engine that item contents changed in place.
    ///
    /// Not a structural change, but placement may depend on content, so the
    /// layout is recomputed as well.
    pub fn notify_items_updated(&mut self) {
        self.invalidate_layout();
    }

    /// Returns `true` when a layout pass has been requested and not yet run.
    #[must_use]
    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    /// Current scroll offset.
    #[must_use]
    pub fn scroll_offset(&self) -> Offset {
        self.scroll_offset
    }

    /// The absolute-space region whose items are currently materialized.
    #[must_use]
    pub fn filled_rect(&self) -> Rect {
        self.filled_rect
    }

    /// Returns `true` if the content is wider than the layout space.
    #[must_use]
    pub fn can_scroll_horizontally(&self) -> bool {
        self.scroll_content_width > self.layout_space_width()
    }

    /// Returns `true` if the content is taller than the layout space.
    #[must_use]
    pub fn can_scroll_vertically(&self) -> bool {
        self.scroll_content_height > self.layout_space_height()
    }

    /// Horizontal scroll offset, for scrollbar rendering.
    #[must_use]
    pub fn horizontal_scroll_offset(&self) -> i32 {
        self.scroll_offset.x
    }

    /// Vertical scroll offset, for scrollbar rendering.
    #[must_use]
    pub fn vertical_scroll_offset(&self) -> i32 {
        self.scroll_offset.y
    }

    /// Horizontal scrollbar extent (the viewport width).
    #[must_use]
    pub fn horizontal_scroll_extent(&self) -> i32 {
        self.viewport_width
    }

    /// Vertical scrollbar extent (the viewport height).
    #[must_use]
    pub fn vertical_scroll_extent(&self) -> i32 {
        self.viewport_height
    }

    /// Horizontal scrollbar range (the scrollable width).
    #[must_use]
    pub fn horizontal_scroll_range(&self) -> i32 {
        self.scrollable_width()
    }

    /// Vertical scrollbar range (the scrollable height).
    #[must_use]
    pub fn vertical_scroll_range(&self) -> i32 {
        self.scrollable_height()
    }

    /// Scrolls horizontally by up to `dx`, filling toward the scrolled edge.
    ///
    /// The delta is silently clamped to the remaining scrollable distance;
    /// the actually applied delta is returned together with the
    /// materialization work. Hosts shift their child views by the negated
    /// applied delta before executing the commands.
    pub fn scroll_horizontally_by(&mut self, dx: i32) -> (i32, FillCommands) {
        let actual_dx = if dx > 0 {
            let remaining =
                (self.scrollable_width() - self.viewport_width - self.scroll_offset.x).max(0);
            dx.min(remaining)
        } else {
            -(-dx).min(self.scroll_offset.x)
        };
        self.scroll_offset.x += actual_dx;
        let direction = if dx < 0 {
            Direction::Left
        } else {
            Direction::Right
        };
        let commands = self.fill(self.visible_rect(), Some(direction));
        (actual_dx, commands)
    }

    /// Scrolls vertically by up to `dy`, filling toward the scrolled edge.
    ///
    /// See [`VirtualPlane::scroll_horizontally_by`].
    pub fn scroll_vertically_by(&mut self, dy: i32) -> (i32, FillCommands) {
        let actual_dy = if dy > 0 {
            let remaining =
                (self.scrollable_height() - self.viewport_height - self.scroll_offset.y).max(0);
            dy.min(remaining)
        } else {
            -(-dy).min(self.scroll_offset.y)
        };
        self.scroll_offset.y += actual_dy;
        let direction = if dy < 0 {
            Direction::Top
        } else {
            Direction::Bottom
        };
        let commands = self.fill(self.visible_rect(), Some(direction));
        (actual_dy, commands)
    }

    /// Scrolls by `(dx, dy)` as two sequential one-axis scrolls, horizontal
    /// first.
    ///
    /// Returns the total applied delta and a single batch equivalent to
    /// executing the two legs in sequence: placements are in child
    /// coordinates of the final offset, and a placement undone by the second
    /// leg never reaches the host. Hosts shift attached views by the negated
    /// total applied delta, then execute the batch.
    pub fn scroll_by(&mut self, dx: i32, dy: i32) -> (Offset, FillCommands) {
        let mut applied = Offset::ZERO;
        let mut commands = FillCommands::default();
        if dx != 0 {
            let (actual_dx, horizontal) = self.scroll_horizontally_by(dx);
            applied.x = actual_dx;
            commands = horizontal;
        }
        if dy != 0 {
            let (actual_dy, vertical) = self.scroll_vertically_by(dy);
            applied.y = actual_dy;
            // The horizontal leg placed its views before the vertical offset
            // moved; bring them into the final child space.
            for placement in &mut commands.place {
                placement.rect = placement.rect.translated(0, -actual_dy);
            }
            commands.merge(vertical);
        }
        (applied, commands)
    }

    /// Requests a jump to `position` on the next layout pass.
    ///
    /// At most one request is outstanding; a new one overwrites the old.
    pub fn scroll_to_position(&mut self, position: usize) {
        self.pending_scroll = Some(position);
        self.needs_layout = true;
    }

    /// Begins a smooth scroll toward `position`.
    ///
    /// Prepares the provider if it is stale so that per-frame vector polls
    /// resolve against current placement.
    pub fn smooth_scroll_to_position(&mut self, position: usize) -> SmoothScroll {
        self.prepare_provider();
        SmoothScroll {
            target_position: position,
        }
    }

    /// Resolves the minimal scroll offset that brings `position` fully into
    /// the layout space, or `None` when the position is out of range.
    pub fn scroll_offset_to_show_position(&mut self, position: usize) -> Option<Offset> {
        if position >= self.prepared_space.item_count {
            return None;
        }
        let attribute = self.provider.layout_attribute_for_position(position);
        let viewport = Rect::from_origin_size(
            self.scroll_offset.x,
            self.scroll_offset.y,
            self.layout_space_width(),
            self.layout_space_height(),
        );
        Some(offset_to_show_item(attribute.rect, viewport))
    }

    /// Runs one full layout pass.
    ///
    /// Prepares the provider if stale, resolves and clears any pending
    /// scroll-to-position request, clamps the scroll offset, then detaches
    /// everything and refills the visible rect from scratch.
    pub fn layout_children(&mut self) -> LayoutPass {
        self.needs_layout = false;
        self.prepare_provider();

        let mut warning = None;
        if let Some(position) = self.pending_scroll.take() {
            match self.scroll_offset_to_show_position(position) {
                Some(offset) => self.scroll_offset = offset,
                None => {
                    warning = Some(LayoutWarning::ScrollTargetOutOfRange {
                        position,
                        item_count: self.prepared_space.item_count,
                    });
                }
            }
        }
        self.normalize_scroll_offset();

        self.children.clear();
        self.filled_rect = Rect::ZERO;
        let mut commands = self.fill(self.visible_rect(), None);
        commands.detach_all = true;
        LayoutPass { commands, warning }
    }

    /// Captures the scroll offset for persistence.
    ///
    /// A pending scroll-to-position request is resolved to its target offset
    /// first when the position is still in range, so restoring lands where
    /// the jump would have.
    pub fn save_state(&mut self) -> SavedState {
        let mut offset = self.scroll_offset;
        if let Some(position) = self.pending_scroll
            && let Some(pending_offset) = self.scroll_offset_to_show_position(position)
        {
            offset = pending_offset;
        }
        SavedState::from_offset(offset)
    }

    /// Restores a previously captured scroll offset and requests a layout
    /// pass.
    ///
    /// The offset is clamped against the then-current layout during that
    /// pass, not here.
    pub fn restore_state(&mut self, state: SavedState) {
        self.scroll_offset = state.offset();
        self.needs_layout = true;
    }

    /// Visible rect in layout-provider coordinates, including the padding
    /// area.
    fn visible_rect(&self) -> Rect {
        Rect::from_origin_size(
            self.scroll_offset.x - self.insets.left,
            self.scroll_offset.y - self.insets.top,
            self.viewport_width,
            self.viewport_height,
        )
    }

    fn layout_space_width(&self) -> i32 {
        self.viewport_width - self.insets.left - self.insets.right
    }

    fn layout_space_height(&self) -> i32 {
        self.viewport_height - self.insets.top - self.insets.bottom
    }

    fn scrollable_width(&self) -> i32 {
        self.scroll_content_width + self.insets.left + self.insets.right
    }

    fn scrollable_height(&self) -> i32 {
        self.scroll_content_height + self.insets.top + self.insets.bottom
    }

    /// Converts an absolute layout rect to viewport-local child coordinates.
    fn to_child_space(&self, rect: Rect) -> Rect {
        rect.translated(
            -self.scroll_offset.x + self.insets.left,
            -self.scroll_offset.y + self.insets.top,
        )
    }

    fn normalize_scroll_offset(&mut self) {
        self.scroll_offset = clamp_offset(
            self.scroll_offset,
            self.scrollable_width(),
            self.scrollable_height(),
            self.viewport_width,
            self.viewport_height,
        );
    }

    /// Re-derives the provider's layout state when stale.
    ///
    /// This is the only path that can shrink the scrollable extent, so it
    /// always runs before offset clamping in a layout pass. Resetting the
    /// filled rect forces the next fill to take the full path; materialized
    /// children stay attached until that pass detaches them.
    fn prepare_provider(&mut self) {
        let space = LayoutSpace::new(
            self.layout_space_width(),
            self.layout_space_height(),
            self.item_count,
        );
        if space != self.prepared_space {
            self.provider_dirty = true;
        }
        if !self.provider_dirty {
            return;
        }
        self.filled_rect = Rect::ZERO;
        self.prepared_space = space;
        self.provider.prepare_layout(space);
        self.scroll_content_width = self.provider.scroll_content_width();
        self.scroll_content_height = self.provider.scroll_content_height();
        self.provider_dirty = false;
    }

    /// Reconciles the filled rect with `visible`, producing the commands for
    /// the host.
    ///
    /// Discarded positions come before placements so an item can never be
    /// materialized twice; items sharing only an edge with the exclude rect
    /// count as outside it and are re-fetched.
    fn fill(&mut self, visible: Rect, direction: Option<Direction>) -> FillCommands {
        let Some(plan) = plan_fill(self.filled_rect, visible, direction) else {
            return FillCommands::default();
        };

        let mut commands = FillCommands::default();
        if plan.incremental {
            let mut discard: Vec<usize> = self
                .children
                .iter()
                .filter(|(_, rect)| !rect.intersects(plan.filled_rect))
                .map(|(position, _)| *position)
                .collect();
            // Map iteration order is arbitrary; keep the command stream
            // deterministic.
            discard.sort_unstable();
            for position in &discard {
                self.children.remove(position);
            }
            commands.discard = discard;
        } else {
            commands.detach_all = true;
            self.children.clear();
        }

        for attribute in self.provider.layout_attributes_in_rect(plan.fetch_rect) {
            if let Some(exclude) = plan.exclude_rect
                && attribute.rect.intersects(exclude)
            {
                continue;
            }
            self.children.insert(attribute.position, attribute.rect);
            commands.place.push(Placement {
                position: attribute.position,
                rect: self.to_child_space(attribute.rect),
            });
        }

        self.filled_rect = plan.filled_rect;
        commands
    }
}

impl<P: LayoutProvider> Debug for VirtualPlane<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VirtualPlane")
            .field("scroll_offset", &self.scroll_offset)
            .field("filled_rect", &self.filled_rect)
            .field("materialized", &self.children.len())
            .field("provider_dirty", &self.provider_dirty)
            .field("pending_scroll", &self.pending_scroll)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use hashbrown::HashMap;
    use kurbo::Vec2;

    use super::{LayoutWarning, VirtualPlane};
    use crate::fill::FillCommands;
    use crate::geom::{Insets, Offset, Rect};
    use crate::provider::{LayoutAttribute, LayoutProvider, LayoutSpace};
    use crate::state::SavedState;

    /// Fixture provider over an explicit list of absolute rects.
    struct FixtureProvider {
        rects: Vec<Rect>,
        content_width: i32,
        content_height: i32,
        prepared: Vec<LayoutSpace>,
    }

    impl FixtureProvider {
        fn new(rects: Vec<Rect>, content_width: i32, content_height: i32) -> Self {
            Self {
                rects,
                content_width,
                content_height,
                prepared: Vec::new(),
            }
        }

        /// `cols x rows` grid of `cell_width x cell_height` items, row-major.
        fn grid(cols: i32, rows: i32, cell_width: i32, cell_height: i32) -> Self {
            let mut rects = Vec::new();
            for row in 0..rows {
                for col in 0..cols {
                    rects.push(Rect::from_origin_size(
                        col * cell_width,
                        row * cell_height,
                        cell_width,
                        cell_height,
                    ));
                }
            }
            Self::new(rects, cols * cell_width, rows * cell_height)
        }

        fn positions_in(&self, rect: Rect) -> Vec<usize> {
            let mut positions: Vec<usize> = self
                .rects
                .iter()
                .enumerate()
                .filter(|(_, r)| r.intersects(rect))
                .map(|(position, _)| position)
                .collect();
            positions.sort_unstable();
            positions
        }
    }

    impl LayoutProvider for FixtureProvider {
        fn prepare_layout(&mut self, space: LayoutSpace) {
            self.prepared.push(space);
        }

        fn scroll_content_width(&self) -> i32 {
            self.content_width
        }

        fn scroll_content_height(&self) -> i32 {
            self.content_height
        }

        fn layout_attributes_in_rect(&mut self, rect: Rect) -> Vec<LayoutAttribute> {
            self.rects
                .iter()
                .enumerate()
                .filter(|(_, r)| r.intersects(rect))
                .map(|(position, r)| LayoutAttribute::new(position, *r))
                .collect()
        }

        fn layout_attribute_for_position(&mut self, position: usize) -> LayoutAttribute {
            LayoutAttribute::new(position, self.rects[position])
        }
    }

    /// Host-side mirror of the view layer, driven purely by commands.
    #[derive(Default)]
    struct HostViews {
        views: HashMap<usize, Rect>,
    }

    impl HostViews {
        fn apply(&mut self, commands: &FillCommands) {
            if commands.detach_all {
                self.views.clear();
            }
            for position in &commands.discard {
                assert!(
                    self.views.remove(position).is_some(),
                    "discard command for a view the host does not have"
                );
            }
            for placement in &commands.place {
                let replaced = self.views.insert(placement.position, placement.rect);
                assert!(replaced.is_none(), "item materialized twice");
            }
        }

        fn positions(&self) -> Vec<usize> {
            let mut positions: Vec<usize> = self.views.keys().copied().collect();
            positions.sort_unstable();
            positions
        }
    }

    /// 10x10 grid of 200x200 cells (2000x2000 content) in an 800x600 viewport.
    fn grid_plane() -> VirtualPlane<FixtureProvider> {
        let mut plane = VirtualPlane::new(FixtureProvider::grid(10, 10, 200, 200));
        plane.set_viewport(800, 600, Insets::ZERO);
        plane.set_item_count(100);
        plane
    }

    #[test]
    fn first_layout_fills_the_maximum_rect() {
        let mut plane = grid_plane();
        assert!(plane.needs_layout());
        let pass = plane.layout_children();
        assert!(!plane.needs_layout());
        assert!(pass.commands.detach_all);
        assert_eq!(pass.warning, None);
        assert_eq!(plane.filled_rect(), Rect::new(-132, -99, 932, 699));
        // Columns 0..=4 overlap x < 932, rows 0..=3 overlap y < 699.
        assert_eq!(pass.commands.place.len(), 20);
        // Placements are in child coordinates; item 0 sits at the origin.
        let first = pass
            .commands
            .place
            .iter()
            .find(|p| p.position == 0)
            .unwrap();
        assert_eq!(first.rect, Rect::new(0, 0, 200, 200));
    }

    #[test]
    fn scroll_never_leaves_the_valid_range() {
        let mut plane = grid_plane();
        plane.layout_children();

        let (applied, _) = plane.scroll_by(-100, -100);
        assert_eq!(applied, Offset::ZERO);
        assert_eq!(plane.scroll_offset(), Offset::ZERO);

        let (applied, _) = plane.scroll_by(5000, 50);
        assert_eq!(applied, Offset::new(1200, 50));
        assert_eq!(plane.scroll_offset(), Offset::new(1200, 50));

        let (applied, _) = plane.scroll_by(0, 5000);
        assert_eq!(applied, Offset::new(0, 1350));
        assert_eq!(plane.scroll_offset(), Offset::new(1200, 1400));
    }

    #[test]
    fn small_scrolls_inside_the_margin_are_free() {
        let mut plane = grid_plane();
        plane.layout_children();
        for _ in 0..5 {
            let (applied, commands) = plane.scroll_by(20, 10);
            assert_eq!(applied, Offset::new(20, 10));
            assert!(commands.is_empty(), "scroll inside the margin must not fetch");
        }
    }

    #[test]
    fn incremental_and_full_fills_converge() {
        let mut plane = grid_plane();
        let mut host = HostViews::default();
        host.apply(&plane.layout_children().commands);

        // Each step exceeds the 132/99 margin on the axis it moves, so every
        // step goes through a fill.
        for (dx, dy) in [(300, 0), (0, 200), (500, 150), (-250, 0), (0, -120)] {
            let (_, commands) = plane.scroll_by(dx, dy);
            host.apply(&commands);
        }

        let offset = plane.scroll_offset();
        let visible = Rect::from_origin_size(offset.x, offset.y, 800, 600);
        let expected = plane.provider().positions_in(visible.expanded(0.33));
        assert_eq!(host.positions(), expected);
        assert_eq!(plane.filled_rect(), visible.expanded(0.33));
    }

    #[test]
    fn full_refill_on_one_axis_supersedes_the_other_axis_in_the_batch() {
        let mut plane = grid_plane();
        let mut host = HostViews::default();
        host.apply(&plane.layout_children().commands);

        // The horizontal leg extends incrementally, then the vertical leg
        // jumps past the margin and rebuilds from scratch. The merged batch
        // must detach the horizontal leg's placements along with everything
        // else instead of letting them survive on the host.
        let (applied, commands) = plane.scroll_by(300, 1400);
        assert_eq!(applied, Offset::new(300, 1400));
        assert!(commands.detach_all);
        host.apply(&commands);

        // Rows 6..=9 by columns 0..=6 overlap the filled rect (168,1301)-(1232,2099).
        let expected = plane.provider().positions_in(plane.filled_rect());
        assert_eq!(expected.len(), 28);
        assert_eq!(host.positions(), expected);
    }

    #[test]
    fn combined_scroll_places_in_final_child_coordinates() {
        let mut plane = grid_plane();
        let mut host = HostViews::default();
        host.apply(&plane.layout_children().commands);

        // Both legs extend incrementally; the horizontal leg's placements are
        // computed before the vertical offset moves and must come out shifted
        // into the final child space.
        let (applied, commands) = plane.scroll_by(150, 150);
        assert_eq!(applied, Offset::new(150, 150));
        assert!(!commands.detach_all);
        host.apply(&commands);

        // Item 5 (column 5, row 0) came from the horizontal slab; its absolute
        // rect (1000,0)-(1200,200) lands at the final offset (150,150).
        let col5 = commands.place.iter().find(|p| p.position == 5).unwrap();
        assert_eq!(col5.rect, Rect::new(850, -150, 1050, 50));
        // Item 40 (column 0, row 4) came from the vertical slab.
        let row4 = commands.place.iter().find(|p| p.position == 40).unwrap();
        assert_eq!(row4.rect, Rect::new(-150, 650, 50, 850));

        let expected = plane.provider().positions_in(plane.filled_rect());
        assert_eq!(expected.len(), 30);
        assert_eq!(host.positions(), expected);
    }

    #[test]
    fn scroll_to_position_resolves_on_the_next_pass() {
        let mut rects = Vec::new();
        for i in 0..10 {
            rects.push(Rect::from_origin_size(i * 100, 1500, 100, 100));
        }
        // Item 5 far to the right, partially relevant on x only.
        rects[5] = Rect::new(1700, 100, 1900, 300);
        let mut plane = VirtualPlane::new(FixtureProvider::new(rects, 2000, 2000));
        plane.set_viewport(800, 600, Insets::ZERO);
        plane.set_item_count(10);
        plane.layout_children();

        plane.scroll_to_position(5);
        assert!(plane.needs_layout());
        let pass = plane.layout_children();
        assert_eq!(pass.warning, None);
        // Far edges align on x (1900 - 800); y is already inside the viewport.
        assert_eq!(plane.scroll_offset(), Offset::new(1100, 0));
    }

    #[test]
    fn out_of_range_scroll_target_is_dropped_with_a_warning() {
        let mut plane = grid_plane();
        plane.layout_children();
        plane.scroll_to_position(500);
        let pass = plane.layout_children();
        assert_eq!(
            pass.warning,
            Some(LayoutWarning::ScrollTargetOutOfRange {
                position: 500,
                item_count: 100,
            })
        );
        assert_eq!(plane.scroll_offset(), Offset::ZERO);
    }

    #[test]
    fn newer_scroll_request_overwrites_the_pending_one() {
        let mut plane = grid_plane();
        plane.layout_children();
        plane.scroll_to_position(99);
        plane.scroll_to_position(0);
        let pass = plane.layout_children();
        assert_eq!(pass.warning, None);
        assert_eq!(plane.scroll_offset(), Offset::ZERO);
    }

    #[test]
    fn invalidate_layout_forces_a_prepare_and_full_refill() {
        let mut plane = grid_plane();
        plane.layout_children();
        assert_eq!(plane.provider().prepared.len(), 1);

        // Clean pass: no new prepare.
        plane.layout_children();
        assert_eq!(plane.provider().prepared.len(), 1);

        plane.invalidate_layout();
        let pass = plane.layout_children();
        assert_eq!(plane.provider().prepared.len(), 2);
        assert!(pass.commands.detach_all);
    }

    #[test]
    fn viewport_resize_is_detected_as_staleness() {
        let mut plane = grid_plane();
        plane.layout_children();
        plane.set_viewport(1024, 768, Insets::ZERO);
        plane.layout_children();
        assert_eq!(plane.provider().prepared.len(), 2);
        assert_eq!(
            plane.provider().prepared[1],
            LayoutSpace::new(1024, 768, 100)
        );
    }

    #[test]
    fn shrinking_content_clamps_the_offset_before_filling() {
        let mut plane = grid_plane();
        plane.layout_children();
        plane.scroll_by(1200, 1400);
        assert_eq!(plane.scroll_offset(), Offset::new(1200, 1400));

        // Replace the layout with a 2x2 grid; the old offset is far outside.
        *plane.provider_mut() = FixtureProvider::grid(2, 2, 200, 200);
        plane.set_item_count(4);
        plane.layout_children();
        assert_eq!(plane.scroll_offset(), Offset::ZERO);
    }

    #[test]
    fn padding_offsets_child_placement_and_extends_the_range() {
        let mut plane = VirtualPlane::new(FixtureProvider::grid(10, 10, 200, 200));
        plane.set_viewport(800, 600, Insets::new(10, 20, 10, 20));
        plane.set_item_count(100);
        let pass = plane.layout_children();
        let first = pass
            .commands
            .place
            .iter()
            .find(|p| p.position == 0)
            .unwrap();
        assert_eq!(first.rect, Rect::new(10, 20, 210, 220));
        assert_eq!(plane.horizontal_scroll_range(), 2020);
        assert_eq!(plane.vertical_scroll_range(), 2040);
        assert_eq!(
            plane.provider().prepared[0],
            LayoutSpace::new(780, 560, 100)
        );
    }

    #[test]
    fn scrollbar_accessors_report_offset_extent_and_range() {
        let mut plane = grid_plane();
        plane.layout_children();
        plane.scroll_by(400, 300);
        assert_eq!(plane.horizontal_scroll_offset(), 400);
        assert_eq!(plane.vertical_scroll_offset(), 300);
        assert_eq!(plane.horizontal_scroll_extent(), 800);
        assert_eq!(plane.vertical_scroll_extent(), 600);
        assert_eq!(plane.horizontal_scroll_range(), 2000);
        assert_eq!(plane.vertical_scroll_range(), 2000);
        assert!(plane.can_scroll_horizontally());
        assert!(plane.can_scroll_vertically());
    }

    #[test]
    fn save_state_resolves_a_pending_scroll() {
        let mut plane = grid_plane();
        plane.layout_children();
        plane.scroll_to_position(99);
        let state = plane.save_state();
        // Item 99 spans (1800,1800)-(2000,2000); far edges align.
        assert_eq!(state, SavedState::from_offset(Offset::new(1200, 1400)));
        // The pending request itself is kept for the next pass.
        assert!(plane.needs_layout());
    }

    #[test]
    fn restore_state_adopts_the_offset_and_requests_layout() {
        let mut plane = grid_plane();
        plane.layout_children();
        plane.restore_state(SavedState::from_offset(Offset::new(600, 400)));
        assert!(plane.needs_layout());
        plane.layout_children();
        assert_eq!(plane.scroll_offset(), Offset::new(600, 400));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn malformed_persisted_state_is_rejected_at_the_boundary() {
        let mut plane = grid_plane();
        plane.layout_children();
        plane.scroll_by(300, 0);
        let offset_before = plane.scroll_offset();

        let malformed = serde_json::from_str::<SavedState>(r#"{"scroll_offset_x": 40}"#);
        assert!(malformed.is_err(), "missing field must fail to deserialize");
        // Nothing reached the engine.
        assert_eq!(plane.scroll_offset(), offset_before);
        assert!(!plane.needs_layout());

        let state: SavedState =
            serde_json::from_str(r#"{"scroll_offset_x": 40, "scroll_offset_y": 70}"#).unwrap();
        plane.restore_state(state);
        plane.layout_children();
        assert_eq!(plane.scroll_offset(), Offset::new(40, 70));
    }

    #[test]
    fn smooth_scroll_vector_points_at_the_target() {
        let mut plane = grid_plane();
        plane.layout_children();
        let scroll = plane.smooth_scroll_to_position(9);
        assert_eq!(scroll.target_position(), 9);
        // Item 9 spans (1800,0)-(2000,200): due right of the viewport.
        assert_eq!(scroll.scroll_vector(&mut plane), Some(Vec2::new(1.0, 0.0)));

        // Once the target is in view the vector collapses to zero.
        plane.scroll_by(1200, 0);
        assert_eq!(scroll.scroll_vector(&mut plane), Some(Vec2::ZERO));
    }

    #[test]
    fn smooth_scroll_guidance_stops_when_the_target_leaves_range() {
        let mut plane = grid_plane();
        plane.layout_children();
        let scroll = plane.smooth_scroll_to_position(99);
        assert!(scroll.scroll_vector(&mut plane).is_some());

        plane.provider_mut().rects.truncate(10);
        plane.provider_mut().content_width = 2000;
        plane.provider_mut().content_height = 200;
        plane.set_item_count(10);
        plane.layout_children();
        assert_eq!(scroll.scroll_vector(&mut plane), None);
    }

    #[test]
    fn edge_scroll_with_zero_applied_delta_still_reports_direction_fill() {
        let mut plane = grid_plane();
        plane.layout_children();
        // At the left edge a further left scroll applies nothing and the
        // filled rect already covers the minimum rect.
        let (applied, commands) = plane.scroll_horizontally_by(-40);
        assert_eq!(applied, 0);
        assert!(commands.is_empty());
    }
}
