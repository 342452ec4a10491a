//! Property-based tests for scroll geometry and the rendered window.
//!
//! Tests validate:
//! 1. Total height is the sum of item heights and bounds the scroll range
//! 2. The visible range covers the viewport and the rendered range is the
//!    visible range widened by the margin
//! 3. Replaying the render operations of any scroll sequence yields exactly
//!    the items a fresh rebuild would show
//! 4. Centring or revealing an item after a long jump leaves it rendered,
//!    even when heights measured at the old offset have gone stale

use proptest::prelude::*;
use std::collections::VecDeque;
use vlist::config::ListConfig;
use vlist::model::{ColumnDescriptor, ColumnId, DataType, Row, RowId};
use vlist::view::{HeightProbe, RenderOp, RenderedItem, TextRenderer};
use vlist::view_state::{Align, DisplayItem, ScrollTarget};
use vlist::ListContext;

/// Items at every third position are taller.
struct StripedProbe;

impl HeightProbe for StripedProbe {
    fn measure(&self, item: DisplayItem) -> Option<u32> {
        match item {
            DisplayItem::Row(r) if r.get() % 3 == 0 => Some(45),
            _ => Some(20),
        }
    }
}

/// Per-row heights; anything without an entry measures 20.
struct TabulatedHeights(Vec<u32>);

impl HeightProbe for TabulatedHeights {
    fn measure(&self, item: DisplayItem) -> Option<u32> {
        match item {
            DisplayItem::Row(r) => Some(self.0.get(r.get()).copied().unwrap_or(20)),
            _ => Some(20),
        }
    }
}

fn list(rows: usize, viewport: u64) -> ListContext {
    let columns = vec![ColumnDescriptor::typed(
        ColumnId::new("n").expect("valid column id"),
        DataType::Number,
    )];
    let mut ctx = ListContext::new(ListConfig::default(), columns, Box::new(TextRenderer));
    ctx.resize(viewport);
    ctx.load_rows(
        (0..rows)
            .map(|i| Row::new(format!("r{i}").as_str(), [i.to_string()]))
            .collect(),
    )
    .expect("unique ids");
    ctx
}

fn settle(ctx: &mut ListContext, probe: &dyn HeightProbe) {
    for _ in 0..16 {
        if ctx.after_paint(probe).is_none() {
            return;
        }
    }
    panic!("after_paint did not settle");
}

/// Apply `ops` to a host-side model of the render surface.
fn apply(surface: &mut VecDeque<RenderedItem>, ops: Vec<RenderOp>) {
    for op in ops {
        match op {
            RenderOp::Rebuild(items) => *surface = items.into(),
            RenderOp::Clear => surface.clear(),
            RenderOp::Prepend(item) => surface.push_front(item),
            RenderOp::Append(item) => surface.push_back(item),
            RenderOp::RemoveFirst { position } => {
                assert_eq!(surface.pop_front().map(|i| i.position), Some(position));
            }
            RenderOp::RemoveLast { position } => {
                assert_eq!(surface.pop_back().map(|i| i.position), Some(position));
            }
            RenderOp::Replace(item) => {
                let slot = surface
                    .iter_mut()
                    .find(|i| i.position == item.position)
                    .expect("replaced item is materialized");
                *slot = item;
            }
        }
    }
}

// ===== Property 1: Scroll geometry =====

proptest! {
    #[test]
    fn total_height_bounds_scroll_range(rows in 0usize..200, viewport in 1u64..800) {
        let mut ctx = list(rows, viewport);
        settle(&mut ctx, &StripedProbe);

        let geometry = ctx.geometry();
        let sum: u64 = (0..geometry.len()).map(|p| u64::from(geometry.height(p))).sum();
        prop_assert_eq!(ctx.total_height(), sum);
        prop_assert_eq!(ctx.max_scroll(), sum.saturating_sub(viewport));

        ctx.scroll_to(ScrollTarget::Bottom);
        prop_assert_eq!(ctx.scroll_offset(), ctx.max_scroll());
    }
}

// ===== Property 2: Window coverage =====

proptest! {
    #[test]
    fn window_covers_the_viewport(
        rows in 1usize..300,
        viewport in 1u64..600,
        offset in 0u64..12_000,
    ) {
        let mut ctx = list(rows, viewport);
        ctx.scroll_to(ScrollTarget::Offset(offset));

        let offset = ctx.scroll_offset();
        prop_assert!(offset <= ctx.max_scroll());
        let visible = ctx.visible().expect("non-empty list");
        let rendered = ctx.rendered().expect("non-empty list");
        let geometry = ctx.geometry();

        prop_assert!(geometry.top(visible.first()) <= offset);
        prop_assert!(offset < geometry.bottom(visible.first()));
        let viewport_end = (offset + viewport).min(ctx.total_height());
        prop_assert!(geometry.bottom(visible.last()) >= viewport_end);

        let margin = ctx.config().over_render_margin;
        prop_assert_eq!(rendered.first(), visible.first().saturating_sub(margin));
        prop_assert_eq!(rendered.last(), (visible.last() + margin).min(rows - 1));
    }
}

// ===== Property 3: Incremental updates match a rebuild =====

proptest! {
    #[test]
    fn replayed_ops_match_a_fresh_window(
        rows in 1usize..250,
        viewport in 20u64..400,
        offsets in prop::collection::vec(0u64..6_000, 1..12),
        step in 0u64..60,
    ) {
        let mut ctx = list(rows, viewport);
        let mut surface = VecDeque::new();
        apply(&mut surface, ctx.take_render_ops());

        for offset in offsets {
            // a long jump, then a short nudge that usually stays incremental
            ctx.scroll_to(ScrollTarget::Offset(offset));
            apply(&mut surface, ctx.take_render_ops());
            ctx.scroll_to(ScrollTarget::Offset(offset + step));
            apply(&mut surface, ctx.take_render_ops());

            let expected = ctx.rendered_items();
            prop_assert_eq!(surface.iter().cloned().collect::<Vec<_>>(), expected);
            for item in &surface {
                prop_assert_eq!(item.odd, item.position % 2 == 1);
            }
        }
    }
}

// ===== Property 4: Targets stay rendered over stale measurements =====

proptest! {
    #[test]
    fn centred_target_is_rendered(
        heights in prop::collection::vec(prop_oneof![Just(20u32), 5u32..600], 1..220),
        viewport in 50u64..900,
        first in 0u64..40_000,
        second in 0u64..40_000,
        pick in any::<prop::sample::Index>(),
    ) {
        let rows = heights.len();
        let heights = TabulatedHeights(heights);
        let mut ctx = list(rows, viewport);
        ctx.scroll_to(ScrollTarget::Offset(first));
        settle(&mut ctx, &heights);
        ctx.scroll_to(ScrollTarget::Offset(second));
        settle(&mut ctx, &heights);

        let target = pick.index(rows);
        ctx.set_current_row(RowId::new(format!("r{target}").as_str())).expect("row exists");
        prop_assert!(ctx.center_current_row());
        prop_assert!(ctx.rendered().is_some_and(|r| r.contains(target)));

        ctx.scroll_to(ScrollTarget::Offset(first));
        settle(&mut ctx, &heights);
        prop_assert!(ctx.scroll_to_display_item(target, Align::Center));
        prop_assert!(ctx.rendered().is_some_and(|r| r.contains(target)));

        ctx.scroll_to(ScrollTarget::Offset(second));
        settle(&mut ctx, &heights);
        prop_assert!(ctx.scroll_to_display_item(target, Align::Start));
        prop_assert!(ctx.rendered().is_some_and(|r| r.contains(target)));
    }
}
