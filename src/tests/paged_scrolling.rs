//! Paged lists scrolled end to end against a simulated server.

use crate::model::{PageDirection, PageRequest, RowId};
use crate::test_harness::{page_json, ListHarness};
use crate::view_state::ScrollTarget;
use serde_json::Value;

const TOTAL: usize = 300;
const STEP: u64 = 400;

/// Server holding rows `r0..r{TOTAL}`. Backward pages come nearest row first.
fn page_for(request: &PageRequest) -> Value {
    let size = request.page_size;
    let anchor = request
        .anchor
        .as_ref()
        .and_then(|id| id.as_str().strip_prefix('r'))
        .and_then(|n| n.parse::<usize>().ok());
    match request.direction {
        PageDirection::First => page_json(0..size.min(TOTAL), true, size >= TOTAL),
        PageDirection::Last => {
            let start = TOTAL.saturating_sub(size);
            page_json(start..TOTAL, start == 0, true)
        }
        PageDirection::Next => {
            let start = anchor.map_or(0, |a| a + 1);
            let end = (start + size).min(TOTAL);
            page_json(start..end, start == 0, end == TOTAL)
        }
        PageDirection::Prev => {
            let end = anchor.unwrap_or(0);
            let start = end.saturating_sub(size);
            page_json((start..end).rev(), start == 0, end == TOTAL)
        }
    }
}

/// Answer requests until none are outstanding. Returns the pages served.
fn serve(h: &mut ListHarness) -> usize {
    let mut served = 0;
    loop {
        let requests = h.take_requests();
        if requests.is_empty() {
            return served;
        }
        for request in requests {
            h.ctx
                .on_page_loaded(request.id, Ok(page_for(&request)))
                .expect("server pages are valid");
            served += 1;
        }
    }
}

fn first_visible_id(h: &ListHarness) -> Option<RowId> {
    let position = h.ctx.visible()?.first();
    let index = h.ctx.display().get(position)?.as_row()?;
    h.ctx.row(index).map(|r| r.id.clone())
}

fn assert_contiguous(h: &ListHarness) {
    let ids: Vec<String> = h.ctx.rows().iter().map(|r| r.id.to_string()).collect();
    let expected: Vec<String> = (0..TOTAL).map(|i| format!("r{i}")).collect();
    assert_eq!(ids, expected);
}

#[test]
fn scrolling_down_pulls_every_page_in_order() {
    let mut h = ListHarness::paged(25, 200);
    h.ctx.request_first_page().expect("paged");
    assert_eq!(serve(&mut h), 1);

    for _ in 0..200 {
        if h.ctx.cache_bounds().last_loaded && h.ctx.scroll_offset() == h.ctx.max_scroll() {
            break;
        }
        h.ctx
            .scroll_to(ScrollTarget::Offset(h.ctx.scroll_offset() + STEP));
        serve(&mut h);
        h.paint();
        serve(&mut h);
    }

    assert_contiguous(&h);
    assert_eq!(h.ctx.total_height(), TOTAL as u64 * 20);
    assert_eq!(first_visible_id(&h), Some(RowId::new("r290")));
}

#[test]
fn scrolling_up_from_last_page_keeps_the_view_still() {
    let mut h = ListHarness::paged(25, 200);
    h.ctx.request_last_page().expect("paged");
    serve(&mut h);
    assert_eq!(h.ctx.rows().len(), 50);
    assert_eq!(first_visible_id(&h), Some(RowId::new("r290")));

    for _ in 0..200 {
        if h.ctx.cache_bounds().first_loaded && h.ctx.scroll_offset() == 0 {
            break;
        }
        h.ctx
            .scroll_to(ScrollTarget::Offset(h.ctx.scroll_offset().saturating_sub(STEP)));
        let before = first_visible_id(&h);
        serve(&mut h);
        assert_eq!(first_visible_id(&h), before);
    }

    assert_contiguous(&h);
    assert_eq!(first_visible_id(&h), Some(RowId::new("r0")));
}

#[test]
fn overlapping_page_delivery_is_idempotent() {
    let mut h = ListHarness::paged(25, 200);
    h.ctx.request_first_page().expect("paged");
    serve(&mut h);
    h.ctx.scroll_to(ScrollTarget::Offset(STEP));
    let requests = h.take_requests();
    let next = requests.first().expect("next page requested");
    assert_eq!(next.direction, PageDirection::Next);

    // a retrying server resends the cached tail along with the new rows
    h.ctx
        .on_page_loaded(next.id, Ok(page_json(0..100, true, false)))
        .expect("valid page");

    let ids: Vec<String> = h.ctx.rows().iter().map(|r| r.id.to_string()).collect();
    let expected: Vec<String> = (0..100).map(|i| format!("r{i}")).collect();
    assert_eq!(ids, expected);
    assert_eq!(h.ctx.display().len(), 100);
    assert_eq!(h.ctx.total_height(), 2_000);
}
