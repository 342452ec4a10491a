//! Tests for row and grouping operations on `ListContext`.

use super::*;
use crate::model::{GroupLevel, SortDirection};
use crate::test_harness::{col, numbered_rows, number_columns, people_columns, ListHarness};

fn people() -> Vec<Row> {
    vec![
        Row::new("1", ["Oslo", "Sales", "Kari", "41"]),
        Row::new("2", ["Bergen", "Ops", "Ola", "35"]),
        Row::new("3", ["Oslo", "Ops", "Per", "29"]),
        Row::new("4", ["Bergen", "Ops", "Liv", "52"]),
        Row::new("5", ["Oslo", "Sales", "Nils", "33"]),
    ]
}

fn by_city() -> GroupConfig {
    GroupConfig::new(vec![GroupLevel::new(col("city"))])
}

fn ids(ctx: &ListContext) -> Vec<&str> {
    ctx.rows().iter().map(|r| r.id.as_str()).collect()
}

fn grouped_people() -> ListHarness {
    let mut h = ListHarness::full(people_columns(), people(), 400);
    h.ctx.set_group_config(by_city()).expect("city is groupable");
    h.ctx.take_render_ops();
    h
}

// ===== Loading =====

#[test]
fn load_rows_materializes_visible_rows_plus_margin() {
    let mut h = ListHarness::full(number_columns(), numbered_rows(0..100), 200);
    let rendered = h.ctx.rendered().expect("rows are rendered");
    assert_eq!((rendered.first(), rendered.last()), (0, 18));

    let ops = h.ctx.take_render_ops();
    let Some(RenderOp::Rebuild(items)) = ops.last() else {
        panic!("expected a rebuild, got {ops:?}");
    };
    assert_eq!(items.len(), 19);
    assert_eq!(items[1].markup, "~ 1");
    assert!(items[1].odd);
}

#[test]
fn load_rows_keeps_order_without_grouping_or_sort() {
    let h = ListHarness::full(people_columns(), people(), 400);
    assert_eq!(ids(&h.ctx), ["1", "2", "3", "4", "5"]);
    assert!(!h.ctx.partition().is_grouped());
    assert_eq!(h.ctx.display().len(), 5);
}

#[test]
fn duplicate_ids_leave_list_unchanged() {
    let mut h = ListHarness::full(people_columns(), people(), 400);
    let err = h
        .ctx
        .load_rows(vec![Row::new("x", ["a"]), Row::new("x", ["b"])])
        .unwrap_err();
    assert!(matches!(
        err,
        ListError::Validation(ValidationError::DuplicateRowId { .. })
    ));
    assert_eq!(h.ctx.rows().len(), 5);
    assert_eq!(h.ctx.display().len(), 5);
}

#[test]
fn reload_forgets_current_row_that_disappeared() {
    let mut h = ListHarness::full(people_columns(), people(), 400);
    h.ctx.set_current_row(RowId::new("3")).expect("row 3 exists");
    h.ctx
        .load_rows(vec![Row::new("9", ["Oslo", "Ops", "Ida", "20"])])
        .expect("unique ids");
    assert!(h.ctx.current_row().is_unsaved());
}

// ===== Grouping =====

#[test]
fn grouping_sorts_rows_and_emits_headers_first() {
    let h = grouped_people();
    assert_eq!(ids(&h.ctx), ["4", "2", "3", "1", "5"]);
    let headers = h.ctx.partition().headers();
    assert_eq!(headers.len(), 2);
    assert_eq!((headers[0].item.as_str(), headers[0].item_count), ("Bergen", 2));
    assert_eq!((headers[1].item.as_str(), headers[1].item_count), ("Oslo", 3));
    assert_eq!(
        h.ctx.display().items()[..4],
        [
            DisplayItem::Header(HeaderIndex::new(0)),
            DisplayItem::Row(RowIndex::new(0)),
            DisplayItem::Row(RowIndex::new(1)),
            DisplayItem::Header(HeaderIndex::new(1)),
        ]
    );
}

#[test]
fn unknown_group_column_is_rejected_without_change() {
    let mut h = grouped_people();
    let err = h
        .ctx
        .set_group_config(GroupConfig::new(vec![GroupLevel::new(col("zip"))]))
        .unwrap_err();
    assert!(matches!(
        err,
        ListError::Unsupported(UnsupportedConfig::UnknownColumn { .. })
    ));
    assert_eq!(h.ctx.group_config(), &by_city());
    assert_eq!(h.ctx.partition().headers().len(), 2);
}

#[test]
fn grouping_is_refused_on_paged_list() {
    let mut h = ListHarness::paged(25, 200);
    let err = h.ctx.set_group_config(by_city()).unwrap_err();
    assert!(matches!(
        err,
        ListError::Unsupported(UnsupportedConfig::GroupingWhilePaged)
    ));
}

#[test]
fn collapsing_hides_rows_and_expanding_restores_them() {
    let mut h = grouped_people();
    assert_eq!(h.ctx.toggle_collapsed(HeaderIndex::new(0)), Some(true));
    assert_eq!(h.ctx.display().len(), 5);
    assert_eq!(h.ctx.display().row_position(RowIndex::new(0)), None);

    assert_eq!(h.ctx.toggle_collapsed(HeaderIndex::new(0)), Some(false));
    assert_eq!(h.ctx.display().len(), 7);
    assert_eq!(h.ctx.toggle_collapsed(HeaderIndex::new(9)), None);
}

#[test]
fn collapse_all_leaves_only_headers() {
    let mut h = grouped_people();
    assert!(h.ctx.collapse_all());
    assert_eq!(h.ctx.display().len(), 2);
    assert!(!h.ctx.collapse_all());
    assert!(h.ctx.expand_all());
    assert_eq!(h.ctx.display().len(), 7);
}

#[test]
fn collapse_state_survives_reload_with_same_grouping() {
    let mut h = grouped_people();
    h.ctx.toggle_collapsed(HeaderIndex::new(1));
    h.ctx.load_rows(people()).expect("unique ids");
    let oslo = h
        .ctx
        .partition()
        .find_by_key_path(&["Oslo"])
        .expect("Oslo header");
    assert!(h.ctx.header(oslo).expect("exists").collapsed);
}

#[test]
fn making_hidden_row_current_expands_its_group() {
    let mut h = grouped_people();
    h.ctx.collapse_all();
    h.ctx.set_current_row(RowId::new("3")).expect("row 3 exists");
    let index = h.ctx.index_of(&RowId::new("3")).expect("cached");
    assert!(h.ctx.display().row_position(index).is_some());
    assert_eq!(h.ctx.current_row(), &RowId::new("3"));
}

#[test]
fn unknown_current_row_is_an_error() {
    let mut h = grouped_people();
    assert!(h.ctx.set_current_row(RowId::new("nope")).is_err());
    assert!(h.ctx.set_current_row(RowId::unsaved()).is_ok());
}

#[test]
fn sort_change_reorders_full_list() {
    let mut h = ListHarness::full(people_columns(), people(), 400);
    h.ctx
        .set_sort(Some(SortSpec {
            column_id: col("age"),
            direction: SortDirection::Descending,
        }))
        .expect("age exists");
    assert_eq!(ids(&h.ctx), ["4", "1", "2", "5", "3"]);
}

// ===== Row mutations =====

#[test]
fn insert_without_grouping_stays_in_place() {
    let mut h = ListHarness::full(people_columns(), people(), 400);
    let index = h
        .ctx
        .insert_row(Some(1), Row::new("6", ["Alta", "Ops", "Siv", "60"]))
        .expect("new id");
    assert_eq!(index, RowIndex::new(1));
    assert_eq!(ids(&h.ctx), ["1", "6", "2", "3", "4", "5"]);
    assert_eq!(h.ctx.display().len(), 6);
}

#[test]
fn insert_with_grouping_regroups() {
    let mut h = grouped_people();
    let index = h
        .ctx
        .insert_row(None, Row::new("6", ["Bergen", "Ops", "Ann", "60"]))
        .expect("new id");
    assert_eq!(index, RowIndex::new(0));
    assert_eq!(h.ctx.partition().headers()[0].item_count, 3);
}

#[test]
fn insert_duplicate_id_fails() {
    let mut h = grouped_people();
    assert!(h.ctx.insert_row(None, Row::new("1", ["x"])).is_err());
    assert_eq!(h.ctx.rows().len(), 5);
}

#[test]
fn update_changing_group_key_moves_row() {
    let mut h = grouped_people();
    h.ctx
        .update_row(&RowId::new("3"), Row::new("3", ["Bergen", "Ops", "Per", "29"]))
        .expect("row 3 exists");
    assert_eq!(h.ctx.partition().headers()[0].item_count, 3);
    assert_eq!(h.ctx.partition().headers()[1].item_count, 2);
}

#[test]
fn update_without_key_change_is_in_place() {
    let mut h = grouped_people();
    let before: Vec<RowId> = h.ctx.rows().iter().map(|r| r.id.clone()).collect();
    // age is neither a group nor a sort column
    let index = h
        .ctx
        .update_row(&RowId::new("3"), Row::new("3", ["Oslo", "Ops", "Per", "99"]))
        .expect("row 3 exists");
    let after: Vec<RowId> = h.ctx.rows().iter().map(|r| r.id.clone()).collect();
    assert_eq!(before, after);
    let ops = h.ctx.take_render_ops();
    assert!(ops.iter().any(|op| matches!(
        op,
        RenderOp::Replace(item) if item.item == DisplayItem::Row(index) && item.markup.ends_with("99")
    )));
}

#[test]
fn update_unknown_row_fails() {
    let mut h = grouped_people();
    let err = h
        .ctx
        .update_row(&RowId::new("nope"), Row::new("nope", ["x"]))
        .unwrap_err();
    assert!(matches!(
        err,
        ListError::Validation(ValidationError::UnknownRow { .. })
    ));
}

#[test]
fn removing_current_row_clears_it() {
    let mut h = grouped_people();
    h.ctx.set_current_row(RowId::new("2")).expect("row 2 exists");
    let removed = h.ctx.remove_row(&RowId::new("2")).expect("row 2 exists");
    assert_eq!(removed.id, RowId::new("2"));
    assert!(h.ctx.current_row().is_unsaved());
    assert_eq!(h.ctx.display().len(), 6);
    assert_eq!(h.ctx.partition().headers()[0].item_count, 1);
}

#[test]
fn append_rows_rejects_any_duplicate_up_front() {
    let mut h = ListHarness::full(number_columns(), numbered_rows(0..3), 200);
    assert!(h.ctx.append_rows(numbered_rows(2..5)).is_err());
    assert_eq!(h.ctx.rows().len(), 3);
    assert_eq!(h.ctx.append_rows(numbered_rows(3..5)).expect("fresh ids"), 2);
    assert_eq!(h.ctx.rows().len(), 5);
}

#[test]
fn extra_height_grows_total_height() {
    let mut h = ListHarness::full(number_columns(), numbered_rows(0..10), 100);
    let before = h.ctx.total_height();
    h.ctx
        .set_extra_height(&RowId::new("r2"), Some(30))
        .expect("row exists");
    assert_eq!(h.ctx.total_height(), before + 30);
    h.ctx
        .set_extra_height(&RowId::new("r2"), None)
        .expect("row exists");
    assert_eq!(h.ctx.total_height(), before);
}

#[test]
fn search_finds_sorted_value() {
    let mut h = ListHarness::full(people_columns(), people(), 400);
    h.ctx
        .set_sort(Some(SortSpec::ascending(col("name"))))
        .expect("name exists");
    let found = h.ctx.search(&col("name"), "Nils").expect("known column");
    assert_eq!(found.and_then(|i| h.ctx.row(i)).map(|r| r.id.as_str()), Some("5"));
    assert!(h.ctx.search(&col("zip"), "x").is_err());
}

// ===== External grouping =====

fn header(group_index: usize, parent: Option<usize>, item: &str, count: usize) -> GroupHeader {
    GroupHeader {
        group_index,
        parent: parent.map(HeaderIndex::new),
        item: item.to_string(),
        item_count: count,
        total: None,
        collapsed: false,
    }
}

#[test]
fn external_headers_are_adopted_in_given_order() {
    let mut h = ListHarness::new(ListConfig::default(), people_columns(), 400);
    h.ctx
        .load_grouped_rows(
            people(),
            vec![header(0, None, "All", 5)],
            vec![Some(HeaderIndex::new(0)); 5],
            by_city(),
        )
        .expect("valid headers");
    assert_eq!(ids(&h.ctx), ["1", "2", "3", "4", "5"]);
    assert_eq!(h.ctx.display().len(), 6);
}

#[test]
fn invalid_external_headers_are_rejected() {
    let mut h = ListHarness::full(people_columns(), people(), 400);
    let err = h
        .ctx
        .load_grouped_rows(
            people(),
            vec![header(0, Some(0), "loop", 5)],
            vec![None; 5],
            by_city(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ListError::Validation(ValidationError::HeaderSelfParent { header: 0 })
    ));
    assert!(!h.ctx.partition().is_grouped());
}

#[test]
fn membership_length_must_match_rows() {
    let mut h = ListHarness::new(ListConfig::default(), people_columns(), 400);
    assert!(h
        .ctx
        .load_grouped_rows(people(), Vec::new(), vec![None; 2], GroupConfig::none())
        .is_err());
}

// ===== Events =====

#[test]
fn mutations_are_observable() {
    let mut h = grouped_people();
    h.take_events();
    h.ctx.toggle_collapsed(HeaderIndex::new(0));
    let events = h.take_events();
    assert!(events.contains(&ListEvent::CollapseChanged {
        header: HeaderIndex::new(0),
        collapsed: true,
    }));
}
