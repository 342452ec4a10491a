//! Test harness that hosts a `ListContext` the way an embedding UI would.
//!
//! It renders with [`TextRenderer`], measures with a configurable probe,
//! records outgoing page requests and keeps an event subscription, so tests
//! can drive scrolling, painting and page completion from one place.

use crate::config::{ListConfig, PagingMode};
use crate::model::{ColumnDescriptor, ColumnId, DataType, PageRequest, Row};
use crate::paging::QueuedPageSource;
use crate::state::{ListContext, ListEvent};
use crate::view::{HeightProbe, TextRenderer};
use crate::view_state::DisplayItem;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::mpsc::Receiver;

/// Probe returning a default height, with per-item overrides.
#[derive(Debug, Clone, Default)]
pub struct MapProbe {
    pub default: u32,
    pub overrides: HashMap<DisplayItem, u32>,
}

impl MapProbe {
    pub fn uniform(height: u32) -> Self {
        Self {
            default: height,
            overrides: HashMap::new(),
        }
    }
}

impl HeightProbe for MapProbe {
    fn measure(&self, item: DisplayItem) -> Option<u32> {
        Some(self.overrides.get(&item).copied().unwrap_or(self.default))
    }
}

/// A hosted list plus the host-side collaborators.
pub struct ListHarness {
    pub ctx: ListContext,
    pub probe: MapProbe,
    pub events: Receiver<ListEvent>,
    requests: QueuedPageSource,
}

impl ListHarness {
    /// Host a list built from `config` and `columns`, with a viewport of
    /// `viewport` pixels and a probe measuring every item at the configured
    /// default row height.
    pub fn new(config: ListConfig, columns: Vec<ColumnDescriptor>, viewport: u64) -> Self {
        let requests = QueuedPageSource::new();
        let probe = MapProbe::uniform(config.default_row_height);
        let mut ctx = ListContext::new(config, columns, Box::new(TextRenderer))
            .with_page_source(Box::new(requests.clone()));
        let events = ctx.subscribe();
        ctx.resize(viewport);
        Self {
            ctx,
            probe,
            events,
            requests,
        }
    }

    /// Full list over `rows` with the default configuration.
    pub fn full(columns: Vec<ColumnDescriptor>, rows: Vec<Row>, viewport: u64) -> Self {
        let mut harness = Self::new(ListConfig::default(), columns, viewport);
        harness.ctx.load_rows(rows).expect("fixture rows have unique ids");
        harness
    }

    /// Empty paged list over a single `n` column.
    pub fn paged(prefetch_margin: usize, viewport: u64) -> Self {
        let config = ListConfig {
            paging: PagingMode::Paged,
            prefetch_margin,
            ..ListConfig::default()
        };
        Self::new(config, number_columns(), viewport)
    }

    /// Run after-paint passes until nothing is pending.
    pub fn paint(&mut self) {
        for _ in 0..16 {
            if self.ctx.after_paint(&self.probe).is_none() {
                return;
            }
        }
        panic!("after_paint did not settle");
    }

    /// Page requests sent since the last call.
    pub fn take_requests(&self) -> Vec<PageRequest> {
        self.requests.drain()
    }

    /// Events emitted since the last call.
    pub fn take_events(&self) -> Vec<ListEvent> {
        self.events.try_iter().collect()
    }

    /// Markup of the materialized items, in display order.
    pub fn rendered_markup(&self) -> Vec<String> {
        self.ctx
            .rendered_items()
            .into_iter()
            .map(|item| item.markup)
            .collect()
    }
}

pub fn col(id: &str) -> ColumnId {
    ColumnId::new(id).expect("valid column id")
}

/// `city`, `dept`, `name` (text) and `age` (number).
pub fn people_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::text(col("city")),
        ColumnDescriptor::text(col("dept")),
        ColumnDescriptor::text(col("name")),
        ColumnDescriptor::typed(col("age"), DataType::Number),
    ]
}

/// A single numeric `n` column.
pub fn number_columns() -> Vec<ColumnDescriptor> {
    vec![ColumnDescriptor::typed(col("n"), DataType::Number)]
}

/// Rows `r{start}..r{end}` with `n` equal to the row number.
pub fn numbered_rows(range: std::ops::Range<usize>) -> Vec<Row> {
    range
        .map(|i| Row::new(format!("r{i}").as_str(), [i.to_string()]))
        .collect()
}

/// Wire page holding rows `r{i}` for each `i`, in the order given.
pub fn page_json(ids: impl IntoIterator<Item = usize>, is_first: bool, is_last: bool) -> Value {
    let rows: Vec<Value> = ids
        .into_iter()
        .map(|i| json!({"id": format!("r{i}"), "cells": [{"value": i.to_string()}]}))
        .collect();
    json!({"rows": rows, "isFirst": is_first, "isLast": is_last})
}
