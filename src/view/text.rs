//! Plain-text markup, used by the CLI and in tests.

use super::RowRenderer;
use crate::model::{GroupHeader, Row};

/// Renders a row as its cell values separated by `" | "` and a header as
/// an indented label with its row count.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl RowRenderer for TextRenderer {
    fn row_markup(&self, row: &Row, odd: bool) -> String {
        let cells: Vec<&str> = row.cells.iter().map(|c| c.value.as_str()).collect();
        let stripe = if odd { '~' } else { ' ' };
        format!("{stripe} {}", cells.join(" | "))
    }

    fn header_markup(&self, header: &GroupHeader, _odd: bool) -> String {
        let marker = if header.collapsed { '+' } else { '-' };
        let indent = "  ".repeat(header.group_index);
        let mut line = format!("{indent}{marker} {} ({})", header.item, header.item_count);
        if let Some(total) = &header.total {
            line.push_str(" = ");
            line.push_str(total);
        }
        line
    }
}
