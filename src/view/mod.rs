//! Render surface seams (impure shell boundary).
//!
//! The engine never touches a render surface. It hands the host a list of
//! [`RenderOp`]s carrying markup produced by a [`RowRenderer`], and learns the
//! real item heights from a [`HeightProbe`] in the after-paint phase.

pub mod text;

pub use text::TextRenderer;

use crate::model::{GroupHeader, Row};
use crate::view_state::DisplayItem;

/// Row markup producer.
///
/// Called only for items that enter the rendered range (rebuild or edge
/// insertion) or whose record changed while rendered.
pub trait RowRenderer {
    /// Markup for a data row.
    fn row_markup(&self, row: &Row, odd: bool) -> String;

    /// Markup for a group header.
    fn header_markup(&self, header: &GroupHeader, odd: bool) -> String;
}

/// Height measurement of materialized items.
pub trait HeightProbe {
    /// Rendered height of `item` in pixels, excluding the row's
    /// `extra_height`. `None` if the item is not materialized.
    fn measure(&self, item: DisplayItem) -> Option<u32>;
}

/// A materialized item as handed to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedItem {
    /// Display position.
    pub position: usize,
    /// What is shown there.
    pub item: DisplayItem,
    /// Zebra flag.
    pub odd: bool,
    /// Markup from the [`RowRenderer`].
    pub markup: String,
}

/// One change the host applies to its render surface, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOp {
    /// Discard everything and show `items` (ascending positions).
    Rebuild(Vec<RenderedItem>),
    /// Discard everything.
    Clear,
    /// Insert before the current first item.
    Prepend(RenderedItem),
    /// Insert after the current last item.
    Append(RenderedItem),
    /// Remove the current first item.
    RemoveFirst {
        /// Display position being removed.
        position: usize,
    },
    /// Remove the current last item.
    RemoveLast {
        /// Display position being removed.
        position: usize,
    },
    /// Replace the markup of a materialized item in place.
    Replace(RenderedItem),
}

/// Fixed-height probe, for hosts whose items are all the same height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformProbe(pub u32);

impl HeightProbe for UniformProbe {
    fn measure(&self, _item: DisplayItem) -> Option<u32> {
        Some(self.0)
    }
}
