//! Semantic scroll targets and refresh anchors.
//!
//! Every navigation resolves to a pixel offset through [`Geometry`]; nothing
//! here inspects rendered items.

use super::geometry::Geometry;
use crate::model::RowId;

/// Where an item should land inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Item top at the viewport top.
    #[default]
    Start,
    /// Item centred in the viewport.
    Center,
    /// Item bottom at the viewport bottom.
    End,
    /// Scroll as little as possible to make the item fully visible.
    Nearest,
}

/// Semantic scroll position.
///
/// # Clamping Behavior
/// Every variant resolves into `[0, max_scroll]`, so no request yields a
/// blank viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollTarget {
    /// Offset 0.
    Top,
    /// Last page.
    Bottom,
    /// Absolute pixel offset.
    Offset(u64),
    /// Bring a display position into view.
    Item {
        /// Display position.
        position: usize,
        /// Placement within the viewport.
        align: Align,
    },
    /// Proportional position (0.0 = top, 1.0 = bottom), for scrollbars.
    Fraction(f64),
}

impl ScrollTarget {
    /// Resolve to a clamped pixel offset.
    ///
    /// `current` is the present offset, used by [`Align::Nearest`].
    pub fn resolve(&self, geometry: &Geometry, viewport: u64, current: u64) -> u64 {
        let max = geometry.max_scroll(viewport);
        let raw = match *self {
            Self::Top => 0,
            Self::Bottom => max,
            Self::Offset(offset) => offset,
            Self::Fraction(f) => {
                let f = if f.is_nan() { 0.0 } else { f.clamp(0.0, 1.0) };
                (max as f64 * f).round() as u64
            }
            Self::Item { position, align } => {
                if position >= geometry.len() {
                    return current.min(max);
                }
                item_offset(geometry, position, viewport, current, align)
            }
        };
        raw.min(max)
    }
}

fn item_offset(geometry: &Geometry, position: usize, viewport: u64, current: u64, align: Align) -> u64 {
    let top = geometry.top(position);
    let bottom = geometry.bottom(position);
    let height = bottom - top;
    match align {
        Align::Start => top,
        Align::End => bottom.saturating_sub(viewport),
        Align::Center => (top + height / 2).saturating_sub(viewport / 2),
        Align::Nearest => {
            if top < current {
                top
            } else if bottom > current + viewport {
                // Taller than the viewport: show its top.
                if height > viewport {
                    top
                } else {
                    bottom - viewport
                }
            } else {
                current
            }
        }
    }
}

/// Identity of the item a refresh is anchored to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorKey {
    /// A row, by id.
    Row(RowId),
    /// A group header, by the labels on its chain (outermost first).
    Header(Vec<String>),
}

/// First rendered item before a refresh plus its distance from the offset.
///
/// After the refresh, the offset is restored so the same item sits the same
/// number of pixels above the viewport top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Anchored item.
    pub key: AnchorKey,
    /// `scroll_offset - top(item)` at capture time.
    pub delta: u64,
}

impl Anchor {
    /// Capture `key` at display `position` for the given offset.
    pub fn capture(key: AnchorKey, geometry: &Geometry, position: usize, scroll_offset: u64) -> Self {
        Self {
            key,
            delta: scroll_offset.saturating_sub(geometry.top(position)),
        }
    }

    /// Offset that puts the anchored item, now at `position`, back in place.
    pub fn restore(&self, geometry: &Geometry, position: usize) -> u64 {
        geometry.top(position).saturating_add(self.delta)
    }
}
