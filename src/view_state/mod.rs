//! View-state layer - display list, geometry and the rendered window
//!
//! # Module Structure
//!
//! - `types`: DisplayItem and RenderedRange
//! - `display_list`: flattening rows and headers into display order
//! - `height_index`: HeightIndex - O(log n) prefix sums via Fenwick tree
//! - `geometry`: measured-height side tables and effective item heights
//! - `window`: WindowManager - rendered range, incremental vs rebuild
//! - `scroll`: semantic scroll targets and refresh anchors
//! - `deferred`: coalesced after-paint dimension updates

pub mod deferred;
pub mod display_list;
pub mod geometry;
pub mod height_index;
pub mod scroll;
pub mod types;
pub mod window;

pub use deferred::{DeferredDimensions, DimensionCallback, DimensionFlags, DimensionOutcome};
pub use display_list::{prep_display, DisplayList};
pub use geometry::{Geometry, HeightCache, ItemMetrics};
pub use height_index::HeightIndex;
pub use scroll::{Align, Anchor, AnchorKey, ScrollTarget};
pub use types::{DisplayItem, RenderedRange};
pub use window::{PositionRequest, WindowManager, WindowOp, WindowUpdate};
