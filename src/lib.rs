//! vlist: a virtualized, grouped, server-paged list engine.
//!
//! The engine keeps a client-side row cache, groups and sorts it into a
//! flat display list, estimates the height of every displayed item and
//! materializes only the items near the viewport. In paged mode it asks a
//! host-supplied page source for adjacent pages as the user scrolls.
//!
//! Rendering and measuring are the host's business: the engine emits
//! [`view::RenderOp`]s with markup from a [`view::RowRenderer`] and reads
//! heights back through a [`view::HeightProbe`] after each paint.

pub mod config;
pub mod grouping;
pub mod logging;
pub mod model;
pub mod paging;
pub mod state;
pub mod storage;
pub mod store;
pub mod view;
pub mod view_state;

pub use state::{ListContext, ListEvent};

#[cfg(test)]
mod test_harness;

#[cfg(test)]
mod tests;
