//! List state: the owning context and its observer channel.
//!
//! `ListContext` is split across files by concern; every file adds methods
//! to the same type.

pub mod events;
mod layout_handler;
pub mod list_context;
mod navigation;
mod paging_handler;

// Re-export for convenience
pub use events::{EventChannel, ListEvent};
pub use list_context::ListContext;
