//! Domain model types (pure).
//!
//! All types in this module are plain data with smart constructors where a
//! value can be invalid.

pub mod column;
pub mod error;
pub mod group;
pub mod identifiers;
pub mod page;
pub mod row;

// Re-export for convenience
pub use column::{column_position, column_signature, ColumnDescriptor, DataType};
pub use error::{ListError, PageFetchError, UnsupportedConfig, ValidationError};
pub use group::{GroupConfig, GroupHeader, GroupLevel, SortDirection, SortSpec};
pub use identifiers::{ColumnId, HeaderIndex, InvalidColumnId, RowId, RowIndex};
pub use page::{PageDirection, PageRequest, PageResponse, RequestId};
pub use row::{Cell, Row};
