//! Saving and restoring the persisted grouping and column layout.

use super::events::ListEvent;
use super::list_context::ListContext;
use crate::config::PagingMode;
use crate::model::{column_signature, ListError};
use crate::storage::{load_layout, save_layout, ColumnLayout, LayoutStorage, PersistedLayout};
use tracing::{info, warn};

impl ListContext {
    /// Per-column presentation state (empty until set or restored).
    pub fn column_layout(&self) -> &[ColumnLayout] {
        &self.column_layout
    }

    /// Replace the per-column presentation state.
    pub fn set_column_layout(&mut self, layout: Vec<ColumnLayout>) {
        self.column_layout = layout;
    }

    /// What [`save_layout`](Self::save_layout) would write.
    pub fn persisted_layout(&self) -> PersistedLayout {
        let columns = if self.column_layout.is_empty() {
            self.columns
                .iter()
                .map(|c| ColumnLayout {
                    column_id: c.column_id.clone(),
                    width: None,
                    hidden: false,
                })
                .collect()
        } else {
            self.column_layout.clone()
        };
        PersistedLayout {
            signature: column_signature(&self.columns),
            group_config: self.group_config.clone(),
            columns,
        }
    }

    /// Save grouping and column layout under `name`. Failures are logged and
    /// reported as `false`; the list is unaffected either way.
    pub fn save_layout(&self, storage: &mut dyn LayoutStorage, name: &str) -> bool {
        match save_layout(storage, name, &self.persisted_layout()) {
            Ok(()) => {
                info!(storage = name, "layout saved");
                true
            }
            Err(e) => {
                warn!(storage = name, error = %e, "failed to save layout");
                false
            }
        }
    }

    /// Apply the layout stored under `name`, if there is a usable one.
    /// Returns true if a layout was applied.
    ///
    /// A paged list keeps its server-side grouping and applies only the
    /// column layout.
    ///
    /// # Errors
    ///
    /// Grouping errors from [`set_group_config`](Self::set_group_config),
    /// e.g. a stored level on a column that is no longer groupable.
    pub fn restore_layout(&mut self, storage: &dyn LayoutStorage, name: &str) -> Result<bool, ListError> {
        let Some(layout) = load_layout(storage, name, &column_signature(&self.columns)) else {
            return Ok(false);
        };
        if layout.group_config != self.group_config {
            match self.store.mode() {
                PagingMode::Full => self.set_group_config(layout.group_config)?,
                PagingMode::Paged => warn!(
                    storage = name,
                    "stored grouping ignored, rows are loaded page by page"
                ),
            }
        }
        self.column_layout = layout.columns;
        info!(storage = name, "layout restored");
        self.events.emit(ListEvent::LayoutRestored);
        Ok(true)
    }
}
