//! Query and navigation layer.
//!
//! Two modes over a built index: browse every known definition, or look up
//! the exact name under the cursor. The jump itself is delegated to the
//! host; all filtering lives in the named helpers below.

use std::path::Path;
use std::sync::Arc;

use crate::host::{DisplayRow, EditorHost};
use crate::index::Definition;
use crate::registry::IndexRegistry;

/// Entries whose name equals `name` exactly, in index order.
pub fn find_by_name(entries: &[Definition], name: &str) -> Vec<Definition> {
    entries.iter().filter(|d| d.name == name).cloned().collect()
}

/// (name, file) rows for the host's choice list, in index order.
pub fn to_display_rows(entries: &[Definition]) -> Vec<DisplayRow> {
    entries
        .iter()
        .map(|d| DisplayRow {
            label: d.name.clone(),
            sublabel: d.file_path.display().to_string(),
        })
        .collect()
}

pub struct Navigator {
    registry: IndexRegistry,
    host: Arc<dyn EditorHost>,
}

impl Navigator {
    pub fn new(registry: IndexRegistry, host: Arc<dyn EditorHost>) -> Self {
        Self { registry, host }
    }

    /// Browse every known definition; cancelling the prompt does nothing.
    pub fn request_browse(&self, session_id: &str) {
        let host = Arc::clone(&self.host);
        let index = self.registry.get_or_create(session_id);
        index.ensure_built(&self.host, move |entries| {
            if let Some(selected) = host.present_choice_list(to_display_rows(&entries)) {
                go_to(&host, &entries[selected]);
            }
        });
    }

    /// Look up the word under the cursor by exact name.
    ///
    /// One match navigates directly, several prompt for disambiguation,
    /// zero does nothing.
    pub fn request_lookup(&self, session_id: &str, word: &str) {
        let host = Arc::clone(&self.host);
        let word = word.to_string();
        let index = self.registry.get_or_create(session_id);
        index.ensure_built(&self.host, move |entries| {
            let found = find_by_name(&entries, &word);
            match found.len() {
                0 => {}
                1 => go_to(&host, &found[0]),
                _ => {
                    if let Some(selected) = host.present_choice_list(to_display_rows(&found)) {
                        go_to(&host, &found[selected]);
                    }
                }
            }
        });
    }

    /// Save notification from the host; bypasses the query path entirely.
    pub fn notify_file_saved(&self, session_id: &str, path: &Path) {
        self.registry.get_or_create(session_id).reindex_file(path);
    }
}

fn go_to(host: &Arc<dyn EditorHost>, definition: &Definition) {
    host.navigate_to(&definition.file_path, definition.byte_offset);
}
