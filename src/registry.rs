//! Index registry.
//!
//! One [`DefinitionsIndex`] per editing session, created lazily on first
//! access. The map is append-only: sessions live for the process lifetime,
//! so entries are never evicted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::index::DefinitionsIndex;
use crate::rules::RuleSet;

#[derive(Clone)]
pub struct IndexRegistry {
    indices: Arc<Mutex<HashMap<String, DefinitionsIndex>>>,
    rules: Arc<RuleSet>,
}

impl IndexRegistry {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self {
            indices: Arc::new(Mutex::new(HashMap::new())),
            rules,
        }
    }

    /// The session's index, constructing a fresh uninitialized one on first
    /// access. Subsequent calls return a handle to the same instance.
    pub fn get_or_create(&self, session_id: &str) -> DefinitionsIndex {
        let mut indices = self.indices.lock().unwrap();
        indices
            .entry(session_id.to_string())
            .or_insert_with(|| DefinitionsIndex::new(Arc::clone(&self.rules)))
            .clone()
    }

    pub fn session_count(&self) -> usize {
        self.indices.lock().unwrap().len()
    }
}

impl Default for IndexRegistry {
    fn default() -> Self {
        Self::new(RuleSet::builtin_shared())
    }
}
