//! Definitions index.
//!
//! Owns the entry collection and the build lifecycle. A fresh index is
//! `Uninitialized`; the first `ensure_built` flips it to `Loading` and walks
//! every project root on a host-provided background job; once `Initialized`
//! it is never torn down, only patched file-by-file via [`DefinitionsIndex::reindex_file`].

pub mod walker;

pub use walker::FileWalker;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::host::EditorHost;
use crate::rules::RuleSet;
use crate::scanner;

/// One indexed symbol occurrence.
///
/// `byte_offset` is the offset of the start of the defining line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub name: String,
    pub file_path: PathBuf,
    pub byte_offset: usize,
}

/// Build lifecycle. Transitions are one-way:
/// `Uninitialized` → `Loading` → `Initialized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    Uninitialized,
    Loading,
    Initialized,
}

/// What `ensure_built` did, for callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildTrigger {
    /// Index was already built; `on_ready` ran synchronously.
    Ready,
    /// A build is already in flight; the call was a no-op.
    InFlight,
    /// A background build was started.
    Started,
}

pub(crate) struct Inner {
    state: IndexState,
    entries: Vec<Definition>,
}

/// Cheaply cloneable handle to one session's index.
#[derive(Clone)]
pub struct DefinitionsIndex {
    pub(crate) inner: Arc<Mutex<Inner>>,
    rules: Arc<RuleSet>,
}

impl DefinitionsIndex {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: IndexState::Uninitialized,
                entries: Vec::new(),
            })),
            rules,
        }
    }

    pub fn state(&self) -> IndexState {
        self.inner.lock().unwrap().state
    }

    /// Point-in-time copy of the entry collection. A later `reindex_file`
    /// never mutates an already-returned snapshot.
    pub fn snapshot(&self) -> Vec<Definition> {
        self.inner.lock().unwrap().entries.clone()
    }

    /// Build the index if it has never been built, then hand the entry
    /// collection to `on_ready`.
    ///
    /// Never blocks the caller: an `Initialized` index runs `on_ready`
    /// synchronously, otherwise the walk-and-scan runs on a host background
    /// job and `on_ready` is deferred back to the primary thread. While
    /// `Loading` this is a guaranteed no-op, never a queued second build.
    pub fn ensure_built<F>(&self, host: &Arc<dyn EditorHost>, on_ready: F) -> BuildTrigger
    where
        F: FnOnce(Vec<Definition>) + Send + 'static,
    {
        {
            let mut inner = self.inner.lock().unwrap();
            match inner.state {
                IndexState::Initialized => {
                    let snapshot = inner.entries.clone();
                    drop(inner);
                    on_ready(snapshot);
                    return BuildTrigger::Ready;
                }
                IndexState::Loading => return BuildTrigger::InFlight,
                IndexState::Uninitialized => inner.state = IndexState::Loading,
            }
        }

        host.show_transient_status("Building definitions index...");
        let roots = host.project_roots();
        let index = self.clone();
        let primary = Arc::clone(host);

        host.run_in_background(Box::new(move || {
            tracing::debug!(roots = roots.len(), "index build started");
            let entries = build_entries(&roots, &index.rules);
            tracing::debug!(entries = entries.len(), "index build finished");
            {
                let mut inner = index.inner.lock().unwrap();
                inner.entries = entries.clone();
                inner.state = IndexState::Initialized;
            }
            primary.defer_to_primary_thread(Box::new(move || on_ready(entries)));
        }));

        BuildTrigger::Started
    }

    /// Replace the entries of exactly one file.
    ///
    /// Valid only once `Initialized`; a save notification that races a
    /// pending build is dropped, since that build will capture the file's
    /// current contents anyway.
    pub fn reindex_file(&self, path: &Path) {
        if self.state() != IndexState::Initialized {
            return;
        }

        // Scan outside the lock; swap in atomically.
        let fresh = match self.rules.rule_for_path(path) {
            Some(rule) => match scanner::scan_file(path, rule) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::debug!(path = %path.display(), error = %err, "reindex scan failed");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let mut inner = self.inner.lock().unwrap();
        if inner.state != IndexState::Initialized {
            return;
        }
        inner.entries.retain(|d| d.file_path != path);
        inner.entries.extend(fresh);
    }
}

/// Full walk-and-scan over every root. Per-file failures are contained and
/// never abort the build.
fn build_entries(roots: &[PathBuf], rules: &Arc<RuleSet>) -> Vec<Definition> {
    let walker = FileWalker::new(Arc::clone(rules));
    let mut entries = Vec::new();

    for root in roots {
        for file in walker.walk(root) {
            let Some(rule) = rules.rule_for_path(&file) else {
                continue;
            };
            match scanner::scan_file(&file, rule) {
                Ok(found) => entries.extend(found),
                Err(err) => {
                    tracing::debug!(path = %file.display(), error = %err, "scan failed, skipping file");
                }
            }
        }
    }

    entries
}
