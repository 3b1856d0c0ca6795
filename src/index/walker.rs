use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::WalkBuilder;

use crate::rules::RuleSet;

/// Recursive file-tree walk over one project root.
///
/// Only files whose basename resolves to exactly one language rule are
/// returned; hidden and gitignored files are skipped, and unreadable
/// directory entries are silently dropped.
pub struct FileWalker {
    rules: Arc<RuleSet>,
}

impl FileWalker {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self { rules }
    }

    pub fn walk(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let walker = WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .ignore(true)
            .build();

        for entry in walker.flatten() {
            let path = entry.path();
            if path.is_file() && self.is_supported(path) {
                files.push(path.to_path_buf());
            }
        }

        files
    }

    pub fn is_supported(&self, path: &Path) -> bool {
        self.rules.rule_for_path(path).is_some()
    }
}
