//! In-memory source-code definition index.
//!
//! Scans project roots with per-dialect pattern rules, maps symbol name to
//! defining location (file + byte offset), and keeps the table fresh through
//! single-file reindexing on save. The index is session-scoped and memory
//! only; it is rebuilt from scratch each editing session.

pub mod error;
pub mod host;
pub mod index;
pub mod query;
pub mod registry;
pub mod rules;
pub mod scanner;

pub use error::{IndexError, Result};
pub use host::{DisplayRow, EditorHost, Job};
pub use index::{BuildTrigger, Definition, DefinitionsIndex, FileWalker, IndexState};
pub use query::{find_by_name, to_display_rows, Navigator};
pub use registry::IndexRegistry;
pub use rules::{Extract, LanguageRule, RuleConfig, RuleSet};
pub use scanner::{scan_file, scan_text, DefinitionScan};
