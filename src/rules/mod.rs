//! Language rule table.
//!
//! Each supported source dialect is described by one [`LanguageRule`]: a file
//! glob, a compiled line pattern and a name-extraction rule. The table is
//! data, not code with branches: adding a dialect means appending a rule,
//! never touching the scanner.

use std::path::Path;
use std::sync::Arc;

use glob::Pattern;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::Result;

/// How a symbol name is extracted from a line-pattern match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extract {
    /// Capture group taken verbatim.
    Capture(usize),
    /// Capture group with a leading `self.` qualifier removed if present.
    StripSelfQualifier(usize),
    /// First non-empty capture among the listed groups.
    FirstOf(&'static [usize]),
}

impl Extract {
    pub fn apply(&self, caps: &Captures<'_>) -> Option<String> {
        let text = match self {
            Extract::Capture(group) => caps.get(*group).map(|m| m.as_str()),
            Extract::StripSelfQualifier(group) => caps
                .get(*group)
                .map(|m| m.as_str())
                .map(|s| s.strip_prefix("self.").unwrap_or(s)),
            Extract::FirstOf(groups) => groups
                .iter()
                .filter_map(|g| caps.get(*g))
                .map(|m| m.as_str())
                .find(|s| !s.is_empty()),
        };
        text.filter(|s| !s.is_empty()).map(str::to_string)
    }
}

/// One dialect's definition-recognition rule.
#[derive(Debug, Clone)]
pub struct LanguageRule {
    name: &'static str,
    glob: Pattern,
    pattern: Regex,
    extract: Extract,
}

impl LanguageRule {
    pub fn new(
        name: &'static str,
        file_glob: &str,
        line_pattern: &str,
        extract: Extract,
    ) -> Result<Self> {
        Ok(Self {
            name,
            glob: Pattern::new(file_glob)?,
            pattern: Regex::new(line_pattern)?,
            extract,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn matches_basename(&self, basename: &str) -> bool {
        self.glob.matches(basename)
    }

    /// Extracted name for the first pattern match on `line`, if any.
    /// Only the first match per physical line is considered.
    pub fn extract_from_line(&self, line: &str) -> Option<String> {
        self.pattern
            .captures(line)
            .and_then(|caps| self.extract.apply(&caps))
    }
}

/// Toggles for the builtin rule table.
#[derive(Debug, Clone, Copy)]
pub struct RuleConfig {
    /// Recognize Ruby `module` as a top-level definition construct.
    pub ruby_module: bool,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self { ruby_module: true }
    }
}

/// Ordered, static set of language rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<LanguageRule>,
}

static BUILTIN: Lazy<Arc<RuleSet>> =
    Lazy::new(|| Arc::new(RuleSet::with_config(RuleConfig::default())));

impl RuleSet {
    pub fn builtin() -> Self {
        Self::with_config(RuleConfig::default())
    }

    /// Shared compiled copy of the builtin table.
    pub fn builtin_shared() -> Arc<RuleSet> {
        Arc::clone(&BUILTIN)
    }

    pub fn with_config(config: RuleConfig) -> Self {
        let ruby_pattern = if config.ruby_module {
            r"(module|def|class) (self\.\w+|\w+)"
        } else {
            r"(def|class) (self\.\w+|\w+)"
        };

        // Builtin patterns are compile-time constants, validated by tests.
        let rules = vec![
            LanguageRule::new("ruby", "*.rb", ruby_pattern, Extract::StripSelfQualifier(2)),
            LanguageRule::new("python", "*.py", r"(def|class) (\w+)", Extract::Capture(2)),
            LanguageRule::new(
                "scala",
                "*.scala",
                r"(trait|object|class|def) (\w+)",
                Extract::Capture(2),
            ),
            LanguageRule::new(
                "javascript",
                "*.js",
                r"function (\w+)|(\w+): function",
                Extract::FirstOf(&[1, 2]),
            ),
        ];

        Self {
            rules: rules
                .into_iter()
                .collect::<Result<Vec<_>>>()
                .expect("builtin rule table is valid"),
        }
    }

    pub fn from_rules(rules: Vec<LanguageRule>) -> Self {
        Self { rules }
    }

    /// The rule for a file basename.
    ///
    /// Exactly one glob must match: zero matches means the dialect is
    /// unsupported, more than one is an ambiguous table and the file is
    /// skipped defensively.
    pub fn match_basename(&self, basename: &str) -> Option<&LanguageRule> {
        let mut matches = self.rules.iter().filter(|r| r.matches_basename(basename));
        let first = matches.next()?;
        if let Some(second) = matches.next() {
            tracing::debug!(
                basename,
                first = first.name(),
                second = second.name(),
                "ambiguous rule match, skipping file"
            );
            return None;
        }
        Some(first)
    }

    pub fn rule_for_path(&self, path: &Path) -> Option<&LanguageRule> {
        path.file_name()
            .and_then(|n| n.to_str())
            .and_then(|basename| self.match_basename(basename))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}
