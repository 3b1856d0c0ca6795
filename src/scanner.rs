//! Line-oriented file scanner.
//!
//! Applies one dialect's rule to a file's text and emits a [`Definition`]
//! per matched line. Offsets are byte offsets of the start of the matching
//! line; column precision is out of scope.

use std::fs;
use std::path::Path;
use std::str::SplitInclusive;

use crate::error::Result;
use crate::index::Definition;
use crate::rules::LanguageRule;

/// Lazy scan over a file's text. Consumed once; not restartable.
pub struct DefinitionScan<'a> {
    path: &'a Path,
    rule: &'a LanguageRule,
    lines: SplitInclusive<'a, char>,
    offset: usize,
}

impl<'a> Iterator for DefinitionScan<'a> {
    type Item = Definition;

    fn next(&mut self) -> Option<Definition> {
        for line in self.lines.by_ref() {
            let line_start = self.offset;
            // Advance past the line terminator before yielding.
            self.offset += line.len();
            if let Some(name) = self.rule.extract_from_line(line) {
                return Some(Definition {
                    name,
                    file_path: self.path.to_path_buf(),
                    byte_offset: line_start,
                });
            }
        }
        None
    }
}

/// Scan already-loaded text, tracking byte offsets from 0.
pub fn scan_text<'a>(path: &'a Path, text: &'a str, rule: &'a LanguageRule) -> DefinitionScan<'a> {
    DefinitionScan {
        path,
        rule,
        lines: text.split_inclusive('\n'),
        offset: 0,
    }
}

/// Read and scan one file.
///
/// Errors are contained per file: the caller treats a failed read or a
/// non-UTF-8 file as producing zero entries.
pub fn scan_file(path: &Path, rule: &LanguageRule) -> Result<Vec<Definition>> {
    let text = String::from_utf8(fs::read(path)?)?;
    Ok(scan_text(path, &text, rule).collect())
}
