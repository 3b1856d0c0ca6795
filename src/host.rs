//! Host editor boundary.
//!
//! The index never talks to a UI or an event loop directly; everything it
//! needs from the surrounding editor is expressed as this capability trait.

use std::path::{Path, PathBuf};

/// A deferred unit of work handed to the host's scheduler.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// One row of a choice list: symbol name plus its defining file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub label: String,
    pub sublabel: String,
}

pub trait EditorHost: Send + Sync {
    /// Root directories of the current project, queried once per build.
    fn project_roots(&self) -> Vec<PathBuf>;

    /// Open `path`, clear the selection, place the cursor at `byte_offset`
    /// and scroll it into view.
    fn navigate_to(&self, path: &Path, byte_offset: usize);

    /// Prompt the user to pick a row. `None` means the prompt was cancelled.
    fn present_choice_list(&self, rows: Vec<DisplayRow>) -> Option<usize>;

    /// Run `job` off the primary thread. The index schedules at most one
    /// build job per instance at a time.
    fn run_in_background(&self, job: Job);

    /// Run `job` back on the primary thread; build completion is delivered
    /// this way because the consumer requires single-threaded access.
    fn defer_to_primary_thread(&self, job: Job);

    /// Best-effort, non-blocking status text.
    fn show_transient_status(&self, text: &str) {
        let _ = text;
    }
}
