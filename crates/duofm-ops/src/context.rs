//! Mutable state threaded through one mass action.

use std::path::{Path, PathBuf};

/// State shared by the orchestrator, the walker, and every operation
/// invocation of one mass action.
///
/// A context is created fresh per mass action and discarded afterwards;
/// none of the policy flags survive into the next action.
#[derive(Debug, Default)]
pub struct OperationContext {
    /// Overall-progress denominator, populated by the count pass.
    pub total_items: u64,

    /// Walker invocations so far in the current pass.
    pub current_items: u64,

    /// Total bytes seen by the count pass. Display only.
    pub total_size: u64,

    /// Monotonic: once set, no further operation invocations happen and all
    /// stack frames return immediately.
    pub abort: bool,

    /// Auto-skip all subsequent recoverable errors without prompting.
    pub skip_all: bool,

    /// Auto-answer "delete recursively?" (and "overwrite?") with yes.
    pub confirm_all_yes: bool,

    /// Auto-answer "delete recursively?" (and "overwrite?") with no.
    pub confirm_all_no: bool,

    /// Directory for which recursive deletion was already confirmed;
    /// descendants are auto-confirmed without prompting.
    confirm_yes_prefix: Option<PathBuf>,

    /// Output flag: tells the orchestrator to leave the current panel item's
    /// selection mark in place.
    pub keep_item_selected: bool,
}

impl OperationContext {
    /// Create a fresh context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rezero the per-pass numerator so the totals gathered by a count pass
    /// carry into the copy/delete pass that follows on the same context.
    pub fn start_pass(&mut self) {
        self.current_items = 0;
        self.keep_item_selected = false;
    }

    /// Request the mass action to halt. The flag is never cleared.
    pub fn request_abort(&mut self) {
        self.abort = true;
    }

    /// Overall progress in percent, against the count pass's total.
    pub fn overall_percent(&self) -> u8 {
        if self.total_items == 0 {
            return 0;
        }
        (self.current_items * 100 / self.total_items).min(100) as u8
    }

    /// True when recursive deletion under an ancestor of `path` was already
    /// confirmed.
    pub fn confirmed_by_prefix(&self, path: &Path) -> bool {
        self.confirm_yes_prefix
            .as_deref()
            .is_some_and(|prefix| path.starts_with(prefix))
    }

    /// Remember `path` as the confirmed-delete root. Left alone when the
    /// current prefix already covers it.
    pub fn remember_confirmed(&mut self, path: &Path) {
        if !self.confirmed_by_prefix(path) {
            self.confirm_yes_prefix = Some(path.to_path_buf());
        }
    }
}
