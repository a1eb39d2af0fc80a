//! Stat/count operation: populates the totals later passes report against.

use std::fs;
use std::path::Path;

use humansize::{BINARY, format_size};

use crate::context::OperationContext;
use crate::operation::{PathOperation, Verdict};
use crate::progress::ProgressReporter;

/// Counts items and sums regular sizes over a source set.
///
/// Never prompts and never fails: a node whose metadata cannot be read is
/// not counted but still descended into if it turns out to be a directory.
pub struct CountStats<'a> {
    progress: &'a mut dyn ProgressReporter,
}

impl<'a> CountStats<'a> {
    pub fn new(progress: &'a mut dyn ProgressReporter) -> Self {
        Self { progress }
    }
}

impl PathOperation for CountStats<'_> {
    fn apply(&mut self, source: &Path, _target: &Path, cx: &mut OperationContext) -> Verdict {
        if let Ok(metadata) = fs::symlink_metadata(source) {
            cx.total_items += 1;
            if !metadata.file_type().is_dir() {
                cx.total_size += metadata.len();
            }
        }

        let status = format!("Scanning {}", source.display());
        let info = format!(
            "Items: {}\nSize: {}",
            cx.total_items,
            format_size(cx.total_size, BINARY)
        );
        self.progress.update(Some(&status), 0, 0, Some(&info));

        // A count must not cost any item its selection mark.
        cx.keep_item_selected = true;
        Verdict::ParentOkProcessChildren
    }
}
