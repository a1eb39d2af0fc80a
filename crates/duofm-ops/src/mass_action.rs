//! Mass-action orchestrator: applies one operation across a panel.

use std::path::Path;

use duofm_core::Panel;

use crate::context::OperationContext;
use crate::operation::{PathOperation, Verdict};
use crate::walker::walk;

/// Run `operation` over the panel's selection, or over the entry under the
/// cursor when nothing is selected.
///
/// With a selection, the destination of each item is `target_spec` joined
/// with the item's name, and items whose walk settles without
/// `keep_item_selected` lose their selection mark. For the cursor item, an
/// absolute `target_spec` is joined with the item's name while a relative one
/// names the destination leaf inside the panel's directory.
///
/// Returns [`Verdict::Abort`] when the action was aborted, [`Verdict::Ok`]
/// otherwise. Already-completed items are never rolled back.
pub fn run_mass_action(
    operation: &mut dyn PathOperation,
    panel: &mut Panel,
    target_spec: &Path,
    cx: &mut OperationContext,
) -> Verdict {
    if panel.selected_count() == 0 {
        let Some(name) = panel.cursor_entry().map(|e| e.name.to_string()) else {
            return Verdict::Ok;
        };
        let source = panel.path.join(&name);
        let target = if target_spec.is_absolute() {
            target_spec.join(&name)
        } else {
            panel.path.join(target_spec)
        };
        cx.keep_item_selected = false;
        walk(operation, &source, &target, cx);
        return if cx.abort { Verdict::Abort } else { Verdict::Ok };
    }

    for index in 0..panel.entries.len() {
        if !panel.entries[index].selected {
            continue;
        }
        cx.keep_item_selected = false;
        let name = panel.entries[index].name.to_string();
        let source = panel.path.join(&name);
        let target = target_spec.join(&name);

        let verdict = walk(operation, &source, &target, cx);
        if cx.abort {
            // Later items stay untouched and selected.
            return Verdict::Abort;
        }
        if verdict.is_settled() && !cx.keep_item_selected {
            panel.entries[index].selected = false;
        }
    }
    Verdict::Ok
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records sources and targets; optionally aborts on the nth call.
    struct Recorder {
        calls: Vec<(std::path::PathBuf, std::path::PathBuf)>,
        abort_on_call: Option<usize>,
        keep_selected: bool,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                calls: Vec::new(),
                abort_on_call: None,
                keep_selected: false,
            }
        }
    }

    impl PathOperation for Recorder {
        fn apply(&mut self, source: &Path, target: &Path, cx: &mut OperationContext) -> Verdict {
            self.calls.push((source.to_path_buf(), target.to_path_buf()));
            if self.abort_on_call == Some(self.calls.len()) {
                cx.request_abort();
                return Verdict::Abort;
            }
            if self.keep_selected {
                cx.keep_item_selected = true;
            }
            Verdict::Ok
        }
    }

    fn panel_with(names: &[&str]) -> (tempfile::TempDir, Panel) {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        let panel = Panel::read_dir(dir.path()).unwrap();
        (dir, panel)
    }

    #[test]
    fn test_cursor_item_with_absolute_target() {
        let (_dir, mut panel) = panel_with(&["a", "b"]);
        panel.set_cursor("b");
        let mut op = Recorder::new();
        let mut cx = OperationContext::new();

        run_mass_action(&mut op, &mut panel, Path::new("/dest"), &mut cx);

        assert_eq!(op.calls.len(), 1);
        assert_eq!(op.calls[0].0, panel.path.join("b"));
        assert_eq!(op.calls[0].1, Path::new("/dest/b"));
    }

    #[test]
    fn test_cursor_item_with_relative_target_is_a_leaf_name() {
        let (_dir, mut panel) = panel_with(&["a"]);
        panel.set_cursor("a");
        let mut op = Recorder::new();
        let mut cx = OperationContext::new();

        run_mass_action(&mut op, &mut panel, Path::new("renamed"), &mut cx);

        assert_eq!(op.calls[0].1, panel.path.join("renamed"));
    }

    #[test]
    fn test_selection_is_cleared_per_item() {
        let (_dir, mut panel) = panel_with(&["a", "b", "c"]);
        panel.select("a");
        panel.select("c");
        let mut op = Recorder::new();
        let mut cx = OperationContext::new();

        let verdict = run_mass_action(&mut op, &mut panel, Path::new("/dest"), &mut cx);

        assert_eq!(verdict, Verdict::Ok);
        assert_eq!(op.calls.len(), 2);
        assert_eq!(panel.selected_count(), 0);
        assert!(!panel.entry("b").unwrap().selected);
    }

    #[test]
    fn test_keep_item_selected_is_honored() {
        let (_dir, mut panel) = panel_with(&["a", "b"]);
        panel.select("a");
        panel.select("b");
        let mut op = Recorder::new();
        op.keep_selected = true;
        let mut cx = OperationContext::new();

        run_mass_action(&mut op, &mut panel, Path::new("/dest"), &mut cx);

        assert_eq!(panel.selected_count(), 2);
    }

    #[test]
    fn test_abort_leaves_remaining_items_selected() {
        let (_dir, mut panel) = panel_with(&["a", "b", "c"]);
        for name in ["a", "b", "c"] {
            panel.select(name);
        }
        let mut op = Recorder::new();
        op.abort_on_call = Some(2);
        let mut cx = OperationContext::new();

        let verdict = run_mass_action(&mut op, &mut panel, Path::new("/dest"), &mut cx);

        assert_eq!(verdict, Verdict::Abort);
        // First item processed and deselected; the aborted one and the
        // untouched one keep their marks.
        assert_eq!(panel.selected_count(), 2);
        assert!(!panel.entries[0].selected);
    }
}
