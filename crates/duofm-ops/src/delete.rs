//! Delete operation: rmdir/unlink with recursive-delete confirmation.

use std::fs;
use std::io;
use std::path::Path;

use crate::context::OperationContext;
use crate::operation::{PathOperation, Verdict};
use crate::progress::ProgressReporter;
use crate::prompt::{
    CONFIRM_BUTTONS, ConfirmChoice, ErrorResolution, UserPrompt, resolve_error,
};

/// Deletes one node per invocation.
///
/// Never recurses on its own: a non-empty directory comes back as
/// [`Verdict::RetryAfterChildren`], so the walker deletes the children first
/// and then retries the now-empty directory.
pub struct DeleteOp<'a> {
    prompt: &'a mut dyn UserPrompt,
    progress: &'a mut dyn ProgressReporter,
}

impl<'a> DeleteOp<'a> {
    pub fn new(prompt: &'a mut dyn UserPrompt, progress: &'a mut dyn ProgressReporter) -> Self {
        Self { prompt, progress }
    }

    fn confirm_recursive(&mut self, source: &Path, cx: &mut OperationContext) -> Verdict {
        // Memoized policies resolve without prompting; "none" wins over "all".
        if cx.confirm_all_no {
            cx.keep_item_selected = true;
            return Verdict::Skip;
        }
        if cx.confirm_all_yes || cx.confirmed_by_prefix(source) {
            return Verdict::RetryAfterChildren;
        }

        let title = format!(
            "Directory \"{}\" not empty.\nDelete it recursively?",
            source.display()
        );
        match ConfirmChoice::from_choice(self.prompt.ask(&title, CONFIRM_BUTTONS, None, true)) {
            ConfirmChoice::Yes => {
                cx.remember_confirmed(source);
                Verdict::RetryAfterChildren
            }
            ConfirmChoice::No => {
                cx.keep_item_selected = true;
                Verdict::Skip
            }
            ConfirmChoice::All => {
                cx.confirm_all_yes = true;
                Verdict::RetryAfterChildren
            }
            ConfirmChoice::None => {
                cx.keep_item_selected = true;
                cx.confirm_all_no = true;
                Verdict::Skip
            }
            ConfirmChoice::Abort => {
                cx.request_abort();
                Verdict::Abort
            }
        }
    }
}

impl PathOperation for DeleteOp<'_> {
    fn apply(&mut self, source: &Path, _target: &Path, cx: &mut OperationContext) -> Verdict {
        let status = format!("Deleting {}", source.display());
        self.progress
            .update(Some(&status), 100, cx.overall_percent(), None);

        loop {
            let metadata = match fs::symlink_metadata(source) {
                Ok(metadata) => metadata,
                Err(e) => {
                    let title = format!("Stat failed for \"{}\"\n{e}", source.display());
                    match resolve_error(self.prompt, cx, &title) {
                        ErrorResolution::Resolved(verdict) => return verdict,
                        ErrorResolution::Retry => continue,
                    }
                }
            };

            if metadata.file_type().is_dir() {
                match fs::remove_dir(source) {
                    Ok(()) => return Verdict::Ok,
                    Err(e) if directory_not_empty(&e) => {
                        return self.confirm_recursive(source, cx);
                    }
                    Err(e) => {
                        let title = format!("Cannot remove \"{}\"\n{e}", source.display());
                        match resolve_error(self.prompt, cx, &title) {
                            ErrorResolution::Resolved(verdict) => return verdict,
                            ErrorResolution::Retry => continue,
                        }
                    }
                }
            } else {
                match fs::remove_file(source) {
                    Ok(()) => return Verdict::Ok,
                    Err(e) => {
                        let title = format!("Cannot remove \"{}\"\n{e}", source.display());
                        match resolve_error(self.prompt, cx, &title) {
                            ErrorResolution::Resolved(verdict) => return verdict,
                            ErrorResolution::Retry => continue,
                        }
                    }
                }
            }
        }
    }
}

/// `rmdir` on a populated directory; some filesystems report `EEXIST`.
fn directory_not_empty(err: &io::Error) -> bool {
    matches!(
        err.raw_os_error(),
        Some(libc::ENOTEMPTY) | Some(libc::EEXIST)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SilentReporter;
    use crate::prompt::Choice;
    use std::collections::VecDeque;

    struct Scripted {
        answers: VecDeque<Choice>,
        asked: usize,
    }

    impl Scripted {
        fn new(answers: Vec<Choice>) -> Self {
            Self {
                answers: answers.into(),
                asked: 0,
            }
        }
    }

    impl UserPrompt for Scripted {
        fn ask(&mut self, title: &str, _: &[&str], _: Option<&str>, _: bool) -> Choice {
            self.asked += 1;
            self.answers
                .pop_front()
                .unwrap_or_else(|| panic!("unexpected prompt: {title}"))
        }
    }

    #[test]
    fn test_delete_file_without_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("victim");
        std::fs::write(&file, b"x").unwrap();

        let mut prompt = Scripted::new(vec![]);
        let mut reporter = SilentReporter;
        let mut cx = OperationContext::new();
        let verdict = DeleteOp::new(&mut prompt, &mut reporter).apply(&file, &file, &mut cx);

        assert_eq!(verdict, Verdict::Ok);
        assert!(!file.exists());
        assert_eq!(prompt.asked, 0);
    }

    #[test]
    fn test_stat_failure_skip_all_suppresses_later_prompts() {
        let dir = tempfile::tempdir().unwrap();
        let ghost1 = dir.path().join("ghost1");
        let ghost2 = dir.path().join("ghost2");

        // "Skip all" on the first missing path.
        let mut prompt = Scripted::new(vec![Choice::Button(2)]);
        let mut reporter = SilentReporter;
        let mut cx = OperationContext::new();

        let mut op = DeleteOp::new(&mut prompt, &mut reporter);
        assert_eq!(op.apply(&ghost1, &ghost1, &mut cx), Verdict::Skip);
        assert!(cx.skip_all);
        assert!(cx.keep_item_selected);

        // Second failure resolves silently.
        assert_eq!(op.apply(&ghost2, &ghost2, &mut cx), Verdict::Skip);
        assert_eq!(prompt.asked, 1);
    }

    #[test]
    fn test_non_empty_directory_asks_once_per_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("root");
        std::fs::create_dir_all(root.join("sub")).unwrap();
        std::fs::write(root.join("sub/file"), b"x").unwrap();

        // Answer Yes at the root only.
        let mut prompt = Scripted::new(vec![Choice::Button(1)]);
        let mut reporter = SilentReporter;
        let mut cx = OperationContext::new();
        let mut op = DeleteOp::new(&mut prompt, &mut reporter);

        assert_eq!(op.apply(&root, &root, &mut cx), Verdict::RetryAfterChildren);
        // The subdirectory is covered by the remembered prefix.
        assert_eq!(
            op.apply(&root.join("sub"), &root.join("sub"), &mut cx),
            Verdict::RetryAfterChildren
        );
        assert_eq!(prompt.asked, 1);
    }

    #[test]
    fn test_confirm_abort_sets_flag() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("root");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(root.join("file"), b"x").unwrap();

        let mut prompt = Scripted::new(vec![Choice::Button(5)]);
        let mut reporter = SilentReporter;
        let mut cx = OperationContext::new();
        let verdict = DeleteOp::new(&mut prompt, &mut reporter).apply(&root, &root, &mut cx);

        assert_eq!(verdict, Verdict::Abort);
        assert!(cx.abort);
        assert!(root.exists());
    }
}
