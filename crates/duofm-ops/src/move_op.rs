//! Move operation.
//!
//! A move is a native rename: one invocation moves the whole node, so the
//! walker never recurses for it. A rename that fails (including a
//! cross-filesystem move) surfaces through the standard error prompt
//! instead of degrading into a copy.

use std::fs;
use std::io;
use std::path::Path;

use crate::context::OperationContext;
use crate::operation::{PathOperation, Verdict};
use crate::progress::ProgressReporter;
use crate::prompt::{
    CONFIRM_BUTTONS, ConfirmChoice, ErrorResolution, UserPrompt, resolve_error,
};

/// Renames one node per invocation.
pub struct MoveOp<'a> {
    prompt: &'a mut dyn UserPrompt,
    progress: &'a mut dyn ProgressReporter,
}

impl<'a> MoveOp<'a> {
    pub fn new(prompt: &'a mut dyn UserPrompt, progress: &'a mut dyn ProgressReporter) -> Self {
        Self { prompt, progress }
    }

    /// Overwrite confirmation, sharing the copy variant's memoized policy.
    fn confirm_overwrite(&mut self, target: &Path, cx: &mut OperationContext) -> ConfirmChoice {
        if cx.confirm_all_yes {
            return ConfirmChoice::Yes;
        }
        if cx.confirm_all_no {
            return ConfirmChoice::No;
        }
        let title = format!("Target exists:\n{}\nOverwrite it?", target.display());
        ConfirmChoice::from_choice(self.prompt.ask(&title, CONFIRM_BUTTONS, None, true))
    }
}

impl PathOperation for MoveOp<'_> {
    fn apply(&mut self, source: &Path, target: &Path, cx: &mut OperationContext) -> Verdict {
        let status = format!("Moving {}\nto {}", source.display(), target.display());
        self.progress
            .update(Some(&status), 0, cx.overall_percent(), None);

        loop {
            match fs::symlink_metadata(target) {
                Ok(_) => match self.confirm_overwrite(target, cx) {
                    ConfirmChoice::Yes => {}
                    ConfirmChoice::All => cx.confirm_all_yes = true,
                    ConfirmChoice::No => return Verdict::Skip,
                    ConfirmChoice::None => {
                        cx.confirm_all_no = true;
                        return Verdict::Skip;
                    }
                    ConfirmChoice::Abort => {
                        cx.request_abort();
                        return Verdict::Abort;
                    }
                },
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    let title = format!("Stat failed for {}\n{e}", target.display());
                    match resolve_error(self.prompt, cx, &title) {
                        ErrorResolution::Resolved(verdict) => return verdict,
                        ErrorResolution::Retry => continue,
                    }
                }
            }

            match fs::rename(source, target) {
                Ok(()) => return Verdict::Ok,
                Err(e) => {
                    let title = format!(
                        "Cannot move {}\nto {}\n{e}",
                        source.display(),
                        target.display()
                    );
                    match resolve_error(self.prompt, cx, &title) {
                        ErrorResolution::Resolved(verdict) => return verdict,
                        ErrorResolution::Retry => continue,
                    }
                }
            }
        }
    }
}
