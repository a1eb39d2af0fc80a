//! The recursive walker: drives one operation over a source tree.

use std::fs;
use std::path::Path;

use crate::context::OperationContext;
use crate::operation::{PathOperation, Verdict};

/// Apply `operation` to `source`, recursing into directory children when the
/// verdict asks for it.
///
/// Every invocation, including ones that immediately skip or abort, bumps
/// `cx.current_items` by exactly one. The abort flag is observed after every
/// operation call and between children, so at most one further invocation can
/// start once it is set.
pub fn walk(
    operation: &mut dyn PathOperation,
    source: &Path,
    target: &Path,
    cx: &mut OperationContext,
) -> Verdict {
    cx.current_items += 1;

    let verdict = operation.apply(source, target, cx);
    if cx.abort {
        return Verdict::Abort;
    }

    match verdict {
        Verdict::Ok | Verdict::Skip | Verdict::Abort => verdict,
        Verdict::ParentOkProcessChildren | Verdict::RetryAfterChildren => {
            // Re-check the node type; a stat failure here counts as "not a
            // directory" rather than an error.
            let is_dir = fs::symlink_metadata(source)
                .map(|m| m.file_type().is_dir())
                .unwrap_or(false);
            if !is_dir {
                return Verdict::Ok;
            }

            let entries = match fs::read_dir(source) {
                Ok(entries) => entries,
                Err(err) => {
                    // Enumeration failure gives up on this subtree only.
                    tracing::warn!("cannot enumerate {}: {err}", source.display());
                    return Verdict::Skip;
                }
            };
            for entry in entries {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        tracing::warn!("enumeration stopped in {}: {err}", source.display());
                        break;
                    }
                };
                let name = entry.file_name();
                walk(operation, &source.join(&name), &target.join(&name), cx);
                if cx.abort {
                    return Verdict::Abort;
                }
            }

            if verdict == Verdict::RetryAfterChildren {
                // The children are gone; give the node one more try.
                let second = operation.apply(source, target, cx);
                if cx.abort {
                    return Verdict::Abort;
                }
                if second != Verdict::Ok {
                    return second;
                }
            }
            Verdict::Ok
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::fs;
    use std::path::PathBuf;

    /// Scripted operation: returns queued verdicts (then `Ok`) and records
    /// every path it is applied to.
    struct Probe {
        verdicts: VecDeque<Verdict>,
        applied: Vec<PathBuf>,
        abort_on_call: Option<usize>,
    }

    impl Probe {
        fn new(verdicts: Vec<Verdict>) -> Self {
            Self {
                verdicts: verdicts.into(),
                applied: Vec::new(),
                abort_on_call: None,
            }
        }
    }

    impl PathOperation for Probe {
        fn apply(&mut self, source: &Path, _target: &Path, cx: &mut OperationContext) -> Verdict {
            self.applied.push(source.to_path_buf());
            if self.abort_on_call == Some(self.applied.len()) {
                cx.request_abort();
            }
            self.verdicts.pop_front().unwrap_or(Verdict::Ok)
        }
    }

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/one"), b"1").unwrap();
        fs::write(dir.path().join("sub/two"), b"2").unwrap();
        dir
    }

    #[test]
    fn test_counts_every_invocation() {
        let dir = tree();
        let mut cx = OperationContext::new();
        let mut op = Probe::new(vec![Verdict::ParentOkProcessChildren]);

        let verdict = walk(&mut op, &dir.path().join("sub"), Path::new("/nonexistent"), &mut cx);

        assert_eq!(verdict, Verdict::Ok);
        // Parent plus two children, one increment each.
        assert_eq!(cx.current_items, 3);
        assert_eq!(op.applied.len(), 3);
    }

    #[test]
    fn test_skip_does_not_recurse() {
        let dir = tree();
        let mut cx = OperationContext::new();
        let mut op = Probe::new(vec![Verdict::Skip]);

        let verdict = walk(&mut op, &dir.path().join("sub"), Path::new("/nonexistent"), &mut cx);

        assert_eq!(verdict, Verdict::Skip);
        assert_eq!(cx.current_items, 1);
        assert_eq!(op.applied.len(), 1);
    }

    #[test]
    fn test_retry_after_children_revisits_parent() {
        let dir = tree();
        let sub = dir.path().join("sub");
        let mut cx = OperationContext::new();
        let mut op = Probe::new(vec![Verdict::RetryAfterChildren]);

        let verdict = walk(&mut op, &sub, Path::new("/nonexistent"), &mut cx);

        assert_eq!(verdict, Verdict::Ok);
        // Parent, two children, parent again.
        assert_eq!(op.applied.len(), 4);
        assert_eq!(op.applied.first(), Some(&sub));
        assert_eq!(op.applied.last(), Some(&sub));
        // The second parent visit is not a walker invocation.
        assert_eq!(cx.current_items, 3);
    }

    #[test]
    fn test_abort_stops_children_early() {
        let dir = tree();
        let mut cx = OperationContext::new();
        let mut op = Probe::new(vec![Verdict::ParentOkProcessChildren]);
        // Abort inside the first child.
        op.abort_on_call = Some(2);

        let verdict = walk(&mut op, &dir.path().join("sub"), Path::new("/nonexistent"), &mut cx);

        assert_eq!(verdict, Verdict::Abort);
        assert_eq!(op.applied.len(), 2);
    }

    #[test]
    fn test_non_directory_with_children_verdict_ends_ok() {
        let dir = tree();
        let file = dir.path().join("sub/one");
        let mut cx = OperationContext::new();
        let mut op = Probe::new(vec![Verdict::ParentOkProcessChildren]);

        let verdict = walk(&mut op, &file, Path::new("/nonexistent"), &mut cx);

        assert_eq!(verdict, Verdict::Ok);
        assert_eq!(op.applied.len(), 1);
    }
}
