//! Copy operation: regular files, directories, symlinks, device nodes.

use std::ffi::CString;
use std::fs::{self, File, OpenOptions, Permissions};
use std::io::{self, Read, Write};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::{FileTypeExt, MetadataExt, OpenOptionsExt, PermissionsExt, symlink};
use std::path::Path;

use crate::COPY_CHUNK_SIZE;
use crate::context::OperationContext;
use crate::operation::{PathOperation, Verdict};
use crate::progress::ProgressReporter;
use crate::prompt::{
    CONFIRM_BUTTONS, ConfirmChoice, ErrorResolution, UserPrompt, resolve_error,
};

/// Copies one node per invocation; directory contents are the walker's job.
///
/// Expects a count pass to have populated the context's totals, which feed
/// the overall percentage.
pub struct CopyOp<'a> {
    prompt: &'a mut dyn UserPrompt,
    progress: &'a mut dyn ProgressReporter,
    chunk_size: usize,
}

impl<'a> CopyOp<'a> {
    pub fn new(prompt: &'a mut dyn UserPrompt, progress: &'a mut dyn ProgressReporter) -> Self {
        Self {
            prompt,
            progress,
            chunk_size: COPY_CHUNK_SIZE,
        }
    }

    /// Override the copy buffer size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    fn try_copy(
        &mut self,
        source: &Path,
        target: &Path,
        cx: &mut OperationContext,
    ) -> Result<Verdict, String> {
        let src_md = fs::symlink_metadata(source)
            .map_err(|e| format!("Stat failed for {}\n{e}", source.display()))?;
        let tgt_md = match fs::symlink_metadata(target) {
            Ok(md) => Some(md),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(format!("Stat failed for {}\n{e}", target.display())),
        };

        let file_type = src_md.file_type();
        if file_type.is_file() {
            if tgt_md.as_ref().is_some_and(|m| m.is_dir()) {
                return Err(format!(
                    "Cannot overwrite directory\n{}\nwith a file\n{}",
                    target.display(),
                    source.display()
                ));
            }
            self.copy_regular(source, target, &src_md, cx)
        } else if file_type.is_dir() {
            if tgt_md.as_ref().is_some_and(|m| m.is_dir()) {
                // An existing target directory is taken as-is, metadata
                // untouched; the children still get copied into it.
                return Ok(Verdict::ParentOkProcessChildren);
            }
            fs::create_dir(target)
                .and_then(|()| {
                    fs::set_permissions(target, Permissions::from_mode(src_md.mode() & 0o7777))
                })
                .map_err(|e| format!("Failed to create directory:\n{}\n{e}", target.display()))?;
            Ok(Verdict::ParentOkProcessChildren)
        } else if file_type.is_symlink() {
            let link = fs::read_link(source).map_err(|e| {
                format!("Failed to read symbolic link from\n{}\n{e}", source.display())
            })?;
            symlink(&link, target).map_err(|e| {
                format!("Failed to create symbolic link\n{}\n{e}", target.display())
            })?;
            Ok(Verdict::Ok)
        } else if file_type.is_char_device() || file_type.is_block_device() {
            mknod(target, &src_md)?;
            Ok(Verdict::Ok)
        } else {
            // Sockets and FIFOs are not materialized at the destination.
            tracing::debug!("not copying special file {}", source.display());
            Ok(Verdict::Ok)
        }
    }

    fn copy_regular(
        &mut self,
        source: &Path,
        target: &Path,
        src_md: &fs::Metadata,
        cx: &mut OperationContext,
    ) -> Result<Verdict, String> {
        let mut src = File::open(source).map_err(|e| {
            format!("Cannot open source file for reading:\n{}\n{e}", source.display())
        })?;
        let mode = src_md.mode() & 0o7777;

        let mut tgt = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(mode)
            .open(target)
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                let choice = if cx.confirm_all_yes {
                    ConfirmChoice::Yes
                } else if cx.confirm_all_no {
                    ConfirmChoice::No
                } else {
                    let title = format!(
                        "Target file exists:\n{}\nOverwrite this file?",
                        target.display()
                    );
                    ConfirmChoice::from_choice(self.prompt.ask(&title, CONFIRM_BUTTONS, None, true))
                };
                match choice {
                    ConfirmChoice::Yes => {}
                    ConfirmChoice::All => cx.confirm_all_yes = true,
                    ConfirmChoice::No => return Ok(Verdict::Skip),
                    ConfirmChoice::None => {
                        cx.confirm_all_no = true;
                        return Ok(Verdict::Skip);
                    }
                    ConfirmChoice::Abort => {
                        cx.request_abort();
                        return Ok(Verdict::Abort);
                    }
                }
                OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .mode(mode)
                    .open(target)
                    .map_err(|e| {
                        format!("Cannot open target file for writing:\n{}\n{e}", target.display())
                    })?
            }
            Err(e) => {
                return Err(format!(
                    "Cannot open target file for writing:\n{}\n{e}",
                    target.display()
                ));
            }
        };

        let size = src_md.len();
        let status = format!("Copying {}\nto {}", source.display(), target.display());
        let mut buffer = vec![0u8; self.chunk_size];
        let mut copied: u64 = 0;
        loop {
            let read = src
                .read(&mut buffer)
                .map_err(|e| format!("Cannot read data from:\n{}\n{e}", source.display()))?;
            if read == 0 {
                break;
            }
            let written = tgt
                .write(&buffer[..read])
                .map_err(|e| format!("Cannot write data to:\n{}\n{e}", target.display()))?;
            if written != read {
                return Err(format!(
                    "Cannot write data to:\n{}\nshort write ({written} of {read} bytes)",
                    target.display()
                ));
            }
            copied += read as u64;
            let item_percent = if size == 0 {
                100
            } else {
                (copied * 100 / size).min(100) as u8
            };
            self.progress
                .update(Some(&status), item_percent, cx.overall_percent(), None);
        }

        Ok(Verdict::Ok)
    }
}

impl PathOperation for CopyOp<'_> {
    fn apply(&mut self, source: &Path, target: &Path, cx: &mut OperationContext) -> Verdict {
        let status = format!("Copying {}\nto {}", source.display(), target.display());
        self.progress
            .update(Some(&status), 0, cx.overall_percent(), None);

        loop {
            match self.try_copy(source, target, cx) {
                Ok(verdict) => return verdict,
                Err(message) => match resolve_error(self.prompt, cx, &message) {
                    ErrorResolution::Resolved(verdict) => return verdict,
                    ErrorResolution::Retry => continue,
                },
            }
        }
    }
}

/// Recreate a device node with matching mode and device id.
fn mknod(target: &Path, metadata: &fs::Metadata) -> Result<(), String> {
    let path = CString::new(target.as_os_str().as_bytes())
        .map_err(|_| format!("Invalid target path:\n{}", target.display()))?;
    let rc = unsafe {
        libc::mknod(
            path.as_ptr(),
            metadata.mode() as libc::mode_t,
            metadata.rdev() as libc::dev_t,
        )
    };
    if rc != 0 {
        let err = io::Error::last_os_error();
        return Err(format!(
            "Failed to create special file\n{}\n{err}",
            target.display()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SilentReporter;
    use std::fs;

    struct NoPrompt;

    impl UserPrompt for NoPrompt {
        fn ask(&mut self, title: &str, _: &[&str], _: Option<&str>, _: bool) -> crate::Choice {
            panic!("unexpected prompt: {title}");
        }
    }

    #[test]
    fn test_copy_regular_preserves_contents_and_mode() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("src.bin");
        let target = dir.path().join("dst.bin");
        fs::write(&source, vec![7u8; 40_000]).unwrap();
        fs::set_permissions(&source, Permissions::from_mode(0o700)).unwrap();

        let mut prompt = NoPrompt;
        let mut reporter = SilentReporter;
        let mut cx = OperationContext::new();
        let verdict = CopyOp::new(&mut prompt, &mut reporter)
            .with_chunk_size(1024)
            .apply(&source, &target, &mut cx);

        assert_eq!(verdict, Verdict::Ok);
        assert_eq!(fs::read(&target).unwrap(), vec![7u8; 40_000]);
        // open(2) applies the umask; the owner bits survive any common one.
        let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o700;
        assert_eq!(mode, 0o700);
    }

    #[test]
    fn test_copy_directory_over_existing_directory_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a");
        let target = dir.path().join("b");
        fs::create_dir(&source).unwrap();
        fs::create_dir(&target).unwrap();

        let mut prompt = NoPrompt;
        let mut reporter = SilentReporter;
        let mut cx = OperationContext::new();
        let verdict = CopyOp::new(&mut prompt, &mut reporter).apply(&source, &target, &mut cx);

        assert_eq!(verdict, Verdict::ParentOkProcessChildren);
    }
}
