//! Panel entry types.

use std::fs::Metadata;
use std::os::unix::fs::{FileTypeExt, PermissionsExt};
use std::time::SystemTime;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Type of a directory entry as shown in a panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntryKind {
    /// Regular file.
    File {
        /// Whether the file is executable.
        executable: bool,
    },
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink {
        /// Link target path.
        target: CompactString,
        /// Whether the link target exists.
        broken: bool,
    },
    /// Character or block device.
    Device,
    /// Other file types (sockets, FIFOs).
    Other,
}

impl EntryKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, EntryKind::File { .. })
    }

    /// Check if this is a symlink.
    pub fn is_symlink(&self) -> bool {
        matches!(self, EntryKind::Symlink { .. })
    }
}

/// A single entry in a panel listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelEntry {
    /// Entry name (not full path).
    pub name: CompactString,

    /// Entry type and associated metadata.
    pub kind: EntryKind,

    /// Size in bytes as reported by lstat.
    pub size: u64,

    /// Last modification time.
    pub modified: SystemTime,

    /// Unix mode bits.
    pub mode: u32,

    /// Selection mark (Insert key in the panel).
    pub selected: bool,
}

impl PanelEntry {
    /// Create an entry from lstat metadata.
    ///
    /// `link_target` carries the readlink result for symlinks, together with
    /// whether the target resolves.
    pub fn from_metadata(
        name: impl Into<CompactString>,
        metadata: &Metadata,
        link_target: Option<(CompactString, bool)>,
    ) -> Self {
        let file_type = metadata.file_type();
        let mode = metadata.permissions().mode();

        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_symlink() {
            let (target, broken) = link_target.unwrap_or_else(|| ("".into(), true));
            EntryKind::Symlink { target, broken }
        } else if file_type.is_file() {
            EntryKind::File {
                executable: mode & 0o111 != 0,
            }
        } else if file_type.is_char_device() || file_type.is_block_device() {
            EntryKind::Device
        } else {
            EntryKind::Other
        };

        Self {
            name: name.into(),
            kind,
            size: metadata.len(),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            mode,
            selected: false,
        }
    }

    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Check if this entry is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }
}
