//! Panel model: a directory listing with cursor and selection.
//!
//! Rendering is not this crate's concern; the panel is the data the
//! operation engine and a front end share.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::entry::PanelEntry;
use crate::error::FmError;

/// Field a panel is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortKey {
    #[default]
    Name,
    Size,
    Modified,
}

/// Panel sort order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SortOrder {
    pub key: SortKey,
    pub ascending: bool,
    /// List directories before everything else.
    pub dirs_first: bool,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            key: SortKey::Name,
            ascending: true,
            dirs_first: true,
        }
    }
}

/// One panel: a directory path, its ordered entries, and a cursor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Panel {
    /// Directory this panel lists.
    pub path: PathBuf,

    /// Entries in display order.
    pub entries: Vec<PanelEntry>,

    /// Index of the entry under the cursor.
    pub cursor: usize,
}

impl Panel {
    /// Read a directory into a panel, sorted by the default order.
    ///
    /// Entries are lstat'ed; symlinks are never followed. An entry whose
    /// metadata cannot be read is dropped from the listing.
    pub fn read_dir(path: impl Into<PathBuf>) -> Result<Self, FmError> {
        let path = path.into();
        let meta = fs::metadata(&path).map_err(|e| FmError::io(&path, e))?;
        if !meta.is_dir() {
            return Err(FmError::NotADirectory { path });
        }

        let mut entries = Vec::new();
        let iter = fs::read_dir(&path).map_err(|e| FmError::io(&path, e))?;
        for dir_entry in iter {
            let dir_entry = dir_entry.map_err(|e| FmError::io(&path, e))?;
            let entry_path = dir_entry.path();
            let Ok(metadata) = fs::symlink_metadata(&entry_path) else {
                continue;
            };
            let link_target = if metadata.file_type().is_symlink() {
                let target: CompactString = fs::read_link(&entry_path)
                    .map(|t| t.to_string_lossy().into_owned().into())
                    .unwrap_or_default();
                let broken = fs::metadata(&entry_path).is_err();
                Some((target, broken))
            } else {
                None
            };
            entries.push(PanelEntry::from_metadata(
                dir_entry.file_name().to_string_lossy().into_owned(),
                &metadata,
                link_target,
            ));
        }

        let mut panel = Self {
            path,
            entries,
            cursor: 0,
        };
        panel.sort(&SortOrder::default());
        Ok(panel)
    }

    /// Re-sort the entries. The cursor stays at its index, not its entry.
    pub fn sort(&mut self, order: &SortOrder) {
        let SortOrder {
            key,
            ascending,
            dirs_first,
        } = *order;
        self.entries.sort_by(|a, b| {
            if dirs_first {
                match (a.is_dir(), b.is_dir()) {
                    (true, false) => return Ordering::Less,
                    (false, true) => return Ordering::Greater,
                    _ => {}
                }
            }
            let cmp = match key {
                SortKey::Name => a.name.cmp(&b.name),
                SortKey::Size => a.size.cmp(&b.size).then_with(|| a.name.cmp(&b.name)),
                SortKey::Modified => a
                    .modified
                    .cmp(&b.modified)
                    .then_with(|| a.name.cmp(&b.name)),
            };
            if ascending { cmp } else { cmp.reverse() }
        });
    }

    /// The entry under the cursor, if the panel is not empty.
    pub fn cursor_entry(&self) -> Option<&PanelEntry> {
        self.entries.get(self.cursor)
    }

    /// Number of entries carrying the selection mark.
    pub fn selected_count(&self) -> usize {
        self.entries.iter().filter(|e| e.selected).count()
    }

    /// Look up an entry by name.
    pub fn entry(&self, name: &str) -> Option<&PanelEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Mark the named entry selected. Returns false if there is no such entry.
    pub fn select(&mut self, name: &str) -> bool {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => {
                entry.selected = true;
                true
            }
            None => false,
        }
    }

    /// Toggle the selection mark on the entry under the cursor.
    pub fn toggle_select(&mut self) {
        if let Some(entry) = self.entries.get_mut(self.cursor) {
            entry.selected = !entry.selected;
        }
    }

    /// Move the cursor to the named entry. Returns false if there is no such
    /// entry.
    pub fn set_cursor(&mut self, name: &str) -> bool {
        match self.entries.iter().position(|e| e.name == name) {
            Some(index) => {
                self.cursor = index;
                true
            }
            None => false,
        }
    }

    /// Drop all selection marks.
    pub fn clear_selection(&mut self) {
        for entry in &mut self.entries {
            entry.selected = false;
        }
    }

    /// Full path of the named entry within this panel.
    pub fn entry_path(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

/// Convenience for front ends: true when `path` names a directory.
pub fn is_directory(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}
