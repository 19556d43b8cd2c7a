//! The set of open template documents.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::base::FileId;

/// Text of one document at one revision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceText {
    pub text: Arc<str>,
    /// Bumped on every content change of this file.
    pub revision: u64,
}

/// Maps template paths to stable [`FileId`]s and holds their text.
#[derive(Debug, Default)]
pub struct FileSet {
    inner: RwLock<FileSetInner>,
}

#[derive(Debug, Default)]
struct FileSetInner {
    path_to_id: IndexMap<PathBuf, FileId>,
    id_to_path: IndexMap<FileId, PathBuf>,
    contents: IndexMap<FileId, SourceText>,
    next_id: u32,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create a FileId for a path.
    pub fn file_id(&self, path: &Path) -> FileId {
        // Fast path: read lock
        {
            let inner = self.inner.read();
            if let Some(&id) = inner.path_to_id.get(path) {
                return id;
            }
        }

        let mut inner = self.inner.write();
        if let Some(&id) = inner.path_to_id.get(path) {
            return id;
        }

        let id = FileId::new(inner.next_id);
        inner.next_id += 1;
        inner.path_to_id.insert(path.to_owned(), id);
        inner.id_to_path.insert(id, path.to_owned());
        id
    }

    /// Look up a path without assigning an id.
    pub fn lookup(&self, path: &Path) -> Option<FileId> {
        self.inner.read().path_to_id.get(path).copied()
    }

    pub fn path(&self, file: FileId) -> Option<PathBuf> {
        self.inner.read().id_to_path.get(&file).cloned()
    }

    /// Replace the text of `file`; returns the new revision.
    ///
    /// Setting identical text keeps the revision.
    pub fn set_contents(&self, file: FileId, contents: impl Into<Arc<str>>) -> u64 {
        let text = contents.into();
        let mut inner = self.inner.write();
        match inner.contents.get_mut(&file) {
            Some(existing) if existing.text == text => existing.revision,
            Some(existing) => {
                existing.text = text;
                existing.revision += 1;
                existing.revision
            }
            None => {
                inner.contents.insert(file, SourceText { text, revision: 0 });
                0
            }
        }
    }

    pub fn contents(&self, file: FileId) -> Option<Arc<str>> {
        self.inner.read().contents.get(&file).map(|s| s.text.clone())
    }

    pub fn source(&self, file: FileId) -> Option<SourceText> {
        self.inner.read().contents.get(&file).cloned()
    }

    /// Remove a file from the set.
    pub fn remove(&self, file: FileId) {
        let mut inner = self.inner.write();
        if let Some(path) = inner.id_to_path.swap_remove(&file) {
            inner.path_to_id.swap_remove(&path);
        }
        inner.contents.swap_remove(&file);
    }

    pub fn len(&self) -> usize {
        self.inner.read().path_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn files(&self) -> Vec<FileId> {
        self.inner.read().id_to_path.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_set_id_assignment() {
        let files = FileSet::new();

        let id1 = files.file_id(Path::new("/a.latte"));
        let id2 = files.file_id(Path::new("/b.latte"));
        let id3 = files.file_id(Path::new("/a.latte"));

        assert_ne!(id1, id2);
        assert_eq!(id1, id3);
        assert_eq!(files.lookup(Path::new("/c.latte")), None);
    }

    #[test]
    fn test_revisions() {
        let files = FileSet::new();
        let id = files.file_id(Path::new("/page.latte"));
        assert!(files.contents(id).is_none());

        assert_eq!(files.set_contents(id, "{$a}"), 0);
        assert_eq!(files.set_contents(id, "{$a}"), 0);
        assert_eq!(files.set_contents(id, "{$b}"), 1);
        assert_eq!(files.contents(id).as_deref(), Some("{$b}"));
    }

    #[test]
    fn test_remove() {
        let files = FileSet::new();
        let path = Path::new("/page.latte");
        let id = files.file_id(path);
        files.set_contents(id, "x");
        assert_eq!(files.path(id).as_deref(), Some(path));

        files.remove(id);
        assert!(files.is_empty());
        assert!(files.source(id).is_none());
    }
}
