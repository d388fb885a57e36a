use std::cmp;
use std::io;
use std::sync::Arc;

use super::meta::{FileType, Metadata};
use super::node::DirNode;
use crate::errors::{Error, Result};
use crate::fs::{self, Listing};

/// Entries returned when listing a [`Directory`].
///
/// [`Directory`]: struct.Directory.html
#[derive(Clone, Debug, PartialEq)]
pub struct DirEntry {
    pub(crate) meta: Metadata,
}

impl DirEntry {
    pub(crate) fn new(meta: Metadata) -> DirEntry {
        DirEntry { meta }
    }

    /// Returns the file type of the entry.
    pub fn file_type(&self) -> FileType {
        self.meta.file_type()
    }
}

impl fs::DirEntry for DirEntry {
    type Metadata = Metadata;

    fn name(&self) -> &str {
        &self.meta.name
    }
    fn is_dir(&self) -> bool {
        self.meta.file_type().is_dir()
    }
    fn metadata(&self) -> Result<Metadata> {
        Ok(self.meta.clone())
    }
}

/// An open directory.
///
/// The children of a directory are captured the first time it is listed; entries added or
/// removed afterwards do not show up in, or disappear from, this handle's listing. Listing is
/// resumable: each call continues where the previous one stopped.
#[derive(Debug)]
pub struct Directory {
    dir: Arc<DirNode>,
    entries: Option<Vec<DirEntry>>,
    at: usize,
}

impl Directory {
    pub(crate) fn new(dir: Arc<DirNode>) -> Directory {
        Directory {
            dir,
            entries: None,
            at: 0,
        }
    }

    /// Returns metadata about the directory. This never fails.
    pub fn stat(&self) -> Metadata {
        self.dir.metadata()
    }

    /// Returns up to `n` entries following those already returned, or every remaining entry if
    /// `n <= 0`.
    ///
    /// When `n > 0` asks for more entries than remain, the remainder is returned with `eof` set.
    /// When nothing remains, `n > 0` fails with [`Error::EndOfData`] while `n <= 0` returns an
    /// empty listing.
    ///
    /// # Example
    ///
    /// ```
    /// use memfs::*;
    /// use memfs::mem::FS;
    ///
    /// let fs = FS::new();
    /// for name in &["a", "b", "c"] {
    ///     fs.write_file(name, b"", 0o644).unwrap();
    /// }
    ///
    /// let mut dir = fs.open(".").unwrap().into_dir().unwrap();
    /// let first = dir.read_dir(2).unwrap();
    /// assert_eq!(first.len(), 2);
    /// assert!(!first.eof);
    ///
    /// let rest = dir.read_dir(2).unwrap();
    /// assert_eq!(rest.len(), 1);
    /// assert!(rest.eof);
    ///
    /// assert!(dir.read_dir(2).unwrap_err().is_end_of_data());
    /// assert!(dir.read_dir(0).unwrap().is_empty());
    /// ```
    ///
    /// [`Error::EndOfData`]: ../errors/enum.Error.html#variant.EndOfData
    pub fn read_dir(&mut self, n: isize) -> Result<Listing<DirEntry>> {
        let dir = &self.dir;
        let entries = self.entries.get_or_insert_with(|| dir.entries());
        let remaining = &entries[self.at..];

        if n <= 0 {
            self.at = entries.len();
            return Ok(Listing {
                entries: remaining.to_vec(),
                eof: false,
            });
        }
        if remaining.is_empty() {
            return Err(Error::EndOfData);
        }

        let want = n as usize;
        let take = cmp::min(want, remaining.len());
        let page = remaining[..take].to_vec();
        self.at += take;
        Ok(Listing {
            entries: page,
            eof: want > take,
        })
    }

    /// Closes the directory. This is a no-op and never fails.
    pub fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

impl Iterator for Directory {
    type Item = DirEntry;

    fn next(&mut self) -> Option<DirEntry> {
        self.read_dir(1).ok().and_then(|page| page.into_iter().next())
    }
}

impl fs::OpenFile for Directory {
    type Metadata = Metadata;
    type DirEntry = DirEntry;

    fn stat(&self) -> Result<Metadata> {
        Ok(Directory::stat(self))
    }
    fn read_dir(&mut self, n: isize) -> Result<Listing<DirEntry>> {
        Directory::read_dir(self, n)
    }
    fn close(&mut self) -> Result<()> {
        Directory::close(self)
    }
}

// Directories have no content: reading one always fails.
impl io::Read for Directory {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(Error::is_a_directory(self.dir.name()).into())
    }
}
