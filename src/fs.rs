//! This module provides the generic types for a filesystem.
//!
//! Code that only needs to create, read, list and remove files should be written against
//! [`GenFS`] so that it can run on the in-memory [`mem::FS`] (or any other implementation)
//! without change.
//!
//! [`GenFS`]: trait.GenFS.html
//! [`mem::FS`]: ../mem/struct.FS.html

use std::fmt::Debug;
use std::io::Read;
use std::time::SystemTime;

use crate::errors::Result;

/// Metadata information about a file or directory.
///
/// This is what `stat` on an open handle and the entries of a directory listing report.
pub trait Metadata: Clone + Debug {
    /// Returns the base name of the file or directory. The root directory has an empty name.
    fn name(&self) -> &str;
    /// Returns true if this metadata is for a directory.
    fn is_dir(&self) -> bool;
    /// Returns true if this metadata is for a regular file.
    fn is_file(&self) -> bool {
        !self.is_dir()
    }
    /// Returns the size of the file, in bytes. Directories report a fixed synthetic size.
    fn len(&self) -> u64;
    /// Returns true if the file has no content.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Returns the permission bits recorded when the entry was created or last written.
    fn mode(&self) -> u32;
    /// Returns the last modification time.
    fn modified(&self) -> SystemTime;
}

/// An entry inside a directory listing.
pub trait DirEntry: Debug {
    /// The `Metadata` type in the same module implementing this trait.
    type Metadata: Metadata;

    /// Returns the base name of the entry.
    fn name(&self) -> &str;
    /// Returns true if the entry is a directory.
    fn is_dir(&self) -> bool;
    /// Returns the metadata captured when the listing was taken.
    fn metadata(&self) -> Result<Self::Metadata>;
}

/// One page of a directory listing.
///
/// `eof` is set when the page exhausted the listing, which happens together with the last
/// entries rather than on a separate call.
#[derive(Clone, Debug, PartialEq)]
pub struct Listing<E> {
    /// The entries in this page, in listing order.
    pub entries: Vec<E>,
    /// True when no entries remain after this page.
    pub eof: bool,
}

impl<E> Listing<E> {
    /// Returns the number of entries in this page.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if this page has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E> IntoIterator for Listing<E> {
    type Item = E;
    type IntoIter = std::vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A handle to an open file or directory.
///
/// Reading a directory handle fails; listing a file handle fails.
pub trait OpenFile: Debug + Read {
    /// The `Metadata` type in the same module implementing this trait.
    type Metadata: Metadata;
    /// The `DirEntry` type in the same module implementing this trait.
    type DirEntry: DirEntry<Metadata = Self::Metadata>;

    /// Returns metadata about the opened file or directory.
    fn stat(&self) -> Result<Self::Metadata>;
    /// Reads up to `n` entries of an opened directory, or all remaining entries if `n <= 0`.
    ///
    /// Asking for more entries than remain returns the remainder with `eof` set. Asking for
    /// `n > 0` entries once the listing is exhausted returns [`Error::EndOfData`].
    ///
    /// [`Error::EndOfData`]: ../errors/enum.Error.html#variant.EndOfData
    fn read_dir(&mut self, n: isize) -> Result<Listing<Self::DirEntry>>;
    /// Closes the handle.
    fn close(&mut self) -> Result<()>;
}

/// A filesystem that can be created, read, listed and pruned through slash separated relative
/// paths.
///
/// Paths are validated with the rules of [`path_parts`]; the root is named `.`.
///
/// [`path_parts`]: ../path_parts/index.html
pub trait GenFS: Send + Sync + Sized {
    /// The handle type returned by [`open`](#tymethod.open).
    type Handle: OpenFile;

    /// Recursively creates a directory and all of its missing parents with mode `mode`.
    ///
    /// It is not an error if the directory already exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use memfs::*;
    /// use memfs::mem::FS;
    ///
    /// let fs = FS::new();
    /// fs.mkdir_all("foo/bar/baz", 0o755).unwrap();
    /// assert!(fs.stat("foo/bar").unwrap().is_dir());
    /// ```
    fn mkdir_all(&self, path: &str, mode: u32) -> Result<()>;

    /// Writes `data` to the file at `path`, replacing any existing content and mode.
    ///
    /// The parent directory must already exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use memfs::*;
    /// use memfs::mem::FS;
    ///
    /// let fs = FS::new();
    /// fs.write_file("hello.txt", b"hello", 0o644).unwrap();
    /// assert_eq!(fs.read_file("hello.txt").unwrap(), b"hello");
    ///
    /// assert!(fs.write_file("missing/hello.txt", b"hello", 0o644).is_err());
    /// ```
    fn write_file(&self, path: &str, data: &[u8], mode: u32) -> Result<()>;

    /// Opens the file or directory at `path`.
    fn open(&self, path: &str) -> Result<Self::Handle>;

    /// Removes the file or directory at `path`. Removing a directory removes everything
    /// below it.
    fn remove(&self, path: &str) -> Result<()>;

    /// Returns a filesystem rooted at the directory `path`.
    fn sub(&self, path: &str) -> Result<Self>;

    /// Reads the entire contents of the file at `path`.
    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let mut file = self.open(path)?;
        let mut content = Vec::new();
        let read = file.read_to_end(&mut content);
        file.close()?;
        read?;
        Ok(content)
    }

    /// Returns metadata for the file or directory at `path`.
    fn stat(&self, path: &str) -> Result<<Self::Handle as OpenFile>::Metadata> {
        let mut file = self.open(path)?;
        let meta = file.stat();
        file.close()?;
        meta
    }
}
