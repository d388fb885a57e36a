use std::cmp;
use std::io::{self, Read, Seek, SeekFrom};

use super::dir::DirEntry;
use super::meta::Metadata;
use super::node::FileNode;
use crate::errors::{Error, Result};
use crate::fs::{self, Listing};

/// An open file.
///
/// A `File` owns a copy of the file's content as it was when the file was opened: later writes to
/// the same path are not visible through it. Reads advance a cursor that [`Seek`] repositions.
/// Once closed, every operation fails.
///
/// See the module [documentation] for a comprehensive example.
///
/// [`Seek`]: https://doc.rust-lang.org/std/io/trait.Seek.html
/// [documentation]: index.html
#[derive(Debug)]
pub struct File {
    metadata: Metadata,
    data: Vec<u8>,
    at: usize,
    closed: bool,
}

impl File {
    pub(crate) fn snapshot(node: FileNode) -> File {
        let (metadata, data) = node.into_parts();
        File {
            metadata,
            data,
            at: 0,
            closed: false,
        }
    }

    fn check_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::already_closed(self.metadata.name.as_str()));
        }
        Ok(())
    }

    /// Returns metadata about the file as it was when opened.
    ///
    /// # Errors
    ///
    /// Fails with `AlreadyClosed` after [`close`](#method.close).
    pub fn stat(&self) -> Result<Metadata> {
        self.check_open()?;
        Ok(self.metadata.clone())
    }

    /// Closes the file. A file can only be closed once.
    pub fn close(&mut self) -> Result<()> {
        self.check_open()?;
        self.closed = true;
        Ok(())
    }
}

impl Read for File {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.check_open()?;
        let data = &self.data[self.at..];
        let n = cmp::min(data.len(), buf.len());
        buf[..n].copy_from_slice(&data[..n]);
        self.at += n;
        Ok(n)
    }
}

// Seeks are clamped to the file: before the start lands on 0 and past the end lands on the end.
impl Seek for File {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.check_open()?;
        let len = self.data.len() as i64;
        let to = match pos {
            SeekFrom::Start(offset) => i64::try_from(offset).unwrap_or(i64::MAX),
            SeekFrom::Current(offset) => (self.at as i64).saturating_add(offset),
            SeekFrom::End(offset) => len.saturating_add(offset),
        };
        self.at = to.clamp(0, len) as usize;
        Ok(self.at as u64)
    }
}

impl fs::OpenFile for File {
    type Metadata = Metadata;
    type DirEntry = DirEntry;

    fn stat(&self) -> Result<Metadata> {
        File::stat(self)
    }
    fn read_dir(&mut self, _n: isize) -> Result<Listing<DirEntry>> {
        self.check_open()?;
        Err(Error::not_a_directory(self.metadata.name.as_str()))
    }
    fn close(&mut self) -> Result<()> {
        File::close(self)
    }
}
