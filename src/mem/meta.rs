use std::time::SystemTime;

use crate::fs;

// DIRLEN is the length returned from Metadata's len() call for a directory. This is pulled from
// the initial file size that Unix uses for a directory sector.
pub(crate) const DIRLEN: u64 = 4096;

/// Represents the type of a file.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FileType {
    dir: bool,
}

impl FileType {
    pub(crate) const DIR: FileType = FileType { dir: true };
    pub(crate) const FILE: FileType = FileType { dir: false };

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.dir
    }

    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        !self.dir
    }
}

/// Representation of the permission bits on a file or directory.
///
/// Permissions are recorded and reported only; nothing in this crate enforces them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Permissions {
    mode: u32,
}

impl Permissions {
    /// Creates permissions from Unix style mode bits.
    pub fn from_mode(mode: u32) -> Self {
        Permissions { mode }
    }

    /// Returns the mode bits.
    pub fn mode(&self) -> u32 {
        self.mode
    }

    /// Returns true if no write bit is set.
    pub fn readonly(&self) -> bool {
        self.mode & 0o222 == 0
    }
}

/// Metadata information about a file or directory.
#[derive(Clone, Debug, PartialEq)]
pub struct Metadata {
    pub(crate) name: String,
    pub(crate) filetype: FileType,
    pub(crate) length: u64,
    pub(crate) perms: Permissions,
    pub(crate) modified: SystemTime,
}

impl Metadata {
    /// Returns the file type for this metadata.
    pub fn file_type(&self) -> FileType {
        self.filetype
    }

    /// Returns the permissions recorded for the file or directory.
    pub fn permissions(&self) -> Permissions {
        self.perms
    }
}

impl fs::Metadata for Metadata {
    fn name(&self) -> &str {
        &self.name
    }
    fn is_dir(&self) -> bool {
        self.filetype.is_dir()
    }
    fn len(&self) -> u64 {
        self.length
    }
    fn mode(&self) -> u32 {
        self.perms.mode
    }
    fn modified(&self) -> SystemTime {
        self.modified
    }
}
