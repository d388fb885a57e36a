//! Filesystem errors.
//!
//! Every fallible call in this crate returns [`Error`]. Errors convert into [`io::Error`] with the
//! closest [`io::ErrorKind`] so that the [`Read`] and [`Seek`] implementations of open files can
//! surface them, and the original [`Error`] stays reachable through [`io::Error::get_ref`].
//!
//! [`Error`]: enum.Error.html
//! [`io::Error`]: https://doc.rust-lang.org/std/io/struct.Error.html
//! [`io::ErrorKind`]: https://doc.rust-lang.org/std/io/enum.ErrorKind.html
//! [`io::Error::get_ref`]: https://doc.rust-lang.org/std/io/struct.Error.html#method.get_ref
//! [`Read`]: https://doc.rust-lang.org/std/io/trait.Read.html
//! [`Seek`]: https://doc.rust-lang.org/std/io/trait.Seek.html

use std::io;

use thiserror::Error;

// EBADF is what a Unix system returns for operations on a closed descriptor.
const EBADF: i32 = 9;

/// Errors returned by filesystem operations and open handles.
#[derive(Debug, Error)]
pub enum Error {
    /// The path is malformed: absolute, empty segments, or containing `.` or `..` segments.
    #[error("invalid path: {0:?}")]
    InvalidPath(String),

    /// A required path segment or the target itself does not exist.
    #[error("no such file or directory: {0:?}")]
    NotExist(String),

    /// A segment that must be traversed is a file.
    #[error("not a directory: {0:?}")]
    NotADirectory(String),

    /// A file operation targeted a directory.
    #[error("is a directory: {0:?}")]
    IsADirectory(String),

    /// The handle was already closed.
    #[error("file already closed: {0:?}")]
    AlreadyClosed(String),

    /// A read or enumeration is exhausted.
    #[error("end of data")]
    EndOfData,

    /// An I/O error from a generic reader.
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

impl Error {
    pub(crate) fn invalid_path(path: impl Into<String>) -> Self {
        Error::InvalidPath(path.into())
    }

    pub(crate) fn not_exist(path: impl Into<String>) -> Self {
        Error::NotExist(path.into())
    }

    pub(crate) fn not_a_directory(path: impl Into<String>) -> Self {
        Error::NotADirectory(path.into())
    }

    pub(crate) fn is_a_directory(path: impl Into<String>) -> Self {
        Error::IsADirectory(path.into())
    }

    pub(crate) fn already_closed(name: impl Into<String>) -> Self {
        Error::AlreadyClosed(name.into())
    }

    /// Returns true if this error reports a missing file or directory.
    pub fn is_not_exist(&self) -> bool {
        match self {
            Error::NotExist(_) => true,
            Error::Io(e) => e.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Returns true if this error is the end of data signal.
    pub fn is_end_of_data(&self) -> bool {
        matches!(self, Error::EndOfData)
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> io::Error {
        match e {
            Error::Io(e) => e,
            Error::AlreadyClosed(_) => io::Error::from_raw_os_error(EBADF),
            e @ Error::InvalidPath(_) => io::Error::new(io::ErrorKind::InvalidInput, e),
            e @ Error::NotExist(_) => io::Error::new(io::ErrorKind::NotFound, e),
            e @ Error::NotADirectory(_) => io::Error::new(io::ErrorKind::NotADirectory, e),
            e @ Error::IsADirectory(_) => io::Error::new(io::ErrorKind::IsADirectory, e),
            e @ Error::EndOfData => io::Error::new(io::ErrorKind::UnexpectedEof, e),
        }
    }
}

// An io::Error built from an Error unwraps back into it; anything else stays an Io error.
impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        match e.downcast::<Error>() {
            Ok(e) => e,
            Err(e) => Error::Io(e),
        }
    }
}

/// A specialized result type for filesystem operations.
pub type Result<T> = std::result::Result<T, Error>;
