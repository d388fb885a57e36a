//! An in memory filesystem.
//!
//! The [`FS`] provides an in memory file system: a tree of directories and files that lives
//! entirely in process memory and disappears with the last clone of the `FS`. It is meant to
//! stand in for a real disk under code written against [`GenFS`].
//!
//! Every directory carries its own lock over its children. A path is resolved one directory at a
//! time, locking each directory only while its child is looked up, so operations in disjoint
//! subtrees never contend. The flip side is that a multi segment operation is not atomic with
//! respect to concurrent changes further up its path.
//!
//! Opening a file copies its content: an open [`File`] never observes later writes. Listing a
//! [`Directory`] captures its children on the first call and pages through that capture.
//!
//! An optional [`OpenHook`], installed through the [`Builder`], can replace the content or the
//! error of any file open.
//!
//! # Example
//!
//! ```
//! use std::io::{Read, Seek, SeekFrom};
//!
//! use memfs::*;
//! use memfs::mem::FS;
//!
//! // setup a few directories
//!
//! let fs = FS::new();
//! assert!(fs.mkdir_all("a/b/c", 0o755).is_ok());
//!
//! // write a file, open it, and read from it
//!
//! assert!(fs.write_file("a/f", &[0, 1, 2, 3, 4, 5], 0o644).is_ok());
//!
//! let mut rf = fs.open("a/f").unwrap();
//! assert_eq!(rf.seek(SeekFrom::Start(1)).unwrap(), 1);
//!
//! let mut output = [0u8; 4];
//! assert_eq!(rf.read(&mut output).unwrap(), 4);
//! assert_eq!(&output, &[1, 2, 3, 4]);
//!
//! // the open file keeps what it saw when it was opened
//!
//! assert!(fs.write_file("a/f", b"new", 0o644).is_ok());
//! assert_eq!(rf.stat().unwrap().len(), 6);
//! assert!(rf.close().is_ok());
//!
//! // read a directory
//!
//! let mut dir = fs.open("a").unwrap();
//! let listing = dir.read_dir(0).unwrap();
//! let names: Vec<&str> = listing.entries.iter().map(|e| e.name()).collect();
//! assert_eq!(names, vec!["b", "f"]);
//!
//! // view a subtree as its own filesystem
//!
//! let sub = fs.sub("a").unwrap();
//! assert_eq!(sub.read_file("f").unwrap(), b"new");
//! ```
//!
//! [`FS`]: struct.FS.html
//! [`File`]: struct.File.html
//! [`Directory`]: struct.Directory.html
//! [`OpenHook`]: type.OpenHook.html
//! [`Builder`]: struct.Builder.html
//! [`GenFS`]: ../trait.GenFS.html

mod dir;
mod file;
mod fs;
mod meta;
mod node;
mod walk;

pub use self::dir::{DirEntry, Directory};
pub use self::file::File;
pub use self::fs::{Builder, Handle, OpenHook, FS};
pub use self::meta::{FileType, Metadata, Permissions};
