//! A generic filesystem with an in memory implementation.
//!
//! Code that touches the filesystem is hard to test well: real disks are slow to set up, leak
//! state between tests, and never fail the way you want them to. This crate provides the generic
//! [`memfs::GenFS`] trait and [`memfs::mem::FS`], a hierarchical filesystem held entirely in
//! process memory. Write your code against [`GenFS`] and hand it an in memory filesystem filled
//! with synthetic data in your tests.
//!
//! The in memory filesystem can be configured with an open hook to rewrite or synthesize file
//! content, or to inject errors, at open time.
//!
//! Nothing is persisted and permissions are recorded but never enforced.
//!
//! [`memfs::GenFS`]: trait.GenFS.html
//! [`GenFS`]: trait.GenFS.html
//! [`memfs::mem::FS`]: mem/struct.FS.html

mod fs;
pub use crate::fs::*;

pub mod errors;
pub mod mem;
pub mod path_parts;

pub use crate::errors::{Error, Result};
