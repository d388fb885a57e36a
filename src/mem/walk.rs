use std::sync::Arc;

use tracing::debug;

use super::node::{DirNode, FileNode, Node};
use crate::errors::{Error, Result};
use crate::path_parts;

// Walk selects what a path walk does when a segment is missing.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Walk {
    // Fail with NotExist.
    Lookup,
    // Create the missing directory with the given mode and keep walking.
    Create(u32),
}

// Found is the target of a full path lookup. A found file is a private copy of the stored file.
#[derive(Debug)]
pub(crate) enum Found {
    Dir(Arc<DirNode>),
    File(FileNode),
}

// walk descends from root through every segment of a validated path, each of which must be a
// directory, and returns the directory the path names.
//
// Each directory is locked only while its segment is looked up (or created); the lock is
// released before descending. There is never more than one lock held, so a walk does not see an
// atomic view of the whole path, only a consistent view of each level.
pub(crate) fn walk(root: &Arc<DirNode>, path: &str, mode: Walk) -> Result<Arc<DirNode>> {
    let mut cur = root.clone();
    let mut end = 0;
    for part in path_parts::parts(path) {
        end += part.len();
        let walked = &path[..end];
        end += 1;

        let next = {
            let mut children = cur.lock();
            match children.get(part) {
                Some(Node::Dir(dir)) => dir.clone(),
                Some(Node::File(_)) => return Err(Error::not_a_directory(walked)),
                None => match mode {
                    Walk::Lookup => return Err(Error::not_exist(walked)),
                    Walk::Create(mode) => {
                        let dir = DirNode::new(part, mode);
                        children.insert(part.to_string(), Node::Dir(dir.clone()));
                        debug!(path = walked, mode, "created directory");
                        dir
                    }
                },
            }
        };
        cur = next;
    }
    Ok(cur)
}

// lookup resolves a validated path to the directory or file it names. The root resolves
// immediately without taking any lock.
pub(crate) fn lookup(root: &Arc<DirNode>, path: &str) -> Result<Found> {
    let (parent, base) = match path_parts::split(path) {
        Some(split) => split,
        None => return Ok(Found::Dir(root.clone())),
    };
    let dir = walk(root, parent, Walk::Lookup)?;
    let children = dir.lock();
    match children.get(base) {
        Some(Node::Dir(dir)) => Ok(Found::Dir(dir.clone())),
        Some(Node::File(file)) => Ok(Found::File(file.clone())),
        None => Err(Error::not_exist(path)),
    }
}
