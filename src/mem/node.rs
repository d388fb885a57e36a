use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::{Mutex, MutexGuard};

use super::dir::DirEntry;
use super::meta::{FileType, Metadata, Permissions, DIRLEN};

// Node is a child of a directory in our filesystem tree.
//
// Directories are shared through an Arc so that a path walk can release the parent's lock before
// descending, and so that sub filesystems can be rooted anywhere in the tree. Files are owned
// outright by their parent's child map and only ever touched under that map's lock.
#[derive(Debug)]
pub(crate) enum Node {
    Dir(Arc<DirNode>),
    File(FileNode),
}

impl Node {
    pub(crate) fn metadata(&self) -> Metadata {
        match self {
            Node::Dir(dir) => dir.metadata(),
            Node::File(file) => file.metadata(),
        }
    }
}

// DirNode is a directory. Its mode and modification time are fixed at creation; the child map is
// guarded by the directory's own mutex and by nothing else.
#[derive(Debug)]
pub(crate) struct DirNode {
    name: String,
    mode: u32,
    modified: SystemTime,
    children: Mutex<HashMap<String, Node>>,
}

impl DirNode {
    pub(crate) fn new(name: &str, mode: u32) -> Arc<DirNode> {
        Arc::new(DirNode {
            name: name.to_string(),
            mode,
            modified: SystemTime::now(),
            children: Mutex::new(HashMap::new()),
        })
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, HashMap<String, Node>> {
        self.children.lock()
    }

    pub(crate) fn metadata(&self) -> Metadata {
        Metadata {
            name: self.name.clone(),
            filetype: FileType::DIR,
            length: DIRLEN,
            perms: Permissions::from_mode(self.mode),
            modified: self.modified,
        }
    }

    // entries returns the current children sorted by name, captured under the directory's lock.
    pub(crate) fn entries(&self) -> Vec<DirEntry> {
        let children = self.lock();
        let mut entries: Vec<DirEntry> = children
            .values()
            .map(|child| DirEntry::new(child.metadata()))
            .collect();
        drop(children);
        entries.sort_by(|l, r| l.meta.name.cmp(&r.meta.name));
        entries
    }
}

// FileNode is a stored file. Cloning it deep copies the content, which is how open handles get
// their private snapshot.
#[derive(Clone, Debug)]
pub(crate) struct FileNode {
    name: String,
    mode: u32,
    modified: SystemTime,
    data: Vec<u8>,
}

impl FileNode {
    pub(crate) fn new(name: &str, data: Vec<u8>, mode: u32) -> FileNode {
        FileNode {
            name: name.to_string(),
            mode,
            modified: SystemTime::now(),
            data,
        }
    }

    pub(crate) fn data(&self) -> &[u8] {
        &self.data
    }

    // overwrite replaces the content and mode of the file in full, keeping its name.
    pub(crate) fn overwrite(&mut self, data: &[u8], mode: u32) {
        self.data = data.to_vec();
        self.mode = mode;
        self.modified = SystemTime::now();
    }

    pub(crate) fn metadata(&self) -> Metadata {
        Metadata {
            name: self.name.clone(),
            filetype: FileType::FILE,
            length: self.data.len() as u64,
            perms: Permissions::from_mode(self.mode),
            modified: self.modified,
        }
    }

    pub(crate) fn into_parts(self) -> (Metadata, Vec<u8>) {
        (self.metadata(), self.data)
    }
}
