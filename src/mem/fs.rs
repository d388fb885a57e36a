use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;

use tracing::{debug, trace};

use super::dir::{DirEntry, Directory};
use super::file::File;
use super::meta::Metadata;
use super::node::{DirNode, FileNode, Node};
use super::walk::{self, Found, Walk};
use crate::errors::{Error, Result};
use crate::fs::{self, Listing};
use crate::path_parts;

// The mode given to files whose content is produced by an open hook.
const HOOK_FILE_MODE: u32 = 0o666;

/// A function that can replace the outcome of opening a file.
///
/// The hook is called with the opened path, the file's content if the open succeeded, and the
/// error if it failed. It returns:
///
/// - `Ok(Some(content))` to open a fresh file holding `content` instead,
/// - `Ok(None)` to keep the original outcome,
/// - `Err(e)` to fail the open with `e`.
///
/// Opening a directory never consults the hook.
pub type OpenHook = dyn Fn(&str, Option<&[u8]>, Option<&Error>) -> Result<Option<Vec<u8>>>
    + Send
    + Sync;

/// A builder used to configure an in-memory filesystem before creating it.
///
/// # Examples
///
/// ```
/// use memfs::*;
/// use memfs::mem::FS;
///
/// let fs = FS::builder()
///     .mode(0o700)
///     .open_hook(|path, _content, _err| match path {
///         "motd" => Ok(Some(b"hello".to_vec())),
///         _ => Ok(None),
///     })
///     .build();
///
/// assert_eq!(fs.stat(".").unwrap().mode(), 0o700);
/// assert_eq!(fs.read_file("motd").unwrap(), b"hello");
/// assert!(fs.read_file("other").unwrap_err().is_not_exist());
/// ```
#[derive(Clone)]
pub struct Builder {
    mode: u32,
    hook: Option<Arc<OpenHook>>,
}

impl Builder {
    /// Sets the mode of the root directory. Defaults to `0o777`.
    pub fn mode(&mut self, mode: u32) -> &mut Self {
        self.mode = mode;
        self
    }

    /// Installs a hook that runs after every file open. Only one hook is kept; installing
    /// another replaces it.
    pub fn open_hook<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&str, Option<&[u8]>, Option<&Error>) -> Result<Option<Vec<u8>>>
            + Send
            + Sync
            + 'static,
    {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// Creates the filesystem.
    pub fn build(&self) -> FS {
        FS {
            root: DirNode::new("", self.mode),
            hook: self.hook.clone(),
        }
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("mode", &self.mode)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

/// An in memory struct that satisfies [`memfs::GenFS`].
///
/// `FS` is thread safe and cheap to clone; clones share the same tree. There is no global lock:
/// every directory guards its own children, and an operation holds at most one directory's lock
/// at a time, so operations on unrelated parts of the tree run in parallel.
///
/// See the module [documentation] for a comprehensive example.
///
/// [`memfs::GenFS`]: ../trait.GenFS.html
/// [documentation]: index.html
#[derive(Clone)]
pub struct FS {
    root: Arc<DirNode>,
    hook: Option<Arc<OpenHook>>,
}

impl FS {
    /// Creates an empty `FS` with mode `0o777`.
    pub fn new() -> FS {
        Self::with_mode(0o777)
    }

    /// Creates an empty `FS` whose root directory has the given mode.
    pub fn with_mode(mode: u32) -> FS {
        Self::builder().mode(mode).build()
    }

    /// Returns a [`Builder`] to configure a new `FS`.
    ///
    /// [`Builder`]: struct.Builder.html
    pub fn builder() -> Builder {
        Builder {
            mode: 0o777,
            hook: None,
        }
    }

    // open_file finishes opening a file, letting the hook override the outcome.
    fn open_file(&self, path: &str, opened: Result<FileNode>) -> Result<Handle> {
        let hook = match self.hook {
            Some(ref hook) => hook,
            None => return opened.map(|file| Handle::File(File::snapshot(file))),
        };

        let (content, err) = match opened {
            Ok(ref file) => (Some(file.data()), None),
            Err(ref e) => (None, Some(e)),
        };
        match hook(path, content, err) {
            Ok(None) => opened.map(|file| Handle::File(File::snapshot(file))),
            Ok(Some(content)) => {
                debug!(path, len = content.len(), "open hook replaced content");
                let base = path_parts::split(path).map_or(path, |(_, base)| base);
                let file = FileNode::new(base, content, HOOK_FILE_MODE);
                Ok(Handle::File(File::snapshot(file)))
            }
            Err(e) => {
                debug!(path, error = %e, "open hook replaced outcome");
                Err(e)
            }
        }
    }
}

impl Default for FS {
    fn default() -> Self {
        FS::new()
    }
}

impl fmt::Debug for FS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FS")
            .field("root", &self.root.name())
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

impl fs::GenFS for FS {
    type Handle = Handle;

    fn mkdir_all(&self, path: &str, mode: u32) -> Result<()> {
        let path = path_parts::validate(path)?;
        trace!(path, mode, "mkdir_all");
        walk::walk(&self.root, path, Walk::Create(mode)).map(|_| ())
    }

    fn write_file(&self, path: &str, data: &[u8], mode: u32) -> Result<()> {
        let path = path_parts::validate(path)?;
        trace!(path, len = data.len(), mode, "write_file");
        let (parent, base) = path_parts::split(path).ok_or_else(|| Error::is_a_directory(path))?;
        let dir = walk::walk(&self.root, parent, Walk::Lookup)?;

        let mut children = dir.lock();
        match children.get_mut(base) {
            Some(Node::Dir(_)) => Err(Error::is_a_directory(path)),
            Some(Node::File(file)) => {
                file.overwrite(data, mode);
                debug!(path, len = data.len(), "overwrote file");
                Ok(())
            }
            None => {
                let file = FileNode::new(base, data.to_vec(), mode);
                children.insert(base.to_string(), Node::File(file));
                debug!(path, len = data.len(), "created file");
                Ok(())
            }
        }
    }

    fn open(&self, path: &str) -> Result<Handle> {
        let path = path_parts::validate(path)?;
        trace!(path, "open");
        match walk::lookup(&self.root, path) {
            Ok(Found::Dir(dir)) => Ok(Handle::Dir(Directory::new(dir))),
            Ok(Found::File(file)) => self.open_file(path, Ok(file)),
            Err(e) => self.open_file(path, Err(e)),
        }
    }

    fn remove(&self, path: &str) -> Result<()> {
        let path = path_parts::validate(path)?;
        trace!(path, "remove");
        let (parent, base) = path_parts::split(path).ok_or_else(|| Error::invalid_path(path))?;
        let dir = walk::walk(&self.root, parent, Walk::Lookup)?;

        let removed = dir.lock().remove(base);
        match removed {
            Some(_) => {
                debug!(path, "removed");
                Ok(())
            }
            None => Err(Error::not_exist(path)),
        }
    }

    fn sub(&self, path: &str) -> Result<FS> {
        let path = path_parts::validate(path)?;
        trace!(path, "sub");
        let root = walk::walk(&self.root, path, Walk::Lookup)?;
        Ok(FS {
            root,
            hook: self.hook.clone(),
        })
    }
}

/// A file or directory returned from [`open`].
///
/// [`open`]: ../trait.GenFS.html#tymethod.open
#[derive(Debug)]
pub enum Handle {
    File(File),
    Dir(Directory),
}

impl Handle {
    /// Returns true if the handle is an open directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, Handle::Dir(_))
    }

    /// Returns the open file, or `None` for a directory.
    pub fn into_file(self) -> Option<File> {
        match self {
            Handle::File(file) => Some(file),
            Handle::Dir(_) => None,
        }
    }

    /// Returns the open directory, or `None` for a file.
    pub fn into_dir(self) -> Option<Directory> {
        match self {
            Handle::Dir(dir) => Some(dir),
            Handle::File(_) => None,
        }
    }

    /// Returns metadata about the opened file or directory.
    pub fn stat(&self) -> Result<Metadata> {
        match self {
            Handle::File(file) => file.stat(),
            Handle::Dir(dir) => Ok(dir.stat()),
        }
    }

    /// Closes the handle.
    pub fn close(&mut self) -> Result<()> {
        match self {
            Handle::File(file) => file.close(),
            Handle::Dir(dir) => dir.close(),
        }
    }
}

impl Read for Handle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Handle::File(file) => file.read(buf),
            Handle::Dir(dir) => dir.read(buf),
        }
    }
}

impl Seek for Handle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Handle::File(file) => file.seek(pos),
            Handle::Dir(dir) => Err(Error::is_a_directory(dir.stat().name).into()),
        }
    }
}

impl fs::OpenFile for Handle {
    type Metadata = Metadata;
    type DirEntry = DirEntry;

    fn stat(&self) -> Result<Metadata> {
        Handle::stat(self)
    }
    fn read_dir(&mut self, n: isize) -> Result<Listing<DirEntry>> {
        match self {
            Handle::File(file) => fs::OpenFile::read_dir(file, n),
            Handle::Dir(dir) => dir.read_dir(n),
        }
    }
    fn close(&mut self) -> Result<()> {
        Handle::close(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fs::{DirEntry as _, GenFS, Metadata as _, OpenFile};
    use crate::mem::Permissions;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn names(fs: &FS, path: &str) -> Vec<String> {
        let mut dir = fs.open(path).unwrap();
        let entries = dir.read_dir(0).unwrap().entries;
        entries.iter().map(|e| e.name().to_string()).collect()
    }

    #[test]
    fn write_then_read() {
        let fs = FS::new();
        fs.mkdir_all("a/b", 0o755).unwrap();
        fs.write_file("a/b/f", b"hello", 0o640).unwrap();

        let mut h = fs.open("a/b/f").unwrap();
        let meta = h.stat().unwrap();
        assert_eq!(meta.len(), 5);
        assert_eq!(meta.mode(), 0o640);
        assert_eq!(meta.name(), "f");

        let mut content = Vec::new();
        h.read_to_end(&mut content).unwrap();
        assert_eq!(content, b"hello");
        h.close().unwrap();

        fs.write_file("top.txt", b"top", 0o600).unwrap();
        assert_eq!(fs.read_file("top.txt").unwrap(), b"top");
    }

    #[test]
    fn overwrite_replaces_everything() {
        let fs = FS::new();
        fs.write_file("f", b"a long first version", 0o600).unwrap();
        fs.write_file("f", b"short", 0o644).unwrap();
        assert_eq!(fs.read_file("f").unwrap(), b"short");
        let meta = fs.stat("f").unwrap();
        assert_eq!(meta.mode(), 0o644);
        assert_eq!(meta.name(), "f");
        assert_eq!(names(&fs, "."), vec!["f"]);
    }

    #[test]
    fn mkdir_all() {
        let fs = FS::new();
        assert!(fs.mkdir_all(".", 0o700).is_ok());
        assert!(fs.mkdir_all("a/b/c", 0o750).is_ok());
        assert!(fs.mkdir_all("a/b/c", 0o700).is_ok());
        assert_eq!(names(&fs, "a"), vec!["b"]);
        assert_eq!(names(&fs, "a/b"), vec!["c"]);
        assert_eq!(fs.stat("a/b/c").unwrap().mode(), 0o750);

        fs.write_file("a/f", b"", 0o600).unwrap();
        assert!(matches!(fs.mkdir_all("a/f", 0o700), Err(Error::NotADirectory(_))));
        assert!(matches!(fs.mkdir_all("a/f/g", 0o700), Err(Error::NotADirectory(_))));

        // invalid paths are rejected before anything is created
        assert!(matches!(fs.mkdir_all("x/y/../z", 0o700), Err(Error::InvalidPath(_))));
        assert!(fs.open("x").unwrap_err().is_not_exist());
    }

    #[test]
    fn write_errors() {
        let fs = FS::new();
        fs.mkdir_all("d", 0o755).unwrap();
        fs.write_file("f", b"", 0o644).unwrap();

        assert!(matches!(fs.write_file("missing/f", b"x", 0o644), Err(Error::NotExist(_))));
        assert!(matches!(fs.write_file("d", b"x", 0o644), Err(Error::IsADirectory(_))));
        assert!(matches!(fs.write_file(".", b"x", 0o644), Err(Error::IsADirectory(_))));
        assert!(matches!(fs.write_file("f/g", b"x", 0o644), Err(Error::NotADirectory(_))));
        assert!(matches!(fs.write_file("/f", b"x", 0o644), Err(Error::InvalidPath(_))));
        // the parent of a write is never created
        assert!(fs.open("missing").unwrap_err().is_not_exist());
    }

    #[test]
    fn backslashes_and_colons_are_name_characters() {
        let fs = FS::new();
        fs.mkdir_all("dir:with\\slash", 0o755).unwrap();
        fs.write_file("a\\b.txt", b"x", 0o644).unwrap();
        fs.write_file("dir:with\\slash/c:d", b"y", 0o644).unwrap();

        assert_eq!(fs.read_file("a\\b.txt").unwrap(), b"x");
        assert_eq!(fs.read_file("dir:with\\slash/c:d").unwrap(), b"y");
        assert_eq!(names(&fs, "."), vec!["a\\b.txt", "dir:with\\slash"]);
        // a backslash never separates segments
        assert!(fs.open("a").unwrap_err().is_not_exist());
    }

    #[test]
    fn open_errors() {
        let fs = FS::new();
        fs.write_file("f", b"", 0o644).unwrap();
        assert!(matches!(fs.open("nope"), Err(Error::NotExist(_))));
        assert!(matches!(fs.open("f/x"), Err(Error::NotADirectory(_))));
        assert!(matches!(fs.open("../f"), Err(Error::InvalidPath(_))));
        assert!(matches!(fs.open(""), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn snapshot_isolation() {
        let fs = FS::new();
        fs.write_file("f", b"abc", 0o644).unwrap();
        let mut h = fs.open("f").unwrap();
        fs.write_file("f", b"xyz", 0o644).unwrap();
        fs.remove("f").unwrap();

        let mut content = String::new();
        h.read_to_string(&mut content).unwrap();
        assert_eq!(content, "abc");
        assert_eq!(h.stat().unwrap().len(), 3);
    }

    #[test]
    fn seek_through_handle() {
        let fs = FS::new();
        fs.write_file("foo", b"0123456789", 0o777).unwrap();
        let mut h = fs.open("foo").unwrap();
        let mut buf = [0u8; 3];
        h.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"012");
        h.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"345");
        assert_eq!(h.seek(SeekFrom::Start(0)).unwrap(), 0);
        h.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"012");

        let mut d = fs.open(".").unwrap();
        assert_eq!(d.seek(SeekFrom::Start(0)).unwrap_err().kind(), io::ErrorKind::IsADirectory);
    }

    #[test]
    fn handle_conversions() {
        let fs = FS::new();
        fs.mkdir_all("d", 0o755).unwrap();
        fs.write_file("ro", b"x", 0o444).unwrap();
        fs.write_file("rw", b"x", 0o644).unwrap();

        let ro = fs.open("ro").unwrap().into_file().unwrap();
        let perms = ro.stat().unwrap().permissions();
        assert_eq!(perms.mode(), 0o444);
        assert!(perms.readonly());
        assert!(!fs.open("rw").unwrap().stat().unwrap().permissions().readonly());

        assert!(fs.open("d").unwrap().into_file().is_none());
        assert!(fs.open("ro").unwrap().into_dir().is_none());
        let dir = fs.open("d").unwrap().into_dir().unwrap();
        assert!(dir.stat().file_type().is_dir());
        assert_eq!(dir.stat().permissions(), Permissions::from_mode(0o755));
    }

    #[test]
    fn directory_handles() {
        let fs = FS::new();
        fs.mkdir_all("d", 0o710).unwrap();
        let mut h = fs.open("d").unwrap();
        assert!(h.is_dir());
        let meta = h.stat().unwrap();
        assert!(meta.is_dir());
        assert_eq!(meta.mode(), 0o710);
        assert_eq!(meta.len(), 4096);

        let err = h.read(&mut [0u8; 8]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::IsADirectory);
        assert!(matches!(fs.read_file("d"), Err(Error::IsADirectory(_))));
        assert!(h.close().is_ok());

        let mut f = fs.open(".").unwrap();
        assert_eq!(f.stat().unwrap().name(), "");
        assert!(f.read_dir(0).unwrap().entries[0].is_dir());

        fs.write_file("d/f", b"", 0o600).unwrap();
        let mut f = fs.open("d/f").unwrap();
        assert!(matches!(f.read_dir(1), Err(Error::NotADirectory(_))));
    }

    #[test]
    fn remove() {
        let fs = FS::new();
        fs.mkdir_all("a/b/c", 0o755).unwrap();
        fs.write_file("a/b/c/f", b"f", 0o644).unwrap();
        fs.write_file("a/g", b"g", 0o644).unwrap();

        fs.remove("a/b").unwrap();
        assert_eq!(names(&fs, "a"), vec!["g"]);
        assert!(fs.open("a/b/c").unwrap_err().is_not_exist());

        fs.remove("a/g").unwrap();
        assert!(names(&fs, "a").is_empty());

        assert!(matches!(fs.remove("a/g"), Err(Error::NotExist(_))));
        assert!(matches!(fs.remove("z/g"), Err(Error::NotExist(_))));
        assert!(matches!(fs.remove("."), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn sub_views_share_storage() {
        let fs = FS::new();
        fs.mkdir_all("foo/bar", 0o755).unwrap();
        fs.write_file("foo/bar/baz.txt", b"baz", 0o644).unwrap();

        let sub = fs.sub("foo/bar").unwrap();
        assert_eq!(sub.read_file("baz.txt").unwrap(), b"baz");
        assert_eq!(sub.stat(".").unwrap().name(), "bar");

        sub.write_file("new.txt", b"new", 0o644).unwrap();
        assert_eq!(fs.read_file("foo/bar/new.txt").unwrap(), b"new");
        fs.write_file("foo/bar/baz.txt", b"changed", 0o644).unwrap();
        assert_eq!(sub.read_file("baz.txt").unwrap(), b"changed");

        let subsub = sub.sub(".").unwrap();
        assert_eq!(subsub.read_file("new.txt").unwrap(), b"new");

        assert!(matches!(fs.sub("foo/bar/baz.txt"), Err(Error::NotADirectory(_))));
        assert!(matches!(fs.sub("nope"), Err(Error::NotExist(_))));
        assert!(matches!(fs.sub("/foo"), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn open_hook() {
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_f1 = seen.clone();
        let fs = FS::builder()
            .open_hook(move |path, content, err| {
                if path == "foo/bar/override" {
                    return Ok(Some(b"overridden content".to_vec()));
                }
                if path == "denied" {
                    return Err(Error::not_exist(path));
                }
                assert_eq!(content.is_some(), err.is_none());
                if path == "foo/bar/f1" {
                    assert_eq!(content, Some(&b"f1"[..]));
                    seen_f1.fetch_add(1, Ordering::SeqCst);
                }
                Ok(None)
            })
            .build();
        fs.mkdir_all("foo/bar", 0o777).unwrap();
        fs.write_file("foo/bar/f1", b"f1", 0o777).unwrap();
        fs.write_file("foo/bar/override", b"orig content", 0o777).unwrap();
        fs.write_file("denied", b"secret", 0o777).unwrap();

        assert_eq!(fs.read_file("foo/bar/f1").unwrap(), b"f1");
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(fs.read_file("foo/bar/override").unwrap(), b"overridden content");
        assert!(fs.read_file("foo/bar/non_existing_file").unwrap_err().is_not_exist());
        assert!(fs.read_file("denied").unwrap_err().is_not_exist());

        // content from the hook is a fresh file with the default mode
        let meta = fs.stat("foo/bar/override").unwrap();
        assert_eq!(meta.name(), "override");
        assert_eq!(meta.mode(), 0o666);
        assert_eq!(meta.len(), 18);

        // directories bypass the hook
        assert!(fs.open("foo").unwrap().is_dir());
        // invalid paths never reach it
        assert!(matches!(fs.open("/foo/bar/override"), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn open_hook_synthesizes_missing_files() {
        let fs = FS::builder()
            .open_hook(|path, content, err| match (path, content, err) {
                ("gen/a", None, Some(Error::NotExist(_))) => Ok(Some(b"generated".to_vec())),
                _ => Ok(None),
            })
            .build();
        assert_eq!(fs.read_file("gen/a").unwrap(), b"generated");
        assert!(fs.read_file("gen/b").unwrap_err().is_not_exist());
    }

    #[test]
    fn sub_views_inherit_the_hook() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = calls.clone();
        let fs = FS::builder()
            .open_hook(move |path, _, _| {
                counted.fetch_add(1, Ordering::SeqCst);
                Ok(if path == "x" { Some(b"x".to_vec()) } else { None })
            })
            .build();
        fs.mkdir_all("d", 0o755).unwrap();
        let sub = fs.sub("d").unwrap();
        assert_eq!(sub.read_file("x").unwrap(), b"x");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_disjoint_writers() {
        let fs = FS::new();
        let mut workers = Vec::new();
        for i in 0..8 {
            let fs = fs.clone();
            workers.push(thread::spawn(move || {
                let dir = format!("w{}/nested", i);
                fs.mkdir_all(&dir, 0o755).unwrap();
                for j in 0..50 {
                    let path = format!("{}/f{}", dir, j);
                    fs.write_file(&path, path.as_bytes(), 0o644).unwrap();
                    assert_eq!(fs.read_file(&path).unwrap(), path.as_bytes());
                }
            }));
        }
        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(names(&fs, ".").len(), 8);
        assert_eq!(names(&fs, "w3/nested").len(), 50);
    }

    #[test]
    fn concurrent_mkdir_on_shared_prefix() {
        let fs = FS::new();
        let workers: Vec<_> = (0..8)
            .map(|i| {
                let fs = fs.clone();
                thread::spawn(move || fs.mkdir_all(&format!("shared/prefix/{}", i), 0o755))
            })
            .collect();
        for worker in workers {
            worker.join().unwrap().unwrap();
        }
        assert_eq!(names(&fs, "."), vec!["shared"]);
        assert_eq!(names(&fs, "shared/prefix").len(), 8);
    }

    #[test]
    fn last_write_wins() {
        let fs = FS::new();
        let workers: Vec<_> = (0..4u8)
            .map(|i| {
                let fs = fs.clone();
                thread::spawn(move || fs.write_file("f", &[i; 16], 0o644))
            })
            .collect();
        for worker in workers {
            worker.join().unwrap().unwrap();
        }
        let content = fs.read_file("f").unwrap();
        assert_eq!(content.len(), 16);
        assert!(content.iter().all(|b| *b == content[0]));
    }
}
