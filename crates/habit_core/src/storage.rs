use std::fs;
use std::io;
use std::path::Path;

/// File primitives the tracker needs from its host.
///
/// Only whole UTF-8 text reads and writes are issued.
pub trait StorageAdapter: Send + Sync {
    fn exists(&self, path: &Path) -> io::Result<bool>;
    fn mkdir(&self, path: &Path) -> io::Result<()>;
    fn read(&self, path: &Path) -> io::Result<String>;
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// Local filesystem adapter.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsAdapter;

impl StorageAdapter for FsAdapter {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        path.try_exists()
    }

    fn mkdir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        fs::write(path, contents)
    }
}
