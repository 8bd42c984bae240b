use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use habit_core::storage::{FsAdapter, StorageAdapter};

/// Filesystem adapter whose writes can be switched off.
#[derive(Default)]
pub struct FlakyAdapter {
    fail_writes: AtomicBool,
}

impl FlakyAdapter {
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl StorageAdapter for FlakyAdapter {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        FsAdapter.exists(path)
    }

    fn mkdir(&self, path: &Path) -> io::Result<()> {
        FsAdapter.mkdir(path)
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        FsAdapter.read(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        FsAdapter.write(path, contents)
    }
}
