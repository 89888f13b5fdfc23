use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Scratch directory removed on drop, for CLI file round-trips.
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new() -> io::Result<Self> {
        let path = std::env::temp_dir().join(format!("synaptic-test-{}", Uuid::new_v4()));
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `contents` to `name` inside the directory and return its path.
    pub fn write(&self, name: &str, contents: &str) -> io::Result<PathBuf> {
        let target = self.path.join(name);
        fs::write(&target, contents)?;
        Ok(target)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}
