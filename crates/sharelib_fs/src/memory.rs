use std::{
  io::{self, Write},
  path::Path,
};

use sugar_path::SugarPath;
use vfs::{MemoryFS, VfsPath};

use crate::FileSystem;

/// In-memory file system, mostly for tests and for graphs described entirely in JSON.
#[derive(Debug)]
pub struct MemoryFileSystem {
  root: VfsPath,
}

impl Default for MemoryFileSystem {
  fn default() -> Self {
    Self { root: VfsPath::new(MemoryFS::new()) }
  }
}

impl MemoryFileSystem {
  pub fn new(files: &[(&str, &str)]) -> io::Result<Self> {
    let fs = Self::default();
    for (path, content) in files {
      fs.add_file(Path::new(path), content)?;
    }
    Ok(fs)
  }

  pub fn add_file(&self, path: &Path, content: &str) -> io::Result<()> {
    let file = self.vfs_path(path)?;
    if let Some(parent) = path.parent() {
      self.vfs_path(parent)?.create_dir_all().map_err(io::Error::other)?;
    }
    let mut writer = file.create_file().map_err(io::Error::other)?;
    writer.write_all(content.as_bytes())
  }

  fn vfs_path(&self, path: &Path) -> io::Result<VfsPath> {
    let normalized = path.to_slash_lossy();
    let relative = normalized.trim_start_matches('/');
    if relative.is_empty() {
      return Ok(self.root.clone());
    }
    self.root.join(relative).map_err(io::Error::other)
  }
}

impl FileSystem for MemoryFileSystem {
  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    self.vfs_path(path)?.read_to_string().map_err(io::Error::other)
  }

  fn is_file(&self, path: &Path) -> bool {
    self.vfs_path(path).is_ok_and(|file| file.is_file().unwrap_or(false))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn stores_nested_files() {
    let fs = MemoryFileSystem::new(&[("/project/node_modules/lodash/package.json", "{}")]).unwrap();
    let path = Path::new("/project/node_modules/lodash/package.json");
    assert!(fs.is_file(path));
    assert!(!fs.is_file(Path::new("/project/node_modules/lodash")));
    assert_eq!(fs.read_to_string(path).unwrap(), "{}");
    assert!(fs.read_to_string(Path::new("/project/package.json")).is_err());
  }
}
