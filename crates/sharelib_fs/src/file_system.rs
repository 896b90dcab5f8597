use std::{io, path::Path};

/// Read-only view of the file system used while resolving package manifests.
pub trait FileSystem: Send + Sync {
  fn read_to_string(&self, path: &Path) -> io::Result<String>;

  fn is_file(&self, path: &Path) -> bool;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    (**self).read_to_string(path)
  }

  fn is_file(&self, path: &Path) -> bool {
    (**self).is_file(path)
  }
}
