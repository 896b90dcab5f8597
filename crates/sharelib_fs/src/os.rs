use std::{io, path::Path};

use crate::FileSystem;

#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    std::fs::read_to_string(path)
  }

  fn is_file(&self, path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|metadata| metadata.is_file())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reads_files_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("package.json");
    std::fs::write(&file, r#"{"version":"1.0.0"}"#).unwrap();

    let fs = OsFileSystem;
    assert!(fs.is_file(&file));
    assert!(!fs.is_file(dir.path()));
    assert_eq!(fs.read_to_string(&file).unwrap(), r#"{"version":"1.0.0"}"#);
    assert!(fs.read_to_string(&dir.path().join("missing.json")).is_err());
  }
}
