use std::path::{Path, PathBuf};

/// Walks from `start` towards the root, yielding `start` first.
///
/// The walk stops after yielding `boundary` (usually the working directory) or the
/// file-system root, whichever comes first.
pub fn ancestors_within<'a>(start: &'a Path, boundary: &'a Path) -> impl Iterator<Item = &'a Path> {
  let mut next = Some(start);
  std::iter::from_fn(move || {
    let current = next?;
    next = if current == boundary { None } else { current.parent() };
    Some(current)
  })
}

/// Possible locations of an installed package `name`, nearest to `start` first.
pub fn node_modules_candidates(start: &Path, name: &str) -> Vec<PathBuf> {
  start.ancestors().map(|dir| dir.join("node_modules").join(name)).collect()
}

#[test]
fn test_ancestors_within() {
  let dirs = ancestors_within(Path::new("/root/dir/dir2/dir3"), Path::new("/cwd"))
    .map(|p| p.to_string_lossy().into_owned())
    .collect::<Vec<_>>();
  assert_eq!(dirs, vec!["/root/dir/dir2/dir3", "/root/dir/dir2", "/root/dir", "/root", "/"]);

  let dirs = ancestors_within(Path::new("/project/node_modules/lodash"), Path::new("/project"))
    .map(|p| p.to_string_lossy().into_owned())
    .collect::<Vec<_>>();
  assert_eq!(dirs, vec!["/project/node_modules/lodash", "/project/node_modules", "/project"]);
}

#[test]
fn test_node_modules_candidates() {
  let candidates = node_modules_candidates(Path::new("/a/b"), "@angular/core");
  assert_eq!(candidates[0], Path::new("/a/b/node_modules/@angular/core"));
  assert_eq!(candidates.last().unwrap(), Path::new("/node_modules/@angular/core"));
}
