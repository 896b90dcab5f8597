mod common;

use std::fs;

use common::normalized;
use sharelib::{Module, OsFileSystem, PackageVersion, VersionSuffixResolver};

#[test]
fn resolves_versions_from_disk() {
  let dir = tempfile::tempdir().unwrap();
  let package = dir.path().join("node_modules/lodash");
  fs::create_dir_all(package.join("fp")).unwrap();
  fs::write(package.join("package.json"), r#"{"name":"lodash","version":"4.17.21"}"#).unwrap();
  // Nested manifests without a version are skipped.
  fs::write(package.join("fp/package.json"), r#"{"main":"../fp.js"}"#).unwrap();

  let options = normalized(r#"{ "libs": "lodash" }"#);
  let os = OsFileSystem;
  let mut resolver = VersionSuffixResolver::new(&os, dir.path().to_path_buf());

  let module = Module::new("./node_modules/lodash/fp/map.js", package.join("fp/map.js"));
  assert_eq!(resolver.suffix(&options.libs[0], &module).as_deref(), Some("4.17"));
  assert_eq!(
    resolver.find_closest_package_json_with_version(&package.join("fp")),
    Some(PackageVersion { package_json: package.join("package.json"), version: "4.17.21".to_string() })
  );
  assert_eq!(resolver.dependency_suffix("lodash").as_deref(), Some("4.17"));
  assert_eq!(resolver.dependency_suffix("react"), None);
  assert_eq!(resolver.take_warnings().len(), 1);
}
