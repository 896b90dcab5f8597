use std::path::{Path, PathBuf};

use rustc_hash::{FxHashMap, FxHashSet};
use sharelib_common::{Module, NormalizedSearchConfig, PackageJson};
use sharelib_error::BuildDiagnostic;
use sharelib_fs::FileSystem;
use sharelib_utils::{
  concat_string,
  path_ext::{ancestors_within, node_modules_candidates},
};

/// `1.2.3` becomes `1.2`, `1.2.3-next.0` becomes `1.2-next.0`.
pub fn suffix_from_version(version: &str) -> Result<String, semver::Error> {
  let version = semver::Version::parse(version.trim())?;
  let suffix = format!("{}.{}", version.major, version.minor);
  if version.pre.is_empty() {
    Ok(suffix)
  } else {
    Ok(concat_string!(suffix, "-", version.pre.as_str()))
  }
}

/// A `package.json` that declares a version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageVersion {
  pub package_json: PathBuf,
  pub version: String,
}

/// Resolves chunk name suffixes from installed package versions.
///
/// Lookups are cached per directory for one build. A missing version is reported
/// once per request, an invalid one once per manifest.
pub struct VersionSuffixResolver<'a, Fs: FileSystem> {
  fs: &'a Fs,
  cwd: PathBuf,
  versions: FxHashMap<PathBuf, Option<PackageVersion>>,
  manifest_suffixes: FxHashMap<PathBuf, Option<String>>,
  missing_requests: FxHashSet<String>,
  dependency_suffixes: FxHashMap<String, Option<String>>,
  warnings: Vec<BuildDiagnostic>,
}

impl<'a, Fs: FileSystem> VersionSuffixResolver<'a, Fs> {
  pub fn new(fs: &'a Fs, cwd: PathBuf) -> Self {
    Self {
      fs,
      cwd,
      versions: FxHashMap::default(),
      manifest_suffixes: FxHashMap::default(),
      missing_requests: FxHashSet::default(),
      dependency_suffixes: FxHashMap::default(),
      warnings: Vec::new(),
    }
  }

  /// The suffix of the chunk `module` is extracted into. An explicit `config.suffix`
  /// is used verbatim.
  pub fn suffix(&mut self, config: &NormalizedSearchConfig, module: &Module) -> Option<String> {
    if let Some(suffix) = &config.suffix {
      return Some(suffix.clone());
    }

    let Some(found) = self.find_closest_package_json_with_version(module.resource_dir()) else {
      let request =
        module.raw_request.clone().unwrap_or_else(|| module.resource.display().to_string());
      if self.missing_requests.insert(request.clone()) {
        self.warn(BuildDiagnostic::MissingPackageVersion { request });
      }
      return None;
    };

    if let Some(cached) = self.manifest_suffixes.get(&found.package_json) {
      tracing::trace!(package_json = %found.package_json.display(), "suffix cache hit");
      return cached.clone();
    }
    let suffix = self.suffix_of(&found);
    self.manifest_suffixes.insert(found.package_json, suffix.clone());
    suffix
  }

  /// The suffix of an installed dependency listed in `deps`.
  pub fn dependency_suffix(&mut self, name: &str) -> Option<String> {
    if let Some(cached) = self.dependency_suffixes.get(name) {
      return cached.clone();
    }

    let package_json = node_modules_candidates(&self.cwd, name)
      .into_iter()
      .map(|dir| dir.join("package.json"))
      .find(|path| self.fs.is_file(path));

    let suffix = match package_json {
      None => {
        self.warn(BuildDiagnostic::MissingDependencyPackage { name: name.to_string() });
        None
      }
      Some(path) => match self.read_version(&path) {
        Some(found) => self.suffix_of(&found),
        None => {
          self.warn(BuildDiagnostic::MissingPackageVersion { request: name.to_string() });
          None
        }
      },
    };
    self.dependency_suffixes.insert(name.to_string(), suffix.clone());
    suffix
  }

  /// Walks from `dir` up to the working directory, or the root when `dir` lies
  /// outside of it. Manifests that fail to parse are skipped.
  pub fn find_closest_package_json_with_version(&mut self, dir: &Path) -> Option<PackageVersion> {
    if let Some(cached) = self.versions.get(dir) {
      return cached.clone();
    }

    let found = ancestors_within(dir, &self.cwd)
      .map(|ancestor| ancestor.join("package.json"))
      .find_map(|path| self.read_version(&path));
    self.versions.insert(dir.to_path_buf(), found.clone());
    found
  }

  pub fn take_warnings(&mut self) -> Vec<BuildDiagnostic> {
    std::mem::take(&mut self.warnings)
  }

  fn read_version(&self, path: &Path) -> Option<PackageVersion> {
    let content = self.fs.read_to_string(path).ok()?;
    let package_json = PackageJson::parse(&content).ok()?;
    let version = package_json.version()?;
    Some(PackageVersion { package_json: path.to_path_buf(), version: version.to_string() })
  }

  fn suffix_of(&mut self, found: &PackageVersion) -> Option<String> {
    match suffix_from_version(&found.version) {
      Ok(suffix) => Some(suffix),
      Err(_) => {
        self.warn(BuildDiagnostic::InvalidPackageVersion {
          package_json: found.package_json.clone(),
          version: found.version.clone(),
        });
        None
      }
    }
  }

  fn warn(&mut self, diagnostic: BuildDiagnostic) {
    tracing::warn!("{diagnostic}");
    self.warnings.push(diagnostic);
  }
}

#[cfg(test)]
mod tests {
  use sharelib_error::DiagnosticKind;
  use sharelib_fs::MemoryFileSystem;

  use super::*;

  fn config(suffix: Option<&str>) -> NormalizedSearchConfig {
    NormalizedSearchConfig {
      pattern: Some("**".to_string()),
      name: None,
      unit_name: None,
      suffix: suffix.map(ToString::to_string),
      separator: "-".to_string(),
      deps: vec![],
      used_exports: None,
    }
  }

  #[test]
  fn suffix_keeps_major_minor_and_prerelease() {
    assert_eq!(suffix_from_version("1.2.3").unwrap(), "1.2");
    assert_eq!(suffix_from_version("1.2.3-next.0").unwrap(), "1.2-next.0");
    assert_eq!(suffix_from_version("10.0.1-rc.1+build.5").unwrap(), "10.0-rc.1");
    assert!(suffix_from_version("latest").is_err());
  }

  #[test]
  fn finds_nearest_manifest_with_version() {
    let fs = MemoryFileSystem::new(&[
      ("/p/node_modules/lodash/package.json", r#"{"name":"lodash","version":"4.17.21"}"#),
      ("/p/node_modules/lodash/fp/package.json", r#"{"main":"../fp.js"}"#),
      ("/p/node_modules/broken/package.json", "{ not json"),
      ("/p/package.json", r#"{"version":"0.0.1"}"#),
    ])
    .unwrap();
    let mut resolver = VersionSuffixResolver::new(&fs, PathBuf::from("/p"));

    let found =
      resolver.find_closest_package_json_with_version(Path::new("/p/node_modules/lodash/fp")).unwrap();
    assert_eq!(found.version, "4.17.21");
    assert_eq!(found.package_json, Path::new("/p/node_modules/lodash/package.json"));

    let found =
      resolver.find_closest_package_json_with_version(Path::new("/p/node_modules/broken")).unwrap();
    assert_eq!(found.version, "0.0.1");
  }

  #[test]
  fn search_stops_at_working_directory() {
    let fs = MemoryFileSystem::new(&[("/package.json", r#"{"version":"1.0.0"}"#)]).unwrap();
    let mut resolver = VersionSuffixResolver::new(&fs, PathBuf::from("/p"));
    assert!(resolver.find_closest_package_json_with_version(Path::new("/p/node_modules/x")).is_none());
    assert!(resolver.find_closest_package_json_with_version(Path::new("/other/x")).is_some());
  }

  #[test]
  fn missing_version_warns_once_per_request() {
    let fs = MemoryFileSystem::new(&[("/p/node_modules/x/index.js", "")]).unwrap();
    let mut resolver = VersionSuffixResolver::new(&fs, PathBuf::from("/p"));
    let module = Module::new("./node_modules/x/index.js", "/p/node_modules/x/index.js").with_raw_request("x");
    let sibling =
      Module::new("./node_modules/x/sub.js", "/p/node_modules/x/sub.js").with_raw_request("x/sub");

    assert_eq!(resolver.suffix(&config(None), &module), None);
    assert_eq!(resolver.suffix(&config(None), &module), None);
    assert_eq!(resolver.suffix(&config(None), &sibling), None);
    assert_eq!(resolver.suffix(&config(Some("custom")), &module).as_deref(), Some("custom"));

    let warnings = resolver.take_warnings();
    assert_eq!(
      warnings,
      vec![
        BuildDiagnostic::MissingPackageVersion { request: "x".to_string() },
        BuildDiagnostic::MissingPackageVersion { request: "x/sub".to_string() },
      ]
    );
  }

  #[test]
  fn invalid_version_warns_once_per_manifest() {
    let fs = MemoryFileSystem::new(&[
      ("/p/node_modules/y/package.json", r#"{"version":"next"}"#),
      ("/p/node_modules/y/index.js", ""),
      ("/p/node_modules/y/lib/a.js", ""),
    ])
    .unwrap();
    let mut resolver = VersionSuffixResolver::new(&fs, PathBuf::from("/p"));
    let index =
      Module::new("./node_modules/y/index.js", "/p/node_modules/y/index.js").with_raw_request("y");
    let nested = Module::new("./node_modules/y/lib/a.js", "/p/node_modules/y/lib/a.js")
      .with_raw_request("y/lib/a");

    assert_eq!(resolver.suffix(&config(None), &index), None);
    assert_eq!(resolver.suffix(&config(None), &nested), None);
    let kinds = resolver.take_warnings().iter().map(BuildDiagnostic::kind).collect::<Vec<_>>();
    assert_eq!(kinds, vec![DiagnosticKind::InvalidPackageVersion]);
  }

  #[test]
  fn dependency_suffix_reads_installed_package() {
    let fs = MemoryFileSystem::new(&[
      ("/p/node_modules/@angular/core/package.json", r#"{"version":"8.2.14"}"#),
      ("/p/node_modules/bad/package.json", r#"{"version":"next"}"#),
    ])
    .unwrap();
    let mut resolver = VersionSuffixResolver::new(&fs, PathBuf::from("/p"));

    assert_eq!(resolver.dependency_suffix("@angular/core").as_deref(), Some("8.2"));
    assert_eq!(resolver.dependency_suffix("bad"), None);
    assert_eq!(resolver.dependency_suffix("missing"), None);

    let kinds = resolver.take_warnings().iter().map(BuildDiagnostic::kind).collect::<Vec<_>>();
    assert_eq!(
      kinds,
      vec![DiagnosticKind::InvalidPackageVersion, DiagnosticKind::MissingDependencyPackage]
    );
  }
}
