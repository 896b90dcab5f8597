use std::{fmt::Display, path::PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
  MissingPackageVersion,
  InvalidPackageVersion,
  MissingDependencyPackage,
  ChunkNameCollision,
}

/// Non-fatal findings reported while extracting shared chunks.
///
/// None of these stop the build. They are collected on the compilation and logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildDiagnostic {
  /// No `package.json` declaring a `version` was found above the module.
  MissingPackageVersion { request: String },
  /// A `package.json` declares a version that is not valid semver.
  InvalidPackageVersion { package_json: PathBuf, version: String },
  /// A name listed in `deps` is not installed anywhere above the working directory.
  MissingDependencyPackage { name: String },
  /// Two different library configs produced the same chunk name. The first one wins.
  ChunkNameCollision { chunk_name: String, request: String },
}

impl BuildDiagnostic {
  pub fn kind(&self) -> DiagnosticKind {
    match self {
      Self::MissingPackageVersion { .. } => DiagnosticKind::MissingPackageVersion,
      Self::InvalidPackageVersion { .. } => DiagnosticKind::InvalidPackageVersion,
      Self::MissingDependencyPackage { .. } => DiagnosticKind::MissingDependencyPackage,
      Self::ChunkNameCollision { .. } => DiagnosticKind::ChunkNameCollision,
    }
  }
}

impl Display for BuildDiagnostic {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::MissingPackageVersion { request } => {
        write!(f, "Could not find a package version for '{request}'")
      }
      Self::InvalidPackageVersion { package_json, version } => {
        write!(f, "Invalid version '{version}' in {}", package_json.display())
      }
      Self::MissingDependencyPackage { name } => {
        write!(f, "Could not find an installed package for dependency '{name}'")
      }
      Self::ChunkNameCollision { chunk_name, request } => write!(
        f,
        "Shared chunk '{chunk_name}' already exists for another library config, '{request}' is not extracted again"
      ),
    }
  }
}

impl std::error::Error for BuildDiagnostic {}

#[test]
fn test_diagnostic_message() {
  let diagnostic = BuildDiagnostic::MissingPackageVersion { request: "lodash".to_string() };
  assert_eq!(diagnostic.kind(), DiagnosticKind::MissingPackageVersion);
  assert_eq!(diagnostic.to_string(), "Could not find a package version for 'lodash'");
}
