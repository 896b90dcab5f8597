use serde::Deserialize;

/// The subset of `package.json` the version lookup cares about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageJson {
  pub name: Option<String>,
  pub version: Option<String>,
}

impl PackageJson {
  pub fn parse(content: &str) -> serde_json::Result<Self> {
    serde_json::from_str(content)
  }

  /// The declared version, ignoring empty strings.
  pub fn version(&self) -> Option<&str> {
    self.version.as_deref().filter(|version| !version.is_empty())
  }
}

#[test]
fn test_package_json_version() {
  assert_eq!(PackageJson::parse(r#"{"version":"1.2.3"}"#).unwrap().version(), Some("1.2.3"));
  assert_eq!(PackageJson::parse(r#"{"version":""}"#).unwrap().version(), None);
  assert_eq!(PackageJson::parse("{}").unwrap().version(), None);
  assert!(PackageJson::parse("{").is_err());
}
