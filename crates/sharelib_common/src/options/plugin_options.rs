use serde::Deserialize;

pub const DEFAULT_SHARED_LIBRARY_NAMESPACE: &str = "__sharedLibs__";

/// Describes which modules are extracted into a shared chunk and how it is named.
///
/// A module is matched against `name` first (exact request), then against `pattern`
/// (shell glob). `unit_name` only applies to `name` matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedLibrarySearchConfig {
  pub pattern: Option<String>,
  pub name: Option<String>,
  #[serde(alias = "chunkName")]
  pub unit_name: Option<String>,
  /// Used verbatim instead of the `{major}.{minor}[-{prerelease}]` suffix.
  pub suffix: Option<String>,
  pub separator: Option<String>,
  /// Libraries whose versions take part in the chunk name, in order.
  pub deps: Option<Vec<String>>,
  pub used_exports: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SharedLibraryConfigItem {
  /// Shorthand for `{ "pattern": <string> }`.
  Pattern(String),
  Config(SharedLibrarySearchConfig),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SharedLibraries {
  Many(Vec<SharedLibraryConfigItem>),
  One(SharedLibraryConfigItem),
}

impl From<&str> for SharedLibraries {
  fn from(pattern: &str) -> Self {
    Self::One(SharedLibraryConfigItem::Pattern(pattern.to_string()))
  }
}

impl From<SharedLibrarySearchConfig> for SharedLibraries {
  fn from(config: SharedLibrarySearchConfig) -> Self {
    Self::One(SharedLibraryConfigItem::Config(config))
  }
}

impl From<Vec<SharedLibraryConfigItem>> for SharedLibraries {
  fn from(items: Vec<SharedLibraryConfigItem>) -> Self {
    Self::Many(items)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedLibraryPluginOptions {
  /// Property of the global object the shared modules are published under.
  pub namespace: Option<String>,
  pub libs: SharedLibraries,
  #[serde(alias = "disableDefaultJsonpFunctionChange")]
  pub disable_default_loader_name_change: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSearchConfig {
  pub pattern: Option<String>,
  pub name: Option<String>,
  pub unit_name: Option<String>,
  pub suffix: Option<String>,
  pub separator: String,
  pub deps: Vec<String>,
  pub used_exports: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPluginOptions {
  pub namespace: String,
  pub libs: Vec<NormalizedSearchConfig>,
  pub disable_default_loader_name_change: bool,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn libs_accepts_every_shape() {
    let options: SharedLibraryPluginOptions = serde_json::from_str(r#"{"libs":"lodash"}"#).unwrap();
    assert_eq!(options.libs, SharedLibraries::from("lodash"));

    let options: SharedLibraryPluginOptions =
      serde_json::from_str(r#"{"libs":{"name":"@angular/core","chunkName":"ng"}}"#).unwrap();
    let SharedLibraries::One(SharedLibraryConfigItem::Config(config)) = options.libs else {
      panic!("expected a single config");
    };
    assert_eq!(config.unit_name.as_deref(), Some("ng"));

    let options: SharedLibraryPluginOptions = serde_json::from_str(
      r#"{"libs":["lib",{"name":"lib2"}],"disableDefaultJsonpFunctionChange":true,"extra":0}"#,
    )
    .unwrap();
    let SharedLibraries::Many(items) = options.libs else { panic!("expected a list") };
    assert_eq!(items.len(), 2);
    assert_eq!(items[0], SharedLibraryConfigItem::Pattern("lib".to_string()));
    assert_eq!(options.disable_default_loader_name_change, Some(true));
  }
}
