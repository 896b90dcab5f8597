use sharelib_common::{Module, NormalizedSearchConfig};
use sharelib_utils::camel_case::camel_case;

/// A library config a module belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryMatch<'a> {
  /// Position of `config` in the configured list.
  pub config_idx: usize,
  pub config: &'a NormalizedSearchConfig,
  /// First segment of the shared chunk name.
  pub display_name: String,
}

/// Decides which modules belong to a shared library.
///
/// Exact `name` configs are searched first, then `pattern` configs in declaration
/// order. The first hit wins.
#[derive(Debug, Clone, Copy)]
pub struct LibraryMatcher<'a> {
  libs: &'a [NormalizedSearchConfig],
}

impl<'a> LibraryMatcher<'a> {
  pub fn new(libs: &'a [NormalizedSearchConfig]) -> Self {
    Self { libs }
  }

  pub fn find(&self, module: &Module) -> Option<LibraryMatch<'a>> {
    self.find_request(module.raw_request.as_deref()?)
  }

  pub fn is_shared(&self, module: &Module) -> bool {
    self.find(module).is_some()
  }

  pub fn find_request(&self, request: &str) -> Option<LibraryMatch<'a>> {
    if request.is_empty() {
      return None;
    }

    let by_name = self
      .libs
      .iter()
      .enumerate()
      .find(|(_, lib)| lib.name.as_deref() == Some(request));

    if let Some((config_idx, config)) = by_name {
      let display_name = config.unit_name.clone().unwrap_or_else(|| camel_case(request));
      return Some(LibraryMatch { config_idx, config, display_name });
    }

    // `unit_name` is ignored for patterns, one pattern usually covers many chunks.
    self
      .libs
      .iter()
      .enumerate()
      .filter_map(|(idx, lib)| lib.pattern.as_deref().map(|pattern| (idx, lib, pattern)))
      .find(|(_, _, pattern)| fast_glob::glob_match(pattern, request))
      .map(|(config_idx, config, _)| LibraryMatch {
        config_idx,
        config,
        display_name: camel_case(request),
      })
  }
}

#[cfg(test)]
mod tests {
  use sharelib_common::{SharedLibraries, SharedLibraryPluginOptions};

  use super::*;
  use crate::normalize_options;

  fn libs(json: &str) -> Vec<NormalizedSearchConfig> {
    let libs: SharedLibraries = serde_json::from_str(json).unwrap();
    normalize_options(SharedLibraryPluginOptions {
      namespace: None,
      libs,
      disable_default_loader_name_change: None,
    })
    .libs
  }

  #[test]
  fn synthetic_modules_never_match() {
    let libs = libs(r#""**""#);
    let matcher = LibraryMatcher::new(&libs);
    assert!(matcher.find(&Module::new(0_u32, "/p/src/index.js")).is_none());
    assert!(matcher.find(&Module::new(1_u32, "/p/a.js").with_raw_request("a")).is_some());
  }

  #[test]
  fn name_takes_priority_over_pattern() {
    let libs = libs(r#"["@angular/*", { "name": "@angular/core", "unitName": "ng" }]"#);
    let matcher = LibraryMatcher::new(&libs);

    let core = matcher.find_request("@angular/core").unwrap();
    assert_eq!(core.config_idx, 1);
    assert_eq!(core.display_name, "ng");

    let common = matcher.find_request("@angular/common").unwrap();
    assert_eq!(common.config_idx, 0);
    assert_eq!(common.display_name, "angularCommon");

    assert!(matcher.find_request("@angular/common/http").is_none());
    assert!(matcher.find_request("rxjs").is_none());
  }

  #[test]
  fn first_pattern_in_declaration_order_wins() {
    let libs = libs(r#"["rxjs/**", "rxjs*", { "name": "lodash" }]"#);
    let matcher = LibraryMatcher::new(&libs);

    assert_eq!(matcher.find_request("rxjs/operators").unwrap().config_idx, 0);
    assert_eq!(matcher.find_request("rxjs-compat").unwrap().config_idx, 1);
    let lodash = matcher.find_request("lodash").unwrap();
    assert_eq!((lodash.config_idx, lodash.display_name.as_str()), (2, "lodash"));
    assert!(matcher.find_request("lodash/map").is_none());
  }
}
