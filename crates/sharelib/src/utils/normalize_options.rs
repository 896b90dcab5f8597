use sharelib_common::{
  DEFAULT_SHARED_LIBRARY_NAMESPACE, NormalizedPluginOptions, NormalizedSearchConfig,
  SharedLibraries, SharedLibraryConfigItem, SharedLibraryPluginOptions, SharedLibrarySearchConfig,
};

const DEFAULT_SEPARATOR: &str = "-";

pub fn normalize_options(raw_options: SharedLibraryPluginOptions) -> NormalizedPluginOptions {
  let items = match raw_options.libs {
    SharedLibraries::Many(items) => items,
    SharedLibraries::One(item) => vec![item],
  };

  NormalizedPluginOptions {
    namespace: raw_options
      .namespace
      .unwrap_or_else(|| DEFAULT_SHARED_LIBRARY_NAMESPACE.to_string()),
    libs: items.into_iter().map(normalize_config_item).collect(),
    disable_default_loader_name_change: raw_options
      .disable_default_loader_name_change
      .unwrap_or_default(),
  }
}

fn normalize_config_item(item: SharedLibraryConfigItem) -> NormalizedSearchConfig {
  let config = match item {
    SharedLibraryConfigItem::Pattern(pattern) => {
      SharedLibrarySearchConfig { pattern: Some(pattern), ..SharedLibrarySearchConfig::default() }
    }
    SharedLibraryConfigItem::Config(config) => config,
  };

  NormalizedSearchConfig {
    pattern: config.pattern,
    name: config.name,
    unit_name: config.unit_name,
    suffix: config.suffix,
    separator: config.separator.unwrap_or_else(|| DEFAULT_SEPARATOR.to_string()),
    deps: config.deps.unwrap_or_default(),
    used_exports: config.used_exports,
  }
}
