use std::path::{Path, PathBuf};

use sharelib_utils::indexmap::FxIndexSet;

use crate::{ChunkIdx, ExportsInfo, ModuleIdx, ModuleType, RuntimeId};

#[derive(Debug, Clone)]
pub struct Module {
  pub idx: ModuleIdx,
  /// Id used for this module in generated code.
  pub id: RuntimeId,
  /// Absolute path of the resolved resource.
  pub resource: PathBuf,
  /// The import request as written by the importer. `None` for synthetic modules.
  pub raw_request: Option<String>,
  /// Directory the module's own requests are resolved from.
  pub context: PathBuf,
  pub module_type: ModuleType,
  pub dependencies: Vec<ModuleIdx>,
  pub chunks: FxIndexSet<ChunkIdx>,
  pub exports_info: ExportsInfo,
  /// Body of the module factory function.
  pub source: String,
}

impl Module {
  pub fn new(id: impl Into<RuntimeId>, resource: impl Into<PathBuf>) -> Self {
    let resource = resource.into();
    let context = resource.parent().map(Path::to_path_buf).unwrap_or_default();
    Self {
      idx: ModuleIdx::default(),
      id: id.into(),
      resource,
      raw_request: None,
      context,
      module_type: ModuleType::default(),
      dependencies: Vec::new(),
      chunks: FxIndexSet::default(),
      exports_info: ExportsInfo::default(),
      source: String::new(),
    }
  }

  #[must_use]
  pub fn with_raw_request(mut self, raw_request: impl Into<String>) -> Self {
    self.raw_request = Some(raw_request.into());
    self
  }

  #[must_use]
  pub fn with_module_type(mut self, module_type: ModuleType) -> Self {
    self.module_type = module_type;
    self
  }

  #[must_use]
  pub fn with_source(mut self, source: impl Into<String>) -> Self {
    self.source = source.into();
    self
  }

  /// Directory containing the resource, where the package manifest lookup starts.
  pub fn resource_dir(&self) -> &Path {
    self.resource.parent().unwrap_or(&self.resource)
  }
}

#[test]
fn test_context_defaults_to_resource_dir() {
  let module = Module::new("./node_modules/lodash/lodash.js", "/p/node_modules/lodash/lodash.js")
    .with_raw_request("lodash");
  assert_eq!(module.context, Path::new("/p/node_modules/lodash"));
  assert_eq!(module.resource_dir(), Path::new("/p/node_modules/lodash"));
  assert_eq!(module.raw_request.as_deref(), Some("lodash"));
}
