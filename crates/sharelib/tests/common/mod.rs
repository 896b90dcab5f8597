#![allow(dead_code)]

use std::path::PathBuf;

use arcstr::ArcStr;
use sharelib::{
  ChunkGroupIdx, ChunkIdx, ChunkKind, Compilation, JsonpChunkPayload, MemoryFileSystem, Module,
  ModuleIdx, NormalizedPluginOptions, OutputOptions, RuntimeId, SharedChunkInfo,
  SharedLibraryPluginOptions, js_string_literal, normalize_options,
};

pub const CWD: &str = "/p";

/// Builds the graph a host hands over after chunking: one runtime chunk shared by
/// every entrypoint and one chunk per entrypoint holding all of its modules.
pub struct GraphBuilder {
  pub compilation: Compilation,
  pub runtime: ChunkIdx,
}

impl GraphBuilder {
  pub fn new() -> Self {
    let mut compilation = Compilation::new(PathBuf::from(CWD), OutputOptions::default());
    let runtime = compilation.add_chunk(Some(arcstr::literal!("runtime")), ChunkKind::Runtime);
    Self { compilation, runtime }
  }

  /// `resource` is relative to the working directory and doubles as the module id.
  pub fn module(&mut self, request: &str, resource: &str) -> ModuleIdx {
    let module = Module::new(format!("./{resource}").as_str(), format!("{CWD}/{resource}"))
      .with_raw_request(request)
      .with_source(format!("module.exports = {};", js_string_literal(request)));
    self.compilation.add_module(module)
  }

  pub fn depend(&mut self, from: ModuleIdx, to: ModuleIdx) {
    self.compilation.add_dependency(from, to);
  }

  pub fn entry(&mut self, name: &str, entry: ModuleIdx, modules: &[ModuleIdx]) -> (ChunkGroupIdx, ChunkIdx) {
    let chunk = self.compilation.add_chunk(Some(name.into()), ChunkKind::EntryPoint { module: entry });
    self.compilation.connect_module_and_chunk(entry, chunk);
    for module in modules {
      self.compilation.connect_module_and_chunk(*module, chunk);
    }
    let group = self.compilation.add_entrypoint(name.into(), &[self.runtime, chunk]);
    (group, chunk)
  }
}

/// `node_modules` with a `package.json` per `(package, version)`.
pub fn installed_packages(packages: &[(&str, &str)]) -> MemoryFileSystem {
  let fs = MemoryFileSystem::default();
  for (name, version) in packages {
    let manifest = format!(r#"{{"name":{},"version":{}}}"#, js_string_literal(name), js_string_literal(version));
    fs.add_file(&PathBuf::from(format!("{CWD}/node_modules/{name}/package.json")), &manifest).unwrap();
  }
  fs
}

pub fn options(json: &str) -> SharedLibraryPluginOptions {
  serde_json::from_str(json).unwrap()
}

pub fn normalized(json: &str) -> NormalizedPluginOptions {
  normalize_options(options(json))
}

pub fn chunk_module_ids(compilation: &Compilation, chunk: ChunkIdx) -> Vec<String> {
  compilation.chunk_table[chunk]
    .modules
    .iter()
    .map(|module| compilation.module_table[*module].id.to_string())
    .collect()
}

/// Recovers the shared chunks of a bundle from its emitted chunk payloads: every
/// chunk some deferred list guards on, with the modules of its own payload.
pub fn shared_chunk_infos(payloads: &[JsonpChunkPayload]) -> Vec<SharedChunkInfo> {
  let mut guarded = Vec::<(RuntimeId, ArcStr)>::new();
  for deferred in payloads.iter().filter_map(|payload| payload.deferred_modules.as_ref()).flatten() {
    for guard in &deferred.shared_guards {
      if !guarded.iter().any(|(id, _)| *id == guard.chunk_id) {
        guarded.push((guard.chunk_id.clone(), guard.chunk_name.clone()));
      }
    }
  }

  guarded
    .into_iter()
    .map(|(id, name)| {
      let module_ids = payloads
        .iter()
        .find(|payload| payload.chunk_ids.contains(&id))
        .map(|payload| payload.modules.iter().map(|(module_id, _)| module_id.clone()).collect())
        .unwrap_or_default();
      SharedChunkInfo { id, name, module_ids }
    })
    .collect()
}
