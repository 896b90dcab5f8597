use std::path::{Path, PathBuf};

use anyhow::Context;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use sharelib::{
  ChunkIdx, ChunkKind, Compilation, MemoryFileSystem, Module, ModuleIdx, ModuleType,
  OutputOptions, RuntimeId,
};

/// A chunk graph as a host bundler hands it over after its own chunking.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDescription {
  pub cwd: Option<PathBuf>,
  #[serde(default)]
  pub output: OutputOptions,
  /// Files the build reads, keyed by path relative to `cwd`. The disk is read when absent.
  pub files: Option<IndexMap<PathBuf, String>>,
  pub modules: Vec<ModuleDescription>,
  pub chunks: Vec<ChunkDescription>,
  /// Chunk names of every entrypoint, in loading order.
  pub entrypoints: IndexMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDescription {
  pub id: RuntimeId,
  /// Relative to `cwd`.
  pub resource: PathBuf,
  pub request: Option<String>,
  #[serde(default, rename = "type")]
  pub module_type: ModuleType,
  #[serde(default)]
  pub source: String,
  #[serde(default)]
  pub dependencies: Vec<RuntimeId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkDescription {
  pub name: String,
  #[serde(default)]
  pub runtime: bool,
  /// Module run once every chunk of the entrypoint is loaded.
  pub entry: Option<RuntimeId>,
  #[serde(default)]
  pub modules: Vec<RuntimeId>,
}

impl GraphDescription {
  pub fn read(path: &Path) -> anyhow::Result<Self> {
    let content =
      std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
      .with_context(|| format!("Invalid graph description in {}", path.display()))
  }

  /// A relative `cwd` is resolved against `base`.
  pub fn into_compilation(
    self,
    base: &Path,
  ) -> anyhow::Result<(Compilation, Option<MemoryFileSystem>)> {
    let Self { cwd, output, files, modules, chunks, entrypoints } = self;
    let cwd = cwd.map_or_else(|| base.to_path_buf(), |cwd| base.join(cwd));
    let mut compilation = Compilation::new(cwd.clone(), output);

    let mut module_ids = FxHashMap::default();
    for description in &modules {
      let mut module = Module::new(description.id.clone(), cwd.join(&description.resource))
        .with_module_type(description.module_type.clone())
        .with_source(description.source.as_str());
      if let Some(request) = &description.request {
        module = module.with_raw_request(request.as_str());
      }
      module_ids.insert(description.id.clone(), compilation.add_module(module));
    }
    for description in &modules {
      let from = lookup_module(&module_ids, &description.id)?;
      for dependency in &description.dependencies {
        compilation.add_dependency(from, lookup_module(&module_ids, dependency)?);
      }
    }

    let mut chunk_names = FxHashMap::<String, ChunkIdx>::default();
    for description in chunks {
      let entry =
        description.entry.as_ref().map(|entry| lookup_module(&module_ids, entry)).transpose()?;
      let kind = match entry {
        _ if description.runtime => ChunkKind::Runtime,
        Some(module) => ChunkKind::EntryPoint { module },
        None => ChunkKind::Normal,
      };
      let chunk = compilation.add_chunk(Some(description.name.as_str().into()), kind);
      if let Some(module) = entry {
        compilation.connect_module_and_chunk(module, chunk);
      }
      for id in &description.modules {
        compilation.connect_module_and_chunk(lookup_module(&module_ids, id)?, chunk);
      }
      chunk_names.insert(description.name, chunk);
    }

    for (name, names) in entrypoints {
      let chunks = names
        .iter()
        .map(|chunk| {
          chunk_names.get(chunk).copied().with_context(|| format!("Unknown chunk `{chunk}`"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
      compilation.add_entrypoint(name.as_str().into(), &chunks);
    }

    let fs = files
      .map(|files| -> std::io::Result<MemoryFileSystem> {
        let fs = MemoryFileSystem::default();
        for (path, content) in files {
          fs.add_file(&cwd.join(path), &content)?;
        }
        Ok(fs)
      })
      .transpose()?;

    Ok((compilation, fs))
  }
}

fn lookup_module(
  module_ids: &FxHashMap<RuntimeId, ModuleIdx>,
  id: &RuntimeId,
) -> anyhow::Result<ModuleIdx> {
  module_ids.get(id).copied().with_context(|| format!("Unknown module `{id}`"))
}

#[cfg(test)]
mod tests {
  use sharelib::FileSystem;

  use super::*;

  const GRAPH: &str = r#"{
    "cwd": "app",
    "files": { "node_modules/lodash/package.json": "{\"version\":\"4.17.21\"}" },
    "modules": [
      { "id": "./src/index.js", "resource": "src/index.js", "dependencies": ["./node_modules/lodash/lodash.js"] },
      { "id": "./node_modules/lodash/lodash.js", "resource": "node_modules/lodash/lodash.js", "request": "lodash" }
    ],
    "chunks": [
      { "name": "runtime", "runtime": true },
      { "name": "main", "entry": "./src/index.js", "modules": ["./node_modules/lodash/lodash.js"] }
    ],
    "entrypoints": { "main": ["runtime", "main"] }
  }"#;

  #[test]
  fn builds_compilation_from_description() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.json");
    std::fs::write(&path, GRAPH).unwrap();

    let graph = GraphDescription::read(&path).unwrap();
    let (compilation, fs) = graph.into_compilation(Path::new("/work")).unwrap();
    assert_eq!(compilation.cwd, PathBuf::from("/work/app"));
    assert_eq!(compilation.module_table.len(), 2);
    let runtime = compilation.runtime_chunk().unwrap();
    assert_eq!(compilation.chunk_table[runtime].display_name(), "runtime");

    let main = compilation.chunk_by_name("main").unwrap();
    assert_eq!(compilation.chunk_table[main].modules.len(), 2);
    assert!(compilation.chunk_table[main].entry_module().is_some());
    assert_eq!(compilation.chunk_groups[compilation.entrypoints["main"]].chunks.len(), 2);

    let fs = fs.unwrap();
    assert!(fs.is_file(Path::new("/work/app/node_modules/lodash/package.json")));
  }

  #[test]
  fn unknown_references_are_errors() {
    let graph: GraphDescription = serde_json::from_str(
      r#"{ "modules": [], "chunks": [{ "name": "main", "entry": "./missing.js" }], "entrypoints": {} }"#,
    )
    .unwrap();
    let error = graph.into_compilation(Path::new("/work")).unwrap_err();
    assert_eq!(error.to_string(), "Unknown module `./missing.js`");
  }
}
