use std::rc::Rc;

use arcstr::ArcStr;
use rustc_hash::FxHashMap;
use sharelib_common::{JsonpChunkPayload, RuntimeId};

use super::{ModuleRecord, SharedRegistry};
use crate::SharedChunkInfo;

/// A chunk as the loader receives it.
#[derive(Debug, Clone, Default)]
pub struct LoadedChunk {
  pub chunk_ids: Vec<RuntimeId>,
  /// Module id and the exports its factory produces.
  pub modules: Vec<(RuntimeId, serde_json::Value)>,
  pub deferred: Vec<DeferredEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct DeferredEntry {
  /// `None` is the sentinel of a chunk with no entry module.
  pub entry: Option<RuntimeId>,
  pub chunk_deps: Vec<RuntimeId>,
  /// Shared chunks waited for only while the registry lacks them.
  pub guards: Vec<(RuntimeId, ArcStr)>,
}

impl From<&JsonpChunkPayload> for LoadedChunk {
  /// A module's exports are modelled by its source text.
  fn from(payload: &JsonpChunkPayload) -> Self {
    Self {
      chunk_ids: payload.chunk_ids.clone(),
      modules: payload
        .modules
        .iter()
        .map(|(id, source)| (id.clone(), serde_json::Value::String(source.clone())))
        .collect(),
      deferred: payload
        .deferred_modules
        .iter()
        .flatten()
        .map(|deferred| DeferredEntry {
          entry: deferred.entry.clone(),
          chunk_deps: deferred.chunk_deps.clone(),
          guards: deferred
            .shared_guards
            .iter()
            .map(|guard| (guard.chunk_id.clone(), guard.chunk_name.clone()))
            .collect(),
        })
        .collect(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkState {
  Loading,
  Installed,
}

#[derive(Debug)]
struct DeferredList {
  entry: Option<RuntimeId>,
  deps: Vec<RuntimeId>,
}

/// The runtime of one bundle after patching.
pub struct BundleLoader<R: SharedRegistry> {
  registry: Rc<R>,
  shared: Vec<SharedChunkInfo>,
  factories: FxHashMap<RuntimeId, serde_json::Value>,
  installed_modules: FxHashMap<RuntimeId, Rc<ModuleRecord>>,
  installed_chunks: FxHashMap<RuntimeId, ChunkState>,
  deferred: Vec<DeferredList>,
  requested_chunks: Vec<RuntimeId>,
  executed_modules: Vec<RuntimeId>,
}

impl<R: SharedRegistry> BundleLoader<R> {
  pub fn new(registry: Rc<R>, runtime_chunk: RuntimeId, shared: Vec<SharedChunkInfo>) -> Self {
    let mut installed_chunks = FxHashMap::default();
    installed_chunks.insert(runtime_chunk, ChunkState::Installed);
    Self {
      registry,
      shared,
      factories: FxHashMap::default(),
      installed_modules: FxHashMap::default(),
      installed_chunks,
      deferred: Vec::new(),
      requested_chunks: Vec::new(),
      executed_modules: Vec::new(),
    }
  }

  /// Handles a pushed chunk, then runs every entry whose chunks are all installed.
  /// Returns the record of the last entry module that ran.
  pub fn install_chunk(&mut self, chunk: LoadedChunk) -> anyhow::Result<Option<Rc<ModuleRecord>>> {
    for id in chunk.chunk_ids {
      self.installed_chunks.insert(id, ChunkState::Installed);
    }
    self.factories.extend(chunk.modules);

    for deferred in chunk.deferred {
      let mut deps = deferred.chunk_deps;
      deps.extend(
        deferred
          .guards
          .into_iter()
          .filter(|(_, name)| !self.registry.has_chunk(name))
          .map(|(id, _)| id),
      );
      self.deferred.push(DeferredList { entry: deferred.entry, deps });
    }

    self.check_deferred_modules()
  }

  /// The readiness gate.
  pub fn check_deferred_modules(&mut self) -> anyhow::Result<Option<Rc<ModuleRecord>>> {
    let mut result = None;
    let mut idx = 0;
    while idx < self.deferred.len() {
      let mut fulfilled = true;
      for dep in self.deferred[idx].deps.clone() {
        if self.is_installed(&dep) {
          continue;
        }
        fulfilled = false;
        let missing_shared =
          self.shared.iter().any(|info| info.id == dep && !self.registry.has_chunk(&info.name));
        if missing_shared {
          self.ensure_chunk(dep);
        }
      }

      match (fulfilled, self.deferred[idx].entry.clone()) {
        (true, Some(entry)) => {
          self.deferred.remove(idx);
          result = Some(self.require(&entry)?);
        }
        _ => idx += 1,
      }
    }
    Ok(result)
  }

  pub fn require(&mut self, module_id: &RuntimeId) -> anyhow::Result<Rc<ModuleRecord>> {
    for info in self.shared.iter().filter(|info| info.contains(module_id)) {
      if let Some(record) = self.registry.get(&info.name, module_id) {
        self.installed_modules.insert(module_id.clone(), record);
      }
    }

    if let Some(record) = self.installed_modules.get(module_id) {
      return Ok(Rc::clone(record));
    }

    let exports = self
      .factories
      .get(module_id)
      .cloned()
      .ok_or_else(|| anyhow::anyhow!("Cannot find module '{module_id}'"))?;
    let record = Rc::new(ModuleRecord { id: module_id.clone(), exports });
    self.installed_modules.insert(module_id.clone(), Rc::clone(&record));
    self.executed_modules.push(module_id.clone());

    for info in self.shared.iter().filter(|info| info.contains(module_id)) {
      self.registry.set(&info.name, module_id.clone(), Rc::clone(&record));
    }
    Ok(record)
  }

  /// Chunks fetched over the network so far, in request order.
  pub fn requested_chunks(&self) -> &[RuntimeId] {
    &self.requested_chunks
  }

  /// Modules whose factory this bundle ran itself.
  pub fn executed_modules(&self) -> &[RuntimeId] {
    &self.executed_modules
  }

  /// Chunks some deferred entry still waits for.
  pub fn pending_chunks(&self) -> Vec<RuntimeId> {
    let mut pending = Vec::new();
    for dep in self.deferred.iter().flat_map(|deferred| &deferred.deps) {
      if !self.is_installed(dep) && !pending.contains(dep) {
        pending.push(dep.clone());
      }
    }
    pending
  }

  /// Whether every deferred entry with a real entry module has run.
  pub fn is_ready(&self) -> bool {
    self.deferred.iter().all(|deferred| deferred.entry.is_none())
  }

  fn is_installed(&self, chunk: &RuntimeId) -> bool {
    self.installed_chunks.get(chunk) == Some(&ChunkState::Installed)
  }

  fn ensure_chunk(&mut self, chunk: RuntimeId) {
    if !self.installed_chunks.contains_key(&chunk) {
      self.installed_chunks.insert(chunk.clone(), ChunkState::Loading);
      self.requested_chunks.push(chunk);
    }
  }
}
