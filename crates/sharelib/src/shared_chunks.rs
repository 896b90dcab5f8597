use arcstr::ArcStr;
use sharelib_common::{ChunkGroupIdx, ChunkIdx, Compilation, RuntimeId};
use sharelib_utils::indexmap::{FxIndexMap, FxIndexSet};

/// A chunk created for a shared library.
#[derive(Debug, Clone)]
pub struct SharedChunk {
  pub chunk: ChunkIdx,
  pub group: ChunkGroupIdx,
  pub name: ArcStr,
  /// The library config that produced the chunk.
  pub config_idx: usize,
  /// Entrypoints that load the chunk before running their entry module.
  pub entries: FxIndexSet<ChunkGroupIdx>,
}

/// Shared chunks of one build, keyed by chunk name.
#[derive(Debug, Default)]
pub struct SharedChunks {
  chunks: FxIndexMap<ArcStr, SharedChunk>,
}

impl SharedChunks {
  pub fn get(&self, name: &str) -> Option<&SharedChunk> {
    self.chunks.get(name)
  }

  pub fn insert(&mut self, shared: SharedChunk) {
    self.chunks.insert(shared.name.clone(), shared);
  }

  /// Returns `false` if the entry was already associated with the chunk.
  pub fn associate(&mut self, name: &str, entry: ChunkGroupIdx) -> bool {
    self.chunks.get_mut(name).is_some_and(|shared| shared.entries.insert(entry))
  }

  pub fn iter(&self) -> impl Iterator<Item = &SharedChunk> {
    self.chunks.values()
  }

  pub fn len(&self) -> usize {
    self.chunks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.chunks.is_empty()
  }

  pub fn clear(&mut self) {
    self.chunks.clear();
  }

  /// Shared chunks loaded by an entrypoint that `chunk` belongs to.
  pub fn loaded_with<'a>(
    &'a self,
    compilation: &'a Compilation,
    chunk: ChunkIdx,
  ) -> impl Iterator<Item = &'a SharedChunk> + 'a {
    let chunk = &compilation.chunk_table[chunk];
    self.iter().filter(move |shared| shared.entries.iter().any(|entry| chunk.is_in_group(*entry)))
  }

  pub fn describe(&self, compilation: &Compilation) -> Vec<SharedChunkInfo> {
    self
      .iter()
      .map(|shared| {
        let chunk = &compilation.chunk_table[shared.chunk];
        SharedChunkInfo {
          id: chunk.id.clone(),
          name: shared.name.clone(),
          module_ids: chunk
            .modules
            .iter()
            .map(|module| compilation.module_table[*module].id.clone())
            .collect(),
        }
      })
      .collect()
  }
}

/// What generated code knows about a shared chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedChunkInfo {
  pub id: RuntimeId,
  pub name: ArcStr,
  pub module_ids: Vec<RuntimeId>,
}

impl SharedChunkInfo {
  pub fn contains(&self, module_id: &RuntimeId) -> bool {
    self.module_ids.contains(module_id)
  }
}
