use arcstr::ArcStr;
use rustc_hash::FxHashSet;
use sharelib_common::{
  ChunkGroupIdx, ChunkGroupKind, ChunkIdx, ChunkKind, Compilation, ModuleIdx,
  NormalizedSearchConfig,
};
use sharelib_error::BuildDiagnostic;
use sharelib_fs::FileSystem;
use sharelib_utils::{camel_case::camel_case, indexmap::FxIndexSet};

use crate::{LibraryMatch, LibraryMatcher, SharedChunk, SharedChunks, VersionSuffixResolver};

/// Moves the modules of configured libraries into chunks of their own.
///
/// Each new chunk is named after the library and its version, lives in a same-named
/// async group and becomes a child of every entrypoint that used the library. A
/// name that already exists is not extracted again.
pub struct ExtractSharedChunksStage<'a, Fs: FileSystem> {
  compilation: &'a mut Compilation,
  matcher: LibraryMatcher<'a>,
  suffixes: VersionSuffixResolver<'a, Fs>,
  shared_chunks: &'a mut SharedChunks,
  reported_collisions: FxHashSet<(ArcStr, usize)>,
}

impl<'a, Fs: FileSystem> ExtractSharedChunksStage<'a, Fs> {
  pub fn new(
    compilation: &'a mut Compilation,
    libs: &'a [NormalizedSearchConfig],
    fs: &'a Fs,
    shared_chunks: &'a mut SharedChunks,
  ) -> Self {
    let suffixes = VersionSuffixResolver::new(fs, compilation.cwd.clone());
    Self {
      compilation,
      matcher: LibraryMatcher::new(libs),
      suffixes,
      shared_chunks,
      reported_collisions: FxHashSet::default(),
    }
  }

  pub fn extract(mut self) {
    let entrypoints = self.compilation.entrypoints.values().copied().collect::<Vec<_>>();

    for entry in entrypoints {
      let chunks = self.compilation.chunk_groups[entry].chunks.clone();
      for chunk in chunks {
        let modules = self.compilation.chunk_table[chunk].modules.iter().copied().collect::<Vec<_>>();
        for module in modules {
          // An earlier library of this chunk may have absorbed it already.
          if !self.compilation.module_table[module].chunks.contains(&chunk) {
            continue;
          }
          let Some(matched) = self.matcher.find(&self.compilation.module_table[module]) else {
            continue;
          };
          self.extract_module(entry, module, &matched);
        }
      }
    }

    for warning in self.suffixes.take_warnings() {
      self.compilation.push_warning(warning);
    }
  }

  fn extract_module(&mut self, entry: ChunkGroupIdx, module: ModuleIdx, matched: &LibraryMatch) {
    let chunk_name: ArcStr = self.chunk_name(module, matched).into();

    if let Some(existing) = self.shared_chunks.get(&chunk_name) {
      let (group, config_idx) = (existing.group, existing.config_idx);
      if config_idx != matched.config_idx
        && self.reported_collisions.insert((chunk_name.clone(), matched.config_idx))
      {
        let request = self.compilation.module_table[module].raw_request.clone().unwrap_or_default();
        let diagnostic =
          BuildDiagnostic::ChunkNameCollision { chunk_name: chunk_name.to_string(), request };
        tracing::warn!("{diagnostic}");
        self.compilation.push_warning(diagnostic);
      }
      if self.shared_chunks.associate(&chunk_name, entry) {
        self.compilation.add_group_child(entry, group);
      }
      return;
    }

    let owners = self.owning_entrypoints(entry, module);
    let chunk = self.compilation.add_chunk(Some(chunk_name.clone()), ChunkKind::Normal);
    let group = self.compilation.add_chunk_in_group(Some(chunk_name.clone()), ChunkGroupKind::Async);

    self.absorb(module, chunk);
    self.compilation.push_chunk(group, chunk);
    for owner in &owners {
      self.compilation.add_group_child(*owner, group);
    }
    self.mark_fully_used(chunk, matched.config);

    tracing::debug!(
      chunk = %chunk_name,
      modules = self.compilation.chunk_table[chunk].modules.len(),
      "extracted shared chunk"
    );
    self.shared_chunks.insert(SharedChunk {
      chunk,
      group,
      name: chunk_name,
      config_idx: matched.config_idx,
      entries: owners,
    });
  }

  /// `[displayName, suffix, dep, depSuffix, ...]` joined by the config's separator.
  /// Parts that could not be resolved are left out.
  fn chunk_name(&mut self, module: ModuleIdx, matched: &LibraryMatch) -> String {
    let config = matched.config;
    let mut parts = vec![matched.display_name.clone()];
    parts.extend(self.suffixes.suffix(config, &self.compilation.module_table[module]));
    for dep in &config.deps {
      parts.push(camel_case(dep));
      parts.extend(self.suffixes.dependency_suffix(dep));
    }
    parts.join(&config.separator)
  }

  /// The current entrypoint, then every other entrypoint that reached `module`
  /// through one of its chunks.
  fn owning_entrypoints(
    &self,
    entry: ChunkGroupIdx,
    module: ModuleIdx,
  ) -> FxIndexSet<ChunkGroupIdx> {
    let mut owners = FxIndexSet::default();
    owners.insert(entry);
    for chunk in &self.compilation.module_table[module].chunks {
      for group in &self.compilation.chunk_table[*chunk].groups {
        if self.compilation.chunk_groups[*group].is_entrypoint() {
          owners.insert(*group);
        }
      }
    }
    owners
  }

  /// Moves `module` into `chunk` together with the dependencies that live inside its
  /// package and are not libraries of their own.
  fn absorb(&mut self, module: ModuleIdx, chunk: ChunkIdx) {
    let mut visited = FxHashSet::default();
    let mut stack = vec![module];

    while let Some(current) = stack.pop() {
      if !visited.insert(current) {
        continue;
      }
      self.compilation.move_module_to_chunk(current, chunk);

      let current = &self.compilation.module_table[current];
      for dep in current.dependencies.iter().rev() {
        let dep_module = &self.compilation.module_table[*dep];
        if !visited.contains(dep)
          && dep_module.context.starts_with(&current.context)
          && !self.matcher.is_shared(dep_module)
        {
          stack.push(*dep);
        }
      }
    }
  }

  fn mark_fully_used(&mut self, chunk: ChunkIdx, config: &NormalizedSearchConfig) {
    for module in &self.compilation.chunk_table[chunk].modules {
      let module = &mut self.compilation.module_table[*module];
      if module.module_type.is_javascript() {
        module.exports_info.mark_fully_used(config.used_exports.as_deref());
      }
    }
  }
}
