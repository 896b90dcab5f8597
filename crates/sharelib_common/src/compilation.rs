use std::path::PathBuf;

use arcstr::ArcStr;
use oxc_index::IndexVec;
use sharelib_error::BuildDiagnostic;
use sharelib_utils::indexmap::FxIndexMap;

use crate::{
  Chunk, ChunkGroup, ChunkGroupIdx, ChunkGroupKind, ChunkIdx, ChunkKind, Module, ModuleIdx,
  OutputOptions,
};

/// The build graph of one build run.
///
/// Modules, chunks and chunk groups reference each other by index. Every method that
/// changes a relation updates both sides of it.
#[derive(Debug, Default)]
pub struct Compilation {
  pub cwd: PathBuf,
  pub output: OutputOptions,
  pub module_table: IndexVec<ModuleIdx, Module>,
  pub chunk_table: IndexVec<ChunkIdx, Chunk>,
  pub chunk_groups: IndexVec<ChunkGroupIdx, ChunkGroup>,
  pub entrypoints: FxIndexMap<ArcStr, ChunkGroupIdx>,
  pub warnings: Vec<BuildDiagnostic>,
}

impl Compilation {
  pub fn new(cwd: PathBuf, output: OutputOptions) -> Self {
    Self { cwd, output, ..Self::default() }
  }

  pub fn add_module(&mut self, mut module: Module) -> ModuleIdx {
    module.idx = self.module_table.next_idx();
    self.module_table.push(module)
  }

  pub fn add_dependency(&mut self, from: ModuleIdx, to: ModuleIdx) {
    let dependencies = &mut self.module_table[from].dependencies;
    if !dependencies.contains(&to) {
      dependencies.push(to);
    }
  }

  pub fn add_chunk(&mut self, name: Option<ArcStr>, kind: ChunkKind) -> ChunkIdx {
    let idx = self.chunk_table.next_idx();
    self.chunk_table.push(Chunk::new(idx, name, kind))
  }

  pub fn add_chunk_in_group(&mut self, name: Option<ArcStr>, kind: ChunkGroupKind) -> ChunkGroupIdx {
    let idx = self.chunk_groups.next_idx();
    self.chunk_groups.push(ChunkGroup::new(idx, name, kind))
  }

  /// Registers a named entrypoint made of `chunks`, in loading order.
  pub fn add_entrypoint(&mut self, name: ArcStr, chunks: &[ChunkIdx]) -> ChunkGroupIdx {
    let group = self.add_chunk_in_group(Some(name.clone()), ChunkGroupKind::Entrypoint);
    for chunk in chunks {
      self.push_chunk(group, *chunk);
    }
    self.entrypoints.insert(name, group);
    group
  }

  /// Returns `false` if the chunk already belongs to the group.
  pub fn push_chunk(&mut self, group: ChunkGroupIdx, chunk: ChunkIdx) -> bool {
    if !self.chunk_table[chunk].groups.insert(group) {
      return false;
    }
    self.chunk_groups[group].chunks.push(chunk);
    true
  }

  /// Returns `false` if `child` was already a child of `parent`.
  pub fn add_group_child(&mut self, parent: ChunkGroupIdx, child: ChunkGroupIdx) -> bool {
    if !self.chunk_groups[parent].children.insert(child) {
      return false;
    }
    self.chunk_groups[child].parents.insert(parent);
    true
  }

  pub fn connect_module_and_chunk(&mut self, module: ModuleIdx, chunk: ChunkIdx) {
    self.module_table[module].chunks.insert(chunk);
    self.chunk_table[chunk].modules.insert(module);
  }

  pub fn disconnect_module_and_chunk(&mut self, module: ModuleIdx, chunk: ChunkIdx) {
    self.module_table[module].chunks.shift_remove(&chunk);
    self.chunk_table[chunk].modules.shift_remove(&module);
  }

  /// Moves `module` out of every chunk it currently lives in and into `chunk`.
  pub fn move_module_to_chunk(&mut self, module: ModuleIdx, chunk: ChunkIdx) {
    let previous = std::mem::take(&mut self.module_table[module].chunks);
    for previous_chunk in previous {
      self.chunk_table[previous_chunk].modules.shift_remove(&module);
    }
    self.connect_module_and_chunk(module, chunk);
  }

  pub fn chunk_by_name(&self, name: &str) -> Option<ChunkIdx> {
    self.chunk_table.iter().find(|chunk| chunk.name.as_deref() == Some(name)).map(|chunk| chunk.idx)
  }

  pub fn runtime_chunk(&self) -> Option<ChunkIdx> {
    self.chunk_table.iter().find(|chunk| matches!(chunk.kind, ChunkKind::Runtime)).map(|c| c.idx)
  }

  pub fn push_warning(&mut self, warning: BuildDiagnostic) {
    self.warnings.push(warning);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn compilation_with_entry() -> (Compilation, ChunkGroupIdx, ChunkIdx, ModuleIdx) {
    let mut compilation = Compilation::default();
    let module = compilation.add_module(Module::new("./src/index.js", "/p/src/index.js"));
    let chunk =
      compilation.add_chunk(Some(arcstr::literal!("main")), ChunkKind::EntryPoint { module });
    compilation.connect_module_and_chunk(module, chunk);
    let entry = compilation.add_entrypoint(arcstr::literal!("main"), &[chunk]);
    (compilation, entry, chunk, module)
  }

  #[test]
  fn keeps_both_sides_of_relations() {
    let (mut compilation, entry, chunk, module) = compilation_with_entry();
    assert!(compilation.chunk_table[chunk].is_in_group(entry));
    assert!(compilation.module_table[module].chunks.contains(&chunk));
    assert!(!compilation.push_chunk(entry, chunk));

    let other = compilation.add_chunk(Some(arcstr::literal!("other")), ChunkKind::Normal);
    compilation.move_module_to_chunk(module, other);
    assert!(compilation.chunk_table[chunk].modules.is_empty());
    assert_eq!(compilation.module_table[module].chunks.iter().collect::<Vec<_>>(), vec![&other]);
  }

  #[test]
  fn group_children_are_linked_once() {
    let (mut compilation, entry, _, _) = compilation_with_entry();
    let child = compilation.add_chunk_in_group(Some(arcstr::literal!("lib")), ChunkGroupKind::Async);
    assert!(compilation.add_group_child(entry, child));
    assert!(!compilation.add_group_child(entry, child));
    assert!(compilation.chunk_groups[child].parents.contains(&entry));
  }

  #[test]
  fn named_chunks_use_their_name_as_id() {
    let (mut compilation, _, chunk, _) = compilation_with_entry();
    assert_eq!(compilation.chunk_table[chunk].id.to_string(), "main");
    let anonymous = compilation.add_chunk(None, ChunkKind::Normal);
    assert_eq!(compilation.chunk_table[anonymous].id, crate::RuntimeId::Number(1));
    assert_eq!(compilation.chunk_by_name("main"), Some(chunk));
  }
}
