pub mod chunk_group;
pub mod chunk_kind;

use arcstr::ArcStr;
use sharelib_utils::indexmap::FxIndexSet;

use crate::{ChunkGroupIdx, ChunkIdx, ChunkKind, ModuleIdx, RuntimeId};

#[derive(Debug, Clone)]
pub struct Chunk {
  pub idx: ChunkIdx,
  pub id: RuntimeId,
  pub name: Option<ArcStr>,
  pub kind: ChunkKind,
  pub modules: FxIndexSet<ModuleIdx>,
  pub groups: FxIndexSet<ChunkGroupIdx>,
}

impl Chunk {
  pub fn new(idx: ChunkIdx, name: Option<ArcStr>, kind: ChunkKind) -> Self {
    // Named chunks keep their name as id, like a development build does.
    let id = name.clone().map_or_else(|| RuntimeId::Number(idx.raw()), RuntimeId::Name);
    Self { idx, id, name, kind, modules: FxIndexSet::default(), groups: FxIndexSet::default() }
  }

  pub fn is_in_group(&self, group: ChunkGroupIdx) -> bool {
    self.groups.contains(&group)
  }

  pub fn entry_module(&self) -> Option<ModuleIdx> {
    match self.kind {
      ChunkKind::EntryPoint { module } => Some(module),
      ChunkKind::Runtime | ChunkKind::Normal => None,
    }
  }

  pub fn display_name(&self) -> String {
    self.name.as_ref().map_or_else(|| self.id.to_string(), ToString::to_string)
  }
}
