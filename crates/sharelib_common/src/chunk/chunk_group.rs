use arcstr::ArcStr;
use sharelib_utils::indexmap::FxIndexSet;

use crate::{ChunkGroupIdx, ChunkIdx};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkGroupKind {
  Entrypoint,
  /// Loaded on demand, the way a dynamic `import()` target is.
  Async,
}

/// Chunks that are loaded together, plus the groups loaded from them.
#[derive(Debug, Clone)]
pub struct ChunkGroup {
  pub idx: ChunkGroupIdx,
  pub name: Option<ArcStr>,
  pub kind: ChunkGroupKind,
  pub chunks: Vec<ChunkIdx>,
  pub children: FxIndexSet<ChunkGroupIdx>,
  pub parents: FxIndexSet<ChunkGroupIdx>,
}

impl ChunkGroup {
  pub fn new(idx: ChunkGroupIdx, name: Option<ArcStr>, kind: ChunkGroupKind) -> Self {
    Self {
      idx,
      name,
      kind,
      chunks: Vec::new(),
      children: FxIndexSet::default(),
      parents: FxIndexSet::default(),
    }
  }

  pub fn is_entrypoint(&self) -> bool {
    matches!(self.kind, ChunkGroupKind::Entrypoint)
  }
}
