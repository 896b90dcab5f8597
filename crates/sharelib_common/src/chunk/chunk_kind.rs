use crate::ModuleIdx;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
  /// Holds the bootstrap code and the module cache.
  Runtime,
  /// Runs `module` once every chunk of its entrypoint is loaded.
  EntryPoint { module: ModuleIdx },
  #[default]
  Normal,
}
