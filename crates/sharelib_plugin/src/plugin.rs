use std::borrow::Cow;

use sharelib_common::{ChunkIdx, Compilation, JsonpChunkPayload, OutputOptions};
use sharelib_error::BuildResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
  Environment,
  ThisCompilation,
  OptimizeChunks,
  RenderRequire,
  RenderBootstrap,
  RenderChunk,
}

/// Hooks a plugin can tap into. Every hook has a no-op default.
///
/// Render hooks receive the artifact produced by the previous plugin and return
/// the one handed to the next.
pub trait Plugin {
  fn name(&self) -> Cow<'static, str>;

  /// Hooks run in ascending stage order. Plugins on the same stage run in the
  /// order they were registered.
  fn hook_stage(&self, _hook: HookKind) -> i32 {
    0
  }

  fn environment(&mut self, _output: &mut OutputOptions) -> BuildResult<()> {
    Ok(())
  }

  /// Called once a fresh compilation is created, before any chunk is optimized.
  fn this_compilation(&mut self, _compilation: &Compilation) -> BuildResult<()> {
    Ok(())
  }

  fn optimize_chunks(&mut self, _compilation: &mut Compilation) -> BuildResult<()> {
    Ok(())
  }

  /// Body of the require function of the runtime chunk.
  fn render_require(&mut self, _compilation: &Compilation, source: String) -> BuildResult<String> {
    Ok(source)
  }

  /// Bootstrap section of the runtime chunk.
  fn render_bootstrap(
    &mut self,
    _compilation: &Compilation,
    source: String,
  ) -> BuildResult<String> {
    Ok(source)
  }

  fn render_chunk(
    &mut self,
    _compilation: &Compilation,
    _chunk: ChunkIdx,
    payload: JsonpChunkPayload,
  ) -> BuildResult<JsonpChunkPayload> {
    Ok(payload)
  }
}
