use sharelib_common::{ChunkIdx, Compilation, JsonpChunkPayload, OutputOptions};
use sharelib_error::BuildResult;

use crate::{HookKind, Plugin};

#[derive(Default)]
pub struct PluginDriver {
  plugins: Vec<Box<dyn Plugin>>,
}

impl PluginDriver {
  pub fn new(plugins: Vec<Box<dyn Plugin>>) -> Self {
    Self { plugins }
  }

  /// Indices of plugins in the order `hook` runs them.
  fn ordered(&self, hook: HookKind) -> Vec<usize> {
    let mut order = (0..self.plugins.len()).collect::<Vec<_>>();
    // `sort_by_key` is stable, ties keep registration order.
    order.sort_by_key(|idx| self.plugins[*idx].hook_stage(hook));
    order
  }

  pub fn environment(&mut self, output: &mut OutputOptions) -> BuildResult<()> {
    for idx in self.ordered(HookKind::Environment) {
      let plugin = &mut self.plugins[idx];
      tracing::trace!(plugin = %plugin.name(), "environment");
      plugin.environment(output)?;
    }
    Ok(())
  }

  pub fn this_compilation(&mut self, compilation: &Compilation) -> BuildResult<()> {
    for idx in self.ordered(HookKind::ThisCompilation) {
      let plugin = &mut self.plugins[idx];
      tracing::trace!(plugin = %plugin.name(), "this_compilation");
      plugin.this_compilation(compilation)?;
    }
    Ok(())
  }

  pub fn optimize_chunks(&mut self, compilation: &mut Compilation) -> BuildResult<()> {
    for idx in self.ordered(HookKind::OptimizeChunks) {
      let plugin = &mut self.plugins[idx];
      tracing::trace!(plugin = %plugin.name(), "optimize_chunks");
      plugin.optimize_chunks(compilation)?;
    }
    Ok(())
  }

  pub fn render_require(&mut self, compilation: &Compilation, source: String) -> BuildResult<String> {
    let mut source = source;
    for idx in self.ordered(HookKind::RenderRequire) {
      source = self.plugins[idx].render_require(compilation, source)?;
    }
    Ok(source)
  }

  pub fn render_bootstrap(
    &mut self,
    compilation: &Compilation,
    source: String,
  ) -> BuildResult<String> {
    let mut source = source;
    for idx in self.ordered(HookKind::RenderBootstrap) {
      source = self.plugins[idx].render_bootstrap(compilation, source)?;
    }
    Ok(source)
  }

  pub fn render_chunk(
    &mut self,
    compilation: &Compilation,
    chunk: ChunkIdx,
    payload: JsonpChunkPayload,
  ) -> BuildResult<JsonpChunkPayload> {
    let mut payload = payload;
    for idx in self.ordered(HookKind::RenderChunk) {
      payload = self.plugins[idx].render_chunk(compilation, chunk, payload)?;
    }
    Ok(payload)
  }
}

#[cfg(test)]
mod tests {
  use std::{borrow::Cow, cell::RefCell, rc::Rc};

  use super::*;

  struct Recorder {
    name: &'static str,
    stage: i32,
    log: Rc<RefCell<Vec<&'static str>>>,
  }

  impl Plugin for Recorder {
    fn name(&self) -> Cow<'static, str> {
      Cow::Borrowed(self.name)
    }

    fn hook_stage(&self, hook: HookKind) -> i32 {
      match hook {
        HookKind::RenderRequire => -self.stage,
        _ => self.stage,
      }
    }

    fn environment(&mut self, _output: &mut OutputOptions) -> BuildResult<()> {
      self.log.borrow_mut().push(self.name);
      Ok(())
    }

    fn render_require(&mut self, _compilation: &Compilation, source: String) -> BuildResult<String> {
      Ok(format!("{source}{}", self.name))
    }
  }

  fn driver(log: &Rc<RefCell<Vec<&'static str>>>) -> PluginDriver {
    let plugin = |name, stage| -> Box<dyn Plugin> {
      Box::new(Recorder { name, stage, log: Rc::clone(log) })
    };
    PluginDriver::new(vec![plugin("a", 10), plugin("b", 0), plugin("c", 10), plugin("d", -5)])
  }

  #[test]
  fn runs_hooks_by_stage_then_registration() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut driver = driver(&log);
    driver.environment(&mut OutputOptions::default()).unwrap();
    assert_eq!(*log.borrow(), vec!["d", "b", "a", "c"]);
  }

  #[test]
  fn render_hooks_chain_their_output() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut driver = driver(&log);
    let rendered = driver.render_require(&Compilation::default(), String::from(">")).unwrap();
    assert_eq!(rendered, ">acbd");
  }
}
