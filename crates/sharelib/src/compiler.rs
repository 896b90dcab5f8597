use sharelib_common::{
  Chunk, ChunkIdx, ChunkKind, Compilation, DeferredModule, JsonpChunkPayload, OutputOptions,
  runtime_template,
};
use sharelib_error::{BuildDiagnostic, BuildResult};
use sharelib_plugin::{Plugin, PluginDriver};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputAsset {
  pub filename: String,
  pub content: String,
}

#[derive(Debug, Default)]
pub struct BuildOutput {
  pub assets: Vec<OutputAsset>,
  /// Payloads of every non-runtime chunk, as rendered into `assets`.
  pub chunks: Vec<JsonpChunkPayload>,
  pub warnings: Vec<BuildDiagnostic>,
}

/// A minimal host that drives plugins through the phases of one build and renders
/// the chunk graph it is given.
pub struct Compiler {
  output: OutputOptions,
  plugin_driver: PluginDriver,
}

impl Compiler {
  pub fn new(output: OutputOptions, plugins: Vec<Box<dyn Plugin>>) -> BuildResult<Self> {
    let mut output = output;
    let mut plugin_driver = PluginDriver::new(plugins);
    plugin_driver.environment(&mut output)?;
    Ok(Self { output, plugin_driver })
  }

  pub fn output(&self) -> &OutputOptions {
    &self.output
  }

  pub fn build(&mut self, compilation: Compilation) -> BuildResult<BuildOutput> {
    let mut compilation = compilation;
    compilation.output = self.output.clone();

    self.plugin_driver.this_compilation(&compilation)?;
    self.plugin_driver.optimize_chunks(&mut compilation)?;

    let mut assets = Vec::new();
    if let Some(runtime) = compilation.runtime_chunk() {
      let runtime = &compilation.chunk_table[runtime];
      let require_body = runtime_template::require_body(&compilation.output);
      let require_body = self.plugin_driver.render_require(&compilation, require_body)?;
      let bootstrap = runtime_template::bootstrap(&compilation.output, &runtime.id);
      let bootstrap = self.plugin_driver.render_bootstrap(&compilation, bootstrap)?;
      assets.push(OutputAsset {
        filename: compilation.output.filename_for(&runtime.display_name()),
        content: runtime_template::assemble(&compilation.output, &bootstrap, &require_body),
      });
    }

    let mut chunks = Vec::new();
    for chunk in &compilation.chunk_table {
      if matches!(chunk.kind, ChunkKind::Runtime) || !is_emitted(chunk) {
        continue;
      }
      let payload = chunk_payload(&compilation, chunk.idx);
      let payload = self.plugin_driver.render_chunk(&compilation, chunk.idx, payload)?;
      assets.push(OutputAsset {
        filename: compilation.output.filename_for(&chunk.display_name()),
        content: payload.render(&compilation.output),
      });
      chunks.push(payload);
    }

    tracing::debug!(assets = assets.len(), warnings = compilation.warnings.len(), "build finished");
    Ok(BuildOutput { assets, chunks, warnings: compilation.warnings })
  }
}

/// Chunks left without modules, e.g. a `vendors` chunk whose modules were all
/// extracted, produce no asset and must not be waited on. The runtime chunk is
/// always present.
fn is_emitted(chunk: &Chunk) -> bool {
  matches!(chunk.kind, ChunkKind::Runtime)
    || !chunk.modules.is_empty()
    || chunk.entry_module().is_some()
}

/// The payload a chunk is rendered from before plugins see it. An entry chunk asks
/// the runtime to run its entry module once the other chunks of its entrypoints
/// are installed.
fn chunk_payload(compilation: &Compilation, chunk_idx: ChunkIdx) -> JsonpChunkPayload {
  let chunk = &compilation.chunk_table[chunk_idx];
  let modules = chunk
    .modules
    .iter()
    .map(|module| {
      let module = &compilation.module_table[*module];
      (module.id.clone(), module.source.clone())
    })
    .collect();

  let deferred_modules = chunk.entry_module().map(|entry| {
    let mut chunk_deps = Vec::new();
    for group in &chunk.groups {
      for other in &compilation.chunk_groups[*group].chunks {
        let other_chunk = &compilation.chunk_table[*other];
        let id = &other_chunk.id;
        if *other != chunk_idx && is_emitted(other_chunk) && !chunk_deps.contains(id) {
          chunk_deps.push(id.clone());
        }
      }
    }
    vec![DeferredModule {
      entry: Some(compilation.module_table[entry].id.clone()),
      chunk_deps,
      shared_guards: vec![],
    }]
  });

  JsonpChunkPayload { chunk_ids: vec![chunk.id.clone()], modules, deferred_modules }
}
