use std::borrow::Cow;

use sharelib_common::{
  ChunkIdx, Compilation, DEFAULT_JSONP_FUNCTION, JsonpChunkPayload, NormalizedPluginOptions,
  OutputOptions, SharedChunkGuard, SharedLibraryPluginOptions,
};
use sharelib_error::BuildResult;
use sharelib_fs::FileSystem;
use sharelib_plugin::{HookKind, Plugin};

use crate::{
  ExtractSharedChunksStage, GlobalRegistry, RequireFnPatcher, SharedChunks, UniqueNameGenerator,
  normalize_options, patch_bootstrap, patch_chunk_payload,
};

/// Every compilation hook runs on this stage, after plugins on the default stage.
const STAGE: i32 = 10;

/// Shares configured libraries between independently built bundles of one page.
pub struct SharedLibraryPlugin<Fs: FileSystem> {
  options: NormalizedPluginOptions,
  fs: Fs,
  shared_chunks: SharedChunks,
  require_fn_patcher: RequireFnPatcher,
  unique_names: UniqueNameGenerator,
}

impl<Fs: FileSystem> SharedLibraryPlugin<Fs> {
  pub fn new(options: SharedLibraryPluginOptions, fs: Fs) -> Self {
    Self {
      options: normalize_options(options),
      fs,
      shared_chunks: SharedChunks::default(),
      require_fn_patcher: RequireFnPatcher::default(),
      unique_names: UniqueNameGenerator::default(),
    }
  }

  pub fn options(&self) -> &NormalizedPluginOptions {
    &self.options
  }

  pub fn shared_chunks(&self) -> &SharedChunks {
    &self.shared_chunks
  }

  /// A short id that is unique within the current build.
  pub fn unique_id(&mut self, input: &str) -> String {
    self.unique_names.unique_id(input)
  }

  fn registry<'a>(&'a self, output: &'a OutputOptions) -> GlobalRegistry<'a> {
    GlobalRegistry::new(&output.global_object, &self.options.namespace)
  }
}

impl<Fs: FileSystem> Plugin for SharedLibraryPlugin<Fs> {
  fn name(&self) -> Cow<'static, str> {
    Cow::Borrowed("SharedLibraryPlugin")
  }

  fn hook_stage(&self, hook: HookKind) -> i32 {
    match hook {
      HookKind::Environment => 0,
      _ => STAGE,
    }
  }

  fn environment(&mut self, output: &mut OutputOptions) -> BuildResult<()> {
    // Bundles sharing a page must not push into each other's chunk array.
    if !self.options.disable_default_loader_name_change
      && output.jsonp_function == DEFAULT_JSONP_FUNCTION
    {
      output.jsonp_function = uuid::Uuid::new_v4().to_string();
      tracing::debug!(jsonp_function = %output.jsonp_function, "renamed chunk loading callback");
    }
    Ok(())
  }

  fn this_compilation(&mut self, _compilation: &Compilation) -> BuildResult<()> {
    self.shared_chunks.clear();
    self.require_fn_patcher.clear();
    self.unique_names.reset();
    Ok(())
  }

  fn optimize_chunks(&mut self, compilation: &mut Compilation) -> BuildResult<()> {
    ExtractSharedChunksStage::new(compilation, &self.options.libs, &self.fs, &mut self.shared_chunks)
      .extract();
    Ok(())
  }

  fn render_require(&mut self, compilation: &Compilation, source: String) -> BuildResult<String> {
    if self.shared_chunks.is_empty() {
      return Ok(source);
    }
    let shared = self.shared_chunks.describe(compilation);
    let registry = GlobalRegistry::new(&compilation.output.global_object, &self.options.namespace);
    self.require_fn_patcher.patch(source, &compilation.output, registry, &shared)
  }

  fn render_bootstrap(&mut self, compilation: &Compilation, source: String) -> BuildResult<String> {
    if self.shared_chunks.is_empty() {
      return Ok(source);
    }
    let shared = self.shared_chunks.describe(compilation);
    patch_bootstrap(&source, &compilation.output, self.registry(&compilation.output), &shared)
  }

  fn render_chunk(
    &mut self,
    compilation: &Compilation,
    chunk: ChunkIdx,
    payload: JsonpChunkPayload,
  ) -> BuildResult<JsonpChunkPayload> {
    let registry = self.registry(&compilation.output);
    let guards = self
      .shared_chunks
      .loaded_with(compilation, chunk)
      .map(|shared| SharedChunkGuard {
        chunk_id: compilation.chunk_table[shared.chunk].id.clone(),
        chunk_name: shared.name.clone(),
        registry_check: registry.has_chunk("name"),
      })
      .collect::<Vec<_>>();

    if guards.is_empty() {
      return Ok(payload);
    }
    tracing::debug!(
      chunk = %compilation.chunk_table[chunk].display_name(),
      guards = guards.len(),
      "guarded shared chunk dependencies"
    );
    Ok(patch_chunk_payload(payload, guards))
  }
}
