mod chunk;
mod compilation;
mod module;
mod options;
mod render;
mod types;

pub use crate::{
  chunk::{
    Chunk,
    chunk_group::{ChunkGroup, ChunkGroupKind},
    chunk_kind::ChunkKind,
  },
  compilation::Compilation,
  module::Module,
  options::{
    output_options::{DEFAULT_JSONP_FUNCTION, OutputOptions},
    plugin_options::{
      DEFAULT_SHARED_LIBRARY_NAMESPACE, NormalizedPluginOptions, NormalizedSearchConfig,
      SharedLibraries, SharedLibraryConfigItem, SharedLibraryPluginOptions,
      SharedLibrarySearchConfig,
    },
  },
  render::{
    jsonp_chunk::{DeferredModule, JsonpChunkPayload, SharedChunkGuard},
    runtime_template,
  },
  types::{
    exports_info::{ExportsInfo, ProvidedExports, UsedExports},
    module_type::ModuleType,
    package_json::PackageJson,
    raw_idx::{ChunkGroupIdx, ChunkIdx, ModuleIdx},
    runtime_id::{RuntimeId, js_array_literal, js_string_literal},
    source::{Source, SourceJoiner},
  },
};
