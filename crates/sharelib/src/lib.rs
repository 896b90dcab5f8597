mod compiler;
mod global_registry;
mod library_matcher;
mod patchers;
mod plugin;
pub mod runtime;
mod shared_chunks;
mod stages;
mod unique_name;
mod utils;
mod version_suffix;

pub use crate::{
  compiler::{BuildOutput, Compiler, OutputAsset},
  global_registry::GlobalRegistry,
  library_matcher::{LibraryMatch, LibraryMatcher},
  patchers::{
    bootstrap::patch_bootstrap, chunk_wrapper::patch_chunk_payload, require_fn::RequireFnPatcher,
  },
  plugin::SharedLibraryPlugin,
  shared_chunks::{SharedChunk, SharedChunkInfo, SharedChunks},
  stages::extract_shared_chunks::ExtractSharedChunksStage,
  unique_name::UniqueNameGenerator,
  utils::normalize_options::normalize_options,
  version_suffix::{PackageVersion, VersionSuffixResolver, suffix_from_version},
};
pub use sharelib_common::*;
pub use sharelib_error::{BuildDiagnostic, BuildError, BuildResult, DiagnosticKind};
pub use sharelib_fs::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use sharelib_plugin::{HookKind, Plugin, PluginDriver};
