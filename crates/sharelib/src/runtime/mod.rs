//! An executable model of the patched loader, used to check the protocol bundles
//! follow when they exchange shared modules through the registry.

mod loader;
mod registry;

pub use self::{
  loader::{BundleLoader, DeferredEntry, LoadedChunk},
  registry::{InMemoryRegistry, ModuleRecord, SharedRegistry},
};
