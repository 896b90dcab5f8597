use std::{cell::RefCell, rc::Rc};

use rustc_hash::FxHashMap;
use sharelib_common::RuntimeId;

/// An executed module. Bundles share records by reference, exports are never copied.
#[derive(Debug, PartialEq)]
pub struct ModuleRecord {
  pub id: RuntimeId,
  pub exports: serde_json::Value,
}

/// The interface generated code uses to exchange modules with other bundles.
pub trait SharedRegistry {
  fn has_chunk(&self, chunk_name: &str) -> bool;

  fn get(&self, chunk_name: &str, module_id: &RuntimeId) -> Option<Rc<ModuleRecord>>;

  fn set(&self, chunk_name: &str, module_id: RuntimeId, record: Rc<ModuleRecord>);
}

/// The registry of one page, shared by every bundle loaded into it.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
  chunks: RefCell<FxHashMap<String, FxHashMap<RuntimeId, Rc<ModuleRecord>>>>,
}

impl InMemoryRegistry {
  pub fn module_count(&self, chunk_name: &str) -> usize {
    self.chunks.borrow().get(chunk_name).map_or(0, FxHashMap::len)
  }
}

impl SharedRegistry for InMemoryRegistry {
  fn has_chunk(&self, chunk_name: &str) -> bool {
    self.chunks.borrow().contains_key(chunk_name)
  }

  fn get(&self, chunk_name: &str, module_id: &RuntimeId) -> Option<Rc<ModuleRecord>> {
    self.chunks.borrow().get(chunk_name)?.get(module_id).map(Rc::clone)
  }

  fn set(&self, chunk_name: &str, module_id: RuntimeId, record: Rc<ModuleRecord>) {
    self.chunks.borrow_mut().entry(chunk_name.to_string()).or_default().insert(module_id, record);
  }
}

#[test]
fn test_get_returns_the_stored_record() {
  let registry = InMemoryRegistry::default();
  let id = RuntimeId::from("./node_modules/lodash/lodash.js");
  let record = Rc::new(ModuleRecord { id: id.clone(), exports: serde_json::json!({ "map": 1 }) });

  assert!(!registry.has_chunk("lodash-4.17"));
  registry.set("lodash-4.17", id.clone(), Rc::clone(&record));
  assert!(registry.has_chunk("lodash-4.17"));
  assert_eq!(registry.module_count("lodash-4.17"), 1);
  assert!(Rc::ptr_eq(&registry.get("lodash-4.17", &id).unwrap(), &record));
  assert!(registry.get("lodash-4.16", &id).is_none());
}
