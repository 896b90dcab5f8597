use sharelib_common::js_string_literal;

/// Renders accesses to the registry shared by every bundle loaded into one page:
/// `globalObject[namespace][chunkName][moduleId] = module`.
///
/// Every argument is a JavaScript expression, so callers pass either a quoted
/// literal or the name of a local variable.
#[derive(Debug, Clone, Copy)]
pub struct GlobalRegistry<'a> {
  global_object: &'a str,
  namespace: &'a str,
}

impl<'a> GlobalRegistry<'a> {
  pub fn new(global_object: &'a str, namespace: &'a str) -> Self {
    Self { global_object, namespace }
  }

  fn root(&self) -> String {
    format!("{}[{}]", self.global_object, js_string_literal(self.namespace))
  }

  fn chunk(&self, chunk_name: &str) -> String {
    format!("{}[{chunk_name}]", self.root())
  }

  /// Truthy once any bundle has published a module of the chunk.
  pub fn has_chunk(&self, chunk_name: &str) -> String {
    format!("{} && {}", self.root(), self.chunk(chunk_name))
  }

  pub fn has(&self, chunk_name: &str, module_id: &str) -> String {
    let chunk = self.chunk(chunk_name);
    format!("{} && {chunk} && {chunk}[{module_id}]", self.root())
  }

  pub fn get(&self, chunk_name: &str, module_id: &str) -> String {
    format!("{}[{module_id}]", self.chunk(chunk_name))
  }

  /// Statements creating the namespace and chunk objects on demand, then storing
  /// `record`.
  pub fn set(&self, chunk_name: &str, module_id: &str, record: &str) -> String {
    let root = self.root();
    let chunk = self.chunk(chunk_name);
    format!("{root} = {root} || {{}};\n{chunk} = {chunk} || {{}};\n{chunk}[{module_id}] = {record};")
  }
}

#[test]
fn test_registry_expressions() {
  let registry = GlobalRegistry::new("window", "__sharedLibs__");
  let name = js_string_literal("lodash-4.17");
  assert_eq!(
    registry.has_chunk("name"),
    r#"window["__sharedLibs__"] && window["__sharedLibs__"][name]"#
  );
  assert_eq!(
    registry.get(&name, "moduleId"),
    r#"window["__sharedLibs__"]["lodash-4.17"][moduleId]"#
  );
  assert_eq!(
    registry.set(&name, "moduleId", "module"),
    "window[\"__sharedLibs__\"] = window[\"__sharedLibs__\"] || {};\n\
     window[\"__sharedLibs__\"][\"lodash-4.17\"] = window[\"__sharedLibs__\"][\"lodash-4.17\"] || {};\n\
     window[\"__sharedLibs__\"][\"lodash-4.17\"][moduleId] = module;"
  );
}
