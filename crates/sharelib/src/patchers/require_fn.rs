use rustc_hash::FxHashMap;
use sharelib_common::{OutputOptions, SourceJoiner, js_array_literal, js_string_literal};
use sharelib_ecmascript::{EcmaCompiler, collect_function_statements, collect_program_statements};
use sharelib_error::{BuildError, BuildResult};
use string_wizard::MagicString;

use crate::{GlobalRegistry, SharedChunkInfo};

/// Teaches the require function to exchange shared modules through the registry.
///
/// Before the module cache check, a module another bundle already published is
/// adopted into the local cache. Before the final `return`, a freshly executed
/// shared module is published. Results are memoized on the source text.
#[derive(Debug, Default)]
pub struct RequireFnPatcher {
  cache: FxHashMap<String, String>,
}

impl RequireFnPatcher {
  pub fn patch(
    &mut self,
    source: String,
    output: &OutputOptions,
    registry: GlobalRegistry,
    shared: &[SharedChunkInfo],
  ) -> BuildResult<String> {
    if let Some(patched) = self.cache.get(&source) {
      tracing::trace!("require function patch cache hit");
      return Ok(patched.clone());
    }

    let patched = patch_require_fn(&source, output, registry, shared)?;
    tracing::debug!(shared_chunks = shared.len(), "patched require function");
    self.cache.insert(source, patched.clone());
    Ok(patched)
  }

  pub fn clear(&mut self) {
    self.cache.clear();
  }
}

fn patch_require_fn(
  source: &str,
  output: &OutputOptions,
  registry: GlobalRegistry,
  shared: &[SharedChunkInfo],
) -> BuildResult<String> {
  let ast = EcmaCompiler::parse_function_body(source)?;
  let spans = collect_function_statements(ast.program(), &output.require_fn_name)
    .unwrap_or_else(|| collect_program_statements(ast.program()));

  let cache_check = spans
    .first_if()
    .ok_or_else(|| BuildError::malformed_runtime("render_require", "missing module cache check"))?;
  let result_return = spans
    .last_return()
    .ok_or_else(|| BuildError::malformed_runtime("render_require", "missing `return` of exports"))?;

  let mut magic_string = MagicString::new(source);
  magic_string.prepend_left(cache_check.statement.start as usize, adopt_from_registry(registry, shared));
  magic_string.prepend_left(result_return.start as usize, publish_to_registry(registry, shared));
  Ok(magic_string.to_string())
}

fn adopt_from_registry(registry: GlobalRegistry, shared: &[SharedChunkInfo]) -> String {
  let mut joiner = SourceJoiner::default();
  for info in shared {
    let name = js_string_literal(&info.name);
    joiner.append_source(format!(
      "if({}.indexOf(moduleId) > -1 && {}) {{",
      js_array_literal(&info.module_ids),
      registry.has(&name, "moduleId")
    ));
    joiner.append_source(format!("  installedModules[moduleId] = {};", registry.get(&name, "moduleId")));
    joiner.append_source("}");
  }
  joiner.append_source("");
  joiner.join()
}

fn publish_to_registry(registry: GlobalRegistry, shared: &[SharedChunkInfo]) -> String {
  let mut joiner = SourceJoiner::default();
  for info in shared {
    let name = js_string_literal(&info.name);
    joiner.append_source(format!(
      "if({}.indexOf(moduleId) > -1) {{",
      js_array_literal(&info.module_ids)
    ));
    joiner.append_source(registry.set(&name, "moduleId", "module"));
    joiner.append_source("}");
  }
  joiner.append_source("");
  joiner.join()
}

#[cfg(test)]
mod tests {
  use sharelib_common::{RuntimeId, runtime_template};

  use super::*;

  fn lodash() -> Vec<SharedChunkInfo> {
    vec![SharedChunkInfo {
      id: RuntimeId::from("lodash-4.17"),
      name: arcstr::literal!("lodash-4.17"),
      module_ids: vec![RuntimeId::from("./node_modules/lodash/lodash.js")],
    }]
  }

  #[test]
  fn adopts_before_cache_check_and_publishes_before_return() {
    let output = OutputOptions::default();
    let registry = GlobalRegistry::new("window", "__sharedLibs__");
    let mut patcher = RequireFnPatcher::default();
    let patched =
      patcher.patch(runtime_template::require_body(&output), &output, registry, &lodash()).unwrap();

    let adopt = patched.find("installedModules[moduleId] = window[\"__sharedLibs__\"]").unwrap();
    let cache_check = patched.find("if(installedModules[moduleId])").unwrap();
    let execute = patched.find("modules[moduleId].call").unwrap();
    let publish = patched.find("[\"lodash-4.17\"][moduleId] = module;").unwrap();
    let result = patched.rfind("return module.exports;").unwrap();
    assert!(adopt < cache_check);
    assert!(execute < publish && publish < result);
    assert!(patched.contains("[\"./node_modules/lodash/lodash.js\"].indexOf(moduleId) > -1"));

    assert!(EcmaCompiler::parse_function_body(patched.as_str()).is_ok());
  }

  #[test]
  fn patches_a_whole_declaration() {
    let output = OutputOptions::default();
    let source = format!(
      "function __webpack_require__(moduleId) {{\n{}\n}}",
      runtime_template::require_body(&output)
    );
    let registry = GlobalRegistry::new("self", "libs");
    let patched = RequireFnPatcher::default().patch(source, &output, registry, &lodash()).unwrap();
    assert!(patched.starts_with("function __webpack_require__(moduleId) {\n// Check if module is in cache\nif(["));
    assert!(patched.contains("self[\"libs\"] = self[\"libs\"] || {};"));
    assert!(EcmaCompiler::parse(patched.as_str()).is_ok());
  }

  #[test]
  fn memoizes_on_source_text() {
    let output = OutputOptions::default();
    let registry = GlobalRegistry::new("window", "__sharedLibs__");
    let mut patcher = RequireFnPatcher::default();
    let source = runtime_template::require_body(&output);
    let first = patcher.patch(source.clone(), &output, registry, &lodash()).unwrap();
    // A cache hit ignores the chunk list, it is fixed for one build.
    let second = patcher.patch(source, &output, registry, &[]).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn rejects_text_without_insertion_points() {
    let output = OutputOptions::default();
    let registry = GlobalRegistry::new("window", "__sharedLibs__");
    let mut patcher = RequireFnPatcher::default();
    let error = patcher.patch("return 1;".to_string(), &output, registry, &lodash()).unwrap_err();
    assert!(error.to_string().contains("missing module cache check"));
    assert!(patcher.patch("var = ;".to_string(), &output, registry, &lodash()).is_err());
  }
}
