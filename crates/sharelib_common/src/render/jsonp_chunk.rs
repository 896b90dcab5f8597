use arcstr::ArcStr;

use crate::{
  OutputOptions, RuntimeId, SourceJoiner,
  types::runtime_id::{js_array_literal, js_string_literal},
};

/// A chunk as pushed onto the global jsonp array:
/// `push([chunkIds, moreModules, deferredModules])`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonpChunkPayload {
  pub chunk_ids: Vec<RuntimeId>,
  /// Module id and the body of its factory function, in emit order.
  pub modules: Vec<(RuntimeId, String)>,
  /// Entry modules this chunk asks the runtime to execute. `None` when it has none.
  pub deferred_modules: Option<Vec<DeferredModule>>,
}

/// One element of the deferred list: `[entryModuleId, ...chunk ids it waits for]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeferredModule {
  /// `None` renders the `null` sentinel: the chunk has no entry module to run.
  pub entry: Option<RuntimeId>,
  pub chunk_deps: Vec<RuntimeId>,
  /// Dependencies that are only waited for when the shared registry lacks them.
  pub shared_guards: Vec<SharedChunkGuard>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedChunkGuard {
  pub chunk_id: RuntimeId,
  pub chunk_name: ArcStr,
  /// Condition in terms of the local `name` that holds when the registry has the chunk.
  pub registry_check: String,
}

impl SharedChunkGuard {
  fn render(&self) -> String {
    let mut joiner = SourceJoiner::default();
    joiner.append_source("(function(id, name) {");
    joiner.append_source(format!("  if ({}) {{", self.registry_check));
    joiner.append_source("    return null;");
    joiner.append_source("  }");
    joiner.append_source("  return id;");
    joiner.append_source(format!(
      "}})({}, {})",
      self.chunk_id.to_js_literal(),
      js_string_literal(&self.chunk_name)
    ));
    joiner.join()
  }
}

impl DeferredModule {
  pub fn render(&self) -> String {
    let entry = self.entry.as_ref().map_or_else(|| "null".to_string(), RuntimeId::to_js_literal);
    let mut head = vec![entry];
    head.extend(self.chunk_deps.iter().map(RuntimeId::to_js_literal));
    let head = format!("[{}]", head.join(", "));

    if self.shared_guards.is_empty() {
      return head;
    }

    let guards = self.shared_guards.iter().map(SharedChunkGuard::render).collect::<Vec<_>>();
    format!(
      "{head}.concat([{}].filter(function(entryName) {{\n  return entryName != null;\n}}))",
      guards.join(", ")
    )
  }
}

impl JsonpChunkPayload {
  pub fn render(&self, output: &OutputOptions) -> String {
    let jsonp_array =
      format!("{}[{}]", output.global_object, js_string_literal(&output.jsonp_function));

    let mut joiner = SourceJoiner::default();
    joiner.append_source(format!(
      "({jsonp_array} = {jsonp_array} || []).push([{}, {{",
      js_array_literal(&self.chunk_ids)
    ));
    for (id, source) in &self.modules {
      joiner.append_source(format!(
        "{}: (function(module, exports, {}) {{",
        id.to_js_key(),
        output.require_fn_name
      ));
      joiner.append_source(source.as_str());
      joiner.append_source("}),");
    }

    match &self.deferred_modules {
      Some(deferred) => {
        let deferred = deferred.iter().map(DeferredModule::render).collect::<Vec<_>>();
        joiner.append_source(format!("}}, [{}]]);", deferred.join(", ")));
      }
      None => joiner.append_source("}]);"),
    }

    joiner.join()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_plain_payload() {
    let payload = JsonpChunkPayload {
      chunk_ids: vec![RuntimeId::from("lodash-4.17")],
      modules: vec![(RuntimeId::from(1), "module.exports = 1;".to_string())],
      deferred_modules: None,
    };
    assert_eq!(
      payload.render(&OutputOptions::default()),
      "(window[\"webpackJsonp\"] = window[\"webpackJsonp\"] || []).push([[\"lodash-4.17\"], {\n\
       \"1\": (function(module, exports, __webpack_require__) {\n\
       module.exports = 1;\n\
       }),\n\
       }]);"
    );
  }

  #[test]
  fn renders_sentinel_and_guards() {
    let deferred = DeferredModule {
      entry: None,
      chunk_deps: vec![RuntimeId::from("runtime")],
      shared_guards: vec![SharedChunkGuard {
        chunk_id: RuntimeId::from("lodash-4.17"),
        chunk_name: arcstr::literal!("lodash-4.17"),
        registry_check: "registry[name]".to_string(),
      }],
    };
    let rendered = deferred.render();
    assert!(rendered.starts_with("[null, \"runtime\"].concat([(function(id, name) {"));
    assert!(rendered.contains("if (registry[name]) {"));
    assert!(rendered.contains("})(\"lodash-4.17\", \"lodash-4.17\")].filter("));
    assert!(rendered.ends_with("return entryName != null;\n}))"));
  }
}
