use sharelib_common::{OutputOptions, SourceJoiner, js_string_literal};
use sharelib_ecmascript::{EcmaCompiler, collect_function_statements};
use sharelib_error::{BuildError, BuildResult};
use string_wizard::MagicString;

use crate::{GlobalRegistry, SharedChunkInfo};

const HOOK: &str = "render_bootstrap";

/// Patches the readiness gate of the bootstrap code.
///
/// The first `if` of the gate (the pending dependency check) also starts loading
/// every shared chunk the registry does not have yet. The last `if` (the one that
/// runs the entry module) skips deferred entries whose entry is the `null` sentinel.
pub fn patch_bootstrap(
  source: &str,
  output: &OutputOptions,
  registry: GlobalRegistry,
  shared: &[SharedChunkInfo],
) -> BuildResult<String> {
  let gate = &output.check_deferred_modules_fn_name;
  let ast = EcmaCompiler::parse_function_body(source)?;
  let spans = collect_function_statements(ast.program(), gate)
    .ok_or_else(|| BuildError::malformed_runtime(HOOK, format!("missing function `{gate}`")))?;

  let (Some(pending_check), Some(run_check)) = (spans.first_if(), spans.last_if()) else {
    return Err(BuildError::malformed_runtime(HOOK, format!("`{gate}` has no `if` statement")));
  };
  if run_check.statement.start < pending_check.statement.end {
    return Err(BuildError::malformed_runtime(
      HOOK,
      format!("`{gate}` needs separate dependency and entry checks"),
    ));
  }

  let pending_test =
    &source[pending_check.test.start as usize..pending_check.test.end as usize];

  let mut joiner = SourceJoiner::default();
  joiner.append_source(format!("if({pending_test}) {{"));
  joiner.append_source("  fulfilled = false;");
  for info in shared {
    let name = js_string_literal(&info.name);
    joiner.append_source(format!(
      "  if({{{}: true}}[depId] === true && !({})) {{",
      info.id.to_js_key(),
      registry.has_chunk(&name)
    ));
    joiner.append_source(format!("    {}.e({});", output.require_fn_name, info.id.to_js_literal()));
    joiner.append_source("  }");
  }
  joiner.append_source("}");

  let mut magic_string = MagicString::new(source);
  magic_string.update(
    pending_check.statement.start as usize,
    pending_check.statement.end as usize,
    joiner.join(),
  );
  magic_string.prepend_left(run_check.test.start as usize, "(");
  magic_string.append_left(
    run_check.test.end as usize,
    ") && deferredModule.length && deferredModule[0] != null",
  );

  tracing::debug!(shared_chunks = shared.len(), "patched readiness gate");
  Ok(magic_string.to_string())
}

#[cfg(test)]
mod tests {
  use sharelib_common::{RuntimeId, runtime_template};

  use super::*;

  fn shared() -> Vec<SharedChunkInfo> {
    vec![
      SharedChunkInfo {
        id: RuntimeId::from("lodash-4.17"),
        name: arcstr::literal!("lodash-4.17"),
        module_ids: vec![],
      },
      SharedChunkInfo { id: RuntimeId::from(7), name: arcstr::literal!("rxjs-6.5"), module_ids: vec![] },
    ]
  }

  #[test]
  fn patches_default_bootstrap() {
    let output = OutputOptions::default();
    let source = runtime_template::bootstrap(&output, &RuntimeId::from("runtime"));
    let registry = GlobalRegistry::new("window", "__sharedLibs__");
    let patched = patch_bootstrap(&source, &output, registry, &shared()).unwrap();

    assert!(patched.contains("if(installedChunks[depId] !== 0) {\n  fulfilled = false;\n"));
    assert!(patched.contains(
      "if({\"lodash-4.17\": true}[depId] === true && !(window[\"__sharedLibs__\"] && window[\"__sharedLibs__\"][\"lodash-4.17\"])) {"
    ));
    assert!(patched.contains("__webpack_require__.e(\"lodash-4.17\");"));
    assert!(patched.contains("if({\"7\": true}[depId] === true"));
    assert!(patched.contains("__webpack_require__.e(7);"));
    assert!(patched.contains(
      "if((fulfilled) && deferredModule.length && deferredModule[0] != null) {"
    ));
    assert!(!patched.contains("if(installedChunks[depId] !== 0) fulfilled = false;"));
    assert!(EcmaCompiler::parse(patched.as_str()).is_ok());
  }

  #[test]
  fn requires_the_readiness_gate() {
    let output = OutputOptions::default();
    let registry = GlobalRegistry::new("window", "__sharedLibs__");

    let error = patch_bootstrap("function other() {}", &output, registry, &shared()).unwrap_err();
    assert!(error.to_string().contains("missing function `checkDeferredModules`"));

    let error =
      patch_bootstrap("function checkDeferredModules() { if (a) { b(); } }", &output, registry, &[])
        .unwrap_err();
    assert!(error.to_string().contains("separate dependency and entry checks"));
  }
}
