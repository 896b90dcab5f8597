//! Default bootstrap code of the runtime chunk, split the way hosts expose it to
//! plugins: the body of the require function and the bootstrap section are
//! rendered separately, handed to plugins, then assembled.

use crate::{OutputOptions, RuntimeId, types::runtime_id::js_string_literal};

const REQUIRE_BODY: &str = r"// Check if module is in cache
if(installedModules[moduleId]) {
  return installedModules[moduleId].exports;
}
// Create a new module (and put it into the cache)
var module = installedModules[moduleId] = {
  i: moduleId,
  l: false,
  exports: {}
};
// Execute the module function
modules[moduleId].call(module.exports, module, module.exports, {{require}});
// Flag the module as loaded
module.l = true;
// Return the exports of the module
return module.exports;";

const BOOTSTRAP: &str = r"// install a JSONP callback for chunk loading
function webpackJsonpCallback(data) {
  var chunkIds = data[0];
  var moreModules = data[1];
  var executeModules = data[2];
  var moduleId, chunkId, i = 0, resolves = [];
  for(;i < chunkIds.length; i++) {
    chunkId = chunkIds[i];
    if(Object.prototype.hasOwnProperty.call(installedChunks, chunkId) && installedChunks[chunkId]) {
      resolves.push(installedChunks[chunkId][0]);
    }
    installedChunks[chunkId] = 0;
  }
  for(moduleId in moreModules) {
    if(Object.prototype.hasOwnProperty.call(moreModules, moduleId)) {
      modules[moduleId] = moreModules[moduleId];
    }
  }
  if(parentJsonpFunction) parentJsonpFunction(data);
  while(resolves.length) {
    resolves.shift()();
  }
  // add entry modules from loaded chunk to deferred list
  deferredModules.push.apply(deferredModules, executeModules || []);
  // run deferred modules when all chunks ready
  return {{checkDeferredModules}}();
}
function {{checkDeferredModules}}() {
  var result;
  for(var i = 0; i < deferredModules.length; i++) {
    var deferredModule = deferredModules[i];
    var fulfilled = true;
    for(var j = 1; j < deferredModule.length; j++) {
      var depId = deferredModule[j];
      if(installedChunks[depId] !== 0) fulfilled = false;
    }
    if(fulfilled) {
      deferredModules.splice(i--, 1);
      result = {{require}}({{require}}.s = deferredModule[0]);
    }
  }
  return result;
}
// The module cache
var installedModules = {};
// undefined = chunk not loaded, Promise = chunk loading, 0 = chunk loaded
var installedChunks = {
  {{runtimeChunk}}: 0
};
var deferredModules = [];
// script path function
function jsonpScriptSrc(chunkId) {
  return {{require}}.p + {{filenamePrefix}} + chunkId + {{filenameSuffix}};
}";

const RUNTIME: &str = r"(function(modules) { // bootstrap
{{bootstrap}}
// The require function
function {{require}}(moduleId) {
{{requireBody}}
}
// The chunk loading function for additional chunks
{{require}}.e = function requireEnsure(chunkId) {
  var promises = [];
  var installedChunkData = installedChunks[chunkId];
  if(installedChunkData !== 0) { // 0 means already installed
    if(installedChunkData) {
      promises.push(installedChunkData[2]);
    } else {
      var promise = new Promise(function(resolve, reject) {
        installedChunkData = installedChunks[chunkId] = [resolve, reject];
      });
      promises.push(installedChunkData[2] = promise);
      var script = document.createElement('script');
      script.charset = 'utf-8';
      script.src = jsonpScriptSrc(chunkId);
      script.onerror = function() {
        var chunk = installedChunks[chunkId];
        if(chunk !== 0) {
          if(chunk) {
            chunk[1](new Error('Loading chunk ' + chunkId + ' failed.'));
          }
          installedChunks[chunkId] = undefined;
        }
      };
      document.head.appendChild(script);
    }
  }
  return Promise.all(promises);
};
// expose the modules object
{{require}}.m = modules;
// expose the module cache
{{require}}.c = installedModules;
// public path
{{require}}.p = {{publicPath}};
var jsonpArray = {{jsonpArray}} = {{jsonpArray}} || [];
var oldJsonpFunction = jsonpArray.push.bind(jsonpArray);
jsonpArray.push = webpackJsonpCallback;
jsonpArray = jsonpArray.slice();
for(var i = 0; i < jsonpArray.length; i++) webpackJsonpCallback(jsonpArray[i]);
var parentJsonpFunction = oldJsonpFunction;
// run deferred modules from other chunks
{{checkDeferredModules}}();
})([]);";

/// Body of the require function, without the surrounding declaration.
pub fn require_body(output: &OutputOptions) -> String {
  REQUIRE_BODY.replace("{{require}}", &output.require_fn_name)
}

/// Chunk loading callback, readiness gate and the runtime's bookkeeping state.
pub fn bootstrap(output: &OutputOptions, runtime_chunk: &RuntimeId) -> String {
  let (prefix, suffix) = output.chunk_filename.split_once("[name]").unwrap_or(("", ".js"));
  BOOTSTRAP
    .replace("{{checkDeferredModules}}", &output.check_deferred_modules_fn_name)
    .replace("{{require}}", &output.require_fn_name)
    .replace("{{runtimeChunk}}", &runtime_chunk.to_js_key())
    .replace("{{filenamePrefix}}", &js_string_literal(prefix))
    .replace("{{filenameSuffix}}", &js_string_literal(suffix))
}

/// Assembles the runtime chunk from the (possibly patched) sections.
pub fn assemble(output: &OutputOptions, bootstrap: &str, require_body: &str) -> String {
  let jsonp_array =
    format!("{}[{}]", output.global_object, js_string_literal(&output.jsonp_function));
  RUNTIME
    .replace("{{bootstrap}}", bootstrap)
    .replace("{{requireBody}}", require_body)
    .replace("{{checkDeferredModules}}", &output.check_deferred_modules_fn_name)
    .replace("{{require}}", &output.require_fn_name)
    .replace("{{publicPath}}", &js_string_literal(&output.public_path))
    .replace("{{jsonpArray}}", &jsonp_array)
}

#[test]
fn test_templates_use_output_names() {
  let output = OutputOptions {
    require_fn_name: "__req__".to_string(),
    jsonp_function: "jsonp_abc".to_string(),
    ..OutputOptions::default()
  };
  let body = require_body(&output);
  assert!(body.contains("module.exports, __req__);"));

  let bootstrap = bootstrap(&output, &RuntimeId::from("runtime"));
  assert!(bootstrap.contains("function checkDeferredModules() {"));
  assert!(bootstrap.contains("\"runtime\": 0"));
  assert!(bootstrap.contains("__req__.p + \"\" + chunkId + \".js\""));

  let runtime = assemble(&output, &bootstrap, &body);
  assert!(runtime.contains("function __req__(moduleId) {"));
  assert!(runtime.contains("var jsonpArray = window[\"jsonp_abc\"] = window[\"jsonp_abc\"] || [];"));
  assert!(!runtime.contains("{{"));
}
