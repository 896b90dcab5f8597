use serde::Deserialize;

/// The loader callback name every host uses unless told otherwise.
pub const DEFAULT_JSONP_FUNCTION: &str = "webpackJsonp";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputOptions {
  /// Expression for the global scope in the target environment.
  pub global_object: String,
  /// Global array the chunk payloads are pushed to.
  pub jsonp_function: String,
  pub require_fn_name: String,
  /// Name of the readiness gate in the bootstrap code.
  pub check_deferred_modules_fn_name: String,
  pub chunk_filename: String,
  pub public_path: String,
}

impl Default for OutputOptions {
  fn default() -> Self {
    Self {
      global_object: "window".to_string(),
      jsonp_function: DEFAULT_JSONP_FUNCTION.to_string(),
      require_fn_name: "__webpack_require__".to_string(),
      check_deferred_modules_fn_name: "checkDeferredModules".to_string(),
      chunk_filename: "[name].js".to_string(),
      public_path: String::new(),
    }
  }
}

impl OutputOptions {
  pub fn filename_for(&self, chunk_name: &str) -> String {
    self.chunk_filename.replace("[name]", chunk_name)
  }
}

#[test]
fn test_partial_output_options() {
  let options: OutputOptions =
    serde_json::from_str(r#"{"globalObject":"self","unknown":1}"#).unwrap();
  assert_eq!(options.global_object, "self");
  assert_eq!(options.jsonp_function, DEFAULT_JSONP_FUNCTION);
  assert_eq!(options.filename_for("lodash-4.17"), "lodash-4.17.js");
}
