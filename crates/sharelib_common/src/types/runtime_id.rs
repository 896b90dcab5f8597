use std::fmt::Display;

use arcstr::ArcStr;
use serde::{Deserialize, Serialize};

/// Identifier of a module or chunk as it appears in generated code.
///
/// Hosts use numbers in production builds and names in development builds, both
/// forms must survive the round-trip into JavaScript unchanged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuntimeId {
  Number(u32),
  Name(ArcStr),
}

impl RuntimeId {
  /// Renders the id as a JavaScript literal, e.g. `0` or `"./src/index.js"`.
  pub fn to_js_literal(&self) -> String {
    match self {
      Self::Number(value) => value.to_string(),
      Self::Name(value) => js_string_literal(value),
    }
  }

  /// Renders the id as an object key, which is always a string in JavaScript.
  pub fn to_js_key(&self) -> String {
    match self {
      Self::Number(value) => js_string_literal(&value.to_string()),
      Self::Name(value) => js_string_literal(value),
    }
  }
}

pub fn js_string_literal(value: &str) -> String {
  serde_json::to_string(value).expect("serializing a str should never fail")
}

/// Renders a JavaScript array literal of ids.
pub fn js_array_literal<'a>(ids: impl IntoIterator<Item = &'a RuntimeId>) -> String {
  let items = ids.into_iter().map(RuntimeId::to_js_literal).collect::<Vec<_>>();
  format!("[{}]", items.join(", "))
}

impl Display for RuntimeId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Number(value) => value.fmt(f),
      Self::Name(value) => value.fmt(f),
    }
  }
}

impl From<u32> for RuntimeId {
  fn from(value: u32) -> Self {
    Self::Number(value)
  }
}

impl From<&str> for RuntimeId {
  fn from(value: &str) -> Self {
    Self::Name(value.into())
  }
}

impl From<ArcStr> for RuntimeId {
  fn from(value: ArcStr) -> Self {
    Self::Name(value)
  }
}

#[test]
fn test_js_literal() {
  assert_eq!(RuntimeId::from(3).to_js_literal(), "3");
  assert_eq!(RuntimeId::from(3).to_js_key(), "\"3\"");
  assert_eq!(RuntimeId::from("./src/a\"b.js").to_js_literal(), r#""./src/a\"b.js""#);
  assert_eq!(js_array_literal(&[RuntimeId::from(1), RuntimeId::from("x")]), r#"[1, "x"]"#);
}

#[test]
fn test_deserialize_untagged() {
  let ids: Vec<RuntimeId> = serde_json::from_str(r#"[1, "lodash-4.17"]"#).unwrap();
  assert_eq!(ids, vec![RuntimeId::from(1), RuntimeId::from("lodash-4.17")]);
}
