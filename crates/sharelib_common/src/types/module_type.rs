use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub enum ModuleType {
  #[default]
  #[serde(rename = "javascript/auto")]
  JavascriptAuto,
  #[serde(rename = "javascript/esm")]
  JavascriptEsm,
  #[serde(rename = "javascript/dynamic")]
  JavascriptDynamic,
  #[serde(rename = "json")]
  Json,
  #[serde(rename = "asset")]
  Asset,
  #[serde(untagged)]
  Custom(String),
}

impl ModuleType {
  pub fn is_javascript(&self) -> bool {
    match self {
      Self::JavascriptAuto | Self::JavascriptEsm | Self::JavascriptDynamic => true,
      Self::Custom(name) => name.starts_with("javascript/"),
      Self::Json | Self::Asset => false,
    }
  }
}

#[test]
fn test_module_type_from_json() {
  let types: Vec<ModuleType> =
    serde_json::from_str(r#"["javascript/esm", "json", "css/mini-extract"]"#).unwrap();
  assert_eq!(
    types,
    vec![ModuleType::JavascriptEsm, ModuleType::Json, ModuleType::Custom("css/mini-extract".into())]
  );
  assert!(types[0].is_javascript());
  assert!(!types[2].is_javascript());
}
