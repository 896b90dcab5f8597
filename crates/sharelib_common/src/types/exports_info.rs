use sharelib_utils::indexmap::FxIndexSet;

/// Which exports of a module downstream code is known to use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UsedExports {
  /// Usage has not been determined.
  #[default]
  Unknown,
  /// Every export must be kept.
  All,
  Names(FxIndexSet<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProvidedExports {
  #[default]
  Unknown,
  All,
  Names(Vec<String>),
}

/// Usage facts consumed by dead-code elimination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportsInfo {
  pub used: bool,
  pub used_exports: UsedExports,
  pub provided_exports: ProvidedExports,
}

impl ExportsInfo {
  /// Keeps the module and all of its exports regardless of static usage.
  pub fn mark_fully_used(&mut self, extra_used_exports: Option<&[String]>) {
    self.used = true;
    match (&mut self.used_exports, extra_used_exports) {
      (UsedExports::Names(names), Some(extra)) => names.extend(extra.iter().cloned()),
      (used_exports, _) => *used_exports = UsedExports::All,
    }
    self.provided_exports = ProvidedExports::All;
  }
}

#[test]
fn test_mark_fully_used() {
  let mut info = ExportsInfo::default();
  info.mark_fully_used(None);
  assert!(info.used);
  assert_eq!(info.used_exports, UsedExports::All);
  assert_eq!(info.provided_exports, ProvidedExports::All);

  let mut info = ExportsInfo {
    used_exports: UsedExports::Names(std::iter::once("map".to_string()).collect()),
    ..ExportsInfo::default()
  };
  info.mark_fully_used(Some(&["filter".to_string()]));
  let UsedExports::Names(names) = &info.used_exports else { panic!("expected names") };
  assert_eq!(names.iter().collect::<Vec<_>>(), vec!["map", "filter"]);

  let mut info = ExportsInfo {
    used_exports: UsedExports::Names(FxIndexSet::default()),
    ..ExportsInfo::default()
  };
  info.mark_fully_used(None);
  assert_eq!(info.used_exports, UsedExports::All);
}
