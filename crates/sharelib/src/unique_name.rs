use rustc_hash::FxHashSet;
use sharelib_utils::xxhash::xxhash_hex;

const MIN_LEN: usize = 4;

/// Short ids derived from a content hash, unique within one build session.
///
/// The shortest unused prefix of the hash is issued, starting at four characters.
/// When every prefix of a hash is taken, the hash is extended with a hash of itself.
#[derive(Debug, Default)]
pub struct UniqueNameGenerator {
  issued: FxHashSet<String>,
}

impl UniqueNameGenerator {
  pub fn unique_id(&mut self, input: &str) -> String {
    let mut hash = xxhash_hex(input.as_bytes());
    let mut len = MIN_LEN;
    loop {
      if len > hash.len() {
        let extension = xxhash_hex(hash.as_bytes());
        hash.push_str(&extension);
      }
      let candidate = &hash[..len];
      if !self.issued.contains(candidate) {
        let candidate = candidate.to_string();
        self.issued.insert(candidate.clone());
        return candidate;
      }
      len += 1;
    }
  }

  pub fn issued(&self) -> usize {
    self.issued.len()
  }

  /// Forgets every issued id. Called when a new build starts.
  pub fn reset(&mut self) {
    self.issued.clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn same_input_yields_distinct_ids() {
    let mut generator = UniqueNameGenerator::default();
    let first = generator.unique_id("lodash");
    let second = generator.unique_id("lodash");
    let third = generator.unique_id("rxjs");

    assert_eq!(first.len(), 4);
    assert_eq!(second.len(), 5);
    assert!(second.starts_with(&first));
    assert_ne!(third, first);
    assert_ne!(third, second);
  }

  #[test]
  fn never_repeats_within_a_session() {
    let mut generator = UniqueNameGenerator::default();
    let ids = (0..40).map(|_| generator.unique_id("same")).collect::<FxHashSet<_>>();
    assert_eq!(ids.len(), 40);
    assert_eq!(generator.issued(), 40);
  }

  #[test]
  fn reset_starts_a_new_session() {
    let mut generator = UniqueNameGenerator::default();
    let first = generator.unique_id("lodash");
    generator.reset();
    assert_eq!(generator.unique_id("lodash"), first);
  }
}
