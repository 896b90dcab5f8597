//! `camel_case` follows lodash's `_.camelCase`, which is what package names were
//! historically turned into when used as chunk names.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
  Upper,
  Lower,
  Digit,
}

fn classify(c: char) -> Option<CharClass> {
  if c.is_ascii_digit() {
    Some(CharClass::Digit)
  } else if c.is_uppercase() {
    Some(CharClass::Upper)
  } else if c.is_alphabetic() {
    Some(CharClass::Lower)
  } else {
    None
  }
}

/// Splits on punctuation, on lower-to-upper transitions, around digit runs and
/// before the last capital of an acronym (`XMLHttp` -> `XML`, `Http`).
pub fn split_words(input: &str) -> Vec<&str> {
  let mut words = Vec::new();
  let mut start: Option<usize> = None;
  let mut prev: Option<(usize, CharClass)> = None;
  let mut prev_prev: Option<CharClass> = None;

  for (pos, c) in input.char_indices() {
    let Some(class) = classify(c) else {
      if let Some(word_start) = start.take() {
        words.push(&input[word_start..pos]);
      }
      prev = None;
      prev_prev = None;
      continue;
    };

    match (start, prev) {
      (Some(word_start), Some((prev_pos, prev_class))) => {
        let split_at = match (prev_class, class) {
          (CharClass::Digit, CharClass::Digit) => None,
          (CharClass::Digit, _) | (_, CharClass::Digit) | (CharClass::Lower, CharClass::Upper) => {
            Some(pos)
          }
          (CharClass::Upper, CharClass::Lower) if prev_prev == Some(CharClass::Upper) => {
            Some(prev_pos)
          }
          _ => None,
        };
        if let Some(split_at) = split_at {
          words.push(&input[word_start..split_at]);
          start = Some(split_at);
        }
      }
      _ => start = Some(pos),
    }

    prev_prev = prev.map(|(_, class)| class);
    prev = Some((pos, class));
  }

  if let Some(word_start) = start {
    words.push(&input[word_start..]);
  }

  words
}

pub fn camel_case(input: &str) -> String {
  let mut result = String::with_capacity(input.len());
  for (idx, word) in split_words(input).into_iter().enumerate() {
    let lower = word.to_lowercase();
    if idx == 0 {
      result.push_str(&lower);
      continue;
    }
    let mut chars = lower.chars();
    if let Some(first) = chars.next() {
      result.extend(first.to_uppercase());
      result.push_str(chars.as_str());
    }
  }
  result
}

#[test]
fn test_camel_case_package_names() {
  assert_eq!(camel_case("lodash"), "lodash");
  assert_eq!(camel_case("@angular/core"), "angularCore");
  assert_eq!(camel_case("@tinkoff/angular-ui"), "tinkoffAngularUi");
  assert_eq!(camel_case("rxjs/operators"), "rxjsOperators");
  assert_eq!(camel_case("lodash.debounce"), "lodashDebounce");
  assert_eq!(camel_case("@angular/platform-browser"), "angularPlatformBrowser");
}

#[test]
fn test_camel_case_word_boundaries() {
  assert_eq!(camel_case("__FOO_BAR__"), "fooBar");
  assert_eq!(camel_case("XMLHttpRequest"), "xmlHttpRequest");
  assert_eq!(camel_case("fooBar"), "fooBar");
  assert_eq!(camel_case("foo2bar"), "foo2Bar");
  assert_eq!(camel_case("es2015"), "es2015");
  assert_eq!(camel_case(""), "");
  assert_eq!(split_words("aBCd"), vec!["a", "B", "Cd"]);
}
