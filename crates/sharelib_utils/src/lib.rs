pub mod camel_case;
pub mod indexmap;
pub mod path_ext;
pub mod xxhash;

/// Concatenates string-like values with a single allocation.
#[macro_export]
macro_rules! concat_string {
  () => { String::with_capacity(0) };
  ($($s:expr),+ $(,)?) => {{
    let mut len = 0;
    $(len += AsRef::<str>::as_ref(&$s).len();)+
    let mut buf = String::with_capacity(len);
    $(buf.push_str(AsRef::<str>::as_ref(&$s));)+
    buf
  }};
}

#[test]
fn test_concat_string() {
  let owned = String::from("lodash");
  assert_eq!(concat_string!(owned, "-", "4.17"), "lodash-4.17");
  assert_eq!(concat_string!(), "");
}
