use xxhash_rust::xxh3::xxh3_128;

/// Lowercase hex digest, always 32 characters long.
pub fn xxhash_hex(input: &[u8]) -> String {
  format!("{:032x}", xxh3_128(input))
}

#[test]
fn test_xxhash_hex() {
  let hash = xxhash_hex(b"hello");
  assert_eq!(hash.len(), 32);
  assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
  assert_eq!(hash, xxhash_hex(b"hello"));
  assert_ne!(hash, xxhash_hex(b"hello!"));
}
