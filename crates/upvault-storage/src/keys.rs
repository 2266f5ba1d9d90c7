//! Object key generation shared by the credential issuer and all backends.
//!
//! Key format: `{uuid}-{file name}` with path separators and `..` in the file
//! name replaced by `_`, so every key is a single opaque path segment.
//! Long names are shortened so the whole key fits in [`MAX_KEY_BYTES`].

use uuid::Uuid;

/// Longest key generated, in bytes. The local backend stores each key as one
/// file name, and file systems cap those at 255 bytes (S3 allows 1024).
pub const MAX_KEY_BYTES: usize = 255;

/// `{uuid}-`
const KEY_PREFIX_BYTES: usize = 37;

/// Extensions longer than this are not worth preserving when shortening.
const MAX_KEPT_EXTENSION_BYTES: usize = 16;

/// Generate a fresh, unguessable object key for an uploaded file.
pub fn generate_object_key(file_name: &str) -> String {
    let sanitized: String = file_name
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let name = shorten_name(&sanitized, MAX_KEY_BYTES - KEY_PREFIX_BYTES);
    format!("{}-{}", Uuid::new_v4(), name.replace("..", "_"))
}

/// Cut `name` to at most `budget` bytes on a char boundary, keeping a short
/// extension intact.
fn shorten_name(name: &str, budget: usize) -> String {
    if name.len() <= budget {
        return name.to_string();
    }
    let extension = name
        .rfind('.')
        .map(|i| &name[i..])
        .filter(|ext| ext.len() <= MAX_KEPT_EXTENSION_BYTES)
        .unwrap_or("");
    let stem = &name[..name.len() - extension.len()];
    let mut end = budget - extension.len();
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", &stem[..end], extension)
}

/// Reject keys that could escape the storage root or address a directory.
pub fn validate_key(storage_key: &str) -> bool {
    !storage_key.is_empty()
        && !storage_key.contains("..")
        && !storage_key.starts_with('/')
        && !storage_key.ends_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn key_keeps_file_name_after_uuid() {
        let key = generate_object_key("cat.png");
        let (prefix, name) = key.split_at(36);
        assert!(Uuid::parse_str(prefix).is_ok());
        assert_eq!(name, "-cat.png");
    }

    #[test]
    fn identical_names_never_share_a_key() {
        let keys: HashSet<String> = (0..1000).map(|_| generate_object_key("same.png")).collect();
        assert_eq!(keys.len(), 1000);
    }

    #[test]
    fn separators_are_flattened() {
        let key = generate_object_key("../etc/passwd");
        assert!(!key.contains('/'));
        assert!(key.ends_with("-__etc_passwd"));
        assert!(validate_key(&key));
    }

    #[test]
    fn long_names_are_shortened_to_fit() {
        let long = format!("{}.png", "a".repeat(1000));
        let key = generate_object_key(&long);
        assert_eq!(key.len(), MAX_KEY_BYTES);
        assert!(key.ends_with("aaa.png"));
        assert!(validate_key(&key));

        let accented = format!("{}.jpeg", "é".repeat(300));
        let key = generate_object_key(&accented);
        assert!(key.len() <= MAX_KEY_BYTES);
        assert!(key.ends_with("é.jpeg"));

        let exact = "b".repeat(MAX_KEY_BYTES - KEY_PREFIX_BYTES);
        assert!(generate_object_key(&exact).ends_with(&exact));
    }

    #[test]
    fn shortening_never_joins_dots() {
        let name = format!("{}png", "x.".repeat(200));
        let key = generate_object_key(&name);
        assert!(key.len() <= MAX_KEY_BYTES);
        assert!(validate_key(&key));
    }

    #[test]
    fn edge_whitespace_in_names_is_kept() {
        let key = generate_object_key("cat.png ");
        assert!(key.ends_with("-cat.png "));
        assert!(validate_key(&key));
    }

    #[test]
    fn validate_key_rejects_traversal() {
        assert!(validate_key("abc-cat.png"));
        assert!(!validate_key(""));
        assert!(!validate_key("/abs"));
        assert!(!validate_key("a/../b"));
        assert!(!validate_key("dir/"));
    }
}
