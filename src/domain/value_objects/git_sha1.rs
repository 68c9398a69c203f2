//! Git blob SHA-1 value object
//!
//! Deno Deploy addresses uploaded files by the canonical git blob hash:
//! SHA-1 over `"blob " + decimal length + "\0" + content`.

use std::fmt;

use sha1::{Digest, Sha1};

/// Lowercase hex git blob hash
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GitSha1(String);

impl GitSha1 {
    /// Hash `content` with git blob framing
    pub fn of(content: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(format!("blob {}\0", content.len()).as_bytes());
        hasher.update(content);
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GitSha1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GitSha1 {
    fn from(s: &str) -> Self {
        Self(s.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_blob_matches_git() {
        // git hash-object -t blob /dev/null
        assert_eq!(
            GitSha1::of(b"").as_str(),
            "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391"
        );
    }

    #[test]
    fn hello_world_matches_git() {
        // printf 'hello world\n' | git hash-object --stdin
        assert_eq!(
            GitSha1::of(b"hello world\n").as_str(),
            "3b18e512dba79e4c8300dd08aeb37f8e728b8dad"
        );
    }

    #[test]
    fn from_str_normalizes_case() {
        let hash: GitSha1 = "E69DE29BB2D1D6434B8B29AE775AD8C2E48C5391".into();
        assert_eq!(hash, GitSha1::of(b""));
    }

    proptest! {
        #[test]
        fn always_forty_lowercase_hex(content in proptest::collection::vec(any::<u8>(), 0..256)) {
            let hash = GitSha1::of(&content);
            prop_assert_eq!(hash.as_str().len(), 40);
            prop_assert!(hash.as_str().chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }
}
