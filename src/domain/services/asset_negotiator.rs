//! Deploy asset negotiation helpers
//!
//! The server answers a manifest with the git-sha1 hashes it lacks; only
//! those bodies are uploaded.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::domain::entities::DeployFiles;

/// Bodies of the files whose hash the server asked for
///
/// Two paths with identical content share a hash; the body is sent once.
pub fn select_missing(files: &DeployFiles, missing: &[String]) -> Vec<Vec<u8>> {
    let missing: HashSet<&str> = missing.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    files
        .iter()
        .filter(|file| missing.contains(file.git_sha1.as_str()))
        .filter(|file| seen.insert(file.git_sha1.as_str()))
        .map(|file| file.bytes.clone())
        .collect()
}

/// Whether the project's variable names differ from the desired ones
pub fn environment_differs(current: &[String], desired: &IndexMap<String, String>) -> bool {
    let current: HashSet<&str> = current.iter().map(String::as_str).collect();
    let desired: HashSet<&str> = desired.keys().map(String::as_str).collect();
    current != desired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::GitSha1;

    #[test]
    fn uploads_only_missing_bodies() {
        let mut files = DeployFiles::new();
        for (path, body) in [("a", "1"), ("b", "2"), ("c", "3"), ("d", "4"), ("e", "5")] {
            files.add(path, body.as_bytes().to_vec());
        }
        let missing = vec![
            GitSha1::of(b"2").to_string(),
            GitSha1::of(b"5").to_string(),
        ];
        let bodies = select_missing(&files, &missing);
        assert_eq!(bodies, vec![b"2".to_vec(), b"5".to_vec()]);
    }

    #[test]
    fn duplicate_content_is_sent_once() {
        let mut files = DeployFiles::new();
        files.add("a", b"same".to_vec());
        files.add("b", b"same".to_vec());
        let bodies = select_missing(&files, &[GitSha1::of(b"same").to_string()]);
        assert_eq!(bodies.len(), 1);
    }

    #[test]
    fn environment_compares_name_sets() {
        let mut desired = IndexMap::new();
        desired.insert("A".to_string(), "1".to_string());
        desired.insert("B".to_string(), "2".to_string());
        assert!(!environment_differs(
            &["B".to_string(), "A".to_string()],
            &desired
        ));
        assert!(environment_differs(&["A".to_string()], &desired));
        assert!(environment_differs(&[], &desired));
        assert!(!environment_differs(&[], &IndexMap::new()));
    }
}
