//! Deploy file set - content-addressed files for a Deno Deploy push

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::GitSha1;

/// One file of a Deploy push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: String,
    pub size: u64,
    pub bytes: Vec<u8>,
    pub git_sha1: GitSha1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestEntryKind {
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub kind: ManifestEntryKind,
    pub size: u64,
    #[serde(rename = "gitSha1")]
    pub git_sha1: String,
}

/// Logical path → `{ kind, size, gitSha1 }`, as negotiated with the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetManifest {
    pub entries: IndexMap<String, ManifestEntry>,
}

/// All files of one Deploy push, keyed by logical path
#[derive(Debug, Clone, Default)]
pub struct DeployFiles {
    files: IndexMap<String, FileEntry>,
}

impl DeployFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the file at `path`
    pub fn add(&mut self, path: impl Into<String>, bytes: Vec<u8>) -> &FileEntry {
        let path = path.into();
        let entry = FileEntry {
            path: path.clone(),
            size: bytes.len() as u64,
            git_sha1: GitSha1::of(&bytes),
            bytes,
        };
        self.files.insert(path.clone(), entry);
        &self.files[&path]
    }

    pub fn get(&self, path: &str) -> Option<&FileEntry> {
        self.files.get(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileEntry> {
        self.files.values()
    }

    pub fn manifest(&self) -> AssetManifest {
        AssetManifest {
            entries: self
                .files
                .iter()
                .map(|(path, file)| {
                    (
                        path.clone(),
                        ManifestEntry {
                            kind: ManifestEntryKind::File,
                            size: file.size,
                            git_sha1: file.git_sha1.to_string(),
                        },
                    )
                })
                .collect(),
        }
    }
}
