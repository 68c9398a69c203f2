//! Source reader for local paths and https urls

use std::fs;

use reqwest::blocking::Client;
use tracing::debug;

use crate::domain::ports::SourceReader;
use crate::error::{EdgeError, EdgeResult};

pub struct DefaultSourceReader {
    http: Client,
}

impl DefaultSourceReader {
    pub fn new() -> EdgeResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("edgepush/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }
}

impl SourceReader for DefaultSourceReader {
    fn read_bytes(&self, specifier: &str) -> EdgeResult<Vec<u8>> {
        if !specifier.starts_with("https://") {
            return Ok(fs::read(specifier)?);
        }
        debug!(url = specifier, "fetching source");
        let response = self.http.get(specifier).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(EdgeError::RemoteCallFailed {
                method: "GET".to_string(),
                url: specifier.to_string(),
                status: Some(status.as_u16()),
                body: response.text().unwrap_or_default(),
            });
        }
        Ok(response.bytes()?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_local_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("m.wasm");
        fs::write(&path, [0u8, 97, 115, 109]).unwrap();
        let reader = DefaultSourceReader::new().unwrap();
        let bytes = reader.read_bytes(path.to_str().unwrap()).unwrap();
        assert_eq!(bytes, vec![0, 97, 115, 109]);
    }

    #[test]
    fn missing_local_file_is_io_error() {
        let reader = DefaultSourceReader::new().unwrap();
        let err = reader.read_bytes("/nonexistent/edgepush/file").unwrap_err();
        assert_eq!(err.kind(), "io");
    }
}
