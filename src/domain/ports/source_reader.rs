//! Source Reader Port
//!
//! Reads the bytes behind a specifier, which is either a local path or an
//! `https://` url.

use crate::error::{EdgeError, EdgeResult};

pub trait SourceReader {
    fn read_bytes(&self, specifier: &str) -> EdgeResult<Vec<u8>>;

    fn read_to_string(&self, specifier: &str) -> EdgeResult<String> {
        let bytes = self.read_bytes(specifier)?;
        String::from_utf8(bytes).map_err(|e| {
            EdgeError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("{specifier}: {e}"),
            ))
        })
    }
}

impl<T: SourceReader + ?Sized> SourceReader for &T {
    fn read_bytes(&self, specifier: &str) -> EdgeResult<Vec<u8>> {
        (**self).read_bytes(specifier)
    }
}
