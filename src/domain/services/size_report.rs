//! Upload size reporting
//!
//! gzip is only used to show how large the upload is on the wire; nothing
//! is sent compressed.

use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::domain::entities::Parts;
use crate::domain::value_objects::ByteSize;
use crate::error::EdgeResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeReport {
    pub size: u64,
    pub compressed_size: u64,
}

impl std::fmt::Display for SizeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}) ({} compressed)",
            ByteSize(self.size),
            ByteSize(self.compressed_size)
        )
    }
}

pub fn gzip_len(bytes: &[u8]) -> EdgeResult<u64> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?.len() as u64)
}

/// Script plus every part, each compressed on its own
pub fn compute_sizes(script: &[u8], parts: &Parts) -> EdgeResult<SizeReport> {
    let mut report = SizeReport {
        size: script.len() as u64,
        compressed_size: gzip_len(script)?,
    };
    for part in parts.iter() {
        report.size += part.bytes.len() as u64;
        report.compressed_size += gzip_len(&part.bytes)?;
    }
    Ok(report)
}
