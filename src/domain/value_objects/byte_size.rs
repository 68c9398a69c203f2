//! Human readable byte counts for progress output

use std::fmt;

/// A byte count rendered as `17bytes`, `1.5kb` or `2.3mb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct ByteSize(pub u64);

impl ByteSize {
    pub fn of(bytes: &[u8]) -> Self {
        Self(bytes.len() as u64)
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.0;
        if size < 1024 {
            return write!(f, "{}bytes", size);
        }
        let kb = size as f64 / 1024.0;
        if kb < 1024.0 {
            return write!(f, "{}kb", one_decimal(kb));
        }
        write!(f, "{}mb", one_decimal(kb / 1024.0))
    }
}

fn one_decimal(value: f64) -> String {
    let rounded = format!("{:.1}", value);
    rounded
        .strip_suffix(".0")
        .map(str::to_string)
        .unwrap_or(rounded)
}
