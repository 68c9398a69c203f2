//! Bundler Port

use crate::error::EdgeResult;

/// Single-file output of a bundle run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOutput {
    pub code: String,
    /// Which backend produced the code (for progress output)
    pub backend: String,
}

pub trait Bundler {
    /// Bundle the module at `root` (local path or https url) into one script
    fn bundle(&self, root: &str) -> EdgeResult<BundleOutput>;
}

impl<T: Bundler + ?Sized> Bundler for &T {
    fn bundle(&self, root: &str) -> EdgeResult<BundleOutput> {
        (**self).bundle(root)
    }
}
