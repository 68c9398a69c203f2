//! Watch loop for continuous pushes
//!
//! Implements `--watch` with:
//! - Change sources for local files (notify) and https roots (polling)
//! - Debouncing (100ms)
//! - Push failures reported without ending the loop
//! - Graceful Ctrl+C shutdown

mod event;
mod source;
mod watch_loop;

pub use event::{WatchEvent, WatchOptions, DEBOUNCE_MS, URL_POLL_INTERVAL};
pub use source::{ChangeSource, FsChangeSource, UrlChangeSource, WATCHED_EXTENSIONS};
pub use watch_loop::watch;
