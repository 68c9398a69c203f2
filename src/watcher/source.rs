//! Change sources
//!
//! Each source reports changed resources by sending a label (a path or a
//! url) on a channel. Dropping a source ends its subscription.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use crate::domain::value_objects::ContentHash;
use crate::error::{EdgeError, EdgeResult};

/// Extensions that trigger a push when they change next to the root module
pub const WATCHED_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "mjs", "json", "wasm", "txt", "bin", "html", "css",
];

/// A live change subscription
pub trait ChangeSource {
    /// What is being watched, for display
    fn label(&self) -> &str;
}

/// Local filesystem subscription backed by notify
pub struct FsChangeSource {
    label: String,
    _watcher: RecommendedWatcher,
}

impl FsChangeSource {
    /// Watch `path` recursively
    ///
    /// With `filtered`, only files with one of [`WATCHED_EXTENSIONS`] count.
    /// Events whose file content hash did not change are dropped.
    pub fn new(path: &Path, filtered: bool, tx: Sender<String>) -> EdgeResult<Self> {
        let mut hashes: HashMap<PathBuf, ContentHash> = HashMap::new();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                let Ok(event) = res else {
                    return;
                };
                if matches!(event.kind, EventKind::Access(_)) {
                    return;
                }
                for path in event.paths {
                    if filtered && !has_watched_extension(&path) {
                        continue;
                    }
                    if let Ok(bytes) = std::fs::read(&path) {
                        let hash = ContentHash::from_bytes(&bytes);
                        if hashes.get(&path) == Some(&hash) {
                            continue;
                        }
                        hashes.insert(path.clone(), hash);
                    }
                    let _ = tx.send(path.display().to_string());
                }
            },
            Config::default(),
        )
        .map_err(|e| EdgeError::Watch(e.to_string()))?;

        let mode = if path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(path, mode)
            .map_err(|e| EdgeError::Watch(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), filtered, "watching");

        Ok(Self {
            label: path.display().to_string(),
            _watcher: watcher,
        })
    }
}

impl ChangeSource for FsChangeSource {
    fn label(&self) -> &str {
        &self.label
    }
}

pub(crate) fn has_watched_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| WATCHED_EXTENSIONS.contains(&e))
}

/// Polls an https url and reports when its content hash changes
pub struct UrlChangeSource {
    label: String,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl UrlChangeSource {
    /// Start polling `url` every `interval` with `fetch`
    ///
    /// The first successful fetch only records the baseline hash.
    pub fn new<F>(url: &str, interval: Duration, fetch: F, tx: Sender<String>) -> Self
    where
        F: Fn(&str) -> EdgeResult<Vec<u8>> + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();
        let thread_url = url.to_string();
        let handle = thread::spawn(move || {
            let mut last: Option<ContentHash> = None;
            while !thread_stop.load(Ordering::SeqCst) {
                match fetch(&thread_url) {
                    Ok(bytes) => {
                        let hash = ContentHash::from_bytes(&bytes);
                        let changed = last.as_ref().is_some_and(|prev| *prev != hash);
                        last = Some(hash);
                        if changed && tx.send(thread_url.clone()).is_err() {
                            return;
                        }
                    }
                    Err(e) => warn!(url = %thread_url, error = %e, "poll failed"),
                }
                sleep_unless_stopped(interval, &thread_stop);
            }
        });
        Self {
            label: url.to_string(),
            stop,
            handle: Some(handle),
        }
    }
}

fn sleep_unless_stopped(interval: Duration, stop: &AtomicBool) {
    let step = Duration::from_millis(50).min(interval);
    let mut slept = Duration::ZERO;
    while slept < interval && !stop.load(Ordering::SeqCst) {
        thread::sleep(step);
        slept += step;
    }
}

impl ChangeSource for UrlChangeSource {
    fn label(&self) -> &str {
        &self.label
    }
}

impl Drop for UrlChangeSource {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
