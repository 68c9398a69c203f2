//! Watch loop

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::info;

use crate::domain::ports::SourceReader;
use crate::error::EdgeResult;

use super::event::{WatchEvent, WatchOptions, WatcherState, URL_POLL_INTERVAL};
use super::source::{ChangeSource, FsChangeSource, UrlChangeSource};

/// Push, then push again on every debounced change until `running` clears
///
/// Push errors are reported as [`WatchEvent::PushFailed`] and never end the
/// loop. Only setting up the change sources can fail.
pub fn watch<R, P, F>(
    options: &WatchOptions,
    reader: R,
    running: Arc<AtomicBool>,
    push: P,
    on_event: F,
) -> EdgeResult<()>
where
    R: SourceReader + Send + 'static,
    P: FnMut() -> EdgeResult<()>,
    F: Fn(WatchEvent),
{
    let (tx, rx) = channel();
    let sources = start_sources(options, reader, tx)?;

    on_event(WatchEvent::WatchStarted {
        root: options.root_specifier.clone(),
        include: sources.iter().skip(1).map(|s| s.label().to_string()).collect(),
    });

    // notify may report pre-existing files right after registration
    let cooldown_end = Instant::now() + Duration::from_millis(300);
    while Instant::now() < cooldown_end {
        let _ = rx.recv_timeout(Duration::from_millis(50));
    }

    run_loop(&rx, &running, push, &on_event);
    drop(sources);
    Ok(())
}

fn start_sources<R>(
    options: &WatchOptions,
    reader: R,
    tx: Sender<String>,
) -> EdgeResult<Vec<Box<dyn ChangeSource>>>
where
    R: SourceReader + Send + 'static,
{
    let mut sources: Vec<Box<dyn ChangeSource>> = Vec::new();
    let root = &options.root_specifier;
    if root.starts_with("https://") {
        sources.push(Box::new(UrlChangeSource::new(
            root,
            URL_POLL_INTERVAL,
            move |url| reader.read_bytes(url),
            tx.clone(),
        )));
    } else {
        let root_dir = Path::new(root)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        sources.push(Box::new(FsChangeSource::new(root_dir, true, tx.clone())?));
    }
    for path in &options.include {
        sources.push(Box::new(FsChangeSource::new(path, false, tx.clone())?));
    }
    Ok(sources)
}

/// Initial push plus the debounced change loop
///
/// Changes that arrive while a push runs stay in the channel and are
/// coalesced into a single follow-up push.
pub(crate) fn run_loop<P, F>(rx: &Receiver<String>, running: &AtomicBool, mut push: P, on_event: &F)
where
    P: FnMut() -> EdgeResult<()>,
    F: Fn(WatchEvent),
{
    let mut attempt = |on_event: &F| {
        if let Err(e) = push() {
            on_event(WatchEvent::PushFailed {
                kind: e.kind().to_string(),
                message: e.to_string(),
            });
        }
    };

    attempt(on_event);

    let mut state = WatcherState::new();
    while running.load(Ordering::SeqCst) {
        if let Ok(change) = rx.recv_timeout(Duration::from_millis(50)) {
            state.add_change(change);
        }

        if state.should_push() {
            let paths = state.take_changes();
            info!(count = paths.len(), "changes detected");
            on_event(WatchEvent::ChangesDetected { paths });
            attempt(on_event);
        }
    }

    on_event(WatchEvent::Shutdown);
}
