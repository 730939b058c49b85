//! The debounced watch session.

use std::path::PathBuf;
use std::time::Duration;

use notify::event::EventKind;
use notify::{RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use arrkit_credentials::{Credentials, Format, read_credentials};

use crate::error::WatchError;

/// Default quiet period a file must stay unmodified before it is re-parsed.
///
/// Editors frequently issue several write syscalls per logical save;
/// waiting out the burst avoids parsing truncated intermediate states.
pub const DEFAULT_SETTLE_WINDOW: Duration = Duration::from_secs(3);

/// Watch a configuration file and emit a parsed credential record each
/// time its content settles after a change.
///
/// One tokio task owns the notify handle, the settle timer and the sender
/// halves of both streams; the streams close when the session ends.
/// Per-settlement parse failures go to the error stream and the session
/// continues. Setup failures and an unexpectedly closed event source are
/// reported once, then the session ends. Cancelling `cancel` is the clean
/// shutdown path.
pub fn watch(
    cancel: CancellationToken,
    path: PathBuf,
    settle_window: Duration,
) -> (mpsc::Receiver<Credentials>, mpsc::Receiver<WatchError>) {
    let (record_tx, record_rx) = mpsc::channel(16);
    let (error_tx, error_rx) = mpsc::channel(16);

    tokio::spawn(watch_session(
        cancel,
        path,
        settle_window,
        record_tx,
        error_tx,
    ));

    (record_rx, error_rx)
}

async fn watch_session(
    cancel: CancellationToken,
    path: PathBuf,
    settle_window: Duration,
    record_tx: mpsc::Sender<Credentials>,
    error_tx: mpsc::Sender<WatchError>,
) {
    // Reject unsupported suffixes before touching the file at all.
    if let Err(err) = Format::from_path(&path) {
        let _ = error_tx.send(err.into()).await;
        return;
    }

    // The caller has already done a one-shot read of the startup state;
    // waiting out one quiet period before attaching avoids re-emitting it.
    tokio::select! {
        _ = cancel.cancelled() => return,
        _ = tokio::time::sleep(settle_window) => {}
    }

    let (event_tx, mut event_rx) = mpsc::channel(64);
    let mut watcher = match notify::recommended_watcher(move |res| {
        // Called from the notify backend thread.
        let _ = event_tx.blocking_send(res);
    }) {
        Ok(watcher) => watcher,
        Err(err) => {
            let _ = error_tx.send(err.into()).await;
            return;
        }
    };

    if let Err(err) = watcher.watch(&path, RecursiveMode::NonRecursive) {
        let _ = error_tx.send(err.into()).await;
        return;
    }
    debug!(path = %path.display(), "watching configuration file");

    let settle = tokio::time::sleep(settle_window);
    tokio::pin!(settle);
    // The settle timer only runs between a write event and the next
    // settlement; without further writes it stays disarmed.
    let mut armed = false;

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => break,

            _ = &mut settle, if armed => {
                armed = false;
                let sent = match read_credentials(&path) {
                    Ok(credentials) => send_cancellable(&cancel, &record_tx, credentials).await,
                    Err(err) => send_cancellable(&cancel, &error_tx, err.into()).await,
                };
                if !sent {
                    break;
                }
            }

            event = event_rx.recv() => match event {
                None => {
                    let _ = error_tx.send(WatchError::EventSourceClosed).await;
                    break;
                }
                Some(Ok(event)) if is_write_event(event.kind) => {
                    armed = true;
                    settle.as_mut().reset(Instant::now() + settle_window);
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    // Reported once, by whoever consumes the error stream.
                    if !send_cancellable(&cancel, &error_tx, err.into()).await {
                        break;
                    }
                }
            },
        }
    }

    let _ = watcher.unwatch(&path);
    // Dropping the sender halves closes both streams exactly once.
}

/// Send on a stream unless the session is cancelled or the receiver is
/// gone. Returns whether the session should keep running.
async fn send_cancellable<T>(
    cancel: &CancellationToken,
    tx: &mpsc::Sender<T>,
    value: T,
) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        sent = tx.send(value) => sent.is_ok(),
    }
}

/// Whether a notification event could have changed the file's content.
///
/// Any write-class event counts as a potential change; editors that save
/// via rename surface as create events on the watched path.
fn is_write_event(kind: EventKind) -> bool {
    matches!(kind, EventKind::Modify(_) | EventKind::Create(_))
}
