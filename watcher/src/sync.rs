//! The sync consumer and the artifact writer.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use arrkit_credentials::{Credentials, read_credentials};

use crate::error::{Result, WatchError};
use crate::watch::{DEFAULT_SETTLE_WINDOW, watch};

/// Default quiet period between the last received record and the commit
/// that writes it out, coalescing bursts of emissions into one write.
pub const DEFAULT_COMMIT_WINDOW: Duration = Duration::from_millis(100);

/// Where the extracted token is committed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Raw token bytes on standard output, no trailing newline.
    Stdout,

    /// Token written verbatim to a file, parent directories created as
    /// needed.
    File(PathBuf),
}

impl From<Option<PathBuf>> for Destination {
    fn from(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::File(path),
            None => Self::Stdout,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Timing knobs for a sync session.
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    /// Inner quiet period: how long the watched file must stay unmodified
    /// before it is re-parsed.
    pub settle_window: Duration,

    /// Outer quiet period: how long the record stream must stay quiet
    /// before the cached record is committed.
    pub commit_window: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            settle_window: DEFAULT_SETTLE_WINDOW,
            commit_window: DEFAULT_COMMIT_WINDOW,
        }
    }
}

impl SyncOptions {
    /// Set the inner settle window.
    pub fn with_settle_window(mut self, window: Duration) -> Self {
        self.settle_window = window;
        self
    }

    /// Set the outer commit window.
    pub fn with_commit_window(mut self, window: Duration) -> Self {
        self.commit_window = window;
        self
    }
}

/// Commit a credential's token to its destination.
///
/// The file path is created or truncated in place; a reader racing the
/// writer may observe a partial write. That limitation is accepted, the
/// outer debounce keeps such windows rare.
pub fn commit(credentials: &Credentials, destination: &Destination) -> Result<()> {
    match destination {
        Destination::Stdout => {
            write_token(&mut io::stdout().lock(), credentials)
                .map_err(|source| write_error(destination, source))?;
        }
        Destination::File(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|source| write_error(destination, source))?;
            }
            fs::File::create(path)
                .and_then(|mut file| write_token(&mut file, credentials))
                .map_err(|source| write_error(destination, source))?;
        }
    }

    debug!(%destination, "committed token");
    Ok(())
}

/// Write the raw token bytes, no trailing newline, and flush.
fn write_token(w: &mut impl Write, credentials: &Credentials) -> io::Result<()> {
    w.write_all(credentials.token.as_bytes())?;
    w.flush()
}

fn write_error(destination: &Destination, source: io::Error) -> WatchError {
    WatchError::Write {
        destination: destination.to_string(),
        source,
    }
}

/// Synchronize the token extracted from `path` to `destination` until the
/// session is cancelled.
///
/// A one-shot read and commit runs first and any failure there is fatal:
/// there is nothing worth watching if the file cannot even be read once.
/// After that the session favors availability over strictness. Parse and
/// write failures are logged and the loop persists with a possibly-stale
/// artifact; only the watcher becoming unable to report anything ends the
/// session with an error. Cancellation returns `Ok(())`.
pub async fn run(
    cancel: CancellationToken,
    path: PathBuf,
    destination: Destination,
    options: SyncOptions,
) -> Result<()> {
    let mut cached = read_credentials(&path)?;
    commit(&cached, &destination)?;

    let (mut records, mut errors) = watch(cancel.clone(), path, options.settle_window);

    let commit_timer = tokio::time::sleep(options.commit_window);
    tokio::pin!(commit_timer);
    // The commit timer only runs between a received record and the commit
    // it settles into; the loop starts idle.
    let mut armed = false;
    let mut records_open = true;

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => return Ok(()),

            maybe_error = errors.recv() => match maybe_error {
                // Without an error stream the watcher can no longer report
                // anything; continuing would sync stale data silently.
                None => return Err(WatchError::ErrorStreamClosed),
                Some(err) => warn!("configuration watcher reported an error: {err}"),
            },

            _ = &mut commit_timer, if armed => {
                armed = false;
                if let Err(err) = commit(&cached, &destination) {
                    warn!("failed to write token: {err}");
                }
            }

            maybe_record = records.recv(), if records_open => match maybe_record {
                // The error stream closing reports the session's end; this
                // branch just stops polling a closed stream.
                None => records_open = false,
                Some(record) => {
                    cached = record;
                    armed = true;
                    commit_timer.as_mut().reset(Instant::now() + options.commit_window);
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn write_config(path: &Path, token: &str) {
        fs::write(path, format!("auth:\n  apikey: {token}\n")).unwrap();
    }

    #[test]
    fn test_write_token_emits_exactly_the_token_bytes() {
        let mut sink = Vec::new();
        write_token(&mut sink, &Credentials::new("abc123")).unwrap();
        assert_eq!(sink, b"abc123");
    }

    #[test]
    fn test_write_token_emits_nothing_for_an_empty_token() {
        let mut sink = Vec::new();
        write_token(&mut sink, &Credentials::default()).unwrap();
        assert_eq!(sink, b"");
    }

    #[test]
    fn test_commit_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let dest_path = dir.path().join("a/b/c/token.txt");
        let destination = Destination::File(dest_path.clone());

        commit(&Credentials::new("abc123"), &destination).unwrap();

        assert_eq!(fs::read_to_string(dest_path).unwrap(), "abc123");
    }

    #[test]
    fn test_commit_truncates_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let dest_path = dir.path().join("token.txt");
        fs::write(&dest_path, "a-much-longer-previous-token").unwrap();

        let destination = Destination::File(dest_path.clone());
        commit(&Credentials::new("short"), &destination).unwrap();

        assert_eq!(fs::read_to_string(dest_path).unwrap(), "short");
    }

    #[test]
    fn test_destination_from_optional_path() {
        assert_eq!(Destination::from(None), Destination::Stdout);
        assert_eq!(
            Destination::from(Some(PathBuf::from("/tmp/token"))),
            Destination::File(PathBuf::from("/tmp/token"))
        );
    }

    #[tokio::test]
    async fn test_run_fails_fast_when_initial_read_fails() {
        let cancel = CancellationToken::new();
        let result = run(
            cancel,
            PathBuf::from("/nonexistent/config.yaml"),
            Destination::Stdout,
            SyncOptions::default(),
        )
        .await;

        assert!(matches!(result, Err(WatchError::Credentials(_))));
    }

    #[tokio::test]
    async fn test_run_commits_initial_state_and_tracks_edits() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let dest_path = dir.path().join("out/token.txt");
        write_config(&config_path, "initial");

        let cancel = CancellationToken::new();
        let options = SyncOptions::default()
            .with_settle_window(Duration::from_millis(150))
            .with_commit_window(Duration::from_millis(100));
        let session = tokio::spawn(run(
            cancel.clone(),
            config_path.clone(),
            Destination::File(dest_path.clone()),
            options,
        ));

        // The one-shot commit happens before the watcher is even attached.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fs::read_to_string(&dest_path).unwrap(), "initial");

        // Wait out the arming delay, then edit the config.
        tokio::time::sleep(Duration::from_millis(400)).await;
        write_config(&config_path, "rotated");

        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if fs::read_to_string(&dest_path).unwrap() == "rotated" {
                break;
            }
            assert!(Instant::now() < deadline, "destination never updated");
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        cancel.cancel();
        assert!(session.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_run_coalesces_records_into_one_commit() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let dest_path = dir.path().join("token.txt");
        write_config(&config_path, "initial");

        let cancel = CancellationToken::new();
        // Tiny settle window so edits become records quickly; a commit
        // window big enough that both records land inside it.
        let options = SyncOptions::default()
            .with_settle_window(Duration::from_millis(100))
            .with_commit_window(Duration::from_secs(3));
        let session = tokio::spawn(run(
            cancel.clone(),
            config_path.clone(),
            Destination::File(dest_path.clone()),
            options,
        ));

        // Initial commit, then wait out the arming delay.
        tokio::time::sleep(Duration::from_millis(400)).await;

        write_config(&config_path, "intermediate");
        tokio::time::sleep(Duration::from_millis(400)).await;
        write_config(&config_path, "final");
        tokio::time::sleep(Duration::from_millis(400)).await;

        // Both records arrived, but the commit window has not elapsed:
        // the destination still holds the one-shot state.
        assert_eq!(fs::read_to_string(&dest_path).unwrap(), "initial");

        // After the window, exactly the last record is committed.
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if fs::read_to_string(&dest_path).unwrap() == "final" {
                break;
            }
            assert!(Instant::now() < deadline, "destination never updated");
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        cancel.cancel();
        assert!(session.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_run_returns_cleanly_on_cancellation() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        write_config(&config_path, "abc123");

        let cancel = CancellationToken::new();
        let session = tokio::spawn(run(
            cancel.clone(),
            config_path,
            Destination::File(dir.path().join("token.txt")),
            SyncOptions::default(),
        ));

        tokio::time::sleep(Duration::from_millis(200)).await;
        cancel.cancel();

        let result = tokio::time::timeout(Duration::from_secs(5), session)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}
