//! # Watcher
//!
//! Debounced configuration change detection and token synchronization.
//!
//! The pipeline has two halves connected by channels:
//!
//! ```text
//! ┌──────────────┐  records   ┌───────────────┐  commits   ┌─────────────┐
//! │ watch session├───────────►│ sync consumer ├───────────►│ destination │
//! │ (notify +    ├───────────►│ (outer        │            │ (stdout or  │
//! │  settle timer)│  errors   │  commit timer)│            │  file)      │
//! └──────────────┘            └───────────────┘            └─────────────┘
//! ```
//!
//! The watch session collapses bursts of filesystem write events into one
//! re-parse per quiet period; the consumer collapses bursts of parsed
//! records into one destination write per quiet period. Both halves share
//! a [`CancellationToken`](tokio_util::sync::CancellationToken), the only
//! clean shutdown path.

pub mod error;
pub mod sync;
pub mod watch;

pub use error::{Result, WatchError};
pub use sync::{DEFAULT_COMMIT_WINDOW, Destination, SyncOptions, commit, run};
pub use watch::{DEFAULT_SETTLE_WINDOW, watch};
