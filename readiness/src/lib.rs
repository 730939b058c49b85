//! # Readiness
//!
//! HTTP readiness probes for running *arr instances. A probe issues a
//! single GET against a caller-supplied URL with the API token injected as
//! the query parameter the application authenticates with; HTTP 200 means
//! ready, anything else (or a transport failure) does not.

pub mod application;
pub mod error;
pub mod probe;

pub use application::Application;
pub use error::{ReadinessError, Result};
pub use probe::ReadinessProbe;
