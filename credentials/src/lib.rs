//! # Credentials
//!
//! This crate extracts API credentials from the configuration files of
//! *arr media-automation applications (Sonarr, Radarr, Bazarr, ...).
//!
//! Two on-disk formats are supported, selected by file suffix:
//!
//! - **XML** (`.xml`): the flat `<Config>` document used by the Sonarr
//!   family, where only an `ApiKey` element is present.
//! - **YAML** (`.yml`/`.yaml`): the Bazarr-style document with a nested
//!   `auth` mapping carrying `apikey`, `username` and `password`.
//!
//! Parsing always yields a complete [`Credentials`] record; fields the
//! source format cannot express default to the empty string.

pub mod codec;
pub mod error;
pub mod record;

pub use codec::{Format, parse, read_credentials, serialize, write_credentials};
pub use error::{CredentialsError, Result};
pub use record::Credentials;
