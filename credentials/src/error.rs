//! Error types for credential extraction.

use thiserror::Error;

/// Result type alias for credential operations.
pub type Result<T> = std::result::Result<T, CredentialsError>;

/// Errors that can occur while reading or writing credentials.
#[derive(Error, Debug)]
pub enum CredentialsError {
    /// File suffix maps to no known format.
    #[error("unsupported file extension: {0}")]
    UnsupportedFormat(String),

    /// XML document could not be parsed.
    #[error("xml parse error: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// XML document could not be produced.
    #[error("xml serialize error: {0}")]
    XmlSerialize(#[from] quick_xml::SeError),

    /// YAML document could not be parsed or produced.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
