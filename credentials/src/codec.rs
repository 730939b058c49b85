//! Format detection and the XML/YAML credential codecs.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CredentialsError, Result};
use crate::record::Credentials;

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Flat `<Config>` XML document (Sonarr, Radarr, Lidarr, ...).
    Xml,

    /// YAML document with a nested `auth` mapping (Bazarr).
    Yaml,
}

impl Format {
    /// Determine the format from a file suffix.
    ///
    /// This is the only place suffixes are interpreted; it runs before any
    /// content is read, so an unsupported path fails without touching the
    /// file.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("xml") => Ok(Self::Xml),
            Some("yml") | Some("yaml") => Ok(Self::Yaml),
            _ => Err(CredentialsError::UnsupportedFormat(
                path.display().to_string(),
            )),
        }
    }
}

/// The subset of the Sonarr-family XML config the codec cares about.
///
/// Unknown sibling elements (`BindAddress`, `Port`, ...) are ignored on
/// parse. The format has no username or password.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename = "Config")]
struct XmlConfig {
    #[serde(rename = "ApiKey", skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

/// The Bazarr-style YAML config: credentials live under an `auth` mapping.
#[derive(Debug, Default, Serialize, Deserialize)]
struct YamlConfig {
    #[serde(default)]
    auth: YamlAuth,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct YamlAuth {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    apikey: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    password: Option<String>,
}

/// Parse a credential record out of configuration file content.
pub fn parse(input: &str, format: Format) -> Result<Credentials> {
    match format {
        Format::Xml => {
            let config: XmlConfig = quick_xml::de::from_str(input)?;
            Ok(Credentials::new(config.api_key.unwrap_or_default()))
        }
        Format::Yaml => {
            let config: YamlConfig = serde_yaml::from_str(input)?;
            Ok(Credentials::new(config.auth.apikey.unwrap_or_default())
                .with_username(config.auth.username.unwrap_or_default())
                .with_password(config.auth.password.unwrap_or_default()))
        }
    }
}

/// Serialize a credential record back into configuration file content.
///
/// Empty fields are omitted, matching what the applications themselves
/// write. XML drops username/password entirely since the format has no
/// place for them.
pub fn serialize(credentials: &Credentials, format: Format) -> Result<String> {
    match format {
        Format::Xml => {
            let config = XmlConfig {
                api_key: non_empty(&credentials.token),
            };
            Ok(quick_xml::se::to_string(&config)?)
        }
        Format::Yaml => {
            let config = YamlConfig {
                auth: YamlAuth {
                    apikey: non_empty(&credentials.token),
                    username: non_empty(&credentials.username),
                    password: non_empty(&credentials.password),
                },
            };
            Ok(serde_yaml::to_string(&config)?)
        }
    }
}

/// Read and parse a configuration file, format chosen by its suffix.
pub fn read_credentials(path: impl AsRef<Path>) -> Result<Credentials> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    let content = fs::read_to_string(path)?;
    parse(&content, format)
}

/// Serialize a credential record into a configuration file, format chosen
/// by its suffix. The file is created or truncated.
pub fn write_credentials(path: impl AsRef<Path>, credentials: &Credentials) -> Result<()> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    let content = serialize(credentials, format)?;
    fs::write(path, content)?;
    Ok(())
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
