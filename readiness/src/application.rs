//! The *arr applications a probe can target.

use std::fmt;

/// A supported media-automation application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Application {
    Bazarr,
    Lidarr,
    Prowlarr,
    Radarr,
    Readarr,
    Sabnzbd,
    Sonarr,
}

impl Application {
    /// Query parameter the application expects its API token under.
    ///
    /// Every currently supported application happens to use `apikey`, but
    /// the key is protocol-specific, so it stays a per-variant mapping.
    pub fn token_query_key(self) -> &'static str {
        match self {
            Self::Bazarr => "apikey",
            Self::Lidarr => "apikey",
            Self::Prowlarr => "apikey",
            Self::Radarr => "apikey",
            Self::Readarr => "apikey",
            Self::Sabnzbd => "apikey",
            Self::Sonarr => "apikey",
        }
    }
}

impl fmt::Display for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bazarr => "bazarr",
            Self::Lidarr => "lidarr",
            Self::Prowlarr => "prowlarr",
            Self::Radarr => "radarr",
            Self::Readarr => "readarr",
            Self::Sabnzbd => "sabnzbd",
            Self::Sonarr => "sonarr",
        };
        f.write_str(name)
    }
}
