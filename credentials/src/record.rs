//! The extracted credential record.

/// API credentials extracted from a configuration file.
///
/// Records are plain values: produced fresh on every parse, compared by
/// field equality, never partially populated. Fields absent from the
/// source format are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// API token the application authenticates requests with.
    pub token: String,

    /// Username, when the format carries one (YAML only).
    pub username: String,

    /// Password, when the format carries one (YAML only).
    pub password: String,
}

impl Credentials {
    /// Create a record holding only a token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Self::default()
        }
    }

    /// Set the username.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Set the password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }
}
