//! Relational store configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Connection string: a local path, `file:` URL, `:memory:`, or a remote
    /// `libsql://` / `https://` database. Empty disables the table sink.
    #[serde(default)]
    pub url: String,

    /// Auth token for remote databases.
    #[serde(default)]
    pub auth_token: String,
}

impl StoreConfig {
    /// Whether the table sink should run.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }

    /// Whether `url` points at a remote database rather than a local file.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        let url = self.url.trim();
        ["libsql://", "https://", "http://"]
            .iter()
            .any(|scheme| url.starts_with(scheme))
    }
}
