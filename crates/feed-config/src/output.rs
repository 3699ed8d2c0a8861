//! File sink configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_path() -> PathBuf {
    PathBuf::from("data/studies.json")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// JSON file the collection is written to, overwritten on every run.
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}
