//! JSON file sink.
//!
//! The collection is written as a pretty-printed UTF-8 JSON array. Writes go
//! to a hidden sibling file first and are renamed into place, so readers
//! never observe a half-written file.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use feed_core::StudyRecord;

use crate::error::StoreError;

/// Write `studies` to `path`, creating parent directories and replacing any
/// existing file.
///
/// # Errors
///
/// Returns [`StoreError::Io`] on filesystem failures and
/// [`StoreError::Json`] if a record cannot be encoded.
pub fn write_studies(path: &Path, studies: &[StudyRecord]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let mut body = serde_json::to_string_pretty(studies)?;
    body.push('\n');

    let tmp = temp_path(path);
    let written = fs::File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(body.as_bytes())?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&tmp, path));

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(StoreError::io(path, e));
    }

    tracing::debug!(path = %path.display(), count = studies.len(), "wrote studies file");
    Ok(())
}

/// Read a collection previously written by [`write_studies`].
///
/// Records are decoded permissively so hand-edited files still load.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be read and
/// [`StoreError::Json`] if it is not a JSON array of objects.
pub fn read_studies(path: &Path) -> Result<Vec<StudyRecord>, StoreError> {
    let text = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    Ok(serde_json::from_str(&text)?)
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "studies.json".into(), |n| n.to_string_lossy().into_owned());
    path.with_file_name(format!(".{name}.tmp"))
}
