//! # feed-store
//!
//! Persistence for generated studies:
//! - [`file`]: the JSON collection on disk, always written
//! - [`table`]: an optional libSQL `studies` table with idempotent upserts

pub mod file;
pub mod table;

mod error;
mod migrations;

pub use error::StoreError;
pub use file::{read_studies, write_studies};
pub use table::{StoredStudy, StudyTable, UpsertSummary};
