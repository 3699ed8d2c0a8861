//! libSQL table sink.

use std::path::Path;

use feed_config::StoreConfig;
use feed_core::StudyRecord;
use libsql::Builder;
use serde::Serialize;

use crate::error::StoreError;
use crate::migrations::run_migrations;

/// Outcome of one [`StudyTable::upsert`] batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpsertSummary {
    pub inserted: usize,
    /// Rows already present (same DOI, or same track and title without DOI).
    pub skipped: usize,
}

/// A row as stored, for inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredStudy {
    pub id: i64,
    pub track: String,
    pub title: String,
    pub doi: Option<String>,
    pub source_url: Option<String>,
    pub year: Option<i64>,
    pub extra: Option<String>,
}

const INSERT_WITH_DOI: &str = "INSERT INTO studies \
     (track, title, authors, source, summary, why_notable, doi, source_url, year, extra) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) \
     ON CONFLICT(doi) DO NOTHING";

const INSERT_WITHOUT_DOI: &str = "INSERT INTO studies \
     (track, title, authors, source, summary, why_notable, doi, source_url, year, extra) \
     SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10 \
     WHERE NOT EXISTS ( \
         SELECT 1 FROM studies WHERE doi IS NULL AND track = ?1 AND lower(title) = lower(?2) \
     )";

/// Handle to the `studies` table.
pub struct StudyTable {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl StudyTable {
    /// Open the database named by `url` and ensure the schema exists.
    ///
    /// Accepts a local path, a `file:` URL, `:memory:`, or a remote
    /// `libsql://` / `https://` / `http://` URL (which uses `auth_token`).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the URL is empty, the database cannot be
    /// opened, or the schema cannot be created.
    pub async fn open(url: &str, auth_token: &str) -> Result<Self, StoreError> {
        Self::from_config(&StoreConfig {
            url: url.to_string(),
            auth_token: auth_token.to_string(),
        })
        .await
    }

    /// Open the database described by the `[store]` section.
    ///
    /// # Errors
    ///
    /// Same as [`StudyTable::open`].
    pub async fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        let url = config.url.trim();
        if url.is_empty() {
            return Err(StoreError::InvalidUrl(url.to_string()));
        }

        let db = if config.is_remote() {
            tracing::debug!(url, "opening remote database");
            Builder::new_remote(url.to_string(), config.auth_token.clone())
                .build()
                .await?
        } else {
            let path = local_path(url);
            if path != ":memory:"
                && let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty())
            {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
            tracing::debug!(path, "opening local database");
            Builder::new_local(path).build().await?
        };
        let conn = db.connect()?;

        run_migrations(&conn).await?;
        Ok(Self { db, conn })
    }

    /// Insert `studies` in one transaction, skipping rows that already exist.
    ///
    /// Any failing row rolls back the whole batch.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a statement fails or the commit fails.
    pub async fn upsert(&self, studies: &[StudyRecord]) -> Result<UpsertSummary, StoreError> {
        let tx = self.conn.transaction().await?;
        let mut summary = UpsertSummary::default();

        for study in studies {
            let result = insert_one(&tx, study).await;
            match result {
                Ok(0) => summary.skipped += 1,
                Ok(_) => summary.inserted += 1,
                Err(e) => {
                    if let Err(rollback) = tx.rollback().await {
                        tracing::warn!(%rollback, "rollback failed");
                    }
                    return Err(e);
                }
            }
        }

        tx.commit().await?;
        tracing::debug!(
            inserted = summary.inserted,
            skipped = summary.skipped,
            "upserted studies"
        );
        Ok(summary)
    }

    /// Number of stored rows.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails.
    pub async fn count(&self) -> Result<u64, StoreError> {
        let mut rows = self.conn.query("SELECT COUNT(*) FROM studies", ()).await?;
        let row = rows.next().await?.ok_or(StoreError::NoResult)?;
        let count: i64 = row.get(0)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// All rows in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails.
    pub async fn list(&self) -> Result<Vec<StoredStudy>, StoreError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, track, title, doi, source_url, year, extra FROM studies ORDER BY id",
                (),
            )
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(StoredStudy {
                id: row.get(0)?,
                track: row.get(1)?,
                title: row.get(2)?,
                doi: row.get::<Option<String>>(3)?,
                source_url: row.get::<Option<String>>(4)?,
                year: row.get::<Option<i64>>(5)?,
                extra: row.get::<Option<String>>(6)?,
            });
        }
        Ok(out)
    }
}

async fn insert_one(conn: &libsql::Connection, study: &StudyRecord) -> Result<u64, StoreError> {
    let doi = study
        .doi
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);
    let extra = study.auxiliary_fields();
    let extra = if extra.is_empty() {
        None
    } else {
        Some(serde_json::to_string(&extra)?)
    };

    let sql = if doi.is_some() {
        INSERT_WITH_DOI
    } else {
        INSERT_WITHOUT_DOI
    };
    let changed = conn
        .execute(
            sql,
            libsql::params![
                study.track.as_str(),
                study.title.as_str(),
                study.authors.joined(),
                study.source.as_str(),
                study.summary.as_str(),
                study.why_notable.as_str(),
                doi,
                study.source_url.clone(),
                study.year.map(i64::from),
                extra,
            ],
        )
        .await?;
    Ok(changed)
}

fn local_path(url: &str) -> &str {
    url.strip_prefix("file://")
        .or_else(|| url.strip_prefix("file:"))
        .unwrap_or(url)
}
