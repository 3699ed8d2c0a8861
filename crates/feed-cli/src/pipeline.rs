//! One run: prompt → completion → records → links → sinks.
//!
//! Stages run strictly in order. Nothing is written unless the completion
//! parses into exactly the planned collection, and the file sink always
//! lands before the table sink.

use std::fmt;
use std::path::PathBuf;

use feed_config::{ConfigError, FeedConfig, StoreConfig};
use feed_core::{FeedPlan, Strictness, StudyRecord};
use feed_generate::{
    CompletionProvider, GenerationError, MalformedResponse, build_prompt, parse_for_plan,
};
use feed_lookup::{LinkEnricher, LinkSource, WorkLookup};
use feed_store::{StoreError, StudyTable, UpsertSummary, write_studies};
use thiserror::Error;

use crate::progress::Progress;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("unusable completion: {0}")]
    Malformed(#[from] MalformedResponse),

    #[error("persistence failed: {0}")]
    Store(#[from] StoreError),
}

/// How many records each link rule settled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkTally {
    pub existing: usize,
    pub doi: usize,
    pub registry: usize,
    pub search_fallback: usize,
}

impl LinkTally {
    fn record(&mut self, source: &LinkSource) {
        match source {
            LinkSource::Existing => self.existing += 1,
            LinkSource::Doi => self.doi += 1,
            LinkSource::Registry { .. } => self.registry += 1,
            LinkSource::SearchFallback => self.search_fallback += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub written: usize,
    pub output: PathBuf,
    pub links: LinkTally,
    /// `None` when no store is configured.
    pub stored: Option<UpsertSummary>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} studies to {}",
            self.written,
            self.output.display()
        )?;
        if let Some(stored) = self.stored {
            write!(
                f,
                "; stored {} new, {} already present",
                stored.inserted, stored.skipped
            )?;
        }
        Ok(())
    }
}

pub struct Pipeline<P, L> {
    provider: P,
    enricher: LinkEnricher<L>,
    plan: FeedPlan,
    strictness: Strictness,
    output: PathBuf,
    store: StoreConfig,
}

impl<P: CompletionProvider, L: WorkLookup> Pipeline<P, L> {
    pub fn new(
        provider: P,
        enricher: LinkEnricher<L>,
        config: &FeedConfig,
    ) -> Result<Self, PipelineError> {
        Ok(Self {
            provider,
            enricher,
            plan: config.plan()?,
            strictness: config.strictness(),
            output: config.output.path.clone(),
            store: config.store.clone(),
        })
    }

    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        let mut records = self.generate().await?;
        let links = self.enrich(&mut records).await;

        write_studies(&self.output, &records)?;
        tracing::info!(path = %self.output.display(), count = records.len(), "wrote studies file");

        let stored = if self.store.is_configured() {
            let table = StudyTable::from_config(&self.store).await?;
            let summary = table.upsert(&records).await?;
            tracing::info!(
                inserted = summary.inserted,
                skipped = summary.skipped,
                "stored studies"
            );
            Some(summary)
        } else {
            None
        };

        Ok(RunSummary {
            written: records.len(),
            output: self.output.clone(),
            links,
            stored,
        })
    }

    async fn generate(&self) -> Result<Vec<StudyRecord>, PipelineError> {
        let prompt = build_prompt(&self.plan);
        let spinner = Progress::awaiting_completion(self.plan.total());

        let raw = match self.provider.complete(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                spinner.fail("generation failed");
                return Err(e.into());
            }
        };

        match parse_for_plan(&raw, &self.plan, self.strictness) {
            Ok(records) => {
                spinner.finish();
                tracing::info!(count = records.len(), "parsed completion");
                Ok(records)
            }
            Err(e) => {
                spinner.fail("completion rejected");
                tracing::debug!(raw = e.raw(), "rejected completion");
                Err(e.into())
            }
        }
    }

    async fn enrich(&self, records: &mut [StudyRecord]) -> LinkTally {
        let progress = Progress::linking(records.len());
        let mut tally = LinkTally::default();

        for record in records.iter_mut() {
            progress.current(&record.title);
            let source = self.enricher.enrich(record).await;
            tracing::debug!(title = %record.title, %source, "linked");
            tally.record(&source);
            progress.advance();
        }

        progress.finish();
        tracing::info!(
            existing = tally.existing,
            doi = tally.doi,
            registry = tally.registry,
            search_fallback = tally.search_fallback,
            "linked studies"
        );
        tally
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use feed_core::link::is_web_link;
    use feed_core::{Track, TrackQuota};
    use feed_lookup::WorkCandidate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    /// Returns a fixed completion.
    struct Canned(String);

    impl CompletionProvider for Canned {
        async fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
            Ok(self.0.clone())
        }
    }

    struct Unavailable;

    impl CompletionProvider for Unavailable {
        async fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
            Err(GenerationError::Api {
                status: 503,
                message: "overloaded".into(),
            })
        }
    }

    /// Matches every title exactly and counts calls.
    #[derive(Clone, Default)]
    struct Echo {
        calls: Arc<AtomicUsize>,
    }

    impl WorkLookup for Echo {
        async fn best_match(&self, title: &str) -> Option<WorkCandidate> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Some(WorkCandidate {
                title: title.to_string(),
                doi: format!("10.5555/{n}"),
                year: Some(2020),
            })
        }
    }

    fn social(title: &str) -> serde_json::Value {
        json!({
            "track": "social_layer",
            "title": title,
            "authors": ["A. Author"],
            "source": "Journal, 2020",
            "summary": "Summary.",
            "why_notable": "Notable.",
            "tags": "not now"
        })
    }

    fn config(dir: &Path, count: usize) -> FeedConfig {
        let mut config = FeedConfig::default();
        config.feed.tracks = vec![TrackQuota::new(Track::SocialLayer, count)];
        config.output.path = dir.join("data/studies.json");
        config
    }

    fn pipeline<P: CompletionProvider>(
        provider: P,
        lookup: Echo,
        config: &FeedConfig,
    ) -> Pipeline<P, Echo> {
        let enricher = LinkEnricher::from_config(lookup, &config.lookup);
        Pipeline::new(provider, enricher, config).unwrap()
    }

    #[tokio::test]
    async fn full_run_writes_linked_collection() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), 2);
        let mut with_link = social("Linked Already");
        with_link["source_url"] = json!("https://example.org/a");
        let completion = json!([with_link, social("Needs a Link")]).to_string();
        let lookup = Echo::default();

        let summary = pipeline(Canned(completion), lookup.clone(), &config)
            .run()
            .await
            .unwrap();

        assert_eq!(summary.written, 2);
        assert_eq!(
            summary.links,
            LinkTally {
                existing: 1,
                registry: 1,
                ..Default::default()
            }
        );
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
        assert!(summary.stored.is_none());

        let written = feed_store::read_studies(&config.output.path).unwrap();
        assert_eq!(written.len(), 2);
        assert!(
            written
                .iter()
                .all(|r| r.source_url.as_deref().is_some_and(is_web_link))
        );
        assert_eq!(written[1].doi.as_deref(), Some("10.5555/0"));
    }

    #[tokio::test]
    async fn untypeable_link_fields_are_replaced_in_both_sinks() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path(), 1);
        config.store.url = dir.path().join("studies.db").display().to_string();
        let mut study = social("Weak Ties");
        study["source_url"] = json!(false);
        study["year"] = json!("n.d.");
        let completion = json!([study]).to_string();

        let summary = pipeline(Canned(completion), Echo::default(), &config)
            .run()
            .await
            .unwrap();
        assert_eq!(summary.links.registry, 1);

        let on_disk: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&config.output.path).unwrap()).unwrap();
        assert_eq!(on_disk[0]["source_url"], json!("https://doi.org/10.5555/0"));
        assert_eq!(on_disk[0]["year"], json!(2020));

        let read_back = feed_store::read_studies(&config.output.path).unwrap();
        assert_eq!(read_back[0].source_url.as_deref(), Some("https://doi.org/10.5555/0"));
        assert_eq!(read_back[0].year, Some(2020));

        let rows = StudyTable::from_config(&config.store)
            .await
            .unwrap()
            .list()
            .await
            .unwrap();
        assert_eq!(rows[0].source_url, read_back[0].source_url);
        assert_eq!(rows[0].doi, read_back[0].doi);
    }

    #[tokio::test]
    async fn rejected_completion_leaves_previous_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), 2);
        let previous = json!([social("Yesterday One"), social("Yesterday Two")]).to_string();
        std::fs::create_dir_all(config.output.path.parent().unwrap()).unwrap();
        std::fs::write(&config.output.path, &previous).unwrap();

        for completion in [
            "```json\n[{\"track\": \"social_layer\",".to_string(),
            json!([social("Only One")]).to_string(),
        ] {
            let err = pipeline(Canned(completion), Echo::default(), &config)
                .run()
                .await
                .unwrap_err();
            assert!(matches!(err, PipelineError::Malformed(_)), "{err}");
            assert_eq!(std::fs::read_to_string(&config.output.path).unwrap(), previous);
        }
    }

    #[tokio::test]
    async fn invalid_json_writes_nothing_and_skips_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), 1);
        let lookup = Echo::default();

        let err = pipeline(
            Canned("Here are some studies you might like!".into()),
            lookup.clone(),
            &config,
        )
        .run()
        .await
        .unwrap_err();

        assert!(matches!(err, PipelineError::Malformed(MalformedResponse::NotJson { .. })));
        assert!(!config.output.path.exists());
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn wrong_count_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), 2);
        let completion = json!([social("Only One")]).to_string();

        let err = pipeline(Canned(completion), Echo::default(), &config)
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Malformed(MalformedResponse::Quota { .. })));
        assert!(!config.output.path.exists());
    }

    #[tokio::test]
    async fn generation_failure_touches_no_sink() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path(), 1);
        config.store.url = dir.path().join("studies.db").display().to_string();

        let err = pipeline(Unavailable, Echo::default(), &config)
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Generation(_)));
        assert!(!config.output.path.exists());
        assert!(!dir.path().join("studies.db").exists());
    }

    #[tokio::test]
    async fn configured_store_receives_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path(), 2);
        config.store.url = dir.path().join("studies.db").display().to_string();
        let completion = json!([social("First"), social("Second")]).to_string();

        let first = pipeline(Canned(completion.clone()), Echo::default(), &config)
            .run()
            .await
            .unwrap();
        assert_eq!(
            first.stored,
            Some(UpsertSummary {
                inserted: 2,
                skipped: 0
            })
        );

        // A fresh lookup hands out the same DOIs again, so the rerun is a no-op.
        let second = pipeline(Canned(completion), Echo::default(), &config)
            .run()
            .await
            .unwrap();
        assert_eq!(
            second.stored,
            Some(UpsertSummary {
                inserted: 0,
                skipped: 2
            })
        );
        assert!(
            second
                .to_string()
                .ends_with("; stored 0 new, 2 already present")
        );
    }

    #[tokio::test]
    async fn store_failure_keeps_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path(), 1);
        // A directory cannot be opened as a database.
        config.store.url = dir.path().display().to_string();
        let completion = json!([social("Kept")]).to_string();

        let err = pipeline(Canned(completion), Echo::default(), &config)
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Store(_)), "{err}");
        assert_eq!(feed_store::read_studies(&config.output.path).unwrap().len(), 1);
    }

    #[test]
    fn summary_line_without_store() {
        let summary = RunSummary {
            written: 10,
            output: PathBuf::from("data/studies.json"),
            links: LinkTally::default(),
            stored: None,
        };
        assert_eq!(summary.to_string(), "Wrote 10 studies to data/studies.json");
    }
}
