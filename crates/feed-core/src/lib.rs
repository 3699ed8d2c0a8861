//! # feed-core
//!
//! Domain types shared by every studyfeed crate:
//! - [`StudyRecord`], the single generated entity, and its flat wire form
//! - [`Track`] and the per-track field schema [`TrackDetail`]
//! - [`FeedPlan`], the per-track entry quotas for one run
//! - Link predicates used by enrichment and validation
//! - [`CoreError`] for record and plan validation
//! - [`ServiceRefusal`], the status mapping shared by the HTTP clients

pub mod errors;
pub mod link;
pub mod plan;
pub mod service;
pub mod study;
pub mod track;

pub use errors::CoreError;
pub use plan::{FeedPlan, TrackQuota};
pub use service::ServiceRefusal;
pub use study::{Authors, Interest, RawStudy, Strictness, StudyRecord};
pub use track::{Project, Track, TrackDetail};
