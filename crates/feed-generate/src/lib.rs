//! # feed-generate
//!
//! The generation half of the pipeline:
//! - [`prompt::build_prompt`] renders the instruction text for a [`feed_core::FeedPlan`]
//! - [`CompletionProvider`] is the seam to the text-generation service, with
//!   [`OpenAiClient`] as the production implementation
//! - [`parse`] turns the raw completion into typed, plan-checked records

pub mod openai;
pub mod parse;
pub mod prompt;

mod error;

pub use error::{GenerationError, MalformedResponse};
pub use openai::OpenAiClient;
pub use parse::{parse_completion, parse_for_plan, strip_code_fence};
pub use prompt::build_prompt;

use std::future::Future;

/// A text-generation service that answers one prompt with one completion.
pub trait CompletionProvider {
    /// Send `prompt` as a single user message and return the completion text.
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, GenerationError>> + Send;
}
