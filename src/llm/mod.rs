pub mod advisor;
#[cfg(feature = "gemini")]
pub mod client;
pub mod parser;
pub mod prompts;
#[cfg(feature = "gemini")]
pub mod types;

pub use advisor::*;
#[cfg(feature = "gemini")]
pub use client::*;
pub use parser::*;

use futures::future::BoxFuture;

use crate::error::Result;

/// A text-in, text-out model endpoint.
///
/// Handed to [`ClauseAdvisor`] explicitly so that tests and alternative
/// providers can stand in for the hosted model.
pub trait LanguageModel: Send + Sync {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>>;
}
