/*!
 * Proofreading service clients.
 *
 * This module contains client implementations for the LLM services the
 * proofreading round trip can use:
 * - Gemini: Google Generative Language API
 * - Anthropic: Anthropic Messages API
 * - Mock: canned responses for tests and offline runs
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::app_config::{ProofreadConfig, ProofreadProvider};
use crate::errors::ProviderError;

pub mod anthropic;
pub mod gemini;
pub mod mock;

pub use anthropic::Anthropic;
pub use gemini::Gemini;
pub use mock::MockProofreader;

/// Common trait for all proofreading services
///
/// Implementations take a fully rendered prompt and return the service's
/// free-form answer.
#[async_trait]
pub trait Proofreader: Send + Sync + Debug {
    /// Human-readable service name for logs
    fn name(&self) -> &str;

    /// Send `prompt` and return the text of the answer
    async fn proofread(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Build the client selected in the configuration
pub fn from_config(config: &ProofreadConfig) -> Box<dyn Proofreader> {
    let model = config.get_model();
    let api_key = config.get_api_key();
    let endpoint = config.get_endpoint();
    let timeout_secs = config.get_timeout_secs();

    match config.provider {
        ProofreadProvider::Gemini => Box::new(Gemini::new(api_key, endpoint, model, timeout_secs)),
        ProofreadProvider::Anthropic => Box::new(Anthropic::new(api_key, endpoint, model, timeout_secs)),
    }
}
