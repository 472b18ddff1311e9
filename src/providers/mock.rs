/*!
 * Mock proofreader.
 *
 * This module provides a proofreader that never leaves the process:
 * - `MockProofreader::clean()` - Always answers with the no-issues sentinel
 * - `MockProofreader::with_response()` - Always answers with the given text
 * - `MockProofreader::failing()` - Always fails with an error
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::errors::ProviderError;
use crate::proofread::mapper::NO_ISSUES_SENTINEL;
use crate::providers::Proofreader;

/// Behavior mode for the mock proofreader
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Returns the given response
    Respond(String),
    /// Always fails with an error
    Failing,
}

/// Mock proofreader for testing the round trip
#[derive(Debug, Clone)]
pub struct MockProofreader {
    behavior: MockBehavior,
    /// Number of calls made
    request_count: Arc<AtomicUsize>,
    /// Last prompt received
    last_prompt: Arc<Mutex<Option<String>>>,
}

impl MockProofreader {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            last_prompt: Arc::new(Mutex::new(None)),
        }
    }

    /// Mock that finds nothing to correct
    pub fn clean() -> Self {
        Self::with_response(format!("{}。", NO_ISSUES_SENTINEL))
    }

    /// Mock that always answers `response`
    pub fn with_response(response: impl Into<String>) -> Self {
        Self::new(MockBehavior::Respond(response.into()))
    }

    /// Mock that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Number of proofreading calls made so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// The most recent prompt, if any
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().clone()
    }
}

#[async_trait]
impl Proofreader for MockProofreader {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn proofread(&self, prompt: &str) -> Result<String, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock() = Some(prompt.to_string());

        match &self.behavior {
            MockBehavior::Respond(response) => Ok(response.clone()),
            MockBehavior::Failing => Err(ProviderError::ConnectionError("Mock connection failure".to_string())),
        }
    }
}
