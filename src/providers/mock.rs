/*!
 * Mock provider implementation for tests and dry runs.
 *
 * The mock simulates the failure modes the orchestrator has to absorb:
 * - `MockProvider::working()` - Always answers one translation per line
 * - `MockProvider::failing()` - Always fails with an API error
 * - `MockProvider::short()` - Answers one translation too few
 * - `MockProvider::intermittent(n)` - Fails every nth request
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with one translation per text
    Working,
    /// Always fails with a server error
    Failing,
    /// Drops the last translation of every batch
    Short,
    /// Answers with a body that does not parse
    Malformed,
    /// Fails every Nth request
    Intermittent { fail_every: usize },
    /// Sleeps before answering (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Every batch received, in arrival order
    received: Arc<Mutex<Vec<Vec<String>>>>,
    /// Custom translation function (optional)
    custom_response: Option<fn(&str) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            received: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn short() -> Self {
        Self::new(MockBehavior::Short)
    }

    pub fn malformed() -> Self {
        Self::new(MockBehavior::Malformed)
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every: fail_every.max(1) })
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Set a custom translation function
    pub fn with_custom_response(mut self, translate: fn(&str) -> String) -> Self {
        self.custom_response = Some(translate);
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Batches received so far
    pub fn received(&self) -> Vec<Vec<String>> {
        self.received.lock().clone()
    }

    fn translate_one(&self, text: &str, target_language: &str) -> String {
        match self.custom_response {
            Some(translate) => translate(text),
            None => format!("[{}] {}", target_language, text),
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            received: Arc::clone(&self.received),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        _source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.received.lock().push(texts.to_vec());

        let translate_all = || {
            texts
                .iter()
                .map(|text| self.translate_one(text, target_language))
                .collect::<Vec<_>>()
        };

        match self.behavior {
            MockBehavior::Working => Ok(translate_all()),

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Short => {
                let mut translations = translate_all();
                translations.pop();
                Ok(translations)
            }

            MockBehavior::Malformed => Err(ProviderError::ParseError(
                "missing field `translations`".to_string(),
            )),

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(translate_all())
                }
            }

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(translate_all())
            }
        }
    }
}
