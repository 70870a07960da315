/*!
 * Translation service clients.
 *
 * The translation model itself lives outside this crate. Everything here
 * talks to it through the `Provider` trait:
 * - `http`: JSON client for a translation server
 * - `mock`: Deterministic provider for tests and dry runs
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all translation providers
///
/// Implementations must return exactly one translation per input text,
/// in input order. The orchestrator relies on this to correlate results
/// with line positions and rejects any response that breaks it.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Translate an ordered sequence of texts in one request
    async fn translate_batch(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError>;

    /// Translate a single text
    async fn translate_text(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let mut translations = self
            .translate_batch(&[text.to_string()], source_language, target_language)
            .await?;
        if translations.len() != 1 {
            return Err(ProviderError::ParseError(format!(
                "expected 1 translation, got {}",
                translations.len()
            )));
        }
        Ok(translations.remove(0))
    }

    /// Test the connection to the provider with a one-line batch
    async fn test_connection(&self, source_language: &str, target_language: &str) -> Result<(), ProviderError> {
        self.translate_batch(&["Tere".to_string()], source_language, target_language)
            .await
            .map(|_| ())
    }
}

pub mod http;
pub mod mock;
