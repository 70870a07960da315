/*!
 * Batch translation orchestration.
 *
 * Collects the translatable lines of one document, sends them to the
 * provider, and correlates the answers back to line positions. Failures
 * never escape: the affected lines simply keep their source text.
 */

use futures::stream::{self, StreamExt};
use log::{debug, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::TranslationMode;
use crate::errors::{ProviderError, TranslationError};
use crate::providers::Provider;
use crate::subtitle_processor::Line;

use super::classifier::Classification;

/// One translatable line queued for translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    /// Position of the line in its document
    pub position: usize,
    /// Source text
    pub text: String,
}

/// Ordered translatable lines of one document
///
/// Entry order is document order, and it is the only thing tying a
/// returned translation to its line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationBatch {
    entries: Vec<BatchEntry>,
}

impl TranslationBatch {
    /// Collect translatable lines from classifier output
    pub fn collect<'a>(classified: impl IntoIterator<Item = (&'a Line, Classification)>) -> Self {
        let entries = classified
            .into_iter()
            .filter(|(_, classification)| classification.is_translatable())
            .map(|(line, _)| BatchEntry {
                position: line.position,
                text: line.text.clone(),
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Source texts in batch order
    pub fn texts(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.text.clone()).collect()
    }
}

/// Translation text to place at a document position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub position: usize,
    pub text: String,
}

/// Ordered translations answering one batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    translations: Vec<String>,
}

impl TranslationResult {
    pub fn new(translations: Vec<String>) -> Self {
        Self { translations }
    }

    pub fn len(&self) -> usize {
        self.translations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }

    /// Pair translation i with batch entry i
    ///
    /// A count mismatch rejects the whole result; partial alignment is
    /// never attempted.
    pub fn correlate(self, batch: &TranslationBatch) -> Result<Vec<Substitution>, TranslationError> {
        if self.translations.len() != batch.len() {
            return Err(TranslationError::LengthMismatch {
                expected: batch.len(),
                actual: self.translations.len(),
            });
        }

        Ok(batch
            .entries()
            .iter()
            .zip(self.translations)
            .filter_map(|(entry, translated)| substitution_for(entry, translated))
            .collect())
    }
}

/// Build a substitution, or None when the translation should not replace the source
fn substitution_for(entry: &BatchEntry, translated: String) -> Option<Substitution> {
    if translated.trim().is_empty() {
        return None;
    }
    Some(Substitution {
        position: entry.position,
        text: flatten_line_breaks(&translated),
    })
}

/// A translated line must stay one line
fn flatten_line_breaks(text: &str) -> String {
    if !text.contains(['\n', '\r']) {
        return text.to_string();
    }
    text.split(|c: char| c == '\n' || c == '\r')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// How the batch ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatus {
    /// Every line translated
    Translated,
    /// Nothing to translate, no request made
    Skipped,
    /// Whole batch kept its source text
    Fallback { reason: String },
    /// Per-line mode only: some lines kept their source text
    Partial { failed: usize },
}

/// Result of orchestrating one batch
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Translations to apply, in position order
    pub substitutions: Vec<Substitution>,
    /// Overall status
    pub status: BatchStatus,
    /// Outbound requests issued
    pub requests: usize,
    /// Wall time spent waiting on the provider
    pub request_duration: Duration,
}

impl BatchOutcome {
    fn skipped() -> Self {
        Self {
            substitutions: Vec::new(),
            status: BatchStatus::Skipped,
            requests: 0,
            request_duration: Duration::ZERO,
        }
    }
}

/// Orchestrator options
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Batch or per-line requests
    pub mode: TranslationMode,
    /// Bound on every provider call
    pub timeout: Duration,
    /// Per-line mode concurrency
    pub max_concurrent_requests: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            mode: TranslationMode::Batch,
            timeout: Duration::from_secs(30),
            max_concurrent_requests: 4,
        }
    }
}

/// Batch translator for the translatable lines of one document
#[derive(Debug, Clone)]
pub struct BatchTranslator {
    /// The translation service collaborator
    provider: Arc<dyn Provider>,

    /// Orchestration options
    options: BatchOptions,
}

impl BatchTranslator {
    /// Create a new batch translator
    pub fn new(provider: Arc<dyn Provider>, options: BatchOptions) -> Self {
        Self { provider, options }
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// Translate a batch, falling back to source text on any failure
    pub async fn translate(
        &self,
        batch: &TranslationBatch,
        source_language: &str,
        target_language: &str,
    ) -> BatchOutcome {
        if batch.is_empty() {
            debug!("No translatable lines, skipping translation request");
            return BatchOutcome::skipped();
        }

        match self.options.mode {
            TranslationMode::Batch => self.translate_whole(batch, source_language, target_language).await,
            TranslationMode::PerLine => self.translate_per_line(batch, source_language, target_language).await,
        }
    }

    fn timeout_error(&self) -> TranslationError {
        TranslationError::Unavailable(ProviderError::Timeout(self.options.timeout.as_secs()))
    }

    /// One request carrying every line
    async fn translate_whole(
        &self,
        batch: &TranslationBatch,
        source_language: &str,
        target_language: &str,
    ) -> BatchOutcome {
        let texts = batch.texts();
        let start_time = Instant::now();

        let call = self.provider.translate_batch(&texts, source_language, target_language);
        let result = match tokio::time::timeout(self.options.timeout, call).await {
            Ok(Ok(translations)) => TranslationResult::new(translations).correlate(batch),
            Ok(Err(e)) => Err(TranslationError::from(e)),
            Err(_) => Err(self.timeout_error()),
        };

        let request_duration = start_time.elapsed();

        match result {
            Ok(substitutions) => {
                debug!(
                    "Batch of {} lines translated by {} in {:?}",
                    batch.len(),
                    self.provider.name(),
                    request_duration
                );
                BatchOutcome {
                    substitutions,
                    status: BatchStatus::Translated,
                    requests: 1,
                    request_duration,
                }
            }
            Err(e) => {
                warn!("Batch translation failed, keeping {} source lines: {}", batch.len(), e);
                BatchOutcome {
                    substitutions: Vec::new(),
                    status: BatchStatus::Fallback { reason: e.to_string() },
                    requests: 1,
                    request_duration,
                }
            }
        }
    }

    /// One request per line, each with its own fallback
    async fn translate_per_line(
        &self,
        batch: &TranslationBatch,
        source_language: &str,
        target_language: &str,
    ) -> BatchOutcome {
        let start_time = Instant::now();
        let concurrency = self.options.max_concurrent_requests.max(1);

        let mut results = stream::iter(batch.entries().iter().enumerate())
            .map(|(index, entry)| async move {
                let call = self.provider.translate_text(&entry.text, source_language, target_language);
                let result = match tokio::time::timeout(self.options.timeout, call).await {
                    Ok(Ok(translated)) => Ok(translated),
                    Ok(Err(e)) => Err(TranslationError::from(e)),
                    Err(_) => Err(self.timeout_error()),
                };
                (index, entry, result)
            })
            .buffer_unordered(concurrency)
            .collect::<Vec<_>>()
            .await;

        // Restore batch order before substitution
        results.sort_by_key(|(index, _, _)| *index);

        let mut substitutions = Vec::with_capacity(results.len());
        let mut errors = Vec::new();

        for (_, entry, result) in results {
            match result {
                Ok(translated) => substitutions.extend(substitution_for(entry, translated)),
                Err(e) => {
                    warn!("Line {} kept its source text: {}", entry.position, e);
                    errors.push(e.to_string());
                }
            }
        }

        let status = if errors.is_empty() {
            BatchStatus::Translated
        } else if errors.len() == batch.len() {
            BatchStatus::Fallback { reason: errors.remove(0) }
        } else {
            BatchStatus::Partial { failed: errors.len() }
        };

        BatchOutcome {
            substitutions,
            status,
            requests: batch.len(),
            request_duration: start_time.elapsed(),
        }
    }
}
