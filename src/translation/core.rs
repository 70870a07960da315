/*!
 * Core translation service implementation.
 *
 * This module contains the `TranslationService`, which runs one caption
 * document through the classify → translate → reassemble pipeline. The
 * service holds no per-document state, so one instance can translate any
 * number of documents concurrently.
 */

use anyhow::{anyhow, Result};
use log::{info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::{Config, TranslationProvider as ConfigTranslationProvider};
use crate::language_utils;
use crate::providers::http::HttpTranslator;
use crate::providers::mock::MockProvider;
use crate::providers::Provider;
use crate::subtitle_processor::SubtitleDocument;

use super::batch::{BatchOptions, BatchStatus, BatchTranslator, TranslationBatch};
use super::classifier::CueClassifier;
use super::reassembly::Reassembler;

/// Statistics for one document translation
#[derive(Debug, Clone)]
pub struct TranslationStats {
    /// Lines in the document
    pub total_lines: usize,

    /// Lines classified as translatable
    pub translatable_lines: usize,

    /// Lines replaced with a translation
    pub substituted_lines: usize,

    /// Translatable lines that kept their source text
    pub fallback_lines: usize,

    /// Outbound requests issued
    pub requests: usize,

    /// Time spent waiting on the provider
    pub request_duration: Duration,

    /// Time spent in the whole pipeline
    pub elapsed: Duration,
}

impl TranslationStats {
    /// Generate a summary of the run
    pub fn summary(&self) -> String {
        format!(
            "Translation Summary:\n\
             Lines: {}\n\
             Translatable lines: {}\n\
             Translated lines: {}\n\
             Kept source lines: {}\n\
             Requests: {}\n\
             Request time: {:.2}s\n\
             Total time: {:.2}s",
            self.total_lines,
            self.translatable_lines,
            self.substituted_lines,
            self.fallback_lines,
            self.requests,
            self.request_duration.as_secs_f64(),
            self.elapsed.as_secs_f64(),
        )
    }
}

/// What a pipeline run produced
///
/// `text` is always a displayable document; when translation failed it is
/// the input unchanged.
#[derive(Debug, Clone)]
pub struct TranslationOutcome {
    /// Translated (or untouched) document text
    pub text: String,
    /// How the translation went
    pub status: BatchStatus,
    /// Run statistics
    pub stats: TranslationStats,
}

impl TranslationOutcome {
    /// Whether any line was translated
    pub fn is_translated(&self) -> bool {
        self.stats.substituted_lines > 0
    }
}

/// Main translation service for caption documents
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// Line classifier
    classifier: CueClassifier,

    /// Batch orchestrator
    translator: BatchTranslator,

    /// Source language hint
    source_language: String,

    /// Target language hint
    target_language: String,
}

/// Normalize a language code for the service, keeping the input if it is unknown
fn language_hint(code: &str) -> String {
    match language_utils::normalize_to_part1_or_part2t(code) {
        Ok(lang) => lang,
        Err(e) => {
            warn!("Language code issue: {}", e);
            code.to_string()
        }
    }
}

/// Build the provider selected in the configuration
pub fn provider_from_config(config: &Config) -> Result<Arc<dyn Provider>> {
    let provider: Arc<dyn Provider> = match config.translation.provider {
        ConfigTranslationProvider::Http => Arc::new(
            HttpTranslator::new(&config.translation.endpoint, config.translation.timeout_secs)
                .map_err(|e| anyhow!("Failed to create HTTP translator: {}", e))?,
        ),
        ConfigTranslationProvider::Mock => Arc::new(MockProvider::working()),
    };
    Ok(provider)
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: &Config) -> Result<Self> {
        let provider = provider_from_config(config)?;
        Ok(Self::with_provider(config, provider))
    }

    /// Create a service around an existing provider
    pub fn with_provider(config: &Config, provider: Arc<dyn Provider>) -> Self {
        let options = BatchOptions {
            mode: config.translation.mode,
            timeout: Duration::from_secs(config.translation.timeout_secs),
            max_concurrent_requests: config.translation.concurrent_requests,
        };

        Self {
            classifier: CueClassifier::new(config.classifier.clone()),
            translator: BatchTranslator::new(provider, options),
            source_language: language_hint(&config.source_language),
            target_language: language_hint(&config.target_language),
        }
    }

    pub fn classifier(&self) -> &CueClassifier {
        &self.classifier
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// Translate raw document text
    pub async fn translate_text(&self, raw: &str) -> TranslationOutcome {
        self.translate_document(&SubtitleDocument::parse(raw)).await
    }

    /// Run one document through classification, translation and reassembly
    pub async fn translate_document(&self, document: &SubtitleDocument) -> TranslationOutcome {
        let start_time = Instant::now();

        let classified = self.classifier.classify_document(document);
        let batch = TranslationBatch::collect(classified);

        let outcome = self
            .translator
            .translate(&batch, &self.source_language, &self.target_language)
            .await;

        let text = Reassembler::reassemble(document, &outcome.substitutions);

        let stats = TranslationStats {
            total_lines: document.len(),
            translatable_lines: batch.len(),
            substituted_lines: outcome.substitutions.len(),
            fallback_lines: batch.len() - outcome.substitutions.len(),
            requests: outcome.requests,
            request_duration: outcome.request_duration,
            elapsed: start_time.elapsed(),
        };

        let source = document.source().unwrap_or("document");
        match &outcome.status {
            BatchStatus::Translated => info!(
                "Translated {} of {} lines in {}",
                stats.substituted_lines, stats.translatable_lines, source
            ),
            BatchStatus::Skipped => info!("No translatable lines in {}, passing through", source),
            BatchStatus::Fallback { reason } => warn!(
                "Translation of {} failed, showing source text: {}",
                source, reason
            ),
            BatchStatus::Partial { failed } => warn!(
                "{} of {} lines in {} kept their source text",
                failed, stats.translatable_lines, source
            ),
        }

        TranslationOutcome {
            text,
            status: outcome.status,
            stats,
        }
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<()> {
        self.translator
            .provider()
            .test_connection(&self.source_language, &self.target_language)
            .await
            .map_err(|e| anyhow!("Translation service is not reachable: {}", e))
    }
}
