/*!
 * Subtitle request interception.
 *
 * An interceptor is an explicit object placed in a request path. It is
 * built once with a URL pattern, a document source and a translation
 * service; matching requests get their complete document fetched and
 * translated, everything else passes through. `uninstall` switches it off
 * for good without tearing down the request path around it.
 */

use async_trait::async_trait;
use log::{debug, info};
use regex::Regex;
use reqwest::Client;
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::errors::AppError;
use crate::subtitle_processor::SubtitleDocument;
use crate::translation::{TranslationOutcome, TranslationService};

/// Content type of every translated response
pub const VTT_CONTENT_TYPE: &str = "text/vtt; charset=utf-8";

/// A fully read response from a document source
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// Requested URL
    pub url: String,
    /// HTTP status of the response
    pub status: u16,
    /// Complete body text
    pub body: String,
}

impl FetchedDocument {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Produces complete document text for a resource
///
/// Returns `Err` only when no response was obtained at all; any HTTP
/// status is reported through `FetchedDocument::status`.
#[async_trait]
pub trait DocumentSource: Send + Sync + Debug {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, AppError>;
}

/// Document source backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpDocumentSource {
    client: Client,
}

impl HttpDocumentSource {
    pub fn new(timeout_secs: u64) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, AppError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Fetch(format!("Failed to fetch {}: {}", url, e)))?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Fetch(format!("Failed to read body of {}: {}", url, e)))?;

        Ok(FetchedDocument {
            url: url.to_string(),
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

/// Response handed back to the caller for an intercepted request
#[derive(Debug, Clone)]
pub struct InterceptedResponse {
    /// Requested URL
    pub url: String,
    /// Status of the original response
    pub status: u16,
    /// Always `VTT_CONTENT_TYPE`
    pub content_type: &'static str,
    /// Translated document
    pub body: String,
    /// Pipeline report
    pub outcome: TranslationOutcome,
}

/// What the interceptor did with a request
#[derive(Debug, Clone)]
pub enum Interception {
    /// Not a subtitle request (or interceptor uninstalled)
    PassThrough,
    /// Subtitle document fetched and translated
    Translated(InterceptedResponse),
}

/// Interceptor for subtitle document requests
#[derive(Debug)]
pub struct SubtitleInterceptor {
    /// URLs handled by this interceptor
    pattern: Regex,
    /// Where documents come from
    source: Arc<dyn DocumentSource>,
    /// Translation pipeline
    service: TranslationService,
    /// Cleared by `uninstall`
    active: AtomicBool,
}

impl SubtitleInterceptor {
    /// Build an active interceptor
    pub fn install(
        pattern: &str,
        source: Arc<dyn DocumentSource>,
        service: TranslationService,
    ) -> Result<Self, AppError> {
        let pattern = Regex::new(pattern)
            .map_err(|e| AppError::Config(format!("Invalid subtitle URL pattern: {}", e)))?;
        info!("Subtitle interceptor installed for {}", pattern.as_str());

        Ok(Self {
            pattern,
            source,
            service,
            active: AtomicBool::new(true),
        })
    }

    /// Build an interceptor from configuration with an HTTP document source
    pub fn from_config(config: &Config, service: TranslationService) -> Result<Self, AppError> {
        let source = HttpDocumentSource::new(config.interceptor.fetch_timeout_secs)?;
        Self::install(&config.interceptor.url_pattern, Arc::new(source), service)
    }

    /// Stop intercepting; every later request passes through
    pub fn uninstall(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            info!("Subtitle interceptor uninstalled");
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Whether this interceptor would handle a URL
    pub fn matches(&self, url: &str) -> bool {
        self.is_active() && self.pattern.is_match(url)
    }

    /// Handle one request
    ///
    /// Returns `Err` only for a fetch failure, in which case the pipeline is
    /// never run. Translation problems are absorbed and show up in the
    /// returned outcome.
    pub async fn intercept(&self, url: &str) -> Result<Interception, AppError> {
        if !self.matches(url) {
            return Ok(Interception::PassThrough);
        }

        info!("Intercepted subtitle request: {}", url);
        let fetched = self.source.fetch(url).await?;
        if !fetched.is_success() {
            return Err(AppError::Fetch(format!(
                "{} responded with status {}",
                url, fetched.status
            )));
        }

        Ok(Interception::Translated(self.translate_fetched(fetched).await))
    }

    /// Translate a document that has already been fetched
    pub async fn translate_fetched(&self, fetched: FetchedDocument) -> InterceptedResponse {
        let document = SubtitleDocument::parse(&fetched.body).with_source(fetched.url.clone());
        let outcome = self.service.translate_document(&document).await;
        debug!("{}", outcome.stats.summary());

        InterceptedResponse {
            url: fetched.url,
            status: fetched.status,
            content_type: VTT_CONTENT_TYPE,
            body: outcome.text.clone(),
            outcome,
        }
    }
}
