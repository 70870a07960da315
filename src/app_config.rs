use anyhow::{anyhow, Context, Result};
use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use url::Url;

use crate::translation::classifier::ClassifierRules;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    pub source_language: String,

    /// Target language code (ISO), sent to the service as a hint
    pub target_language: String,

    /// Translation config
    pub translation: TranslationConfig,

    /// Line classification rules
    #[serde(default)]
    pub classifier: ClassifierRules,

    /// Subtitle request interception
    #[serde(default)]
    pub interceptor: InterceptorConfig,

    /// Fragment download settings
    #[serde(default)]
    pub fragments: FragmentConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Translation server speaking the JSON batch protocol
    #[default]
    Http,
    // @provider: Offline mock, marks lines instead of translating
    Mock,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Http => "HTTP",
            Self::Mock => "Mock",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Http => "http".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// How translatable lines are sent to the provider
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TranslationMode {
    /// One request per document carrying every translatable line
    #[default]
    Batch,
    /// One request per line, issued concurrently
    PerLine,
}

impl std::fmt::Display for TranslationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Batch => write!(f, "batch"),
            Self::PerLine => write!(f, "per_line"),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Service URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Batch or per-line requests
    #[serde(default)]
    pub mode: TranslationMode,

    /// Timeout for each outbound request in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of concurrent requests in per-line mode
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            endpoint: default_endpoint(),
            mode: TranslationMode::default(),
            timeout_secs: default_timeout_secs(),
            concurrent_requests: default_concurrent_requests(),
        }
    }
}

/// Which resource URLs are treated as subtitle documents, and how they are fetched
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct InterceptorConfig {
    /// Regular expression matched against request URLs
    #[serde(default = "default_url_pattern")]
    pub url_pattern: String,

    /// Timeout for downloading a subtitle document or fragment
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self {
            url_pattern: default_url_pattern(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

/// Segmented subtitle download settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FragmentConfig {
    /// Upper bound on fragments fetched for one stream
    #[serde(default = "default_max_fragments")]
    pub max_fragments: usize,
}

impl Default for FragmentConfig {
    fn default() -> Self {
        Self {
            max_fragments: default_max_fragments(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_url_pattern() -> String {
    r"^https?://.*\.vtt(\?.*)?$".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_max_fragments() -> usize {
    2000
}

impl Config {
    /// Load a configuration file, creating one with defaults if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {:?}", path))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            return Ok(config);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        if self.translation.provider == TranslationProvider::Http {
            if self.translation.endpoint.trim().is_empty() {
                return Err(anyhow!("Translation endpoint is required for the HTTP provider"));
            }
            Url::parse(&self.translation.endpoint)
                .with_context(|| format!("Invalid translation endpoint: {}", self.translation.endpoint))?;
        }

        if self.translation.timeout_secs == 0 {
            return Err(anyhow!("Translation timeout must be at least one second"));
        }

        if self.translation.concurrent_requests == 0 {
            return Err(anyhow!("Concurrent requests must be at least 1"));
        }

        if self.interceptor.fetch_timeout_secs == 0 {
            return Err(anyhow!("Fetch timeout must be at least one second"));
        }

        Regex::new(&self.interceptor.url_pattern)
            .with_context(|| format!("Invalid subtitle URL pattern: {}", self.interceptor.url_pattern))?;

        if self.classifier.header_token.is_empty() {
            return Err(anyhow!("Classifier header token cannot be empty"));
        }

        if self.classifier.timing_delimiter.is_empty() {
            return Err(anyhow!("Classifier timing delimiter cannot be empty"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "et".to_string(),
            target_language: "en".to_string(),
            translation: TranslationConfig::default(),
            classifier: ClassifierRules::default(),
            interceptor: InterceptorConfig::default(),
            fragments: FragmentConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
