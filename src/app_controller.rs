use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

use crate::app_config::Config;
use crate::file_utils::{FileManager, SUBTITLE_EXTENSION};
use crate::fragments::{clean_merged, FragmentFetcher};
use crate::interceptor::{DocumentSource, HttpDocumentSource};
use crate::language_utils;
use crate::subtitle_processor::SubtitleDocument;
use crate::translation::{BatchStatus, TranslationOutcome, TranslationService};

// @module: Application controller for subtitle translation workflows

/// What happened to one input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileResult {
    /// Translated document written to this path
    Written(PathBuf),
    /// Output already existed and overwriting was not requested
    Skipped(PathBuf),
}

/// Main application controller for subtitle translation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Translation pipeline
    service: TranslationService,

    // @field: Remote document source
    source: Arc<dyn DocumentSource>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let service = TranslationService::new(&config)?;
        let source = HttpDocumentSource::new(config.interceptor.fetch_timeout_secs)
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;
        Ok(Self::with_parts(config, service, Arc::new(source)))
    }

    /// Create a controller from explicit collaborators
    pub fn with_parts(config: Config, service: TranslationService, source: Arc<dyn DocumentSource>) -> Self {
        if language_utils::language_codes_match(&config.source_language, &config.target_language) {
            warn!(
                "Source and target language are both '{}', translations will likely echo the input",
                config.target_language
            );
        }

        Self {
            config,
            service,
            source,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check that the translation service answers before doing real work
    pub async fn test_connection(&self) -> Result<()> {
        self.service.test_connection().await
    }

    /// Run the workflow for a file, a directory or a URL
    pub async fn run(&self, input: &str, output_dir: Option<PathBuf>, force_overwrite: bool) -> Result<()> {
        if is_url(input) {
            let output_dir = output_dir.unwrap_or_else(|| PathBuf::from("."));
            self.translate_url(input, &output_dir, force_overwrite).await?;
            return Ok(());
        }

        let input_path = PathBuf::from(input);
        if input_path.is_file() {
            let output_dir = output_dir
                .unwrap_or_else(|| input_path.parent().unwrap_or(Path::new(".")).to_path_buf());
            self.translate_file(&input_path, &output_dir, force_overwrite).await?;
            Ok(())
        } else if input_path.is_dir() {
            self.run_folder(&input_path, force_overwrite).await
        } else {
            Err(anyhow!("Input path does not exist: {:?}", input_path))
        }
    }

    /// Output path for a translated document
    pub fn output_path(&self, input_name: &Path, output_dir: &Path) -> PathBuf {
        FileManager::generate_output_path(input_name, output_dir, &self.config.target_language, SUBTITLE_EXTENSION)
    }

    /// Translate one caption file
    pub async fn translate_file(&self, input_file: &Path, output_dir: &Path, force_overwrite: bool) -> Result<FileResult> {
        let output_path = self.output_path(input_file, output_dir);
        if output_path.exists() && !force_overwrite {
            warn!("Skipping {:?}, translation already exists (use -f to force overwrite)", input_file);
            return Ok(FileResult::Skipped(output_path));
        }

        let content = FileManager::read_to_string(input_file)?;
        let document = SubtitleDocument::parse(&content).with_source(input_file.to_string_lossy());
        let outcome = self.service.translate_document(&document).await;

        self.save(&outcome, &output_path)?;
        Ok(FileResult::Written(output_path))
    }

    /// Fetch and translate one caption document from a URL
    pub async fn translate_url(&self, url: &str, output_dir: &Path, force_overwrite: bool) -> Result<FileResult> {
        let output_path = self.output_path(&url_file_name(url)?, output_dir);
        if output_path.exists() && !force_overwrite {
            warn!("Skipping {}, translation already exists (use -f to force overwrite)", url);
            return Ok(FileResult::Skipped(output_path));
        }

        let fetched = self.source.fetch(url).await?;
        if !fetched.is_success() {
            return Err(anyhow!("Failed to fetch {}: status {}", url, fetched.status));
        }

        let document = SubtitleDocument::parse(&fetched.body).with_source(url);
        let outcome = self.service.translate_document(&document).await;

        self.save(&outcome, &output_path)?;
        Ok(FileResult::Written(output_path))
    }

    /// Download every fragment of a segmented stream, merge, clean and translate it
    ///
    /// Writes `<name>.vtt` with the cleaned source document and
    /// `<name>.<lang>.vtt` with the translation.
    pub async fn run_fragments(
        &self,
        template: &str,
        output_dir: &Path,
        name: &str,
        force_overwrite: bool,
    ) -> Result<FileResult> {
        let cleaned_path = output_dir.join(format!("{}.{}", name, SUBTITLE_EXTENSION));
        let output_path = self.output_path(&cleaned_path, output_dir);
        if output_path.exists() && !force_overwrite {
            warn!("Skipping {}, translation already exists (use -f to force overwrite)", name);
            return Ok(FileResult::Skipped(output_path));
        }

        let progress_bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        progress_bar.set_style(style);
        progress_bar.enable_steady_tick(Duration::from_millis(120));

        let fetcher = FragmentFetcher::new(self.source.clone(), self.config.fragments.max_fragments);
        let merged = fetcher
            .fetch_all(template, |index| progress_bar.set_message(format!("Fetching fragment {}", index)))
            .await;
        progress_bar.finish_and_clear();
        let merged = merged?;

        info!("Merged {} fragments ({} failed)", merged.fetched, merged.failed);

        let cleaned = clean_merged(&merged.text, &self.config.classifier);
        FileManager::write_to_file(&cleaned_path, &cleaned)?;
        info!("Cleaned subtitles saved to {:?}", cleaned_path);

        let document = SubtitleDocument::parse(&cleaned).with_source(template);
        let outcome = self.service.translate_document(&document).await;

        self.save(&outcome, &output_path)?;
        Ok(FileResult::Written(output_path))
    }

    /// Translate every caption file in a directory
    /// Files that are themselves translations are left alone
    pub async fn run_folder(&self, input_dir: &Path, force_overwrite: bool) -> Result<()> {
        let start_time = Instant::now();

        let target_suffix = format!(".{}.{}", self.config.target_language, SUBTITLE_EXTENSION);
        let files: Vec<PathBuf> = FileManager::find_files(input_dir, SUBTITLE_EXTENSION)?
            .into_iter()
            .filter(|path| !path.to_string_lossy().ends_with(&target_suffix))
            .collect();

        if files.is_empty() {
            return Err(anyhow!("No subtitle files found in directory: {:?}", input_dir));
        }

        let mut success_count = 0;
        let mut error_count = 0;
        let mut skip_count = 0;

        for file in &files {
            let output_dir = file.parent().unwrap_or(input_dir).to_path_buf();
            match self.translate_file(file, &output_dir, force_overwrite).await {
                Ok(FileResult::Written(_)) => success_count += 1,
                Ok(FileResult::Skipped(_)) => skip_count += 1,
                Err(e) => {
                    error!("Error processing file {:?}: {}", file, e);
                    error_count += 1;
                }
            }
        }

        info!(
            "Folder processing completed: {} processed, {} skipped, {} errors in {}",
            success_count,
            skip_count,
            error_count,
            Self::format_duration(start_time.elapsed())
        );

        Ok(())
    }

    fn save(&self, outcome: &TranslationOutcome, output_path: &Path) -> Result<()> {
        FileManager::write_to_file(output_path, &outcome.text)
            .with_context(|| format!("Failed to save translated subtitles to {:?}", output_path))?;

        match &outcome.status {
            BatchStatus::Fallback { .. } => warn!("Saved untranslated subtitles to {:?}", output_path),
            _ => info!(
                "Translated subtitles saved to {:?} in {}",
                output_path,
                Self::format_duration(outcome.stats.elapsed)
            ),
        }
        Ok(())
    }

    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Last path segment of a URL, used to name the output file
fn url_file_name(url: &str) -> Result<PathBuf> {
    let parsed = Url::parse(url).with_context(|| format!("Invalid URL: {}", url))?;
    let name = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .unwrap_or("subtitles.vtt");
    Ok(PathBuf::from(name))
}
