// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use vttlate::app_config::{self, Config, TranslationMode, TranslationProvider};
use vttlate::app_controller::Controller;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Http,
    Mock,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Http => TranslationProvider::Http,
            CliTranslationProvider::Mock => TranslationProvider::Mock,
        }
    }
}

/// CLI Wrapper for TranslationMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationMode {
    Batch,
    PerLine,
}

impl From<CliTranslationMode> for TranslationMode {
    fn from(cli_mode: CliTranslationMode) -> Self {
        match cli_mode {
            CliTranslationMode::Batch => TranslationMode::Batch,
            CliTranslationMode::PerLine => TranslationMode::PerLine,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// Options shared by every command that translates
#[derive(Args, Debug)]
struct CommonArgs {
    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Base URL of the translation server
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Send all lines in one request or one request per line
    #[arg(short, long, value_enum)]
    mode: Option<CliTranslationMode>,

    /// Source language code (e.g., 'et', 'en', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'et', 'en', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Skip the connection check before translating
    #[arg(long)]
    no_check: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a WebVTT file, a directory of them, or a URL
    Translate {
        /// Input file, directory or http(s) URL
        #[arg(value_name = "INPUT")]
        input: String,

        /// Directory for translated files
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Download a segmented subtitle stream, clean it and translate it
    Fragments {
        /// Fragment URL with '{}' where the fragment number goes
        #[arg(value_name = "URL_TEMPLATE")]
        template: String,

        /// Base name of the output files
        #[arg(short, long, default_value = "subtitles")]
        name: String,

        /// Directory for the cleaned and translated files
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Generate shell completions for vttlate
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// vttlate - WebVTT subtitle translation
///
/// Translates the spoken text of WebVTT subtitles through a translation
/// server while keeping headers, timings and cue numbers untouched.
#[derive(Parser, Debug)]
#[command(name = "vttlate")]
#[command(version)]
#[command(about = "WebVTT subtitle translation tool")]
#[command(long_about = "vttlate translates WebVTT subtitles through a translation server.

EXAMPLES:
    vttlate translate episode.vtt                          # Translate using default config
    vttlate translate -f episode.vtt                       # Force overwrite existing files
    vttlate translate -s et -t en /subtitles/              # Translate a whole directory
    vttlate translate https://vod.example/episode.vtt      # Fetch and translate a URL
    vttlate translate -m per-line episode.vtt              # One request per line
    vttlate fragments -n episode 'https://vod.example/fragment-{}-f4.vtt'
    vttlate completions bash > vttlate.bash                # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Start at trace so the level from the CLI or config can narrow it later
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "vttlate", &mut std::io::stdout());
            Ok(())
        }
        Commands::Translate { input, output_dir, common } => {
            let controller = build_controller(&common).await?;
            controller.run(&input, output_dir, common.force_overwrite).await
        }
        Commands::Fragments { template, name, output_dir, common } => {
            let controller = build_controller(&common).await?;
            controller
                .run_fragments(&template, &output_dir, &name, common.force_overwrite)
                .await?;
            Ok(())
        }
    }
}

/// Load the configuration, apply CLI overrides and build the controller
async fn build_controller(options: &CommonArgs) -> Result<Controller> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&options.config_path)?;
    apply_overrides(&mut config, options);

    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, use the one from config
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;

    if !options.no_check {
        if let Err(e) = controller.test_connection().await {
            warn!("{}; lines that cannot be translated will be kept as they are", e);
        }
    }

    Ok(controller)
}

fn apply_overrides(config: &mut Config, options: &CommonArgs) {
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(endpoint) = &options.endpoint {
        config.translation.endpoint = endpoint.clone();
    }

    if let Some(mode) = &options.mode {
        config.translation.mode = mode.clone().into();
    }

    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }

    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}
