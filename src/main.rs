// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use syncraft::app_config::{self, Config, ProofreadProvider};
use syncraft::app_controller::Controller;

/// CLI Wrapper for ProofreadProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliProofreadProvider {
    Gemini,
    Anthropic,
}

impl From<CliProofreadProvider> for ProofreadProvider {
    fn from(cli_provider: CliProofreadProvider) -> Self {
        match cli_provider {
            CliProofreadProvider::Gemini => ProofreadProvider::Gemini,
            CliProofreadProvider::Anthropic => ProofreadProvider::Anthropic,
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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for syncraft
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Syncraft - narration script builder
///
/// Converts caption exports and sequence XML from a video editor into a
/// narration script in the studio layout.
#[derive(Parser, Debug)]
#[command(name = "syncraft")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
#[command(about = "Caption to narration script converter")]
#[command(long_about = "Syncraft converts caption text (timestamp + text blocks) or a sequence XML file into a narration script.

EXAMPLES:
    syncraft captions.txt                      # Print the script for pasted caption text
    syncraft sequence.xml -o script.txt        # Import sequence XML and write the script
    syncraft --colon captions.txt              # Start labels as mm：ss
    syncraft --no-speaker-tag captions.txt     # Do not force the Ｎ speaker tag
    syncraft --proofread captions.txt          # Proofread with the configured LLM service
    pbpaste | syncraft -                       # Read from standard input
    syncraft completions bash > syncraft.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. API keys may also come from GEMINI_API_KEY or
    ANTHROPIC_API_KEY.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    convert: ConvertArgs,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Caption text file or sequence XML file, or - for standard input
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Write the script here instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Do not force the Ｎ speaker tag
    #[arg(long)]
    no_speaker_tag: bool,

    /// Write start labels as mm：ss
    #[arg(long)]
    colon: bool,

    /// Proofread the script with the configured LLM service
    #[arg(long)]
    proofread: bool,

    /// Proofreading provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliProofreadProvider>,

    /// Model name to use for proofreading
    #[arg(short, long)]
    model: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
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

    // @returns: ANSI color code for log level
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
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
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

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger admits everything; the effective level is set through max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "syncraft", &mut std::io::stdout());
            Ok(())
        }
        None => run_convert(cli.convert).await,
    }
}

async fn run_convert(options: ConvertArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let input_path = options.input_path.clone().ok_or_else(|| {
        anyhow!("INPUT_PATH is required when no subcommand is specified")
    })?;

    let config = load_config(&options)?;

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    let controller = Controller::with_config(config)?;
    controller.run(input_path, options.output, options.force_overwrite).await
}

/// Load or create the configuration, then apply command line overrides
fn load_config(options: &ConvertArgs) -> Result<Config> {
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    if options.no_speaker_tag {
        config.formatting.force_speaker_tag = false;
    }

    if options.colon {
        config.formatting.colon_style = true;
    }

    if options.proofread {
        config.proofreading.enabled = true;
    }

    if let Some(provider) = &options.provider {
        config.proofreading.provider = provider.clone().into();
    }

    if let Some(model) = &options.model {
        config.proofreading.set_model(model);
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(config)
}
