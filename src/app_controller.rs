use anyhow::{Result, anyhow};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::time::Duration;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::errors::ProjectFileError;
use crate::file_utils::{FileManager, InputKind, STDIN_PATH};
use crate::project_file::ProjectFileParser;
use crate::proofread::{self, ProofreadCache, ProofreadReport};
use crate::providers::{self, Proofreader};
use crate::script::{self, HighlightSet, RenderedScript};

// @module: Application controller for narration script conversion

/// Result of one end-to-end conversion
#[derive(Debug, Clone, Default)]
pub struct Conversion {
    /// The final render, with highlights when proofreading found anything
    pub script: RenderedScript,
    /// Proofreading outcome, when proofreading ran
    pub report: Option<ProofreadReport>,
}

/// Main application controller for script conversion
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Proofreading client, present when proofreading is enabled
    proofreader: Option<Box<dyn Proofreader>>,
    // @field: Last proofreading result
    cache: ProofreadCache,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let proofreader = config.proofreading.enabled
            .then(|| providers::from_config(&config.proofreading));

        Ok(Self {
            config,
            proofreader,
            cache: ProofreadCache::new(),
        })
    }

    /// Create a controller that proofreads through the given client
    pub fn with_proofreader(config: Config, proofreader: Box<dyn Proofreader>) -> Self {
        Self {
            config,
            proofreader: Some(proofreader),
            cache: ProofreadCache::new(),
        }
    }

    /// The proofreading result cache
    pub fn cache(&self) -> &ProofreadCache {
        &self.cache
    }

    /// Turn raw input into script text.
    ///
    /// Sequence XML is reduced to timestamp + text blocks; anything else is
    /// returned unchanged.
    pub fn prepare_input(&self, path: &Path, content: &str) -> Result<String, ProjectFileError> {
        match FileManager::detect_input_kind(path, content) {
            InputKind::ProjectFile => {
                info!("Reading sequence XML: {:?}", path);
                let project = &self.config.project_file;
                let parsed = ProjectFileParser::new(&project.caption_parameter_id, &project.font_marker)
                    .parse(content)?;
                Ok(parsed.to_script_text())
            }
            InputKind::Script => Ok(content.to_string()),
        }
    }

    /// Prepare and convert raw input.
    ///
    /// A sequence XML failure takes the place of the script, the same way a
    /// script without timecodes does.
    pub async fn convert_input(&self, path: &Path, content: &str) -> Conversion {
        match self.prepare_input(path, content) {
            Ok(script_text) => self.convert(&script_text).await,
            Err(e) => {
                error!("Could not read sequence XML {:?}: {}", path, e);
                Conversion {
                    script: RenderedScript {
                        script_text: e.to_string(),
                        ..Default::default()
                    },
                    report: None,
                }
            }
        }
    }

    /// Convert script text: render, proofread when enabled, render again
    /// with the flagged blocks highlighted
    pub async fn convert(&self, input_text: &str) -> Conversion {
        let options = &self.config.formatting;
        let first_pass = script::convert_script(input_text, options, &HighlightSet::new());

        let Some(proofreader) = self.proofreader.as_deref() else {
            return Conversion {
                script: first_pass,
                report: None,
            };
        };

        if first_pass.ai_data.is_empty() {
            warn!("Nothing to proofread: {}", first_pass.script_text);
            return Conversion {
                script: first_pass,
                report: None,
            };
        }

        let spinner = Self::proofreading_spinner(proofreader.name());
        let template = self.config.proofreading.prompt();
        let report = proofread::proofread_script(proofreader, &self.cache, &template, input_text, &first_pass).await;
        spinner.finish_and_clear();

        debug!("Highlighting blocks {:?}", report.highlights);
        let script = script::convert_script(input_text, options, &report.highlights);

        Conversion {
            script,
            report: Some(report),
        }
    }

    /// Run the whole workflow on a file (or `-` for standard input), writing
    /// to `output` or printing to standard output
    pub async fn run(&self, input: PathBuf, output: Option<PathBuf>, force_overwrite: bool) -> Result<()> {
        let start_time = std::time::Instant::now();

        if input.as_os_str() != STDIN_PATH && !FileManager::file_exists(&input) {
            return Err(anyhow!("Input file does not exist: {:?}", input));
        }

        if let Some(output) = &output {
            if output.exists() && !force_overwrite {
                warn!("Output file already exists: {:?}. Use -f to force overwrite.", output);
                return Ok(());
            }
        }

        let content = FileManager::read_input(&input)?;
        let conversion = self.convert_input(&input, &content).await;

        match &output {
            Some(output) => {
                FileManager::write_to_file(output, &conversion.script.script_text)?;
                if let Some(report) = &conversion.report {
                    let report_path = FileManager::generate_output_path(output, "proofread.md");
                    FileManager::write_to_file(&report_path, &report.display_text)?;
                    info!("Proofreading report: {:?}", report_path);
                }
                info!("Success: {:?}", output);
            }
            None => {
                println!("{}", conversion.script.script_text);
                if let Some(report) = &conversion.report {
                    println!();
                    println!("---");
                    println!("{}", report.display_text);
                }
            }
        }

        info!(
            "Converted {} blocks in {}.",
            conversion.script.start_times.len(),
            Self::format_duration(start_time.elapsed())
        );

        Ok(())
    }

    fn proofreading_spinner(provider_name: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(format!("{} is proofreading the script...", provider_name));
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }

    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
