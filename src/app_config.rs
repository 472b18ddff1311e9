use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::caption_decoder::DEFAULT_FONT_MARKER;
use crate::project_file::DEFAULT_CAPTION_PARAMETER_ID;
use crate::proofread::PromptTemplate;
use crate::script::RenderOptions;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Script formatting switches
    #[serde(default)]
    pub formatting: RenderOptions,

    /// Sequence XML import settings
    #[serde(default)]
    pub project_file: ProjectFileConfig,

    /// Proofreading config
    #[serde(default)]
    pub proofreading: ProofreadConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Sequence XML import settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProjectFileConfig {
    /// `parameterid` of the caption source text parameter
    #[serde(default = "default_caption_parameter_id")]
    pub caption_parameter_id: String,

    /// Font name that precedes caption text in decoded payloads
    #[serde(default = "default_font_marker")]
    pub font_marker: String,
}

impl Default for ProjectFileConfig {
    fn default() -> Self {
        Self {
            caption_parameter_id: default_caption_parameter_id(),
            font_marker: default_font_marker(),
        }
    }
}

/// Proofreading service type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProofreadProvider {
    // @provider: Google Gemini
    #[default]
    Gemini,
    // @provider: Anthropic
    Anthropic,
}

impl ProofreadProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Gemini => "Gemini",
            Self::Anthropic => "Anthropic",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Gemini => "gemini".to_string(),
            Self::Anthropic => "anthropic".to_string(),
        }
    }

    // @returns: Environment variable holding the API key
    pub fn api_key_env_var(&self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

// Implement Display trait for ProofreadProvider
impl std::fmt::Display for ProofreadProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for ProofreadProvider
impl std::str::FromStr for ProofreadProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "anthropic" => Ok(Self::Anthropic),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: ProofreadProvider) -> Self {
        match provider_type {
            ProofreadProvider::Gemini => Self {
                provider_type: "gemini".to_string(),
                model: default_gemini_model(),
                api_key: String::new(),
                endpoint: default_gemini_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
            ProofreadProvider::Anthropic => Self {
                provider_type: "anthropic".to_string(),
                model: default_anthropic_model(),
                api_key: String::new(),
                endpoint: default_anthropic_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
        }
    }
}

/// Proofreading service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProofreadConfig {
    /// Whether to run the proofreading round trip
    #[serde(default)]
    pub enabled: bool,

    /// Proofreading provider to use
    #[serde(default)]
    pub provider: ProofreadProvider,

    /// Available proofreading providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Prompt template; `{blocks}` receives the numbered block list
    #[serde(default = "default_prompt_template")]
    pub prompt_template: String,
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

fn default_caption_parameter_id() -> String {
    DEFAULT_CAPTION_PARAMETER_ID.to_string()
}

fn default_font_marker() -> String {
    DEFAULT_FONT_MARKER.to_string()
}

fn default_timeout_secs() -> u64 {
    // Proofreading a long script can take minutes
    180
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

fn default_prompt_template() -> String {
    PromptTemplate::PROOFREADER.to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.project_file.caption_parameter_id.trim().is_empty() {
            return Err(anyhow!("Caption parameter id must not be empty"));
        }

        if self.project_file.font_marker.is_empty() {
            return Err(anyhow!("Caption font marker must not be empty"));
        }

        if self.proofreading.enabled {
            if self.proofreading.get_api_key().is_empty() {
                return Err(anyhow!(
                    "API key is required for {} proofreading (set it in the config or {})",
                    self.proofreading.provider.display_name(),
                    self.proofreading.provider.api_key_env_var()
                ));
            }

            if !self.proofreading.prompt_template.contains("{blocks}") {
                return Err(anyhow!("Proofreading prompt template must contain a {{blocks}} placeholder"));
            }
        }

        Ok(())
    }
}

impl ProofreadConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        let provider_str = self.provider.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        // Default fallback based on provider type
        match self.provider {
            ProofreadProvider::Gemini => default_gemini_model(),
            ProofreadProvider::Anthropic => default_anthropic_model(),
        }
    }

    /// Get the API key for the active provider, falling back to its
    /// environment variable
    pub fn get_api_key(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.api_key.is_empty() {
                return provider_config.api_key.clone();
            }
        }

        std::env::var(self.provider.api_key_env_var()).unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        // Default fallback based on provider type
        match self.provider {
            ProofreadProvider::Gemini => default_gemini_endpoint(),
            ProofreadProvider::Anthropic => default_anthropic_endpoint(),
        }
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        self.get_active_provider_config()
            .map(|p| p.timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or_else(default_timeout_secs)
    }

    /// Set the model of the active provider, adding its entry when missing
    pub fn set_model(&mut self, model: &str) {
        let provider_str = self.provider.to_lowercase_string();
        match self.available_providers.iter_mut().find(|p| p.provider_type == provider_str) {
            Some(provider_config) => provider_config.model = model.to_string(),
            None => {
                let mut provider_config = ProviderConfig::new(self.provider.clone());
                provider_config.model = model.to_string();
                self.available_providers.push(provider_config);
            }
        }
    }

    /// The prompt template as configured
    pub fn prompt(&self) -> PromptTemplate {
        PromptTemplate::new(&self.prompt_template)
    }
}

impl Default for ProofreadConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: ProofreadProvider::default(),
            available_providers: vec![
                ProviderConfig::new(ProofreadProvider::Gemini),
                ProviderConfig::new(ProofreadProvider::Anthropic),
            ],
            prompt_template: default_prompt_template(),
        }
    }
}
