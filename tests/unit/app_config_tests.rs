/*!
 * Tests for application configuration functionality
 */

use syncraft::app_config::{Config, LogLevel, ProofreadProvider, ProviderConfig};

fn set_api_key(config: &mut Config, provider_type: &str, api_key: &str) {
    if let Some(provider) = config.proofreading
        .available_providers
        .iter_mut()
        .find(|p| p.provider_type == provider_type) {
        provider.api_key = api_key.to_string();
    }
}

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert!(config.formatting.force_speaker_tag);
    assert!(!config.formatting.colon_style);
    assert_eq!(config.project_file.caption_parameter_id, "1");
    assert_eq!(config.project_file.font_marker, "KozMinPro-Regular");
    assert!(!config.proofreading.enabled);
    assert_eq!(config.proofreading.provider, ProofreadProvider::Gemini);
    assert_eq!(config.proofreading.available_providers.len(), 2);
    assert_eq!(config.proofreading.get_timeout_secs(), 180);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.project_file.caption_parameter_id = " ".to_string();
    assert!(config.validate().is_err());
    config.project_file.caption_parameter_id = "1".to_string();

    config.project_file.font_marker = String::new();
    assert!(config.validate().is_err());
    config.project_file.font_marker = "KozMinPro-Regular".to_string();

    // Proofreading with a key set in the config file
    config.proofreading.enabled = true;
    config.proofreading.provider = ProofreadProvider::Anthropic;
    set_api_key(&mut config, "anthropic", "sk-ant-test");
    assert!(config.validate().is_ok());

    config.proofreading.prompt_template = "no placeholder".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_withProofreadingDisabled_shouldNotNeedKey() {
    let mut config = Config::default();
    set_api_key(&mut config, "gemini", "");
    config.proofreading.prompt_template = String::new();
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_deserialize_withPartialJson_shouldFillDefaults() {
    let json = r#"{
        "formatting": { "colon_style": true },
        "proofreading": {
            "enabled": true,
            "provider": "anthropic",
            "available_providers": [
                { "type": "anthropic", "model": "claude-test", "api_key": "key" }
            ]
        },
        "log_level": "debug"
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();

    assert!(config.formatting.colon_style);
    assert!(config.formatting.force_speaker_tag);
    assert_eq!(config.project_file.caption_parameter_id, "1");
    assert_eq!(config.proofreading.provider, ProofreadProvider::Anthropic);
    assert_eq!(config.proofreading.get_model(), "claude-test");
    assert_eq!(config.proofreading.get_api_key(), "key");
    assert_eq!(config.proofreading.get_endpoint(), "https://api.anthropic.com");
    assert!(config.proofreading.prompt_template.contains("{blocks}"));
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_roundtrip_shouldPreserveValues() {
    let mut config = Config::default();
    config.formatting.colon_style = true;
    config.proofreading.provider = ProofreadProvider::Anthropic;

    let json = serde_json::to_string_pretty(&config).unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();

    assert!(parsed.formatting.colon_style);
    assert_eq!(parsed.proofreading.provider, ProofreadProvider::Anthropic);
    assert_eq!(parsed.proofreading.available_providers.len(), 2);
}

#[test]
fn test_set_model_withMissingProvider_shouldAddEntry() {
    let mut config = Config::default();
    config.proofreading.available_providers.clear();
    config.proofreading.provider = ProofreadProvider::Gemini;

    config.proofreading.set_model("gemini-test");

    assert_eq!(config.proofreading.available_providers.len(), 1);
    assert_eq!(config.proofreading.get_model(), "gemini-test");
    assert!(config.proofreading.get_endpoint().starts_with("https://generativelanguage"));
}

#[test]
fn test_provider_config_new_shouldUseProviderDefaults() {
    let gemini = ProviderConfig::new(ProofreadProvider::Gemini);
    assert_eq!(gemini.provider_type, "gemini");
    assert!(!gemini.model.is_empty());
    assert!(gemini.api_key.is_empty());

    let anthropic = ProviderConfig::new(ProofreadProvider::Anthropic);
    assert_eq!(anthropic.provider_type, "anthropic");
}

#[test]
fn test_proofread_provider_fromStr_shouldIgnoreCase() {
    assert_eq!("Gemini".parse::<ProofreadProvider>().unwrap(), ProofreadProvider::Gemini);
    assert_eq!("ANTHROPIC".parse::<ProofreadProvider>().unwrap(), ProofreadProvider::Anthropic);
    assert!("openai".parse::<ProofreadProvider>().is_err());
    assert_eq!(ProofreadProvider::Anthropic.to_string(), "anthropic");
    assert_eq!(ProofreadProvider::Gemini.api_key_env_var(), "GEMINI_API_KEY");
}
