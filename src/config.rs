use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Files tried, in order, when no explicit path is given
pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["conf.yaml", "conf.json"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,
    #[serde(default)]
    pub stt_config: SttConfig,
    #[serde(default)]
    pub qa_config: QaConfig,
    #[serde(default)]
    pub tts_config: TtsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound on an inbound request body
    #[serde(default = "default_max_request_bytes")]
    pub max_request_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_request_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_region() -> String {
    "uksouth".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn timeout_from_ms(timeout_ms: u64) -> Duration {
    Duration::from_millis(timeout_ms.max(1))
}

/// Speech-to-text (Azure speech REST API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttConfig {
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Overrides the region-derived endpoint
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub subscription_key: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl SttConfig {
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!(
                "https://{}.stt.speech.microsoft.com/speech/recognition/conversation/cognitiveservices/v1?language={}",
                self.region, self.language
            ),
        }
    }

    pub fn timeout(&self) -> Duration {
        timeout_from_ms(self.timeout_ms)
    }
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            language: default_language(),
            endpoint: None,
            subscription_key: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QaProvider {
    /// POST `{"text": ...}` to an answering service
    #[default]
    Json,
    /// GET `?appid=..&i=..` against a short-answers API
    ShortAnswers,
}

/// Question answering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaConfig {
    #[serde(default)]
    pub provider: QaProvider,
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Only used by the short-answers provider
    #[serde(default)]
    pub app_id: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl QaConfig {
    pub fn endpoint_url(&self) -> String {
        match (&self.endpoint, self.provider) {
            (Some(endpoint), _) => endpoint.clone(),
            (None, QaProvider::Json) => "http://localhost:3001/alpha".to_string(),
            (None, QaProvider::ShortAnswers) => "http://api.wolframalpha.com/v1/result".to_string(),
        }
    }

    pub fn timeout(&self) -> Duration {
        timeout_from_ms(self.timeout_ms)
    }
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            provider: QaProvider::default(),
            endpoint: None,
            app_id: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Fixed voice attributes written into every SSML document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceSettings {
    #[serde(default = "default_ssml_version")]
    pub version: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_voice_name")]
    pub name: String,
}

fn default_ssml_version() -> String {
    "1.0".to_string()
}

fn default_voice_name() -> String {
    "en-US-JennyNeural".to_string()
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            version: default_ssml_version(),
            language: default_language(),
            name: default_voice_name(),
        }
    }
}

/// Text-to-speech (Azure speech REST API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub subscription_key: String,
    #[serde(default = "default_output_format")]
    pub output_format: String,
    #[serde(default)]
    pub voice: VoiceSettings,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_output_format() -> String {
    "riff-16khz-16bit-mono-pcm".to_string()
}

impl TtsConfig {
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!(
                "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
                self.region
            ),
        }
    }

    pub fn timeout(&self) -> Duration {
        timeout_from_ms(self.timeout_ms)
    }
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            endpoint: None,
            subscription_key: String::new(),
            output_format: default_output_format(),
            voice: VoiceSettings::default(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_request_bytes: default_max_request_bytes(),
        }
    }
}

/// Replace `${VAR_NAME}` with the value of the environment variable.
/// Unset variables are left as written.
fn substitute_env_vars(content: &str) -> Result<String> {
    let pattern = Regex::new(r"\$\{(\w+)\}")?;
    let substituted = pattern.replace_all(content, |caps: &regex::Captures| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    });
    Ok(substituted.into_owned())
}

impl Config {
    /// Load a YAML or JSON configuration file, chosen by extension
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            anyhow::bail!("Configuration file not found: {}", path);
        }

        let content = fs::read_to_string(path)?;
        let content = content.trim_start_matches('\u{feff}');
        let content = substitute_env_vars(content)?;

        let path_lower = path.to_lowercase();
        let mut config: Config = if path_lower.ends_with(".json") {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        config.resolve_credentials_from_env();
        Ok(config)
    }

    /// Pick the configuration for the process.
    ///
    /// An explicit path must load. Otherwise the first default file that
    /// exists is loaded, and only when none exists do the defaults apply.
    pub fn discover(explicit: Option<&str>) -> Result<Self> {
        Self::discover_in(explicit, &DEFAULT_CONFIG_PATHS)
    }

    fn discover_in(explicit: Option<&str>, candidates: &[&str]) -> Result<Self> {
        if let Some(path) = explicit {
            let config = Self::load(path)
                .with_context(|| format!("Failed to load configuration from {}", path))?;
            info!("Loaded configuration from: {}", path);
            return Ok(config);
        }

        for path in candidates {
            if Path::new(path).exists() {
                let config = Self::load(path)
                    .with_context(|| format!("Failed to load configuration from {}", path))?;
                info!("Loaded configuration from: {}", path);
                return Ok(config);
            }
        }

        info!("No config file found (tried {:?}), using defaults", candidates);
        Ok(Self::from_env())
    }

    /// Defaults with credentials taken from the environment
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.resolve_credentials_from_env();
        config
    }

    /// Fill empty credentials from `STT_SUBSCRIPTION_KEY`,
    /// `TTS_SUBSCRIPTION_KEY` and `QA_APP_ID`
    pub fn resolve_credentials_from_env(&mut self) {
        fill_from_env(&mut self.stt_config.subscription_key, "STT_SUBSCRIPTION_KEY");
        fill_from_env(&mut self.tts_config.subscription_key, "TTS_SUBSCRIPTION_KEY");
        fill_from_env(&mut self.qa_config.app_id, "QA_APP_ID");
    }
}

fn fill_from_env(slot: &mut String, var: &str) {
    if slot.is_empty() {
        if let Ok(value) = std::env::var(var) {
            *slot = value;
        }
    }
}
