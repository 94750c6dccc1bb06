use anyhow::Context;
use serde::Deserialize;

/// Environment variables that override `ai.api_key`, in order of preference.
pub const API_KEY_VARS: [&str; 2] = ["AI_GATEWAY_API_KEY", "LOVABLE_API_KEY"];

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub ai: AiConfig,
}

impl Config {
    /// Load the configuration from a YAML file.
    pub fn load(yml_path: &str) -> anyhow::Result<Self> {
        let yml = std::fs::read_to_string(yml_path)
            .with_context(|| format!("Reading config file {}", yml_path))?;
        let config = serde_yaml::from_str(&yml).context("Parsing config file")?;
        Ok(config)
    }

    /// Load from `yml_path` if given, otherwise start from the defaults,
    /// then apply environment overrides.
    pub fn load_or_default(yml_path: Option<&str>) -> anyhow::Result<Self> {
        let config = match yml_path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_key_from(|name| dotenvy::var(name).ok())
    }

    fn with_key_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let key = API_KEY_VARS
            .iter()
            .filter_map(|&name| lookup(name))
            .find(|key| !key.trim().is_empty());
        if let Some(key) = key {
            self.ai.api_key = Some(key);
        }
        self
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: String,
    pub tls: Option<TLSConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0:3000".into(),
            tls: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct TLSConfig {
    pub cert_path: String,
    pub key_path: String,
}

/// Settings for the chat-completion gateway that writes and illustrates recipes.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub temperature: f32,
    pub request_timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://ai.gateway.lovable.dev/v1".into(),
            text_model: "google/gemini-2.5-flash".into(),
            image_model: "google/gemini-2.5-flash-image-preview".into(),
            temperature: 0.8,
            request_timeout_secs: 60,
        }
    }
}

impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("temperature", &self.temperature)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}
