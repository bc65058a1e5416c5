use crate::llm::{DEFAULT_MODEL, GROQ_BASE_URL};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serenity_render::PrescriptionLayout;
use std::path::PathBuf;
use tokio::fs;

pub const API_KEY_ENV: &str = "SERENITY_API_KEY";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub prescription: PrescriptionConfig,
}

fn default_base_url() -> String {
    GROQ_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_theme() -> String {
    "auto".to_string()
}

/// Template, output and font paths plus the anchor layout. All of it is
/// editable config so a template redesign never needs a code change.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PrescriptionConfig {
    #[serde(default = "default_template_path")]
    pub template_path: PathBuf,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    #[serde(default = "default_font_path")]
    pub font_path: PathBuf,
    #[serde(default)]
    pub layout: PrescriptionLayout,
}

fn default_template_path() -> PathBuf {
    PathBuf::from("detected_text_areas.jpg")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output_prescription.jpeg")
}

fn default_font_path() -> PathBuf {
    PathBuf::from("DejaVuSans.ttf")
}

impl Default for PrescriptionConfig {
    fn default() -> Self {
        Self {
            template_path: default_template_path(),
            output_path: default_output_path(),
            font_path: default_font_path(),
            layout: PrescriptionLayout::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            theme: default_theme(),
            prescription: PrescriptionConfig::default(),
        }
    }
}

impl Config {
    pub async fn load() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("serenity");

        let config_path = config_dir.join("config.toml");

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).await?;
        let config: Config = toml::from_str(&content)?;

        Ok(config)
    }

    pub async fn save(&self) -> Result<()> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("serenity");

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).await?;
        }

        let config_path = config_dir.join("config.toml");
        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).await?;
        Ok(())
    }

    /// The environment variable wins over the config file.
    pub fn effective_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .and_then(clean_optional)
            .or_else(|| self.api_key.clone().and_then(clean_optional))
    }

    pub fn has_api_key(&self) -> bool {
        self.effective_api_key().is_some()
    }
}

fn clean_optional(input: String) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
