//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and handed to the
//! pipeline task.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

/// Environment variable consulted when `llm.api_key` is not set.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Settings for the chat-completion backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible API (no trailing `/v1`).
    pub base_url: String,
    /// API key, `None` for local providers that need no authentication.
    pub api_key: Option<String>,
    /// Model identifier sent with every request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum seconds to wait for a completion.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            api_key: None,
            model: "gpt-4".into(),
            temperature: 0.7,
            timeout_secs: 120,
        }
    }
}

// ---------------------------------------------------------------------------
// StorageConfig
// ---------------------------------------------------------------------------

/// Locations of the per-user JSON files.
///
/// Relative paths resolve against the working directory, which is where the
/// files have always lived.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// username → saved words.
    pub words_file: PathBuf,
    /// username → saved synonym rows.
    pub results_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            words_file: PathBuf::from("saved_words.json"),
            results_file: PathBuf::from("saved_results.json"),
        }
    }
}

// ---------------------------------------------------------------------------
// ExportConfig
// ---------------------------------------------------------------------------

/// Document / audio export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory that receives `.docx` and `.mp3` files.
    pub output_dir: PathBuf,
    /// Heading written at the top of every exported document.
    pub document_heading: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            document_heading: "GPT 문제 생성 결과".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Speech synthesis endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Google Translate TTS endpoint returning `audio/mpeg`.
    pub endpoint: String,
    /// Per-chunk request timeout.
    pub timeout_secs: u64,
    /// Language preselected in the UI.
    pub default_language: crate::export::SpeechLanguage,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.google.com/translate_tts".into(),
            timeout_secs: 30,
            default_language: crate::export::SpeechLanguage::Korean,
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// egui window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// TTF/OTF file with Hangul glyphs (egui's bundled fonts have none).
    pub font_path: Option<PathBuf>,
    /// Initial window size in logical pixels.
    pub window_size: (f32, f32),
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            window_size: (1100.0, 780.0),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use passage_quiz::config::AppConfig;
///
/// // Load (returns Default when file is missing) and pick up OPENAI_API_KEY
/// let config = AppConfig::load().unwrap().with_env();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Chat-completion settings.
    pub llm: LlmConfig,
    /// JSON persistence settings.
    pub storage: StorageConfig,
    /// Export settings.
    pub export: ExportConfig,
    /// Speech synthesis settings.
    pub speech: SpeechConfig,
    /// UI settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Fill `llm.api_key` from [`API_KEY_ENV`] when the settings file left
    /// it unset or empty.
    pub fn with_env(self) -> Self {
        self.with_api_key_from(std::env::var(API_KEY_ENV).ok())
    }

    fn with_api_key_from(mut self, env_key: Option<String>) -> Self {
        let configured = self.llm.api_key.as_deref().is_some_and(|k| !k.is_empty());
        if !configured {
            if let Some(key) = env_key.filter(|k| !k.is_empty()) {
                self.llm.api_key = Some(key);
            }
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
