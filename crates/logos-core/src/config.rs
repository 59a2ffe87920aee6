use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LogosError;
use crate::types::ResponseMode;

/// Default agent signature, prepended to free-text output and demanded of
/// structured proposal bodies.
pub const DEFAULT_SIGNATURE: &str = "\u{1f5fc} Logos";

/// Top-level configuration loaded from `.logos.toml`.
///
/// Layered resolution: CLI flags > environment variables > local config >
/// defaults. The file is optional; every field has a default so the agent
/// runs with nothing but `OPENAI_API_KEY` and the CI environment.
///
/// # Examples
///
/// ```
/// use logos_core::LogosConfig;
///
/// let config = LogosConfig::default();
/// assert_eq!(config.llm.model, "gpt-4o");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogosConfig {
    /// Completion endpoint settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Agent behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,
}

impl LogosConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LogosError::Io`] if the file cannot be read, or
    /// [`LogosError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use logos_core::LogosConfig;
    /// use std::path::Path;
    ///
    /// let config = LogosConfig::from_file(Path::new(".logos.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, LogosError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`LogosError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use logos_core::LogosConfig;
    ///
    /// let toml = r#"
    /// [llm]
    /// model = "gpt-4o-mini"
    /// "#;
    /// let config = LogosConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.llm.model, "gpt-4o-mini");
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, LogosError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Resolve the effective configuration for this process.
    ///
    /// Reads `explicit` when given, otherwise `.logos.toml` when present,
    /// otherwise defaults; then applies the environment layer (credential
    /// from the provider's conventional variable). Called exactly once at
    /// process start; the result is passed by reference from then on.
    ///
    /// # Errors
    ///
    /// Returns [`LogosError::Io`] or [`LogosError::Toml`] when an explicit
    /// or discovered file cannot be read or parsed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use logos_core::LogosConfig;
    ///
    /// let config = LogosConfig::load(None).unwrap();
    /// ```
    pub fn load(explicit: Option<&Path>) -> Result<Self, LogosError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(".logos.toml");
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env();
        Ok(config)
    }

    /// Apply the environment layer on top of file/default values.
    ///
    /// The only environment-sourced setting is the API credential: when the
    /// file did not set one, it is taken from the provider's conventional
    /// variable (`OPENAI_API_KEY` and friends).
    pub fn apply_env(&mut self) {
        if self.llm.api_key.is_none() {
            if let Ok(key) = std::env::var(self.llm.credential_env_var()) {
                if !key.is_empty() {
                    self.llm.api_key = Some(key);
                }
            }
        }
    }
}

/// Completion endpoint configuration.
///
/// # Examples
///
/// ```
/// use logos_core::LlmConfig;
///
/// let config = LlmConfig::default();
/// assert_eq!(config.provider, "openai");
/// assert_eq!(config.model, "gpt-4o");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name (e.g. `"openai"`, `"anthropic"`, `"ollama"`).
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// API key for the provider. When absent, the environment layer fills
    /// it from the provider's conventional variable.
    pub api_key: Option<String>,
    /// Custom base URL for API requests.
    pub base_url: Option<String>,
}

fn default_provider() -> String {
    "openai".into()
}

fn default_model() -> String {
    "gpt-4o".into()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key: None,
            base_url: None,
        }
    }
}

impl LlmConfig {
    /// The conventional credential variable for the configured provider.
    ///
    /// # Examples
    ///
    /// ```
    /// use logos_core::LlmConfig;
    ///
    /// assert_eq!(LlmConfig::default().credential_env_var(), "OPENAI_API_KEY");
    /// ```
    pub fn credential_env_var(&self) -> &'static str {
        match self.provider.as_str() {
            "anthropic" => "ANTHROPIC_API_KEY",
            "gemini" => "GEMINI_API_KEY",
            _ => "OPENAI_API_KEY",
        }
    }
}

/// Agent behavior configuration.
///
/// # Examples
///
/// ```
/// use logos_core::{AgentConfig, ResponseMode};
/// use std::path::PathBuf;
///
/// let config = AgentConfig::default();
/// assert_eq!(config.persona_path, PathBuf::from("prompts/logos_pm.md"));
/// assert_eq!(config.response_mode, ResponseMode::Structured);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Path to the persona document, loaded verbatim as UTF-8.
    #[serde(default = "default_persona_path")]
    pub persona_path: PathBuf,
    /// Signature the agent stamps on its output.
    #[serde(default = "default_signature")]
    pub signature: String,
    /// How the model is asked to answer.
    #[serde(default)]
    pub response_mode: ResponseMode,
}

fn default_persona_path() -> PathBuf {
    PathBuf::from("prompts/logos_pm.md")
}

fn default_signature() -> String {
    DEFAULT_SIGNATURE.into()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            persona_path: default_persona_path(),
            signature: default_signature(),
            response_mode: ResponseMode::default(),
        }
    }
}

impl AgentConfig {
    /// Load the persona document, verbatim.
    ///
    /// The text is never altered: no trimming, no normalization. A missing
    /// file is a fatal configuration error, distinguished from other I/O
    /// failures so the message can name the path.
    ///
    /// # Errors
    ///
    /// Returns [`LogosError::FileNotFound`] when the document is absent,
    /// [`LogosError::Io`] for any other read failure.
    pub fn load_persona(&self) -> Result<String, LogosError> {
        match std::fs::read_to_string(&self.persona_path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(LogosError::FileNotFound(self.persona_path.clone()))
            }
            Err(e) => Err(LogosError::Io(e)),
        }
    }
}
