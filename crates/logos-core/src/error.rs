use std::path::PathBuf;

/// Errors that can occur across the Logos agent.
///
/// Each variant wraps a specific failure domain. Library crates use this
/// type directly; it carries a `Diagnostic` impl so the binary can bubble
/// it straight into a `miette::Report`. Every variant is terminal for the
/// run: nothing is retried and nothing is recovered into a
/// degraded-but-successful output.
///
/// # Examples
///
/// ```
/// use logos_core::LogosError;
///
/// let err = LogosError::Config("OPENAI_API_KEY is not set".into());
/// assert!(err.to_string().contains("OPENAI_API_KEY"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum LogosError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or invalid configuration: a required credential, environment
    /// variable, or context field is absent. Raised before any external call.
    #[error("configuration error: {0}")]
    Config(String),

    /// Completion endpoint failure: transport error, non-success HTTP
    /// status, or an unexpected response envelope.
    #[error("LLM error: {0}")]
    Llm(String),

    /// Structured mode expected a single JSON object but the model payload
    /// could not be parsed as one.
    #[error("malformed model response: {0}")]
    Response(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: LogosError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn config_error_displays_message() {
        let err = LogosError::Config("missing credential".into());
        assert_eq!(err.to_string(), "configuration error: missing credential");
    }

    #[test]
    fn response_error_displays_message() {
        let err = LogosError::Response("top level is not an object".into());
        assert_eq!(
            err.to_string(),
            "malformed model response: top level is not an object"
        );
    }

    #[test]
    fn file_not_found_shows_path() {
        let err = LogosError::FileNotFound(PathBuf::from("prompts/logos_pm.md"));
        assert!(err.to_string().contains("prompts/logos_pm.md"));
    }
}
