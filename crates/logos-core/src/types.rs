use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kind of CI event that started this run.
///
/// Parsed from `GITHUB_EVENT_NAME`. Unknown event names are carried in
/// [`EventKind::Other`] so that routing treats them as "no task" instead of
/// failing the run.
///
/// # Examples
///
/// ```
/// use logos_core::EventKind;
///
/// assert_eq!(EventKind::from("issues"), EventKind::Issues);
/// assert_eq!(
///     EventKind::from("push"),
///     EventKind::Other("push".into())
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// An issue was opened, labeled, or otherwise changed.
    Issues,
    /// A comment was added to an issue.
    IssueComment,
    /// Any event this agent has no branch for.
    Other(String),
}

impl From<&str> for EventKind {
    fn from(name: &str) -> Self {
        match name {
            "issues" => EventKind::Issues,
            "issue_comment" => EventKind::IssueComment,
            other => EventKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Issues => write!(f, "issues"),
            EventKind::IssueComment => write!(f, "issue_comment"),
            EventKind::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Immutable snapshot of the triggering event.
///
/// Built once per invocation from the CI environment and passed by
/// reference through routing, composition, and rendering. Fields the
/// environment did not provide are `None`; whether that is acceptable
/// depends on the selected task, so validation happens at selection time,
/// not here.
///
/// # Examples
///
/// ```
/// use logos_core::{EventKind, TriggerContext};
///
/// let ctx = TriggerContext {
///     event: EventKind::Issues,
///     label: Some("initiate-proposal".into()),
///     issue_number: Some(42),
///     issue_title: Some("Acme Corp Engagement".into()),
///     issue_body: Some("Kickoff notes...".into()),
/// };
/// assert_eq!(ctx.event, EventKind::Issues);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerContext {
    /// Kind of event that started the run.
    pub event: EventKind,
    /// Label that triggered the workflow, if any.
    pub label: Option<String>,
    /// Issue number, if the event carries one.
    pub issue_number: Option<u64>,
    /// Issue title, if the event carries one.
    pub issue_title: Option<String>,
    /// Issue body, if the event carries one.
    pub issue_body: Option<String>,
}

/// How the model is asked to answer and how its answer is rendered.
///
/// `FreeText` passes the model's prose through with the agent signature
/// prepended; `Structured` demands a single JSON object and unpacks it into
/// a pull-request title/body plus a status-board document.
///
/// # Examples
///
/// ```
/// use logos_core::ResponseMode;
///
/// let mode: ResponseMode = "free_text".parse().unwrap();
/// assert_eq!(mode, ResponseMode::FreeText);
/// assert_eq!(ResponseMode::default(), ResponseMode::Structured);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    /// Plain prose rendered into a single comment body.
    FreeText,
    /// Strict-JSON response unpacked into proposal artifacts.
    #[default]
    Structured,
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseMode::FreeText => write!(f, "free_text"),
            ResponseMode::Structured => write!(f, "structured"),
        }
    }
}

impl FromStr for ResponseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free_text" | "free-text" | "text" => Ok(ResponseMode::FreeText),
            "structured" | "json" => Ok(ResponseMode::Structured),
            other => Err(format!("unknown response mode: {other}")),
        }
    }
}

/// Output format for CLI subcommands.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument
/// parsing.
///
/// # Examples
///
/// ```
/// use logos_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Machine-readable JSON.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
