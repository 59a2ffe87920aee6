use logos_core::{LogosError, ResponseMode, TriggerContext};
use serde::{Deserialize, Serialize};

/// Fallback for absent status-board text fields.
const FALLBACK_FIELD: &str = "N/A";
/// Fallback for a milestone without a date.
const FALLBACK_DATE: &str = "undated";
/// Fallback for an absent reminders field.
const FALLBACK_REMINDERS: &str = "none";
/// Fixed body used when the response carries no proposal text.
const FALLBACK_BODY: &str = "エラー: AIからの応答に提案本文が含まれていませんでした。";

#[derive(Debug, Default, Deserialize)]
struct RawProposal {
    pull_request_title: Option<String>,
    pull_request_body: Option<String>,
    status_document: Option<RawStatusBoard>,
}

#[derive(Debug, Default, Deserialize)]
struct RawStatusBoard {
    project_name: Option<String>,
    status: Option<String>,
    overall_phases: Option<Vec<String>>,
    // Models sometimes emit this as a string or a float; anything that is
    // not a usable index just leaves no phase marked.
    current_phase_index: Option<serde_json::Value>,
    milestones: Option<Vec<RawMilestone>>,
    todo_list: Option<Vec<RawTodo>>,
    reminders: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMilestone {
    date: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTodo {
    task: Option<String>,
    assignee: Option<String>,
}

/// A dated delivery on the status board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Milestone {
    /// Target date, or `undated`.
    pub date: String,
    /// What is delivered.
    pub description: String,
}

/// An open work item on the status board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoEntry {
    /// The action to take.
    pub task: String,
    /// Who owns it.
    pub assignee: String,
}

/// Fully populated status board, ready to render.
///
/// Built from the model's nested status object with every fallback already
/// applied; no field here is optional except the current-phase marker,
/// whose absence means no phase is marked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBoard {
    /// Project name shown in the document title.
    pub project_name: String,
    /// One-phrase status label.
    pub status: String,
    /// Phase names in plan order.
    pub phases: Vec<String>,
    /// Index into `phases`, validated in range.
    pub current_phase_index: Option<usize>,
    /// Dated deliveries.
    pub milestones: Vec<Milestone>,
    /// Open work items.
    pub todo_list: Vec<TodoEntry>,
    /// Free-text notes for later runs.
    pub reminders: String,
}

impl StatusBoard {
    fn from_raw(raw: RawStatusBoard) -> Self {
        let phases = raw.overall_phases.unwrap_or_default();
        let current_phase_index = match &raw.current_phase_index {
            Some(serde_json::Value::Number(n)) => n
                .as_u64()
                .map(|i| i as usize)
                .filter(|i| *i < phases.len()),
            _ => None,
        };
        let milestones = raw
            .milestones
            .unwrap_or_default()
            .into_iter()
            .map(|m| Milestone {
                date: or_fallback(m.date, FALLBACK_DATE),
                description: or_fallback(m.description, FALLBACK_FIELD),
            })
            .collect();
        let todo_list = raw
            .todo_list
            .unwrap_or_default()
            .into_iter()
            .map(|t| TodoEntry {
                task: or_fallback(t.task, FALLBACK_FIELD),
                assignee: or_fallback(t.assignee, FALLBACK_FIELD),
            })
            .collect();

        Self {
            project_name: or_fallback(raw.project_name, FALLBACK_FIELD),
            status: or_fallback(raw.status, FALLBACK_FIELD),
            phases,
            current_phase_index,
            milestones,
            todo_list,
            reminders: or_fallback(raw.reminders, FALLBACK_REMINDERS),
        }
    }

    /// Render the board as the status document Markdown.
    ///
    /// Section order is fixed: project title, status line, phases,
    /// milestones, todo list, reminders. The current phase is marked with
    /// an arrow prefix and a `(current)` suffix.
    ///
    /// # Examples
    ///
    /// ```
    /// use logos_pm::render::StatusBoard;
    ///
    /// let board = StatusBoard {
    ///     project_name: "Acme".into(),
    ///     status: "kickoff".into(),
    ///     phases: vec!["Design".into(), "Build".into()],
    ///     current_phase_index: Some(0),
    ///     milestones: vec![],
    ///     todo_list: vec![],
    ///     reminders: "none".into(),
    /// };
    /// let md = board.to_markdown();
    /// assert!(md.starts_with("# Project: Acme"));
    /// assert!(md.contains("\u{2192} Design (current)"));
    /// ```
    pub fn to_markdown(&self) -> String {
        let mut sections = vec![
            format!("# Project: {}", self.project_name),
            format!("**Status:** {}", self.status),
        ];

        let mut phases = String::from("## Project Phases");
        for (i, name) in self.phases.iter().enumerate() {
            if Some(i) == self.current_phase_index {
                phases.push_str(&format!("\n- \u{2192} {name} (current)"));
            } else {
                phases.push_str(&format!("\n- {name}"));
            }
        }
        sections.push(phases);

        let mut milestones = String::from("## Milestones");
        for m in &self.milestones {
            milestones.push_str(&format!("\n- [ ] {}: {}", m.date, m.description));
        }
        sections.push(milestones);

        let mut todos = String::from("## Todo List");
        for t in &self.todo_list {
            todos.push_str(&format!("\n- [ ] ({}) {}", t.assignee, t.task));
        }
        sections.push(todos);

        sections.push(format!("## Reminders\n{}", self.reminders));

        let mut out = sections.join("\n\n");
        out.push('\n');
        out
    }
}

/// Parsed-with-defaults form of a structured response.
///
/// Past this boundary every field is populated; the render stage never
/// touches raw JSON again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredProposal {
    /// Pull-request title.
    pub pull_request_title: String,
    /// Pull-request body, expected to begin with the agent signature.
    pub pull_request_body: String,
    /// The nested status board.
    pub status_board: StatusBoard,
}

impl StructuredProposal {
    fn from_raw(raw: RawProposal, issue_number: Option<u64>) -> Self {
        Self {
            pull_request_title: match raw.pull_request_title {
                Some(t) if !t.is_empty() => t,
                _ => fallback_title(issue_number),
            },
            pull_request_body: or_fallback(raw.pull_request_body, FALLBACK_BODY),
            status_board: StatusBoard::from_raw(raw.status_document.unwrap_or_default()),
        }
    }
}

/// Final artifacts of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedOutput {
    /// Free-text mode: one multi-line comment body.
    Comment {
        /// Signature-prefixed comment text.
        body: String,
    },
    /// Structured mode: pull-request fields plus the status document.
    Proposal {
        /// Pull-request title.
        title: String,
        /// Pull-request body.
        body: String,
        /// Rendered status-board Markdown.
        status_document: String,
    },
}

/// Wire form of a structured proposal, serialized under one output key.
#[derive(Debug, Serialize)]
pub struct ProposalBundle<'a> {
    /// Pull-request title.
    pub pull_request_title: &'a str,
    /// Pull-request body.
    pub pull_request_body: &'a str,
    /// Rendered status-board Markdown.
    pub status_document: &'a str,
}

/// Parse a structured response into a fully populated proposal.
///
/// Markdown code fences around the JSON are tolerated. Every missing field
/// gets its documented fallback; the issue number feeds the default title.
///
/// # Errors
///
/// Returns [`LogosError::Response`] when the response is not valid JSON,
/// its top level is not an object, or a present field has an unusable
/// shape. No partial result is produced in that case.
///
/// # Examples
///
/// ```
/// use logos_pm::render::parse_proposal;
///
/// let json = r#"{"pull_request_title": "Billing plan"}"#;
/// let proposal = parse_proposal(json, Some(7)).unwrap();
/// assert_eq!(proposal.pull_request_title, "Billing plan");
/// assert_eq!(proposal.status_board.project_name, "N/A");
/// ```
pub fn parse_proposal(
    response: &str,
    issue_number: Option<u64>,
) -> Result<StructuredProposal, LogosError> {
    let cleaned = strip_code_fences(response);

    let value: serde_json::Value = serde_json::from_str(cleaned)
        .map_err(|e| LogosError::Response(format!("not valid JSON: {e}")))?;
    if !value.is_object() {
        return Err(LogosError::Response(
            "top level is not a JSON object".into(),
        ));
    }
    let raw: RawProposal = serde_json::from_value(value)
        .map_err(|e| LogosError::Response(format!("unusable field shape: {e}")))?;

    Ok(StructuredProposal::from_raw(raw, issue_number))
}

/// Render the model's response into the run's final artifacts.
///
/// Free-text mode prepends the signature and passes the text through
/// unchanged; no JSON parsing is attempted. Structured mode parses the
/// response via [`parse_proposal`] and renders the status document.
///
/// # Errors
///
/// Returns [`LogosError::Response`] in structured mode when the response
/// cannot be parsed. Free-text mode is infallible.
///
/// # Examples
///
/// ```
/// use logos_core::{EventKind, ResponseMode, TriggerContext};
/// use logos_pm::render::{render, RenderedOutput};
///
/// let ctx = TriggerContext {
///     event: EventKind::Issues,
///     label: None,
///     issue_number: None,
///     issue_title: None,
///     issue_body: None,
/// };
/// let out = render("All set.", &ctx, ResponseMode::FreeText, "Logos").unwrap();
/// assert_eq!(
///     out,
///     RenderedOutput::Comment {
///         body: "Logos\n\nAll set.".into()
///     }
/// );
/// ```
pub fn render(
    response: &str,
    ctx: &TriggerContext,
    mode: ResponseMode,
    signature: &str,
) -> Result<RenderedOutput, LogosError> {
    match mode {
        ResponseMode::FreeText => Ok(RenderedOutput::Comment {
            body: format!("{signature}\n\n{response}"),
        }),
        ResponseMode::Structured => {
            let proposal = parse_proposal(response, ctx.issue_number)?;
            let status_document = proposal.status_board.to_markdown();
            Ok(RenderedOutput::Proposal {
                title: proposal.pull_request_title,
                body: proposal.pull_request_body,
                status_document,
            })
        }
    }
}

fn fallback_title(issue_number: Option<u64>) -> String {
    match issue_number {
        Some(n) => format!("案件初期設計プラン (Issue #{n})"),
        None => "案件初期設計プラン (Issue #?)".to_string(),
    }
}

fn or_fallback(value: Option<String>, fallback: &str) -> String {
    match value {
        Some(s) if !s.is_empty() => s,
        _ => fallback.to_string(),
    }
}

fn strip_code_fences(s: &str) -> &str {
    let trimmed = s.trim();
    if let Some(rest) = trimmed.strip_prefix("```json") {
        if let Some(inner) = rest.strip_suffix("```") {
            return inner.trim();
        }
    }
    if let Some(rest) = trimmed.strip_prefix("```") {
        if let Some(inner) = rest.strip_suffix("```") {
            return inner.trim();
        }
    }
    trimmed
}
