use logos_core::ResponseMode;

use crate::router::TaskTemplate;

/// JSON skeleton the structured mode demands from the model. Every key the
/// renderer understands is named here; the renderer tolerates missing ones.
const PROPOSAL_SCHEMA: &str = r#"{
  "pull_request_title": "Concise title for the proposal pull request",
  "pull_request_body": "Full proposal text in Markdown",
  "status_document": {
    "project_name": "Short project name",
    "status": "One-phrase status label",
    "overall_phases": ["Ordered phase names"],
    "current_phase_index": 0,
    "milestones": [
      { "date": "YYYY-MM-DD", "description": "What is delivered" }
    ],
    "todo_list": [
      { "task": "Concrete next action", "assignee": "Who owns it" }
    ],
    "reminders": "Free-form notes later steps should keep in mind"
  }
}"#;

/// Illustrative todo entries embedded in the structured instruction so the
/// model sees the expected granularity.
const EXAMPLE_TODOS: &str = r#"[
  { "task": "Draft the requirements document", "assignee": "Logos" },
  { "task": "Schedule the kickoff meeting", "assignee": "Human PM" },
  { "task": "List external dependencies and their owners", "assignee": "Logos" }
]"#;

/// Fixed generation parameters for one completion call.
///
/// # Examples
///
/// ```
/// use logos_core::ResponseMode;
/// use logos_pm::prompt::GenerationParams;
///
/// let params = GenerationParams::for_mode(ResponseMode::Structured);
/// assert!(params.json_mode);
/// assert_eq!(params.max_tokens, 4000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    /// Sampling temperature.
    pub temperature: f64,
    /// Completion length cap.
    pub max_tokens: u32,
    /// Whether to request strict JSON output (`response_format: json_object`).
    pub json_mode: bool,
}

impl GenerationParams {
    /// Parameters for the given response mode.
    ///
    /// Both modes sample at 0.7. Structured mode doubles the token cap so a
    /// full status board fits, and turns on strict JSON output.
    pub fn for_mode(mode: ResponseMode) -> Self {
        match mode {
            ResponseMode::FreeText => Self {
                temperature: 0.7,
                max_tokens: 2000,
                json_mode: false,
            },
            ResponseMode::Structured => Self {
                temperature: 0.7,
                max_tokens: 4000,
                json_mode: true,
            },
        }
    }
}

/// A fully composed completion request: persona, instruction, parameters.
///
/// Construction is pure. The same task, mode, persona, and signature always
/// compose to the same request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System message, the persona document verbatim.
    pub system: String,
    /// User message, the task instruction with issue fields substituted.
    pub user: String,
    /// Generation parameters for this request.
    pub params: GenerationParams,
}

/// Compose the completion request for a selected task.
///
/// The issue title and body are substituted verbatim; their content is
/// opaque here and is never escaped or trimmed. Escaping concerns belong to
/// the output sink, not the prompt.
///
/// # Examples
///
/// ```
/// use logos_core::ResponseMode;
/// use logos_pm::prompt::compose;
/// use logos_pm::router::TaskTemplate;
///
/// let task = TaskTemplate::InitiateProposal {
///     title: "Add billing".into(),
///     body: "We need invoices.".into(),
///     issue_number: Some(7),
/// };
/// let request = compose(&task, ResponseMode::FreeText, "You are Logos.", "Logos");
/// assert_eq!(request.system, "You are Logos.");
/// assert!(request.user.contains("Add billing"));
/// ```
pub fn compose(
    task: &TaskTemplate,
    mode: ResponseMode,
    persona: &str,
    signature: &str,
) -> CompletionRequest {
    let TaskTemplate::InitiateProposal { title, body, .. } = task;

    let user = match mode {
        ResponseMode::FreeText => build_comment_instruction(title, body),
        ResponseMode::Structured => build_proposal_instruction(title, body, signature),
    };

    CompletionRequest {
        system: persona.to_string(),
        user,
        params: GenerationParams::for_mode(mode),
    }
}

fn build_comment_instruction(title: &str, body: &str) -> String {
    format!(
        "\
# Task brief: initial plan for a new engagement

You have just been handed the kickoff of a new engagement.
Draw on your operating principles and the case information below to draft
the initial project plan as a reply comment.

## Case information
- Title: {title}
- Details: {body}
"
    )
}

fn build_proposal_instruction(title: &str, body: &str, signature: &str) -> String {
    let mut prompt = format!(
        "\
# Task brief: initial plan for a new engagement

You have just been handed the kickoff of a new engagement.
Draw on your operating principles and the case information below to draft
the initial project plan as a pull-request proposal.

## Case information
- Title: {title}
- Details: {body}
"
    );
    prompt.push_str(&format!(
        "\nRespond with a single JSON object in exactly this shape, and nothing else:\n{PROPOSAL_SCHEMA}\n"
    ));
    prompt.push_str(&format!(
        "\nTodo entries should be as concrete as these examples:\n{EXAMPLE_TODOS}\n"
    ));
    prompt.push_str(&format!(
        "\nBegin pull_request_body with your signature, {signature}.\n"
    ));
    prompt
}
