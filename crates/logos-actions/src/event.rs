use logos_core::{EventKind, LogosError, TriggerContext};

/// Variable naming the event kind. Set by the runner on every job.
pub const EVENT_NAME_VAR: &str = "GITHUB_EVENT_NAME";
/// Variable carrying the label that triggered the workflow, forwarded by
/// the workflow as an action input.
pub const TRIGGERING_LABEL_VAR: &str = "INPUT_TRIGGERING_LABEL";
/// Variable carrying the issue number.
pub const ISSUE_NUMBER_VAR: &str = "ISSUE_NUMBER";
/// Variable carrying the issue title.
pub const ISSUE_TITLE_VAR: &str = "ISSUE_TITLE";
/// Variable carrying the issue body.
pub const ISSUE_BODY_VAR: &str = "ISSUE_BODY";

/// Build the [`TriggerContext`] from the CI environment.
///
/// `GITHUB_EVENT_NAME` is required: a run without it is not a CI
/// invocation but a misconfiguration. Every other variable is optional;
/// workflow expressions expand to empty strings for fields the event does
/// not carry, so empty values normalize to `None` here. Whether a missing
/// field matters is decided later, by the task that needs it.
///
/// # Errors
///
/// Returns [`LogosError::Config`] when `GITHUB_EVENT_NAME` is unset.
pub fn trigger_from_env() -> Result<TriggerContext, LogosError> {
    trigger_from(|name| std::env::var(name).ok())
}

fn trigger_from(get: impl Fn(&str) -> Option<String>) -> Result<TriggerContext, LogosError> {
    let event_name = non_empty(get(EVENT_NAME_VAR)).ok_or_else(|| {
        LogosError::Config(format!(
            "{EVENT_NAME_VAR} is not set; this command expects the GitHub Actions environment"
        ))
    })?;

    Ok(TriggerContext {
        event: EventKind::from(event_name.as_str()),
        label: non_empty(get(TRIGGERING_LABEL_VAR)),
        issue_number: non_empty(get(ISSUE_NUMBER_VAR)).and_then(|s| s.trim().parse().ok()),
        issue_title: non_empty(get(ISSUE_TITLE_VAR)),
        issue_body: non_empty(get(ISSUE_BODY_VAR)),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
