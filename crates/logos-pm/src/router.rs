use logos_core::{EventKind, LogosError, TriggerContext};

/// Issue label that activates the proposal task.
pub const TRIGGER_LABEL: &str = "initiate-proposal";

/// A task selected by the router, with every required trigger field
/// already bound.
///
/// Binding happens at selection time so that downstream stages never see
/// a half-formed task: by the time a template exists, its inputs exist.
///
/// # Examples
///
/// ```
/// use logos_pm::router::TaskTemplate;
///
/// let task = TaskTemplate::InitiateProposal {
///     title: "Add billing".into(),
///     body: "We need invoices.".into(),
///     issue_number: Some(12),
/// };
/// assert_eq!(task.name(), "initiate-proposal");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskTemplate {
    /// Draft an initial project plan from a freshly labeled issue.
    InitiateProposal {
        /// Issue title, bound verbatim.
        title: String,
        /// Issue body, bound verbatim.
        body: String,
        /// Issue number when the workflow passed one.
        issue_number: Option<u64>,
    },
}

impl TaskTemplate {
    /// Stable task name, matching the label that selects it.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitiateProposal { .. } => TRIGGER_LABEL,
        }
    }
}

/// Match the trigger against the routing table.
///
/// The table has a single row today: the `issues` event carrying the
/// [`TRIGGER_LABEL`] label selects [`TaskTemplate::InitiateProposal`].
/// Every other `(event, label)` pair returns `Ok(None)`, which callers
/// treat as a successful no-op. Label comparison is exact; a label is an
/// identifier chosen by the workflow author, not prose.
///
/// # Errors
///
/// Returns [`LogosError::Config`] when the trigger matches a task but a
/// field the task binds is missing or empty. This fails the run before
/// any network call is made.
///
/// # Examples
///
/// ```
/// use logos_core::{EventKind, TriggerContext};
/// use logos_pm::router::select_task;
///
/// let ctx = TriggerContext {
///     event: EventKind::Issues,
///     label: Some("wontfix".into()),
///     issue_number: None,
///     issue_title: None,
///     issue_body: None,
/// };
/// assert!(select_task(&ctx).unwrap().is_none());
/// ```
pub fn select_task(ctx: &TriggerContext) -> Result<Option<TaskTemplate>, LogosError> {
    match (&ctx.event, ctx.label.as_deref()) {
        (EventKind::Issues, Some(TRIGGER_LABEL)) => {
            let title = ctx
                .issue_title
                .clone()
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    LogosError::Config(format!(
                        "task {TRIGGER_LABEL} needs the issue title (is ISSUE_TITLE set in the workflow?)"
                    ))
                })?;
            let body = ctx
                .issue_body
                .clone()
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    LogosError::Config(format!(
                        "task {TRIGGER_LABEL} needs the issue body (is ISSUE_BODY set in the workflow?)"
                    ))
                })?;

            Ok(Some(TaskTemplate::InitiateProposal {
                title,
                body,
                issue_number: ctx.issue_number,
            }))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled_issue() -> TriggerContext {
        TriggerContext {
            event: EventKind::Issues,
            label: Some(TRIGGER_LABEL.into()),
            issue_number: Some(42),
            issue_title: Some("Ship the widget".into()),
            issue_body: Some("Customers keep asking.".into()),
        }
    }

    #[test]
    fn matching_trigger_selects_bound_proposal() {
        let task = select_task(&labeled_issue()).unwrap().unwrap();
        assert_eq!(
            task,
            TaskTemplate::InitiateProposal {
                title: "Ship the widget".into(),
                body: "Customers keep asking.".into(),
                issue_number: Some(42),
            }
        );
    }

    #[test]
    fn other_label_is_a_no_op() {
        let ctx = TriggerContext {
            label: Some("bug".into()),
            ..labeled_issue()
        };
        assert_eq!(select_task(&ctx).unwrap(), None);
    }

    #[test]
    fn missing_label_is_a_no_op() {
        let ctx = TriggerContext {
            label: None,
            ..labeled_issue()
        };
        assert_eq!(select_task(&ctx).unwrap(), None);
    }

    #[test]
    fn other_event_is_a_no_op_even_with_matching_label() {
        let ctx = TriggerContext {
            event: EventKind::IssueComment,
            ..labeled_issue()
        };
        assert_eq!(select_task(&ctx).unwrap(), None);

        let ctx = TriggerContext {
            event: EventKind::Other("push".into()),
            ..labeled_issue()
        };
        assert_eq!(select_task(&ctx).unwrap(), None);
    }

    #[test]
    fn label_comparison_is_exact() {
        let ctx = TriggerContext {
            label: Some("Initiate-Proposal".into()),
            ..labeled_issue()
        };
        assert_eq!(select_task(&ctx).unwrap(), None);

        let ctx = TriggerContext {
            label: Some("initiate-proposal-v2".into()),
            ..labeled_issue()
        };
        assert_eq!(select_task(&ctx).unwrap(), None);
    }

    #[test]
    fn missing_title_fails_binding() {
        let ctx = TriggerContext {
            issue_title: None,
            ..labeled_issue()
        };
        let err = select_task(&ctx).unwrap_err();
        assert!(matches!(err, LogosError::Config(_)));
        assert!(err.to_string().contains("ISSUE_TITLE"));
    }

    #[test]
    fn missing_body_fails_binding() {
        let ctx = TriggerContext {
            issue_body: None,
            ..labeled_issue()
        };
        let err = select_task(&ctx).unwrap_err();
        assert!(matches!(err, LogosError::Config(_)));
        assert!(err.to_string().contains("ISSUE_BODY"));
    }

    #[test]
    fn empty_title_fails_binding_like_a_missing_one() {
        let ctx = TriggerContext {
            issue_title: Some(String::new()),
            ..labeled_issue()
        };
        let err = select_task(&ctx).unwrap_err();
        assert!(matches!(err, LogosError::Config(_)));
        assert!(err.to_string().contains("ISSUE_TITLE"));
    }

    #[test]
    fn empty_body_fails_binding_like_a_missing_one() {
        let ctx = TriggerContext {
            issue_body: Some(String::new()),
            ..labeled_issue()
        };
        let err = select_task(&ctx).unwrap_err();
        assert!(matches!(err, LogosError::Config(_)));
        assert!(err.to_string().contains("ISSUE_BODY"));
    }

    #[test]
    fn issue_number_is_optional_for_binding() {
        let ctx = TriggerContext {
            issue_number: None,
            ..labeled_issue()
        };
        let task = select_task(&ctx).unwrap().unwrap();
        let TaskTemplate::InitiateProposal { issue_number, .. } = task;
        assert_eq!(issue_number, None);
    }
}
