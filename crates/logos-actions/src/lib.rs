//! GitHub Actions adapter: reads the trigger from the step environment and
//! writes results to the step-output file.
//!
//! Everything runner-specific lives here. [`trigger_from_env`] turns the
//! environment variables a workflow passes in into a
//! [`logos_core::TriggerContext`], and [`OutputSink`] appends values to the
//! file named by `GITHUB_OUTPUT` so later steps can post them.

mod event;
mod output;

pub use event::{
    trigger_from_env, EVENT_NAME_VAR, ISSUE_BODY_VAR, ISSUE_NUMBER_VAR, ISSUE_TITLE_VAR,
    TRIGGERING_LABEL_VAR,
};
pub use output::{OutputSink, OUTPUT_PATH_VAR};
