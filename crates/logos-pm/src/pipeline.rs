use logos_core::{LogosConfig, LogosError, ResponseMode, TriggerContext};

use crate::llm::LlmClient;
use crate::prompt::{self, CompletionRequest};
use crate::render::{self, RenderedOutput};
use crate::router::{self, TaskTemplate};

/// One-shot agent orchestrator.
///
/// Holds everything a run needs: the LLM client, the persona document
/// (loaded once at startup), the agent signature, and the response mode.
/// Carries no state between runs; each trigger gets a fresh process in CI
/// anyway.
pub struct AgentPipeline {
    llm: LlmClient,
    persona: String,
    signature: String,
    mode: ResponseMode,
}

impl AgentPipeline {
    /// Create a pipeline from pre-built parts.
    pub fn new(llm: LlmClient, persona: String, signature: String, mode: ResponseMode) -> Self {
        Self {
            llm,
            persona,
            signature,
            mode,
        }
    }

    /// Build the pipeline from configuration: construct the client and load
    /// the persona document.
    ///
    /// # Errors
    ///
    /// Returns [`LogosError::FileNotFound`] when the persona document does
    /// not exist and [`LogosError::Llm`] when the HTTP client cannot be
    /// built.
    pub fn from_config(config: &LogosConfig) -> Result<Self, LogosError> {
        let llm = LlmClient::new(&config.llm)?;
        let persona = config.agent.load_persona()?;
        Ok(Self::new(
            llm,
            persona,
            config.agent.signature.clone(),
            config.agent.response_mode,
        ))
    }

    /// Model identifier this pipeline will call.
    pub fn model(&self) -> &str {
        self.llm.model()
    }

    /// Configured response mode.
    pub fn mode(&self) -> ResponseMode {
        self.mode
    }

    /// Route the trigger and compose the completion request, without
    /// calling the endpoint.
    ///
    /// `Ok(None)` means no task matched; callers treat that as a clean
    /// no-op. Used directly by dry runs.
    ///
    /// # Errors
    ///
    /// Returns [`LogosError::Config`] when a task matches but its required
    /// trigger fields are missing or empty.
    pub fn compose_for(
        &self,
        ctx: &TriggerContext,
    ) -> Result<Option<(TaskTemplate, CompletionRequest)>, LogosError> {
        let Some(task) = router::select_task(ctx)? else {
            return Ok(None);
        };
        let request = prompt::compose(&task, self.mode, &self.persona, &self.signature);
        Ok(Some((task, request)))
    }

    /// Run the full sequence: route, compose, call the endpoint once,
    /// render.
    ///
    /// # Errors
    ///
    /// Returns [`LogosError::Config`] on a binding failure,
    /// [`LogosError::Llm`] when the completion call fails, and
    /// [`LogosError::Response`] when structured output cannot be parsed.
    pub async fn run(&self, ctx: &TriggerContext) -> Result<Option<RenderedOutput>, LogosError> {
        let Some((_, request)) = self.compose_for(ctx)? else {
            return Ok(None);
        };
        let response = self.llm.chat(&request).await?;
        let output = render::render(&response, ctx, self.mode, &self.signature)?;
        Ok(Some(output))
    }
}
