use crate::agent::{
    ContextBuilder, ConversationHistory, ConversationTurn, ToolDispatcher, ToolNameResolver,
    ToolRegistry,
};
use crate::error::{AgentError, Result};
use crate::traits::{ContentBlock, Model, ModelRequest, ModelResponse, ToolArgs, ToolDescriptor};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

pub const DEFAULT_MAX_ITERATIONS: usize = 3;

/// Round counter for a single query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationState {
    pub count: usize,
    pub max: usize,
}

impl IterationState {
    pub fn new(max: usize) -> Self {
        Self { count: 0, max }
    }

    pub fn has_budget(&self) -> bool {
        self.count < self.max
    }

    pub fn advance(&mut self) {
        self.count += 1;
    }

    pub fn is_exhausted(&self) -> bool {
        self.count >= self.max
    }
}

pub struct AgentLoop {
    model: Arc<dyn Model>,
    dispatcher: ToolDispatcher,
    context_builder: Option<ContextBuilder>,
    history: ConversationHistory,
    max_iterations: usize,
    model_timeout: Option<Duration>,
}

impl AgentLoop {
    pub fn new(model: Arc<dyn Model>, tool_registry: Arc<ToolRegistry>) -> Self {
        Self {
            model,
            dispatcher: ToolDispatcher::new(tool_registry),
            context_builder: None,
            history: ConversationHistory::new(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            model_timeout: None,
        }
    }

    pub fn with_context(mut self, context_builder: ContextBuilder) -> Self {
        self.context_builder = Some(context_builder);
        self
    }

    /// A budget of zero is raised to one so every query reaches the model.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max.max(1);
        self
    }

    pub fn with_model_timeout(mut self, timeout: Duration) -> Self {
        self.model_timeout = Some(timeout);
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.dispatcher = self.dispatcher.with_timeout(timeout);
        self
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        self.dispatcher.registry()
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Runs one user query to completion and returns the accumulated answer.
    ///
    /// Tool failures are recorded in history and never abort the query. A
    /// failed model call does, leaving every turn appended so far in place.
    pub async fn process(&mut self, message: &str) -> Result<String> {
        self.history.append(ConversationTurn::user(message));

        let mut state = IterationState::new(self.max_iterations);
        let catalog = self.registry().catalog();
        let system_prompt = self
            .context_builder
            .as_ref()
            .map(|c| c.build_system_prompt(self.dispatcher.registry()));
        let mut output: Vec<String> = Vec::new();

        while state.has_budget() {
            state.advance();
            debug!(round = state.count, max = state.max, "Querying model");

            let response = self
                .call_model(system_prompt.as_deref(), &catalog)
                .await
                .inspect_err(|e| error!(round = state.count, "{}", e))?;

            let mut used_tools = false;
            for block in response.blocks {
                match block {
                    ContentBlock::Text(text) => {
                        if !text.trim().is_empty() {
                            output.push(text.clone());
                        }
                        self.history.append(ConversationTurn::assistant(text));
                    }
                    ContentBlock::ToolRequest { id, name, args } => {
                        used_tools = true;
                        self.handle_tool_request(id, name, args, &mut output).await;
                    }
                    ContentBlock::InvalidToolRequest { id, name, reason } => {
                        used_tools = true;
                        self.reject_tool_request(id, name, reason, &mut output);
                    }
                }
            }

            if !used_tools {
                debug!(rounds = state.count, "Model gave a final answer");
                break;
            }

            if state.is_exhausted() {
                warn!(max = state.max, "Iteration budget exhausted with tool use pending");
                output.push(format!(
                    "[Stopped after {} iterations; the model was still requesting tools]",
                    state.max
                ));
                break;
            }
        }

        Ok(output.join("\n"))
    }

    async fn call_model(
        &self,
        system: Option<&str>,
        catalog: &[ToolDescriptor],
    ) -> Result<ModelResponse> {
        let request = ModelRequest {
            system,
            history: self.history.all(),
            tools: if catalog.is_empty() {
                None
            } else {
                Some(catalog)
            },
        };

        let call = self.model.send(request);
        let response = match self.model_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                AgentError::ModelRequest(format!("timed out after {}s", limit.as_secs_f64()))
            })?,
            None => call.await,
        };

        response.map_err(|e| AgentError::ModelRequest(format!("{:#}", e)))
    }

    async fn handle_tool_request(
        &mut self,
        id: String,
        name: String,
        args: ToolArgs,
        output: &mut Vec<String>,
    ) {
        let id = self.unique_request_id(id);
        self.history
            .append(ConversationTurn::tool_request(&id, &name, args.clone()));

        let resolved = ToolNameResolver::new(self.registry().entries())
            .resolve(&name)
            .map(|r| (r.effective_name().to_string(), r.strategy));

        let effective_name = match resolved {
            Ok((effective_name, strategy)) => {
                debug!(requested = %name, resolved = %effective_name, %strategy, "Resolved tool");
                effective_name
            }
            Err(e) => {
                warn!(requested = %name, "{}", e);
                self.history
                    .append(ConversationTurn::tool_outcome(&id, e.to_string(), true));
                output.push(format!("[Tool '{}' not found]", name));
                return;
            }
        };

        match self.dispatcher.dispatch(&effective_name, args).await {
            Ok(result) => {
                let content = result.content.to_text();
                if result.is_error {
                    warn!(tool = %effective_name, "Tool returned an error: {}", content);
                    output.push(format!("[Tool {} returned an error: {}]", effective_name, content));
                } else {
                    output.push(format!("[Used tool {}]", effective_name));
                }
                self.history.append(ConversationTurn::tool_outcome(
                    &id,
                    content,
                    result.is_error,
                ));
            }
            Err(e) => {
                warn!(tool = %effective_name, "{}", e);
                output.push(format!("[{}]", e));
                self.history
                    .append(ConversationTurn::tool_outcome(&id, e.to_string(), true));
            }
        }
    }

    /// Records a request whose arguments never decoded, answered with an error
    /// outcome so the model can retry with corrected arguments.
    fn reject_tool_request(
        &mut self,
        id: String,
        name: String,
        reason: String,
        output: &mut Vec<String>,
    ) {
        let id = self.unique_request_id(id);
        self.history
            .append(ConversationTurn::tool_request(&id, &name, ToolArgs::new()));

        let e = AgentError::InvalidArguments {
            tool: name,
            message: reason,
        };
        warn!("{}", e);
        output.push(format!("[{}]", e));
        self.history
            .append(ConversationTurn::tool_outcome(&id, e.to_string(), true));
    }

    /// Keeps correlation ids unique across the whole history.
    fn unique_request_id(&self, id: String) -> String {
        if !id.trim().is_empty() && !self.history.contains_request_id(&id) {
            return id;
        }
        let fresh = format!("call_{}", uuid::Uuid::new_v4().simple());
        debug!(original = %id, replacement = %fresh, "Replacing unusable tool call id");
        fresh
    }
}
