//! In-memory fakes shared by the unit tests.

use crate::agent::ConversationTurn;
use crate::traits::{
    ContentBlock, Model, ModelRequest, ModelResponse, ToolArgs, ToolDescriptor, ToolProvider,
    ToolResult,
};
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn descriptor(name: &str) -> ToolDescriptor {
    ToolDescriptor::new(name, format!("{name} tool"), json!({"type": "object"}))
}

pub fn args(value: serde_json::Value) -> ToolArgs {
    value.as_object().cloned().unwrap_or_default()
}

pub fn tool_request(id: &str, name: &str) -> ContentBlock {
    ContentBlock::ToolRequest {
        id: id.to_string(),
        name: name.to_string(),
        args: ToolArgs::new(),
    }
}

pub fn text(value: &str) -> ContentBlock {
    ContentBlock::Text(value.to_string())
}

#[derive(Default)]
pub struct RecordingProvider {
    tools: Vec<ToolDescriptor>,
    calls: Mutex<Vec<(String, ToolArgs)>>,
    result: Option<ToolResult>,
    fail_invoke: bool,
    fail_list: bool,
    delay: Option<Duration>,
    closed: AtomicBool,
}

impl RecordingProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn arc() -> Arc<dyn ToolProvider> {
        Self::new()
    }

    pub fn with_tools(names: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            tools: names.iter().map(|n| descriptor(n)).collect(),
            ..Self::default()
        })
    }

    pub fn returning(result: ToolResult) -> Arc<Self> {
        Arc::new(Self {
            result: Some(result),
            ..Self::default()
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail_invoke: true,
            ..Self::default()
        })
    }

    pub fn failing_list() -> Arc<Self> {
        Arc::new(Self {
            fail_list: true,
            ..Self::default()
        })
    }

    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> Vec<(String, ToolArgs)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called_names(&self) -> Vec<String> {
        self.calls().into_iter().map(|(name, _)| name).collect()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToolProvider for RecordingProvider {
    async fn list_tools(&self) -> anyhow::Result<Vec<ToolDescriptor>> {
        if self.fail_list {
            anyhow::bail!("connection refused");
        }
        Ok(self.tools.clone())
    }

    async fn invoke(&self, local_name: &str, args: ToolArgs) -> anyhow::Result<ToolResult> {
        self.calls
            .lock()
            .unwrap()
            .push((local_name.to_string(), args));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_invoke {
            anyhow::bail!("provider exploded");
        }
        Ok(self
            .result
            .clone()
            .unwrap_or_else(|| ToolResult::success(format!("{local_name} ok"))))
    }

    async fn close(&self) -> anyhow::Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Replays canned responses and records every request it was sent.
#[derive(Default)]
pub struct ScriptedModel {
    responses: Mutex<VecDeque<anyhow::Result<ModelResponse>>>,
    repeat: Option<ModelResponse>,
    seen: Mutex<Vec<SeenRequest>>,
}

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub history: Vec<ConversationTurn>,
    pub tool_names: Option<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(responses: Vec<ModelResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().map(Ok).collect()),
            ..Self::default()
        })
    }

    /// Answers every request with the same response.
    pub fn always(response: ModelResponse) -> Arc<Self> {
        Arc::new(Self {
            repeat: Some(response),
            ..Self::default()
        })
    }

    pub fn then_fail(responses: Vec<ModelResponse>, message: &str) -> Arc<Self> {
        let mut queue: VecDeque<_> = responses.into_iter().map(Ok).collect();
        queue.push_back(Err(anyhow::anyhow!(message.to_string())));
        Arc::new(Self {
            responses: Mutex::new(queue),
            ..Self::default()
        })
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl Model for ScriptedModel {
    async fn send(&self, request: ModelRequest<'_>) -> anyhow::Result<ModelResponse> {
        self.seen.lock().unwrap().push(SeenRequest {
            history: request.history.to_vec(),
            tool_names: request
                .tools
                .map(|tools| tools.iter().map(|t| t.name.clone()).collect()),
        });

        if let Some(response) = &self.repeat {
            return Ok(response.clone());
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ModelResponse::new(vec![text("done")])))
    }
}
