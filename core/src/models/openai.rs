use crate::agent::ConversationTurn;
use crate::models::tagged::split_tagged_tool_calls;
use crate::traits::{ContentBlock, Model, ModelRequest, ModelResponse, ToolArgs, ToolDescriptor};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<OpenAITool<'a>>>,
    temperature: f64,
}

#[derive(Debug, Serialize, PartialEq)]
struct OpenAIMessage<'a> {
    role: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OpenAIToolCallRequest<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<&'a str>,
}

impl<'a> OpenAIMessage<'a> {
    fn text(role: &'a str, content: &'a str) -> Self {
        Self {
            role,
            content: Some(content),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
struct OpenAIToolCallRequest<'a> {
    id: &'a str,
    r#type: &'a str,
    function: OpenAIFunctionRequest<'a>,
}

#[derive(Debug, Serialize, PartialEq)]
struct OpenAIFunctionRequest<'a> {
    name: &'a str,
    arguments: String,
}

#[derive(Debug, Serialize)]
struct OpenAITool<'a> {
    r#type: &'a str,
    function: OpenAIToolFunction<'a>,
}

#[derive(Debug, Serialize)]
struct OpenAIToolFunction<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAIToolCall>>,
}

#[derive(Debug, Deserialize)]
struct OpenAIToolCall {
    #[serde(default)]
    id: String,
    function: OpenAIFunction,
}

#[derive(Debug, Deserialize)]
struct OpenAIFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

/// Client for any OpenAI-compatible chat-completions endpoint.
pub struct OpenAIModel {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    temperature: f64,
}

impl OpenAIModel {
    pub fn new(api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .connect_timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: 1.0,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Consecutive assistant turns (text plus the tool calls that follow it)
    /// collapse into one assistant message, as the chat format expects.
    fn convert_history<'a>(
        system: Option<&'a str>,
        history: &'a [ConversationTurn],
    ) -> Vec<OpenAIMessage<'a>> {
        let mut messages: Vec<OpenAIMessage<'a>> = Vec::new();
        if let Some(system) = system {
            messages.push(OpenAIMessage::text("system", system));
        }

        for turn in history {
            match turn {
                ConversationTurn::UserText(text) => {
                    messages.push(OpenAIMessage::text("user", text));
                }
                ConversationTurn::AssistantText(text) => {
                    messages.push(OpenAIMessage::text("assistant", text));
                }
                ConversationTurn::AssistantToolRequest { id, name, args } => {
                    let call = OpenAIToolCallRequest {
                        id,
                        r#type: "function",
                        function: OpenAIFunctionRequest {
                            name,
                            arguments: serde_json::Value::Object(args.clone()).to_string(),
                        },
                    };
                    match messages.last_mut() {
                        Some(last) if last.role == "assistant" => {
                            last.tool_calls.get_or_insert_with(Vec::new).push(call);
                        }
                        _ => messages.push(OpenAIMessage {
                            role: "assistant",
                            content: None,
                            tool_calls: Some(vec![call]),
                            tool_call_id: None,
                        }),
                    }
                }
                ConversationTurn::ToolOutcome {
                    correlates_with,
                    content,
                    ..
                } => {
                    messages.push(OpenAIMessage {
                        role: "tool",
                        content: Some(content),
                        tool_calls: None,
                        tool_call_id: Some(correlates_with),
                    });
                }
            }
        }

        messages
    }

    fn convert_tools(tools: &[ToolDescriptor]) -> Vec<OpenAITool<'_>> {
        tools
            .iter()
            .map(|t| OpenAITool {
                r#type: "function",
                function: OpenAIToolFunction {
                    name: &t.name,
                    description: &t.description,
                    parameters: &t.input_schema,
                },
            })
            .collect()
    }

    fn convert_response(message: OpenAIResponseMessage) -> anyhow::Result<ModelResponse> {
        let text = message.content.unwrap_or_default();
        let tool_calls = message.tool_calls.unwrap_or_default();

        if tool_calls.is_empty() {
            if text.trim().is_empty() {
                return Err(anyhow::anyhow!(
                    "Empty response from API: no content or tool calls"
                ));
            }
            return Ok(ModelResponse::new(split_tagged_tool_calls(&text)));
        }

        let mut blocks = Vec::with_capacity(tool_calls.len() + 1);
        if !text.trim().is_empty() {
            blocks.push(ContentBlock::Text(text));
        }
        for call in tool_calls {
            let block = match parse_arguments(&call.function.name, &call.function.arguments) {
                Ok(args) => ContentBlock::ToolRequest {
                    id: call.id,
                    name: call.function.name,
                    args,
                },
                Err(e) => ContentBlock::InvalidToolRequest {
                    id: call.id,
                    name: call.function.name,
                    reason: e.to_string(),
                },
            };
            blocks.push(block);
        }
        Ok(ModelResponse::new(blocks))
    }
}

fn parse_arguments(tool: &str, raw: &str) -> anyhow::Result<ToolArgs> {
    if raw.trim().is_empty() {
        return Ok(ToolArgs::new());
    }
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(serde_json::Value::Null) => Ok(ToolArgs::new()),
        Ok(other) => Err(anyhow::anyhow!(
            "Tool arguments for {} must be an object, got {}",
            tool,
            other
        )),
        Err(e) => Err(anyhow::anyhow!(
            "Failed to parse tool arguments for {}: {}",
            tool,
            e
        )),
    }
}

#[async_trait]
impl Model for OpenAIModel {
    async fn send(&self, request: ModelRequest<'_>) -> anyhow::Result<ModelResponse> {
        let openai_request = OpenAIRequest {
            model: &self.model,
            messages: Self::convert_history(request.system, request.history),
            tools: request.tools.map(Self::convert_tools),
            temperature: self.temperature,
        };

        let mut http = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Content-Type", "application/json")
            .json(&openai_request);
        if let Some(api_key) = &self.api_key {
            http = http.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = http.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("API error {}: {}", status, error_text));
        }

        let openai_response: OpenAIResponse = response.json().await?;

        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("No choices in response"))?;

        Self::convert_response(choice.message)
    }

    fn name(&self) -> &str {
        &self.model
    }
}
