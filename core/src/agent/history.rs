use crate::traits::ToolArgs;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ConversationTurn {
    UserText(String),
    AssistantText(String),
    AssistantToolRequest {
        id: String,
        name: String,
        args: ToolArgs,
    },
    ToolOutcome {
        correlates_with: String,
        content: String,
        is_error: bool,
    },
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self::UserText(text.into())
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::AssistantText(text.into())
    }

    pub fn tool_request(id: impl Into<String>, name: impl Into<String>, args: ToolArgs) -> Self {
        Self::AssistantToolRequest {
            id: id.into(),
            name: name.into(),
            args,
        }
    }

    pub fn tool_outcome(
        correlates_with: impl Into<String>,
        content: impl Into<String>,
        is_error: bool,
    ) -> Self {
        Self::ToolOutcome {
            correlates_with: correlates_with.into(),
            content: content.into(),
            is_error,
        }
    }

    pub fn role(&self) -> &'static str {
        match self {
            Self::UserText(_) => "user",
            Self::AssistantText(_) | Self::AssistantToolRequest { .. } => "assistant",
            Self::ToolOutcome { .. } => "tool",
        }
    }
}

/// Chronological record of the conversation. Turns are only ever appended;
/// `clear` is the single way to remove them and it removes all of them.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn all(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn contains_request_id(&self, id: &str) -> bool {
        self.turns.iter().any(|turn| {
            matches!(turn, ConversationTurn::AssistantToolRequest { id: existing, .. } if existing == id)
        })
    }
}
