use crate::traits::{ContentBlock, ToolArgs};

const TOOL_CALL_OPEN_TAG: &str = "<tool_call>";
const TOOL_CALL_CLOSE_TAG: &str = "</tool_call>";

/// Splits a plain-text reply into text and tool-request blocks, for models
/// that write `<tool_call>{"name": .., "arguments": {..}}</tool_call>` instead
/// of using native tool calls. Block order follows the text.
pub fn split_tagged_tool_calls(response: &str) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();
    let mut remaining = response;

    while let Some(start) = remaining.find(TOOL_CALL_OPEN_TAG) {
        let after_open = &remaining[start + TOOL_CALL_OPEN_TAG.len()..];
        let Some(close_idx) = after_open.find(TOOL_CALL_CLOSE_TAG) else {
            break;
        };

        push_text(&mut blocks, &remaining[..start]);
        for value in extract_json_values(&after_open[..close_idx]) {
            if let Some(block) = parse_tool_call_value(&value) {
                blocks.push(block);
            }
        }

        remaining = &after_open[close_idx + TOOL_CALL_CLOSE_TAG.len()..];
    }

    push_text(&mut blocks, remaining);
    blocks
}

fn push_text(blocks: &mut Vec<ContentBlock>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        blocks.push(ContentBlock::Text(text.to_string()));
    }
}

fn extract_json_values(text: &str) -> Vec<serde_json::Value> {
    let mut values = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if !in_string && depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start
                        && let Ok(value) = serde_json::from_str::<serde_json::Value>(&text[s..=i])
                    {
                        values.push(value);
                    }
                    start = None;
                }
            }
            _ => {}
        }
    }

    values
}

fn parse_tool_call_value(value: &serde_json::Value) -> Option<ContentBlock> {
    let name = value.get("name")?.as_str()?.to_string();
    let id = format!("call_{}", uuid::Uuid::new_v4().simple());
    let args: ToolArgs = match value.get("arguments") {
        None | Some(serde_json::Value::Null) => ToolArgs::new(),
        Some(serde_json::Value::Object(map)) => map.clone(),
        Some(other) => {
            return Some(ContentBlock::InvalidToolRequest {
                reason: format!("Tool arguments for {} must be an object, got {}", name, other),
                id,
                name,
            });
        }
    };

    Some(ContentBlock::ToolRequest { id, name, args })
}
