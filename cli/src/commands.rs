use console::style;
use std::fmt::Write;
use switchboard_core::{ConversationHistory, ConversationTurn, ToolRegistry};

const PREVIEW_CHARS: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractiveCommand {
    Quit,
    Clear,
    Tools,
    Mode,
    History,
    HistoryFull,
    Query(String),
}

/// Returns `None` for blank lines.
pub fn parse_command(line: &str) -> Option<InteractiveCommand> {
    let line = line.trim();
    let command = match line.to_lowercase().as_str() {
        "" => return None,
        "quit" | "exit" => InteractiveCommand::Quit,
        "clear" => InteractiveCommand::Clear,
        "tools" => InteractiveCommand::Tools,
        "mode" => InteractiveCommand::Mode,
        "history" => InteractiveCommand::History,
        "history_full" => InteractiveCommand::HistoryFull,
        _ => InteractiveCommand::Query(line.to_string()),
    };
    Some(command)
}

pub fn render_tools(registry: &ToolRegistry) -> String {
    if registry.is_empty() {
        return format!("{} No tools registered", style("!").yellow());
    }

    let mut out = format!(
        "{} Available tools ({})\n",
        style("✓").green().bold(),
        registry.len()
    );
    for entry in registry.entries() {
        let _ = writeln!(
            out,
            "  {} - {}",
            style(entry.effective_name()).white().bold(),
            entry.descriptor.description
        );
    }
    out
}

pub fn render_mode(registry: &ToolRegistry, max_iterations: usize) -> String {
    format!(
        "Mode: {} (separator '{}')\nProviders: {}\nMax iterations: {}",
        style(registry.mode()).cyan(),
        registry.separator(),
        if registry.provider_ids().is_empty() {
            "none".to_string()
        } else {
            registry.provider_ids().join(", ")
        },
        max_iterations
    )
}

pub fn render_history(history: &ConversationHistory) -> String {
    if history.is_empty() {
        return "History is empty".to_string();
    }

    let mut out = String::new();
    for (index, turn) in history.all().iter().enumerate() {
        let line = match turn {
            ConversationTurn::UserText(text) => format!("user: {}", preview(text)),
            ConversationTurn::AssistantText(text) => format!("assistant: {}", preview(text)),
            ConversationTurn::AssistantToolRequest { id, name, args } => format!(
                "assistant -> {}({}) [{}]",
                name,
                preview(&serde_json::Value::Object(args.clone()).to_string()),
                id
            ),
            ConversationTurn::ToolOutcome {
                correlates_with,
                content,
                is_error,
            } => format!(
                "tool [{}]{}: {}",
                correlates_with,
                if *is_error { " error" } else { "" },
                preview(content)
            ),
        };
        let _ = writeln!(out, "{:>3}. {}", index + 1, line);
    }
    out
}

pub fn render_history_full(history: &ConversationHistory) -> String {
    serde_json::to_string_pretty(history.all()).unwrap_or_else(|e| format!("<unprintable: {}>", e))
}

fn preview(text: &str) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= PREVIEW_CHARS {
        return single_line;
    }
    let truncated: String = single_line.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", truncated)
}
