//! Trace formatting
//!
//! `TraceFormatter` turns tracked events into indented, optionally colored
//! lines. Every method is a pure function of its arguments and the
//! formatter options: nothing is printed and no tracker state is read.

use chrono::Duration;
use colored::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tracking::SessionType;

/// Author of a logged message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    fn label(&self) -> &'static str {
        match self {
            Role::User => "User:",
            Role::Assistant => "Assistant:",
        }
    }
}

/// Layout options for a formatter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Emit ANSI colors
    pub color: bool,

    /// Spaces per depth level
    pub indent_width: usize,

    /// Maximum characters shown for prompts and tool inputs
    pub preview_chars: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            color: true,
            indent_width: 2,
            preview_chars: 100,
        }
    }
}

/// Formats trace lines with depth-based indentation
#[derive(Debug, Clone)]
pub struct TraceFormatter {
    options: FormatOptions,
    user_color: Color,
    assistant_color: Color,
    tool_color: Color,
    delegation_color: Color,
}

impl TraceFormatter {
    /// Create a formatter with default colors
    pub fn new(options: FormatOptions) -> Self {
        Self {
            options,
            user_color: Color::Cyan,
            assistant_color: Color::Green,
            tool_color: Color::Magenta,
            delegation_color: Color::Blue,
        }
    }

    /// Create a formatter that never emits ANSI codes
    pub fn plain() -> Self {
        Self::new(FormatOptions {
            color: false,
            ..FormatOptions::default()
        })
    }

    /// Current options
    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Header printed when a session starts
    pub fn session_header(
        &self,
        session_id: &str,
        agent: &str,
        depth: usize,
        parent_id: Option<&str>,
    ) -> String {
        let session_type = SessionType::from_depth(depth);
        let color = match session_type {
            SessionType::Parent => Color::BrightBlue,
            SessionType::Child => Color::BrightCyan,
        };

        let mut line = format!(
            "{}{} {} {}",
            self.indent(depth),
            self.paint(&format!("▶ {} SESSION", session_type), color, true),
            self.paint(agent, color, false),
            self.paint(&format!("[{}]", session_id), Color::BrightBlack, false),
        );
        if let Some(parent) = parent_id {
            line.push_str(&self.paint(&format!(" ← {}", parent), Color::BrightBlack, false));
        }
        line
    }

    /// Line printed when a session delegates a task
    pub fn delegation(&self, to_agent: &str, prompt: &str, depth: usize) -> String {
        format!(
            "{}{} {}",
            self.indent(depth),
            self.paint(&format!("→ Delegating to {}:", to_agent), self.delegation_color, true),
            self.paint(&format!("\"{}\"", self.preview(prompt)), Color::BrightBlack, false),
        )
    }

    /// Line printed when a delegation is linked to its child session
    pub fn child_linked(&self, child_session_id: &str, depth: usize) -> String {
        format!(
            "{}{}",
            self.indent(depth),
            self.paint(
                &format!("↳ Child session started: {}", child_session_id),
                self.delegation_color,
                false
            ),
        )
    }

    /// A user or assistant message; every line keeps the indentation
    pub fn message(&self, role: Role, text: &str, depth: usize) -> String {
        let color = match role {
            Role::User => self.user_color,
            Role::Assistant => self.assistant_color,
        };
        let indent = self.indent(depth);
        let mut lines = text.lines();
        let first = lines.next().unwrap_or("");

        let mut out = format!("{}{} {}", indent, self.paint(role.label(), color, true), first);
        for line in lines {
            out.push('\n');
            out.push_str(&indent);
            out.push_str(line);
        }
        out
    }

    /// A tool invocation with a one-line summary of its input
    pub fn tool_call(&self, tool: &str, input: &Value, depth: usize) -> String {
        let summary = self.preview(&summarize_input(input));
        let mut line = format!(
            "{}{}",
            self.indent(depth),
            self.paint(&format!("🔧 {}", tool), self.tool_color, true)
        );
        if !summary.is_empty() {
            line.push(' ');
            line.push_str(&self.paint(&summary, Color::BrightBlack, false));
        }
        line
    }

    /// Footer printed when a session completes
    pub fn session_complete(&self, session_type: SessionType, duration: Duration, depth: usize) -> String {
        format!(
            "{}{}",
            self.indent(depth),
            self.paint(
                &format!("✓ {} completed in {}", session_type, format_duration(duration)),
                Color::Green,
                true
            ),
        )
    }

    /// Informational line from the harness
    pub fn system(&self, message: &str, depth: usize) -> String {
        format!(
            "{}{} {}",
            self.indent(depth),
            self.paint("System:", Color::Yellow, true),
            message
        )
    }

    fn indent(&self, depth: usize) -> String {
        if depth == 0 {
            return String::new();
        }
        let spaces = " ".repeat(depth * self.options.indent_width);
        format!("{}{}", spaces, self.paint("│ ", Color::BrightBlack, false))
    }

    fn preview(&self, text: &str) -> String {
        truncate(&text.replace('\n', " "), self.options.preview_chars)
    }

    fn paint(&self, text: &str, color: Color, bold: bool) -> String {
        if !self.options.color {
            return text.to_string();
        }
        let styled = text.color(color);
        if bold {
            styled.bold().to_string()
        } else {
            styled.to_string()
        }
    }
}

impl Default for TraceFormatter {
    fn default() -> Self {
        Self::new(FormatOptions::default())
    }
}

/// Human-readable duration: `350ms`, `2.5s`, `3m 5s`
pub fn format_duration(duration: Duration) -> String {
    let ms = duration.num_milliseconds().max(0);
    // Seconds are shown to one decimal; decide on the rounded value
    let tenths = (ms + 50) / 100;
    if ms < 1000 {
        format!("{}ms", ms)
    } else if tenths < 600 {
        format!("{}.{}s", tenths / 10, tenths % 10)
    } else {
        let secs = (ms + 500) / 1000;
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Compact one-line rendering of a structured tool input
///
/// A bare string is shown as-is, an object as `key=value` pairs in the
/// order the caller wrote them, anything else as compact JSON.
pub fn summarize_input(input: &Value) -> String {
    match input {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// Cut `text` to at most `max_chars` characters, marking the cut with `…`
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept)
}
