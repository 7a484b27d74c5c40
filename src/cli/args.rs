//! Command line arguments for the trace viewer

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::logging::{LogFormat, LoggerConfig};

#[derive(Parser, Debug)]
#[command(name = "shadow-agent-trace")]
#[command(about = "Render a live multi-agent delegation trace from a JSON Lines event stream")]
#[command(
    long_about = r#"Render a live multi-agent delegation trace from a JSON Lines event stream

USAGE:
  shadow-agent-trace run.jsonl               # Replay a recorded run
  orchestrator | shadow-agent-trace          # Follow a live run on stdin
  shadow-agent-trace run.jsonl --snapshot    # Also dump the tracked hierarchy as JSON"#
)]
#[command(version)]
pub struct Cli {
    /// Event stream to read (stdin when omitted or "-")
    pub input: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Spaces per depth level
    #[arg(long)]
    pub indent: Option<usize>,

    /// Maximum characters shown for prompts and tool inputs
    #[arg(long)]
    pub preview: Option<usize>,

    /// Time sessions by the `timestamp` recorded on each event instead of the wall clock
    #[arg(long)]
    pub recorded_time: bool,

    /// Print the tracked sessions and delegations as JSON after the trace
    #[arg(long)]
    pub snapshot: bool,

    /// Format of diagnostic logs written to stderr
    #[arg(long, value_enum, default_value = "text")]
    pub log_format: LogFormatArg,

    /// Write diagnostic logs to this directory instead of stderr
    #[arg(long, env = "AGENT_TRACE_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

impl Cli {
    /// Apply command line overrides on top of a base configuration
    pub fn apply_to(&self, mut config: LoggerConfig) -> LoggerConfig {
        if self.no_color {
            config = config.with_color(false);
        }
        if let Some(indent) = self.indent {
            config = config.with_indent_width(indent);
        }
        if let Some(preview) = self.preview {
            config = config.with_preview_chars(preview);
        }
        config
    }

    /// Input path, or `None` for stdin
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|p| p.as_os_str() != "-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["shadow-agent-trace"]);

        assert!(cli.input_path().is_none());
        assert!(!cli.no_color);
        assert!(!cli.snapshot);
        assert_eq!(cli.log_format, LogFormatArg::Text);
    }

    #[test]
    fn test_dash_means_stdin() {
        let cli = Cli::parse_from(["shadow-agent-trace", "-"]);
        assert!(cli.input_path().is_none());

        let cli = Cli::parse_from(["shadow-agent-trace", "run.jsonl"]);
        assert_eq!(cli.input_path(), Some(&PathBuf::from("run.jsonl")));
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let cli = Cli::parse_from([
            "shadow-agent-trace",
            "--no-color",
            "--indent",
            "4",
            "--preview",
            "40",
            "--log-format",
            "json",
        ]);
        let config = cli.apply_to(LoggerConfig::default());

        assert!(!config.color);
        assert_eq!(config.indent_width, 4);
        assert_eq!(config.preview_chars, 40);
        assert_eq!(LogFormat::from(cli.log_format), LogFormat::Json);
    }
}
