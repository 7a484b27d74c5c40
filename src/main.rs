use std::fs::File;
use std::io::{self, BufReader, Write};

use anyhow::Context;
use clap::Parser;

use shadow_agent_trace::cli::Cli;
use shadow_agent_trace::logging::{self, LoggerConfig, MultiAgentLogger};
use shadow_agent_trace::replay::Replayer;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered diagnostics reach the file
    let _guard = match &cli.log_dir {
        Some(dir) => Some(logging::init_file_logging(dir, cli.log_format.into())?),
        None => {
            logging::init_logging(cli.log_format.into())?;
            None
        }
    };

    let config = cli.apply_to(LoggerConfig::from_env()?);
    tracing::info!("Starting trace with {:?}", config);

    let stdout = io::stdout();
    let mut replayer = if cli.recorded_time {
        Replayer::with_recorded_time(config, stdout.lock())
    } else {
        Replayer::new(MultiAgentLogger::with_writer(config, stdout.lock()))
    };

    let applied = match cli.input_path() {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open event stream {}", path.display()))?;
            replayer.replay_reader(BufReader::new(file))?
        }
        None => replayer.replay_reader(io::stdin().lock())?,
    };
    tracing::info!("Replayed {} events", applied);

    let logger = replayer.into_logger();
    if cli.snapshot {
        let snapshot = serde_json::to_string_pretty(&logger.tracker().snapshot())?;
        let mut out = logger.into_writer();
        writeln!(out, "{}", snapshot)?;
    }

    Ok(())
}
