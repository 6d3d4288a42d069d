use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result};

use sololog::{config, Severity, ShutdownGuard, WriterConfig};

/// Split an input line into its severity prefix and message
///
/// Lines starting with `WARN `, `ERROR ` or `FATAL ` are logged at that level,
/// everything else as info.
fn parse_input_line(line: &str) -> (Severity, &str) {
    for (prefix, severity) in [
        ("WARN ", Severity::Warning),
        ("WARNING ", Severity::Warning),
        ("ERROR ", Severity::Error),
        ("FATAL ", Severity::Fatal),
        ("INFO ", Severity::Info),
    ] {
        if let Some(rest) = line.strip_prefix(prefix) {
            return (severity, rest);
        }
    }
    (Severity::Info, line)
}

fn main() -> Result<()> {
    // Writer diagnostics (path fallback, dropped lines) go to stderr, filtered by RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sololog=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    // Optional config file argument, otherwise the per-user config location
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => WriterConfig::load(&path)?,
        None => WriterConfig::load_default()?,
    };

    let writer = sololog::init(config).context("Failed to initialize log writer")?;
    let _guard = ShutdownGuard::new();

    if let Some(path) = writer.path() {
        tracing::info!("Logging to {}", path.display());
    } else if let Some(path) = config::config_file_path() {
        tracing::info!("No log file in use (config: {})", path.display());
    }

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let (severity, message) = parse_input_line(&line);
        writer.log(severity, message);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_line_prefixes() {
        assert_eq!(parse_input_line("WARN disk"), (Severity::Warning, "disk"));
        assert_eq!(parse_input_line("ERROR boom"), (Severity::Error, "boom"));
        assert_eq!(parse_input_line("FATAL dead"), (Severity::Fatal, "dead"));
        assert_eq!(parse_input_line("INFO ok"), (Severity::Info, "ok"));
    }

    #[test]
    fn test_parse_input_line_plain() {
        assert_eq!(parse_input_line("just text"), (Severity::Info, "just text"));
        assert_eq!(parse_input_line("WARNING: x"), (Severity::Info, "WARNING: x"));
    }
}
