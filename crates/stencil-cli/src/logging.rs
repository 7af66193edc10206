//! Tracing subscriber setup for the `stencil` binary.
//!
//! The library crates only emit events. This is the one place a subscriber
//! is installed. Level comes from `-v`/`-q` (see [`GlobalArgs::log_level`])
//! unless `RUST_LOG` is set. Human-readable lines go to stderr; with
//! `logging.file` configured the same events are appended there as JSON.

use std::io::IsTerminal as _;
use std::path::Path;

use anyhow::Context as _;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::GlobalArgs;
use crate::config::AppConfig;

const OWN_TARGETS: [&str; 3] = ["stencil", "stencil_core", "stencil_adapters"];

/// Install the global subscriber. Call once, before the first event.
///
/// Hold on to the returned guard until exit or buffered file lines are lost.
pub fn init_logging(args: &GlobalArgs, config: &AppConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directives(args.log_level())));

    let ansi = !(args.no_color || config.output.no_color) && std::io::stderr().is_terminal();
    let stderr_layer = fmt::layer()
        .compact()
        .without_time()
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(std::io::stderr);

    let mut guard = None;
    let file_layer = match config.logging.file.as_deref() {
        Some(path) => {
            let (writer, g) = file_writer(path)?;
            guard = Some(g);
            Some(fmt::layer().json().with_ansi(false).with_writer(writer))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("a tracing subscriber is already installed")?;

    Ok(guard)
}

/// `stencil=info,stencil_core=info,...` for the given level.
fn directives(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    OWN_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn file_writer(path: &Path) -> anyhow::Result<(NonBlocking, WorkerGuard)> {
    let Some(file_name) = path.file_name() else {
        anyhow::bail!("logging.file has no file name: {}", path.display());
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;

    Ok(tracing_appender::non_blocking(
        tracing_appender::rolling::never(dir, file_name),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(verbose: u8, quiet: bool) -> GlobalArgs {
        GlobalArgs {
            verbose,
            quiet,
            no_color: true,
            config: None,
        }
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(args(0, false).log_level(), LevelFilter::WARN);
        assert_eq!(args(1, false).log_level(), LevelFilter::INFO);
        assert_eq!(args(2, false).log_level(), LevelFilter::DEBUG);
        assert_eq!(args(7, false).log_level(), LevelFilter::TRACE);
    }

    #[test]
    fn quiet_beats_verbose() {
        assert_eq!(args(3, true).log_level(), LevelFilter::ERROR);
    }

    #[test]
    fn directives_cover_every_crate() {
        assert_eq!(
            directives(LevelFilter::DEBUG),
            "stencil=debug,stencil_core=debug,stencil_adapters=debug"
        );
    }

    #[test]
    fn file_writer_creates_parent_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("logs/stencil.log");

        let (_writer, _guard) = file_writer(&path).unwrap();
        assert!(temp.path().join("logs").is_dir());
    }

    #[test]
    fn file_writer_needs_a_file_name() {
        assert!(file_writer(Path::new("/")).is_err());
    }
}
