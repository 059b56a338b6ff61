use std::path::{Path, PathBuf};

use crate::cli::{Args, ColorChoice};

/// Where the program text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceInput {
    Stdin,
    File(PathBuf),
}

impl SourceInput {
    /// Name used in diagnostics.
    pub fn display_name(&self) -> String {
        match self {
            SourceInput::Stdin => "<stdin>".to_string(),
            SourceInput::File(path) => path.display().to_string(),
        }
    }
}

pub struct AppConfig {
    pub color_enabled: bool,
    pub verbose: bool,
    pub source: SourceInput,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> Self {
        let color_enabled = match args.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => atty::is(atty::Stream::Stderr) && atty::is(atty::Stream::Stdout),
        };

        let source = match args.file.as_deref() {
            None => SourceInput::Stdin,
            Some(path) if path == Path::new("-") => SourceInput::Stdin,
            Some(path) => SourceInput::File(path.to_path_buf()),
        };

        AppConfig {
            color_enabled,
            verbose: args.verbose,
            source,
        }
    }

    /// Filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "kestrel=debug"
        } else {
            "warn"
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides the verbosity flag.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter()));

    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(config.color_enabled)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .try_init();
}
