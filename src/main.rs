use std::io::{self, Read};
use std::path::Path;

use clap::Parser;
use kestrel::cli::{generate_completions, Args, Commands};
use kestrel::config::{init_tracing, AppConfig, SourceInput};
use kestrel::Runtime;
use owo_colors::OwoColorize;
use tracing::debug;

fn main() {
    let args = Args::parse();

    if let Some(Commands::Complete { shell }) = args.command {
        generate_completions(shell);
        return;
    }

    let config = AppConfig::from_args(&args);
    init_tracing(&config);

    let text = match read_source(&config.source) {
        Ok(text) => text,
        Err(e) => {
            error_message(&config, &e);
            std::process::exit(1);
        }
    };

    let runtime = Runtime::new();
    match runtime.run(&config.source.display_name(), &text) {
        Ok(Some(value)) => println!("{}", value),
        Ok(None) => debug!("program produced no value"),
        Err(error) => {
            eprint!("{}", error.render(config.color_enabled));
            std::process::exit(1);
        }
    }
}

fn read_source(source: &SourceInput) -> Result<String, String> {
    match source {
        SourceInput::File(path) => {
            debug!(path = %path.display(), "reading program from file");
            read_file(path)
        }
        SourceInput::Stdin => {
            debug!("reading program from stdin");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("Failed to read from stdin: {}", e))?;
            Ok(buffer)
        }
    }
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

fn error_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{}", message);
    }
}
