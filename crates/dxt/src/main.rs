//! dxt CLI - word-processing document templates.
//!
//! Provides commands for:
//! - `render`: Render a template against JSON data
//! - `parts`: List template parts and the processors that run on them

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{PartsArgs, RenderArgs};
use output::Output;

/// dxt - render word-processing templates.
#[derive(Parser)]
#[command(name = "dxt", version, about)]
struct Cli {
    /// Enable info-level logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a template into a new document.
    Render(RenderArgs),
    /// List the parts of a template.
    Parts(PartsArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Parts(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_render_overrides() {
        let cli = Cli::try_parse_from([
            "dxt",
            "render",
            "letter.docx",
            "--data",
            "people.json",
            "--output",
            "out.docx",
            "--lenient",
            "--primary-part",
            "word/document2.xml",
            "-L",
            "section_start=continuous",
        ])
        .unwrap();
        let Commands::Render(args) = cli.command else {
            panic!("expected render command");
        };

        let settings = args.cli_settings();
        assert_eq!(settings.primary_part.as_deref(), Some("word/document2.xml"));
        assert_eq!(settings.strict, Some(false));
        assert_eq!(
            settings.layout,
            vec![("section_start".to_owned(), "continuous".to_owned())]
        );
    }

    #[test]
    fn test_render_defaults_leave_config_untouched() {
        let cli =
            Cli::try_parse_from(["dxt", "render", "t.docx", "-d", "d.json", "-o", "o.docx"])
                .unwrap();
        let Commands::Render(args) = cli.command else {
            panic!("expected render command");
        };

        let settings = args.cli_settings();
        assert_eq!(settings.primary_part, None);
        assert_eq!(settings.strict, None);
        assert!(settings.layout.is_empty());
    }

    #[test]
    fn test_parts_primary_part() {
        let cli = Cli::try_parse_from([
            "dxt",
            "parts",
            "letter.docx",
            "--primary-part",
            "word/body.xml",
        ])
        .unwrap();
        let Commands::Parts(args) = cli.command else {
            panic!("expected parts command");
        };

        assert_eq!(args.cli_settings().primary_part.as_deref(), Some("word/body.xml"));
    }
}
