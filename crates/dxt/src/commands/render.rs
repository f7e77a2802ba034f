//! `dxt render` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use dxt_config::{CliSettings, Config};
use dxt_package::Package;
use dxt_render::processors::PlaceholderProcessor;
use dxt_render::{ContextValue, LayoutOptions, ProcessorRegistry, RenderError, Template};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Path to the template document.
    template: PathBuf,

    /// JSON data file: an object renders one context, an array a sequence.
    #[arg(short, long)]
    data: PathBuf,

    /// Path of the rendered document.
    #[arg(short, long)]
    output: PathBuf,

    /// Render missing placeholder values as empty text.
    #[arg(long)]
    lenient: bool,

    /// Layout option as `name=value` (repeatable, overrides config).
    #[arg(short = 'L', long = "layout", value_name = "NAME=VALUE", value_parser = parse_layout)]
    layout: Vec<(String, String)>,

    /// Part whose body is repeated per context (overrides config).
    #[arg(long, value_name = "PART")]
    primary_part: Option<String>,

    /// Path to configuration file (default: auto-discover dxt.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl RenderArgs {
    /// Execute the render command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;

        let data: serde_json::Value = serde_json::from_slice(&std::fs::read(&self.data)?)?;
        let contexts = contexts_from_json(data)?;

        let placeholders = if config.render.strict {
            PlaceholderProcessor::new()
        } else {
            PlaceholderProcessor::lenient()
        };
        let registry = Arc::new(ProcessorRegistry::standard_for(
            &config.template.primary_part,
            placeholders,
        ));
        let template = Template::from_package_with(
            Package::open(&self.template)?,
            registry,
            config.template.primary_part.as_str(),
        )?;

        output.info(&format!(
            "Rendering {} with {} context(s)...",
            self.template.display(),
            contexts.len()
        ));

        let layout = LayoutOptions::from(config.layout_resolved);
        match template.render_to_file(&contexts, &layout, &self.output) {
            Ok(()) => {}
            Err(RenderError::Write { path, source, bytes }) => {
                return Err(CliError::Validation(format!(
                    "failed to write {} ({} bytes rendered): {source}",
                    path.display(),
                    bytes.len()
                )));
            }
            Err(err) => return Err(err.into()),
        }

        output.success(&format!("Wrote {}", self.output.display()));
        Ok(())
    }

    /// Command-line overrides for the loaded configuration.
    pub(crate) fn cli_settings(&self) -> CliSettings {
        CliSettings {
            primary_part: self.primary_part.clone(),
            strict: self.lenient.then_some(false),
            layout: self.layout.clone(),
        }
    }
}

/// Parse a `name=value` layout option.
fn parse_layout(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing option name in `{raw}`"));
    }
    Ok((name.to_owned(), value.trim().to_owned()))
}

/// Contexts from a data document: an array is a sequence, an object a single context.
fn contexts_from_json(data: serde_json::Value) -> Result<Vec<ContextValue>, CliError> {
    match data {
        serde_json::Value::Array(items) => {
            if items.is_empty() {
                return Err(CliError::Validation(
                    "data array must contain at least one context".to_owned(),
                ));
            }
            Ok(items.into_iter().map(ContextValue::from).collect())
        }
        object @ serde_json::Value::Object(_) => Ok(vec![ContextValue::from(object)]),
        _ => Err(CliError::Validation(
            "data must be a JSON object or an array of objects".to_owned(),
        )),
    }
}
