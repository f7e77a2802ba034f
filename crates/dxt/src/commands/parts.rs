//! `dxt parts` command implementation.

use std::path::PathBuf;

use clap::Args;
use dxt_config::{CliSettings, Config};
use dxt_package::Package;
use dxt_render::ProcessorRegistry;
use dxt_render::processors::PlaceholderProcessor;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the parts command.
#[derive(Args)]
pub(crate) struct PartsArgs {
    /// Path to the template document.
    template: PathBuf,

    /// Part whose body is repeated per context (overrides config).
    #[arg(long, value_name = "PART")]
    primary_part: Option<String>,

    /// Path to configuration file (default: auto-discover dxt.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl PartsArgs {
    /// Execute the parts command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;
        let package = Package::open(&self.template)?;
        let registry = ProcessorRegistry::standard_for(
            &config.template.primary_part,
            PlaceholderProcessor::new(),
        );

        output.highlight(&format!(
            "{} ({} parts)",
            self.template.display(),
            package.len()
        ));
        for name in package.part_names() {
            let processors = describe(&registry, name);
            let marker = if name == config.template.primary_part {
                " [primary]"
            } else {
                ""
            };
            if processors.is_empty() {
                output.muted(&format!("  {name}{marker}"));
            } else {
                output.info(&format!("  {name}{marker} -> {processors}"));
            }
        }
        Ok(())
    }

    /// Command-line overrides for the loaded configuration.
    pub(crate) fn cli_settings(&self) -> CliSettings {
        CliSettings {
            primary_part: self.primary_part.clone(),
            ..Default::default()
        }
    }
}

/// Comma-separated names of the processors registered for a part.
fn describe(registry: &ProcessorRegistry, part: &str) -> String {
    registry
        .resolve(part)
        .iter()
        .map(|p| p.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_describe_standard_registry() {
        let registry = ProcessorRegistry::standard();
        assert_eq!(
            describe(&registry, "word/document.xml"),
            "placeholder, layout-defaults, section-layout"
        );
        assert_eq!(describe(&registry, "word/footer1.xml"), "placeholder");
        assert_eq!(describe(&registry, "word/styles.xml"), "");
    }
}
