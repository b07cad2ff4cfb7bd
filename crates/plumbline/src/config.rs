//! Configuration file loading and flag overrides

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use plumbline_core::{CheckConfig, Checker, PlumblineConfig, StyleChoice};

use crate::cli::{CheckOptions, DEFAULT_CONTEXT, OutputFormat};

/// How reports are rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub context: usize,
    pub zero_based: bool,
}

impl OutputConfig {
    fn from_file(file: &PlumblineConfig) -> Self {
        let output = &file.output;
        Self {
            format: match output.format.as_deref() {
                Some("json") => OutputFormat::Json,
                _ => OutputFormat::Human,
            },
            context: output.context.unwrap_or(DEFAULT_CONTEXT),
            zero_based: output.coordinates.as_deref() == Some("zero"),
        }
    }
}

/// Read `path`, or `.plumbline.toml` in the working directory if present.
pub fn load_config(path: Option<&Utf8PathBuf>) -> Result<PlumblineConfig> {
    match path {
        Some(p) => PlumblineConfig::from_file(p).with_context(|| format!("loading {p}")),
        None => Ok(PlumblineConfig::load_default_strict()?.unwrap_or_default()),
    }
}

/// Overlay command-line flags on the `[check]` table.
#[must_use]
pub fn resolve_check(file: &PlumblineConfig, options: &CheckOptions) -> CheckConfig {
    let mut config = CheckConfig::from_settings(&file.check);
    if options.tabs {
        config.style = StyleChoice::Tabs;
    } else if options.spaces {
        config.style = StyleChoice::Spaces;
    }
    if let Some(width) = options.tab_width {
        config.tab_width = width;
    }
    if options.parser_diagnostics {
        config.parser_diagnostics = true;
    }
    config.include_dirs.extend(options.include.iter().cloned());
    config
}

/// Build a checker from the config file and flags.
pub fn checker_for(file: &PlumblineConfig, options: &CheckOptions) -> Result<Checker> {
    let check = resolve_check(file, options);
    tracing::debug!(?check, "resolved check settings");
    Ok(Checker::new(check)?)
}

/// Overlay output flags on the `[output]` table.
#[must_use]
pub fn resolve_output(
    file: &PlumblineConfig,
    json: bool,
    zero_based: bool,
    context: Option<usize>,
) -> OutputConfig {
    let mut output = OutputConfig::from_file(file);
    if json {
        output.format = OutputFormat::Json;
    }
    if zero_based {
        output.zero_based = true;
    }
    if let Some(lines) = context {
        output.context = lines;
    }
    output
}
