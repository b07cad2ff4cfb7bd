//! Configuration loading for .plumbline.toml

use camino::{Utf8Path, Utf8PathBuf};
use garde::Validate;
use serde::{Deserialize, Serialize};

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = ".plumbline.toml";

/// Root configuration from .plumbline.toml
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlumblineConfig {
    #[serde(default)]
    pub check: CheckSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

/// `[check]` table: everything that changes which notes a file gets.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[garde(context(()))]
pub struct CheckSettings {
    #[garde(custom(validate_tab_width))]
    pub tab_width: Option<usize>,
    #[garde(custom(validate_style))]
    pub style: Option<String>,
    #[garde(skip)]
    pub parser_diagnostics: Option<bool>,
    #[garde(skip)]
    pub include_dirs: Option<Vec<String>>,
}

/// `[output]` table: only affects rendering.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[garde(context(()))]
pub struct OutputSettings {
    #[garde(custom(validate_format))]
    pub format: Option<String>,
    #[garde(custom(validate_context))]
    pub context: Option<usize>,
    #[garde(custom(validate_coordinates))]
    pub coordinates: Option<String>,
}

/// How the indentation style of a file is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleChoice {
    Tabs,
    Spaces,
    /// Majority vote over the file's indented lines.
    #[default]
    Auto,
}

impl StyleChoice {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "tabs" => Some(Self::Tabs),
            "spaces" => Some(Self::Spaces),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }
}

/// Resolved settings the checker runs with.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
#[garde(context(()))]
pub struct CheckConfig {
    /// Spaces that make up one indentation level.
    #[garde(range(min = 1, max = 16))]
    pub tab_width: usize,
    #[garde(skip)]
    pub style: StyleChoice,
    /// Surface parser diagnostics as notes.
    #[garde(skip)]
    pub parser_diagnostics: bool,
    #[garde(skip)]
    pub include_dirs: Vec<Utf8PathBuf>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            tab_width: 4,
            style: StyleChoice::Auto,
            parser_diagnostics: false,
            include_dirs: Vec::new(),
        }
    }
}

impl CheckConfig {
    /// Overlay `[check]` settings on the defaults.
    #[must_use]
    pub fn from_settings(settings: &CheckSettings) -> Self {
        let mut config = Self::default();
        if let Some(width) = settings.tab_width {
            config.tab_width = width;
        }
        if let Some(style) = settings.style.as_deref().and_then(StyleChoice::parse) {
            config.style = style;
        }
        if let Some(enabled) = settings.parser_diagnostics {
            config.parser_diagnostics = enabled;
        }
        if let Some(dirs) = &settings.include_dirs {
            config.include_dirs = dirs.iter().map(Utf8PathBuf::from).collect();
        }
        config
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Validation` when the tab width is out of range.
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        Ok(self)
    }
}

// ============================================================================
// Custom Validators
// Note: garde requires `&Option<T>` and `&()` signatures - clippy lints suppressed
// ============================================================================

#[allow(
    clippy::ref_option,
    clippy::trivially_copy_pass_by_ref,
    clippy::option_if_let_else
)]
fn validate_tab_width(value: &Option<usize>, _ctx: &()) -> garde::Result {
    match value {
        Some(v) if !(1..=16).contains(v) => Err(garde::Error::new(format!(
            "{v} is outside the range 1-16 - common values are 2, 4, or 8"
        ))),
        _ => Ok(()),
    }
}

#[allow(
    clippy::ref_option,
    clippy::trivially_copy_pass_by_ref,
    clippy::option_if_let_else
)]
fn validate_style(value: &Option<String>, _ctx: &()) -> garde::Result {
    if let Some(v) = value {
        match StyleChoice::parse(v) {
            Some(_) => Ok(()),
            None => Err(garde::Error::new(format!(
                "'{v}' is not valid - use 'tabs', 'spaces', or 'auto'"
            ))),
        }
    } else {
        Ok(())
    }
}

#[allow(
    clippy::ref_option,
    clippy::trivially_copy_pass_by_ref,
    clippy::option_if_let_else
)]
fn validate_format(value: &Option<String>, _ctx: &()) -> garde::Result {
    if let Some(v) = value {
        match v.as_str() {
            "human" | "json" => Ok(()),
            _ => Err(garde::Error::new(format!(
                "'{v}' is not valid - use 'human' or 'json'"
            ))),
        }
    } else {
        Ok(())
    }
}

#[allow(
    clippy::ref_option,
    clippy::trivially_copy_pass_by_ref,
    clippy::option_if_let_else
)]
fn validate_context(value: &Option<usize>, _ctx: &()) -> garde::Result {
    match value {
        Some(v) if *v > 50 => Err(garde::Error::new(format!(
            "{v} context lines is too many - the maximum is 50"
        ))),
        _ => Ok(()),
    }
}

#[allow(
    clippy::ref_option,
    clippy::trivially_copy_pass_by_ref,
    clippy::option_if_let_else
)]
fn validate_coordinates(value: &Option<String>, _ctx: &()) -> garde::Result {
    if let Some(v) = value {
        match v.as_str() {
            "one" | "zero" => Ok(()),
            _ => Err(garde::Error::new(format!(
                "'{v}' is not valid - use 'one' or 'zero'"
            ))),
        }
    } else {
        Ok(())
    }
}

// ============================================================================
// Config Error
// ============================================================================

/// Why `.plumbline.toml` could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config read error: {0}")]
    Io(String),
    #[error("config parse error: {0}")]
    Parse(String),
    #[error("config validation error: {0}")]
    Validation(String),
}

// ============================================================================
// Config Loading
// ============================================================================

impl PlumblineConfig {
    /// Parse and validate TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the TOML content is invalid.
    /// Returns `ConfigError::Validation` if a table fails validation.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config
            .check
            .validate()
            .map_err(|e| ConfigError::Validation(format!("check: {e}")))?;
        config
            .output
            .validate()
            .map_err(|e| ConfigError::Validation(format!("output: {e}")))?;

        Ok(config)
    }

    /// Load configuration from a TOML file with validation.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise the
    /// errors of [`Self::from_toml`].
    pub fn from_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Load from default location, returning error details on failure.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` with details if loading or validation fails.
    pub fn load_default_strict() -> Result<Option<Self>, ConfigError> {
        let cwd = std::env::current_dir().map_err(|e| ConfigError::Io(e.to_string()))?;
        let config_path = cwd.join(CONFIG_FILE);

        if !config_path.exists() {
            return Ok(None);
        }

        let config_path = Utf8PathBuf::from_path_buf(config_path)
            .map_err(|p| ConfigError::Io(format!("non UTF-8 path: {}", p.display())))?;
        Self::from_file(&config_path).map(Some)
    }
}
