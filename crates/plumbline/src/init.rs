//! Init command - write .plumbline.toml with defaults

use anyhow::Result;
use camino::Utf8PathBuf;
use plumbline_core::config::CONFIG_FILE;
use std::fs;

use crate::cli::InitArgs;

/// Default .plumbline.toml template with sensible settings
const DEFAULT_CONFIG: &str = include_str!("../templates/default.plumbline.toml");

/// Run the init command to create a .plumbline.toml file.
///
/// # Errors
///
/// Returns an error if:
/// - The target path is not a valid UTF-8 path
/// - The target directory does not exist or is not a directory
/// - The config file already exists and `--force` is not set
/// - Writing the config file fails
pub fn run_init(args: InitArgs) -> Result<()> {
    let target_dir = if args.path.is_absolute() {
        args.path
    } else {
        let cwd = std::env::current_dir()?;
        Utf8PathBuf::from_path_buf(cwd)
            .map_err(|_| anyhow::anyhow!("non-utf8 path"))?
            .join(&args.path)
    };

    if !target_dir.exists() {
        return Err(anyhow::anyhow!(
            "Target directory does not exist: {target_dir}"
        ));
    }

    if !target_dir.is_dir() {
        return Err(anyhow::anyhow!(
            "Target path is not a directory: {target_dir}"
        ));
    }

    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "{CONFIG_FILE} already exists at {config_path}\nUse --force to overwrite"
        ));
    }

    fs::write(&config_path, DEFAULT_CONFIG)?;
    println!("✓ Created {CONFIG_FILE} at {config_path}");
    Ok(())
}
