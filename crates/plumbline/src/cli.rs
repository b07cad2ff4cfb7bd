//! CLI argument parsing and command definitions

use camino::Utf8PathBuf;
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Context lines printed above each note when nothing else is configured.
pub const DEFAULT_CONTEXT: usize = 3;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Human,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "plumbline",
    version,
    about = "Checks that C indentation follows the code's structure"
)]
pub struct Args {
    /// Log the level table and provider decisions to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Parser)]
pub enum Command {
    /// Check files/directories and report indentation notes
    #[command(visible_alias = "lint")]
    Check(CheckArgs),
    /// Rewrite indentation to the levels the checker expects
    Fix(FixArgs),
    /// Print the syntax tree and per-line levels of one file
    Tree(TreeArgs),
    /// Write a commented .plumbline.toml
    Init(InitArgs),
}

/// Options that change what the checker expects.
#[derive(Debug, Default, clap::Args)]
pub struct CheckOptions {
    /// Indentation uses tabs (skips detection)
    #[arg(short = 't', long, conflicts_with = "spaces")]
    pub tabs: bool,

    /// Indentation uses spaces (skips detection)
    #[arg(short = 's', long)]
    pub spaces: bool,

    /// Width of one indentation level in spaces (1-16)
    #[arg(short = 'l', long, value_name = "N")]
    pub tab_width: Option<usize>,

    /// Report parser diagnostics as notes
    #[arg(long)]
    pub parser_diagnostics: bool,

    /// Extra directory searched for #include targets
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    pub include: Vec<Utf8PathBuf>,

    /// Optional config file (TOML only). Default: .plumbline.toml if present.
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// Files or directories to check.
    #[arg(required = true)]
    pub paths: Vec<Utf8PathBuf>,

    #[command(flatten)]
    pub options: CheckOptions,

    /// Output JSON instead of human format
    #[arg(long)]
    pub json: bool,

    /// Report 0-based lines and columns in JSON output
    #[arg(long)]
    pub zero_based: bool,

    /// Source lines shown above each note
    #[arg(long, value_name = "LINES")]
    pub context: Option<usize>,
}

#[derive(Debug, Parser)]
pub struct FixArgs {
    /// Files or directories to fix.
    #[arg(required = true)]
    pub paths: Vec<Utf8PathBuf>,

    #[command(flatten)]
    pub options: CheckOptions,

    /// List files that would change without writing them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Parser)]
pub struct TreeArgs {
    /// File to dump.
    pub path: Utf8PathBuf,

    #[command(flatten)]
    pub options: CheckOptions,
}

#[derive(Debug, Parser)]
pub struct InitArgs {
    /// Directory that receives .plumbline.toml
    #[arg(default_value = ".")]
    pub path: Utf8PathBuf,

    /// Overwrite an existing .plumbline.toml
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn lint_is_an_alias_for_check() {
        let args = Args::try_parse_from(["plumbline", "lint", "a.c", "-l", "2", "--json"]).unwrap();
        let Command::Check(check) = args.command else {
            panic!("expected check");
        };
        assert_eq!(check.paths, vec![Utf8PathBuf::from("a.c")]);
        assert_eq!(check.options.tab_width, Some(2));
        assert!(check.json);
    }

    #[test]
    fn tabs_and_spaces_conflict() {
        let result = Args::try_parse_from(["plumbline", "check", "-t", "-s", "a.c"]);
        assert!(result.is_err());
    }

    #[test]
    fn include_dirs_accumulate() {
        let args =
            Args::try_parse_from(["plumbline", "fix", "-I", "inc", "--include", "vendor", "a.c"])
                .unwrap();
        let Command::Fix(fix) = args.command else {
            panic!("expected fix");
        };
        assert_eq!(
            fix.options.include,
            vec![Utf8PathBuf::from("inc"), Utf8PathBuf::from("vendor")]
        );
    }
}
