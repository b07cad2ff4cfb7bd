//! Fix command implementation - rewrites indentation in place

use anyhow::Result;
use camino::Utf8Path;
use plumbline_c::CProvider;
use plumbline_core::Checker;
use plumbline_syntax::SyntaxProvider;
use std::fs;

use crate::cli::FixArgs;
use crate::config::{checker_for, load_config};
use crate::files::{SourceFile, collect_source_files};

/// Run the fix command. Returns `true` when a file could not be fixed.
pub fn run_fix(args: FixArgs) -> Result<bool> {
    let file_config = load_config(args.options.config.as_ref())?;
    let checker = checker_for(&file_config, &args.options)?;
    let provider = CProvider::new();

    let files = collect_source_files(&args.paths, provider.supported_extensions())?;
    if files.is_empty() {
        eprintln!("No files found");
        return Ok(false);
    }

    let mut fixed_count = 0;
    let mut failed = false;
    for path in &files {
        match fix_file(&checker, &provider, path, args.dry_run) {
            Ok(0) => {}
            Ok(lines) => {
                let verb = if args.dry_run { "Would fix" } else { "Fixed" };
                println!("{verb}: {path} ({lines} line(s))");
                fixed_count += 1;
            }
            Err(e) => {
                eprintln!("{path}: {e:#}");
                failed = true;
            }
        }
    }

    let file_count = files.len();
    if fixed_count > 0 {
        println!("Fixed {fixed_count} file(s) out of {file_count} checked.");
    } else {
        println!("All {file_count} file(s) already compliant.");
    }
    Ok(failed)
}

/// Reindent one file. Returns the number of rewritten lines.
pub fn fix_file(
    checker: &Checker,
    provider: &dyn SyntaxProvider,
    path: &Utf8Path,
    dry_run: bool,
) -> Result<usize> {
    let source = SourceFile::read(path)?;
    let fixed = checker.fix(path, &source.text, provider)?;
    if fixed.is_unchanged() {
        return Ok(0);
    }
    if !dry_run {
        fs::write(path, source.encode(path, &fixed.text)?)?;
    }
    tracing::debug!(%path, lines = ?fixed.changed, "reindented");
    Ok(fixed.changed.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use plumbline_core::{CheckConfig, StyleChoice};

    fn spaces() -> Checker {
        Checker::new(CheckConfig {
            style: StyleChoice::Spaces,
            ..CheckConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn fixes_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("a.c")).unwrap();
        fs::write(&path, "int f(void)\n{\n  return 0;\n}\n").unwrap();

        let changed = fix_file(&spaces(), &CProvider::new(), &path, false).unwrap();
        assert_eq!(changed, 1);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "int f(void)\n{\n    return 0;\n}\n"
        );
        assert_eq!(fix_file(&spaces(), &CProvider::new(), &path, false).unwrap(), 0);
    }

    #[test]
    fn dry_run_leaves_the_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("a.c")).unwrap();
        let original = "int f(void)\n{\n\treturn 0;\n}\n";
        fs::write(&path, original).unwrap();

        let changed = fix_file(&spaces(), &CProvider::new(), &path, true).unwrap();
        assert_eq!(changed, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }
}
