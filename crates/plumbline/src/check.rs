//! Check command implementation

use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use plumbline_c::CProvider;
use plumbline_core::{Checker, Report};
use plumbline_syntax::SyntaxProvider;
use rayon::prelude::*;
use std::io::{self, Write};

use crate::cli::{CheckArgs, OutputFormat};
use crate::config::{OutputConfig, checker_for, load_config, resolve_output};
use crate::files::{SourceFile, collect_source_files};
use crate::output::{HumanPrinter, SerializableNote};

/// Result of checking one file.
#[derive(Debug)]
pub enum FileOutcome {
    Checked { report: Report, source: String },
    Failed { path: Utf8PathBuf, error: String },
}

/// Check every file in parallel. Outcomes keep the order of `files`.
#[must_use]
pub fn check_files(
    checker: &Checker,
    provider: &dyn SyntaxProvider,
    files: &[Utf8PathBuf],
) -> Vec<FileOutcome> {
    files
        .par_iter()
        .map(|path| check_file(checker, provider, path))
        .collect()
}

fn check_file(checker: &Checker, provider: &dyn SyntaxProvider, path: &Utf8Path) -> FileOutcome {
    let failed = |error: String| FileOutcome::Failed {
        path: path.to_owned(),
        error,
    };
    let source = match SourceFile::read(path) {
        Ok(source) => source,
        Err(e) => return failed(format!("{e:#}")),
    };
    match checker.check(path, &source.text, provider) {
        Ok(report) => FileOutcome::Checked {
            report,
            source: source.text,
        },
        Err(e) => failed(e.to_string()),
    }
}

/// Run the check command. Returns `true` when any note or failure occurred.
pub fn run_check(args: CheckArgs) -> Result<bool> {
    let file_config = load_config(args.options.config.as_ref())?;
    let output = resolve_output(&file_config, args.json, args.zero_based, args.context);
    let checker = checker_for(&file_config, &args.options)?;
    let provider = CProvider::new();

    let files = collect_source_files(&args.paths, provider.supported_extensions())?;
    if files.is_empty() {
        eprintln!("No files found");
        return Ok(false);
    }

    let outcomes = check_files(&checker, &provider, &files);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    report_outcomes(&mut out, &outcomes, &output, checker.config().tab_width)
}

/// Print outcomes in order. Returns `true` when anything needs attention.
pub fn report_outcomes(
    out: &mut impl Write,
    outcomes: &[FileOutcome],
    output: &OutputConfig,
    tab_width: usize,
) -> Result<bool> {
    let mut dirty = false;
    let mut json_out: Vec<SerializableNote> = Vec::new();

    for outcome in outcomes {
        match outcome {
            FileOutcome::Failed { path, error } => {
                tracing::error!(%path, "check failed");
                eprintln!("{error}");
                dirty = true;
            }
            FileOutcome::Checked { report, source } => {
                dirty |= !report.is_clean();
                match output.format {
                    OutputFormat::Human => {
                        if report.style_detected {
                            writeln!(
                                out,
                                "{}: indentation detected as using {}\n",
                                report.path, report.style
                            )?;
                        }
                        HumanPrinter::new(source, tab_width, output).print_report(out, report)?;
                    }
                    OutputFormat::Json => json_out.extend(
                        report
                            .notes
                            .iter()
                            .map(|n| SerializableNote::new(n, output.zero_based)),
                    ),
                }
            }
        }
    }

    if output.format == OutputFormat::Json {
        writeln!(out, "{}", serde_json::to_string_pretty(&json_out)?)?;
    }
    Ok(dirty)
}
