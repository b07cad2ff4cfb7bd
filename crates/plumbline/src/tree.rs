//! Tree command - dumps the syntax tree and the per-line level table

use anyhow::Result;
use plumbline_c::CProvider;
use plumbline_core::validate::LineVerdict;
use plumbline_core::{Analysis, Checker};
use std::io::{self, Write};

use crate::cli::TreeArgs;
use crate::config::{checker_for, load_config};
use crate::files::SourceFile;

pub fn run_tree(args: TreeArgs) -> Result<()> {
    let file_config = load_config(args.options.config.as_ref())?;
    let checker = checker_for(&file_config, &args.options)?;
    let source = SourceFile::read(&args.path)?;
    let analysis = checker.analyze(&args.path, &source.text, &CProvider::new())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_tree(&mut out, &checker, analysis, &source.text)?;
    Ok(())
}

/// Write the tree dump followed by one row per line:
/// line, column of the first registered token, level, delta, token, verdict.
pub fn write_tree(
    out: &mut impl Write,
    checker: &Checker,
    analysis: Analysis,
    source: &str,
) -> io::Result<()> {
    write!(out, "{}", analysis.tree)?;
    writeln!(out)?;

    let rows: Vec<_> = source
        .lines()
        .zip(1u32..)
        .map(|(text, number)| {
            let cells = analysis.deltas.get(number).map(|d| {
                let spelling = analysis
                    .tree
                    .tokens()
                    .get(d.entry.token)
                    .map_or("", |t| t.spelling.as_str());
                (d.column, d.entry.level, d.delta, truncate(spelling, 10).to_string())
            });
            (number, cells, text.to_string())
        })
        .collect();

    let (_, verdicts) = checker.check_analysis(analysis, source);
    for ((number, cells, text), verdict) in rows.into_iter().zip(verdicts) {
        let mark = match verdict {
            LineVerdict::Blank | LineVerdict::Untracked => ' ',
            LineVerdict::Accepted => '=',
            LineVerdict::Normalized { .. } => '~',
            LineVerdict::Reported { .. } => '!',
        };
        match cells {
            Some((column, level, delta, token)) => writeln!(
                out,
                "{number:3}:{column:3} {level:3} {delta:3} {token:>10} {mark}|{text}"
            )?,
            None => writeln!(out, "{number:3}:{:>22}{mark}|{text}", "")?,
        }
    }
    Ok(())
}

fn truncate(text: &str, max: usize) -> &str {
    text.char_indices().nth(max).map_or(text, |(i, _)| &text[..i])
}
