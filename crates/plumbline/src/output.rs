//! Output formatting and note display

use plumbline_core::{Note, Report};
use serde::Serialize;
use std::io::{self, Write};

use crate::config::OutputConfig;

/// One note in the JSON array, shaped for editor linter integrations.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SerializableNote {
    pub severity: &'static str,
    pub rule: String,
    pub location: Location,
    pub excerpt: String,
    pub description: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    /// `[[line, column], [line, column]]`
    pub position: [[u32; 2]; 2],
}

impl SerializableNote {
    #[must_use]
    pub fn new(note: &Note, zero_based: bool) -> Self {
        let shift = u32::from(zero_based);
        let (start, end) = (note.span.start, note.span.end);
        Self {
            severity: note.severity.as_str(),
            rule: note.rule.clone(),
            location: Location {
                file: note.file.to_string(),
                position: [
                    [start.line.saturating_sub(shift), start.column.saturating_sub(shift)],
                    [end.line.saturating_sub(shift), end.column.saturating_sub(shift)],
                ],
            },
            excerpt: note.title.clone(),
            description: note.description.clone(),
        }
    }
}

/// Prints notes with the source lines above them.
///
/// Lines already shown for an earlier note of the same file are not
/// repeated.
pub struct HumanPrinter<'a> {
    lines: Vec<&'a str>,
    tab_width: usize,
    context: usize,
    last_shown: usize,
}

impl<'a> HumanPrinter<'a> {
    #[must_use]
    pub fn new(source: &'a str, tab_width: usize, config: &OutputConfig) -> Self {
        Self {
            lines: source.lines().collect(),
            tab_width,
            context: config.context,
            last_shown: 0,
        }
    }

    /// # Errors
    ///
    /// Fails when `out` cannot be written.
    pub fn print_report(&mut self, out: &mut impl Write, report: &Report) -> io::Result<()> {
        for note in &report.notes {
            self.print_note(out, note)?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Fails when `out` cannot be written.
    pub fn print_note(&mut self, out: &mut impl Write, note: &Note) -> io::Result<()> {
        let line = note.span.end.line as usize;
        writeln!(
            out,
            "{file}:{l}:{c}: {severity} [{rule}]",
            file = note.file,
            l = note.span.start.line,
            c = note.span.start.column,
            severity = note.severity.as_str(),
            rule = note.rule,
        )?;

        let gutter = line.to_string().len().max(2);
        let first = line.saturating_sub(self.context).max(self.last_shown + 1).max(1);
        for number in first..=line {
            let text = self.lines.get(number - 1).copied().unwrap_or("");
            writeln!(out, "{number:>gutter$}: {}", self.expand_tabs(text))?;
        }
        self.last_shown = self.last_shown.max(line);

        let text = self.lines.get(line.wrapping_sub(1)).copied().unwrap_or("");
        let start = if note.span.start.line as usize == line {
            self.display_column(text, note.span.start.column)
        } else {
            1
        };
        let end = self.display_column(text, note.span.end.column).max(start + 1);
        writeln!(
            out,
            "{}{}^ {}",
            " ".repeat(gutter + 1 + start),
            "-".repeat(end - start - 1),
            note.title
        )?;
        writeln!(out, "    {}", note.description)?;
        writeln!(out)
    }

    fn expand_tabs(&self, text: &str) -> String {
        let arrow = format!("{}>", "-".repeat(self.tab_width - 1));
        text.replace('\t', &arrow)
    }

    /// Display column of a 1-based byte column once tabs are expanded.
    fn display_column(&self, text: &str, column: u32) -> usize {
        let byte = (column as usize).saturating_sub(1).min(text.len());
        let prefix = text.get(..byte).unwrap_or(text);
        let tabs = prefix.matches('\t').count();
        prefix.chars().count() + tabs * (self.tab_width - 1) + 1
    }
}
