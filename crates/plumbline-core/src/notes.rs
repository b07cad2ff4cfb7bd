//! Notes and the sink that collects them for one file.

use camino::{Utf8Path, Utf8PathBuf};
use plumbline_syntax::Position;
use serde::{Deserialize, Serialize};

/// Rule identifiers carried by every note.
pub mod rule {
    pub const WRONG_LEVEL: &str = "indent/wrong-level";
    pub const EXTRA_SPACES: &str = "indent/extra-spaces";
    pub const SPACE_INDENTATION: &str = "style/space-indentation";
    pub const TAB_INDENTATION: &str = "style/tab-indentation";
    pub const NESTED_CONDITION: &str = "syntax/nested-condition";
    pub const EMPTY_BLOCK: &str = "syntax/empty-block";
    pub const PARSER_PREFIX: &str = "parser/";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Start and end of a note, both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NoteSpan {
    pub start: Position,
    pub end: Position,
}

impl NoteSpan {
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Span on a single line between two columns.
    #[must_use]
    pub const fn on_line(line: u32, start_column: u32, end_column: u32) -> Self {
        Self::new(
            Position::new(line, start_column),
            Position::new(line, end_column),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub severity: Severity,
    pub rule: String,
    pub file: Utf8PathBuf,
    pub span: NoteSpan,
    pub title: String,
    pub description: String,
}

impl Note {
    /// True for the two notes the indentation validator emits.
    #[must_use]
    pub fn is_indentation(&self) -> bool {
        self.rule == rule::WRONG_LEVEL || self.rule == rule::EXTRA_SPACES
    }
}

/// Ordered collection of notes for one file.
#[derive(Debug, Clone)]
pub struct NoteSink {
    file: Utf8PathBuf,
    notes: Vec<Note>,
}

impl NoteSink {
    #[must_use]
    pub fn new(file: &Utf8Path) -> Self {
        Self {
            file: file.to_owned(),
            notes: Vec::new(),
        }
    }

    pub fn push(
        &mut self,
        severity: Severity,
        rule: &str,
        span: NoteSpan,
        title: impl Into<String>,
        description: impl Into<String>,
    ) {
        self.notes.push(Note {
            severity,
            rule: rule.to_string(),
            file: self.file.clone(),
            span,
            title: title.into(),
            description: description.into(),
        });
    }

    pub fn warn(
        &mut self,
        rule: &str,
        span: NoteSpan,
        title: impl Into<String>,
        description: impl Into<String>,
    ) {
        self.push(Severity::Warning, rule, span, title, description);
    }

    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Notes ordered by starting line; notes on the same line keep insertion order.
    #[must_use]
    pub fn into_sorted(mut self) -> Vec<Note> {
        self.notes.sort_by_key(|n| n.span.start.line);
        self.notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_by_start_line_and_keeps_insertion_order_within_a_line() {
        let mut sink = NoteSink::new(Utf8Path::new("a.c"));
        sink.warn(rule::TAB_INDENTATION, NoteSpan::on_line(7, 1, 2), "late", "");
        sink.warn(rule::WRONG_LEVEL, NoteSpan::on_line(3, 1, 5), "first", "");
        sink.warn(rule::EXTRA_SPACES, NoteSpan::on_line(3, 1, 5), "second", "");
        let notes = sink.into_sorted();
        let titles: Vec<_> = notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["first", "second", "late"]);
        assert!(notes.iter().all(|n| n.file == "a.c"));
    }

    #[test]
    fn indentation_notes_are_recognised_by_rule() {
        let mut sink = NoteSink::new(Utf8Path::new("a.c"));
        sink.warn(rule::EXTRA_SPACES, NoteSpan::on_line(1, 1, 3), "x", "");
        sink.warn(rule::EMPTY_BLOCK, NoteSpan::on_line(1, 1, 3), "y", "");
        let notes = sink.into_sorted();
        assert!(notes[0].is_indentation());
        assert!(!notes[1].is_indentation());
    }

    #[test]
    fn severity_serializes_lowercase() {
        assert_eq!(Severity::Warning.as_str(), "warning");
        assert!(Severity::Info < Severity::Error);
    }
}
