#![warn(rust_2024_compatibility, clippy::all)]

//! plumbline-core: checks that the indentation of a source file follows its
//! syntactic structure.
//!
//! The pipeline for one file:
//! 1. a [`SyntaxProvider`] parses the file into a [`SyntaxTree`]
//! 2. [`levels::assign_levels`] gives every token an expected nesting level
//! 3. [`diff::compute_deltas`] turns levels into line-to-line changes
//! 4. [`validate::IndentValidator`] compares them with the measured indentation
//! 5. [`tabs::check_tabs`] flags indentation using the wrong character

pub mod config;
pub mod diff;
pub mod levels;
pub mod lines;
pub mod notes;
pub mod reindent;
pub mod style;
pub mod tabs;
pub mod validate;

#[cfg(test)]
mod testing;

pub use config::{CheckConfig, ConfigError, PlumblineConfig, StyleChoice};
pub use notes::{Note, NoteSink, NoteSpan, Severity};
pub use reindent::Reindented;
pub use style::IndentStyle;

use camino::{Utf8Path, Utf8PathBuf};
use plumbline_syntax::{
    DiagnosticSeverity, IncludeSearch, ParsedFile, ParserDiagnostic, ProviderError, SyntaxProvider,
    SyntaxTree,
};

use crate::diff::LineDeltas;
use crate::levels::LevelMap;
use crate::lines::SourceLines;
use crate::validate::{IndentValidator, LineVerdict};

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// The file could not be parsed at all.
    #[error("{path}:{line}:{column}: fatal: {message}")]
    Fatal {
        path: Utf8PathBuf,
        line: u32,
        column: u32,
        message: String,
    },
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Everything computed for one file before the line checks run.
#[derive(Debug)]
pub struct Analysis {
    pub path: Utf8PathBuf,
    pub tree: SyntaxTree,
    pub diagnostics: Vec<ParserDiagnostic>,
    pub levels: LevelMap,
    pub deltas: LineDeltas,
    pub style: IndentStyle,
    /// True when the style came from the majority vote.
    pub style_detected: bool,
    /// Structural notes found while assigning levels.
    sink: NoteSink,
}

/// Notes for one file.
#[derive(Debug, Clone)]
pub struct Report {
    pub path: Utf8PathBuf,
    pub style: IndentStyle,
    pub style_detected: bool,
    pub notes: Vec<Note>,
}

impl Report {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.notes.is_empty()
    }
}

pub struct Checker {
    config: CheckConfig,
    search: IncludeSearch,
}

impl Checker {
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` for an out-of-range tab width.
    pub fn new(config: CheckConfig) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        let search = IncludeSearch::new(config.include_dirs.clone());
        Ok(Self { config, search })
    }

    #[must_use]
    pub const fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Parse `source` and compute levels and the indentation style.
    ///
    /// # Errors
    ///
    /// Returns `CheckError::Fatal` when the provider could not produce a
    /// usable tree, `CheckError::Provider` when the provider failed.
    pub fn analyze(
        &self,
        path: &Utf8Path,
        source: &str,
        provider: &dyn SyntaxProvider,
    ) -> Result<Analysis, CheckError> {
        let parsed = provider.parse(path, source, &self.search)?;
        if let Some(fatal) = parsed.fatal() {
            return Err(CheckError::Fatal {
                path: path.to_owned(),
                line: fatal.position.line,
                column: fatal.position.column,
                message: fatal.message.clone(),
            });
        }
        let ParsedFile { tree, diagnostics } = parsed;

        let lines = SourceLines::new(source);
        let (style, style_detected) = match self.config.style {
            StyleChoice::Tabs => (IndentStyle::Tabs, false),
            StyleChoice::Spaces => (IndentStyle::Spaces, false),
            StyleChoice::Auto => (style::detect_style(&lines, self.config.tab_width), true),
        };

        let mut sink = NoteSink::new(path);
        if self.config.parser_diagnostics {
            for diag in &diagnostics {
                push_parser_diagnostic(&mut sink, diag);
            }
        }

        let levels = levels::assign_levels(&tree, &mut sink);
        let deltas = diff::compute_deltas(&levels, &tree, &lines);
        tracing::debug!(%path, %style, style_detected, tokens = tree.tokens().len(), "analyzed");

        Ok(Analysis {
            path: path.to_owned(),
            tree,
            diagnostics,
            levels,
            deltas,
            style,
            style_detected,
            sink,
        })
    }

    /// Check one file and return its notes, ordered by line.
    ///
    /// # Errors
    ///
    /// See [`Self::analyze`].
    pub fn check(
        &self,
        path: &Utf8Path,
        source: &str,
        provider: &dyn SyntaxProvider,
    ) -> Result<Report, CheckError> {
        let analysis = self.analyze(path, source, provider)?;
        let (report, _) = self.check_analysis(analysis, source);
        Ok(report)
    }

    /// Run the line checks over a finished analysis. Also returns the
    /// per-line verdicts, mostly for the `tree` command.
    #[must_use]
    pub fn check_analysis(&self, analysis: Analysis, source: &str) -> (Report, Vec<LineVerdict>) {
        let Analysis {
            path,
            tree,
            deltas,
            style,
            style_detected,
            mut sink,
            ..
        } = analysis;
        let lines = SourceLines::new(source);

        let verdicts =
            IndentValidator::new(&tree, &lines, &deltas, self.config.tab_width).run(&mut sink);
        tabs::check_tabs(&tree, &lines, style, &mut sink);

        let notes = sink.into_sorted();
        tracing::debug!(%path, notes = notes.len(), "checked");
        (
            Report {
                path,
                style,
                style_detected,
                notes,
            },
            verdicts,
        )
    }

    /// Rewrite the indentation of `source` to what the checks expect.
    ///
    /// # Errors
    ///
    /// See [`Self::analyze`].
    pub fn fix(
        &self,
        path: &Utf8Path,
        source: &str,
        provider: &dyn SyntaxProvider,
    ) -> Result<Reindented, CheckError> {
        let analysis = self.analyze(path, source, provider)?;
        let lines = SourceLines::new(source);
        Ok(reindent::reindent(
            &analysis.tree,
            &lines,
            &analysis.deltas,
            analysis.style,
            self.config.tab_width,
        ))
    }
}

fn push_parser_diagnostic(sink: &mut NoteSink, diag: &ParserDiagnostic) {
    let severity = match diag.severity {
        DiagnosticSeverity::Ignored | DiagnosticSeverity::Note => Severity::Info,
        DiagnosticSeverity::Warning => Severity::Warning,
        DiagnosticSeverity::Error | DiagnosticSeverity::Fatal => Severity::Error,
    };
    let slug: String = diag
        .category
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let pos = diag.position;
    sink.push(
        severity,
        &format!("{}{slug}", notes::rule::PARSER_PREFIX),
        NoteSpan::on_line(pos.line, pos.column, pos.column.saturating_add(1)),
        diag.category.clone(),
        diag.message.clone(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use plumbline_syntax::{NodeKind, Position, TreeBuilder};

    /// Provider that hands back a fixed parse result.
    struct Canned(ParsedFile);

    impl SyntaxProvider for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        fn supported_extensions(&self) -> &[&'static str] {
            &["c"]
        }

        fn parse(
            &self,
            _path: &Utf8Path,
            _source: &str,
            _search: &IncludeSearch,
        ) -> Result<ParsedFile, ProviderError> {
            Ok(self.0.clone())
        }
    }

    fn diagnostic(severity: DiagnosticSeverity, message: &str) -> ParserDiagnostic {
        ParserDiagnostic {
            severity,
            message: message.to_string(),
            category: "Parse Issue".to_string(),
            position: Position::new(1, 3),
        }
    }

    #[test]
    fn fatal_diagnostic_aborts_the_check() {
        let provider = Canned(ParsedFile {
            tree: SyntaxTree::empty(),
            diagnostics: vec![diagnostic(DiagnosticSeverity::Fatal, "no tree")],
        });
        let checker = Checker::new(CheckConfig::default()).unwrap();
        let err = checker
            .check(Utf8Path::new("bad.c"), "???", &provider)
            .unwrap_err();
        assert!(matches!(err, CheckError::Fatal { line: 1, column: 3, .. }));
        assert_eq!(err.to_string(), "bad.c:1:3: fatal: no tree");
    }

    #[test]
    fn parser_diagnostics_are_opt_in() {
        let provider = Canned(ParsedFile {
            tree: TreeBuilder::new(NodeKind::TranslationUnit).finish(),
            diagnostics: vec![diagnostic(DiagnosticSeverity::Error, "expected ';'")],
        });
        let path = Utf8Path::new("a.c");

        let quiet = Checker::new(CheckConfig::default()).unwrap();
        assert!(quiet.check(path, "", &provider).unwrap().is_clean());

        let loud = Checker::new(CheckConfig {
            parser_diagnostics: true,
            ..CheckConfig::default()
        })
        .unwrap();
        let report = loud.check(path, "", &provider).unwrap();
        assert_eq!(report.notes.len(), 1);
        let note = &report.notes[0];
        assert_eq!(note.severity, Severity::Error);
        assert_eq!(note.rule, "parser/parse-issue");
        assert_eq!(note.title, "Parse Issue");
        assert_eq!(note.description, "expected ';'");
    }

    #[test]
    fn configured_style_skips_detection() {
        let provider = Canned(ParsedFile {
            tree: SyntaxTree::empty(),
            diagnostics: Vec::new(),
        });
        let checker = Checker::new(CheckConfig {
            style: StyleChoice::Tabs,
            ..CheckConfig::default()
        })
        .unwrap();
        let report = checker.check(Utf8Path::new("a.c"), "    x;\n", &provider).unwrap();
        assert_eq!(report.style, IndentStyle::Tabs);
        assert!(!report.style_detected);
        assert_eq!(report.notes.len(), 1);
        assert_eq!(report.notes[0].rule, notes::rule::SPACE_INDENTATION);
    }

    #[test]
    fn rejects_invalid_tab_width() {
        let result = Checker::new(CheckConfig {
            tab_width: 17,
            ..CheckConfig::default()
        });
        assert!(result.is_err());
    }
}
