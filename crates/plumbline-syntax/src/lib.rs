#![warn(rust_2024_compatibility, clippy::all)]

//! Syntax model shared between the plumbline engine and syntax providers.
//!
//! A provider turns one source file into a [`ParsedFile`]: an arena-backed
//! [`SyntaxTree`] whose nodes own contiguous ranges of a flat [`Token`]
//! stream, plus whatever [`ParserDiagnostic`]s the parse produced. The engine
//! never looks at provider internals.

mod tree;

pub use tree::{NodeData, NodeId, NodeKind, SyntaxTree, TreeBuilder};

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Identifies the file a token was read from.
///
/// Providers that expand macros or inline included headers tag those tokens
/// with a non-main id; the engine only ever registers [`FileId::MAIN`] tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

impl FileId {
    /// The file under test.
    pub const MAIN: Self = Self(0);
}

/// 1-based line and 1-based byte column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Keyword,
    Punctuation,
    Comment,
    Literal,
    Identifier,
    /// Any token on a preprocessor directive line.
    Preprocessor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub file: FileId,
    pub kind: TokenKind,
    pub spelling: String,
    pub start: Position,
    /// Extent end (exclusive column).
    pub end: Position,
}

impl Token {
    /// Main-file token.
    #[must_use]
    pub fn new(kind: TokenKind, spelling: impl Into<String>, start: Position, end: Position) -> Self {
        Self {
            file: FileId::MAIN,
            kind,
            spelling: spelling.into(),
            start,
            end,
        }
    }

    /// Single-line token whose end column is derived from its spelling.
    #[must_use]
    pub fn at(kind: TokenKind, spelling: &str, line: u32, column: u32) -> Self {
        let width = u32::try_from(spelling.len()).unwrap_or(u32::MAX);
        Self::new(
            kind,
            spelling,
            Position::new(line, column),
            Position::new(line, column.saturating_add(width)),
        )
    }

    #[must_use]
    pub fn in_file(mut self, file: FileId) -> Self {
        self.file = file;
        self
    }

    #[must_use]
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.spelling == keyword
    }

    #[must_use]
    pub const fn is_comment(&self) -> bool {
        matches!(self.kind, TokenKind::Comment)
    }
}

/// Severity as reported by the parser, before it is mapped onto a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiagnosticSeverity {
    Ignored,
    Note,
    Warning,
    Error,
    /// Aborts the check of the file.
    Fatal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserDiagnostic {
    pub severity: DiagnosticSeverity,
    pub message: String,
    /// Human-readable category, e.g. "Parse Issue".
    pub category: String,
    pub position: Position,
}

/// Directories searched when resolving `#include` directives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeSearch {
    pub dirs: Vec<Utf8PathBuf>,
}

impl IncludeSearch {
    #[must_use]
    pub const fn new(dirs: Vec<Utf8PathBuf>) -> Self {
        Self { dirs }
    }
}

/// Everything a provider hands to the engine for one file.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub tree: SyntaxTree,
    pub diagnostics: Vec<ParserDiagnostic>,
}

impl ParsedFile {
    /// First fatal diagnostic, if the parse must not be checked.
    #[must_use]
    pub fn fatal(&self) -> Option<&ParserDiagnostic> {
        self.diagnostics
            .iter()
            .find(|d| d.severity == DiagnosticSeverity::Fatal)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("grammar could not be loaded: {0}")]
    Grammar(String),
    #[error("{path}: {message}")]
    Source { path: Utf8PathBuf, message: String },
}

/// A source of syntax trees for one language family.
///
/// Implementations must be shareable across threads: the CLI checks files in
/// parallel with one parse per file.
pub trait SyntaxProvider: Send + Sync {
    /// Short provider name, e.g. "c".
    fn name(&self) -> &str;

    /// File extensions (without dot) this provider understands.
    fn supported_extensions(&self) -> &[&'static str];

    /// Parse one file. Fatal problems are reported as a
    /// [`DiagnosticSeverity::Fatal`] diagnostic; `Err` is reserved for
    /// provider-level failures.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the provider itself cannot run.
    fn parse(
        &self,
        path: &Utf8Path,
        source: &str,
        search: &IncludeSearch,
    ) -> Result<ParsedFile, ProviderError>;
}
