#![warn(rust_2024_compatibility, clippy::all)]

//! C syntax provider for plumbline, backed by tree-sitter-c.

mod includes;
mod lower;

use camino::Utf8Path;
use plumbline_syntax::{
    DiagnosticSeverity, IncludeSearch, ParsedFile, ParserDiagnostic, Position, ProviderError,
    SyntaxProvider, SyntaxTree,
};
use tree_sitter::Parser;

pub use lower::lower;

/// Parses `.c` and `.h` files.
///
/// A fresh parser is created per file, so one provider can be shared by
/// every worker thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct CProvider;

impl CProvider {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SyntaxProvider for CProvider {
    fn name(&self) -> &str {
        "c"
    }

    fn supported_extensions(&self) -> &[&'static str] {
        &["c", "h"]
    }

    fn parse(
        &self,
        path: &Utf8Path,
        source: &str,
        search: &IncludeSearch,
    ) -> Result<ParsedFile, ProviderError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c::LANGUAGE.into())
            .map_err(|e| ProviderError::Grammar(e.to_string()))?;

        let Some(ts_tree) = parser.parse(source, None) else {
            return Ok(fatal("parser produced no syntax tree"));
        };
        let root = ts_tree.root_node();
        if root.is_error() {
            return Ok(fatal("file is not recognisable C"));
        }

        let (tree, mut diagnostics) = lower(root, source);
        diagnostics.extend(includes::unresolved_includes(root, source, path, search));
        diagnostics.sort_by_key(|d| d.position);

        tracing::trace!(%path, nodes = tree.node_count(), diagnostics = diagnostics.len(), "parsed");
        Ok(ParsedFile { tree, diagnostics })
    }
}

fn fatal(message: &str) -> ParsedFile {
    ParsedFile {
        tree: SyntaxTree::empty(),
        diagnostics: vec![ParserDiagnostic {
            severity: DiagnosticSeverity::Fatal,
            message: message.to_string(),
            category: "Parse Issue".to_string(),
            position: Position::new(1, 1),
        }],
    }
}
