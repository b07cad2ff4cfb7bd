//! Lowers a tree-sitter-c concrete syntax tree into a [`SyntaxTree`].
//!
//! Named grammar nodes become tree nodes, anonymous ones (keywords and
//! punctuation) become tokens of the node that contains them. A few
//! constructs are reshaped so that child positions mean the same thing for
//! every statement:
//!
//! - `if`/`while`/`switch`/`do` lose their parenthesized condition wrapper;
//!   the parentheses belong to the statement, the expression is a child.
//! - `else` clauses are flattened into the `if` as its third child.
//! - function definitions keep only parameters and the body as children.
//! - struct, union and enum bodies keep only their members as children.

use plumbline_syntax::{
    DiagnosticSeverity, NodeKind, ParserDiagnostic, Position, SyntaxTree, Token, TokenKind,
    TreeBuilder,
};
use tree_sitter::{Node, Point};

/// Grammar nodes lexed as a single token even though they have children.
const ATOMIC: &[&str] = &[
    "string_literal",
    "char_literal",
    "raw_string_literal",
    "system_lib_string",
    "number_literal",
    "comment",
    "preproc_arg",
];

/// Lower a parsed translation unit. Returns the tree and the syntax errors
/// found on the way.
#[must_use]
pub fn lower(root: Node<'_>, source: &str) -> (SyntaxTree, Vec<ParserDiagnostic>) {
    let mut lowering = Lowering {
        source,
        builder: TreeBuilder::new(NodeKind::TranslationUnit),
        diagnostics: Vec::new(),
        directive_line: None,
    };
    lowering.children(root);
    (lowering.builder.finish(), lowering.diagnostics)
}

struct Lowering<'s> {
    source: &'s str,
    builder: TreeBuilder,
    diagnostics: Vec<ParserDiagnostic>,
    /// Line of the last preprocessor directive seen.
    directive_line: Option<u32>,
}

impl Lowering<'_> {
    fn children(&mut self, node: Node<'_>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.lower(child);
        }
    }

    fn wrap(&mut self, kind: NodeKind, node: Node<'_>) {
        self.builder.start_node(kind);
        self.children(node);
        self.builder.finish_node();
    }

    fn placeholder(&mut self) {
        self.builder.start_node(NodeKind::Other("missing"));
        self.builder.finish_node();
    }

    fn lower(&mut self, node: Node<'_>) {
        if node.is_missing() {
            self.missing(node);
            return;
        }
        if node.is_error() {
            self.error(node);
            return;
        }
        let kind = node.kind();
        if !node.is_named() || kind == "comment" {
            self.token(node);
            return;
        }
        if node.child_count() == 0 || ATOMIC.contains(&kind) {
            self.builder.start_node(NodeKind::Other(kind));
            self.token(node);
            self.builder.finish_node();
            return;
        }

        let has_body = node.child_by_field_name("body").is_some();
        match kind {
            "function_definition" => self.function_definition(node),
            "function_declarator" => {
                self.builder.start_node(NodeKind::FunctionDecl);
                self.flatten_children(node);
                self.builder.finish_node();
            }
            "parameter_declaration" | "variadic_parameter" => self.wrap(NodeKind::ParmDecl, node),
            "declaration" | "type_definition" => self.wrap(NodeKind::DeclStmt, node),
            "struct_specifier" | "union_specifier" if has_body => {
                self.aggregate(NodeKind::StructDecl, node);
            }
            "enum_specifier" if has_body => self.aggregate(NodeKind::EnumDecl, node),
            "compound_statement" => self.wrap(NodeKind::CompoundStmt, node),
            "if_statement" => self.conditional(NodeKind::IfStmt, node),
            "while_statement" => self.conditional(NodeKind::WhileStmt, node),
            "switch_statement" => self.conditional(NodeKind::SwitchStmt, node),
            "do_statement" => self.conditional(NodeKind::DoStmt, node),
            "for_statement" => self.wrap(NodeKind::ForStmt, node),
            "case_statement" => {
                let is_default = node.child(0).is_some_and(|c| c.kind() == "default");
                let kind = if is_default {
                    NodeKind::DefaultStmt
                } else {
                    NodeKind::CaseStmt
                };
                self.wrap(kind, node);
            }
            "expression_statement" => {
                let kind = if has_statement_child(node) {
                    NodeKind::ExprStmt
                } else {
                    NodeKind::NullStmt
                };
                self.wrap(kind, node);
            }
            "parenthesized_expression" => self.wrap(NodeKind::ParenExpr, node),
            "initializer_list" => self.wrap(NodeKind::InitListExpr, node),
            "argument_list" => self.wrap(NodeKind::ArgumentList, node),
            k if k.starts_with("preproc_") => self.wrap(NodeKind::Preprocessor, node),
            _ => self.wrap(NodeKind::Other(kind), node),
        }
    }

    /// `if`/`while`/`switch`/`do`: [condition, statements...].
    fn conditional(&mut self, kind: NodeKind, node: Node<'_>) {
        self.builder.start_node(kind);
        let condition = node.child_by_field_name("condition");
        let is_do = kind == NodeKind::DoStmt;
        if condition.is_none() && !is_do {
            self.placeholder();
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if Some(child) == condition && child.kind() == "parenthesized_expression" {
                self.condition(child);
            } else if child.kind() == "else_clause" {
                self.children(child);
            } else {
                self.lower(child);
            }
        }

        if condition.is_none() && is_do {
            self.placeholder();
        }
        self.builder.finish_node();
    }

    /// Parentheses become tokens of the statement, the expression a child.
    fn condition(&mut self, paren: Node<'_>) {
        let mut lowered = false;
        let mut cursor = paren.walk();
        for child in paren.children(&mut cursor) {
            lowered |= is_statement_child(child);
            self.lower(child);
        }
        if !lowered {
            self.placeholder();
        }
    }

    /// [parameters..., body]. Return type and declarator are plain tokens.
    fn function_definition(&mut self, node: Node<'_>) {
        self.builder.start_node(NodeKind::FunctionDecl);
        let body = node.child_by_field_name("body");
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if Some(child) == body {
                self.lower(child);
            } else {
                self.flatten(child);
            }
        }
        self.builder.finish_node();
    }

    /// Struct, union or enum with a body: [members...].
    fn aggregate(&mut self, kind: NodeKind, node: Node<'_>) {
        self.builder.start_node(kind);
        let body = node.child_by_field_name("body");
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if Some(child) == body {
                self.children(child);
            } else {
                self.flatten(child);
            }
        }
        self.builder.finish_node();
    }

    /// Emit `node` as bare tokens of the open node, except for parameters,
    /// which stay nodes.
    fn flatten(&mut self, node: Node<'_>) {
        if node.is_missing() || node.is_error() {
            self.lower(node);
            return;
        }
        match node.kind() {
            "parameter_declaration" | "variadic_parameter" => self.lower(node),
            kind if node.child_count() == 0 || ATOMIC.contains(&kind) => self.token(node),
            _ => self.flatten_children(node),
        }
    }

    fn flatten_children(&mut self, node: Node<'_>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.flatten(child);
        }
    }

    fn token(&mut self, node: Node<'_>) {
        let text = node.utf8_text(self.source.as_bytes()).unwrap_or_default();
        // zero width (inserted) and the newline that ends a directive
        if text.trim().is_empty() {
            return;
        }
        let start = position(node.start_position());
        let end = position(node.end_position());

        let mut kind = token_kind(node);
        if kind == TokenKind::Preprocessor && is_directive(node) {
            self.directive_line = Some(start.line);
        } else if self.directive_line == Some(start.line) && kind != TokenKind::Comment {
            kind = TokenKind::Preprocessor;
        }

        self.builder.token(Token::new(kind, text, start, end));
    }

    fn missing(&mut self, node: Node<'_>) {
        self.diagnostics.push(ParserDiagnostic {
            severity: DiagnosticSeverity::Error,
            message: format!("expected '{}'", node.kind()),
            category: "Parse Issue".to_string(),
            position: position(node.start_position()),
        });
    }

    fn error(&mut self, node: Node<'_>) {
        let text = node.utf8_text(self.source.as_bytes()).unwrap_or_default();
        let snippet: String = text.lines().next().unwrap_or_default().chars().take(24).collect();
        self.diagnostics.push(ParserDiagnostic {
            severity: DiagnosticSeverity::Error,
            message: format!("unexpected '{}'", snippet.trim()),
            category: "Parse Issue".to_string(),
            position: position(node.start_position()),
        });
        tracing::debug!(line = node.start_position().row + 1, "syntax error");

        self.builder.start_node(NodeKind::Other("ERROR"));
        if node.child_count() == 0 {
            self.token(node);
        } else {
            self.children(node);
        }
        self.builder.finish_node();
    }
}

/// Named, not a comment, not inserted by error recovery: lowering it opens a node.
fn is_statement_child(node: Node<'_>) -> bool {
    node.is_named() && !node.is_missing() && node.kind() != "comment"
}

fn has_statement_child(node: Node<'_>) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor).any(is_statement_child)
}

fn is_directive(node: Node<'_>) -> bool {
    node.kind() == "preproc_directive" || (!node.is_named() && node.kind().starts_with('#'))
}

fn token_kind(node: Node<'_>) -> TokenKind {
    let kind = node.kind();
    if !node.is_named() {
        return if kind.starts_with('#') {
            TokenKind::Preprocessor
        } else if kind.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
            TokenKind::Keyword
        } else {
            TokenKind::Punctuation
        };
    }
    match kind {
        "comment" => TokenKind::Comment,
        "primitive_type" => TokenKind::Keyword,
        "string_literal" | "char_literal" | "raw_string_literal" | "number_literal"
        | "system_lib_string" | "true" | "false" | "null" => TokenKind::Literal,
        "preproc_arg" | "preproc_directive" => TokenKind::Preprocessor,
        _ => TokenKind::Identifier,
    }
}

fn position(point: Point) -> Position {
    let line = u32::try_from(point.row + 1).unwrap_or(u32::MAX);
    let column = u32::try_from(point.column + 1).unwrap_or(u32::MAX);
    Position::new(line, column)
}
