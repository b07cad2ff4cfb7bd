//! Arena-backed syntax tree and its builder.

use std::fmt;
use std::ops::Range;

use crate::Token;

/// Index of a node inside its [`SyntaxTree`].
pub type NodeId = usize;

/// Node categories the indentation rules distinguish.
///
/// Everything a rule does not care about lands in [`NodeKind::Other`], which
/// keeps the provider's own name for debugging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    TranslationUnit,
    FunctionDecl,
    ParmDecl,
    StructDecl,
    EnumDecl,
    DeclStmt,
    CompoundStmt,
    IfStmt,
    WhileStmt,
    ForStmt,
    DoStmt,
    SwitchStmt,
    CaseStmt,
    DefaultStmt,
    NullStmt,
    ExprStmt,
    ParenExpr,
    InitListExpr,
    ArgumentList,
    /// Conditional-compilation block; transparent to the rules.
    Preprocessor,
    Other(&'static str),
}

impl NodeKind {
    /// if / while / for / do / switch.
    #[must_use]
    pub const fn is_control(self) -> bool {
        matches!(
            self,
            Self::IfStmt | Self::WhileStmt | Self::ForStmt | Self::DoStmt | Self::SwitchStmt
        )
    }

    /// Children of these nodes sit one level deeper than the node itself.
    #[must_use]
    pub const fn nests_children(self) -> bool {
        match self {
            Self::IfStmt
            | Self::WhileStmt
            | Self::ForStmt
            | Self::DoStmt
            | Self::SwitchStmt
            | Self::ParenExpr
            | Self::InitListExpr
            | Self::ArgumentList
            | Self::FunctionDecl
            | Self::StructDecl
            | Self::EnumDecl => true,
            Self::TranslationUnit
            | Self::ParmDecl
            | Self::DeclStmt
            | Self::CompoundStmt
            | Self::CaseStmt
            | Self::DefaultStmt
            | Self::NullStmt
            | Self::ExprStmt
            | Self::Preprocessor
            | Self::Other(_) => false,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TranslationUnit => "TranslationUnit",
            Self::FunctionDecl => "FunctionDecl",
            Self::ParmDecl => "ParmDecl",
            Self::StructDecl => "StructDecl",
            Self::EnumDecl => "EnumDecl",
            Self::DeclStmt => "DeclStmt",
            Self::CompoundStmt => "CompoundStmt",
            Self::IfStmt => "IfStmt",
            Self::WhileStmt => "WhileStmt",
            Self::ForStmt => "ForStmt",
            Self::DoStmt => "DoStmt",
            Self::SwitchStmt => "SwitchStmt",
            Self::CaseStmt => "CaseStmt",
            Self::DefaultStmt => "DefaultStmt",
            Self::NullStmt => "NullStmt",
            Self::ExprStmt => "ExprStmt",
            Self::ParenExpr => "ParenExpr",
            Self::InitListExpr => "InitListExpr",
            Self::ArgumentList => "ArgumentList",
            Self::Preprocessor => "Preprocessor",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Range into [`SyntaxTree::tokens`].
    pub tokens: Range<usize>,
}

/// Immutable syntax tree for one file.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
    tokens: Vec<Token>,
}

impl SyntaxTree {
    /// A translation unit with no tokens.
    #[must_use]
    pub fn empty() -> Self {
        TreeBuilder::new(NodeKind::TranslationUnit).finish()
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        0
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id]
    }

    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id].kind
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    /// All tokens of the file in source order.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[must_use]
    pub fn token_range(&self, id: NodeId) -> Range<usize> {
        self.nodes[id].tokens.clone()
    }

    #[must_use]
    pub fn node_tokens(&self, id: NodeId) -> &[Token] {
        &self.tokens[self.token_range(id)]
    }

    #[must_use]
    pub fn first_token(&self, id: NodeId) -> Option<&Token> {
        self.node_tokens(id).first()
    }

    /// Number of nodes, the root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        let node = &self.nodes[id];
        write!(f, "{:indent$}{}", "", node.kind, indent = depth * 2)?;
        if let Some(tok) = self.first_token(id) {
            write!(f, " {}:{} `{}`", tok.start.line, tok.start.column, tok.spelling)?;
        }
        writeln!(f)?;
        for &child in &node.children {
            self.write_node(f, child, depth + 1)?;
        }
        Ok(())
    }
}

/// Indented dump, one node per line.
impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.root(), 0)
    }
}

/// Builds a [`SyntaxTree`] from a pre-order walk.
///
/// Tokens pushed between `start_node` and `finish_node` belong to that node
/// (and to every open ancestor). Tokens must be pushed in source order.
#[derive(Debug)]
pub struct TreeBuilder {
    nodes: Vec<NodeData>,
    tokens: Vec<Token>,
    stack: Vec<NodeId>,
}

impl TreeBuilder {
    /// Start a tree whose root has the given kind.
    #[must_use]
    pub fn new(root: NodeKind) -> Self {
        Self {
            nodes: vec![NodeData {
                kind: root,
                parent: None,
                children: Vec::new(),
                tokens: 0..0,
            }],
            tokens: Vec::new(),
            stack: vec![0],
        }
    }

    /// Open a child of the innermost open node.
    pub fn start_node(&mut self, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        let parent = self.stack.last().copied().unwrap_or(0);
        self.nodes.push(NodeData {
            kind,
            parent: Some(parent),
            children: Vec::new(),
            tokens: self.tokens.len()..self.tokens.len(),
        });
        self.nodes[parent].children.push(id);
        self.stack.push(id);
        id
    }

    pub fn token(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Close the innermost open node. The root is closed by [`Self::finish`].
    pub fn finish_node(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        if let Some(id) = self.stack.pop() {
            self.nodes[id].tokens.end = self.tokens.len();
        }
    }

    /// Innermost open node.
    #[must_use]
    pub fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(0)
    }

    /// Close everything still open and freeze the tree.
    #[must_use]
    pub fn finish(mut self) -> SyntaxTree {
        while self.stack.len() > 1 {
            self.finish_node();
        }
        self.nodes[0].tokens = 0..self.tokens.len();
        SyntaxTree {
            nodes: self.nodes,
            tokens: self.tokens,
        }
    }
}
