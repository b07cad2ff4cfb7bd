//! Expected nesting level of every token, derived from the syntax tree.

use std::collections::BTreeMap;
use std::ops::Range;

use plumbline_syntax::{FileId, NodeId, NodeKind, Position, SyntaxTree, TokenKind};

use crate::notes::{NoteSink, NoteSpan, rule};

/// Level bookkeeping for one token position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelEntry {
    pub level: i32,
    /// Node whose rule assigned this level.
    pub governing: NodeId,
    /// 1-based index of the child (of `governing`) the token came through.
    pub child_index: usize,
    /// For declaration statements: whether this is the first token.
    pub first_token: Option<bool>,
    /// Index into the tree's token stream.
    pub token: usize,
}

/// Per-line ordered map from column to [`LevelEntry`].
#[derive(Debug, Clone, Default)]
pub struct LevelMap {
    lines: BTreeMap<u32, BTreeMap<u32, LevelEntry>>,
}

impl LevelMap {
    fn insert(&mut self, at: Position, entry: LevelEntry) {
        self.lines.entry(at.line).or_default().insert(at.column, entry);
    }

    #[must_use]
    pub fn get(&self, at: Position) -> Option<&LevelEntry> {
        self.lines.get(&at.line)?.get(&at.column)
    }

    /// Entry with the lowest column on `line`.
    #[must_use]
    pub fn first_on_line(&self, line: u32) -> Option<(u32, &LevelEntry)> {
        self.lines
            .get(&line)?
            .iter()
            .next()
            .map(|(col, entry)| (*col, entry))
    }

    /// Lines that carry at least one entry, ascending.
    pub fn lines(&self) -> impl Iterator<Item = u32> + '_ {
        self.lines.keys().copied()
    }

    /// Number of registered positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Walk `tree` and compute the level map, reporting nested conditions and
/// empty blocks into `sink` along the way.
#[must_use]
pub fn assign_levels(tree: &SyntaxTree, sink: &mut NoteSink) -> LevelMap {
    let mut assigner = LevelAssigner {
        tree,
        map: LevelMap::default(),
        sink,
    };
    let root = tree.root();
    assigner.register(tree.token_range(root), 0, root, 1, None);
    assigner.visit(root, 1, None, 0);
    tracing::trace!(positions = assigner.map.len(), "levels assigned");
    assigner.map
}

struct LevelAssigner<'t, 's> {
    tree: &'t SyntaxTree,
    map: LevelMap,
    sink: &'s mut NoteSink,
}

impl LevelAssigner<'_, '_> {
    fn register(
        &mut self,
        range: Range<usize>,
        level: i32,
        governing: NodeId,
        child_index: usize,
        first_token: Option<bool>,
    ) {
        for idx in range {
            let tok = &self.tree.tokens()[idx];
            if tok.file != FileId::MAIN || tok.kind == TokenKind::Preprocessor {
                continue;
            }
            self.map.insert(
                tok.start,
                LevelEntry {
                    level,
                    governing,
                    child_index,
                    first_token,
                    token: idx,
                },
            );
        }
    }

    fn visit(&mut self, id: NodeId, child_index: usize, parent: Option<NodeId>, mut level: i32) {
        let tree = self.tree;
        let kind = tree.kind(id);
        let parent_kind = parent.map(|p| tree.kind(p));
        let range = tree.token_range(id);

        // `else if` stays at the level of the `if` it continues
        if kind == NodeKind::IfStmt && parent_kind == Some(NodeKind::IfStmt) && child_index == 3 {
            level -= 1;
        } else if kind.is_control()
            && let Some(p) = parent
            && tree.kind(p).is_control()
        {
            self.nested_condition(p, id);
        }

        match kind {
            NodeKind::NullStmt => {
                if let Some(p) = parent {
                    self.empty_block(p, id);
                }
                level += 1;
                self.register(range, level, id, child_index, None);
            }
            NodeKind::CompoundStmt => {
                level += 1;
                let interior = self.interior(range);
                self.register(interior, level, id, child_index, None);
            }
            NodeKind::CaseStmt | NodeKind::DefaultStmt => {
                if !range.is_empty() {
                    let label = range.start..range.start + 1;
                    self.register(label, level - 1, id, child_index, None);
                    self.register(range.start + 1..range.end, level, id, child_index, None);
                }
            }
            NodeKind::DeclStmt => {
                if !range.is_empty() {
                    let head = range.start..range.start + 1;
                    self.register(head, level, id, child_index, Some(true));
                    self.register(range.start + 1..range.end, level + 1, id, child_index, Some(false));
                }
            }
            _ if parent_kind.is_some_and(NodeKind::nests_children) => {
                level += 1;
                if let Some(p) = parent {
                    self.register(range, level, p, child_index, None);
                }
            }
            // Aggregates nested in something that does not nest its children
            // anchor their own tokens, so a closing brace lines up with its
            // declaration.
            NodeKind::InitListExpr | NodeKind::StructDecl | NodeKind::EnumDecl => {
                self.register(range, level, id, child_index, None);
            }
            NodeKind::TranslationUnit
            | NodeKind::FunctionDecl
            | NodeKind::ParmDecl
            | NodeKind::IfStmt
            | NodeKind::WhileStmt
            | NodeKind::ForStmt
            | NodeKind::DoStmt
            | NodeKind::SwitchStmt
            | NodeKind::ExprStmt
            | NodeKind::ParenExpr
            | NodeKind::ArgumentList
            | NodeKind::Preprocessor
            | NodeKind::Other(_) => {}
        }

        for (i, &child) in tree.children(id).iter().enumerate() {
            self.visit(child, i + 1, Some(id), level);
        }
    }

    /// Token range of a compound statement without its braces.
    fn interior(&self, mut range: Range<usize>) -> Range<usize> {
        let tokens = self.tree.tokens();
        if range.start < range.end && tokens[range.start].spelling == "{" {
            range.start += 1;
        }
        if range.start < range.end && tokens[range.end - 1].spelling == "}" {
            range.end -= 1;
        }
        range
    }

    fn span_between(&self, from: NodeId, to: NodeId) -> Option<NoteSpan> {
        let start = self.tree.first_token(from)?.start;
        let end = self.tree.first_token(to)?.start;
        Some(NoteSpan::new(start, end))
    }

    fn nested_condition(&mut self, parent: NodeId, node: NodeId) {
        let Some(span) = self.span_between(parent, node) else {
            return;
        };
        self.sink.warn(
            rule::NESTED_CONDITION,
            span,
            "Nested conditions",
            "Put braces around the inner statement to make the nesting explicit",
        );
    }

    fn empty_block(&mut self, parent: NodeId, node: NodeId) {
        let Some(command) = self.tree.first_token(parent) else {
            return;
        };
        if command.spelling == "{" {
            return;
        }
        let title = format!("Note that the \"{}\" command does not execute any statement", command.spelling);
        if let Some(span) = self.span_between(parent, node) {
            self.sink.warn(
                rule::EMPTY_BLOCK,
                span,
                title,
                "Use {} if this is intended, or remove the stray semicolon",
            );
        }
    }
}
