//! Compares measured indentation against the expected level changes.
//!
//! The validator walks the file top to bottom carrying the level of the
//! previous checked line. Each line is expected at `previous + delta`; lines
//! that miss are either tolerated (continuations, `case` labels, comments) or
//! reported. After a report the next mismatch is absorbed silently so one
//! misplaced block yields one note instead of a cascade.

use plumbline_syntax::{NodeKind, SyntaxTree};

use crate::diff::{LineDelta, LineDeltas};
use crate::levels::LevelEntry;
use crate::lines::{LineIndent, SourceLines};
use crate::notes::{NoteSink, NoteSpan, rule};

/// Outcome for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineVerdict {
    /// Whitespace only.
    Blank,
    /// No registered token; leaves the running state alone.
    Untracked,
    /// Indented exactly as expected.
    Accepted,
    /// Indented differently but tolerated; counted as the expected level.
    Normalized { expected: i64 },
    Reported { expected: i64 },
}

/// How a line's measured indentation relates to the expected level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Assessment {
    Exact,
    Tolerated,
    Mismatch,
}

/// Classify one line without regard to the suppression state.
pub(crate) fn assess(
    tree: &SyntaxTree,
    delta: &LineDelta,
    indent: &LineIndent,
    expected: i64,
) -> Assessment {
    let levels = i64::from(indent.levels());
    if levels == expected && indent.partial_spaces == 0 {
        return Assessment::Exact;
    }

    let Some(token) = tree.tokens().get(delta.entry.token) else {
        return Assessment::Mismatch;
    };

    // labels may be indented one level into the switch body or not
    if (token.is_keyword("case") || token.is_keyword("default")) && levels == expected + 1 {
        return Assessment::Tolerated;
    }

    if (levels > expected || indent.partial_spaces > 0)
        && (token.is_comment() || accepts_excess(tree, &delta.entry))
    {
        return Assessment::Tolerated;
    }

    Assessment::Mismatch
}

/// Whether the construct that placed a token allows extra indentation there,
/// i.e. the token sits in a continuation region rather than a body.
fn accepts_excess(tree: &SyntaxTree, entry: &LevelEntry) -> bool {
    let children = tree.children(entry.governing);
    match tree.kind(entry.governing) {
        NodeKind::IfStmt | NodeKind::WhileStmt | NodeKind::SwitchStmt => entry.child_index == 1,
        NodeKind::ForStmt => entry.child_index < children.len(),
        NodeKind::FunctionDecl => {
            let has_body = children
                .last()
                .is_some_and(|&c| tree.kind(c) == NodeKind::CompoundStmt);
            !has_body || entry.child_index < children.len()
        }
        NodeKind::DoStmt => entry.child_index == 2,
        NodeKind::ParenExpr | NodeKind::InitListExpr | NodeKind::ArgumentList => true,
        NodeKind::DeclStmt => entry.first_token == Some(false),
        NodeKind::TranslationUnit
        | NodeKind::ParmDecl
        | NodeKind::StructDecl
        | NodeKind::EnumDecl
        | NodeKind::CompoundStmt
        | NodeKind::CaseStmt
        | NodeKind::DefaultStmt
        | NodeKind::NullStmt
        | NodeKind::ExprStmt
        | NodeKind::Preprocessor
        | NodeKind::Other(_) => false,
    }
}

pub struct IndentValidator<'a> {
    tree: &'a SyntaxTree,
    lines: &'a SourceLines<'a>,
    deltas: &'a LineDeltas,
    tab_width: usize,
}

impl<'a> IndentValidator<'a> {
    #[must_use]
    pub const fn new(
        tree: &'a SyntaxTree,
        lines: &'a SourceLines<'a>,
        deltas: &'a LineDeltas,
        tab_width: usize,
    ) -> Self {
        Self {
            tree,
            lines,
            deltas,
            tab_width,
        }
    }

    /// Check every line, pushing notes into `sink`. Returns one verdict per line.
    pub fn run(&self, sink: &mut NoteSink) -> Vec<LineVerdict> {
        let mut verdicts = Vec::with_capacity(self.lines.len());
        let mut previous: i64 = 0;
        let mut suppressed = false;

        for line in self.lines.iter() {
            if line.is_blank() {
                verdicts.push(LineVerdict::Blank);
                continue;
            }
            let Some(delta) = self.deltas.get(line.number) else {
                verdicts.push(LineVerdict::Untracked);
                continue;
            };

            let indent = LineIndent::measure(line.text, self.tab_width);
            let levels = i64::from(indent.levels());
            let expected = previous + i64::from(delta.delta);

            let verdict = match assess(self.tree, delta, &indent, expected) {
                Assessment::Exact => LineVerdict::Accepted,
                Assessment::Tolerated => LineVerdict::Normalized { expected },
                Assessment::Mismatch if suppressed => LineVerdict::Normalized { expected },
                Assessment::Mismatch => {
                    Self::report(sink, line.number, delta.column, &indent, expected);
                    LineVerdict::Reported { expected }
                }
            };

            suppressed = matches!(verdict, LineVerdict::Reported { .. });
            previous = match verdict {
                LineVerdict::Normalized { expected } => expected,
                _ => levels,
            };
            verdicts.push(verdict);
        }

        verdicts
    }

    fn report(sink: &mut NoteSink, line: u32, column: u32, indent: &LineIndent, expected: i64) {
        let span = NoteSpan::on_line(line, 1, column);
        let levels = i64::from(indent.levels());
        if levels != expected {
            sink.warn(
                rule::WRONG_LEVEL,
                span,
                "Wrong indentation",
                format!(
                    "Indented {levels} levels, but {expected} levels would be better. Fix the whole block that follows!"
                ),
            );
        }
        if indent.partial_spaces > 0 {
            sink.warn(
                rule::EXTRA_SPACES,
                span,
                "Extra spaces",
                format!("Remove {} spaces from this line", indent.partial_spaces),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::compute_deltas;
    use crate::levels::assign_levels;
    use crate::notes::Note;
    use crate::testing::TreeSketch;
    use camino::Utf8Path;

    fn validate(tree: &SyntaxTree, source: &str, width: usize) -> (Vec<LineVerdict>, Vec<Note>) {
        let lines = SourceLines::new(source);
        let mut sink = NoteSink::new(Utf8Path::new("t.c"));
        let map = assign_levels(tree, &mut sink);
        let mut sink = NoteSink::new(Utf8Path::new("t.c"));
        let deltas = compute_deltas(&map, tree, &lines);
        let verdicts = IndentValidator::new(tree, &lines, &deltas, width).run(&mut sink);
        (verdicts, sink.into_sorted())
    }

    // int main() {
    // <body lines...>
    // }
    fn function(t: &mut TreeSketch, body: impl FnOnce(&mut TreeSketch), close_line: u32) {
        t.open(NodeKind::FunctionDecl);
        t.kw("int", 1, 1).ident("main", 1, 5).punct("(", 1, 9).punct(")", 1, 10);
        t.open(NodeKind::CompoundStmt);
        t.punct("{", 1, 12);
        body(t);
        t.punct("}", close_line, 1);
        t.close();
        t.close();
    }

    fn if_stmt(t: &mut TreeSketch, line: u32, col: u32, body: impl FnOnce(&mut TreeSketch)) {
        t.open(NodeKind::IfStmt);
        t.kw("if", line, col).punct("(", line, col + 3);
        t.leaf(NodeKind::Other("identifier"), |t| {
            t.ident("x", line, col + 4);
        });
        t.punct(")", line, col + 5);
        body(t);
        t.close();
    }

    fn call(t: &mut TreeSketch, name: &str, line: u32, col: u32) {
        t.leaf(NodeKind::ExprStmt, |t| {
            t.ident(name, line, col);
            t.punct("(", line, col + 1).punct(")", line, col + 2).punct(";", line, col + 3);
        });
    }

    #[test]
    fn well_indented_if_block_has_no_notes() {
        let src = "int main() {\n    if (x)\n        y();\n}\n";
        let mut t = TreeSketch::new();
        function(
            &mut t,
            |t| {
                if_stmt(t, 2, 5, |t| call(t, "y", 3, 9));
            },
            4,
        );
        let tree = t.finish();
        let (verdicts, notes) = validate(&tree, src, 4);
        assert!(notes.is_empty(), "{notes:?}");
        assert!(verdicts.iter().all(|v| *v == LineVerdict::Accepted));
    }

    #[test]
    fn over_indented_statement_is_reported_once() {
        let src = "int main() {\n    if (x)\n            y();\n}\n";
        let mut t = TreeSketch::new();
        function(
            &mut t,
            |t| {
                if_stmt(t, 2, 5, |t| call(t, "y", 3, 13));
            },
            4,
        );
        let tree = t.finish();
        let (verdicts, notes) = validate(&tree, src, 4);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].rule, rule::WRONG_LEVEL);
        assert_eq!(
            notes[0].description,
            "Indented 3 levels, but 2 levels would be better. Fix the whole block that follows!"
        );
        assert_eq!(notes[0].span, NoteSpan::on_line(3, 1, 13));
        assert_eq!(verdicts[2], LineVerdict::Reported { expected: 2 });
    }

    #[test]
    fn indented_case_body_in_flush_switch_is_reported() {
        // switch (x) {
        // case 1:
        //         y();
        // }
        let src = "switch (x) {\ncase 1:\n        y();\n}\n";
        let mut t = TreeSketch::new();
        t.open(NodeKind::SwitchStmt);
        t.kw("switch", 1, 1).punct("(", 1, 8);
        t.leaf(NodeKind::Other("identifier"), |t| {
            t.ident("x", 1, 9);
        });
        t.punct(")", 1, 10);
        t.open(NodeKind::CompoundStmt);
        t.punct("{", 1, 12);
        t.open(NodeKind::CaseStmt);
        t.kw("case", 2, 1).literal("1", 2, 6).punct(":", 2, 7);
        call(&mut t, "y", 3, 9);
        t.close();
        t.punct("}", 4, 1);
        t.close();
        t.close();
        let tree = t.finish();

        let (_, notes) = validate(&tree, src, 4);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].span.start.line, 3);
        assert!(notes[0].description.contains("Indented 2 levels, but 1 levels"));
    }

    #[test]
    fn case_label_may_be_indented_into_the_switch() {
        let src = "switch (x) {\n    case 1:\n        y();\n}\n";
        let mut t = TreeSketch::new();
        t.open(NodeKind::SwitchStmt);
        t.kw("switch", 1, 1).punct("(", 1, 8);
        t.leaf(NodeKind::Other("identifier"), |t| {
            t.ident("x", 1, 9);
        });
        t.punct(")", 1, 10);
        t.open(NodeKind::CompoundStmt);
        t.punct("{", 1, 12);
        t.open(NodeKind::CaseStmt);
        t.kw("case", 2, 5).literal("1", 2, 10).punct(":", 2, 11);
        call(&mut t, "y", 3, 9);
        t.close();
        t.punct("}", 4, 1);
        t.close();
        t.close();
        let tree = t.finish();

        let (verdicts, notes) = validate(&tree, src, 4);
        // normalized to level 0, so the body at two levels is one too deep
        assert_eq!(verdicts[1], LineVerdict::Normalized { expected: 0 });
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].span.start.line, 3);
    }

    #[test]
    fn consecutive_mismatches_report_only_the_first() {
        let src = "int main() {\n      a();\n  b();\n        c();\n}\n";
        let mut t = TreeSketch::new();
        function(
            &mut t,
            |t| {
                call(t, "a", 2, 7);
                call(t, "b", 3, 3);
                call(t, "c", 4, 9);
            },
            5,
        );
        let tree = t.finish();
        let (verdicts, notes) = validate(&tree, src, 4);

        assert_eq!(verdicts[1], LineVerdict::Reported { expected: 1 });
        assert_eq!(verdicts[2], LineVerdict::Normalized { expected: 1 });
        assert_eq!(verdicts[3], LineVerdict::Reported { expected: 1 });
        let lines: Vec<_> = notes.iter().map(|n| n.span.start.line).collect();
        assert_eq!(lines, [2, 4]);
        // line 2 has both a correct level count and leftover spaces
        assert_eq!(notes[0].rule, rule::EXTRA_SPACES);
        assert_eq!(notes[0].description, "Remove 2 spaces from this line");
    }

    #[test]
    fn wrong_level_precedes_extra_spaces_on_the_same_line() {
        let src = "int main() {\n          a();\n}\n";
        let mut t = TreeSketch::new();
        function(&mut t, |t| call(t, "a", 2, 11), 3);
        let tree = t.finish();
        let (_, notes) = validate(&tree, src, 4);
        let rules: Vec<_> = notes.iter().map(|n| n.rule.as_str()).collect();
        assert_eq!(rules, [rule::WRONG_LEVEL, rule::EXTRA_SPACES]);
    }

    #[test]
    fn condition_continuation_may_be_deeper() {
        // if (x &&
        //         y)
        //     z();
        let src = "if (x &&\n        y)\n    z();\n";
        let mut t = TreeSketch::new();
        t.open(NodeKind::IfStmt);
        t.kw("if", 1, 1).punct("(", 1, 4);
        t.leaf(NodeKind::Other("binary_expression"), |t| {
            t.ident("x", 1, 5).punct("&&", 1, 7).ident("y", 2, 9);
        });
        t.punct(")", 2, 10);
        call(&mut t, "z", 3, 5);
        t.close();
        let tree = t.finish();

        let (verdicts, notes) = validate(&tree, src, 4);
        assert!(notes.is_empty(), "{notes:?}");
        assert_eq!(verdicts[1], LineVerdict::Normalized { expected: 1 });
    }

    #[test]
    fn declaration_continuation_tolerates_alignment() {
        // int total = a +
        //             b;
        let src = "int total = a +\n            b;\n";
        let mut t = TreeSketch::new();
        t.open(NodeKind::DeclStmt);
        t.kw("int", 1, 1).ident("total", 1, 5).punct("=", 1, 11);
        t.leaf(NodeKind::Other("binary_expression"), |t| {
            t.ident("a", 1, 13).punct("+", 1, 15).ident("b", 2, 13);
        });
        t.punct(";", 2, 14);
        t.close();
        let tree = t.finish();

        let (_, notes) = validate(&tree, src, 4);
        assert!(notes.is_empty(), "{notes:?}");
    }

    #[test]
    fn over_indented_declaration_head_is_reported() {
        // int main() {
        //     g();
        //         int x = 1;
        // }
        let src = "int main() {\n    g();\n        int x = 1;\n}\n";
        let mut t = TreeSketch::new();
        function(
            &mut t,
            |t| {
                call(t, "g", 2, 5);
                t.open(NodeKind::DeclStmt);
                t.kw("int", 3, 9).ident("x", 3, 13).punct("=", 3, 15);
                t.leaf(NodeKind::Other("number_literal"), |t| {
                    t.literal("1", 3, 17);
                });
                t.punct(";", 3, 18);
                t.close();
            },
            4,
        );
        let tree = t.finish();

        let (verdicts, notes) = validate(&tree, src, 4);
        assert_eq!(verdicts[2], LineVerdict::Reported { expected: 1 });
        assert_eq!(notes.len(), 1, "{notes:?}");
        assert_eq!(notes[0].span.start.line, 3);
        assert_eq!(
            notes[0].description,
            "Indented 2 levels, but 1 levels would be better. Fix the whole block that follows!"
        );
    }

    // do
    // <body line>
    // while (a &&
    // <cond line>
    fn do_loop(t: &mut TreeSketch, body_col: u32, cond_col: u32) {
        t.open(NodeKind::DoStmt);
        t.kw("do", 1, 1);
        call(t, "g", 2, body_col);
        t.kw("while", 3, 1).punct("(", 3, 7);
        t.leaf(NodeKind::Other("binary_expression"), |t| {
            t.ident("a", 3, 8).punct("&&", 3, 10).ident("b", 4, cond_col);
        });
        t.punct(")", 4, cond_col + 1).punct(";", 4, cond_col + 2);
        t.close();
    }

    #[test]
    fn do_condition_continuation_may_be_deeper() {
        let src = "do\n    g();\nwhile (a &&\n        b);\n";
        let mut t = TreeSketch::new();
        do_loop(&mut t, 5, 9);
        let tree = t.finish();

        let (verdicts, notes) = validate(&tree, src, 4);
        assert!(notes.is_empty(), "{notes:?}");
        assert_eq!(verdicts[1], LineVerdict::Accepted);
        assert_eq!(verdicts[3], LineVerdict::Normalized { expected: 1 });
    }

    #[test]
    fn over_indented_do_body_is_reported() {
        let src = "do\n        g();\nwhile (a &&\n        b);\n";
        let mut t = TreeSketch::new();
        do_loop(&mut t, 9, 9);
        let tree = t.finish();

        let (verdicts, notes) = validate(&tree, src, 4);
        assert_eq!(verdicts[1], LineVerdict::Reported { expected: 1 });
        assert_eq!(notes.len(), 1, "{notes:?}");
        assert_eq!(notes[0].span.start.line, 2);
        assert_eq!(notes[0].rule, rule::WRONG_LEVEL);
    }

    #[test]
    fn body_of_for_is_not_a_continuation() {
        let src = "for (;;)\n        x();\n";
        let mut t = TreeSketch::new();
        t.open(NodeKind::ForStmt);
        t.kw("for", 1, 1).punct("(", 1, 5).punct(";", 1, 6).punct(";", 1, 7).punct(")", 1, 8);
        call(&mut t, "x", 2, 9);
        t.close();
        let tree = t.finish();

        let (_, notes) = validate(&tree, src, 4);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].rule, rule::WRONG_LEVEL);
    }

    #[test]
    fn comments_may_be_indented_deeper() {
        let src = "int main() {\n            /* aside */\n    a();\n}\n";
        let mut t = TreeSketch::new();
        function(
            &mut t,
            |t| {
                t.comment("/* aside */", 2, 13);
                call(t, "a", 3, 5);
            },
            4,
        );
        let tree = t.finish();
        let (_, notes) = validate(&tree, src, 4);
        assert!(notes.is_empty(), "{notes:?}");
    }

    #[test]
    fn untracked_lines_leave_state_alone() {
        // the `#define` line is unregistered, its odd indentation is ignored
        let src = "int main() {\n    a();\n  #define X 1\n    b();\n}\n";
        let mut t = TreeSketch::new();
        function(
            &mut t,
            |t| {
                call(t, "a", 2, 5);
                t.preprocessor("#define", 3, 3);
                call(t, "b", 4, 5);
            },
            5,
        );
        let tree = t.finish();
        let (verdicts, notes) = validate(&tree, src, 4);
        assert!(notes.is_empty(), "{notes:?}");
        assert_eq!(verdicts[2], LineVerdict::Untracked);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let src = "int main() {\n\n   \t\n    a();\n}\n";
        let mut t = TreeSketch::new();
        function(&mut t, |t| call(t, "a", 4, 5), 5);
        let tree = t.finish();
        let (verdicts, notes) = validate(&tree, src, 4);
        assert!(notes.is_empty());
        assert_eq!(verdicts[1], LineVerdict::Blank);
        assert_eq!(verdicts[2], LineVerdict::Blank);
    }
}
