//! Rewrites leading whitespace so the validator has nothing left to report.

use plumbline_syntax::SyntaxTree;

use crate::diff::LineDeltas;
use crate::lines::{LineIndent, SourceLines};
use crate::style::IndentStyle;
use crate::validate::{Assessment, assess};

/// Result of a reindent pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reindented {
    pub text: String,
    /// Lines whose leading whitespace changed.
    pub changed: Vec<u32>,
}

impl Reindented {
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Replay the validator without suppression and rewrite every line it would
/// reject, plus tolerated or exact lines indented with the wrong character.
/// Lines without a registered token are copied verbatim.
#[must_use]
pub fn reindent(
    tree: &SyntaxTree,
    lines: &SourceLines<'_>,
    deltas: &LineDeltas,
    style: IndentStyle,
    tab_width: usize,
) -> Reindented {
    let mut text = String::new();
    let mut changed = Vec::new();
    let mut previous: i64 = 0;

    for line in lines.iter() {
        let rewrite_to = if line.is_blank() {
            None
        } else if let Some(delta) = deltas.get(line.number) {
            let indent = LineIndent::measure(line.text, tab_width);
            let levels = i64::from(indent.levels());
            let expected = previous + i64::from(delta.delta);
            let foreign = line.leading_whitespace().contains(style.foreign_char());

            match assess(tree, delta, &indent, expected) {
                Assessment::Exact => {
                    previous = levels;
                    foreign.then_some(levels)
                }
                Assessment::Tolerated => {
                    previous = expected;
                    foreign.then_some(expected)
                }
                Assessment::Mismatch => {
                    previous = expected.max(0);
                    Some(previous)
                }
            }
        } else {
            None
        };

        match rewrite_to {
            Some(levels) => {
                let width = usize::try_from(levels).unwrap_or(0);
                let lead = line.leading_whitespace();
                let body = &line.text[lead.len()..];
                let indentation = style.indentation(width, tab_width);
                if indentation != lead {
                    changed.push(line.number);
                }
                text.push_str(&indentation);
                text.push_str(body);
            }
            None => text.push_str(line.text),
        }
        text.push_str(line.terminator);
    }

    tracing::debug!(changed = changed.len(), "reindented");
    Reindented { text, changed }
}
