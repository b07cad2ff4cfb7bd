//! Line-to-line change of the expected level.

use std::collections::BTreeMap;

use plumbline_syntax::SyntaxTree;

use crate::levels::{LevelEntry, LevelMap};
use crate::lines::SourceLines;

/// Expected level change of one line relative to the previous registered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineDelta {
    pub delta: i32,
    /// Column of the first registered token on the line.
    pub column: u32,
    /// Entry of that token.
    pub entry: LevelEntry,
}

#[derive(Debug, Clone, Default)]
pub struct LineDeltas {
    lines: BTreeMap<u32, LineDelta>,
}

impl LineDeltas {
    /// Delta of `line`, or `None` when the line has no registered token.
    #[must_use]
    pub fn get(&self, line: u32) -> Option<&LineDelta> {
        self.lines.get(&line)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[must_use]
pub fn compute_deltas(map: &LevelMap, tree: &SyntaxTree, lines: &SourceLines<'_>) -> LineDeltas {
    let mut deltas = LineDeltas::default();
    let mut previous = 0;

    for line in map.lines() {
        let Some((column, entry)) = map.first_on_line(line) else {
            continue;
        };
        let delta = entry.level - previous;
        previous = entry.level;

        if tracing::enabled!(tracing::Level::DEBUG) {
            let token = tree.tokens().get(entry.token).map_or("", |t| t.spelling.as_str());
            let text = lines.get(line).map_or("", |l| l.text);
            tracing::debug!(
                line,
                level = entry.level,
                delta,
                token,
                governing = %tree.kind(entry.governing),
                "{text}"
            );
        }

        deltas.lines.insert(
            line,
            LineDelta {
                delta,
                column,
                entry: *entry,
            },
        );
    }

    deltas
}
