//! Flags indentation written with the wrong whitespace character.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use plumbline_syntax::{FileId, SyntaxTree};
use regex::Regex;

use crate::lines::SourceLines;
use crate::notes::{NoteSink, NoteSpan, rule};
use crate::style::IndentStyle;

static SPACES_AFTER_TABS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\t*)( +)").unwrap());
static TABS_AFTER_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^( *)(\t+)").unwrap());

/// Lowest column covered by a comment on each line.
fn comment_columns(tree: &SyntaxTree) -> BTreeMap<u32, u32> {
    let mut first = BTreeMap::new();
    let mut update = |line: u32, col: u32| {
        first
            .entry(line)
            .and_modify(|c: &mut u32| *c = (*c).min(col))
            .or_insert(col);
    };

    for tok in tree.tokens() {
        if tok.file != FileId::MAIN || !tok.is_comment() {
            continue;
        }
        update(tok.start.line, tok.start.column);
        for line in tok.start.line + 1..=tok.end.line {
            update(line, 1);
        }
    }
    first
}

/// Report leading whitespace that uses the character `style` does not.
/// Whitespace inside a comment is left alone.
pub fn check_tabs(tree: &SyntaxTree, lines: &SourceLines<'_>, style: IndentStyle, sink: &mut NoteSink) {
    let (pattern, rule_id, title) = match style {
        IndentStyle::Tabs => (
            &*SPACES_AFTER_TABS,
            rule::SPACE_INDENTATION,
            "Space used instead of tab",
        ),
        IndentStyle::Spaces => (
            &*TABS_AFTER_SPACES,
            rule::TAB_INDENTATION,
            "Tab used instead of space",
        ),
    };
    let comments = comment_columns(tree);

    for line in lines.iter() {
        if line.is_blank() {
            continue;
        }
        let Some(caps) = pattern.captures(line.text) else {
            continue;
        };
        let (Some(lead), Some(offending)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let col = u32::try_from(lead.len() + 1).unwrap_or(u32::MAX);
        let len = u32::try_from(offending.len()).unwrap_or(u32::MAX);

        if comments.get(&line.number).is_some_and(|&c| c <= col) {
            continue;
        }

        sink.warn(
            rule_id,
            NoteSpan::on_line(line.number, col, col.saturating_add(len)),
            title,
            format!("This file indents with {style}"),
        );
    }
}
