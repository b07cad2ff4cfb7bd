//! Tabs versus spaces.

use std::fmt;

use serde::Serialize;

use crate::lines::{LineIndent, SourceLines};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    Tabs,
    Spaces,
}

impl IndentStyle {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tabs => "tabs",
            Self::Spaces => "spaces",
        }
    }

    /// The whitespace character this style indents with.
    #[must_use]
    pub const fn indent_char(self) -> char {
        match self {
            Self::Tabs => '\t',
            Self::Spaces => ' ',
        }
    }

    /// The character that does not belong in this style's indentation.
    #[must_use]
    pub const fn foreign_char(self) -> char {
        match self {
            Self::Tabs => ' ',
            Self::Spaces => '\t',
        }
    }

    /// Leading whitespace for `levels` indentation levels.
    #[must_use]
    pub fn indentation(self, levels: usize, tab_width: usize) -> String {
        match self {
            Self::Tabs => "\t".repeat(levels),
            Self::Spaces => " ".repeat(levels * tab_width),
        }
    }
}

impl fmt::Display for IndentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-line majority vote over a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleVote {
    pub tab_lines: usize,
    pub space_lines: usize,
}

impl StyleVote {
    /// Each line votes for whichever unit contributes more levels; lines
    /// where both contribute equally abstain.
    #[must_use]
    pub fn count(lines: &SourceLines<'_>, tab_width: usize) -> Self {
        let mut vote = Self::default();
        for line in lines.iter() {
            let indent = LineIndent::measure(line.text, tab_width);
            if indent.tab_levels > indent.space_levels {
                vote.tab_lines += 1;
            } else if indent.space_levels > indent.tab_levels {
                vote.space_lines += 1;
            }
        }
        vote
    }

    /// Tabs only on a strict majority.
    #[must_use]
    pub const fn dominant(&self) -> IndentStyle {
        if self.tab_lines > self.space_lines {
            IndentStyle::Tabs
        } else {
            IndentStyle::Spaces
        }
    }
}

#[must_use]
pub fn detect_style(lines: &SourceLines<'_>, tab_width: usize) -> IndentStyle {
    let vote = StyleVote::count(lines, tab_width);
    let style = vote.dominant();
    tracing::info!(%style, tabs = vote.tab_lines, spaces = vote.space_lines, "indentation detected");
    style
}
