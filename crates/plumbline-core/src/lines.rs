//! Line splitting and leading-whitespace measurement.

use memchr::memchr_iter;

/// One physical line: its text without terminator, and the terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub number: u32,
    pub text: &'a str,
    /// `"\n"`, `"\r\n"` or empty for a last line without newline.
    pub terminator: &'a str,
}

impl Line<'_> {
    /// Whitespace-only or empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Leading run of spaces and tabs.
    #[must_use]
    pub fn leading_whitespace(&self) -> &str {
        let end = self
            .text
            .bytes()
            .position(|b| b != b' ' && b != b'\t')
            .unwrap_or(self.text.len());
        &self.text[..end]
    }
}

/// A source file split into 1-based lines.
#[derive(Debug, Clone)]
pub struct SourceLines<'a> {
    lines: Vec<Line<'a>>,
}

impl<'a> SourceLines<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        let bytes = source.as_bytes();
        let mut lines = Vec::new();
        let mut line_start = 0;

        for nl in memchr_iter(b'\n', bytes) {
            let content_end = if nl > line_start && bytes[nl - 1] == b'\r' {
                nl - 1
            } else {
                nl
            };
            lines.push(Line {
                number: line_number(lines.len()),
                text: &source[line_start..content_end],
                terminator: &source[content_end..=nl],
            });
            line_start = nl + 1;
        }

        // Last line without newline
        if line_start < bytes.len() {
            lines.push(Line {
                number: line_number(lines.len()),
                text: &source[line_start..],
                terminator: "",
            });
        }

        Self { lines }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line by 1-based number.
    #[must_use]
    pub fn get(&self, number: u32) -> Option<&Line<'a>> {
        let idx = usize::try_from(number).ok()?.checked_sub(1)?;
        self.lines.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Line<'a>> {
        self.lines.iter()
    }
}

fn line_number(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

/// Leading whitespace of a line expressed in indentation levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineIndent {
    /// One per tab character.
    pub tab_levels: u32,
    /// One per complete run of `tab_width` spaces.
    pub space_levels: u32,
    /// Spaces left over after the last complete run.
    pub partial_spaces: u32,
}

impl LineIndent {
    /// Measure the leading spaces and tabs of `text`. A tab closes any
    /// incomplete space run, discarding it.
    #[must_use]
    pub fn measure(text: &str, tab_width: usize) -> Self {
        let width = u32::try_from(tab_width.max(1)).unwrap_or(u32::MAX);
        let mut indent = Self::default();
        let mut spaces = 0u32;

        for b in text.bytes() {
            match b {
                b' ' => {
                    spaces += 1;
                    if spaces == width {
                        indent.space_levels += 1;
                        spaces = 0;
                    }
                }
                b'\t' => {
                    indent.tab_levels += 1;
                    spaces = 0;
                }
                _ => break,
            }
        }

        indent.partial_spaces = spaces;
        indent
    }

    #[must_use]
    pub const fn levels(&self) -> u32 {
        self.tab_levels + self.space_levels
    }
}
