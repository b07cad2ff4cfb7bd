//! Hand-built syntax trees for unit tests.

use plumbline_syntax::{FileId, NodeKind, SyntaxTree, Token, TokenKind, TreeBuilder};

pub struct TreeSketch {
    builder: TreeBuilder,
}

impl TreeSketch {
    pub fn new() -> Self {
        Self {
            builder: TreeBuilder::new(NodeKind::TranslationUnit),
        }
    }

    pub fn open(&mut self, kind: NodeKind) -> &mut Self {
        self.builder.start_node(kind);
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.builder.finish_node();
        self
    }

    /// Open `kind`, let `body` push into it, close it.
    pub fn leaf(&mut self, kind: NodeKind, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.open(kind);
        body(self);
        self.close()
    }

    fn push(&mut self, kind: TokenKind, text: &str, line: u32, col: u32) -> &mut Self {
        self.builder.token(Token::at(kind, text, line, col));
        self
    }

    pub fn kw(&mut self, text: &str, line: u32, col: u32) -> &mut Self {
        self.push(TokenKind::Keyword, text, line, col)
    }

    pub fn punct(&mut self, text: &str, line: u32, col: u32) -> &mut Self {
        self.push(TokenKind::Punctuation, text, line, col)
    }

    pub fn ident(&mut self, text: &str, line: u32, col: u32) -> &mut Self {
        self.push(TokenKind::Identifier, text, line, col)
    }

    pub fn literal(&mut self, text: &str, line: u32, col: u32) -> &mut Self {
        self.push(TokenKind::Literal, text, line, col)
    }

    pub fn comment(&mut self, text: &str, line: u32, col: u32) -> &mut Self {
        self.push(TokenKind::Comment, text, line, col)
    }

    pub fn preprocessor(&mut self, text: &str, line: u32, col: u32) -> &mut Self {
        self.push(TokenKind::Preprocessor, text, line, col)
    }

    /// Token that came from another file (macro body, header).
    pub fn foreign(&mut self, text: &str, line: u32, col: u32) -> &mut Self {
        self.builder
            .token(Token::at(TokenKind::Identifier, text, line, col).in_file(FileId(1)));
        self
    }

    pub fn finish(self) -> SyntaxTree {
        self.builder.finish()
    }
}
