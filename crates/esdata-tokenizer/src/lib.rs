//! Line scanner for the indentation-based data format.
//!
//! Each line is scanned on its own: the leading whitespace width decides
//! nesting, the rest splits into whitespace separated tokens. Tokens may be
//! wrapped in `"` or `` ` `` to carry whitespace; there is no escaping.

mod cursor;

use cursor::Cursor;

pub const COMMENT: char = '#';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Bare,
    /// Wrapped in the given quote character.
    Quoted(char),
    /// Opened with the given quote character but the line ended first.
    Unterminated(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub kind: TokenKind,
}

impl Token<'_> {
    pub fn is_terminated(&self) -> bool {
        !matches!(self.kind, TokenKind::Unterminated(_))
    }
}

pub fn is_quote(c: char) -> bool {
    matches!(c, '"' | '`')
}

/// Separator characters between tokens and in indentation.
///
/// Space, line and paragraph separators except the non-breaking ones, plus
/// the ASCII controls `\t` through `\r` and `\x1C` through `\x1F`.
pub fn is_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t'..='\r'
            | '\u{1C}'..='\u{1F}'
            | ' '
            | '\u{1680}'
            | '\u{2000}'..='\u{2006}'
            | '\u{2008}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

/// Scans the tokens of a single line.
///
/// Anything after the first `'\n'` is ignored.
pub struct Tokenizer<'a> {
    text: &'a str,
    cursor: Cursor<'a>,
    indent: usize,
    content: bool,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(line: &'a str) -> Self {
        let text = line.find('\n').map_or(line, |end| &line[..end]);
        let mut cursor = Cursor::new(text);
        let indent = cursor.advance_while(is_whitespace);
        let content = !cursor.is_eof() && !cursor.matches(|c| c == COMMENT);

        Self { text, cursor, indent, content, finished: !content }
    }

    /// Number of leading whitespace characters. Tabs count as one.
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// False for blank lines and lines holding only a comment.
    pub fn is_content(&self) -> bool {
        self.content
    }

    pub fn next_token(&mut self) -> Option<Token<'a>> {
        if self.finished || self.cursor.is_eof() {
            return None;
        }

        let token = match self.cursor.peek() {
            Some(quote) if is_quote(quote) => {
                self.cursor.advance();
                self.quoted(quote)
            }
            _ => self.bare(),
        };

        if !token.is_terminated() {
            self.finished = true;
            return Some(token);
        }

        self.cursor.advance_while(is_whitespace);
        if self.cursor.matches(|c| c == COMMENT) {
            self.finished = true;
        }

        Some(token)
    }

    fn quoted(&mut self, quote: char) -> Token<'a> {
        let start = self.cursor.offset();
        self.cursor.advance_while(|c| c != quote);
        let text = &self.text[start..self.cursor.offset()];

        let kind = match self.cursor.advance() {
            Some(_) => TokenKind::Quoted(quote),
            None => TokenKind::Unterminated(quote),
        };
        Token { text, kind }
    }

    fn bare(&mut self) -> Token<'a> {
        let start = self.cursor.offset();
        self.cursor.advance_while(|c| !is_whitespace(c));
        Token { text: &self.text[start..self.cursor.offset()], kind: TokenKind::Bare }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
