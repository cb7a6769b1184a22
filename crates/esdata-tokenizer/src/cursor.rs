use std::str::Chars;

pub(crate) struct Cursor<'a> {
    chars: Chars<'a>,
    len: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { chars: text.chars(), len: text.len() }
    }

    /// Byte offset of the next character.
    pub(crate) fn offset(&self) -> usize {
        self.len - self.chars.as_str().len()
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    pub(crate) fn matches(&self, f: impl Fn(char) -> bool) -> bool {
        self.peek().is_some_and(f)
    }

    pub(crate) fn advance(&mut self) -> Option<char> {
        self.chars.next()
    }

    /// Advances while `f` holds and returns how many characters were consumed.
    pub(crate) fn advance_while(&mut self, f: impl Fn(char) -> bool + Copy) -> usize {
        let mut count = 0;
        while self.matches(f) {
            self.advance();
            count += 1;
        }
        count
    }
}
