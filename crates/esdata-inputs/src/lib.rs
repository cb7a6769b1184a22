use std::ops::Range;

use camino::{Utf8Path, Utf8PathBuf};

/// The normalized text a data file was parsed from.
///
/// Every line ends with exactly one `'\n'`. The lines never change after
/// construction, so nodes may hold a weak link to the buffer and read from it
/// whenever it is still alive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceBuffer {
    lines: Vec<String>,
    origin: Option<Utf8PathBuf>,
}

impl SourceBuffer {
    pub fn new<I>(lines: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let lines = lines.into_iter().map(|line| ensure_eoln(line.into())).collect();
        Self { lines, origin: None }
    }

    pub fn with_origin(mut self, origin: impl Into<Utf8PathBuf>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn origin(&self) -> Option<&Utf8Path> {
        self.origin.as_deref()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn all_lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines `range.start` up to but excluding `range.end`, zero-based.
    ///
    /// The end is clamped to the buffer; a range that is empty after clamping
    /// yields an empty slice.
    pub fn lines(&self, range: Range<usize>) -> &[String] {
        let stop = range.end.min(self.lines.len());
        if stop <= range.start {
            return &[];
        }
        &self.lines[range.start..stop]
    }

    /// A single line by its one-based number.
    pub fn line(&self, number: usize) -> Option<&str> {
        number.checked_sub(1).and_then(|index| self.lines.get(index)).map(String::as_str)
    }

    pub fn text(&self) -> String {
        self.lines.concat()
    }
}

fn ensure_eoln(mut line: String) -> String {
    if !line.ends_with('\n') {
        line.push('\n');
    }
    line
}
