//! Builds a node tree out of indentation-structured data lines.
//!
//! A line opens a node. A following line indented deeper becomes its child;
//! one indented the same or less closes it. Blank lines and lines holding only
//! a comment are skipped. Malformed input is reported to the diagnostic sink
//! and parsing carries on, so the resulting tree is always usable.

mod parser;

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use esdata_errors::{DiagnosticSink, Error, Result};
use esdata_inputs::SourceBuffer;
use esdata_tree::{Node, NodeRef, Tree};

/// Parses `lines` and returns the buffer they were normalized into along with
/// the tree. Nodes only hold weak links to the buffer.
pub fn parse<I>(lines: I, sink: Arc<dyn DiagnosticSink>) -> (Arc<SourceBuffer>, Tree)
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let source = Arc::new(SourceBuffer::new(lines));
    let tree = parse_source(&source, sink);
    (source, tree)
}

pub fn parse_source(source: &Arc<SourceBuffer>, sink: Arc<dyn DiagnosticSink>) -> Tree {
    parser::Parser::new(source, sink).parse()
}

/// A parsed data file: the source buffer together with its tree.
///
/// Keeping the `DataFile` keeps the buffer alive, so nodes can recover their
/// raw lines.
#[derive(Debug)]
pub struct DataFile {
    source: Arc<SourceBuffer>,
    tree: Tree,
    origin: Option<Utf8PathBuf>,
}

impl DataFile {
    pub fn new<I>(lines: I, sink: Arc<dyn DiagnosticSink>) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::from_source(SourceBuffer::new(lines), sink)
    }

    pub fn from_text(text: &str, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self::new(text.lines(), sink)
    }

    pub fn from_source(source: SourceBuffer, sink: Arc<dyn DiagnosticSink>) -> Self {
        let source = Arc::new(source);
        let tree = parse_source(&source, sink);
        let origin = source.origin().map(Utf8Path::to_path_buf);
        Self { source, tree, origin }
    }

    /// Reads and parses the file at `path`, recording it as the origin.
    pub fn open(path: impl AsRef<Utf8Path>, sink: Arc<dyn DiagnosticSink>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| Error::Read { path: path.to_owned(), source })?;
        Ok(Self::with_origin(text.lines(), path, sink))
    }

    pub fn with_origin<I>(
        lines: I,
        origin: impl Into<Utf8PathBuf>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::from_source(SourceBuffer::new(lines).with_origin(origin), sink)
    }

    pub fn origin(&self) -> Option<&Utf8Path> {
        self.origin.as_deref()
    }

    /// Relabels the file. The buffer keeps the origin it was read with.
    pub fn set_origin(&mut self, origin: impl Into<Utf8PathBuf>) {
        self.origin = Some(origin.into());
    }

    pub fn source(&self) -> &Arc<SourceBuffer> {
        &self.source
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn into_parts(self) -> (Arc<SourceBuffer>, Tree) {
        (self.source, self.tree)
    }

    /// Zero-based lines `first` up to but excluding `end`, clamped to the file.
    pub fn lines(&self, first: usize, end: usize) -> &[String] {
        self.source.lines(first..end)
    }

    /// Top-level nodes, in source order.
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = NodeRef<'_>> + '_ {
        self.tree.top_level()
    }

    pub fn nodes_reversed(&self) -> Vec<NodeRef<'_>> {
        self.tree.get(self.tree.root()).children_reversed()
    }

    /// Adds `node` as the last top-level node.
    pub fn append(&mut self, node: Node) {
        let root = self.tree.root();
        self.tree.append(root, node);
    }

    pub fn remove(&mut self, node: Node) -> bool {
        let root = self.tree.root();
        self.tree.remove(root, node)
    }
}
