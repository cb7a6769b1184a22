use std::sync::Arc;

use esdata_errors::DiagnosticSink;
use esdata_inputs::SourceBuffer;
use esdata_tokenizer::Tokenizer;
use esdata_tree::{Node, Tree};

pub(crate) const MISSING_CLOSING_QUOTE: &str = "closing quote is missing";

pub(crate) struct Parser<'a> {
    source: &'a Arc<SourceBuffer>,
    tree: Tree,
    /// Open nodes with the indentation that opened them, innermost last.
    /// The root sits below the bottom of the stack with an indentation
    /// smaller than any real one.
    open: Vec<(Node, usize)>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(source: &'a Arc<SourceBuffer>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { source, tree: Tree::new(sink), open: Vec::new() }
    }

    pub(crate) fn parse(mut self) -> Tree {
        let source = self.source;
        for (index, line) in source.all_lines().iter().enumerate() {
            self.line(line_number(index + 1), line);
        }
        self.close(0, line_number(source.len()));

        tracing::debug!(lines = source.len(), nodes = self.tree.len() - 1, "parsed data file");
        self.tree
    }

    fn line(&mut self, number: u32, line: &str) {
        let tokenizer = Tokenizer::new(line);
        if !tokenizer.is_content() {
            return;
        }

        let indent = tokenizer.indent();
        self.close(indent, number - 1);
        let node = self.start(indent, number);

        for token in tokenizer {
            if !token.is_terminated() {
                self.tree.print_trace(node, Some(MISSING_CLOSING_QUOTE));
            }
            self.tree.push_token(node, token.text);
        }

        tracing::trace!(line = number, indent, tokens = self.tree.get(node).size(), "node");
    }

    fn start(&mut self, indent: usize, number: u32) -> Node {
        let parent = self.open.last().map_or(self.tree.root(), |&(node, _)| node);
        let node = self.tree.alloc(Vec::<String>::new());
        self.tree.set_source(node, self.source);
        self.tree.set_first_line(node, Some(number));
        self.tree.append(parent, node);
        self.open.push((node, indent));
        node
    }

    /// Closes every open node indented at least `indent`; their blocks end on
    /// `last_line`.
    fn close(&mut self, indent: usize, last_line: u32) {
        while let Some(&(node, width)) = self.open.last()
            && width >= indent
        {
            self.open.pop();
            self.tree.set_last_line(node, Some(last_line));
        }
    }
}

fn line_number(number: usize) -> u32 {
    u32::try_from(number).unwrap_or(u32::MAX)
}
