use std::fmt;
use std::sync::Arc;

use esdata_inputs::SourceBuffer;

use crate::{Node, NodeData, Tree, number, trace};

/// Read access to one node of a [`Tree`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a Tree,
    node: Node,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(tree: &'a Tree, node: Node) -> Self {
        Self { tree, node }
    }

    pub fn id(self) -> Node {
        self.node
    }

    fn data(self) -> &'a NodeData {
        self.tree.data(self.node)
    }

    fn with(self, node: Node) -> Self {
        Self::new(self.tree, node)
    }

    /// Number of tokens on the node's first line.
    pub fn size(self) -> usize {
        self.data().tokens.len()
    }

    pub fn tokens(self) -> &'a [String] {
        &self.data().tokens
    }

    /// The token at `index`, or `""` for any index past the last token.
    pub fn token(self, index: usize) -> &'a str {
        self.tokens().get(index).map_or("", String::as_str)
    }

    pub fn is_number_at(self, index: usize) -> bool {
        self.tokens().get(index).is_some_and(|token| number::is_number(token))
    }

    /// The token at `index` as a number, or `0.0` after reporting a trace.
    pub fn value_at(self, index: usize) -> f64 {
        self.optional_value_at(index).unwrap_or_else(|| {
            self.print_trace(Some(&format!("Cannot convert token at index {index} to a number.")));
            0.0
        })
    }

    /// The token at `index` as a number, without reporting anything.
    pub fn optional_value_at(self, index: usize) -> Option<f64> {
        self.tokens().get(index).and_then(|token| number::parse_number(token))
    }

    /// One-based number of the line the node starts on, if known.
    pub fn first_line(self) -> Option<u32> {
        self.data().first_line
    }

    /// One-based number of the last line of the node's block, if known.
    pub fn last_line(self) -> Option<u32> {
        self.data().last_line
    }

    /// The buffer the node was read from, while someone else keeps it alive.
    pub fn source(self) -> Option<Arc<SourceBuffer>> {
        self.data().source.upgrade()
    }

    /// Raw text of the node's whole block, each line ending with `'\n'`.
    ///
    /// Empty when the line span is unknown or the buffer is gone.
    pub fn lines(self) -> Vec<String> {
        let (Some(first), Some(last)) = (self.first_line(), self.last_line()) else {
            return Vec::new();
        };
        let Some(source) = self.source() else {
            return Vec::new();
        };
        source.lines((first as usize).saturating_sub(1)..last as usize).to_vec()
    }

    pub fn parent(self) -> Option<Self> {
        self.data().parent.map(|parent| self.with(parent))
    }

    pub fn is_root(self) -> bool {
        self.node == self.tree.root()
    }

    pub fn is_deleted(self) -> bool {
        self.data().deleted
    }

    pub fn has_children(self) -> bool {
        !self.data().children.is_empty()
    }

    pub fn children(self) -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator + 'a {
        self.data().children.iter().map(move |&child| self.with(child))
    }

    /// Every descendant, depth first, parents before their children.
    pub fn children_flattened(self) -> Vec<Self> {
        let mut flat = Vec::new();
        let mut stack = self.children().rev().collect::<Vec<_>>();
        while let Some(node) = stack.pop() {
            flat.push(node);
            stack.extend(node.children().rev());
        }
        flat
    }

    pub fn children_reversed(self) -> Vec<Self> {
        self.children().rev().collect()
    }

    /// Renders the ancestor chain, outermost first.
    pub fn make_trace(self) -> Vec<String> {
        trace::make_trace(self)
    }

    /// Sends [`make_trace`](Self::make_trace) and `message` to the tree's sink.
    pub fn print_trace(self, message: Option<&str>) {
        let trace = self.make_trace();
        self.tree.sink().log(message, Some(&trace));
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.node == other.node
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.node)
            .field("tokens", &self.tokens())
            .field("first_line", &self.first_line())
            .field("last_line", &self.last_line())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use esdata_errors::StringSink;

    use super::*;

    fn single(tokens: &[&str]) -> (Tree, Node, Arc<StringSink>) {
        let sink = Arc::new(StringSink::new());
        let mut tree = Tree::new(sink.clone());
        let node = tree.alloc(tokens.iter().copied());
        let root = tree.root();
        tree.append(root, node);
        (tree, node, sink)
    }

    #[test]
    fn token_out_of_range_is_empty() {
        let (tree, node, _) = single(&["ship", "Bob"]);
        let node = tree.get(node);

        assert_eq!(node.size(), 2);
        assert_eq!(node.token(1), "Bob");
        assert_eq!(node.token(2), "");
        assert_eq!(node.token(100), "");
    }

    #[test]
    fn values() {
        let (tree, node, sink) = single(&["mass", "120.5", "-3e2", "heavy"]);
        let node = tree.get(node);

        assert_eq!(node.value_at(1), 120.5);
        assert_eq!(node.value_at(2), -300.0);
        assert_eq!(node.optional_value_at(1), Some(120.5));
        assert_eq!(sink.contents(), "");

        assert_eq!(node.optional_value_at(3), None);
        assert_eq!(node.optional_value_at(4), None);
        assert_eq!(sink.contents(), "");
    }

    #[test]
    fn failed_value_reports_trace() {
        let (tree, node, sink) = single(&["mass", "heavy"]);

        assert_eq!(tree.get(node).value_at(1), 0.0);
        assert_eq!(sink.contents(), "Cannot convert token at index 1 to a number.\n  mass heavy\n");

        assert_eq!(tree.get(node).value_at(2), 0.0);
        assert!(sink.contents().contains("Cannot convert token at index 2 to a number."));
    }

    #[test]
    fn numeric_classification() {
        let (tree, node, _) = single(&["3.14", "-2", "1e10", "+5.2E-3", "1.2.3", "1e1e1", "abc"]);
        let node = tree.get(node);

        for index in 0..4 {
            assert!(node.is_number_at(index), "{}", node.token(index));
        }
        for index in 4..7 {
            assert!(!node.is_number_at(index), "{}", node.token(index));
        }
        assert!(!node.is_number_at(7));
        assert!(!node.is_number_at(8));
    }

    #[test]
    fn empty_token_classifies_as_number_but_has_no_value() {
        let (tree, node, sink) = single(&["", "-"]);
        let node = tree.get(node);

        assert!(node.is_number_at(0));
        assert!(node.is_number_at(1));
        assert_eq!(node.optional_value_at(0), None);
        assert_eq!(node.value_at(1), 0.0);
        assert!(sink.contents().starts_with("Cannot convert token at index 1 to a number.\n"));
    }

    #[test]
    fn lines_need_span_and_live_source() {
        let source = Arc::new(SourceBuffer::new(["ship Bob", "\tguns 2", "other"]));
        let (mut tree, node, _) = single(&["ship", "Bob"]);
        assert!(tree.get(node).lines().is_empty());

        tree.set_source(node, &source);
        assert!(tree.get(node).lines().is_empty());

        tree.set_first_line(node, Some(1));
        tree.set_last_line(node, Some(2));
        assert_eq!(tree.get(node).lines(), ["ship Bob\n", "\tguns 2\n"]);
        assert!(tree.get(node).source().is_some());

        drop(source);
        assert!(tree.get(node).source().is_none());
        assert!(tree.get(node).lines().is_empty());
    }

    #[test]
    fn node_refs_compare_by_identity() {
        let (mut tree, node, _) = single(&["a"]);
        let other = tree.alloc(["a"]);
        assert_eq!(tree.get(node), tree.get(node));
        assert_ne!(tree.get(node), tree.get(other));
        assert!(tree.get(tree.root()).is_root());
        assert!(!tree.get(node).is_root());
    }
}
