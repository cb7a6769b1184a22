//! Mutable data node tree backed by an arena.
//!
//! Nodes are addressed by [`Node`] handles. Parent and child links are handles
//! too, so detaching a node never frees it: deleted nodes stay in the arena as
//! tombstones with no tokens and no children.

mod node;
mod number;
mod trace;

use std::fmt;
use std::sync::{Arc, Weak};

use esdata_errors::DiagnosticSink;
use esdata_inputs::SourceBuffer;
use la_arena::Arena;

pub use node::NodeRef;
pub use number::{is_number, parse_number};
pub use trace::quote_token;

pub type Node = la_arena::Idx<NodeData>;

#[derive(Debug, Clone, Default)]
pub struct NodeData {
    tokens: Vec<String>,
    children: Vec<Node>,
    parent: Option<Node>,
    first_line: Option<u32>,
    last_line: Option<u32>,
    source: Weak<SourceBuffer>,
    deleted: bool,
}

impl NodeData {
    fn with_tokens(tokens: Vec<String>) -> Self {
        Self { tokens, ..Self::default() }
    }
}

pub struct Tree {
    nodes: Arena<NodeData>,
    root: Node,
    sink: Arc<dyn DiagnosticSink>,
}

impl Tree {
    /// Creates a tree holding only the synthetic root.
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        let mut nodes = Arena::new();
        let root = nodes.alloc(NodeData::default());
        Self { nodes, root, sink }
    }

    pub fn root(&self) -> Node {
        self.root
    }

    pub fn sink(&self) -> &Arc<dyn DiagnosticSink> {
        &self.sink
    }

    pub fn get(&self, node: Node) -> NodeRef<'_> {
        NodeRef::new(self, node)
    }

    /// Top-level nodes, in source order.
    pub fn top_level(&self) -> impl DoubleEndedIterator<Item = NodeRef<'_>> + '_ {
        self.get(self.root).children()
    }

    /// Number of arena slots, tombstones and the root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        !self.get(self.root).has_children()
    }

    /// Allocates a node that is not attached anywhere yet.
    pub fn alloc<I>(&mut self, tokens: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let tokens = tokens.into_iter().map(Into::into).collect();
        self.nodes.alloc(NodeData::with_tokens(tokens))
    }

    pub fn tokens_mut(&mut self, node: Node) -> &mut Vec<String> {
        &mut self.nodes[node].tokens
    }

    pub fn push_token(&mut self, node: Node, token: impl Into<String>) {
        self.nodes[node].tokens.push(token.into());
    }

    pub fn set_first_line(&mut self, node: Node, line: Option<u32>) {
        self.nodes[node].first_line = line;
    }

    pub fn set_last_line(&mut self, node: Node, line: Option<u32>) {
        self.nodes[node].last_line = line;
    }

    /// Links `node` to the buffer it was read from. Only a weak link is kept.
    pub fn set_source(&mut self, node: Node, source: &Arc<SourceBuffer>) {
        self.nodes[node].source = Arc::downgrade(source);
    }

    /// Makes `node` the last child of `parent`, detaching it from its previous
    /// parent first.
    ///
    /// Callers must not append a node below itself.
    pub fn append(&mut self, parent: Node, node: Node) {
        debug_assert_ne!(parent, node, "a node cannot be its own child");

        if let Some(old) = self.nodes[node].parent {
            self.remove(old, node);
        }
        self.nodes[node].parent = Some(parent);
        self.nodes[parent].children.push(node);
    }

    /// Detaches `node` from `parent` without touching its own children.
    ///
    /// Returns false if `node` was not a child of `parent`.
    pub fn remove(&mut self, parent: Node, node: Node) -> bool {
        let children = &mut self.nodes[parent].children;
        let Some(position) = children.iter().position(|&child| child == node) else {
            return false;
        };
        children.remove(position);

        if self.nodes[node].parent == Some(parent) {
            self.nodes[node].parent = None;
        }
        true
    }

    /// Unlinks `node` from its parent and tombstones it together with its
    /// whole subtree.
    pub fn delete(&mut self, node: Node) {
        if let Some(parent) = self.nodes[node].parent {
            self.remove(parent, node);
        }

        let mut stack = vec![node];
        while let Some(node) = stack.pop() {
            let data = &mut self.nodes[node];
            stack.append(&mut data.children);
            data.tokens = Vec::new();
            data.parent = None;
            data.deleted = true;
        }
    }

    /// Deep copies tokens and children of `node` into new, detached nodes.
    ///
    /// Line numbers and the source link are not carried over.
    pub fn copy(&mut self, node: Node) -> Node {
        let copy = self.alloc(self.nodes[node].tokens.clone());
        for child in self.nodes[node].children.clone() {
            let child = self.copy(child);
            self.append(copy, child);
        }
        copy
    }

    /// Renders the ancestor chain of `node` and hands it to the sink.
    pub fn print_trace(&self, node: Node, message: Option<&str>) {
        self.get(node).print_trace(message);
    }

    /// Debug rendering of a subtree, one node per line.
    ///
    /// Passing the root renders every top-level node.
    pub fn dump(&self, node: Node) -> String {
        trace::dump(self, node)
    }

    fn data(&self, node: Node) -> &NodeData {
        &self.nodes[node]
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree").field("root", &self.root).field("nodes", &self.nodes).finish()
    }
}
