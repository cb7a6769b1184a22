use std::borrow::Cow;
use std::fmt::Write as _;

use esdata_tokenizer::is_whitespace;

use crate::{Node, NodeRef, Tree};

/// Wraps a token for display so it would scan back as one token.
///
/// Tokens with whitespace get `"`, or `` ` `` when they also hold a `"`.
pub fn quote_token(token: &str) -> Cow<'_, str> {
    if !token.chars().any(is_whitespace) {
        return Cow::Borrowed(token);
    }
    let quote = if token.contains('"') { '`' } else { '"' };
    Cow::Owned(format!("{quote}{token}{quote}"))
}

fn push_tokens(out: &mut String, tokens: &[String]) {
    for (index, token) in tokens.iter().enumerate() {
        if index > 0 {
            out.push(' ');
        }
        out.push_str(&quote_token(token));
    }
}

pub(crate) fn make_trace(node: NodeRef<'_>) -> Vec<String> {
    let mut chain = vec![node];
    while let Some(parent) = chain.last().and_then(|node| node.parent()) {
        chain.push(parent);
    }
    chain.reverse();

    let mut trace = Vec::new();
    for (depth, ancestor) in chain.iter().enumerate() {
        if ancestor.tokens().is_empty() {
            continue;
        }

        let mut line = String::new();
        if *ancestor == node
            && let Some(first_line) = node.first_line()
        {
            _ = write!(line, "L{first_line}: ");
        }
        _ = write!(line, "{:width$}", "", width = depth * 2);
        push_tokens(&mut line, ancestor.tokens());
        trace.push(line);
    }
    trace
}

pub(crate) fn dump(tree: &Tree, node: Node) -> String {
    let mut out = String::new();
    let node = tree.get(node);
    if node.is_root() {
        for child in node.children() {
            dump_node(&mut out, child, 0);
        }
    } else {
        dump_node(&mut out, node, 0);
    }
    out
}

fn dump_node(out: &mut String, node: NodeRef<'_>, depth: usize) {
    let line = |line: Option<u32>| line.map_or_else(|| "?".to_owned(), |line| line.to_string());

    _ = write!(
        out,
        "{:width$}L{}-{}: ",
        "",
        line(node.first_line()),
        line(node.last_line()),
        width = depth * 2
    );
    push_tokens(out, node.tokens());
    out.push('\n');

    for child in node.children() {
        dump_node(out, child, depth + 1);
    }
}
