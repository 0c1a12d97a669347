//! Finding rule bodies in the tree.
//!
//! Lookups run against whatever the author currently has in the buffer, so a
//! miss is an expected outcome, not an error. Selector matching ignores
//! whitespace differences and accepts a rule whose selector list contains the
//! requested selector as one of its alternatives.

use std::ops::Range;

use crate::tree::{SyntaxTree, children, kind};

/// A located rule: the rule node and its brace-delimited body block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleBody<N> {
    /// The `RuleSet` or `KeyframesStatement` node.
    pub rule: N,
    /// The `Block` child, spanning `{` through `}`.
    pub body: N,
}

impl<N: Copy> RuleBody<N> {
    /// Byte range of the body block, braces included.
    pub fn body_span<T: SyntaxTree<Node = N>>(&self, tree: &T) -> Range<usize> {
        tree.span(self.body)
    }
}

/// Find the style rule whose selector matches `selector`, searching nested
/// at-rule bodies as well as the top level. Returns the first match in
/// document order.
pub fn find_rule_body<T: SyntaxTree>(
    tree: &T,
    text: &str,
    selector: &str,
) -> Option<RuleBody<T::Node>> {
    let wanted = strip_whitespace(selector);
    find_in(tree, text, tree.root(), &wanted)
}

fn find_in<T: SyntaxTree>(
    tree: &T,
    text: &str,
    node: T::Node,
    wanted: &str,
) -> Option<RuleBody<T::Node>> {
    for child in children(tree, node) {
        match tree.kind(child) {
            kind::RULE_SET => {
                let Some(body) = tree.child_of_kind(child, kind::BLOCK) else {
                    continue;
                };
                let header_span = tree.span(child).start..tree.span(body).start;
                let Some(header) = text.get(header_span) else {
                    continue;
                };
                // The caller may pass either the whole selector list (the
                // extractor keeps `.a, .b` intact) or one alternative of it.
                if strip_whitespace(header) == wanted
                    || header
                        .split(',')
                        .any(|alternative| strip_whitespace(alternative) == wanted)
                {
                    return Some(RuleBody { rule: child, body });
                }
            }
            kind::AT_RULE => {
                if let Some(block) = tree.child_of_kind(child, kind::BLOCK)
                    && let Some(found) = find_in(tree, text, block, wanted)
                {
                    return Some(found);
                }
            }
            _ => {}
        }
    }
    None
}

/// Find the `@keyframes` statement with the given animation name.
pub fn find_keyframes_body<T: SyntaxTree>(
    tree: &T,
    text: &str,
    name: &str,
) -> Option<RuleBody<T::Node>> {
    let wanted = name.trim().trim_matches(['"', '\'']);
    for child in children(tree, tree.root()) {
        if tree.kind(child) != kind::KEYFRAMES_STATEMENT {
            continue;
        }
        let Some(name_node) = tree.child_of_kind(child, kind::KEYFRAME_NAME) else {
            continue;
        };
        let Some(found) = text.get(tree.span(name_node)) else {
            continue;
        };
        if found == wanted
            && let Some(body) = tree.child_of_kind(child, kind::BLOCK)
        {
            return Some(RuleBody { rule: child, body });
        }
    }
    None
}

fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|ch| !ch.is_whitespace()).collect()
}
