//! The opaque syntax-tree abstraction.
//!
//! The core never owns or mutates a syntax tree; it navigates whatever tree
//! the editor service supplies through copyable node handles. Implement
//! [`SyntaxTree`] to plug in an external provider, or use [`SimpleTree`]
//! when none is available.

mod simple;

pub use simple::SimpleTree;

use std::ops::Range;

/// Node-kind names shared between tree providers and the query layer.
pub mod kind {
    /// The whole stylesheet (root).
    pub const STYLE_SHEET: &str = "StyleSheet";
    /// A `selector { ... }` rule.
    pub const RULE_SET: &str = "RuleSet";
    /// A brace-delimited block, including its braces.
    pub const BLOCK: &str = "Block";
    /// A `property: value` declaration.
    pub const DECLARATION: &str = "Declaration";
    /// The property name of a declaration.
    pub const PROPERTY_NAME: &str = "PropertyName";
    /// An identifier in value position (`linear`, `alternate`).
    pub const VALUE_NAME: &str = "ValueName";
    /// A numeric token, including unit or `%` (`1s`, `100ms`, `50%`).
    pub const NUMBER_LITERAL: &str = "NumberLiteral";
    /// A functional value, spanning callee through closing paren.
    pub const CALL_EXPRESSION: &str = "CallExpression";
    /// A `@keyframes` statement.
    pub const KEYFRAMES_STATEMENT: &str = "KeyframesStatement";
    /// The name of a `@keyframes` statement.
    pub const KEYFRAME_NAME: &str = "KeyframeName";
    /// A non-keyframes at-rule (`@media`, `@supports`, ...).
    pub const AT_RULE: &str = "AtRule";
    /// A `,` in value or keyframe-selector position.
    pub const COMMA: &str = "Comma";
    /// The `from` keyframe selector keyword.
    pub const KEYFRAME_FROM: &str = "from";
    /// The `to` keyframe selector keyword.
    pub const KEYFRAME_TO: &str = "to";
}

/// Read-only navigation over an externally owned syntax tree.
///
/// Handles are plain copyable ids; all structure lives behind the trait so
/// the provider is free to store its tree however it likes.
pub trait SyntaxTree {
    /// Opaque node handle.
    type Node: Copy + Eq;

    /// The root node.
    fn root(&self) -> Self::Node;

    /// The node's kind name (see [`kind`]).
    fn kind(&self, node: Self::Node) -> &str;

    /// The node's byte range `[from, to)` in the source text.
    fn span(&self, node: Self::Node) -> Range<usize>;

    /// The node's first child, if any.
    fn first_child(&self, node: Self::Node) -> Option<Self::Node>;

    /// The node's next sibling, if any.
    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node>;

    /// The first direct child with the given kind.
    fn child_of_kind(&self, node: Self::Node, kind: &str) -> Option<Self::Node> {
        let mut child = self.first_child(node);
        while let Some(current) = child {
            if self.kind(current) == kind {
                return Some(current);
            }
            child = self.next_sibling(current);
        }
        None
    }
}

/// Iterator over a node's direct children.
pub struct Children<'t, T: SyntaxTree> {
    tree: &'t T,
    next: Option<T::Node>,
}

impl<T: SyntaxTree> Iterator for Children<'_, T> {
    type Item = T::Node;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}

/// Iterate a node's direct children in document order.
pub fn children<T: SyntaxTree>(tree: &T, node: T::Node) -> Children<'_, T> {
    Children {
        tree,
        next: tree.first_child(node),
    }
}
