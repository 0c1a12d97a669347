//! Syntax-tree queries and minimal text patches over CSS source.
//!
//! The editor surface owns the source text and its syntax tree; this crate
//! only ever *reads* the tree, through the opaque node-handle abstraction in
//! [`tree`], and produces range-scoped [`TextEdit`]s that change exactly one
//! semantic value without disturbing surrounding text, comments, or the
//! author's formatting. Edits originate from continuous drag gestures, so a
//! patch that reformatted anything would visibly fight the user on every
//! frame.
//!
//! - [`locate`]: find the tree node for a selector's rule body or a
//!   keyframes block. Lookup misses return `None` — the source is routinely
//!   invalid mid-edit and that is not an error.
//! - [`edit`]: compute the minimal insert/replace for a semantic property
//!   ("delay", "duration", "the easing of animation N in the comma list"),
//!   covering longhand declarations, `animation`/`transition` shorthands,
//!   and per-keyframe easing.
//! - [`tree::SimpleTree`]: a built-in structural tree over CSS text, for
//!   hosts (and tests) that do not bring an external syntax-tree service.

pub mod edit;
pub mod locate;
pub mod tree;

pub use edit::{
    PropertySpec, Selection, TextEdit, ValueMatcher, set_keyframe_easing, set_longhand,
    set_property, set_shorthand_value,
};
pub use locate::{RuleBody, find_keyframes_body, find_rule_body};
pub use tree::{SimpleTree, SyntaxTree, kind};
