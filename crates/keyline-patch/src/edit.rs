//! Computing minimal text edits for semantic property changes.
//!
//! Every edit replaces (or inserts) exactly one value's byte range and
//! carries a selection anchored on the new text, so a drag gesture that
//! fires dozens of edits per second never disturbs the author's formatting
//! or jumps their cursor.

use keyline_timing::TimelineEasing;
use tracing::debug;

use crate::locate::RuleBody;
use crate::tree::{SyntaxTree, children, kind};

/// A resulting cursor selection, `anchor..head` in the post-edit text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

/// A range-scoped edit: replace `from..to` with `insert`.
///
/// `from == to` is a pure insertion. The selection, when present, covers the
/// newly written value so the editor keeps the cursor on what just changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub from: usize,
    pub to: usize,
    pub insert: String,
    pub selection: Option<Selection>,
}

impl TextEdit {
    fn replace(from: usize, to: usize, insert: String) -> Self {
        let selection = Selection {
            anchor: from,
            head: from + insert.len(),
        };
        Self {
            from,
            to,
            insert,
            selection: Some(selection),
        }
    }

    /// Apply this edit to a copy of `text`.
    pub fn apply(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + self.insert.len());
        out.push_str(&text[..self.from]);
        out.push_str(&self.insert);
        out.push_str(&text[self.to..]);
        out
    }
}

/// Which value token inside a shorthand comma slot an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueMatcher {
    /// The nth `<time>` token in the slot (0 = duration, 1 = delay). When
    /// the slot holds fewer time tokens than `occurrence`, the value is
    /// appended after the last one present.
    Time { occurrence: usize },
    /// The timing function: a `cubic-bezier(..)`/`steps(..)` call or a
    /// named-curve keyword.
    Easing,
    /// The nth free identifier in the slot.
    Ident { occurrence: usize },
}

/// How a semantic property maps onto declarations: its longhand name, and
/// optionally the shorthand it can also live inside.
#[derive(Debug, Clone, Copy)]
pub struct PropertySpec<'a> {
    pub longhand: &'a str,
    pub shorthand: Option<(&'a str, ValueMatcher)>,
}

impl<'a> PropertySpec<'a> {
    pub const fn longhand_only(longhand: &'a str) -> Self {
        Self {
            longhand,
            shorthand: None,
        }
    }

    pub const fn with_shorthand(
        longhand: &'a str,
        shorthand: &'a str,
        matcher: ValueMatcher,
    ) -> Self {
        Self {
            longhand,
            shorthand: Some((shorthand, matcher)),
        }
    }
}

/// Compute the edit that sets `spec`'s property to `value` for the
/// `animation_index`th comma slot inside a located rule body.
///
/// Tries, in order: replace the token in an existing longhand declaration,
/// replace the matched token inside the shorthand, insert a fresh longhand
/// declaration right after the opening brace.
pub fn set_property<T: SyntaxTree>(
    tree: &T,
    text: &str,
    body: &RuleBody<T::Node>,
    spec: &PropertySpec<'_>,
    value: &str,
    animation_index: usize,
) -> Option<TextEdit> {
    if let Some(edit) = set_longhand(tree, text, body, spec.longhand, value, animation_index) {
        return Some(edit);
    }
    if let Some((shorthand, matcher)) = spec.shorthand
        && let Some(edit) =
            set_shorthand_value(tree, text, body, shorthand, matcher, value, animation_index)
    {
        return Some(edit);
    }
    debug!(property = spec.longhand, "no declaration found, inserting");
    Some(insert_declaration(tree, body.body, spec.longhand, value))
}

/// Replace the `animation_index`th comma slot of an existing longhand
/// declaration. `None` when the body has no such declaration.
pub fn set_longhand<T: SyntaxTree>(
    tree: &T,
    text: &str,
    body: &RuleBody<T::Node>,
    property: &str,
    value: &str,
    animation_index: usize,
) -> Option<TextEdit> {
    let declaration = find_declaration(tree, text, body.body, property)?;
    let groups = comma_groups(tree, declaration);
    let Some(group) = nth_clamped(&groups, animation_index) else {
        // `property: ;` — degenerate but reachable mid-edit.
        let at = tree.span(declaration).end;
        return Some(TextEdit::replace(at, at, format!(" {value}")));
    };
    let from = tree.span(group[0]).start;
    let to = tree.span(group[group.len() - 1]).end;
    Some(TextEdit::replace(from, to, value.to_string()))
}

/// Replace one token inside the `animation_index`th comma slot of a
/// shorthand declaration. `None` when the declaration or token is absent
/// (except [`ValueMatcher::Time`], which appends a missing trailing time).
pub fn set_shorthand_value<T: SyntaxTree>(
    tree: &T,
    text: &str,
    body: &RuleBody<T::Node>,
    shorthand: &str,
    matcher: ValueMatcher,
    value: &str,
    animation_index: usize,
) -> Option<TextEdit> {
    let declaration = find_declaration(tree, text, body.body, shorthand)?;
    let groups = comma_groups(tree, declaration);
    let group = nth_clamped(&groups, animation_index)?;

    match matcher {
        ValueMatcher::Time { occurrence } => {
            let times: Vec<_> = group
                .iter()
                .copied()
                .filter(|&token| {
                    tree.kind(token) == kind::NUMBER_LITERAL && is_time(token_text(tree, text, token))
                })
                .collect();
            if let Some(&token) = times.get(occurrence) {
                let span = tree.span(token);
                return Some(TextEdit::replace(span.start, span.end, value.to_string()));
            }
            // Appending right after the last time present keeps the CSS
            // duration-then-delay order valid.
            let after = times.last().copied()?;
            let at = tree.span(after).end;
            Some(TextEdit::replace(at, at, format!(" {value}")))
        }
        ValueMatcher::Easing => {
            let token = group.iter().copied().find(|&token| {
                let token_str = token_text(tree, text, token);
                match tree.kind(token) {
                    kind::CALL_EXPRESSION => {
                        let lower = token_str.to_ascii_lowercase();
                        lower.starts_with("cubic-bezier(") || lower.starts_with("steps(")
                    }
                    kind::VALUE_NAME => {
                        TimelineEasing::from_keyword(&token_str.to_ascii_lowercase()).is_some()
                    }
                    _ => false,
                }
            })?;
            let span = tree.span(token);
            Some(TextEdit::replace(span.start, span.end, value.to_string()))
        }
        ValueMatcher::Ident { occurrence } => {
            let token = group
                .iter()
                .copied()
                .filter(|&token| tree.kind(token) == kind::VALUE_NAME)
                .nth(occurrence)?;
            let span = tree.span(token);
            Some(TextEdit::replace(span.start, span.end, value.to_string()))
        }
    }
}

/// Set (or insert) `animation-timing-function` inside one keyframe block of
/// a `@keyframes` body, addressed by ordinal position among the stop headers.
pub fn set_keyframe_easing<T: SyntaxTree>(
    tree: &T,
    text: &str,
    keyframes: &RuleBody<T::Node>,
    keyframe_index: usize,
    easing: &str,
) -> Option<TextEdit> {
    let mut ordinal = 0usize;
    let mut at_target = false;
    for child in children(tree, keyframes.body) {
        match tree.kind(child) {
            kind::NUMBER_LITERAL | kind::KEYFRAME_FROM | kind::KEYFRAME_TO => {
                if ordinal == keyframe_index {
                    at_target = true;
                }
                ordinal += 1;
            }
            kind::BLOCK if at_target => {
                return Some(set_block_easing(tree, text, child, easing));
            }
            _ => {}
        }
    }
    None
}

fn set_block_easing<T: SyntaxTree>(
    tree: &T,
    text: &str,
    block: T::Node,
    easing: &str,
) -> TextEdit {
    if let Some(declaration) = find_declaration(tree, text, block, "animation-timing-function") {
        let groups = comma_groups(tree, declaration);
        if let Some(group) = groups.first().filter(|group| !group.is_empty()) {
            let from = tree.span(group[0]).start;
            let to = tree.span(group[group.len() - 1]).end;
            return TextEdit::replace(from, to, easing.to_string());
        }
        let at = tree.span(declaration).end;
        return TextEdit::replace(at, at, format!(" {easing}"));
    }
    insert_declaration(tree, block, "animation-timing-function", easing)
}

/// Insert `property: value;` immediately after a block's opening brace.
fn insert_declaration<T: SyntaxTree>(
    tree: &T,
    block: T::Node,
    property: &str,
    value: &str,
) -> TextEdit {
    let at = tree.span(block).start + 1;
    let insert = format!("\n  {property}: {value};");
    let value_start = at + insert.len() - value.len() - 1;
    TextEdit {
        from: at,
        to: at,
        insert,
        selection: Some(Selection {
            anchor: value_start,
            head: value_start + value.len(),
        }),
    }
}

/// The last declaration in `block` whose property name matches, since a
/// later declaration wins the cascade.
fn find_declaration<T: SyntaxTree>(
    tree: &T,
    text: &str,
    block: T::Node,
    property: &str,
) -> Option<T::Node> {
    children(tree, block)
        .filter(|&child| tree.kind(child) == kind::DECLARATION)
        .filter(|&declaration| {
            tree.child_of_kind(declaration, kind::PROPERTY_NAME)
                .is_some_and(|name| {
                    token_text(tree, text, name).eq_ignore_ascii_case(property)
                })
        })
        .last()
}

/// Split a declaration's value tokens into comma-delimited groups.
fn comma_groups<T: SyntaxTree>(tree: &T, declaration: T::Node) -> Vec<Vec<T::Node>> {
    let mut groups = vec![vec![]];
    for child in children(tree, declaration) {
        match tree.kind(child) {
            kind::PROPERTY_NAME => {}
            kind::COMMA => groups.push(vec![]),
            _ => {
                if let Some(group) = groups.last_mut() {
                    group.push(child);
                }
            }
        }
    }
    groups
}

/// The `index`th non-empty group, clamping past-the-end indexes to the last
/// group, mirroring the CSS shorter-list fallback.
fn nth_clamped<N>(groups: &[Vec<N>], index: usize) -> Option<&Vec<N>> {
    let group = groups.get(index.min(groups.len().saturating_sub(1)))?;
    if group.is_empty() { None } else { Some(group) }
}

fn token_text<'t, T: SyntaxTree>(tree: &T, text: &'t str, node: T::Node) -> &'t str {
    text.get(tree.span(node)).unwrap_or("")
}

fn is_time(token: &str) -> bool {
    let number = if let Some(number) = token.strip_suffix("ms") {
        number
    } else if let Some(number) = token.strip_suffix(['s', 'S']) {
        number
    } else {
        return false;
    };
    number.parse::<f64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::{find_keyframes_body, find_rule_body};
    use crate::tree::SimpleTree;

    const DELAY: PropertySpec<'_> = PropertySpec::with_shorthand(
        "animation-delay",
        "animation",
        ValueMatcher::Time { occurrence: 1 },
    );
    const DURATION: PropertySpec<'_> = PropertySpec::with_shorthand(
        "animation-duration",
        "animation",
        ValueMatcher::Time { occurrence: 0 },
    );
    const EASING: PropertySpec<'_> = PropertySpec::with_shorthand(
        "animation-timing-function",
        "animation",
        ValueMatcher::Easing,
    );

    fn edit_for(source: &str, selector: &str, spec: &PropertySpec<'_>, value: &str, index: usize) -> TextEdit {
        let tree = SimpleTree::parse(source);
        let body = find_rule_body(&tree, source, selector).unwrap();
        set_property(&tree, source, &body, spec, value, index).unwrap()
    }

    #[test]
    fn shorthand_delay_replaces_only_that_token() {
        let source = ".a {\n  animation: spin 2s 100ms linear;\n}\n";
        let edit = edit_for(source, ".a", &DELAY, "250ms", 0);

        assert_eq!(&source[edit.from..edit.to], "100ms");
        assert_eq!(edit.insert, "250ms");
        assert_eq!(edit.apply(source), ".a {\n  animation: spin 2s 250ms linear;\n}\n");
        let selection = edit.selection.unwrap();
        assert_eq!(selection.head - selection.anchor, "250ms".len());
    }

    #[test]
    fn longhand_wins_over_shorthand() {
        let source = ".a { animation: spin 2s; animation-delay: 1s; }";
        let edit = edit_for(source, ".a", &DELAY, "300ms", 0);
        assert_eq!(&source[edit.from..edit.to], "1s");
        assert_eq!(edit.apply(source), ".a { animation: spin 2s; animation-delay: 300ms; }");
    }

    #[test]
    fn comma_slot_indexing_with_clamp() {
        let source = ".a { animation-duration: 1s, 2s, 3s; }";
        let edit = edit_for(source, ".a", &DURATION, "4s", 1);
        assert_eq!(&source[edit.from..edit.to], "2s");

        // Past-the-end indexes fall back to the last slot.
        let edit = edit_for(source, ".a", &DURATION, "4s", 9);
        assert_eq!(&source[edit.from..edit.to], "3s");
    }

    #[test]
    fn shorthand_slot_indexing() {
        let source = ".a { animation: fade 1s ease, spin 2s linear; }";
        let edit = edit_for(source, ".a", &DURATION, "5s", 1);
        assert_eq!(&source[edit.from..edit.to], "2s");

        let edit = edit_for(source, ".a", &EASING, "ease-out", 1);
        assert_eq!(&source[edit.from..edit.to], "linear");
    }

    #[test]
    fn easing_matcher_finds_cubic_bezier_calls() {
        let source = ".a { animation: fade 1s cubic-bezier(0.1, 0.2, 0.3, 0.4); }";
        let edit = edit_for(source, ".a", &EASING, "linear", 0);
        assert_eq!(&source[edit.from..edit.to], "cubic-bezier(0.1, 0.2, 0.3, 0.4)");
    }

    #[test]
    fn missing_delay_in_shorthand_is_appended_after_duration() {
        let source = ".a { animation: spin 2s linear; }";
        let edit = edit_for(source, ".a", &DELAY, "100ms", 0);
        assert_eq!(edit.from, edit.to);
        assert_eq!(edit.apply(source), ".a { animation: spin 2s 100ms linear; }");
    }

    #[test]
    fn absent_property_inserts_declaration_after_brace() {
        let source = ".a { color: red; }";
        let edit = edit_for(source, ".a", &DELAY, "100ms", 0);
        assert_eq!(
            edit.apply(source),
            ".a {\n  animation-delay: 100ms; color: red; }"
        );
        let selection = edit.selection.unwrap();
        assert_eq!(&edit.apply(source)[selection.anchor..selection.head], "100ms");
    }

    #[test]
    fn keyframe_easing_replaces_existing_declaration() {
        let source = "@keyframes fade {\n  from { opacity: 0; animation-timing-function: linear; }\n  to { opacity: 1; }\n}\n";
        let tree = SimpleTree::parse(source);
        let body = find_keyframes_body(&tree, source, "fade").unwrap();

        let edit = set_keyframe_easing(&tree, source, &body, 0, "ease-in").unwrap();
        assert_eq!(&source[edit.from..edit.to], "linear");
        assert!(edit.apply(source).contains("animation-timing-function: ease-in;"));
    }

    #[test]
    fn keyframe_easing_inserts_when_absent() {
        let source = "@keyframes fade { from { opacity: 0; } 50% { opacity: 0.4; } to { opacity: 1; } }";
        let tree = SimpleTree::parse(source);
        let body = find_keyframes_body(&tree, source, "fade").unwrap();

        let edit = set_keyframe_easing(&tree, source, &body, 1, "ease-out").unwrap();
        let patched = edit.apply(source);
        assert!(patched.contains("50% {\n  animation-timing-function: ease-out; opacity: 0.4; }"));

        assert!(set_keyframe_easing(&tree, source, &body, 7, "linear").is_none());
    }

    #[test]
    fn selector_list_headers_share_keyframe_blocks() {
        let source = "@keyframes multi { 0%, 50% { opacity: 0; } to { opacity: 1; } }";
        let tree = SimpleTree::parse(source);
        let body = find_keyframes_body(&tree, source, "multi").unwrap();

        // Header ordinals 0 and 1 both resolve to the shared first block.
        let first = set_keyframe_easing(&tree, source, &body, 0, "linear").unwrap();
        let second = set_keyframe_easing(&tree, source, &body, 1, "linear").unwrap();
        assert_eq!(first, second);

        let third = set_keyframe_easing(&tree, source, &body, 2, "linear").unwrap();
        assert_ne!(first, third);
    }
}
