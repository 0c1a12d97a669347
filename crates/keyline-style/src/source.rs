//! Rule records as delivered by the host CSS engine.
//!
//! The host exposes its already-parsed, already-cascaded rule collection in
//! this shape: style rules carry one comma-joined string per animation or
//! transition sub-property, keyframes rules carry their ordered stops with
//! raw declaration text. The extractor consumes these records; the
//! [`parser`](crate::parser) module can synthesize them from plain CSS text
//! for hosts and tests without a live CSS object model.

/// One style rule that declares animations or transitions.
///
/// Every sub-property is the host's resolved string value and is comma-joined
/// when the declaration lists several sub-animations; an empty string means
/// the property was not declared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleRuleSource {
    /// The rule's selector text, as written in the source.
    pub selector: String,
    pub animation_name: String,
    pub animation_duration: String,
    pub animation_delay: String,
    pub animation_direction: String,
    pub animation_fill_mode: String,
    pub animation_timing_function: String,
    pub animation_iteration_count: String,
    pub transition_property: String,
    pub transition_duration: String,
    pub transition_delay: String,
    pub transition_timing_function: String,
}

impl StyleRuleSource {
    /// Create an empty record for a selector.
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            ..Self::default()
        }
    }

    /// Whether the rule declares any animation (a name other than `none`).
    pub fn has_animations(&self) -> bool {
        names_anything(&self.animation_name)
    }

    /// Whether the rule declares any transition (a property other than `none`).
    pub fn has_transitions(&self) -> bool {
        names_anything(&self.transition_property)
    }
}

/// Whether a comma-joined name list names anything beyond `none`.
fn names_anything(list: &str) -> bool {
    list.split(',')
        .map(str::trim)
        .any(|name| !name.is_empty() && !name.eq_ignore_ascii_case("none"))
}

/// One stop inside a keyframes rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyframeSource {
    /// The stop's selector list, e.g. `"0%, 50%"`, `"from"`, `"to"`.
    pub key_text: String,
    /// The stop's declarations as raw `(property, value)` text pairs.
    pub declarations: Vec<(String, String)>,
}

/// A `@keyframes` rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyframesSource {
    /// The animation name this rule defines.
    pub name: String,
    /// The stops, in source order.
    pub keyframes: Vec<KeyframeSource>,
}

/// A rule from the host's collection relevant to the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssRuleSource {
    /// A style rule with animation or transition declarations.
    Style(StyleRuleSource),
    /// A `@keyframes` rule.
    Keyframes(KeyframesSource),
}
