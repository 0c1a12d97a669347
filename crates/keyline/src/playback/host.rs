//! The host animation engine boundary.
//!
//! The controller never touches live elements itself; it describes bindings
//! through [`BindingSpec`] and drives them through opaque host handles. A
//! host is whatever actually runs the animations: a browser-style engine, a
//! preview renderer, or a mock in tests.

use keyline_style::model::{Direction, FillMode, Iterations, StyleRule, TimelineKeyframe};

/// Timing parameters of one bound animation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationTiming {
    pub duration_ms: f64,
    pub delay_ms: f64,
    pub iterations: Iterations,
    pub direction: Direction,
    pub fill_mode: FillMode,
}

/// Everything the host needs to create or update one animation binding.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingSpec {
    /// Stable identity; survives re-extraction of an unchanged rule.
    pub id: String,
    /// Element selector with any pseudo-element suffix split off.
    pub selector: String,
    /// The pseudo-element suffix, when the rule targeted one (`::marker`).
    pub pseudo_element: Option<String>,
    pub keyframes: Vec<TimelineKeyframe>,
    pub timing: AnimationTiming,
}

impl BindingSpec {
    /// Build the binding description for a rule, separating a trailing
    /// pseudo-element suffix from the element selector.
    pub fn for_rule(rule: &StyleRule) -> Self {
        let (selector, pseudo_element) = match rule.selector.find("::") {
            Some(at) => (
                rule.selector[..at].to_string(),
                Some(rule.selector[at..].to_string()),
            ),
            None => (rule.selector.clone(), None),
        };
        Self {
            id: rule.id.clone(),
            selector,
            pseudo_element,
            keyframes: rule.keyframes.clone(),
            timing: AnimationTiming {
                duration_ms: rule.duration_ms,
                delay_ms: rule.delay_ms,
                iterations: rule.iterations,
                direction: rule.direction,
                fill_mode: rule.fill_mode,
            },
        }
    }
}

/// Host animation engine operations the controller drives.
///
/// A selector that matches nothing reports zero elements; that is a normal
/// outcome, not an error, and none of these operations may fail loudly.
pub trait AnimationHost {
    /// Opaque handle to one bound animation.
    type Handle: Copy + Eq;

    /// Number of live elements the selector currently matches.
    fn match_count(&self, selector: &str) -> usize;

    /// Create a binding on the `element_index`th matched element. `None`
    /// when the element disappeared between matching and binding.
    fn bind(&mut self, spec: &BindingSpec, element_index: usize) -> Option<Self::Handle>;

    /// Replace a binding's keyframes and timing in place, preserving its
    /// current play position.
    fn update(&mut self, handle: Self::Handle, spec: &BindingSpec);

    /// Discard a binding entirely.
    fn cancel(&mut self, handle: Self::Handle);

    fn play(&mut self, handle: Self::Handle);

    fn pause(&mut self, handle: Self::Handle);

    fn current_time_ms(&self, handle: Self::Handle) -> f64;

    fn set_current_time_ms(&mut self, handle: Self::Handle, time_ms: f64);
}

#[cfg(test)]
mod tests {
    use keyline_style::model::RuleKind;
    use keyline_timing::TimelineEasing;

    use super::*;

    fn rule_with_selector(selector: &str) -> StyleRule {
        StyleRule {
            id: StyleRule::rule_id("spin", selector, 0),
            kind: RuleKind::Animation,
            name: "spin".into(),
            selector: selector.into(),
            animation_index: 0,
            delay_ms: 0.0,
            duration_ms: 1000.0,
            iterations: Iterations::Finite(1.0),
            direction: Direction::Normal,
            fill_mode: FillMode::None,
            curve: TimelineEasing::EASE,
            keyframes: vec![],
            color: "#ff0000",
        }
    }

    #[test]
    fn pseudo_element_suffix_is_split() {
        let spec = BindingSpec::for_rule(&rule_with_selector("li.item::marker"));
        assert_eq!(spec.selector, "li.item");
        assert_eq!(spec.pseudo_element.as_deref(), Some("::marker"));

        let spec = BindingSpec::for_rule(&rule_with_selector(".plain"));
        assert_eq!(spec.selector, ".plain");
        assert_eq!(spec.pseudo_element, None);
    }
}
