//! The central rule entity: one animation-or-transition slot per selector.

use keyline_timing::TimelineEasing;

use crate::model::TimelineKeyframe;

/// Whether a rule came from an animation or a transition declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Driven by `animation-*` properties and a `@keyframes` rule.
    Animation,
    /// Driven by `transition-*` properties; modeled as a synthetic
    /// two-keyframe (0 → 1) rule for uniform timeline rendering.
    Transition,
}

/// `animation-iteration-count`.
///
/// CSS allows fractional counts, so the finite case carries an `f64`;
/// integral values print without a fractional part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Iterations {
    /// A finite number of iterations.
    Finite(f64),
    /// `infinite`.
    Infinite,
}

impl Iterations {
    /// Parse an iteration-count value; unparseable input falls back to 1.
    pub fn from_css(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case("infinite") {
            return Self::Infinite;
        }
        match value.parse::<f64>() {
            Ok(count) if count >= 0.0 => Self::Finite(count),
            _ => Self::Finite(1.0),
        }
    }

    /// The iteration count used to bound the timeline: infinite animations
    /// contribute a single iteration.
    pub fn timeline_count(&self) -> f64 {
        match self {
            Self::Finite(count) => *count,
            Self::Infinite => 1.0,
        }
    }

    /// Serialize back to CSS text.
    pub fn to_css(&self) -> String {
        match self {
            Self::Finite(count) => format!("{count}"),
            Self::Infinite => "infinite".to_string(),
        }
    }
}

/// `animation-direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Normal,
    Reverse,
    Alternate,
    AlternateReverse,
}

impl Direction {
    /// Parse a direction keyword; unknown keywords fall back to `normal`.
    pub fn from_css(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "reverse" => Self::Reverse,
            "alternate" => Self::Alternate,
            "alternate-reverse" => Self::AlternateReverse,
            _ => Self::Normal,
        }
    }

    /// The CSS keyword for this direction.
    pub fn as_css(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Reverse => "reverse",
            Self::Alternate => "alternate",
            Self::AlternateReverse => "alternate-reverse",
        }
    }
}

/// `animation-fill-mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    #[default]
    None,
    Forwards,
    Backwards,
    Both,
}

impl FillMode {
    /// Parse a fill-mode keyword; unknown keywords fall back to `none`.
    pub fn from_css(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "forwards" => Self::Forwards,
            "backwards" => Self::Backwards,
            "both" => Self::Both,
            _ => Self::None,
        }
    }

    /// The CSS keyword for this fill mode.
    pub fn as_css(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Forwards => "forwards",
            Self::Backwards => "backwards",
            Self::Both => "both",
        }
    }
}

/// Display colors assigned to rules, round-robin by extraction order.
pub const RULE_PALETTE: [&str; 8] = [
    "#5b8ff9", "#5ad8a6", "#f6bd16", "#e8684a", "#6dc8ec", "#9270ca", "#ff9d4d", "#269a99",
];

/// One (selector, animation-or-transition slot) pair, normalized into
/// explicit timing and easing fields.
///
/// The full rule list is recomputed from scratch on every source change. The
/// `id` is a deterministic function of `(name, selector, animation_index)`,
/// so rules whose source structure did not change keep their id across
/// recomputation — that stability is what lets the visual and playback layers
/// preserve selection and animation continuity without diffing the model.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    /// Stable identity, derived from content.
    pub id: String,
    /// Animation or transition.
    pub kind: RuleKind,
    /// Animation name, or transitioned property name.
    pub name: String,
    /// Selector text as written in the source.
    pub selector: String,
    /// Position within a comma-separated multi-animation declaration.
    pub animation_index: usize,
    /// `animation-delay` / `transition-delay`, in milliseconds.
    pub delay_ms: f64,
    /// `animation-duration` / `transition-duration`, in milliseconds.
    pub duration_ms: f64,
    /// `animation-iteration-count` (transitions: 1).
    pub iterations: Iterations,
    /// `animation-direction` (transitions: normal).
    pub direction: Direction,
    /// `animation-fill-mode` (transitions: none).
    pub fill_mode: FillMode,
    /// Rule-level easing; per-keyframe curves override it.
    pub curve: TimelineEasing,
    /// Normalized keyframe stops, bracketing `[0, 1]`.
    pub keyframes: Vec<TimelineKeyframe>,
    /// Stable display color.
    pub color: &'static str,
}

impl StyleRule {
    /// Derive the stable rule id for `(name, selector, animation_index)`.
    ///
    /// The selector contributes in whitespace-stripped form so reformatting
    /// the source does not change identities.
    pub fn rule_id(name: &str, selector: &str, animation_index: usize) -> String {
        format!("{name}|{}|{animation_index}", normalize_selector(selector))
    }

    /// The selector with all whitespace stripped, for matching against
    /// arbitrarily formatted source text.
    pub fn normalized_selector(&self) -> String {
        normalize_selector(&self.selector)
    }

    /// When this rule's animation finishes, relative to timeline zero.
    ///
    /// Infinite animations never finish and report `f64::INFINITY`.
    pub fn end_time_ms(&self) -> f64 {
        match self.iterations {
            Iterations::Finite(count) => self.delay_ms + self.duration_ms * count,
            Iterations::Infinite => f64::INFINITY,
        }
    }

    /// The span this rule occupies on the rendered timeline: infinite
    /// animations are drawn as a single iteration.
    pub fn timeline_length_ms(&self) -> f64 {
        self.delay_ms + self.duration_ms * self.iterations.timeline_count()
    }
}

/// Strip all whitespace from a selector for structure-insensitive matching.
pub fn normalize_selector(selector: &str) -> String {
    selector.chars().filter(|ch| !ch.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_id_ignores_selector_whitespace() {
        assert_eq!(
            StyleRule::rule_id("fade", "div  > .a", 0),
            StyleRule::rule_id("fade", "div>.a", 0),
        );
    }

    #[test]
    fn rule_id_distinguishes_slots() {
        assert_ne!(
            StyleRule::rule_id("fade", ".a", 0),
            StyleRule::rule_id("fade", ".a", 1),
        );
    }

    #[test]
    fn iterations_parse_and_clamp() {
        assert_eq!(Iterations::from_css("infinite"), Iterations::Infinite);
        assert_eq!(Iterations::from_css("2.5"), Iterations::Finite(2.5));
        assert_eq!(Iterations::from_css("-1"), Iterations::Finite(1.0));
        assert_eq!(Iterations::from_css(""), Iterations::Finite(1.0));
    }

    #[test]
    fn iterations_serialize_integral_counts_plainly() {
        assert_eq!(Iterations::Finite(3.0).to_css(), "3");
        assert_eq!(Iterations::Finite(2.5).to_css(), "2.5");
        assert_eq!(Iterations::Infinite.to_css(), "infinite");
    }

    #[test]
    fn direction_and_fill_fall_back() {
        assert_eq!(Direction::from_css("wiggle"), Direction::Normal);
        assert_eq!(Direction::from_css("alternate-reverse"), Direction::AlternateReverse);
        assert_eq!(FillMode::from_css("sideways"), FillMode::None);
    }
}
