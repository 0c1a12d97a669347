//! `animation` / `transition` shorthand expansion.
//!
//! The host CSS engine hands the extractor resolved longhand strings, so the
//! stylesheet reader has to expand shorthands itself. Expansion follows the
//! CSS disambiguation order: within each comma-separated item, the first
//! `<time>` is the duration and the second the delay, keywords claimable by
//! timing-function / iteration-count / direction / fill-mode go to those
//! properties first, and only an otherwise-unclaimable identifier becomes the
//! animation name (which is why `animation: none` sets `fill-mode`-style
//! `none`, not a name).

use keyline_timing::{TimelineEasing, split_commas};

use crate::source::StyleRuleSource;

/// One comma-separated shorthand item's claimed values.
#[derive(Debug, Default)]
struct Slot {
    name: Option<String>,
    duration: Option<String>,
    delay: Option<String>,
    timing: Option<String>,
    iterations: Option<String>,
    direction: Option<String>,
    fill: Option<String>,
}

/// Expand `animation: ...` into the record's longhand strings.
pub(crate) fn expand_animation(value: &str, source: &mut StyleRuleSource) {
    let slots: Vec<Slot> = split_commas(value)
        .into_iter()
        .map(parse_animation_item)
        .collect();

    source.animation_name = join(&slots, |slot| slot.name.as_deref(), "none");
    source.animation_duration = join(&slots, |slot| slot.duration.as_deref(), "0s");
    source.animation_delay = join(&slots, |slot| slot.delay.as_deref(), "0s");
    source.animation_timing_function = join(&slots, |slot| slot.timing.as_deref(), "ease");
    source.animation_iteration_count = join(&slots, |slot| slot.iterations.as_deref(), "1");
    source.animation_direction = join(&slots, |slot| slot.direction.as_deref(), "normal");
    source.animation_fill_mode = join(&slots, |slot| slot.fill.as_deref(), "none");
}

/// Expand `transition: ...` into the record's longhand strings.
pub(crate) fn expand_transition(value: &str, source: &mut StyleRuleSource) {
    let slots: Vec<Slot> = split_commas(value)
        .into_iter()
        .map(parse_transition_item)
        .collect();

    source.transition_property = join(&slots, |slot| slot.name.as_deref(), "all");
    source.transition_duration = join(&slots, |slot| slot.duration.as_deref(), "0s");
    source.transition_delay = join(&slots, |slot| slot.delay.as_deref(), "0s");
    source.transition_timing_function = join(&slots, |slot| slot.timing.as_deref(), "ease");
}

fn parse_animation_item(item: &str) -> Slot {
    let mut slot = Slot::default();
    for token in split_spaces(item) {
        if is_time(token) {
            if slot.duration.is_none() {
                slot.duration = Some(token.to_string());
            } else if slot.delay.is_none() {
                slot.delay = Some(token.to_string());
            }
        } else if slot.timing.is_none() && is_timing_function(token) {
            slot.timing = Some(token.to_string());
        } else if slot.iterations.is_none() && is_iteration_count(token) {
            slot.iterations = Some(token.to_string());
        } else if slot.direction.is_none() && is_direction(token) {
            slot.direction = Some(token.to_string());
        } else if slot.fill.is_none() && is_fill_mode(token) {
            slot.fill = Some(token.to_string());
        } else if slot.name.is_none() {
            slot.name = Some(token.to_string());
        }
    }
    slot
}

fn parse_transition_item(item: &str) -> Slot {
    let mut slot = Slot::default();
    for token in split_spaces(item) {
        if is_time(token) {
            if slot.duration.is_none() {
                slot.duration = Some(token.to_string());
            } else if slot.delay.is_none() {
                slot.delay = Some(token.to_string());
            }
        } else if slot.timing.is_none() && is_timing_function(token) {
            slot.timing = Some(token.to_string());
        } else if slot.name.is_none() {
            slot.name = Some(token.to_string());
        }
    }
    slot
}

/// Join one sub-property across slots into a comma-joined string, filling
/// omitted values with the property's CSS initial value.
fn join<'s>(slots: &'s [Slot], get: impl Fn(&'s Slot) -> Option<&'s str>, initial: &str) -> String {
    slots
        .iter()
        .map(|slot| get(slot).unwrap_or(initial))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Split a shorthand item on whitespace, keeping functional values
/// (`cubic-bezier(0.1, 0.2, ...)`) intact.
fn split_spaces(value: &str) -> Vec<&str> {
    let mut parts = vec![];
    let mut depth = 0usize;
    let mut start = None;

    for (index, ch) in value.char_indices() {
        if ch.is_whitespace() && depth == 0 {
            if let Some(from) = start.take() {
                parts.push(&value[from..index]);
            }
            continue;
        }
        if start.is_none() {
            start = Some(index);
        }
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    if let Some(from) = start {
        parts.push(&value[from..]);
    }
    parts
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

fn is_timing_function(token: &str) -> bool {
    let lower = token.to_ascii_lowercase();
    TimelineEasing::from_keyword(&lower).is_some()
        || lower.starts_with("cubic-bezier(")
        || lower.starts_with("steps(")
}

fn is_iteration_count(token: &str) -> bool {
    token.eq_ignore_ascii_case("infinite") || token.parse::<f64>().is_ok_and(|n| n >= 0.0)
}

fn is_direction(token: &str) -> bool {
    matches!(
        token.to_ascii_lowercase().as_str(),
        "normal" | "reverse" | "alternate" | "alternate-reverse"
    )
}

fn is_fill_mode(token: &str) -> bool {
    matches!(
        token.to_ascii_lowercase().as_str(),
        "none" | "forwards" | "backwards" | "both"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expanded(value: &str) -> StyleRuleSource {
        let mut source = StyleRuleSource::new(".x");
        expand_animation(value, &mut source);
        source
    }

    #[test]
    fn full_item() {
        let source = expanded("fade 1s 2s ease-in infinite alternate both");
        assert_eq!(source.animation_name, "fade");
        assert_eq!(source.animation_duration, "1s");
        assert_eq!(source.animation_delay, "2s");
        assert_eq!(source.animation_timing_function, "ease-in");
        assert_eq!(source.animation_iteration_count, "infinite");
        assert_eq!(source.animation_direction, "alternate");
        assert_eq!(source.animation_fill_mode, "both");
    }

    #[test]
    fn omitted_values_take_initials() {
        let source = expanded("spin 750ms");
        assert_eq!(source.animation_name, "spin");
        assert_eq!(source.animation_delay, "0s");
        assert_eq!(source.animation_timing_function, "ease");
        assert_eq!(source.animation_iteration_count, "1");
    }

    #[test]
    fn first_time_is_duration_second_is_delay() {
        let source = expanded("100ms fade 2s");
        assert_eq!(source.animation_duration, "100ms");
        assert_eq!(source.animation_delay, "2s");
    }

    #[test]
    fn cubic_bezier_survives_both_split_levels() {
        let source = expanded("a 1s cubic-bezier(0.1, 0.2, 0.3, 0.4), b 2s linear");
        assert_eq!(
            source.animation_timing_function,
            "cubic-bezier(0.1, 0.2, 0.3, 0.4), linear"
        );
        assert_eq!(source.animation_name, "a, b");
        assert_eq!(source.animation_duration, "1s, 2s");
    }

    #[test]
    fn none_is_fill_mode_not_a_name() {
        let source = expanded("none");
        assert_eq!(source.animation_name, "none");
        assert_eq!(source.animation_fill_mode, "none");
        assert!(!source.has_animations());
    }

    #[test]
    fn name_resembling_keyword_order() {
        // "ease" claims timing, so the later free identifier is the name.
        let source = expanded("ease fade 1s");
        assert_eq!(source.animation_timing_function, "ease");
        assert_eq!(source.animation_name, "fade");
    }

    #[test]
    fn transition_expansion() {
        let mut source = StyleRuleSource::new(".x");
        expand_transition("opacity 300ms ease-out 100ms, transform 1s", &mut source);
        assert_eq!(source.transition_property, "opacity, transform");
        assert_eq!(source.transition_duration, "300ms, 1s");
        assert_eq!(source.transition_delay, "100ms, 0s");
        assert_eq!(source.transition_timing_function, "ease-out, ease");
    }
}
