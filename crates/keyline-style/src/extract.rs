//! Rule extraction: host rule records in, normalized rule list out.
//!
//! This is a pure recomputation step. Given the same input collection it
//! always produces a structurally identical [`StyleRule`] list with identical
//! ids in identical order — the visual layer relies on that to diff against
//! the previous view state without flicker, and the playback layer relies on
//! id stability to keep running animations alive across edits.

use std::collections::{BTreeMap, HashMap, HashSet};

use keyline_timing::{TimelineEasing, split_commas};

use crate::model::{
    Direction, FillMode, Iterations, RULE_PALETTE, RuleKind, StyleRule, TimelineKeyframe,
    ensure_endpoints,
};
use crate::source::{CssRuleSource, KeyframesSource, StyleRuleSource};
use crate::time::parse_time_ms;

/// Minimum timeline span, so an all-zero stylesheet still renders a ruler.
const MIN_TIMELINE_MS: f64 = 5.0;

/// Extract the normalized rule list from the host's rule collection.
///
/// Fans every comma-separated animation/transition declaration out into one
/// [`StyleRule`] per slot, resolves each slot's sub-properties with the CSS
/// cyclic-fallback rule (a shorter list clamps to its **last** item), merges
/// keyframe data, and deduplicates by derived id (first occurrence wins, the
/// rest are dropped with a diagnostic).
pub fn extract_rules(sources: &[CssRuleSource]) -> Vec<StyleRule> {
    let mut keyframes_by_name: HashMap<&str, &KeyframesSource> = HashMap::new();
    for source in sources {
        if let CssRuleSource::Keyframes(keyframes) = source {
            keyframes_by_name.insert(keyframes.name.as_str(), keyframes);
        }
    }

    let mut rules = vec![];
    let mut seen_ids = HashSet::new();

    for source in sources {
        let CssRuleSource::Style(style) = source else {
            continue;
        };
        if style.has_animations() {
            extract_animations(style, &keyframes_by_name, &mut seen_ids, &mut rules);
        }
        if style.has_transitions() {
            extract_transitions(style, &mut seen_ids, &mut rules);
        }
    }

    rules
}

/// Upper bound of the timeline: the latest `delay + duration × iterations`
/// over all rules, with infinite animations counted as one iteration.
/// Floored at 5 ms so the timeline is never degenerate.
pub fn total_length_ms(rules: &[StyleRule]) -> f64 {
    rules
        .iter()
        .map(StyleRule::timeline_length_ms)
        .fold(MIN_TIMELINE_MS, f64::max)
}

/// The Nth item of a comma-split sub-property list, per CSS repetition
/// semantics: a list shorter than the animation-name list clamps to its last
/// item. `split_commas` never returns an empty vec, so indexing is safe.
fn nth_clamped<'v>(items: &[&'v str], index: usize) -> &'v str {
    items[index.min(items.len() - 1)]
}

fn extract_animations(
    style: &StyleRuleSource,
    keyframes_by_name: &HashMap<&str, &KeyframesSource>,
    seen_ids: &mut HashSet<String>,
    rules: &mut Vec<StyleRule>,
) {
    let names = split_commas(&style.animation_name);
    let durations = split_commas(&style.animation_duration);
    let delays = split_commas(&style.animation_delay);
    let directions = split_commas(&style.animation_direction);
    let fill_modes = split_commas(&style.animation_fill_mode);
    let timings = split_commas(&style.animation_timing_function);
    let iteration_counts = split_commas(&style.animation_iteration_count);

    for (index, name) in names.iter().enumerate() {
        if name.is_empty() || name.eq_ignore_ascii_case("none") {
            continue;
        }

        let curve = TimelineEasing::parse(nth_clamped(&timings, index));
        let mut keyframes = keyframes_by_name
            .get(name)
            .map(|source| parse_keyframes(source, curve))
            .unwrap_or_default();
        ensure_endpoints(&mut keyframes, curve);

        let id = StyleRule::rule_id(name, &style.selector, index);
        if !seen_ids.insert(id.clone()) {
            tracing::warn!("duplicate rule id '{id}', keeping the first occurrence");
            continue;
        }

        rules.push(StyleRule {
            id,
            kind: RuleKind::Animation,
            name: (*name).to_string(),
            selector: style.selector.clone(),
            animation_index: index,
            delay_ms: parse_time_ms(nth_clamped(&delays, index)),
            duration_ms: parse_time_ms(nth_clamped(&durations, index)),
            iterations: Iterations::from_css(nth_clamped(&iteration_counts, index)),
            direction: Direction::from_css(nth_clamped(&directions, index)),
            fill_mode: FillMode::from_css(nth_clamped(&fill_modes, index)),
            curve,
            keyframes,
            color: RULE_PALETTE[rules.len() % RULE_PALETTE.len()],
        });
    }
}

fn extract_transitions(
    style: &StyleRuleSource,
    seen_ids: &mut HashSet<String>,
    rules: &mut Vec<StyleRule>,
) {
    let properties = split_commas(&style.transition_property);
    let durations = split_commas(&style.transition_duration);
    let delays = split_commas(&style.transition_delay);
    let timings = split_commas(&style.transition_timing_function);

    for (index, property) in properties.iter().enumerate() {
        if property.is_empty() || property.eq_ignore_ascii_case("none") {
            continue;
        }

        let curve = TimelineEasing::parse(nth_clamped(&timings, index));
        // Transitions get a synthetic 0 → 1 keyframe pair so the timeline
        // renders them like any other rule.
        let mut keyframes = vec![];
        ensure_endpoints(&mut keyframes, curve);

        let id = StyleRule::rule_id(property, &style.selector, index);
        if !seen_ids.insert(id.clone()) {
            tracing::warn!("duplicate rule id '{id}', keeping the first occurrence");
            continue;
        }

        rules.push(StyleRule {
            id,
            kind: RuleKind::Transition,
            name: (*property).to_string(),
            selector: style.selector.clone(),
            animation_index: index,
            delay_ms: parse_time_ms(nth_clamped(&delays, index)),
            duration_ms: parse_time_ms(nth_clamped(&durations, index)),
            iterations: Iterations::Finite(1.0),
            direction: Direction::Normal,
            fill_mode: FillMode::None,
            curve,
            keyframes,
            color: RULE_PALETTE[rules.len() % RULE_PALETTE.len()],
        });
    }
}

/// Parse a keyframes rule into discrete stops.
///
/// Each stop's selector list fans out into one entry per progress value, all
/// sharing the stop's property map. A stop's own `animation-timing-function`
/// wins over the rule-level curve. Later stops at the same progress merge
/// over earlier ones, later declarations winning.
fn parse_keyframes(source: &KeyframesSource, rule_curve: TimelineEasing) -> Vec<TimelineKeyframe> {
    let mut frames: Vec<TimelineKeyframe> = vec![];

    for stop in &source.keyframes {
        let frame: BTreeMap<String, String> = stop
            .declarations
            .iter()
            .map(|(property, value)| (property.to_ascii_lowercase(), value.clone()))
            .collect();
        let curve = frame
            .get("animation-timing-function")
            .map_or(rule_curve, |value| TimelineEasing::parse(value));

        for key in split_commas(&stop.key_text) {
            let Some(progress) = parse_progress(key) else {
                tracing::debug!(
                    "skipping keyframe selector '{key}' in '@keyframes {}'",
                    source.name
                );
                continue;
            };

            if let Some(existing) = frames.iter_mut().find(|frame| frame.progress == progress) {
                existing.curve = curve;
                existing.frame.extend(frame.clone());
            } else {
                frames.push(TimelineKeyframe {
                    progress,
                    curve,
                    frame: frame.clone(),
                });
            }
        }
    }

    frames
}

/// Parse one keyframe selector (`from`, `to`, `NN%`) into a progress value.
fn parse_progress(key: &str) -> Option<f64> {
    let key = key.trim();
    if key.eq_ignore_ascii_case("from") {
        return Some(0.0);
    }
    if key.eq_ignore_ascii_case("to") {
        return Some(1.0);
    }
    let percent = key.strip_suffix('%')?.trim().parse::<f64>().ok()?;
    Some((percent / 100.0).clamp(0.0, 1.0))
}
