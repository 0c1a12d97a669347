//! Keyframe stops.

use std::collections::BTreeMap;

use keyline_timing::TimelineEasing;

/// One progress stop within a rule's animation.
///
/// Carries its own style-property snapshot and the easing that applies from
/// this stop to the next. Stops belong to exactly one
/// [`StyleRule`](crate::model::StyleRule) and are kept ordered by `progress`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineKeyframe {
    /// Position on the timeline, in `[0, 1]`.
    pub progress: f64,
    /// Easing out of this stop.
    pub curve: TimelineEasing,
    /// Style properties at this stop, keyed by property name.
    pub frame: BTreeMap<String, String>,
}

impl TimelineKeyframe {
    /// Create a stop with no properties of its own.
    pub fn synthetic(progress: f64, curve: TimelineEasing) -> Self {
        Self {
            progress,
            curve,
            frame: BTreeMap::new(),
        }
    }
}

/// Normalize a keyframe list so interpolation covers the full timeline.
///
/// Sorts by progress and synthesizes empty stops at 0 and 1 when absent, so
/// a rule's keyframe list always brackets `[0, 1]`. The synthesized stops use
/// the rule-level curve.
pub fn ensure_endpoints(frames: &mut Vec<TimelineKeyframe>, rule_curve: TimelineEasing) {
    frames.sort_by(|a, b| a.progress.total_cmp(&b.progress));

    if frames.first().is_none_or(|first| first.progress > 0.0) {
        frames.insert(0, TimelineKeyframe::synthetic(0.0, rule_curve));
    }
    if frames.last().is_none_or(|last| last.progress < 1.0) {
        frames.push(TimelineKeyframe::synthetic(1.0, rule_curve));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_gets_both_endpoints() {
        let mut frames = vec![];
        ensure_endpoints(&mut frames, TimelineEasing::LINEAR);

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].progress, 0.0);
        assert_eq!(frames[1].progress, 1.0);
        assert_eq!(frames[0].curve, TimelineEasing::LINEAR);
    }

    #[test]
    fn existing_endpoints_are_kept() {
        let mut frames = vec![
            TimelineKeyframe::synthetic(1.0, TimelineEasing::EASE_OUT),
            TimelineKeyframe::synthetic(0.0, TimelineEasing::EASE_IN),
        ];
        ensure_endpoints(&mut frames, TimelineEasing::EASE);

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].curve, TimelineEasing::EASE_IN);
        assert_eq!(frames[1].curve, TimelineEasing::EASE_OUT);
    }

    #[test]
    fn interior_stops_are_sorted_and_bracketed() {
        let mut frames = vec![
            TimelineKeyframe::synthetic(0.75, TimelineEasing::EASE),
            TimelineKeyframe::synthetic(0.25, TimelineEasing::EASE),
        ];
        ensure_endpoints(&mut frames, TimelineEasing::EASE);

        let progresses: Vec<f64> = frames.iter().map(|frame| frame.progress).collect();
        assert_eq!(progresses, vec![0.0, 0.25, 0.75, 1.0]);
    }
}
