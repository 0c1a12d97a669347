//! The normalized timeline model.

mod keyframe;
mod rule;
mod view;

pub use keyframe::{TimelineKeyframe, ensure_endpoints};
pub use rule::{
    Direction, FillMode, Iterations, RULE_PALETTE, RuleKind, StyleRule, normalize_selector,
};
pub use view::ViewState;
