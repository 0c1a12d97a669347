//! Animation rule model and extraction for Keyline.
//!
//! This crate turns the host CSS engine's already-cascaded rule collection
//! into the normalized timeline model the rest of the engine works with:
//!
//! - **Source records** ([`source`]): the data contract delivered by the host
//!   CSS engine — style rules with comma-joined animation/transition
//!   sub-property strings, and keyframes rules with their ordered stops.
//! - **Model** ([`model`]): [`StyleRule`](model::StyleRule) — one entry per
//!   (selector, animation-or-transition slot) — with
//!   [`TimelineKeyframe`](model::TimelineKeyframe) stops and the session's
//!   [`ViewState`](model::ViewState).
//! - **Extraction** ([`extract`]): the pure recomputation step that fans
//!   comma lists out into discrete rules, applies the CSS cyclic-fallback
//!   indexing, merges per-keyframe easing overrides, and derives stable ids.
//! - **Parsing** ([`parser`]): a `cssparser`-based stylesheet reader that
//!   produces host-shaped source records from raw CSS text, expanding
//!   `animation`/`transition` shorthands. This makes the engine usable (and
//!   testable) without a live CSS object model; it is not a general CSS
//!   parser and interprets only the animation/transition property family.
//!
//! Extraction is synchronous, idempotent, and total: the same source always
//! yields a structurally identical rule list with identical ids, and
//! malformed values degrade through defaults instead of failing.
//!
//! # Example
//!
//! ```
//! use keyline_style::extract::{extract_rules, total_length_ms};
//! use keyline_style::parser::parse_stylesheet;
//!
//! let css = ".a { animation: fade 1s 2s ease-in; }
//!            @keyframes fade { from { opacity: 0 } to { opacity: 1 } }";
//! let rules = extract_rules(&parse_stylesheet(css).unwrap());
//!
//! assert_eq!(rules.len(), 1);
//! assert_eq!(rules[0].duration_ms, 1000.0);
//! assert_eq!(rules[0].delay_ms, 2000.0);
//! assert_eq!(total_length_ms(&rules), 3000.0);
//! ```

pub mod extract;
pub mod model;
pub mod parser;
pub mod source;
pub mod time;

mod error;

pub use error::{Error, Result};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::extract::{extract_rules, total_length_ms};
    pub use crate::model::{
        Direction, FillMode, Iterations, RuleKind, StyleRule, TimelineKeyframe, ViewState,
    };
    pub use crate::parser::parse_stylesheet;
    pub use crate::source::{CssRuleSource, KeyframeSource, KeyframesSource, StyleRuleSource};
    pub use crate::time::{format_time_ms, parse_time_ms};
    pub use keyline_timing::{JumpTerm, TimelineEasing, split_commas};
}
