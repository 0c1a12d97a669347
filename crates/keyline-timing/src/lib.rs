//! CSS timing-function values for Keyline.
//!
//! This crate is the leaf of the Keyline workspace: pure functions for
//! converting between CSS timing-function text (`ease`, `cubic-bezier(...)`,
//! `steps(...)`) and the typed [`TimelineEasing`] value, plus the
//! depth-tracking comma scanner used to split shorthand value lists.
//!
//! Parsing is *total*: any input — empty, garbage, or a half-typed
//! `cubic-bezier(0.1,` mid-keystroke — yields a valid easing, falling back to
//! the CSS default `ease`. The rest of the engine runs on every edit of
//! possibly broken source text, so nothing here ever returns an error.
//!
//! # Example
//!
//! ```
//! use keyline_timing::TimelineEasing;
//!
//! let easing = TimelineEasing::parse("cubic-bezier(0.42, 0, 1, 1)");
//! assert_eq!(easing, TimelineEasing::EASE_IN);
//! assert_eq!(easing.to_css(), "cubic-bezier(0.42, 0, 1, 1)");
//! ```

mod easing;
mod list;

pub use easing::{JumpTerm, TimelineEasing};
pub use list::split_commas;
