//! Keyline: bidirectional sync between CSS animation source and a live
//! timeline.
//!
//! The engine keeps three representations of the same animations aligned:
//! the author's CSS text, a derived rule model
//! ([`ViewState`](style::model::ViewState)), and the host
//! engine's running animations. Edits flow both ways: timeline drags become
//! minimal text patches, and text changes become re-extracted rules that are
//! reconciled into playback without restarting untouched animations.
//!
//! # Example
//!
//! ```
//! use keyline::prelude::*;
//!
//! struct NoHost;
//!
//! impl AnimationHost for NoHost {
//!     type Handle = ();
//!     fn match_count(&self, _selector: &str) -> usize { 0 }
//!     fn bind(&mut self, _spec: &BindingSpec, _element: usize) -> Option<()> { None }
//!     fn update(&mut self, _handle: (), _spec: &BindingSpec) {}
//!     fn cancel(&mut self, _handle: ()) {}
//!     fn play(&mut self, _handle: ()) {}
//!     fn pause(&mut self, _handle: ()) {}
//!     fn current_time_ms(&self, _handle: ()) -> f64 { 0.0 }
//!     fn set_current_time_ms(&mut self, _handle: (), _ms: f64) {}
//! }
//!
//! let source = ".box { animation: fade 1s ease-in; }\n\
//!               @keyframes fade { from { opacity: 0; } to { opacity: 1; } }";
//! let mut session = EditorSession::new(MemoryEditor::new(source), NoHost);
//!
//! let rules = parse_stylesheet(source).unwrap();
//! session.set_source_rules(&rules);
//! assert_eq!(session.view().style_rules.len(), 1);
//!
//! // A timeline drag becomes a single-token text patch.
//! session.on_change_duration("fade|.box|0", 2000.0);
//! assert!(session.editor().text().contains("animation: fade 2s ease-in;"));
//! ```

pub mod notify;
pub mod playback;
pub mod session;

pub use keyline_patch as patch;
pub use keyline_style as style;
pub use keyline_timing as timing;

pub use notify::{ChangeNotifier, ConnectionId};
pub use playback::{
    AnimationHost, AnimationTiming, BindingSpec, PlayState, PlayStatus, PlaybackController,
};
pub use session::{EditorSession, MemoryEditor, SourceEditor};

/// Commonly used items for embedding a Keyline session.
pub mod prelude {
    pub use crate::notify::ConnectionId;
    pub use crate::playback::{
        AnimationHost, AnimationTiming, BindingSpec, PlayState, PlayStatus, PlaybackController,
    };
    pub use crate::session::{EditorSession, MemoryEditor, SourceEditor};
    pub use keyline_patch::{SimpleTree, SyntaxTree, TextEdit};
    pub use keyline_style::extract::{extract_rules, total_length_ms};
    pub use keyline_style::model::{RuleKind, StyleRule, ViewState};
    pub use keyline_style::parser::parse_stylesheet;
    pub use keyline_style::source::CssRuleSource;
    pub use keyline_timing::{JumpTerm, TimelineEasing};
}
