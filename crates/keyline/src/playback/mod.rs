//! Playback reconciliation.
//!
//! [`PlaybackController`] keeps the host animation engine's bindings aligned
//! with the current rule set while preserving identity: re-extracting an
//! unchanged rule must not restart its animation, and dragging one rule's
//! duration must not visibly restart any other. It also owns the shared
//! play/pause state, with the paused offset anchored to wall-clock time
//! while running.
//!
//! Everything here is tolerant by construction. Selectors that match no
//! elements bind nothing, rules can come and go between calls, and no
//! reconciliation path returns an error; this runs on every keystroke.

mod host;

pub use host::{AnimationHost, AnimationTiming, BindingSpec};

use std::collections::HashMap;
use std::time::Instant;

use keyline_style::model::{RuleKind, StyleRule};
use tracing::debug;

use crate::notify::{ChangeNotifier, ConnectionId};

/// Whether the shared timeline is advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayStatus {
    #[default]
    Running,
    Paused,
}

/// Snapshot of the controller's timeline state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayState {
    pub status: PlayStatus,
    /// Current timeline position in milliseconds. While running this
    /// advances with wall-clock time.
    pub offset_ms: f64,
}

struct Binding<H> {
    handle: H,
    end_time_ms: f64,
}

/// Drives a host animation engine from extracted style rules.
pub struct PlaybackController<H: AnimationHost> {
    host: H,
    /// Live bindings keyed by (rule id, matched-element ordinal).
    bindings: HashMap<(String, usize), Binding<H::Handle>>,
    /// Last rule set seen, kept for [`reset`](Self::reset).
    rules: Vec<StyleRule>,
    status: PlayStatus,
    offset_ms: f64,
    /// Wall-clock anchor of the last transition into `Running`.
    played_at: Option<Instant>,
    changed: ChangeNotifier<PlayState>,
}

impl<H: AnimationHost> PlaybackController<H> {
    /// Create a controller in the running state at offset zero.
    pub fn new(host: H) -> Self {
        Self {
            host,
            bindings: HashMap::new(),
            rules: vec![],
            status: PlayStatus::Running,
            offset_ms: 0.0,
            played_at: Some(Instant::now()),
            changed: ChangeNotifier::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Synchronous snapshot of the timeline state.
    pub fn state(&self) -> PlayState {
        PlayState {
            status: self.status,
            offset_ms: self.current_offset_ms(),
        }
    }

    fn current_offset_ms(&self) -> f64 {
        let elapsed = match (self.status, self.played_at) {
            (PlayStatus::Running, Some(anchor)) => anchor.elapsed().as_secs_f64() * 1000.0,
            _ => 0.0,
        };
        self.offset_ms + elapsed
    }

    /// Resume playback, optionally seeking to `offset_ms` first.
    ///
    /// Without an explicit offset, animations already past their end time
    /// stay finished; only a seek forces them back into playback.
    pub fn play(&mut self, offset_ms: Option<f64>) {
        // Re-anchoring while already running must not rewind the reported
        // position: fold the wall-clock extrapolation in before moving the
        // anchor.
        self.offset_ms = offset_ms.unwrap_or_else(|| self.current_offset_ms());
        for binding in self.bindings.values() {
            if let Some(offset) = offset_ms {
                self.host.set_current_time_ms(binding.handle, offset);
            }
            if offset_ms.is_some() || self.host.current_time_ms(binding.handle) < binding.end_time_ms
            {
                self.host.play(binding.handle);
            }
        }
        self.status = PlayStatus::Running;
        self.played_at = Some(Instant::now());
        self.emit_state();
    }

    /// Pause playback, optionally seeking to `offset_ms` first. Without an
    /// explicit offset the paused position is the wall-clock extrapolation
    /// of the last play.
    pub fn pause(&mut self, offset_ms: Option<f64>) {
        let paused_at = offset_ms.unwrap_or_else(|| self.current_offset_ms());
        for binding in self.bindings.values() {
            if let Some(offset) = offset_ms {
                self.host.set_current_time_ms(binding.handle, offset);
            }
            self.host.pause(binding.handle);
        }
        self.offset_ms = paused_at;
        self.played_at = None;
        self.status = PlayStatus::Paused;
        self.emit_state();
    }

    pub fn toggle(&mut self) {
        match self.status {
            PlayStatus::Paused => self.play(None),
            PlayStatus::Running => self.pause(None),
        }
    }

    /// Reconcile the live bindings against a new rule set.
    ///
    /// A set diff, not a teardown: (rule id, element ordinal) pairs already
    /// bound are updated in place and keep their play position, new pairs
    /// are bound at the controller's current offset and status, and pairs
    /// absent from the new set are cancelled. Transition rules are modeled
    /// but never bound; the host engine drives those itself.
    pub fn update_rules(&mut self, rules: &[StyleRule]) {
        self.rules = rules.to_vec();
        let offset = self.current_offset_ms();
        let mut next = HashMap::new();

        for rule in rules.iter().filter(|rule| rule.kind == RuleKind::Animation) {
            let spec = BindingSpec::for_rule(rule);
            let end_time_ms = rule.end_time_ms();
            for element in 0..self.host.match_count(&spec.selector) {
                let key = (rule.id.clone(), element);
                if next.contains_key(&key) {
                    continue;
                }
                if let Some(existing) = self.bindings.remove(&key) {
                    self.host.update(existing.handle, &spec);
                    next.insert(
                        key,
                        Binding {
                            handle: existing.handle,
                            end_time_ms,
                        },
                    );
                } else if let Some(handle) = self.host.bind(&spec, element) {
                    self.host.set_current_time_ms(handle, offset);
                    match self.status {
                        PlayStatus::Running => self.host.play(handle),
                        PlayStatus::Paused => self.host.pause(handle),
                    }
                    next.insert(key, Binding { handle, end_time_ms });
                }
            }
        }

        for ((rule_id, element), stale) in self.bindings.drain() {
            debug!(rule_id = %rule_id, element, "cancelling stale animation binding");
            self.host.cancel(stale.handle);
        }
        self.bindings = next;
    }

    /// Tear everything down and rebind from the last rule set at offset
    /// zero, running. For when the rendered markup changed underneath the
    /// animations.
    pub fn reset(&mut self) {
        for (_, binding) in self.bindings.drain() {
            self.host.cancel(binding.handle);
        }
        self.offset_ms = 0.0;
        self.status = PlayStatus::Running;
        self.played_at = Some(Instant::now());
        let rules = std::mem::take(&mut self.rules);
        self.update_rules(&rules);
        self.emit_state();
    }

    /// Subscribe to state transitions. Callbacks fire synchronously on
    /// every `play`/`pause`/`toggle`/`reset`.
    pub fn on_change<F>(&self, callback: F) -> ConnectionId
    where
        F: Fn(&PlayState) + Send + Sync + 'static,
    {
        self.changed.connect(callback)
    }

    /// Remove an [`on_change`](Self::on_change) subscription.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.changed.disconnect(id)
    }

    fn emit_state(&self) {
        self.changed.emit(&self.state());
    }
}
