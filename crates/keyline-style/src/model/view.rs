//! Session view state.

use std::collections::HashSet;

use crate::extract::total_length_ms;
use crate::model::StyleRule;

/// The editing session's model state: the extracted rule list plus the
/// pure-UI selection set.
///
/// `style_rules` is recomputed wholesale from the source on every change;
/// `selected_rule_ids` is un-derived UI state that survives recomputation for
/// every id that still exists.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// The extracted rules, in extraction order.
    pub style_rules: Vec<StyleRule>,
    /// Ids of the rules currently selected in the editor.
    pub selected_rule_ids: HashSet<String>,
}

impl ViewState {
    /// Create an empty view state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a rule by id.
    pub fn rule(&self, id: &str) -> Option<&StyleRule> {
        self.style_rules.iter().find(|rule| rule.id == id)
    }

    /// Replace the rule list after re-extraction.
    ///
    /// Selection entries whose rule disappeared are dropped; ids that
    /// survived the recomputation stay selected.
    pub fn replace_rules(&mut self, rules: Vec<StyleRule>) {
        self.style_rules = rules;
        self.selected_rule_ids
            .retain(|id| self.style_rules.iter().any(|rule| &rule.id == id));
    }

    /// Toggle each given id's membership in the selection set.
    ///
    /// Ids with no matching rule are ignored.
    pub fn toggle_select(&mut self, ids: &[String]) {
        for id in ids {
            if self.rule(id).is_none() {
                continue;
            }
            if !self.selected_rule_ids.remove(id) {
                self.selected_rule_ids.insert(id.clone());
            }
        }
    }

    /// Upper bound of the rendered timeline, in milliseconds.
    pub fn total_length_ms(&self) -> f64 {
        total_length_ms(&self.style_rules)
    }
}
