//! The editing session facade.
//!
//! [`EditorSession`] is the single surface the visual layer calls: timeline
//! drags land here as `on_change_delay` / `on_change_duration` /
//! `update_easing`, and rule-change events land as `set_source_rules`. The
//! session owns the derived [`ViewState`] and the [`PlaybackController`];
//! the source text and its syntax tree stay behind the [`SourceEditor`]
//! trait, owned by whoever embeds the session.
//!
//! Every mutating operation returns `bool`: `false` means the target rule
//! or its source location could not be found, which is routine while the
//! author is mid-edit and never an error.

use std::ops::Range;

use keyline_patch::{
    PropertySpec, SimpleTree, SyntaxTree, TextEdit, ValueMatcher, find_keyframes_body,
    find_rule_body, set_keyframe_easing, set_property,
};
use keyline_style::extract::extract_rules;
use keyline_style::model::{RuleKind, ViewState};
use keyline_style::source::CssRuleSource;
use keyline_style::time::format_time_ms;
use keyline_timing::TimelineEasing;
use tracing::debug;

use crate::playback::{AnimationHost, PlaybackController};

/// The source-editing surface: text, its syntax tree, edit application,
/// and a single highlight range.
///
/// Implementors re-derive the tree after [`apply`](Self::apply); the
/// session always reads text and tree fresh from here.
pub trait SourceEditor {
    type Tree: SyntaxTree;

    fn text(&self) -> &str;

    fn tree(&self) -> &Self::Tree;

    fn apply(&mut self, edit: &TextEdit);

    fn set_highlight(&mut self, range: Option<Range<usize>>);
}

/// An in-memory [`SourceEditor`] over a [`SimpleTree`], for hosts and tests
/// without an external editor service.
#[derive(Debug)]
pub struct MemoryEditor {
    text: String,
    tree: SimpleTree,
    highlight: Option<Range<usize>>,
}

impl MemoryEditor {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let tree = SimpleTree::parse(&text);
        Self {
            text,
            tree,
            highlight: None,
        }
    }

    pub fn highlight(&self) -> Option<&Range<usize>> {
        self.highlight.as_ref()
    }
}

impl SourceEditor for MemoryEditor {
    type Tree = SimpleTree;

    fn text(&self) -> &str {
        &self.text
    }

    fn tree(&self) -> &Self::Tree {
        &self.tree
    }

    fn apply(&mut self, edit: &TextEdit) {
        self.text = edit.apply(&self.text);
        self.tree = SimpleTree::parse(&self.text);
    }

    fn set_highlight(&mut self, range: Option<Range<usize>>) {
        self.highlight = range;
    }
}

/// One editing session binding a source editor, the derived view state, and
/// the playback controller together.
pub struct EditorSession<E: SourceEditor, H: AnimationHost> {
    editor: E,
    view: ViewState,
    playback: PlaybackController<H>,
}

impl<E: SourceEditor, H: AnimationHost> EditorSession<E, H> {
    pub fn new(editor: E, host: H) -> Self {
        Self {
            editor,
            view: ViewState::new(),
            playback: PlaybackController::new(host),
        }
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn playback(&self) -> &PlaybackController<H> {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut PlaybackController<H> {
        &mut self.playback
    }

    /// Feed a fresh rule collection from the host CSS engine: re-extract,
    /// update the view (keeping surviving selections), and reconcile
    /// playback bindings.
    pub fn set_source_rules(&mut self, sources: &[CssRuleSource]) {
        let rules = extract_rules(sources);
        self.view.replace_rules(rules);
        self.playback.update_rules(&self.view.style_rules);
    }

    /// Set a rule's delay from a timeline drag, in milliseconds.
    pub fn on_change_delay(&mut self, rule_id: &str, delay_ms: f64) -> bool {
        let Some(rule) = self.view.rule(rule_id) else {
            return false;
        };
        let (selector, index, kind) = (rule.selector.clone(), rule.animation_index, rule.kind);
        self.apply_to_rule(&selector, &delay_spec(kind), &format_time_ms(delay_ms), index)
    }

    /// Set a rule's duration from a timeline drag, in milliseconds.
    pub fn on_change_duration(&mut self, rule_id: &str, duration_ms: f64) -> bool {
        let Some(rule) = self.view.rule(rule_id) else {
            return false;
        };
        let (selector, index, kind) = (rule.selector.clone(), rule.animation_index, rule.kind);
        self.apply_to_rule(
            &selector,
            &duration_spec(kind),
            &format_time_ms(duration_ms),
            index,
        )
    }

    /// Set a rule's easing curve. With `keyframe_index`, targets the
    /// `animation-timing-function` of that keyframe inside the rule's
    /// `@keyframes` block; otherwise the rule-level timing function.
    pub fn update_easing(
        &mut self,
        rule_id: &str,
        keyframe_index: Option<usize>,
        easing: &TimelineEasing,
    ) -> bool {
        let Some(rule) = self.view.rule(rule_id) else {
            return false;
        };
        let css = easing.to_css();
        match keyframe_index {
            Some(index) => {
                let name = rule.name.clone();
                let edit = {
                    let text = self.editor.text();
                    let tree = self.editor.tree();
                    let Some(body) = find_keyframes_body(tree, text, &name) else {
                        debug!(name = %name, "keyframes block not found");
                        return false;
                    };
                    set_keyframe_easing(tree, text, &body, index, &css)
                };
                self.apply_edit(edit)
            }
            None => {
                let (selector, index, kind) =
                    (rule.selector.clone(), rule.animation_index, rule.kind);
                self.apply_to_rule(&selector, &easing_spec(kind), &css, index)
            }
        }
    }

    /// Set an arbitrary animation/transition sub-property by name.
    pub fn update_rule_property_value(
        &mut self,
        rule_id: &str,
        property: &str,
        value: &str,
    ) -> bool {
        let Some(rule) = self.view.rule(rule_id) else {
            return false;
        };
        let (selector, index) = (rule.selector.clone(), rule.animation_index);
        self.apply_to_rule(&selector, &property_spec(property), value, index)
    }

    /// Highlight a rule's whole source range in the editor.
    pub fn highlight_rule(&mut self, rule_id: &str) -> bool {
        let Some(rule) = self.view.rule(rule_id) else {
            return false;
        };
        let selector = rule.selector.clone();
        let range = {
            let tree = self.editor.tree();
            find_rule_body(tree, self.editor.text(), &selector).map(|body| tree.span(body.rule))
        };
        match range {
            Some(range) => {
                self.editor.set_highlight(Some(range));
                true
            }
            None => false,
        }
    }

    /// Highlight the `@keyframes` block an animation rule draws from.
    pub fn highlight_animation_source(&mut self, rule_id: &str) -> bool {
        let Some(rule) = self.view.rule(rule_id) else {
            return false;
        };
        let name = rule.name.clone();
        let range = {
            let tree = self.editor.tree();
            find_keyframes_body(tree, self.editor.text(), &name).map(|body| tree.span(body.rule))
        };
        match range {
            Some(range) => {
                self.editor.set_highlight(Some(range));
                true
            }
            None => false,
        }
    }

    pub fn remove_highlight(&mut self) {
        self.editor.set_highlight(None);
    }

    /// Flip the selected state of each given rule id.
    pub fn toggle_select_rules(&mut self, ids: &[String]) {
        self.view.toggle_select(ids);
    }

    fn apply_to_rule(
        &mut self,
        selector: &str,
        spec: &PropertySpec<'_>,
        value: &str,
        animation_index: usize,
    ) -> bool {
        let edit = {
            let text = self.editor.text();
            let tree = self.editor.tree();
            let Some(body) = find_rule_body(tree, text, selector) else {
                debug!(selector, "rule body not found");
                return false;
            };
            set_property(tree, text, &body, spec, value, animation_index)
        };
        self.apply_edit(edit)
    }

    fn apply_edit(&mut self, edit: Option<TextEdit>) -> bool {
        match edit {
            Some(edit) => {
                self.editor.apply(&edit);
                true
            }
            None => false,
        }
    }
}

fn delay_spec(kind: RuleKind) -> PropertySpec<'static> {
    let matcher = ValueMatcher::Time { occurrence: 1 };
    match kind {
        RuleKind::Animation => {
            PropertySpec::with_shorthand("animation-delay", "animation", matcher)
        }
        RuleKind::Transition => {
            PropertySpec::with_shorthand("transition-delay", "transition", matcher)
        }
    }
}

fn duration_spec(kind: RuleKind) -> PropertySpec<'static> {
    let matcher = ValueMatcher::Time { occurrence: 0 };
    match kind {
        RuleKind::Animation => {
            PropertySpec::with_shorthand("animation-duration", "animation", matcher)
        }
        RuleKind::Transition => {
            PropertySpec::with_shorthand("transition-duration", "transition", matcher)
        }
    }
}

fn easing_spec(kind: RuleKind) -> PropertySpec<'static> {
    match kind {
        RuleKind::Animation => PropertySpec::with_shorthand(
            "animation-timing-function",
            "animation",
            ValueMatcher::Easing,
        ),
        RuleKind::Transition => PropertySpec::with_shorthand(
            "transition-timing-function",
            "transition",
            ValueMatcher::Easing,
        ),
    }
}

/// Map a longhand property name onto its shorthand fallback, so an edit
/// still lands when the value only exists inside `animation:`/`transition:`.
fn property_spec(property: &str) -> PropertySpec<'_> {
    match property {
        "animation-delay" => delay_spec(RuleKind::Animation),
        "transition-delay" => delay_spec(RuleKind::Transition),
        "animation-duration" => duration_spec(RuleKind::Animation),
        "transition-duration" => duration_spec(RuleKind::Transition),
        "animation-timing-function" => easing_spec(RuleKind::Animation),
        "transition-timing-function" => easing_spec(RuleKind::Transition),
        "animation-name" => PropertySpec::with_shorthand(
            "animation-name",
            "animation",
            ValueMatcher::Ident { occurrence: 0 },
        ),
        other => PropertySpec::longhand_only(other),
    }
}

#[cfg(test)]
mod tests {
    use keyline_style::parser::parse_stylesheet;

    use super::*;
    use crate::playback::BindingSpec;

    /// Minimal host: fixed element counts, bindings tracked by id.
    #[derive(Default)]
    struct CountingHost {
        element_count: usize,
        bound: Vec<BindingSpec>,
    }

    impl AnimationHost for CountingHost {
        type Handle = usize;

        fn match_count(&self, _selector: &str) -> usize {
            self.element_count
        }

        fn bind(&mut self, spec: &BindingSpec, _element_index: usize) -> Option<usize> {
            self.bound.push(spec.clone());
            Some(self.bound.len() - 1)
        }

        fn update(&mut self, handle: usize, spec: &BindingSpec) {
            self.bound[handle] = spec.clone();
        }

        fn cancel(&mut self, _handle: usize) {}

        fn play(&mut self, _handle: usize) {}

        fn pause(&mut self, _handle: usize) {}

        fn current_time_ms(&self, _handle: usize) -> f64 {
            0.0
        }

        fn set_current_time_ms(&mut self, _handle: usize, _time_ms: f64) {}
    }

    const SOURCE: &str = "\
.box {\n  animation: fade 1s 500ms ease-in;\n}\n\n\
@keyframes fade {\n  from { opacity: 0; }\n  to { opacity: 1; }\n}\n";

    fn session_over(source: &str) -> EditorSession<MemoryEditor, CountingHost> {
        let mut session = EditorSession::new(
            MemoryEditor::new(source),
            CountingHost {
                element_count: 1,
                ..CountingHost::default()
            },
        );
        let sources = parse_stylesheet(source).unwrap();
        session.set_source_rules(&sources);
        session
    }

    #[test]
    fn set_source_rules_populates_view_and_bindings() {
        let session = session_over(SOURCE);
        assert_eq!(session.view().style_rules.len(), 1);
        let rule = &session.view().style_rules[0];
        assert_eq!(rule.id, "fade|.box|0");
        assert_eq!(rule.delay_ms, 500.0);
        assert_eq!(session.playback().host().bound.len(), 1);
    }

    #[test]
    fn delay_drag_patches_only_the_delay_token() {
        let mut session = session_over(SOURCE);
        assert!(session.on_change_delay("fade|.box|0", 250.0));
        assert!(session.editor().text().contains("animation: fade 1s 250ms ease-in;"));

        assert!(!session.on_change_delay("missing|.x|0", 250.0));
    }

    #[test]
    fn duration_drag_formats_whole_seconds() {
        let mut session = session_over(SOURCE);
        assert!(session.on_change_duration("fade|.box|0", 2000.0));
        assert!(session.editor().text().contains("animation: fade 2s 500ms ease-in;"));
    }

    #[test]
    fn drags_land_on_grouped_selector_rules() {
        // Extraction keeps the whole selector list on the rule, so the
        // patch has to find `.a, .b { ... }` by that full list.
        let source = "\
.a, .b {\n  animation: fade 1s;\n}\n\n\
@keyframes fade {\n  from { opacity: 0; }\n  to { opacity: 1; }\n}\n";
        let mut session = session_over(source);
        let id = session.view().style_rules[0].id.clone();
        assert_eq!(id, "fade|.a,.b|0");
        assert!(session.on_change_duration(&id, 2000.0));
        assert!(session.editor().text().contains("animation: fade 2s;"));
    }

    #[test]
    fn rule_level_easing_update() {
        let mut session = session_over(SOURCE);
        let easing = TimelineEasing::parse("cubic-bezier(0.2, 0, 0.8, 1)");
        assert!(session.update_easing("fade|.box|0", None, &easing));
        assert!(session.editor().text().contains(&easing.to_css()));
        assert!(!session.editor().text().contains("ease-in"));
    }

    #[test]
    fn keyframe_level_easing_update() {
        let mut session = session_over(SOURCE);
        assert!(session.update_easing("fade|.box|0", Some(0), &TimelineEasing::LINEAR));
        assert!(
            session
                .editor()
                .text()
                .contains("from {\n  animation-timing-function: linear; opacity: 0; }")
        );
    }

    #[test]
    fn update_rule_property_value_reports_misses() {
        let mut session = session_over(SOURCE);
        assert!(session.update_rule_property_value(
            "fade|.box|0",
            "animation-fill-mode",
            "both"
        ));
        assert!(session.editor().text().contains("animation-fill-mode: both;"));
        assert!(!session.update_rule_property_value("nope|.box|0", "animation-delay", "1s"));
    }

    #[test]
    fn highlight_round_trip() {
        let mut session = session_over(SOURCE);
        assert!(session.highlight_rule("fade|.box|0"));
        let range = session.editor().highlight().cloned().unwrap();
        assert!(session.editor().text()[range].starts_with(".box {"));

        assert!(session.highlight_animation_source("fade|.box|0"));
        let range = session.editor().highlight().cloned().unwrap();
        assert!(session.editor().text()[range].starts_with("@keyframes fade"));

        session.remove_highlight();
        assert!(session.editor().highlight().is_none());
    }

    #[test]
    fn toggle_select_flips_per_id() {
        let mut session = session_over(SOURCE);
        let id = "fade|.box|0".to_string();
        session.toggle_select_rules(std::slice::from_ref(&id));
        assert!(session.view().selected_rule_ids.contains(&id));
        session.toggle_select_rules(std::slice::from_ref(&id));
        assert!(!session.view().selected_rule_ids.contains(&id));
    }

    #[test]
    fn reextraction_after_edit_keeps_rule_identity() {
        let mut session = session_over(SOURCE);
        assert!(session.on_change_duration("fade|.box|0", 3000.0));

        let sources = parse_stylesheet(session.editor().text()).unwrap();
        session.set_source_rules(&sources);
        let rule = &session.view().style_rules[0];
        assert_eq!(rule.id, "fade|.box|0");
        assert_eq!(rule.duration_ms, 3000.0);
    }
}
