// src/query.rs

//! Keeps [`ViewState`] in step with the page's query string.
//!
//! The query string is the source of truth: state is decoded from it on
//! every read, and every change is written back as a minimal edit through a
//! history-replacing navigation. Nothing here performs navigation directly;
//! the routing shell supplies a [`Navigator`].

use crate::constants::*;
use crate::models::{Param, Subject, Tab, VideoFilter, ViewState};
use log::{debug, info};
use url::form_urlencoded;

// --- Query Parameters ---

/// Ordered `key=value` pairs of a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Parses a query string with or without its leading `?`.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        QueryParams {
            pairs: form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First value for `key`, treating an empty value as absent.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Overwrites the first occurrence of `key` in place and drops any later
    /// duplicates; appends when the key is missing.
    pub fn set(&mut self, key: &str, value: &str) {
        let mut seen = false;
        self.pairs.retain_mut(|(k, v)| {
            if k.as_str() != key {
                return true;
            }
            if seen {
                return false;
            }
            seen = true;
            *v = value.to_string();
            true
        });
        if !seen {
            self.pairs.push((key.to_string(), value.to_string()));
        }
    }

    /// Removes every occurrence of `key`.
    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serializes without a leading `?`.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

// --- Decode / Encode ---

/// Reads the view state out of a query string. Absent or empty parameters
/// fall back to `defaults`; unknown parameters are ignored.
pub fn decode(query: &str, defaults: &ViewState) -> ViewState {
    let params = QueryParams::parse(query);

    ViewState {
        subject: params
            .get_non_empty(PARAM_SUBJECT)
            .map(Param::parse)
            .unwrap_or_else(|| defaults.subject.clone()),
        tab: params
            .get_non_empty(PARAM_TAB)
            .map(Param::parse)
            .unwrap_or_else(|| defaults.tab.clone()),
        video_filter: params
            .get_non_empty(PARAM_VIDEO_FILTER)
            .map(Param::parse)
            .unwrap_or_else(|| defaults.video_filter.clone()),
        query: params
            .get_non_empty(PARAM_QUERY)
            .map(str::to_string)
            .unwrap_or_else(|| defaults.query.clone()),
    }
}

/// Full serialization of a state. An empty search is left out.
pub fn encode(state: &ViewState) -> String {
    let full = ViewPatch::new()
        .subject(state.subject.clone())
        .tab(state.tab.clone())
        .video_filter(state.video_filter.clone())
        .query(state.query.clone());
    patch("", &full)
}

// --- Patching ---

/// A partial update to the view. Each edit either sets a parameter or, when
/// given an empty value, removes it. Parameters never mentioned are left as
/// they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewPatch {
    edits: Vec<(&'static str, Option<String>)>,
}

impl ViewPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subject(self, subject: impl Into<Param<Subject>>) -> Self {
        let subject: Param<Subject> = subject.into();
        self.edit(PARAM_SUBJECT, subject.as_str())
    }

    pub fn tab(self, tab: impl Into<Param<Tab>>) -> Self {
        let tab: Param<Tab> = tab.into();
        self.edit(PARAM_TAB, tab.as_str())
    }

    pub fn video_filter(self, filter: impl Into<Param<VideoFilter>>) -> Self {
        let filter: Param<VideoFilter> = filter.into();
        self.edit(PARAM_VIDEO_FILTER, filter.as_str())
    }

    pub fn query(self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.edit(PARAM_QUERY, &query)
    }

    pub fn clear(self, key: &'static str) -> Self {
        self.edit(key, "")
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn touches(&self, key: &str) -> bool {
        self.edits.iter().any(|(k, _)| *k == key)
    }

    pub fn edits(&self) -> impl Iterator<Item = (&'static str, Option<&str>)> {
        self.edits.iter().map(|(k, v)| (*k, v.as_deref()))
    }

    fn edit(mut self, key: &'static str, value: &str) -> Self {
        let value = (!value.is_empty()).then(|| value.to_string());
        match self.edits.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => self.edits.push((key, value)),
        }
        self
    }
}

/// Applies `update` to `current` as a minimal diff and returns the new query
/// string. Parameters the patch does not mention survive unchanged.
pub fn patch(current: &str, update: &ViewPatch) -> String {
    let mut params = QueryParams::parse(current);
    for (key, value) in update.edits() {
        match value {
            Some(value) => params.set(key, value),
            None => params.remove(key),
        }
    }
    params.to_query_string()
}

/// The correcting patch for a stale video sub-filter, if one is needed.
pub fn cleanup_patch(state: &ViewState) -> Option<ViewPatch> {
    state
        .needs_filter_reset()
        .then(|| ViewPatch::new().video_filter(VideoFilter::All))
}

/// Deep link into the library for a tab and subject.
pub fn library_link(tab: Tab, subject: Subject) -> String {
    let mut link = ViewPatch::new().subject(subject).tab(tab);
    if tab == Tab::Videos {
        link = link.video_filter(VideoFilter::All);
    }
    format!("{}?{}", LIBRARY_PATH, patch("", &link))
}

// --- Navigation ---

/// The routing shell's view of the address bar.
pub trait Navigator {
    /// Current query string, without the leading `?`.
    fn current_query(&self) -> &str;

    /// Replaces the current query string without adding a history entry.
    fn replace_query(&mut self, query: &str);
}

/// In-memory history stack.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    index: usize,
}

impl MemoryHistory {
    pub fn new(initial: &str) -> Self {
        MemoryHistory {
            entries: vec![initial.strip_prefix('?').unwrap_or(initial).to_string()],
            index: 0,
        }
    }

    /// Ordinary navigation: drops forward entries and adds a new one.
    pub fn push_query(&mut self, query: &str) {
        self.entries.truncate(self.index + 1);
        self.entries
            .push(query.strip_prefix('?').unwrap_or(query).to_string());
        self.index = self.entries.len() - 1;
    }

    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        MemoryHistory::new("")
    }
}

impl Navigator for MemoryHistory {
    fn current_query(&self) -> &str {
        &self.entries[self.index]
    }

    fn replace_query(&mut self, query: &str) {
        self.entries[self.index] = query.strip_prefix('?').unwrap_or(query).to_string();
    }
}

// --- Synchronizer ---

/// Owns the defaults for one view and routes every state change through
/// the navigator.
#[derive(Debug, Clone, Default)]
pub struct Synchronizer {
    defaults: ViewState,
}

impl Synchronizer {
    pub fn new(defaults: ViewState) -> Self {
        Synchronizer { defaults }
    }

    pub fn defaults(&self) -> &ViewState {
        &self.defaults
    }

    pub fn state<N: Navigator + ?Sized>(&self, nav: &N) -> ViewState {
        decode(nav.current_query(), &self.defaults)
    }

    /// First read of the view when the page opens. A link may carry a stale
    /// sub-filter, so the tab cleanup runs before anything is rendered.
    pub fn load<N: Navigator + ?Sized>(&self, nav: &mut N) -> ViewState {
        self.enforce(nav)
    }

    /// Writes `update` into the address bar, running the tab cleanup on the
    /// state before and after the edit.
    pub fn apply<N: Navigator + ?Sized>(&self, nav: &mut N, update: &ViewPatch) -> ViewState {
        self.enforce(nav);
        let next = patch(nav.current_query(), update);
        info!("Replacing view query: '{}' -> '{}'", nav.current_query(), next);
        nav.replace_query(&next);
        self.enforce(nav)
    }

    /// Resets a stale video sub-filter. Fires only when the state actually
    /// needs it, so repeated calls settle after the first.
    pub fn enforce<N: Navigator + ?Sized>(&self, nav: &mut N) -> ViewState {
        let state = self.state(nav);
        match cleanup_patch(&state) {
            Some(fix) => {
                debug!(
                    "Resetting {} on tab '{}' (was '{}')",
                    PARAM_VIDEO_FILTER, state.tab, state.video_filter
                );
                let next = patch(nav.current_query(), &fix);
                nav.replace_query(&next);
                self.state(nav)
            }
            None => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_uses_defaults_for_missing_and_empty() {
        let state = decode("?tab=notes&q=", &ViewState::default());
        assert_eq!(state.subject, Param::Known(Subject::CoreMaths));
        assert_eq!(state.tab, Param::Known(Tab::Notes));
        assert_eq!(state.video_filter, Param::Known(VideoFilter::All));
        assert_eq!(state.query, "");
    }

    #[test]
    fn test_decode_keeps_unrecognized_values() {
        let state = decode("tab=bogus&subject=physics", &ViewState::default());
        assert_eq!(state.tab, Param::Unknown("bogus".to_string()));
        assert_eq!(state.subject, Param::Known(Subject::Physics));
    }

    #[test]
    fn test_decode_ignores_unknown_params_and_reads_first_duplicate() {
        let state = decode("utm=x&subject=biology&subject=physics", &ViewState::default());
        assert_eq!(state.subject, Param::Known(Subject::Biology));
    }

    #[test]
    fn test_decode_percent_and_plus_encoding() {
        let state = decode("q=motion+%26+forces", &ViewState::default());
        assert_eq!(state.query, "motion & forces");
    }

    #[test]
    fn test_patch_is_a_minimal_diff() {
        let next = patch("utm=x&subject=physics&tab=videos", &ViewPatch::new().tab(Tab::Notes));
        assert_eq!(next, "utm=x&subject=physics&tab=notes");
    }

    #[test]
    fn test_patch_removes_on_empty_value() {
        let next = patch("subject=physics&q=speed", &ViewPatch::new().query(""));
        assert_eq!(next, "subject=physics");

        let next = patch("subject=physics&q=speed", &ViewPatch::new().clear(PARAM_SUBJECT));
        assert_eq!(next, "q=speed");
    }

    #[test]
    fn test_patch_appends_missing_keys() {
        let next = patch("", &ViewPatch::new().subject(Subject::Chemistry).query("trends"));
        assert_eq!(next, "subject=chemistry&q=trends");
    }

    #[test]
    fn test_set_collapses_duplicates() {
        let mut params = QueryParams::parse("tab=a&x=1&tab=b");
        params.set("tab", "notes");
        assert_eq!(params.to_query_string(), "tab=notes&x=1");
    }

    #[test]
    fn test_parse_strips_question_mark() {
        let params = QueryParams::parse("?tab=notes&utm=x");
        assert_eq!(params.len(), 2);
        let pairs: Vec<(&str, &str)> = params.iter().collect();
        assert_eq!(pairs, vec![("tab", "notes"), ("utm", "x")]);
    }

    #[test]
    fn test_patch_touches_only_named_keys() {
        let update = ViewPatch::new().tab(Tab::Notes).clear(PARAM_QUERY);
        assert!(update.touches(PARAM_TAB));
        assert!(update.touches(PARAM_QUERY));
        assert!(!update.touches(PARAM_SUBJECT));
        assert!(!update.is_empty());
    }

    #[test]
    fn test_later_edit_to_same_key_wins() {
        let update = ViewPatch::new().query("one").query("two");
        assert_eq!(update.edits().count(), 1);
        assert_eq!(patch("", &update), "q=two");
    }

    #[test]
    fn test_encode_omits_empty_query() {
        let encoded = encode(&ViewState::default());
        assert_eq!(encoded, "subject=core-maths&tab=videos&vfilter=all");
    }

    #[test]
    fn test_library_link() {
        assert_eq!(
            library_link(Tab::Videos, Subject::Physics),
            "/library?subject=physics&tab=videos&vfilter=all"
        );
        assert_eq!(
            library_link(Tab::PastQuestions, Subject::IntegratedScience),
            "/library?subject=integrated-science&tab=past-questions"
        );
    }

    #[test]
    fn test_apply_replaces_without_pushing() {
        let sync = Synchronizer::default();
        let mut history = MemoryHistory::new("?subject=physics");
        sync.apply(&mut history, &ViewPatch::new().tab(Tab::Notes));
        sync.apply(&mut history, &ViewPatch::new().query("speed"));
        assert_eq!(history.len(), 1);
        assert_eq!(history.current_query(), "subject=physics&tab=notes&q=speed");
    }

    #[test]
    fn test_switching_tab_resets_video_filter() {
        let sync = Synchronizer::default();
        let mut history = MemoryHistory::new("tab=videos&vfilter=past");

        let state = sync.apply(&mut history, &ViewPatch::new().tab(Tab::Notes));
        assert_eq!(state.video_filter, Param::Known(VideoFilter::All));
        assert_eq!(history.current_query(), "tab=notes&vfilter=all");

        let state = sync.apply(&mut history, &ViewPatch::new().tab(Tab::Videos));
        assert_eq!(state.video_filter, Param::Known(VideoFilter::All));
    }

    #[test]
    fn test_custom_defaults_fill_missing_params() {
        let defaults = ViewState {
            subject: Subject::Physics.into(),
            tab: Tab::Notes.into(),
            ..ViewState::default()
        };
        let sync = Synchronizer::new(defaults);
        let history = MemoryHistory::new("q=speed");
        let state = sync.state(&history);
        assert_eq!(state.subject, sync.defaults().subject);
        assert_eq!(state.tab, Param::Known(Tab::Notes));
        assert_eq!(state.query, "speed");
        assert!(!history.is_empty());
    }

    #[test]
    fn test_load_clears_filter_carried_by_a_link() {
        let sync = Synchronizer::default();
        let mut history = MemoryHistory::new("subject=core-maths&tab=notes&vfilter=past");

        let state = sync.load(&mut history);
        assert_eq!(state.video_filter, Param::Known(VideoFilter::All));
        assert_eq!(history.current_query(), "subject=core-maths&tab=notes&vfilter=all");
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_apply_clears_filter_left_before_the_edit() {
        let sync = Synchronizer::default();
        let mut history = MemoryHistory::new("subject=core-maths&tab=notes&vfilter=past");

        let state = sync.apply(&mut history, &ViewPatch::new().tab(Tab::Videos));
        assert_eq!(state.tab, Param::Known(Tab::Videos));
        assert_eq!(state.video_filter, Param::Known(VideoFilter::All));
        assert_eq!(
            history.current_query(),
            "subject=core-maths&tab=videos&vfilter=all"
        );
    }

    #[test]
    fn test_replace_strips_leading_question_mark() {
        let mut history = MemoryHistory::default();
        history.replace_query("?tab=notes");
        assert_eq!(history.current_query(), "tab=notes");
    }

    #[test]
    fn test_enforce_is_quiet_when_nothing_to_fix() {
        let sync = Synchronizer::default();
        let mut history = MemoryHistory::new("tab=notes&utm=x");
        sync.enforce(&mut history);
        assert_eq!(history.current_query(), "tab=notes&utm=x");
    }

    #[test]
    fn test_back_and_forward() {
        let mut history = MemoryHistory::new("");
        history.push_query("?tab=notes");
        assert!(history.back());
        assert_eq!(history.current_query(), "");
        assert!(!history.back());
        assert!(history.forward());
        assert_eq!(history.current_query(), "tab=notes");
    }
}
