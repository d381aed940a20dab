#![forbid(unsafe_code)]

//! In-memory page: location, history, elements, scroll position, focus.
//!
//! Behaves like a browser tab as far as the navigator can tell:
//!
//! - `set_hash` pushes a history entry and queues [`HostEvent::HashChange`]
//!   only when the fragment actually changes;
//! - `replace_hash` rewrites the current entry and queues nothing;
//! - [`MemoryHost::back`] / [`MemoryHost::forward`] queue `PopState` followed
//!   by `HashChange`, in browser order;
//! - inserting or removing an element queues [`HostEvent::DomMutation`];
//! - element tops are reported relative to the viewport, and scrolling clamps
//!   at zero;
//! - only focusable elements (a `tabindex` or a natively focusable tag) take
//!   focus.

use std::collections::{BTreeMap, VecDeque};

use wayfinder_backend::{
    ElementSnapshot, FocusOptions, HostDocument, HostLocation, NATIVELY_FOCUSABLE_TAGS,
    ScrollBehavior,
};

use crate::driver::{HostEvent, HostEvents};

/// Memory host operations never fail.
pub type MemoryError = core::convert::Infallible;

/// One element of the simulated document.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryElement {
    /// Lowercase tag name.
    pub tag_name: String,
    /// Top edge relative to the document.
    pub offset_top: f64,
    pub tab_index: Option<i32>,
    pub scroll_margin_top: f64,
}

impl MemoryElement {
    /// A `<section>` at `offset_top` with the usual header margin.
    #[must_use]
    pub fn section(offset_top: f64) -> Self {
        Self {
            tag_name: "section".into(),
            offset_top,
            tab_index: None,
            scroll_margin_top: 100.0,
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag_name: &str) -> Self {
        self.tag_name = tag_name.to_ascii_lowercase();
        self
    }

    #[must_use]
    pub fn with_tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    #[must_use]
    pub fn with_scroll_margin(mut self, scroll_margin_top: f64) -> Self {
        self.scroll_margin_top = scroll_margin_top;
        self
    }

    fn accepts_focus(&self) -> bool {
        self.tab_index.is_some()
            || NATIVELY_FOCUSABLE_TAGS
                .iter()
                .any(|tag| tag.eq_ignore_ascii_case(&self.tag_name))
    }
}

/// Record of one `scroll_to` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRecord {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

/// In-memory browser tab.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    history: Vec<String>,
    index: usize,
    events: VecDeque<HostEvent>,
    elements: BTreeMap<String, MemoryElement>,
    scroll_y: f64,
    scrolls: Vec<ScrollRecord>,
    focused: Option<String>,
    reduced_motion: bool,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new("")
    }
}

/// Browser form of a fragment: `""` when empty, otherwise with a leading `#`.
fn fragment(hash: &str) -> String {
    match hash.strip_prefix('#').unwrap_or(hash) {
        "" => String::new(),
        body => format!("#{body}"),
    }
}

impl MemoryHost {
    /// Tab opened at `hash` (as typed into the address bar).
    #[must_use]
    pub fn new(hash: &str) -> Self {
        Self {
            history: vec![fragment(hash)],
            index: 0,
            events: VecDeque::new(),
            elements: BTreeMap::new(),
            scroll_y: 0.0,
            scrolls: Vec::new(),
            focused: None,
            reduced_motion: false,
        }
    }

    /// Mount an element, queueing a DOM mutation.
    pub fn insert_element(&mut self, id: &str, element: MemoryElement) {
        self.elements.insert(id.to_owned(), element);
        self.events.push_back(HostEvent::DomMutation);
    }

    /// Unmount an element, queueing a DOM mutation if it existed.
    pub fn remove_element(&mut self, id: &str) -> Option<MemoryElement> {
        let removed = self.elements.remove(id)?;
        if self.focused.as_deref() == Some(id) {
            self.focused = None;
        }
        self.events.push_back(HostEvent::DomMutation);
        Some(removed)
    }

    /// Current state of an element.
    #[must_use]
    pub fn element_state(&self, id: &str) -> Option<&MemoryElement> {
        self.elements.get(id)
    }

    /// Id of the focused element.
    #[must_use]
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Every `scroll_to` call so far.
    #[must_use]
    pub fn scrolls(&self) -> &[ScrollRecord] {
        &self.scrolls
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    /// Simulate a link click or an address-bar edit.
    pub fn visit(&mut self, hash: &str) {
        self.push_entry(fragment(hash));
    }

    /// History entries, oldest first.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Browser back button. Returns `false` at the first entry.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.traverse(self.index - 1);
        true
    }

    /// Browser forward button. Returns `false` at the last entry.
    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.history.len() {
            return false;
        }
        self.traverse(self.index + 1);
        true
    }

    /// Events not yet delivered.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    fn current(&self) -> &str {
        &self.history[self.index]
    }

    fn push_entry(&mut self, hash: String) {
        if hash == self.current() {
            return;
        }
        self.history.truncate(self.index + 1);
        self.history.push(hash);
        self.index += 1;
        self.events.push_back(HostEvent::HashChange);
    }

    fn traverse(&mut self, index: usize) {
        let changed = self.history[index] != self.history[self.index];
        self.index = index;
        self.events.push_back(HostEvent::PopState);
        if changed {
            self.events.push_back(HostEvent::HashChange);
        }
    }
}

impl HostEvents for MemoryHost {
    fn pop_event(&mut self) -> Option<HostEvent> {
        self.events.pop_front()
    }
}

impl HostLocation for MemoryHost {
    type Error = MemoryError;

    fn hash(&self) -> String {
        self.current().to_owned()
    }

    fn set_hash(&mut self, hash: &str) -> Result<(), Self::Error> {
        self.push_entry(fragment(hash));
        Ok(())
    }

    fn replace_hash(&mut self, hash: &str) -> Result<(), Self::Error> {
        self.history[self.index] = fragment(hash);
        Ok(())
    }
}

impl HostDocument for MemoryHost {
    type Error = MemoryError;

    fn element(&self, id: &str) -> Option<ElementSnapshot> {
        self.elements.get(id).map(|element| ElementSnapshot {
            tag_name: element.tag_name.clone(),
            top: element.offset_top - self.scroll_y,
            tab_index: element.tab_index,
            scroll_margin_top: element.scroll_margin_top,
        })
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) -> Result<(), Self::Error> {
        self.scrolls.push(ScrollRecord { top, behavior });
        self.scroll_y = top.max(0.0);
        Ok(())
    }

    fn set_tab_index(&mut self, id: &str, tab_index: i32) -> Result<(), Self::Error> {
        if let Some(element) = self.elements.get_mut(id) {
            element.tab_index = Some(tab_index);
        }
        Ok(())
    }

    fn focus(&mut self, id: &str, _options: FocusOptions) -> Result<bool, Self::Error> {
        let Some(element) = self.elements.get(id) else {
            return Ok(false);
        };
        if !element.accepts_focus() {
            return Ok(false);
        }
        self.focused = Some(id.to_owned());
        Ok(true)
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}
