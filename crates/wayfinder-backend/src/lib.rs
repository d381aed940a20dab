#![forbid(unsafe_code)]
#![doc = "Host traits for Wayfinder: platform abstraction for location, document, and time."]
#![doc = ""]
#![doc = "This crate defines the boundary between the navigation runtime and the page"]
#![doc = "that embeds it (a browser via `wasm-bindgen`, or the in-memory host used by"]
#![doc = "native tests). The runtime never reads `window.location` or queries the DOM"]
#![doc = "directly; every side effect flows through these traits."]

use core::time::Duration;

/// Monotonic clock abstraction.
///
/// Browser hosts use `performance.now()`; tests advance a deterministic clock.
pub trait HostClock {
    /// Returns elapsed time since an unspecified epoch, monotonically increasing.
    fn now_mono(&self) -> Duration;
}

/// Location fragment and history access.
///
/// This is the single piece of process-wide mutable routing state. Only the
/// navigator writes it.
pub trait HostLocation {
    /// Platform-specific error type.
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Current fragment including the leading `#`, or `""` when absent.
    fn hash(&self) -> String;

    /// Assign the fragment, creating a history entry.
    ///
    /// Hosts must emit a hash-change event when (and only when) the fragment
    /// actually changes.
    fn set_hash(&mut self, hash: &str) -> Result<(), Self::Error>;

    /// Replace the fragment in place (`history.replaceState`).
    ///
    /// Must not create a history entry and must not emit a hash-change event.
    fn replace_hash(&mut self, hash: &str) -> Result<(), Self::Error>;
}

/// Requested scroll animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Animated scroll.
    Smooth,
    /// Jump immediately.
    Instant,
}

impl ScrollBehavior {
    /// Smooth unless the user prefers reduced motion.
    #[must_use]
    pub const fn for_motion_preference(prefers_reduced_motion: bool) -> Self {
        if prefers_reduced_motion {
            Self::Instant
        } else {
            Self::Smooth
        }
    }

    /// Name as used by the DOM `ScrollToOptions.behavior` member.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Smooth => "smooth",
            Self::Instant => "instant",
        }
    }
}

/// Options for programmatic focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusOptions {
    /// Suppress the browser's scroll-into-view side effect of focusing.
    pub prevent_scroll: bool,
}

/// Tags that take focus without a `tabindex` attribute.
pub const NATIVELY_FOCUSABLE_TAGS: &[&str] = &[
    "a", "area", "button", "details", "iframe", "input", "select", "summary", "textarea",
];

/// Snapshot of one element as seen by the navigator.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSnapshot {
    /// Lowercase tag name.
    pub tag_name: String,
    /// Top edge relative to the viewport (`getBoundingClientRect().top`).
    pub top: f64,
    /// Parsed `tabindex` attribute, if present.
    pub tab_index: Option<i32>,
    /// Computed `scroll-margin-top` in CSS pixels.
    pub scroll_margin_top: f64,
}

impl ElementSnapshot {
    /// Whether the tag is focusable without a `tabindex`.
    #[must_use]
    pub fn is_natively_focusable(&self) -> bool {
        NATIVELY_FOCUSABLE_TAGS
            .iter()
            .any(|tag| tag.eq_ignore_ascii_case(&self.tag_name))
    }

    /// Whether the element can receive programmatic focus as-is.
    #[must_use]
    pub fn is_focusable(&self) -> bool {
        self.tab_index.is_some() || self.is_natively_focusable()
    }

    /// Whether the element reserves room below a fixed header.
    #[must_use]
    pub fn has_scroll_margin(&self) -> bool {
        self.scroll_margin_top > 0.0
    }
}

/// Document abstraction: element lookup, scrolling, focus, motion preference.
pub trait HostDocument {
    /// Platform-specific error type.
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Look up an element by id. `None` when it is not (yet) mounted.
    fn element(&self, id: &str) -> Option<ElementSnapshot>;

    /// Current vertical scroll offset of the viewport.
    fn scroll_y(&self) -> f64;

    /// Scroll the viewport so its top edge is at `top`.
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) -> Result<(), Self::Error>;

    /// Set the `tabindex` attribute of the element with `id`.
    fn set_tab_index(&mut self, id: &str, tab_index: i32) -> Result<(), Self::Error>;

    /// Focus the element with `id`. Returns whether focus landed on it:
    /// `false` when the element is gone or refused focus.
    fn focus(&mut self, id: &str, options: FocusOptions) -> Result<bool, Self::Error>;

    /// Result of `matchMedia('(prefers-reduced-motion: reduce)')`.
    fn prefers_reduced_motion(&self) -> bool;
}

/// A complete navigation host.
pub trait Host: HostLocation + HostDocument {}

impl<T: HostLocation + HostDocument> Host for T {}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tag: &str, tab_index: Option<i32>) -> ElementSnapshot {
        ElementSnapshot {
            tag_name: tag.into(),
            top: 0.0,
            tab_index,
            scroll_margin_top: 0.0,
        }
    }

    #[test]
    fn section_needs_tab_index() {
        assert!(!element("section", None).is_focusable());
        assert!(element("section", Some(-1)).is_focusable());
    }

    #[test]
    fn native_tags_are_focusable() {
        assert!(element("button", None).is_focusable());
        assert!(element("BUTTON", None).is_natively_focusable());
    }

    #[test]
    fn behavior_follows_motion_preference() {
        assert_eq!(
            ScrollBehavior::for_motion_preference(true),
            ScrollBehavior::Instant
        );
        assert_eq!(ScrollBehavior::for_motion_preference(false).as_str(), "smooth");
    }
}
