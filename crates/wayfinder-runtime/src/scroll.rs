#![forbid(unsafe_code)]

//! Scroll engine: locate a section, scroll it below the fixed header, and
//! hand keyboard/screen-reader focus to it.
//!
//! A single lookup never retries; polling for late-mounted sections is the
//! navigator's job (see [`crate::retry`]). Focus is not applied here either:
//! the caller schedules [`hand_off_focus`] after [`ScrollOutcome::focus_delay`]
//! so the smooth scroll can finish first.
//!
//! # Invariants
//!
//! 1. The scroll target is `element.top + scroll_y - offset`.
//! 2. Reduced motion means an instant scroll and a zero focus delay.
//! 3. An element without `tabindex` gets `tabindex="-1"` before focusing;
//!    an existing `tabindex` is never overwritten.
//! 4. Focus always suppresses the browser's own scroll-into-view.

use wayfinder_backend::{FocusOptions, HostDocument, ScrollBehavior};
use web_time::Duration;

/// Default header clearance in CSS pixels.
pub const DEFAULT_SCROLL_OFFSET: f64 = 100.0;

/// `tabindex` assigned to sections that are not focusable on their own.
pub const PROGRAMMATIC_TAB_INDEX: i32 = -1;

/// Parameters of one scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSettings {
    /// Header clearance in CSS pixels.
    pub offset: f64,
    /// Expected smooth-scroll duration; focus waits this long.
    pub smooth_focus_delay: Duration,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            offset: DEFAULT_SCROLL_OFFSET,
            smooth_focus_delay: Duration::from_millis(400),
        }
    }
}

/// Result of a successful lookup-and-scroll.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollOutcome {
    pub section_id: String,
    /// Requested viewport top.
    pub target_top: f64,
    pub behavior: ScrollBehavior,
    /// Wait before [`hand_off_focus`].
    pub focus_delay: Duration,
}

/// Result of [`scroll_to_section`].
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollAttempt {
    /// No element with that id is mounted.
    NotFound,
    /// The element was found and the viewport scrolled.
    Scrolled(ScrollOutcome),
}

impl ScrollAttempt {
    /// Whether the element was found.
    #[must_use]
    pub const fn found(&self) -> bool {
        matches!(self, Self::Scrolled(_))
    }
}

/// Result of [`hand_off_focus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusOutcome {
    /// Focus moved to the section.
    Focused {
        /// `tabindex="-1"` had to be added first.
        assigned_tab_index: bool,
    },
    /// The element disappeared before focus could move.
    Missing,
    /// The element is still there but focus did not land on it.
    Refused,
}

/// Viewport top that puts `element_top` just below a header of `offset` pixels.
#[must_use]
pub fn scroll_target(element_top: f64, scroll_y: f64, offset: f64) -> f64 {
    element_top + scroll_y - offset
}

/// Look up `section_id` and scroll it into view. No retry.
pub fn scroll_to_section<D: HostDocument + ?Sized>(
    doc: &mut D,
    section_id: &str,
    settings: &ScrollSettings,
) -> Result<ScrollAttempt, D::Error> {
    let Some(element) = doc.element(section_id) else {
        return Ok(ScrollAttempt::NotFound);
    };

    let target_top = scroll_target(element.top, doc.scroll_y(), settings.offset);
    let reduced = doc.prefers_reduced_motion();
    let behavior = ScrollBehavior::for_motion_preference(reduced);
    doc.scroll_to(target_top, behavior)?;

    tracing::debug!(
        target: "wayfinder.scroll",
        section = section_id,
        target_top,
        behavior = behavior.as_str(),
        "scrolled to section"
    );

    Ok(ScrollAttempt::Scrolled(ScrollOutcome {
        section_id: section_id.to_owned(),
        target_top,
        behavior,
        focus_delay: if reduced {
            Duration::ZERO
        } else {
            settings.smooth_focus_delay
        },
    }))
}

/// Move focus to `section_id` without scrolling.
pub fn hand_off_focus<D: HostDocument + ?Sized>(
    doc: &mut D,
    section_id: &str,
) -> Result<FocusOutcome, D::Error> {
    let Some(element) = doc.element(section_id) else {
        return Ok(FocusOutcome::Missing);
    };

    let assigned_tab_index = element.tab_index.is_none();
    if assigned_tab_index {
        doc.set_tab_index(section_id, PROGRAMMATIC_TAB_INDEX)?;
    }
    let focused = doc.focus(
        section_id,
        FocusOptions {
            prevent_scroll: true,
        },
    )?;
    if !focused {
        tracing::debug!(target: "wayfinder.scroll", section = section_id, "focus refused");
        return Ok(FocusOutcome::Refused);
    }

    tracing::debug!(
        target: "wayfinder.scroll",
        section = section_id,
        assigned_tab_index,
        "focus handed off"
    );
    Ok(FocusOutcome::Focused { assigned_tab_index })
}

/// Scroll the viewport to the top, honouring reduced motion.
pub fn scroll_to_top<D: HostDocument + ?Sized>(doc: &mut D) -> Result<ScrollBehavior, D::Error> {
    let behavior = ScrollBehavior::for_motion_preference(doc.prefers_reduced_motion());
    doc.scroll_to(0.0, behavior)?;
    Ok(behavior)
}
