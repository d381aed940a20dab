//! Navigation intents and supersession tokens.
//!
//! Every hash change produces one [`NavigationIntent`]. Starting a new intent
//! supersedes the previous one: tokens issued for older intents observe
//! `is_current() == false` from then on, so any retry tick or focus hand-off
//! still queued for them turns into a no-op.
//!
//! # Example
//!
//! ```
//! use wayfinder_runtime::intent::IntentSource;
//!
//! let source = IntentSource::new();
//! let first = source.begin();
//! assert!(first.is_current());
//!
//! let second = source.begin();
//! assert!(!first.is_current());
//! assert!(second.is_current());
//! ```

#![forbid(unsafe_code)]

use core::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use wayfinder_core::DeepLink;

/// Monotonically increasing intent identifier. `0` is never issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IntentId(u64);

impl IntentId {
    /// Raw value, for logs and host instrumentation.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for IntentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "intent#{}", self.0)
    }
}

/// Cloneable observer for one intent.
#[derive(Clone)]
pub struct IntentToken {
    id: IntentId,
    current: Arc<AtomicU64>,
}

impl fmt::Debug for IntentToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntentToken")
            .field("id", &self.id)
            .field("current", &self.is_current())
            .finish()
    }
}

impl IntentToken {
    /// The intent this token observes.
    #[must_use]
    pub const fn id(&self) -> IntentId {
        self.id
    }

    /// `true` while no newer intent has started and the source was not reset.
    #[inline]
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::Acquire) == self.id.0
    }
}

/// Issues intent tokens; at most one is current at any time.
pub struct IntentSource {
    current: Arc<AtomicU64>,
    next: AtomicU64,
}

impl IntentSource {
    /// Source with no current intent.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: Arc::new(AtomicU64::new(0)),
            next: AtomicU64::new(1),
        }
    }

    /// Start a new intent, superseding the previous one.
    pub fn begin(&self) -> IntentToken {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        self.current.store(id, Ordering::Release);
        IntentToken {
            id: IntentId(id),
            current: Arc::clone(&self.current),
        }
    }

    /// Supersede every outstanding token without starting a new intent.
    pub fn reset(&self) {
        self.current.store(0, Ordering::Release);
    }

    /// Whether `id` is the current intent.
    #[must_use]
    pub fn is_current(&self, id: IntentId) -> bool {
        self.current.load(Ordering::Acquire) == id.0
    }

    /// The current intent, if any.
    #[must_use]
    pub fn current(&self) -> Option<IntentId> {
        match self.current.load(Ordering::Acquire) {
            0 => None,
            id => Some(IntentId(id)),
        }
    }
}

impl Default for IntentSource {
    fn default() -> Self {
        Self::new()
    }
}

/// What caused a location change to be processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationTrigger {
    /// Initial resolution when the navigator mounts.
    Load,
    /// Browser `hashchange` (link click or programmatic `navigate`).
    HashChange,
    /// Browser `popstate` (back/forward).
    PopState,
}

impl NavigationTrigger {
    /// Stable label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::HashChange => "hashchange",
            Self::PopState => "popstate",
        }
    }
}

/// One logical attempt to route to a page/section pair.
#[derive(Debug, Clone)]
pub struct NavigationIntent {
    pub token: IntentToken,
    /// Resolved target.
    pub link: DeepLink,
    /// Hash as read from the location, after any legacy rewrite.
    pub origin_hash: String,
    pub trigger: NavigationTrigger,
}

impl NavigationIntent {
    #[must_use]
    pub const fn id(&self) -> IntentId {
        self.token.id()
    }

    /// Target page path.
    #[must_use]
    pub fn page(&self) -> &str {
        &self.link.page
    }

    /// Target section, if any.
    #[must_use]
    pub fn section(&self) -> Option<&str> {
        self.link.section_id()
    }
}
