#![forbid(unsafe_code)]

//! Navigator: the state machine between location events and the document.
//!
//! The navigator owns every piece of routing state. Hosts feed it events
//! (`mount`, `on_hash_change`, `on_pop_state`, `on_dom_mutation`) and advance
//! time with [`Navigator::advance`]; the navigator answers by rewriting legacy
//! hashes, resolving the route, scrolling, and handing off focus through the
//! [`Host`] traits.
//!
//! # Lifecycle
//!
//! ```text
//! unmounted ──mount──▶ mounted ──unmount──▶ unmounted
//!                        │
//!      hashchange / popstate / load
//!                        ▼
//!   legacy pass ─▶ resolve ─▶ notify listeners ─▶ scroll-to-top
//!                                            └──▶ lookup ─┬─ found ─▶ focus (after delay)
//!                                                         └─ missing ─▶ poll (bounded)
//! ```
//!
//! # Invariants
//!
//! 1. The legacy rewrite uses `replace_hash` and happens before the hash is
//!    resolved, so resolution never sees a legacy hash.
//! 2. At most one intent is current. Starting a new intent cancels every timer
//!    of the previous one, and every timer re-checks its intent when it fires.
//! 3. Timed polls for one intent never overlap and never exceed
//!    [`RetryPolicy::attempts`](crate::retry::RetryPolicy::attempts).
//! 4. Host failures are logged and swallowed; navigation never panics.
//! 5. While unmounted, events are ignored and no timer is pending.

use std::borrow::Cow;
use std::collections::VecDeque;
use std::fmt;

use wayfinder_backend::{Host, HostDocument, HostLocation, ScrollBehavior};
use wayfinder_core::{
    CanonicalHash, DeepLink, SectionRegistry, canonicalize_hash, parse_section_hash,
    validate_registry,
};
use web_time::Duration;

use crate::audit::{audit_document, log_report};
use crate::config::NavigatorConfig;
use crate::intent::{IntentId, IntentSource, NavigationIntent, NavigationTrigger};
use crate::scroll::{
    FocusOutcome, ScrollAttempt, ScrollSettings, hand_off_focus, scroll_to_section, scroll_to_top,
};
use crate::timer::TimerQueue;

/// Handle returned by [`Navigator::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&DeepLink)>;

/// What happened during one dispatch step.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationEvent {
    /// A legacy hash was replaced in history.
    LegacyRewrite { from: String, to: String },
    /// The hash was resolved to a route and listeners were notified.
    Resolved {
        link: DeepLink,
        trigger: NavigationTrigger,
    },
    /// The section is not registered for the page; the lookup still runs.
    UnknownSection { page: String, section: String },
    /// No section: the viewport went to the top.
    ScrolledToTop { behavior: ScrollBehavior },
    /// The section was found and scrolled into view.
    Scrolled {
        section: String,
        /// Timed polls used so far; mutation-triggered lookups are not counted.
        attempt: u32,
        target_top: f64,
        behavior: ScrollBehavior,
    },
    /// The section was missing; another poll is queued.
    RetryScheduled {
        section: String,
        attempt: u32,
        delay: Duration,
    },
    /// The poll budget ran out. Scroll and focus are skipped.
    RetryExhausted { section: String, attempts: u32 },
    /// Focus moved to the section.
    Focused {
        section: String,
        assigned_tab_index: bool,
    },
    /// Focus did not land on the section (gone or refused).
    FocusSkipped { section: String },
    /// The intent was replaced while it still had work queued.
    Superseded { by: IntentId },
    /// An event arrived that the navigator does not act on.
    Ignored { reason: &'static str },
    /// The document cross-check ran.
    AuditCompleted { errors: usize, warnings: usize },
    /// A host call failed; the step continued without it.
    HostError {
        operation: &'static str,
        message: String,
    },
}

/// One entry of the navigator's bounded log.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationLogEntry {
    /// Intent the entry belongs to, if any.
    pub intent: Option<IntentId>,
    /// Host time of the step.
    pub at: Duration,
    pub event: NavigationEvent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NavTask {
    RetryScroll { intent: IntentId },
    Focus { intent: IntentId, section: String },
    DomAudit,
}

impl NavTask {
    fn intent(&self) -> Option<IntentId> {
        match self {
            Self::RetryScroll { intent } | Self::Focus { intent, .. } => Some(*intent),
            Self::DomAudit => None,
        }
    }
}

#[derive(Debug, Clone)]
struct PendingScroll {
    intent: IntentId,
    section: String,
    attempts: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    Poll,
    Mutation,
}

/// Routing state machine for one mounted root.
pub struct Navigator {
    config: NavigatorConfig,
    registry: Cow<'static, SectionRegistry>,
    timers: TimerQueue<NavTask>,
    intents: IntentSource,
    current: Option<NavigationIntent>,
    pending: Option<PendingScroll>,
    active: Option<DeepLink>,
    // Trigger and hash of the last location event, awaiting its pair.
    last_location: Option<(NavigationTrigger, String)>,
    mounted: bool,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    log: VecDeque<NavigationLogEntry>,
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("mounted", &self.mounted)
            .field("active", &self.active)
            .field("current", &self.current.as_ref().map(NavigationIntent::id))
            .field("pending", &self.pending)
            .field("timers", &self.timers.len())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Navigator {
    /// Navigator over the site registry.
    #[must_use]
    pub fn new(config: NavigatorConfig) -> Self {
        Self::from_cow(config, Cow::Borrowed(SectionRegistry::site()))
    }

    /// Navigator over a custom registry.
    #[must_use]
    pub fn with_registry(config: NavigatorConfig, registry: SectionRegistry) -> Self {
        Self::from_cow(config, Cow::Owned(registry))
    }

    fn from_cow(config: NavigatorConfig, registry: Cow<'static, SectionRegistry>) -> Self {
        Self {
            config,
            registry,
            timers: TimerQueue::new(),
            intents: IntentSource::new(),
            current: None,
            pending: None,
            active: None,
            last_location: None,
            mounted: false,
            listeners: Vec::new(),
            next_subscription: 1,
            log: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Attach to the host and resolve the initial location.
    ///
    /// With `dev_validation` the registry is validated immediately and a
    /// document cross-check is queued after `audit_delay`. Mounting twice is
    /// a no-op.
    pub fn mount<H: Host + ?Sized>(&mut self, host: &mut H, now: Duration) {
        if self.mounted {
            self.record(None, now, NavigationEvent::Ignored {
                reason: "already mounted",
            });
            return;
        }
        self.mounted = true;
        tracing::debug!(target: "wayfinder.nav", "navigator mounted");

        if self.config.dev_validation {
            let report = validate_registry(&self.registry);
            log_report("registry", &report);
            self.timers
                .schedule(now + self.config.audit_delay(), NavTask::DomAudit);
        }
        self.handle_location_change(host, now, NavigationTrigger::Load);
    }

    /// Detach: cancel every timer, drop every listener, supersede the intent.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.timers.clear();
        self.listeners.clear();
        self.intents.reset();
        self.current = None;
        self.pending = None;
        self.last_location = None;
        tracing::debug!(target: "wayfinder.nav", "navigator unmounted");
    }

    /// Browser `hashchange`.
    pub fn on_hash_change<H: Host + ?Sized>(&mut self, host: &mut H, now: Duration) {
        self.dispatch_event(host, now, NavigationTrigger::HashChange);
    }

    /// Browser `popstate`.
    pub fn on_pop_state<H: Host + ?Sized>(&mut self, host: &mut H, now: Duration) {
        self.dispatch_event(host, now, NavigationTrigger::PopState);
    }

    /// The document changed; look for the pending section right away.
    ///
    /// Does not consume the poll budget. A miss leaves the poll schedule as is.
    pub fn on_dom_mutation<H: Host + ?Sized>(&mut self, host: &mut H, now: Duration) {
        if !self.mounted || self.pending.is_none() {
            return;
        }
        self.attempt_pending(host, now, Lookup::Mutation);
    }

    /// Fire every timer due at or before `now`.
    ///
    /// Follow-up timers are scheduled relative to the deadline of the timer
    /// that fired, so coarse host ticks do not stretch retry intervals.
    pub fn advance<H: Host + ?Sized>(&mut self, host: &mut H, now: Duration) {
        if !self.mounted {
            return;
        }
        while let Some((due, task)) = self.timers.pop_due(now) {
            self.run_task(host, due, task);
        }
    }

    /// Navigate to the top of `path`.
    ///
    /// Only writes the hash; the host's `hashchange` brings the navigator back
    /// through [`on_hash_change`](Self::on_hash_change).
    pub fn navigate<H: HostLocation + ?Sized>(
        &self,
        host: &mut H,
        path: &str,
    ) -> Result<(), H::Error> {
        self.navigate_to(host, &DeepLink::page(path))
    }

    /// Navigate to a page and optional section.
    pub fn navigate_to<H: HostLocation + ?Sized>(
        &self,
        host: &mut H,
        link: &DeepLink,
    ) -> Result<(), H::Error> {
        let hash = link.to_hash();
        tracing::debug!(target: "wayfinder.nav", hash = %hash, "navigate");
        host.set_hash(&hash)
    }

    /// The link currently in the location bar.
    #[must_use]
    pub fn current_link<H: HostLocation + ?Sized>(&self, host: &H) -> DeepLink {
        parse_section_hash(&host.hash())
    }

    /// Page of the last resolved route.
    #[must_use]
    pub fn active_page(&self) -> Option<&str> {
        self.active.as_ref().map(|link| link.page.as_str())
    }

    /// Last resolved route.
    #[must_use]
    pub fn active_link(&self) -> Option<&DeepLink> {
        self.active.as_ref()
    }

    /// The intent being processed, if any.
    #[must_use]
    pub fn current_intent(&self) -> Option<&NavigationIntent> {
        self.current.as_ref()
    }

    /// Section still being polled for, with the polls used so far.
    #[must_use]
    pub fn pending_section(&self) -> Option<(&str, u32)> {
        self.pending
            .as_ref()
            .map(|pending| (pending.section.as_str(), pending.attempts))
    }

    /// Register a listener called with every resolved route.
    pub fn subscribe(&mut self, listener: impl FnMut(&DeepLink) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    /// Deadline of the next timer, for hosts that sleep between ticks.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Retained log entries, oldest first.
    pub fn log(&self) -> impl Iterator<Item = &NavigationLogEntry> + '_ {
        self.log.iter()
    }

    /// Drain the retained log.
    pub fn take_log(&mut self) -> Vec<NavigationLogEntry> {
        self.log.drain(..).collect()
    }

    fn scroll_settings(&self) -> ScrollSettings {
        ScrollSettings {
            offset: self.config.scroll_offset,
            smooth_focus_delay: self.config.focus_delay(),
        }
    }

    fn record(&mut self, intent: Option<IntentId>, at: Duration, event: NavigationEvent) {
        self.log.push_back(NavigationLogEntry { intent, at, event });
        while self.log.len() > self.config.log_capacity.max(1) {
            self.log.pop_front();
        }
    }

    fn host_error(
        &mut self,
        intent: Option<IntentId>,
        at: Duration,
        operation: &'static str,
        error: &dyn fmt::Display,
    ) {
        let message = error.to_string();
        tracing::warn!(target: "wayfinder.nav", operation, error = %message, "host call failed");
        self.record(intent, at, NavigationEvent::HostError { operation, message });
    }

    fn dispatch_event<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        now: Duration,
        trigger: NavigationTrigger,
    ) {
        if !self.mounted {
            tracing::trace!(target: "wayfinder.nav", trigger = trigger.as_str(), "event while unmounted");
            return;
        }
        self.handle_location_change(host, now, trigger);
    }

    fn migrate_legacy<H: HostLocation + ?Sized>(&mut self, host: &mut H, now: Duration) -> String {
        let raw = host.hash();
        if !self.config.legacy_migration {
            return raw;
        }
        let CanonicalHash::Rewrite { from, to } = canonicalize_hash(&raw) else {
            return raw;
        };
        match host.replace_hash(&to) {
            Ok(()) => {
                tracing::info!(target: "wayfinder.nav", from = %from, to = %to, "legacy hash rewritten");
                self.record(None, now, NavigationEvent::LegacyRewrite { from, to });
                host.hash()
            }
            Err(error) => {
                self.host_error(None, now, "replace_hash", &error);
                to
            }
        }
    }

    fn handle_location_change<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        now: Duration,
        trigger: NavigationTrigger,
    ) {
        let hash = self.migrate_legacy(host, now);

        // Back/forward delivers popstate and hashchange for the same entry.
        // Only the second half of such a pair is dropped.
        let previous = match trigger {
            NavigationTrigger::Load => None,
            _ => self.last_location.replace((trigger, hash.clone())),
        };
        if previous.is_some_and(|(kind, previous_hash)| {
            is_location_pair(kind, trigger) && previous_hash == hash
        }) {
            self.last_location = None;
            self.record(
                self.intents.current(),
                now,
                NavigationEvent::Ignored {
                    reason: "location unchanged",
                },
            );
            return;
        }

        let link = parse_section_hash(&hash);
        let token = self.intents.begin();
        let id = token.id();

        if let Some(previous) = self.current.take() {
            let previous_id = previous.id();
            let cancelled = self
                .timers
                .cancel_where(|task| task.intent() == Some(previous_id));
            let was_pending = self.pending.take().is_some();
            if cancelled > 0 || was_pending {
                tracing::debug!(
                    target: "wayfinder.nav",
                    previous = %previous_id,
                    by = %id,
                    cancelled,
                    "intent superseded"
                );
                self.record(
                    Some(previous_id),
                    now,
                    NavigationEvent::Superseded { by: id },
                );
            }
        }

        self.current = Some(NavigationIntent {
            token,
            link: link.clone(),
            origin_hash: hash,
            trigger,
        });

        if let Some(section) = link
            .section_id()
            .filter(|section| !self.registry.section_exists(&link.page, section))
        {
            if self.config.dev_validation {
                tracing::warn!(target: "wayfinder.nav", page = %link.page, section, "section not registered for page");
            } else {
                tracing::debug!(target: "wayfinder.nav", page = %link.page, section, "section not registered for page");
            }
            self.record(
                Some(id),
                now,
                NavigationEvent::UnknownSection {
                    page: link.page.clone(),
                    section: section.to_owned(),
                },
            );
        }

        tracing::debug!(
            target: "wayfinder.nav",
            intent = %id,
            trigger = trigger.as_str(),
            page = %link.page,
            section = link.section_id(),
            "route resolved"
        );
        self.active = Some(link.clone());
        for (_, listener) in &mut self.listeners {
            listener(&link);
        }
        self.record(
            Some(id),
            now,
            NavigationEvent::Resolved {
                link: link.clone(),
                trigger,
            },
        );

        match link.section {
            None => match scroll_to_top(host) {
                Ok(behavior) => {
                    self.record(Some(id), now, NavigationEvent::ScrolledToTop { behavior });
                }
                Err(error) => self.host_error(Some(id), now, "scroll_to", &error),
            },
            Some(section) => {
                self.pending = Some(PendingScroll {
                    intent: id,
                    section,
                    attempts: 0,
                });
                self.attempt_pending(host, now, Lookup::Poll);
            }
        }
    }

    fn attempt_pending<H: Host + ?Sized>(&mut self, host: &mut H, now: Duration, lookup: Lookup) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        let intent = pending.intent;
        if !self.intents.is_current(intent) {
            self.pending = None;
            return;
        }
        if lookup == Lookup::Poll {
            pending.attempts += 1;
        }
        let attempts = pending.attempts;
        let section = pending.section.clone();

        let settings = self.scroll_settings();
        let outcome = match scroll_to_section(host, &section, &settings) {
            Ok(ScrollAttempt::Scrolled(outcome)) => Some(outcome),
            Ok(ScrollAttempt::NotFound) => None,
            Err(error) => {
                self.host_error(Some(intent), now, "scroll_to", &error);
                None
            }
        };

        if let Some(outcome) = outcome {
            self.pending = None;
            self.timers.cancel_where(|task| {
                matches!(task, NavTask::RetryScroll { intent: queued } if *queued == intent)
            });
            self.record(
                Some(intent),
                now,
                NavigationEvent::Scrolled {
                    section: section.clone(),
                    attempt: attempts,
                    target_top: outcome.target_top,
                    behavior: outcome.behavior,
                },
            );
            if outcome.focus_delay.is_zero() {
                self.focus_section(host, now, intent, &section);
            } else {
                self.timers.schedule(
                    now + outcome.focus_delay,
                    NavTask::Focus { intent, section },
                );
            }
            return;
        }

        if lookup == Lookup::Mutation {
            return;
        }
        let policy = &self.config.retry;
        if policy.allows_another(attempts) {
            let delay = policy.delay(attempts);
            self.timers
                .schedule(now + delay, NavTask::RetryScroll { intent });
            tracing::trace!(target: "wayfinder.nav", section = %section, attempt = attempts, "section not mounted yet");
            self.record(
                Some(intent),
                now,
                NavigationEvent::RetryScheduled {
                    section,
                    attempt: attempts + 1,
                    delay,
                },
            );
        } else {
            self.pending = None;
            tracing::warn!(
                target: "wayfinder.nav",
                section = %section,
                attempts,
                "section never appeared; giving up on scroll"
            );
            self.record(
                Some(intent),
                now,
                NavigationEvent::RetryExhausted { section, attempts },
            );
        }
    }

    fn focus_section<H: HostDocument + ?Sized>(
        &mut self,
        host: &mut H,
        now: Duration,
        intent: IntentId,
        section: &str,
    ) {
        match hand_off_focus(host, section) {
            Ok(FocusOutcome::Focused { assigned_tab_index }) => self.record(
                Some(intent),
                now,
                NavigationEvent::Focused {
                    section: section.to_owned(),
                    assigned_tab_index,
                },
            ),
            Ok(outcome @ (FocusOutcome::Missing | FocusOutcome::Refused)) => {
                let reason = if outcome == FocusOutcome::Missing {
                    "section gone before focus"
                } else {
                    "section refused focus"
                };
                tracing::debug!(target: "wayfinder.nav", section, reason, "focus skipped");
                self.record(
                    Some(intent),
                    now,
                    NavigationEvent::FocusSkipped {
                        section: section.to_owned(),
                    },
                );
            }
            Err(error) => self.host_error(Some(intent), now, "focus", &error),
        }
    }

    fn run_task<H: Host + ?Sized>(&mut self, host: &mut H, due: Duration, task: NavTask) {
        match task {
            NavTask::RetryScroll { intent } => {
                let matches_pending = self
                    .pending
                    .as_ref()
                    .is_some_and(|pending| pending.intent == intent);
                if self.intents.is_current(intent) && matches_pending {
                    self.attempt_pending(host, due, Lookup::Poll);
                } else {
                    self.record(Some(intent), due, NavigationEvent::Ignored {
                        reason: "stale retry",
                    });
                }
            }
            NavTask::Focus { intent, section } => {
                if self.intents.is_current(intent) {
                    self.focus_section(host, due, intent, &section);
                } else {
                    self.record(Some(intent), due, NavigationEvent::Ignored {
                        reason: "stale focus",
                    });
                }
            }
            NavTask::DomAudit => {
                let report = audit_document(&self.registry, &*host);
                log_report("document", &report);
                self.record(
                    None,
                    due,
                    NavigationEvent::AuditCompleted {
                        errors: report.errors.len(),
                        warnings: report.warnings.len(),
                    },
                );
            }
        }
    }
}

fn is_location_pair(first: NavigationTrigger, second: NavigationTrigger) -> bool {
    matches!(
        (first, second),
        (NavigationTrigger::PopState, NavigationTrigger::HashChange)
            | (NavigationTrigger::HashChange, NavigationTrigger::PopState)
    )
}
