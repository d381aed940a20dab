#![forbid(unsafe_code)]

//! Wayfinder Runtime
//!
//! Deterministic, host-driven state machines for section-scoped deep linking.
//!
//! # Key Components
//!
//! - [`Navigator`] - Legacy rewrite, route resolution, bounded section polling, focus hand-off
//! - [`scroll`] - Single-shot section lookup, header-aware scrolling, focus
//! - [`RetryPolicy`] - Poll budget for sections that mount late
//! - [`ProgressIndicator`] - Cosmetic progress bar for hash changes
//! - [`WayfinderConfig`] - Tunables, loadable from TOML/JSON with the `config` feature
//! - [`audit`] - Development-time registry cross-check against the document
//!
//! # Role in Wayfinder
//! `wayfinder-runtime` is the orchestrator. It decodes hashes with
//! `wayfinder-core`, consults the section registry, and drives the page through
//! the `wayfinder-backend` host traits.
//!
//! # How it fits in the system
//! Nothing here owns a thread or a real timer. Hosts (`wayfinder-web`, or a
//! test) deliver location events and advance time explicitly; every timer
//! lives in a [`TimerQueue`] and fires from [`Navigator::advance`].

pub mod audit;
pub mod config;
pub mod intent;
pub mod navigator;
pub mod progress;
pub mod retry;
pub mod scroll;
pub mod timer;

pub use audit::{audit_document, log_report};
pub use config::{ConfigError, NavigatorConfig, ProgressConfig, WayfinderConfig};
pub use intent::{IntentId, IntentSource, IntentToken, NavigationIntent, NavigationTrigger};
pub use navigator::{NavigationEvent, NavigationLogEntry, Navigator, SubscriptionId};
pub use progress::{ProgressIndicator, ProgressPhase};
pub use retry::{BackoffStrategy, RetryPolicy};
pub use scroll::{
    FocusOutcome, ScrollAttempt, ScrollOutcome, ScrollSettings, hand_off_focus, scroll_to_section,
    scroll_to_top,
};
pub use timer::{TimerId, TimerQueue};
