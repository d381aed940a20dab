#![forbid(unsafe_code)]

//! `wayfinder-web` hosts the Wayfinder navigator.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding page pushes `hashchange`, `popstate`
//!   and DOM-mutation notifications; nothing here registers listeners itself.
//! - **Deterministic time**: the host advances a monotonic clock explicitly.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! [`MemoryHost`] is a complete in-memory page (location, history, elements,
//! scroll position, focus) for native hosts and tests. [`StepDriver`] pumps
//! host events into a [`Navigator`](wayfinder_runtime::Navigator) and a
//! [`ProgressIndicator`](wayfinder_runtime::ProgressIndicator). On `wasm32`
//! the `wasm` module adds a `web-sys` host and the `WayfinderRunner` export.

pub mod driver;
pub mod memory;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{BrowserError, BrowserHost, WayfinderRunner};

use core::time::Duration;

use wayfinder_backend::HostClock;

pub use driver::{HostEvent, HostEvents, StepDriver};
pub use memory::{MemoryElement, MemoryHost};

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time. Going backwards is ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl HostClock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}
