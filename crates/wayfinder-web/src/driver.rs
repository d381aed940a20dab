#![forbid(unsafe_code)]

//! Step driver: delivers host events and fires timers, in that order.
//!
//! One [`StepDriver::step`] mirrors one turn of the browser event loop: every
//! queued host event is dispatched first (`hashchange`, `popstate`, DOM
//! mutations), then every timer that is due at the current clock time fires.
//! The progress indicator sees the same hash changes as the navigator but is
//! otherwise independent of it.

use core::time::Duration;

use wayfinder_backend::{Host, HostClock, HostLocation};
use wayfinder_runtime::{Navigator, ProgressIndicator};

use crate::DeterministicClock;

/// Upper bound on timer batches processed by [`StepDriver::run_until_idle`].
const MAX_IDLE_STEPS: usize = 10_000;

/// Notification from the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    HashChange,
    PopState,
    DomMutation,
}

/// Source of queued [`HostEvent`]s.
pub trait HostEvents {
    /// Next undelivered event.
    fn pop_event(&mut self) -> Option<HostEvent>;
}

/// Owns a host, a clock, a navigator, and a progress indicator.
#[derive(Debug)]
pub struct StepDriver<H> {
    navigator: Navigator,
    progress: ProgressIndicator,
    host: H,
    clock: DeterministicClock,
}

impl<H: Host + HostEvents> StepDriver<H> {
    #[must_use]
    pub fn new(navigator: Navigator, progress: ProgressIndicator, host: H) -> Self {
        Self {
            navigator,
            progress,
            host,
            clock: DeterministicClock::new(),
        }
    }

    /// Mount the navigator at the current time.
    pub fn mount(&mut self) {
        let now = self.now();
        self.navigator.mount(&mut self.host, now);
    }

    /// Unmount the navigator. Queued host events are dropped.
    pub fn unmount(&mut self) {
        self.navigator.unmount();
        while self.host.pop_event().is_some() {}
    }

    /// Deliver queued events, then fire due timers. Returns the event count.
    pub fn step(&mut self) -> usize {
        let now = self.now();
        let mut delivered = 0;
        while let Some(event) = self.host.pop_event() {
            delivered += 1;
            match event {
                HostEvent::HashChange => {
                    self.progress.on_hash_change(now);
                    self.navigator.on_hash_change(&mut self.host, now);
                }
                HostEvent::PopState => self.navigator.on_pop_state(&mut self.host, now),
                HostEvent::DomMutation => self.navigator.on_dom_mutation(&mut self.host, now),
            }
        }
        self.navigator.advance(&mut self.host, now);
        self.progress.advance(now);
        if delivered > 0 {
            tracing::trace!(target: "wayfinder.web", delivered, now_ms = now.as_millis() as u64, "step");
        }
        delivered
    }

    /// Advance the clock by `dt`, then [`step`](Self::step).
    pub fn advance(&mut self, dt: Duration) -> usize {
        self.clock.advance(dt);
        self.step()
    }

    /// Move the clock to `now` (never backwards), then [`step`](Self::step).
    pub fn advance_to(&mut self, now: Duration) -> usize {
        self.clock.set(now);
        self.step()
    }

    /// Step from deadline to deadline until nothing is pending.
    ///
    /// Returns the final clock time. Gives up after a fixed number of batches
    /// so a misbehaving host cannot spin forever.
    pub fn run_until_idle(&mut self) -> Duration {
        self.step();
        for _ in 0..MAX_IDLE_STEPS {
            let Some(next) = self.next_deadline() else {
                break;
            };
            self.advance_to(next);
        }
        self.now()
    }

    /// Write a page hash. The resulting `hashchange` is delivered on the next step.
    pub fn navigate(&mut self, path: &str) -> Result<(), <H as HostLocation>::Error> {
        self.navigator.navigate(&mut self.host, path)
    }

    /// Earliest pending navigator or progress deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.navigator.next_deadline(), self.progress.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now_mono()
    }

    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressIndicator {
        &self.progress
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
