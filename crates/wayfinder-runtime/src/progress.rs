#![forbid(unsafe_code)]

//! Navigation progress indicator.
//!
//! Cosmetic only. The bar is driven by the hash change and the clock, never
//! by the navigator: it does not know whether the section was found, whether
//! the page finished rendering, or whether the scroll succeeded. Do not use
//! it as a loading barrier.
//!
//! ```text
//! Idle ──hashchange──▶ Loading ──settle──▶ Completing ──hold──▶ Fading ──fade──▶ Idle
//!   ▲                     │ random ticks, clamped at the ceiling
//!   └─────────────────────┴── a new hashchange restarts from 0 in any phase
//! ```

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use web_time::Duration;

use crate::config::ProgressConfig;

/// Seed used when neither the config nor the host supplies one.
pub const FALLBACK_SEED: u64 = 0x5eed_0f_ba5e;

/// Phase of the indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressPhase {
    /// Hidden at 0%.
    Idle,
    /// Creeping towards the ceiling.
    Loading,
    /// Showing 100%.
    Completing,
    /// Fading out at 100%.
    Fading,
}

impl ProgressPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Completing => "completing",
            Self::Fading => "fading",
        }
    }
}

/// Simulated progress bar.
#[derive(Debug, Clone)]
pub struct ProgressIndicator {
    config: ProgressConfig,
    rng: SmallRng,
    phase: ProgressPhase,
    percent: f64,
    next_tick: Duration,
    // End of the current phase: settle point while loading, end of hold or
    // fade afterwards.
    phase_end: Duration,
}

impl ProgressIndicator {
    /// Indicator seeded from `config.seed`, or [`FALLBACK_SEED`].
    #[must_use]
    pub fn new(config: ProgressConfig) -> Self {
        let seed = config.seed.unwrap_or(FALLBACK_SEED);
        Self::with_seed(config, seed)
    }

    /// Indicator with an explicit seed; `config.seed` wins when set.
    #[must_use]
    pub fn with_seed(config: ProgressConfig, seed: u64) -> Self {
        let seed = config.seed.unwrap_or(seed);
        Self {
            config,
            rng: SmallRng::seed_from_u64(seed),
            phase: ProgressPhase::Idle,
            percent: 0.0,
            next_tick: Duration::ZERO,
            phase_end: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> ProgressPhase {
        self.phase
    }

    /// Displayed progress in percent.
    #[must_use]
    pub const fn percent(&self) -> f64 {
        self.percent
    }

    /// Whether the bar should be rendered.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.phase != ProgressPhase::Idle
    }

    /// Start (or restart) the cycle.
    pub fn on_hash_change(&mut self, now: Duration) {
        let tick = Duration::from_millis(self.config.tick_ms.max(1));
        self.phase = ProgressPhase::Loading;
        self.percent = 0.0;
        self.next_tick = now + tick;
        self.phase_end = now + Duration::from_millis(self.config.settle_ms);
        tracing::trace!(target: "wayfinder.progress", "progress started");
    }

    /// Catch up to `now`. Returns `true` if the phase or percentage changed.
    pub fn advance(&mut self, now: Duration) -> bool {
        let before = (self.phase, self.percent);
        loop {
            match self.phase {
                ProgressPhase::Idle => break,
                ProgressPhase::Loading => {
                    let tick = Duration::from_millis(self.config.tick_ms.max(1));
                    while self.next_tick <= now && self.next_tick < self.phase_end {
                        let step = self.increment();
                        self.percent = (self.percent + step).min(self.config.ceiling);
                        self.next_tick += tick;
                    }
                    if now < self.phase_end {
                        break;
                    }
                    self.percent = 100.0;
                    self.enter(
                        ProgressPhase::Completing,
                        Duration::from_millis(self.config.complete_hold_ms),
                    );
                }
                ProgressPhase::Completing => {
                    if now < self.phase_end {
                        break;
                    }
                    self.enter(
                        ProgressPhase::Fading,
                        Duration::from_millis(self.config.fade_ms),
                    );
                }
                ProgressPhase::Fading => {
                    if now < self.phase_end {
                        break;
                    }
                    self.percent = 0.0;
                    self.enter(ProgressPhase::Idle, Duration::ZERO);
                }
            }
        }
        before != (self.phase, self.percent)
    }

    /// When [`advance`](Self::advance) next has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        match self.phase {
            ProgressPhase::Idle => None,
            ProgressPhase::Loading => Some(self.next_tick.min(self.phase_end)),
            ProgressPhase::Completing | ProgressPhase::Fading => Some(self.phase_end),
        }
    }

    fn increment(&mut self) -> f64 {
        let (min, max) = (self.config.min_increment, self.config.max_increment);
        if max > min && (max - min).is_finite() {
            self.rng.random_range(min..max)
        } else if min.is_finite() {
            min.max(0.0)
        } else {
            0.0
        }
    }

    fn enter(&mut self, phase: ProgressPhase, length: Duration) {
        self.phase = phase;
        self.phase_end += length;
        tracing::trace!(target: "wayfinder.progress", phase = phase.as_str(), "progress phase");
    }
}
