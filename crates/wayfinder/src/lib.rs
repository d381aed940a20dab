#![forbid(unsafe_code)]

//! Wayfinder public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users. It
//! re-exports common types from the internal crates and offers a lightweight
//! prelude for day-to-day usage.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use wayfinder_core::{
    DeepLink, HOME_PATH, SectionConfig, SectionRegistry, ValidationReport, create_section_hash,
    normalize_page_path, parse_section_hash, validate_registry,
};

// --- Backend re-exports ----------------------------------------------------

pub use wayfinder_backend::{Host, HostClock, HostDocument, HostLocation};

// --- Runtime re-exports ----------------------------------------------------

pub use wayfinder_runtime::{
    ConfigError, NavigationEvent, Navigator, NavigatorConfig, ProgressConfig, ProgressIndicator,
    ProgressPhase, RetryPolicy, WayfinderConfig,
};

// --- Web re-exports --------------------------------------------------------

#[cfg(feature = "web")]
pub use wayfinder_web::{DeterministicClock, MemoryElement, MemoryHost, StepDriver};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Wayfinder setup.
#[derive(Debug)]
pub enum Error {
    /// Configuration could not be loaded or is out of range.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for Wayfinder APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Setup -----------------------------------------------------------------

/// Validated navigator and progress indicator for the site registry.
pub fn build(config: WayfinderConfig) -> Result<(Navigator, ProgressIndicator)> {
    let config = config.validated()?;
    Ok((
        Navigator::new(config.navigator),
        ProgressIndicator::new(config.progress),
    ))
}

/// Load a TOML configuration file and [`build`] from it.
#[cfg(feature = "config")]
pub fn build_from_toml_file(
    path: impl AsRef<std::path::Path>,
) -> Result<(Navigator, ProgressIndicator)> {
    build(WayfinderConfig::from_toml_file(path)?)
}

/// Step driver over an in-memory page opened at `hash`.
#[cfg(feature = "web")]
pub fn memory_driver(config: WayfinderConfig, hash: &str) -> Result<StepDriver<MemoryHost>> {
    let (navigator, progress) = build(config)?;
    Ok(StepDriver::new(navigator, progress, MemoryHost::new(hash)))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DeepLink, Error, Navigator, NavigatorConfig, ProgressIndicator, Result, SectionRegistry,
        WayfinderConfig, build,
    };

    #[cfg(feature = "web")]
    pub use crate::{MemoryElement, MemoryHost, StepDriver, memory_driver};

    pub use crate::{backend, core, runtime};

    #[cfg(feature = "web")]
    pub use crate::web;
}

pub use wayfinder_backend as backend;
pub use wayfinder_core as core;
pub use wayfinder_runtime as runtime;
#[cfg(feature = "web")]
pub use wayfinder_web as web;
