#![forbid(unsafe_code)]

//! Wayfinder core: the pure half of section-scoped deep linking.
//!
//! # Role in Wayfinder
//! `wayfinder-core` owns the data model. It decodes and encodes composite
//! hashes (`#/page#section`), holds the immutable section registry, and runs
//! the structural registry validation. Nothing here touches a document,
//! a clock, or the history API.
//!
//! # How it fits in the system
//! `wayfinder-runtime` resolves every hash change through [`link`], asks the
//! [`section`] registry whether the link is well-formed, and then drives the
//! host document through `wayfinder-backend`.

pub mod link;
pub mod section;
mod site;
pub mod validate;

pub use link::{
    CanonicalHash, DeepLink, HOME_PATH, canonicalize_hash, create_section_hash,
    normalize_page_path, parse_section_hash,
};
pub use section::{PageSections, SectionConfig, SectionRegistry, SectionRegistryBuilder};
pub use validate::{ValidationReport, is_kebab_case, validate_registry};
