#![forbid(unsafe_code)]

//! Structural validation of a [`SectionRegistry`].
//!
//! Advisory only: a report never blocks navigation. Errors mark registry
//! entries that cannot work as deep links; warnings mark entries that are
//! suspicious but harmless.
//!
//! The DOM cross-check lives in `wayfinder-runtime`, since it needs a host
//! document; it reports through the same [`ValidationReport`].

use core::fmt;
use std::collections::HashSet;

use crate::section::SectionRegistry;

/// Outcome of one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// `true` when `errors` is empty.
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl ValidationReport {
    /// Empty, valid report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error; the report becomes invalid.
    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.is_valid = false;
    }

    /// Record a warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Append another report's findings.
    pub fn merge(&mut self, other: Self) {
        self.is_valid &= other.is_valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Whether the report carries neither errors nor warnings.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} error(s), {} warning(s)",
            self.errors.len(),
            self.warnings.len()
        )?;
        for error in &self.errors {
            write!(f, "\n  error: {error}")?;
        }
        for warning in &self.warnings {
            write!(f, "\n  warning: {warning}")?;
        }
        Ok(())
    }
}

/// Lowercase ASCII alphanumerics separated by single hyphens.
///
/// Accepts `hero`, `contact-cta`, `step-2`; rejects `""`, `Hero`, `a--b`,
/// `-a`, `a-`, `a_b`.
#[must_use]
pub fn is_kebab_case(id: &str) -> bool {
    !id.is_empty()
        && id.split('-').all(|segment| {
            !segment.is_empty()
                && segment
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        })
}

/// Run the structural pass over `registry`.
///
/// Checks, per page entry:
/// - the page key starts with `/` and appears once (errors),
/// - the section list is non-empty (warning),
/// - every id is kebab-case and unique within the page (errors),
/// - every section's `page` equals its entry key (error).
#[must_use]
pub fn validate_registry(registry: &SectionRegistry) -> ValidationReport {
    let mut report = ValidationReport::new();
    let mut pages = HashSet::new();

    for entry in registry.entries() {
        let page = entry.page.as_str();
        if !page.starts_with('/') {
            report.error(format!("page \"{page}\": path must start with '/'"));
        }
        if !pages.insert(page) {
            report.error(format!("page \"{page}\": registered more than once"));
        }
        if entry.sections.is_empty() {
            report.warn(format!("page \"{page}\": no sections registered"));
            continue;
        }

        let mut ids = HashSet::with_capacity(entry.sections.len());
        for section in &entry.sections {
            if !is_kebab_case(&section.id) {
                report.error(format!(
                    "page \"{page}\": section id \"{}\" is not kebab-case",
                    section.id
                ));
            }
            if !ids.insert(section.id.as_str()) {
                report.error(format!(
                    "page \"{page}\": duplicate section id \"{}\"",
                    section.id
                ));
            }
            if section.page != page {
                report.error(format!(
                    "page \"{page}\": section \"{}\" declares page \"{}\"",
                    section.id, section.page
                ));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::{PageSections, SectionConfig};

    #[test]
    fn kebab_case_accepts() {
        for id in ["hero", "contact-cta", "step-2", "a1-b2-c3", "x"] {
            assert!(is_kebab_case(id), "{id}");
        }
    }

    #[test]
    fn kebab_case_rejects() {
        for id in ["", "Hero", "a--b", "-a", "a-", "a_b", "a b", "ä", "-"] {
            assert!(!is_kebab_case(id), "{id}");
        }
    }

    #[test]
    fn clean_registry_is_valid() {
        let reg = SectionRegistry::builder()
            .page("/", &[("hero", "Start"), ("about", "Über")])
            .build();
        let report = validate_registry(&reg);
        assert!(report.is_valid);
        assert!(report.is_clean());
    }

    #[test]
    fn empty_page_is_a_warning() {
        let reg = SectionRegistry::builder().page("/leer", &[]).build();
        let report = validate_registry(&reg);
        assert!(report.is_valid);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn malformed_id_is_an_error() {
        let reg = SectionRegistry::builder()
            .page("/", &[("Hero_Section", "Start")])
            .build();
        let report = validate_registry(&reg);
        assert!(!report.is_valid);
        assert!(report.errors[0].contains("Hero_Section"));
    }

    #[test]
    fn duplicate_id_is_an_error() {
        let reg = SectionRegistry::builder()
            .page("/", &[("hero", "A"), ("hero", "B")])
            .build();
        let report = validate_registry(&reg);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("duplicate"));
    }

    #[test]
    fn same_id_on_two_pages_is_fine() {
        let reg = SectionRegistry::builder()
            .page("/", &[("intro", "A")])
            .page("/b", &[("intro", "B")])
            .build();
        assert!(validate_registry(&reg).is_valid);
    }

    #[test]
    fn page_mismatch_is_an_error() {
        let reg = SectionRegistry::builder()
            .entry(PageSections {
                page: "/kontakt".into(),
                sections: vec![SectionConfig::new("form", "Formular", "/contact")],
            })
            .build();
        let report = validate_registry(&reg);
        assert!(!report.is_valid);
        assert!(report.errors[0].contains("/contact"));
    }

    #[test]
    fn relative_and_repeated_pages_are_errors() {
        let reg = SectionRegistry::builder()
            .page("kontakt", &[("form", "Formular")])
            .page("/a", &[("x", "X")])
            .page("/a", &[("y", "Y")])
            .build();
        let report = validate_registry(&reg);
        assert_eq!(report.errors.len(), 2, "{report}");
    }

    #[test]
    fn merge_combines_validity() {
        let mut a = ValidationReport::new();
        a.warn("w");
        let mut b = ValidationReport::new();
        b.error("e");
        a.merge(b);
        assert!(!a.is_valid);
        assert_eq!(a.errors, ["e"]);
        assert_eq!(a.warnings, ["w"]);
    }

    #[test]
    fn display_lists_findings() {
        let mut report = ValidationReport::new();
        report.error("bad id");
        report.warn("empty page");
        let text = report.to_string();
        assert!(text.starts_with("1 error(s), 1 warning(s)"));
        assert!(text.contains("error: bad id"));
        assert!(text.contains("warning: empty page"));
    }
}
