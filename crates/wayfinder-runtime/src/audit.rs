#![forbid(unsafe_code)]

//! Development-time registry checks against the live document.
//!
//! Runs once, a settling delay after mount, so the first page has rendered.
//! Every finding is a warning: a missing element usually just means the user
//! is on another page.

use wayfinder_backend::HostDocument;
use wayfinder_core::{SectionRegistry, ValidationReport};

/// Cross-check every registered section against `doc`.
///
/// Warns when an element is missing, when it reserves no scroll margin for
/// the fixed header, and when it cannot take programmatic focus (no
/// `tabindex` and not a natively focusable tag).
#[must_use]
pub fn audit_document<D: HostDocument + ?Sized>(
    registry: &SectionRegistry,
    doc: &D,
) -> ValidationReport {
    let mut report = ValidationReport::new();
    for section in registry.iter() {
        let Some(element) = doc.element(&section.id) else {
            report.warn(format!(
                "section \"{}\" ({}) not found in document",
                section.id, section.page
            ));
            continue;
        };
        if !element.has_scroll_margin() {
            report.warn(format!(
                "section \"{}\" ({}) has no scroll-margin-top; heading may hide under the header",
                section.id, section.page
            ));
        }
        if !element.is_focusable() {
            report.warn(format!(
                "section \"{}\" ({}) <{}> is not focusable; tabindex=\"-1\" will be added on navigation",
                section.id, section.page, element.tag_name
            ));
        }
    }
    report
}

/// Emit a report through `tracing`: errors at `error`, warnings at `warn`.
pub fn log_report(pass: &str, report: &ValidationReport) {
    for error in &report.errors {
        tracing::error!(target: "wayfinder.validate", pass, "{error}");
    }
    for warning in &report.warnings {
        tracing::warn!(target: "wayfinder.validate", pass, "{warning}");
    }
    tracing::debug!(
        target: "wayfinder.validate",
        pass,
        is_valid = report.is_valid,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validation pass finished"
    );
}
