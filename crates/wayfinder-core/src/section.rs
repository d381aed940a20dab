#![forbid(unsafe_code)]

//! Section registry: the immutable page → sections table.
//!
//! Order within a page is presentation order (top to bottom). Navigation never
//! depends on it; it exists for documentation and tests.

use crate::link::normalize_page_path;

/// One named, scroll-targetable anchor on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectionConfig {
    /// DOM id of the anchor element; kebab-case.
    pub id: String,
    /// Human-readable label, used by navigation menus.
    pub label: String,
    /// Path of the page that owns this section.
    pub page: String,
}

impl SectionConfig {
    /// Create a section descriptor.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, page: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            page: page.into(),
        }
    }
}

/// Sections registered for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageSections {
    /// Page path; expected to start with `/`.
    pub page: String,
    /// Sections in presentation order.
    pub sections: Vec<SectionConfig>,
}

/// Immutable mapping from page path to its ordered sections.
///
/// Entries keep their insertion order. The registry performs no validation on
/// construction; run [`crate::validate::validate_registry`] for that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SectionRegistry {
    entries: Vec<PageSections>,
}

impl SectionRegistry {
    /// Build a registry from page entries.
    #[must_use]
    pub fn new(entries: Vec<PageSections>) -> Self {
        Self { entries }
    }

    /// Start a builder.
    #[must_use]
    pub fn builder() -> SectionRegistryBuilder {
        SectionRegistryBuilder::default()
    }

    /// The registry of the marketing site.
    #[must_use]
    pub fn site() -> &'static Self {
        crate::site::registry()
    }

    /// All page entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[PageSections] {
        &self.entries
    }

    /// Iterate every registered section across all pages.
    pub fn iter(&self) -> impl Iterator<Item = &SectionConfig> + '_ {
        self.entries.iter().flat_map(|entry| entry.sections.iter())
    }

    /// Registered page paths.
    pub fn pages(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.page.as_str())
    }

    /// Number of registered pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no page is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, page: &str) -> Option<&PageSections> {
        let page = normalize_page_path(page);
        self.entries.iter().find(|entry| entry.page == page)
    }

    /// Sections of `page`, or an empty slice for unknown pages.
    #[must_use]
    pub fn sections_by_page(&self, page: &str) -> &[SectionConfig] {
        self.entry(page)
            .map(|entry| entry.sections.as_slice())
            .unwrap_or_default()
    }

    /// Section ids of `page` in presentation order.
    pub fn section_ids<'a>(&'a self, page: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.sections_by_page(page)
            .iter()
            .map(|section| section.id.as_str())
    }

    /// Whether `section_id` is registered on `page`.
    #[must_use]
    pub fn section_exists(&self, page: &str, section_id: &str) -> bool {
        self.sections_by_page(page)
            .iter()
            .any(|section| section.id == section_id)
    }

    /// Whether a composite link is well-formed.
    ///
    /// Page-only links are always valid, even for unknown pages.
    #[must_use]
    pub fn is_valid_deep_link(&self, page: &str, section: Option<&str>) -> bool {
        match section {
            None => true,
            Some(section) => self.section_exists(page, section),
        }
    }

    /// First section with `section_id` on any page.
    ///
    /// Ids reused across pages resolve to the first page in registry order.
    #[must_use]
    pub fn find_section(&self, section_id: &str) -> Option<&SectionConfig> {
        self.iter().find(|section| section.id == section_id)
    }
}

/// Incremental builder for [`SectionRegistry`].
#[derive(Debug, Default)]
pub struct SectionRegistryBuilder {
    entries: Vec<PageSections>,
}

impl SectionRegistryBuilder {
    /// Register `page` with `(id, label)` pairs. Each section's `page` field is
    /// set to `page` verbatim.
    #[must_use]
    pub fn page(mut self, page: &str, sections: &[(&str, &str)]) -> Self {
        let sections = sections
            .iter()
            .map(|(id, label)| SectionConfig::new(*id, *label, page))
            .collect();
        self.entries.push(PageSections {
            page: page.to_owned(),
            sections,
        });
        self
    }

    /// Register a page entry exactly as given.
    #[must_use]
    pub fn entry(mut self, entry: PageSections) -> Self {
        self.entries.push(entry);
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> SectionRegistry {
        SectionRegistry::new(self.entries)
    }
}
