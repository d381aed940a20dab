#![forbid(unsafe_code)]

//! Composite-hash codec.
//!
//! Pages and in-page sections share a single URL fragment:
//!
//! ```text
//! #/<page-path>              page only
//! #/<page-path>#<section-id> page + section
//! ```
//!
//! Every function here is pure. Malformed input never fails: it collapses to
//! the home page with no section.
//!
//! # Invariants
//!
//! 1. [`normalize_page_path`] is idempotent.
//! 2. `parse_section_hash(&create_section_hash(p, s))` yields
//!    `{ page: normalize_page_path(p), section: s }` whenever `p` and `s`
//!    contain no `#`.
//! 3. [`canonicalize_hash`] maps canonical hashes to themselves, so the legacy
//!    compatibility pass never doubles a `#/` prefix.

use core::fmt;
use core::str::FromStr;

/// Path of the home page.
pub const HOME_PATH: &str = "/";

/// Decoded form of a composite hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeepLink {
    /// Normalized page path; always starts with `/`.
    pub page: String,
    /// Optional in-page section id. Never `Some("")`.
    pub section: Option<String>,
}

impl DeepLink {
    /// Link to the top of `page`.
    #[must_use]
    pub fn page(page: &str) -> Self {
        Self {
            page: normalize_page_path(page),
            section: None,
        }
    }

    /// Link to `section` on `page`. An empty section is treated as absent.
    #[must_use]
    pub fn section(page: &str, section: &str) -> Self {
        Self {
            page: normalize_page_path(page),
            section: (!section.is_empty()).then(|| section.to_owned()),
        }
    }

    /// The home page link (`#/`).
    #[must_use]
    pub fn home() -> Self {
        Self::page(HOME_PATH)
    }

    /// Section id, if any.
    #[must_use]
    pub fn section_id(&self) -> Option<&str> {
        self.section.as_deref()
    }

    /// Encode back into a composite hash.
    #[must_use]
    pub fn to_hash(&self) -> String {
        create_section_hash(&self.page, self.section.as_deref())
    }
}

impl Default for DeepLink {
    fn default() -> Self {
        Self::home()
    }
}

impl fmt::Display for DeepLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("#")?;
        f.write_str(&self.page)?;
        if let Some(section) = &self.section {
            write!(f, "#{section}")?;
        }
        Ok(())
    }
}

impl FromStr for DeepLink {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parse_section_hash(s))
    }
}

/// Decode a composite hash into a [`DeepLink`].
///
/// A single leading `#` is stripped and the remainder is split on `#`. The
/// first part is the page (normalized), the second the section. Anything
/// after a third `#` is ignored.
#[must_use]
pub fn parse_section_hash(hash: &str) -> DeepLink {
    decode_body(hash.strip_prefix('#').unwrap_or(hash))
}

fn decode_body(body: &str) -> DeepLink {
    let mut parts = body.split('#');
    let page = normalize_page_path(parts.next().unwrap_or_default());
    let section = parts
        .next()
        .filter(|section| !section.is_empty())
        .map(str::to_owned);
    DeepLink { page, section }
}

/// Encode a page and optional section as a composite hash.
///
/// The page is written verbatim (no normalization, no escaping); callers must
/// keep `#` out of both parts.
#[must_use]
pub fn create_section_hash(page: &str, section: Option<&str>) -> String {
    match section {
        Some(section) if !section.is_empty() => {
            let mut hash = String::with_capacity(page.len() + section.len() + 2);
            hash.push('#');
            hash.push_str(page);
            hash.push('#');
            hash.push_str(section);
            hash
        }
        _ => format!("#{page}"),
    }
}

/// Ensure a page path is non-empty and starts with `/`.
#[must_use]
pub fn normalize_page_path(page: &str) -> String {
    if page.is_empty() {
        HOME_PATH.to_owned()
    } else if page.starts_with('/') {
        page.to_owned()
    } else {
        format!("/{page}")
    }
}

/// Classification of a raw location hash by the legacy compatibility pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalHash {
    /// No fragment at all (`""` or `"#"`): the home page, left untouched.
    Empty,
    /// Already in canonical composite form.
    Canonical,
    /// Legacy or non-canonical form that must be replaced in history.
    Rewrite {
        /// The hash as found in the location bar.
        from: String,
        /// Canonical replacement.
        to: String,
    },
}

impl CanonicalHash {
    /// Whether the location must be rewritten.
    #[must_use]
    pub const fn needs_rewrite(&self) -> bool {
        matches!(self, Self::Rewrite { .. })
    }
}

/// Strip the prefixes older link conventions put in front of the page path.
fn strip_legacy_prefix(body: &str) -> &str {
    let mut rest = body;
    loop {
        let next = rest
            .strip_prefix("!/")
            .or_else(|| rest.strip_prefix("/#/"))
            .or_else(|| rest.strip_prefix("#/"))
            .map(|tail| tail.trim_start_matches('/'));
        match next {
            Some(tail) => rest = tail,
            None => return rest,
        }
    }
}

/// Classify `raw` and compute its canonical composite form.
///
/// Recognized legacy shapes are hash-bang routes (`#!/page`), doubled route
/// prefixes (`#/#/page`, `##/page`) and page paths missing their leading
/// slash (`#kontakt`).
#[must_use]
pub fn canonicalize_hash(raw: &str) -> CanonicalHash {
    let body = raw.strip_prefix('#').unwrap_or(raw);
    if body.is_empty() {
        return CanonicalHash::Empty;
    }
    let link = decode_body(strip_legacy_prefix(body));
    let canonical = link.to_hash();
    let current = if raw.starts_with('#') {
        raw.to_owned()
    } else {
        format!("#{raw}")
    };
    if canonical == current {
        CanonicalHash::Canonical
    } else {
        CanonicalHash::Rewrite {
            from: current,
            to: canonical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_hash_is_home() {
        assert_eq!(parse_section_hash(""), DeepLink::home());
        assert_eq!(parse_section_hash("#"), DeepLink::home());
    }

    #[test]
    fn missing_slash_is_restored() {
        assert_eq!(parse_section_hash("kontakt"), DeepLink::page("/kontakt"));
    }

    #[test]
    fn nested_page_without_section() {
        let link = parse_section_hash("/leistungen/messebau");
        assert_eq!(link.page, "/leistungen/messebau");
        assert_eq!(link.section, None);
    }

    #[test]
    fn composite_hash_splits_page_and_section() {
        let link = parse_section_hash("#/leistungen/messebau#packages");
        assert_eq!(link, DeepLink::section("/leistungen/messebau", "packages"));
    }

    #[test]
    fn extra_parts_are_ignored() {
        let link = parse_section_hash("#/kontakt#form#ignored#too");
        assert_eq!(link, DeepLink::section("/kontakt", "form"));
    }

    #[test]
    fn empty_section_is_absent() {
        assert_eq!(parse_section_hash("#/kontakt#"), DeepLink::page("/kontakt"));
    }

    #[test]
    fn empty_page_with_section_defaults_to_home() {
        assert_eq!(parse_section_hash("##hero"), DeepLink::section("/", "hero"));
    }

    #[test]
    fn create_without_section() {
        assert_eq!(create_section_hash("/kontakt", None), "#/kontakt");
        assert_eq!(create_section_hash("/kontakt", Some("")), "#/kontakt");
    }

    #[test]
    fn create_with_section() {
        assert_eq!(
            create_section_hash("/leistungen", Some("touren")),
            "#/leistungen#touren"
        );
    }

    #[test]
    fn normalize_cases() {
        assert_eq!(normalize_page_path(""), "/");
        assert_eq!(normalize_page_path("kontakt"), "/kontakt");
        assert_eq!(normalize_page_path("/kontakt"), "/kontakt");
        assert_eq!(normalize_page_path("//x"), "//x");
    }

    #[test]
    fn display_and_from_str_agree() {
        let link = DeepLink::section("/leistungen", "touren");
        assert_eq!(link.to_string(), "#/leistungen#touren");
        let parsed: DeepLink = "#/leistungen#touren".parse().unwrap();
        assert_eq!(parsed, link);
    }

    #[test]
    fn canonical_hash_is_a_fixed_point() {
        assert_eq!(canonicalize_hash("#/leistungen"), CanonicalHash::Canonical);
        assert_eq!(
            canonicalize_hash("#/leistungen#touren"),
            CanonicalHash::Canonical
        );
        assert_eq!(canonicalize_hash(""), CanonicalHash::Empty);
        assert_eq!(canonicalize_hash("#"), CanonicalHash::Empty);
    }

    #[test]
    fn hash_bang_is_rewritten() {
        assert_eq!(
            canonicalize_hash("#!/leistungen"),
            CanonicalHash::Rewrite {
                from: "#!/leistungen".into(),
                to: "#/leistungen".into(),
            }
        );
    }

    #[test]
    fn doubled_prefix_is_collapsed() {
        for raw in ["#/#/leistungen", "##/leistungen", "#/#/#/leistungen"] {
            assert_eq!(
                canonicalize_hash(raw),
                CanonicalHash::Rewrite {
                    from: raw.into(),
                    to: "#/leistungen".into(),
                },
                "raw = {raw}"
            );
        }
    }

    #[test]
    fn missing_slash_is_rewritten() {
        assert_eq!(
            canonicalize_hash("#kontakt"),
            CanonicalHash::Rewrite {
                from: "#kontakt".into(),
                to: "#/kontakt".into(),
            }
        );
    }

    #[test]
    fn legacy_rewrite_keeps_section() {
        assert_eq!(
            canonicalize_hash("#!/leistungen#touren"),
            CanonicalHash::Rewrite {
                from: "#!/leistungen#touren".into(),
                to: "#/leistungen#touren".into(),
            }
        );
    }

    #[test]
    fn raw_without_hash_sign_is_compared_with_one() {
        assert_eq!(canonicalize_hash("/kontakt"), CanonicalHash::Canonical);
    }
}
