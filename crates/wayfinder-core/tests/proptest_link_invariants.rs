//! Property tests for the composite-hash codec.
//!
//! 1. **Idempotence**: `normalize_page_path` is a fixed point after one call.
//! 2. **Round trip**: decoding an encoded link yields the normalized page and
//!    the original section.
//! 3. **Totality**: decoding and canonicalizing never panic.
//! 4. **Stability**: canonical hashes are never rewritten again.

use proptest::prelude::*;
use wayfinder_core::{
    CanonicalHash, DeepLink, canonicalize_hash, create_section_hash, normalize_page_path,
    parse_section_hash,
};

fn page_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9/_-]{1,24}"
}

fn section_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,8}(-[a-z0-9]{1,8}){0,3}"
}

proptest! {
    #[test]
    fn normalize_is_idempotent(s in any::<String>()) {
        let once = normalize_page_path(&s);
        prop_assert_eq!(normalize_page_path(&once), once.clone());
        prop_assert!(once.starts_with('/'));
    }

    #[test]
    fn round_trip_with_section(page in page_strategy(), section in section_strategy()) {
        let hash = create_section_hash(&page, Some(&section));
        let link = parse_section_hash(&hash);
        prop_assert_eq!(link, DeepLink {
            page: normalize_page_path(&page),
            section: Some(section),
        });
    }

    #[test]
    fn round_trip_without_section(page in page_strategy()) {
        let link = parse_section_hash(&create_section_hash(&page, None));
        prop_assert_eq!(link, DeepLink::page(&page));
    }

    #[test]
    fn parse_is_total(raw in any::<String>()) {
        let link = parse_section_hash(&raw);
        prop_assert!(link.page.starts_with('/'));
        prop_assert_ne!(link.section.as_deref(), Some(""));
    }

    #[test]
    fn canonicalize_is_stable(raw in "#?[!#/a-z-]{0,16}") {
        if let CanonicalHash::Rewrite { to, .. } = canonicalize_hash(&raw) {
            prop_assert_eq!(canonicalize_hash(&to), CanonicalHash::Canonical);
        }
    }

    #[test]
    fn encoded_links_are_canonical(page in "[a-z-]{0,12}", section in proptest::option::of(section_strategy())) {
        let link = DeepLink {
            page: normalize_page_path(&page),
            section,
        };
        let raw = link.to_hash();
        prop_assert_ne!(canonicalize_hash(&raw), CanonicalHash::Empty);
        prop_assert!(!canonicalize_hash(&raw).needs_rewrite());
    }
}
