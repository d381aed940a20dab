#![forbid(unsafe_code)]

//! Section table of the marketing site.
//!
//! Every page that renders deep-linkable anchors is listed here, sections in
//! top-to-bottom order. Page components must render an element whose `id`
//! equals the section id and reserve a scroll margin for the fixed header.

use std::sync::OnceLock;

use crate::section::SectionRegistry;

static SITE: OnceLock<SectionRegistry> = OnceLock::new();

pub(crate) fn registry() -> &'static SectionRegistry {
    SITE.get_or_init(build)
}

fn build() -> SectionRegistry {
    SectionRegistry::builder()
        .page(
            "/",
            &[
                ("hero", "Start"),
                ("services", "Leistungen"),
                ("references", "Referenzen"),
                ("process", "Ablauf"),
                ("contact-cta", "Kontakt aufnehmen"),
            ],
        )
        .page(
            "/leistungen",
            &[
                ("overview", "Überblick"),
                ("messebau", "Messebau"),
                ("touren", "Touren"),
                ("events", "Events"),
                ("banner", "Bannerdruck"),
            ],
        )
        .page(
            "/leistungen/messebau",
            &[
                ("intro", "Einführung"),
                ("packages", "Pakete"),
                ("gallery", "Galerie"),
                ("faq", "Häufige Fragen"),
            ],
        )
        .page(
            "/leistungen/touren",
            &[
                ("intro", "Einführung"),
                ("routes", "Routen"),
                ("fleet", "Fahrzeuge"),
            ],
        )
        .page(
            "/konfigurator",
            &[
                ("format", "Format"),
                ("material", "Material"),
                ("design", "Gestaltung"),
                ("summary", "Zusammenfassung"),
            ],
        )
        .page(
            "/referenzen",
            &[("projects", "Projekte"), ("testimonials", "Kundenstimmen")],
        )
        .page(
            "/ueber-uns",
            &[("team", "Team"), ("history", "Geschichte"), ("jobs", "Karriere")],
        )
        .page(
            "/kontakt",
            &[("form", "Kontaktformular"), ("locations", "Standorte")],
        )
        .build()
}
