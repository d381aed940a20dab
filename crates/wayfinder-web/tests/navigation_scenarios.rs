#![forbid(unsafe_code)]
#![cfg(not(target_arch = "wasm32"))]

//! End-to-end navigation against the in-memory page.
//!
//! Run:
//!   cargo test -p wayfinder-web --test navigation_scenarios

use core::time::Duration;

use pretty_assertions::assert_eq;
use wayfinder_backend::{HostDocument, HostLocation, ScrollBehavior};
use wayfinder_core::DeepLink;
use wayfinder_runtime::{
    NavigationEvent, Navigator, NavigatorConfig, ProgressConfig, ProgressIndicator, RetryPolicy,
};
use wayfinder_web::{MemoryElement, MemoryHost, StepDriver};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn config() -> NavigatorConfig {
    NavigatorConfig {
        dev_validation: false,
        ..NavigatorConfig::default()
    }
}

fn driver_with(config: NavigatorConfig, host: MemoryHost) -> StepDriver<MemoryHost> {
    StepDriver::new(
        Navigator::new(config),
        ProgressIndicator::with_seed(ProgressConfig::default(), 11),
        host,
    )
}

fn driver(hash: &str) -> StepDriver<MemoryHost> {
    driver_with(config(), MemoryHost::new(hash))
}

fn scrolled_attempts(d: &StepDriver<MemoryHost>) -> Vec<u32> {
    d.navigator()
        .log()
        .filter_map(|entry| match &entry.event {
            NavigationEvent::Scrolled { attempt, .. } => Some(*attempt),
            _ => None,
        })
        .collect()
}

#[test]
fn legacy_hash_is_rewritten_in_place_without_doubling() {
    let mut d = driver("#!/leistungen");
    d.mount();
    d.step();

    assert_eq!(d.host().hash(), "#/leistungen");
    assert_eq!(d.host().history(), ["#/leistungen"]);
    assert_eq!(d.host().pending_events(), 0);
    assert_eq!(d.navigator().active_page(), Some("/leistungen"));
}

#[test]
fn canonical_single_hash_is_left_alone() {
    let mut d = driver("#/leistungen");
    d.mount();
    assert_eq!(d.host().hash(), "#/leistungen");
    assert!(
        d.navigator()
            .log()
            .all(|entry| !matches!(entry.event, NavigationEvent::LegacyRewrite { .. }))
    );
}

#[test]
fn lazily_mounted_section_is_scrolled_and_focused() {
    let mut d = driver("#/");
    d.mount();
    d.host_mut().visit("#/leistungen#touren");
    d.step();
    assert_eq!(d.navigator().active_page(), Some("/leistungen"));
    assert_eq!(d.navigator().pending_section(), Some(("touren", 1)));

    // The page bundle arrives 200 ms later; the mutation is noticed at once.
    d.advance(ms(200));
    d.host_mut()
        .insert_element("touren", MemoryElement::section(1_640.0));
    d.step();
    let record = *d.host().scrolls().last().unwrap();
    assert_eq!(record.top, 1_540.0);
    assert_eq!(record.behavior, ScrollBehavior::Smooth);
    assert_eq!(d.host().focused(), None);

    d.advance(ms(400));
    assert_eq!(d.host().focused(), Some("touren"));
    assert_eq!(d.host().element_state("touren").unwrap().tab_index, Some(-1));
}

#[test]
fn polling_finds_section_on_fourth_attempt() {
    // No mutation events: the element appears between the 3rd and 4th poll.
    let mut d = driver("#/leistungen#touren");
    d.mount();
    for _ in 0..2 {
        d.advance(ms(150));
    }
    assert_eq!(d.navigator().pending_section(), Some(("touren", 3)));

    d.host_mut()
        .insert_element("touren", MemoryElement::section(900.0));
    // Discard the mutation so only the poll can find it.
    while wayfinder_web::HostEvents::pop_event(d.host_mut()).is_some() {}
    d.advance(ms(150));

    assert_eq!(scrolled_attempts(&d), [4]);
    assert_eq!(d.navigator().pending_section(), None);
    d.advance(ms(400));
    assert_eq!(d.host().focused(), Some("touren"));
}

#[test]
fn polling_stops_at_the_attempt_budget() {
    let mut d = driver_with(
        NavigatorConfig {
            retry: RetryPolicy::fixed(5, ms(150)),
            ..config()
        },
        MemoryHost::new("#/leistungen#touren"),
    );
    d.mount();
    d.run_until_idle();

    let log: Vec<_> = d.navigator().log().map(|entry| &entry.event).collect();
    let scheduled = log
        .iter()
        .filter(|event| matches!(event, NavigationEvent::RetryScheduled { .. }))
        .count();
    assert_eq!(scheduled, 4);
    assert!(log.iter().any(|event| matches!(
        event,
        NavigationEvent::RetryExhausted { attempts: 5, .. }
    )));
    assert!(d.host().scrolls().is_empty());
    assert_eq!(d.host().focused(), None);
}

#[test]
fn second_navigation_cancels_stale_poll() {
    let mut d = driver("#/leistungen#touren");
    d.mount();
    d.advance(ms(100));
    d.host_mut().visit("#/kontakt#form");
    d.host_mut()
        .insert_element("form", MemoryElement::section(400.0).with_tab_index(0));
    d.step();

    // The old target mounts later; nothing may scroll back to it.
    d.advance(ms(300));
    d.host_mut()
        .insert_element("touren", MemoryElement::section(2_000.0));
    d.run_until_idle();

    let tops: Vec<f64> = d.host().scrolls().iter().map(|r| r.top).collect();
    assert_eq!(tops, [300.0]);
    assert_eq!(d.host().focused(), Some("form"));
    assert_eq!(d.host().element_state("form").unwrap().tab_index, Some(0));
}

#[test]
fn page_without_section_scrolls_to_top() {
    let mut d = driver("#/");
    d.mount();
    d.host_mut().scroll_to(800.0, ScrollBehavior::Instant).unwrap();
    d.navigate("referenzen").unwrap();
    d.step();
    assert_eq!(d.host().scroll_y(), 0.0);
    assert_eq!(d.navigator().active_page(), Some("/referenzen"));
}

#[test]
fn legacy_link_to_current_page_scrolls_to_top() {
    let mut d = driver("#/kontakt");
    d.mount();
    d.host_mut().scroll_to(800.0, ScrollBehavior::Instant).unwrap();

    d.host_mut().visit("#!/kontakt");
    d.step();

    assert_eq!(d.host().hash(), "#/kontakt");
    assert_eq!(d.host().scroll_y(), 0.0);
    assert!(
        d.navigator()
            .log()
            .all(|entry| !matches!(entry.event, NavigationEvent::Ignored { .. }))
    );
}

#[test]
fn reduced_motion_scrolls_instantly_and_focuses_immediately() {
    let mut host = MemoryHost::new("#/kontakt#form");
    host.set_reduced_motion(true);
    host.insert_element("form", MemoryElement::section(700.0));
    let mut d = driver_with(config(), host);
    d.mount();

    let record = *d.host().scrolls().last().unwrap();
    assert_eq!(record.behavior, ScrollBehavior::Instant);
    assert_eq!(d.host().focused(), Some("form"));
}

#[test]
fn back_button_restores_previous_section() {
    let mut host = MemoryHost::new("#/");
    host.insert_element("hero", MemoryElement::section(0.0));
    host.insert_element("contact-cta", MemoryElement::section(3_000.0));
    let mut d = driver_with(config(), host);
    d.mount();

    d.host_mut().visit("#/#contact-cta");
    d.step();
    d.host_mut().visit("#/#hero");
    d.step();
    assert!(d.host_mut().back());
    d.step();

    assert_eq!(
        d.navigator().active_link(),
        Some(&DeepLink::section("/", "contact-cta"))
    );
    let resolved = d
        .navigator()
        .log()
        .filter(|entry| matches!(entry.event, NavigationEvent::Resolved { .. }))
        .count();
    // load, two visits, and one resolution for the popstate/hashchange pair
    assert_eq!(resolved, 4);
}

#[test]
fn subscribers_track_active_page() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let pages = Rc::new(RefCell::new(Vec::new()));
    let mut d = driver("#/");
    let sink = Rc::clone(&pages);
    d.navigator_mut()
        .subscribe(move |link| sink.borrow_mut().push(link.page.clone()));
    d.mount();
    d.navigate("/ueber-uns").unwrap();
    d.step();
    d.navigate("ueber-uns").unwrap();
    d.step();

    assert_eq!(*pages.borrow(), ["/", "/ueber-uns"]);
}
