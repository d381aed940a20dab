#![forbid(unsafe_code)]
#![cfg(not(target_arch = "wasm32"))]

//! Property tests for bounded section polling.
//!
//! Run:
//!   cargo test -p wayfinder-web --test retry_properties

use core::time::Duration;

use proptest::prelude::*;
use wayfinder_runtime::{
    NavigationEvent, Navigator, NavigatorConfig, ProgressConfig, ProgressIndicator, RetryPolicy,
};
use wayfinder_web::{HostEvents, MemoryElement, MemoryHost, StepDriver};

const DELAY_MS: u64 = 150;

fn polls(d: &StepDriver<MemoryHost>) -> (Option<u32>, Option<u32>) {
    let mut scrolled = None;
    let mut exhausted = None;
    for entry in d.navigator().log() {
        match &entry.event {
            NavigationEvent::Scrolled { attempt, .. } => scrolled = Some(*attempt),
            NavigationEvent::RetryExhausted { attempts, .. } => exhausted = Some(*attempts),
            _ => {}
        }
    }
    (scrolled, exhausted)
}

/// Mount at `#/leistungen#touren` and make the section appear just before
/// poll number `appears_at` (1-based). Mutation events are discarded so only
/// the poll loop can find it.
fn run(max_attempts: u32, appears_at: u32) -> StepDriver<MemoryHost> {
    let config = NavigatorConfig {
        dev_validation: false,
        retry: RetryPolicy::fixed(max_attempts, Duration::from_millis(DELAY_MS)),
        ..NavigatorConfig::default()
    };
    let mut host = MemoryHost::new("#/leistungen#touren");
    if appears_at == 1 {
        host.insert_element("touren", MemoryElement::section(500.0));
    }
    let mut d = StepDriver::new(
        Navigator::new(config),
        ProgressIndicator::with_seed(ProgressConfig::default(), 0),
        host,
    );
    d.mount();
    for poll in 2..=max_attempts + 2 {
        if poll == appears_at {
            d.host_mut()
                .insert_element("touren", MemoryElement::section(500.0));
            while d.host_mut().pop_event().is_some() {}
        }
        d.advance(Duration::from_millis(DELAY_MS));
    }
    d.run_until_idle();
    d
}

proptest! {
    #[test]
    fn found_exactly_when_it_appears_within_budget(
        max_attempts in 1u32..25,
        appears_at in 1u32..30,
    ) {
        let d = run(max_attempts, appears_at);
        let (scrolled, exhausted) = polls(&d);
        if appears_at <= max_attempts {
            prop_assert_eq!(scrolled, Some(appears_at));
            prop_assert_eq!(exhausted, None);
            prop_assert_eq!(d.host().focused(), Some("touren"));
        } else {
            prop_assert_eq!(scrolled, None);
            prop_assert_eq!(exhausted, Some(max_attempts));
            prop_assert!(d.host().scrolls().is_empty());
        }
        prop_assert_eq!(d.navigator().pending_section(), None);
        prop_assert_eq!(d.navigator().next_deadline(), None);
    }

    #[test]
    fn polls_are_evenly_spaced(max_attempts in 2u32..25) {
        let d = run(max_attempts, u32::MAX);
        let times: Vec<u64> = d
            .navigator()
            .log()
            .filter(|entry| matches!(entry.event, NavigationEvent::RetryScheduled { .. }))
            .map(|entry| entry.at.as_millis() as u64)
            .collect();
        prop_assert_eq!(times.len() as u32, max_attempts - 1);
        for (i, at) in times.iter().enumerate() {
            prop_assert_eq!(*at, i as u64 * DELAY_MS);
        }
    }
}
