#![forbid(unsafe_code)]

//! `wasm-bindgen` exports: a `web-sys` host and the [`WayfinderRunner`].
//!
//! The page script owns the listeners and forwards them:
//!
//! ```js
//! const runner = new WayfinderRunner();
//! runner.mount(performance.now());
//! addEventListener("hashchange", () => runner.onHashChange(performance.now()));
//! addEventListener("popstate", () => runner.onPopState(performance.now()));
//! new MutationObserver(() => runner.onDomMutation(performance.now()))
//!   .observe(document.body, { childList: true, subtree: true });
//! (function tick() { runner.advance(performance.now()); requestAnimationFrame(tick); })();
//! ```
//!
//! Only compiled on `wasm32` targets.

use core::fmt;
use core::time::Duration;
use std::collections::VecDeque;

use js_sys::Reflect;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wayfinder_backend::{ElementSnapshot, FocusOptions, HostDocument, HostLocation, ScrollBehavior};
use wayfinder_runtime::{
    Navigator, NavigatorConfig, ProgressConfig, ProgressIndicator, progress::FALLBACK_SEED,
};
use web_sys::{Document, Element, HtmlElement, Window};

use crate::driver::{HostEvent, HostEvents, StepDriver};

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn millis(now_ms: f64) -> Duration {
    if now_ms.is_finite() && now_ms > 0.0 {
        Duration::from_secs_f64(now_ms / 1_000.0)
    } else {
        Duration::ZERO
    }
}

fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1_000.0
}

/// Browser host failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserError {
    /// No global `window` (worker or non-browser runtime).
    NoWindow,
    /// `window.document` is missing.
    NoDocument,
    /// A DOM call threw.
    Js(String),
}

impl fmt::Display for BrowserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWindow => f.write_str("no global window"),
            Self::NoDocument => f.write_str("window has no document"),
            Self::Js(msg) => write!(f, "DOM call failed: {msg}"),
        }
    }
}

impl std::error::Error for BrowserError {}

impl From<JsValue> for BrowserError {
    fn from(value: JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

/// Host over the live `window` and `document`.
pub struct BrowserHost {
    window: Window,
    document: Document,
    events: VecDeque<HostEvent>,
}

impl BrowserHost {
    pub fn new() -> Result<Self, BrowserError> {
        let window = web_sys::window().ok_or(BrowserError::NoWindow)?;
        let document = window.document().ok_or(BrowserError::NoDocument)?;
        Ok(Self {
            window,
            document,
            events: VecDeque::new(),
        })
    }

    /// Queue a notification forwarded by the page script.
    pub fn push_event(&mut self, event: HostEvent) {
        self.events.push_back(event);
    }

    fn lookup(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn scroll_margin_top(&self, element: &Element) -> f64 {
        let Ok(Some(style)) = self.window.get_computed_style(element) else {
            return 0.0;
        };
        style
            .get_property_value("scroll-margin-top")
            .ok()
            .and_then(|value| value.trim().trim_end_matches("px").parse().ok())
            .unwrap_or(0.0)
    }
}

impl HostEvents for BrowserHost {
    fn pop_event(&mut self) -> Option<HostEvent> {
        self.events.pop_front()
    }
}

impl HostLocation for BrowserHost {
    type Error = BrowserError;

    fn hash(&self) -> String {
        self.window.location().hash().unwrap_or_default()
    }

    fn set_hash(&mut self, hash: &str) -> Result<(), Self::Error> {
        self.window.location().set_hash(hash)?;
        Ok(())
    }

    fn replace_hash(&mut self, hash: &str) -> Result<(), Self::Error> {
        self.window
            .history()?
            .replace_state_with_url(&JsValue::NULL, "", Some(hash))?;
        Ok(())
    }
}

impl HostDocument for BrowserHost {
    type Error = BrowserError;

    fn element(&self, id: &str) -> Option<ElementSnapshot> {
        let element = self.lookup(id)?;
        Some(ElementSnapshot {
            tag_name: element.tag_name().to_ascii_lowercase(),
            top: element.get_bounding_client_rect().top(),
            tab_index: element
                .get_attribute("tabindex")
                .and_then(|value| value.trim().parse().ok()),
            scroll_margin_top: self.scroll_margin_top(&element),
        })
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) -> Result<(), Self::Error> {
        let options = web_sys::ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(match behavior {
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
        Ok(())
    }

    fn set_tab_index(&mut self, id: &str, tab_index: i32) -> Result<(), Self::Error> {
        if let Some(element) = self.lookup(id) {
            element.set_attribute("tabindex", &tab_index.to_string())?;
        }
        Ok(())
    }

    fn focus(&mut self, id: &str, options: FocusOptions) -> Result<bool, Self::Error> {
        let Some(element) = self.lookup(id) else {
            return Ok(false);
        };
        let Ok(element) = element.dyn_into::<HtmlElement>() else {
            return Ok(false);
        };
        let dom_options = web_sys::FocusOptions::new();
        dom_options.set_prevent_scroll(options.prevent_scroll);
        element.focus_with_options(&dom_options)?;
        let element: &Element = element.as_ref();
        Ok(self.document.active_element().as_ref() == Some(element))
    }

    fn prefers_reduced_motion(&self) -> bool {
        matches!(
            self.window.match_media(REDUCED_MOTION_QUERY),
            Ok(Some(query)) if query.matches()
        )
    }
}

/// JS-facing navigator for the live page.
#[wasm_bindgen]
pub struct WayfinderRunner {
    driver: StepDriver<BrowserHost>,
}

#[wasm_bindgen]
impl WayfinderRunner {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WayfinderRunner, JsValue> {
        install_panic_hook();
        let host = BrowserHost::new().map_err(|err| JsValue::from_str(&err.to_string()))?;
        let seed = (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
        let progress = ProgressIndicator::with_seed(ProgressConfig::default(), seed ^ FALLBACK_SEED);
        Ok(Self {
            driver: StepDriver::new(Navigator::new(NavigatorConfig::default()), progress, host),
        })
    }

    /// Resolve the initial location.
    pub fn mount(&mut self, now_ms: f64) {
        self.driver.advance_to(millis(now_ms));
        self.driver.mount();
    }

    pub fn unmount(&mut self) {
        self.driver.unmount();
    }

    #[wasm_bindgen(js_name = onHashChange)]
    pub fn on_hash_change(&mut self, now_ms: f64) {
        self.deliver(HostEvent::HashChange, now_ms);
    }

    #[wasm_bindgen(js_name = onPopState)]
    pub fn on_pop_state(&mut self, now_ms: f64) {
        self.deliver(HostEvent::PopState, now_ms);
    }

    #[wasm_bindgen(js_name = onDomMutation)]
    pub fn on_dom_mutation(&mut self, now_ms: f64) {
        self.deliver(HostEvent::DomMutation, now_ms);
    }

    /// Fire due timers.
    pub fn advance(&mut self, now_ms: f64) {
        self.driver.advance_to(millis(now_ms));
    }

    /// Go to the top of `path`.
    pub fn navigate(&mut self, path: &str) -> Result<(), JsValue> {
        self.driver
            .navigate(path)
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    #[wasm_bindgen(js_name = activePage)]
    pub fn active_page(&self) -> Option<String> {
        self.driver.navigator().active_page().map(str::to_owned)
    }

    #[wasm_bindgen(js_name = activeSection)]
    pub fn active_section(&self) -> Option<String> {
        self.driver
            .navigator()
            .active_link()
            .and_then(|link| link.section.clone())
    }

    /// Progress bar value in percent.
    pub fn progress(&self) -> f64 {
        self.driver.progress().percent()
    }

    #[wasm_bindgen(js_name = progressPhase)]
    pub fn progress_phase(&self) -> String {
        self.driver.progress().phase().as_str().to_owned()
    }

    #[wasm_bindgen(js_name = progressVisible)]
    pub fn progress_visible(&self) -> bool {
        self.driver.progress().is_visible()
    }

    /// Time of the next pending timer, for hosts that sleep between frames.
    #[wasm_bindgen(js_name = nextDeadlineMs)]
    pub fn next_deadline_ms(&self) -> Option<f64> {
        self.driver.next_deadline().map(duration_ms)
    }

    fn deliver(&mut self, event: HostEvent, now_ms: f64) {
        self.driver.host_mut().push_event(event);
        self.driver.advance_to(millis(now_ms));
    }
}
