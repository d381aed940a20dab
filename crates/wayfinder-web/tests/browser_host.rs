#![forbid(unsafe_code)]
#![cfg(target_arch = "wasm32")]

//! Browser host checks. Run with `wasm-pack test --headless --firefox crates/wayfinder-web`.

use wasm_bindgen_test::*;
use wayfinder_backend::{HostDocument, HostLocation};
use wayfinder_web::{BrowserHost, WayfinderRunner};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn replace_hash_rewrites_without_new_entry() {
    let mut host = BrowserHost::new().expect("browser host");
    let before = web_sys::window().unwrap().history().unwrap().length().unwrap();
    host.replace_hash("#/leistungen").unwrap();
    let after = web_sys::window().unwrap().history().unwrap().length().unwrap();
    assert_eq!(host.hash(), "#/leistungen");
    assert_eq!(before, after);
}

#[wasm_bindgen_test]
fn missing_element_is_none() {
    let host = BrowserHost::new().expect("browser host");
    assert!(host.element("definitely-not-mounted").is_none());
}

#[wasm_bindgen_test]
fn runner_resolves_current_hash_on_mount() {
    let mut host = BrowserHost::new().expect("browser host");
    host.replace_hash("#/kontakt").unwrap();
    let mut runner = WayfinderRunner::new().expect("runner");
    runner.mount(0.0);
    assert_eq!(runner.active_page().as_deref(), Some("/kontakt"));
    runner.unmount();
}
