//! A list of text items that can be added, edited and deleted, with five
//! interchangeable persistence backends (one route each).

pub mod api;
mod app;
pub mod backend;
mod components;
pub mod config;
pub mod logging;
pub mod models;
mod pages;
pub mod state;
mod util;

use crate::app::App;
use crate::config::AppConfig;
use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();

    let config = AppConfig::from_window();
    logging::init(&config.log_level);
    tracing::info!(?config, "starting item list app");

    mount_to_body(move || view! { <App config=config /> });
}
