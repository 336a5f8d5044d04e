//! Intel Extract Web App (Leptos + WASM)

mod api;
mod app;
mod components;
mod config;
mod export;
mod logging;

use api::BackendClient;
use app::App;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    logging::init();

    let backend_url = config::backend_url();
    tracing::info!(backend = backend_url, "starting intel extract");

    let client = BackendClient::new(backend_url);
    leptos::mount::mount_to_body(move || view! { <App client=client /> });
}
