//! Fieldform browser runtime.
//!
//! Pure Rust + WASM frontend for rendering, filling, and submitting
//! transformed survey forms, online or offline. Modularised for
//! extensibility: each collaborator implementation lives in its own
//! module; the sequencing itself lives in `ff-runtime-core`.

pub mod api;
pub mod cache;
pub mod controller;
pub mod dom;
pub mod events;
pub mod gui;
pub mod platform;
pub mod state;
pub mod store;
pub mod theme;
pub mod translator;

use ff_runtime_core::Runtime;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();

    init().await
}

/// Main initialisation sequence: one survey, one pipeline, per page load.
async fn init() -> Result<(), JsValue> {
    let config = state::load_config();
    state::set_config(config.clone());

    let els = dom::Elements::bind()?;
    let state::Bootstrap { survey, settings } = state::bootstrap(&config);

    let runtime = Rc::new(Runtime {
        settings: Rc::new(settings),
        app_cache: Rc::new(cache::WebApplicationCache),
        form_cache: Rc::new(cache::WebFormCache),
        connection: Rc::new(api::HttpConnection),
        store: Rc::new(store::WebInstanceStore),
        controller: Rc::new(controller::EngineController),
        translator: Rc::new(translator::WebTranslator),
        ui: Rc::new(gui::WebGui::new(els.clone())),
        document: Rc::new(dom::WebFormDocument::new(els.clone())),
        events: Rc::new(events::WebEventBus),
        platform: Rc::new(platform::WebPlatform),
    });

    // The flush control must work even when form init fails below.
    events::bind_flush_control(&els, Rc::clone(&runtime));

    match runtime.init(survey).await {
        Ok(survey) => {
            gloo_console::log!("form initialized", survey.enketo_id);
            Ok(())
        }
        Err(err) => {
            let message = format!("{err:#}");
            runtime.ui.show_fatal_error(&message);
            Err(JsValue::from_str(&message))
        }
    }
}
