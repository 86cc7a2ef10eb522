//! Event wiring.
//!
//! Runtime lifecycle events travel as namespaced `CustomEvent`s on the
//! document, so the service worker glue and any host-page script can
//! raise them too. Also binds the emergency flush control.

use crate::dom::{self, Elements};
use ff_runtime_core::{EventBus, EventHandler, Runtime, RuntimeEvent, RuntimeEventKind};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

fn event_name(kind: RuntimeEventKind) -> &'static str {
    match kind {
        RuntimeEventKind::OfflineLaunchCapable => "fieldform:offline-launch-capable",
        RuntimeEventKind::ApplicationUpdated => "fieldform:application-updated",
        RuntimeEventKind::FormUpdated => "fieldform:form-updated",
    }
}

pub struct WebEventBus;

impl EventBus for WebEventBus {
    fn subscribe(&self, kind: RuntimeEventKind, handler: EventHandler) {
        let cb = Closure::wrap(Box::new(move |event: web_sys::CustomEvent| {
            let event = match kind {
                RuntimeEventKind::OfflineLaunchCapable => RuntimeEvent::OfflineLaunchCapable {
                    capable: event.detail().as_bool().unwrap_or(false),
                },
                RuntimeEventKind::ApplicationUpdated => RuntimeEvent::ApplicationUpdated,
                RuntimeEventKind::FormUpdated => RuntimeEvent::FormUpdated,
            };
            handler(&event);
        }) as Box<dyn FnMut(web_sys::CustomEvent)>);
        dom::document()
            .add_event_listener_with_callback(event_name(kind), cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
}

/// Raise a runtime event on the document.
pub fn dispatch(kind: RuntimeEventKind, detail: Option<bool>) {
    let init = web_sys::CustomEventInit::new();
    if let Some(detail) = detail {
        init.set_detail(&JsValue::from_bool(detail));
    }
    if let Ok(event) = web_sys::CustomEvent::new_with_event_init_dict(event_name(kind), &init) {
        let _ = dom::document().dispatch_event(&event);
    }
}

/// Wire the emergency flush control, when the page has one.
pub fn bind_flush_control(els: &Elements, runtime: Rc<Runtime>) {
    let Some(button) = els.flush_button.clone() else {
        return;
    };
    let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
        let runtime = Rc::clone(&runtime);
        wasm_bindgen_futures::spawn_local(async move {
            runtime.flush_and_reload().await;
        });
    }) as Box<dyn FnMut(_)>);
    button
        .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
        .unwrap();
    cb.forget();
}
