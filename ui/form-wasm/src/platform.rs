//! Host-environment services: task spawning, timers, navigation.

use crate::dom;
use ff_runtime_core::Platform;
use futures::future::LocalBoxFuture;
use gloo_timers::future::TimeoutFuture;

pub struct WebPlatform;

impl Platform for WebPlatform {
    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn sleep_ms(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
        Box::pin(TimeoutFuture::new(ms))
    }

    fn reload(&self) {
        let _ = dom::window().location().reload();
    }
}
