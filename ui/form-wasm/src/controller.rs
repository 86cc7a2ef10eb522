//! Bridge to the rendering engine.
//!
//! The host page ships the engine as `window.formEngine`; it renders,
//! validates, and navigates the mounted form. This adapter marshals the
//! handoff contract across the JS boundary and hands back the languages
//! the engine discovered.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use ff_api_types::{ControllerResult, ExternalInstance, Survey};
use ff_runtime_core::FormController;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["formEngine"], js_name = init, catch)]
    fn form_engine_init(input: &JsValue) -> Result<js_sys::Promise, JsValue>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EngineInput<'a> {
    model_str: &'a str,
    instance_str: Option<&'a str>,
    external: &'a [ExternalInstance],
    survey: &'a Survey,
}

pub struct EngineController;

#[async_trait(?Send)]
impl FormController for EngineController {
    async fn init(&self, survey: &Survey, instance: Option<&str>) -> Result<ControllerResult> {
        let input = EngineInput {
            model_str: survey.model.as_deref().unwrap_or_default(),
            instance_str: instance,
            external: &survey.external_data,
            survey,
        };
        let input = serde_wasm_bindgen::to_value(&input)
            .map_err(|err| anyhow!("engine input marshalling failed: {err}"))?;

        let promise =
            form_engine_init(&input).map_err(|err| anyhow!("engine rejected the form: {err:?}"))?;
        let resolved = JsFuture::from(promise)
            .await
            .map_err(|err| anyhow!("engine initialization failed: {err:?}"))?;

        serde_wasm_bindgen::from_value(resolved)
            .map_err(|err| anyhow!("engine result unmarshalling failed: {err}"))
    }
}
