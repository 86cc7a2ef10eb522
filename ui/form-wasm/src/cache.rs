//! Offline caches.
//!
//! `WebApplicationCache` registers the service worker that makes the
//! page launchable offline and relays its update signals onto the
//! runtime event bus. `WebFormCache` keeps transformed form definitions,
//! the negotiated submission limit, and the media list in local storage,
//! refreshing them in the background when the network allows.

use crate::{api, dom, events};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use ff_api_types::{Branding, ExternalInstance, Survey};
use ff_runtime_core::{ApplicationCache, FormCache, RuntimeEventKind};
use gloo_storage::{LocalStorage, Storage};
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

const FORM_CACHE_PREFIX: &str = "fieldform.form.";

fn cache_key(enketo_id: &str) -> String {
    format!("{FORM_CACHE_PREFIX}{enketo_id}")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedForm {
    form: String,
    model: String,
    #[serde(default)]
    theme: Option<String>,
    #[serde(default)]
    external_data: Vec<ExternalInstance>,
    #[serde(default)]
    branding: Option<Branding>,
    #[serde(default)]
    max_size: Option<u64>,
    #[serde(default)]
    media: Vec<String>,
}

impl CachedForm {
    fn from_parts(parts: &api::FormParts) -> Self {
        Self {
            form: parts.form.clone(),
            model: parts.model.clone(),
            theme: parts.theme.clone(),
            external_data: parts.external_data.clone(),
            branding: parts.branding.clone(),
            max_size: None,
            media: Vec::new(),
        }
    }
}

fn update_cached(enketo_id: &str, update: impl FnOnce(&mut CachedForm)) {
    if let Ok(mut cached) = LocalStorage::get::<CachedForm>(cache_key(enketo_id)) {
        update(&mut cached);
        if let Err(err) = LocalStorage::set(cache_key(enketo_id), &cached) {
            gloo_console::warn!("failed to update cached form", err.to_string());
        }
    }
}

// ── Application cache ──

pub struct WebApplicationCache;

#[async_trait(?Send)]
impl ApplicationCache for WebApplicationCache {
    async fn init(&self, survey: Survey) -> Result<Survey> {
        let container = dom::window().navigator().service_worker();
        let registration = JsFuture::from(container.register("service-worker.js"))
            .await
            .map_err(|err| anyhow!("service worker registration failed: {err:?}"))?;

        if let Ok(registration) = registration.dyn_into::<web_sys::ServiceWorkerRegistration>() {
            let on_update = Closure::wrap(Box::new(move |_: web_sys::Event| {
                events::dispatch(RuntimeEventKind::ApplicationUpdated, None);
            }) as Box<dyn FnMut(web_sys::Event)>);
            registration.set_onupdatefound(Some(on_update.as_ref().unchecked_ref()));
            on_update.forget();
        }

        events::dispatch(RuntimeEventKind::OfflineLaunchCapable, Some(true));
        Ok(survey)
    }
}

// ── Form cache ──

pub struct WebFormCache;

#[async_trait(?Send)]
impl FormCache for WebFormCache {
    async fn init(&self, survey: Survey) -> Result<Survey> {
        match LocalStorage::get::<CachedForm>(cache_key(&survey.enketo_id)) {
            Ok(cached) => {
                // Serve the cached definition and look for a newer one
                // off the critical path.
                let enketo_id = survey.enketo_id.clone();
                let stale = cached.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    refresh_form(enketo_id, stale).await;
                });
                Ok(apply_cached(survey, cached))
            }
            Err(_) => {
                let parts = api::fetch_form_parts(&survey).await?;
                let cached = CachedForm::from_parts(&parts);
                if let Err(err) = LocalStorage::set(cache_key(&survey.enketo_id), &cached) {
                    gloo_console::warn!("failed to cache form definition", err.to_string());
                }
                Ok(api::merge_form_parts(survey, parts))
            }
        }
    }

    async fn update_max_submission_size(&self, mut survey: Survey) -> Result<Survey> {
        match api::fetch_max_size(&survey).await {
            Ok(Some(max_size)) => {
                survey.max_size = Some(max_size);
                update_cached(&survey.enketo_id, |cached| cached.max_size = Some(max_size));
            }
            Ok(None) => {}
            Err(err) => {
                // Offline launch: fall back to the last negotiated limit.
                gloo_console::debug!("max size refresh skipped", err.to_string());
                if survey.max_size.is_none() {
                    survey.max_size = LocalStorage::get::<CachedForm>(cache_key(&survey.enketo_id))
                        .ok()
                        .and_then(|cached| cached.max_size);
                }
            }
        }
        Ok(survey)
    }

    async fn update_media(&self, mut survey: Survey) -> Result<Survey> {
        let mut media = Vec::new();
        if let Some(form) = dom::query("form.or") {
            for el in dom::query_all_within(&form, "[src]") {
                if let Some(src) = el.get_attribute("src") {
                    if !src.is_empty() && !media.contains(&src) {
                        media.push(src);
                    }
                }
            }
        }

        // Warm the browser cache; a miss only degrades offline media.
        for url in &media {
            if let Err(err) = api::prefetch(url).await {
                gloo_console::warn!("media prefetch failed", url.as_str(), err.to_string());
            }
        }

        update_cached(&survey.enketo_id, |cached| cached.media = media.clone());
        survey.media = media;
        Ok(survey)
    }
}

fn apply_cached(mut survey: Survey, cached: CachedForm) -> Survey {
    survey.xform_url = None;
    survey.form = Some(cached.form);
    survey.model = Some(cached.model);
    if cached.theme.is_some() {
        survey.theme = cached.theme;
    }
    if !cached.external_data.is_empty() {
        survey.external_data = cached.external_data;
    }
    if cached.branding.is_some() {
        survey.branding = cached.branding;
    }
    if cached.max_size.is_some() {
        survey.max_size = cached.max_size;
    }
    survey
}

/// Compare the cached definition against the server's and announce an
/// update when they differ.
async fn refresh_form(enketo_id: String, cached: CachedForm) {
    let probe = Survey::new(enketo_id.clone());
    match api::fetch_form_parts(&probe).await {
        Ok(parts) => {
            if parts.form != cached.form || parts.model != cached.model {
                let mut updated = CachedForm::from_parts(&parts);
                updated.max_size = cached.max_size;
                updated.media = cached.media;
                if LocalStorage::set(cache_key(&enketo_id), &updated).is_ok() {
                    events::dispatch(RuntimeEventKind::FormUpdated, None);
                }
            }
        }
        Err(err) => {
            gloo_console::debug!("background form refresh skipped", err.to_string());
        }
    }
}
