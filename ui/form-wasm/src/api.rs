//! HTTP API client.
//!
//! Wraps `fetch` for JSON requests to the form server. `base_url()`
//! prefers the configured server URL and falls back to same-origin.
//! Extend by adding new request helpers or auth header injection.

use crate::state;
use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use ff_api_types::{Branding, ExternalInstance, Survey};
use ff_runtime_core::Connection;
use gloo_net::http::Request;
use serde::Deserialize;
use serde::de::DeserializeOwned;

pub fn base_url() -> String {
    let configured = state::config().server_url;
    if !configured.is_empty() {
        return configured.trim_end_matches('/').to_owned();
    }

    let location = crate::dom::window().location();
    let protocol = location.protocol().unwrap_or_else(|_| "https:".into());
    let host = location.host().unwrap_or_default();
    format!("{protocol}//{host}")
}

pub async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|err| anyhow!("fetch {url}: {err}"))?;
    if !response.ok() {
        bail!("{} {} for {url}", response.status(), response.status_text());
    }
    response
        .json::<T>()
        .await
        .map_err(|err| anyhow!("parse {url}: {err}"))
}

/// Fetch a URL for its side effect on the browser cache, discarding the
/// body.
pub async fn prefetch(url: &str) -> Result<()> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|err| anyhow!("fetch {url}: {err}"))?;
    if !response.ok() {
        bail!("{} {} for {url}", response.status(), response.status_text());
    }
    Ok(())
}

/// The server's transformed representation of one form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormParts {
    pub form: String,
    pub model: String,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub external_data: Vec<ExternalInstance>,
    #[serde(default)]
    pub branding: Option<Branding>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MaxSizeResponse {
    #[serde(default)]
    max_size: u64,
}

pub async fn fetch_form_parts(survey: &Survey) -> Result<FormParts> {
    let url = match &survey.xform_url {
        Some(xform_url) => format!(
            "{}/api/v1/transform/xform?xform={}",
            base_url(),
            String::from(js_sys::encode_uri_component(xform_url))
        ),
        None => format!("{}/api/v1/transform/{}", base_url(), survey.enketo_id),
    };
    fetch_json(&url).await
}

pub async fn fetch_max_size(survey: &Survey) -> Result<Option<u64>> {
    let url = format!("{}/api/v1/survey/{}/max-size", base_url(), survey.enketo_id);
    let response: MaxSizeResponse = fetch_json(&url).await?;
    Ok((response.max_size > 0).then_some(response.max_size))
}

/// Fold fetched form parts into the survey. The source URL is consumed
/// here; fields an earlier stage set stay put unless the server sent a
/// replacement.
pub fn merge_form_parts(mut survey: Survey, parts: FormParts) -> Survey {
    survey.xform_url = None;
    survey.form = Some(parts.form);
    survey.model = Some(parts.model);
    if parts.theme.is_some() {
        survey.theme = parts.theme;
    }
    if !parts.external_data.is_empty() {
        survey.external_data = parts.external_data;
    }
    if parts.branding.is_some() {
        survey.branding = parts.branding;
    }
    survey
}

pub struct HttpConnection;

#[async_trait(?Send)]
impl Connection for HttpConnection {
    async fn get_form_parts(&self, survey: Survey) -> Result<Survey> {
        let parts = fetch_form_parts(&survey).await?;
        Ok(merge_form_parts(survey, parts))
    }

    async fn get_maximum_submission_size(&self, mut survey: Survey) -> Result<Survey> {
        if let Some(max_size) = fetch_max_size(&survey).await? {
            survey.max_size = Some(max_size);
        }
        Ok(survey)
    }
}
