//! Bootstrap parameters and process-wide configuration.
//!
//! The host page ships an optional JSON config block; the launch URL
//! carries the form id, an optional source URL, and `d[...]` default
//! values. Query defaults form the own layer over the app-configured
//! ones, so per-launch values win and configured values still resolve.

use crate::dom;
use ff_api_types::{DefaultValues, Survey};
use ff_runtime_core::Settings;
use serde::Deserialize;
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub server_url: String,
    pub offline: bool,
    pub print: bool,
    pub default_max_size: Option<u64>,
    pub defaults: HashMap<String, String>,
}

thread_local! {
    static CONFIG: RefCell<AppConfig> = RefCell::new(AppConfig::default());
}

/// Parse the `#form-config` JSON block, falling back to defaults when it
/// is absent or malformed.
pub fn load_config() -> AppConfig {
    let Some(text) = dom::by_id("form-config").and_then(|el| el.text_content()) else {
        return AppConfig::default();
    };
    match serde_json::from_str(&text) {
        Ok(config) => config,
        Err(err) => {
            gloo_console::warn!("invalid form-config block", err.to_string());
            AppConfig::default()
        }
    }
}

pub fn set_config(config: AppConfig) {
    CONFIG.with(|c| *c.borrow_mut() = config);
}

pub fn config() -> AppConfig {
    CONFIG.with(|c| c.borrow().clone())
}

pub struct Bootstrap {
    pub survey: Survey,
    pub settings: Settings,
}

/// Build the initial survey and settings from the config block and the
/// launch URL.
pub fn bootstrap(config: &AppConfig) -> Bootstrap {
    let mut inherited = DefaultValues::new();
    for (path, value) in &config.defaults {
        inherited.set(path, value);
    }
    let mut defaults = DefaultValues::with_parent(inherited);

    let mut enketo_id = String::new();
    let mut xform_url = None;
    let mut print = config.print;

    let search = dom::window().location().search().unwrap_or_default();
    for (key, value) in parse_query(&search) {
        if let Some(path) = key.strip_prefix("d[").and_then(|rest| rest.strip_suffix(']')) {
            defaults.set(path, value);
        } else {
            match key.as_str() {
                "id" => enketo_id = value,
                "xform" => xform_url = Some(value),
                "print" => print = value == "true",
                _ => {}
            }
        }
    }

    if enketo_id.is_empty() {
        // Path-style launch: /x/<enketoId>
        enketo_id = dom::window()
            .location()
            .pathname()
            .ok()
            .and_then(|path| {
                path.rsplit('/')
                    .find(|segment| !segment.is_empty())
                    .map(str::to_owned)
            })
            .unwrap_or_default();
    }

    let settings = Settings::new(
        config.offline,
        print,
        defaults.clone(),
        config.default_max_size,
    );
    let survey = Survey {
        enketo_id,
        defaults,
        xform_url,
        ..Survey::default()
    };
    Bootstrap { survey, settings }
}

fn parse_query(search: &str) -> Vec<(String, String)> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            Some((decode_component(key)?, decode_component(value)?))
        })
        .collect()
}

fn decode_component(raw: &str) -> Option<String> {
    js_sys::decode_uri_component(&raw.replace('+', " "))
        .ok()
        .map(|decoded| String::from(decoded))
}
