//! Translation bundles and markup localization.
//!
//! Bundles are flat key/value JSON fetched per language and kept in a
//! thread-local map. Elements carrying `data-i18n` inside the mounted
//! form get their text swapped for the active language's value; unknown
//! keys fall back to the key itself.

use crate::{api, dom};
use anyhow::Result;
use async_trait::async_trait;
use ff_runtime_core::Translator;
use std::cell::RefCell;
use std::collections::HashMap;

thread_local! {
    static BUNDLES: RefCell<HashMap<String, HashMap<String, String>>> =
        RefCell::new(HashMap::new());
    static ACTIVE: RefCell<String> = RefCell::new(String::from("en"));
}

fn bundle_url(language: &str) -> String {
    format!("{}/locales/{language}.json", api::base_url())
}

pub struct WebTranslator;

#[async_trait(?Send)]
impl Translator for WebTranslator {
    async fn init(&self) -> Result<()> {
        let language = dom::window()
            .navigator()
            .language()
            .unwrap_or_else(|| "en".into());
        let language = language.split('-').next().unwrap_or("en").to_owned();
        ACTIVE.with(|active| *active.borrow_mut() = language.clone());

        if let Err(err) = self.load_language(&language).await {
            // Untranslated keys still render; don't hold up the form.
            gloo_console::warn!(
                "translation bundle unavailable",
                language.as_str(),
                err.to_string()
            );
        }
        Ok(())
    }

    async fn load_language(&self, language: &str) -> Result<()> {
        let loaded = BUNDLES.with(|bundles| bundles.borrow().contains_key(language));
        if loaded {
            return Ok(());
        }
        let bundle: HashMap<String, String> = api::fetch_json(&bundle_url(language)).await?;
        BUNDLES.with(|bundles| {
            bundles.borrow_mut().insert(language.to_owned(), bundle);
        });
        Ok(())
    }

    fn localize_form(&self) {
        let Some(form) = dom::query("form.or") else {
            return;
        };
        for el in dom::query_all_within(&form, "[data-i18n]") {
            if let Some(key) = el.get_attribute("data-i18n") {
                el.set_text_content(Some(&self.t(&key)));
            }
        }
    }

    fn t(&self, key: &str) -> String {
        let active = ACTIVE.with(|a| a.borrow().clone());
        BUNDLES
            .with(|bundles| {
                bundles
                    .borrow()
                    .get(&active)
                    .and_then(|bundle| bundle.get(key))
                    .cloned()
            })
            .unwrap_or_else(|| key.to_owned())
    }
}
