//! DOM element bindings.
//!
//! All page references are resolved once at startup. The form-header
//! anchor is a hard precondition of the host page; everything else is
//! cosmetic and bound tolerantly. To add new page elements, add a field
//! here and bind it in `Elements::bind()`.

use anyhow::{Result, anyhow};
use ff_runtime_core::FormDocument;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement};

// ── Helpers ──

pub fn document() -> Document {
    gloo_utils::document()
}

pub fn window() -> web_sys::Window {
    gloo_utils::window()
}

pub fn by_id(id: &str) -> Option<Element> {
    document().get_element_by_id(id)
}

pub fn query(selector: &str) -> Option<Element> {
    document().query_selector(selector).ok()?
}

/// Query all matching elements within a parent element.
pub fn query_all_within(parent: &Element, selector: &str) -> Vec<Element> {
    let Ok(list) = parent.query_selector_all(selector) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for index in 0..list.length() {
        if let Some(node) = list.item(index) {
            if let Ok(el) = node.dyn_into::<Element>() {
                out.push(el);
            }
        }
    }
    out
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn remove_class(el: &Element, cls: &str) {
    let _ = el.class_list().remove_1(cls);
}

// ── Elements struct ──

/// Page references used by the runtime.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    /// Anchor the form fragment is mounted after.
    pub form_header: Element,
    pub brand_image: Option<HtmlImageElement>,
    pub flush_button: Option<HtmlElement>,
    pub feedback_bar: Option<Element>,
    pub offline_icon: Option<Element>,
    pub loader: Option<Element>,
}

impl Elements {
    /// Resolve all page references. Call once after DOMContentLoaded.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            form_header: query(".form-header")
                .ok_or_else(|| JsValue::from_str("missing .form-header"))?,
            brand_image: query(".form-header__branding img")
                .and_then(|el| el.dyn_into::<HtmlImageElement>().ok()),
            flush_button: query(".flush-data").and_then(|el| el.dyn_into::<HtmlElement>().ok()),
            feedback_bar: by_id("feedback-bar"),
            offline_icon: query(".offline-enabled__icon"),
            loader: query(".main-loader"),
        })
    }
}

// ── FormDocument implementation ──

pub struct WebFormDocument {
    els: Elements,
}

impl WebFormDocument {
    pub fn new(els: Elements) -> Self {
        Self { els }
    }
}

impl FormDocument for WebFormDocument {
    fn mount_form(&self, html: &str) -> Result<()> {
        self.els
            .form_header
            .insert_adjacent_html("afterend", html)
            .map_err(|err| anyhow!("failed to mount the form fragment: {err:?}"))
    }

    fn form_title(&self) -> Option<String> {
        let title = query("#form-title")?.text_content()?;
        let title = title.trim().to_owned();
        if title.is_empty() { None } else { Some(title) }
    }

    fn set_page_title(&self, title: &str) {
        document().set_title(title);
    }

    fn has_brand_image(&self) -> bool {
        self.els.brand_image.is_some()
    }

    fn set_brand_source(&self, src: &str) {
        if let Some(img) = &self.els.brand_image {
            let _ = img.set_attribute("src", src);
        }
    }

    fn set_brand_offline_source(&self, src: &str) {
        if let Some(img) = &self.els.brand_image {
            let _ = img.set_attribute("data-offline-src", src);
        }
    }

    fn show_brand_image(&self) {
        if let Some(img) = &self.els.brand_image {
            remove_class(img, "hide");
        }
    }
}
