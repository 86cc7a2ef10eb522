//! Theme and print styling.
//!
//! Themes swap by rewriting the dedicated stylesheet link and the body
//! class; an unknown theme name falls back to the default so a survey
//! can never reference styling the deployment does not ship.

use crate::dom;
use ff_api_types::Survey;

const THEMES: [&str; 4] = ["kobo", "formhub", "grid", "plain"];
const DEFAULT_THEME: &str = "kobo";

pub fn swap_theme(survey: &Survey) {
    let requested = survey.theme.as_deref().unwrap_or(DEFAULT_THEME);
    let theme = if THEMES.contains(&requested) {
        requested
    } else {
        DEFAULT_THEME
    };

    if let Some(link) = dom::query("link[rel=\"stylesheet\"][data-theme-style]") {
        let _ = link.set_attribute("href", &format!("css/theme-{theme}.css"));
        let _ = link.set_attribute("data-theme-style", theme);
    }

    if let Some(body) = dom::document().body() {
        for candidate in THEMES {
            dom::remove_class(&body, &format!("theme-{candidate}"));
        }
        dom::add_class(&body, &format!("theme-{theme}"));
    }
}

pub fn apply_print_style() {
    if let Some(form) = dom::query("form.or") {
        dom::add_class(&form, "print");
    }
    // Promote the print stylesheet so the on-screen view matches paper.
    if let Some(link) = dom::query("link[media=\"print\"]") {
        let _ = link.set_attribute("media", "all");
    }
}
