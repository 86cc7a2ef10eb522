//! Dialogs and user-visible status feedback.

use crate::dom::{self, Elements};
use crate::theme;
use anyhow::Result;
use async_trait::async_trait;
use ff_api_types::Survey;
use ff_runtime_core::Ui;

pub struct WebGui {
    els: Elements,
}

impl WebGui {
    pub fn new(els: Elements) -> Self {
        Self { els }
    }

    fn feedback(&self, message: &str) {
        if let Some(bar) = &self.els.feedback_bar {
            bar.set_text_content(Some(message));
            dom::remove_class(bar, "hide");
        }
    }
}

#[async_trait(?Send)]
impl Ui for WebGui {
    async fn swap_theme(&self, survey: &Survey) -> Result<()> {
        theme::swap_theme(survey);
        Ok(())
    }

    async fn confirm(&self, message: &str, heading: &str) -> bool {
        let text = if heading.is_empty() {
            message.to_owned()
        } else {
            format!("{heading}\n\n{message}")
        };
        dom::window().confirm_with_message(&text).unwrap_or(false)
    }

    fn apply_print_style(&self) {
        theme::apply_print_style();
    }

    fn show_launch_status(&self, capable: bool) {
        if let Some(icon) = &self.els.offline_icon {
            if capable {
                dom::remove_class(icon, "not-available");
            } else {
                dom::add_class(icon, "not-available");
            }
        }
    }

    fn show_update_notice(&self) {
        self.feedback(
            "A new version of this application has been downloaded. \
             Refresh this page to load the updated version.",
        );
    }

    fn show_form_updated_notice(&self) {
        self.feedback("An updated version of this form is available. Refresh this page to load it.");
    }

    fn show_fatal_error(&self, message: &str) {
        gloo_console::error!("form initialization failed", message);
        if let Some(loader) = &self.els.loader {
            dom::add_class(loader, "fail");
        }
        // A half-mounted form must not look usable.
        if let Some(form) = dom::query("form.or") {
            dom::add_class(&form, "hide");
        }
        if let Some(bar) = &self.els.feedback_bar {
            dom::add_class(bar, "error");
        }
        self.feedback(message);
    }
}
