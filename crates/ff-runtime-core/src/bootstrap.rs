//! Controller handoff.
//!
//! The last shared stage of both pipelines: resolve launch defaults into
//! an instance, put the form fragment on the page, and hand both to the
//! rendering engine.

use crate::pipeline::Runtime;
use anyhow::{Result, anyhow};
use ff_api_types::Survey;
use ff_instance::prepare_instance;

impl Runtime {
    /// Mount the survey's form and hand it to the rendering engine.
    ///
    /// Returns the survey extended with the languages the engine found.
    /// Page title, print styling, and localization happen after the
    /// engine call; none of them hold up the returned future beyond the
    /// engine handoff itself.
    pub async fn init_form(&self, mut survey: Survey) -> Result<Survey> {
        let model = survey
            .model
            .as_deref()
            .ok_or_else(|| anyhow!("survey {} has no model", survey.enketo_id))?;
        let instance = prepare_instance(model, &self.settings.defaults)?;

        let form = survey
            .form
            .as_deref()
            .ok_or_else(|| anyhow!("survey {} has no form body", survey.enketo_id))?;
        self.document.mount_form(form)?;

        let result = self.controller.init(&survey, instance.as_deref()).await?;

        if let Some(title) = self.document.form_title() {
            self.document.set_page_title(&title);
        }
        if self.settings.print {
            self.ui.apply_print_style();
        }
        self.translator.localize_form();

        survey.languages = result.languages;
        Ok(survey)
    }
}
