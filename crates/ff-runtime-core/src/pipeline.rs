//! Startup pipelines.
//!
//! A `Runtime` owns one of every collaborator and runs exactly one
//! pipeline per page load. Stages run strictly in sequence: each awaits
//! the previous stage's survey before starting, and the first failed
//! await aborts the rest and surfaces to the caller.

use crate::branding::add_branding;
use crate::policy::update_max_size_setting;
use crate::settings::Settings;
use crate::traits::{
    ApplicationCache, Connection, EventBus, FormCache, FormController, FormDocument,
    InstanceStore, Platform, RuntimeEvent, RuntimeEventKind, StoreInitOptions, Translator, Ui,
};
use anyhow::Result;
use ff_api_types::Survey;
use std::rc::Rc;
use tracing::{debug, warn};

pub struct Runtime {
    pub settings: Rc<Settings>,
    pub app_cache: Rc<dyn ApplicationCache>,
    pub form_cache: Rc<dyn FormCache>,
    pub connection: Rc<dyn Connection>,
    pub store: Rc<dyn InstanceStore>,
    pub controller: Rc<dyn FormController>,
    pub translator: Rc<dyn Translator>,
    pub ui: Rc<dyn Ui>,
    pub document: Rc<dyn FormDocument>,
    pub events: Rc<dyn EventBus>,
    pub platform: Rc<dyn Platform>,
}

impl Runtime {
    /// Initialize the survey in the mode the settings dictate.
    pub async fn init(&self, survey: Survey) -> Result<Survey> {
        if self.settings.offline {
            self.init_offline(survey).await
        } else {
            self.init_online(survey).await
        }
    }

    async fn init_offline(&self, mut survey: Survey) -> Result<Survey> {
        debug!("initializing {} in offline-capable mode", survey.enketo_id);

        // Listeners must be attached before the caches can emit anything.
        self.register_app_cache_handlers();

        // Offline launches resolve the form from the cache, never from a
        // direct URL.
        survey.xform_url = None;

        let survey = self.app_cache.init(survey).await?;
        self.translator.init().await?;
        let survey = self.form_cache.init(survey).await?;
        add_branding(&survey, self.document.as_ref(), self.settings.offline);
        self.ui.swap_theme(&survey).await?;
        let survey = self.form_cache.update_max_submission_size(survey).await?;
        update_max_size_setting(&survey, &self.settings);
        let survey = self.init_form(survey).await?;

        // Language bundles are only needed once the user switches away
        // from the default, so the loads are issued without holding up
        // the remaining stages.
        for language in &survey.languages {
            let translator = Rc::clone(&self.translator);
            let language = language.clone();
            self.platform.spawn_local(Box::pin(async move {
                if let Err(err) = translator.load_language(&language).await {
                    warn!("failed to load translation bundle for {language}: {err:#}");
                }
            }));
        }

        let survey = self.form_cache.update_media(survey).await?;
        self.register_form_cache_handlers();
        Ok(survey)
    }

    async fn init_online(&self, survey: Survey) -> Result<Survey> {
        debug!("initializing {} in online mode", survey.enketo_id);

        // The record store only backs last-saved convenience here; a
        // broken backend must not keep the form from loading.
        if let Err(err) = self
            .store
            .init(StoreInitOptions { fail_silently: true })
            .await
        {
            warn!("record store unavailable, continuing without it: {err:#}");
        }

        self.translator.init().await?;
        let survey = self.connection.get_form_parts(survey).await?;
        add_branding(&survey, self.document.as_ref(), self.settings.offline);
        self.ui.swap_theme(&survey).await?;
        let survey = self.connection.get_maximum_submission_size(survey).await?;
        update_max_size_setting(&survey, &self.settings);
        self.init_form(survey).await
    }

    fn register_app_cache_handlers(&self) {
        let ui = Rc::clone(&self.ui);
        self.events.subscribe(
            RuntimeEventKind::OfflineLaunchCapable,
            Box::new(move |event| {
                if let RuntimeEvent::OfflineLaunchCapable { capable } = event {
                    ui.show_launch_status(*capable);
                }
            }),
        );
        let ui = Rc::clone(&self.ui);
        self.events.subscribe(
            RuntimeEventKind::ApplicationUpdated,
            Box::new(move |_| ui.show_update_notice()),
        );
    }

    fn register_form_cache_handlers(&self) {
        let ui = Rc::clone(&self.ui);
        self.events.subscribe(
            RuntimeEventKind::FormUpdated,
            Box::new(move |_| ui.show_form_updated_notice()),
        );
    }
}
