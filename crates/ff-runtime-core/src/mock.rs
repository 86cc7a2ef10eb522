//! Recording fakes for every collaborator seam.
//!
//! All mocks share one call log so tests can assert cross-collaborator
//! ordering, not just per-collaborator behavior.

use crate::settings::Settings;
use crate::traits::{
    ApplicationCache, Connection, EventBus, EventHandler, FormCache, FormController,
    FormDocument, InstanceStore, LastSavedRecord, Platform, RuntimeEvent, RuntimeEventKind,
    StoreInitOptions, Translator, Ui,
};
use crate::Runtime;
use anyhow::{Result, bail};
use async_trait::async_trait;
use ff_api_types::{ControllerResult, DefaultValues, ExternalInstance, Survey};
use futures::future::LocalBoxFuture;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub(crate) const MODEL: &str =
    "<instance><data><el1/><el2>default</el2></data></instance>";

pub(crate) type CallLog = Rc<RefCell<Vec<String>>>;

fn record(log: &CallLog, entry: impl Into<String>) {
    log.borrow_mut().push(entry.into());
}

pub(crate) struct MockAppCache {
    log: CallLog,
    pub fail: Cell<bool>,
}

#[async_trait(?Send)]
impl ApplicationCache for MockAppCache {
    async fn init(&self, survey: Survey) -> Result<Survey> {
        record(&self.log, "app_cache.init");
        if self.fail.get() {
            bail!("application cache unavailable");
        }
        Ok(survey)
    }
}

pub(crate) struct MockFormCache {
    log: CallLog,
    pub fail_init: Cell<bool>,
}

#[async_trait(?Send)]
impl FormCache for MockFormCache {
    async fn init(&self, mut survey: Survey) -> Result<Survey> {
        record(&self.log, "form_cache.init");
        if self.fail_init.get() {
            bail!("form definition cache unavailable");
        }
        survey.form = Some(
            "<form class=\"or\"><h3 id=\"form-title\">Household Survey</h3></form>".into(),
        );
        survey.model = Some(MODEL.into());
        survey.theme = Some("grid".into());
        survey.external_data = vec![ExternalInstance {
            id: "cities".into(),
            src: "jr://file/cities.xml".into(),
            xml: Some("<root/>".into()),
        }];
        Ok(survey)
    }

    async fn update_max_submission_size(&self, mut survey: Survey) -> Result<Survey> {
        record(&self.log, "form_cache.update_max_submission_size");
        survey.max_size = Some(5_000_000);
        Ok(survey)
    }

    async fn update_media(&self, mut survey: Survey) -> Result<Survey> {
        record(&self.log, "form_cache.update_media");
        survey.media = vec!["/media/logo.png".into()];
        Ok(survey)
    }
}

pub(crate) struct MockConnection {
    log: CallLog,
    pub fail_form_parts: Cell<bool>,
}

#[async_trait(?Send)]
impl Connection for MockConnection {
    async fn get_form_parts(&self, mut survey: Survey) -> Result<Survey> {
        record(&self.log, "connection.get_form_parts");
        if self.fail_form_parts.get() {
            bail!("form server unreachable");
        }
        survey.xform_url = None;
        survey.form = Some(
            "<form class=\"or\"><h3 id=\"form-title\">Household Survey</h3></form>".into(),
        );
        survey.model = Some(MODEL.into());
        survey.theme = Some("grid".into());
        Ok(survey)
    }

    async fn get_maximum_submission_size(&self, mut survey: Survey) -> Result<Survey> {
        record(&self.log, "connection.get_maximum_submission_size");
        survey.max_size = Some(10_000_000);
        Ok(survey)
    }
}

pub(crate) struct MockStore {
    log: CallLog,
    pub fail_init: Cell<bool>,
    pub fail_flush: Cell<bool>,
    pub hang_flush: Cell<bool>,
}

#[async_trait(?Send)]
impl InstanceStore for MockStore {
    async fn init(&self, _options: StoreInitOptions) -> Result<()> {
        record(&self.log, "store.init");
        if self.fail_init.get() {
            bail!("storage backend unavailable");
        }
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        record(&self.log, "store.flush");
        if self.hang_flush.get() {
            futures::future::pending::<()>().await;
        }
        if self.fail_flush.get() {
            bail!("flush failed");
        }
        Ok(())
    }

    async fn save_last_saved(&self, _record: LastSavedRecord) -> Result<()> {
        record(&self.log, "store.save_last_saved");
        Ok(())
    }

    async fn load_last_saved(&self, _enketo_id: &str) -> Result<Option<LastSavedRecord>> {
        record(&self.log, "store.load_last_saved");
        Ok(None)
    }
}

pub(crate) struct MockController {
    log: CallLog,
    pub seen_instance: RefCell<Option<Option<String>>>,
}

#[async_trait(?Send)]
impl FormController for MockController {
    async fn init(&self, _survey: &Survey, instance: Option<&str>) -> Result<ControllerResult> {
        record(&self.log, "controller.init");
        *self.seen_instance.borrow_mut() = Some(instance.map(str::to_owned));
        Ok(ControllerResult {
            languages: vec!["en".into(), "fr".into()],
        })
    }
}

pub(crate) struct MockTranslator {
    log: CallLog,
}

#[async_trait(?Send)]
impl Translator for MockTranslator {
    async fn init(&self) -> Result<()> {
        record(&self.log, "translator.init");
        Ok(())
    }

    async fn load_language(&self, language: &str) -> Result<()> {
        record(&self.log, format!("translator.load_language:{language}"));
        Ok(())
    }

    fn localize_form(&self) {
        record(&self.log, "translator.localize_form");
    }

    fn t(&self, key: &str) -> String {
        key.to_owned()
    }
}

pub(crate) struct MockUi {
    log: CallLog,
    pub confirm_answer: Cell<bool>,
}

#[async_trait(?Send)]
impl Ui for MockUi {
    async fn swap_theme(&self, _survey: &Survey) -> Result<()> {
        record(&self.log, "ui.swap_theme");
        Ok(())
    }

    async fn confirm(&self, _message: &str, _heading: &str) -> bool {
        record(&self.log, "ui.confirm");
        self.confirm_answer.get()
    }

    fn apply_print_style(&self) {
        record(&self.log, "ui.apply_print_style");
    }

    fn show_launch_status(&self, capable: bool) {
        record(&self.log, format!("ui.show_launch_status:{capable}"));
    }

    fn show_update_notice(&self) {
        record(&self.log, "ui.show_update_notice");
    }

    fn show_form_updated_notice(&self) {
        record(&self.log, "ui.show_form_updated_notice");
    }

    fn show_fatal_error(&self, message: &str) {
        record(&self.log, format!("ui.show_fatal_error:{message}"));
    }
}

pub(crate) struct MockDocument {
    log: CallLog,
    pub brand_present: Cell<bool>,
    pub brand_hidden: Cell<bool>,
    pub brand_src: RefCell<Option<String>>,
    pub brand_offline_src: RefCell<Option<String>>,
    pub mounted: RefCell<Option<String>>,
    pub title: RefCell<Option<String>>,
}

impl MockDocument {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            brand_present: Cell::new(true),
            brand_hidden: Cell::new(true),
            brand_src: RefCell::new(None),
            brand_offline_src: RefCell::new(None),
            mounted: RefCell::new(None),
            title: RefCell::new(Some("Household Survey".into())),
        }
    }
}

impl FormDocument for MockDocument {
    fn mount_form(&self, html: &str) -> Result<()> {
        record(&self.log, "document.mount_form");
        *self.mounted.borrow_mut() = Some(html.to_owned());
        Ok(())
    }

    fn form_title(&self) -> Option<String> {
        self.title.borrow().clone()
    }

    fn set_page_title(&self, title: &str) {
        record(&self.log, format!("document.set_page_title:{title}"));
    }

    fn has_brand_image(&self) -> bool {
        self.brand_present.get()
    }

    fn set_brand_source(&self, src: &str) {
        record(&self.log, "document.set_brand_source");
        *self.brand_src.borrow_mut() = Some(src.to_owned());
    }

    fn set_brand_offline_source(&self, src: &str) {
        record(&self.log, "document.set_brand_offline_source");
        *self.brand_offline_src.borrow_mut() = Some(src.to_owned());
    }

    fn show_brand_image(&self) {
        record(&self.log, "document.show_brand_image");
        self.brand_hidden.set(false);
    }
}

pub(crate) struct MockEventBus {
    log: CallLog,
    handlers: RefCell<Vec<(RuntimeEventKind, EventHandler)>>,
}

impl MockEventBus {
    fn kind_name(kind: RuntimeEventKind) -> &'static str {
        match kind {
            RuntimeEventKind::OfflineLaunchCapable => "offline-launch-capable",
            RuntimeEventKind::ApplicationUpdated => "application-updated",
            RuntimeEventKind::FormUpdated => "form-updated",
        }
    }

    pub fn emit(&self, event: &RuntimeEvent) {
        for (kind, handler) in self.handlers.borrow().iter() {
            if *kind == event.kind() {
                handler(event);
            }
        }
    }
}

impl EventBus for MockEventBus {
    fn subscribe(&self, kind: RuntimeEventKind, handler: EventHandler) {
        record(&self.log, format!("events.subscribe:{}", Self::kind_name(kind)));
        self.handlers.borrow_mut().push((kind, handler));
    }
}

pub(crate) struct MockPlatform {
    log: CallLog,
    spawned: RefCell<Vec<LocalBoxFuture<'static, ()>>>,
    pub sleep_ready: Cell<bool>,
}

impl MockPlatform {
    /// Drive everything handed to `spawn_local` to completion.
    pub async fn run_spawned(&self) {
        let tasks: Vec<_> = self.spawned.borrow_mut().drain(..).collect();
        for task in tasks {
            task.await;
        }
    }
}

impl Platform for MockPlatform {
    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        record(&self.log, "platform.spawn");
        self.spawned.borrow_mut().push(task);
    }

    fn sleep_ms(&self, _ms: u32) -> LocalBoxFuture<'static, ()> {
        if self.sleep_ready.get() {
            Box::pin(futures::future::ready(()))
        } else {
            Box::pin(futures::future::pending())
        }
    }

    fn reload(&self) {
        record(&self.log, "platform.reload");
    }
}

pub(crate) struct Harness {
    pub log: CallLog,
    pub app_cache: Rc<MockAppCache>,
    pub form_cache: Rc<MockFormCache>,
    pub connection: Rc<MockConnection>,
    pub store: Rc<MockStore>,
    pub controller: Rc<MockController>,
    pub translator: Rc<MockTranslator>,
    pub ui: Rc<MockUi>,
    pub document: Rc<MockDocument>,
    pub events: Rc<MockEventBus>,
    pub platform: Rc<MockPlatform>,
}

impl Harness {
    pub fn new() -> Self {
        let log: CallLog = Rc::new(RefCell::new(Vec::new()));
        Self {
            app_cache: Rc::new(MockAppCache {
                log: Rc::clone(&log),
                fail: Cell::new(false),
            }),
            form_cache: Rc::new(MockFormCache {
                log: Rc::clone(&log),
                fail_init: Cell::new(false),
            }),
            connection: Rc::new(MockConnection {
                log: Rc::clone(&log),
                fail_form_parts: Cell::new(false),
            }),
            store: Rc::new(MockStore {
                log: Rc::clone(&log),
                fail_init: Cell::new(false),
                fail_flush: Cell::new(false),
                hang_flush: Cell::new(false),
            }),
            controller: Rc::new(MockController {
                log: Rc::clone(&log),
                seen_instance: RefCell::new(None),
            }),
            translator: Rc::new(MockTranslator {
                log: Rc::clone(&log),
            }),
            ui: Rc::new(MockUi {
                log: Rc::clone(&log),
                confirm_answer: Cell::new(true),
            }),
            document: Rc::new(MockDocument::new(Rc::clone(&log))),
            events: Rc::new(MockEventBus {
                log: Rc::clone(&log),
                handlers: RefCell::new(Vec::new()),
            }),
            platform: Rc::new(MockPlatform {
                log: Rc::clone(&log),
                spawned: RefCell::new(Vec::new()),
                sleep_ready: Cell::new(false),
            }),
            log,
        }
    }

    pub fn runtime_with(&self, offline: bool, print: bool, defaults: DefaultValues) -> Runtime {
        Runtime {
            settings: Rc::new(Settings::new(offline, print, defaults, None)),
            app_cache: Rc::clone(&self.app_cache) as Rc<dyn ApplicationCache>,
            form_cache: Rc::clone(&self.form_cache) as Rc<dyn FormCache>,
            connection: Rc::clone(&self.connection) as Rc<dyn Connection>,
            store: Rc::clone(&self.store) as Rc<dyn InstanceStore>,
            controller: Rc::clone(&self.controller) as Rc<dyn FormController>,
            translator: Rc::clone(&self.translator) as Rc<dyn Translator>,
            ui: Rc::clone(&self.ui) as Rc<dyn Ui>,
            document: Rc::clone(&self.document) as Rc<dyn FormDocument>,
            events: Rc::clone(&self.events) as Rc<dyn EventBus>,
            platform: Rc::clone(&self.platform) as Rc<dyn Platform>,
        }
    }

    pub fn offline_runtime(&self) -> Runtime {
        self.runtime_with(true, false, DefaultValues::new())
    }

    pub fn online_runtime(&self) -> Runtime {
        self.runtime_with(false, false, DefaultValues::new())
    }

    pub fn entries(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}
