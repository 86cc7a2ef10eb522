//! Collaborator seams.
//!
//! Each trait mirrors one external subsystem the pipelines call into.
//! Trait objects are held behind `Rc` and futures are `?Send`: the
//! runtime targets a single-threaded browser executor.

use anyhow::Result;
use async_trait::async_trait;
use ff_api_types::{ControllerResult, Survey};
use futures::future::LocalBoxFuture;

pub use ff_store::{InstanceStore, LastSavedRecord, StoreInitOptions};

/// Application-level offline cache (launch capability, app updates).
#[async_trait(?Send)]
pub trait ApplicationCache {
    async fn init(&self, survey: Survey) -> Result<Survey>;
}

/// Cache of form definitions, submission limits, and media.
#[async_trait(?Send)]
pub trait FormCache {
    async fn init(&self, survey: Survey) -> Result<Survey>;
    async fn update_max_submission_size(&self, survey: Survey) -> Result<Survey>;
    async fn update_media(&self, survey: Survey) -> Result<Survey>;
}

/// Direct network access to the form server.
#[async_trait(?Send)]
pub trait Connection {
    async fn get_form_parts(&self, survey: Survey) -> Result<Survey>;
    async fn get_maximum_submission_size(&self, survey: Survey) -> Result<Survey>;
}

/// The external rendering/validation engine. It takes ownership of the
/// mounted form and reports the languages the form declares.
#[async_trait(?Send)]
pub trait FormController {
    async fn init(&self, survey: &Survey, instance: Option<&str>) -> Result<ControllerResult>;
}

#[async_trait(?Send)]
pub trait Translator {
    async fn init(&self) -> Result<()>;
    async fn load_language(&self, language: &str) -> Result<()>;
    /// Localize every translation-marked element inside the mounted form.
    fn localize_form(&self);
    fn t(&self, key: &str) -> String;
}

/// Dialogs, theming, and user-visible status feedback.
#[async_trait(?Send)]
pub trait Ui {
    async fn swap_theme(&self, survey: &Survey) -> Result<()>;
    async fn confirm(&self, message: &str, heading: &str) -> bool;
    fn apply_print_style(&self);
    fn show_launch_status(&self, capable: bool);
    fn show_update_notice(&self);
    fn show_form_updated_notice(&self);
    fn show_fatal_error(&self, message: &str);
}

/// The minimal set of page mutations the pipelines perform directly.
pub trait FormDocument {
    /// Insert the form fragment immediately after the form-header anchor.
    fn mount_form(&self, html: &str) -> Result<()>;
    fn form_title(&self) -> Option<String>;
    fn set_page_title(&self, title: &str);
    fn has_brand_image(&self) -> bool;
    fn set_brand_source(&self, src: &str);
    fn set_brand_offline_source(&self, src: &str);
    fn show_brand_image(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeEventKind {
    OfflineLaunchCapable,
    ApplicationUpdated,
    FormUpdated,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeEvent {
    OfflineLaunchCapable { capable: bool },
    ApplicationUpdated,
    FormUpdated,
}

impl RuntimeEvent {
    pub fn kind(&self) -> RuntimeEventKind {
        match self {
            Self::OfflineLaunchCapable { .. } => RuntimeEventKind::OfflineLaunchCapable,
            Self::ApplicationUpdated => RuntimeEventKind::ApplicationUpdated,
            Self::FormUpdated => RuntimeEventKind::FormUpdated,
        }
    }
}

pub type EventHandler = Box<dyn Fn(&RuntimeEvent)>;

/// Page-lifecycle event subscriptions. One registration per kind per page
/// load; registration is synchronous.
pub trait EventBus {
    fn subscribe(&self, kind: RuntimeEventKind, handler: EventHandler);
}

/// Host-environment services: task spawning, timers, navigation.
pub trait Platform {
    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>);
    fn sleep_ms(&self, ms: u32) -> LocalBoxFuture<'static, ()>;
    /// Force a full page reload, abandoning all in-memory state.
    fn reload(&self);
}
