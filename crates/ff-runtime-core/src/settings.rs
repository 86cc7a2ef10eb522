use ff_api_types::DefaultValues;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide runtime configuration, built once from bootstrap
/// parameters and shared with every pipeline stage.
///
/// All fields are fixed for the lifetime of the page except `max_size`,
/// which the submission size policy overwrites when a survey declares its
/// own limit. The setter is crate-private so the policy stays the only
/// writer.
pub struct Settings {
    pub offline: bool,
    pub print: bool,
    pub defaults: DefaultValues,
    max_size: AtomicU64,
}

impl Settings {
    pub fn new(
        offline: bool,
        print: bool,
        defaults: DefaultValues,
        max_size: Option<u64>,
    ) -> Self {
        Self {
            offline,
            print,
            defaults,
            max_size: AtomicU64::new(max_size.unwrap_or(0)),
        }
    }

    /// The current submission size limit in bytes, if any was negotiated
    /// or configured.
    pub fn max_size(&self) -> Option<u64> {
        match self.max_size.load(Ordering::Relaxed) {
            0 => None,
            bytes => Some(bytes),
        }
    }

    pub(crate) fn set_max_size(&self, bytes: u64) {
        self.max_size.store(bytes, Ordering::Relaxed);
    }
}
