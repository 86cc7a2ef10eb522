use crate::settings::Settings;
use ff_api_types::Survey;

/// Adopt a survey's declared submission size limit.
///
/// A positive limit overwrites whatever the settings currently hold; a
/// survey without one leaves the existing limit untouched.
pub fn update_max_size_setting(survey: &Survey, settings: &Settings) {
    if let Some(max_size) = survey.max_size.filter(|bytes| *bytes > 0) {
        settings.set_max_size(max_size);
    }
}
