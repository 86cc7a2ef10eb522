use crate::traits::FormDocument;
use ff_api_types::Survey;

/// Apply survey branding to the page's brand image slot.
///
/// Without custom branding the slot is only un-hidden, leaving the
/// default brand in place. With branding, online mode points the visible
/// source straight at the branding URL; offline mode parks the URL on the
/// offline source attribute and blanks the visible source so the browser
/// never fetches it directly. A page without the slot is left alone.
pub fn add_branding(survey: &Survey, document: &dyn FormDocument, offline: bool) {
    if !document.has_brand_image() {
        return;
    }
    if let Some(branding) = &survey.branding {
        if offline {
            document.set_brand_offline_source(&branding.source);
            document.set_brand_source("");
        } else {
            document.set_brand_source(&branding.source);
        }
    }
    document.show_brand_image();
}
