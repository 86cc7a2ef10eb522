use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A secondary instance referenced by the form, fetched alongside it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalInstance {
    pub id: String,
    pub src: String,
    #[serde(default)]
    pub xml: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Branding {
    pub source: String,
}

/// Default answer values keyed by node locator.
///
/// Values arrive in two layers: an own layer (per-launch, typically parsed
/// from `d[...]` query parameters) over an optional inherited layer of
/// application-configured defaults. Lookup falls through to the inherited
/// layer; instance merging reads the own layer only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultValues {
    #[serde(flatten)]
    own: BTreeMap<String, String>,
    #[serde(skip)]
    parent: Option<Box<DefaultValues>>,
}

impl DefaultValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty own layer over an inherited one.
    pub fn with_parent(parent: DefaultValues) -> Self {
        Self {
            own: BTreeMap::new(),
            parent: Some(Box::new(parent)),
        }
    }

    pub fn set(&mut self, path: impl Into<String>, value: impl Into<String>) {
        self.own.insert(path.into(), value.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.own
            .get(path)
            .map(String::as_str)
            .or_else(|| self.parent.as_deref().and_then(|p| p.get(path)))
    }

    /// Entries of the own layer only, in key order.
    pub fn own_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.own.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn has_own_entries(&self) -> bool {
        !self.own.is_empty()
    }
}

/// The form descriptor threaded through initialization. Created once per
/// page load from bootstrap parameters; each pipeline stage returns it with
/// more fields populated and must not clear what an earlier stage set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    pub enketo_id: String,
    #[serde(default)]
    pub defaults: DefaultValues,
    #[serde(default)]
    pub xform_url: Option<String>,
    #[serde(default)]
    pub form: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub external_data: Vec<ExternalInstance>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub max_size: Option<u64>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub media: Vec<String>,
    #[serde(default)]
    pub branding: Option<Branding>,
}

impl Survey {
    pub fn new(enketo_id: impl Into<String>) -> Self {
        Self {
            enketo_id: enketo_id.into(),
            ..Self::default()
        }
    }
}

/// What the rendering engine reports back after taking ownership of the
/// mounted form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerResult {
    #[serde(default)]
    pub languages: Vec<String>,
}
