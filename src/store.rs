use serde::Deserialize;

use crate::app::BaseApp;

/// An app entry from a store source list.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SourceAppsData {
    #[serde(rename = "bundleID")]
    pub bundle_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub itunes_lookup: String,
    #[serde(default)]
    pub link: String,
}

impl SourceAppsData {
    pub fn app_id(&self) -> u64 {
        app_id_from_lookup(&self.itunes_lookup)
    }
}

/// The numeric id is the last run of digits, provided the string ends with it.
///
/// `"https://itunes.apple.com/lookup?id=1234"` gives `1234`,
/// anything ending in a non-digit gives `0`.
pub fn app_id_from_lookup(lookup: &str) -> u64 {
    lookup
        .split(|c: char| !c.is_ascii_digit())
        .last()
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}

#[derive(Clone, Debug)]
pub enum Application {
    Base(BaseApp),
    Store(SourceAppsData),
}

impl Application {
    pub fn bundle_id(&self) -> &str {
        match self {
            Application::Base(base) => base.bundle_id(),
            Application::Store(store) => &store.bundle_id,
        }
    }
}
