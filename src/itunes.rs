use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ITunesResponse {
    #[serde(default)]
    pub result_count: usize,
    #[serde(default)]
    pub results: Vec<ITunesResult>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ITunesResult {
    pub track_id: u64,
    #[serde(default)]
    pub bundle_id: String,
    #[serde(default)]
    pub track_name: String,
    #[serde(default)]
    pub version: String,
}

impl ITunesResponse {
    /// `0` when nothing matched.
    pub fn track_id(&self) -> u64 {
        self.results.first().map_or(0, |result| result.track_id)
    }
}

/// Query `base?bundleId=<bundle_id>`.
///
/// Every failure is logged and reported as `None`.
pub async fn lookup(client: &Client, base: &str, bundle_id: &str) -> Option<ITunesResponse> {
    let request = client.get(base).query(&[("bundleId", bundle_id)]);
    debug!("Looking up {bundle_id}: {request:?}.");
    let response = match request.send().await {
        Ok(response) => response,
        Err(err) => {
            warn!("iTunes lookup for {bundle_id} failed: {err}.");
            return None;
        }
    };
    let status = response.status();
    if status != StatusCode::OK {
        warn!("iTunes lookup for {bundle_id}: status code error: {status}.");
        return None;
    }
    match response.json().await {
        Ok(itunes) => Some(itunes),
        Err(err) => {
            warn!("iTunes lookup for {bundle_id} returned unreadable JSON: {err}.");
            None
        }
    }
}

pub async fn track_id(client: &Client, base: &str, bundle_id: &str) -> u64 {
    lookup(client, base, bundle_id)
        .await
        .map_or(0, |itunes| itunes.track_id())
}
