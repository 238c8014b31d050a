use log::{debug, warn};
use reqwest::{Client, StatusCode};
use select::{document::Document, predicate::Class};

const DEFINITION_CLASS: &str = "information-list__item__definition__item__definition";
const MACOS: &str = "macOS";

pub fn page_url(base: &str, app_id: u64) -> String {
    format!("{}/id{app_id}", base.trim_end_matches('/'))
}

/// Whether the store page's information list names macOS as a platform.
pub fn page_lists_macos(html: &str) -> bool {
    let document = Document::from(html);
    document
        .find(Class(DEFINITION_CLASS))
        .any(|node| node.text().contains(MACOS))
}

/// Any failure along the way counts as "not available on macOS".
pub async fn check_macos_compatibility(client: &Client, base: &str, app_id: u64) -> bool {
    let url = page_url(base, app_id);
    debug!("Checking {url} for a macOS release.");
    let response = match client.get(&url).send().await {
        Ok(response) => response,
        Err(err) => {
            warn!("{url}: {err}.");
            return false;
        }
    };
    if response.status() != StatusCode::OK {
        warn!("{url}: status code error: {}.", response.status());
        return false;
    }
    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("{url}: {err}.");
            return false;
        }
    };
    match std::str::from_utf8(&bytes) {
        Ok(html) => page_lists_macos(html),
        Err(err) => {
            warn!("{url}: body is not UTF-8: {err}.");
            false
        }
    }
}
