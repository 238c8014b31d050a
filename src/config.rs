use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const TIMEOUT_MULTIPLIER: u32 = 5;

pub const LOOKUP_URL: &str = "https://itunes.apple.com/lookup";
pub const STORE_PAGE_URL: &str = "https://apps.apple.com/us/app";
pub const STORE_DEEP_LINK: &str = "itms-apps://apps.apple.com/app";

/// Locations of the external executables everything is delegated to.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Tools {
    pub unzip: PathBuf,
    pub zip: PathBuf,
    pub xattr: PathBuf,
    pub plutil: PathBuf,
    pub open: PathBuf,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            unzip: "/usr/bin/unzip".into(),
            zip: "/usr/bin/zip".into(),
            xattr: "/usr/bin/xattr".into(),
            plutil: "/usr/bin/plutil".into(),
            open: "/usr/bin/open".into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub tools: Tools,
    pub lookup_url: String,
    pub store_page_url: String,
    pub store_deep_link: String,
    pub documents_dir: Option<PathBuf>,
    pub preferences_path: Option<PathBuf>,
    pub connection_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tools: Tools::default(),
            lookup_url: LOOKUP_URL.to_owned(),
            store_page_url: STORE_PAGE_URL.to_owned(),
            store_deep_link: STORE_DEEP_LINK.to_owned(),
            documents_dir: None,
            preferences_path: None,
            connection_timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
        }
    }
}

impl Config {
    pub async fn load<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = tokio::fs::read_to_string(path.as_ref()).await?;
        let config = toml::from_str(&text)?;
        debug!("Loaded {config:#?} from {}.", path.as_ref().display());
        Ok(config)
    }

    pub fn tools(self, tools: Tools) -> Self {
        Self { tools, ..self }
    }

    pub fn lookup_url(self, lookup_url: String) -> Self {
        Self { lookup_url, ..self }
    }

    pub fn store_page_url(self, store_page_url: String) -> Self {
        Self {
            store_page_url,
            ..self
        }
    }

    pub fn store_deep_link(self, store_deep_link: String) -> Self {
        Self {
            store_deep_link,
            ..self
        }
    }

    pub fn documents_dir(self, documents_dir: PathBuf) -> Self {
        Self {
            documents_dir: Some(documents_dir),
            ..self
        }
    }

    pub fn preferences_path(self, preferences_path: PathBuf) -> Self {
        Self {
            preferences_path: Some(preferences_path),
            ..self
        }
    }

    pub fn connection_timeout(self, timeout: Duration) -> Self {
        Self {
            connection_timeout_ms: timeout.as_millis() as u64,
            ..self
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_ms)
    }

    pub fn client(&self) -> reqwest::Result<Client> {
        client_with_timeout(self.timeout())
    }
}

pub fn client_with_timeout(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .connect_timeout(timeout)
        .timeout(timeout * TIMEOUT_MULTIPLIER)
        .build()
}
