use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{error::Result, io::save_file};

const FILE_NAME: &str = "preferences.toml";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct InstallPreferences {
    pub show_app_store_popup: bool,
}

impl Default for InstallPreferences {
    fn default() -> Self {
        Self {
            show_app_store_popup: true,
        }
    }
}

impl InstallPreferences {
    /// `<config dir>/preferences.toml`, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "ipa_helper").map(|dirs| dirs.config_dir().join(FILE_NAME))
    }

    /// A missing file means defaults.
    pub async fn load<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        match tokio::fs::read_to_string(path.as_ref()).await {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No preferences at {}, using defaults.", path.as_ref().display());
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn save<P>(&self, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let text = toml::to_string(self)?;
        save_file(path.as_ref(), text).await?;
        info!("Saved preferences to {}.", path.as_ref().display());
        Ok(())
    }
}
