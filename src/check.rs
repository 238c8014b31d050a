use std::path::PathBuf;

use log::{debug, info, warn};
use reqwest::Client;
use tokio::{
    runtime::{Handle, RuntimeFlavor},
    task::block_in_place,
};

use crate::{
    alert::{Alert, AlertResponse, Choice, Prompt},
    compat::check_macos_compatibility,
    config::Config,
    itunes,
    preferences::InstallPreferences,
    shell,
    store::Application,
};

/// Decides whether an install should stop because the app has an official
/// macOS release.
#[derive(Debug)]
pub struct OfficialCheck<P> {
    client: Client,
    config: Config,
    preferences: InstallPreferences,
    preferences_path: Option<PathBuf>,
    prompt: P,
}

impl<P> OfficialCheck<P>
where
    P: Prompt,
{
    pub fn new(client: Client, config: Config, prompt: P) -> Self {
        Self {
            client,
            config,
            preferences: InstallPreferences::default(),
            preferences_path: None,
            prompt,
        }
    }

    /// Where a suppressed prompt is persisted; `None` keeps it in memory.
    pub fn preferences(self, preferences: InstallPreferences, path: Option<PathBuf>) -> Self {
        Self {
            preferences,
            preferences_path: path,
            ..self
        }
    }

    pub fn current_preferences(&self) -> &InstallPreferences {
        &self.preferences
    }

    pub fn into_prompt(self) -> P {
        self.prompt
    }

    pub async fn app_id(&self, app: &Application) -> u64 {
        match app {
            Application::Base(base) => {
                itunes::track_id(&self.client, &self.config.lookup_url, base.bundle_id()).await
            }
            Application::Store(store) => store.app_id(),
        }
    }

    /// `true` means the install should not go ahead.
    pub async fn check_official_macos(&mut self, app: &Application) -> bool {
        let app_id = self.app_id(app).await;
        debug!("{} resolved to app id {app_id}.", app.bundle_id());
        let supports_macos =
            check_macos_compatibility(&self.client, &self.config.store_page_url, app_id).await;
        if !(self.preferences.show_app_store_popup && supports_macos) {
            return false;
        }

        let response = match run_blocking(|| self.prompt.run_modal(&Alert::default())) {
            Ok(response) => response,
            Err(err) => {
                warn!("Prompt failed, treating as cancel: {err}.");
                AlertResponse {
                    choice: Choice::Cancel,
                    suppress: false,
                }
            }
        };
        match response.choice {
            Choice::InstallAnyway => {
                if response.suppress {
                    self.suppress_popup().await;
                }
                false
            }
            Choice::OpenAppStore => {
                if app_id != 0 {
                    self.open_store(app_id).await;
                }
                true
            }
            Choice::Cancel => true,
        }
    }

    async fn suppress_popup(&mut self) {
        self.preferences.show_app_store_popup = false;
        let Some(path) = &self.preferences_path else {
            return;
        };
        if let Err(err) = self.preferences.save(path).await {
            warn!("Failed to persist preferences: {err}.");
        }
    }

    async fn open_store(&self, app_id: u64) {
        let url = format!(
            "{}/id{app_id}",
            self.config.store_deep_link.trim_end_matches('/')
        );
        match shell::run(&self.config.tools.open, [&url]).await {
            Ok(_) => info!("Opened {url}."),
            Err(err) => warn!("Failed to open {url}: {err}."),
        }
    }
}

/// Prompts block on their input; keep other tasks moving where the runtime allows it.
fn run_blocking<T>(f: impl FnOnce() -> T) -> T {
    match Handle::try_current().map(|handle| handle.runtime_flavor()) {
        Ok(RuntimeFlavor::MultiThread) => block_in_place(f),
        _ => f(),
    }
}
