use std::{
    io::{stderr, stdin},
    path::PathBuf,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use ipa_helper::{
    alert::TerminalPrompt,
    check::OfficialCheck,
    config::Config,
    ipa::Ipa,
    preferences::InstallPreferences,
    store::{Application, SourceAppsData},
};
use log::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(timeout) = args.connection_timeout {
        config = config.connection_timeout(Duration::from_millis(timeout));
    }
    if let Some(preferences) = args.preferences {
        config = config.preferences_path(preferences);
    }
    debug!("Starting with {config:#?}.");

    match args.command {
        Command::Extract { ipa, keep } => {
            let mut ipa = Ipa::new(ipa, config);
            ipa.allocate_temp_dir()?;
            let app = ipa.unzip().await?;
            println!("{}\t{}", app.info.bundle_identifier, app.url.display());
            if keep {
                if let Some(dir) = ipa.keep_temp_dir() {
                    info!("Kept working directory {}.", dir.display());
                }
            }
        }
        Command::Unquarantine { path } => {
            Ipa::new(&path, config).remove_quarantine(&path).await?;
        }
        Command::Pack { app } => {
            let new_ipa = Ipa::new(&app, config).pack_back(&app).await?;
            println!("{}", new_ipa.display());
        }
        Command::Check {
            ipa,
            lookup,
            bundle_id,
        } => {
            let (app, _session) = match (ipa, lookup) {
                (Some(ipa), _) => {
                    let mut ipa = Ipa::new(ipa, config.clone());
                    ipa.allocate_temp_dir()?;
                    let app = ipa.unzip().await?;
                    (Application::Base(app), Some(ipa))
                }
                (None, lookup) => {
                    let store = SourceAppsData {
                        bundle_id: bundle_id.unwrap_or_default(),
                        itunes_lookup: lookup.unwrap_or_default(),
                        ..SourceAppsData::default()
                    };
                    (Application::Store(store), None)
                }
            };
            let stop = official_check(&config)
                .await?
                .check_official_macos(&app)
                .await;
            println!("{}", if stop { "stop" } else { "proceed" });
        }
        Command::Prepare { ipa } => {
            let mut ipa = Ipa::new(ipa, config.clone());
            ipa.allocate_temp_dir()?;
            let app = ipa.unzip().await?;
            let application = Application::Base(app.clone());
            if official_check(&config)
                .await?
                .check_official_macos(&application)
                .await
            {
                println!("Not installing {}.", app.info.display_name);
                return Ok(());
            }
            ipa.remove_quarantine(&app.url).await?;
            let new_ipa = ipa.pack_back(&app.url).await?;
            println!("{}", new_ipa.display());
        }
        Command::ResetPopup => {
            let path = preferences_path(&config)?;
            let mut preferences = InstallPreferences::load(&path).await?;
            preferences.show_app_store_popup = true;
            preferences.save(&path).await?;
        }
    }
    Ok(())
}

fn preferences_path(config: &Config) -> Result<PathBuf> {
    config
        .preferences_path
        .clone()
        .or_else(InstallPreferences::default_path)
        .context("no location for the preferences file")
}

async fn official_check(
    config: &Config,
) -> Result<OfficialCheck<TerminalPrompt<std::io::StdinLock<'static>, std::io::Stderr>>> {
    let path = preferences_path(config)?;
    let preferences = InstallPreferences::load(&path).await?;
    let prompt = TerminalPrompt::new(stdin().lock(), stderr());
    let check = OfficialCheck::new(config.client()?, config.clone(), prompt);
    Ok(check.preferences(preferences, Some(path)))
}

#[derive(Debug, Parser)]
#[clap(
    author,
    version,
    about = "Prepares iOS app archives (.ipa) for side-loading on macOS.\n\
Extracts, removes the quarantine flag, repacks into ~/Documents,\n\
and checks whether the App Store already offers a macOS version."
)]
struct Args {
    #[clap(subcommand)]
    command: Command,
    #[clap(
        long,
        global = true,
        help = "TOML file overriding tool paths and endpoints."
    )]
    config: Option<PathBuf>,
    #[clap(long, global = true, help = "Preferences file to read and update.")]
    preferences: Option<PathBuf>,
    #[clap(
        short,
        long,
        global = true,
        help = "Connection timeout for each request in integer milliseconds."
    )]
    connection_timeout: Option<u64>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[clap(about = "Extract an .ipa and print the bundle id and .app location.")]
    Extract {
        ipa: PathBuf,
        #[clap(short, long, action, help = "Keep the working directory afterwards.")]
        keep: bool,
    },
    #[clap(about = "Recursively remove the quarantine attribute from a path.")]
    Unquarantine { path: PathBuf },
    #[clap(about = "Zip the Payload folder holding an .app back into an .ipa.")]
    Pack { app: PathBuf },
    #[clap(
        about = "Check whether an app has an official macOS release.",
        group(ArgGroup::new("source").required(true).args(["ipa", "lookup"]))
    )]
    Check {
        #[clap(long, help = "Archive to read the bundle id from.")]
        ipa: Option<PathBuf>,
        #[clap(
            long,
            help = "A store source's iTunes lookup string ending in the app id."
        )]
        lookup: Option<String>,
        #[clap(long, requires = "lookup", help = "Bundle id of the store entry.")]
        bundle_id: Option<String>,
    },
    #[clap(about = "Extract, check, unquarantine and repack an .ipa.")]
    Prepare { ipa: PathBuf },
    #[clap(about = "Show the App Store prompt again after it was suppressed.")]
    ResetPopup,
}
