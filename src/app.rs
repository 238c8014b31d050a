use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use log::debug;
use regex::Regex;
use tokio::fs;

use crate::{
    config::Tools,
    error::{Error, Result},
    shell,
};

const INFO_PLIST: &str = "Info.plist";
const BINARY_PLIST_MAGIC: &[u8] = b"bplist";

/// An `.app` bundle extracted from an archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseApp {
    pub url: PathBuf,
    pub info: AppInfo,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppInfo {
    pub bundle_identifier: String,
    pub display_name: String,
    pub executable: Option<String>,
    pub version: Option<String>,
}

impl BaseApp {
    /// Load the first `.app` bundle, by name, inside `payload`.
    pub async fn detect_in_payload(payload: &Path, tools: &Tools) -> Result<Self> {
        let url = find_app_bundle(payload)
            .await?
            .ok_or_else(|| Error::NoAppBundle(payload.to_owned()))?;
        let info = AppInfo::load(&url, tools).await?;
        Ok(Self { url, info })
    }

    pub fn bundle_id(&self) -> &str {
        &self.info.bundle_identifier
    }
}

async fn find_app_bundle(payload: &Path) -> Result<Option<PathBuf>> {
    let mut entries = match fs::read_dir(payload).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let mut bundles = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_app = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("app"));
        if is_app {
            bundles.push(path);
        }
    }
    bundles.sort();
    Ok(bundles.into_iter().next())
}

impl AppInfo {
    pub async fn load(app: &Path, tools: &Tools) -> Result<Self> {
        let plist = app.join(INFO_PLIST);
        let bytes = fs::read(&plist).await?;
        let xml = if bytes.starts_with(BINARY_PLIST_MAGIC) {
            debug!("{} is a binary plist, converting.", plist.display());
            let args = [
                OsStr::new("-convert"),
                OsStr::new("xml1"),
                OsStr::new("-o"),
                OsStr::new("-"),
                plist.as_os_str(),
            ];
            shell::run(&tools.plutil, args).await?
        } else {
            String::from_utf8_lossy(&bytes).into_owned()
        };
        Self::from_xml(&xml, app).ok_or(Error::MissingBundleIdentifier(plist))
    }

    /// `None` if `CFBundleIdentifier` is absent.
    pub fn from_xml(xml: &str, app: &Path) -> Option<Self> {
        let bundle_identifier = string_value(xml, "CFBundleIdentifier")?;
        let display_name = string_value(xml, "CFBundleDisplayName")
            .or_else(|| string_value(xml, "CFBundleName"))
            .or_else(|| {
                app.file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| bundle_identifier.clone());
        Some(Self {
            bundle_identifier,
            display_name,
            executable: string_value(xml, "CFBundleExecutable"),
            version: string_value(xml, "CFBundleShortVersionString"),
        })
    }
}

fn string_value(xml: &str, key: &str) -> Option<String> {
    let pattern = format!(
        r"<key>\s*{}\s*</key>\s*<string>([^<]*)</string>",
        regex::escape(key)
    );
    let re = Regex::new(&pattern).ok()?;
    let value = re.captures(xml)?.get(1)?.as_str().trim();
    if value.is_empty() {
        return None;
    }
    Some(unescape(value))
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
