use std::{
    ffi::OsStr,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use directories::UserDirs;
use log::{debug, info, warn};
use tempfile::TempDir;
use tokio::fs::{create_dir_all, remove_file, rename};

use crate::{
    app::BaseApp,
    config::Config,
    error::{Error, Result},
    shell,
};

const PAYLOAD: &str = "Payload";
const QUARANTINE_ATTRIBUTE: &str = "com.apple.quarantine";
const TEMP_PREFIX: &str = "ipa-helper-";
const PARTIAL_SUFFIX: &str = ".partial";

/// One `.ipa` archive and the working directory it is extracted into.
#[derive(Debug)]
pub struct Ipa {
    pub url: PathBuf,
    tmp_dir: Option<TempDir>,
    config: Config,
}

impl Ipa {
    pub fn new<P>(url: P, config: Config) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            url: url.into(),
            tmp_dir: None,
            config,
        }
    }

    pub fn tmp_dir(&self) -> Option<&Path> {
        self.tmp_dir.as_ref().map(TempDir::path)
    }

    /// Replaces (and deletes) any previously allocated directory.
    pub fn allocate_temp_dir(&mut self) -> Result<()> {
        let dir = tempfile::Builder::new().prefix(TEMP_PREFIX).tempdir()?;
        debug!("Allocated {} for {}.", dir.path().display(), self.url.display());
        self.release_temp_dir();
        self.tmp_dir = Some(dir);
        Ok(())
    }

    pub fn release_temp_dir(&mut self) {
        let Some(dir) = self.tmp_dir.take() else {
            return;
        };
        let path = dir.path().to_owned();
        if let Err(err) = dir.close() {
            warn!("Failed to delete {}: {err}.", path.display());
        }
    }

    /// Detach the working directory so it outlives this session.
    pub fn keep_temp_dir(&mut self) -> Option<PathBuf> {
        self.tmp_dir.take().map(TempDir::keep)
    }

    pub async fn remove_quarantine<P>(&self, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let args = [
            OsStr::new("-r"),
            OsStr::new("-d"),
            OsStr::new(QUARANTINE_ATTRIBUTE),
            path.as_ref().as_os_str(),
        ];
        shell::run(&self.config.tools.xattr, args).await?;
        info!("Removed quarantine from {}.", path.as_ref().display());
        Ok(())
    }

    pub async fn unzip(&self) -> Result<BaseApp> {
        let work_dir = self
            .tmp_dir()
            .ok_or_else(|| Error::TempDirNotAllocated(self.url.clone()))?;
        let args = [
            OsStr::new("-oq"),
            self.url.as_os_str(),
            OsStr::new("-d"),
            work_dir.as_os_str(),
        ];
        // `-q` silences progress, so anything printed is a complaint.
        let output = match shell::run(&self.config.tools.unzip, args).await {
            Ok(output) => output,
            Err(Error::Command { output, .. }) => {
                return Err(Error::AppCorrupted {
                    path: self.url.clone(),
                    output,
                })
            }
            Err(err) => return Err(err),
        };
        if !output.is_empty() {
            return Err(Error::AppCorrupted {
                path: self.url.clone(),
                output,
            });
        }
        let app = BaseApp::detect_in_payload(&work_dir.join(PAYLOAD), &self.config.tools).await?;
        info!("Extracted {} to {}.", app.bundle_id(), app.url.display());
        Ok(app)
    }

    /// Zip the `Payload` folder holding `app` into `<Documents>/<name>.ipa`.
    pub async fn pack_back<P>(&self, app: P) -> Result<PathBuf>
    where
        P: AsRef<Path>,
    {
        let app = app.as_ref();
        let payload = app
            .parent()
            .ok_or_else(|| Error::NoAppBundle(app.to_owned()))?;
        let payload_name = payload
            .file_name()
            .ok_or_else(|| Error::NoAppBundle(app.to_owned()))?;
        let root = match payload.parent() {
            Some(root) if root.as_os_str().is_empty() => Path::new("."),
            Some(root) => root,
            None => Path::new("/"),
        };
        let name = app
            .file_stem()
            .ok_or_else(|| Error::NoAppBundle(app.to_owned()))?;

        let documents = self.documents_dir()?;
        create_dir_all(&documents).await?;
        let mut file_name = name.to_owned();
        file_name.push(".ipa");
        let new_ipa = documents.join(&file_name);
        file_name.push(PARTIAL_SUFFIX);
        let partial = documents.join(file_name);
        // `zip -r` merges into an existing archive.
        remove_if_present(&partial).await?;

        let args = [OsStr::new("-r"), partial.as_os_str(), payload_name];
        if let Err(err) = shell::run_in(root, &self.config.tools.zip, args).await {
            if let Err(cleanup) = remove_if_present(&partial).await {
                warn!("Failed to delete {}: {cleanup}.", partial.display());
            }
            return Err(err);
        }
        rename(&partial, &new_ipa).await?;
        info!("Packed {} into {}.", app.display(), new_ipa.display());
        Ok(new_ipa)
    }

    fn documents_dir(&self) -> Result<PathBuf> {
        let dir = match &self.config.documents_dir {
            Some(dir) => dir.clone(),
            None => UserDirs::new()
                .and_then(|dirs| dirs.document_dir().map(Path::to_owned))
                .ok_or(Error::NoDocumentsDirectory)?,
        };
        // `zip` runs from the payload's parent, so the output must be absolute.
        if dir.is_relative() {
            return Ok(std::env::current_dir()?.join(dir));
        }
        Ok(dir)
    }
}

async fn remove_if_present(path: &Path) -> Result<()> {
    match remove_file(path).await {
        Ok(()) => debug!("Removed stale {}.", path.display()),
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

impl Drop for Ipa {
    fn drop(&mut self) {
        self.release_temp_dir();
    }
}
