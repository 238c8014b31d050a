use std::{path::PathBuf, process::ExitStatus};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no working directory was allocated for {0}")]
    TempDirNotAllocated(PathBuf),

    #[error("app archive {path} is corrupted: {output}")]
    AppCorrupted { path: PathBuf, output: String },

    #[error("`{program}` exited with {status}: {output}")]
    Command {
        program: String,
        status: ExitStatus,
        output: String,
    },

    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no .app bundle found in {0}")]
    NoAppBundle(PathBuf),

    #[error("{0} has no CFBundleIdentifier")]
    MissingBundleIdentifier(PathBuf),

    #[error("could not determine the Documents directory")]
    NoDocumentsDirectory,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}
