use std::{ffi::OsStr, path::Path, process::Output};

use log::debug;
use tokio::process::Command;

use crate::error::{Error, Result};

/// Run `program` with literal `args` and return stdout followed by stderr.
///
/// Fails if the program cannot be spawned or exits unsuccessfully.
pub async fn run<P, I, S>(program: P, args: I) -> Result<String>
where
    P: AsRef<OsStr>,
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let command = Command::new(program.as_ref());
    execute(command, program.as_ref(), args).await
}

/// Like [`run`], with `dir` as the working directory.
pub async fn run_in<D, P, I, S>(dir: D, program: P, args: I) -> Result<String>
where
    D: AsRef<Path>,
    P: AsRef<OsStr>,
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program.as_ref());
    command.current_dir(dir);
    execute(command, program.as_ref(), args).await
}

async fn execute<I, S>(mut command: Command, program: &OsStr, args: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    command.args(args).kill_on_drop(true);
    debug!("Running {command:?}.");
    let program = program.to_string_lossy().into_owned();
    let Output {
        status,
        stdout,
        stderr,
    } = command.output().await.map_err(|source| Error::Spawn {
        program: program.clone(),
        source,
    })?;
    let mut output = String::from_utf8_lossy(&stdout).into_owned();
    output.push_str(&String::from_utf8_lossy(&stderr));
    if !status.success() {
        return Err(Error::Command {
            program,
            status,
            output,
        });
    }
    Ok(output)
}
