use std::io::{BufRead, Write};

use crate::error::Result;

pub const MESSAGE: &str = "This app is available on the Mac App Store";
pub const INFORMATIVE: &str =
    "The developer ships an official macOS version. Installing it from the App Store is recommended.";
pub const SUPPRESSION_TOOLTIP: &str = "Don't show this message again when installing apps";
pub const INSTALL_ANYWAY: &str = "Install anyway";
pub const OPEN_APP_STORE: &str = "Open App Store";
pub const CANCEL: &str = "Cancel";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice {
    InstallAnyway,
    OpenAppStore,
    Cancel,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::InstallAnyway, Choice::OpenAppStore, Choice::Cancel];

    pub fn title(self) -> &'static str {
        match self {
            Choice::InstallAnyway => INSTALL_ANYWAY,
            Choice::OpenAppStore => OPEN_APP_STORE,
            Choice::Cancel => CANCEL,
        }
    }

    /// `"1"`..`"3"` in button order; anything else cancels.
    pub fn from_answer(answer: &str) -> Self {
        match answer.trim() {
            "1" => Choice::InstallAnyway,
            "2" => Choice::OpenAppStore,
            _ => Choice::Cancel,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub informative: String,
    pub suppression_tooltip: String,
    pub buttons: [Choice; 3],
}

impl Default for Alert {
    fn default() -> Self {
        Self {
            message: MESSAGE.to_owned(),
            informative: INFORMATIVE.to_owned(),
            suppression_tooltip: SUPPRESSION_TOOLTIP.to_owned(),
            buttons: Choice::ALL,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlertResponse {
    pub choice: Choice,
    pub suppress: bool,
}

/// A modal question with three buttons and a "don't ask again" box.
///
/// `run_modal` blocks until answered.
pub trait Prompt {
    fn run_modal(&mut self, alert: &Alert) -> Result<AlertResponse>;
}

/// Asks on a terminal.
#[derive(Debug)]
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl<R, W> TerminalPrompt<R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_answer(&mut self) -> Result<String> {
        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(answer)
    }
}

impl<R, W> Prompt for TerminalPrompt<R, W>
where
    R: BufRead,
    W: Write,
{
    fn run_modal(&mut self, alert: &Alert) -> Result<AlertResponse> {
        writeln!(self.output, "{}\n{}", alert.message, alert.informative)?;
        for (index, button) in alert.buttons.iter().enumerate() {
            writeln!(self.output, "  {}) {}", index + 1, button.title())?;
        }
        write!(self.output, "> ")?;
        self.output.flush()?;

        let choice = Choice::from_answer(&self.read_answer()?);
        let mut suppress = false;
        if choice == Choice::InstallAnyway {
            write!(self.output, "{}? [y/N] ", alert.suppression_tooltip)?;
            self.output.flush()?;
            let answer = self.read_answer()?.trim().to_ascii_lowercase();
            suppress = answer == "y" || answer == "yes";
        }
        Ok(AlertResponse { choice, suppress })
    }
}
