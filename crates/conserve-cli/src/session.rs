//! Interactive session
//!
//! Reads commands from the operator and applies them to the control file. Failures to
//! read or write the control file are reported and the menu comes back; only console
//! I/O errors end the session early.

use crate::menu::{Command, MenuState, render_menu};
use conserve_config::DisplayConfig;
use conserve_hal::{ControlFile, ModeStatus};
use std::io::{self, BufRead, Write};
use tracing::{debug, info};

/// Why the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Operator chose `q`
    Quit,
    /// Input closed (Ctrl-D)
    EndOfInput,
}

/// Interactive menu over a control file
pub struct Session<'a, R, W, E> {
    control: &'a ControlFile,
    display: &'a DisplayConfig,
    input: R,
    out: W,
    err: E,
    state: MenuState,
}

impl<'a, R: BufRead, W: Write, E: Write> Session<'a, R, W, E> {
    pub fn new(
        control: &'a ControlFile,
        display: &'a DisplayConfig,
        input: R,
        out: W,
        err: E,
    ) -> Self {
        Self {
            control,
            display,
            input,
            out,
            err,
            state: MenuState::Idle,
        }
    }

    /// Current loop state
    pub fn state(&self) -> MenuState {
        self.state
    }

    /// Show the status, then serve commands until quit or end of input
    pub fn run(&mut self) -> io::Result<SessionEnd> {
        self.show_status()?;

        loop {
            let Some(command) = self.prompt()? else {
                debug!("Operator input closed");
                return Ok(SessionEnd::EndOfInput);
            };

            if self.execute(command)?.is_terminal() {
                return Ok(SessionEnd::Quit);
            }
        }
    }

    /// Prompt until a valid command arrives. `None` on end of input.
    fn prompt(&mut self) -> io::Result<Option<Command>> {
        loop {
            render_menu(&mut self.out, self.display)?;

            // Raw bytes so non-UTF-8 input is rejected like any other bad choice
            let mut line = Vec::new();
            if self.input.read_until(b'\n', &mut line)? == 0 {
                return Ok(None);
            }

            match Command::parse(&String::from_utf8_lossy(&line)) {
                Ok(command) => return Ok(Some(command)),
                Err(choice) => self.reject(&choice)?,
            }
        }
    }

    /// Report invalid input; the state is left as it was
    fn reject(&mut self, choice: &str) -> io::Result<()> {
        writeln!(
            self.err,
            "[ERROR] Invalid input '{}'. Please enter 'a', 'b', 's', or 'q'.",
            choice
        )
    }

    /// Run one command and return the state it passed through
    pub fn execute(&mut self, command: Command) -> io::Result<MenuState> {
        let state = MenuState::for_command(command);
        self.state = state;

        match command {
            Command::Quit => {
                writeln!(self.out)?;
                writeln!(
                    self.out,
                    ">> Thank you for using the conservation mode manager!"
                )?;
                return Ok(state);
            }
            Command::Status => {
                self.show_status()?;
            }
            Command::Disable => {
                writeln!(self.out)?;
                writeln!(self.out, ">> Disabling conservation mode...")?;
                if self.apply(false)? {
                    writeln!(
                        self.out,
                        "[SUCCESS] Conservation mode disabled - Battery will charge to {}%",
                        self.display.full_limit
                    )?;
                    self.show_status()?;
                }
            }
            Command::Enable => {
                writeln!(self.out)?;
                writeln!(self.out, ">> Enabling conservation mode...")?;
                if self.apply(true)? {
                    let limit = self.display.conservation_limit;
                    writeln!(
                        self.out,
                        "[SUCCESS] Conservation mode enabled - Battery will charge to {}%",
                        limit
                    )?;
                    writeln!(
                        self.out,
                        "[NOTE] If your battery is currently above {}%, it will stay at its current level",
                        limit
                    )?;
                    writeln!(
                        self.out,
                        "       and won't charge further until conservation mode is disabled."
                    )?;
                    self.show_status()?;
                }
            }
        }

        self.state = MenuState::Idle;
        Ok(state)
    }

    /// Write the mode; `false` when the control file rejected it
    fn apply(&mut self, enable: bool) -> io::Result<bool> {
        match self.control.write_status(enable) {
            Ok(()) => {
                info!(
                    "Conservation mode {}",
                    if enable { "enabled" } else { "disabled" }
                );
                Ok(true)
            }
            Err(e) => {
                tracing::error!("{}", e);
                writeln!(self.err, "!!! {}", e)?;
                writeln!(self.out, "[FAILED] Conservation mode was not changed")?;
                Ok(false)
            }
        }
    }

    /// Re-read the control file and print the mode
    pub fn show_status(&mut self) -> io::Result<ModeStatus> {
        let status = match self.control.read_status() {
            Ok(status) => status,
            Err(e) => {
                tracing::error!("{}", e);
                writeln!(self.err, "!!! Error reading conservation mode status: {}", e)?;
                ModeStatus::Unknown
            }
        };

        writeln!(self.out)?;
        match status {
            ModeStatus::Enabled => writeln!(
                self.out,
                "Current status: [ON] Conservation mode is ON ({}% limit)",
                self.display.conservation_limit
            )?,
            ModeStatus::Disabled => writeln!(
                self.out,
                "Current status: [OFF] Conservation mode is OFF ({}% limit)",
                self.display.full_limit
            )?,
            ModeStatus::Unknown => writeln!(
                self.out,
                "Current status: [??] Conservation mode state is unknown"
            )?,
        }

        Ok(status)
    }
}
