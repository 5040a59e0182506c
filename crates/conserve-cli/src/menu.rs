//! Menu commands and rendering

use conserve_config::DisplayConfig;
use std::io::{self, Write};

/// Operator command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `a`: charge to the full limit
    Disable,
    /// `b`: cap charge at the conservation limit
    Enable,
    /// `s`
    Status,
    /// `q`
    Quit,
}

impl Command {
    /// Parse one line of operator input.
    ///
    /// Case and surrounding whitespace are ignored. On failure the normalized input
    /// is returned for the diagnostic.
    pub fn parse(line: &str) -> Result<Self, String> {
        let choice = line.trim().to_lowercase();
        match choice.as_str() {
            "a" => Ok(Command::Disable),
            "b" => Ok(Command::Enable),
            "s" => Ok(Command::Status),
            "q" => Ok(Command::Quit),
            _ => Err(choice),
        }
    }
}

/// Where the interactive loop is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    /// Waiting for a command
    Idle,
    ShowingStatus,
    Disabling,
    Enabling,
    /// Terminal
    Quitting,
}

impl MenuState {
    /// State entered when `command` is accepted
    pub fn for_command(command: Command) -> Self {
        match command {
            Command::Disable => MenuState::Disabling,
            Command::Enable => MenuState::Enabling,
            Command::Status => MenuState::ShowingStatus,
            Command::Quit => MenuState::Quitting,
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self == MenuState::Quitting
    }
}

const RULE_WIDTH: usize = 60;

/// Print the option list and the prompt (without a trailing newline)
pub fn render_menu<W: Write>(out: &mut W, display: &DisplayConfig) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(
        out,
        ">> {} - Battery Conservation Mode Toggle",
        display.product_name
    )?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "Choose an option:")?;
    writeln!(
        out,
        "  a) Turn OFF  - Battery charges to {}% (normal mode)",
        display.full_limit
    )?;
    writeln!(
        out,
        "  b) Turn ON   - Battery charges to {}% (conservation mode)",
        display.conservation_limit
    )?;
    writeln!(out, "  s) Show current status")?;
    writeln!(out, "  q) Quit")?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    write!(out, "Enter your choice (a/b/s/q): ")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("a\n"), Ok(Command::Disable));
        assert_eq!(Command::parse("b"), Ok(Command::Enable));
        assert_eq!(Command::parse("  S  "), Ok(Command::Status));
        assert_eq!(Command::parse("Q\r\n"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(Command::parse("x\n"), Err("x".to_string()));
        assert_eq!(Command::parse("ab"), Err("ab".to_string()));
        assert_eq!(Command::parse("\n"), Err(String::new()));
    }

    #[test]
    fn test_state_transitions() {
        assert_eq!(MenuState::for_command(Command::Disable), MenuState::Disabling);
        assert_eq!(MenuState::for_command(Command::Enable), MenuState::Enabling);
        assert_eq!(MenuState::for_command(Command::Status), MenuState::ShowingStatus);
        assert!(MenuState::for_command(Command::Quit).is_terminal());
        assert!(!MenuState::Idle.is_terminal());
    }

    #[test]
    fn test_render_menu_uses_limits() {
        let display = DisplayConfig {
            product_name: "Lenovo IdeaPad".into(),
            conservation_limit: 80,
            full_limit: 100,
        };
        let mut out = Vec::new();
        render_menu(&mut out, &display).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(">> Lenovo IdeaPad - Battery Conservation Mode Toggle"));
        assert!(text.contains("charges to 80% (conservation mode)"));
        assert!(text.contains("charges to 100% (normal mode)"));
        assert!(text.ends_with("Enter your choice (a/b/s/q): "));
    }
}
