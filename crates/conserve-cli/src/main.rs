//! Conserve
//!
//! Interactive toggle for battery conservation mode on Lenovo IdeaPad and Legion laptops.
//!
//! Startup sequence:
//! 1. Check for root privileges
//! 2. Load configuration
//! 3. Locate the `conservation_mode` control file and check it is writable
//! 4. Show the current mode and serve the menu until the operator quits
//!
//! Exit status is 0 on quit, Ctrl-C or end of input, and 1 on any startup failure or
//! unexpected error.

mod menu;
mod session;
mod startup;

use anyhow::{Context, Result};
use conserve_config::ConserveConfig;
use conserve_hal::SystemPrivileges;
use session::{Session, SessionEnd};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{info, warn};

const FAREWELL: &str = "\n\n>> Exiting... Thank you for using this tool!\n";

fn main() -> ExitCode {
    setup_logging();

    if let Err(e) = setup_signal_handlers() {
        warn!("Could not install interrupt handler: {}", e);
    }

    let mut contact = None;
    match run(&mut contact) {
        Ok(code) => code,
        Err(e) => {
            report_unexpected(&e, contact.as_deref());
            ExitCode::FAILURE
        }
    }
}

/// Setup logging to stderr, quiet unless `RUST_LOG` says otherwise
fn setup_logging() {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(io::stderr),
        )
        .init();
}

/// Exit cleanly on Ctrl-C, even while blocked on input
fn setup_signal_handlers() -> Result<()> {
    use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};

    let action = SigAction::new(
        SigHandler::Handler(handle_interrupt),
        SaFlags::empty(),
        SigSet::empty(),
    );

    unsafe {
        sigaction(Signal::SIGINT, &action)?;
    }

    Ok(())
}

/// SIGINT handler. Only async-signal-safe calls here.
extern "C" fn handle_interrupt(_sig: i32) {
    unsafe {
        libc::write(
            libc::STDOUT_FILENO,
            FAREWELL.as_ptr().cast(),
            FAREWELL.len(),
        );
        libc::_exit(0);
    }
}

/// Everything after logging setup. `contact` is filled in once configuration is loaded.
fn run(contact: &mut Option<String>) -> Result<ExitCode> {
    let stdout = io::stdout();
    let stderr = io::stderr();

    let (config, control) = match startup::start(&SystemPrivileges, ConserveConfig::load_default)
    {
        Ok(ready) => ready,
        Err(e) => {
            e.report(&mut stderr.lock())
                .context("Failed to print startup diagnostic")?;
            return Ok(ExitCode::FAILURE);
        }
    };
    contact.clone_from(&config.support.contact);

    {
        let mut out = stdout.lock();
        writeln!(
            out,
            ">> Battery Conservation Mode Manager for {}",
            config.display.product_name
        )?;
    }

    let end = Session::new(
        &control,
        &config.display,
        io::stdin().lock(),
        stdout.lock(),
        stderr.lock(),
    )
    .run()
    .context("Console I/O failed")?;

    if end == SessionEnd::EndOfInput {
        print!("{}", FAREWELL);
        io::stdout().flush()?;
    }

    info!("Session ended: {:?}", end);
    Ok(ExitCode::SUCCESS)
}

/// Last-resort report for errors nothing else handled
fn report_unexpected(err: &anyhow::Error, contact: Option<&str>) {
    tracing::error!("{:#}", err);
    eprintln!("\n[ERROR] Unexpected error: {:#}", err);
    match contact {
        Some(contact) => eprintln!("\nIf this issue persists, please contact: {}", contact),
        None => eprintln!("\nIf this issue persists, please report it along with the message above."),
    }
}
