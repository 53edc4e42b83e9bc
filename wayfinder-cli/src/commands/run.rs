//! Run command - live compass acquisition in the terminal.
//!
//! Desktop terminals have no orientation sensors, so acquisition starts
//! headless and falls back to the simulated pointer source after the grace
//! period. In interactive mode the mouse drives the pointer: the compass
//! points from the terminal center toward the cursor.

use std::io::{stdout, Write};
use std::time::Duration;

use clap::Args;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tokio::sync::broadcast::error::RecvError;
use wayfinder::acquisition::{AcquisitionConfig, CompassEvent};
use wayfinder::capability::Platform;
use wayfinder::config::ConfigFile;
use wayfinder::maplink::MapLinkBuilder;
use wayfinder::service::CompassService;
use wayfinder::simulator::SurfacePoint;

use super::map_link::NO_FIX_MESSAGE;
use crate::error::CliError;

/// Arguments for the run command.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Milliseconds to wait for a first heading before simulated fallback
    #[arg(long)]
    pub grace_ms: Option<u64>,

    /// Emit events as JSON lines instead of formatted text
    #[arg(long)]
    pub json: bool,

    /// Print plain update lines without mouse capture or live rendering
    #[arg(long)]
    pub headless: bool,
}

/// Run the compass until interrupted.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let config = ConfigFile::load().unwrap_or_default();
    let link_builder = config.map_link_builder()?;

    // CLI > config > default
    let mut acquisition = config.acquisition_config();
    if let Some(grace_ms) = args.grace_ms {
        acquisition = acquisition.with_grace_period(Duration::from_millis(grace_ms));
    }
    if let Ok((cols, rows)) = crossterm::terminal::size() {
        acquisition = acquisition
            .with_simulator_center(SurfacePoint::new(cols as f64 / 2.0, rows as f64 / 2.0));
    }

    let interactive = !args.json && !args.headless && atty::is(atty::Stream::Stdout);

    if !args.json {
        print_banner(&acquisition, &link_builder, interactive);
    }

    let (service, mut handles) = CompassService::start(Platform::headless(), acquisition)?;

    let ctrlc_cancel = service.cancellation();
    ctrlc::set_handler(move || {
        ctrlc_cancel.cancel();
    })
    .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    // Raw mode delivers Ctrl+C as a key event, so the input thread handles
    // exit keys itself while also feeding mouse positions to the simulator.
    let _guard = if interactive {
        Some(TerminalGuard::enable()?)
    } else {
        None
    };
    let input_thread = if interactive {
        let cancel = service.cancellation();
        let pointer = handles.pointer.clone();
        Some(std::thread::spawn(move || {
            while !cancel.is_cancelled() {
                match event::poll(Duration::from_millis(100)) {
                    Ok(true) => match event::read() {
                        Ok(Event::Mouse(mouse)) => {
                            let moved = matches!(
                                mouse.kind,
                                MouseEventKind::Moved | MouseEventKind::Drag(_)
                            );
                            if moved {
                                let point =
                                    SurfacePoint::new(mouse.column as f64, mouse.row as f64);
                                if pointer.blocking_send(point).is_err() {
                                    break;
                                }
                            }
                        }
                        Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                            let ctrl_c = key.code == KeyCode::Char('c')
                                && key.modifiers.contains(KeyModifiers::CONTROL);
                            if ctrl_c || key.code == KeyCode::Char('q') || key.code == KeyCode::Esc
                            {
                                cancel.cancel();
                                break;
                            }
                        }
                        Ok(_) => {}
                        Err(_) => break,
                    },
                    Ok(false) => {}
                    Err(_) => break,
                }
            }
        }))
    } else {
        None
    };

    loop {
        match handles.events.blocking_recv() {
            Ok(event) => {
                if args.json {
                    match serde_json::to_string(&event) {
                        Ok(line) => println!("{}", line),
                        Err(e) => tracing::warn!(error = %e, "Failed to serialize event"),
                    }
                } else {
                    render(&event, interactive, &link_builder);
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Display lagged behind compass events");
            }
            Err(RecvError::Closed) => break,
        }
    }

    drop(_guard);
    if let Some(thread) = input_thread {
        let _ = thread.join();
    }
    service.shutdown();

    if !args.json {
        println!();
        println!("Compass stopped.");
    }

    Ok(())
}

fn print_banner(acquisition: &AcquisitionConfig, link_builder: &MapLinkBuilder, interactive: bool) {
    println!("Wayfinder Compass v{}", wayfinder::VERSION);
    println!("====================");
    println!();
    println!("Platform:  Desktop (no orientation sensors)");
    println!(
        "Fallback:  Simulated pointer after {} ms",
        acquisition.grace_period.as_millis()
    );
    println!("Map links: {}", link_builder.base_url());
    println!();
    if interactive {
        println!("Move the mouse to steer the compass. Press q or Ctrl+C to exit.");
    } else {
        println!("Press Ctrl+C to exit.");
    }
    println!();
}

fn render(event: &CompassEvent, interactive: bool, link_builder: &MapLinkBuilder) {
    match event {
        CompassEvent::Heading(update) => {
            if interactive {
                print!(
                    "\rHeading {:>3}°  {:<2}  Dial {:>7.1}°   ",
                    update.display_degrees, update.cardinal, update.rotation_deg
                );
                let _ = stdout().flush();
            } else {
                println!(
                    "Heading {}°  {}  (dial {:.1}°)",
                    update.display_degrees, update.cardinal, update.rotation_deg
                );
            }
        }
        CompassEvent::Fix(fix) => {
            print_line(
                interactive,
                &format!(
                    "Location: {}, {}  {}",
                    fix.display_latitude(),
                    fix.display_longitude(),
                    link_builder.url_for(*fix)
                ),
            );
        }
        CompassEvent::LocationUnavailable => {
            print_line(interactive, NO_FIX_MESSAGE);
        }
        CompassEvent::Status(status) => {
            print_line(interactive, &format!("Status: {}", status));
        }
        // No permission button to draw in a terminal
        CompassEvent::PermissionControl { .. } => {}
    }
}

fn print_line(interactive: bool, text: &str) {
    if interactive {
        print!("\r{}\r\n", text);
        let _ = stdout().flush();
    } else {
        println!("{}", text);
    }
}

/// Restores the terminal on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enable() -> Result<Self, CliError> {
        enable_raw_mode()?;
        execute!(stdout(), EnableMouseCapture)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture);
        let _ = disable_raw_mode();
    }
}
