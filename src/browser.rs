//! Opening links outside the terminal.

use std::io;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use anyhow::{Context, Result};

/// Open `url` in the platform's default browser.
///
/// The browser is spawned detached with its output discarded so it cannot
/// scribble over the TUI.  A blank URL is a no-op.
pub fn open(url: &str) -> Result<()> {
    let url = url.trim();
    if url.is_empty() {
        return Ok(());
    }

    spawn_reaped(launcher(url)).with_context(|| format!("failed to open {url} in browser"))?;
    Ok(())
}

/// Spawn `command` with null stdio and wait for it on a background thread
/// so the exited launcher does not linger as a zombie.
fn spawn_reaped(mut command: Command) -> io::Result<thread::JoinHandle<io::Result<ExitStatus>>> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(thread::spawn(move || child.wait()))
}

#[cfg(target_os = "macos")]
fn launcher(url: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(url);
    command
}

#[cfg(target_os = "windows")]
fn launcher(url: &str) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", "", url]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn launcher(url: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    command
}
