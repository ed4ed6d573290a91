use std::path::Path;
use std::process::Command;

use tracing::{error, info};

/// Open a URL in the user's default browser.
pub fn open_url(url: &str) {
    spawn(url);
}

/// Open a file with the platform's default handler.
pub fn open_path(path: &Path) {
    spawn(&path.display().to_string());
}

fn spawn(target: &str) {
    info!("opening {target} with system handler");

    if let Err(e) = command_for(target).spawn() {
        error!("failed to open {target}: {e}");
    }
}

#[cfg(target_os = "macos")]
fn command_for(target: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(target);
    command
}

#[cfg(target_os = "windows")]
fn command_for(target: &str) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", "", target]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn command_for(target: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(target);
    command
}
