//! Platform helpers (image viewer launch).

use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};

/// Open a file with the platform's default viewer.
pub fn open_in_viewer(path: &Path) -> Result<()> {
    let status = if cfg!(target_os = "macos") {
        Command::new("open").arg(path).status()
    } else if cfg!(windows) {
        Command::new("cmd").args(["/C", "start", ""]).arg(path).status()
    } else {
        Command::new("xdg-open").arg(path).status()
    }
    .with_context(|| format!("Failed to open viewer for {}", path.display()))?;

    if !status.success() {
        bail!("Viewer exited with {} for {}", status, path.display());
    }
    Ok(())
}
