//! Re-exec launcher: one-way hand-off into the private environment.

use std::convert::Infallible;
use std::ffi::OsString;
use std::process::Command;

use anyhow::{bail, Context, Result};

use super::EnvDescriptor;

/// Replace the current process with the environment's entry point,
/// forwarding `argv` unchanged.
///
/// Never returns on success: on Unix the process image is replaced, on
/// Windows the child's exit status is propagated and this process exits.
/// A missing entry point is fatal before any replacement is attempted.
pub fn reexec(env: &EnvDescriptor, argv: &[OsString]) -> Result<Infallible> {
    let entry = env.entry_point();
    if !entry.exists() {
        bail!(
            "Private environment is not ready (missing {}); run csvql --init",
            entry.display()
        );
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        let err = Command::new(&entry).args(argv).exec();
        Err(err).with_context(|| format!("Failed to re-exec {}", entry.display()))
    }

    #[cfg(not(unix))]
    {
        let status = Command::new(&entry)
            .args(argv)
            .status()
            .with_context(|| format!("Failed to launch {}", entry.display()))?;
        std::process::exit(status.code().unwrap_or(1));
    }
}
