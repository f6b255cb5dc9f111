//! Environment provisioner: idempotent creation of the install root.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use super::EnvDescriptor;

/// Engine components compiled into the entry point, recorded in the
/// manifest snapshot for inspection only.
const EMBEDDED_COMPONENTS: &[(&str, &str)] = &[
    ("polars", "sql engine + dataframe"),
    ("plotters", "chart rendering"),
];

/// Ensure the private environment exists and is fully populated.
///
/// Reuses an existing root, stages (or refreshes) the entry-point binary
/// from the currently running executable and rewrites the manifest
/// snapshot. Any failed step aborts the whole operation; a partial
/// environment is never reported as usable, but retrying from scratch is
/// safe. Returns whether the root was freshly created.
///
/// `verbose` routes progress to stdout with next-step hints (initialize
/// mode); otherwise progress goes to stderr (bootstrap path).
pub fn ensure_provisioned(env: &EnvDescriptor, verbose: bool) -> Result<bool> {
    let emit = |message: String| {
        if verbose {
            println!("{}", message);
        } else {
            eprintln!("{}", message);
        }
    };

    let created = !env.exists();
    fs::create_dir_all(env.bin_dir())
        .with_context(|| format!("Failed to create environment at {}", env.root().display()))?;
    if created {
        emit(format!("Created private environment at {}", env.root().display().cyan()));
    } else {
        emit(format!("Using existing private environment at {}", env.root().display().cyan()));
    }

    stage_entry_point(env)?;
    write_manifest(env)?;

    if verbose {
        println!("Environment ready. Next steps:");
        println!("  • Run csvql <file.csv> --plot scatter --x X --y Y");
        println!("  • Use --help for full usage details");
    }
    Ok(created)
}

/// Copy the running executable into the environment, refreshing a stale
/// copy. This is the install/upgrade step of provisioning.
fn stage_entry_point(env: &EnvDescriptor) -> Result<()> {
    let source = std::env::current_exe().context("Cannot locate the running executable")?;
    let target = env.entry_point();

    // Re-provisioning from inside the environment: nothing to stage.
    if let (Ok(a), Ok(b)) = (source.canonicalize(), target.canonicalize()) {
        if a == b {
            return Ok(());
        }
    }

    if entry_point_stale(&source, &target) {
        fs::copy(&source, &target)
            .with_context(|| format!("Failed to install entry point at {}", target.display()))?;
        make_executable(&target)?;
    }
    Ok(())
}

fn entry_point_stale(source: &Path, target: &Path) -> bool {
    let (src, tgt) = match (fs::metadata(source), fs::metadata(target)) {
        (Ok(s), Ok(t)) => (s, t),
        _ => return true,
    };
    if src.len() != tgt.len() {
        return true;
    }
    match (src.modified(), tgt.modified()) {
        (Ok(s), Ok(t)) => s > t,
        _ => true,
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Snapshot the resolved environment contents. Inspection only; the
/// manifest is never consulted for version pinning.
fn write_manifest(env: &EnvDescriptor) -> Result<()> {
    let path = env.manifest_path();
    let mut file = fs::File::create(&path)
        .with_context(|| format!("Failed to write manifest at {}", path.display()))?;
    writeln!(file, "csvql {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(file, "entry-point: {}", env.entry_point().display())?;
    for (name, role) in EMBEDDED_COMPONENTS {
        writeln!(file, "{} (embedded, {})", name, role)?;
    }
    Ok(())
}
