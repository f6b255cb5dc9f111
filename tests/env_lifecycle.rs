//! Private-environment lifecycle against a sandboxed root.

use std::ffi::OsString;

use anyhow::Result;
use csvql::env::{launch, provision, EnvDescriptor};

#[test]
fn prober_reports_outside_for_foreign_root() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let env = EnvDescriptor::new(dir.path().join("env"));
    // Root does not even exist yet; the prober must bias toward false.
    assert!(!env.is_active());

    provision::ensure_provisioned(&env, false)?;
    // Exists now, but this test binary does not run from inside it.
    assert!(!env.is_active());
    Ok(())
}

#[test]
fn provisioning_creates_then_reuses_the_root() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let env = EnvDescriptor::new(dir.path().join("env"));

    let created = provision::ensure_provisioned(&env, false)?;
    assert!(created);
    assert!(env.entry_point().exists());
    assert!(env.manifest_path().exists());

    let manifest = std::fs::read_to_string(env.manifest_path())?;
    assert!(manifest.contains("csvql"));
    assert!(manifest.contains("polars"));

    // Second run reuses the environment instead of recreating it.
    let created_again = provision::ensure_provisioned(&env, false)?;
    assert!(!created_again);
    assert!(env.entry_point().exists());
    Ok(())
}

#[cfg(unix)]
#[test]
fn staged_entry_point_is_executable() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir()?;
    let env = EnvDescriptor::new(dir.path().join("env"));
    provision::ensure_provisioned(&env, false)?;

    let mode = std::fs::metadata(env.entry_point())?.permissions().mode();
    assert_ne!(mode & 0o111, 0, "entry point should be executable");
    Ok(())
}

#[test]
fn launcher_refuses_without_entry_point() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let env = EnvDescriptor::new(dir.path().join("env"));

    // Never provisioned: the launcher must fail before attempting any
    // process replacement (otherwise this test would not be running).
    let argv = vec![OsString::from("shots.csv")];
    let err = launch::reexec(&env, &argv).unwrap_err();
    assert!(err.to_string().contains("--init"), "got: {err}");
    Ok(())
}
