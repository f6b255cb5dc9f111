//! Private runtime environment: descriptor and prober.
//!
//! The environment is an isolated install root holding the relocated
//! entry-point binary and a manifest snapshot. It is created on first
//! bootstrap, reused and refreshed afterwards, never deleted.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

pub mod launch;
pub mod provision;

pub const ENTRY_POINT_NAME: &str = if cfg!(windows) { "csvql.exe" } else { "csvql" };
pub const MANIFEST_FILE: &str = "manifest.txt";

/// Filesystem identity of the private environment. Constructed once at
/// startup and passed explicitly to the prober, provisioner and launcher.
#[derive(Debug, Clone)]
pub struct EnvDescriptor {
    root: PathBuf,
}

impl EnvDescriptor {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Default root under the per-user data directory.
    pub fn default_root() -> PathBuf {
        let base = BaseDirs::new()
            .map(|b| b.data_local_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".csvql"));
        base.join("csvql").join("env")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    /// Location of the relocated binary the tool re-executes.
    pub fn entry_point(&self) -> PathBuf {
        self.bin_dir().join(ENTRY_POINT_NAME)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    pub fn exists(&self) -> bool {
        self.root.exists()
    }

    /// Prober: does the current process run from inside this environment?
    ///
    /// Pure path predicate. Both sides are canonicalized before comparison;
    /// any resolution failure reports `false`, biasing toward
    /// re-provisioning over silently running with the wrong installation.
    pub fn is_active(&self) -> bool {
        let exe = match std::env::current_exe().and_then(|p| p.canonicalize()) {
            Ok(p) => p,
            Err(_) => return false,
        };
        match self.root.canonicalize() {
            Ok(root) => exe.starts_with(root),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_paths_hang_off_the_root() {
        let env = EnvDescriptor::new(PathBuf::from("/tmp/csvql-env"));
        assert_eq!(env.bin_dir(), PathBuf::from("/tmp/csvql-env/bin"));
        assert!(env.entry_point().starts_with(env.bin_dir()));
        assert_eq!(env.manifest_path(), PathBuf::from("/tmp/csvql-env/manifest.txt"));
    }

    #[test]
    fn prober_is_false_for_unresolvable_root() {
        let env = EnvDescriptor::new(PathBuf::from("/definitely/not/a/real/root"));
        assert!(!env.is_active());
    }
}
