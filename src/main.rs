use std::ffi::OsString;

use anyhow::Result;

use csvql::cli::Cli;
use csvql::config::Config;
use csvql::env::{launch, provision, EnvDescriptor};
use csvql::handlers;
use csvql::settings::Settings;

/// Exactly one of three paths runs per invocation: initialize-only,
/// already-inside-environment, or provision-then-re-exec. The third path
/// never executes the query in this process image.
fn main() -> Result<()> {
    // Captured before parsing so the re-exec forwards argv untouched.
    let forwarded: Vec<OsString> = std::env::args_os().skip(1).collect();

    let args = Cli::parse();
    let cfg = Config::load();
    let settings = Settings::resolve(args, &cfg)?;
    let env = EnvDescriptor::new(settings.env_root.clone());

    if settings.init {
        let created = provision::ensure_provisioned(&env, true)?;
        if created {
            println!("Environment initialized.");
        } else {
            println!("Environment refreshed.");
        }
        return Ok(());
    }

    if env.is_active() {
        return handlers::query::run(&settings);
    }

    if !env.entry_point().exists() {
        eprintln!("Bootstrapping csvql environment...");
        provision::ensure_provisioned(&env, false)?;
    }
    match launch::reexec(&env, &forwarded)? {}
}
