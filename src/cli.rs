use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::plot::PlotKind;

#[derive(Parser, Debug, Clone)]
#[command(name = "csvql", about = "Query CSV/TSV files with SQL and optional plotting.", version)]
#[command(group(ArgGroup::new("hole_switch").args(["hole", "no_hole"]).multiple(false)))]
#[command(group(ArgGroup::new("rings_switch").args(["rings", "no_rings"]).multiple(false)))]
pub struct Cli {
    /// Path to the CSV/TSV file.
    #[arg(value_name = "FILE", required_unless_present = "init")]
    pub file: Option<PathBuf>,

    /// Override SQL query; defaults to SELECT * FROM df.
    #[arg(value_name = "SQL")]
    pub sql_query: Option<String>,

    /// Bootstrap or update the private environment and exit.
    #[arg(long)]
    pub init: bool,

    /// Plot kind for the query result.
    #[arg(long, value_enum)]
    pub plot: Option<PlotKind>,

    /// X-axis column for plotting.
    #[arg(long)]
    pub x: Option<String>,

    /// Y-axis column for plotting.
    #[arg(long)]
    pub y: Option<String>,

    /// Field separator for the input file.
    #[arg(long)]
    pub sep: Option<String>,

    /// Row limit for plotting (printing always shows the full result).
    #[arg(long)]
    pub limit: Option<usize>,

    /// Path to save the plot image instead of showing it.
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Plot title override.
    #[arg(long)]
    pub title: Option<String>,

    /// SQL predicate to filter successful rows.
    #[arg(long = "success-filter")]
    pub success_filter: Option<String>,

    /// Overlay the hole outline on plots.
    #[arg(long)]
    pub hole: bool,
    /// Disable the hole overlay even if enabled via environment.
    #[arg(long = "no-hole")]
    pub no_hole: bool,

    /// Overlay bullseye rings on plots.
    #[arg(long)]
    pub rings: bool,
    /// Disable the ring overlay even if enabled via environment.
    #[arg(long = "no-rings")]
    pub no_rings: bool,

    /// X position of the hole center.
    #[arg(long = "hole-x")]
    pub hole_x: Option<f64>,

    /// Y position of the hole center.
    #[arg(long = "hole-y")]
    pub hole_y: Option<f64>,

    /// Hole radius.
    #[arg(long = "hole-r")]
    pub hole_r: Option<f64>,

    /// Comma-separated ring radii.
    #[arg(long = "ring-radii")]
    pub ring_radii: Option<String>,

    /// Override the private environment root (hidden).
    #[arg(long = "env-root", hide = true)]
    pub env_root: Option<PathBuf>,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
