//! Layered configuration resolution: flag > environment variable > default.
//!
//! Every behavioral knob is settable both ways; resolution happens once,
//! up front, producing one immutable value no component mutates later.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::ValueEnum;

use crate::cli::Cli;
use crate::config::Config;
use crate::env::EnvDescriptor;
use crate::plot::PlotKind;
use crate::query::DEFAULT_QUERY;

/// Regulation cup diameter is 4.25 units across.
pub const DEFAULT_HOLE_RADIUS: f64 = 4.25 / 2.0;

#[derive(Debug, Clone)]
pub struct Settings {
    pub file: Option<PathBuf>,
    pub query: String,
    pub init: bool,
    pub plot: Option<PlotKind>,
    pub x: Option<String>,
    pub y: Option<String>,
    pub sep: String,
    pub limit: Option<usize>,
    pub save: Option<PathBuf>,
    pub title: Option<String>,
    pub success_filter: Option<String>,
    pub hole: bool,
    pub rings: bool,
    pub hole_x: f64,
    pub hole_y: f64,
    pub hole_r: f64,
    pub ring_radii: Option<String>,
    pub env_root: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            file: None,
            query: DEFAULT_QUERY.to_string(),
            init: false,
            plot: None,
            x: None,
            y: None,
            sep: ",".to_string(),
            limit: None,
            save: None,
            title: None,
            success_filter: None,
            hole: false,
            rings: false,
            hole_x: 0.0,
            hole_y: 0.0,
            hole_r: DEFAULT_HOLE_RADIUS,
            ring_radii: None,
            env_root: EnvDescriptor::default_root(),
        }
    }
}

impl Settings {
    pub fn resolve(cli: Cli, cfg: &Config) -> Result<Self> {
        let plot = match cli.plot {
            Some(kind) => Some(kind),
            None => cfg
                .get("CSVQL_PLOT")
                .map(|v| {
                    PlotKind::from_str(&v, true)
                        .map_err(|_| anyhow!("Invalid plot kind for CSVQL_PLOT: {}", v))
                })
                .transpose()?,
        };

        Ok(Self {
            file: cli.file,
            query: cli
                .sql_query
                .or_else(|| cfg.get("CSVQL_SQL"))
                .unwrap_or_else(|| DEFAULT_QUERY.to_string()),
            init: cli.init,
            plot,
            x: cli.x.or_else(|| cfg.get("CSVQL_X")),
            y: cli.y.or_else(|| cfg.get("CSVQL_Y")),
            sep: cli
                .sep
                .or_else(|| cfg.get("CSVQL_SEP"))
                .unwrap_or_else(|| ",".to_string()),
            limit: match cli.limit {
                Some(limit) => Some(limit),
                None => cfg.get_usize("CSVQL_LIMIT")?,
            },
            save: cli.save.or_else(|| cfg.get_path("CSVQL_SAVE")),
            title: cli.title.or_else(|| cfg.get("CSVQL_TITLE")),
            success_filter: cli
                .success_filter
                .or_else(|| cfg.get("CSVQL_SUCCESS_FILTER")),
            hole: resolve_switch(cli.hole, cli.no_hole, cfg.get_bool("CSVQL_HOLE")),
            rings: resolve_switch(cli.rings, cli.no_rings, cfg.get_bool("CSVQL_RINGS")),
            hole_x: cli.hole_x.or(cfg.get_f64("CSVQL_HOLE_X")?).unwrap_or(0.0),
            hole_y: cli.hole_y.or(cfg.get_f64("CSVQL_HOLE_Y")?).unwrap_or(0.0),
            hole_r: cli
                .hole_r
                .or(cfg.get_f64("CSVQL_HOLE_R")?)
                .unwrap_or(DEFAULT_HOLE_RADIUS),
            ring_radii: cli.ring_radii.or_else(|| cfg.get("CSVQL_RING_RADII")),
            env_root: cli
                .env_root
                .or_else(|| cfg.get_path("CSVQL_ENV_ROOT"))
                .unwrap_or_else(EnvDescriptor::default_root),
        })
    }
}

/// On/off flag pair over an environment default: explicit off wins, then
/// explicit on, then the environment.
fn resolve_switch(on: bool, off: bool, env_default: bool) -> bool {
    if off {
        false
    } else if on {
        true
    } else {
        env_default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("csvql").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_win_over_environment_values() {
        let cfg = Config::from_pairs(&[("CSVQL_SEP", ";"), ("CSVQL_TITLE", "env title")]);
        let s = Settings::resolve(cli(&["data.csv", "--sep", "|"]), &cfg).unwrap();
        assert_eq!(s.sep, "|");
        assert_eq!(s.title.as_deref(), Some("env title"));
    }

    #[test]
    fn builtin_defaults_apply_last() {
        let s = Settings::resolve(cli(&["data.csv"]), &Config::default()).unwrap();
        assert_eq!(s.query, DEFAULT_QUERY);
        assert_eq!(s.sep, ",");
        assert_eq!(s.hole_r, DEFAULT_HOLE_RADIUS);
        assert!(!s.hole);
        assert!(!s.rings);
        assert_eq!(s.limit, None);
    }

    #[test]
    fn no_hole_overrides_environment_enable() {
        let cfg = Config::from_pairs(&[("CSVQL_HOLE", "true")]);
        let s = Settings::resolve(cli(&["data.csv", "--no-hole"]), &cfg).unwrap();
        assert!(!s.hole);
        let s = Settings::resolve(cli(&["data.csv"]), &cfg).unwrap();
        assert!(s.hole);
    }

    #[test]
    fn plot_kind_from_environment_is_validated() {
        let cfg = Config::from_pairs(&[("CSVQL_PLOT", "scatter")]);
        let s = Settings::resolve(cli(&["data.csv"]), &cfg).unwrap();
        assert_eq!(s.plot, Some(PlotKind::Scatter));

        let cfg = Config::from_pairs(&[("CSVQL_PLOT", "pie")]);
        assert!(Settings::resolve(cli(&["data.csv"]), &cfg).is_err());
    }

    #[test]
    fn malformed_env_limit_is_fatal() {
        let cfg = Config::from_pairs(&[("CSVQL_LIMIT", "ten")]);
        assert!(Settings::resolve(cli(&["data.csv"]), &cfg).is_err());
    }

    #[test]
    fn init_mode_needs_no_file() {
        let parsed = Cli::try_parse_from(["csvql", "--init"]).unwrap();
        assert!(parsed.init);
        assert!(Cli::try_parse_from(["csvql"]).is_err());
    }
}
