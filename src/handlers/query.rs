//! End-to-end query handler: compose, execute, print, plot.

use anyhow::{anyhow, Result};

use crate::engine;
use crate::plot;
use crate::printer;
use crate::query;
use crate::settings::Settings;

pub fn run(settings: &Settings) -> Result<()> {
    let file = settings
        .file
        .as_ref()
        .ok_or_else(|| anyhow!("An input file is required"))?;

    let final_query =
        query::apply_success_filter(&settings.query, settings.success_filter.as_deref());
    let df = engine::run_query(file, &settings.sep, &final_query)?;

    printer::print_dataframe(&df);
    plot::maybe_plot(&df, settings)
}
