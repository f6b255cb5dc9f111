//! Full, untruncated result-table printing.

use polars::prelude::DataFrame;

/// Print every row and column of the result, regardless of terminal size.
pub fn print_dataframe(df: &DataFrame) {
    println!("{}", format_dataframe(df));
}

/// Format the whole result. Empty results yield a fixed placeholder
/// instead of an empty table.
pub fn format_dataframe(df: &DataFrame) -> String {
    if df.height() == 0 {
        return "(no rows)".to_string();
    }
    // Polars' formatter truncates by default; lift the caps for the full
    // dump, including per-cell string length.
    std::env::set_var("POLARS_FMT_MAX_ROWS", "-1");
    std::env::set_var("POLARS_FMT_MAX_COLS", "-1");
    std::env::set_var("POLARS_FMT_STR_LEN", u32::MAX.to_string());
    format!("{}", df)
}
