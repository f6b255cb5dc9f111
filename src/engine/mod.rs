//! SQL engine boundary: CSV/TSV file in, result frame out.

use std::path::Path;

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use polars::sql::SQLContext;

/// Table name the input file is registered under.
pub const TABLE_NAME: &str = "df";

/// Load `path` with the given separator and execute `sql` against it.
pub fn run_query(path: &Path, sep: &str, sql: &str) -> Result<DataFrame> {
    if !path.exists() {
        bail!("Input file not found: {}", path.display());
    }
    let separator = parse_separator(sep)?;

    let frame = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_separator(separator)
        .with_encoding(CsvEncoding::LossyUtf8)
        .with_try_parse_dates(true)
        .with_infer_schema_length(Some(100))
        .finish()
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut ctx = SQLContext::new();
    ctx.register(TABLE_NAME, frame);
    let df = ctx
        .execute(sql)
        .with_context(|| format!("Query failed: {}", sql))?
        .collect()?;
    Ok(df)
}

/// The engine takes a single-byte separator; `\t` may be spelled out.
fn parse_separator(sep: &str) -> Result<u8> {
    if sep == "\\t" {
        return Ok(b'\t');
    }
    match sep.as_bytes() {
        [b] => Ok(*b),
        _ => bail!("Invalid separator (one byte expected): {:?}", sep),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separator_accepts_single_byte_and_escaped_tab() {
        assert_eq!(parse_separator(",").unwrap(), b',');
        assert_eq!(parse_separator("\\t").unwrap(), b'\t');
        assert_eq!(parse_separator("\t").unwrap(), b'\t');
        assert!(parse_separator("").is_err());
        assert!(parse_separator("ab").is_err());
    }
}
