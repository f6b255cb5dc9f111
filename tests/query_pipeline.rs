//! Composer + engine end to end over a real CSV file.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use csvql::engine;
use csvql::query::{apply_success_filter, DEFAULT_QUERY};

fn write_shots_csv(dir: &std::path::Path) -> Result<PathBuf> {
    let path = dir.join("shots.csv");
    let mut file = std::fs::File::create(&path)?;
    writeln!(file, "x,y,made")?;
    writeln!(file, "1.0,2.0,true")?;
    writeln!(file, "-3.5,0.5,false")?;
    writeln!(file, "0.25,4.0,true")?;
    Ok(path)
}

#[test]
fn default_query_returns_every_row() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_shots_csv(dir.path())?;

    let df = engine::run_query(&path, ",", DEFAULT_QUERY)?;
    assert_eq!(df.height(), 3);
    assert_eq!(df.get_column_names_str(), vec!["x", "y", "made"]);
    Ok(())
}

#[test]
fn success_filter_restricts_to_made_shots() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_shots_csv(dir.path())?;

    let final_query = apply_success_filter(DEFAULT_QUERY, Some("made = true"));
    assert_eq!(final_query, "SELECT * FROM df WHERE made = true");

    let df = engine::run_query(&path, ",", &final_query)?;
    assert_eq!(df.height(), 2);
    Ok(())
}

#[test]
fn filter_composes_with_user_query_and_order_by() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_shots_csv(dir.path())?;

    let base = "SELECT x, y FROM df WHERE x > -10 ORDER BY x";
    let final_query = apply_success_filter(base, Some("made = true"));
    let df = engine::run_query(&path, ",", &final_query)?;

    assert_eq!(df.height(), 2);
    let xs: Vec<f64> = df
        .column("x")?
        .as_materialized_series()
        .f64()?
        .into_no_null_iter()
        .collect();
    assert_eq!(xs, vec![0.25, 1.0]);
    Ok(())
}

#[test]
fn tab_separated_input_is_supported() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("shots.tsv");
    let mut file = std::fs::File::create(&path)?;
    writeln!(file, "x\ty")?;
    writeln!(file, "1\t2")?;
    writeln!(file, "3\t4")?;
    drop(file);

    let df = engine::run_query(&path, "\\t", "SELECT * FROM df")?;
    assert_eq!(df.height(), 2);
    assert_eq!(df.get_column_names_str(), vec!["x", "y"]);
    Ok(())
}

#[test]
fn missing_input_file_is_fatal_and_named() {
    let err = engine::run_query(
        std::path::Path::new("/no/such/file.csv"),
        ",",
        DEFAULT_QUERY,
    )
    .unwrap_err();
    assert!(err.to_string().contains("/no/such/file.csv"));
}
