use crate::error::{PrepError, Result};
use polars::prelude::*;
use std::path::Path;

/// Reads a source table with every column typed as text.
///
/// Cells are left untyped so the cleaner decides how each column is coerced;
/// empty cells load as nulls.
///
/// # Errors
///
/// Returns an error if the path is not a file, the extension is not `csv`, or
/// the CSV cannot be parsed.
pub fn load_df(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(PrepError::InvalidPath(path.display().to_string()));
    }

    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    let df = match ext.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?,
        _ => return Err(PrepError::UnsupportedFormat(ext)),
    };

    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Loaded source table"
    );
    Ok(df)
}

/// Writes `df` as CSV with a header row.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_df(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    CsvWriter::new(file).include_header(true).finish(df)?;
    Ok(())
}
