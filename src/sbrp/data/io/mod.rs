pub mod csv_read;
pub mod csv_write;
pub mod excel_read;

use std::fs;
use std::path::{Path, PathBuf};

use crate::sbrp::data::error::Result;

/// Creates `dir` when needed and returns the path of `filename` inside it.
pub(crate) fn prepare_output(dir: &Path, filename: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    Ok(dir.join(filename))
}
