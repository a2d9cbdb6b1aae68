//! CSV Data Loader Module
//! Reads the raw dataset with Polars and hands it to the normalizer.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use super::normalizer::{NormalizeError, NormalizeReport, Normalizer};
use super::table::CanonicalTable;
use crate::config::ColumnSpec;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Failed to normalize dataset: {0}")]
    Normalize(#[from] NormalizeError),
    #[error("Dataset not found: {0}")]
    NotFound(PathBuf),
}

/// Loads a raw CSV and produces the canonical table.
pub struct DataLoader<'a> {
    columns: &'a [ColumnSpec],
}

impl<'a> DataLoader<'a> {
    pub fn new(columns: &'a [ColumnSpec]) -> Self {
        Self { columns }
    }

    /// Read a CSV file using Polars without any column mapping.
    pub fn read_csv(file_path: &Path) -> Result<DataFrame, LoaderError> {
        if !file_path.exists() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }

        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        info!(
            path = %file_path.display(),
            rows = df.height(),
            columns = df.width(),
            "read dataset"
        );
        Ok(df)
    }

    /// Read and normalize in one step.
    pub fn load(&self, file_path: &Path) -> Result<(CanonicalTable, NormalizeReport), LoaderError> {
        let raw = Self::read_csv(file_path)?;
        Ok(Normalizer::new(self.columns).normalize(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use std::io::Write;

    #[test]
    fn test_missing_file() {
        let config = DashboardConfig::default();
        let err = DataLoader::new(&config.columns)
            .load(Path::new("/definitely/not/here.csv"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
    }

    #[test]
    fn test_load_with_default_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Country Name,Continent,Year,GDP (current US$) - NY.GDP.MKTP.CD").unwrap();
        writeln!(file, "Japan,Asia,2019,100").unwrap();
        writeln!(file, "Japan,Asia,2020,").unwrap();
        writeln!(file, "Nowhere,,2020,5").unwrap();
        drop(file);

        let config = DashboardConfig::default();
        let (table, report) = DataLoader::new(&config.columns).load(&path).unwrap();
        assert_eq!(report.kept_rows, 2);
        assert_eq!(table.schema().metrics, vec!["GDP"]);
        assert_eq!(table.entity_values("Continent"), vec!["Asia"]);
    }
}
