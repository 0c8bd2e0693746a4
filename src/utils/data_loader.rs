//! CSV loading and saving

use crate::error::{OncoriskError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Cell values read as missing
pub const NULL_TOKENS: [&str; 7] = ["", "NA", "N/A", "NaN", "nan", "null", "NULL"];

/// Data loader for tabular datasets
pub struct DataLoader {
    /// Rows scanned to infer column types (`None` scans the whole file)
    infer_schema_length: Option<usize>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Create a new data loader
    pub fn new() -> Self {
        Self {
            infer_schema_length: None,
        }
    }

    /// Limit the number of rows used for schema inference
    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Load a CSV file with a header row
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let file = File::open(path)?;

        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .map_parse_options(|opts| {
                opts.with_null_values(Some(NullValues::AllColumns(
                    NULL_TOKENS.iter().map(|t| (*t).into()).collect(),
                )))
            })
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|e| {
                OncoriskError::DataError(format!("Error loading CSV file {}: {}", path.display(), e))
            })
    }
}

/// Save DataFrames to disk
pub struct DataSaver;

impl DataSaver {
    /// Save to CSV with a header row, creating the parent directory
    pub fn save_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let mut file = File::create(path)?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)
            .map_err(|e| OncoriskError::DataError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(body: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        write!(file, "{}", body).unwrap();
        file
    }

    #[test]
    fn test_load_csv() {
        let file = create_test_csv("a,b,c\n1,2,3\n4,5,6\n7,8,9\n");
        let df = DataLoader::new().load_csv(file.path()).unwrap();

        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn test_missing_tokens_read_as_null() {
        let file = create_test_csv("age,label\n69,YES\nNA,NO\nN/A,null\n45,NaN\n");
        let df = DataLoader::new().load_csv(file.path()).unwrap();

        let age = df.column("age").unwrap();
        assert!(age.dtype().is_integer());
        assert_eq!(age.null_count(), 2);
        assert_eq!(df.column("label").unwrap().null_count(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let result = DataLoader::new().load_csv("/definitely/not/here.csv");
        assert!(matches!(result, Err(OncoriskError::IoError(_))));
    }

    #[test]
    fn test_load_malformed_csv() {
        let file = create_test_csv("a,b\n1,2\n3,4,5,6,7\n");
        let result = DataLoader::new().load_csv(file.path());
        assert!(matches!(result, Err(OncoriskError::DataError(_))));
    }

    #[test]
    fn test_save_csv() {
        let mut df = DataFrame::new(vec![
            Column::new("a".into(), &[1, 2, 3]),
            Column::new("b".into(), &[4, 5, 6]),
        ])
        .unwrap();

        let file = NamedTempFile::new().unwrap();
        DataSaver::save_csv(&mut df, file.path()).unwrap();

        let loaded = DataLoader::new().load_csv(file.path()).unwrap();
        assert_eq!(loaded.height(), 3);
        assert_eq!(loaded.width(), 2);
    }
}
