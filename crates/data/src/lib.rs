pub mod csv_loader;

use pricemath_core::{Bar, DataError, PriceSource};
use std::path::PathBuf;

/// A directory of `<SYMBOL>.csv` files.
pub struct CsvPriceSource {
    pub directory: PathBuf,
}

impl CsvPriceSource {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl PriceSource for CsvPriceSource {
    fn load_bars(&self, symbol: &str) -> Result<Vec<Bar>, DataError> {
        let file_path = self.directory.join(format!("{}.csv", symbol));
        if !file_path.exists() {
            return Err(DataError::NotFound(format!(
                "CSV file not found: {}",
                file_path.display()
            )));
        }
        csv_loader::load_bars_from_csv(&file_path)
    }

    fn available_symbols(&self) -> Result<Vec<String>, DataError> {
        let mut symbols = Vec::new();
        for entry in std::fs::read_dir(&self.directory)? {
            let path = entry?.path();
            if path.extension().map(|e| e == "csv").unwrap_or(false) {
                if let Some(stem) = path.file_stem() {
                    symbols.push(stem.to_string_lossy().to_string());
                }
            }
        }
        symbols.sort();
        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_source_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        std::fs::write(
            dir.join("QQQ.csv"),
            "date,close\n2024-01-03,402.5\n2024-01-02,400\n2024-01-04,405\n",
        )
        .unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let source = CsvPriceSource::new(dir);
        assert_eq!(source.available_symbols().unwrap(), vec!["QQQ".to_string()]);

        let series = source.load_series("QQQ").unwrap();
        assert_eq!(series.closes(), &[405.0, 402.5, 400.0]);
        assert_eq!(series.symbol, "QQQ");
        assert_eq!(series.latest(), Some(405.0));

        assert!(matches!(source.load_bars("IWM"), Err(DataError::NotFound(_))));
    }

    #[test]
    fn test_empty_directory_lists_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let source = CsvPriceSource::new(tmp.path());
        assert!(source.available_symbols().unwrap().is_empty());
    }
}
