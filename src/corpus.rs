use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::path::Path;
use tracing::debug;

use crate::error::DataSourceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub title: String,
    pub body: String,
}

impl Record {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Record {
            title: title.into(),
            body: body.into(),
        }
    }

    /// The text that gets indexed for this record.
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.title, self.body)
    }
}

/// Knowledge-base records in load order. A record's position is its identity.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    records: Vec<Record>,
}

impl Corpus {
    pub fn from_records(records: Vec<Record>) -> Self {
        Corpus { records }
    }

    /// Reads a CSV file with a header row. Cells missing from ragged rows
    /// are read as empty text.
    pub fn load_csv(
        path: impl AsRef<Path>,
        title_column: &str,
        body_column: &str,
    ) -> Result<Self, DataSourceError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataSourceError::NotFound(path.to_path_buf()));
        }

        let file = File::open(path).map_err(|source| DataSourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let csv_err = |source: csv::Error| DataSourceError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = ReaderBuilder::new().flexible(true).from_reader(file);
        let headers = reader.headers().map_err(csv_err)?.clone();
        let missing = |column: &str| DataSourceError::MissingColumn {
            column: column.to_string(),
            path: path.to_path_buf(),
        };
        let title_idx =
            column_index(&headers, title_column).ok_or_else(|| missing(title_column))?;
        let body_idx =
            column_index(&headers, body_column).ok_or_else(|| missing(body_column))?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(csv_err)?;
            records.push(Record {
                title: row.get(title_idx).unwrap_or_default().to_string(),
                body: row.get(body_idx).unwrap_or_default().to_string(),
            });
        }

        debug!(path = %path.display(), records = records.len(), "read dataset");
        Ok(Corpus { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }
}

fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    let name = name.trim();
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_csv(dir: &Path, content: impl AsRef<[u8]>) -> std::path::PathBuf {
        let path = dir.join("kb.csv");
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_ref()).unwrap();
        path
    }

    #[test]
    fn test_load_csv() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = write_csv(
            dir.path(),
            "id,title,body\n\
             1,Wave function,\"A wave function, in short.\"\n\
             2,Spin,Intrinsic angular momentum.\n",
        );

        let corpus = Corpus::load_csv(&path, "title", "body")?;
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get(0).unwrap().body, "A wave function, in short.");
        assert_eq!(corpus.get(1).unwrap().title, "Spin");
        Ok(())
    }

    #[test]
    fn test_custom_columns_and_bom() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = write_csv(dir.path(), "\u{feff}titulo,texto\nEspín,Momento angular.\n");

        let corpus = Corpus::load_csv(&path, "titulo", "texto")?;
        assert_eq!(corpus.get(0), Some(&Record::new("Espín", "Momento angular.")));
        Ok(())
    }

    #[test]
    fn test_missing_cells_are_empty() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = write_csv(dir.path(), "title,body\nOnly title\n,Only body\n,\n");

        let corpus = Corpus::load_csv(&path, "title", "body")?;
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.get(0), Some(&Record::new("Only title", "")));
        assert_eq!(corpus.get(1), Some(&Record::new("", "Only body")));
        assert_eq!(corpus.get(2), Some(&Record::new("", "")));
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let err = Corpus::load_csv("/nonexistent/kb.csv", "title", "body").unwrap_err();
        assert!(matches!(err, DataSourceError::NotFound(_)));
    }

    #[test]
    fn test_missing_column() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = write_csv(dir.path(), "title,text\nA,B\n");

        let err = Corpus::load_csv(&path, "title", "body").unwrap_err();
        match err {
            DataSourceError::MissingColumn { column, .. } => assert_eq!(column, "body"),
            other => panic!("unexpected error: {other}"),
        }
        Ok(())
    }

    #[test]
    fn test_empty_file_has_no_columns() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = write_csv(dir.path(), "");

        let err = Corpus::load_csv(&path, "title", "body").unwrap_err();
        assert!(matches!(err, DataSourceError::MissingColumn { .. }));
        Ok(())
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = write_csv(dir.path(), b"title,body\n\xff\xfe,ok\n");

        let err = Corpus::load_csv(&path, "title", "body").unwrap_err();
        assert!(matches!(err, DataSourceError::Csv { .. }));
        assert!(err.to_string().contains("failed to parse dataset"));
        Ok(())
    }

    #[test]
    fn test_combined_text() {
        let record = Record::new("Entanglement", "Links particle states.");
        assert_eq!(record.combined_text(), "Entanglement Links particle states.");
    }
}
