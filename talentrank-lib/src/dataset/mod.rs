//! Candidate records and dataset snapshots
//!
//! A [`Dataset`] is an ordered collection of [`Record`]s. Operations that
//! change the contents (`delete`, `dedup`, preprocessing in the pipeline)
//! return a new snapshot and leave the original untouched, so a caller can
//! keep the loaded dataset around and "reset" by simply reusing it.
//!
//! # Usage
//!
//! ```ignore
//! use talentrank_lib::dataset::Dataset;
//!
//! let dataset = Dataset::load("candidates.csv")?;
//! let trimmed = dataset.delete(&["3".to_string()].into_iter().collect());
//! assert_eq!(dataset.len(), trimmed.len() + 1);
//! ```

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use serde_json::error::Category;
use tracing::debug;

use crate::{Error, Result};

/// An ordered, immutable-by-convention set of records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Create a dataset from records in insertion order.
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Parse a JSON array of `{id, job_title, connection}` objects.
    ///
    /// Extra columns (e.g. `fit`, `location`) are ignored. A record that is
    /// missing a required field, or reuses an id, is rejected as invalid input.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<Record> = serde_json::from_str(json).map_err(|e| match e.classify() {
            Category::Data => Error::InvalidInput(format!("malformed record: {e}")),
            _ => Error::Json(e),
        })?;
        Self::with_unique_ids(records)
    }

    /// Parse CSV with a header row naming `id`, `job_title` and `connection`.
    ///
    /// Same rules as [`Dataset::from_json_str`]: other columns are ignored,
    /// missing fields and repeated ids are invalid input.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let records = csv::Reader::from_reader(reader)
            .deserialize()
            .collect::<std::result::Result<Vec<Record>, csv::Error>>()
            .map_err(|e| match e.kind() {
                csv::ErrorKind::Deserialize { .. } | csv::ErrorKind::UnequalLengths { .. } => {
                    Error::InvalidInput(format!("malformed record: {e}"))
                }
                _ => Error::Csv(e),
            })?;
        Self::with_unique_ids(records)
    }

    /// Load a dataset from a `.csv` file, or a JSON file for any other extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        let dataset = if is_csv {
            Self::from_csv_reader(File::open(path)?)?
        } else {
            Self::from_json_str(&fs::read_to_string(path)?)?
        };
        debug!(path = %path.display(), records = dataset.len(), "loaded dataset");
        Ok(dataset)
    }

    fn with_unique_ids(records: Vec<Record>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        if let Some(dup) = records.iter().find(|r| !seen.insert(r.id.as_str())) {
            return Err(Error::InvalidInput(format!("duplicate record id {:?}", dup.id)));
        }
        Ok(Self::new(records))
    }

    /// Returns the records in their current order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consume the dataset, yielding its records.
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Title of every record, in order.
    #[must_use]
    pub fn titles(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.title.as_str()).collect()
    }

    /// Return a new dataset without the records whose id is in `ids`.
    #[must_use]
    pub fn delete(&self, ids: &HashSet<String>) -> Self {
        let records: Vec<Record> = self
            .records
            .iter()
            .filter(|r| !ids.contains(&r.id))
            .cloned()
            .collect();
        debug!(removed = self.len() - records.len(), "deleted records");
        Self::new(records)
    }

    /// Drop records whose `(title, connection count)` pair was already seen.
    ///
    /// The first occurrence wins. Connection counts are compared after
    /// coercion, so `"500+"` and `"500+ "` are the same value; a count that
    /// cannot be coerced fails the whole call.
    pub fn dedup(self) -> Result<Self> {
        let before = self.len();
        let mut seen = HashSet::with_capacity(before);
        let mut records = Vec::with_capacity(before);

        for record in self.records {
            let key = (record.title.clone(), record.connections.count()?);
            if seen.insert(key) {
                records.push(record);
            }
        }

        debug!(dropped = before - records.len(), "removed duplicate records");
        Ok(Self::new(records))
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

mod record;

pub use record::*;

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(id: &str, title: &str, connections: &str) -> Record {
        Record::new(id, title, Connections::from(connections))
    }

    fn ids(dataset: &Dataset) -> Vec<&str> {
        dataset.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_delete_returns_new_snapshot() {
        let dataset = Dataset::new(vec![
            make_record("1", "engineer", "10"),
            make_record("2", "baker", "20"),
            make_record("3", "chef", "30"),
        ]);

        let removed: HashSet<String> = ["2".to_string()].into_iter().collect();
        let trimmed = dataset.delete(&removed);

        assert_eq!(ids(&trimmed), vec!["1", "3"]);
        // original untouched
        assert_eq!(ids(&dataset), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let dataset = Dataset::new(vec![make_record("1", "engineer", "10")]);
        let removed: HashSet<String> = ["99".to_string()].into_iter().collect();
        assert_eq!(dataset.delete(&removed), dataset);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let dataset = Dataset::new(vec![
            make_record("1", "engineer", "500+"),
            make_record("2", "engineer", "500+ "),
            make_record("3", "engineer", "10"),
            make_record("4", "baker", "500+"),
        ]);

        let deduped = dataset.dedup().unwrap();
        assert_eq!(ids(&deduped), vec!["1", "3", "4"]);
    }

    #[test]
    fn test_dedup_rejects_bad_connections() {
        let dataset = Dataset::new(vec![make_record("1", "engineer", "abc")]);
        assert!(matches!(dataset.dedup(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_from_json_ignores_extra_columns() {
        let json = r#"[
            {"id": 1, "job_title": "Baker", "connection": "10", "fit": "?", "location": "Paris"}
        ]"#;
        let dataset = Dataset::from_json_str(json).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.titles(), vec!["Baker"]);
    }

    #[test]
    fn test_from_json_missing_field_is_invalid_input() {
        let json = r#"[{"id": 1, "connection": "10"}]"#;
        let err = Dataset::from_json_str(json).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)), "got {err:?}");
    }

    #[test]
    fn test_from_json_syntax_error_is_json_error() {
        let err = Dataset::from_json_str("[{").unwrap_err();
        assert!(matches!(err, Error::Json(_)), "got {err:?}");
    }

    #[test]
    fn test_from_json_duplicate_id_is_invalid_input() {
        let json = r#"[
            {"id": 1, "job_title": "Baker", "connection": 10},
            {"id": "1", "job_title": "Chef", "connection": 20}
        ]"#;
        let err = Dataset::from_json_str(json).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)), "got {err:?}");
    }

    #[test]
    fn test_from_csv_ignores_extra_columns() {
        let csv = "id,job_title,connection,fit,location\n\
                   1,Software Engineer,500+ ,,Houston Texas\n\
                   2,\"Baker, pastry\",10,,Paris\n";
        let dataset = Dataset::from_csv_reader(csv.as_bytes()).unwrap();

        assert_eq!(ids(&dataset), vec!["1", "2"]);
        assert_eq!(dataset.titles(), vec!["Software Engineer", "Baker, pastry"]);
        assert_eq!(dataset.records()[0].connections, Connections::from("500+ "));
        assert_eq!(dataset.records()[0].connections.count().unwrap(), 500);
        assert_eq!(dataset.records()[1].connections.count().unwrap(), 10);
    }

    #[test]
    fn test_from_csv_missing_column_is_invalid_input() {
        let csv = "id,connection\n1,10\n";
        let err = Dataset::from_csv_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)), "got {err:?}");
    }

    #[test]
    fn test_from_csv_duplicate_id_is_invalid_input() {
        let csv = "id,job_title,connection\n7,Baker,10\n7,Chef,20\n";
        let err = Dataset::from_csv_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)), "got {err:?}");
    }

    #[test]
    fn test_load_csv_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("candidates.CSV");
        fs::write(&path, "id,job_title,connection,fit\n3,Chef,42,\n").unwrap();

        let dataset = Dataset::load(&path).unwrap();
        assert_eq!(ids(&dataset), vec!["3"]);
        assert_eq!(dataset.titles(), vec!["Chef"]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.json");
        fs::write(
            &path,
            r#"[{"id": "a", "job_title": "Chef", "connection": 3}]"#,
        )
        .unwrap();

        let dataset = Dataset::load(&path).unwrap();
        assert_eq!(ids(&dataset), vec!["a"]);
    }
}
