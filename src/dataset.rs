//! CSV portfolio source loading and row bookkeeping.

use std::path::Path;

use serde::Deserialize;

/// One row of the portfolio source table.
///
/// Both fields stay optional until the load pass so that incomplete rows can
/// be reported with their row index instead of failing the whole read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PortfolioRecord {
    /// Free-text skill/technology description, scored for similarity.
    #[serde(rename = "Techstack")]
    pub techstack: Option<String>,
    /// Link associated with the techstack.
    #[serde(rename = "Links")]
    pub links: Option<String>,
}

impl PortfolioRecord {
    /// Builds a row from optional field values.
    pub fn new(techstack: Option<String>, links: Option<String>) -> Self {
        Self { techstack, links }
    }
}

/// In-memory portfolio rows awaiting a load pass.
#[derive(Debug, Default)]
pub struct PortfolioDataset {
    records: Vec<PortfolioRecord>,
}

impl PortfolioDataset {
    /// Reads a CSV file expected to carry `Techstack` and `Links` columns.
    ///
    /// An unreadable file degrades to an empty dataset with a console
    /// warning; construction never fails. Rows the CSV reader cannot decode
    /// are kept as incomplete placeholders so later row indices stay true.
    pub fn read<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let mut reader = match csv::ReaderBuilder::new().flexible(true).from_path(path) {
            Ok(reader) => reader,
            Err(err) => {
                eprintln!(
                    "warning: portfolio dataset {} is unreadable ({}); continuing with an empty dataset.",
                    path.display(),
                    err
                );
                return Self::empty();
            }
        };

        let mut records = Vec::new();
        for (row, result) in reader.deserialize::<PortfolioRecord>().enumerate() {
            match result {
                Ok(record) => records.push(record),
                Err(err) => {
                    eprintln!(
                        "warning: portfolio row {} is unreadable ({}); treating it as incomplete.",
                        row, err
                    );
                    records.push(PortfolioRecord::default());
                }
            }
        }
        Self { records }
    }

    /// Dataset with zero rows, for callers with no loading concern.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a dataset from rows already in memory.
    pub fn from_records(records: Vec<PortfolioRecord>) -> Self {
        Self { records }
    }

    /// Number of rows read from the source.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Hands the rows to a load pass, leaving the dataset empty.
    pub(crate) fn take_records(&mut self) -> Vec<PortfolioRecord> {
        std::mem::take(&mut self.records)
    }
}
