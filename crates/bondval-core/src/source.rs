//! Loads bond descriptors from a CSV export of the portfolio sheet.
//!
//! The first row is a header; columns are face value, issue date and serial
//! number, in that order. Rows are taken as-is: a row with missing or bad
//! fields becomes a descriptor that fails validation on its own later, so one
//! typo never hides the rest of the portfolio.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::BondDescriptor;

/// Failure to read the descriptor file as a whole.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read descriptor file: {0}")]
    Csv(#[from] csv::Error),
}

/// Reads descriptors from a CSV file on disk.
pub fn read_descriptors_from_path(path: impl AsRef<Path>) -> Result<Vec<BondDescriptor>, SourceError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| SourceError::Open {
        path: path.display().to_string(),
        source,
    })?;
    read_descriptors(file)
}

/// Reads descriptors from any CSV stream, skipping the header and blank rows.
pub fn read_descriptors<R: Read>(reader: R) -> Result<Vec<BondDescriptor>, SourceError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut descriptors = Vec::new();
    let mut record = csv::ByteRecord::new();
    while csv_reader.read_byte_record(&mut record)? {
        if record.iter().all(<[u8]>::is_empty) {
            continue;
        }

        // Undecodable bytes stay in the descriptor and fail validation for that row alone.
        let field = |index: usize| {
            String::from_utf8_lossy(record.get(index).unwrap_or_default()).into_owned()
        };
        descriptors.push(BondDescriptor::new(field(0), field(1), field(2)));
    }

    Ok(descriptors)
}
