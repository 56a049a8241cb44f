//! CSV output: a header row followed by one row per record.

use std::io::Write;

use crate::error::{GenerationError, SinkError};
use crate::record::{FIELD_NAMES, PersonRecord};

/// Streams records as comma-delimited, `\n`-terminated CSV.
///
/// Returns the number of data rows written.
///
/// # Errors
///
/// Returns [`SinkError`] if a record cannot be generated or written.
pub fn write_csv<W, I>(writer: W, records: I) -> Result<usize, SinkError>
where
    W: Write,
    I: IntoIterator<Item = Result<PersonRecord, GenerationError>>,
{
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .delimiter(b',')
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    csv_writer
        .write_record(FIELD_NAMES)
        .map_err(|err| csv_error(&err))?;

    let mut written = 0_usize;
    for record in records {
        csv_writer
            .serialize(record?)
            .map_err(|err| csv_error(&err))?;
        written += 1;
    }
    csv_writer.flush().map_err(|e| SinkError::Csv {
        message: e.to_string(),
    })?;
    Ok(written)
}

fn csv_error(err: &csv::Error) -> SinkError {
    SinkError::Csv {
        message: err.to_string(),
    }
}
