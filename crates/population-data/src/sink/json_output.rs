//! JSON output: `{"campos": [...], "datos": [...]}` with four-space indent.
//!
//! Records are serialized as they are generated rather than collected
//! first, so memory use does not grow with the record count.

use std::cell::{Cell, RefCell};
use std::io::Write;

use serde::ser::{Error as _, SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};
use serde_json::ser::PrettyFormatter;

use crate::error::{GenerationError, SinkError};
use crate::record::{FIELD_NAMES, PersonRecord};

const INDENT: &[u8] = b"    ";

/// Streams records as an indented JSON document.
///
/// Returns the number of records written.
///
/// # Errors
///
/// Returns [`SinkError::Generation`] if a record cannot be generated and
/// [`SinkError::Json`] if serialization or the writer fails.
pub fn write_json<W, I>(writer: W, records: I) -> Result<usize, SinkError>
where
    W: Write,
    I: IntoIterator<Item = Result<PersonRecord, GenerationError>>,
{
    let document = PopulationDocument {
        records: RefCell::new(Some(records.into_iter())),
        written: Cell::new(0),
        failure: RefCell::new(None),
    };

    let mut serializer =
        serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(INDENT));
    if let Err(err) = document.serialize(&mut serializer) {
        if let Some(failure) = document.failure.take() {
            return Err(SinkError::Generation(failure));
        }
        return Err(json_error(&err));
    }

    let mut out = serializer.into_inner();
    out.write_all(b"\n")
        .and_then(|()| out.flush())
        .map_err(|err| SinkError::Json {
            message: err.to_string(),
        })?;
    Ok(document.written.get())
}

fn json_error(err: &serde_json::Error) -> SinkError {
    SinkError::Json {
        message: err.to_string(),
    }
}

struct PopulationDocument<I> {
    records: RefCell<Option<I>>,
    written: Cell<usize>,
    failure: RefCell<Option<GenerationError>>,
}

impl<I> Serialize for PopulationDocument<I>
where
    I: Iterator<Item = Result<PersonRecord, GenerationError>>,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut document = serializer.serialize_struct("PopulationDocument", 2)?;
        document.serialize_field("campos", &FIELD_NAMES)?;
        document.serialize_field("datos", &StreamedRecords(self))?;
        document.end()
    }
}

struct StreamedRecords<'a, I>(&'a PopulationDocument<I>);

impl<I> Serialize for StreamedRecords<'_, I>
where
    I: Iterator<Item = Result<PersonRecord, GenerationError>>,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let document = self.0;
        let mut seq = serializer.serialize_seq(None)?;
        // The iterator is consumed on the first pass; a second call emits `[]`.
        let records = document.records.borrow_mut().take();
        for item in records.into_iter().flatten() {
            let record = match item {
                Ok(person) => person,
                Err(err) => {
                    let message = err.to_string();
                    *document.failure.borrow_mut() = Some(err);
                    return Err(S::Error::custom(message));
                }
            };
            seq.serialize_element(&record)?;
            document.written.set(document.written.get() + 1);
        }
        seq.end()
    }
}
