//! Row sources and typed row parsing.
//!
//! A [`RowSource`] is the forward-only cursor the scanner consumes: advance,
//! get the current row's cells as ordered nullable text, repeat until
//! exhaustion. No rewind is offered and none is needed. Two implementations
//! are provided: [`DelimitedRowSource`] over any reader via the `csv` crate,
//! and [`VecRowSource`] over in-memory rows.

use std::io::Read;

use anyhow::Result;
use encoding_rs::Encoding;

use crate::{
    convert::convert_with_mask, descriptor::ColumnFeatureDescriptor, io_utils, value::Value,
};

/// An ordered sequence of nullable text cells. Blank and empty cells are
/// represented as `None`.
pub type RawRow = Vec<Option<String>>;

pub trait RowSource {
    /// Advance the cursor. Returns `None` once the source is exhausted.
    fn next_row(&mut self) -> Result<Option<RawRow>>;
}

/// Row source over delimited text. Rows are delivered exactly as tokenized;
/// width validation is the scanner's concern, so ragged rows pass through.
pub struct DelimitedRowSource<R: Read> {
    reader: csv::Reader<R>,
    record: csv::ByteRecord,
    encoding: &'static Encoding,
}

impl<R: Read> DelimitedRowSource<R> {
    pub fn new(input: R, delimiter: u8, encoding: &'static Encoding) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .delimiter(delimiter)
            .double_quote(true)
            .flexible(true)
            .from_reader(input);
        Self {
            reader,
            record: csv::ByteRecord::new(),
            encoding,
        }
    }
}

impl<R: Read> RowSource for DelimitedRowSource<R> {
    fn next_row(&mut self) -> Result<Option<RawRow>> {
        if !self.reader.read_byte_record(&mut self.record)? {
            return Ok(None);
        }
        let mut cells = Vec::with_capacity(self.record.len());
        for field in self.record.iter() {
            if field.is_empty() {
                cells.push(None);
                continue;
            }
            let decoded = io_utils::decode_bytes(field, self.encoding)?;
            let trimmed = decoded.trim();
            cells.push((!trimmed.is_empty()).then(|| trimmed.to_string()));
        }
        Ok(Some(cells))
    }
}

/// In-memory row source, mainly for construction from non-file collaborators
/// and for tests.
pub struct VecRowSource {
    rows: std::vec::IntoIter<RawRow>,
}

impl VecRowSource {
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self {
            rows: rows.into_iter(),
        }
    }

    /// Convenience constructor from borrowed text; empty strings become
    /// `None` cells.
    pub fn from_text(rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        let trimmed = cell.trim();
                        (!trimmed.is_empty()).then(|| trimmed.to_string())
                    })
                    .collect()
            })
            .collect();
        Self::new(rows)
    }
}

impl RowSource for VecRowSource {
    fn next_row(&mut self) -> Result<Option<RawRow>> {
        Ok(self.rows.next())
    }
}

/// Convert one raw row into typed cells under a descriptor list. Each cell
/// converts through its column's possible-kind mask in precedence order;
/// missing or blank cells come back as `None`.
pub fn parse_typed_row(
    columns: &[ColumnFeatureDescriptor],
    cells: &RawRow,
) -> Result<Vec<Option<Value>>> {
    columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let Some(text) = cells.get(idx).and_then(|cell| cell.as_deref()) else {
                return Ok(None);
            };
            let value = convert_with_mask(text, column.possible_kinds())
                .map_err(|err| anyhow::Error::new(err).context(format!("Column '{}'", column.name())))?;
            Ok(Some(value))
        })
        .collect()
}
