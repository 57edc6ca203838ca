//! Comma-separated record reader over any `BufRead`.
//!
//! No quoting: a field never contains a comma. Blank lines are skipped
//! but still counted so reported line numbers match the raw file.

use crate::{
    error::IngestError,
    row_parser::FIELD_COUNT,
    types::LineNumber,
};
use std::io::BufRead;

/// One raw record and the physical line it came from.
pub type Record = (LineNumber, [String; FIELD_COUNT]);

pub struct RecordReader<R> {
    inner: R,
    line: LineNumber,
    buffer: String,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: 0,
            buffer: String::new(),
        }
    }

    /// Line number of the most recently read line (0 before the first read).
    pub fn line(&self) -> LineNumber {
        self.line
    }

    fn read_record(&mut self) -> Option<Result<Record, IngestError>> {
        loop {
            self.buffer.clear();
            self.line += 1;
            match self.inner.read_line(&mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(source) => {
                    return Some(Err(IngestError::Read {
                        line: self.line,
                        source,
                    }))
                }
            }

            let text = self.buffer.trim_end_matches(['\n', '\r']);
            if text.is_empty() {
                continue;
            }

            let fields: Vec<String> = text.split(',').map(str::to_string).collect();
            let found = fields.len();
            return Some(
                <[String; FIELD_COUNT]>::try_from(fields)
                    .map(|fields| (self.line, fields))
                    .map_err(|_| IngestError::FieldCount {
                        line: self.line,
                        expected: FIELD_COUNT,
                        found,
                    }),
            );
        }
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<Record, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record()
    }
}
