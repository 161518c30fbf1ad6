//! Reading binary record files back.
//!
//! ```rust,no_run
//! use capflow_core::reader::RecordReader;
//!
//! let mut reader = RecordReader::open("out/TCP.ncap.gz").unwrap();
//! println!("{} from {}", reader.header().record_type, reader.header().source);
//! for record in reader.records() {
//!     let record = record.unwrap();
//!     println!("{} columns", record.len());
//! }
//! ```

use std::io::Read;
use std::path::Path;

use crate::error::{FrameError, Result};
use crate::io::{DelimitedReader, FileDecoder};
use crate::record::{Header, Record};

/// Reads a header followed by records from a `.ncap` or `.ncap.gz` stream.
pub struct RecordReader<R: Read> {
    frames: DelimitedReader<R>,
    header: Header,
}

impl RecordReader<FileDecoder> {
    /// Open a record file, detecting gzip from its contents.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(FileDecoder::open(path)?)
    }
}

impl<R: Read> RecordReader<R> {
    /// Wrap a stream and read its header.
    pub fn new(inner: R) -> Result<Self> {
        let mut frames = DelimitedReader::new(inner);
        let header = frames
            .next_value::<Header>()?
            .ok_or(FrameError::Truncated {
                expected: 1,
                actual: 0,
            })?;
        Ok(Self { frames, header })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Read the next record, or `None` at end of stream.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        self.frames.next_value()
    }

    /// Number of data records read so far.
    pub fn records_read(&self) -> u64 {
        self.frames.frames_read().saturating_sub(1)
    }

    /// Iterate over the remaining records.
    pub fn records(&mut self) -> Records<'_, R> {
        Records { reader: self }
    }
}

/// Iterator over records; stops after the first error.
pub struct Records<'a, R: Read> {
    reader: &'a mut RecordReader<R>,
}

impl<R: Read> Iterator for Records<'_, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next_record().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::io::encode_frame;
    use crate::record::Value;
    use crate::schema::{FieldDescriptor, RecordSchema};

    const FIELDS: &[FieldDescriptor] = &[FieldDescriptor::timestamp()];

    fn stream(records: &[i64]) -> Vec<u8> {
        let header = Header::new(&RecordSchema::new("NC_Test", FIELDS), "unit", true);
        let mut data = encode_frame(&header).unwrap().to_vec();
        for &ts in records {
            let record = Record::new(vec![Value::Timestamp(ts)]);
            data.extend_from_slice(&encode_frame(&record).unwrap());
        }
        data
    }

    #[test]
    fn test_reads_header_and_records() {
        let data = stream(&[1, 2, 3]);
        let mut reader = RecordReader::new(&data[..]).unwrap();
        assert_eq!(reader.header().record_type, "NC_Test");

        let timestamps: Vec<_> = reader
            .records()
            .map(|r| r.unwrap().values[0].clone())
            .collect();
        assert_eq!(
            timestamps,
            vec![Value::Timestamp(1), Value::Timestamp(2), Value::Timestamp(3)]
        );
        assert_eq!(reader.records_read(), 3);
    }

    #[test]
    fn test_empty_stream_has_no_header() {
        assert!(matches!(
            RecordReader::new(&[0u8; 0][..]),
            Err(Error::Frame(FrameError::Truncated { .. }))
        ));
    }

    #[test]
    fn test_truncated_record_is_an_error() {
        let data = stream(&[1]);
        let mut reader = RecordReader::new(&data[..data.len() - 1]).unwrap();
        assert!(reader.next_record().is_err());
    }
}
