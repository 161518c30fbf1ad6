//! Compression detection and decompression support.
//!
//! Provides a `DecompressReader<R>` that reads either plain or gzip data and
//! implements `Read`. Uses enum dispatch, mirroring [`super::CompressWriter`]
//! on the output side.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use flate2::read::GzDecoder;

/// Detected or requested compression format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// No compression
    None,
    /// Gzip (.gz)
    Gzip,
}

impl Compression {
    /// Detect compression format from magic bytes.
    pub fn detect(data: &[u8]) -> Self {
        match data {
            // Gzip: 1f 8b, deflate method 08
            [0x1f, 0x8b, 0x08, ..] => Compression::Gzip,
            _ => Compression::None,
        }
    }

    /// Get the typical file extension for this compression format.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            Compression::None => None,
            Compression::Gzip => Some("gz"),
        }
    }

    /// Check if this represents compressed data.
    pub fn is_compressed(&self) -> bool {
        !matches!(self, Compression::None)
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compression::None => write!(f, "none"),
            Compression::Gzip => write!(f, "gzip"),
        }
    }
}

/// Decompression reader over plain or gzip input.
pub enum DecompressReader<R: Read> {
    /// No compression - pass-through
    None(R),

    /// Gzip decompression
    Gzip(GzDecoder<R>),
}

impl<R: Read> DecompressReader<R> {
    /// Create a decompression reader with explicit compression format.
    pub fn new(source: R, compression: Compression) -> Self {
        match compression {
            Compression::None => DecompressReader::None(source),
            Compression::Gzip => DecompressReader::Gzip(GzDecoder::new(source)),
        }
    }

    /// Get the compression format this reader handles.
    pub fn compression(&self) -> Compression {
        match self {
            DecompressReader::None(_) => Compression::None,
            DecompressReader::Gzip(_) => Compression::Gzip,
        }
    }
}

impl<R: Read> Read for DecompressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            DecompressReader::None(r) => r.read(buf),
            DecompressReader::Gzip(r) => r.read(buf),
        }
    }
}

/// Type alias for file-based decompression.
pub type FileDecoder = DecompressReader<BufReader<File>>;

impl FileDecoder {
    /// Open a file, detecting compression from its magic bytes.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let mut file = File::open(path)?;

        let mut magic = [0u8; 3];
        let mut filled = 0;
        while filled < magic.len() {
            match file.read(&mut magic[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        file.seek(SeekFrom::Start(0))?;

        let compression = Compression::detect(&magic[..filled]);
        Ok(DecompressReader::new(BufReader::new(file), compression))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::GzEncoder;

    use super::*;

    #[test]
    fn test_detect_no_compression() {
        let data = [0x05, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(Compression::detect(&data), Compression::None);
    }

    #[test]
    fn test_detect_gzip() {
        let data = [0x1f, 0x8b, 0x08, 0x00, 0x00, 0x00];
        assert_eq!(Compression::detect(&data), Compression::Gzip);
    }

    #[test]
    fn test_detect_short_data() {
        let data = [0x1f, 0x8b]; // Too short
        assert_eq!(Compression::detect(&data), Compression::None);
    }

    #[test]
    fn test_compression_display() {
        assert_eq!(format!("{}", Compression::None), "none");
        assert_eq!(format!("{}", Compression::Gzip), "gzip");
        assert_eq!(Compression::Gzip.extension(), Some("gz"));
    }

    #[test]
    fn test_open_detects_gzip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.gz");

        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), flate2::Compression::fast());
        encoder.write_all(b"hello capture").unwrap();
        encoder.finish().unwrap();

        let mut reader = FileDecoder::open(&path).unwrap();
        assert_eq!(reader.compression(), Compression::Gzip);
        let mut out = String::new();
        reader.read_to_string(&mut out).unwrap();
        assert_eq!(out, "hello capture");
    }

    #[test]
    fn test_open_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, b"ab").unwrap();

        let mut reader = FileDecoder::open(&path).unwrap();
        assert_eq!(reader.compression(), Compression::None);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"ab");
    }
}
