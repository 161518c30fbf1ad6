//! Optional gzip compression on the output side.

use std::io::{self, Write};

use flate2::write::GzEncoder;

use super::Compression;

/// Writer that either passes bytes through or gzips them.
pub enum CompressWriter<W: Write> {
    /// No compression - pass-through
    None(W),

    /// Gzip compression
    Gzip(GzEncoder<W>),
}

impl<W: Write> CompressWriter<W> {
    /// Wrap `inner`. `level` is only used for gzip (0-9).
    pub fn new(inner: W, compression: Compression, level: u32) -> Self {
        match compression {
            Compression::None => CompressWriter::None(inner),
            Compression::Gzip => {
                CompressWriter::Gzip(GzEncoder::new(inner, flate2::Compression::new(level)))
            }
        }
    }

    pub fn compression(&self) -> Compression {
        match self {
            CompressWriter::None(_) => Compression::None,
            CompressWriter::Gzip(_) => Compression::Gzip,
        }
    }

    /// Write the gzip trailer, if any, and return the inner writer.
    ///
    /// The inner writer is not flushed.
    pub fn finish(self) -> io::Result<W> {
        match self {
            CompressWriter::None(w) => Ok(w),
            CompressWriter::Gzip(w) => w.finish(),
        }
    }
}

impl<W: Write> Write for CompressWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            CompressWriter::None(w) => w.write(buf),
            CompressWriter::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            CompressWriter::None(w) => w.flush(),
            CompressWriter::Gzip(w) => w.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use flate2::read::GzDecoder;

    use super::*;

    #[test]
    fn test_passthrough() {
        let mut writer = CompressWriter::new(Vec::new(), Compression::None, 6);
        writer.write_all(b"plain").unwrap();
        assert_eq!(writer.finish().unwrap(), b"plain");
    }

    #[test]
    fn test_gzip_finish_writes_trailer() {
        let mut writer = CompressWriter::new(Vec::new(), Compression::Gzip, 9);
        assert_eq!(writer.compression(), Compression::Gzip);
        writer.write_all(b"compressed body").unwrap();
        let bytes = writer.finish().unwrap();
        assert_eq!(Compression::detect(&bytes), Compression::Gzip);

        let mut out = String::new();
        GzDecoder::new(&bytes[..]).read_to_string(&mut out).unwrap();
        assert_eq!(out, "compressed body");
    }
}
