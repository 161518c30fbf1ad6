//! Length-delimited framing.
//!
//! Each frame is an unsigned LEB128 varint length followed by that many
//! payload bytes. Binary record files are a sequence of frames whose
//! payloads are bincode-encoded records.

use std::io::{self, Read};

use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;

use crate::error::{Error, FrameError, Result};

/// Longest valid varint encoding of a u64.
pub const MAX_VARINT_LEN: usize = 10;

/// Largest frame payload the reader accepts.
pub const MAX_FRAME_LEN: usize = 64 * 1024 * 1024;

/// Append `value` as an unsigned LEB128 varint.
pub fn put_varint(buf: &mut impl BufMut, mut value: u64) {
    while value >= 0x80 {
        buf.put_u8((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

/// Decode a varint from the start of `buf`.
///
/// Returns the value and the number of bytes consumed, or `None` if `buf`
/// ends before the varint does.
pub fn get_varint(buf: &[u8]) -> std::result::Result<Option<(u64, usize)>, FrameError> {
    let mut value: u64 = 0;
    for (i, &byte) in buf.iter().enumerate().take(MAX_VARINT_LEN) {
        let bits = u64::from(byte & 0x7f);
        if i == MAX_VARINT_LEN - 1 && bits > 1 {
            return Err(FrameError::BadLength);
        }
        value |= bits << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(Some((value, i + 1)));
        }
    }
    if buf.len() >= MAX_VARINT_LEN {
        Err(FrameError::BadLength)
    } else {
        Ok(None)
    }
}

/// Frame raw payload bytes.
pub fn frame_bytes(payload: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(payload.len() + MAX_VARINT_LEN);
    put_varint(&mut buf, payload.len() as u64);
    buf.extend_from_slice(payload);
    buf.freeze()
}

/// Serialize a value with bincode and frame it.
pub fn encode_frame<T: Serialize>(value: &T) -> Result<Bytes> {
    let body = bincode::serialize(value)?;
    Ok(frame_bytes(&body))
}

/// Split one frame off the front of `buf`.
///
/// Returns the payload and the remaining bytes.
pub fn split_frame(buf: &[u8]) -> std::result::Result<(&[u8], &[u8]), FrameError> {
    let (len, prefix) = get_varint(buf)?.ok_or(FrameError::Truncated {
        expected: 1,
        actual: buf.len(),
    })?;
    let rest = &buf[prefix..];
    let len = usize::try_from(len).map_err(|_| FrameError::BadLength)?;
    if rest.len() < len {
        return Err(FrameError::Truncated {
            expected: len,
            actual: rest.len(),
        });
    }
    Ok(rest.split_at(len))
}

/// Reads frames sequentially from a byte stream.
pub struct DelimitedReader<R: Read> {
    inner: R,
    max_frame_len: usize,
    frames_read: u64,
}

impl<R: Read> DelimitedReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            max_frame_len: MAX_FRAME_LEN,
            frames_read: 0,
        }
    }

    /// Override the largest accepted frame.
    pub fn with_max_frame_len(mut self, max: usize) -> Self {
        self.max_frame_len = max;
        self
    }

    /// Number of complete frames read so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Read the next frame payload.
    ///
    /// Returns `Ok(None)` on a clean end of stream, i.e. between frames.
    pub fn next_frame(&mut self) -> Result<Option<Vec<u8>>> {
        let len = match self.read_length()? {
            Some(len) => len,
            None => return Ok(None),
        };
        if len > self.max_frame_len as u64 {
            return Err(FrameError::TooLarge {
                len,
                limit: self.max_frame_len,
            }
            .into());
        }

        let len = len as usize;
        let mut payload = Vec::with_capacity(len);
        let actual = (&mut self.inner).take(len as u64).read_to_end(&mut payload)?;
        if actual < len {
            return Err(FrameError::Truncated {
                expected: len,
                actual,
            }
            .into());
        }

        self.frames_read += 1;
        Ok(Some(payload))
    }

    /// Read the next frame and deserialize it.
    pub fn next_value<T: serde::de::DeserializeOwned>(&mut self) -> Result<Option<T>> {
        match self.next_frame()? {
            Some(payload) => Ok(Some(bincode::deserialize(&payload)?)),
            None => Ok(None),
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn read_length(&mut self) -> Result<Option<u64>> {
        let mut prefix = [0u8; MAX_VARINT_LEN];
        for i in 0..MAX_VARINT_LEN {
            let mut byte = [0u8; 1];
            let n = loop {
                match self.inner.read(&mut byte) {
                    Ok(n) => break n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(Error::Io(e)),
                }
            };
            if n == 0 {
                if i == 0 {
                    return Ok(None);
                }
                return Err(FrameError::Truncated {
                    expected: i + 1,
                    actual: i,
                }
                .into());
            }
            prefix[i] = byte[0];
            if byte[0] & 0x80 == 0 {
                return match get_varint(&prefix[..=i])? {
                    Some((len, _)) => Ok(Some(len)),
                    None => Err(FrameError::BadLength.into()),
                };
            }
        }
        Err(FrameError::BadLength.into())
    }
}
