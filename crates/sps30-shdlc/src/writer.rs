use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use tracing::trace;

use crate::codec::encode_frame;
use crate::error::{Result, ShdlcError};
use crate::wire::{to_hex, MAX_TX_FRAME_SIZE};

/// Writes complete request frames to any `Write` stream.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(MAX_TX_FRAME_SIZE),
        }
    }

    /// Encode and send a request frame (blocking).
    ///
    /// The frame is fully encoded before anything is written, so a rejected
    /// payload leaves the stream untouched.
    pub fn send(&mut self, address: u8, command: u8, payload: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_frame(address, command, payload, &mut self.buf)?;
        trace!(command, frame = %to_hex(&self.buf), "sending frame");

        write_fully(&mut self.inner, &self.buf)?;
        self.flush()
    }

    /// Send bytes unframed, e.g. the wake-up pulse.
    pub fn send_raw(&mut self, bytes: &[u8]) -> Result<()> {
        trace!(bytes = %to_hex(bytes), "sending raw bytes");
        write_fully(&mut self.inner, bytes)?;
        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(ShdlcError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

fn write_fully<W: Write>(dst: &mut W, bytes: &[u8]) -> Result<()> {
    let mut offset = 0usize;
    while offset < bytes.len() {
        match dst.write(&bytes[offset..]) {
            Ok(0) => {
                return Err(ShdlcError::Io(std::io::Error::new(
                    ErrorKind::WriteZero,
                    "transport accepted no bytes",
                )))
            }
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(ShdlcError::Io(err)),
        }
    }
    Ok(())
}
