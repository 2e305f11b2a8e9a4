use std::io::{ErrorKind, Read};

use tracing::trace;

use crate::codec::{decode_frame, ResponseFrame};
use crate::error::{Result, ShdlcError};
use crate::wire::{to_hex, MAX_RX_FRAME_SIZE, START, STOP};

/// Reads one response frame from any `Read` stream.
///
/// A serial driver may hand a frame over in pieces; the reader keeps reading
/// until the closing marker arrives, the stream stops delivering, or the
/// receive capacity is full, then decodes whatever it holds.
pub struct FrameReader<T> {
    inner: T,
    buf: Box<[u8]>,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader sized for the largest response frame.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: vec![0u8; MAX_RX_FRAME_SIZE].into_boxed_slice(),
        }
    }

    /// Read and decode the next response (blocking).
    ///
    /// `max_payload` is the response length expected for the command just
    /// sent. A read that times out after some bytes arrived is decoded as a
    /// short frame; one that times out with nothing received is an I/O error.
    pub fn read_frame(&mut self, max_payload: usize) -> Result<ResponseFrame> {
        let mut filled = 0usize;
        while filled < self.buf.len() && !frame_complete(&self.buf[..filled]) {
            let read = match self.inner.read(&mut self.buf[filled..]) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::TimedOut && filled > 0 => break,
                Err(err) => return Err(ShdlcError::Io(err)),
            };

            if read == 0 {
                break;
            }
            filled += read;
        }

        let raw = &self.buf[..filled];
        trace!(len = filled, frame = %to_hex(raw), "received frame");
        decode_frame(raw, max_payload)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

/// A buffer holds a whole frame once a stop marker follows the start marker.
/// Stop markers are never stuffed, so the first one closes the frame. A buffer
/// that does not open with a start marker is handed to the decoder as is.
fn frame_complete(raw: &[u8]) -> bool {
    match raw.split_first() {
        Some((&START, rest)) => rest.contains(&STOP),
        Some(_) => true,
        None => false,
    }
}
