use std::io::{Read, Write};
use std::time::Duration;

use crate::error::{Result, TransportError};

/// A connected serial stream implementing `Read + Write`.
///
/// This is the I/O type returned by [`crate::open`]. Anything else that
/// implements `Read + Write` (a pty, a socket, an in-memory fake) can stand in
/// for it at the protocol layers.
pub struct SerialStream {
    inner: Box<dyn serialport::SerialPort>,
    name: String,
}

impl Read for SerialStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for SerialStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

impl SerialStream {
    pub(crate) fn from_port(inner: Box<dyn serialport::SerialPort>, name: String) -> Self {
        Self { inner, name }
    }

    /// The device path this stream was opened on.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current read/write timeout.
    pub fn timeout(&self) -> Duration {
        self.inner.timeout()
    }

    /// Discard bytes received but not yet read.
    ///
    /// Useful after a failed exchange so a late response cannot be mistaken
    /// for the answer to the next command.
    pub fn clear_input(&self) -> Result<()> {
        self.inner
            .clear(serialport::ClearBuffer::Input)
            .map_err(|source| TransportError::Configure {
                port: self.name.clone(),
                source,
            })
    }
}

impl std::fmt::Debug for SerialStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialStream")
            .field("name", &self.name)
            .field("timeout", &self.inner.timeout())
            .finish()
    }
}
