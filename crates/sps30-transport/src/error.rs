/// Errors that can occur while opening or driving a serial port.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the named serial port.
    #[error("failed to open {port}: {source}")]
    Open {
        port: String,
        source: serialport::Error,
    },

    /// The port opened but rejected a setting.
    #[error("failed to configure {port}: {source}")]
    Configure {
        port: String,
        source: serialport::Error,
    },

    /// Serial port enumeration failed.
    #[error("failed to enumerate serial ports: {0}")]
    Enumerate(serialport::Error),

    /// An I/O error occurred on the serial stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// The `std::io::ErrorKind` closest to this failure, for exit-code mapping.
    pub fn io_kind(&self) -> std::io::ErrorKind {
        match self {
            TransportError::Open { source, .. }
            | TransportError::Configure { source, .. }
            | TransportError::Enumerate(source) => match source.kind() {
                serialport::ErrorKind::Io(kind) => kind,
                serialport::ErrorKind::NoDevice => std::io::ErrorKind::NotFound,
                serialport::ErrorKind::InvalidInput => std::io::ErrorKind::InvalidInput,
                _ => std::io::ErrorKind::Other,
            },
            TransportError::Io(err) => err.kind(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
