use crate::status::StatusCode;

/// Errors that can occur while exchanging SHDLC frames with a device.
#[derive(Debug, thiserror::Error)]
pub enum ShdlcError {
    /// The transport failed to write or read.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The request payload does not fit in a frame.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// Fewer bytes were read than the smallest valid response.
    #[error("frame too short ({len} bytes, min {min})")]
    FrameTooShort { len: usize, min: usize },

    /// The first byte read was not a start marker.
    #[error("missing start marker (found 0x{found:02X})")]
    MissingStartMarker { found: u8 },

    /// The byte after the checksum was not a stop marker.
    #[error("missing stop marker at offset {offset}")]
    MissingStopMarker { offset: usize },

    /// The frame ended inside an escape sequence or before its checksum.
    #[error("frame truncated at offset {offset}")]
    TruncatedFrame { offset: usize },

    /// The received checksum disagrees with the one computed over the frame.
    #[error("checksum mismatch (computed 0x{computed:02X}, received 0x{received:02X})")]
    ChecksumMismatch { computed: u8, received: u8 },

    /// The frame ended before the declared number of payload bytes arrived.
    #[error("incomplete response ({received} of {declared} payload bytes)")]
    IncompleteResponse { declared: usize, received: usize },

    /// The declared payload length is not what the command answers with.
    #[error(
        "unexpected response length for command 0x{command:02X} (expected {expected}, declared {declared})"
    )]
    UnexpectedResponseLength {
        command: u8,
        expected: usize,
        declared: usize,
    },

    /// The device answered with a non-zero state byte.
    #[error("device error on command 0x{command:02X}: {status}")]
    DeviceError { command: u8, status: StatusCode },
}

impl ShdlcError {
    /// Returns true for malformed or corrupted frames, as opposed to transport
    /// failures, caller errors, or errors reported by the device itself.
    pub fn is_frame_error(&self) -> bool {
        matches!(
            self,
            ShdlcError::FrameTooShort { .. }
                | ShdlcError::MissingStartMarker { .. }
                | ShdlcError::MissingStopMarker { .. }
                | ShdlcError::TruncatedFrame { .. }
                | ShdlcError::ChecksumMismatch { .. }
                | ShdlcError::IncompleteResponse { .. }
                | ShdlcError::UnexpectedResponseLength { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ShdlcError>;
