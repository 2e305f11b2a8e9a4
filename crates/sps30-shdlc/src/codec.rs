use bytes::{BufMut, Bytes, BytesMut};
use tracing::warn;

use crate::checksum::checksum;
use crate::error::{Result, ShdlcError};
use crate::status::StatusCode;
use crate::stuffing::{destuff, stuff_into, stuffed_len};
use crate::wire::{MAX_PAYLOAD, MAX_TX_FRAME_SIZE, MIN_FRAME_SIZE, START, STOP};

/// Logical header of a response frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Peripheral address.
    pub address: u8,
    /// Command the response answers.
    pub command: u8,
    /// Device state byte; 0 on success.
    pub status: u8,
    /// Payload length asserted by the device.
    pub declared_length: u8,
}

impl FrameHeader {
    /// The device-reported error, if the state byte is non-zero.
    pub fn status_code(&self) -> Option<StatusCode> {
        StatusCode::from_state(self.status)
    }

    /// Fail with [`ShdlcError::DeviceError`] if the state byte is non-zero.
    pub fn check_status(&self) -> Result<()> {
        match self.status_code() {
            Some(status) => Err(ShdlcError::DeviceError {
                command: self.command,
                status,
            }),
            None => Ok(()),
        }
    }

    /// Fail with [`ShdlcError::UnexpectedResponseLength`] unless the declared
    /// length is exactly `expected`.
    pub fn check_length(&self, expected: usize) -> Result<()> {
        let declared = self.declared_length as usize;
        if declared != expected {
            return Err(ShdlcError::UnexpectedResponseLength {
                command: self.command,
                expected,
                declared,
            });
        }
        Ok(())
    }
}

/// A decoded response: header plus destuffed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFrame {
    pub header: FrameHeader,
    pub payload: Bytes,
}

impl ResponseFrame {
    /// Split into header and payload.
    pub fn into_parts(self) -> (FrameHeader, Bytes) {
        (self.header, self.payload)
    }
}

/// Size of the stuffed request frame for this address, command and payload.
pub fn encoded_len(address: u8, command: u8, payload: &[u8]) -> usize {
    let length = payload.len().min(MAX_PAYLOAD) as u8;
    let crc = checksum(address.wrapping_add(command), length, payload);
    2 + stuffed_len(&[address, command, length]) + stuffed_len(payload) + stuffed_len(&[crc])
}

/// Encode a request frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌───────┬──────────┬──────────┬──────────┬─────────────┬──────────┬──────┐
/// │ Start │ Address  │ Command  │ Length   │ Payload     │ Checksum │ Stop │
/// │ 0x7E  │ stuffed  │ stuffed  │ stuffed  │ stuffed     │ stuffed  │ 0x7E │
/// └───────┴──────────┴──────────┴──────────┴─────────────┴──────────┴──────┘
/// ```
///
/// Nothing is appended to `dst` when the payload is rejected.
pub fn encode_frame(address: u8, command: u8, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > MAX_PAYLOAD {
        return Err(ShdlcError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD,
        });
    }

    let size = encoded_len(address, command, payload);
    if size > MAX_TX_FRAME_SIZE {
        return Err(ShdlcError::PayloadTooLarge {
            size,
            max: MAX_TX_FRAME_SIZE,
        });
    }

    let length = payload.len() as u8;
    let crc = checksum(address.wrapping_add(command), length, payload);

    dst.reserve(size);
    dst.put_u8(START);
    stuff_into(&[address, command, length], dst);
    stuff_into(payload, dst);
    stuff_into(&[crc], dst);
    dst.put_u8(STOP);
    Ok(())
}

/// Decode one response frame from a freshly read buffer.
///
/// `max_payload` is the response length the caller expects for the command it
/// issued; a larger declared length is rejected before any payload is read.
/// A smaller one decodes normally so the caller can compare it against its
/// expectation.
pub fn decode_frame(raw: &[u8], max_payload: usize) -> Result<ResponseFrame> {
    if raw.len() < MIN_FRAME_SIZE {
        return Err(ShdlcError::FrameTooShort {
            len: raw.len(),
            min: MIN_FRAME_SIZE,
        });
    }

    if raw[0] != START {
        return Err(ShdlcError::MissingStartMarker { found: raw[0] });
    }

    let mut cursor = 1;
    let mut fields = [0u8; 4];
    for field in fields.iter_mut() {
        let (byte, next) = destuff(raw, cursor)?;
        *field = byte;
        cursor = next;
    }
    let header = FrameHeader {
        address: fields[0],
        command: fields[1],
        status: fields[2],
        declared_length: fields[3],
    };

    let declared = header.declared_length as usize;
    if declared > max_payload {
        return Err(ShdlcError::UnexpectedResponseLength {
            command: header.command,
            expected: max_payload,
            declared,
        });
    }

    // An unescaped marker can only be the end of the frame.
    let mut payload = BytesMut::with_capacity(declared);
    while payload.len() < declared {
        if matches!(raw.get(cursor), None | Some(&STOP)) {
            break;
        }
        let (byte, next) = destuff(raw, cursor)?;
        payload.put_u8(byte);
        cursor = next;
    }
    if payload.len() < declared {
        return Err(ShdlcError::IncompleteResponse {
            declared,
            received: payload.len(),
        });
    }

    if matches!(raw.get(cursor), None | Some(&STOP)) {
        return Err(ShdlcError::TruncatedFrame { offset: cursor });
    }
    let (received, next) = destuff(raw, cursor)?;
    let header_sum = header
        .address
        .wrapping_add(header.command)
        .wrapping_add(header.status);
    let computed = checksum(header_sum, header.declared_length, &payload);
    if computed != received {
        warn!(
            command = header.command,
            computed, received, "SHDLC checksum mismatch"
        );
        return Err(ShdlcError::ChecksumMismatch { computed, received });
    }
    cursor = next;

    if raw.get(cursor) != Some(&STOP) {
        return Err(ShdlcError::MissingStopMarker { offset: cursor });
    }

    Ok(ResponseFrame {
        header,
        payload: payload.freeze(),
    })
}
