//! Wire-level constants.

/// Start-of-frame marker. Never stuffed.
pub const START: u8 = 0x7E;

/// End-of-frame marker. Never stuffed.
pub const STOP: u8 = 0x7E;

/// Escape byte introducing a stuffed pair.
pub const ESCAPE: u8 = 0x7D;

/// XOR mask applied to the byte following [`ESCAPE`].
pub const ESCAPE_XOR: u8 = 0x20;

/// Byte values that must be stuffed inside a frame.
pub const RESERVED: [u8; 4] = [0x11, 0x13, 0x7D, 0x7E];

/// Address of the single peripheral on the link.
pub const PERIPHERAL_ADDRESS: u8 = 0x00;

/// Largest payload a one-byte length field can describe.
pub const MAX_PAYLOAD: usize = 255;

/// Transmit capacity: markers + (4 header + 255 payload) * 2 for stuffing.
pub const MAX_TX_FRAME_SIZE: usize = 520;

/// Receive capacity: markers + (5 header + 255 payload) * 2 for stuffing.
pub const MAX_RX_FRAME_SIZE: usize = 522;

/// Smallest valid response: start, address, command, state, length, checksum, stop.
pub const MIN_FRAME_SIZE: usize = 7;

/// Returns true if the byte must be escaped inside a frame.
pub fn is_reserved(byte: u8) -> bool {
    RESERVED.contains(&byte)
}

/// Lowercase hex rendering of a byte slice, for trace logs.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}
