//! SHDLC framing for Sensirion sensors.
//!
//! Every frame on the wire is:
//! - A `0x7E` start marker
//! - A byte-stuffed header: address, command, (state, on responses) and payload length
//! - The byte-stuffed payload
//! - A byte-stuffed one's-complement checksum over the logical header and payload
//! - A `0x7E` stop marker
//!
//! Encoding and decoding work on whole frames; each request is one write and
//! each response is one read.

pub mod checksum;
pub mod codec;
pub mod error;
pub mod reader;
pub mod status;
pub mod stuffing;
pub mod wire;
pub mod writer;

pub use checksum::checksum;
pub use codec::{decode_frame, encode_frame, encoded_len, FrameHeader, ResponseFrame};
pub use error::{Result, ShdlcError};
pub use reader::FrameReader;
pub use status::StatusCode;
pub use stuffing::{destuff, destuff_all, stuff, stuff_into};
pub use wire::{
    MAX_PAYLOAD, MAX_RX_FRAME_SIZE, MAX_TX_FRAME_SIZE, MIN_FRAME_SIZE, PERIPHERAL_ADDRESS,
};
pub use writer::FrameWriter;
