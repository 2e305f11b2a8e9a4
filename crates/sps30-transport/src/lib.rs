//! Serial transport for Sensirion SPS30 sensors.
//!
//! The SPS30 speaks SHDLC over a UART at 115200 baud, 8 data bits, no parity,
//! one stop bit. This crate opens and configures such a port and hands back a
//! [`SerialStream`], which implements `Read + Write` and is the only thing the
//! protocol layers above need.

pub mod config;
pub mod error;
pub mod serial;
pub mod traits;

pub use config::{SerialConfig, DEFAULT_BAUD_RATE, DEFAULT_TIMEOUT};
pub use error::{Result, TransportError};
pub use serial::{available_ports, open, PortInfo};
pub use traits::SerialStream;
