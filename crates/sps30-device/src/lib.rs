//! Sensirion SPS30 command layer.
//!
//! [`Device`] drives the sensor over any blocking `Read + Write` stream,
//! one request frame and one response frame per operation. Responses are
//! decoded into [`VersionInfo`], [`Measurement`] and [`DeviceStatus`].

pub mod command;
pub mod device;
pub mod types;

pub use command::{by_code, CommandDescriptor, COMMANDS, WAKE_PULSE};
pub use device::Device;
pub use sps30_shdlc::{Result, ShdlcError, StatusCode};
pub use types::{
    DeviceStatus, Measurement, VersionInfo, STATUS_FAN_FAILURE, STATUS_FAN_SPEED_WARNING,
    STATUS_LASER_FAILURE,
};
