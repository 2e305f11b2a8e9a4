//! Driver for the Sensirion SPS30 particulate matter sensor over its UART
//! (SHDLC) interface.
//!
//! # Crate Structure
//!
//! - [`transport`]: serial port opening and enumeration
//! - [`shdlc`]: SHDLC framing: stuffing, checksums, frame encode/decode
//! - [`device`]: command layer and typed sensor records
//!
//! ```no_run
//! let port = sps30::transport::open("/dev/ttyUSB0", &Default::default())?;
//! let mut sensor = sps30::Device::new(port);
//! sensor.wakeup()?;
//! sensor.start_measurement()?;
//! let sample = sensor.read_measurement()?;
//! println!("PM2.5: {} µg/m³", sample.mass_pm2_5);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Re-export transport types.
pub mod transport {
    pub use sps30_transport::*;
}

/// Re-export SHDLC framing types.
pub mod shdlc {
    pub use sps30_shdlc::*;
}

/// Re-export device types.
pub mod device {
    pub use sps30_device::*;
}

pub use sps30_device::{Device, DeviceStatus, Measurement, VersionInfo};
pub use sps30_shdlc::{ShdlcError, StatusCode};
pub use sps30_transport::{SerialConfig, SerialStream};

/// Open `port` with `config` and wrap it in a [`Device`].
pub fn open(
    port: &str,
    config: &SerialConfig,
) -> Result<Device<SerialStream>, sps30_transport::TransportError> {
    sps30_transport::open(port, config).map(Device::new)
}
