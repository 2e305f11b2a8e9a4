use std::time::Duration;

/// Baud rate the SPS30 UART interface is fixed to.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default blocking read timeout.
///
/// The sensor answers within 20 ms for most commands; a read measurement
/// response is the slowest at well under a second.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Serial line configuration.
///
/// Data bits, parity, stop bits and flow control are dictated by the sensor
/// (8N1, no flow control) and are not configurable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Line speed in baud. Default: 115200.
    pub baud_rate: u32,
    /// Read/write timeout for blocking operations. Default: 1s.
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
