use tracing::{debug, info};

use crate::config::SerialConfig;
use crate::error::{Result, TransportError};
use crate::traits::SerialStream;

/// A serial port discovered on this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    /// Device path (`/dev/ttyUSB0`, `COM3`, ...).
    pub name: String,
    /// Port kind: `usb`, `pci`, `bluetooth` or `unknown`.
    pub kind: &'static str,
    /// USB vendor ID, when the port is a USB adapter.
    pub vid: Option<u16>,
    /// USB product ID, when the port is a USB adapter.
    pub pid: Option<u16>,
    /// USB product string, if reported.
    pub product: Option<String>,
    /// USB manufacturer string, if reported.
    pub manufacturer: Option<String>,
    /// USB serial number, if reported.
    pub serial_number: Option<String>,
}

/// Open a serial port configured for the SPS30 (8N1, no flow control).
pub fn open(port: &str, config: &SerialConfig) -> Result<SerialStream> {
    let inner = serialport::new(port, config.baud_rate)
        .data_bits(serialport::DataBits::Eight)
        .parity(serialport::Parity::None)
        .stop_bits(serialport::StopBits::One)
        .flow_control(serialport::FlowControl::None)
        .timeout(config.timeout)
        .open()
        .map_err(|source| TransportError::Open {
            port: port.to_string(),
            source,
        })?;

    info!(port, baud_rate = config.baud_rate, "opened serial port");

    let stream = SerialStream::from_port(inner, port.to_string());
    // Bytes left over from a previous session would be read as the first response.
    stream.clear_input()?;
    debug!(port, timeout = ?config.timeout, "cleared stale input");
    Ok(stream)
}

/// List serial ports available on this host.
pub fn available_ports() -> Result<Vec<PortInfo>> {
    let ports = serialport::available_ports().map_err(TransportError::Enumerate)?;
    debug!(count = ports.len(), "enumerated serial ports");
    Ok(ports.into_iter().map(PortInfo::from).collect())
}

impl From<serialport::SerialPortInfo> for PortInfo {
    fn from(info: serialport::SerialPortInfo) -> Self {
        let mut out = PortInfo {
            name: info.port_name,
            kind: "unknown",
            vid: None,
            pid: None,
            product: None,
            manufacturer: None,
            serial_number: None,
        };
        match info.port_type {
            serialport::SerialPortType::UsbPort(usb) => {
                out.kind = "usb";
                out.vid = Some(usb.vid);
                out.pid = Some(usb.pid);
                out.product = usb.product;
                out.manufacturer = usb.manufacturer;
                out.serial_number = usb.serial_number;
            }
            serialport::SerialPortType::PciPort => out.kind = "pci",
            serialport::SerialPortType::BluetoothPort => out.kind = "bluetooth",
            _ => {}
        }
        out
    }
}
