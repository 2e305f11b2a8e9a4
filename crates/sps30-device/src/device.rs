use std::io::{Read, Write};

use bytes::Bytes;
use sps30_shdlc::{
    FrameReader, FrameWriter, ResponseFrame, Result, ShdlcError, StatusCode, PERIPHERAL_ADDRESS,
};
use tracing::{debug, warn};

use crate::command::{
    CommandDescriptor, DEVICE_RESET, READ_DEVICE_STATUS, READ_MEASUREMENT, READ_VERSION, SLEEP,
    START_FAN_CLEANING, START_MEASUREMENT, STOP_MEASUREMENT, WAKE_PULSE, WAKE_UP,
};
use crate::types::{DeviceStatus, Measurement, VersionInfo};

/// An SPS30 attached to a byte stream.
///
/// Every operation writes one request frame and reads one response frame.
/// Nothing is retried; errors are returned to the caller as they occur.
pub struct Device<T> {
    port: T,
}

impl<T: Read + Write> Device<T> {
    /// Wrap an open stream. The stream's read timeout bounds every response.
    pub fn new(port: T) -> Self {
        Self { port }
    }

    /// Send a command and read its response without checking status or length.
    pub fn transceive(&mut self, command: &CommandDescriptor) -> Result<ResponseFrame> {
        FrameWriter::new(&mut self.port).send(PERIPHERAL_ADDRESS, command.code, command.request)?;
        let frame = FrameReader::new(&mut self.port).read_frame(command.response_len as usize)?;

        if frame.header.command != command.code {
            warn!(
                expected = command.code,
                received = frame.header.command,
                "response answers a different command"
            );
        }
        Ok(frame)
    }

    /// Transceive, then require a zero state byte and the expected length.
    fn execute(&mut self, command: &CommandDescriptor) -> Result<Bytes> {
        let frame = self.transceive(command)?;
        if let Err(err) = frame.header.check_status() {
            debug!(command = command.name, error = %err, "device reported an error");
            return Err(err);
        }
        frame.header.check_length(command.response_len as usize)?;
        debug!(command = command.name, len = frame.payload.len(), "command complete");
        Ok(frame.payload)
    }

    /// Pull the device out of sleep.
    ///
    /// A device that is already awake rejects the wake-up command with
    /// "command not allowed"; that counts as success.
    pub fn wakeup(&mut self) -> Result<()> {
        FrameWriter::new(&mut self.port).send_raw(&[WAKE_PULSE])?;
        match self.execute(&WAKE_UP) {
            Err(ShdlcError::DeviceError {
                status: StatusCode::CommandNotAllowed,
                ..
            }) => {
                debug!("device already awake");
                Ok(())
            }
            other => other.map(|_| ()),
        }
    }

    pub fn read_version(&mut self) -> Result<VersionInfo> {
        let payload = self.execute(&READ_VERSION)?;
        VersionInfo::from_payload(&payload)
    }

    /// Start continuous measurement with big-endian float output.
    pub fn start_measurement(&mut self) -> Result<()> {
        self.execute(&START_MEASUREMENT).map(|_| ())
    }

    pub fn stop_measurement(&mut self) -> Result<()> {
        self.execute(&STOP_MEASUREMENT).map(|_| ())
    }

    /// Read the latest sample.
    ///
    /// If the device reports an error but still delivers a full payload, the
    /// decoded values are logged before the error is returned.
    pub fn read_measurement(&mut self) -> Result<Measurement> {
        let frame = self.transceive(&READ_MEASUREMENT)?;
        let measurement = Measurement::from_payload(&frame.payload);

        if let Err(err) = frame.header.check_status() {
            if let Ok(partial) = &measurement {
                debug!(?partial, "measurement delivered with device error");
            }
            debug!(command = READ_MEASUREMENT.name, error = %err, "device reported an error");
            return Err(err);
        }
        frame
            .header
            .check_length(READ_MEASUREMENT.response_len as usize)?;
        measurement
    }

    /// Enter sleep. Only valid while idle.
    pub fn sleep(&mut self) -> Result<()> {
        self.execute(&SLEEP).map(|_| ())
    }

    /// Run the fan at full speed for 10 seconds. Only valid while measuring.
    pub fn start_fan_cleaning(&mut self) -> Result<()> {
        self.execute(&START_FAN_CLEANING).map(|_| ())
    }

    pub fn read_device_status(&mut self) -> Result<DeviceStatus> {
        let payload = self.execute(&READ_DEVICE_STATUS)?;
        DeviceStatus::from_payload(&payload)
    }

    /// Soft reset. The device needs about 100 ms before it answers again.
    pub fn reset(&mut self) -> Result<()> {
        self.execute(&DEVICE_RESET).map(|_| ())
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.port
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.port
    }

    /// Consume the device and return the inner stream.
    pub fn into_inner(self) -> T {
        self.port
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    /// Replays canned device bytes and records everything written.
    struct FakeUart {
        rx: Cursor<Vec<u8>>,
        tx: Vec<u8>,
    }

    impl FakeUart {
        fn replying(hex: &str) -> Self {
            Self {
                rx: Cursor::new(from_hex(hex)),
                tx: Vec::new(),
            }
        }
    }

    impl Read for FakeUart {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.rx.read(buf)
        }
    }

    impl Write for FakeUart {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.tx.write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn from_hex(hex: &str) -> Vec<u8> {
        (0..hex.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).unwrap())
            .collect()
    }

    #[test]
    fn read_version_decodes_fields() {
        let mut device = Device::new(FakeUart::replying("7e00d1000702030007000200197e"));
        let version = device.read_version().unwrap();

        assert_eq!(version.firmware_major, 2);
        assert_eq!(version.firmware_minor, 3);
        assert_eq!(version.hardware_revision, 7);
        assert_eq!(version.protocol_major, 2);
        assert_eq!(version.protocol_minor, 0);
        assert_eq!(device.get_ref().tx, from_hex("7e00d1002e7e"));
    }

    #[test]
    fn wakeup_sends_pulse_then_frame() {
        let mut device = Device::new(FakeUart::replying("7e007d310000ee7e"));
        device.wakeup().unwrap();
        assert_eq!(device.get_ref().tx, from_hex("ff7e007d3100ee7e"));
    }

    #[test]
    fn wakeup_when_already_awake_succeeds() {
        let mut device = Device::new(FakeUart::replying("7e007d314300ab7e"));
        device.wakeup().unwrap();
    }

    #[test]
    fn start_measurement_reports_device_error() {
        let mut device = Device::new(FakeUart::replying("7e00004300bc7e"));
        let err = device.start_measurement().unwrap_err();

        assert!(matches!(
            err,
            ShdlcError::DeviceError {
                command: 0x00,
                status: StatusCode::CommandNotAllowed
            }
        ));
        assert_eq!(device.get_ref().tx, from_hex("7e0000020103f97e"));
    }

    #[test]
    fn read_measurement_with_stuffed_payload() {
        let mut device = Device::new(FakeUart::replying(
            "7e00030028\
             3d2001e33d5adecf3d81cc533d8c48ae3e73397d5e\
             3e97b9033e9e8b9f3e9ff1713ea04e183f365012\
             5a7e",
        ));
        let m = device.read_measurement().unwrap();

        assert_eq!(m.mass_pm1_0.to_bits(), 0x3d20_01e3);
        assert_eq!(m.number_pm0_5.to_bits(), 0x3e73_397e);
        assert_eq!(m.typical_particle_size.to_bits(), 0x3f36_5012);
        assert_eq!(device.get_ref().tx, from_hex("7e000300fc7e"));
    }

    #[test]
    fn read_measurement_exact_values() {
        let mut device = Device::new(FakeUart::replying(
            "7e000300283fc00000401000004040000040840000412800004140000041480000414c0000415000003f000000717e",
        ));
        let m = device.read_measurement().unwrap();
        assert_eq!(m.mass_pm1_0, 1.5);
        assert_eq!(m.mass_pm10_0, 4.125);
        assert_eq!(m.number_pm10_0, 13.0);
        assert_eq!(m.typical_particle_size, 0.5);
    }

    #[test]
    fn empty_measurement_is_length_error() {
        // Right after start the device may answer with no data yet.
        let mut device = Device::new(FakeUart::replying("7e00030000fc7e"));
        let err = device.read_measurement().unwrap_err();
        assert!(matches!(
            err,
            ShdlcError::UnexpectedResponseLength {
                command: 0x03,
                expected: 40,
                declared: 0
            }
        ));
    }

    #[test]
    fn read_device_status_sends_subcommand() {
        let mut device = Device::new(FakeUart::replying("7e00d200050000000000287e"));
        let status = device.read_device_status().unwrap();

        assert!(status.is_ok());
        assert_eq!(device.get_ref().tx, from_hex("7e00d201002c7e"));
    }

    #[test]
    fn simple_commands_frame_correctly() {
        let cases: [(fn(&mut Device<FakeUart>) -> Result<()>, &str, &str); 4] = [
            (Device::stop_measurement, "7e00010000fe7e", "7e000100fe7e"),
            (Device::sleep, "7e00100000ef7e", "7e001000ef7e"),
            (Device::start_fan_cleaning, "7e00560000a97e", "7e005600a97e"),
            (Device::reset, "7e00d300002c7e", "7e00d3002c7e"),
        ];

        for (op, reply, request) in cases {
            let mut device = Device::new(FakeUart::replying(reply));
            op(&mut device).unwrap();
            assert_eq!(device.into_inner().tx, from_hex(request));
        }
    }

    #[test]
    fn silent_device_is_too_short() {
        let mut device = Device::new(FakeUart::replying(""));
        let err = device.sleep().unwrap_err();
        assert!(matches!(err, ShdlcError::FrameTooShort { len: 0, .. }));
    }
}
