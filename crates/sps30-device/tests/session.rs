use std::collections::VecDeque;
use std::io::{self, Read, Write};

use sps30_device::{Device, ShdlcError, StatusCode};

/// Answers each complete request with the next scripted reply, asserting the
/// request bytes on the way.
struct ScriptedSensor {
    script: VecDeque<(Vec<u8>, Vec<u8>)>,
    pending: Vec<u8>,
    reply: VecDeque<u8>,
}

impl ScriptedSensor {
    fn new(script: &[(&str, &str)]) -> Self {
        Self {
            script: script
                .iter()
                .map(|(req, resp)| (hex(req), hex(resp)))
                .collect(),
            pending: Vec::new(),
            reply: VecDeque::new(),
        }
    }

    fn finished(&self) -> bool {
        self.script.is_empty() && self.reply.is_empty()
    }
}

impl Write for ScriptedSensor {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // The wake pulse is flushed on its own and gets no answer.
        if self.pending == [0xFF] {
            self.pending.clear();
            return Ok(());
        }
        let (expected, reply) = self
            .script
            .pop_front()
            .expect("request beyond end of script");
        assert_eq!(self.pending, expected, "unexpected request bytes");
        self.pending.clear();
        self.reply.extend(reply);
        Ok(())
    }
}

impl Read for ScriptedSensor {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.reply.is_empty() {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "no reply"));
        }
        // Hand out at most 5 bytes per read, like a chunking UART driver.
        let n = buf.len().min(self.reply.len()).min(5);
        for slot in buf.iter_mut().take(n) {
            *slot = self.reply.pop_front().unwrap();
        }
        Ok(n)
    }
}

fn hex(s: &str) -> Vec<u8> {
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
        .collect()
}

#[test]
fn wake_identify_measure_sleep() {
    let sensor = ScriptedSensor::new(&[
        ("7e007d3100ee7e", "7e007d314300ab7e"),
        ("7e00d1002e7e", "7e00d1000702030007000200197e"),
        ("7e0000020103f97e", "7e00000000ff7e"),
        (
            "7e000300fc7e",
            "7e000300283fc00000401000004040000040840000412800004140000041480000414c0000415000003f000000717e",
        ),
        ("7e000100fe7e", "7e00010000fe7e"),
        ("7e001000ef7e", "7e00100000ef7e"),
    ]);
    let mut device = Device::new(sensor);

    device.wakeup().unwrap();
    let version = device.read_version().unwrap();
    assert_eq!(version.to_string(), "FW: 2.3, HW: 7, SHDLC: 2.0");

    device.start_measurement().unwrap();
    let sample = device.read_measurement().unwrap();
    assert_eq!(sample.mass_pm2_5, 2.25);
    assert_eq!(sample.number_pm0_5, 10.5);

    device.stop_measurement().unwrap();
    device.sleep().unwrap();
    assert!(device.get_ref().finished());
}

#[test]
fn device_error_leaves_session_usable() {
    let sensor = ScriptedSensor::new(&[
        ("7e005600a97e", "7e00564300667e"),
        ("7e00d201002c7e", "7e00d200050020000000087e"),
    ]);
    let mut device = Device::new(sensor);

    let err = device.start_fan_cleaning().unwrap_err();
    match err {
        ShdlcError::DeviceError { command, status } => {
            assert_eq!(command, 0x56);
            assert_eq!(status, StatusCode::CommandNotAllowed);
            assert_eq!(status.code(), 67);
        }
        other => panic!("unexpected error: {other}"),
    }

    let status = device.read_device_status().unwrap();
    assert!(status.fan_speed_warning);
    assert!(!status.laser_failure);
    assert!(device.get_ref().finished());
}

#[test]
fn corrupted_reply_is_checksum_mismatch() {
    let sensor = ScriptedSensor::new(&[("7e00d3002c7e", "7e00d300002d7e")]);
    let mut device = Device::new(sensor);

    let err = device.reset().unwrap_err();
    assert!(matches!(
        err,
        ShdlcError::ChecksumMismatch {
            computed: 0x2c,
            received: 0x2d
        }
    ));
}
