use bytes::Buf;
use serde::{Deserialize, Serialize};
use sps30_shdlc::{Result, ShdlcError};

use crate::command::{READ_DEVICE_STATUS, READ_MEASUREMENT, READ_VERSION};

/// Firmware, hardware and protocol versions reported by the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub firmware_major: u8,
    pub firmware_minor: u8,
    pub hardware_revision: u8,
    pub protocol_major: u8,
    pub protocol_minor: u8,
}

impl VersionInfo {
    /// Decode the 7-byte read-version payload. Bytes 2 and 4 are reserved.
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        expect_len(READ_VERSION.code, READ_VERSION.response_len, payload)?;
        Ok(Self {
            firmware_major: payload[0],
            firmware_minor: payload[1],
            hardware_revision: payload[3],
            protocol_major: payload[5],
            protocol_minor: payload[6],
        })
    }
}

impl std::fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FW: {}.{}, HW: {}, SHDLC: {}.{}",
            self.firmware_major,
            self.firmware_minor,
            self.hardware_revision,
            self.protocol_major,
            self.protocol_minor
        )
    }
}

/// One particulate matter sample.
///
/// Mass concentrations are in µg/m³, number concentrations in #/cm³, and the
/// typical particle size in µm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub mass_pm1_0: f32,
    pub mass_pm2_5: f32,
    pub mass_pm4_0: f32,
    pub mass_pm10_0: f32,
    pub number_pm0_5: f32,
    pub number_pm1_0: f32,
    pub number_pm2_5: f32,
    pub number_pm4_0: f32,
    pub number_pm10_0: f32,
    pub typical_particle_size: f32,
}

impl Measurement {
    /// Decode the 40-byte read-measurement payload: ten big-endian IEEE-754
    /// singles in the order the fields are declared.
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        expect_len(READ_MEASUREMENT.code, READ_MEASUREMENT.response_len, payload)?;
        let mut buf = payload;
        Ok(Self {
            mass_pm1_0: buf.get_f32(),
            mass_pm2_5: buf.get_f32(),
            mass_pm4_0: buf.get_f32(),
            mass_pm10_0: buf.get_f32(),
            number_pm0_5: buf.get_f32(),
            number_pm1_0: buf.get_f32(),
            number_pm2_5: buf.get_f32(),
            number_pm4_0: buf.get_f32(),
            number_pm10_0: buf.get_f32(),
            typical_particle_size: buf.get_f32(),
        })
    }

    /// Values paired with their labels, in wire order.
    pub fn fields(&self) -> [(&'static str, f32); 10] {
        [
            ("pm1.0", self.mass_pm1_0),
            ("pm2.5", self.mass_pm2_5),
            ("pm4.0", self.mass_pm4_0),
            ("pm10.0", self.mass_pm10_0),
            ("nc0.5", self.number_pm0_5),
            ("nc1.0", self.number_pm1_0),
            ("nc2.5", self.number_pm2_5),
            ("nc4.0", self.number_pm4_0),
            ("nc10.0", self.number_pm10_0),
            ("typical particle size", self.typical_particle_size),
        ]
    }
}

/// Fan speed out of range.
pub const STATUS_FAN_SPEED_WARNING: u32 = 1 << 21;
/// Laser current out of range.
pub const STATUS_LASER_FAILURE: u32 = 1 << 5;
/// Fan switched on but not turning.
pub const STATUS_FAN_FAILURE: u32 = 1 << 4;

/// Device status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStatus {
    /// Raw 32-bit register.
    pub raw: u32,
    pub fan_speed_warning: bool,
    pub laser_failure: bool,
    pub fan_failure: bool,
}

impl DeviceStatus {
    /// Decode the 5-byte status payload: a big-endian register and a
    /// reserved byte.
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        expect_len(READ_DEVICE_STATUS.code, READ_DEVICE_STATUS.response_len, payload)?;
        let mut buf = payload;
        Ok(Self::from_register(buf.get_u32()))
    }

    pub fn from_register(raw: u32) -> Self {
        Self {
            raw,
            fan_speed_warning: raw & STATUS_FAN_SPEED_WARNING != 0,
            laser_failure: raw & STATUS_LASER_FAILURE != 0,
            fan_failure: raw & STATUS_FAN_FAILURE != 0,
        }
    }

    /// Returns true if no flag is raised.
    pub fn is_ok(&self) -> bool {
        !(self.fan_speed_warning || self.laser_failure || self.fan_failure)
    }
}

fn expect_len(command: u8, expected: u8, payload: &[u8]) -> Result<()> {
    if payload.len() != expected as usize {
        return Err(ShdlcError::UnexpectedResponseLength {
            command,
            expected: expected as usize,
            declared: payload.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_skips_reserved_bytes() {
        let version =
            VersionInfo::from_payload(&[0x02, 0x03, 0xAA, 0x07, 0xBB, 0x02, 0x00]).unwrap();
        assert_eq!(
            version,
            VersionInfo {
                firmware_major: 2,
                firmware_minor: 3,
                hardware_revision: 7,
                protocol_major: 2,
                protocol_minor: 0,
            }
        );
        assert_eq!(version.to_string(), "FW: 2.3, HW: 7, SHDLC: 2.0");
    }

    #[test]
    fn version_rejects_wrong_length() {
        let err = VersionInfo::from_payload(&[0x02, 0x03]).unwrap_err();
        assert!(matches!(
            err,
            ShdlcError::UnexpectedResponseLength {
                command: 0xD1,
                expected: 7,
                declared: 2
            }
        ));
    }

    #[test]
    fn measurement_decodes_exact_fractions() {
        let values = [1.5f32, 2.25, 3.0, 4.125, 10.5, 12.0, 12.5, 12.75, 13.0, 0.5];
        let payload: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();

        let measurement = Measurement::from_payload(&payload).unwrap();
        let decoded: Vec<f32> = measurement.fields().iter().map(|(_, v)| *v).collect();
        assert_eq!(decoded, values);
        assert_eq!(measurement.mass_pm2_5, 2.25);
        assert_eq!(measurement.typical_particle_size, 0.5);
    }

    #[test]
    fn measurement_rejects_short_payload() {
        let err = Measurement::from_payload(&[0u8; 39]).unwrap_err();
        assert!(matches!(
            err,
            ShdlcError::UnexpectedResponseLength {
                command: 0x03,
                expected: 40,
                ..
            }
        ));
    }

    #[test]
    fn status_flags() {
        let status = DeviceStatus::from_payload(&[0x00, 0x20, 0x00, 0x30, 0x00]).unwrap();
        assert_eq!(status.raw, 0x0020_0030);
        assert!(status.fan_speed_warning);
        assert!(status.laser_failure);
        assert!(status.fan_failure);
        assert!(!status.is_ok());

        let clear = DeviceStatus::from_payload(&[0u8; 5]).unwrap();
        assert!(clear.is_ok());
    }

    #[test]
    fn measurement_serializes_field_names() {
        let measurement = Measurement::from_payload(&[0u8; 40]).unwrap();
        let json = serde_json::to_value(measurement).unwrap();
        assert_eq!(json["mass_pm2_5"], 0.0);
        assert_eq!(json["typical_particle_size"], 0.0);
    }
}
