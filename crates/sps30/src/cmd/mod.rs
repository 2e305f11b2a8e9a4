use std::time::Duration;

use clap::{Args, Subcommand};
use sps30_device::Device;
use sps30_transport::{SerialConfig, SerialStream, DEFAULT_BAUD_RATE};

use crate::exit::{transport_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod control;
pub mod info;
pub mod measure;
pub mod ports;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read firmware version and the device status register.
    Info,
    /// Start measuring and print samples until stopped.
    Measure(MeasureArgs),
    /// Wake the sensor from sleep.
    Wake,
    /// Put the sensor to sleep (must be idle).
    Sleep,
    /// Stop measuring and return to idle.
    Stop,
    /// Run the 10 second fan cleaning cycle (must be measuring).
    Clean,
    /// Soft-reset the sensor.
    Reset,
    /// List serial ports on this host.
    Ports,
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, conn: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Info => info::run(conn, format),
        Command::Measure(args) => measure::run(args, conn, format),
        Command::Wake => control::run(control::Action::Wake, conn, format),
        Command::Sleep => control::run(control::Action::Sleep, conn, format),
        Command::Stop => control::run(control::Action::Stop, conn, format),
        Command::Clean => control::run(control::Action::Clean, conn, format),
        Command::Reset => control::run(control::Action::Reset, conn, format),
        Command::Ports => ports::run(format),
        Command::Version(args) => version::run(args),
    }
}

/// Serial connection flags shared by every device subcommand.
#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Serial port the sensor is attached to (e.g. /dev/ttyUSB0, COM3).
    #[arg(long, short = 'p', env = "SPS30_PORT", global = true)]
    pub port: Option<String>,

    /// Baud rate.
    #[arg(long, env = "SPS30_BAUD", default_value_t = DEFAULT_BAUD_RATE, global = true)]
    pub baud: u32,

    /// Response timeout per command (e.g. 1s, 500ms).
    #[arg(long, default_value = "1s", global = true)]
    pub timeout: String,
}

impl ConnectArgs {
    pub fn port(&self) -> CliResult<&str> {
        self.port
            .as_deref()
            .ok_or_else(|| CliError::new(USAGE, "no serial port given (use --port or SPS30_PORT)"))
    }

    pub fn serial_config(&self) -> CliResult<SerialConfig> {
        Ok(SerialConfig {
            baud_rate: self.baud,
            timeout: parse_duration(&self.timeout)?,
        })
    }

    pub fn open(&self) -> CliResult<Device<SerialStream>> {
        let port = self.port()?;
        let config = self.serial_config()?;
        let stream =
            sps30_transport::open(port, &config).map_err(|err| transport_error("open failed", err))?;
        Ok(Device::new(stream))
    }
}

#[derive(Args, Debug)]
pub struct MeasureArgs {
    /// Time between samples (e.g. 1s, 500ms).
    #[arg(long, short = 'i', default_value = "1s")]
    pub interval: String,
    /// Exit after printing N samples.
    #[arg(long, short = 'n')]
    pub count: Option<u64>,
    /// Read samples without sending start/stop (sensor already measuring).
    #[arg(long)]
    pub no_start: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse `5s`, `150ms` or a bare number of seconds. Zero is rejected.
pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    if millis {
        Ok(Duration::from_millis(value))
    } else {
        Ok(Duration::from_secs(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds() {
        assert_eq!(parse_duration("5s").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_duration("2").unwrap(), Duration::from_secs(2));
    }

    #[test]
    fn parse_duration_millis() {
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
    }

    #[test]
    fn parse_duration_invalid() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert_eq!(parse_duration("").unwrap_err().code, USAGE);
    }

    #[test]
    fn missing_port_is_usage_error() {
        let conn = ConnectArgs {
            port: None,
            baud: DEFAULT_BAUD_RATE,
            timeout: "1s".to_string(),
        };
        assert_eq!(conn.port().unwrap_err().code, USAGE);
        assert!(conn.open().is_err());
    }

    #[test]
    fn serial_config_uses_flags() {
        let conn = ConnectArgs {
            port: Some("/dev/ttyUSB0".to_string()),
            baud: 57_600,
            timeout: "250ms".to_string(),
        };
        let config = conn.serial_config().unwrap();
        assert_eq!(config.baud_rate, 57_600);
        assert_eq!(config.timeout, Duration::from_millis(250));
    }
}
