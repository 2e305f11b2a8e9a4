use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use sps30_device::{DeviceStatus, Measurement, VersionInfo};
use sps30_transport::PortInfo;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

#[derive(Serialize)]
struct InfoOutput<'a> {
    port: &'a str,
    version: &'a VersionInfo,
    status: &'a DeviceStatus,
}

pub fn print_info(port: &str, version: &VersionInfo, status: &DeviceStatus, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&InfoOutput {
            port,
            version,
            status,
        }),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("Sensor Info:");
            println!("  Port:             {port}");
            println!(
                "  Firmware:         {}.{}",
                version.firmware_major, version.firmware_minor
            );
            println!("  Hardware:         {}", version.hardware_revision);
            println!(
                "  SHDLC protocol:   {}.{}",
                version.protocol_major, version.protocol_minor
            );
            println!("  Status register:  0x{:08X}", status.raw);
            println!("  Fan speed:        {}", flag(status.fan_speed_warning, "out of range"));
            println!("  Laser:            {}", flag(status.laser_failure, "failure"));
            println!("  Fan:              {}", flag(status.fan_failure, "failure"));
        }
        OutputFormat::Raw => println!("{version}"),
    }
}

fn flag(raised: bool, label: &'static str) -> &'static str {
    if raised {
        label
    } else {
        "ok"
    }
}

#[derive(Serialize)]
struct MeasurementOutput<'a> {
    sample: u64,
    timestamp: String,
    #[serde(flatten)]
    measurement: &'a Measurement,
}

pub fn print_measurement(sample: u64, measurement: &Measurement, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&MeasurementOutput {
            sample,
            timestamp: now_unix_seconds(),
            measurement,
        }),
        OutputFormat::Table => {
            let mut table = new_table(vec!["SAMPLE", "FIELD", "VALUE", "UNIT"]);
            for (label, value) in measurement.fields() {
                table.add_row(vec![
                    sample.to_string(),
                    label.to_string(),
                    format!("{value:.2}"),
                    unit(label).to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("sample {sample}:");
            for (label, value) in measurement.fields() {
                println!("  {label:<22} {value:>9.2} {}", unit(label));
            }
        }
        OutputFormat::Raw => {
            let values: Vec<String> = measurement
                .fields()
                .iter()
                .map(|(_, value)| value.to_string())
                .collect();
            println!("{}", values.join(","));
        }
    }
}

fn unit(label: &str) -> &'static str {
    if label.starts_with("pm") {
        "µg/m³"
    } else if label.starts_with("nc") {
        "#/cm³"
    } else {
        "µm"
    }
}

#[derive(Serialize)]
struct AckOutput<'a> {
    command: &'a str,
    port: &'a str,
    ok: bool,
}

/// Report a command that returns no data.
pub fn print_ack(command: &str, port: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&AckOutput {
            command,
            port,
            ok: true,
        }),
        OutputFormat::Table | OutputFormat::Pretty => println!("{command}: ok ({port})"),
        OutputFormat::Raw => println!("ok"),
    }
}

#[derive(Serialize)]
struct PortOutput<'a> {
    name: &'a str,
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    vid: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pid: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    product: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    manufacturer: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    serial_number: Option<&'a str>,
}

impl<'a> From<&'a PortInfo> for PortOutput<'a> {
    fn from(port: &'a PortInfo) -> Self {
        Self {
            name: &port.name,
            kind: port.kind,
            vid: port.vid,
            pid: port.pid,
            product: port.product.as_deref(),
            manufacturer: port.manufacturer.as_deref(),
            serial_number: port.serial_number.as_deref(),
        }
    }
}

pub fn print_ports(ports: &[PortInfo], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out: Vec<PortOutput<'_>> = ports.iter().map(PortOutput::from).collect();
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["PORT", "TYPE", "VID:PID", "PRODUCT"]);
            for port in ports {
                table.add_row(vec![
                    port.name.clone(),
                    port.kind.to_string(),
                    usb_id(port),
                    port.product.clone().unwrap_or_default(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for port in ports {
                println!("{} ({}) {}", port.name, port.kind, usb_id(port));
            }
        }
        OutputFormat::Raw => {
            for port in ports {
                println!("{}", port.name);
            }
        }
    }
}

fn usb_id(port: &PortInfo) -> String {
    match (port.vid, port.pid) {
        (Some(vid), Some(pid)) => format!("{vid:04x}:{pid:04x}"),
        _ => String::new(),
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
