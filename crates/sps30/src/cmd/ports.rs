use tracing::warn;

use crate::exit::{transport_error, CliResult, SUCCESS};
use crate::output::{print_ports, OutputFormat};

pub fn run(format: OutputFormat) -> CliResult<i32> {
    let ports = sps30_transport::available_ports()
        .map_err(|err| transport_error("port enumeration failed", err))?;
    if ports.is_empty() {
        warn!("no serial ports found");
    }
    print_ports(&ports, format);
    Ok(SUCCESS)
}
