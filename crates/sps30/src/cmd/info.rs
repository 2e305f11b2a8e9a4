use crate::cmd::ConnectArgs;
use crate::exit::{shdlc_error, CliResult, SUCCESS};
use crate::output::{print_info, OutputFormat};

pub fn run(conn: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    let mut device = conn.open()?;

    device
        .wakeup()
        .map_err(|err| shdlc_error("wake-up failed", err))?;
    let version = device
        .read_version()
        .map_err(|err| shdlc_error("read-version failed", err))?;
    let status = device
        .read_device_status()
        .map_err(|err| shdlc_error("read-device-status failed", err))?;

    print_info(device.get_ref().name(), &version, &status, format);
    Ok(SUCCESS)
}
