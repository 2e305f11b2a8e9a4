use std::io::{Read, Write};

use sps30_device::{Device, Result};
use tracing::info;

use crate::cmd::ConnectArgs;
use crate::exit::{shdlc_error, CliResult, SUCCESS};
use crate::output::{print_ack, OutputFormat};

/// Commands that carry no response data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Wake,
    Sleep,
    Stop,
    Clean,
    Reset,
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Action::Wake => "wake",
            Action::Sleep => "sleep",
            Action::Stop => "stop",
            Action::Clean => "clean",
            Action::Reset => "reset",
        }
    }

    pub fn apply<T: Read + Write>(self, device: &mut Device<T>) -> Result<()> {
        match self {
            Action::Wake => device.wakeup(),
            Action::Sleep => device.sleep(),
            Action::Stop => device.stop_measurement(),
            Action::Clean => device.start_fan_cleaning(),
            Action::Reset => device.reset(),
        }
    }
}

pub fn run(action: Action, conn: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    let mut device = conn.open()?;
    action
        .apply(&mut device)
        .map_err(|err| shdlc_error(action.name(), err))?;

    let port = device.get_ref().name().to_string();
    info!(command = action.name(), port = %port, "command acknowledged");
    print_ack(action.name(), &port, format);
    Ok(SUCCESS)
}
