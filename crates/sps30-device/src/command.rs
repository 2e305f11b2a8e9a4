//! Command descriptor table.
//!
//! Every operation is a single request/response exchange; the descriptor fixes
//! the command code, the request payload and the response length the device
//! answers with.

/// Unframed byte sent ahead of [`WAKE_UP`] to pull the UART out of sleep.
pub const WAKE_PULSE: u8 = 0xFF;

/// One SPS30 command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDescriptor {
    /// Short name used in logs and CLI output.
    pub name: &'static str,
    /// SHDLC command byte.
    pub code: u8,
    /// Request payload (subcommand bytes), usually empty.
    pub request: &'static [u8],
    /// Payload length of a successful response.
    pub response_len: u8,
}

/// Start measurement in big-endian float output format.
pub const START_MEASUREMENT: CommandDescriptor = CommandDescriptor {
    name: "start-measurement",
    code: 0x00,
    request: &[0x01, 0x03],
    response_len: 0,
};

pub const STOP_MEASUREMENT: CommandDescriptor = CommandDescriptor {
    name: "stop-measurement",
    code: 0x01,
    request: &[],
    response_len: 0,
};

/// Ten big-endian `f32` values.
pub const READ_MEASUREMENT: CommandDescriptor = CommandDescriptor {
    name: "read-measurement",
    code: 0x03,
    request: &[],
    response_len: 40,
};

pub const SLEEP: CommandDescriptor = CommandDescriptor {
    name: "sleep",
    code: 0x10,
    request: &[],
    response_len: 0,
};

pub const WAKE_UP: CommandDescriptor = CommandDescriptor {
    name: "wake-up",
    code: 0x11,
    request: &[],
    response_len: 0,
};

pub const START_FAN_CLEANING: CommandDescriptor = CommandDescriptor {
    name: "start-fan-cleaning",
    code: 0x56,
    request: &[],
    response_len: 0,
};

pub const READ_VERSION: CommandDescriptor = CommandDescriptor {
    name: "read-version",
    code: 0xD1,
    request: &[],
    response_len: 7,
};

/// Read the status register without clearing its flags.
pub const READ_DEVICE_STATUS: CommandDescriptor = CommandDescriptor {
    name: "read-device-status",
    code: 0xD2,
    request: &[0x00],
    response_len: 5,
};

pub const DEVICE_RESET: CommandDescriptor = CommandDescriptor {
    name: "device-reset",
    code: 0xD3,
    request: &[],
    response_len: 0,
};

/// Every command this driver issues.
pub static COMMANDS: [CommandDescriptor; 9] = [
    START_MEASUREMENT,
    STOP_MEASUREMENT,
    READ_MEASUREMENT,
    SLEEP,
    WAKE_UP,
    START_FAN_CLEANING,
    READ_VERSION,
    READ_DEVICE_STATUS,
    DEVICE_RESET,
];

/// Look up a descriptor by command code.
pub fn by_code(code: u8) -> Option<&'static CommandDescriptor> {
    COMMANDS.iter().find(|command| command.code == code)
}
