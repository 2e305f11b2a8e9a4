//! Device state codes carried in the response header.

/// Wrong data length for this command (too much or too little data).
pub const WRONG_DATA_LENGTH: u8 = 1;
/// Unknown command.
pub const UNKNOWN_COMMAND: u8 = 2;
/// No access right for command.
pub const NO_ACCESS_RIGHT: u8 = 3;
/// Illegal command parameter or parameter out of allowed range.
pub const ILLEGAL_PARAMETER: u8 = 4;
/// Internal function argument out of range.
pub const ARGUMENT_OUT_OF_RANGE: u8 = 40;
/// Command not allowed in current state.
pub const COMMAND_NOT_ALLOWED: u8 = 67;

/// A non-zero state byte reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    WrongDataLength,
    UnknownCommand,
    NoAccessRight,
    IllegalParameter,
    ArgumentOutOfRange,
    CommandNotAllowed,
    /// A state the device documentation does not list.
    Unknown(u8),
}

impl StatusCode {
    /// Interpret a state byte. Returns `None` for 0 (success).
    pub fn from_state(state: u8) -> Option<Self> {
        let code = match state {
            0 => return None,
            WRONG_DATA_LENGTH => StatusCode::WrongDataLength,
            UNKNOWN_COMMAND => StatusCode::UnknownCommand,
            NO_ACCESS_RIGHT => StatusCode::NoAccessRight,
            ILLEGAL_PARAMETER => StatusCode::IllegalParameter,
            ARGUMENT_OUT_OF_RANGE => StatusCode::ArgumentOutOfRange,
            COMMAND_NOT_ALLOWED => StatusCode::CommandNotAllowed,
            other => StatusCode::Unknown(other),
        };
        Some(code)
    }

    /// The raw state byte.
    pub fn code(self) -> u8 {
        match self {
            StatusCode::WrongDataLength => WRONG_DATA_LENGTH,
            StatusCode::UnknownCommand => UNKNOWN_COMMAND,
            StatusCode::NoAccessRight => NO_ACCESS_RIGHT,
            StatusCode::IllegalParameter => ILLEGAL_PARAMETER,
            StatusCode::ArgumentOutOfRange => ARGUMENT_OUT_OF_RANGE,
            StatusCode::CommandNotAllowed => COMMAND_NOT_ALLOWED,
            StatusCode::Unknown(code) => code,
        }
    }

    /// Human-readable reason.
    pub fn reason(self) -> &'static str {
        match self {
            StatusCode::WrongDataLength => "wrong data length",
            StatusCode::UnknownCommand => "unknown command",
            StatusCode::NoAccessRight => "no access right",
            StatusCode::IllegalParameter => "illegal parameter",
            StatusCode::ArgumentOutOfRange => "argument out of range",
            StatusCode::CommandNotAllowed => "command not allowed in current state",
            StatusCode::Unknown(_) => "unknown device error",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (state 0x{:02X})", self.reason(), self.code())
    }
}
