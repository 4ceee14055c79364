//! Commands written to `GO_COMMAND` and the PD response codes reported back in `PD_STATUS1`
use embedded_usb_pd::PdError;

/// Minimum time between issuing Get_SRC_Cap and reading its result from `SRC_PDO`
///
/// The chip has no ready flag for this command, the wait is a fixed contract and not a poll.
pub const GET_SRC_CAP_SETTLE_MS: u32 = 10;

/// Commands accepted by `GO_COMMAND`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Reset the PD state machine
    Reset,
    /// Request the PDO last written to `SRC_PDO`
    RequestPdo,
    /// Send Get_SRC_Cap to the attached source
    GetSrcCap,
}

impl Command {
    /// Byte written to `GO_COMMAND`
    ///
    /// Reset and RequestPdo share a code on the parts this driver was brought up against.
    pub const fn code(self) -> u8 {
        match self {
            Command::Reset => 0x01,
            Command::RequestPdo => 0x01,
            Command::GetSrcCap => 0x02,
        }
    }

    /// Returns the delay in milliseconds before the result of this command may be read
    pub const fn settle_delay_ms(self) -> u32 {
        match self {
            Command::Reset | Command::RequestPdo => 0,
            Command::GetSrcCap => GET_SRC_CAP_SETTLE_MS,
        }
    }
}

impl From<Command> for u8 {
    fn from(value: Command) -> Self {
        value.code()
    }
}

/// Result of the last PD transaction, bits 3-5 of `PD_STATUS1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ResponseCode {
    /// No response from the source
    NoResponse = 0b000,
    /// Success
    Success = 0b001,
    /// Invalid command or argument
    InvalidCommand = 0b011,
    /// Command not supported
    Unsupported = 0b100,
    /// Transaction failed, no GoodCRC received
    CrcFail = 0b101,
}

/// Codes `0b010`, `0b110` and `0b111` are undefined
impl TryFrom<u8> for ResponseCode {
    type Error = PdError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0b000 => Ok(ResponseCode::NoResponse),
            0b001 => Ok(ResponseCode::Success),
            0b011 => Ok(ResponseCode::InvalidCommand),
            0b100 => Ok(ResponseCode::Unsupported),
            0b101 => Ok(ResponseCode::CrcFail),
            _ => Err(PdError::InvalidResponse),
        }
    }
}

#[allow(clippy::from_over_into)]
impl Into<Result<(), PdError>> for ResponseCode {
    fn into(self) -> Result<(), PdError> {
        match self {
            ResponseCode::Success => Ok(()),
            ResponseCode::NoResponse => Err(PdError::Timeout),
            ResponseCode::InvalidCommand => Err(PdError::InvalidParams),
            ResponseCode::Unsupported => Err(PdError::UnrecognizedCommand),
            ResponseCode::CrcFail => Err(PdError::Failed),
        }
    }
}
