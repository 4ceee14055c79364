//! Voltage and current encodings used by the PDO and status registers
//!
//! The chip uses two unrelated 4-bit voltage encodings: one for the voltage written to the
//! `SRC_PDO` selection register ([`SelectableVoltage`]) and one for the contract voltage it
//! reports in `PD_STATUS0` ([`SourceVoltage`]). They are kept as separate types so one can never
//! be written where the other is expected.
use embedded_usb_pd::PdError;

/// Fixed voltages the chip can request from a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SelectableVoltage {
    /// 5V
    V5,
    /// 9V
    V9,
    /// 12V
    V12,
    /// 15V
    V15,
    /// 18V
    V18,
    /// 20V
    V20,
}

impl SelectableVoltage {
    /// All selectable voltages, ascending
    pub const ALL: [SelectableVoltage; 6] = [
        SelectableVoltage::V5,
        SelectableVoltage::V9,
        SelectableVoltage::V12,
        SelectableVoltage::V15,
        SelectableVoltage::V18,
        SelectableVoltage::V20,
    ];

    /// Voltage in volts
    pub const fn volts(self) -> u8 {
        match self {
            SelectableVoltage::V5 => 5,
            SelectableVoltage::V9 => 9,
            SelectableVoltage::V12 => 12,
            SelectableVoltage::V15 => 15,
            SelectableVoltage::V18 => 18,
            SelectableVoltage::V20 => 20,
        }
    }

    /// Code written to bits 4-7 of `SRC_PDO` to select this voltage
    pub const fn selector_code(self) -> u8 {
        match self {
            SelectableVoltage::V5 => 0b0001,
            SelectableVoltage::V9 => 0b0010,
            SelectableVoltage::V12 => 0b0011,
            SelectableVoltage::V15 => 0b1000,
            SelectableVoltage::V18 => 0b1001,
            SelectableVoltage::V20 => 0b1010,
        }
    }

    /// Decode a selector code read back from `SRC_PDO`
    pub fn from_selector_code(code: u8) -> Result<Self, PdError> {
        match code {
            0b0001 => Ok(SelectableVoltage::V5),
            0b0010 => Ok(SelectableVoltage::V9),
            0b0011 => Ok(SelectableVoltage::V12),
            0b1000 => Ok(SelectableVoltage::V15),
            0b1001 => Ok(SelectableVoltage::V18),
            0b1010 => Ok(SelectableVoltage::V20),
            _ => Err(PdError::InvalidResponse),
        }
    }

    /// Position of this voltage within [`SelectableVoltage::ALL`]
    pub(crate) const fn index(self) -> usize {
        match self {
            SelectableVoltage::V5 => 0,
            SelectableVoltage::V9 => 1,
            SelectableVoltage::V12 => 2,
            SelectableVoltage::V15 => 3,
            SelectableVoltage::V18 => 4,
            SelectableVoltage::V20 => 5,
        }
    }
}

/// Converts a voltage in volts, fails with [`PdError::InvalidParams`] for anything the chip
/// cannot request
impl TryFrom<u8> for SelectableVoltage {
    type Error = PdError;

    fn try_from(volts: u8) -> Result<Self, Self::Error> {
        match volts {
            5 => Ok(SelectableVoltage::V5),
            9 => Ok(SelectableVoltage::V9),
            12 => Ok(SelectableVoltage::V12),
            15 => Ok(SelectableVoltage::V15),
            18 => Ok(SelectableVoltage::V18),
            20 => Ok(SelectableVoltage::V20),
            _ => Err(PdError::InvalidParams),
        }
    }
}

impl From<SelectableVoltage> for u8 {
    fn from(value: SelectableVoltage) -> Self {
        value.volts()
    }
}

/// Contract voltage reported in `PD_STATUS0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SourceVoltage {
    /// No source attached
    Unattached,
    /// 5V
    V5,
    /// 9V
    V9,
    /// 12V
    V12,
    /// 15V
    V15,
    /// 18V
    V18,
    /// 20V
    V20,
}

impl SourceVoltage {
    /// Voltage in volts, `None` when unattached
    pub const fn volts(self) -> Option<u8> {
        match self {
            SourceVoltage::Unattached => None,
            SourceVoltage::V5 => Some(5),
            SourceVoltage::V9 => Some(9),
            SourceVoltage::V12 => Some(12),
            SourceVoltage::V15 => Some(15),
            SourceVoltage::V18 => Some(18),
            SourceVoltage::V20 => Some(20),
        }
    }
}

/// Decodes the 4-bit status voltage code, codes `0b0111..=0b1111` are undefined
impl TryFrom<u8> for SourceVoltage {
    type Error = PdError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0b0000 => Ok(SourceVoltage::Unattached),
            0b0001 => Ok(SourceVoltage::V5),
            0b0010 => Ok(SourceVoltage::V9),
            0b0011 => Ok(SourceVoltage::V12),
            0b0100 => Ok(SourceVoltage::V15),
            0b0101 => Ok(SourceVoltage::V18),
            0b0110 => Ok(SourceVoltage::V20),
            _ => Err(PdError::InvalidResponse),
        }
    }
}

impl From<SelectableVoltage> for SourceVoltage {
    fn from(value: SelectableVoltage) -> Self {
        match value {
            SelectableVoltage::V5 => SourceVoltage::V5,
            SelectableVoltage::V9 => SourceVoltage::V9,
            SelectableVoltage::V12 => SourceVoltage::V12,
            SelectableVoltage::V15 => SourceVoltage::V15,
            SelectableVoltage::V18 => SourceVoltage::V18,
            SelectableVoltage::V20 => SourceVoltage::V20,
        }
    }
}

/// Current level encoded in a 4-bit PDO current field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PdoCurrent {
    /// 0.5A
    Current0A5,
    /// 0.7A
    Current0A7,
    /// 1.0A
    Current1A0,
    /// 1.25A
    Current1A25,
    /// 1.5A
    Current1A5,
    /// 1.75A
    Current1A75,
    /// 2.0A, encoded as both `0b0110` and `0b0111`
    Current2A0,
    /// 2.5A
    Current2A5,
    /// 2.75A
    Current2A75,
    /// 3.0A
    Current3A0,
    /// 3.25A
    Current3A25,
    /// 3.5A
    Current3A5,
    /// 4.0A
    Current4A0,
    /// 4.5A
    Current4A5,
    /// 5.0A
    Current5A0,
}

impl PdoCurrent {
    /// Current in mA
    pub const fn milliamps(self) -> u16 {
        match self {
            PdoCurrent::Current0A5 => 500,
            PdoCurrent::Current0A7 => 700,
            PdoCurrent::Current1A0 => 1000,
            PdoCurrent::Current1A25 => 1250,
            PdoCurrent::Current1A5 => 1500,
            PdoCurrent::Current1A75 => 1750,
            PdoCurrent::Current2A0 => 2000,
            PdoCurrent::Current2A5 => 2500,
            PdoCurrent::Current2A75 => 2750,
            PdoCurrent::Current3A0 => 3000,
            PdoCurrent::Current3A25 => 3250,
            PdoCurrent::Current3A5 => 3500,
            PdoCurrent::Current4A0 => 4000,
            PdoCurrent::Current4A5 => 4500,
            PdoCurrent::Current5A0 => 5000,
        }
    }
}

/// Every 4-bit code is defined, only the low nibble of `code` is considered
impl From<u8> for PdoCurrent {
    fn from(code: u8) -> Self {
        match code & 0x0F {
            0b0000 => PdoCurrent::Current0A5,
            0b0001 => PdoCurrent::Current0A7,
            0b0010 => PdoCurrent::Current1A0,
            0b0011 => PdoCurrent::Current1A25,
            0b0100 => PdoCurrent::Current1A5,
            0b0101 => PdoCurrent::Current1A75,
            0b0110 | 0b0111 => PdoCurrent::Current2A0,
            0b1000 => PdoCurrent::Current2A5,
            0b1001 => PdoCurrent::Current2A75,
            0b1010 => PdoCurrent::Current3A0,
            0b1011 => PdoCurrent::Current3A25,
            0b1100 => PdoCurrent::Current3A5,
            0b1101 => PdoCurrent::Current4A0,
            0b1110 => PdoCurrent::Current4A5,
            _ => PdoCurrent::Current5A0,
        }
    }
}
