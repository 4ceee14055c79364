//! Types related to the PD status registers, `0x00` and `0x01`
use bitfield::bitfield;
use embedded_usb_pd::PdError;

use super::PD_STATUS_LEN;
use crate::command::ResponseCode;
use crate::pdo::{PdoCurrent, SourceVoltage};

bitfield! {
    /// PD status 0 register
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct PdStatus0(u8);
    impl Debug;
    /// Contract voltage code
    pub u8, pd_src_voltage, _: 7, 4;
    /// Contract current code
    pub u8, pd_src_current, _: 3, 0;
}

impl PdStatus0 {
    /// Decoded contract voltage
    pub fn source_voltage(&self) -> Result<SourceVoltage, PdError> {
        SourceVoltage::try_from(self.pd_src_voltage())
    }

    /// Decoded contract current
    pub fn source_current(&self) -> PdoCurrent {
        self.pd_src_current().into()
    }
}

bitfield! {
    /// PD status 1 register
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct PdStatus1(u8);
    impl Debug;
    /// CC orientation, set when CC2 is connected
    pub bool, cc_dir, _: 7;
    /// A source is attached
    pub bool, attached, _: 6;
    /// Response to the last PD command
    pub u8, pd_response, _: 5, 3;
    /// 5V contract voltage indicator
    pub bool, contract_5v, _: 2;
    /// 5V contract current, raw 2-bit code
    pub u8, contract_5v_current, _: 1, 0;
}

/// Both status registers are read-only, their fields have no setters
///
/// ```compile_fail
/// use husb238::registers::pd_status::PdStatus1;
///
/// let mut status = PdStatus1(0);
/// status.set_attached(true);
/// ```
impl PdStatus1 {
    /// Decoded CC orientation
    pub fn cc_direction(&self) -> CcDirection {
        self.cc_dir().into()
    }

    /// Decoded response code
    pub fn response(&self) -> Result<ResponseCode, PdError> {
        ResponseCode::try_from(self.pd_response())
    }
}

/// Which CC line the source is connected on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CcDirection {
    /// Source connected on CC1
    Cc1,
    /// Source connected on CC2
    Cc2,
}

impl From<bool> for CcDirection {
    fn from(value: bool) -> Self {
        if value {
            CcDirection::Cc2
        } else {
            CcDirection::Cc1
        }
    }
}

impl From<CcDirection> for bool {
    fn from(value: CcDirection) -> Self {
        match value {
            CcDirection::Cc1 => false,
            CcDirection::Cc2 => true,
        }
    }
}

/// Decoded contents of both status registers
///
/// Fields whose raw code is undefined hold `Err(PdError::InvalidResponse)` instead of a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    /// A source is attached
    pub attached: bool,
    /// CC orientation
    pub cc_direction: CcDirection,
    /// Response to the last PD command
    pub response: Result<ResponseCode, PdError>,
    /// 5V contract voltage indicator
    pub contract_5v: bool,
    /// 5V contract current, raw 2-bit code
    pub contract_5v_current: u8,
    /// Contract voltage
    pub source_voltage: Result<SourceVoltage, PdError>,
    /// Contract current
    pub source_current: PdoCurrent,
}

impl Status {
    /// Decode a status snapshot from both registers
    pub fn new(status0: PdStatus0, status1: PdStatus1) -> Self {
        Self {
            attached: status1.attached(),
            cc_direction: status1.cc_direction(),
            response: status1.response(),
            contract_5v: status1.contract_5v(),
            contract_5v_current: status1.contract_5v_current(),
            source_voltage: status0.source_voltage(),
            source_current: status0.source_current(),
        }
    }
}

impl From<[u8; PD_STATUS_LEN]> for Status {
    fn from(raw: [u8; PD_STATUS_LEN]) -> Self {
        Status::new(PdStatus0(raw[0]), PdStatus1(raw[1]))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_status0_fields() {
        // 12V at 3.0A
        let status = PdStatus0(0b0011_1010);
        assert_eq!(status.pd_src_voltage(), 0b0011);
        assert_eq!(status.pd_src_current(), 0b1010);
        assert_eq!(status.source_voltage(), Ok(SourceVoltage::V12));
        assert_eq!(status.source_current(), PdoCurrent::Current3A0);
    }

    #[test]
    fn test_status0_undefined_voltage() {
        for code in 0b0111u8..=0b1111 {
            let status = PdStatus0(code << 4);
            assert_eq!(status.source_voltage(), Err(PdError::InvalidResponse));
            assert_eq!(status.source_current(), PdoCurrent::Current0A5);
        }
    }

    #[test]
    fn test_status1_fields() {
        let status = PdStatus1(0b1100_1010);
        assert!(status.attached());
        assert_eq!(status.cc_direction(), CcDirection::Cc2);
        assert_eq!(status.pd_response(), 0b001);
        assert_eq!(status.response(), Ok(ResponseCode::Success));
        assert!(!status.contract_5v());
        assert_eq!(status.contract_5v_current(), 0b10);

        let status = PdStatus1(0b1100_1110);
        assert!(status.contract_5v());
        assert_eq!(status.contract_5v_current(), 0b10);

        let status = PdStatus1(0b0000_0000);
        assert!(!status.attached());
        assert_eq!(status.cc_direction(), CcDirection::Cc1);
        assert_eq!(status.response(), Ok(ResponseCode::NoResponse));
    }

    #[test]
    fn test_status1_undefined_response() {
        for code in [0b010u8, 0b110, 0b111] {
            let status = PdStatus1(code << 3);
            assert_eq!(status.response(), Err(PdError::InvalidResponse));
        }
    }

    #[test]
    fn test_status_decode_is_pure() {
        let raw = [0b0110_1111, 0b0100_1011];
        let first = Status::from(raw);
        let second = Status::from(raw);
        assert_eq!(first, second);

        assert!(first.attached);
        assert_eq!(first.cc_direction, CcDirection::Cc1);
        assert_eq!(first.response, Ok(ResponseCode::Success));
        assert_eq!(first.source_voltage, Ok(SourceVoltage::V20));
        assert_eq!(first.source_current, PdoCurrent::Current5A0);
        assert!(!first.contract_5v);
        assert_eq!(first.contract_5v_current, 0b11);
    }

    #[test]
    fn test_cc_direction_bool() {
        assert!(bool::from(CcDirection::Cc2));
        assert!(!bool::from(CcDirection::Cc1));
        assert_eq!(CcDirection::from(true), CcDirection::Cc2);
    }
}
