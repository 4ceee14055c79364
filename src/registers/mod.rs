//! HUSB238 register map
//!
//! Every register is a single byte. Field layouts live next to the register they describe in
//! [`pd_status`] and [`src_pdo`].
use crate::pdo::SelectableVoltage;

pub mod pd_status;
pub mod src_pdo;

/// PD status 0, contract voltage and current
pub const REG_PD_STATUS0: u8 = 0x00;
/// PD status 1, attachment, CC orientation, last response and 5V contract
pub const REG_PD_STATUS1: u8 = 0x01;
/// Source capability for 5V
pub const REG_SRC_PDO_5V: u8 = 0x02;
/// Source capability for 9V
pub const REG_SRC_PDO_9V: u8 = 0x03;
/// Source capability for 12V
pub const REG_SRC_PDO_12V: u8 = 0x04;
/// Source capability for 15V
pub const REG_SRC_PDO_15V: u8 = 0x05;
/// Source capability for 18V
pub const REG_SRC_PDO_18V: u8 = 0x06;
/// Source capability for 20V
pub const REG_SRC_PDO_20V: u8 = 0x07;
/// PDO selection, also holds the Get_SRC_Cap result
pub const REG_SRC_PDO: u8 = 0x08;
/// Command register
pub const REG_GO_COMMAND: u8 = 0x09;

/// Length of the two status registers, read together by [`pd_status::Status`]
pub const PD_STATUS_LEN: usize = 2;

/// Returns the address of the source capability register for `voltage`
pub const fn src_pdo_cap_addr(voltage: SelectableVoltage) -> u8 {
    match voltage {
        SelectableVoltage::V5 => REG_SRC_PDO_5V,
        SelectableVoltage::V9 => REG_SRC_PDO_9V,
        SelectableVoltage::V12 => REG_SRC_PDO_12V,
        SelectableVoltage::V15 => REG_SRC_PDO_15V,
        SelectableVoltage::V18 => REG_SRC_PDO_18V,
        SelectableVoltage::V20 => REG_SRC_PDO_20V,
    }
}
