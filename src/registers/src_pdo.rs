//! Types related to the source PDO registers, `0x02..=0x08`
use core::ops::Index;

use bitfield::bitfield;
use embedded_usb_pd::PdError;
use heapless::Vec;

use crate::pdo::{PdoCurrent, SelectableVoltage};

/// Number of fixed voltages the chip reports capabilities for
pub const NUM_SRC_PDOS: usize = SelectableVoltage::ALL.len();

bitfield! {
    /// Source capability register for a single fixed voltage, `SRC_PDO_5V..=SRC_PDO_20V`
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct SrcPdoCap(u8);
    impl Debug;
    /// Source advertises this voltage
    pub bool, detected, _: 7;
    /// Maximum current code for this voltage
    pub u8, max_current, _: 3, 0;
}

bitfield! {
    /// PDO selection register, `SRC_PDO`
    ///
    /// Bits 0-3 are not touched by voltage selection.
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct SrcPdo(u8);
    impl Debug;
    /// Selected PDO code
    pub u8, pdo_select, set_pdo_select: 7, 4;
}

impl SrcPdo {
    /// Decoded selected voltage
    pub fn selected_voltage(&self) -> Result<SelectableVoltage, PdError> {
        SelectableVoltage::from_selector_code(self.pdo_select())
    }

    /// Replace the selected voltage, preserving every other bit
    pub fn set_selected_voltage(&mut self, voltage: SelectableVoltage) -> &mut Self {
        self.set_pdo_select(voltage.selector_code());
        self
    }
}

/// Decoded capability of the source for one fixed voltage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SourceCapability {
    /// Voltage this capability describes
    pub voltage: SelectableVoltage,
    /// Source advertises this voltage
    pub detected: bool,
    /// Maximum current the source offers at this voltage
    pub max_current: PdoCurrent,
}

impl SourceCapability {
    /// Decode the capability register of `voltage`
    pub fn new(voltage: SelectableVoltage, raw: SrcPdoCap) -> Self {
        Self {
            voltage,
            detected: raw.detected(),
            max_current: raw.max_current().into(),
        }
    }
}

/// Capabilities for every fixed voltage, ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SourceCapabilities([SourceCapability; NUM_SRC_PDOS]);

impl SourceCapabilities {
    /// Build from raw capability registers, ordered as [`SelectableVoltage::ALL`]
    pub fn new(raw: [SrcPdoCap; NUM_SRC_PDOS]) -> Self {
        let mut caps = [SourceCapability {
            voltage: SelectableVoltage::V5,
            detected: false,
            max_current: PdoCurrent::Current0A5,
        }; NUM_SRC_PDOS];

        for ((cap, voltage), raw) in caps.iter_mut().zip(SelectableVoltage::ALL).zip(raw) {
            *cap = SourceCapability::new(voltage, raw);
        }

        Self(caps)
    }

    /// Iterate over all capabilities, ascending
    pub fn iter(&self) -> impl Iterator<Item = &SourceCapability> {
        self.0.iter()
    }

    /// Voltages advertised by the source, ascending
    pub fn available(&self) -> Vec<SelectableVoltage, NUM_SRC_PDOS> {
        self.0.iter().filter(|cap| cap.detected).map(|cap| cap.voltage).collect()
    }
}

impl Index<SelectableVoltage> for SourceCapabilities {
    type Output = SourceCapability;

    fn index(&self, voltage: SelectableVoltage) -> &Self::Output {
        &self.0[voltage.index()]
    }
}
