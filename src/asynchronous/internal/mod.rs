//! Asynchronous, low-level HUSB238 driver. This module provides a low-level interface
//!
//! Every method is a fresh bus transaction, nothing is cached because the source can renegotiate
//! at any time.
use embedded_hal_async::i2c::I2c;
use embedded_usb_pd::Error;
use heapless::Vec;

use crate::command::ResponseCode;
use crate::pdo::{PdoCurrent, SelectableVoltage, SourceVoltage};
use crate::registers::pd_status::{CcDirection, PdStatus0, PdStatus1, Status};
use crate::registers::src_pdo::{SourceCapabilities, SourceCapability, SrcPdo, SrcPdoCap, NUM_SRC_PDOS};
use crate::registers::{self, PD_STATUS_LEN};
use crate::{error, trace, warn, DEFAULT_ADDR};

mod command;

/// Low-level HUSB238 driver, generic over I2C bus (B)
pub struct Husb238<B: I2c> {
    pub(crate) bus: B,
    addr: u8,
}

impl<B: I2c> Husb238<B> {
    /// Create a driver using the default address
    pub fn new(bus: B) -> Self {
        Self::with_address(bus, DEFAULT_ADDR)
    }

    /// Create a driver for a chip at a custom 7-bit address
    pub fn with_address(bus: B, addr: u8) -> Self {
        Self { bus, addr }
    }

    /// Returns the I2C address of the chip
    pub fn addr(&self) -> u8 {
        self.addr
    }

    /// Release the underlying bus
    pub fn into_inner(self) -> B {
        self.bus
    }

    /// Read consecutive registers starting at `reg`
    async fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Error<B::Error>> {
        self.bus.write_read(self.addr, &[reg], buf).await.map_err(Error::Bus)?;
        trace!("Read {:?} from {:#x}", buf, reg);
        Ok(())
    }

    /// Read a single register
    async fn read_register(&mut self, reg: u8) -> Result<u8, Error<B::Error>> {
        let mut buf = [0u8];
        self.read_registers(reg, &mut buf).await?;
        Ok(buf[0])
    }

    /// Write a single register
    async fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Error<B::Error>> {
        trace!("Write {:#x} to {:#x}", value, reg);
        self.bus.write(self.addr, &[reg, value]).await.map_err(Error::Bus)
    }

    /// Get PD status 0
    pub async fn get_pd_status0(&mut self) -> Result<PdStatus0, Error<B::Error>> {
        self.read_register(registers::REG_PD_STATUS0).await.map(PdStatus0)
    }

    /// Get PD status 1
    pub async fn get_pd_status1(&mut self) -> Result<PdStatus1, Error<B::Error>> {
        self.read_register(registers::REG_PD_STATUS1).await.map(PdStatus1)
    }

    /// Read both status registers in a single transfer
    pub async fn get_status(&mut self) -> Result<Status, Error<B::Error>> {
        let mut buf = [0u8; PD_STATUS_LEN];
        self.read_registers(registers::REG_PD_STATUS0, &mut buf).await?;
        Ok(buf.into())
    }

    /// Check whether a source is attached
    pub async fn is_attached(&mut self) -> Result<bool, Error<B::Error>> {
        self.get_pd_status1().await.map(|s| s.attached())
    }

    /// Get the CC line the source is connected on
    pub async fn get_cc_direction(&mut self) -> Result<CcDirection, Error<B::Error>> {
        self.get_pd_status1().await.map(|s| s.cc_direction())
    }

    /// Get the response to the last PD command
    pub async fn get_response(&mut self) -> Result<ResponseCode, Error<B::Error>> {
        let status = self.get_pd_status1().await?;
        status.response().map_err(|e| {
            error!("Undefined PD response code {:#x}", status.pd_response());
            Error::Pd(e)
        })
    }

    /// Get the 5V contract voltage indicator
    pub async fn get_5v_contract_voltage(&mut self) -> Result<bool, Error<B::Error>> {
        self.get_pd_status1().await.map(|s| s.contract_5v())
    }

    /// Get the raw 2-bit 5V contract current code
    pub async fn get_5v_contract_current(&mut self) -> Result<u8, Error<B::Error>> {
        self.get_pd_status1().await.map(|s| s.contract_5v_current())
    }

    /// Get the contract voltage
    pub async fn get_source_voltage(&mut self) -> Result<SourceVoltage, Error<B::Error>> {
        let status = self.get_pd_status0().await?;
        status.source_voltage().map_err(|e| {
            error!("Undefined source voltage code {:#x}", status.pd_src_voltage());
            Error::Pd(e)
        })
    }

    /// Get the contract current
    pub async fn get_source_current(&mut self) -> Result<PdoCurrent, Error<B::Error>> {
        self.get_pd_status0().await.map(|s| s.source_current())
    }

    /// Get the source capability for a single voltage
    pub async fn get_src_pdo(&mut self, voltage: SelectableVoltage) -> Result<SourceCapability, Error<B::Error>> {
        let raw = self.read_register(registers::src_pdo_cap_addr(voltage)).await?;
        Ok(SourceCapability::new(voltage, SrcPdoCap(raw)))
    }

    /// Check whether the source advertises `voltage`
    pub async fn is_voltage_detected(&mut self, voltage: SelectableVoltage) -> Result<bool, Error<B::Error>> {
        self.get_src_pdo(voltage).await.map(|cap| cap.detected)
    }

    /// Get the maximum current the source offers at `voltage`
    pub async fn get_max_current(&mut self, voltage: SelectableVoltage) -> Result<PdoCurrent, Error<B::Error>> {
        self.get_src_pdo(voltage).await.map(|cap| cap.max_current)
    }

    /// Read the capability register of every voltage, one transfer each
    pub async fn get_source_capabilities_table(&mut self) -> Result<SourceCapabilities, Error<B::Error>> {
        let mut raw = [SrcPdoCap(0); NUM_SRC_PDOS];
        for (cap, voltage) in raw.iter_mut().zip(SelectableVoltage::ALL) {
            *cap = SrcPdoCap(self.read_register(registers::src_pdo_cap_addr(voltage)).await?);
        }

        Ok(SourceCapabilities::new(raw))
    }

    /// Voltages advertised by the source, ascending
    pub async fn available_voltages(&mut self) -> Result<Vec<SelectableVoltage, NUM_SRC_PDOS>, Error<B::Error>> {
        self.get_source_capabilities_table().await.map(|caps| caps.available())
    }

    /// Get the raw PDO selection register
    pub async fn get_src_pdo_select(&mut self) -> Result<SrcPdo, Error<B::Error>> {
        self.read_register(registers::REG_SRC_PDO).await.map(SrcPdo)
    }

    /// Get the voltage currently selected for the next request
    pub async fn get_selected_voltage(&mut self) -> Result<SelectableVoltage, Error<B::Error>> {
        self.get_src_pdo_select()
            .await?
            .selected_voltage()
            .map_err(Error::Pd)
    }

    /// Select the voltage used by the next [`Self::request_pdo`]
    ///
    /// Only bits 4-7 of `SRC_PDO` are modified.
    pub async fn select_voltage(&mut self, voltage: SelectableVoltage) -> Result<(), Error<B::Error>> {
        let mut reg = self.get_src_pdo_select().await?;
        reg.set_selected_voltage(voltage);
        self.write_register(registers::REG_SRC_PDO, reg.0).await
    }

    /// Select a voltage given in volts
    ///
    /// Fails with [`embedded_usb_pd::PdError::InvalidParams`] without touching the bus if the chip cannot request `volts`.
    pub async fn set_voltage(&mut self, volts: u8) -> Result<(), Error<B::Error>> {
        let voltage = SelectableVoltage::try_from(volts).map_err(|e| {
            warn!("Rejecting unsupported voltage {}V", volts);
            Error::<B::Error>::Pd(e)
        })?;
        self.select_voltage(voltage).await
    }
}
