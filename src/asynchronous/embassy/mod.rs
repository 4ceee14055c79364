//! This module contains a high-level API uses embassy synchronization types
//!
//! The chip has no transaction-level atomicity beyond a single register access, so every
//! multi-step sequence below holds the bus lock from its first transfer to its last.
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embassy_time::Delay;
use embedded_hal_async::i2c::I2c;
use embedded_usb_pd::Error;
use heapless::Vec;

use crate::asynchronous::internal;
use crate::command::ResponseCode;
use crate::info;
use crate::pdo::{PdoCurrent, SelectableVoltage, SourceVoltage};
use crate::registers::pd_status::{CcDirection, Status};
use crate::registers::src_pdo::{SourceCapabilities, SourceCapability, SrcPdo, NUM_SRC_PDOS};

/// Owns the low-level driver, create handles to it with [`Controller::device`]
pub struct Controller<M: RawMutex, B: I2c> {
    /// Low-level HUSB238 driver
    pub(super) inner: Mutex<M, internal::Husb238<B>>,
}

impl<M: RawMutex, B: I2c> Controller<M, B> {
    /// Create a controller for a chip at the default address
    pub fn new(bus: B) -> Self {
        Self {
            inner: Mutex::new(internal::Husb238::new(bus)),
        }
    }

    /// Create a controller for a chip at a custom address
    pub fn with_address(bus: B, addr: u8) -> Self {
        Self {
            inner: Mutex::new(internal::Husb238::with_address(bus, addr)),
        }
    }

    /// Create a handle for accessing the chip
    pub fn device(&self) -> Husb238<'_, M, B> {
        Husb238 { controller: self }
    }

    /// Release the underlying bus
    pub fn into_inner(self) -> B {
        self.inner.into_inner().into_inner()
    }
}

/// Handle for a HUSB238 shared between tasks
pub struct Husb238<'a, M: RawMutex, B: I2c> {
    controller: &'a Controller<M, B>,
}

impl<M: RawMutex, B: I2c> Clone for Husb238<'_, M, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: RawMutex, B: I2c> Copy for Husb238<'_, M, B> {}

impl<M: RawMutex, B: I2c> Husb238<'_, M, B> {
    /// Locks the inner device
    async fn lock_inner(&mut self) -> MutexGuard<'_, M, internal::Husb238<B>> {
        self.controller.inner.lock().await
    }

    /// Wrapper for `get_status`
    pub async fn get_status(&mut self) -> Result<Status, Error<B::Error>> {
        self.lock_inner().await.get_status().await
    }

    /// Wrapper for `is_attached`
    pub async fn is_attached(&mut self) -> Result<bool, Error<B::Error>> {
        self.lock_inner().await.is_attached().await
    }

    /// Wrapper for `get_cc_direction`
    pub async fn get_cc_direction(&mut self) -> Result<CcDirection, Error<B::Error>> {
        self.lock_inner().await.get_cc_direction().await
    }

    /// Wrapper for `get_response`
    pub async fn get_response(&mut self) -> Result<ResponseCode, Error<B::Error>> {
        self.lock_inner().await.get_response().await
    }

    /// Wrapper for `get_5v_contract_voltage`
    pub async fn get_5v_contract_voltage(&mut self) -> Result<bool, Error<B::Error>> {
        self.lock_inner().await.get_5v_contract_voltage().await
    }

    /// Wrapper for `get_5v_contract_current`
    pub async fn get_5v_contract_current(&mut self) -> Result<u8, Error<B::Error>> {
        self.lock_inner().await.get_5v_contract_current().await
    }

    /// Wrapper for `get_source_voltage`
    pub async fn get_source_voltage(&mut self) -> Result<SourceVoltage, Error<B::Error>> {
        self.lock_inner().await.get_source_voltage().await
    }

    /// Wrapper for `get_source_current`
    pub async fn get_source_current(&mut self) -> Result<PdoCurrent, Error<B::Error>> {
        self.lock_inner().await.get_source_current().await
    }

    /// Wrapper for `get_src_pdo`
    pub async fn get_src_pdo(&mut self, voltage: SelectableVoltage) -> Result<SourceCapability, Error<B::Error>> {
        self.lock_inner().await.get_src_pdo(voltage).await
    }

    /// Wrapper for `get_source_capabilities_table`, all six reads happen under one lock
    pub async fn get_source_capabilities_table(&mut self) -> Result<SourceCapabilities, Error<B::Error>> {
        self.lock_inner().await.get_source_capabilities_table().await
    }

    /// Wrapper for `available_voltages`
    pub async fn available_voltages(&mut self) -> Result<Vec<SelectableVoltage, NUM_SRC_PDOS>, Error<B::Error>> {
        self.lock_inner().await.available_voltages().await
    }

    /// Wrapper for `get_selected_voltage`
    pub async fn get_selected_voltage(&mut self) -> Result<SelectableVoltage, Error<B::Error>> {
        self.lock_inner().await.get_selected_voltage().await
    }

    /// Wrapper for `select_voltage`
    pub async fn select_voltage(&mut self, voltage: SelectableVoltage) -> Result<(), Error<B::Error>> {
        self.lock_inner().await.select_voltage(voltage).await
    }

    /// Wrapper for `set_voltage`
    pub async fn set_voltage(&mut self, volts: u8) -> Result<(), Error<B::Error>> {
        self.lock_inner().await.set_voltage(volts).await
    }

    /// Wrapper for `reset`
    pub async fn reset(&mut self) -> Result<(), Error<B::Error>> {
        self.lock_inner().await.reset().await
    }

    /// Wrapper for `request_pdo`
    pub async fn request_pdo(&mut self) -> Result<(), Error<B::Error>> {
        self.lock_inner().await.request_pdo().await
    }

    /// Send Get_SRC_Cap, keeping other tasks off the bus until the result has been read
    pub async fn get_source_capabilities(&mut self) -> Result<SrcPdo, Error<B::Error>> {
        let mut inner = self.lock_inner().await;
        inner.get_source_capabilities(&mut Delay).await
    }

    /// Select `voltage` and request it as a single sequence
    pub async fn negotiate(&mut self, voltage: SelectableVoltage) -> Result<(), Error<B::Error>> {
        let mut inner = self.lock_inner().await;
        info!("Requesting {}V", voltage.volts());
        inner.select_voltage(voltage).await?;
        inner.request_pdo().await
    }
}
