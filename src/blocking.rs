//! Synchronous HUSB238 driver
//!
//! Mirrors [`crate::asynchronous::internal::Husb238`] for executors without async support.
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use embedded_usb_pd::Error;
use heapless::Vec;

use crate::command::{Command, ResponseCode};
use crate::pdo::{PdoCurrent, SelectableVoltage, SourceVoltage};
use crate::registers::pd_status::{CcDirection, PdStatus0, PdStatus1, Status};
use crate::registers::src_pdo::{SourceCapabilities, SourceCapability, SrcPdo, SrcPdoCap, NUM_SRC_PDOS};
use crate::registers::{self, PD_STATUS_LEN, REG_GO_COMMAND};
use crate::{debug, error, trace, warn, DEFAULT_ADDR};

/// Blocking HUSB238 driver, generic over I2C bus (B)
pub struct Husb238<B: I2c> {
    bus: B,
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

    fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Error<B::Error>> {
        self.bus.write_read(self.addr, &[reg], buf).map_err(Error::Bus)?;
        trace!("Read {:?} from {:#x}", buf, reg);
        Ok(())
    }

    fn read_register(&mut self, reg: u8) -> Result<u8, Error<B::Error>> {
        let mut buf = [0u8];
        self.read_registers(reg, &mut buf)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Error<B::Error>> {
        trace!("Write {:#x} to {:#x}", value, reg);
        self.bus.write(self.addr, &[reg, value]).map_err(Error::Bus)
    }

    // Status

    /// Get PD status 0
    pub fn get_pd_status0(&mut self) -> Result<PdStatus0, Error<B::Error>> {
        self.read_register(registers::REG_PD_STATUS0).map(PdStatus0)
    }

    /// Get PD status 1
    pub fn get_pd_status1(&mut self) -> Result<PdStatus1, Error<B::Error>> {
        self.read_register(registers::REG_PD_STATUS1).map(PdStatus1)
    }

    /// Read both status registers in a single transfer
    pub fn get_status(&mut self) -> Result<Status, Error<B::Error>> {
        let mut buf = [0u8; PD_STATUS_LEN];
        self.read_registers(registers::REG_PD_STATUS0, &mut buf)?;
        Ok(buf.into())
    }

    /// Check whether a source is attached
    pub fn is_attached(&mut self) -> Result<bool, Error<B::Error>> {
        self.get_pd_status1().map(|s| s.attached())
    }

    /// Get the CC line the source is connected on
    pub fn get_cc_direction(&mut self) -> Result<CcDirection, Error<B::Error>> {
        self.get_pd_status1().map(|s| s.cc_direction())
    }

    /// Get the response to the last PD command
    pub fn get_response(&mut self) -> Result<ResponseCode, Error<B::Error>> {
        let status = self.get_pd_status1()?;
        status.response().map_err(|e| {
            error!("Undefined PD response code {:#x}", status.pd_response());
            Error::Pd(e)
        })
    }

    /// Get the 5V contract voltage indicator
    pub fn get_5v_contract_voltage(&mut self) -> Result<bool, Error<B::Error>> {
        self.get_pd_status1().map(|s| s.contract_5v())
    }

    /// Get the raw 2-bit 5V contract current code
    pub fn get_5v_contract_current(&mut self) -> Result<u8, Error<B::Error>> {
        self.get_pd_status1().map(|s| s.contract_5v_current())
    }

    /// Get the contract voltage
    pub fn get_source_voltage(&mut self) -> Result<SourceVoltage, Error<B::Error>> {
        let status = self.get_pd_status0()?;
        status.source_voltage().map_err(|e| {
            error!("Undefined source voltage code {:#x}", status.pd_src_voltage());
            Error::Pd(e)
        })
    }

    /// Get the contract current
    pub fn get_source_current(&mut self) -> Result<PdoCurrent, Error<B::Error>> {
        self.get_pd_status0().map(|s| s.source_current())
    }

    // Source capabilities

    /// Get the source capability for a single voltage
    pub fn get_src_pdo(&mut self, voltage: SelectableVoltage) -> Result<SourceCapability, Error<B::Error>> {
        let raw = self.read_register(registers::src_pdo_cap_addr(voltage))?;
        Ok(SourceCapability::new(voltage, SrcPdoCap(raw)))
    }

    /// Check whether the source advertises `voltage`
    pub fn is_voltage_detected(&mut self, voltage: SelectableVoltage) -> Result<bool, Error<B::Error>> {
        self.get_src_pdo(voltage).map(|cap| cap.detected)
    }

    /// Get the maximum current the source offers at `voltage`
    pub fn get_max_current(&mut self, voltage: SelectableVoltage) -> Result<PdoCurrent, Error<B::Error>> {
        self.get_src_pdo(voltage).map(|cap| cap.max_current)
    }

    /// Read the capability register of every voltage, one transfer each
    pub fn get_source_capabilities_table(&mut self) -> Result<SourceCapabilities, Error<B::Error>> {
        let mut raw = [SrcPdoCap(0); NUM_SRC_PDOS];
        for (cap, voltage) in raw.iter_mut().zip(SelectableVoltage::ALL) {
            *cap = SrcPdoCap(self.read_register(registers::src_pdo_cap_addr(voltage))?);
        }

        Ok(SourceCapabilities::new(raw))
    }

    /// Voltages advertised by the source, ascending
    pub fn available_voltages(&mut self) -> Result<Vec<SelectableVoltage, NUM_SRC_PDOS>, Error<B::Error>> {
        self.get_source_capabilities_table().map(|caps| caps.available())
    }

    // Voltage selection

    /// Get the raw PDO selection register
    pub fn get_src_pdo_select(&mut self) -> Result<SrcPdo, Error<B::Error>> {
        self.read_register(registers::REG_SRC_PDO).map(SrcPdo)
    }

    /// Get the voltage currently selected for the next request
    pub fn get_selected_voltage(&mut self) -> Result<SelectableVoltage, Error<B::Error>> {
        self.get_src_pdo_select()?.selected_voltage().map_err(Error::Pd)
    }

    /// Select the voltage used by the next [`Self::request_pdo`], only bits 4-7 of `SRC_PDO` change
    pub fn select_voltage(&mut self, voltage: SelectableVoltage) -> Result<(), Error<B::Error>> {
        let mut reg = self.get_src_pdo_select()?;
        reg.set_selected_voltage(voltage);
        self.write_register(registers::REG_SRC_PDO, reg.0)
    }

    /// Select a voltage given in volts, rejected before any bus access if unsupported
    pub fn set_voltage(&mut self, volts: u8) -> Result<(), Error<B::Error>> {
        let voltage = SelectableVoltage::try_from(volts).map_err(|e| {
            warn!("Rejecting unsupported voltage {}V", volts);
            Error::<B::Error>::Pd(e)
        })?;
        self.select_voltage(voltage)
    }

    // Commands

    /// Write a command without waiting for it to take effect
    pub fn send_command(&mut self, cmd: Command) -> Result<(), Error<B::Error>> {
        debug!("Sending command {:?}", cmd);
        self.write_register(REG_GO_COMMAND, cmd.into())
    }

    /// Reset the PD state machine
    pub fn reset(&mut self) -> Result<(), Error<B::Error>> {
        self.send_command(Command::Reset)
    }

    /// Request the voltage previously chosen with [`Self::select_voltage`]
    pub fn request_pdo(&mut self) -> Result<(), Error<B::Error>> {
        self.send_command(Command::RequestPdo)
    }

    /// Send Get_SRC_Cap, block for the settle delay and return the `SRC_PDO` register
    pub fn get_source_capabilities(&mut self, delay: &mut impl DelayNs) -> Result<SrcPdo, Error<B::Error>> {
        let cmd = Command::GetSrcCap;
        self.send_command(cmd)?;
        delay.delay_ms(cmd.settle_delay_ms());
        self.get_src_pdo_select()
    }
}

#[cfg(test)]
mod test {
    extern crate std;
    use core::cell::RefCell;
    use std::rc::Rc;
    use std::vec;

    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};
    use embedded_hal_mock::eh1::i2c::{Mock, Transaction};
    use embedded_usb_pd::PdError;

    use super::*;
    use crate::test::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Write,
        Read,
        Delay(u32),
    }

    type EventLog = Rc<RefCell<std::vec::Vec<Event>>>;

    /// Records the order of bus accesses relative to delays
    struct LoggedBus {
        mock: Mock,
        log: EventLog,
    }

    impl ErrorType for LoggedBus {
        type Error = ErrorKind;
    }

    impl I2c for LoggedBus {
        fn write(&mut self, address: u8, write: &[u8]) -> Result<(), Self::Error> {
            self.log.borrow_mut().push(Event::Write);
            self.mock.write(address, write)
        }

        fn write_read(&mut self, address: u8, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error> {
            self.log.borrow_mut().push(Event::Read);
            self.mock.write_read(address, write, read)
        }

        fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
            self.mock.transaction(address, operations)
        }
    }

    struct LoggedDelay {
        log: EventLog,
    }

    impl DelayNs for LoggedDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.log.borrow_mut().push(Event::Delay(ns));
        }
    }

    #[test]
    fn test_status_registers() {
        let mut husb238 = Husb238::new(Mock::new(&[
            create_register_read(ADDR, 0x00, 0b0011_1010),
            create_register_read(ADDR, 0x00, 0b0011_1010),
            create_register_read(ADDR, 0x01, 0b1100_1010),
            create_register_read(ADDR, 0x01, 0b1100_1010),
            create_register_read(ADDR, 0x01, 0b1100_1010),
            create_register_read(ADDR, 0x01, 0b1100_1010),
            create_register_read(ADDR, 0x01, 0b1100_1010),
        ]));

        assert_eq!(husb238.get_source_voltage().unwrap(), SourceVoltage::V12);
        assert_eq!(husb238.get_source_current().unwrap(), PdoCurrent::Current3A0);
        assert!(husb238.is_attached().unwrap());
        assert_eq!(husb238.get_cc_direction().unwrap(), CcDirection::Cc2);
        assert_eq!(husb238.get_response().unwrap(), ResponseCode::Success);
        // Bit 2 is clear in 0b1100_1010
        assert!(!husb238.get_5v_contract_voltage().unwrap());
        assert_eq!(husb238.get_5v_contract_current().unwrap(), 0b10);
        husb238.into_inner().done();
    }

    #[test]
    fn test_get_status() {
        let mut husb238 = Husb238::new(Mock::new(&[Transaction::write_read(
            ADDR,
            vec![0x00],
            vec![0b0000_0000, 0b0000_0000],
        )]));

        let status = husb238.get_status().unwrap();
        assert!(!status.attached);
        assert_eq!(status.response, Ok(ResponseCode::NoResponse));
        assert_eq!(status.source_voltage, Ok(SourceVoltage::Unattached));
        husb238.into_inner().done();
    }

    #[test]
    fn test_source_capabilities_table() {
        let mut husb238 = Husb238::new(Mock::new(&[
            create_register_read(ADDR, 0x02, 0b1000_0010),
            create_register_read(ADDR, 0x03, 0b1000_1010),
            create_register_read(ADDR, 0x04, 0b0000_0000),
            create_register_read(ADDR, 0x05, 0b1000_1010),
            create_register_read(ADDR, 0x06, 0b0000_0000),
            create_register_read(ADDR, 0x07, 0b0000_0000),
        ]));

        let caps = husb238.get_source_capabilities_table().unwrap();
        assert_eq!(
            caps.available().as_slice(),
            &[SelectableVoltage::V5, SelectableVoltage::V9, SelectableVoltage::V15]
        );
        assert_eq!(caps[SelectableVoltage::V5].max_current, PdoCurrent::Current1A0);
        assert_eq!(caps[SelectableVoltage::V15].max_current.milliamps(), 3000);
        husb238.into_inner().done();
    }

    #[test]
    fn test_select_voltage_preserves_low_bits() {
        let mut husb238 = Husb238::new(Mock::new(&[
            create_register_read(ADDR, 0x08, 0b0011_1111),
            create_register_write(ADDR, 0x08, 0b1010_1111),
        ]));

        husb238.select_voltage(SelectableVoltage::V20).unwrap();
        husb238.into_inner().done();
    }

    #[test]
    fn test_set_voltage_invalid() {
        let mut husb238 = Husb238::new(Mock::new(&[]));

        assert_eq!(husb238.set_voltage(7), Err(Error::Pd(PdError::InvalidParams)));
        husb238.into_inner().done();
    }

    #[test]
    fn test_select_then_request() {
        let mut husb238 = Husb238::new(Mock::new(&[
            create_register_read(ADDR, 0x08, 0b0001_0000),
            create_register_write(ADDR, 0x08, 0b1000_0000),
            create_register_write(ADDR, 0x09, 0x01),
        ]));

        husb238.set_voltage(15).unwrap();
        husb238.request_pdo().unwrap();
        husb238.into_inner().done();
    }

    #[test]
    fn test_get_source_capabilities_ordering() {
        let log = EventLog::default();
        let mut delay = LoggedDelay { log: log.clone() };
        let mut husb238 = Husb238::new(LoggedBus {
            mock: Mock::new(&[
                create_register_write(ADDR, 0x09, 0x02),
                create_register_read(ADDR, 0x08, 0b1001_0000),
            ]),
            log: log.clone(),
        });

        let result = husb238.get_source_capabilities(&mut delay).unwrap();
        assert_eq!(result.selected_voltage(), Ok(SelectableVoltage::V18));

        let events = log.borrow();
        assert_eq!(events.first(), Some(&Event::Write));
        assert_eq!(events.last(), Some(&Event::Read));
        assert_eq!(events.iter().filter(|e| **e == Event::Write).count(), 1);
        assert_eq!(events.iter().filter(|e| **e == Event::Read).count(), 1);

        let waited_ns: u64 = events
            .iter()
            .map(|e| match e {
                Event::Delay(ns) => u64::from(*ns),
                _ => 0,
            })
            .sum();
        assert!(waited_ns >= 10_000_000);
        drop(events);

        husb238.into_inner().mock.done();
    }

    #[test]
    fn test_get_source_capabilities_write_error() {
        let mut delay = Delay::default();
        let mut husb238 = Husb238::new(Mock::new(&[
            create_register_write(ADDR, 0x09, 0x02).with_error(ErrorKind::Other),
        ]));

        assert_eq!(
            husb238.get_source_capabilities(&mut delay),
            Err(Error::Bus(ErrorKind::Other))
        );
        assert_eq!(delay.total_ns, 0);
        husb238.into_inner().done();
    }

    #[test]
    fn test_reset() {
        let mut husb238 = Husb238::new(Mock::new(&[create_register_write(ADDR, 0x09, 0x01)]));
        husb238.reset().unwrap();
        husb238.into_inner().done();
    }
}
