//! Driver for the HUSB238 USB Type-C PD sink controller
//!
//! The chip negotiates one of six fixed voltages with an attached source. Three drivers share the
//! same register model and operation names:
//! * [`blocking::Husb238`] over `embedded_hal::i2c::I2c`
//! * [`asynchronous::internal::Husb238`] over `embedded_hal_async::i2c::I2c`
//! * [`asynchronous::embassy::Controller`], a mutex-guarded wrapper for sharing one chip between
//!   tasks (feature `embassy`)
#![no_std]

pub mod asynchronous;
pub mod blocking;
pub mod command;
pub(crate) mod fmt;
pub mod pdo;
pub mod registers;

/// Default 7-bit I2C address
pub const DEFAULT_ADDR: u8 = 0x08;

#[cfg(test)]
pub(crate) mod test {
    extern crate std;
    use std::vec;

    use embedded_hal_mock::eh1::i2c::Transaction;

    use super::*;

    pub const ADDR: u8 = DEFAULT_ADDR;

    /// Wrapper to easily create a single register read transaction
    pub fn create_register_read(addr: u8, reg: u8, value: u8) -> Transaction {
        Transaction::write_read(addr, vec![reg], vec![value])
    }

    /// Wrapper to easily create a single register write transaction
    pub fn create_register_write(addr: u8, reg: u8, value: u8) -> Transaction {
        Transaction::write(addr, vec![reg, value])
    }

    /// Delay that returns immediately and records how long it was asked to wait
    #[derive(Debug, Default)]
    pub struct Delay {
        pub total_ns: u64,
    }

    impl embedded_hal::delay::DelayNs for Delay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
        }
    }

    impl embedded_hal_async::delay::DelayNs for Delay {
        async fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
        }
    }
}
