//! This module implements the `GO_COMMAND` sequences.
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use embedded_usb_pd::Error;

use super::Husb238;
use crate::command::Command;
use crate::debug;
use crate::registers::src_pdo::SrcPdo;
use crate::registers::REG_GO_COMMAND;

impl<B: I2c> Husb238<B> {
    /// Write a command without waiting for it to take effect
    pub async fn send_command(&mut self, cmd: Command) -> Result<(), Error<B::Error>> {
        debug!("Sending command {:?}", cmd);
        self.write_register(REG_GO_COMMAND, cmd.into()).await
    }

    /// Reset the PD state machine
    pub async fn reset(&mut self) -> Result<(), Error<B::Error>> {
        self.send_command(Command::Reset).await
    }

    /// Request the voltage previously chosen with [`Self::select_voltage`]
    ///
    /// The outcome is reported later through [`Self::get_response`] and the contract registers.
    pub async fn request_pdo(&mut self) -> Result<(), Error<B::Error>> {
        self.send_command(Command::RequestPdo).await
    }

    /// Send Get_SRC_Cap and return the `SRC_PDO` register once the result is valid
    ///
    /// The read is issued no earlier than [`crate::command::GET_SRC_CAP_SETTLE_MS`] after the
    /// command write. A failed command write returns immediately without waiting.
    pub async fn get_source_capabilities(&mut self, delay: &mut impl DelayNs) -> Result<SrcPdo, Error<B::Error>> {
        let cmd = Command::GetSrcCap;
        self.send_command(cmd).await?;
        delay.delay_ms(cmd.settle_delay_ms()).await;
        self.get_src_pdo_select().await
    }
}

#[cfg(test)]
mod test {
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::Mock;

    use super::*;
    use crate::test::*;

    #[tokio::test]
    async fn test_reset() {
        let mut husb238 = Husb238::new(Mock::new(&[create_register_write(ADDR, 0x09, 0x01)]));
        husb238.reset().await.unwrap();
        husb238.bus.done();
    }

    #[tokio::test]
    async fn test_request_pdo() {
        let mut husb238 = Husb238::new(Mock::new(&[create_register_write(ADDR, 0x09, 0x01)]));
        husb238.request_pdo().await.unwrap();
        husb238.bus.done();
    }

    #[tokio::test]
    async fn test_get_source_capabilities() {
        let mut delay = Delay::default();
        let mut husb238 = Husb238::new(Mock::new(&[
            create_register_write(ADDR, 0x09, 0x02),
            create_register_read(ADDR, 0x08, 0b1010_0000),
        ]));

        let result = husb238.get_source_capabilities(&mut delay).await.unwrap();
        assert_eq!(result, SrcPdo(0b1010_0000));
        assert!(delay.total_ns >= 10_000_000);
        husb238.bus.done();
    }

    #[tokio::test]
    async fn test_get_source_capabilities_write_error() {
        let mut delay = Delay::default();
        let mut husb238 = Husb238::new(Mock::new(&[
            create_register_write(ADDR, 0x09, 0x02).with_error(ErrorKind::Other),
        ]));

        assert_eq!(
            husb238.get_source_capabilities(&mut delay).await,
            Err(Error::Bus(ErrorKind::Other))
        );
        assert_eq!(delay.total_ns, 0);
        husb238.bus.done();
    }
}
