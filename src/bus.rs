//! Polled I2C master transport.
//!
//! The transport owns an [`I2cRegisters`] backend and drives it through the start, address, data
//! and stop phases of a write transaction by polling the peripheral status word. Every wait is
//! bounded by a poll limit, so a stalled bus surfaces as [`Error::Timeout`] instead of hanging
//! the caller.

use core::ops::BitOr;

use hal::blocking::i2c;

/// 7-bit address of the display controller (0x78 on the wire with the write bit).
pub const DISPLAY_ADDRESS: u8 = 0x3C;
/// Lowest usable 7-bit address. Address 0 is the general call address.
pub const FIRST_ADDRESS: u8 = 1;
/// Highest address probed by [`I2cBus::scan`].
pub const LAST_ADDRESS: u8 = 126;
/// Number of status reads a single wait may take before it gives up.
pub const DEFAULT_POLL_LIMIT: u32 = 100_000;

/// A snapshot of the peripheral status word. Bit positions follow the STM32F1 `I2C_SR1`
/// register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status(pub u16);

impl Status {
    /// Start condition generated.
    pub const START_BIT: Status = Status(1 << 0);
    /// Address sent and acknowledged.
    pub const ADDR: Status = Status(1 << 1);
    /// Byte transfer finished.
    pub const BTF: Status = Status(1 << 2);
    /// Data register empty.
    pub const TXE: Status = Status(1 << 7);
    /// Misplaced start or stop condition.
    pub const BERR: Status = Status(1 << 8);
    /// Arbitration lost to another master.
    pub const ARLO: Status = Status(1 << 9);
    /// Acknowledge failure.
    pub const AF: Status = Status(1 << 10);

    /// No flags set.
    pub const fn empty() -> Self {
        Status(0)
    }

    /// True if every bit of `other` is set in `self`.
    pub fn contains(self, other: Status) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if any bit of `other` is set in `self`.
    pub fn intersects(self, other: Status) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for Status {
    type Output = Status;

    fn bitor(self, rhs: Status) -> Status {
        Status(self.0 | rhs.0)
    }
}

/// Raw access to an I2C master peripheral.
///
/// Implementations only poke registers; all sequencing and waiting is done by [`I2cBus`].
pub trait I2cRegisters {
    /// Request a START condition.
    fn start(&mut self);
    /// Request a STOP condition.
    fn stop(&mut self);
    /// Load a byte into the data register for transmission.
    fn write_data(&mut self, byte: u8);
    /// Read the current status word.
    fn read_status(&mut self) -> Status;
    /// Clear the ADDR flag after an acknowledged address phase.
    fn clear_addr(&mut self);
    /// Clear a latched acknowledge failure.
    fn clear_ack_failure(&mut self);
}

impl<'a, R> I2cRegisters for &'a mut R
where
    R: I2cRegisters + ?Sized,
{
    fn start(&mut self) {
        (**self).start()
    }
    fn stop(&mut self) {
        (**self).stop()
    }
    fn write_data(&mut self, byte: u8) {
        (**self).write_data(byte)
    }
    fn read_status(&mut self) -> Status {
        (**self).read_status()
    }
    fn clear_addr(&mut self) {
        (**self).clear_addr()
    }
    fn clear_ack_failure(&mut self) {
        (**self).clear_ack_failure()
    }
}

/// Transport failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A status flag did not appear within the poll limit.
    Timeout,
    /// The target did not acknowledge its address or a data byte.
    Nack,
    /// Another master won arbitration.
    ArbitrationLost,
    /// The peripheral detected a misplaced start or stop condition.
    Bus,
    /// The address is outside 1..=126.
    InvalidAddress,
}

/// A polled I2C master which owns its peripheral.
pub struct I2cBus<R> {
    regs: R,
    poll_limit: u32,
}

impl<R> I2cBus<R>
where
    R: I2cRegisters,
{
    /// Take ownership of the peripheral `regs`, using the default poll limit.
    pub fn new(regs: R) -> Self {
        Self {
            regs,
            poll_limit: DEFAULT_POLL_LIMIT,
        }
    }

    /// Replace the number of status reads each wait may take before failing with
    /// `Error::Timeout`.
    pub fn with_poll_limit(self, poll_limit: u32) -> Self {
        Self { poll_limit, ..self }
    }

    /// Give the peripheral back.
    pub fn release(self) -> R {
        self.regs
    }

    /// Write `bytes` to the device at 7-bit `address` in a single transaction.
    ///
    /// On failure a STOP is issued and any acknowledge failure is cleared, leaving the bus
    /// released for the next transaction.
    pub fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Error> {
        check_address(address)?;
        let result = self.write_frame(address, bytes);
        if let Err(err) = result {
            debug!("i2c: write to {=u8:#x} failed: {}", address, err);
            self.abort();
        }
        result
    }

    /// Run a START and address phase against `address`, reporting whether the device
    /// acknowledged.
    pub fn probe(&mut self, address: u8) -> Result<bool, Error> {
        check_address(address)?;
        match self.address_phase(address, Status::ADDR | Status::AF) {
            Ok(status) if status.contains(Status::AF) => {
                self.abort();
                Ok(false)
            }
            Ok(_) => {
                self.regs.clear_addr();
                self.regs.stop();
                Ok(true)
            }
            Err(err) => {
                self.abort();
                Err(err)
            }
        }
    }

    /// Probe every address from `FIRST_ADDRESS` to `LAST_ADDRESS` in order and return the first
    /// one that acknowledges. Nothing else is put on the bus after a hit.
    pub fn scan(&mut self) -> Result<Option<u8>, Error> {
        for address in FIRST_ADDRESS..=LAST_ADDRESS {
            if self.probe(address)? {
                debug!("i2c: device acknowledged at {=u8:#x}", address);
                return Ok(Some(address));
            }
            trace!("i2c: no ack at {=u8:#x}", address);
        }
        debug!("i2c: scan found no device");
        Ok(None)
    }

    fn write_frame(&mut self, address: u8, bytes: &[u8]) -> Result<(), Error> {
        self.address_phase(address, Status::ADDR)?;
        self.regs.clear_addr();
        for &byte in bytes {
            self.regs.write_data(byte);
            self.wait(Status::BTF)?;
        }
        self.regs.stop();
        Ok(())
    }

    /// Generate START, wait for it, then send the address with the write bit and wait for any of
    /// `flags`.
    fn address_phase(&mut self, address: u8, flags: Status) -> Result<Status, Error> {
        self.regs.start();
        self.wait(Status::START_BIT)?;
        self.regs.write_data(address << 1);
        self.wait(flags)
    }

    fn abort(&mut self) {
        self.regs.stop();
        self.regs.clear_ack_failure();
    }

    /// Check the status word once.
    fn poll(&mut self, flags: Status) -> nb::Result<Status, Error> {
        let status = self.regs.read_status();
        if status.contains(Status::BERR) {
            Err(nb::Error::Other(Error::Bus))
        } else if status.contains(Status::ARLO) {
            Err(nb::Error::Other(Error::ArbitrationLost))
        } else if status.intersects(flags) {
            Ok(status)
        } else if status.contains(Status::AF) {
            Err(nb::Error::Other(Error::Nack))
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    fn wait(&mut self, flags: Status) -> Result<Status, Error> {
        for _ in 0..self.poll_limit {
            match self.poll(flags) {
                Ok(status) => return Ok(status),
                Err(nb::Error::Other(err)) => return Err(err),
                Err(nb::Error::WouldBlock) => {}
            }
        }
        warn!("i2c: timed out waiting for {}", flags);
        Err(Error::Timeout)
    }
}

impl<R> i2c::Write for I2cBus<R>
where
    R: I2cRegisters,
{
    type Error = Error;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Error> {
        I2cBus::write(self, address, bytes)
    }
}

fn check_address(address: u8) -> Result<(), Error> {
    match address {
        FIRST_ADDRESS..=LAST_ADDRESS => Ok(()),
        _ => Err(Error::InvalidAddress),
    }
}
