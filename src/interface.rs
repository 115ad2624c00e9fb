/// Control byte prefixing a byte to be interpreted as a command.
pub const CONTROL_COMMAND: u8 = 0x00;
/// Control byte prefixing a byte to be written into display RAM.
pub const CONTROL_DATA: u8 = 0x40;

/// A channel to the display controller which distinguishes command bytes from display RAM data.
pub trait DisplayInterface {
    type Error;

    fn send_command(&mut self, cmd: u8) -> Result<(), Self::Error>;
    fn send_data(&mut self, data: u8) -> Result<(), Self::Error>;
}

pub mod i2c {
    //! The I2C interface sends every byte in its own write transaction, prefixed with the control
    //! byte that tells the controller whether it is a command or display data.

    use hal::blocking::i2c::Write;

    use super::{DisplayInterface, CONTROL_COMMAND, CONTROL_DATA};
    use crate::bus::DISPLAY_ADDRESS;

    pub struct I2cInterface<I2C> {
        /// The I2C master the controller is attached to.
        i2c: I2C,
        /// 7-bit address of the controller.
        address: u8,
    }

    impl<I2C> I2cInterface<I2C>
    where
        I2C: Write,
    {
        /// Create an interface to a controller at the default address 0x3C.
        pub fn new(i2c: I2C) -> Self {
            Self::with_address(i2c, DISPLAY_ADDRESS)
        }

        /// Create an interface to a controller strapped to another 7-bit `address`.
        pub fn with_address(i2c: I2C, address: u8) -> Self {
            Self { i2c, address }
        }

        /// Borrow the underlying I2C master, e.g. to scan the bus.
        pub fn i2c_mut(&mut self) -> &mut I2C {
            &mut self.i2c
        }

        /// Give the I2C master back.
        pub fn release(self) -> I2C {
            self.i2c
        }
    }

    impl<I2C> DisplayInterface for I2cInterface<I2C>
    where
        I2C: Write,
    {
        type Error = I2C::Error;

        fn send_command(&mut self, cmd: u8) -> Result<(), Self::Error> {
            self.i2c.write(self.address, &[CONTROL_COMMAND, cmd])
        }

        fn send_data(&mut self, data: u8) -> Result<(), Self::Error> {
            self.i2c.write(self.address, &[CONTROL_DATA, data])
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::bus::test_regs::{Event, ScriptedRegisters};
        use crate::bus::{Error, I2cBus};
        use std::vec::Vec;

        /// Records each write as (address, bytes).
        struct RecordingI2c(Vec<(u8, Vec<u8>)>);

        impl Write for RecordingI2c {
            type Error = ();

            fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), ()> {
                self.0.push((address, bytes.to_vec()));
                Ok(())
            }
        }

        #[test]
        fn control_bytes() {
            let mut di = I2cInterface::new(RecordingI2c(Vec::new()));
            di.send_command(0xAE).unwrap();
            di.send_data(0x7C).unwrap();
            assert_eq!(
                di.release().0,
                [(0x3C, vec![0x00, 0xAE]), (0x3C, vec![0x40, 0x7C])]
            );
        }

        #[test]
        fn custom_address() {
            let mut di = I2cInterface::with_address(RecordingI2c(Vec::new()), 0x3D);
            di.send_command(0xAF).unwrap();
            assert_eq!(di.release().0, [(0x3D, vec![0x00, 0xAF])]);
        }

        #[test]
        fn over_polled_bus() {
            let mut regs = ScriptedRegisters::acking(&[0x3C]);
            {
                let mut di = I2cInterface::new(I2cBus::new(&mut regs));
                di.send_command(0xA6).unwrap();
                di.send_data(0x5F).unwrap();
            }
            assert_eq!(
                regs.events,
                [
                    Event::Start,
                    Event::Write(0x78),
                    Event::ClearAddr,
                    Event::Write(0x00),
                    Event::Write(0xA6),
                    Event::Stop,
                    Event::Start,
                    Event::Write(0x78),
                    Event::ClearAddr,
                    Event::Write(0x40),
                    Event::Write(0x5F),
                    Event::Stop
                ]
            );
        }

        #[test]
        fn absent_controller() {
            let mut regs = ScriptedRegisters::new();
            let mut di = I2cInterface::new(I2cBus::new(&mut regs));
            assert_eq!(di.send_command(0xAE), Err(Error::Nack));
        }
    }
}

#[cfg(test)]
pub mod test_spy {
    //! An interface for use in unit tests to spy on whatever was sent to it.

    use super::DisplayInterface;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum Sent {
        Cmd(u8),
        Data(u8),
    }

    pub struct TestSpyInterface {
        sent: Rc<RefCell<Vec<Sent>>>,
        fail_after: Option<usize>,
    }

    impl TestSpyInterface {
        pub fn new() -> Self {
            TestSpyInterface {
                sent: Rc::new(RefCell::new(Vec::new())),
                fail_after: None,
            }
        }

        /// Another handle onto the same record, to be moved into the code under test.
        pub fn split(&self) -> Self {
            TestSpyInterface {
                sent: self.sent.clone(),
                fail_after: self.fail_after,
            }
        }

        /// Make every transfer after the first `n` fail.
        pub fn failing_after(self, n: usize) -> Self {
            TestSpyInterface {
                fail_after: Some(n),
                ..self
            }
        }

        pub fn check_multi(&self, expect: &[Sent]) {
            assert_eq!(*self.sent.borrow(), expect);
        }

        pub fn sent(&self) -> Vec<Sent> {
            self.sent.borrow().clone()
        }

        /// Only the command bytes, in order.
        pub fn commands(&self) -> Vec<u8> {
            self.sent
                .borrow()
                .iter()
                .filter_map(|s| match s {
                    Sent::Cmd(c) => Some(*c),
                    Sent::Data(_) => None,
                })
                .collect()
        }

        /// Only the data bytes, in order.
        pub fn data(&self) -> Vec<u8> {
            self.sent
                .borrow()
                .iter()
                .filter_map(|s| match s {
                    Sent::Data(d) => Some(*d),
                    Sent::Cmd(_) => None,
                })
                .collect()
        }

        pub fn clear(&self) {
            self.sent.borrow_mut().clear()
        }

        fn record(&mut self, sent: Sent) -> Result<(), ()> {
            let mut log = self.sent.borrow_mut();
            if self.fail_after.map_or(false, |n| log.len() >= n) {
                return Err(());
            }
            log.push(sent);
            Ok(())
        }
    }

    impl DisplayInterface for TestSpyInterface {
        type Error = ();

        fn send_command(&mut self, cmd: u8) -> Result<(), ()> {
            self.record(Sent::Cmd(cmd))
        }

        fn send_data(&mut self, data: u8) -> Result<(), ()> {
            self.record(Sent::Data(data))
        }
    }
}
