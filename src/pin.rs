//! GPIO pin descriptors and STM32F1 pin configuration encoding.

/// A GPIO port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Port {
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Port> {
        match index {
            0 => Some(Port::A),
            1 => Some(Port::B),
            2 => Some(Port::C),
            3 => Some(Port::D),
            4 => Some(Port::E),
            5 => Some(Port::F),
            6 => Some(Port::G),
            _ => None,
        }
    }
}

/// One GPIO line, identified by port and pin index 0-15.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin {
    port: Port,
    index: u8,
}

/// I2C1 clock line.
pub const PB6: Pin = Pin {
    port: Port::B,
    index: 6,
};
/// I2C1 data line.
pub const PB7: Pin = Pin {
    port: Port::B,
    index: 7,
};
/// The on-board LED of "Blue Pill" style boards.
pub const PC13: Pin = Pin {
    port: Port::C,
    index: 13,
};

impl Pin {
    pub fn new(port: Port, index: u8) -> Option<Pin> {
        if index < 16 {
            Some(Pin { port, index })
        } else {
            None
        }
    }

    /// Decode a packed port-pin code, `port * 16 + index` (PA0 = 0, PB0 = 16, ...).
    pub fn from_code(code: u8) -> Option<Pin> {
        Port::from_index(code / 16).map(|port| Pin {
            port,
            index: code % 16,
        })
    }

    pub fn code(self) -> u8 {
        self.port.index() * 16 + self.index
    }

    pub fn port(self) -> Port {
        self.port
    }

    pub fn index(self) -> u8 {
        self.index
    }

    /// The pin's bit in the IDR/ODR/BSRR/BRR registers.
    pub fn mask(self) -> u32 {
        1 << self.index
    }

    /// Pins 8-15 are configured through CRH, pins 0-7 through CRL.
    pub fn in_high_register(self) -> bool {
        self.index >= 8
    }

    /// Bit offset of the pin's configuration nibble within CRL or CRH.
    pub fn config_shift(self) -> u32 {
        (self.index as u32 % 8) * 4
    }
}

/// Maximum output slew rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    MHz10 = 1,
    MHz2 = 2,
    MHz50 = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputCnf {
    Analog = 0x0,
    Floating = 0x4,
    PullUpDown = 0x8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputCnf {
    PushPull = 0x0,
    OpenDrain = 0x4,
    AltPushPull = 0x8,
    AltOpenDrain = 0xC,
}

/// Pin configuration: direction, output speed and driver type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    Input(InputCnf),
    Output(Speed, OutputCnf),
}

impl PinMode {
    /// The 4-bit CNF:MODE value for CRL/CRH.
    pub fn config_bits(self) -> u32 {
        match self {
            PinMode::Input(cnf) => cnf as u32,
            PinMode::Output(speed, cnf) => cnf as u32 | speed as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes() {
        assert_eq!(Pin::from_code(0), Pin::new(Port::A, 0));
        assert_eq!(Pin::from_code(22), Some(PB6));
        assert_eq!(Pin::from_code(45), Some(PC13));
        assert_eq!(Pin::from_code(111), Pin::new(Port::G, 15));
        assert_eq!(Pin::from_code(112), None);
        assert_eq!(PC13.code(), 45);
        for code in 0..112 {
            assert_eq!(Pin::from_code(code).map(Pin::code), Some(code));
        }
    }

    #[test]
    fn index_range() {
        assert!(Pin::new(Port::D, 15).is_some());
        assert!(Pin::new(Port::D, 16).is_none());
    }

    #[test]
    fn config_register_placement() {
        assert!(!PB7.in_high_register());
        assert_eq!(PB7.config_shift(), 28);
        assert!(PC13.in_high_register());
        assert_eq!(PC13.config_shift(), 20);
        assert_eq!(PC13.mask(), 1 << 13);
    }

    #[test]
    fn config_bits() {
        assert_eq!(
            PinMode::Output(Speed::MHz50, OutputCnf::PushPull).config_bits(),
            0x3
        );
        assert_eq!(
            PinMode::Output(Speed::MHz2, OutputCnf::AltOpenDrain).config_bits(),
            0xE
        );
        assert_eq!(
            PinMode::Output(Speed::MHz10, OutputCnf::OpenDrain).config_bits(),
            0x5
        );
        assert_eq!(PinMode::Input(InputCnf::Floating).config_bits(), 0x4);
        assert_eq!(PinMode::Input(InputCnf::Analog).config_bits(), 0x0);
    }
}
