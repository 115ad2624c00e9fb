//! Memory-mapped register backends for the STM32F1 family: the I2C1 controller, the GPIO ports
//! and the clock enables in RCC.
//!
//! Every handle is built from a base address. The `steal` constructors use the reset memory map
//! of the STM32F103; tests point `new` at plain RAM instead.

use core::convert::Infallible;
use core::ptr::{read_volatile, write_volatile};

use hal::digital::v2::OutputPin;

use crate::bus::{I2cRegisters, Status};
use crate::pin::{self, InputCnf, OutputCnf, Pin, PinMode, Port, Speed};

pub const I2C1_BASE: usize = 0x4000_5400;
pub const GPIOA_BASE: usize = 0x4001_0800;
pub const RCC_BASE: usize = 0x4002_1000;

/// Distance between consecutive GPIO port blocks.
const GPIO_PORT_STRIDE: usize = 0x400;

mod i2c_reg {
    pub const CR1: usize = 0x00;
    pub const CR2: usize = 0x04;
    pub const DR: usize = 0x10;
    pub const SR1: usize = 0x14;
    pub const SR2: usize = 0x18;
    pub const CCR: usize = 0x1C;
    pub const TRISE: usize = 0x20;

    pub const CR1_PE: u32 = 1 << 0;
    pub const CR1_START: u32 = 1 << 8;
    pub const CR1_STOP: u32 = 1 << 9;
    pub const CCR_FS: u32 = 1 << 15;
    /// Width of the CCR clock divider field.
    pub const CCR_MAX: u32 = 0xFFF;
    /// Smallest divider standard mode accepts.
    pub const CCR_MIN_STANDARD: u32 = 4;
}

mod gpio_reg {
    pub const CRL: usize = 0x00;
    pub const CRH: usize = 0x04;
    pub const IDR: usize = 0x08;
    pub const ODR: usize = 0x0C;
    pub const BSRR: usize = 0x10;
    pub const BRR: usize = 0x14;
}

mod rcc_reg {
    pub const APB2ENR: usize = 0x18;
    pub const APB1ENR: usize = 0x1C;

    pub const APB1ENR_I2C1EN: u32 = 1 << 21;
    /// IOPAEN; ports B..G follow at consecutive bits.
    pub const APB2ENR_IOPAEN_SHIFT: u32 = 2;
}

/// A block of 32-bit registers at a fixed address.
struct Mmio {
    base: usize,
}

impl Mmio {
    /// # Safety
    ///
    /// `base` must be the 4-byte aligned address of a register block that stays valid for the
    /// lifetime of the handle and is not accessed through any other handle.
    unsafe fn new(base: usize) -> Self {
        Mmio { base }
    }

    fn read(&self, offset: usize) -> u32 {
        // SAFETY: `new`'s contract covers every offset this module uses.
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    fn write(&mut self, offset: usize, value: u32) {
        // SAFETY: as in `read`.
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }

    fn modify<F>(&mut self, offset: usize, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(offset);
        self.write(offset, f(value));
    }
}

/// Bus timing for `I2c1::init`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// SCL frequency in Hz, up to 400 kHz.
    pub frequency: u32,
}

impl I2cConfig {
    /// 100 kHz standard mode.
    pub const STANDARD: I2cConfig = I2cConfig { frequency: 100_000 };
    /// 400 kHz fast mode.
    pub const FAST: I2cConfig = I2cConfig { frequency: 400_000 };
}

impl Default for I2cConfig {
    fn default() -> Self {
        I2cConfig::STANDARD
    }
}

/// Rejected `I2c1::init` parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// The peripheral clock is outside 2-36 MHz.
    PeripheralClock,
    /// The SCL frequency is zero, above 400 kHz, or too low or too high for the peripheral clock
    /// to divide down to. Fast mode also needs a peripheral clock of at least 4 MHz.
    BusFrequency,
}

/// Timing values derived from the peripheral clock and bus frequency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Timing {
    freq_mhz: u32,
    ccr: u32,
    trise: u32,
}

impl Timing {
    fn compute(pclk1_hz: u32, config: &I2cConfig) -> Result<Self, ClockError> {
        let freq_mhz = pclk1_hz / 1_000_000;
        if freq_mhz < 2 || freq_mhz > 36 {
            return Err(ClockError::PeripheralClock);
        }
        let f = config.frequency;
        if f == 0 || f > I2cConfig::FAST.frequency {
            return Err(ClockError::BusFrequency);
        }
        if f <= I2cConfig::STANDARD.frequency {
            // Tlow = Thigh = CCR * Tpclk1.
            let ccr = pclk1_hz / (2 * f);
            if ccr < i2c_reg::CCR_MIN_STANDARD || ccr > i2c_reg::CCR_MAX {
                return Err(ClockError::BusFrequency);
            }
            Ok(Timing {
                freq_mhz,
                ccr,
                trise: freq_mhz + 1,
            })
        } else {
            if freq_mhz < 4 {
                return Err(ClockError::BusFrequency);
            }
            // Duty 2:1, Tlow = 2 * CCR * Tpclk1.
            let ccr = pclk1_hz / (3 * f);
            if ccr < 1 || ccr > i2c_reg::CCR_MAX {
                return Err(ClockError::BusFrequency);
            }
            Ok(Timing {
                freq_mhz,
                ccr: i2c_reg::CCR_FS | ccr,
                trise: freq_mhz * 300 / 1000 + 1,
            })
        }
    }
}

/// The I2C1 controller in master mode.
pub struct I2c1 {
    regs: Mmio,
}

impl I2c1 {
    /// # Safety
    ///
    /// `base` must address an STM32F1 I2C register block that nothing else accesses while the
    /// handle exists.
    pub unsafe fn new(base: usize) -> Self {
        I2c1 {
            regs: Mmio::new(base),
        }
    }

    /// # Safety
    ///
    /// At most one handle to I2C1 may exist.
    pub unsafe fn steal() -> Self {
        Self::new(I2C1_BASE)
    }

    /// Program the bus timing for a peripheral clock of `pclk1_hz` and enable the controller.
    /// The peripheral is disabled while the timing registers are written.
    pub fn init(&mut self, pclk1_hz: u32, config: &I2cConfig) -> Result<(), ClockError> {
        let timing = Timing::compute(pclk1_hz, config)?;
        debug!(
            "i2c1: init pclk1={=u32} Hz scl={=u32} Hz ccr={=u32:#x} trise={=u32}",
            pclk1_hz,
            config.frequency,
            timing.ccr,
            timing.trise
        );
        self.regs.modify(i2c_reg::CR1, |v| v & !i2c_reg::CR1_PE);
        self.regs.write(i2c_reg::CR2, timing.freq_mhz);
        self.regs.write(i2c_reg::CCR, timing.ccr);
        self.regs.write(i2c_reg::TRISE, timing.trise);
        self.regs.modify(i2c_reg::CR1, |v| v | i2c_reg::CR1_PE);
        Ok(())
    }
}

impl I2cRegisters for I2c1 {
    fn start(&mut self) {
        self.regs.modify(i2c_reg::CR1, |v| v | i2c_reg::CR1_START);
    }

    fn stop(&mut self) {
        self.regs.modify(i2c_reg::CR1, |v| v | i2c_reg::CR1_STOP);
    }

    fn write_data(&mut self, byte: u8) {
        self.regs.write(i2c_reg::DR, byte as u32);
    }

    fn read_status(&mut self) -> Status {
        Status(self.regs.read(i2c_reg::SR1) as u16)
    }

    fn clear_addr(&mut self) {
        // ADDR clears on a read of SR1 followed by a read of SR2.
        let _ = self.regs.read(i2c_reg::SR1);
        let _ = self.regs.read(i2c_reg::SR2);
    }

    fn clear_ack_failure(&mut self) {
        let af = Status::AF.0 as u32;
        self.regs.modify(i2c_reg::SR1, |v| v & !af);
    }
}

/// All GPIO ports, addressed by `Pin`.
pub struct Gpio {
    base: usize,
}

impl Gpio {
    /// # Safety
    ///
    /// `base` must be the address of GPIOA, with ports B..G following at 0x400 strides, and the
    /// pins this handle touches must not be driven through any other handle.
    pub unsafe fn new(base: usize) -> Self {
        Gpio { base }
    }

    /// # Safety
    ///
    /// At most one handle to the GPIO ports may exist.
    pub unsafe fn steal() -> Self {
        Self::new(GPIOA_BASE)
    }

    fn port(&self, port: Port) -> Mmio {
        // SAFETY: every port block lies within the range `new`'s contract covers.
        unsafe { Mmio::new(self.base + GPIO_PORT_STRIDE * port.index() as usize) }
    }

    /// Write the pin's CNF:MODE nibble, leaving the other pins of the register untouched.
    pub fn configure(&mut self, pin: Pin, mode: PinMode) {
        let offset = if pin.in_high_register() {
            gpio_reg::CRH
        } else {
            gpio_reg::CRL
        };
        let shift = pin.config_shift();
        self.port(pin.port()).modify(offset, |v| {
            (v & !(0xF << shift)) | (mode.config_bits() << shift)
        });
    }

    pub fn set_high(&mut self, pin: Pin) {
        self.port(pin.port()).write(gpio_reg::BSRR, pin.mask());
    }

    pub fn set_low(&mut self, pin: Pin) {
        self.port(pin.port()).write(gpio_reg::BRR, pin.mask());
    }

    pub fn toggle(&mut self, pin: Pin) {
        let mask = pin.mask();
        self.port(pin.port()).modify(gpio_reg::ODR, |v| v ^ mask);
    }

    /// Whether the pin's output latch is set.
    pub fn is_set_high(&self, pin: Pin) -> bool {
        self.port(pin.port()).read(gpio_reg::ODR) & pin.mask() != 0
    }

    /// Sample the pin's input level.
    pub fn is_high(&self, pin: Pin) -> bool {
        self.port(pin.port()).read(gpio_reg::IDR) & pin.mask() != 0
    }

    /// Configure `pin` as a push-pull output and hand it out as an embedded-hal `OutputPin`.
    pub fn into_push_pull_output(mut self, pin: Pin, speed: Speed) -> Output {
        self.configure(pin, PinMode::Output(speed, OutputCnf::PushPull));
        Output { gpio: self, pin }
    }

    /// Put PB6 (SCL) and PB7 (SDA) into alternate-function open-drain mode for I2C1.
    pub fn configure_i2c1_pins(&mut self) {
        let mode = PinMode::Output(Speed::MHz2, OutputCnf::AltOpenDrain);
        self.configure(pin::PB6, mode);
        self.configure(pin::PB7, mode);
    }

    /// Return a pin to its reset state, a floating input.
    pub fn reset_pin(&mut self, pin: Pin) {
        self.configure(pin, PinMode::Input(InputCnf::Floating));
    }
}

/// A single push-pull output.
pub struct Output {
    gpio: Gpio,
    pin: Pin,
}

impl Output {
    pub fn pin(&self) -> Pin {
        self.pin
    }

    pub fn toggle(&mut self) {
        self.gpio.toggle(self.pin);
    }

    pub fn is_set_high(&self) -> bool {
        self.gpio.is_set_high(self.pin)
    }

    /// Give the port handle back.
    pub fn release(self) -> Gpio {
        self.gpio
    }
}

impl OutputPin for Output {
    type Error = Infallible;

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.gpio.set_high(self.pin);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.gpio.set_low(self.pin);
        Ok(())
    }
}

/// Peripheral clock enables.
pub struct Rcc {
    regs: Mmio,
}

impl Rcc {
    /// # Safety
    ///
    /// `base` must address the RCC register block and nothing else may modify the enable
    /// registers while the handle exists.
    pub unsafe fn new(base: usize) -> Self {
        Rcc {
            regs: Mmio::new(base),
        }
    }

    /// # Safety
    ///
    /// At most one handle to RCC may exist.
    pub unsafe fn steal() -> Self {
        Self::new(RCC_BASE)
    }

    pub fn enable_i2c1(&mut self) {
        self.regs
            .modify(rcc_reg::APB1ENR, |v| v | rcc_reg::APB1ENR_I2C1EN);
    }

    pub fn enable_port(&mut self, port: Port) {
        let bit = 1 << (rcc_reg::APB2ENR_IOPAEN_SHIFT + port.index() as u32);
        self.regs.modify(rcc_reg::APB2ENR, |v| v | bit);
    }
}
