//! Driver library for SSD1306/SH1106 family monochrome OLED controllers on a polled I2C bus.
//!
//! The stack is layered bottom-up: an [`I2cRegisters`] backend exposing the raw peripheral, the
//! [`I2cBus`] transport which sequences start/address/data/stop with bounded polling, the
//! [`I2cInterface`] which frames command and data bytes for the controller, and [`Display`] which
//! initializes the panel and renders 8x8 bitmap text.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate embedded_hal as hal;
extern crate nb;

#[macro_use]
mod macros;

pub mod bus;
pub mod command;
pub mod config;
pub mod display;
pub mod font;
pub mod interface;
pub mod pin;
pub mod stm32f1;

// Re-exports for primary API.
pub use bus::{I2cBus, I2cRegisters, Status, DISPLAY_ADDRESS};
pub use command::{consts, ComPinLayout, ComScanDirection, SegmentRemap, Supply};
pub use config::Config;
pub use display::Display;
pub use interface::i2c::I2cInterface;
pub use interface::DisplayInterface;
pub use pin::Pin;

/// Errors raised by display-level operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The display interface failed to move a byte.
    Interface(E),
    /// A command parameter was outside the range the controller accepts.
    OutOfRange,
}
