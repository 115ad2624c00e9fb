//! Full example for an STM32F103 "Blue Pill" with a 128x64 SSD1306/SH1106 module on I2C1 (PB6 =
//! SCL, PB7 = SDA). The bus is scanned first: if a device answers, the on-board LED on PC13 stays
//! lit and the display shows a line of text. Otherwise the LED blinks forever.
//!
//! The chip runs from its 8 MHz reset clock, so PCLK1 is 8 MHz.

#![no_main]
#![no_std]

extern crate cortex_m;
extern crate cortex_m_rt;
extern crate embedded_hal as hal_api;
extern crate panic_halt;
extern crate ssd1306_i2c;

use cortex_m::asm;
use cortex_m_rt::entry;
use hal_api::digital::v2::OutputPin;
use ssd1306_i2c as oled;
use ssd1306_i2c::pin::{self, Port, Speed};
use ssd1306_i2c::stm32f1::{Gpio, I2c1, I2cConfig, Rcc};

const PCLK1_HZ: u32 = 8_000_000;
/// Busy-wait iterations per LED phase, roughly 200 ms at 8 MHz.
const BLINK_DELAY_CYCLES: u32 = 1_600_000;

#[entry]
fn main() -> ! {
    // This is the only code touching these peripherals.
    let (mut rcc, mut gpio, mut i2c) = unsafe { (Rcc::steal(), Gpio::steal(), I2c1::steal()) };

    rcc.enable_i2c1();
    rcc.enable_port(Port::B);
    rcc.enable_port(Port::C);
    gpio.configure_i2c1_pins();
    let mut led = gpio.into_push_pull_output(pin::PC13, Speed::MHz50);
    // Active low.
    let _ = led.set_high();

    if i2c.init(PCLK1_HZ, &I2cConfig::STANDARD).is_err() {
        blink(&mut led);
    }

    let mut bus = oled::I2cBus::new(i2c);
    match bus.scan() {
        Ok(Some(_)) => {
            let _ = led.set_low();
        }
        _ => blink(&mut led),
    }

    let mut disp = oled::Display::new(oled::I2cInterface::new(bus));
    let shown = disp
        .init(oled::Config::new())
        .and_then(|_| disp.clear())
        .and_then(|_| disp.set_position(3, 10))
        .and_then(|_| disp.draw_string("HI! 12:34"));
    if shown.is_err() {
        blink(&mut led);
    }

    loop {
        asm::wfi();
    }
}

fn blink(led: &mut ssd1306_i2c::stm32f1::Output) -> ! {
    loop {
        led.toggle();
        asm::delay(BLINK_DELAY_CYCLES);
    }
}
