//! The command set for SSD1306/SH1106 family controllers.
//!
//! Note 1: The display RAM is arranged in 8 pages of 128 columns. Each column byte of a page drives
//! 8 vertically stacked pixels, least significant bit at the top. Writing display data advances
//! the column pointer within the current page; the page pointer is only changed by command.
//!
//! Note 2: Over I2C every byte of a command, including its parameters, travels as a command byte.

use crate::interface::DisplayInterface;
use crate::Error;

pub mod consts {
    //! Geometry of the display RAM.

    pub const NUM_COLUMNS: u8 = 128;
    pub const NUM_PAGES: u8 = 8;
    pub const NUM_ROWS: u8 = NUM_PAGES * 8;
    pub const COLUMN_MAX: u8 = NUM_COLUMNS - 1;
    pub const PAGE_MAX: u8 = NUM_PAGES - 1;
    pub const ROW_MAX: u8 = NUM_ROWS - 1;
}

use self::consts::*;

/// How the display is powered from the panel supply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Supply {
    /// The SH1106 DC-DC converter (command 0xAD).
    DcDc,
    /// The SSD1306 charge pump (command 0x8D).
    ChargePump,
}

/// Mapping of column addresses to segment drivers. Changing this setting flips the image
/// horizontally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SegmentRemap {
    /// Column address 0 drives SEG0.
    Normal,
    /// Column address 127 drives SEG0.
    Reversed,
}

/// Setting of the COM line scanning of rows. Changing this setting flips the image vertically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ComScanDirection {
    /// Scan from COM0 to COM[N-1].
    Normal,
    /// Scan from COM[N-1] to COM0.
    Remapped,
}

/// Hardware wiring of the COM pins to panel rows. This is dictated by the display module, see its
/// datasheet; the wrong value interleaves or halves the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ComPinLayout {
    Sequential,
    Alternative,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Turn the panel on (true) or put it to sleep (false).
    SetDisplayOn(bool),
    /// Set the oscillator frequency (0-15) and the display clock divide ratio (1-16).
    SetClockDivide(u8, u8),
    /// Set the number of active COM lines. Range is 16-64.
    SetMuxRatio(u8),
    /// Set the vertical shift of COM lines. Range is 0-63.
    SetDisplayOffset(u8),
    /// Set the display RAM row shown on the first panel row. Range is 0-63.
    SetStartLine(u8),
    /// Enable or disable the DC-DC converter.
    SetDcDc(bool),
    /// Enable or disable the charge pump.
    SetChargePump(bool),
    SetSegmentRemap(SegmentRemap),
    SetComScanDirection(ComScanDirection),
    /// Set COM pin layout and whether the left and right halves are swapped.
    SetComPins(ComPinLayout, bool),
    /// Set the contrast current. Range 0-255.
    SetContrast(u8),
    /// Set the pre-charge phase 1 and phase 2 lengths in DCLKs. Range is 1-15 each.
    SetPrechargePeriod(u8, u8),
    /// Set the VCOMH deselect level. Range is 0-7.
    SetVcomhDeselect(u8),
    /// Light every pixel regardless of display RAM (true), or follow display RAM (false).
    SetEntireDisplayOn(bool),
    /// Invert the meaning of display RAM bits.
    SetInverted(bool),
    /// Set the page the next data bytes are written to. Range is 0-7. (Note 1)
    SetPageAddress(u8),
    /// Set the column the next data byte is written to, as a low and a high nibble command.
    /// Range is 0-127. (Note 1)
    SetColumnAddress(u8),
}

macro_rules! ok_command {
    ($buf:ident, $cmd:expr,[]) => {{
        $buf[0] = $cmd;
        Ok(&$buf[..1])
    }};
    ($buf:ident, $cmd:expr,[$arg0:expr]) => {{
        $buf[0] = $cmd;
        $buf[1] = $arg0;
        Ok(&$buf[..2])
    }};
}

impl Command {
    /// Transmit this command to the display at `iface`. Parameters are checked before any byte is
    /// sent.
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        let mut buf = [0u8; 2];
        let bytes: Result<&[u8], Error<DI::Error>> = match self {
            Command::SetDisplayOn(on) => ok_command!(buf, if on { 0xAF } else { 0xAE }, []),
            Command::SetClockDivide(fosc, ratio) => match (fosc, ratio) {
                (0..=15, 1..=16) => ok_command!(buf, 0xD5, [fosc << 4 | (ratio - 1)]),
                _ => Err(Error::OutOfRange),
            },
            Command::SetMuxRatio(ratio) => match ratio {
                16..=NUM_ROWS => ok_command!(buf, 0xA8, [ratio - 1]),
                _ => Err(Error::OutOfRange),
            },
            Command::SetDisplayOffset(offset) => match offset {
                0..=ROW_MAX => ok_command!(buf, 0xD3, [offset]),
                _ => Err(Error::OutOfRange),
            },
            Command::SetStartLine(line) => match line {
                0..=ROW_MAX => ok_command!(buf, 0x40 | line, []),
                _ => Err(Error::OutOfRange),
            },
            Command::SetDcDc(on) => ok_command!(buf, 0xAD, [0x8A | on as u8]),
            Command::SetChargePump(on) => ok_command!(buf, 0x8D, [0x10 | (on as u8) << 2]),
            Command::SetSegmentRemap(remap) => ok_command!(
                buf,
                match remap {
                    SegmentRemap::Normal => 0xA0,
                    SegmentRemap::Reversed => 0xA1,
                },
                []
            ),
            Command::SetComScanDirection(dir) => ok_command!(
                buf,
                match dir {
                    ComScanDirection::Normal => 0xC0,
                    ComScanDirection::Remapped => 0xC8,
                },
                []
            ),
            Command::SetComPins(layout, swap_halves) => {
                let alt = match layout {
                    ComPinLayout::Sequential => 0x00,
                    ComPinLayout::Alternative => 0x10,
                };
                let lr = if swap_halves { 0x20 } else { 0x00 };
                ok_command!(buf, 0xDA, [0x02 | alt | lr])
            }
            Command::SetContrast(contrast) => ok_command!(buf, 0x81, [contrast]),
            Command::SetPrechargePeriod(phase_1, phase_2) => match (phase_1, phase_2) {
                (1..=15, 1..=15) => ok_command!(buf, 0xD9, [phase_2 << 4 | phase_1]),
                _ => Err(Error::OutOfRange),
            },
            Command::SetVcomhDeselect(level) => match level {
                0..=7 => ok_command!(buf, 0xDB, [level << 4]),
                _ => Err(Error::OutOfRange),
            },
            Command::SetEntireDisplayOn(on) => ok_command!(buf, if on { 0xA5 } else { 0xA4 }, []),
            Command::SetInverted(inverted) => {
                ok_command!(buf, if inverted { 0xA7 } else { 0xA6 }, [])
            }
            Command::SetPageAddress(page) => match page {
                0..=PAGE_MAX => ok_command!(buf, 0xB0 | page, []),
                _ => Err(Error::OutOfRange),
            },
            Command::SetColumnAddress(column) => match column {
                0..=COLUMN_MAX => ok_command!(buf, column & 0x0F, [0x10 | column >> 4]),
                _ => Err(Error::OutOfRange),
            },
        };
        for &byte in bytes? {
            iface.send_command(byte).map_err(Error::Interface)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::test_spy::TestSpyInterface;

    fn sent(cmd: Command) -> Result<std::vec::Vec<u8>, Error<()>> {
        let di = TestSpyInterface::new();
        cmd.send(&mut di.split())?;
        Ok(di.commands())
    }

    #[test]
    fn display_on_off() {
        assert_eq!(sent(Command::SetDisplayOn(false)), Ok(vec![0xAE]));
        assert_eq!(sent(Command::SetDisplayOn(true)), Ok(vec![0xAF]));
    }

    #[test]
    fn clock_divide() {
        assert_eq!(sent(Command::SetClockDivide(8, 1)), Ok(vec![0xD5, 0x80]));
        assert_eq!(sent(Command::SetClockDivide(15, 16)), Ok(vec![0xD5, 0xFF]));
        assert_eq!(sent(Command::SetClockDivide(16, 1)), Err(Error::OutOfRange));
        assert_eq!(sent(Command::SetClockDivide(8, 0)), Err(Error::OutOfRange));
        assert_eq!(sent(Command::SetClockDivide(8, 17)), Err(Error::OutOfRange));
    }

    #[test]
    fn mux_ratio() {
        assert_eq!(sent(Command::SetMuxRatio(64)), Ok(vec![0xA8, 0x3F]));
        assert_eq!(sent(Command::SetMuxRatio(16)), Ok(vec![0xA8, 0x0F]));
        assert_eq!(sent(Command::SetMuxRatio(15)), Err(Error::OutOfRange));
        assert_eq!(sent(Command::SetMuxRatio(65)), Err(Error::OutOfRange));
    }

    #[test]
    fn display_offset_and_start_line() {
        assert_eq!(sent(Command::SetDisplayOffset(0)), Ok(vec![0xD3, 0x00]));
        assert_eq!(sent(Command::SetDisplayOffset(64)), Err(Error::OutOfRange));
        assert_eq!(sent(Command::SetStartLine(0)), Ok(vec![0x40]));
        assert_eq!(sent(Command::SetStartLine(63)), Ok(vec![0x7F]));
        assert_eq!(sent(Command::SetStartLine(64)), Err(Error::OutOfRange));
    }

    #[test]
    fn supply() {
        assert_eq!(sent(Command::SetDcDc(true)), Ok(vec![0xAD, 0x8B]));
        assert_eq!(sent(Command::SetDcDc(false)), Ok(vec![0xAD, 0x8A]));
        assert_eq!(sent(Command::SetChargePump(true)), Ok(vec![0x8D, 0x14]));
        assert_eq!(sent(Command::SetChargePump(false)), Ok(vec![0x8D, 0x10]));
    }

    #[test]
    fn remapping() {
        assert_eq!(
            sent(Command::SetSegmentRemap(SegmentRemap::Normal)),
            Ok(vec![0xA0])
        );
        assert_eq!(
            sent(Command::SetSegmentRemap(SegmentRemap::Reversed)),
            Ok(vec![0xA1])
        );
        assert_eq!(
            sent(Command::SetComScanDirection(ComScanDirection::Normal)),
            Ok(vec![0xC0])
        );
        assert_eq!(
            sent(Command::SetComScanDirection(ComScanDirection::Remapped)),
            Ok(vec![0xC8])
        );
    }

    #[test]
    fn com_pins() {
        assert_eq!(
            sent(Command::SetComPins(ComPinLayout::Alternative, false)),
            Ok(vec![0xDA, 0x12])
        );
        assert_eq!(
            sent(Command::SetComPins(ComPinLayout::Sequential, false)),
            Ok(vec![0xDA, 0x02])
        );
        assert_eq!(
            sent(Command::SetComPins(ComPinLayout::Sequential, true)),
            Ok(vec![0xDA, 0x22])
        );
    }

    #[test]
    fn precharge_and_vcomh() {
        assert_eq!(sent(Command::SetPrechargePeriod(1, 15)), Ok(vec![0xD9, 0xF1]));
        assert_eq!(sent(Command::SetPrechargePeriod(0, 2)), Err(Error::OutOfRange));
        assert_eq!(sent(Command::SetPrechargePeriod(2, 16)), Err(Error::OutOfRange));
        assert_eq!(sent(Command::SetVcomhDeselect(4)), Ok(vec![0xDB, 0x40]));
        assert_eq!(sent(Command::SetVcomhDeselect(8)), Err(Error::OutOfRange));
    }

    #[test]
    fn display_modes() {
        assert_eq!(sent(Command::SetContrast(0x7F)), Ok(vec![0x81, 0x7F]));
        assert_eq!(sent(Command::SetEntireDisplayOn(false)), Ok(vec![0xA4]));
        assert_eq!(sent(Command::SetEntireDisplayOn(true)), Ok(vec![0xA5]));
        assert_eq!(sent(Command::SetInverted(false)), Ok(vec![0xA6]));
        assert_eq!(sent(Command::SetInverted(true)), Ok(vec![0xA7]));
    }

    #[test]
    fn addressing() {
        assert_eq!(sent(Command::SetPageAddress(0)), Ok(vec![0xB0]));
        assert_eq!(sent(Command::SetPageAddress(7)), Ok(vec![0xB7]));
        assert_eq!(sent(Command::SetPageAddress(8)), Err(Error::OutOfRange));
        assert_eq!(sent(Command::SetColumnAddress(0)), Ok(vec![0x00, 0x10]));
        assert_eq!(sent(Command::SetColumnAddress(0x5A)), Ok(vec![0x0A, 0x15]));
        assert_eq!(sent(Command::SetColumnAddress(128)), Err(Error::OutOfRange));
    }

    #[test]
    fn range_error_sends_nothing() {
        let di = TestSpyInterface::new();
        assert_eq!(
            Command::SetMuxRatio(200).send(&mut di.split()),
            Err(Error::OutOfRange)
        );
        assert!(di.sent().is_empty());
    }

    #[test]
    fn interface_error() {
        let di = TestSpyInterface::new().failing_after(1);
        assert_eq!(
            Command::SetContrast(0x10).send(&mut di.split()),
            Err(Error::Interface(()))
        );
        assert_eq!(di.commands(), [0x81]);
    }
}
