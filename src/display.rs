//! The main API to the display driver. It initializes the controller from a `Config`, clears the
//! display RAM and renders text with the 8x8 font.

use crate::command::consts::*;
use crate::command::*;
use crate::config::Config;
use crate::font;
use crate::interface;
use crate::Error;

/// A driver for a 128x64 SSD1306/SH1106 display.
pub struct Display<DI>
where
    DI: interface::DisplayInterface,
{
    iface: DI,
}

impl<DI> Display<DI>
where
    DI: interface::DisplayInterface,
{
    /// Construct a new display driver for the display connected to the interface `iface`.
    pub fn new(iface: DI) -> Self {
        Display { iface }
    }

    /// Bring the controller from power-on to a visible state. The panel is turned off while the
    /// configuration is applied and turned on again as the last step.
    pub fn init(&mut self, config: Config) -> Result<(), Error<DI::Error>> {
        debug!("display: init");
        self.display_on(false)?;
        config.send(&mut self.iface)?;
        Command::SetEntireDisplayOn(false).send(&mut self.iface)?;
        Command::SetInverted(false).send(&mut self.iface)?;
        self.display_on(true)?;
        debug!("display: on");
        Ok(())
    }

    /// Turn the panel on, or put it to sleep.
    pub fn display_on(&mut self, on: bool) -> Result<(), Error<DI::Error>> {
        Command::SetDisplayOn(on).send(&mut self.iface)
    }

    /// Control the contrast current.
    pub fn contrast(&mut self, contrast: u8) -> Result<(), Error<DI::Error>> {
        Command::SetContrast(contrast).send(&mut self.iface)
    }

    /// Show display RAM inverted.
    pub fn invert(&mut self, inverted: bool) -> Result<(), Error<DI::Error>> {
        Command::SetInverted(inverted).send(&mut self.iface)
    }

    /// Move the display RAM write pointer to `column` of `page`. Text drawn afterwards starts
    /// there.
    pub fn set_position(&mut self, page: u8, column: u8) -> Result<(), Error<DI::Error>> {
        if page > PAGE_MAX || column > COLUMN_MAX {
            return Err(Error::OutOfRange);
        }
        Command::SetPageAddress(page).send(&mut self.iface)?;
        Command::SetColumnAddress(column).send(&mut self.iface)
    }

    /// Zero the whole display RAM, page by page.
    pub fn clear(&mut self) -> Result<(), Error<DI::Error>> {
        for page in 0..NUM_PAGES {
            self.set_position(page, 0)?;
            for _ in 0..NUM_COLUMNS {
                self.send_data(0x00)?;
            }
        }
        Ok(())
    }

    /// Draw one character at the current write pointer: its eight glyph columns followed by one
    /// blank spacing column.
    ///
    /// Characters the font has no bitmap for, including everything outside ' '..='\x7F', are
    /// drawn as a space.
    pub fn draw_char(&mut self, c: char) -> Result<(), Error<DI::Error>> {
        for &column in font::glyph_or_space(c) {
            self.send_data(column)?;
        }
        self.send_data(0x00)
    }

    /// Draw `s` one character after another from the current write pointer. There is no
    /// wrapping; the controller's column pointer simply advances. A NUL ends the text.
    pub fn draw_string(&mut self, s: &str) -> Result<(), Error<DI::Error>> {
        for c in s.chars().take_while(|&c| c != '\0') {
            self.draw_char(c)?;
        }
        Ok(())
    }

    /// Give the interface back.
    pub fn release(self) -> DI {
        self.iface
    }

    fn send_data(&mut self, data: u8) -> Result<(), Error<DI::Error>> {
        self.iface.send_data(data).map_err(Error::Interface)
    }
}
