//! Defines the power-on configuration sent to the controller by `Display::init`.

use crate::command::*;
use crate::interface;
use crate::Error;

/// A configuration for the display. `Config::new()` describes a 128x64 module with the image
/// rotated 180 degrees and its DC-DC converter enabled; builder methods replace individual
/// settings. Settings without a builder call are still sent, so the controller state after
/// `Display::init` never depends on its power-on defaults.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    clock_divide_cmd: Command,
    mux_ratio_cmd: Command,
    display_offset_cmd: Command,
    start_line_cmd: Command,
    supply_cmd: Command,
    segment_remap_cmd: Command,
    com_scan_direction_cmd: Command,
    com_pins_cmd: Command,
    contrast_cmd: Command,
    precharge_period_cmd: Option<Command>,
    vcomh_deselect_cmd: Option<Command>,
}

impl Config {
    pub fn new() -> Self {
        Config {
            clock_divide_cmd: Command::SetClockDivide(8, 1),
            mux_ratio_cmd: Command::SetMuxRatio(64),
            display_offset_cmd: Command::SetDisplayOffset(0),
            start_line_cmd: Command::SetStartLine(0),
            supply_cmd: Command::SetDcDc(true),
            segment_remap_cmd: Command::SetSegmentRemap(SegmentRemap::Reversed),
            com_scan_direction_cmd: Command::SetComScanDirection(ComScanDirection::Remapped),
            com_pins_cmd: Command::SetComPins(ComPinLayout::Alternative, false),
            contrast_cmd: Command::SetContrast(0x7F),
            precharge_period_cmd: None,
            vcomh_deselect_cmd: None,
        }
    }

    /// Configure the oscillator frequency and clock divide ratio. See `Command::SetClockDivide`.
    pub fn clock_divide(self, fosc: u8, ratio: u8) -> Self {
        Self {
            clock_divide_cmd: Command::SetClockDivide(fosc, ratio),
            ..self
        }
    }

    /// Configure the number of active rows. See `Command::SetMuxRatio`.
    pub fn multiplex(self, rows: u8) -> Self {
        Self {
            mux_ratio_cmd: Command::SetMuxRatio(rows),
            ..self
        }
    }

    /// Configure the vertical COM shift. See `Command::SetDisplayOffset`.
    pub fn display_offset(self, rows: u8) -> Self {
        Self {
            display_offset_cmd: Command::SetDisplayOffset(rows),
            ..self
        }
    }

    /// Configure the display RAM start line. See `Command::SetStartLine`.
    pub fn start_line(self, line: u8) -> Self {
        Self {
            start_line_cmd: Command::SetStartLine(line),
            ..self
        }
    }

    /// Select which on-chip supply is enabled: the SH1106 DC-DC converter or the SSD1306 charge
    /// pump.
    pub fn supply(self, supply: Supply) -> Self {
        Self {
            supply_cmd: match supply {
                Supply::DcDc => Command::SetDcDc(true),
                Supply::ChargePump => Command::SetChargePump(true),
            },
            ..self
        }
    }

    pub fn segment_remap(self, remap: SegmentRemap) -> Self {
        Self {
            segment_remap_cmd: Command::SetSegmentRemap(remap),
            ..self
        }
    }

    pub fn com_scan_direction(self, direction: ComScanDirection) -> Self {
        Self {
            com_scan_direction_cmd: Command::SetComScanDirection(direction),
            ..self
        }
    }

    /// Configure the COM pin wiring of the module. See `Command::SetComPins`.
    pub fn com_pins(self, layout: ComPinLayout, swap_halves: bool) -> Self {
        Self {
            com_pins_cmd: Command::SetComPins(layout, swap_halves),
            ..self
        }
    }

    pub fn contrast(self, contrast: u8) -> Self {
        Self {
            contrast_cmd: Command::SetContrast(contrast),
            ..self
        }
    }

    /// Extend this `Config` to explicitly configure the pre-charge period. See
    /// `Command::SetPrechargePeriod`.
    pub fn precharge_period(self, phase_1: u8, phase_2: u8) -> Self {
        Self {
            precharge_period_cmd: Some(Command::SetPrechargePeriod(phase_1, phase_2)),
            ..self
        }
    }

    /// Extend this `Config` to explicitly configure the VCOMH deselect level. See
    /// `Command::SetVcomhDeselect`.
    pub fn vcomh_deselect(self, level: u8) -> Self {
        Self {
            vcomh_deselect_cmd: Some(Command::SetVcomhDeselect(level)),
            ..self
        }
    }

    /// Transmit commands to the display at `iface` necessary to put that display into the
    /// configuration encoded in `self`. The order is part of the controller's power-on protocol.
    pub(crate) fn send<DI>(&self, iface: &mut DI) -> Result<(), Error<DI::Error>>
    where
        DI: interface::DisplayInterface,
    {
        self.clock_divide_cmd.send(iface)?;
        self.mux_ratio_cmd.send(iface)?;
        self.display_offset_cmd.send(iface)?;
        self.start_line_cmd.send(iface)?;
        self.supply_cmd.send(iface)?;
        self.segment_remap_cmd.send(iface)?;
        self.com_scan_direction_cmd.send(iface)?;
        self.com_pins_cmd.send(iface)?;
        self.contrast_cmd.send(iface)?;
        self.precharge_period_cmd
            .map_or(Ok(()), |c| c.send(iface))?;
        self.vcomh_deselect_cmd.map_or(Ok(()), |c| c.send(iface))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}
