//! 8x8 bitmap font in display RAM column order.
//!
//! Each glyph is eight column bytes, left to right, with the least significant bit at the top of
//! the character cell. The table is indexed by character code minus [`FIRST_CHAR`]. Only the
//! glyphs from ' ' through 'N' are available; every other code has no bitmap and [`glyph`] returns
//! `None` for it.

/// Width of a glyph in columns.
pub const GLYPH_WIDTH: usize = 8;

/// Lowest character code the table can cover.
pub const FIRST_CHAR: u8 = 32;
/// Highest character code the table can cover.
pub const LAST_CHAR: u8 = 127;

pub type Glyph = [u8; GLYPH_WIDTH];

#[cfg_attr(rustfmt, rustfmt_skip)]
static GLYPHS: [Glyph; 47] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x5F, 0x00, 0x00, 0x00, 0x00], // '!'
    [0x00, 0x03, 0x07, 0x00, 0x03, 0x07, 0x00, 0x00], // '"'
    [0x14, 0x7F, 0x7F, 0x14, 0x7F, 0x7F, 0x14, 0x00], // '#'
    [0x24, 0x2E, 0x6B, 0x6B, 0x3A, 0x12, 0x00, 0x00], // '$'
    [0x46, 0x66, 0x30, 0x18, 0x0C, 0x66, 0x62, 0x00], // '%'
    [0x30, 0x7A, 0x4F, 0x4D, 0x7B, 0x30, 0x48, 0x00], // '&'
    [0x00, 0x04, 0x07, 0x03, 0x00, 0x00, 0x00, 0x00], // '''
    [0x00, 0x1C, 0x3E, 0x63, 0x41, 0x00, 0x00, 0x00], // '('
    [0x00, 0x41, 0x63, 0x3E, 0x1C, 0x00, 0x00, 0x00], // ')'
    [0x22, 0x14, 0x7F, 0x7F, 0x14, 0x22, 0x00, 0x00], // '*'
    [0x08, 0x08, 0x3E, 0x3E, 0x08, 0x08, 0x00, 0x00], // '+'
    [0x00, 0xA0, 0xF0, 0x70, 0x00, 0x00, 0x00, 0x00], // ','
    [0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x00, 0x00], // '-'
    [0x00, 0x60, 0x60, 0x00, 0x00, 0x00, 0x00, 0x00], // '.'
    [0x60, 0x30, 0x18, 0x0C, 0x06, 0x03, 0x01, 0x00], // '/'
    [0x3E, 0x7F, 0x59, 0x4D, 0x7F, 0x3E, 0x00, 0x00], // '0'
    [0x40, 0x42, 0x7F, 0x7F, 0x40, 0x40, 0x00, 0x00], // '1'
    [0x62, 0x73, 0x59, 0x49, 0x6F, 0x66, 0x00, 0x00], // '2'
    [0x22, 0x63, 0x49, 0x49, 0x7F, 0x36, 0x00, 0x00], // '3'
    [0x18, 0x1C, 0x16, 0x73, 0x7F, 0x70, 0x00, 0x00], // '4'
    [0x2F, 0x6F, 0x45, 0x45, 0x7D, 0x39, 0x00, 0x00], // '5'
    [0x3E, 0x7F, 0x49, 0x49, 0x79, 0x30, 0x00, 0x00], // '6'
    [0x01, 0x71, 0x79, 0x0D, 0x07, 0x03, 0x00, 0x00], // '7'
    [0x36, 0x7F, 0x49, 0x49, 0x7F, 0x36, 0x00, 0x00], // '8'
    [0x06, 0x4F, 0x49, 0x69, 0x3F, 0x1E, 0x00, 0x00], // '9'
    [0x00, 0x6C, 0x6C, 0x00, 0x00, 0x00, 0x00, 0x00], // ':'
    [0x00, 0xAC, 0x6C, 0x00, 0x00, 0x00, 0x00, 0x00], // ';'
    [0x08, 0x1C, 0x36, 0x63, 0x41, 0x00, 0x00, 0x00], // '<'
    [0x24, 0x24, 0x24, 0x24, 0x24, 0x24, 0x00, 0x00], // '='
    [0x41, 0x63, 0x36, 0x1C, 0x08, 0x00, 0x00, 0x00], // '>'
    [0x02, 0x03, 0x59, 0x5D, 0x07, 0x06, 0x00, 0x00], // '?'
    [0x3E, 0x7F, 0x41, 0x5D, 0x55, 0x1F, 0x1E, 0x00], // '@'
    [0x7C, 0x7E, 0x13, 0x13, 0x7E, 0x7C, 0x00, 0x00], // 'A'
    [0x7F, 0x7F, 0x49, 0x49, 0x7F, 0x36, 0x00, 0x00], // 'B'
    [0x3E, 0x7F, 0x41, 0x41, 0x63, 0x22, 0x00, 0x00], // 'C'
    [0x7F, 0x7F, 0x41, 0x63, 0x3E, 0x1C, 0x00, 0x00], // 'D'
    [0x7F, 0x7F, 0x49, 0x49, 0x41, 0x41, 0x00, 0x00], // 'E'
    [0x7F, 0x7F, 0x09, 0x09, 0x01, 0x01, 0x00, 0x00], // 'F'
    [0x3E, 0x7F, 0x41, 0x49, 0x7B, 0x3A, 0x00, 0x00], // 'G'
    [0x7F, 0x7F, 0x08, 0x08, 0x7F, 0x7F, 0x00, 0x00], // 'H'
    [0x00, 0x41, 0x7F, 0x7F, 0x41, 0x00, 0x00, 0x00], // 'I'
    [0x20, 0x60, 0x41, 0x7F, 0x3F, 0x01, 0x00, 0x00], // 'J'
    [0x7F, 0x7F, 0x1C, 0x36, 0x63, 0x41, 0x00, 0x00], // 'K'
    [0x7F, 0x7F, 0x40, 0x40, 0x40, 0x40, 0x00, 0x00], // 'L'
    [0x7F, 0x7E, 0x0C, 0x0C, 0x7E, 0x7F, 0x00, 0x00], // 'M'
    [0x7F, 0x7F, 0x0E, 0x1C, 0x7F, 0x7F, 0x00, 0x00], // 'N'
];

/// Look up the bitmap for `c`. Returns `None` for characters outside [`FIRST_CHAR`,
/// `LAST_CHAR`] and for characters in that range which have no bitmap in the table.
pub fn glyph(c: char) -> Option<&'static Glyph> {
    let code = c as u32;
    if code < FIRST_CHAR as u32 || code > LAST_CHAR as u32 {
        return None;
    }
    GLYPHS.get((code - FIRST_CHAR as u32) as usize)
}

/// Like `glyph`, but falls back to the blank ' ' glyph.
pub fn glyph_or_space(c: char) -> &'static Glyph {
    glyph(c).unwrap_or(&GLYPHS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populated_range() {
        assert_eq!(glyph(' '), Some(&[0; 8]));
        assert_eq!(
            glyph('A'),
            Some(&[0x7C, 0x7E, 0x13, 0x13, 0x7E, 0x7C, 0x00, 0x00])
        );
        assert_eq!(
            glyph('N'),
            Some(&[0x7F, 0x7F, 0x0E, 0x1C, 0x7F, 0x7F, 0x00, 0x00])
        );
    }

    #[test]
    fn unpopulated_and_out_of_range() {
        assert_eq!(glyph('O'), None);
        assert_eq!(glyph('~'), None);
        assert_eq!(glyph('\x7F'), None);
        assert_eq!(glyph('\n'), None);
        assert_eq!(glyph('\u{80}'), None);
        assert_eq!(glyph('é'), None);
        assert_eq!(glyph_or_space('z'), &[0; 8]);
        assert_eq!(glyph_or_space('\0'), &[0; 8]);
    }

    #[test]
    fn table_is_indexed_by_code() {
        for (i, g) in GLYPHS.iter().enumerate() {
            let c = (FIRST_CHAR + i as u8) as char;
            assert_eq!(glyph(c), Some(g));
        }
    }
}
