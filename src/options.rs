//! Enumerated display options and their accepted ranges.

use crate::error::{EncodeError, OptionKind};

/// Glyph set selection, `0..=9`.
///
/// Font 0 is accepted by the device but has no documented grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Font(u8);

/// Physical character grid of a font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontGrid {
    /// Glyph cell as (height, width) in pixels.
    pub pixels: (u8, u8),
    pub lines: u8,
    pub chars: u8,
    pub charset: Charset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Standard,
    Katakana,
    Slavic,
    Cyrillic,
}

const fn grid(pixels: (u8, u8), lines: u8, chars: u8, charset: Charset) -> FontGrid {
    FontGrid {
        pixels,
        lines,
        chars,
        charset,
    }
}

// Index 0 is font 1.
const FONT_GRIDS: [FontGrid; 9] = [
    grid((8, 6), 2, 20, Charset::Standard),
    grid((8, 8), 2, 15, Charset::Standard),
    grid((16, 12), 1, 10, Charset::Standard),
    grid((16, 15), 1, 8, Charset::Standard),
    grid((16, 8), 1, 15, Charset::Standard),
    grid((16, 10), 1, 12, Charset::Standard),
    grid((8, 6), 2, 20, Charset::Katakana),
    grid((8, 6), 2, 20, Charset::Slavic),
    grid((8, 6), 2, 20, Charset::Cyrillic),
];

impl Font {
    pub const MAX: u8 = 9;
    /// Power-up font, 2 lines of 20 characters.
    pub const DEFAULT: Font = Font(1);

    pub const fn new(value: u8) -> Result<Font, EncodeError> {
        if value > Self::MAX {
            return Err(EncodeError::InvalidOption {
                option: OptionKind::Font,
                value,
            });
        }
        Ok(Font(value))
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub fn grid(self) -> Option<FontGrid> {
        match self.0 {
            0 => None,
            n => FONT_GRIDS.get(n as usize - 1).copied(),
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Font::DEFAULT
    }
}

impl TryFrom<u8> for Font {
    type Error = EncodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Font::new(value)
    }
}

/// Brightness setting for foreground or background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Hue {
    /// Leave the device setting alone.
    #[default]
    Unset = 0,
    Dim = 1,
    Medium = 2,
    /// Power-up brightness.
    Bright = 3,
    Sparkle = 4,
}

impl Hue {
    /// `option` names the side being set, for the error.
    pub fn from_u8(value: u8, option: OptionKind) -> Result<Hue, EncodeError> {
        match value {
            0 => Ok(Hue::Unset),
            1 => Ok(Hue::Dim),
            2 => Ok(Hue::Medium),
            3 => Ok(Hue::Bright),
            4 => Ok(Hue::Sparkle),
            _ => Err(EncodeError::InvalidOption { option, value }),
        }
    }
}

/// Scroll speed. `Previous` keeps the last rate, or medium if none was set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ScrollRate {
    Previous = 0,
    Slow = 1,
    /// Device default.
    #[default]
    Medium = 2,
    Fast = 3,
}

impl TryFrom<u8> for ScrollRate {
    type Error = EncodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ScrollRate::Previous),
            1 => Ok(ScrollRate::Slow),
            2 => Ok(ScrollRate::Medium),
            3 => Ok(ScrollRate::Fast),
            _ => Err(EncodeError::InvalidOption {
                option: OptionKind::ScrollRate,
                value,
            }),
        }
    }
}

/// How many times scrolling text repeats. 0 scrolls until cleared or replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScrollRepeat(u8);

impl ScrollRepeat {
    pub const MAX: u8 = 3;
    pub const INFINITE: ScrollRepeat = ScrollRepeat(0);

    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn is_infinite(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<u8> for ScrollRepeat {
    type Error = EncodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > Self::MAX {
            return Err(EncodeError::InvalidOption {
                option: OptionKind::ScrollRepeat,
                value,
            });
        }
        Ok(ScrollRepeat(value))
    }
}

/// Text mode for [`Signboard::print_message`](crate::Signboard::print_message).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Fixed text, at most `char_limit` characters.
    #[default]
    Static,
    /// Scrolling text, bounded only by the message limit.
    Scroll,
}
