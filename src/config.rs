use crate::command::MESSAGE_CAPACITY;
use crate::error::EncodeError;
use crate::options::{Font, Hue, ScrollRate, ScrollRepeat};

pub const DEFAULT_CHAR_LIMIT: usize = 20;
pub const DEFAULT_LINE_LIMIT: u8 = 2;
/// Longest single unit the device accepts, control codes included.
pub const DEFAULT_MESSAGE_LIMIT: usize = 256;

/// Control bytes around the text of a static unit: `ESC {line};1C ... \r`.
pub(crate) fn static_overhead(line: u8) -> usize {
    let digits = match line {
        0..=9 => 1,
        10..=99 => 2,
        _ => 3,
    };
    1 + digits + 3 + 1
}

/// Physical ceilings of a display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    char_limit: usize,
    line_limit: u8,
    message_limit: usize,
}

impl Limits {
    /// Fails when a full static line on the last line could not be sent
    /// within `message_limit`.
    pub fn new(
        char_limit: usize,
        line_limit: u8,
        message_limit: usize,
    ) -> Result<Limits, EncodeError> {
        if char_limit == 0 || line_limit == 0 || message_limit == 0 {
            return Err(EncodeError::InvalidLimits);
        }
        if message_limit > MESSAGE_CAPACITY {
            return Err(EncodeError::InvalidLimits);
        }
        match char_limit.checked_add(static_overhead(line_limit)) {
            Some(len) if len <= message_limit => {}
            _ => return Err(EncodeError::InvalidLimits),
        }
        Ok(Limits {
            char_limit,
            line_limit,
            message_limit,
        })
    }

    /// Limits matching the character grid of `font`, keeping the message limit.
    ///
    /// Returns `None` for fonts without a known grid.
    pub fn for_font(&self, font: Font) -> Option<Limits> {
        let grid = font.grid()?;
        Some(Limits {
            char_limit: grid.chars as usize,
            line_limit: grid.lines,
            message_limit: self.message_limit,
        })
    }

    /// Max characters per line of static text.
    pub fn char_limit(&self) -> usize {
        self.char_limit
    }

    /// Highest addressable line, lines start at 1.
    pub fn line_limit(&self) -> u8 {
        self.line_limit
    }

    pub fn message_limit(&self) -> usize {
        self.message_limit
    }

    /// Checks `1 <= line <= line_limit`.
    pub fn check_line(&self, line: u8) -> Result<(), EncodeError> {
        if line == 0 || line > self.line_limit {
            return Err(EncodeError::LineOutOfRange {
                line,
                limit: self.line_limit,
            });
        }
        Ok(())
    }

    pub fn check_text(&self, text: &str) -> Result<(), EncodeError> {
        if text.len() > self.char_limit {
            return Err(EncodeError::TextTooLong {
                len: text.len(),
                limit: self.char_limit,
            });
        }
        Ok(())
    }

    pub fn check_message(&self, len: usize) -> Result<(), EncodeError> {
        if len > self.message_limit {
            return Err(EncodeError::MessageTooLong {
                len,
                limit: self.message_limit,
            });
        }
        Ok(())
    }
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            char_limit: DEFAULT_CHAR_LIMIT,
            line_limit: DEFAULT_LINE_LIMIT,
            message_limit: DEFAULT_MESSAGE_LIMIT,
        }
    }
}

/// Display state held for the lifetime of one session.
///
/// `blink_rate`, `blink` and `inverse_blink` are carried but no command
/// encodes them yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub limits: Limits,
    pub font: Font,
    pub hue_foreground: Hue,
    pub hue_background: Hue,
    pub scroll_rate: ScrollRate,
    pub scroll_repeat: ScrollRepeat,
    pub blink_rate: u8,
    pub blink: bool,
    pub inverse_blink: bool,
}

impl SessionConfig {
    pub fn new(limits: Limits) -> SessionConfig {
        SessionConfig {
            limits,
            font: Font::DEFAULT,
            hue_foreground: Hue::Unset,
            hue_background: Hue::Unset,
            scroll_rate: ScrollRate::Medium,
            scroll_repeat: ScrollRepeat::INFINITE,
            blink_rate: 128,
            blink: false,
            inverse_blink: false,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig::new(Limits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits() {
        let l = Limits::default();
        assert_eq!((l.char_limit(), l.line_limit(), l.message_limit()), (20, 2, 256));
        assert_eq!(Limits::new(20, 2, 256), Ok(l));
    }

    #[test]
    fn rejects_degenerate_limits() {
        assert_eq!(Limits::new(0, 2, 256), Err(EncodeError::InvalidLimits));
        assert_eq!(Limits::new(20, 0, 256), Err(EncodeError::InvalidLimits));
        assert_eq!(Limits::new(20, 2, 0), Err(EncodeError::InvalidLimits));
        assert_eq!(Limits::new(20, 2, MESSAGE_CAPACITY + 1), Err(EncodeError::InvalidLimits));
        assert!(Limits::new(20, 2, MESSAGE_CAPACITY).is_ok());
    }

    #[test]
    fn rejects_char_limit_past_message_limit() {
        assert_eq!(Limits::new(usize::MAX, 2, 256), Err(EncodeError::InvalidLimits));
        // ESC "2;1C" + text + CR is 6 bytes of overhead
        assert!(Limits::new(250, 2, 256).is_ok());
        assert_eq!(Limits::new(251, 2, 256), Err(EncodeError::InvalidLimits));
        // line 10 needs one more digit
        assert_eq!(Limits::new(250, 10, 256), Err(EncodeError::InvalidLimits));
        assert_eq!(Limits::new(40, 3, 30), Err(EncodeError::InvalidLimits));
    }

    #[test]
    fn line_bounds() {
        let l = Limits::default();
        assert_eq!(l.check_line(0), Err(EncodeError::LineOutOfRange { line: 0, limit: 2 }));
        assert_eq!(l.check_line(1), Ok(()));
        assert_eq!(l.check_line(2), Ok(()));
        assert_eq!(l.check_line(3), Err(EncodeError::LineOutOfRange { line: 3, limit: 2 }));
    }

    #[test]
    fn text_and_message_bounds() {
        let l = Limits::default();
        assert!(l.check_text("12345678901234567890").is_ok());
        assert_eq!(
            l.check_text("123456789012345678901"),
            Err(EncodeError::TextTooLong { len: 21, limit: 20 })
        );
        assert!(l.check_message(256).is_ok());
        assert_eq!(
            l.check_message(257),
            Err(EncodeError::MessageTooLong { len: 257, limit: 256 })
        );
    }

    #[test]
    fn limits_from_font_grid() {
        let l = Limits::default();
        let small = l.for_font(Font::new(3).unwrap()).unwrap();
        assert_eq!((small.char_limit(), small.line_limit(), small.message_limit()), (10, 1, 256));
        assert_eq!(l.for_font(Font::new(0).unwrap()), None);
    }

    #[test]
    fn session_defaults() {
        let c = SessionConfig::default();
        assert_eq!(c.font.value(), 1);
        assert_eq!(c.hue_foreground, Hue::Unset);
        assert_eq!(c.scroll_rate, ScrollRate::Medium);
        assert!(c.scroll_repeat.is_infinite());
        assert_eq!(c.blink_rate, 128);
    }
}
