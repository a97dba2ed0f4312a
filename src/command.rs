//! Escape-sequence encoder for the signboard command set.
//!
//! Every command starts with a single ESC byte followed by printable ASCII:
//!
//! | Command | Bytes |
//! |---------|-------|
//! | Init    | `ESC " 24A"` |
//! | Hue     | `ESC "{fg};{bg}H"` |
//! | Font    | `ESC "{f}f"` |
//! | Static  | `ESC "{line};1C{text}\r"` |
//! | Scroll  | `ESC "{line} " ESC "S {text} \r"` |
//!
//! The functions here are pure. Limits are passed in, nothing is written.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Write as _};

use crate::Encode;
use crate::config::{Limits, static_overhead};
use crate::error::{EncodeError, OptionKind};
use crate::options::{Font, Hue};

pub const ESC: u8 = 0x1B;

/// Sent once after the port is opened.
pub const INIT_SEQUENCE: &[u8] = b"\x1b 24A";

/// Largest unit the encoder will buffer. Session message limits must fit inside.
pub const MESSAGE_CAPACITY: usize = 512;

/// One encoded command, ready for the transport.
pub type Message = heapless::Vec<u8, MESSAGE_CAPACITY>;

/// A single validated display command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Init,
    Hue { foreground: Hue, background: Hue },
    Font(Font),
    Static { line: u8, text: &'a str },
    Scroll { line: u8, text: &'a str },
}

impl<'a> Command<'a> {
    fn write_to<W: fmt::Write>(&self, w: &mut W) -> fmt::Result {
        match self {
            Command::Init => w.write_str("\x1b 24A"),
            Command::Hue {
                foreground,
                background,
            } => write!(w, "\x1b{};{}H", *foreground as u8, *background as u8),
            Command::Font(font) => write!(w, "\x1b{}f", font.value()),
            Command::Static { line, text } => write!(w, "\x1b{line};1C{text}\r"),
            Command::Scroll { line, text } => write!(w, "\x1b{line} \x1bS {text} \r"),
        }
    }

    /// Exact number of bytes [`encode`](Encode::encode) will produce.
    pub fn encoded_len(&self) -> usize {
        let mut counter = Counter(0);
        // Counter never fails
        let _ = self.write_to(&mut counter);
        counter.0
    }

    /// Encode into an owned buffer.
    pub fn to_message(&self) -> Result<Message, EncodeError> {
        let len = self.encoded_len();
        if len > MESSAGE_CAPACITY {
            return Err(EncodeError::MessageTooLong {
                len,
                limit: MESSAGE_CAPACITY,
            });
        }
        let mut buf = [0; MESSAGE_CAPACITY];
        let size = self.encode(&mut buf)?;
        Message::from_slice(&buf[..size]).map_err(|_| EncodeError::MessageTooLong {
            len: size,
            limit: MESSAGE_CAPACITY,
        })
    }
}

impl<'a> Encode for Command<'a> {
    type Error = EncodeError;

    fn encode(&self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        let expected = self.encoded_len();
        if buffer.len() < expected {
            return Err(EncodeError::EncodeBufferTooSmall {
                expected,
                found: buffer.len(),
            });
        }
        let mut cursor = Cursor { buf: buffer, pos: 0 };
        self.write_to(&mut cursor)
            .map_err(|_| EncodeError::EncodeBufferTooSmall {
                expected,
                found: cursor.buf.len(),
            })?;
        Ok(cursor.pos)
    }
}

struct Counter(usize);

impl fmt::Write for Counter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 += s.len();
        Ok(())
    }
}

struct Cursor<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl fmt::Write for Cursor<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.pos + s.len();
        let dst = self.buf.get_mut(self.pos..end).ok_or(fmt::Error)?;
        dst.copy_from_slice(s.as_bytes());
        self.pos = end;
        Ok(())
    }
}

/// Text may only carry printable ASCII; an ESC or CR would end the unit early.
fn check_text_bytes(text: &str) -> Result<(), EncodeError> {
    for (index, byte) in text.bytes().enumerate() {
        if !byte.is_ascii() {
            return Err(EncodeError::NotAscii { index });
        }
        if !(b' '..=b'~').contains(&byte) {
            return Err(EncodeError::NotPrintable { index, byte });
        }
    }
    Ok(())
}

pub fn encode_init() -> &'static [u8] {
    INIT_SEQUENCE
}

/// Both values must be in `0..=4`.
pub fn encode_hue(fg: u8, bg: u8) -> Result<Message, EncodeError> {
    let foreground = Hue::from_u8(fg, OptionKind::HueForeground)?;
    let background = Hue::from_u8(bg, OptionKind::HueBackground)?;
    Command::Hue {
        foreground,
        background,
    }
    .to_message()
}

pub fn encode_font(f: u8) -> Result<Message, EncodeError> {
    Command::Font(Font::new(f)?).to_message()
}

/// Fixed text on `line`. The text must fit within `char_limit`.
pub fn encode_static(line: u8, text: &str, limits: &Limits) -> Result<Message, EncodeError> {
    limits.check_line(line)?;
    check_text_bytes(text)?;
    limits.check_text(text)?;
    Command::Static { line, text }.to_message()
}

/// Scrolling text on `line`. Only the line is bounded here; length is
/// checked against the message limit when the session sends it.
pub fn encode_scroll(line: u8, text: &str, limits: &Limits) -> Result<Message, EncodeError> {
    limits.check_line(line)?;
    check_text_bytes(text)?;
    Command::Scroll { line, text }.to_message()
}

/// Blank every line, top to bottom, with `char_limit` spaces each.
pub fn encode_clear(limits: &Limits) -> Result<Vec<Message>, EncodeError> {
    let len = limits
        .char_limit()
        .saturating_add(static_overhead(limits.line_limit()));
    if len > MESSAGE_CAPACITY {
        return Err(EncodeError::MessageTooLong {
            len,
            limit: MESSAGE_CAPACITY,
        });
    }
    let blank: String = " ".repeat(limits.char_limit());
    (1..=limits.line_limit())
        .map(|line| encode_static(line, &blank, limits))
        .collect()
}

/// Renders encoded bytes with control codes spelled out, for logs.
pub struct Escaped<'a>(pub &'a [u8]);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.0 {
            match b {
                ESC => f.write_str("<ESC>")?,
                b'\r' => f.write_str("<CR>")?,
                b if b.is_ascii_graphic() || b == b' ' => f.write_char(b as char)?,
                b => write!(f, "<{b:02X}>")?,
            }
        }
        Ok(())
    }
}
