use core::fmt;

use crate::session::SessionState;

/// Which enumerated option a value was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Font,
    HueForeground,
    HueBackground,
    ScrollRate,
    ScrollRepeat,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OptionKind::Font => "font",
            OptionKind::HueForeground => "foreground hue",
            OptionKind::HueBackground => "background hue",
            OptionKind::ScrollRate => "scroll rate",
            OptionKind::ScrollRepeat => "scroll repeat",
        };
        f.write_str(name)
    }
}

/// Errors raised while validating or encoding a single command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    InvalidOption {
        option: OptionKind,
        value: u8,
    },
    LineOutOfRange {
        line: u8,
        limit: u8,
    },
    TextTooLong {
        len: usize,
        limit: usize,
    },
    /// Encoded output, control codes included, is longer than allowed.
    MessageTooLong {
        len: usize,
        limit: usize,
    },
    /// Byte at `index` of the text is outside 7-bit ASCII.
    NotAscii {
        index: usize,
    },
    /// Control byte at `index` of the text, such as ESC or CR.
    NotPrintable {
        index: usize,
        byte: u8,
    },
    EncodeBufferTooSmall {
        expected: usize,
        found: usize,
    },
    /// A limit was zero, or a full line would not fit the message limit.
    InvalidLimits,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::InvalidOption { option, value } => {
                write!(f, "invalid {option} option: {value}")
            }
            EncodeError::LineOutOfRange { line, limit } => {
                write!(f, "line {line} outside 1..={limit}")
            }
            EncodeError::TextTooLong { len, limit } => {
                write!(f, "text of {len} characters exceeds the line limit of {limit}")
            }
            EncodeError::MessageTooLong { len, limit } => {
                write!(f, "message of {len} bytes exceeds the message limit of {limit}")
            }
            EncodeError::NotAscii { index } => write!(f, "non-ASCII byte at index {index}"),
            EncodeError::NotPrintable { index, byte } => {
                write!(f, "control byte 0x{byte:02X} at index {index}")
            }
            EncodeError::EncodeBufferTooSmall { expected, found } => {
                write!(f, "encode buffer too small: need {expected}, have {found}")
            }
            EncodeError::InvalidLimits => f.write_str("invalid display limits"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

/// Errors returned by [`Signboard`](crate::Signboard) calls.
///
/// `E` is the error type of the underlying [`Transport`](crate::Transport)
/// and is passed through untouched.
#[derive(Debug)]
pub enum Error<E> {
    Encode(EncodeError),
    /// The call needs a connected session.
    NotConnected,
    AlreadyConnected,
    /// The session was closed; it cannot be used again.
    Closed,
    /// The transport accepted zero bytes of a non-empty unit.
    WriteZero {
        written: usize,
        expected: usize,
    },
    Transport(E),
}

impl<E> Error<E> {
    /// The encoder-level error, if this is one.
    pub fn encode_error(&self) -> Option<EncodeError> {
        match self {
            Error::Encode(e) => Some(*e),
            _ => None,
        }
    }

    pub(crate) fn for_state(state: SessionState) -> Self {
        match state {
            SessionState::Unconnected => Error::NotConnected,
            SessionState::Connected => Error::AlreadyConnected,
            SessionState::Closed => Error::Closed,
        }
    }
}

impl<E> From<EncodeError> for Error<E> {
    fn from(value: EncodeError) -> Self {
        Error::Encode(value)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Encode(e) => fmt::Display::fmt(e, f),
            Error::NotConnected => f.write_str("signboard is not connected"),
            Error::AlreadyConnected => f.write_str("signboard is already connected"),
            Error::Closed => f.write_str("signboard session is closed"),
            Error::WriteZero { written, expected } => {
                write!(f, "transport stopped after {written} of {expected} bytes")
            }
            Error::Transport(e) => write!(f, "transport error: {e:?}"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Error<E> {}
