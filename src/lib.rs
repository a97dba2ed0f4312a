#![cfg_attr(not(feature = "std"), no_std)]

//! Command encoder and session for serial character-matrix message boards.
//!
//! [`command`] turns display requests into the board's escape-sequence
//! protocol. [`Signboard`] keeps the display configuration, validates every
//! call against the board's limits and writes the encoded units through a
//! [`Transport`].

extern crate alloc;

pub mod command;
mod config;
mod error;
mod options;
#[cfg(feature = "serialport")]
mod port;
mod serial;
mod session;
mod transport;

pub trait Encode {
    type Error;

    /// Encode into the front of `buffer`, returning the number of bytes used.
    fn encode(&self, buffer: &mut [u8]) -> Result<usize, Self::Error>;
}

pub use command::{
    Command, Message, encode_clear, encode_font, encode_hue, encode_init, encode_scroll,
    encode_static,
};
pub use config::{
    DEFAULT_CHAR_LIMIT, DEFAULT_LINE_LIMIT, DEFAULT_MESSAGE_LIMIT, Limits, SessionConfig,
};
pub use error::{EncodeError, Error, OptionKind};
pub use options::{Charset, Font, FontGrid, Hue, Mode, ScrollRate, ScrollRepeat};
#[cfg(feature = "serialport")]
pub use port::{BAUD_RATE, PortError, SerialPortTransport};
pub use serial::{ErrorShim, NbWriter};
pub use session::{SessionState, Signboard};
pub use transport::{DryRun, IoTransport, MemoryTransport, Transport};
