use crate::command::{self, Command, Escaped};
use crate::config::{Limits, SessionConfig};
use crate::error::{Error, OptionKind};
use crate::options::{Font, Hue, Mode, ScrollRate, ScrollRepeat};
use crate::transport::Transport;

/// Where a session is in its lifecycle. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unconnected,
    Connected,
    Closed,
}

/// A connection to one message board.
///
/// Every command validates first, then encodes, then writes. Nothing is
/// written for a call that fails validation, and setters leave the
/// configuration untouched when they fail.
#[derive(Debug)]
pub struct Signboard<T: Transport> {
    transport: T,
    config: SessionConfig,
    state: SessionState,
}

impl<T: Transport> Signboard<T> {
    /// A session with the default 2 x 20 limits and a 256 byte message limit.
    pub fn new(transport: T) -> Signboard<T> {
        Signboard::with_limits(transport, Limits::default())
    }

    pub fn with_limits(transport: T, limits: Limits) -> Signboard<T> {
        Signboard {
            transport,
            config: SessionConfig::new(limits),
            state: SessionState::Unconnected,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn limits(&self) -> &Limits {
        &self.config.limits
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Open the transport and send the init sequence.
    ///
    /// The session counts as connected once the transport opens, so a failed
    /// init write can still be followed by `close`.
    pub fn connect(&mut self) -> Result<(), Error<T::Error>> {
        if self.state != SessionState::Unconnected {
            return Err(self.reject(Error::for_state(self.state)));
        }
        self.transport.open().map_err(Error::Transport)?;
        self.state = SessionState::Connected;
        log::info!("signboard connected");
        self.send(command::encode_init())
    }

    pub fn close(&mut self) -> Result<(), Error<T::Error>> {
        self.ensure_connected()?;
        self.state = SessionState::Closed;
        log::info!("signboard closed");
        self.transport.close().map_err(Error::Transport)
    }

    /// Stored for later scroll messages, nothing is sent.
    pub fn set_scroll_rate(&mut self, rate: u8) -> Result<(), Error<T::Error>> {
        self.ensure_connected()?;
        let rate = ScrollRate::try_from(rate).map_err(|e| self.reject(e.into()))?;
        self.config.scroll_rate = rate;
        Ok(())
    }

    /// Stored for later scroll messages, nothing is sent. 0 repeats forever.
    pub fn set_scroll_repeat(&mut self, count: u8) -> Result<(), Error<T::Error>> {
        self.ensure_connected()?;
        let count = ScrollRepeat::try_from(count).map_err(|e| self.reject(e.into()))?;
        self.config.scroll_repeat = count;
        Ok(())
    }

    /// Sent immediately. The stored hue changes only once the write succeeds.
    pub fn set_hue(&mut self, fg: u8, bg: u8) -> Result<(), Error<T::Error>> {
        self.ensure_connected()?;
        let foreground =
            Hue::from_u8(fg, OptionKind::HueForeground).map_err(|e| self.reject(e.into()))?;
        let background =
            Hue::from_u8(bg, OptionKind::HueBackground).map_err(|e| self.reject(e.into()))?;
        let message = Command::Hue {
            foreground,
            background,
        }
        .to_message()?;
        self.send(&message)?;
        self.config.hue_foreground = foreground;
        self.config.hue_background = background;
        Ok(())
    }

    /// Sent immediately.
    ///
    /// Line and character limits are left as they are even when the font's
    /// grid is smaller; see [`fit_limits_to_font`](Self::fit_limits_to_font).
    pub fn set_font(&mut self, f: u8) -> Result<(), Error<T::Error>> {
        self.ensure_connected()?;
        let font = Font::new(f).map_err(|e| self.reject(e.into()))?;
        let message = Command::Font(font).to_message()?;
        self.send(&message)?;
        self.config.font = font;

        let limits = self.config.limits;
        if let Some(grid) = font.grid()
            && (grid.lines < limits.line_limit() || (grid.chars as usize) < limits.char_limit())
        {
            log::warn!(
                "font {} fits {} x {} but limits stay at {} x {}",
                f,
                grid.lines,
                grid.chars,
                limits.line_limit(),
                limits.char_limit()
            );
        }
        Ok(())
    }

    /// Replace the char and line limits with the current font's grid.
    ///
    /// Returns the new limits, or `None` when the font has no known grid.
    pub fn fit_limits_to_font(&mut self) -> Option<Limits> {
        let limits = self.config.limits.for_font(self.config.font)?;
        log::debug!(
            "limits fitted to font {}: {} x {}",
            self.config.font.value(),
            limits.line_limit(),
            limits.char_limit()
        );
        self.config.limits = limits;
        Some(limits)
    }

    /// Show `text` on `line` (1-based).
    ///
    /// Static text must fit within the char limit; scrolling text only
    /// within the message limit.
    pub fn print_message(
        &mut self,
        text: &str,
        line: u8,
        mode: Mode,
    ) -> Result<(), Error<T::Error>> {
        self.ensure_connected()?;
        let limits = self.config.limits;
        let encoded = match mode {
            Mode::Static => command::encode_static(line, text, &limits),
            Mode::Scroll => command::encode_scroll(line, text, &limits),
        };
        let message = encoded.map_err(|e| self.reject(e.into()))?;
        self.send(&message)
    }

    pub fn print_static(&mut self, text: &str, line: u8) -> Result<(), Error<T::Error>> {
        self.print_message(text, line, Mode::Static)
    }

    pub fn print_scroll(&mut self, text: &str, line: u8) -> Result<(), Error<T::Error>> {
        self.print_message(text, line, Mode::Scroll)
    }

    /// Blank every line with static spaces, line 1 first.
    pub fn clear(&mut self) -> Result<(), Error<T::Error>> {
        self.ensure_connected()?;
        let limits = self.config.limits;
        let units = command::encode_clear(&limits).map_err(|e| self.reject(e.into()))?;
        for unit in &units {
            limits
                .check_message(unit.len())
                .map_err(|e| self.reject(e.into()))?;
        }
        for unit in &units {
            self.send(unit)?;
        }
        Ok(())
    }

    fn ensure_connected(&self) -> Result<(), Error<T::Error>> {
        match self.state {
            SessionState::Connected => Ok(()),
            state => Err(self.reject(Error::for_state(state))),
        }
    }

    fn reject(&self, e: Error<T::Error>) -> Error<T::Error> {
        log::warn!("signboard rejected command: {e}");
        e
    }

    /// Write one whole unit. Oversize units are refused, never truncated.
    fn send(&mut self, unit: &[u8]) -> Result<(), Error<T::Error>> {
        if let Err(e) = self.config.limits.check_message(unit.len()) {
            return Err(self.reject(Error::from(e)));
        }
        log::debug!("sending {} byte unit", unit.len());
        log::trace!("{}", Escaped(unit));

        let mut written = 0;
        while written < unit.len() {
            let n = self
                .transport
                .write(&unit[written..])
                .map_err(Error::Transport)?;
            if n == 0 {
                return Err(Error::WriteZero {
                    written,
                    expected: unit.len(),
                });
            }
            written += n;
        }
        Ok(())
    }
}

#[cfg(feature = "serialport")]
impl Signboard<crate::port::SerialPortTransport> {
    /// A session on the serial device at `path`, 9600 8N1. Call
    /// [`connect`](Self::connect) to open it.
    pub fn open_port(path: &str, limits: Limits) -> Signboard<crate::port::SerialPortTransport> {
        Signboard::with_limits(crate::port::SerialPortTransport::new(path), limits)
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;

    use alloc::vec::Vec;

    use super::*;
    use crate::error::EncodeError;
    use crate::transport::MemoryTransport;

    fn connected() -> Signboard<MemoryTransport> {
        let mut sb = Signboard::new(MemoryTransport::new());
        sb.connect().unwrap();
        sb.transport_mut().take_units();
        sb
    }

    fn sent(sb: &Signboard<MemoryTransport>) -> Vec<Vec<u8>> {
        sb.transport().units().to_vec()
    }

    #[test]
    fn connect_sends_init() {
        let mut sb = Signboard::new(MemoryTransport::new());
        assert_eq!(sb.state(), SessionState::Unconnected);
        sb.connect().unwrap();
        assert_eq!(sb.state(), SessionState::Connected);
        assert_eq!(sent(&sb), [b"\x1b 24A".to_vec()]);
        assert_eq!(sb.transport().open_count(), 1);
    }

    #[test]
    fn connect_twice_is_rejected() {
        let mut sb = connected();
        assert!(matches!(sb.connect(), Err(Error::AlreadyConnected)));
        assert_eq!(sb.transport().open_count(), 1);
    }

    #[test]
    fn commands_before_connect() {
        let mut sb = Signboard::new(MemoryTransport::new());
        assert!(matches!(sb.set_font(5), Err(Error::NotConnected)));
        assert!(matches!(sb.set_hue(1, 1), Err(Error::NotConnected)));
        assert!(matches!(sb.set_scroll_rate(1), Err(Error::NotConnected)));
        assert!(matches!(sb.print_static("x", 1), Err(Error::NotConnected)));
        assert!(matches!(sb.clear(), Err(Error::NotConnected)));
        assert!(matches!(sb.close(), Err(Error::NotConnected)));
        assert!(sent(&sb).is_empty());
    }

    #[test]
    fn closed_is_terminal() {
        let mut sb = connected();
        sb.close().unwrap();
        assert_eq!(sb.state(), SessionState::Closed);
        assert_eq!(sb.transport().close_count(), 1);
        assert!(matches!(sb.print_static("x", 1), Err(Error::Closed)));
        assert!(matches!(sb.close(), Err(Error::Closed)));
        assert!(matches!(sb.connect(), Err(Error::Closed)));
        assert_eq!(sb.transport().close_count(), 1);
        assert!(sent(&sb).is_empty());
    }

    #[test]
    fn scroll_setters_store_without_sending() {
        let mut sb = connected();
        sb.set_scroll_rate(3).unwrap();
        sb.set_scroll_repeat(2).unwrap();
        assert_eq!(sb.config().scroll_rate, ScrollRate::Fast);
        assert_eq!(sb.config().scroll_repeat.value(), 2);
        assert!(sent(&sb).is_empty());
    }

    #[test]
    fn scroll_rate_boundary() {
        let mut sb = connected();
        sb.set_scroll_rate(3).unwrap();
        let err = sb.set_scroll_rate(4).unwrap_err();
        assert_eq!(
            err.encode_error(),
            Some(EncodeError::InvalidOption {
                option: OptionKind::ScrollRate,
                value: 4
            })
        );
        assert_eq!(sb.config().scroll_rate, ScrollRate::Fast);
        assert!(sb.set_scroll_repeat(4).is_err());
        assert!(sb.config().scroll_repeat.is_infinite());
    }

    #[test]
    fn hue_is_sent_and_stored() {
        let mut sb = connected();
        sb.set_hue(3, 1).unwrap();
        assert_eq!(sent(&sb), [b"\x1b3;1H".to_vec()]);
        assert_eq!(sb.config().hue_foreground, Hue::Bright);
        assert_eq!(sb.config().hue_background, Hue::Dim);

        let before = sb.config().clone();
        assert!(sb.set_hue(2, 5).is_err());
        assert_eq!(sb.config(), &before);
        assert_eq!(sent(&sb).len(), 1);
    }

    #[test]
    fn font_is_idempotent() {
        let mut sb = connected();
        sb.set_font(5).unwrap();
        let after_first = sb.config().clone();
        sb.set_font(5).unwrap();
        assert_eq!(sb.config(), &after_first);
        assert_eq!(sent(&sb), [b"\x1b5f".to_vec(), b"\x1b5f".to_vec()]);
    }

    #[test]
    fn font_keeps_limits_until_fitted() {
        let mut sb = connected();
        sb.set_font(3).unwrap();
        assert_eq!(sb.limits(), &Limits::default());
        let fitted = sb.fit_limits_to_font().unwrap();
        assert_eq!((fitted.line_limit(), fitted.char_limit()), (1, 10));
        assert!(sb.print_static("two", 2).is_err());
    }

    #[test]
    fn bad_font_leaves_state() {
        let mut sb = connected();
        assert!(sb.set_font(10).is_err());
        assert_eq!(sb.config().font, Font::DEFAULT);
        assert!(sent(&sb).is_empty());
    }

    #[test]
    fn static_and_scroll_messages() {
        let mut sb = connected();
        sb.print_message("Vorne signboard.", 1, Mode::Static).unwrap();
        sb.print_message("python test.", 2, Mode::Scroll).unwrap();
        assert_eq!(
            sent(&sb),
            [
                b"\x1b1;1CVorne signboard.\r".to_vec(),
                b"\x1b2 \x1bS python test. \r".to_vec()
            ]
        );
    }

    #[test]
    fn too_long_static_sends_nothing() {
        let mut sb = connected();
        let text = "X".repeat(21);
        let err = sb.print_message(&text, 1, Mode::Static).unwrap_err();
        assert_eq!(
            err.encode_error(),
            Some(EncodeError::TextTooLong { len: 21, limit: 20 })
        );
        assert!(sent(&sb).is_empty());
        // scroll has no per-line bound
        sb.print_message(&text, 1, Mode::Scroll).unwrap();
    }

    #[test]
    fn scroll_over_message_limit() {
        let mut sb = connected();
        let text = "Z".repeat(249);
        let err = sb.print_scroll(&text, 1).unwrap_err();
        assert_eq!(
            err.encode_error(),
            Some(EncodeError::MessageTooLong { len: 257, limit: 256 })
        );
        assert!(sent(&sb).is_empty());
        sb.print_scroll(&text[1..], 1).unwrap();
        assert_eq!(sent(&sb)[0].len(), 256);
    }

    #[test]
    fn embedded_escape_sends_nothing() {
        let mut sb = connected();
        for mode in [Mode::Static, Mode::Scroll] {
            let err = sb.print_message("a\x1b3f", 1, mode).unwrap_err();
            assert_eq!(
                err.encode_error(),
                Some(EncodeError::NotPrintable { index: 1, byte: 0x1b })
            );
        }
        assert!(sent(&sb).is_empty());
    }

    #[test]
    fn line_out_of_range() {
        let mut sb = connected();
        for line in [0, 3] {
            for mode in [Mode::Static, Mode::Scroll] {
                let err = sb.print_message("hi", line, mode).unwrap_err();
                assert_eq!(
                    err.encode_error(),
                    Some(EncodeError::LineOutOfRange { line, limit: 2 })
                );
            }
        }
        assert!(sent(&sb).is_empty());
    }

    #[test]
    fn clear_blanks_each_line_in_order() {
        let mut sb = connected();
        sb.clear().unwrap();
        let blank = " ".repeat(20);
        let mut line1 = b"\x1b1;1C".to_vec();
        line1.extend_from_slice(blank.as_bytes());
        line1.push(b'\r');
        let mut line2 = b"\x1b2;1C".to_vec();
        line2.extend_from_slice(blank.as_bytes());
        line2.push(b'\r');
        assert_eq!(sent(&sb), [line1, line2]);
    }

    #[test]
    fn clear_at_widest_accepted_limits() {
        assert_eq!(Limits::new(usize::MAX, 2, 256), Err(EncodeError::InvalidLimits));
        let limits = Limits::new(250, 2, 256).unwrap();
        let mut sb = Signboard::with_limits(MemoryTransport::new(), limits);
        sb.connect().unwrap();
        sb.transport_mut().take_units();
        sb.clear().unwrap();
        let units = sent(&sb);
        assert_eq!(units.len(), 2);
        assert!(units.iter().all(|u| u.len() == 256));
    }
}
