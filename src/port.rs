//! OS serial port transport, enabled by the `serialport` feature.

use std::fmt;
use std::io::Write as _;
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

use crate::transport::Transport;

pub const BAUD_RATE: u32 = 9600;
const WRITE_TIMEOUT_MS: u64 = 1000;

#[derive(Debug)]
pub enum PortError {
    Open(serialport::Error),
    Io(std::io::Error),
    NotOpen,
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortError::Open(e) => write!(f, "failed to open port: {e}"),
            PortError::Io(e) => write!(f, "port i/o error: {e}"),
            PortError::NotOpen => f.write_str("port is not open"),
        }
    }
}

impl std::error::Error for PortError {}

impl From<serialport::Error> for PortError {
    fn from(value: serialport::Error) -> Self {
        PortError::Open(value)
    }
}

impl From<std::io::Error> for PortError {
    fn from(value: std::io::Error) -> Self {
        PortError::Io(value)
    }
}

/// A named serial device (`/dev/ttyUSB0`, `COM1`) at 9600 8N1.
pub struct SerialPortTransport {
    path: String,
    baud: u32,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialPortTransport {
    pub fn new(path: impl Into<String>) -> SerialPortTransport {
        SerialPortTransport {
            path: path.into(),
            baud: BAUD_RATE,
            port: None,
        }
    }

    pub fn with_baud(mut self, baud: u32) -> SerialPortTransport {
        self.baud = baud;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.port.is_some()
    }
}

impl fmt::Debug for SerialPortTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialPortTransport")
            .field("path", &self.path)
            .field("baud", &self.baud)
            .field("open", &self.is_open())
            .finish()
    }
}

impl Transport for SerialPortTransport {
    type Error = PortError;

    fn open(&mut self) -> Result<(), Self::Error> {
        let port = serialport::new(&self.path, self.baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_millis(WRITE_TIMEOUT_MS))
            .open()?;
        log::debug!("opened {} at {} baud", self.path, self.baud);
        self.port = Some(port);
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        let port = self.port.as_mut().ok_or(PortError::NotOpen)?;
        let n = port.write(bytes)?;
        port.flush()?;
        Ok(n)
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        // Dropping the handle closes the device
        let port = self.port.take().ok_or(PortError::NotOpen)?;
        drop(port);
        Ok(())
    }
}
