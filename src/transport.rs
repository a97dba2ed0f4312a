//! Byte-stream sinks a [`Signboard`](crate::Signboard) can send through.

extern crate alloc;

use alloc::vec::Vec;
use core::convert::Infallible;

use crate::command::Escaped;

/// The three primitives the session needs from a link to the display.
pub trait Transport {
    type Error: core::fmt::Debug;

    fn open(&mut self) -> Result<(), Self::Error>;

    /// Write some prefix of `bytes`, returning how many were taken.
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error>;

    fn close(&mut self) -> Result<(), Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn open(&mut self) -> Result<(), Self::Error> {
        T::open(self)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        T::write(self, bytes)
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        T::close(self)
    }
}

/// Any [`embedded_io::Write`] that is already live, such as a HAL UART.
///
/// Open and close do nothing; every write is flushed.
#[derive(Debug)]
pub struct IoTransport<W: embedded_io::Write> {
    writer: W,
}

impl<W: embedded_io::Write> IoTransport<W> {
    pub fn new(writer: W) -> IoTransport<W> {
        IoTransport { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: embedded_io::Write> Transport for IoTransport<W> {
    type Error = W::Error;

    fn open(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        let n = self.writer.write(bytes)?;
        self.writer.flush()?;
        Ok(n)
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        self.writer.flush()
    }
}

/// Logs every unit instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRun {
    sent: usize,
}

impl DryRun {
    pub fn new() -> DryRun {
        DryRun { sent: 0 }
    }

    /// Units that would have been sent so far.
    pub fn sent(&self) -> usize {
        self.sent
    }
}

impl Transport for DryRun {
    type Error = Infallible;

    fn open(&mut self) -> Result<(), Self::Error> {
        log::info!("dry run: open");
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        self.sent += 1;
        log::info!("dry run: {}", Escaped(bytes));
        Ok(bytes.len())
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        log::info!("dry run: close");
        Ok(())
    }
}

/// Keeps every unit it is given, in order.
#[derive(Debug, Default, Clone)]
pub struct MemoryTransport {
    units: Vec<Vec<u8>>,
    opened: usize,
    closed: usize,
}

impl MemoryTransport {
    pub fn new() -> MemoryTransport {
        MemoryTransport::default()
    }

    pub fn units(&self) -> &[Vec<u8>] {
        &self.units
    }

    /// All units concatenated, as they would appear on the wire.
    pub fn bytes(&self) -> Vec<u8> {
        self.units.concat()
    }

    pub fn take_units(&mut self) -> Vec<Vec<u8>> {
        core::mem::take(&mut self.units)
    }

    pub fn open_count(&self) -> usize {
        self.opened
    }

    pub fn close_count(&self) -> usize {
        self.closed
    }
}

impl Transport for MemoryTransport {
    type Error = Infallible;

    fn open(&mut self) -> Result<(), Self::Error> {
        self.opened += 1;
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        self.units.push(bytes.to_vec());
        Ok(bytes.len())
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        self.closed += 1;
        Ok(())
    }
}
