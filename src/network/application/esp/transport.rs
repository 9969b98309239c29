//! Serial link ownership and raw line I/O.

use crate::network::error::Error;
use crate::network::{LinkConfig, Serial};

use super::codec::Command;

/// The UART link to the gateway.
///
/// Tracks which pins the link is routed to so that re-establishing it on the
/// same pins is free. In simulated mode every write succeeds without touching
/// the port.
#[derive(Debug)]
pub struct SerialTransport<S> {
    serial: S,
    link: Option<LinkConfig>,
    simulated: bool,
}

impl<S: Serial> SerialTransport<S> {
    /// Wrap `serial`. The link is not routed until [`establish`](Self::establish).
    pub fn new(serial: S, simulated: bool) -> Self {
        Self {
            serial,
            link: None,
            simulated,
        }
    }

    /// Route the link as described by `config`.
    ///
    /// Returns `Ok(false)` without touching the port when the link is already
    /// routed to the same pins. Otherwise the port is redirected, stale input
    /// is drained and the handshake marker is written; returns `Ok(true)`.
    pub fn establish(&mut self, config: &LinkConfig) -> Result<bool, Error> {
        if self.link.is_some_and(|link| link.same_pins(config)) {
            return Ok(false);
        }

        self.serial.redirect(config)?;
        self.link = Some(*config);
        self.drain()?;
        self.send(&Command::Handshake)?;
        info!(
            "link up: rx=P{} tx=P{} @ {} baud",
            config.rx.0,
            config.tx.0,
            config.baud_rate
        );
        Ok(true)
    }

    /// Encode and write one command.
    pub fn send(&mut self, command: &Command<'_>) -> Result<(), Error> {
        let line = command.encode()?;
        self.write_line(line.as_bytes())
    }

    /// Write a complete line, blocking until every byte is accepted.
    pub fn write_line(&mut self, mut bytes: &[u8]) -> Result<(), Error> {
        if self.simulated {
            return Ok(());
        }

        while !bytes.is_empty() {
            match self.serial.write(bytes) {
                Ok(0) | Err(_) => return Err(Error::WriteError),
                Ok(n) => bytes = &bytes[n.min(bytes.len())..],
            }
        }
        self.serial.flush().map_err(|_| Error::WriteError)
    }

    /// Read whatever bytes are buffered. Returns `Ok(0)` when none are.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        if self.link.is_none() {
            return Err(Error::NotOpen);
        }
        self.serial.read(buf).map_err(|_| Error::ReadError)
    }

    fn drain(&mut self) -> Result<(), Error> {
        let mut scratch = [0u8; 32];
        let mut dropped = 0usize;
        loop {
            match self.read(&mut scratch)? {
                0 => break,
                n => dropped += n,
            }
        }
        if dropped > 0 {
            debug!("drained {} stale bytes", dropped);
        }
        Ok(())
    }

    /// Current link routing, if established.
    pub fn link(&self) -> Option<&LinkConfig> {
        self.link.as_ref()
    }

    /// Whether writes are suppressed.
    pub fn is_simulated(&self) -> bool {
        self.simulated
    }

    /// Access the underlying port.
    pub fn serial(&self) -> &S {
        &self.serial
    }

    /// Mutable access to the underlying port.
    pub fn serial_mut(&mut self) -> &mut S {
        &mut self.serial
    }
}
