//! A serial link abstraction layer for embedded systems
//!
//! This module provides the traits the protocol engine uses to reach the
//! hardware UART that connects the microcontroller to the ESP gateway, plus the
//! link configuration types shared by every implementation.
//!
//! Implementations are expected to be non-blocking on read (return `Ok(0)` when
//! nothing is buffered) and blocking on write (return once the bytes are queued
//! to the UART).

#![deny(unsafe_code)]

use serde::Deserialize;

/// Common error types for link and protocol operations
pub mod error;

/// Application protocols layered over the serial link
pub mod application;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{Read, Serial, Write};
}

/// Read bytes from the link.
pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read whatever bytes are currently buffered, returning how many were
    /// copied into `buf`. Returns `Ok(0)` when no data is available.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Write bytes to the link.
pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the link, returning how many bytes were accepted
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// A serial port that can be routed to a pair of pins.
pub trait Serial: Read + Write {
    /// (Re)configure the UART on the pins, baud rate and buffer sizes given in
    /// `config`. Any previous routing is torn down.
    fn redirect(&mut self, config: &LinkConfig) -> Result<(), error::Error>;
}

/// A physical pin identifier, as numbered by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct Pin(pub u8);

impl Pin {
    /// Edge connector pin 0.
    pub const P0: Pin = Pin(0);
    /// Edge connector pin 1.
    pub const P1: Pin = Pin(1);
    /// Edge connector pin 2.
    pub const P2: Pin = Pin(2);
}

#[cfg(feature = "defmt")]
impl defmt::Format for Pin {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "P{}", self.0)
    }
}

/// Physical link parameters.
///
/// `rx` is the pin the ESP device receives on (our TX line), `tx` the pin it
/// transmits on. Two configurations address the same link when their pin
/// pair matches; baud rate and buffer sizes only take effect when the pins
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// ESP device receiver pin.
    pub rx: Pin,
    /// ESP device transmitter pin.
    pub tx: Pin,
    /// UART baud rate.
    pub baud_rate: u32,
    /// UART receive buffer size in bytes.
    pub rx_buffer_size: u16,
    /// UART transmit buffer size in bytes.
    pub tx_buffer_size: u16,
}

impl LinkConfig {
    /// Link on the given pins with the default baud rate and buffers.
    pub const fn new(rx: Pin, tx: Pin) -> Self {
        Self {
            rx,
            tx,
            baud_rate: 9600,
            rx_buffer_size: 32,
            tx_buffer_size: 32,
        }
    }

    /// Whether `other` is routed to the same pin pair.
    pub fn same_pins(&self, other: &LinkConfig) -> bool {
        self.rx == other.rx && self.tx == other.tx
    }
}

impl Default for LinkConfig {
    /// The 3V analog Grove socket: ESP RX on P0, ESP TX on P1, 9600 baud.
    fn default() -> Self {
        Self::new(Pin::P0, Pin::P1)
    }
}
