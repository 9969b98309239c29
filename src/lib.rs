//! # espnet - ESP gateway networking for microcontrollers
//!
//! A client for the line-oriented serial protocol spoken by ESP8266/ESP32
//! WiFi/MQTT gateway firmware. A microcontroller without a network stack
//! attaches the gateway to a UART and gets publish/subscribe messaging,
//! connection tracking and network time through it. This library is designed
//! for embedded systems and supports `no_std` environments.
//!
//! ## Features
//!
//! ### Messaging
//! - String, number and 5×5 bitmap messages
//! - Named channels within each message type
//! - Project/group scoping of broadcasts
//! - Optional per-frame acknowledgment (transmission control)
//!
//! ### Connection Tracking
//! - Automatic device discovery and connection-level polling after link-up
//! - Connection and error notifications
//!
//! ### Time
//! - Drift-corrected wall-clock time from periodic gateway reports
//! - Built-in timezone table and fixed UTC offsets
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! espnet = "0.1.0"
//! ```
//!
//! ### Sending and receiving
//!
//! ```rust,no_run
//! use espnet::network::application::esp::{Options, Platform, Session};
//! # use espnet::network::{LinkConfig, Serial, error::Error};
//! # struct Uart;
//! # impl espnet::network::Read for Uart {
//! #     type Error = ();
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl espnet::network::Write for Uart {
//! #     type Error = ();
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl Serial for Uart {
//! #     fn redirect(&mut self, _config: &LinkConfig) -> Result<(), Error> { Ok(()) }
//! # }
//! # struct Board;
//! # impl Platform for Board {
//! #     fn millis(&self) -> u64 { 0 }
//! #     fn pause(&mut self, _ms: u32) {}
//! #     fn random_in_range(&mut self, min: u32, _max: u32) -> u32 { min }
//! # }
//!
//! fn on_message(text: &str) {
//!     let _ = text;
//! }
//!
//! let mut session = Session::new(Uart, Board, &Options::default());
//! session.connect_wifi("my-network", "secret");
//! session.on_received_string(on_message).unwrap();
//! session.send_string("hello");
//!
//! loop {
//!     session.poll();
//! }
//! ```
//!
//! ## Platform Support
//!
//! This library is designed to work on:
//! - Embedded microcontrollers (ARM Cortex-M, RISC-V, etc.)
//! - Any platform supporting Rust's `core` library
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `defmt`: Enable defmt logging and `defmt::Format` impls
//! - `log`: Route internal logging through the `log` facade

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

#[macro_use]
mod fmt;

/// Serial link abstraction and the protocols layered over it.
///
/// This module contains the link traits the protocol engine is written
/// against, the shared error type, and the ESP gateway protocol itself.
pub mod network;
