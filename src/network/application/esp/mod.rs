//! ESP gateway bridge protocol for embedded systems.
//!
//! This module implements the client side of a line-oriented serial protocol
//! spoken with an ESP8266/ESP32 running a WiFi/MQTT gateway firmware. The
//! microcontroller never owns a network stack; it publishes and subscribes by
//! exchanging short ASCII lines with the gateway.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │ SerialTransport │───▶│   LineBuffer    │───▶│   parse_frame   │
//! │  (raw bytes)    │    │ (256 byte cap)  │    │ (topic/content) │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!                                                        │
//!                  ┌─────────────────────────────────────┤
//!                  ▼                                     ▼
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  System topics  │    │  TopicRegistry  │───▶│  dispatch tick  │
//! │ (state, clock)  │    │ (staged values) │    │ (user handlers) │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Ingestion and dispatch are decoupled: parsing a line only stages values,
//! and handlers run from the periodic dispatch job. The caller drives both
//! through [`Session::poll`].
//!
//! # Wire protocol
//!
//! Outbound lines:
//!
//! ```text
//! pub <topic> "<value>"
//! sub <topic>"
//! ack <id>
//! wifi "<ssid>" "<password>"
//! mqtt-app <project>/<group>
//! date-time <timezone> 600
//! device
//! connection-status
//! ```
//!
//! Inbound lines are `<topic> <content>[ <id>]`. Topics starting with `$ESP/`
//! carry gateway state; `s_`, `n_` and `l_` topics carry string, number and
//! bitmap messages, optionally suffixed with a channel name.
//!
//! # Usage
//!
//! ```rust,no_run
//! use espnet::network::application::esp::{ConnectionLevel, Options, Platform, Session};
//! use espnet::network::error::Error;
//! use espnet::network::{LinkConfig, Read, Serial, Write};
//! # struct Uart;
//! # impl Read for Uart {
//! #     type Error = ();
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl Write for Uart {
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
//! fn on_temperature(value: f64) {
//!     let _ = value;
//! }
//!
//! let mut session = Session::new(Uart, Board, &Options::default());
//! session.connect_wifi("my-network", "secret");
//! session.connect_project_group("123-456-789", "1");
//! session.on_received_number_in_channel("temperature", on_temperature).unwrap();
//! session.wait_for_connection(ConnectionLevel::ProjectGroup);
//! session.send_number_to_channel(21.5, "temperature");
//!
//! loop {
//!     session.poll();
//! }
//! ```

#![deny(unsafe_code)]

pub mod bitmap;
pub mod bring_up;
pub mod clock;
pub mod codec;
pub mod registry;
pub mod session;
pub mod shared;
pub mod transport;

pub use bitmap::Bitmap;
pub use bring_up::{BringUp, ConnectionLevel, Interval, Phase};
pub use clock::{Clock, TimeZone, utc_offset_descriptor};
pub use codec::{Command, Frame, LineBuffer, LineEvent, normalize, parse_frame};
pub use registry::{Handler, Subscription, TopicRegistry, Updates};
pub use session::{Options, Platform, Session};
pub use shared::SharedSession;
pub use transport::SerialTransport;

/// Maximum length of an inbound line, excluding the newline terminator.
pub const MAX_LINE_LEN: usize = 256;
/// Maximum length of an outbound command line, including the terminator.
pub const MAX_COMMAND_LEN: usize = 320;
/// Maximum length of a normalized topic, project or group name.
pub const MAX_TOPIC_LEN: usize = 64;
/// Maximum length of a WiFi SSID or password.
pub const MAX_CREDENTIAL_LEN: usize = 64;
/// Maximum length of a device firmware version string.
pub const MAX_DEVICE_LEN: usize = 16;
/// Maximum number of subscriptions a session can hold.
pub const MAX_SUBSCRIPTIONS: usize = 16;
/// Maximum number of bytes consumed by a single [`Session::ingest`] call.
pub const MAX_INGEST_BYTES: usize = 1024;

/// Interval between subscription dispatch ticks.
pub const DISPATCH_INTERVAL_MS: u32 = 20;
/// Interval between device version requests during bring-up.
pub const DEVICE_POLL_INTERVAL_MS: u32 = 1000;
/// Interval between connection status requests during bring-up.
pub const CONNECTION_POLL_INTERVAL_MS: u32 = 1150;
/// Pause between checks in [`Session::wait_for_connection`].
pub const WAIT_POLL_INTERVAL_MS: u32 = 200;
/// Refresh period argument sent with every date-time request.
pub const DATE_TIME_REFRESH: u32 = 600;

/// Topic prefix for string messages.
pub const STRING_TOPIC: &str = "s_";
/// Topic prefix for number messages.
pub const NUMBER_TOPIC: &str = "n_";
/// Topic prefix for bitmap messages.
pub const BITMAP_TOPIC: &str = "l_";

/// Prefix shared by all gateway system topics.
pub const SYSTEM_TOPIC_PREFIX: &str = "$ESP/";
/// Connection level reports.
pub const CONNECTION_TOPIC: &str = "$ESP/connection";
/// Gateway firmware version reports.
pub const DEVICE_TOPIC: &str = "$ESP/device";
/// Gateway error reports.
pub const ERROR_TOPIC: &str = "$ESP/error";
/// Date and time reports.
pub const DATE_TIME_TOPIC: &str = "$ESP/date-time";
/// Transmission control toggles.
pub const TRANSMISSION_CONTROL_TOPIC: &str = "$ESP/tc";

/// Device version reported before the gateway has identified itself.
pub const UNKNOWN_DEVICE_VERSION: &str = "0.0.0";
/// Transmission id used when a frame carries none.
pub const NO_TRANSMISSION_ID: &str = "0";
