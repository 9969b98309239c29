//! # Application Layer Protocols
//!
//! This module contains the application-level protocols spoken over the
//! serial link. Each protocol is written against the core link traits in
//! [`network`](crate::network) and keeps the same ground rules:
//!
//! - **Link Agnostic**: Work with any type implementing [`Serial`](crate::network::Serial)
//! - **No-std Compatible**: No heap allocation; every buffer is a `heapless` type
//! - **Resource Conscious**: Fixed capacities for lines, topics and subscriptions
//! - **Degrade, don't fail**: Malformed input is dropped and reported through
//!   state, never through a panic
//!
//! ## Available Protocols
//!
//! - **[`esp`]**: line-oriented pub/sub bridge to an ESP WiFi/MQTT gateway

/// ESP gateway bridge protocol.
///
/// Gives a microcontroller MQTT-style publish/subscribe, connection tracking
/// and network time through an ESP device attached to a UART.
pub mod esp;
