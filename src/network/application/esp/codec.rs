//! Line codec for the ESP gateway protocol.
//!
//! Outbound traffic is a handful of fixed commands ([`Command`]), each encoded
//! as one `\n`-terminated ASCII line. Inbound traffic is assembled byte by
//! byte in a [`LineBuffer`] and split into [`Frame`]s by [`parse_frame`].

use core::fmt::Write as _;

use heapless::{String, Vec};

use super::{DATE_TIME_REFRESH, MAX_COMMAND_LEN, MAX_LINE_LEN, MAX_TOPIC_LEN, NO_TRANSMISSION_ID};
use crate::network::error::Error;

/// A normalized topic, channel, project or group name.
pub type Topic = String<MAX_TOPIC_LEN>;

/// An encoded outbound command, terminator included.
pub type OutboundLine = String<MAX_COMMAND_LEN>;

/// An assembled inbound line, terminator excluded.
pub type InboundLine = String<MAX_LINE_LEN>;

/// Marker line written after (re)routing the link so the gateway discards any
/// partial command it was assembling.
pub const HANDSHAKE: &str = "----- -----";

/// Strip every space, `/` and `"` from `raw`.
///
/// The result is truncated to [`MAX_TOPIC_LEN`] bytes if needed.
pub fn normalize(raw: &str) -> Topic {
    let mut topic = Topic::new();
    for c in raw.chars().filter(|c| !matches!(c, ' ' | '/' | '"')) {
        if topic.push(c).is_err() {
            warn!("topic truncated to {} bytes", MAX_TOPIC_LEN);
            break;
        }
    }
    topic
}

/// Build `<prefix><normalized channel>`.
pub fn channel_topic(prefix: &str, channel: &str) -> Topic {
    let mut topic: Topic = truncated(prefix);
    for c in normalize(channel).chars() {
        if topic.push(c).is_err() {
            warn!("channel topic truncated to {} bytes", MAX_TOPIC_LEN);
            break;
        }
    }
    topic
}

/// Copy `value` into a fixed-capacity string, cutting at the last character
/// boundary that fits.
pub(crate) fn truncated<const N: usize>(value: &str) -> String<N> {
    let mut out = String::new();
    let mut end = value.len().min(N);
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    if end < value.len() {
        warn!("value truncated to {} bytes", N);
    }
    // Cannot fail: `end <= N`.
    let _ = out.push_str(&value[..end]);
    out
}

/// The text up to the first space, or the whole text when it has none.
pub fn first_token(data: &str) -> &str {
    match data.find(' ') {
        Some(idx) => &data[..idx],
        None => data,
    }
}

/// Parse the leading integer of `text`.
///
/// Leading whitespace and a sign are accepted; parsing stops at the first
/// non-digit. Returns `None` when no digit follows.
pub fn parse_leading_int(text: &str) -> Option<i32> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        seen = true;
        value = (value * 10 + i64::from(b - b'0')).min(i64::from(u32::MAX));
    }
    if !seen {
        return None;
    }

    let value = if negative { -value } else { value };
    Some(value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

/// Commands sent to the gateway.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command<'a> {
    /// Resynchronization marker sent after the link is (re)routed.
    Handshake,
    /// Publish `value` on `topic`. The topic is normalized and quotes are
    /// stripped from the value during encoding.
    Publish {
        /// Destination topic.
        topic: &'a str,
        /// Payload text.
        value: &'a str,
    },
    /// Ask the gateway to forward messages on `topic`.
    Subscribe {
        /// Normalized topic.
        topic: &'a str,
    },
    /// Confirm receipt of the frame carrying transmission id `id`.
    Ack {
        /// Transmission id of the received frame.
        id: &'a str,
    },
    /// WiFi credentials.
    WiFi {
        /// Network name.
        ssid: &'a str,
        /// Network password.
        password: &'a str,
    },
    /// MQTT topic prefix for this device.
    MqttApp {
        /// Normalized project name.
        project: &'a str,
        /// Normalized group name.
        group: &'a str,
    },
    /// Request a date-time report in `timezone`.
    DateTime {
        /// POSIX TZ descriptor.
        timezone: &'a str,
    },
    /// Request the gateway firmware version.
    Device,
    /// Request the current connection level.
    ConnectionStatus,
}

impl Command<'_> {
    /// Encode the command as a single `\n`-terminated line.
    pub fn encode(&self) -> Result<OutboundLine, Error> {
        let mut line = OutboundLine::new();
        self.write_to(&mut line).map_err(|_| Error::BufferOverflow)?;
        line.push('\n').map_err(|_| Error::BufferOverflow)?;
        Ok(line)
    }

    fn write_to(&self, out: &mut OutboundLine) -> core::fmt::Result {
        match *self {
            Command::Handshake => out.write_str(HANDSHAKE),
            Command::Publish { topic, value } => {
                write!(out, "pub {} \"", normalize(topic))?;
                for c in value.chars().filter(|&c| c != '"') {
                    out.write_char(c)?;
                }
                out.write_char('"')
            }
            Command::Subscribe { topic } => write!(out, "sub {}\"", topic),
            Command::Ack { id } => write!(out, "ack {}", id),
            Command::WiFi { ssid, password } => write!(out, "wifi \"{}\" \"{}\"", ssid, password),
            Command::MqttApp { project, group } => write!(out, "mqtt-app {}/{}", project, group),
            Command::DateTime { timezone } => {
                write!(out, "date-time {} {}", timezone, DATE_TIME_REFRESH)
            }
            Command::Device => out.write_str("device"),
            Command::ConnectionStatus => out.write_str("connection-status"),
        }
    }
}

/// One inbound line split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    /// Everything before the first space.
    pub topic: &'a str,
    /// Message body.
    pub content: &'a str,
    /// Trailing transmission id, `"0"` when absent.
    pub transmission_id: &'a str,
}

/// Split an inbound line into topic, content and transmission id.
///
/// A trailing id is recognized when a space occurs within the last four bytes
/// of the line, after the topic separator. With `transmission_control` on, the
/// id is cut from the content; otherwise the content runs to the end of the
/// line and the id is still reported.
pub fn parse_frame(line: &str, transmission_control: bool) -> Frame<'_> {
    let Some(content_idx) = line.find(' ') else {
        return Frame {
            topic: line,
            content: "",
            transmission_id: NO_TRANSMISSION_ID,
        };
    };

    let tail_start = line.len().saturating_sub(4);
    let id_idx = line.as_bytes()[tail_start..]
        .iter()
        .position(|&b| b == b' ')
        .map(|pos| tail_start + pos)
        .filter(|&idx| idx > content_idx);

    let content = match id_idx {
        Some(idx) if transmission_control => &line[content_idx + 1..idx],
        _ => &line[content_idx + 1..],
    };

    let transmission_id = match id_idx {
        Some(idx) => {
            let rest = &line[idx + 1..];
            let end = rest.char_indices().nth(3).map_or(rest.len(), |(i, _)| i);
            &rest[..end]
        }
        None => NO_TRANSMISSION_ID,
    };

    Frame {
        topic: &line[..content_idx],
        content,
        transmission_id,
    }
}

/// Outcome of feeding one byte to a [`LineBuffer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// A complete line, terminator removed.
    Line(InboundLine),
    /// The line outgrew the buffer and was discarded.
    Overflow,
    /// A complete line was not valid UTF-8 and was discarded.
    Malformed,
}

/// Assembles inbound bytes into newline-delimited lines.
///
/// At most [`MAX_LINE_LEN`] bytes are buffered. When a line grows past that,
/// the buffered bytes are dropped, [`LineEvent::Overflow`] is reported once,
/// and the remainder of the line up to the next `\n` is skipped.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buffer: Vec<u8, MAX_LINE_LEN>,
    discarding: bool,
}

impl LineBuffer {
    /// An empty buffer.
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            discarding: false,
        }
    }

    /// Feed one byte. Returns an event when a line completes or overflows.
    pub fn push(&mut self, byte: u8) -> Option<LineEvent> {
        if byte == b'\n' {
            if self.discarding {
                self.discarding = false;
                return None;
            }
            let bytes = core::mem::take(&mut self.buffer);
            return Some(match String::from_utf8(bytes) {
                Ok(line) => LineEvent::Line(line),
                Err(_) => LineEvent::Malformed,
            });
        }

        if self.discarding {
            return None;
        }

        if self.buffer.push(byte).is_err() {
            self.buffer.clear();
            self.discarding = true;
            return Some(LineEvent::Overflow);
        }
        None
    }

    /// Number of bytes buffered for the current line.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether no bytes are buffered.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Drop any partial line.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }
}
