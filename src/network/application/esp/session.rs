//! The ESP gateway session.
//!
//! [`Session`] owns the serial transport, the platform services and all
//! protocol state. State is created lazily: the first operation that needs
//! the gateway routes the link with the configured default pins, announces
//! the project and group, and starts the bring-up sequence.
//!
//! Nothing runs in the background. The caller drives ingestion and the
//! periodic jobs by calling [`Session::poll`] from its main loop (or
//! [`Session::ingest`] and [`Session::run_jobs`] separately).

use core::fmt::Write as _;

use heapless::String;
use serde::Deserialize;

use super::bitmap::Bitmap;
use super::bring_up::{BringUp, ConnectionLevel, Interval, Phase};
use super::clock::{Clock, DEFAULT_TIMEZONE, utc_offset_descriptor};
use super::codec::{
    Command, LineBuffer, LineEvent, Topic, channel_topic, first_token, normalize, parse_frame,
    parse_leading_int, truncated,
};
use super::registry::{Handler, TopicRegistry, Updates};
use super::transport::SerialTransport;
use super::{
    BITMAP_TOPIC, CONNECTION_TOPIC, DATE_TIME_TOPIC, DEVICE_TOPIC, DISPATCH_INTERVAL_MS,
    ERROR_TOPIC, MAX_CREDENTIAL_LEN, MAX_DEVICE_LEN, MAX_INGEST_BYTES, NUMBER_TOPIC,
    STRING_TOPIC, SYSTEM_TOPIC_PREFIX, TRANSMISSION_CONTROL_TOPIC, UNKNOWN_DEVICE_VERSION,
    WAIT_POLL_INTERVAL_MS,
};
use crate::network::error::{Error, OVERFLOW_ERROR_CODE};
use crate::network::{LinkConfig, Serial};

/// Lowest randomly assigned project number.
const RANDOM_PROJECT_MIN: u32 = 111_111_111;
/// Highest randomly assigned project number.
const RANDOM_PROJECT_MAX: u32 = 999_999_999;
/// Group used when none is configured.
const DEFAULT_GROUP: &str = "1";

/// Board services the session depends on.
pub trait Platform {
    /// Monotonic milliseconds since boot.
    fn millis(&self) -> u64;

    /// Block for `ms` milliseconds.
    fn pause(&mut self, ms: u32);

    /// A random number in `min..=max`.
    fn random_in_range(&mut self, min: u32, max: u32) -> u32;

    /// Whether the code is running in a simulator without a real UART.
    /// Writes are suppressed when this returns `true`.
    fn is_simulator(&self) -> bool {
        false
    }
}

/// Session configuration.
///
/// Every field has a default, so a JSON document only needs the fields it
/// changes:
///
/// ```rust
/// use espnet::network::application::esp::Options;
///
/// let options = Options::from_json(r#"{"link":{"rx":2,"tx":1},"group":"7"}"#).unwrap();
/// assert_eq!(options.link.rx.0, 2);
/// assert_eq!(options.link.baud_rate, 9600);
/// assert_eq!(options.group, Some("7"));
/// assert!(options.transmission_control);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options<'a> {
    /// Link used when the session connects on its own.
    pub link: LinkConfig,
    /// Project name. A random nine-digit number is used when unset.
    #[serde(borrow)]
    pub project: Option<&'a str>,
    /// Group name. `"1"` is used when unset.
    #[serde(borrow)]
    pub group: Option<&'a str>,
    /// Initial transmission control setting. The gateway may change it.
    pub transmission_control: bool,
}

impl Default for Options<'_> {
    fn default() -> Self {
        Self {
            link: LinkConfig::default(),
            project: None,
            group: None,
            transmission_control: true,
        }
    }
}

impl<'a> Options<'a> {
    /// Parse options from a JSON document.
    pub fn from_json(json: &'a str) -> Result<Self, Error> {
        serde_json_core::from_str(json)
            .map(|(options, _)| options)
            .map_err(|_| Error::InvalidConfig)
    }
}

/// Owned copy of the [`Options`] a session was built with.
#[derive(Debug, Clone)]
struct Settings {
    link: LinkConfig,
    project: Option<Topic>,
    group: Option<Topic>,
    transmission_control: bool,
}

impl From<&Options<'_>> for Settings {
    fn from(options: &Options<'_>) -> Self {
        Self {
            link: options.link,
            project: options.project.map(normalize),
            group: options.group.map(normalize),
            transmission_control: options.transmission_control,
        }
    }
}

#[derive(Debug)]
struct EspState {
    project: Topic,
    group: Topic,
    ssid: String<MAX_CREDENTIAL_LEN>,
    password: String<MAX_CREDENTIAL_LEN>,
    connection: ConnectionLevel,
    last_error: i32,
    device: String<MAX_DEVICE_LEN>,
    transmission_control: bool,
    registry: TopicRegistry,
    clock: Option<Clock>,
    bring_up: BringUp,
    dispatch: Interval,
    line_buffer: LineBuffer,
}

impl EspState {
    fn new<P: Platform>(settings: &Settings, platform: &mut P) -> Self {
        let project = match &settings.project {
            Some(project) => project.clone(),
            None => {
                let number = platform.random_in_range(RANDOM_PROJECT_MIN, RANDOM_PROJECT_MAX);
                let mut project = Topic::new();
                // Fits: at most ten digits.
                let _ = write!(project, "{}", number);
                project
            }
        };
        let group = settings.group.clone().unwrap_or_else(|| truncated(DEFAULT_GROUP));

        Self {
            project,
            group,
            ssid: String::new(),
            password: String::new(),
            connection: ConnectionLevel::None,
            last_error: 0,
            device: truncated(UNKNOWN_DEVICE_VERSION),
            transmission_control: settings.transmission_control,
            registry: TopicRegistry::new(),
            clock: None,
            bring_up: BringUp::new(),
            dispatch: Interval::starting_at(platform.millis(), DISPATCH_INTERVAL_MS),
            line_buffer: LineBuffer::new(),
        }
    }
}

/// A client session with the ESP gateway.
#[derive(Debug)]
pub struct Session<S, P> {
    transport: SerialTransport<S>,
    platform: P,
    settings: Settings,
    state: Option<EspState>,
}

/// Mutable view over an established session.
struct Active<'s, S, P> {
    state: &'s mut EspState,
    transport: &'s mut SerialTransport<S>,
    platform: &'s mut P,
}

fn send<S: Serial>(transport: &mut SerialTransport<S>, command: &Command<'_>) {
    if let Err(e) = transport.send(command) {
        error!("failed to send command: {}", e);
    }
}

impl<S: Serial, P: Platform> Active<'_, S, P> {
    fn send(&mut self, command: &Command<'_>) {
        send(self.transport, command);
    }

    fn announce_project_group(&mut self) {
        send(
            self.transport,
            &Command::MqttApp {
                project: &self.state.project,
                group: &self.state.group,
            },
        );
    }

    fn announce_wifi(&mut self) {
        send(
            self.transport,
            &Command::WiFi {
                ssid: &self.state.ssid,
                password: &self.state.password,
            },
        );
    }

    fn request_date_time(&mut self) {
        if let Some(clock) = &self.state.clock {
            send(
                self.transport,
                &Command::DateTime {
                    timezone: clock.timezone(),
                },
            );
        }
    }

    /// Create the clock if needed, and ask for a report while unsynced.
    fn init_clock(&mut self) -> &Clock {
        let synced = self
            .state
            .clock
            .get_or_insert_with(|| Clock::new(DEFAULT_TIMEZONE))
            .is_synced();
        if !synced {
            self.request_date_time();
        }
        self.state.clock.get_or_insert_with(|| Clock::new(DEFAULT_TIMEZONE))
    }

    fn set_connection(&mut self, value: &str) {
        match parse_leading_int(first_token(value)).and_then(ConnectionLevel::from_code) {
            Some(level) => {
                if level != self.state.connection {
                    info!("connection level {} -> {}", self.state.connection, level);
                }
                self.state.connection = level;
            }
            None => warn!("ignoring unknown connection level"),
        }
    }

    fn set_last_error(&mut self, value: &str) {
        match parse_leading_int(first_token(value)) {
            Some(code) => {
                if code != 0 {
                    warn!("gateway reported error {}", code);
                }
                self.state.last_error = code;
            }
            None => warn!("ignoring unparseable error code"),
        }
    }

    /// Apply a frame to system state and stage it on matching subscriptions.
    /// Returns whether the topic was expected.
    fn apply_topic_update(&mut self, topic: &str, value: &str) -> bool {
        let mut expected = false;

        if topic.starts_with(SYSTEM_TOPIC_PREFIX) {
            expected = true;
            match topic {
                CONNECTION_TOPIC => self.set_connection(value),
                ERROR_TOPIC => self.set_last_error(value),
                DEVICE_TOPIC => {
                    self.state.device = truncated(first_token(value));
                    debug!("gateway firmware {}", self.state.device.as_str());
                }
                TRANSMISSION_CONTROL_TOPIC => self.state.transmission_control = value == "1",
                DATE_TIME_TOPIC => {
                    let now = self.platform.millis();
                    if let Some(clock) = self.state.clock.as_mut() {
                        clock.apply_sync(value, now);
                    }
                }
                _ => debug!("unhandled system topic {}", topic),
            }
        }

        if self.state.registry.stage(topic, value) {
            expected = true;
        }
        expected
    }

    fn process_line(&mut self, line: &str) {
        let frame = parse_frame(line, self.state.transmission_control);
        let expected = self.apply_topic_update(frame.topic, frame.content);

        if !expected {
            trace!("dropping line on {}", frame.topic);
        } else if self.state.transmission_control {
            self.send(&Command::Ack {
                id: frame.transmission_id,
            });
        }
    }

    fn handle_overflow(&mut self) {
        warn!("inbound line exceeded buffer, discarding");
        self.state.registry.stage(ERROR_TOPIC, "71");
        self.state.last_error = OVERFLOW_ERROR_CODE;
    }

    fn ingest(&mut self) -> usize {
        let mut chunk = [0u8; 32];
        let mut total = 0;

        while total < MAX_INGEST_BYTES {
            let want = chunk.len().min(MAX_INGEST_BYTES - total);
            let read = match self.transport.read(&mut chunk[..want]) {
                Ok(0) => break,
                Ok(n) => n.min(want),
                Err(e) => {
                    warn!("read failed: {}", e);
                    break;
                }
            };
            total += read;

            for &byte in &chunk[..read] {
                match self.state.line_buffer.push(byte) {
                    Some(LineEvent::Line(line)) => self.process_line(&line),
                    Some(LineEvent::Overflow) => self.handle_overflow(),
                    Some(LineEvent::Malformed) => debug!("dropping non-UTF-8 line"),
                    None => {}
                }
            }
        }
        total
    }

    fn run_jobs(&mut self) -> Updates {
        let now = self.platform.millis();

        let updates = if self.state.dispatch.poll(now) {
            self.state.registry.take_updates()
        } else {
            Updates::new()
        };

        let device_known = self.state.device != UNKNOWN_DEVICE_VERSION;
        if let Some(command) = self
            .state
            .bring_up
            .tick(now, device_known, self.state.connection)
        {
            self.send(&command);
        }
        updates
    }
}

impl<S: Serial, P: Platform> Session<S, P> {
    /// Create a session. Nothing is sent until the first operation that
    /// needs the gateway.
    pub fn new(serial: S, platform: P, options: &Options<'_>) -> Self {
        let simulated = platform.is_simulator();
        Self {
            transport: SerialTransport::new(serial, simulated),
            platform,
            settings: Settings::from(options),
            state: None,
        }
    }

    fn active(&mut self) -> Active<'_, S, P> {
        let Self {
            transport,
            platform,
            settings,
            state,
        } = self;
        let state = state.get_or_insert_with(|| EspState::new(settings, platform));
        Active {
            state,
            transport,
            platform,
        }
    }

    fn ensure_connected(&mut self) -> Active<'_, S, P> {
        if self.state.is_none() {
            self.connect(self.settings.link);
        }
        self.active()
    }

    /// Connect to the gateway on the pins in `link`.
    ///
    /// Rerouting only happens when the pins differ from the current link.
    /// The first connect also creates the session state, reports
    /// [`ConnectionLevel::None`] to connection subscribers and starts the
    /// bring-up polls. Every connect re-announces the project and group,
    /// and the WiFi credentials if any were set.
    pub fn connect(&mut self, link: LinkConfig) {
        if let Err(e) = self.transport.establish(&link) {
            error!("link setup failed: {}", e);
        }

        let created = self.state.is_none();
        let mut active = self.active();
        if created {
            active.apply_topic_update(CONNECTION_TOPIC, "0");
            let now = active.platform.millis();
            active.state.bring_up.start(now);
        }

        active.announce_project_group();
        if !active.state.ssid.is_empty() {
            active.announce_wifi();
        }
    }

    /// Connect on the link from the session options.
    pub fn connect_default(&mut self) {
        self.connect(self.settings.link);
    }

    /// Set the WiFi credentials and send them to the gateway.
    pub fn connect_wifi(&mut self, ssid: &str, password: &str) {
        let mut active = self.ensure_connected();
        active.state.ssid = truncated(ssid);
        active.state.password = truncated(password);
        active.announce_wifi();
    }

    /// Set the project and group and announce them to the gateway. Both
    /// are normalized.
    pub fn connect_project_group(&mut self, project: &str, group: &str) {
        let mut active = self.ensure_connected();
        active.state.project = normalize(project);
        active.state.group = normalize(group);
        active.announce_project_group();
    }

    fn publish(&mut self, topic: &str, value: &str) {
        self.ensure_connected()
            .send(&Command::Publish { topic, value });
    }

    /// Broadcast a string.
    pub fn send_string(&mut self, value: &str) {
        self.publish(STRING_TOPIC, value);
    }

    /// Broadcast a string on `channel`.
    pub fn send_string_to_channel(&mut self, value: &str, channel: &str) {
        self.publish(&channel_topic(STRING_TOPIC, channel), value);
    }

    /// Broadcast a number, rounded to two decimals.
    pub fn send_number(&mut self, value: f64) {
        self.publish(NUMBER_TOPIC, &format_number(round_hundredths(value)));
    }

    /// Broadcast a number on `channel`, rounded to two decimals.
    pub fn send_number_to_channel(&mut self, value: f64, channel: &str) {
        let topic = channel_topic(NUMBER_TOPIC, channel);
        self.publish(&topic, &format_number(round_hundredths(value)));
    }

    /// Broadcast a bitmap.
    pub fn send_bitmap(&mut self, bitmap: &Bitmap) {
        self.publish(BITMAP_TOPIC, &format_bitmap(bitmap));
    }

    /// Broadcast a bitmap on `channel`.
    pub fn send_bitmap_to_channel(&mut self, bitmap: &Bitmap, channel: &str) {
        let topic = channel_topic(BITMAP_TOPIC, channel);
        self.publish(&topic, &format_bitmap(bitmap));
    }

    fn register(&mut self, topic: &str, handler: Handler, forward: bool) -> Result<(), Error> {
        let mut active = self.ensure_connected();
        active.state.registry.subscribe(topic, handler)?;
        debug!("subscribed to {}", topic);
        if forward {
            active.send(&Command::Subscribe { topic });
        }
        Ok(())
    }

    /// Call `handler` with every string received.
    pub fn on_received_string(&mut self, handler: fn(&str)) -> Result<(), Error> {
        self.register(STRING_TOPIC, Handler::String(handler), true)
    }

    /// Call `handler` with every string received on `channel`.
    pub fn on_received_string_in_channel(
        &mut self,
        channel: &str,
        handler: fn(&str),
    ) -> Result<(), Error> {
        let topic = channel_topic(STRING_TOPIC, channel);
        self.register(&topic, Handler::String(handler), true)
    }

    /// Call `handler` with every number received. Payloads that do not
    /// parse arrive as NaN.
    pub fn on_received_number(&mut self, handler: fn(f64)) -> Result<(), Error> {
        self.register(NUMBER_TOPIC, Handler::Number(handler), true)
    }

    /// Call `handler` with every number received on `channel`.
    pub fn on_received_number_in_channel(
        &mut self,
        channel: &str,
        handler: fn(f64),
    ) -> Result<(), Error> {
        let topic = channel_topic(NUMBER_TOPIC, channel);
        self.register(&topic, Handler::Number(handler), true)
    }

    /// Call `handler` with every bitmap received.
    pub fn on_received_bitmap(&mut self, handler: fn(Bitmap)) -> Result<(), Error> {
        self.register(BITMAP_TOPIC, Handler::Bitmap(handler), true)
    }

    /// Call `handler` with every bitmap received on `channel`.
    pub fn on_received_bitmap_in_channel(
        &mut self,
        channel: &str,
        handler: fn(Bitmap),
    ) -> Result<(), Error> {
        let topic = channel_topic(BITMAP_TOPIC, channel);
        self.register(&topic, Handler::Bitmap(handler), true)
    }

    /// Call `handler` whenever the gateway reports a connection level.
    pub fn on_connection(&mut self, handler: fn()) -> Result<(), Error> {
        self.register(CONNECTION_TOPIC, Handler::Void(handler), false)
    }

    /// Call `handler` whenever an error is reported.
    pub fn on_error(&mut self, handler: fn()) -> Result<(), Error> {
        self.register(ERROR_TOPIC, Handler::Void(handler), false)
    }

    /// Whether the gateway has reached `level`.
    ///
    /// Always `true` for [`ConnectionLevel::None`] and `false` before the
    /// session has connected. Otherwise the session is polled once first,
    /// so calling this in a tight loop still makes progress.
    pub fn is_connected(&mut self, level: ConnectionLevel) -> bool {
        if level == ConnectionLevel::None {
            return true;
        }
        if self.state.is_none() {
            return false;
        }
        self.poll();
        self.connection() >= level
    }

    /// Block until the gateway reaches `level`. There is no timeout.
    pub fn wait_for_connection(&mut self, level: ConnectionLevel) {
        self.ensure_connected();
        while !self.is_connected(level) {
            self.platform.pause(WAIT_POLL_INTERVAL_MS);
        }
    }

    /// Last reported connection level.
    pub fn connection(&self) -> ConnectionLevel {
        self.state
            .as_ref()
            .map_or(ConnectionLevel::None, |state| state.connection)
    }

    /// Last reported error code, 0 if none.
    pub fn last_error(&self) -> i32 {
        self.state.as_ref().map_or(0, |state| state.last_error)
    }

    /// Gateway firmware version, `"0.0.0"` until reported.
    pub fn device(&self) -> &str {
        self.state
            .as_ref()
            .map_or(UNKNOWN_DEVICE_VERSION, |state| state.device.as_str())
    }

    /// Current local time as `HH:MM:SS`, `00:00:00` until synced.
    pub fn time(&mut self) -> String<8> {
        let mut active = self.ensure_connected();
        let now = active.platform.millis();
        active.init_clock().time_at(now)
    }

    /// Date of the last report as `YYYY-MM-DD`, `0000-00-00` until synced.
    pub fn date(&mut self) -> String<10> {
        truncated(self.ensure_connected().init_clock().date())
    }

    /// Weekday of the last report, 0 is Sunday.
    pub fn weekday(&mut self) -> u8 {
        self.ensure_connected().init_clock().weekday()
    }

    /// Use `timezone` (a POSIX TZ descriptor, see
    /// [`TimeZone::posix`](super::clock::TimeZone::posix)) and request a
    /// fresh report.
    pub fn set_time_zone(&mut self, timezone: &str) {
        let mut active = self.ensure_connected();
        active
            .state
            .clock
            .get_or_insert_with(|| Clock::new(timezone))
            .set_timezone(timezone);
        active.request_date_time();
    }

    /// Use a fixed offset from UTC and request a fresh report.
    pub fn set_time_zone_with_utc_offset(&mut self, hours: i32, minutes: i32) {
        self.set_time_zone(&utc_offset_descriptor(hours, minutes));
    }

    /// Read every available byte, then run the due jobs and deliver their
    /// updates.
    pub fn poll(&mut self) {
        self.service().deliver();
    }

    /// Like [`poll`](Self::poll), but return the updates instead of
    /// delivering them. Does nothing before the session has connected.
    pub fn service(&mut self) -> Updates {
        if self.state.is_none() {
            return Updates::new();
        }
        let mut active = self.active();
        active.ingest();
        active.run_jobs()
    }

    /// Read and process buffered input. Returns the number of bytes consumed.
    ///
    /// Frames only update state and stage values; no handler runs here.
    pub fn ingest(&mut self) -> usize {
        if self.state.is_none() {
            return 0;
        }
        self.active().ingest()
    }

    /// Run the dispatch and bring-up jobs that are due.
    pub fn run_jobs(&mut self) -> Updates {
        if self.state.is_none() {
            return Updates::new();
        }
        self.active().run_jobs()
    }

    /// Whether the session state has been created.
    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// Current project name, once connected.
    pub fn project(&self) -> Option<&str> {
        self.state.as_ref().map(|state| state.project.as_str())
    }

    /// Current group name, once connected.
    pub fn group(&self) -> Option<&str> {
        self.state.as_ref().map(|state| state.group.as_str())
    }

    /// Whether inbound frames are acknowledged.
    pub fn transmission_control(&self) -> bool {
        self.state
            .as_ref()
            .map_or(self.settings.transmission_control, |state| {
                state.transmission_control
            })
    }

    /// Number of registered subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.state.as_ref().map_or(0, |state| state.registry.len())
    }

    /// Bring-up progress.
    pub fn bring_up_phase(&self) -> Phase {
        self.state
            .as_ref()
            .map_or(Phase::Idle, |state| state.bring_up.phase())
    }

    /// Current link routing.
    pub fn link(&self) -> Option<&LinkConfig> {
        self.transport.link()
    }

    /// Access the serial port.
    pub fn serial(&self) -> &S {
        self.transport.serial()
    }

    /// Mutable access to the serial port.
    pub fn serial_mut(&mut self) -> &mut S {
        self.transport.serial_mut()
    }

    /// Access the platform.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Mutable access to the platform.
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }
}

/// Round half up to two decimals. Values that are not finite or too large
/// to carry a fractional part pass through.
fn round_hundredths(value: f64) -> f64 {
    if !value.is_finite() || value >= 1e15 || value <= -1e15 {
        return value;
    }
    let scaled = value * 100.0 + 0.5;
    let whole = scaled as i64;
    let floor = if whole as f64 > scaled { whole - 1 } else { whole };
    floor as f64 / 100.0
}

fn format_number(value: f64) -> String<32> {
    let mut text = String::new();
    // Fits: exponent notation from 1e21, at most 22 digits below.
    let _ = if value == f64::INFINITY {
        text.write_str("Infinity")
    } else if value == f64::NEG_INFINITY {
        text.write_str("-Infinity")
    } else if value >= 1e21 || value <= -1e21 {
        write!(text, "{:e}", value)
    } else {
        write!(text, "{}", value)
    };
    text
}

fn format_bitmap(bitmap: &Bitmap) -> String<16> {
    let mut text = String::new();
    // Fits: at most eight digits.
    let _ = write!(text, "{}", bitmap.encode());
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_hundredths() {
        assert_eq!(round_hundredths(3.14159), 3.14);
        assert_eq!(round_hundredths(0.125), 0.13);
        assert_eq!(round_hundredths(42.0), 42.0);
        assert_eq!(round_hundredths(-1.234), -1.23);
        assert_eq!(round_hundredths(-0.004), 0.0);
        assert!(round_hundredths(-0.004).is_sign_positive());
        assert!(round_hundredths(f64::NAN).is_nan());
        assert_eq!(round_hundredths(1e16), 1e16);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(21.5), "21.5");
        assert_eq!(format_number(-0.25), "-0.25");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(1e22), "1e22");
    }

    #[test]
    fn test_format_bitmap() {
        let mut bitmap = Bitmap::new();
        bitmap.set_pixel(4, 4, true);
        assert_eq!(format_bitmap(&bitmap), "1");
    }

    #[test]
    fn test_options_defaults() {
        let options = Options::default();
        assert_eq!(options.link, LinkConfig::default());
        assert_eq!(options.project, None);
        assert!(options.transmission_control);

        let settings = Settings::from(&Options {
            project: Some("my project"),
            ..Options::default()
        });
        assert_eq!(settings.project.as_deref(), Some("myproject"));
    }

    #[test]
    fn test_options_from_json() {
        let options = Options::from_json(r#"{"project":"abc","transmission_control":false}"#).unwrap();
        assert_eq!(options.project, Some("abc"));
        assert!(!options.transmission_control);
        assert_eq!(options.link, LinkConfig::default());

        assert_eq!(Options::from_json("{"), Err(Error::InvalidConfig));
        assert_eq!(Options::from_json(r#"{"link":{"rx":"x"}}"#), Err(Error::InvalidConfig));
    }
}
