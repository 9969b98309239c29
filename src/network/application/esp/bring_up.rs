//! Connection levels and the gateway bring-up sequence.
//!
//! After the link comes up the gateway may still be booting, joining WiFi or
//! reaching the broker. [`BringUp`] polls it until it has identified itself,
//! then polls the connection level until it is above [`ConnectionLevel::None`],
//! then stops. Each phase is driven by an [`Interval`] that the session ticks
//! from its job scheduler.

use core::fmt;

use super::codec::Command;
use super::{CONNECTION_POLL_INTERVAL_MS, DEVICE_POLL_INTERVAL_MS};

/// How far the gateway has come in reaching the network.
///
/// Levels are reported by the gateway and passed through as-is; they may go
/// down as well as up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum ConnectionLevel {
    /// No gateway response yet.
    #[default]
    None = 0,
    /// The gateway is talking to us.
    Esp = 1,
    /// The gateway has joined WiFi.
    WiFi = 2,
    /// The gateway can reach the internet.
    Internet = 3,
    /// The gateway is subscribed to this device's project and group.
    ProjectGroup = 4,
}

impl ConnectionLevel {
    /// Map a numeric level reported by the gateway.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Esp),
            2 => Some(Self::WiFi),
            3 => Some(Self::Internet),
            4 => Some(Self::ProjectGroup),
            _ => None,
        }
    }

    /// Numeric level as used on the wire.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ConnectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionLevel::None => "none",
            ConnectionLevel::Esp => "esp",
            ConnectionLevel::WiFi => "wifi",
            ConnectionLevel::Internet => "internet",
            ConnectionLevel::ProjectGroup => "project-group",
        };
        f.write_str(name)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConnectionLevel {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ConnectionLevel::None => defmt::write!(f, "none"),
            ConnectionLevel::Esp => defmt::write!(f, "esp"),
            ConnectionLevel::WiFi => defmt::write!(f, "wifi"),
            ConnectionLevel::Internet => defmt::write!(f, "internet"),
            ConnectionLevel::ProjectGroup => defmt::write!(f, "project-group"),
        }
    }
}

/// A repeating timer on the monotonic millisecond clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Interval {
    period_ms: u32,
    next_due_ms: u64,
}

impl Interval {
    /// A timer that first fires one `period_ms` after `now`.
    pub const fn starting_at(now: u64, period_ms: u32) -> Self {
        Self {
            period_ms,
            next_due_ms: now + period_ms as u64,
        }
    }

    /// Timer period.
    pub const fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Returns `true` if the timer is due at `now`, and reschedules it one
    /// period after `now`. Missed periods are not replayed.
    pub fn poll(&mut self, now: u64) -> bool {
        if now < self.next_due_ms {
            return false;
        }
        self.next_due_ms = now + u64::from(self.period_ms);
        true
    }
}

/// Bring-up progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Not started.
    #[default]
    Idle,
    /// Requesting the firmware version until the gateway reports one.
    PollingDevice,
    /// Requesting the connection level until it is above `None`.
    PollingConnection,
    /// Finished; nothing left to poll.
    Done,
}

/// The two-phase device/connection polling sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BringUp {
    phase: Phase,
    timer: Option<Interval>,
}

impl BringUp {
    /// A sequence that has not started.
    pub const fn new() -> Self {
        Self {
            phase: Phase::Idle,
            timer: None,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Start device polling. The first request goes out one device period
    /// after `now`.
    pub fn start(&mut self, now: u64) {
        debug!("bring-up: polling device");
        self.phase = Phase::PollingDevice;
        self.timer = Some(Interval::starting_at(now, DEVICE_POLL_INTERVAL_MS));
    }

    /// Advance the sequence at `now`.
    ///
    /// Guards are evaluated only when the current phase's timer is due. Returns
    /// the request to send, if any.
    pub fn tick(
        &mut self,
        now: u64,
        device_known: bool,
        level: ConnectionLevel,
    ) -> Option<Command<'static>> {
        let timer = self.timer.as_mut()?;
        if !timer.poll(now) {
            return None;
        }

        match self.phase {
            Phase::PollingDevice if !device_known => Some(Command::Device),
            Phase::PollingDevice => {
                debug!("bring-up: device known, polling connection");
                self.phase = Phase::PollingConnection;
                self.timer = Some(Interval::starting_at(now, CONNECTION_POLL_INTERVAL_MS));
                None
            }
            Phase::PollingConnection if level <= ConnectionLevel::None => {
                Some(Command::ConnectionStatus)
            }
            Phase::PollingConnection => {
                info!("bring-up complete at level {}", level);
                self.phase = Phase::Done;
                self.timer = None;
                None
            }
            Phase::Idle | Phase::Done => {
                self.timer = None;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_codes() {
        for code in 0..=4 {
            let level = ConnectionLevel::from_code(code).unwrap();
            assert_eq!(i32::from(level.code()), code);
        }
        assert_eq!(ConnectionLevel::from_code(5), None);
        assert_eq!(ConnectionLevel::from_code(-1), None);
        assert!(ConnectionLevel::None < ConnectionLevel::Esp);
        assert!(ConnectionLevel::Internet < ConnectionLevel::ProjectGroup);
    }

    #[test]
    fn test_interval() {
        let mut interval = Interval::starting_at(100, 20);
        assert!(!interval.poll(100));
        assert!(!interval.poll(119));
        assert!(interval.poll(120));
        assert!(!interval.poll(121));
        // Late polls do not replay missed periods.
        assert!(interval.poll(500));
        assert!(!interval.poll(519));
        assert!(interval.poll(520));
    }

    #[test]
    fn test_idle_does_nothing() {
        let mut bring_up = BringUp::new();
        assert_eq!(bring_up.tick(10_000, false, ConnectionLevel::None), None);
        assert_eq!(bring_up.phase(), Phase::Idle);
    }

    #[test]
    fn test_full_sequence() {
        let mut bring_up = BringUp::new();
        bring_up.start(0);

        assert_eq!(bring_up.tick(999, false, ConnectionLevel::None), None);
        assert_eq!(bring_up.tick(1000, false, ConnectionLevel::None), Some(Command::Device));
        assert_eq!(bring_up.tick(2000, false, ConnectionLevel::None), Some(Command::Device));

        // Device reported; the switch happens on the next due tick.
        assert_eq!(bring_up.tick(2500, true, ConnectionLevel::None), None);
        assert_eq!(bring_up.phase(), Phase::PollingDevice);
        assert_eq!(bring_up.tick(3000, true, ConnectionLevel::None), None);
        assert_eq!(bring_up.phase(), Phase::PollingConnection);

        assert_eq!(bring_up.tick(4149, true, ConnectionLevel::None), None);
        assert_eq!(
            bring_up.tick(4150, true, ConnectionLevel::None),
            Some(Command::ConnectionStatus)
        );
        assert_eq!(bring_up.tick(5300, true, ConnectionLevel::WiFi), None);
        assert_eq!(bring_up.phase(), Phase::Done);
        assert_eq!(bring_up.tick(100_000, true, ConnectionLevel::None), None);
    }
}
