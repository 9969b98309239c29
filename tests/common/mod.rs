#![allow(dead_code)]

use espnet::network::application::esp::{Bitmap, Options, Platform, Session};
use espnet::network::error::Error;
use espnet::network::{LinkConfig, Read, Serial, Write};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// Project number handed out by [`MockPlatform::random_in_range`].
pub const PROJECT: u32 = 123_456_789;

/// Monotonic clock shared between the mock platform and the mock UART.
pub type SharedClock = Rc<Cell<u64>>;

/// A UART that records everything written and replays queued input.
///
/// Input can be queued immediately or scheduled to become readable once the
/// shared clock reaches a given time.
#[derive(Debug, Default)]
pub struct MockSerial {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
    scheduled: Vec<(u64, Vec<u8>)>,
    redirects: Vec<LinkConfig>,
    clock: SharedClock,
}

impl MockSerial {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            clock,
            ..Self::default()
        }
    }

    /// Queue raw bytes for reading.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes);
    }

    /// Queue one line for reading; the terminator is added.
    pub fn feed_line(&mut self, line: &str) {
        self.feed(line.as_bytes());
        self.feed(b"\n");
    }

    /// Make `line` readable once the clock reaches `at`.
    pub fn schedule_line(&mut self, at: u64, line: &str) {
        let mut bytes = line.as_bytes().to_vec();
        bytes.push(b'\n');
        self.scheduled.push((at, bytes));
    }

    /// Bytes still waiting to be read.
    pub fn pending_input(&self) -> usize {
        self.rx.len()
    }

    /// Every link configuration the port was routed with.
    pub fn redirects(&self) -> &[LinkConfig] {
        &self.redirects
    }

    /// Complete lines written so far, without terminators.
    pub fn lines(&self) -> Vec<String> {
        let text = String::from_utf8_lossy(&self.tx);
        text.split_terminator('\n').map(str::to_string).collect()
    }

    /// Like [`lines`](Self::lines), but also forgets them.
    pub fn take_lines(&mut self) -> Vec<String> {
        let lines = self.lines();
        self.tx.clear();
        lines
    }

    fn release_due(&mut self) {
        let now = self.clock.get();
        let mut index = 0;
        while index < self.scheduled.len() {
            if self.scheduled[index].0 <= now {
                let (_, bytes) = self.scheduled.remove(index);
                self.rx.extend(bytes);
            } else {
                index += 1;
            }
        }
    }
}

impl Read for MockSerial {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.release_due();
        let count = buf.len().min(self.rx.len());
        for (slot, byte) in buf.iter_mut().zip(self.rx.drain(..count)) {
            *slot = byte;
        }
        Ok(count)
    }
}

impl Write for MockSerial {
    type Error = ();

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.tx.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Serial for MockSerial {
    fn redirect(&mut self, config: &LinkConfig) -> Result<(), Error> {
        self.redirects.push(*config);
        Ok(())
    }
}

/// Board services driven by a manual clock.
#[derive(Debug, Default)]
pub struct MockPlatform {
    clock: SharedClock,
    pauses: Vec<u32>,
    simulator: bool,
}

impl MockPlatform {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            clock,
            ..Self::default()
        }
    }

    pub fn simulator(clock: SharedClock) -> Self {
        Self {
            clock,
            simulator: true,
            ..Self::default()
        }
    }

    /// Move the clock forward.
    pub fn advance(&mut self, ms: u64) {
        self.clock.set(self.clock.get() + ms);
    }

    /// Every pause requested so far.
    pub fn pauses(&self) -> &[u32] {
        &self.pauses
    }
}

impl Platform for MockPlatform {
    fn millis(&self) -> u64 {
        self.clock.get()
    }

    fn pause(&mut self, ms: u32) {
        self.pauses.push(ms);
        self.advance(u64::from(ms));
    }

    fn random_in_range(&mut self, min: u32, max: u32) -> u32 {
        PROJECT.clamp(min, max)
    }

    fn is_simulator(&self) -> bool {
        self.simulator
    }
}

pub type TestSession = Session<MockSerial, MockPlatform>;

/// A session with default options on a fresh clock.
pub fn session() -> TestSession {
    session_with(&Options::default())
}

pub fn session_with(options: &Options<'_>) -> TestSession {
    let clock = SharedClock::default();
    Session::new(
        MockSerial::new(clock.clone()),
        MockPlatform::new(clock),
        options,
    )
}

/// A session that has already connected, with the connect traffic cleared.
pub fn connected_session() -> TestSession {
    let mut session = session();
    session.connect_default();
    session.serial_mut().take_lines();
    session
}

/// Feed `line`, let one dispatch period pass and deliver.
pub fn receive(session: &mut TestSession, line: &str) {
    session.serial_mut().feed_line(line);
    session.platform_mut().advance(20);
    session.poll();
}

// Handlers are plain `fn`s, so they report through thread-local buffers.
// Every test runs on its own thread.
thread_local! {
    static RECEIVED: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

fn record(entry: String) {
    RECEIVED.with(|received| received.borrow_mut().push(entry));
}

/// Everything the recording handlers saw since the last call.
pub fn take_received() -> Vec<String> {
    RECEIVED.with(|received| received.borrow_mut().drain(..).collect())
}

pub fn record_string(value: &str) {
    record(format!("string:{value}"));
}

pub fn record_number(value: f64) {
    record(format!("number:{value}"));
}

pub fn record_bitmap(bitmap: Bitmap) {
    record(format!("bitmap:{}", bitmap.encode()));
}

pub fn record_connection() {
    record("connection".to_string());
}

pub fn record_error() {
    record("error".to_string());
}
