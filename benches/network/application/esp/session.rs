use criterion::{Criterion, Throughput};
use espnet::network::application::esp::{Options, Platform, Session};
use espnet::network::error::Error;
use espnet::network::{LinkConfig, Read, Serial, Write};
use std::collections::VecDeque;
use std::hint::black_box;

const LINES: usize = 50;

#[derive(Default)]
struct LoopbackSerial {
    rx: VecDeque<u8>,
}

impl Read for LoopbackSerial {
    type Error = ();
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let count = buf.len().min(self.rx.len());
        for (slot, byte) in buf.iter_mut().zip(self.rx.drain(..count)) {
            *slot = byte;
        }
        Ok(count)
    }
}

impl Write for LoopbackSerial {
    type Error = ();
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Serial for LoopbackSerial {
    fn redirect(&mut self, _config: &LinkConfig) -> Result<(), Error> {
        Ok(())
    }
}

#[derive(Default)]
struct ManualClock {
    now: u64,
}

impl Platform for ManualClock {
    fn millis(&self) -> u64 {
        self.now
    }

    fn pause(&mut self, ms: u32) {
        self.now += u64::from(ms);
    }

    fn random_in_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }
}

fn on_number(value: f64) {
    black_box(value);
}

fn setup_session() -> Session<LoopbackSerial, ManualClock> {
    let mut session = Session::new(
        LoopbackSerial::default(),
        ManualClock::default(),
        &Options::default(),
    );
    session
        .on_received_number_in_channel("compass", on_number)
        .expect("Failed to subscribe");
    for id in 0..LINES {
        let line = format!("n_compass {} {:03}\n", id, id);
        session.serial_mut().rx.extend(line.as_bytes());
    }
    session
}

pub fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");
    group.throughput(Throughput::Elements(LINES as u64));
    group.bench_function("ingest", |b| {
        b.iter_batched_ref(
            setup_session,
            |session| {
                black_box(session.ingest());
            },
            criterion::BatchSize::SmallInput,
        )
    });
    group.finish();
}

pub fn bench_ingest_and_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest_and_dispatch");
    group.throughput(Throughput::Elements(LINES as u64));
    group.bench_function("ingest_and_dispatch", |b| {
        b.iter_batched_ref(
            setup_session,
            |session| {
                session.platform_mut().pause(20);
                session.poll();
            },
            criterion::BatchSize::SmallInput,
        )
    });
    group.finish();
}
