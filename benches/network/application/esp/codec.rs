use criterion::{Criterion, Throughput};
use espnet::network::application::esp::{LineBuffer, LineEvent, parse_frame};
use std::hint::black_box;

const FRAMES: [&str; 4] = [
    "n_compass 42 007",
    "s_chat see you at the usual place 113",
    "$ESP/date-time 2024-05-01 10:00:00 3 001",
    "$ESP/connection 4",
];

fn stream(repeat: usize) -> Vec<u8> {
    let mut bytes = Vec::new();
    for _ in 0..repeat {
        for frame in FRAMES {
            bytes.extend_from_slice(frame.as_bytes());
            bytes.push(b'\n');
        }
    }
    bytes
}

pub fn bench_parse_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_frame");
    let bytes: usize = FRAMES.iter().map(|frame| frame.len()).sum();
    group.throughput(Throughput::Bytes(bytes as u64));
    group.bench_function("parse_frame", |b| {
        b.iter(|| {
            for frame in FRAMES {
                black_box(parse_frame(black_box(frame), true));
            }
        })
    });
    group.finish();
}

pub fn bench_line_buffer(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_buffer");
    let input = stream(16);
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("assemble_lines", |b| {
        b.iter_batched_ref(
            LineBuffer::new,
            |buffer| {
                let mut lines = 0;
                for &byte in &input {
                    if let Some(LineEvent::Line(line)) = buffer.push(byte) {
                        black_box(&line);
                        lines += 1;
                    }
                }
                assert_eq!(lines, FRAMES.len() * 16);
            },
            criterion::BatchSize::SmallInput,
        )
    });
    group.finish();
}
