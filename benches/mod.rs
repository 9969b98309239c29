use criterion::{criterion_group, criterion_main};

mod network;

criterion_group!(
    benches,
    network::application::esp::codec::bench_parse_frame,
    network::application::esp::codec::bench_line_buffer,
    network::application::esp::session::bench_ingest,
    network::application::esp::session::bench_ingest_and_dispatch
);
criterion_main!(benches);
