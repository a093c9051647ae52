use criterion::{criterion_group, criterion_main};

mod mqtt;

criterion_group!(
    benches,
    mqtt::bench_encode_publish,
    mqtt::bench_decode_publish,
    mqtt::bench_reassemble,
    mqtt::bench_session_qos1
);
criterion_main!(benches);
