use criterion::{BatchSize, Criterion, Throughput};
use libmqtt::mqtt::packet::Publish;
use libmqtt::mqtt::{ConnectOptions, Packet, QoS, Reassembler, Session};
use std::hint::black_box;

fn publish(payload_len: usize) -> Packet {
    Packet::Publish(Publish {
        dup: false,
        qos: QoS::AtLeastOnce,
        retain: false,
        topic: "libmqtt/bench-topic".into(),
        packet_id: Some(42),
        payload: vec![0xA5; payload_len],
    })
}

pub fn bench_encode_publish(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_publish");
    for len in [16usize, 1024] {
        let packet = publish(len);
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_function(format!("{}B", len), |b| {
            b.iter(|| black_box(&packet).encode().expect("Failed to encode"))
        });
    }
    group.finish();
}

pub fn bench_decode_publish(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_publish");
    for len in [16usize, 1024] {
        let bytes = publish(len).encode().expect("Failed to encode");
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_function(format!("{}B", len), |b| {
            b.iter(|| Packet::decode(black_box(&bytes)).expect("Failed to decode"))
        });
    }
    group.finish();
}

pub fn bench_reassemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("reassemble");
    let stream: Vec<u8> = (0..50)
        .flat_map(|_| publish(200).encode().expect("Failed to encode"))
        .collect();
    group.throughput(Throughput::Bytes(stream.len() as u64));
    for chunk in [1usize, 64] {
        group.bench_function(format!("chunk_{}", chunk), |b| {
            b.iter(|| {
                let mut framer: Reassembler = Reassembler::new();
                let mut frames = 0;
                for delivery in stream.chunks(chunk) {
                    let mut rest = delivery;
                    while !rest.is_empty() {
                        let used = framer.push(rest).expect("Failed to frame");
                        rest = &rest[used..];
                        if framer.take_frame().is_some() {
                            frames += 1;
                        }
                    }
                }
                assert_eq!(frames, 50);
            })
        });
    }
    group.finish();
}

pub fn bench_session_qos1(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_qos1");
    let payload = b"hello world from bench qos1";
    group.throughput(Throughput::Bytes(payload.len() as u64 * 50));
    group.bench_function("publish_and_ack", |b| {
        b.iter_batched_ref(
            || {
                let mut session = Session::new();
                session
                    .begin_connect(&ConnectOptions::new("libmqtt-bench"))
                    .expect("Failed to connect");
                session
                    .handle_frame(&[0x20, 0x02, 0x00, 0x00])
                    .expect("Failed to handle CONNACK");
                session
            },
            |session| {
                for _ in 0..50 {
                    let (id, _) = session
                        .publish("libmqtt/bench-topic", payload, QoS::AtLeastOnce, false)
                        .expect("Failed to publish");
                    let id = id.expect("missing packet id");
                    session.handle_packet(Packet::PubAck(id));
                    while session.next_event().is_some() {}
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}
