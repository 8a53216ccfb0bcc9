//! Benchmarks for value marshalling and the RESP codec

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use redis_objects::codec::{decode, encode};
use redis_objects::protocol::{decode_reply, encode_command, encode_reply, Command, CommandType, Reply};
use redis_objects::MarshalSpec;
use serde_json::json;

fn marshal_benchmarks(c: &mut Criterion) {
    let document = json!({"name": "ada", "langs": ["rust", "ml"], "age": 36, "admin": false});
    let wire = encode(&document, &MarshalSpec::Json).unwrap_or_default();
    let wire_reply = Reply::Bulk(wire);

    c.bench_function("encode_json", |b| {
        b.iter(|| encode(black_box(&document), &MarshalSpec::Json))
    });
    c.bench_function("decode_json", |b| {
        b.iter(|| decode(black_box(&wire_reply), &MarshalSpec::Json))
    });
    c.bench_function("decode_integer", |b| {
        let reply = Reply::bulk("123456789");
        b.iter(|| decode(black_box(&reply), &MarshalSpec::Integer))
    });
}

fn resp_benchmarks(c: &mut Criterion) {
    let command = Command::new(CommandType::ZAdd)
        .arg("leaderboard")
        .args((0..64).flat_map(|i| [i.to_string(), format!("player:{}", i)]));
    c.bench_function("encode_zadd_64", |b| b.iter(|| encode_command(black_box(&command))));

    let scored = encode_reply(&Reply::bulk_array(
        (0..256).flat_map(|i| [format!("member:{}", i), i.to_string()]),
    ));
    c.bench_function("decode_withscores_256", |b| {
        b.iter(|| decode_reply(black_box(&scored)))
    });
}

criterion_group!(benches, marshal_benchmarks, resp_benchmarks);
criterion_main!(benches);
