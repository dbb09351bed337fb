//! Criterion benchmarks for the MusicLink line codec.
//!
//! Run with:
//! ```bash
//! cargo bench --package musiclink-core --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use musiclink_core::protocol::codec::{decode_line, encode_lines, status_broadcast};
use musiclink_core::{abbreviate, Command, PlayerStatus, TrackTimes};

fn make_status() -> PlayerStatus {
    PlayerStatus {
        artist: "Einstürzende Neubauten".to_string(),
        album: "Tabula Rasa".to_string(),
        title: "Headcleaner".to_string(),
        times: TrackTimes {
            position_tenths: 620,
            length_tenths: 2840,
        },
        playing: true,
    }
}

fn bench_encode_status_broadcast(c: &mut Criterion) {
    let status = make_status();
    c.bench_function("encode_status_broadcast", |b| {
        b.iter(|| encode_lines(&status_broadcast(black_box(&status))))
    });
}

fn bench_decode_commands(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_command");
    for line in ["PP\n", "SY\n", "PL Jazz Mix\n", "JU -15\n", "!! free heap 81234\n"] {
        group.bench_with_input(BenchmarkId::from_parameter(line.trim_end()), line, |b, l| {
            b.iter(|| {
                let req = decode_line(black_box(l)).expect("decode");
                Command::try_from(req)
            })
        });
    }
    group.finish();
}

fn bench_abbreviate(c: &mut Criterion) {
    let long = "Headhunter (Live at Brussels) - 2011 Remastered Version";
    c.bench_function("abbreviate_long_title", |b| {
        b.iter(|| abbreviate(black_box(long), 24))
    });
}

criterion_group!(
    benches,
    bench_encode_status_broadcast,
    bench_decode_commands,
    bench_abbreviate
);
criterion_main!(benches);
