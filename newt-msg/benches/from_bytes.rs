use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

#[path = "bench_input.rs"]
mod bench_input;
use bench_input::TestInput;
use newt_msg::{Message, TryFromBytes};

fn message_from_bytes(c: &mut Criterion) {
  let mut group = c.benchmark_group("msg/from_bytes");
  group.measurement_time(std::time::Duration::from_secs(5));

  bench_input::inputs().into_iter().for_each(|inp: TestInput| {
                                      let bytes = inp.get_bytes();
                                      group.bench_with_input(BenchmarkId::new("msg/from_bytes", bytes.len()),
                                                             &bytes,
                                                             |b, bytes| {
                                                               b.iter(|| {
                                                                  Message::try_from_bytes(black_box(&bytes[..])).unwrap()
                                                                })
                                                             });
                                    });

  group.finish();
}

criterion_group!(benches, message_from_bytes);
criterion_main!(benches);
