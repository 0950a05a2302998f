use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

#[path = "bench_input.rs"]
mod bench_input;
use bench_input::TestInput;
use newt_msg::TryIntoBytes;

fn message_to_bytes(c: &mut Criterion) {
  let mut group = c.benchmark_group("msg/to_bytes");
  group.measurement_time(std::time::Duration::from_secs(5));

  bench_input::inputs().into_iter().for_each(|inp: TestInput| {
                                      group.bench_with_input(BenchmarkId::new("msg/to_bytes", inp.get_size()),
                                                             &inp,
                                                             |b, inp| {
                                                               b.iter_batched(|| inp.get_message(),
                                                                              |m| m.try_into_bytes().unwrap(),
                                                                              BatchSize::SmallInput)
                                                             });
                                    });

  group.finish();
}

trait Size {
  fn get_size(&self) -> usize;
}

impl Size for TestInput {
  fn get_size(&self) -> usize {
    self.get_bytes().len()
  }
}

criterion_group!(benches, message_to_bytes);
criterion_main!(benches);
