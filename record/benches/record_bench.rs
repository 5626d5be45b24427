use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use tdb_record::{NodeId, RecordBuffer, RecordFactory};

fn spo_key(s: u64, p: u64, o: u64) -> Vec<u8> {
    let mut key = vec![0u8; 3 * NodeId::SIZE];
    for (i, v) in [s, p, o].into_iter().enumerate() {
        NodeId::Real(v).to_bytes(&mut key, i * NodeId::SIZE).unwrap();
    }
    key
}

/// Fill a buffer with `n` keys spread over 100 subjects and 20 predicates.
fn filled(n: u64) -> RecordBuffer {
    let factory = RecordFactory::new(3 * NodeId::SIZE, 0).unwrap();
    let mut buf = RecordBuffer::with_capacity(factory, n as usize);
    for t in 0..n {
        let key = spo_key(t % 100, t % 20, t);
        buf.insert(factory.create(&key, None).unwrap()).unwrap();
    }
    buf
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_buffer_insert");
    for &n in &[1_000u64, 10_000] {
        group.throughput(Throughput::Elements(n));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| filled(n))
        });
    }
    group.finish();
}

fn bench_prefix_scan(c: &mut Criterion) {
    let buf = filled(50_000);
    c.bench_function("record_buffer_prefix_scan", |b| {
        b.iter(|| {
            let mut total = 0usize;
            for s in 0..100u64 {
                let prefix = NodeId::Real(s).to_be_bytes();
                total += buf.scan_prefix(&prefix).count();
            }
            total
        })
    });
}

criterion_group!(benches, bench_insert, bench_prefix_scan);
criterion_main!(benches);
