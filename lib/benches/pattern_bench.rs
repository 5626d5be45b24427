use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use tdb::notation::{parse_node, parse_triple};
use tdb::{Graph, GraphConfig, IndexOrder, Node, Triple};

fn loaded(orders: Vec<IndexOrder>) -> Graph {
    let config = GraphConfig::builder()
        .index_orders(orders)
        .build()
        .unwrap();
    let g = Graph::in_memory(config).unwrap();
    g.execute_in_transaction(|g| {
        for n in 0..5_000u32 {
            let t = parse_triple(&format!("s{} p{} {}", n % 250, n % 10, n))?;
            g.add(&t)?;
        }
        Ok(())
    })
    .unwrap();
    g
}

fn bench_patterns(c: &mut Criterion) {
    let patterns = [
        ("s_bound", Triple::new(parse_node("s7").unwrap(), Node::Any, Node::Any)),
        ("p_bound", Triple::new(Node::Any, parse_node("p3").unwrap(), Node::Any)),
        ("o_bound", Triple::new(Node::Any, Node::Any, parse_node("4242").unwrap())),
    ];
    let mut group = c.benchmark_group("graph_find");
    for (label, orders) in [
        ("all_orders", IndexOrder::ALL.to_vec()),
        ("spo_only", vec![IndexOrder::Spo]),
    ] {
        let g = loaded(orders);
        for (name, pattern) in &patterns {
            group.bench_with_input(BenchmarkId::new(label, name), pattern, |b, p| {
                b.iter(|| g.find(p).unwrap().count())
            });
        }
    }
    group.finish();
}

fn bench_contains_by_value(c: &mut Criterion) {
    let g = loaded(IndexOrder::ALL.to_vec());
    let probe = parse_triple("s2 p2 '0002'xsd:int").unwrap();
    c.bench_function("graph_contains_by_value", |b| {
        b.iter(|| g.contains(&probe).unwrap())
    });
}

criterion_group!(benches, bench_patterns, bench_contains_by_value);
criterion_main!(benches);
