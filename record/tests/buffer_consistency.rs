use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tdb_record::{NodeId, RecordBuffer, RecordFactory};

fn key_of(ids: [u64; 3]) -> Vec<u8> {
    let mut key = vec![0u8; 3 * NodeId::SIZE];
    for (i, v) in ids.into_iter().enumerate() {
        NodeId::new(v).unwrap().to_bytes(&mut key, i * NodeId::SIZE).unwrap();
    }
    key
}

#[test]
fn random_inserts_and_removes_match_btreeset() {
    let factory = RecordFactory::new(3 * NodeId::SIZE, 0).unwrap();
    let mut buf = RecordBuffer::new(factory);
    let mut model: BTreeSet<Vec<u8>> = BTreeSet::new();
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..2_000 {
        let key = key_of([
            rng.random_range(0..8),
            rng.random_range(0..8),
            rng.random_range(0..8),
        ]);
        if rng.random_bool(0.65) {
            let fresh = buf.insert(factory.create(&key, None).unwrap()).unwrap();
            assert_eq!(fresh, model.insert(key));
        } else {
            let removed = buf.remove(&key).unwrap().is_some();
            assert_eq!(removed, model.remove(&key));
        }
    }

    assert_eq!(buf.len(), model.len());
    let stored: Vec<Vec<u8>> = buf.iter().map(|r| r.key().to_vec()).collect();
    let expected: Vec<Vec<u8>> = model.iter().cloned().collect();
    assert_eq!(stored, expected);

    // every first-component prefix scan agrees with the model
    for s in 0..8u64 {
        let prefix = NodeId::new(s).unwrap().to_be_bytes();
        let got = buf.scan_prefix(&prefix).count();
        let want = model.iter().filter(|k| k.starts_with(&prefix)).count();
        assert_eq!(got, want, "prefix {}", s);
    }
}

#[test]
fn clear_empties_buffer() {
    let factory = RecordFactory::new(8, 8).unwrap();
    let mut buf = RecordBuffer::with_capacity(factory, 4);
    for v in 0..4u64 {
        let k = v.to_be_bytes();
        buf.insert(factory.create(&k, Some(&k)).unwrap()).unwrap();
    }
    assert_eq!(buf.len(), 4);
    buf.clear();
    assert!(buf.is_empty());
    assert!(buf.get(0).is_none());
    assert_eq!(buf.scan_prefix(&[]).count(), 0);
}
