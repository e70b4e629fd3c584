//! Large random key sets

use libdarts::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

fn random_keys(rng: &mut StdRng, count: usize) -> Vec<Vec<u8>> {
    let mut seen = HashSet::with_capacity(count);
    let mut keys = Vec::with_capacity(count);
    while keys.len() < count {
        let len = rng.gen_range(1..=10);
        let key: Vec<u8> = (0..len).map(|_| rng.gen_range(1..=255u8)).collect();
        if seen.insert(key.clone()) {
            keys.push(key);
        }
    }
    keys
}

#[test]
fn test_hundred_thousand_random_keys() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let keys = random_keys(&mut rng, 100_000);

    let mut builder = DoubleArrayTrieBuilder::new();
    for (i, key) in keys.iter().enumerate() {
        builder.put(key, i as i32).unwrap();
    }
    let trie = builder.build().unwrap();

    for (i, key) in keys.iter().enumerate() {
        assert_eq!(trie.get(key), Some(i as i32));
    }

    let stored: HashSet<&[u8]> = keys.iter().map(Vec::as_slice).collect();
    for _ in 0..10_000 {
        let len = rng.gen_range(0..=12);
        let probe: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
        if !stored.contains(probe.as_slice()) {
            assert_eq!(trie.get(&probe), None);
        }
    }

    assert_eq!(trie.iter().count(), keys.len());
}

#[test]
fn test_dense_numeric_keys() {
    let entries: Vec<(String, i32)> = (0..50_000).map(|i| (i.to_string(), i)).collect();
    let trie = DoubleArrayTrie::from_entries(entries.iter().map(|(k, v)| (k.as_str(), *v)))
        .unwrap();

    for (key, value) in &entries {
        assert_eq!(trie.get(key), Some(*value));
    }
    assert_eq!(
        trie.find_by_common_prefix("12345").collect::<Vec<_>>(),
        vec![1, 12, 123, 1234, 12345]
    );
}

#[test]
fn test_long_shared_suffixes() {
    let suffix = "x".repeat(300);
    let entries: Vec<(String, i32)> = (b'a'..=b'z')
        .map(|c| (format!("{}{}", c as char, suffix), i32::from(c)))
        .collect();
    let trie = DoubleArrayTrie::from_entries(entries.iter().map(|(k, v)| (k.as_str(), *v)))
        .unwrap();

    for (key, value) in &entries {
        assert_eq!(trie.get(key), Some(*value));
    }
    assert_eq!(trie.get(&suffix), None);
}
