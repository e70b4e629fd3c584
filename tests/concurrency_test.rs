//! A built trie is shared read-only between threads

use libdarts::prelude::*;
use std::sync::Arc;
use std::thread;

fn numbered_entries(n: i32) -> Vec<(String, i32)> {
    (0..n).map(|i| (format!("key{:05}", i), i)).collect()
}

#[test]
fn test_concurrent_lookups_on_clones() {
    let trie = DoubleArrayTrie::from_entries(numbered_entries(2_000)).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let trie = trie.clone();
            thread::spawn(move || {
                for i in (t..2_000).step_by(8) {
                    assert_eq!(trie.get(format!("key{:05}", i)), Some(i));
                }
                assert_eq!(trie.get("key"), None);
                trie.find_by_common_prefix("key00001x").count()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 1);
    }
}

#[test]
fn test_concurrent_iteration_through_arc() {
    let trie = Arc::new(DoubleArrayTrie::from_entries(numbered_entries(500)).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let trie = Arc::clone(&trie);
            thread::spawn(move || trie.iter().map(|(_, value)| value as i64).sum::<i64>())
        })
        .collect();

    let expected: i64 = (0..500).sum();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_clones_share_units() {
    let trie = DoubleArrayTrie::from_entries(numbered_entries(10)).unwrap();
    let clone = trie.clone();
    assert_eq!(trie.as_units().as_ptr(), clone.as_units().as_ptr());
}
