//! Table Tests
//!
//! Tests verify:
//! - Set/get/delete/exists semantics
//! - Overwrite and idempotence
//! - Binary and empty keys/values
//! - No lost updates under concurrent writers

use std::sync::Arc;

use bytes::Bytes;
use kache::store::Table;

fn b(s: &str) -> Bytes {
    Bytes::copy_from_slice(s.as_bytes())
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_new_table_is_empty() {
    let table = Table::new();
    assert_eq!(table.len(), 0);
    assert!(table.is_empty());
}

#[test]
fn test_set_and_get() {
    let table = Table::new();

    table.set(b("key1"), b("value1"));

    assert_eq!(table.get(b"key1"), Some(b("value1")));
    assert!(table.exists(b"key1"));
    assert_eq!(table.len(), 1);
}

#[test]
fn test_get_nonexistent_key() {
    let table = Table::new();

    assert_eq!(table.get(b"nonexistent"), None);
    assert!(!table.exists(b"nonexistent"));
}

#[test]
fn test_set_overwrites_existing() {
    let table = Table::new();

    table.set(b("key1"), b("value1"));
    table.set(b("key1"), b("value2"));

    assert_eq!(table.len(), 1);
    assert_eq!(table.get(b"key1"), Some(b("value2")));
}

#[test]
fn test_set_twice_is_idempotent() {
    let table = Table::new();

    table.set(b("k"), b("v"));
    table.set(b("k"), b("v"));

    assert_eq!(table.len(), 1);
    assert_eq!(table.get(b"k"), Some(b("v")));
}

// =============================================================================
// Delete Tests
// =============================================================================

#[test]
fn test_delete_existing_key() {
    let table = Table::new();

    table.set(b("key1"), b("value1"));

    assert!(table.delete(b"key1"));
    assert_eq!(table.get(b"key1"), None);
    assert!(!table.exists(b"key1"));
    assert!(table.is_empty());
}

#[test]
fn test_delete_absent_key_changes_nothing() {
    let table = Table::new();
    table.set(b("other"), b("value"));

    assert!(!table.delete(b"missing"));
    assert_eq!(table.len(), 1);
}

#[test]
fn test_repeated_delete_returns_false() {
    let table = Table::new();
    table.set(b("key1"), b("value1"));

    assert!(table.delete(b"key1"));
    assert!(!table.delete(b"key1"));
    assert!(!table.delete(b"key1"));
}

#[test]
fn test_set_after_delete() {
    let table = Table::new();

    table.set(b("key1"), b("value1"));
    table.delete(b"key1");
    table.set(b("key1"), b("value2"));

    assert_eq!(table.get(b"key1"), Some(b("value2")));
}

// =============================================================================
// Byte-String Tests
// =============================================================================

#[test]
fn test_binary_keys_and_values() {
    let table = Table::new();
    let key = Bytes::from(vec![0x00, 0x0D, 0x0A, 0xFF]);
    let value: Bytes = (0..=255u8).collect::<Vec<_>>().into();

    table.set(key.clone(), value.clone());

    assert_eq!(table.get(&key), Some(value));
}

#[test]
fn test_empty_key_and_value() {
    let table = Table::new();

    table.set(Bytes::new(), Bytes::new());

    assert!(table.exists(b""));
    assert_eq!(table.get(b""), Some(Bytes::new()));
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_disjoint_writers_lose_nothing() {
    const THREADS: usize = 8;
    const KEYS: usize = 500;

    let table = Arc::new(Table::new());

    crossbeam::thread::scope(|s| {
        for t in 0..THREADS {
            let table = &table;
            s.spawn(move |_| {
                for k in 0..KEYS {
                    table.set(
                        Bytes::from(format!("t{}-k{}", t, k)),
                        Bytes::from(format!("v{}-{}", t, k)),
                    );
                }
            });
        }
    })
    .unwrap();

    assert_eq!(table.len(), THREADS * KEYS);
    for t in 0..THREADS {
        for k in 0..KEYS {
            let key = format!("t{}-k{}", t, k);
            assert_eq!(
                table.get(key.as_bytes()),
                Some(Bytes::from(format!("v{}-{}", t, k)))
            );
        }
    }
}

#[test]
fn test_concurrent_deletes_count_each_key_once() {
    const THREADS: usize = 4;
    const KEYS: usize = 200;

    let table = Table::new();
    for k in 0..KEYS {
        table.set(Bytes::from(format!("k{}", k)), b("v"));
    }

    // Every thread tries to delete every key; exactly one wins each
    let removed: usize = crossbeam::thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|_| {
                    (0..KEYS)
                        .filter(|k| table.delete(format!("k{}", k).as_bytes()))
                        .count()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    })
    .unwrap();

    assert_eq!(removed, KEYS);
    assert!(table.is_empty());
}
