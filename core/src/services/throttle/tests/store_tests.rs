use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::{AttemptRecord, LockoutRecord};
use crate::services::throttle::{AttemptStore, MemoryAttemptStore};

fn record(count: u32) -> AttemptRecord {
    AttemptRecord {
        count,
        window_reset_at: DateTime::<Utc>::UNIX_EPOCH + Duration::minutes(15),
        locked_until: None,
    }
}

#[test]
fn test_get_set_delete() {
    let mut store: MemoryAttemptStore = MemoryAttemptStore::new();
    assert!(store.is_empty());
    assert_eq!(store.get("rate_limit:login:a"), None);

    store.set("rate_limit:login:a", record(1));
    store.set("rate_limit:login:a", record(2));
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("rate_limit:login:a"), Some(record(2)));

    store.delete("rate_limit:login:a");
    store.delete("rate_limit:login:missing");
    assert!(store.is_empty());
}

#[test]
fn test_get_returns_a_copy() {
    let mut store: MemoryAttemptStore = MemoryAttemptStore::new();
    store.set("k", record(1));

    let mut copy = store.get("k").unwrap();
    copy.count = 99;

    assert_eq!(store.get("k").unwrap().count, 1);
}

#[test]
fn test_clear_and_keys() {
    let mut store: MemoryAttemptStore = MemoryAttemptStore::new();
    store.set("a", record(1));
    store.set("b", record(2));

    let mut keys = store.keys();
    keys.sort();
    assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);

    store.clear();
    assert_eq!(store.len(), 0);
    assert!(store.keys().is_empty());
}

#[test]
fn test_retain_reports_dropped() {
    let mut store: MemoryAttemptStore = MemoryAttemptStore::new();
    for i in 0..5 {
        store.set(&format!("k{}", i), record(i));
    }

    let dropped = store.retain(&mut |_, record| record.count % 2 == 0);
    assert_eq!(dropped, 2);
    assert_eq!(store.len(), 3);
    assert!(store.get("k1").is_none());
}

#[test]
fn test_store_holds_lockout_records() {
    let mut store: MemoryAttemptStore<LockoutRecord> = MemoryAttemptStore::default();
    store.set(
        "user@example.com",
        LockoutRecord {
            attempt_count: 2,
            locked_until: None,
        },
    );
    assert_eq!(store.get("user@example.com").unwrap().attempt_count, 2);
}
