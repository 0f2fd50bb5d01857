//! Memoization behavior across cache levels and snapshots.

use std::sync::{Arc, Barrier};
use std::thread;

use delivery_core::cache::{CacheLevel, CachedValue};
use delivery_core::content::{ContentElement, PropertyDescriptor, PropertyValue, SnapshotService};
use uuid::Uuid;

mod common;
use common::Counter;

fn read_four_times(level: CacheLevel, expanded: bool) -> (Vec<CachedValue>, i64) {
    let snapshots = SnapshotService::new();
    let snapshot = snapshots.open();
    let descriptor = Arc::new(PropertyDescriptor::new("counter", level));
    let element = common::element(1046);
    let counter = Counter::default();

    let values = (0..4)
        .map(|_| {
            // A fresh PropertyValue per read, as when content is re-materialized.
            let property = PropertyValue::new(descriptor.clone(), element.clone());
            property
                .value(&snapshot, expanded, || counter.next())
                .unwrap()
        })
        .collect();

    (values, counter.calls())
}

#[test]
fn test_none_level_yields_distinct_values() {
    for expanded in [false, true] {
        let (values, calls) = read_four_times(CacheLevel::None, expanded);
        assert_eq!(calls, 4);
        let numbers: Vec<i64> = values.iter().map(|v| v.as_i64().unwrap()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }
}

#[test]
fn test_cached_levels_compute_once() {
    for level in [CacheLevel::Element, CacheLevel::Elements, CacheLevel::Snapshot] {
        for expanded in [false, true] {
            let (values, calls) = read_four_times(level, expanded);
            assert_eq!(calls, 1, "level {level} expanded {expanded}");
            assert!(values.iter().all(|v| v.as_i64() == Some(1)));
            assert!(values.iter().all(|v| Arc::ptr_eq(v, &values[0])));
        }
    }
}

#[test]
fn test_expansion_flag_keys_separately() {
    let snapshot = SnapshotService::new().open();
    let property = PropertyValue::new(
        Arc::new(PropertyDescriptor::new("picker", CacheLevel::Snapshot)),
        common::element(1046),
    );
    let counter = Counter::default();

    let flat = property.value(&snapshot, false, || counter.next()).unwrap();
    let expanded = property.value(&snapshot, true, || counter.next()).unwrap();
    let flat_again = property.value(&snapshot, false, || counter.next()).unwrap();

    assert_eq!(counter.calls(), 2);
    assert_ne!(flat, expanded);
    assert!(Arc::ptr_eq(&flat, &flat_again));
}

#[test]
fn test_snapshots_are_isolated() {
    let snapshots = Arc::new(SnapshotService::new());
    let descriptor = Arc::new(PropertyDescriptor::new("counter", CacheLevel::Snapshot));
    let element = common::element(1046);
    let counter = Counter::default();
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let snapshots = snapshots.clone();
            let descriptor = descriptor.clone();
            let element = element.clone();
            let counter = counter.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let snapshot = snapshots.open();
                let property = PropertyValue::new(descriptor, element);
                barrier.wait();
                let first = property.value(&snapshot, false, || counter.next()).unwrap();
                barrier.wait();
                let second = property.value(&snapshot, false, || counter.next()).unwrap();
                (first, second)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // One computation per snapshot, each snapshot sees only its own.
    assert_eq!(counter.calls(), 2);
    for (first, second) in &results {
        assert!(Arc::ptr_eq(first, second));
    }
    assert_ne!(results[0].0, results[1].0);
}

#[test]
fn test_concurrent_first_access_within_snapshot() {
    let snapshot = Arc::new(SnapshotService::new().open());
    let descriptor = Arc::new(PropertyDescriptor::new("expensive", CacheLevel::Elements));
    let element = common::element(1046);
    let counter = Counter::default();
    let barrier = Arc::new(Barrier::new(16));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let snapshot = snapshot.clone();
            let property = PropertyValue::new(descriptor.clone(), element.clone());
            let counter = counter.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                property
                    .value(&*snapshot, false, || {
                        thread::sleep(std::time::Duration::from_millis(10));
                        counter.next()
                    })
                    .unwrap()
            })
        })
        .collect();

    let values: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(counter.calls(), 1);
    assert!(values.iter().all(|v| Arc::ptr_eq(v, &values[0])));
}

#[test]
fn test_failed_computation_is_retried() {
    let snapshot = SnapshotService::new().open();
    let property = PropertyValue::new(
        Arc::new(PropertyDescriptor::new("flaky", CacheLevel::Snapshot)),
        common::element(1046),
    );

    let err = property
        .value(&snapshot, false, || Err::<serde_json::Value, _>("source unavailable"))
        .unwrap_err();
    assert_eq!(err, "source unavailable");

    let value = property
        .value::<_, _, &str>(&snapshot, false, || Ok(serde_json::json!("recovered")))
        .unwrap();
    assert_eq!(value.as_str(), Some("recovered"));
}

fn reads_across_instances(level: CacheLevel, same_key: bool) -> i64 {
    let snapshot = SnapshotService::new().open();
    let descriptor = Arc::new(PropertyDescriptor::new("title", level));
    let key = Uuid::new_v4();
    let counter = Counter::default();

    for _ in 0..4 {
        // Each read re-fetches the element as a brand new instance.
        let element_key = if same_key { key } else { Uuid::new_v4() };
        let element = Arc::new(ContentElement::new(1046, element_key, "article"));
        let property = PropertyValue::new(descriptor.clone(), element);
        property.value(&snapshot, false, || counter.next()).unwrap();
    }

    counter.calls()
}

#[test]
fn test_refetched_element_with_same_key_hits_cache() {
    for level in [CacheLevel::Element, CacheLevel::Elements, CacheLevel::Snapshot] {
        assert_eq!(reads_across_instances(level, true), 1, "level {level}");
    }
}

#[test]
fn test_different_element_key_computes_again() {
    for level in [CacheLevel::Element, CacheLevel::Elements, CacheLevel::Snapshot] {
        assert_eq!(reads_across_instances(level, false), 4, "level {level}");
    }
}
