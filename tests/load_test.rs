//! Concurrency tests for the observation store.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use observation_store::{HealthStorage, ObservationStore};

mod common;
use common::report;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_same_subject_no_lost_updates() {
    let store = Arc::new(ObservationStore::new(1_000));
    store.add_subject("S".into());

    let observers = 8;
    let per_observer = 100u64;
    let mut handles = Vec::new();
    for o in 0..observers {
        let store = store.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let observer = format!("O{}", o);
            for ts in 0..per_observer {
                store.add_report(report(&observer, "S", ts), true).unwrap();
            }
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    let handle = store.get_panorama(&"S".into()).unwrap();
    let panorama = handle.lock().unwrap();
    assert_eq!(panorama.views().len(), observers);
    assert_eq!(panorama.observation_count(), observers * per_observer as usize);
    // each observer's history is in its own submission order
    for view in panorama.views().values() {
        let ts: Vec<u64> = view.iter().map(|o| o.timestamp_ms).collect();
        assert_eq!(ts, (0..per_observer).collect::<Vec<_>>());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_same_observer_concurrent_appends_bounded() {
    let store = Arc::new(ObservationStore::default());
    store.add_subject("S".into());

    let mut handles = Vec::new();
    for t in 0..16u64 {
        let store = store.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            for i in 0..50u64 {
                store.add_report(report("O", "S", t * 1_000 + i), true).unwrap();
            }
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    let handle = store.get_panorama(&"S".into()).unwrap();
    let panorama = handle.lock().unwrap();
    assert_eq!(panorama.observation_count(), 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_distinct_subjects_in_parallel() {
    let store = Arc::new(ObservationStore::default());
    let subjects = 64;

    let mut handles = Vec::new();
    for s in 0..subjects {
        let store = store.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let subject = format!("S{}", s);
            for ts in 1..=10 {
                store.add_report(report("O", &subject, ts), false).unwrap();
            }
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    assert_eq!(store.watchlist().len(), subjects);
    let snapshot = store.snapshot();
    for subject in snapshot.subjects.values() {
        assert!(subject.watched);
        let ts: Vec<u64> = subject.views.values().next().unwrap().iter().map(|o| o.timestamp_ms).collect();
        assert_eq!(ts, vec![6, 7, 8, 9, 10]);
    }
}

#[test]
fn test_held_subject_lock_does_not_block_other_subjects() {
    let store = Arc::new(ObservationStore::with_subjects(5, ["busy", "free"]));
    let busy = store.get_panorama(&"busy".into()).unwrap();
    let guard = busy.lock().unwrap();

    // another subject progresses while "busy" is locked
    let (tx, rx) = mpsc::channel();
    let s = store.clone();
    thread::spawn(move || {
        s.add_report(report("O", "free", 1), true).unwrap();
        let _ = tx.send(());
    });
    rx.recv_timeout(Duration::from_secs(5))
        .expect("report for an unrelated subject blocked");

    // membership operations only need the store-wide lock
    assert!(store.add_subject("other".into()));
    assert!(store.is_watched(&"busy".into()));

    // a report for the locked subject waits for the holder
    let (tx, rx) = mpsc::channel();
    let s = store.clone();
    thread::spawn(move || {
        s.add_report(report("O", "busy", 1), true).unwrap();
        let _ = tx.send(());
    });
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());

    drop(guard);
    rx.recv_timeout(Duration::from_secs(5))
        .expect("report did not complete after lock release");
    assert_eq!(store.get_latest_report(&"busy".into()).unwrap().observation.timestamp_ms, 1);
}
