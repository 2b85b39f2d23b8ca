//! Concurrent access tests for the FFI boundary.
//!
//! These tests verify thread safety of the handle table: parallel operations
//! on one handle serialize on its slot, operations on distinct handles do not
//! interfere, and destroy racing in-flight calls never crashes.

mod common;

use std::os::raw::c_char;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use hwmon_core_lib::{HwmonStatus, hwmon_destroy, hwmon_report, hwmon_update};

use common::static_handle;

// Raw pointers are not Send; carry the token value across threads instead.
fn token(handle: *mut std::os::raw::c_void) -> usize {
    handle as usize
}

fn ptr(token: usize) -> *mut std::os::raw::c_void {
    token as *mut std::os::raw::c_void
}

/// Parallel update/report on the same handle must not panic or tear.
#[test]
fn test_concurrent_update_and_report_same_handle() {
    let handle = token(static_handle("shared-report"));

    let threads: Vec<_> = (0..8)
        .map(|i| {
            thread::spawn(move || {
                for _ in 0..50 {
                    if i % 2 == 0 {
                        let result = hwmon_update(ptr(handle));
                        assert_eq!(result.status, HwmonStatus::Success);
                    } else {
                        let mut buf = [0u8; 64];
                        let result =
                            hwmon_report(ptr(handle), buf.as_mut_ptr() as *mut c_char, 64);
                        assert_eq!(result.status, HwmonStatus::Success);
                        assert_eq!(&buf[..13], b"shared-report");
                    }
                }
            })
        })
        .collect();

    for t in threads {
        t.join().expect("Thread should not panic");
    }

    assert_eq!(hwmon_destroy(ptr(handle)), HwmonStatus::Success);
}

/// Operations on distinct handles proceed independently across threads.
#[test]
fn test_concurrent_distinct_handles() {
    let handles: Vec<usize> = (0..4)
        .map(|i| token(static_handle(&format!("worker-{}", i))))
        .collect();

    let threads: Vec<_> = handles
        .iter()
        .enumerate()
        .map(|(i, &h)| {
            thread::spawn(move || {
                let expected = format!("worker-{}", i);
                for _ in 0..50 {
                    hwmon_update(ptr(h));
                    let mut buf = [0u8; 64];
                    let result = hwmon_report(ptr(h), buf.as_mut_ptr() as *mut c_char, 64);
                    assert_eq!(result.status, HwmonStatus::Success);
                    assert_eq!(&buf[..expected.len()], expected.as_bytes());
                }
            })
        })
        .collect();

    for t in threads {
        t.join().expect("Thread should not panic");
    }

    for h in handles {
        assert_eq!(hwmon_destroy(ptr(h)), HwmonStatus::Success);
    }
}

/// Destroy racing a storm of updates: exactly one destroy wins, every other
/// call either succeeds before it or reports InvalidHandle after it.
#[test]
fn test_destroy_races_in_flight_calls() {
    for _ in 0..20 {
        let handle = token(static_handle("doomed"));
        let destroys = Arc::new(AtomicUsize::new(0));

        let mut threads = Vec::new();
        for _ in 0..4 {
            threads.push(thread::spawn(move || {
                for _ in 0..10 {
                    let result = hwmon_update(ptr(handle));
                    assert!(
                        result.status == HwmonStatus::Success
                            || result.status == HwmonStatus::InvalidHandle
                    );
                }
            }));
        }
        for _ in 0..2 {
            let destroys = Arc::clone(&destroys);
            threads.push(thread::spawn(move || {
                if hwmon_destroy(ptr(handle)) == HwmonStatus::Success {
                    destroys.fetch_add(1, Ordering::SeqCst);
                }
            }));
        }

        for t in threads {
            t.join().expect("Thread should not panic");
        }

        assert_eq!(destroys.load(Ordering::SeqCst), 1);
        assert_eq!(hwmon_destroy(ptr(handle)), HwmonStatus::InvalidHandle);
    }
}

/// Concurrent double-destroy of the same handle: one winner, no crash.
#[test]
fn test_concurrent_destroy_same_handle() {
    let handle = token(static_handle("contended"));
    let wins = Arc::new(AtomicUsize::new(0));

    let threads: Vec<_> = (0..10)
        .map(|_| {
            let wins = Arc::clone(&wins);
            thread::spawn(move || {
                if hwmon_destroy(ptr(handle)) == HwmonStatus::Success {
                    wins.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    for t in threads {
        t.join().expect("Thread should not panic");
    }

    assert_eq!(wins.load(Ordering::SeqCst), 1);
}
