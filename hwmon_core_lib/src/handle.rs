//! Process-wide handle table for monitor instances.
//!
//! Handles are pointer-sized tokens encoding a slot index and a generation
//! counter. Generations increment on every release, so stale tokens (including
//! double-destroys and copies kept after destroy) fail validation instead of
//! dereferencing freed state. Token value 0 is never issued; it is the failure
//! sentinel across the ABI.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::error::HwmonStatus;
use crate::monitor::MonitorSource;

/// Pointer-sized opaque token: low 32 bits slot index, high 32 bits generation.
pub type RawHandle = u64;

/// Upper bound on simultaneously live handles. Each handle owns a full
/// monitor instance, so this is far above any realistic host's usage.
const MAX_LIVE_HANDLES: usize = 65_536;

type SharedMonitor = Arc<Mutex<Box<dyn MonitorSource>>>;

struct Slot {
    generation: u32,
    monitor: Option<SharedMonitor>,
}

struct TableInner {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

/// Registry of live monitor instances.
///
/// Resolution takes the read lock only long enough to clone the slot's `Arc`;
/// monitor work happens under the per-slot mutex, so a slow refresh on one
/// handle never blocks operations on other handles.
pub struct HandleTable {
    inner: RwLock<TableInner>,
}

fn pack(index: u32, generation: u32) -> RawHandle {
    ((generation as u64) << 32) | index as u64
}

fn unpack(handle: RawHandle) -> (u32, u32) {
    (handle as u32, (handle >> 32) as u32)
}

impl HandleTable {
    pub const fn new() -> Self {
        Self {
            inner: RwLock::new(TableInner {
                slots: Vec::new(),
                free: Vec::new(),
                live: 0,
            }),
        }
    }

    /// Inserts a monitor and returns its token. Fails with `TableFull` once
    /// the live-handle cap is reached.
    pub fn insert(&self, monitor: Box<dyn MonitorSource>) -> Result<RawHandle, HwmonStatus> {
        let mut inner = self.inner.write();
        if inner.live >= MAX_LIVE_HANDLES {
            return Err(HwmonStatus::TableFull);
        }

        let shared: SharedMonitor = Arc::new(Mutex::new(monitor));
        let handle = match inner.free.pop() {
            Some(index) => {
                let slot = &mut inner.slots[index as usize];
                slot.monitor = Some(shared);
                pack(index, slot.generation)
            }
            None => {
                let index = inner.slots.len() as u32;
                // Generations start at 1 so a token is never 0.
                inner.slots.push(Slot {
                    generation: 1,
                    monitor: Some(shared),
                });
                pack(index, 1)
            }
        };

        inner.live += 1;
        Ok(handle)
    }

    /// Validates provenance and returns the monitor for a live handle.
    pub fn resolve(&self, handle: RawHandle) -> Option<SharedMonitor> {
        let (index, generation) = unpack(handle);
        let inner = self.inner.read();
        let slot = inner.slots.get(index as usize)?;
        if slot.generation != generation {
            return None;
        }
        slot.monitor.clone()
    }

    /// Releases a handle. The generation bump invalidates every outstanding
    /// copy of the token; an operation already holding the monitor `Arc`
    /// finishes safely and the instance drops with the last reference.
    pub fn remove(&self, handle: RawHandle) -> Result<(), HwmonStatus> {
        let (index, generation) = unpack(handle);
        let mut inner = self.inner.write();
        let slot = match inner.slots.get_mut(index as usize) {
            Some(slot) => slot,
            None => return Err(HwmonStatus::InvalidHandle),
        };
        if slot.generation != generation || slot.monitor.is_none() {
            return Err(HwmonStatus::InvalidHandle);
        }

        slot.monitor = None;
        slot.generation = match slot.generation.wrapping_add(1) {
            0 => 1,
            g => g,
        };
        inner.free.push(index);
        inner.live -= 1;
        Ok(())
    }

    /// Number of currently live handles.
    pub fn live_count(&self) -> usize {
        self.inner.read().live
    }
}

static TABLE: HandleTable = HandleTable::new();

/// The process-wide table behind the FFI surface.
pub fn global() -> &'static HandleTable {
    &TABLE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MonitorError;

    struct FakeMonitor {
        text: String,
        refreshes: usize,
    }

    impl FakeMonitor {
        fn new(text: &str) -> Box<dyn MonitorSource> {
            Box::new(Self {
                text: text.to_string(),
                refreshes: 0,
            })
        }
    }

    impl MonitorSource for FakeMonitor {
        fn refresh(&mut self) -> Result<(), MonitorError> {
            self.refreshes += 1;
            Ok(())
        }

        fn report(&self) -> Result<String, MonitorError> {
            Ok(format!("{}:{}", self.text, self.refreshes))
        }

        fn sensor_count(&self) -> usize {
            1
        }
    }

    #[test]
    fn test_insert_resolve_remove() {
        let table = HandleTable::new();
        let handle = table.insert(FakeMonitor::new("a")).unwrap();
        assert_ne!(handle, 0);
        assert_eq!(table.live_count(), 1);

        assert!(table.resolve(handle).is_some());
        table.remove(handle).unwrap();
        assert_eq!(table.live_count(), 0);
        assert!(table.resolve(handle).is_none());
    }

    #[test]
    fn test_double_remove_is_detected() {
        let table = HandleTable::new();
        let handle = table.insert(FakeMonitor::new("a")).unwrap();
        table.remove(handle).unwrap();
        assert_eq!(table.remove(handle), Err(HwmonStatus::InvalidHandle));
    }

    #[test]
    fn test_foreign_tokens_rejected() {
        let table = HandleTable::new();
        let _keep = table.insert(FakeMonitor::new("a")).unwrap();

        assert!(table.resolve(0).is_none());
        assert!(table.resolve(0xDEAD_BEEF_DEAD_BEEF).is_none());
        assert_eq!(
            table.remove(0xDEAD_BEEF_DEAD_BEEF),
            Err(HwmonStatus::InvalidHandle)
        );
    }

    #[test]
    fn test_slot_reuse_does_not_resurrect_old_token() {
        let table = HandleTable::new();
        let first = table.insert(FakeMonitor::new("first")).unwrap();
        table.remove(first).unwrap();

        let second = table.insert(FakeMonitor::new("second")).unwrap();
        // Same slot, new generation
        assert_ne!(first, second);
        assert!(table.resolve(first).is_none());

        let monitor = table.resolve(second).unwrap();
        assert_eq!(monitor.lock().report().unwrap(), "second:0");
    }

    #[test]
    fn test_handles_are_independent() {
        let table = HandleTable::new();
        let a = table.insert(FakeMonitor::new("a")).unwrap();
        let b = table.insert(FakeMonitor::new("b")).unwrap();

        table.resolve(a).unwrap().lock().refresh().unwrap();
        table.resolve(a).unwrap().lock().refresh().unwrap();

        assert_eq!(table.resolve(a).unwrap().lock().report().unwrap(), "a:2");
        assert_eq!(table.resolve(b).unwrap().lock().report().unwrap(), "b:0");

        table.remove(a).unwrap();
        // b keeps working after a is gone
        assert_eq!(table.resolve(b).unwrap().lock().report().unwrap(), "b:0");
        table.remove(b).unwrap();
    }

    #[test]
    fn test_in_flight_arc_survives_remove() {
        let table = HandleTable::new();
        let handle = table.insert(FakeMonitor::new("a")).unwrap();
        let monitor = table.resolve(handle).unwrap();

        table.remove(handle).unwrap();
        // The clone taken before removal still works; the slot is gone.
        assert_eq!(monitor.lock().report().unwrap(), "a:0");
        assert!(table.resolve(handle).is_none());
    }
}
