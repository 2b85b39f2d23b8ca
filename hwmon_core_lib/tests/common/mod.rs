//! Shared test fixtures for FFI integration tests.

use std::os::raw::c_void;

use hwmon_core_lib::{MonitorError, MonitorSource, RawHandle, register_monitor};

/// Monitor with a fixed report text, for exercising the boundary without
/// touching real sensors.
pub struct StaticMonitor {
    text: String,
}

impl StaticMonitor {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl MonitorSource for StaticMonitor {
    fn refresh(&mut self) -> Result<(), MonitorError> {
        Ok(())
    }

    fn report(&self) -> Result<String, MonitorError> {
        Ok(self.text.clone())
    }

    fn sensor_count(&self) -> usize {
        1
    }
}

/// Registers a static-report monitor and returns its handle as the FFI
/// pointer type.
pub fn static_handle(text: &str) -> *mut c_void {
    let token: RawHandle = register_monitor(Box::new(StaticMonitor::new(text)))
        .expect("handle table should accept test monitor");
    token as usize as *mut c_void
}
