//! hwmon_core - Hardware Monitor Handle Boundary
//!
//! This crate provides C-callable entry points for driving a hardware monitor
//! through an opaque handle. The four historical exports
//! (`CreateHardwareMonitor`, `UpdateHardwareMonitor`, `GetReport`,
//! `DestroyHardwareMonitor`) keep their exact signatures; the `hwmon_*`
//! exports add status codes, truncation accounting, and stale-handle
//! detection on top of the same handle table.
//!
//! Handles are tokens into a process-wide table with per-slot generation
//! counters, so null, foreign, and already-destroyed handles are rejected
//! with a status instead of dereferencing freed state.

// Allow raw pointer dereference in non-unsafe FFI functions - this is intentional
// as all FFI entry points perform null checks before dereferencing.
#![allow(clippy::not_unsafe_ptr_arg_deref)]

use std::os::raw::{c_char, c_void};
use std::time::Instant;

use libc::c_int;

pub mod error;
pub mod handle;
pub mod monitor;
pub mod result;
pub mod string;
pub mod sysmon;

pub use error::{HwmonStatus, MonitorError};
pub use handle::RawHandle;
pub use monitor::{Hardware, HardwareType, MonitorConfig, MonitorSource, Sensor, SensorType};
pub use result::{RefreshResult, ReportResult};
pub use string::{HwmonStringBuffer, c_str_to_rust, hwmon_free_string_buffer, rust_str_to_c};
pub use sysmon::SystemMonitor;

include!(concat!(env!("OUT_DIR"), "/version.rs"));

/// Magic number for DLL verification ("HWMN")
pub const MAGIC_NUMBER: u32 = 0x4857_4D4E;

/// Registers a custom monitor source and returns its handle token, or `None`
/// if the table is full. Rust hosts embedding the rlib use this to put their
/// own `MonitorSource` behind the same FFI surface the default monitor uses.
pub fn register_monitor(source: Box<dyn MonitorSource>) -> Option<RawHandle> {
    handle::global().insert(source).ok()
}

fn token_of(ptr: *mut c_void) -> RawHandle {
    ptr as usize as RawHandle
}

fn ptr_of(token: RawHandle) -> *mut c_void {
    token as usize as *mut c_void
}

// ============================================================================
// Version and Probe Exports
// ============================================================================

#[no_mangle]
pub extern "C" fn hwmon_core_version() -> *const c_char {
    VERSION_CSTR.as_ptr() as *const c_char
}

#[no_mangle]
pub extern "C" fn hwmon_core_test() -> u32 {
    MAGIC_NUMBER
}

/// Installs the env_logger backend (filtered via `RUST_LOG`). Returns true if
/// this call installed it, false if a logger was already set.
#[no_mangle]
pub extern "C" fn hwmon_init_logging() -> bool {
    env_logger::try_init().is_ok()
}

/// Number of currently live handles. Create/destroy balance checks in host
/// test suites hinge on this.
#[no_mangle]
pub extern "C" fn hwmon_live_count() -> u32 {
    handle::global().live_count() as u32
}

// ============================================================================
// Lifecycle Exports
// ============================================================================

/// Creates a monitor with default sections enabled and returns its handle.
/// Returns null on failure; never unwinds across the boundary.
#[no_mangle]
pub extern "C" fn hwmon_create() -> *mut c_void {
    create_with(MonitorConfig::default())
}

/// Creates a monitor from a JSON configuration document, e.g.
/// `{"network": false}`. Null config means defaults; a malformed document
/// fails with a null handle rather than guessing.
#[no_mangle]
pub extern "C" fn hwmon_create_with_config(config_json: *const c_char) -> *mut c_void {
    let config = if config_json.is_null() {
        MonitorConfig::default()
    } else {
        let json = match unsafe { c_str_to_rust(config_json) } {
            Some(s) => s,
            None => return std::ptr::null_mut(),
        };
        match MonitorConfig::from_json(json) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("rejected monitor config: {}", e);
                return std::ptr::null_mut();
            }
        }
    };

    create_with(config)
}

fn create_with(config: MonitorConfig) -> *mut c_void {
    let monitor = SystemMonitor::new(config);
    match handle::global().insert(Box::new(monitor)) {
        Ok(token) => {
            log::debug!("created monitor handle {:#x}", token);
            ptr_of(token)
        }
        Err(status) => {
            log::warn!("monitor create failed: {}", status.description());
            std::ptr::null_mut()
        }
    }
}

/// Refreshes sensor values behind a handle.
#[no_mangle]
pub extern "C" fn hwmon_update(handle: *mut c_void) -> RefreshResult {
    let token = token_of(handle);
    if token == 0 {
        return RefreshResult::error(HwmonStatus::NullPointer);
    }

    let monitor = match handle::global().resolve(token) {
        Some(m) => m,
        None => return RefreshResult::error(HwmonStatus::InvalidHandle),
    };

    let start = Instant::now();
    let mut guard = monitor.lock();
    match guard.refresh() {
        Ok(()) => RefreshResult::success(
            guard.sensor_count() as u64,
            start.elapsed().as_millis() as u64,
        ),
        Err(e) => {
            log::warn!("monitor refresh failed: {}", e);
            RefreshResult::error(HwmonStatus::from(&e))
        }
    }
}

/// Destroys a handle, dropping the monitor. Stale and foreign tokens are
/// reported as `InvalidHandle`; destroying twice is a diagnosable error, not
/// a crash.
#[no_mangle]
pub extern "C" fn hwmon_destroy(handle: *mut c_void) -> HwmonStatus {
    let token = token_of(handle);
    if token == 0 {
        return HwmonStatus::NullPointer;
    }

    match handle::global().remove(token) {
        Ok(()) => {
            log::debug!("destroyed monitor handle {:#x}", token);
            HwmonStatus::Success
        }
        Err(status) => status,
    }
}

// ============================================================================
// Report Exports
// ============================================================================

fn fetch_report(handle: *mut c_void) -> Result<String, HwmonStatus> {
    let token = token_of(handle);
    if token == 0 {
        return Err(HwmonStatus::NullPointer);
    }

    let monitor = match handle::global().resolve(token) {
        Some(m) => m,
        None => return Err(HwmonStatus::InvalidHandle),
    };

    let guard = monitor.lock();
    guard.report().map_err(|e| {
        log::warn!("report serialization failed: {}", e);
        HwmonStatus::from(&e)
    })
}

/// Copies the JSON report into a caller-owned byte buffer.
///
/// The buffer always holds a validly NUL-terminated string on return: the
/// report, its truncation, or an empty string on failure. `required` in the
/// result is the full report length in bytes (terminator excluded).
#[no_mangle]
pub extern "C" fn hwmon_report(handle: *mut c_void, buf: *mut c_char, cap: c_int) -> ReportResult {
    if buf.is_null() {
        return ReportResult::error(HwmonStatus::NullPointer);
    }
    if cap < 1 {
        return ReportResult::error(HwmonStatus::InvalidArgument);
    }
    let cap = cap as usize;

    let start = Instant::now();
    let report = match fetch_report(handle) {
        Ok(r) => r,
        Err(status) => {
            unsafe { *buf = 0 };
            return ReportResult::error(status);
        }
    };

    let required = report.len() as u64;
    let (status, written) = unsafe { string::copy_to_buffer(&report, buf, cap) };
    ReportResult::new(
        status,
        written as u64,
        required,
        start.elapsed().as_millis() as u64,
    )
}

/// UTF-16 variant of [`hwmon_report`] for wide-character hosts. `cap` counts
/// code units; encode failure yields `ConversionFailed` with an emptied,
/// terminated buffer, distinct from a genuinely empty report.
#[no_mangle]
pub extern "C" fn hwmon_report_wide(
    handle: *mut c_void,
    buf: *mut u16,
    cap: c_int,
) -> ReportResult {
    if buf.is_null() {
        return ReportResult::error(HwmonStatus::NullPointer);
    }
    if cap < 1 {
        return ReportResult::error(HwmonStatus::InvalidArgument);
    }
    let cap = cap as usize;

    let start = Instant::now();
    let report = match fetch_report(handle) {
        Ok(r) => r,
        Err(status) => {
            unsafe { *buf = 0 };
            return ReportResult::error(status);
        }
    };

    let required = report.encode_utf16().count() as u64;
    let (status, written) = unsafe { string::copy_to_wide_buffer(&report, buf, cap) };
    ReportResult::new(
        status,
        written as u64,
        required,
        start.elapsed().as_millis() as u64,
    )
}

/// Allocating report variant: returns an owned buffer the caller releases
/// with `hwmon_free_string_buffer`. Avoids the guess-and-retry dance when the
/// host can manage a foreign allocation.
#[no_mangle]
pub extern "C" fn hwmon_report_buffer(handle: *mut c_void) -> HwmonStringBuffer {
    match fetch_report(handle) {
        Ok(report) => HwmonStringBuffer::from_string(&report),
        Err(status) => HwmonStringBuffer::error(status),
    }
}

// ============================================================================
// Legacy Exports
// ============================================================================
//
// The historical boundary: four functions, no status reporting. They are thin
// wrappers over the hardened paths, so invalid handles degrade to logged
// no-ops instead of undefined behavior.

#[allow(non_snake_case)]
#[no_mangle]
pub extern "C" fn CreateHardwareMonitor() -> *mut c_void {
    hwmon_create()
}

#[allow(non_snake_case)]
#[no_mangle]
pub extern "C" fn UpdateHardwareMonitor(handle: *mut c_void) {
    let result = hwmon_update(handle);
    if result.status.is_error() {
        log::warn!("UpdateHardwareMonitor: {}", result.status.description());
    }
}

#[allow(non_snake_case)]
#[no_mangle]
pub extern "C" fn GetReport(handle: *mut c_void, buffer: *mut c_char, buffer_size: c_int) {
    let result = hwmon_report(handle, buffer, buffer_size);
    if result.status.is_error() && result.status != HwmonStatus::Truncated {
        log::warn!("GetReport: {}", result.status.description());
    }
}

#[allow(non_snake_case)]
#[no_mangle]
pub extern "C" fn DestroyHardwareMonitor(handle: *mut c_void) {
    let status = hwmon_destroy(handle);
    if status.is_error() {
        log::warn!("DestroyHardwareMonitor: {}", status.description());
    }
}
