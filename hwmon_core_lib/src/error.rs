//! Error types and status codes for FFI operations.
//!
//! All status codes use `#[repr(C)]` for direct marshaling to host runtimes.

use std::os::raw::c_char;

/// Status codes returned by hwmon operations.
///
/// These codes are designed for cross-language compatibility and follow
/// a consistent pattern where 0 = success and non-zero = error.
///
/// # C# Mapping
/// ```csharp
/// public enum HwmonStatus : uint {
///     Success = 0,
///     InvalidArgument = 1,
///     NullPointer = 2,
///     // ...
/// }
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwmonStatus {
    /// Operation completed successfully
    Success = 0,

    /// Invalid argument provided (e.g., non-positive buffer capacity)
    InvalidArgument = 1,

    /// Null pointer was passed where a valid pointer was required
    NullPointer = 2,

    /// Handle is null, stale, or was never issued by this table
    InvalidHandle = 3,

    /// Report did not fit in the caller's buffer and was truncated
    Truncated = 4,

    /// Text could not be converted to the requested encoding
    ConversionFailed = 5,

    /// JSON serialization error while building the report
    JsonError = 6,

    /// The monitor backend failed to refresh sensor values
    RefreshFailed = 7,

    /// The handle table cannot accept more live handles
    TableFull = 8,

    /// Invalid UTF-8 encoding in string parameter
    InvalidUtf8 = 9,

    /// Unknown or unclassified error
    Unknown = 255,
}

impl HwmonStatus {
    /// Returns true if this status indicates success.
    #[inline]
    pub fn is_success(self) -> bool {
        self == HwmonStatus::Success
    }

    /// Returns true if this status indicates an error.
    #[inline]
    pub fn is_error(self) -> bool {
        self != HwmonStatus::Success
    }

    /// Returns a human-readable description of this status.
    pub fn description(self) -> &'static str {
        match self {
            HwmonStatus::Success => "Operation completed successfully",
            HwmonStatus::InvalidArgument => "Invalid argument provided",
            HwmonStatus::NullPointer => "Null pointer provided",
            HwmonStatus::InvalidHandle => "Handle is null, stale, or foreign",
            HwmonStatus::Truncated => "Report truncated to buffer capacity",
            HwmonStatus::ConversionFailed => "Text encoding conversion failed",
            HwmonStatus::JsonError => "JSON serialization error",
            HwmonStatus::RefreshFailed => "Monitor refresh failed",
            HwmonStatus::TableFull => "Handle table is full",
            HwmonStatus::InvalidUtf8 => "Invalid UTF-8 encoding",
            HwmonStatus::Unknown => "Unknown error",
        }
    }
}

impl Default for HwmonStatus {
    fn default() -> Self {
        HwmonStatus::Success
    }
}

/// Internal error type for monitor operations.
///
/// FFI entry points convert these into [`HwmonStatus`] codes at the seam;
/// no error value ever crosses the ABI as a Rust type.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("monitor refresh failed: {0}")]
    Refresh(String),

    #[error("report serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid monitor configuration: {0}")]
    Config(String),
}

impl From<&MonitorError> for HwmonStatus {
    fn from(error: &MonitorError) -> Self {
        match error {
            MonitorError::Refresh(_) => HwmonStatus::RefreshFailed,
            MonitorError::Serialize(_) => HwmonStatus::JsonError,
            MonitorError::Config(_) => HwmonStatus::InvalidArgument,
        }
    }
}

// FFI Exports

/// Returns a human-readable description of a status code.
///
/// # Safety
/// The returned pointer is valid for the lifetime of the program (static).
/// Do not free this pointer.
#[no_mangle]
pub extern "C" fn hwmon_status_description(status: HwmonStatus) -> *const c_char {
    // Return pointer to static null-terminated string
    match status {
        HwmonStatus::Success => "Operation completed successfully\0",
        HwmonStatus::InvalidArgument => "Invalid argument provided\0",
        HwmonStatus::NullPointer => "Null pointer provided\0",
        HwmonStatus::InvalidHandle => "Handle is null, stale, or foreign\0",
        HwmonStatus::Truncated => "Report truncated to buffer capacity\0",
        HwmonStatus::ConversionFailed => "Text encoding conversion failed\0",
        HwmonStatus::JsonError => "JSON serialization error\0",
        HwmonStatus::RefreshFailed => "Monitor refresh failed\0",
        HwmonStatus::TableFull => "Handle table is full\0",
        HwmonStatus::InvalidUtf8 => "Invalid UTF-8 encoding\0",
        HwmonStatus::Unknown => "Unknown error\0",
    }
    .as_ptr() as *const c_char
}
