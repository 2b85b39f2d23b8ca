//! Result structures for FFI operations.
//!
//! Provides standardized result structures that include status codes,
//! byte accounting, and timing information.

use crate::error::HwmonStatus;

/// Result of a report copy into a caller-owned buffer.
///
/// `required` is the untruncated report length (terminator excluded) in the
/// destination encoding's units, so a caller seeing `Truncated` can retry
/// with a buffer of `required + 1`.
///
/// # C# Mapping
/// ```csharp
/// [StructLayout(LayoutKind.Sequential)]
/// public struct ReportResult {
///     public HwmonStatus Status;
///     public ulong Written;
///     public ulong Required;
///     public ulong ElapsedMs;
/// }
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportResult {
    /// Operation status code
    pub status: HwmonStatus,

    /// Content units written to the buffer (terminator excluded)
    pub written: u64,

    /// Untruncated report length (terminator excluded)
    pub required: u64,

    /// Elapsed time in milliseconds
    pub elapsed_ms: u64,
}

impl ReportResult {
    pub fn new(status: HwmonStatus, written: u64, required: u64, elapsed_ms: u64) -> Self {
        Self {
            status,
            written,
            required,
            elapsed_ms,
        }
    }

    /// Creates an error result with the given status.
    pub fn error(status: HwmonStatus) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    /// Returns true if the operation was successful.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Result of a sensor refresh.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct RefreshResult {
    /// Operation status code
    pub status: HwmonStatus,

    /// Number of sensors tracked after the refresh
    pub sensors: u64,

    /// Elapsed time in milliseconds
    pub elapsed_ms: u64,
}

impl RefreshResult {
    pub fn success(sensors: u64, elapsed_ms: u64) -> Self {
        Self {
            status: HwmonStatus::Success,
            sensors,
            elapsed_ms,
        }
    }

    /// Creates an error result with the given status.
    pub fn error(status: HwmonStatus) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_result_success() {
        let result = ReportResult::new(HwmonStatus::Success, 120, 120, 3);
        assert!(result.is_success());
        assert_eq!(result.written, 120);
        assert_eq!(result.required, 120);
    }

    #[test]
    fn test_report_result_truncated_carries_required() {
        let result = ReportResult::new(HwmonStatus::Truncated, 4, 8, 0);
        assert!(!result.is_success());
        assert_eq!(result.required, 8);
    }

    #[test]
    fn test_refresh_result_error() {
        let result = RefreshResult::error(HwmonStatus::InvalidHandle);
        assert_eq!(result.status, HwmonStatus::InvalidHandle);
        assert_eq!(result.sensors, 0);
    }
}
