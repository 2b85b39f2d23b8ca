//! String marshaling utilities for FFI.
//!
//! Caller-buffer copies always leave a validly terminated string behind, even
//! on failure, and report the untruncated length so hosts can retry with a
//! larger buffer. Encoding failures are surfaced as a distinct status, never
//! as a silently emptied buffer.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use widestring::U16CString;

use crate::error::HwmonStatus;

/// Owned string result crossing the ABI.
///
/// `data` is a NUL-terminated allocation owned by this library; release it
/// with `hwmon_free_string_buffer`. `length` excludes the terminator.
#[repr(C)]
#[derive(Debug)]
pub struct HwmonStringBuffer {
    pub status: HwmonStatus,
    pub data: *mut c_char,
    pub length: usize,
}

impl HwmonStringBuffer {
    pub fn from_string(s: &str) -> Self {
        match CString::new(s) {
            Ok(c_string) => {
                let len = c_string.as_bytes().len();
                Self {
                    status: HwmonStatus::Success,
                    data: c_string.into_raw(),
                    length: len,
                }
            }
            Err(_) => Self::error(HwmonStatus::ConversionFailed),
        }
    }

    pub fn error(status: HwmonStatus) -> Self {
        Self {
            status,
            data: std::ptr::null_mut(),
            length: 0,
        }
    }

    pub fn null() -> Self {
        Self {
            status: HwmonStatus::NullPointer,
            data: std::ptr::null_mut(),
            length: 0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status.is_success() && !self.data.is_null()
    }
}

impl Default for HwmonStringBuffer {
    fn default() -> Self {
        Self::null()
    }
}

/// Releases a buffer previously returned by a report export.
#[no_mangle]
pub extern "C" fn hwmon_free_string_buffer(buffer: *mut HwmonStringBuffer) {
    if !buffer.is_null() {
        let buf = unsafe { &mut *buffer };
        if !buf.data.is_null() {
            unsafe {
                let _ = CString::from_raw(buf.data);
            }
            buf.data = std::ptr::null_mut();
            buf.length = 0;
        }
    }
}

/// Copies `text` into a caller-owned byte buffer of `cap` bytes, always
/// writing a NUL terminator. Returns the status and the number of content
/// bytes written (terminator excluded).
///
/// Truncation cuts at `cap - 1` bytes; the cut may split a UTF-8 sequence,
/// which is the byte-oriented legacy contract.
///
/// # Safety
/// `buf` must be valid for writes of `cap` bytes.
pub unsafe fn copy_to_buffer(text: &str, buf: *mut c_char, cap: usize) -> (HwmonStatus, usize) {
    debug_assert!(cap >= 1);

    let bytes = text.as_bytes();
    let content = bytes.len().min(cap - 1);

    std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf as *mut u8, content);
    *buf.add(content) = 0;

    if content < bytes.len() {
        (HwmonStatus::Truncated, content)
    } else {
        (HwmonStatus::Success, content)
    }
}

/// Wide (UTF-16) variant of [`copy_to_buffer`]; `cap` counts code units, not
/// bytes, and truncation lands on whole code units. Interior NULs in the text
/// fail with `ConversionFailed` and leave an empty terminated buffer behind.
///
/// # Safety
/// `buf` must be valid for writes of `cap` u16 code units.
pub unsafe fn copy_to_wide_buffer(text: &str, buf: *mut u16, cap: usize) -> (HwmonStatus, usize) {
    debug_assert!(cap >= 1);

    let wide = match U16CString::from_str(text) {
        Ok(w) => w,
        Err(_) => {
            *buf = 0;
            return (HwmonStatus::ConversionFailed, 0);
        }
    };

    let units = wide.as_slice();
    let content = units.len().min(cap - 1);

    std::ptr::copy_nonoverlapping(units.as_ptr(), buf, content);
    *buf.add(content) = 0;

    if content < units.len() {
        (HwmonStatus::Truncated, content)
    } else {
        (HwmonStatus::Success, content)
    }
}

/// Decodes a UTF-16 buffer from a wide-character host. Unpaired surrogates
/// are an error, not a replacement character.
pub fn decode_wide(units: &[u16]) -> Result<String, HwmonStatus> {
    String::from_utf16(units).map_err(|_| HwmonStatus::ConversionFailed)
}

pub fn rust_str_to_c(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(c_string) => c_string.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// # Safety
/// `ptr` must be null or point to a NUL-terminated string.
pub unsafe fn c_str_to_rust<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}
