//! # FFI Types
//!
//! C-compatible types for the `wallet_native_*` exports.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use zeroize::{Zeroize, Zeroizing};

/// FFI-safe result type
///
/// Exactly one of `error_message` and `data` is populated.
#[repr(C)]
pub struct FfiResult {
    /// Success flag (1 = success, 0 = error)
    pub success: i32,
    /// Error code (0 if success)
    pub error_code: i32,
    /// Error message (null if success)
    pub error_message: *mut c_char,
    /// Result bytes (null if error)
    pub data: FfiBytes,
}

impl FfiResult {
    /// Create a successful result carrying bytes
    pub fn ok(data: FfiBytes) -> Self {
        Self {
            success: 1,
            error_code: 0,
            error_message: std::ptr::null_mut(),
            data,
        }
    }

    /// Create a successful result without data
    pub fn ok_empty() -> Self {
        Self::ok(FfiBytes::null())
    }

    /// Create an error result
    pub fn err(code: i32, message: String) -> Self {
        Self {
            success: 0,
            error_code: code,
            error_message: string_to_raw(message),
            data: FfiBytes::null(),
        }
    }

    /// Create from a Rust Result
    pub fn from_result(result: crate::Result<FfiBytes>) -> Self {
        match result {
            Ok(bytes) => Self::ok(bytes),
            Err(e) => Self::err(e.code(), e.to_string()),
        }
    }
}

/// FFI-safe byte array owned by Rust until freed
#[repr(C)]
pub struct FfiBytes {
    /// Pointer to the data
    pub ptr: *mut u8,
    /// Length of the data
    pub len: usize,
}

impl FfiBytes {
    /// Hand a buffer to the caller
    ///
    /// The buffer is shrunk to its length before its pointer is released.
    pub fn new(data: Vec<u8>) -> Self {
        Self::from_boxed(data.into_boxed_slice())
    }

    fn from_boxed(data: Box<[u8]>) -> Self {
        let len = data.len();
        let boxed = Box::into_raw(data);
        Self {
            ptr: boxed.cast::<u8>(),
            len,
        }
    }

    /// Hand a secret buffer to the caller; the caller frees it with
    /// [`wallet_native_free_bytes`], which wipes it first
    pub fn from_secret(mut data: Zeroizing<Vec<u8>>) -> Self {
        if data.capacity() == data.len() {
            return Self::new(std::mem::take(&mut *data));
        }
        // Shrinking would reallocate and free the old buffer unwiped. Copy
        // into an exact allocation instead; `data` wipes itself on drop.
        Self::from_boxed(Box::from(data.as_slice()))
    }

    /// Create a null/empty bytes
    pub fn null() -> Self {
        Self {
            ptr: std::ptr::null_mut(),
            len: 0,
        }
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Move a Rust string to C, dropping interior NUL bytes
pub(crate) fn string_to_raw(s: String) -> *mut c_char {
    let s = if s.contains('\0') { s.replace('\0', "") } else { s };
    CString::new(s)
        .map(CString::into_raw)
        .unwrap_or(std::ptr::null_mut())
}

/// Convert a C string to a Rust String
///
/// # Safety
/// The caller must ensure the pointer is valid and null-terminated.
pub unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(String::from)
}

/// Free a C string allocated by Rust
///
/// # Safety
/// The pointer must have been allocated by Rust using CString::into_raw().
#[no_mangle]
pub unsafe extern "C" fn wallet_native_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

/// Free FfiBytes, wiping the contents first
///
/// # Safety
/// The FfiBytes must have been created by Rust FFI functions.
#[no_mangle]
pub unsafe extern "C" fn wallet_native_free_bytes(bytes: FfiBytes) {
    if !bytes.ptr.is_null() {
        let mut data = Vec::from_raw_parts(bytes.ptr, bytes.len, bytes.len);
        data.zeroize();
    }
}

/// Free an FfiResult
///
/// # Safety
/// The FfiResult must have been created by Rust FFI functions.
#[no_mangle]
pub unsafe extern "C" fn wallet_native_free_result(result: FfiResult) {
    wallet_native_free_string(result.error_message);
    wallet_native_free_bytes(result.data);
}
