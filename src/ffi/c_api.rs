//! # C API
//!
//! C-compatible FFI functions for native hosts.
//!
//! All functions follow the naming convention: `wallet_native_<action>`.
//! Buffers are passed as `(pointer, length)`; the pointer may be null only
//! when the length is zero.

use std::os::raw::c_char;

use zeroize::Zeroizing;

use super::types::*;
use crate::bridge::{self, BufferHost};
use crate::config::AdapterConfig;
use crate::crypto::{self, KdfParams};
use crate::error::{Error, Result};
use crate::WalletNative;

// ============================================================================
// BUFFER HOST
// ============================================================================

/// A caller-owned `(pointer, length)` pair
#[derive(Debug, Clone, Copy)]
pub struct RawBytes {
    ptr: *const u8,
    len: usize,
}

impl RawBytes {
    /// Describe `len` bytes at `ptr`
    ///
    /// # Safety
    /// When `len > 0` and `ptr` is non-null, `ptr` must be valid for reads
    /// of `len` bytes for as long as the value is used.
    pub unsafe fn new(ptr: *const u8, len: usize) -> Self {
        Self { ptr, len }
    }
}

/// Host for C callers: views borrow caller memory, output becomes [`FfiBytes`]
#[derive(Debug, Default)]
pub struct RawHost;

impl<'a> BufferHost<'a> for RawHost {
    type Array = RawBytes;
    type View = &'a [u8];
    type Output = FfiBytes;

    fn acquire(&mut self, array: &'a RawBytes) -> Result<&'a [u8]> {
        if array.len == 0 {
            return Ok(crypto::empty_view());
        }
        if array.ptr.is_null() {
            return Err(Error::InvalidInput(format!(
                "null pointer with length {}",
                array.len
            )));
        }
        // SAFETY: upheld by the contract of `RawBytes::new`
        Ok(unsafe { std::slice::from_raw_parts(array.ptr, array.len) })
    }

    fn export(&mut self, bytes: Zeroizing<Vec<u8>>) -> Result<FfiBytes> {
        Ok(FfiBytes::from_secret(bytes))
    }
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize the adapter
///
/// Optional; calls made without it use the default configuration.
///
/// # Arguments
/// * `config_json` - `AdapterConfig` as JSON (null for defaults)
///
/// # Returns
/// FfiResult with success/error status
///
/// # Safety
/// `config_json` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn wallet_native_init(config_json: *const c_char) -> FfiResult {
    let config = if config_json.is_null() {
        Ok(AdapterConfig::default())
    } else {
        match cstr_to_string(config_json) {
            Some(json) => AdapterConfig::from_json(&json),
            None => Err(Error::InvalidInput("config is not valid UTF-8".into())),
        }
    };

    match config.and_then(WalletNative::initialize) {
        Ok(()) => FfiResult::ok_empty(),
        Err(e) => FfiResult::err(e.code(), e.to_string()),
    }
}

/// Get the adapter version
///
/// Free the returned string with `wallet_native_free_string`.
#[no_mangle]
pub extern "C" fn wallet_native_version() -> *mut c_char {
    string_to_raw(crate::version().to_string())
}

// ============================================================================
// BLOCK HASH
// ============================================================================

/// Double Grøstl hash of `len` bytes at `data`
///
/// # Returns
/// FfiResult whose `data` holds the 32-byte digest in internal byte order
///
/// # Safety
/// `data` must be valid for reads of `len` bytes, or null with `len == 0`.
#[no_mangle]
pub unsafe extern "C" fn wallet_native_groestl_hash(data: *const u8, len: usize) -> FfiResult {
    let input = RawBytes::new(data, len);
    FfiResult::from_result(bridge::hash_across(&mut RawHost, &input))
}

// ============================================================================
// KEY DERIVATION
// ============================================================================

/// scrypt key derivation
///
/// # Arguments
/// * `passwd`, `passwd_len` - passphrase bytes
/// * `salt`, `salt_len` - salt bytes
/// * `n`, `r`, `p` - cost parameters
/// * `dk_len` - requested key length
///
/// # Returns
/// FfiResult whose `data` holds exactly `dk_len` bytes, or an error with
/// code 300 (invalid parameter), 301 (resource exhausted), 302 (derivation
/// failed) or 400 (out of memory)
///
/// # Safety
/// Each pointer must be valid for reads of its length, or null with a zero
/// length.
#[no_mangle]
pub unsafe extern "C" fn wallet_native_scrypt(
    passwd: *const u8,
    passwd_len: usize,
    salt: *const u8,
    salt_len: usize,
    n: u64,
    r: u32,
    p: u32,
    dk_len: usize,
) -> FfiResult {
    let passwd = RawBytes::new(passwd, passwd_len);
    let salt = RawBytes::new(salt, salt_len);
    let params = KdfParams::new(n, r, p, dk_len);
    let limits = WalletNative::config().kdf_limits();

    FfiResult::from_result(bridge::derive_across(
        &mut RawHost,
        &passwd,
        &salt,
        &params,
        &limits,
    ))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use std::ffi::CString;
    use std::ptr;

    unsafe fn take_bytes(result: FfiResult) -> Vec<u8> {
        assert_eq!(result.success, 1, "call failed: {:?}", cstr_to_string(result.error_message));
        let out = std::slice::from_raw_parts(result.data.ptr, result.data.len).to_vec();
        wallet_native_free_result(result);
        out
    }

    #[test]
    fn test_hash_null_pointer_zero_length() {
        let out = unsafe { take_bytes(wallet_native_groestl_hash(ptr::null(), 0)) };

        assert_eq!(out, crypto::hash(&[]).to_vec());
        assert_eq!(out.len(), 32);
    }

    #[test]
    fn test_hash_null_pointer_nonzero_length() {
        let result = unsafe { wallet_native_groestl_hash(ptr::null(), 4) };

        assert_eq!(result.success, 0);
        assert_eq!(result.error_code, 401);
        assert!(result.data.ptr.is_null());
        unsafe { wallet_native_free_result(result) };
    }

    #[test]
    fn test_hash_matches_library() {
        let data = b"block header bytes";
        let out = unsafe { take_bytes(wallet_native_groestl_hash(data.as_ptr(), data.len())) };

        assert_eq!(out, crypto::hash(data).to_vec());
    }

    #[test]
    fn test_scrypt_rfc_vector() {
        let out = unsafe {
            take_bytes(wallet_native_scrypt(ptr::null(), 0, ptr::null(), 0, 16, 1, 1, 64))
        };

        assert_eq!(
            out,
            hex!(
                "77d6576238657b203b19ca42c18a0497f16b4844e3074ae8dfdffa3fede21442"
                "fcd0069ded0948f8326a753a0fc81f17e8d3e0fb2e0d3628cf35e20c38d18906"
            )
        );
    }

    #[test]
    fn test_scrypt_invalid_n() {
        let pw = b"pw";
        let result =
            unsafe { wallet_native_scrypt(pw.as_ptr(), pw.len(), pw.as_ptr(), pw.len(), 3, 1, 1, 32) };

        assert_eq!(result.success, 0);
        assert_eq!(result.error_code, 300);
        let message = unsafe { cstr_to_string(result.error_message) }.unwrap();
        assert_eq!(message, crypto::MSG_INVALID_N);
        unsafe { wallet_native_free_result(result) };
    }

    #[test]
    fn test_scrypt_null_salt_with_length() {
        let pw = b"pw";
        let result =
            unsafe { wallet_native_scrypt(pw.as_ptr(), pw.len(), ptr::null(), 8, 16, 1, 1, 32) };

        assert_eq!(result.error_code, 401);
        unsafe { wallet_native_free_result(result) };
    }

    #[test]
    fn test_init_rejects_malformed_config() {
        let json = CString::new("{ not json").unwrap();
        let result = unsafe { wallet_native_init(json.as_ptr()) };

        assert_eq!(result.success, 0);
        assert_eq!(result.error_code, 102);
        unsafe { wallet_native_free_result(result) };
    }

    #[test]
    fn test_version() {
        let ptr = wallet_native_version();
        assert_eq!(unsafe { cstr_to_string(ptr) }.as_deref(), Some(crate::version()));
        unsafe { wallet_native_free_string(ptr) };
    }
}
