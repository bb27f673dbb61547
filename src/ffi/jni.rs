//! # JNI Bindings
//!
//! Native methods for the JVM wallet, registered from `JNI_OnLoad`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         REGISTERED NATIVES                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  com/lambdaworks/crypto/SCrypt                                         │
//! │      static native byte[] scryptN(byte[] passwd, byte[] salt,          │
//! │                                   int N, int r, int p, int dkLen)      │
//! │                                                                         │
//! │  com/hashengineering/crypto/Groestl                                    │
//! │      static native byte[] groestld_native(byte[] input)                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Class names come from [`AdapterConfig`]. Every call either returns a new
//! `byte[]` or leaves exactly one pending exception and returns null:
//!
//! | Error | Throwable |
//! |-------|-----------|
//! | InvalidParameter / ResourceExhausted / DerivationFailed | `java.lang.IllegalArgumentException` |
//! | OutOfMemory | `java.lang.OutOfMemoryError` |
//!
//! Array views are pinned with `ReleaseMode::NoCopyBack` and released when
//! their guard drops, so the managed arrays are never written.

use std::ffi::c_void;
use std::ops::Deref;

use jni::objects::{AutoElements, JByteArray, JClass, ReleaseMode};
use jni::sys::{jbyte, jbyteArray, jint, JNI_ERR, JNI_VERSION_1_6};
use jni::{JNIEnv, JavaVM, NativeMethod};
use zeroize::Zeroizing;

use crate::bridge::{self, BufferHost};
use crate::config::AdapterConfig;
use crate::crypto::{self, KdfParams};
use crate::error::{Error, Result};
use crate::WalletNative;

/// JVM signature of `scryptN`
pub const SCRYPT_SIGNATURE: &str = "([B[BIIII)[B";

/// JVM signature of `groestld_native`
pub const GROESTL_SIGNATURE: &str = "([B)[B";

// ============================================================================
// BUFFER HOST
// ============================================================================

/// Host backed by the calling thread's `JNIEnv`
pub struct JniHost<'e, 'local> {
    env: &'e mut JNIEnv<'local>,
}

impl<'e, 'local> JniHost<'e, 'local> {
    /// Wrap the environment of the current native call
    pub fn new(env: &'e mut JNIEnv<'local>) -> Self {
        Self { env }
    }
}

/// A pinned `byte[]`, released without copy-back on drop
pub enum JniBytes<'local, 'array> {
    /// Zero-length arrays are never pinned
    Empty,
    /// Elements pinned by the JVM
    Pinned(AutoElements<'local, 'local, 'array, jbyte>),
}

impl Deref for JniBytes<'_, '_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            JniBytes::Empty => crypto::empty_view(),
            // SAFETY: jbyte and u8 share size and alignment; the elements
            // stay pinned while `self` is borrowed
            JniBytes::Pinned(elements) => unsafe {
                std::slice::from_raw_parts(elements.as_ptr().cast::<u8>(), elements.len())
            },
        }
    }
}

impl<'a, 'e, 'local: 'a> BufferHost<'a> for JniHost<'e, 'local> {
    type Array = JByteArray<'local>;
    type View = JniBytes<'local, 'a>;
    type Output = JByteArray<'local>;

    fn acquire(&mut self, array: &'a JByteArray<'local>) -> Result<JniBytes<'local, 'a>> {
        if array.is_null() {
            return Err(Error::InvalidInput("byte array is null".into()));
        }

        let len = self
            .env
            .get_array_length(array)
            .map_err(|e| Error::OutOfMemory(format!("cannot read array length: {}", e)))?;
        if len == 0 {
            return Ok(JniBytes::Empty);
        }

        // SAFETY: the view is read-only and released before the native
        // method returns
        let elements = unsafe { self.env.get_array_elements(array, ReleaseMode::NoCopyBack) }
            .map_err(|e| Error::OutOfMemory(format!("cannot pin byte array: {}", e)))?;
        Ok(JniBytes::Pinned(elements))
    }

    fn export(&mut self, bytes: Zeroizing<Vec<u8>>) -> Result<JByteArray<'local>> {
        self.env
            .byte_array_from_slice(&bytes)
            .map_err(|e| Error::OutOfMemory(format!("cannot allocate byte[]: {}", e)))
    }
}

// ============================================================================
// NATIVE METHODS
// ============================================================================

extern "system" fn scrypt_n<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    passwd: JByteArray<'local>,
    salt: JByteArray<'local>,
    n: jint,
    r: jint,
    p: jint,
    dk_len: jint,
) -> jbyteArray {
    let limits = WalletNative::config().kdf_limits();

    let result = KdfParams::from_host(n, r, p, dk_len).and_then(|params| {
        let mut host = JniHost::new(&mut env);
        bridge::derive_across(&mut host, &passwd, &salt, &params, &limits)
    });

    finish(&mut env, result)
}

extern "system" fn groestld_native<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    input: JByteArray<'local>,
) -> jbyteArray {
    let result = bridge::hash_across(&mut JniHost::new(&mut env), &input);
    finish(&mut env, result)
}

/// Return the array, or raise the error and return null
fn finish<'local>(env: &mut JNIEnv<'local>, result: Result<JByteArray<'local>>) -> jbyteArray {
    match result {
        Ok(array) => array.into_raw(),
        Err(err) => {
            throw(env, &err);
            std::ptr::null_mut()
        }
    }
}

fn throw(env: &mut JNIEnv<'_>, err: &Error) {
    // The JVM may already have raised something while we held its arrays
    if env.exception_check().unwrap_or(false) {
        return;
    }
    if let Err(e) = env.throw_new(err.host_exception_class(), err.to_string()) {
        tracing::error!("Failed to raise {}: {}", err.host_exception_class(), e);
    }
}

// ============================================================================
// REGISTRATION
// ============================================================================

/// Register the natives on the configured classes
///
/// The scrypt native is required; the Grøstl native is registered when its
/// class is present.
pub fn register_natives(env: &mut JNIEnv<'_>, config: &AdapterConfig) -> Result<()> {
    let scrypt = [NativeMethod {
        name: "scryptN".into(),
        sig: SCRYPT_SIGNATURE.into(),
        fn_ptr: scrypt_n as *mut c_void,
    }];
    env.register_native_methods(config.scrypt_class.as_str(), &scrypt)
        .map_err(|e| {
            Error::Internal(format!("cannot register natives on {}: {}", config.scrypt_class, e))
        })?;
    tracing::info!("Registered scryptN on {}", config.scrypt_class);

    let groestl = [NativeMethod {
        name: "groestld_native".into(),
        sig: GROESTL_SIGNATURE.into(),
        fn_ptr: groestld_native as *mut c_void,
    }];
    match env.register_native_methods(config.groestl_class.as_str(), &groestl) {
        Ok(()) => tracing::info!("Registered groestld_native on {}", config.groestl_class),
        Err(e) => {
            tracing::warn!("Skipping groestld_native on {}: {}", config.groestl_class, e);
            let _ = env.exception_clear();
        }
    }

    Ok(())
}

/// Library load hook: install the default configuration unless the host
/// already initialized the adapter, then register the natives
///
/// # Safety
/// Called by the JVM with a valid `JavaVM` pointer.
#[no_mangle]
pub unsafe extern "system" fn JNI_OnLoad(vm: *mut jni::sys::JavaVM, _reserved: *mut c_void) -> jint {
    let vm = match JavaVM::from_raw(vm) {
        Ok(vm) => vm,
        Err(_) => return JNI_ERR,
    };
    let mut env = match vm.get_env() {
        Ok(env) => env,
        Err(_) => return JNI_ERR,
    };

    match WalletNative::initialize(AdapterConfig::default()) {
        Ok(()) | Err(Error::AlreadyInitialized) => {}
        Err(e) => {
            tracing::error!("Adapter initialization failed: {}", e);
            return JNI_ERR;
        }
    }

    match register_natives(&mut env, WalletNative::config()) {
        Ok(()) => JNI_VERSION_1_6,
        Err(e) => {
            tracing::error!("{}", e);
            JNI_ERR
        }
    }
}
