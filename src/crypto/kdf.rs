//! # Wallet Key Derivation
//!
//! scrypt turns a low-entropy passphrase plus salt into the key that encrypts
//! the wallet.
//!
//! ## Failure Classification
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    SCRYPT FAILURE CLASSIFICATION                        │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Checked in order, before any memory-hard work starts:                 │
//! │                                                                         │
//! │  N < 2 or N not a power of two      ──►  InvalidParameter              │
//! │  r == 0, p == 0 or dkLen == 0       ──►  InvalidParameter              │
//! │  r·p ≥ 2^30                         ──►  ResourceExhausted             │
//! │  dkLen > (2^32 - 1)·32              ──►  ResourceExhausted             │
//! │  128·r·(N + p) + 256·r > ceiling    ──►  ResourceExhausted             │
//! │  N ≥ 2^(16·r) (addressing limit)    ──►  ResourceExhausted             │
//! │  anything the primitive reports     ──►  DerivationFailed              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The classification is carried by an explicit failure value returned
//! from the primitive adapter; nothing is read from ambient error state.
//!
//! ## Wallet Parameters
//!
//! | Parameter | Value |
//! |-----------|-------|
//! | N         | 4096  |
//! | r         | 8     |
//! | p         | 1     |
//! | dkLen     | 32    |
//! | salt      | 8 random bytes |

use std::fmt;

use rand::RngCore;
use scrypt::Params;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::config::DEFAULT_MAX_KDF_MEMORY_BYTES;
use crate::error::{Error, Result};

/// Length of the random salt stored next to an encrypted wallet
pub const SALT_LEN: usize = 8;

/// Message for an N that is not a power of two greater than one
pub const MSG_INVALID_N: &str = "N must be a power of two greater than 1";

/// Message for a non-positive r or p
pub const MSG_NON_POSITIVE_R_P: &str = "r and p must be positive";

/// Message for a non-positive output length
pub const MSG_NON_POSITIVE_DK_LEN: &str = "dkLen must be positive";

/// Message for parameters beyond the memory limits
pub const MSG_INSUFFICIENT_MEMORY: &str = "insufficient memory available";

/// Message for an N the primitive cannot address with the given r
pub const MSG_N_TOO_LARGE_FOR_R: &str = "N must be less than 2^(16 * r)";

/// Message for any other primitive failure
pub const MSG_DERIVATION_FAILED: &str = "memory allocation failed";

/// scrypt cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KdfParams {
    /// CPU/memory cost; a power of two greater than one
    pub n: u64,
    /// Block size
    pub r: u32,
    /// Parallelization
    pub p: u32,
    /// Output length in bytes
    pub dk_len: usize,
}

impl KdfParams {
    /// Build parameters without checking them; see [`validate`](Self::validate)
    pub const fn new(n: u64, r: u32, p: u32, dk_len: usize) -> Self {
        Self { n, r, p, dk_len }
    }

    /// Parameters the wallet encrypts its keys with
    pub const fn wallet_default() -> Self {
        Self::new(4096, 8, 1, 32)
    }

    /// Convert the signed integers a JVM caller passes
    ///
    /// Negative values are rejected here so they never reach an allocation.
    pub fn from_host(n: i32, r: i32, p: i32, dk_len: i32) -> Result<Self> {
        let n = u64::try_from(n).map_err(|_| Error::from(Failure::InvalidCost))?;
        let r = u32::try_from(r).map_err(|_| Error::from(Failure::NonPositive(MSG_NON_POSITIVE_R_P)))?;
        let p = u32::try_from(p).map_err(|_| Error::from(Failure::NonPositive(MSG_NON_POSITIVE_R_P)))?;
        let dk_len = usize::try_from(dk_len)
            .map_err(|_| Error::from(Failure::NonPositive(MSG_NON_POSITIVE_DK_LEN)))?;

        Ok(Self::new(n, r, p, dk_len))
    }

    /// Check the preconditions that do not depend on available memory
    pub fn validate(&self) -> Result<()> {
        check_preconditions(self, self.dk_len).map_err(Error::from)
    }

    /// Peak working set of one derivation in bytes, `None` on overflow
    ///
    /// `128·r·(N + p)` for the V array and the per-lane blocks, plus `256·r`
    /// of scratch.
    pub fn memory_cost(&self) -> Option<u64> {
        let block = u64::from(self.r).checked_mul(128)?;
        let work = self
            .n
            .checked_add(u64::from(self.p))?
            .checked_mul(block)?;
        work.checked_add(block.checked_mul(2)?)
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::wallet_default()
    }
}

/// Resource limits applied to every derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfLimits {
    /// Upper bound on [`KdfParams::memory_cost`]
    pub max_memory_bytes: u64,
    /// Log derivations at `info` rather than `debug`
    pub verbose: bool,
}

impl Default for KdfLimits {
    fn default() -> Self {
        Self {
            max_memory_bytes: DEFAULT_MAX_KDF_MEMORY_BYTES,
            verbose: false,
        }
    }
}

/// A derived key, owned by the caller and wiped on drop
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: Vec<u8>,
}

impl DerivedKey {
    /// Key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Key length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the key holds no bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Hand the raw bytes to the caller; wiping becomes their responsibility
    pub fn into_vec(mut self) -> Vec<u8> {
        std::mem::take(&mut self.bytes)
    }
}

impl From<Zeroizing<Vec<u8>>> for DerivedKey {
    fn from(mut bytes: Zeroizing<Vec<u8>>) -> Self {
        Self {
            bytes: std::mem::take(&mut *bytes),
        }
    }
}

impl AsRef<[u8]> for DerivedKey {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey")
            .field("len", &self.bytes.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Generate a fresh wallet salt from the OS RNG
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    salt
}

/// Derive a key under the installed adapter configuration
pub fn derive_key(passwd: &[u8], salt: &[u8], params: &KdfParams) -> Result<DerivedKey> {
    derive_key_with_limits(passwd, salt, params, &crate::WalletNative::config().kdf_limits())
}

/// Derive a key under explicit limits
pub fn derive_key_with_limits(
    passwd: &[u8],
    salt: &[u8],
    params: &KdfParams,
    limits: &KdfLimits,
) -> Result<DerivedKey> {
    crate::bridge::derive_across(&mut crate::bridge::NativeHost, passwd, salt, params, limits)
}

// ============================================================================
// PRIMITIVE ADAPTER
// ============================================================================

/// Why the primitive refused to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Failure {
    InvalidCost,
    NonPositive(&'static str),
    LimitExceeded,
    AddressLimit,
    Internal,
}

impl From<Failure> for Error {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::InvalidCost => Error::InvalidParameter(MSG_INVALID_N.into()),
            Failure::NonPositive(msg) => Error::InvalidParameter(msg.into()),
            Failure::LimitExceeded => Error::ResourceExhausted(MSG_INSUFFICIENT_MEMORY.into()),
            Failure::AddressLimit => Error::ResourceExhausted(MSG_N_TOO_LARGE_FOR_R.into()),
            Failure::Internal => Error::DerivationFailed(MSG_DERIVATION_FAILED.into()),
        }
    }
}

fn check_preconditions(params: &KdfParams, dk_len: usize) -> std::result::Result<(), Failure> {
    if params.n < 2 || !params.n.is_power_of_two() {
        return Err(Failure::InvalidCost);
    }
    if params.r == 0 || params.p == 0 {
        return Err(Failure::NonPositive(MSG_NON_POSITIVE_R_P));
    }
    if dk_len == 0 {
        return Err(Failure::NonPositive(MSG_NON_POSITIVE_DK_LEN));
    }
    Ok(())
}

/// Allocate the zeroed output buffer for a derivation
///
/// Allocation failure is reported as [`Error::OutOfMemory`], never as a
/// resource-limit error.
pub fn allocate_output(dk_len: usize) -> Result<Zeroizing<Vec<u8>>> {
    if dk_len == 0 {
        return Err(Failure::NonPositive(MSG_NON_POSITIVE_DK_LEN).into());
    }

    let mut out = Vec::new();
    out.try_reserve_exact(dk_len)?;
    out.resize(dk_len, 0);
    Ok(Zeroizing::new(out))
}

/// Run scrypt into `out`, whose length is the requested output length
pub fn derive_into(
    passwd: &[u8],
    salt: &[u8],
    params: &KdfParams,
    limits: &KdfLimits,
    out: &mut [u8],
) -> Result<()> {
    if limits.verbose {
        tracing::info!(n = params.n, r = params.r, p = params.p, dk_len = out.len(), "Deriving key");
    } else {
        tracing::debug!(n = params.n, r = params.r, p = params.p, dk_len = out.len(), "Deriving key");
    }

    run_scrypt(passwd, salt, params, limits, out).map_err(|failure| {
        let err = Error::from(failure);
        tracing::warn!(code = err.code(), "Key derivation failed: {}", err);
        out.zeroize();
        err
    })
}

fn run_scrypt(
    passwd: &[u8],
    salt: &[u8],
    params: &KdfParams,
    limits: &KdfLimits,
    out: &mut [u8],
) -> std::result::Result<(), Failure> {
    check_preconditions(params, out.len())?;

    if u64::from(params.r) * u64::from(params.p) >= 1 << 30 {
        return Err(Failure::LimitExceeded);
    }
    if out.len() as u64 > u64::from(u32::MAX) * 32 {
        return Err(Failure::LimitExceeded);
    }

    let cost = params.memory_cost().ok_or(Failure::LimitExceeded)?;
    if cost > limits.max_memory_bytes {
        return Err(Failure::LimitExceeded);
    }

    // N is a power of two no larger than 2^63
    let log_n = params.n.trailing_zeros() as u8;
    if u64::from(log_n) >= 16 * u64::from(params.r) {
        return Err(Failure::AddressLimit);
    }

    // The length passed here only bounds the PHC-string API; the raw call
    // below accepts any output length.
    let scrypt_params = Params::new(log_n, params.r, params.p, Params::RECOMMENDED_LEN)
        .map_err(|_| Failure::LimitExceeded)?;

    scrypt::scrypt(passwd, salt, &scrypt_params, out).map_err(|_| Failure::Internal)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn limits() -> KdfLimits {
        KdfLimits::default()
    }

    #[test]
    fn test_rfc7914_vector_empty() {
        let key =
            derive_key_with_limits(b"", b"", &KdfParams::new(16, 1, 1, 64), &limits()).unwrap();

        assert_eq!(
            key.as_bytes(),
            &hex!(
                "77d6576238657b203b19ca42c18a0497f16b4844e3074ae8dfdffa3fede21442"
                "fcd0069ded0948f8326a753a0fc81f17e8d3e0fb2e0d3628cf35e20c38d18906"
            )[..]
        );
    }

    #[test]
    fn test_rfc7914_vector_password() {
        let key = derive_key_with_limits(
            b"password",
            b"NaCl",
            &KdfParams::new(1024, 8, 16, 64),
            &limits(),
        )
        .unwrap();

        assert_eq!(
            key.as_bytes(),
            &hex!(
                "fdbabe1c9d3472007856e7190d01e9fe7c6ad7cbc8237830e77376634b373162"
                "2eaf30d92e22a3886ff109279d9830dac727afb94a83ee6d8360cbdfa2cc0640"
            )[..]
        );
    }

    #[test]
    fn test_wallet_default_vector() {
        let key = derive_key_with_limits(
            b"correct horse",
            &hex!("0102030405060708"),
            &KdfParams::wallet_default(),
            &limits(),
        )
        .unwrap();

        assert_eq!(
            key.as_bytes(),
            &hex!("f14a1b3c9435d1292f68d134ca7db6948fc20c2e42f9bbcdd6630d2120dc5f51")[..]
        );
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let params = KdfParams::new(1024, 1, 1, 32);
        let a = derive_key_with_limits(b"pw", b"salt", &params, &limits()).unwrap();
        let b = derive_key_with_limits(b"pw", b"salt", &params, &limits()).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_output_length_matches_dk_len() {
        for dk_len in [16, 256] {
            let params = KdfParams::new(1024, 1, 1, dk_len);
            let key = derive_key_with_limits(b"pw", b"salt", &params, &limits()).unwrap();
            assert_eq!(key.len(), dk_len);
        }
    }

    #[test]
    fn test_salt_sensitivity() {
        let params = KdfParams::new(1024, 1, 1, 32);
        let a = derive_key_with_limits(b"pw", b"salt-a", &params, &limits()).unwrap();
        let b = derive_key_with_limits(b"pw", b"salt-b", &params, &limits()).unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn test_n_not_power_of_two() {
        for n in [0, 1, 3, 1000] {
            let err = derive_key_with_limits(b"pw", b"s", &KdfParams::new(n, 1, 1, 32), &limits())
                .unwrap_err();
            assert_eq!(err, Error::InvalidParameter(MSG_INVALID_N.into()));
        }
    }

    #[test]
    fn test_non_positive_parameters() {
        let err = KdfParams::new(16, 0, 1, 32).validate().unwrap_err();
        assert_eq!(err.to_string(), MSG_NON_POSITIVE_R_P);

        let err = KdfParams::new(16, 1, 0, 32).validate().unwrap_err();
        assert_eq!(err.to_string(), MSG_NON_POSITIVE_R_P);

        let err = KdfParams::new(16, 1, 1, 0).validate().unwrap_err();
        assert_eq!(err.to_string(), MSG_NON_POSITIVE_DK_LEN);
    }

    #[test]
    fn test_from_host_rejects_negative_values() {
        assert!(matches!(
            KdfParams::from_host(-16, 8, 1, 32),
            Err(Error::InvalidParameter(_))
        ));
        assert_eq!(
            KdfParams::from_host(16, -1, 1, 32).unwrap_err().to_string(),
            MSG_NON_POSITIVE_R_P
        );
        assert_eq!(
            KdfParams::from_host(16, 1, 1, -32).unwrap_err().to_string(),
            MSG_NON_POSITIVE_DK_LEN
        );
        assert_eq!(
            KdfParams::from_host(4096, 8, 1, 32).unwrap(),
            KdfParams::wallet_default()
        );
    }

    #[test]
    fn test_memory_ceiling() {
        let tight = KdfLimits {
            max_memory_bytes: 1 << 20,
            verbose: false,
        };
        let params = KdfParams::new(1 << 14, 8, 1, 32);

        let err = derive_key_with_limits(b"pw", b"salt", &params, &tight).unwrap_err();
        assert_eq!(err, Error::ResourceExhausted(MSG_INSUFFICIENT_MEMORY.into()));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_addressing_limits() {
        let err = derive_key_with_limits(b"pw", b"s", &KdfParams::new(16, 1 << 15, 1 << 15, 32), &limits())
            .unwrap_err();
        assert!(matches!(err, Error::ResourceExhausted(_)));

        let err = derive_key_with_limits(b"pw", b"s", &KdfParams::new(1 << 62, 1, 1, 32), &limits())
            .unwrap_err();
        assert!(matches!(err, Error::ResourceExhausted(_)));

    }

    #[test]
    fn test_n_beyond_addressing_limit_is_not_reported_as_memory() {
        // 8 MiB working set, well under the default ceiling
        let params = KdfParams::new(1 << 16, 1, 1, 32);
        assert!(params.memory_cost().unwrap() < limits().max_memory_bytes);

        let err = derive_key_with_limits(b"pw", b"salt", &params, &KdfLimits::default()).unwrap_err();
        assert_eq!(err, Error::ResourceExhausted(MSG_N_TOO_LARGE_FOR_R.into()));

        // One step below the limit still derives
        let key = derive_key_with_limits(b"pw", b"salt", &KdfParams::new(1 << 15, 1, 1, 32), &limits());
        assert_eq!(key.unwrap().as_bytes().len(), 32);
    }

    #[test]
    fn test_memory_cost() {
        assert_eq!(
            KdfParams::wallet_default().memory_cost(),
            Some(128 * 8 * (4096 + 1) + 256 * 8)
        );
        assert_eq!(KdfParams::new(u64::MAX, u32::MAX, 1, 32).memory_cost(), None);
    }

    #[test]
    fn test_allocate_output_failure_is_out_of_memory() {
        let err = allocate_output(usize::MAX).unwrap_err();
        assert!(matches!(err, Error::OutOfMemory(_)));

        let out = allocate_output(48).unwrap();
        assert_eq!(out.len(), 48);
        assert!(out.iter().all(|b| *b == 0));
    }

    #[test]
    fn test_generate_salt() {
        let a = generate_salt();
        let b = generate_salt();

        assert_eq!(a.len(), SALT_LEN);
        assert_ne!(a, b);
    }

    #[test]
    fn test_derived_key_debug_is_redacted() {
        let key = DerivedKey::from(Zeroizing::new(vec![0xAA; 4]));
        let debug = format!("{:?}", key);

        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("170"));
        assert_eq!(key.into_vec(), vec![0xAA; 4]);
    }
}
