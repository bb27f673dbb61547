//! # Background Derivation
//!
//! scrypt blocks its thread for the whole derivation. Async callers hand the
//! work to tokio's blocking pool and await the key instead of stalling a
//! runtime worker.

use crate::crypto::{self, DerivedKey, KdfLimits, KdfParams};
use crate::error::{Error, Result};

/// Derive a key on the blocking pool under the installed configuration
///
/// Must be called from within a tokio runtime.
pub async fn derive_blocking(
    passwd: Vec<u8>,
    salt: Vec<u8>,
    params: KdfParams,
) -> Result<DerivedKey> {
    let limits = crate::WalletNative::config().kdf_limits();
    derive_blocking_with_limits(passwd, salt, params, limits).await
}

/// [`derive_blocking`] with explicit limits
pub async fn derive_blocking_with_limits(
    passwd: Vec<u8>,
    salt: Vec<u8>,
    params: KdfParams,
    limits: KdfLimits,
) -> Result<DerivedKey> {
    let passwd = zeroize::Zeroizing::new(passwd);

    tokio::task::spawn_blocking(move || {
        crypto::derive_key_with_limits(&passwd, &salt, &params, &limits)
    })
    .await
    .map_err(|e| {
        tracing::warn!("Derivation worker did not complete: {}", e);
        Error::DerivationFailed(crypto::MSG_DERIVATION_FAILED.into())
    })?
}
