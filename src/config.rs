//! # Adapter Configuration
//!
//! Settings read by the boundary layers. The configuration is installed once
//! through [`crate::WalletNative::initialize`] and never mutated afterwards;
//! calls made before initialization see [`AdapterConfig::default`].
//!
//! At the C boundary the configuration arrives as JSON:
//!
//! ```json
//! { "max_kdf_memory_bytes": 268435456, "verbose_logging": true }
//! ```
//!
//! Missing fields take their defaults.

use serde::{Deserialize, Serialize};

use crate::crypto::KdfLimits;
use crate::error::{Error, Result};

/// Default ceiling on scrypt's peak working set (1 GiB)
pub const DEFAULT_MAX_KDF_MEMORY_BYTES: u64 = 1 << 30;

/// JVM class carrying `native byte[] scryptN(byte[], byte[], int, int, int, int)`
pub const DEFAULT_SCRYPT_CLASS: &str = "com/lambdaworks/crypto/SCrypt";

/// JVM class carrying `native byte[] groestld_native(byte[])`
pub const DEFAULT_GROESTL_CLASS: &str = "com/hashengineering/crypto/Groestl";

/// Configuration for the wallet native adapters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Upper bound, in bytes, on the memory one derivation may use
    pub max_kdf_memory_bytes: u64,
    /// Binary name of the JVM class the scrypt native is registered on
    pub scrypt_class: String,
    /// Binary name of the JVM class the Grøstl native is registered on
    pub groestl_class: String,
    /// Log every derivation at `info` instead of `debug`
    pub verbose_logging: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            max_kdf_memory_bytes: DEFAULT_MAX_KDF_MEMORY_BYTES,
            scrypt_class: DEFAULT_SCRYPT_CLASS.to_string(),
            groestl_class: DEFAULT_GROESTL_CLASS.to_string(),
            verbose_logging: false,
        }
    }
}

impl AdapterConfig {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no derivation could run under
    pub fn validate(&self) -> Result<()> {
        if self.max_kdf_memory_bytes == 0 {
            return Err(Error::InvalidConfig(
                "max_kdf_memory_bytes must be greater than zero".into(),
            ));
        }
        if self.scrypt_class.is_empty() || self.groestl_class.is_empty() {
            return Err(Error::InvalidConfig("JVM class names must not be empty".into()));
        }
        Ok(())
    }

    /// Derivation limits implied by this configuration
    pub fn kdf_limits(&self) -> KdfLimits {
        KdfLimits {
            max_memory_bytes: self.max_kdf_memory_bytes,
            verbose: self.verbose_logging,
        }
    }
}
