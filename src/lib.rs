//! # Wallet Native
//!
//! Native cryptography for the wallet: the double Grøstl block hash and
//! scrypt key derivation, exposed to the JVM and to C callers.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        WALLET NATIVE MODULES                            │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────┐        ┌─────────────────────────────┐    │
//! │  │   ffi::jni              │        │   ffi (C ABI)               │    │
//! │  │                         │        │                             │    │
//! │  │ - JNI_OnLoad            │        │ - wallet_native_init        │    │
//! │  │ - scryptN               │        │ - wallet_native_scrypt      │    │
//! │  │ - groestld_native       │        │ - wallet_native_groestl_hash│    │
//! │  └───────────┬─────────────┘        └──────────────┬──────────────┘    │
//! │              └─────────────────┬───────────────────┘                   │
//! │                                ▼                                        │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   bridge: scoped host views, output allocation, export          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                ▼                                        │
//! │  ┌─────────────────────────┐        ┌─────────────────────────────┐    │
//! │  │   crypto::hash          │        │   crypto::kdf               │    │
//! │  │ Grøstl-512 twice → 256  │        │ scrypt + classification     │    │
//! │  └─────────────────────────┘        └─────────────────────────────┘    │
//! │                                                                         │
//! │  config (write-once)     error (codes)     worker (blocking pool)      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error types for the entire library
//! - [`config`] - Adapter configuration
//! - [`crypto`] - Block hash and key derivation
//! - [`bridge`] - Buffer lifetimes across host boundaries
//! - [`worker`] - Async wrapper for derivations
//! - `ffi` - C ABI and JNI bindings
//!
//! ## Platform Support
//!
//! | Host | Binding | Feature |
//! |------|---------|---------|
//! | Android / JVM | registered natives | `jni` |
//! | iOS / native | C ABI | `ffi` (default) |

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod bridge;
pub mod config;
pub mod crypto;
pub mod error;
pub mod worker;

#[cfg(any(feature = "ffi", feature = "jni"))]
pub mod ffi;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use config::AdapterConfig;
pub use crypto::{derive_key, hash, DerivedKey, Digest256, KdfLimits, KdfParams};
pub use error::{Error, Result};

// ============================================================================
// ADAPTER STATE
// ============================================================================

use once_cell::sync::{Lazy, OnceCell};

/// Configuration installed by [`WalletNative::initialize`]
static CONFIG: OnceCell<AdapterConfig> = OnceCell::new();

/// Used until (or unless) a configuration is installed
static DEFAULT_CONFIG: Lazy<AdapterConfig> = Lazy::new(AdapterConfig::default);

/// Process-wide entry point for adapter state
///
/// ## Lifecycle
///
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                        ADAPTER LIFECYCLE                                │
/// ├─────────────────────────────────────────────────────────────────────────┤
/// │                                                                         │
/// │  library loaded ──► config() returns defaults                          │
/// │        │                                                               │
/// │        ▼                                                               │
/// │  initialize(config)   (wallet_native_init or JNI_OnLoad)               │
/// │        │                                                               │
/// │        ├── first call  ──► config stored, never mutated again          │
/// │        └── later calls ──► Error::AlreadyInitialized                   │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub struct WalletNative;

impl WalletNative {
    /// Install the adapter configuration
    ///
    /// Call at most once, before the first derivation if the defaults are
    /// not wanted.
    ///
    /// ## Example
    ///
    /// ```ignore
    /// use wallet_native::{AdapterConfig, WalletNative};
    ///
    /// WalletNative::initialize(AdapterConfig::default())?;
    /// ```
    pub fn initialize(config: AdapterConfig) -> Result<()> {
        tracing::info!("Initializing wallet native v{}", env!("CARGO_PKG_VERSION"));
        config.validate()?;

        let ceiling = config.max_kdf_memory_bytes;
        CONFIG.set(config).map_err(|_| Error::AlreadyInitialized)?;

        tracing::info!(max_kdf_memory_bytes = ceiling, "Wallet native initialized");
        Ok(())
    }

    /// The installed configuration, or the defaults
    pub fn config() -> &'static AdapterConfig {
        CONFIG.get().unwrap_or_else(|| Lazy::force(&DEFAULT_CONFIG))
    }

    /// Check if a configuration has been installed
    pub fn is_initialized() -> bool {
        CONFIG.get().is_some()
    }
}

// ============================================================================
// VERSION INFO
// ============================================================================

/// Returns the version of the adapter
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Returns build information for debugging
pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        #[cfg(target_os = "ios")]
        target: "ios",
        #[cfg(target_os = "android")]
        target: "android",
        #[cfg(target_os = "macos")]
        target: "macos",
        #[cfg(target_os = "linux")]
        target: "linux",
        #[cfg(target_os = "windows")]
        target: "windows",
        #[cfg(not(any(
            target_os = "ios",
            target_os = "android",
            target_os = "macos",
            target_os = "linux",
            target_os = "windows"
        )))]
        target: "unknown",
        profile: if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        },
        jni: cfg!(feature = "jni"),
    }
}

/// Build information for debugging
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Crate version
    pub version: &'static str,
    /// Target operating system
    pub target: &'static str,
    /// Build profile (debug/release)
    pub profile: &'static str,
    /// Whether the JNI bindings are compiled in
    pub jni: bool,
}

// ============================================================================
// TESTS
// ============================================================================
