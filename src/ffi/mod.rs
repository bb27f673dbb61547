//! # FFI Bindings
//!
//! Foreign Function Interface bindings for the JVM wallet and native hosts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         FFI ARCHITECTURE                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Java/Kotlin wallet                 C / Swift / other native hosts      │
//! │         │                                       │                       │
//! │         ▼                                       ▼                       │
//! │  ┌──────────────────────┐          ┌──────────────────────────┐        │
//! │  │  jni.rs              │          │  c_api.rs                │        │
//! │  │  JNI_OnLoad +        │          │  wallet_native_*         │        │
//! │  │  registered natives  │          │  (ptr, len) buffers      │        │
//! │  │  JniHost             │          │  RawHost                 │        │
//! │  └──────────┬───────────┘          └────────────┬─────────────┘        │
//! │             └──────────────┬────────────────────┘                       │
//! │                            ▼                                            │
//! │                 bridge::derive_across / hash_across                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! - C FFI: `FfiResult` struct with error code and message
//! - JNI: exceptions thrown on error

#[cfg(feature = "ffi")]
mod types;

#[cfg(feature = "ffi")]
mod c_api;

#[cfg(feature = "jni")]
pub mod jni;

#[cfg(feature = "ffi")]
pub use types::*;

#[cfg(feature = "ffi")]
pub use c_api::*;
