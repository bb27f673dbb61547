//! # Error Handling
//!
//! This module provides the error types for the wallet native adapters.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                     │
//! │  │                                                                      │
//! │  ├── Lifecycle Errors                                                  │
//! │  │   ├── AlreadyInitialized    - Adapter configured twice              │
//! │  │   └── InvalidConfig         - Configuration rejected                │
//! │  │                                                                      │
//! │  ├── Key Derivation Errors                                             │
//! │  │   ├── InvalidParameter      - Cost parameter precondition violated  │
//! │  │   ├── ResourceExhausted     - N/r/p beyond memory or size limits    │
//! │  │   └── DerivationFailed      - Any other primitive failure           │
//! │  │                                                                      │
//! │  ├── Boundary Errors                                                   │
//! │  │   ├── OutOfMemory           - Output buffer / host view not obtained│
//! │  │   └── InvalidInput          - Malformed pointer, length or string   │
//! │  │                                                                      │
//! │  └── Internal                                                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Crossing the Boundary
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ERROR HANDLING FLOW                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Internal (Rust)              C ABI                     JVM             │
//! │  ──────────────────────────────────────────────────────────────────     │
//! │                                                                         │
//! │  Result<T, Error>  ──────►  FfiResult              ──►  (caller)       │
//! │                             { code, message }                          │
//! │                  └────────────────────────────────►  throw             │
//! │                                                     IllegalArgument-   │
//! │                                                     Exception(message) │
//! │                                                                         │
//! │  Example:                                                              │
//! │  Err(Error::InvalidParameter(..))                                      │
//! │     →  { code: 300, message: "N must be a power of two greater than 1" }│
//! │     →  throw new IllegalArgumentException("N must be a power of ...")  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The three key-derivation variants display *only* their message so the
//! text a JVM caller sees is exactly the classified message.

use thiserror::Error;

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the wallet native adapters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ========================================================================
    // Lifecycle Errors (100-199)
    // ========================================================================

    /// The adapter configuration has already been installed
    #[error("Adapter has already been initialized.")]
    AlreadyInitialized,

    /// The supplied configuration could not be used
    #[error("Invalid adapter configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Key Derivation Errors (300-399)
    // ========================================================================

    /// A cost parameter violates the primitive's precondition
    #[error("{0}")]
    InvalidParameter(String),

    /// The requested cost exceeds available memory or addressing limits
    #[error("{0}")]
    ResourceExhausted(String),

    /// Any other failure reported by the derivation primitive
    #[error("{0}")]
    DerivationFailed(String),

    // ========================================================================
    // Boundary Errors (400-499)
    // ========================================================================

    /// The output buffer or a host view could not be obtained
    #[error("Out of memory: {0}")]
    OutOfMemory(String),

    /// A pointer, length or string received at the boundary is malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ========================================================================
    // Internal Errors (900-999)
    // ========================================================================

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the error code for FFI
    ///
    /// Error codes are organized by category:
    /// - 100-199: Lifecycle
    /// - 300-399: Key derivation
    /// - 400-499: Boundary
    /// - 900-999: Internal
    pub fn code(&self) -> i32 {
        match self {
            // Lifecycle (100-199)
            Error::AlreadyInitialized => 101,
            Error::InvalidConfig(_) => 102,

            // Key derivation (300-399)
            Error::InvalidParameter(_) => 300,
            Error::ResourceExhausted(_) => 301,
            Error::DerivationFailed(_) => 302,

            // Boundary (400-499)
            Error::OutOfMemory(_) => 400,
            Error::InvalidInput(_) => 401,

            // Internal (900-999)
            Error::Internal(_) => 900,
        }
    }

    /// Check if this error is recoverable
    ///
    /// Nothing is retried inside the adapter; a recoverable error is one the
    /// caller may retry with smaller cost parameters or after freeing memory.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::ResourceExhausted(_) | Error::OutOfMemory(_))
    }

    /// JVM throwable class raised for this error by the JNI bindings
    pub fn host_exception_class(&self) -> &'static str {
        match self {
            Error::OutOfMemory(_) => "java/lang/OutOfMemoryError",
            Error::Internal(_) => "java/lang/IllegalStateException",
            _ => "java/lang/IllegalArgumentException",
        }
    }
}

// ============================================================================
// ERROR CONVERSIONS
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(err: std::collections::TryReserveError) -> Self {
        Error::OutOfMemory(err.to_string())
    }
}

// ============================================================================
// FFI ERROR REPRESENTATION
// ============================================================================

/// FFI-friendly error representation
#[derive(Debug, Clone)]
pub struct FfiError {
    /// Numeric error code
    pub code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the error is recoverable
    pub recoverable: bool,
}

impl From<Error> for FfiError {
    fn from(err: Error) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
