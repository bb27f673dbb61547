//! # Cryptography Module
//!
//! The two primitives the wallet needs from native code.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CRYPTOGRAPHIC PRIMITIVES                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────┐   ┌─────────────────────────────┐     │
//! │  │  BLOCK HASH                 │   │  WALLET KEY DERIVATION      │     │
//! │  │                             │   │                             │     │
//! │  │  Grøstl-512(Grøstl-512(x))  │   │  scrypt(passwd, salt,       │     │
//! │  │  truncated to 256 bits      │   │         N, r, p, dkLen)     │     │
//! │  │                             │   │                             │     │
//! │  │  • block ids                │   │  • wallet encryption key    │     │
//! │  │  • proof of work            │   │  • memory-hard              │     │
//! │  │  • total, no failure path   │   │  • classified failures      │     │
//! │  └─────────────────────────────┘   └─────────────────────────────┘     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The two halves share nothing and may be used from any number of threads.
//!
//! ## Security Considerations
//!
//! 1. **Key Zeroization**: derived keys and output buffers are wiped on drop
//! 2. **No Secret Logging**: only cost parameters are ever traced
//! 3. **Secure Random**: salts come from `rand::rngs::OsRng`

mod hash;
mod kdf;

pub use hash::{empty_view, hash, Digest256, DoubleGroestl, DIGEST_SIZE};
pub use kdf::{
    allocate_output, derive_into, derive_key, derive_key_with_limits, generate_salt,
    DerivedKey, KdfLimits, KdfParams, MSG_DERIVATION_FAILED, MSG_INSUFFICIENT_MEMORY,
    MSG_INVALID_N, MSG_NON_POSITIVE_DK_LEN, MSG_N_TOO_LARGE_FOR_R, MSG_NON_POSITIVE_R_P, SALT_LEN,
};
