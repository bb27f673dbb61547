//! # Buffer Bridge
//!
//! Moves byte buffers between a host runtime and the primitives without
//! leaking views on any exit path.
//!
//! ## Lifecycle of One Derivation
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      DERIVATION ACROSS A BOUNDARY                       │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  1. validate params               ── InvalidParameter ──────────┐      │
//! │  2. allocate output (dkLen)       ── OutOfMemory ───────────────┤      │
//! │  3. acquire passwd view  ┐        ── OutOfMemory ───────────────┤      │
//! │  4. acquire salt view    │ scoped ── OutOfMemory ──┐            │      │
//! │  5. scrypt into output   │        ── classified ───┤            │      │
//! │  6. views dropped        ┘ ◄───────────────────────┘            │      │
//! │  7. export output to host         ── OutOfMemory ───────────────┤      │
//! │                                                                 ▼      │
//! │                                        output zeroized and freed       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Views are guard objects: every acquired view is released by `Drop`,
//! whether the step after it succeeded or not. Hosts release their views
//! without writing anything back.

use std::ops::Deref;

use zeroize::Zeroizing;

use crate::crypto::{self, DerivedKey, KdfLimits, KdfParams};
use crate::error::Result;

/// A runtime that owns byte arrays the primitives need to read
pub trait BufferHost<'a> {
    /// Host handle for a byte array
    type Array: ?Sized + 'a;

    /// Read-only view of an array, released when dropped
    type View: Deref<Target = [u8]>;

    /// What the host hands back to its caller
    type Output;

    /// Obtain a scoped view of `array`
    fn acquire(&mut self, array: &'a Self::Array) -> Result<Self::View>;

    /// Transfer an output buffer to the host
    fn export(&mut self, bytes: Zeroizing<Vec<u8>>) -> Result<Self::Output>;
}

/// Host for callers that already hold Rust slices
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeHost;

impl<'a> BufferHost<'a> for NativeHost {
    type Array = [u8];
    type View = &'a [u8];
    type Output = DerivedKey;

    fn acquire(&mut self, array: &'a [u8]) -> Result<&'a [u8]> {
        Ok(array)
    }

    fn export(&mut self, bytes: Zeroizing<Vec<u8>>) -> Result<DerivedKey> {
        Ok(DerivedKey::from(bytes))
    }
}

/// Derive a key from host-owned passphrase and salt arrays
pub fn derive_across<'a, H>(
    host: &mut H,
    passwd: &'a H::Array,
    salt: &'a H::Array,
    params: &KdfParams,
    limits: &KdfLimits,
) -> Result<H::Output>
where
    H: BufferHost<'a>,
{
    params.validate()?;

    // Never invoke the primitive without somewhere to put its output
    let mut out = crypto::allocate_output(params.dk_len)?;

    {
        let passwd = host.acquire(passwd)?;
        let salt = host.acquire(salt)?;
        crypto::derive_into(&passwd, &salt, params, limits, &mut out)?;
    }

    host.export(out)
}

/// Hash a host-owned array with the double Grøstl pipeline
pub fn hash_across<'a, H>(host: &mut H, input: &'a H::Array) -> Result<H::Output>
where
    H: BufferHost<'a>,
{
    let digest = {
        let view = host.acquire(input)?;
        crypto::hash(&view)
    };

    host.export(Zeroizing::new(digest.to_vec()))
}

// ============================================================================
// TESTS
// ============================================================================
