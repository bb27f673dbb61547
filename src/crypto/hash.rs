//! # Double Grøstl Block Hash
//!
//! The block-identity and proof-of-work hash: Grøstl-512 applied twice with
//! the second digest truncated to 256 bits.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        DOUBLE HASH PIPELINE                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  input (any length, may be empty)                                      │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  Grøstl-512 ──► wide[0] (64 bytes)                                     │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │              Grøstl-512 ──► wide[1] (64 bytes)                         │
//! │                                │                                        │
//! │                                ▼                                        │
//! │                        wide[1][0..32] ──► Digest256                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both rounds always run, including for empty input. Digests are kept in
//! internal byte order; block explorers print them reversed, see
//! [`Digest256::to_display_hex`].

use std::fmt;

use groestl::{Digest, Groestl512};

use crate::error::{Error, Result};

/// Size of the truncated digest in bytes
pub const DIGEST_SIZE: usize = 32;

/// Backing storage for zero-length boundary inputs. Only an empty slice of it
/// is ever handed out.
static EMPTY_SENTINEL: [u8; 1] = [0];

/// A valid, zero-length view for boundaries that received no buffer.
///
/// Hashing this view hashes the empty message.
pub fn empty_view() -> &'static [u8] {
    &EMPTY_SENTINEL[..0]
}

/// Hash `input` with the double Grøstl pipeline
///
/// Total: every input, including the empty one, yields exactly 32 bytes.
pub fn hash(input: &[u8]) -> Digest256 {
    DoubleGroestl::new().chain(input).finalize()
}

/// Incremental form of [`hash`]
///
/// Lets callers feed serialized header fields one at a time.
#[derive(Clone, Default)]
pub struct DoubleGroestl {
    inner: Groestl512,
}

impl DoubleGroestl {
    /// Start a new double hash
    pub fn new() -> Self {
        Self {
            inner: Groestl512::new(),
        }
    }

    /// Absorb more input
    pub fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.inner, data);
    }

    /// Builder-style [`update`](Self::update)
    pub fn chain(mut self, data: &[u8]) -> Self {
        self.update(data);
        self
    }

    /// Run the second round and truncate
    pub fn finalize(self) -> Digest256 {
        let first = self.inner.finalize();
        let second = Groestl512::digest(first);

        let mut out = [0u8; DIGEST_SIZE];
        out.copy_from_slice(&second[..DIGEST_SIZE]);
        Digest256(out)
    }
}

/// 256-bit double-Grøstl digest in internal byte order
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Digest256([u8; DIGEST_SIZE]);

impl Digest256 {
    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// Copy the digest into a new vector
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Lower-case hex in internal byte order
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Lower-case hex with the bytes reversed, as block ids are displayed
    pub fn to_display_hex(&self) -> String {
        let mut reversed = self.0;
        reversed.reverse();
        hex::encode(reversed)
    }

    /// Parse a block id printed by [`to_display_hex`](Self::to_display_hex)
    pub fn from_display_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| Error::InvalidInput(format!("Invalid digest hex: {}", e)))?;

        let mut out: [u8; DIGEST_SIZE] = bytes.as_slice().try_into().map_err(|_| {
            Error::InvalidInput(format!(
                "Digest must be {} bytes, got {}",
                DIGEST_SIZE,
                bytes.len()
            ))
        })?;
        out.reverse();
        Ok(Self(out))
    }

    /// Number of leading zero bits when read as a display-order number
    pub fn leading_zero_bits(&self) -> u32 {
        let mut bits = 0;
        for byte in self.0.iter().rev() {
            if *byte != 0 {
                return bits + byte.leading_zeros();
            }
            bits += 8;
        }
        bits
    }
}

impl From<[u8; DIGEST_SIZE]> for Digest256 {
    fn from(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Digest256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Digest256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_hex())
    }
}

impl fmt::Debug for Digest256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest256({})", self.to_display_hex())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use proptest::prelude::*;

    const GENESIS_HEADER: [u8; 80] = hex!(
        "7000000000000000000000000000000000000000000000000000000000000000"
        "00000000bb2866aaca46c4428ad08b57bc9d1493abaf64724b6c3052a7c8f958"
        "df68e93ced3d2b53ffff0f1e835b0300"
    );

    #[test]
    fn test_genesis_block_id() {
        let digest = hash(&GENESIS_HEADER);

        assert_eq!(
            digest.as_bytes(),
            &hex!("2390633b70f062cb3a3d6814b67e29a80d9d7581db0bcc494d597c92c50a0000")
        );
        assert_eq!(
            digest.to_display_hex(),
            "00000ac5927c594d49cc0bdb81759d0da8297eb614683d3acb62f0703b639023"
        );
        assert_eq!(digest.leading_zero_bits(), 20);
    }

    #[test]
    fn test_empty_input() {
        let digest = hash(empty_view());

        assert_eq!(
            digest.as_bytes(),
            &hex!("fdfb14d386c6dff85715c50efb826c43e04205b18410497aa47f121eceb3a65e")
        );
        assert_eq!(hash(&[]), digest);
    }

    #[test]
    fn test_empty_is_not_a_single_zero_byte() {
        let zero = hash(&[0u8]);

        assert_eq!(
            zero.as_bytes(),
            &hex!("e87210b1e1d674e6253f8582059a3bea5161cef1e5b32d5d06c5c31550f9ef2a")
        );
        assert_ne!(zero, hash(empty_view()));
    }

    #[test]
    fn test_groestl512_reference_vectors() {
        assert_eq!(
            Groestl512::digest(b"")[..],
            hex!(
                "6d3ad29d279110eef3adbd66de2a0345a77baede1557f5d099fce0c03d6dc2ba"
                "8e6d4a6633dfbd66053c20faa87d1a11f39a7fbe4a6c2f009801370308fc4ad8"
            )
        );
        assert_eq!(
            Groestl512::digest(b"abc")[..],
            hex!(
                "70e1c68c60df3b655339d67dc291cc3f1dde4ef343f11b23fdd44957693815a7"
                "5a8339c682fc28322513fd1f283c18e53cff2b264e06bf83a2f0ac8c1f6fbff6"
            )
        );
    }

    #[test]
    fn test_update_across_block_boundaries() {
        let data: Vec<u8> = (0..=255u8).cycle().take(700).collect();
        let expected = hash(&data);

        for split in [0, 1, 63, 127, 128, 129, 256, 699, 700] {
            let mut hasher = DoubleGroestl::new();
            hasher.update(&data[..split]);
            hasher.update(&[]);
            hasher.update(&data[split..]);
            assert_eq!(hasher.finalize(), expected, "split at {}", split);
        }
    }

    #[test]
    fn test_second_round_is_applied() {
        let single = Groestl512::digest(b"abc");
        let digest = hash(b"abc");

        assert_ne!(&single[..DIGEST_SIZE], digest.as_bytes());
        assert_eq!(
            digest.as_bytes(),
            &hex!("453d26f15b76bd4a4b2c3d21f8271404e2ffd9aad994f4d36a376d40a757af09")
        );
    }

    #[test]
    fn test_multi_block_inputs() {
        let data: Vec<u8> = (0..200u8).collect();

        assert_eq!(
            hash(&data[..120]).as_bytes(),
            &hex!("e3954323bc128264470956f055e26b24d09e762cd6102dcee23c03cb362eadc3")
        );
        assert_eq!(
            hash(&data).as_bytes(),
            &hex!("e9b05d62162b417a0ea94f7027d765b34963d61ad589afd4b108c43aed47feca")
        );
    }

    #[test]
    fn test_single_bit_flips_change_digest() {
        let base = GENESIS_HEADER;
        let reference = hash(&base);

        let mut flips = 0usize;
        let mut differing = 0usize;
        for bit in (0..base.len() * 8).step_by(7) {
            let mut flipped = base;
            flipped[bit / 8] ^= 1 << (bit % 8);
            let digest = hash(&flipped);

            let changed = digest
                .as_bytes()
                .iter()
                .zip(reference.as_bytes())
                .filter(|(a, b)| a != b)
                .count();
            assert!(changed > 0, "bit {} did not change digest", bit);

            flips += 1;
            differing += changed;
        }

        // An unrelated digest differs in 32 * 255/256 bytes on average
        let average = differing as f64 / flips as f64;
        assert!(average >= 30.0, "only {:.2} bytes changed on average", average);
    }

    #[test]
    fn test_display_hex_roundtrip() {
        let digest = hash(b"block");
        let parsed = Digest256::from_display_hex(&digest.to_string()).unwrap();

        assert_eq!(parsed, digest);
        assert_ne!(digest.to_hex(), digest.to_display_hex());
    }

    #[test]
    fn test_from_display_hex_rejects_bad_length() {
        let err = Digest256::from_display_hex("abcd").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = Digest256::from_display_hex("zz").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_leading_zero_bits() {
        assert_eq!(Digest256::from([0u8; 32]).leading_zero_bits(), 256);

        let mut bytes = [0xffu8; 32];
        bytes[31] = 0x01;
        assert_eq!(Digest256::from(bytes).leading_zero_bits(), 7);
    }

    proptest! {
        #[test]
        fn test_hash_is_deterministic(data in proptest::collection::vec(any::<u8>(), 0..512)) {
            prop_assert_eq!(hash(&data), hash(&data));
            prop_assert_eq!(hash(&data).to_vec().len(), DIGEST_SIZE);
        }

        #[test]
        fn test_streaming_matches_one_shot(
            data in proptest::collection::vec(any::<u8>(), 0..600),
            split in any::<prop::sample::Index>(),
        ) {
            let at = split.index(data.len() + 1);
            let mut hasher = DoubleGroestl::new();
            hasher.update(&data[..at]);
            hasher.update(&data[at..]);
            prop_assert_eq!(hasher.finalize(), hash(&data));
        }
    }
}
