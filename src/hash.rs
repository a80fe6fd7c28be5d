//! Hashing of base field elements into GF(p^5).
//!
//! Schnorr signatures over ECgFp5 derive their challenge by hashing a
//! sequence of GF(p) elements (the encoded commitment followed by the
//! hashed message) into a single GF(p^5) element. Circuit-oriented
//! deployments use an arithmetization-friendly permutation for that
//! step; this module defines the `HashToExtension` trait so that such
//! a function can be plugged in, and provides `Shake256Hash`, a default
//! implementation on top of SHAKE256.

use core::convert::TryFrom;
use super::field::{GFp, GFp5};
use sha3::{Shake256, digest::{Update, ExtendableOutputReset, XofReader}};

/// A hash function from sequences of GF(p) elements to GF(p^5).
///
/// Implementations must be deterministic: the same input sequence
/// always yields the same output. Both signing and verification call
/// the function on the same kind of input, so a signature is valid
/// only relatively to the hash function used to produce it.
pub trait HashToExtension {

    /// Hashes the provided sequence of base field elements.
    fn hash_to_extension(&self, input: &[GFp]) -> GFp5;
}

/// Hash-to-extension with SHAKE256.
///
/// Each input element is absorbed as its canonical 8-byte little-endian
/// encoding. The output is 40 bytes, split into five 64-bit words
/// (little-endian) which are reduced modulo p to obtain the five
/// coefficients of the result. The reduction bias is about 2^-32 per
/// coefficient.
#[derive(Clone, Copy, Debug, Default)]
pub struct Shake256Hash;

impl Shake256Hash {

    /// Creates a new instance.
    pub const fn new() -> Self {
        Self
    }
}

impl HashToExtension for Shake256Hash {

    fn hash_to_extension(&self, input: &[GFp]) -> GFp5 {
        let mut sh = Shake256::default();
        for x in input.iter() {
            sh.update(&x.encode());
        }
        let mut out = [0u8; 40];
        sh.finalize_xof_reset().read(&mut out);
        let mut c = [GFp::ZERO; 5];
        for i in 0..5 {
            c[i] = GFp::from_u64(u64::from_le_bytes(
                *<&[u8; 8]>::try_from(&out[(8 * i)..(8 * i + 8)]).unwrap()));
        }
        GFp5::from_coeffs(c)
    }
}

impl<H: HashToExtension + ?Sized> HashToExtension for &H {

    #[inline(always)]
    fn hash_to_extension(&self, input: &[GFp]) -> GFp5 {
        (**self).hash_to_extension(input)
    }
}

// ========================================================================

#[cfg(test)]
mod tests {

    use super::{HashToExtension, Shake256Hash};
    use crate::field::{GFp, GFp5};
    use sha3::{Shake256, digest::{Update, ExtendableOutputReset, XofReader}};

    #[test]
    fn shake256_ref() {
        // Recompute the output manually from the byte-level definition.
        let input = [
            GFp::w64(0), GFp::w64(1), GFp::MINUS_ONE,
            GFp::w64(0x0123456789ABCDEF), GFp::w64(7),
        ];
        let mut sh = Shake256::default();
        for x in input.iter() {
            sh.update(&x.to_u64().to_le_bytes());
        }
        let mut out = [0u8; 40];
        sh.finalize_xof_reset().read(&mut out);
        let mut w = [0u64; 5];
        for i in 0..5 {
            let mut t = 0u64;
            for j in 0..8 {
                t |= (out[8 * i + j] as u64) << (8 * j);
            }
            w[i] = t % GFp::MODULUS;
        }
        let h = Shake256Hash.hash_to_extension(&input);
        assert!(h.equals(GFp5::w64le(w)) == 0xFFFFFFFF);
        assert!(h.to_w64le() == w);
    }

    #[test]
    fn shake256_inputs() {
        let h = Shake256Hash::new();
        let a = [GFp::w64(1), GFp::w64(2), GFp::w64(3)];
        let b = [GFp::w64(2), GFp::w64(1), GFp::w64(3)];
        let c = [GFp::w64(1), GFp::w64(2)];
        let d = [GFp::w64(1), GFp::w64(2), GFp::w64(3), GFp::ZERO];

        let ha = h.hash_to_extension(&a);
        assert!(ha.equals(h.hash_to_extension(&a)) == 0xFFFFFFFF);
        assert!(ha.equals((&h).hash_to_extension(&a)) == 0xFFFFFFFF);
        assert!(ha.equals(h.hash_to_extension(&b)) == 0);
        assert!(ha.equals(h.hash_to_extension(&c)) == 0);
        assert!(ha.equals(h.hash_to_extension(&d)) == 0);

        // Empty input is allowed.
        let he = h.hash_to_extension(&[]);
        assert!(he.equals(h.hash_to_extension(&[GFp::ZERO])) == 0);
    }
}
