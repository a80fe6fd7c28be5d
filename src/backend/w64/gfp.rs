use core::convert::TryFrom;

use super::{addcarry_u64, subborrow_u64};
use rand_core::{CryptoRng, RngCore};

/// Element of the "Goldilocks" prime field GF(p), with p = 2^64 - 2^32 + 1.
///
/// The value is always kept in its canonical form (an integer in the
/// 0 to p-1 range).
#[derive(Clone, Copy, Debug)]
pub struct GFp(u64);

impl GFp {

    // Modulus p = 2^64 - 2^32 + 1.
    pub const MODULUS: u64 = 0xFFFFFFFF00000001;

    // 2^64 mod p = 2^32 - 1.
    const EPSILON: u64 = 0x00000000FFFFFFFF;

    // Element encoding length (in bytes).
    pub const ENC_LEN: usize = 8;

    pub const ZERO: GFp = GFp(0);
    pub const ONE: GFp = GFp(1);
    pub const TWO: GFp = GFp(2);
    pub const MINUS_ONE: GFp = GFp(Self::MODULUS - 1);

    // A primitive 2^32-th root of unity (7^((p-1)/2^32), 7 is not a
    // square modulo p).
    const ROOT_2_32: GFp = GFp(1753635133440165772);

    // Create an element from a 64-bit integer (implicitly reduced modulo p).
    pub const fn w64(x: u64) -> Self {
        if x >= Self::MODULUS {
            Self(x - Self::MODULUS)
        } else {
            Self(x)
        }
    }

    // Same as w64(), but constant-time.
    #[inline(always)]
    pub fn from_u64(x: u64) -> Self {
        let (d, cc) = subborrow_u64(x, Self::MODULUS, 0);
        let m = (cc as u64).wrapping_neg();
        Self(d ^ (m & (d ^ x)))
    }

    #[inline(always)]
    pub fn from_u32(x: u32) -> Self {
        Self(x as u64)
    }

    // Get the value as an integer in the 0 to p-1 range.
    #[inline(always)]
    pub fn to_u64(self) -> u64 {
        self.0
    }

    #[inline]
    fn set_add(&mut self, rhs: &Self) {
        // Sum is lower than 2*p < 2^65. If there is a carry, then the
        // true value is d + 2^64 >= p, and d - p mod 2^64 is the result;
        // otherwise, we subtract p only if there was no borrow.
        let (d, c) = addcarry_u64(self.0, rhs.0, 0);
        let (e, b) = subborrow_u64(d, Self::MODULUS, 0);
        let m = ((b & !c) as u64).wrapping_neg();
        self.0 = e ^ (m & (e ^ d));
    }

    #[inline]
    fn set_sub(&mut self, rhs: &Self) {
        let (d, b) = subborrow_u64(self.0, rhs.0, 0);
        self.0 = d.wrapping_add(Self::MODULUS & (b as u64).wrapping_neg());
    }

    // Negate this value (in place).
    #[inline]
    pub fn set_neg(&mut self) {
        let mut r = Self::ZERO;
        r.set_sub(self);
        *self = r;
    }

    // Reduce a 128-bit integer modulo p.
    #[inline(always)]
    fn reduce128(x: u128) -> u64 {
        // x = x_lo + 2^64*x_hi_lo + 2^96*x_hi_hi, with:
        //   2^64 = 2^32 - 1 mod p
        //   2^96 = -1 mod p
        let x_lo = x as u64;
        let x_hi = (x >> 64) as u64;
        let x_hi_hi = x_hi >> 32;
        let x_hi_lo = x_hi & Self::EPSILON;

        // t0 = x_lo - x_hi_hi; on borrow, we add back 2^64 and must
        // subtract 2^32 - 1 (there is no underflow since
        // x_hi_hi < 2^32).
        let (t0, b) = subborrow_u64(x_lo, x_hi_hi, 0);
        let t0 = t0.wrapping_sub(Self::EPSILON & (b as u64).wrapping_neg());

        // t1 = x_hi_lo*(2^32 - 1) fits on 64 bits.
        let t1 = x_hi_lo * Self::EPSILON;
        let (t2, c) = addcarry_u64(t0, t1, 0);
        let t2 = t2.wrapping_add(Self::EPSILON & (c as u64).wrapping_neg());

        // t2 < 2^64, but it may still be in the p..2^64-1 range.
        let (t3, b) = subborrow_u64(t2, Self::MODULUS, 0);
        let m = (b as u64).wrapping_neg();
        t3 ^ (m & (t3 ^ t2))
    }

    #[inline(always)]
    fn set_mul(&mut self, rhs: &Self) {
        self.0 = Self::reduce128((self.0 as u128) * (rhs.0 as u128));
    }

    // Square this value (in place).
    #[inline(always)]
    pub fn set_square(&mut self) {
        self.0 = Self::reduce128((self.0 as u128) * (self.0 as u128));
    }

    // Square this value.
    #[inline(always)]
    pub fn square(self) -> Self {
        let mut r = self;
        r.set_square();
        r
    }

    // Square this value n times (in place).
    #[inline(always)]
    pub fn set_xsquare(&mut self, n: u32) {
        for _ in 0..n {
            self.set_square();
        }
    }

    // Square this value n times.
    #[inline(always)]
    pub fn xsquare(self, n: u32) -> Self {
        let mut r = self;
        r.set_xsquare(n);
        r
    }

    // Divide this value by 2 (in place).
    #[inline]
    pub fn set_half(&mut self) {
        // If the value is odd, add p (over 65 bits) before shifting.
        let m = (self.0 & 1).wrapping_neg();
        let (d, c) = addcarry_u64(self.0, Self::MODULUS & m, 0);
        self.0 = (d >> 1) | ((c as u64) << 63);
    }

    #[inline(always)]
    pub fn half(self) -> Self {
        let mut r = self;
        r.set_half();
        r
    }

    // Multiply this value by 2 (in place).
    #[inline(always)]
    pub fn set_mul2(&mut self) {
        let r = *self;
        self.set_add(&r);
    }

    #[inline(always)]
    pub fn mul2(self) -> Self {
        let mut r = self;
        r.set_mul2();
        r
    }

    // Multiply this value by a small integer (in place).
    #[inline(always)]
    pub fn set_mul_small(&mut self, x: u32) {
        self.0 = Self::reduce128((self.0 as u128) * (x as u128));
    }

    #[inline(always)]
    pub fn mul_small(self, x: u32) -> Self {
        let mut r = self;
        r.set_mul_small(x);
        r
    }

    // Compute self^(2^31-1) and self^(2^32-1). Both are needed for
    // inversion, square roots and Legendre symbols.
    fn pow_ones(self) -> (Self, Self) {
        let x = self;
        let x2 = x.square() * x;
        let x4 = x2.xsquare(2) * x2;
        let x8 = x4.xsquare(4) * x4;
        let x16 = x8.xsquare(8) * x8;
        let x24 = x16.xsquare(8) * x8;
        let x28 = x24.xsquare(4) * x4;
        let x30 = x28.xsquare(2) * x2;
        let x31 = x30.square() * x;
        let x32 = x31.square() * x;
        (x31, x32)
    }

    // Invert this value (in place); if the value is zero, then it
    // stays at zero.
    pub fn set_invert(&mut self) {
        // 1/x = x^(p-2), with p - 2 = (2^31 - 1)*2^33 + (2^32 - 1).
        let (x31, x32) = self.pow_ones();
        *self = x31.xsquare(33) * x32;
    }

    #[inline(always)]
    pub fn invert(self) -> Self {
        let mut r = self;
        r.set_invert();
        r
    }

    #[inline(always)]
    fn set_div(&mut self, rhs: &Self) {
        self.set_mul(&rhs.invert());
    }

    // Compute the Legendre symbol on this value. Return value is:
    //   0   if this value is zero
    //  +1   if this value is a non-zero quadratic residue
    //  -1   if this value is not a quadratic residue
    pub fn legendre(self) -> i32 {
        // x^((p-1)/2) = (x^(2^32-1))^(2^31), which is 0, 1 or p-1;
        // 1 has its low bit set, p-1 has its top bit set.
        let (_, x32) = self.pow_ones();
        let y = x32.xsquare(31).0;
        ((y & 1) as i32) - ((y >> 63) as i32)
    }

    // Set this value to its square root. Returned value is 0xFFFFFFFF
    // if the operation succeeded (value was indeed a quadratic
    // residue), 0 otherwise (value was not a quadratic residue). In
    // the latter case, this value is set to zero as well.
    // When this operation succeeds, the returned square root is the one
    // whose least significant bit is 0.
    pub fn set_sqrt(&mut self) -> u32 {
        // Tonelli-Shanks with p - 1 = q*2^32, q = 2^32 - 1. We maintain
        // r^2 = x*t, with t in a subgroup of order 2^k that shrinks
        // at each step; the loop has a fixed number of iterations.
        let x = *self;
        let (x31, x32) = x.pow_ones();
        let mut r = x31 * x;
        let mut t = x32;
        let mut c = Self::ROOT_2_32;
        for k in (1..32).rev() {
            let ctl = !t.xsquare(k - 1).equals(Self::ONE);
            r.set_cond(&(r * c), ctl);
            c.set_square();
            t.set_cond(&(t * c), ctl);
        }
        let ok = r.square().equals(x);
        r.set_cond(&Self::ZERO, !ok);
        let neg = (r.0 & 1).wrapping_neg() as u32;
        r.set_cond(&-r, neg);
        *self = r;
        ok
    }

    // Compute the square root of this value. Returned value are (y, r):
    //  - If this value is indeed a quadratic residue, then y is the
    //    square root whose least significant bit is 0, and r is
    //    equal to 0xFFFFFFFF.
    //  - If this value is not a quadratic residue, then y is zero, and
    //    r is equal to 0.
    #[inline(always)]
    pub fn sqrt(self) -> (Self, u32) {
        let mut x = self;
        let r = x.set_sqrt();
        (x, r)
    }

    // Conditionally copy the provided value ('a') into self:
    //  - If ctl == 0xFFFFFFFF, then the value of 'a' is copied into self.
    //  - If ctl == 0, then the value of self is unchanged.
    // ctl MUST be equal to 0 or 0xFFFFFFFF.
    #[inline(always)]
    pub fn set_cond(&mut self, a: &Self, ctl: u32) {
        let cw = ((ctl as i32) as i64) as u64;
        self.0 ^= cw & (self.0 ^ a.0);
    }

    // Return a value equal to either a0 (if ctl == 0) or a1 (if
    // ctl == 0xFFFFFFFF). Value ctl MUST be either 0 or 0xFFFFFFFF.
    #[inline(always)]
    pub fn select(a0: &Self, a1: &Self, ctl: u32) -> Self {
        let mut r = *a0;
        r.set_cond(a1, ctl);
        r
    }

    // Conditionally swap two elements: values a and b are exchanged if
    // ctl == 0xFFFFFFFF, or not exchanged if ctl == 0x00000000. Value
    // ctl MUST be either 0x00000000 or 0xFFFFFFFF.
    #[inline(always)]
    pub fn cswap(a: &mut Self, b: &mut Self, ctl: u32) {
        let cw = ((ctl as i32) as i64) as u64;
        let t = cw & (a.0 ^ b.0);
        a.0 ^= t;
        b.0 ^= t;
    }

    // Equality check between two field elements (constant-time);
    // returned value is 0xFFFFFFFF on equality, 0 otherwise.
    #[inline(always)]
    pub fn equals(self, rhs: Self) -> u32 {
        let r = self.0 ^ rhs.0;
        ((r | r.wrapping_neg()) >> 63).wrapping_sub(1) as u32
    }

    // Compare this value with zero (constant-time); returned value
    // is 0xFFFFFFFF if this element is zero, 0 otherwise.
    #[inline(always)]
    pub fn iszero(self) -> u32 {
        let r = self.0;
        ((r | r.wrapping_neg()) >> 63).wrapping_sub(1) as u32
    }

    // Encode this value over exactly 8 bytes (unsigned little-endian,
    // canonical).
    #[inline(always)]
    pub fn encode(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    // Decode the field element from the provided bytes. If the source
    // slice does not have length exactly 8 bytes, or if the encoding
    // is non-canonical (i.e. does not represent an integer in the 0
    // to p-1 range), then this element is set to zero, and 0 is returned.
    // Otherwise, this element is set to the decoded value, and 0xFFFFFFFF
    // is returned.
    #[inline]
    pub fn set_decode8(&mut self, buf: &[u8]) -> u32 {
        if buf.len() != 8 {
            *self = Self::ZERO;
            return 0;
        }
        let x = u64::from_le_bytes(*<&[u8; 8]>::try_from(buf).unwrap());
        let (_, cc) = subborrow_u64(x, Self::MODULUS, 0);
        let cc = (cc as u64).wrapping_neg();
        self.0 = x & cc;
        cc as u32
    }

    // Decode a field element from 8 bytes. On success, this returns
    // (r, 0xFFFFFFFF); on failure (wrong length or non-canonical value),
    // this returns (0, 0).
    #[inline(always)]
    pub fn decode8(buf: &[u8]) -> (Self, u32) {
        let mut r = Self::ZERO;
        let cc = r.set_decode8(buf);
        (r, cc)
    }

    // Decode a field element from 8 bytes; `None` is returned if the
    // slice length is wrong or the value is not canonical.
    #[inline(always)]
    pub fn decode(buf: &[u8]) -> Option<Self> {
        let (r, cc) = Self::decode8(buf);
        if cc != 0 {
            Some(r)
        } else {
            None
        }
    }

    // Get a uniformly random field element. Rejection sampling is
    // used; the number of iterations leaks nothing about the result.
    pub fn random<T: CryptoRng + RngCore>(rng: &mut T) -> Self {
        loop {
            let x = rng.next_u64();
            if x < Self::MODULUS {
                return Self(x);
            }
        }
    }
}

impl_binop!(GFp, GFp, Add, add, AddAssign, add_assign, set_add);
impl_binop!(GFp, GFp, Sub, sub, SubAssign, sub_assign, set_sub);
impl_binop!(GFp, GFp, Mul, mul, MulAssign, mul_assign, set_mul);
impl_binop!(GFp, GFp, Div, div, DivAssign, div_assign, set_div);
impl_neg!(GFp);

// ========================================================================

#[cfg(test)]
mod tests {

    use super::GFp;
    use core::convert::TryFrom;
    use num_bigint::{BigInt, Sign};
    use sha2::{Sha256, Digest};

    fn zp() -> BigInt {
        BigInt::from(GFp::MODULUS)
    }

    fn check_gfp_ops(xa: u64, xb: u64) {
        let zp = zp();
        let a = GFp::from_u64(xa);
        let b = GFp::from_u64(xb);
        let za = BigInt::from(xa) % &zp;
        let zb = BigInt::from(xb) % &zp;

        assert!(BigInt::from(a.to_u64()) == za);

        let c = a + b;
        assert!(BigInt::from(c.to_u64()) == (&za + &zb) % &zp);

        let c = a - b;
        assert!(BigInt::from(c.to_u64()) == ((&za + &zp) - &zb) % &zp);

        let c = -a;
        assert!(BigInt::from(c.to_u64()) == (&zp - &za) % &zp);

        let c = a * b;
        assert!(BigInt::from(c.to_u64()) == (&za * &zb) % &zp);

        let c = a.square();
        assert!(BigInt::from(c.to_u64()) == (&za * &za) % &zp);

        let c = a.mul2();
        assert!(BigInt::from(c.to_u64()) == (&za << 1) % &zp);

        let c = a.half();
        assert!(c.mul2().equals(a) == 0xFFFFFFFF);

        let x = xb as u32;
        let c = a.mul_small(x);
        assert!(BigInt::from(c.to_u64()) == (&za * x) % &zp);

        let c = a / b;
        if b.iszero() != 0 {
            assert!(c.iszero() == 0xFFFFFFFF);
        } else {
            assert!((c * b).equals(a) == 0xFFFFFFFF);
        }

        let enc = a.encode();
        let (d, cc) = GFp::decode8(&enc);
        assert!(cc == 0xFFFFFFFF);
        assert!(d.equals(a) == 0xFFFFFFFF);
    }

    #[test]
    fn gfp_ops() {
        let edge = [
            0u64, 1, 2,
            0x00000000FFFFFFFF,
            0x0000000100000000,
            0xFFFFFFFF00000000,
            0xFFFFFFFF00000001,
            0xFFFFFFFF00000002,
            0xFFFFFFFFFFFFFFFF,
        ];
        for &xa in edge.iter() {
            for &xb in edge.iter() {
                check_gfp_ops(xa, xb);
            }
        }
        let mut sh = Sha256::new();
        for i in 0..1000 {
            sh.update((i as u64).to_le_bytes());
            let v = sh.finalize_reset();
            let xa = u64::from_le_bytes(*<&[u8; 8]>::try_from(&v[0..8]).unwrap());
            let xb = u64::from_le_bytes(*<&[u8; 8]>::try_from(&v[8..16]).unwrap());
            check_gfp_ops(xa, xb);
        }
    }

    #[test]
    fn gfp_sqrt_legendre() {
        assert!(GFp::ZERO.legendre() == 0);
        let (s, r) = GFp::ZERO.sqrt();
        assert!(r == 0xFFFFFFFF && s.iszero() == 0xFFFFFFFF);

        // 7 is not a square modulo p.
        let nqr = GFp::from_u32(7);
        assert!(nqr.legendre() == -1);

        let mut sh = Sha256::new();
        for i in 0..200 {
            sh.update((i as u64).to_le_bytes());
            let v = sh.finalize_reset();
            let x = GFp::from_u64(u64::from_le_bytes(
                *<&[u8; 8]>::try_from(&v[0..8]).unwrap()));
            if x.iszero() != 0 {
                continue;
            }
            let s = x.square();
            assert!(s.legendre() == 1);
            let (t, r) = s.sqrt();
            assert!(r == 0xFFFFFFFF);
            assert!(t.square().equals(s) == 0xFFFFFFFF);
            assert!((t.to_u64() & 1) == 0);

            let s2 = s * nqr;
            assert!(s2.legendre() == -1);
            let (t2, r) = s2.sqrt();
            assert!(r == 0);
            assert!(t2.iszero() == 0xFFFFFFFF);

            assert!((x * x.invert()).equals(GFp::ONE) == 0xFFFFFFFF);
        }
        assert!(GFp::ZERO.invert().iszero() == 0xFFFFFFFF);
    }

    #[test]
    fn gfp_decode() {
        let buf = GFp::MODULUS.to_le_bytes();
        let (x, cc) = GFp::decode8(&buf);
        assert!(cc == 0);
        assert!(x.iszero() == 0xFFFFFFFF);
        assert!(GFp::decode(&buf[..7]).is_none());
        let buf = (GFp::MODULUS - 1).to_le_bytes();
        let x = GFp::decode(&buf).unwrap();
        assert!(x.equals(GFp::MINUS_ONE) == 0xFFFFFFFF);
        assert!(GFp::w64(GFp::MODULUS + 5).equals(GFp::from_u32(5)) == 0xFFFFFFFF);
    }
}
