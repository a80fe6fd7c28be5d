//! Scalars for the ECgFp5 group.
//!
//! The group has prime order `n`, an integer slightly below 2^319:
//!
//! ```text
//! n = 1067993516717146951041484916571792702745057740581727230159139685185762082554198619328292418486241
//! ```
//!
//! A `Scalar` is an integer modulo `n`. Values are stored over five 64-bit
//! limbs (little-endian order), always in canonical (`0..n-1`) form. This
//! makes encoding and decoding free of any multiplication; Montgomery
//! multiplication is used internally, with an extra Montgomery step to
//! convert one operand into Montgomery representation on the fly.
//!
//! Scalars encode over exactly 40 bytes (unsigned little-endian). Decoding
//! with `decode40()` verifies that the value is canonical;
//! `decode_reduce()` accepts inputs of arbitrary length and reduces
//! them modulo `n`.

use core::convert::TryFrom;

use super::backend::w64::{addcarry_u64, subborrow_u64, umull_add2, recode_signed_limbs};
use super::backend::Signed640;
use super::field::GFp5;
use rand_core::{CryptoRng, RngCore};
use sha2::{Sha512, Digest};

/// An integer modulo the ECgFp5 group order `n`.
#[derive(Clone, Copy, Debug)]
pub struct Scalar([u64; 5]);

impl Scalar {

    // The modulus itself (it is not a valid scalar value, so it is
    // not exposed).
    const N: [u64; 5] = [
        0xE80FD996948BFFE1,
        0xE8885C39D724A09C,
        0x7FFFFFE6CFB80639,
        0x7FFFFFF100000016,
        0x7FFFFFFD80000007,
    ];

    // -1/N[0] mod 2^64
    const N0I: u64 = 0xD78BEF72057B7BDF;

    // 2^640 mod n
    const R2: [u64; 5] = [
        0xA01001DCE33DC739,
        0x6C3228D33F62ACCF,
        0xD1D796CC91CF8525,
        0xAADFFF5D1574C1D8,
        0x4ACA13B28CA251F5,
    ];

    // Scalar encoding length (in bytes).
    pub const ENC_LEN: usize = 40;

    pub const ZERO: Self = Self([0; 5]);
    pub const ONE: Self = Self([1, 0, 0, 0, 0]);
    pub const TWO: Self = Self([2, 0, 0, 0, 0]);
    pub const MINUS_ONE: Self = Self([
        0xE80FD996948BFFE0,
        0xE8885C39D724A09C,
        0x7FFFFFE6CFB80639,
        0x7FFFFFF100000016,
        0x7FFFFFFD80000007,
    ]);

    // Raw addition (no reduction); the output carry is returned.
    #[inline(always)]
    fn add_inner(a: &[u64; 5], b: &[u64; 5]) -> ([u64; 5], u8) {
        let mut r = [0u64; 5];
        let mut cc = 0;
        for i in 0..5 {
            (r[i], cc) = addcarry_u64(a[i], b[i], cc);
        }
        (r, cc)
    }

    // Raw subtraction (no reduction); the output borrow is returned.
    #[inline(always)]
    fn sub_inner(a: &[u64; 5], b: &[u64; 5]) -> ([u64; 5], u8) {
        let mut r = [0u64; 5];
        let mut cc = 0;
        for i in 0..5 {
            (r[i], cc) = subborrow_u64(a[i], b[i], cc);
        }
        (r, cc)
    }

    // Select a0 (if ctl == 0) or a1 (if ctl == 0xFFFFFFFF).
    #[inline(always)]
    fn select_limbs(a0: &[u64; 5], a1: &[u64; 5], ctl: u32) -> [u64; 5] {
        let cw = ((ctl as i32) as i64) as u64;
        let mut r = [0u64; 5];
        for i in 0..5 {
            r[i] = a0[i] ^ (cw & (a0[i] ^ a1[i]));
        }
        r
    }

    // Subtract n from the provided value, unless that would yield a
    // negative integer.
    #[inline(always)]
    fn reduce_once(a: &[u64; 5]) -> [u64; 5] {
        let (r, cc) = Self::sub_inner(a, &Self::N);
        Self::select_limbs(&r, a, (cc as u32).wrapping_neg())
    }

    #[inline]
    fn set_add(&mut self, rhs: &Self) {
        // Both operands are lower than n < 2^319, hence the sum cannot
        // overflow.
        let (r, _) = Self::add_inner(&self.0, &rhs.0);
        self.0 = Self::reduce_once(&r);
    }

    #[inline]
    fn set_sub(&mut self, rhs: &Self) {
        let (r0, cc) = Self::sub_inner(&self.0, &rhs.0);
        let (r1, _) = Self::add_inner(&r0, &Self::N);
        self.0 = Self::select_limbs(&r0, &r1, (cc as u32).wrapping_neg());
    }

    /// Negates this scalar (in place).
    #[inline]
    pub fn set_neg(&mut self) {
        let mut r = Self::ZERO;
        r.set_sub(self);
        *self = r;
    }

    /// Montgomery multiplication.
    ///
    /// Returns `(self*rhs)/2^320 mod n`. The `rhs` operand is provided
    /// as five 64-bit limbs and may be any integer lower than 2^320
    /// (`self` is a scalar and thus lower than `n`).
    pub fn montymul(self, rhs: &[u64; 5]) -> Self {
        let a = &self.0;
        let mut r = [0u64; 5];
        for i in 0..5 {
            // Iteration i computes r <- (r + self*rhs_i + f*n)/2^64.
            // Factor f is set so that the division is exact. Since
            // r + self*rhs_i + f*n < 2^384, the new r fits on 320 bits.
            let m = rhs[i];
            let f = a[0].wrapping_mul(m).wrapping_add(r[0])
                .wrapping_mul(Self::N0I);
            let mut cc1 = 0;
            let mut cc2 = 0;
            for j in 0..5 {
                let (lo, hi) = umull_add2(a[j], m, r[j], cc1);
                cc1 = hi;
                let (lo, hi) = umull_add2(f, Self::N[j], lo, cc2);
                cc2 = hi;
                if j > 0 {
                    r[j - 1] = lo;
                }
            }
            r[4] = cc1.wrapping_add(cc2);
        }

        // The result is lower than 2*n, a single conditional
        // subtraction is enough.
        Self(Self::reduce_once(&r))
    }

    #[inline]
    fn set_mul(&mut self, rhs: &Self) {
        // self*R2/2^320 = self*2^320 mod n, i.e. self in Montgomery
        // representation; the second Montgomery multiplication then
        // yields the plain product.
        *self = self.montymul(&Self::R2).montymul(&rhs.0);
    }

    /// Squares this scalar (in place).
    #[inline(always)]
    pub fn set_square(&mut self) {
        let r = *self;
        self.set_mul(&r);
    }

    /// Squares this scalar.
    #[inline(always)]
    pub fn square(self) -> Self {
        let mut r = self;
        r.set_square();
        r
    }

    /// Creates a scalar from a 64-bit integer.
    #[inline(always)]
    pub fn from_u64(x: u64) -> Self {
        Self([x, 0, 0, 0, 0])
    }

    /// Creates a scalar from a 320-bit integer (five 64-bit limbs,
    /// little-endian order). The integer is reduced modulo `n`.
    pub fn from_w64le(x: [u64; 5]) -> Self {
        // 2^320 - 1 < 3*n, hence two conditional subtractions suffice.
        Self(Self::reduce_once(&Self::reduce_once(&x)))
    }

    /// Gets the scalar value as five 64-bit limbs (little-endian order).
    #[inline(always)]
    pub fn to_w64le(self) -> [u64; 5] {
        self.0
    }

    /// Converts a GF(p^5) element into a scalar.
    ///
    /// The five coefficients of the element (in canonical form) are
    /// interpreted as the limbs of a 320-bit integer (lowest degree
    /// first), which is reduced modulo `n`. This is used to obtain
    /// signature challenges from hash outputs.
    pub fn from_gfp5(x: &GFp5) -> Self {
        Self::from_w64le(x.to_w64le())
    }

    /// Compares two scalars for equality.
    ///
    /// Returned value is 0xFFFFFFFF if the two values are equal,
    /// 0x00000000 otherwise.
    #[inline]
    pub fn equals(self, rhs: Self) -> u32 {
        let mut r = 0u64;
        for i in 0..5 {
            r |= self.0[i] ^ rhs.0[i];
        }
        ((r | r.wrapping_neg()) >> 63).wrapping_sub(1) as u32
    }

    /// Compares this scalar with zero.
    ///
    /// Returned value is 0xFFFFFFFF if this scalar is zero, 0x00000000
    /// otherwise.
    #[inline]
    pub fn iszero(self) -> u32 {
        self.equals(Self::ZERO)
    }

    /// Conditionally copies the provided scalar (`a`) into `self`.
    ///
    /// `ctl` MUST be equal to 0x00000000 (`self` is unchanged) or
    /// 0xFFFFFFFF (`a` is copied).
    #[inline]
    pub fn set_cond(&mut self, a: &Self, ctl: u32) {
        self.0 = Self::select_limbs(&self.0, &a.0, ctl);
    }

    /// Returns `a0` (if `ctl` = 0x00000000) or `a1` (if
    /// `ctl` = 0xFFFFFFFF).
    #[inline]
    pub fn select(a0: &Self, a1: &Self, ctl: u32) -> Self {
        Self(Self::select_limbs(&a0.0, &a1.0, ctl))
    }

    /// Encodes this scalar over exactly 40 bytes (unsigned little-endian).
    pub fn encode(self) -> [u8; 40] {
        let mut d = [0u8; 40];
        for i in 0..5 {
            d[(8 * i)..(8 * i + 8)].copy_from_slice(&self.0[i].to_le_bytes());
        }
        d
    }

    /// Decodes a scalar from exactly 40 bytes.
    ///
    /// On success, the decoded scalar and 0xFFFFFFFF are returned. If
    /// the source slice does not have length 40 bytes, or if the value
    /// is not lower than `n`, then zero and 0x00000000 are returned.
    /// When the length is correct, the outcome is not leaked through
    /// timing-based side channels.
    pub fn decode40(buf: &[u8]) -> (Self, u32) {
        if buf.len() != 40 {
            return (Self::ZERO, 0);
        }
        let mut x = [0u64; 5];
        for i in 0..5 {
            x[i] = u64::from_le_bytes(*<&[u8; 8]>::try_from(
                &buf[(8 * i)..(8 * i + 8)]).unwrap());
        }
        let (_, cc) = Self::sub_inner(&x, &Self::N);
        let ok = (cc as u32).wrapping_neg();
        (Self(Self::select_limbs(&[0u64; 5], &x, ok)), ok)
    }

    /// Decodes a scalar from exactly 40 bytes (canonical encoding only).
    #[inline]
    pub fn decode(buf: &[u8]) -> Option<Self> {
        let (r, ok) = Self::decode40(buf);
        if ok != 0 {
            Some(r)
        } else {
            None
        }
    }

    /// Decodes bytes into a scalar, with reduction modulo `n`.
    ///
    /// The source bytes are interpreted with unsigned little-endian
    /// convention; they may have any length. This process never fails.
    pub fn decode_reduce(buf: &[u8]) -> Self {
        // Chunks of 40 bytes are processed from the top; for each
        // chunk, the accumulator is multiplied by 2^320 (with a
        // Montgomery multiplication by 2^640) and the chunk is added.
        let mut r = Self::ZERO;
        let mut n = buf.len();
        while n > 0 {
            let k = if (n % 40) == 0 { 40 } else { n % 40 };
            let mut tmp = [0u8; 40];
            tmp[..k].copy_from_slice(&buf[(n - k)..n]);
            let mut x = [0u64; 5];
            for i in 0..5 {
                x[i] = u64::from_le_bytes(*<&[u8; 8]>::try_from(
                    &tmp[(8 * i)..(8 * i + 8)]).unwrap());
            }
            r = r.montymul(&Self::R2);
            r.set_add(&Self::from_w64le(x));
            n -= k;
        }
        r
    }

    /// Recodes this scalar into signed digits.
    ///
    /// For a window width of `w` bits, digits are in the
    /// `-(2^(w-1)-1)..+2^(w-1)` range, and `sum_i ss[i]*2^(w*i)` is
    /// equal to the scalar. If `w*ss.len() >= 320`, then the output
    /// encodes the complete scalar value, and the top digit is
    /// nonnegative. The window width MUST be between 2 and 10.
    pub fn recode_signed(self, ss: &mut [i32], w: u32) {
        recode_signed_limbs(&self.0, ss, w);
    }

    /// Splits this scalar into 80 4-bit limbs (least significant
    /// first).
    pub fn split_to_4bit_limbs(self) -> [u8; 80] {
        let mut r = [0u8; 80];
        for i in 0..5 {
            for j in 0..16 {
                r[16 * i + j] = ((self.0[i] >> (4 * j)) & 0xF) as u8;
            }
        }
        r
    }

    /// Gets a uniformly random scalar.
    ///
    /// Candidates of 319 bits are generated until one is lower than
    /// `n`; since `n` is close to 2^319, very few iterations are
    /// needed on average.
    pub fn random<T: CryptoRng + RngCore>(rng: &mut T) -> Self {
        loop {
            let mut x = [0u64; 5];
            for i in 0..5 {
                x[i] = rng.next_u64();
            }
            x[4] &= 0x7FFFFFFFFFFFFFFF;
            let (_, cc) = Self::sub_inner(&x, &Self::N);
            if cc != 0 {
                return Self(x);
            }
        }
    }

    /// Deterministically derives a scalar from a seed.
    ///
    /// The seed is hashed with SHA-512, and the output is reduced
    /// modulo `n`. This is meant for tests and reproducible
    /// benchmarks; it MUST NOT be used to generate secret keys (the
    /// seed would then be the secret).
    pub fn from_seed(seed: &[u8]) -> Self {
        let mut sh = Sha512::new();
        sh.update(seed);
        Self::decode_reduce(&sh.finalize())
    }
}

impl_binop!(Scalar, Scalar, Add, add, AddAssign, add_assign, set_add);
impl_binop!(Scalar, Scalar, Sub, sub, SubAssign, sub_assign, set_sub);
impl_binop!(Scalar, Scalar, Mul, mul, MulAssign, mul_assign, set_mul);
impl_neg!(Scalar);

impl Signed640 {

    /// The square of the group order `n`.
    pub const N_SQUARED: Self = Self::from_limbs([
        0x8E6B7A18061803C1,
        0x0AD8BDEE1594E2CF,
        0x17640E465F2598BC,
        0x90465B4214B27B1C,
        0xD308FECCB1878B88,
        0x3CC55EB2EAC07502,
        0x59F038FB784335CE,
        0xBFFFFE954FB808EA,
        0xBFFFFFCB80000099,
        0x3FFFFFFD8000000D,
    ]);

    /// Computes the product of two scalars, as plain integers (no
    /// modular reduction).
    pub fn from_mul_scalars(a: &Scalar, b: &Scalar) -> Self {
        Self::from_mul_limbs(&a.0, &b.0)
    }
}

// ========================================================================

#[cfg(test)]
mod tests {

    use super::Scalar;
    use crate::backend::Signed640;
    use crate::field::{GFp, GFp5};
    use num_bigint::{BigInt, Sign};
    use sha2::{Sha256, Digest};

    fn zn() -> BigInt {
        BigInt::parse_bytes(b"1067993516717146951041484916571792702745057740581727230159139685185762082554198619328292418486241", 10).unwrap()
    }

    fn to_bigint(x: &Scalar) -> BigInt {
        BigInt::from_bytes_le(Sign::Plus, &x.encode())
    }

    const FULL: [u64; 5] = [0xFFFFFFFFFFFFFFFF; 5];

    #[test]
    fn scalar_kat() {
        let a = Scalar([1, 2, 3, 4, 5]);
        assert!(a.montymul(&FULL).0 == [
            10974894505036100890, 7458803775930281466, 744239893213209819,
            3396127080529349464, 5979369289905897562,
        ]);

        // Out-of-range operand; this still matches the plain algorithm.
        let b = Scalar(FULL);
        assert!((b * b).0 == [
            471447996674510360, 3520142298321118626, 17240611161823899731,
            5610669884293437850, 1193611606749909414,
        ]);

        let c = Scalar([1, 2, 0, 0, 0]);
        assert!((c - b).0 == [
            0xE80FD996948BFFE3, 0xE8885C39D724A09E, 0x7FFFFFE6CFB80639,
            0x7FFFFFF100000016, 0x7FFFFFFD80000007,
        ]);

        let x = GFp5::from_coeffs([GFp::MINUS_ONE; 5]);
        assert!(Scalar::from_gfp5(&x).0 == [
            3449841778703204414, 3382000508875488967, 212073444237,
            124554051540, 17179869170,
        ]);

        assert!((Scalar::MINUS_ONE + Scalar::ONE).iszero() == 0xFFFFFFFF);
        assert!((-Scalar::ONE).equals(Scalar::MINUS_ONE) == 0xFFFFFFFF);
    }

    #[test]
    fn scalar_recode() {
        let p = GFp::MODULUS;
        let a = Scalar([p - 1, p - 2, p - 3, 0xFFFFFFFFFFFFFFFF, p - 5]);
        let mut ss = [0i32; 50];
        a.recode_signed(&mut ss, 5);
        for i in 0..50 {
            let e = match i {
                6 => -4,
                19 => -2,
                25 => -8,
                32 => -1,
                _ => 0,
            };
            assert!(ss[i] == e);
        }

        let zn = zn();
        let mut sh = Sha256::new();
        for w in 2..11u32 {
            sh.update((w as u64).to_le_bytes());
            let s = Scalar::decode_reduce(&sh.finalize_reset());
            let k = ((320 + w - 1) / w) as usize;
            let mut ss = [0i32; 160];
            s.recode_signed(&mut ss[..k], w);
            let mut z = BigInt::from(0);
            for i in (0..k).rev() {
                z = (z << w) + BigInt::from(ss[i]);
            }
            assert!(((z % &zn) + &zn) % &zn == to_bigint(&s));
        }
    }

    #[test]
    fn scalar_split4() {
        let s = Scalar([
            6950590877883398434, 17178336263794770543, 11012823478139181320,
            16445091359523510936, 5882925226143600273,
        ]);
        let limbs = s.split_to_4bit_limbs();
        let expected: [u8; 80] = [
            2, 2, 9, 7, 15, 4, 15, 13, 3, 9, 5, 7, 5, 7, 0, 6,
            15, 6, 2, 12, 2, 11, 3, 3, 1, 13, 5, 11, 5, 6, 14, 14,
            8, 0, 9, 5, 1, 9, 12, 13, 10, 9, 8, 6, 5, 13, 8, 9,
            8, 9, 10, 9, 14, 3, 15, 2, 6, 7, 3, 11, 8, 3, 4, 14,
            1, 9, 14, 4, 9, 7, 8, 15, 2, 5, 9, 5, 4, 10, 1, 5,
        ];
        assert!(limbs == expected);

        let enc = s.encode();
        let t = Scalar::decode(&enc).unwrap();
        assert!(t.equals(s) == 0xFFFFFFFF);
    }

    #[test]
    fn scalar_ops() {
        let zn = zn();
        let mut sh = Sha256::new();
        for i in 0..300 {
            sh.update(((2 * i) as u64).to_le_bytes());
            let v1 = sh.finalize_reset();
            sh.update(((2 * i + 1) as u64).to_le_bytes());
            let v2 = sh.finalize_reset();
            let mut buf1 = [0u8; 48];
            buf1[..32].copy_from_slice(&v1);
            buf1[32..].copy_from_slice(&v2[..16]);
            let a = Scalar::decode_reduce(&buf1);
            let b = Scalar::decode_reduce(&v2);
            let za = BigInt::from_bytes_le(Sign::Plus, &buf1) % &zn;
            let zb = BigInt::from_bytes_le(Sign::Plus, &v2) % &zn;
            assert!(to_bigint(&a) == za);
            assert!(to_bigint(&b) == zb);

            assert!(to_bigint(&(a + b)) == (&za + &zb) % &zn);
            assert!(to_bigint(&(a - b)) == ((&zn + &za) - &zb) % &zn);
            assert!(to_bigint(&(-a)) == (&zn - &za) % &zn);
            assert!(to_bigint(&(a * b)) == (&za * &zb) % &zn);
            assert!(to_bigint(&a.square()) == (&za * &za) % &zn);

            let p = Signed640::from_mul_scalars(&a, &b);
            let mut pb = [0u8; 80];
            for (j, w) in p.to_limbs().iter().enumerate() {
                pb[(8 * j)..(8 * j + 8)].copy_from_slice(&w.to_le_bytes());
            }
            assert!(BigInt::from_bytes_le(Sign::Plus, &pb) == &za * &zb);
        }

        let nn = Signed640::N_SQUARED;
        let mut pb = [0u8; 80];
        for (j, w) in nn.to_limbs().iter().enumerate() {
            pb[(8 * j)..(8 * j + 8)].copy_from_slice(&w.to_le_bytes());
        }
        assert!(BigInt::from_bytes_le(Sign::Plus, &pb) == &zn * &zn);
    }

    #[test]
    fn scalar_decode() {
        let mut buf = Scalar::MINUS_ONE.encode();
        assert!(buf[..] == hex::decode("e0ff8b9496d90fe89ca024d7395c88e83906b8cfe6ffff7f16000000f1ffff7f07000080fdffff7f").unwrap());

        // n itself is not canonical.
        buf[0] += 1;
        let (s, ok) = Scalar::decode40(&buf);
        assert!(ok == 0);
        assert!(s.iszero() == 0xFFFFFFFF);
        assert!(Scalar::decode(&buf[..39]).is_none());
        buf[0] -= 1;
        let s = Scalar::decode(&buf).unwrap();
        assert!(s.equals(Scalar::MINUS_ONE) == 0xFFFFFFFF);

        // decode_reduce() on n and n+1.
        buf[0] += 1;
        assert!(Scalar::decode_reduce(&buf).iszero() == 0xFFFFFFFF);
        buf[0] += 1;
        assert!(Scalar::decode_reduce(&buf).equals(Scalar::ONE) == 0xFFFFFFFF);
        assert!(Scalar::decode_reduce(&[]).iszero() == 0xFFFFFFFF);

        let s1 = Scalar::from_seed(b"test seed");
        let s2 = Scalar::from_seed(b"test seed");
        let s3 = Scalar::from_seed(b"other seed");
        assert!(s1.equals(s2) == 0xFFFFFFFF);
        assert!(s1.equals(s3) == 0);
    }
}
