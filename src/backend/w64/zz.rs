use super::{addcarry_u64, subborrow_u64, umull_add2, sgnw};

// Recode an integer (given as 64-bit limbs, little-endian) into signed
// digits for a window of w bits. Each digit is in the
// -(2^(w-1)-1) to +2^(w-1) range, and sum_i ss[i]*2^(w*i) is equal to
// the source value, provided that the output slice is large enough to
// cover all source bits plus one extra window for the final carry; the
// top digit is then non-negative. Extra source bits are ignored if the
// output slice is too short.
//
// This function is constant-time (for a given slice length). The window
// width MUST be between 2 and 10 (inclusive).
pub(crate) fn recode_signed_limbs(limbs: &[u64], ss: &mut [i32], w: u32) {
    assert!(w >= 2 && w <= 10, "invalid recoding window: {}", w);
    let mw = (1u32 << w) - 1;
    let hw = 1u32 << (w - 1);
    let mut acc = 0u64;
    let mut acc_len = 0u32;
    let mut j = 0;
    let mut cc = 0u32;
    for i in 0..ss.len() {
        // Get the next w-bit chunk in bb.
        let mut bb;
        if acc_len < w {
            if j < limbs.len() {
                let nl = limbs[j];
                j += 1;
                bb = ((acc | (nl << acc_len)) as u32) & mw;
                acc = nl >> (w - acc_len);
            } else {
                bb = (acc as u32) & mw;
                acc = 0;
            }
            acc_len += 64 - w;
        } else {
            bb = (acc as u32) & mw;
            acc_len -= w;
            acc >>= w;
        }

        // If bb > 2^(w-1), subtract 2^w and propagate a carry.
        bb += cc;
        cc = hw.wrapping_sub(bb) >> 31;
        ss[i] = (bb as i32) - ((cc << w) as i32);
    }
}

macro_rules! define_signed { ($typename:ident, $bitlen:expr, $nlimbs:expr) => {

    /// Custom signed integer, in two's complement notation.
    ///
    /// Values are stored over 64-bit limbs (little-endian order); all
    /// operations are performed modulo 2^(64*N), and bits beyond the
    /// nominal bit length are ignored when interpreting the value.
    /// WARNING: all operations on this type are variable-time; it MUST
    /// NOT be used with secret values.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct $typename([u64; $nlimbs]);

    impl $typename {
        pub const BITLEN: u32 = $bitlen;
        pub const N: usize = $nlimbs;
        pub const ZERO: Self = Self([0u64; $nlimbs]);

        #[inline(always)]
        pub const fn from_limbs(x: [u64; $nlimbs]) -> Self {
            Self(x)
        }

        #[inline(always)]
        pub fn to_limbs(self) -> [u64; $nlimbs] {
            self.0
        }

        // Get the limbs, with the value sign-extended from its nominal
        // bit length to the full limb width.
        pub fn to_limbs_extended(self) -> [u64; $nlimbs] {
            let mut r = self.0;
            let t = Self::BITLEN & 63;
            if t != 0 {
                let hi = r[Self::N - 1] << (64 - t);
                r[Self::N - 1] = ((hi as i64) >> (64 - t)) as u64;
            }
            r
        }

        // Add rhs to self.
        pub fn set_add(&mut self, rhs: &Self) {
            self.set_add_shifted(rhs, 0);
        }

        // Subtract rhs from self.
        pub fn set_sub(&mut self, rhs: &Self) {
            self.set_sub_shifted(rhs, 0);
        }

        // Add (2^s)*rhs to self. Shift counts of BITLEN or more have
        // no effect.
        pub fn set_add_shifted(&mut self, rhs: &Self, s: u32) {
            if s >= Self::BITLEN {
                return;
            }
            let j = (s >> 6) as usize;
            let s = s & 63;
            if s == 0 {
                let (dj, mut cc) = addcarry_u64(self.0[j], rhs.0[0], 0);
                self.0[j] = dj;
                for i in (j + 1)..Self::N {
                    let (dx, ee) = addcarry_u64(self.0[i], rhs.0[i - j], cc);
                    self.0[i] = dx;
                    cc = ee;
                }
            } else {
                let (dj, mut cc) = addcarry_u64(self.0[j], rhs.0[0] << s, 0);
                self.0[j] = dj;
                for i in (j + 1)..Self::N {
                    let bw = (rhs.0[i - j - 1] >> (64 - s))
                        | (rhs.0[i - j] << s);
                    let (dx, ee) = addcarry_u64(self.0[i], bw, cc);
                    self.0[i] = dx;
                    cc = ee;
                }
            }
        }

        // Subtract (2^s)*rhs from self. Shift counts of BITLEN or more
        // have no effect.
        pub fn set_sub_shifted(&mut self, rhs: &Self, s: u32) {
            if s >= Self::BITLEN {
                return;
            }
            let j = (s >> 6) as usize;
            let s = s & 63;
            if s == 0 {
                let (dj, mut cc) = subborrow_u64(self.0[j], rhs.0[0], 0);
                self.0[j] = dj;
                for i in (j + 1)..Self::N {
                    let (dx, ee) = subborrow_u64(self.0[i], rhs.0[i - j], cc);
                    self.0[i] = dx;
                    cc = ee;
                }
            } else {
                let (dj, mut cc) = subborrow_u64(self.0[j], rhs.0[0] << s, 0);
                self.0[j] = dj;
                for i in (j + 1)..Self::N {
                    let bw = (rhs.0[i - j - 1] >> (64 - s))
                        | (rhs.0[i - j] << s);
                    let (dx, ee) = subborrow_u64(self.0[i], bw, cc);
                    self.0[i] = dx;
                    cc = ee;
                }
            }
        }

        // Add 1 to self.
        pub fn add1(&mut self) {
            for i in 0..Self::N {
                self.0[i] = self.0[i].wrapping_add(1);
                if self.0[i] != 0 {
                    return;
                }
            }
        }

        // Return true for non-negative values.
        #[inline]
        pub fn is_nonnegative(self) -> bool {
            let r = self.to_limbs_extended();
            (r[Self::N - 1] >> 63) == 0
        }

        // Return true iff self < rhs, both values being interpreted as
        // unsigned integers over the full limb width.
        pub fn lt_unsigned(self, rhs: &Self) -> bool {
            for i in (0..Self::N).rev() {
                let (aw, bw) = (self.0[i], rhs.0[i]);
                if aw != bw {
                    return aw < bw;
                }
            }
            false
        }

        // Get the bit length of this value, i.e. the minimal size of its
        // two's complement representation, excluding the sign bit: -2^k
        // has bit length k, while +2^k has bit length k+1.
        pub fn bitlength(self) -> u32 {
            let r = self.to_limbs_extended();
            let m = sgnw(r[Self::N - 1]);
            for i in (0..Self::N).rev() {
                let aw = r[i] ^ m;
                if aw != 0 {
                    return 64 * (i as u32) + 64 - aw.leading_zeros();
                }
            }
            0
        }
    }

} } // End of macro: define_signed

define_signed!(Signed161, 161, 3);
define_signed!(Signed640, 640, 10);

impl Signed161 {

    // Recode this value into 33 signed digits for a 5-bit window. Digits
    // are in the -16 to +16 range, and the value is equal to
    // sum_i ss[i]*2^(5*i).
    pub fn recode_signed5(self) -> [i32; 33] {
        // Add 2^160 to the sign-extended value, to get a non-negative
        // integer in the 0 to 2^161-1 range. The bias is removed from
        // the top digit afterwards.
        let mut tmp = self.to_limbs_extended();
        tmp[2] = tmp[2].wrapping_add(0x0000000100000000);
        let mut ss = [0i32; 33];
        recode_signed_limbs(&tmp, &mut ss, 5);
        ss[32] -= 1;
        ss
    }
}

impl Signed640 {

    // Compute the full product of two 320-bit unsigned integers (no
    // modular reduction).
    pub fn from_mul_limbs(a: &[u64; 5], b: &[u64; 5]) -> Self {
        let mut r = [0u64; 10];
        for i in 0..5 {
            let mut cc = 0u64;
            for j in 0..5 {
                let (lo, hi) = umull_add2(a[i], b[j], r[i + j], cc);
                r[i + j] = lo;
                cc = hi;
            }
            r[i + 5] = cc;
        }
        Self(r)
    }
}

// ========================================================================
