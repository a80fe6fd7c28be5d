//! ECgFp5 implementation.
//!
//! This module implements generic group operations on the ECgFp5
//! group, a prime order group built over the elliptic curve of equation
//! `y^2 = x*(x^2 + a*x + b)` over GF(p^5), with `a = 2` and `b = 263*z`
//! (p = 2^64 - 2^32 + 1, and GF(p^5) = GF(p)\[z\]/(z^5 - 3)). The curve
//! has order `2*n` for a prime `n` slightly below 2^319; the group is
//! the quotient of the curve by its point of order 2, and has order
//! `n` (integers modulo `n` are represented by the `Scalar` type).
//!
//! A group element is represented by the `Point` structure. `Point`
//! instances can be used in additions and subtractions with the usual
//! `+` and `-` operators; all combinations of raw values and references
//! are accepted, as well as compound assignment operators `+=` and
//! `-=`. Multiplication by a scalar uses the `*` and `*=` operators.
//! Specialized functions are available for point doubling
//! (`Point::double()`) and for sequences of successive doublings
//! (`Point::xdouble()`), the latter sharing some intermediate values
//! between doublings.
//!
//! Points are encoded into a single GF(p^5) element `w = y/x` (the
//! neutral encodes as zero). Encoding is canonical; decoding verifies
//! that the element is indeed the encoding of a group element. The
//! byte-level encoding of a point is the 40-byte encoding of `w`.

// Projective/fractional coordinates traditionally use uppercase letters,
// using lowercase only for affine coordinates.
#![allow(non_snake_case)]

use core::ops::Mul;
use super::field::GFp5;
use super::scalar::Scalar;

#[cfg(feature = "alloc")]
use super::Vec;

/// An element in the ECgFp5 group.
#[derive(Clone, Copy, Debug)]
pub struct Point {
    // We use the (x,u) fractional coordinates: for curve point (x,y),
    // we have (x,u) = (x,x/y) = (X/Z,U/T). For the neutral, the u
    // coordinate is 0. Z and T are never zero.
    X: GFp5,
    Z: GFp5,
    U: GFp5,
    T: GFp5,
}

/// A group element in affine (x,u) coordinates.
///
/// Affine points are used for precomputed windows in point
/// multiplication. The neutral is represented as (0,0).
#[derive(Clone, Copy, Debug)]
pub struct AffinePoint {
    x: GFp5,
    u: GFp5,
}

impl Point {

    /// The group neutral element.
    pub const NEUTRAL: Self = Self {
        X: GFp5::ZERO,
        Z: GFp5::ONE,
        U: GFp5::ZERO,
        T: GFp5::ONE,
    };

    /// The conventional base point (group generator).
    ///
    /// This point generates the whole group; it is encoded as `w = 4`.
    pub const BASE: Self = Self {
        X: GFp5::w64le([
            12883135586176881569,
            4356519642755055268,
            5248930565894896907,
            2165973894480315022,
            2448410071095648785,
        ]),
        Z: GFp5::ONE,
        U: GFp5::ONE,
        T: GFp5::w64le([4, 0, 0, 0, 0]),
    };

    /// The curve `a` constant (2).
    pub const A: GFp5 = GFp5::w64le([2, 0, 0, 0, 0]);

    /// The curve `b` constant is `B1*z`.
    pub const B1: u32 = 263;

    // 4*b
    pub(crate) const B_MUL4: GFp5 = GFp5::w64le([0, 4 * 263, 0, 0, 0]);

    /// Encodes this point into a field element.
    ///
    /// The encoding is `w = y/x` (i.e. `1/u`); the neutral encodes as
    /// zero.
    #[inline]
    pub fn encode(self) -> GFp5 {
        // w = 1/u = T/U; for the neutral, U = 0 and inversion of zero
        // yields zero.
        self.T * self.U.invert()
    }

    /// Encodes this point into 40 bytes.
    #[inline]
    pub fn encode_bytes(self) -> [u8; 40] {
        self.encode().encode()
    }

    /// Tests whether a field element can be decoded into a point.
    ///
    /// Returned value is 0xFFFFFFFF if `w` is the encoding of a group
    /// element, 0x00000000 otherwise.
    pub fn can_be_decoded(w: &GFp5) -> u32 {
        // Value w can be decoded if and only if it is zero, or
        // (w^2 - a)^2 - 4*b is a quadratic residue.
        let e = w.square() - Self::A;
        let delta = e.square() - Self::B_MUL4;
        w.iszero() | legendre_is_one(&delta)
    }

    /// Tries to decode a point from a field element.
    ///
    /// On success, 0xFFFFFFFF is returned. On failure (`w` is not the
    /// encoding of a group element), this point is set to the neutral,
    /// and 0x00000000 is returned. The decoding outcome is not leaked
    /// through timing-based side channels.
    pub fn set_decode(&mut self, w: &GFp5) -> u32 {
        // Curve equation is y^2 = x*(x^2 + a*x + b); encoded value
        // is w = y/x. Dividing by x, we get the equation:
        //   x^2 - (w^2 - a)*x + b = 0
        // We solve for x and keep the solution which is not itself a
        // square (if there are solutions, exactly one of them will be
        // a square, and the other will not be a square).
        let e = w.square() - Self::A;
        let delta = e.square() - Self::B_MUL4;
        let (r, c) = delta.canonical_sqrt();
        let x1 = (e + r).half();
        let x2 = (e - r).half();
        let x = GFp5::select(&x1, &x2, legendre_is_one(&x1));

        // If c == 0 (delta is not a square), then we get the neutral
        // here; note that if w == 0, then delta = a^2 - 4*b, which is
        // not a square, and w == 0 is the encoding of the neutral.
        self.X = GFp5::select(&GFp5::ZERO, &x, c);
        self.Z = GFp5::ONE;
        self.U = GFp5::select(&GFp5::ZERO, &GFp5::ONE, c);
        self.T = GFp5::select(&GFp5::ONE, w, c);
        c | w.iszero()
    }

    /// Tries to decode a point from a field element.
    ///
    /// This function returns `None` if `w` is not the encoding of a
    /// group element.
    #[inline]
    pub fn decode(w: &GFp5) -> Option<Self> {
        let mut P = Self::NEUTRAL;
        if P.set_decode(w) != 0 {
            Some(P)
        } else {
            None
        }
    }

    /// Tries to decode a point from exactly 40 bytes.
    ///
    /// Decoding fails if the source does not have length 40 bytes, if
    /// the bytes are not the canonical encoding of a field element, or
    /// if that element is not the encoding of a group element.
    pub fn decode_bytes(buf: &[u8]) -> Option<Self> {
        let (w, ok) = GFp5::decode40(buf);
        let mut P = Self::NEUTRAL;
        if (ok & P.set_decode(&w)) != 0 {
            Some(P)
        } else {
            None
        }
    }

    /// Adds point `rhs` to `self`.
    fn set_add(&mut self, rhs: &Self) {
        // cost: 10M
        let (x1, z1, u1, t1) = (&self.X, &self.Z, &self.U, &self.T);
        let (x2, z2, u2, t2) = (&rhs.X, &rhs.Z, &rhs.U, &rhs.T);

        let m1 = x1 * x2;
        let m2 = z1 * z2;
        let m3 = u1 * u2;
        let m4 = t1 * t2;
        let m5 = (x1 + z1) * (x2 + z2) - m1 - m2;
        let m6 = (u1 + t1) * (u2 + t2) - m3 - m4;
        let bm2 = m2.mul_small_k1(Self::B1);
        let m7 = m1 + bm2;
        let m8 = m4 * m7;
        let m9 = m3 * (m5.mul_small_k1(2 * Self::B1) + m7.mul2());
        let m10 = (m4 + m3.mul2()) * (m5 + m7);

        self.X = (m10 - m8).mul_small_k1(Self::B1);
        self.Z = m8 - m9;
        self.U = m6 * (bm2 - m1);
        self.T = m8 + m9;
    }

    /// Adds a point in affine coordinates to `self`.
    pub fn set_add_affine(&mut self, rhs: &AffinePoint) {
        // cost: 8M
        let (x1, z1, u1, t1) = (&self.X, &self.Z, &self.U, &self.T);
        let (x2, u2) = (&rhs.x, &rhs.u);

        let m1 = x1 * x2;
        let m3 = u1 * u2;
        let m5 = x1 + x2 * z1;
        let m6 = u1 + u2 * t1;
        let bm2 = z1.mul_small_k1(Self::B1);
        let m7 = m1 + bm2;
        let m8 = t1 * m7;
        let m9 = m3 * (m5.mul_small_k1(2 * Self::B1) + m7.mul2());
        let m10 = (t1 + m3.mul2()) * (m5 + m7);

        self.X = (m10 - m8).mul_small_k1(Self::B1);
        self.U = m6 * (bm2 - m1);
        self.Z = m8 - m9;
        self.T = m8 + m9;
    }

    /// Adds a point in affine coordinates to this point.
    #[inline(always)]
    pub fn add_affine(self, rhs: &AffinePoint) -> Self {
        let mut r = self;
        r.set_add_affine(rhs);
        r
    }

    /// Doubles this point (in place).
    pub fn set_double(&mut self) {
        // cost: 4M+5S
        let (X, Z, U, T) = (&self.X, &self.Z, &self.U, &self.T);

        let t1 = Z * T;
        let t2 = t1 * T;
        let x1 = t2.square();
        let z1 = t1 * U;
        let t3 = U.square();
        let w1 = t2 - (X + Z).mul2() * t3;
        let t4 = z1.square();

        let nZ = w1.square();
        self.X = t4.mul_small_k1(4 * Self::B1);
        self.U = (w1 + z1).square() - (t4 + nZ);
        self.T = x1.mul2() - (t4.mul_small(4) + nZ);
        self.Z = nZ;
    }

    /// Doubles this point.
    #[inline(always)]
    pub fn double(self) -> Self {
        let mut r = self;
        r.set_double();
        r
    }

    /// Doubles this point n times (in place).
    pub fn set_xdouble(&mut self, n: u32) {
        if n == 0 {
            return;
        }
        if n == 1 {
            self.set_double();
            return;
        }

        // First doubling switches to (x,w,z) coordinates; subsequent
        // doublings cost 2M+5S each. At the end, we convert back to
        // (X:Z:U:T). Total cost: n*(2M+5S) + 2M+1S.
        let (X0, Z0, U0, T0) = (&self.X, &self.Z, &self.U, &self.T);

        let t1 = Z0 * T0;
        let t2 = t1 * T0;
        let x1 = t2.square();
        let z1 = t1 * U0;
        let t3 = U0.square();
        let w1 = t2 - (X0 + Z0).mul2() * t3;
        let t4 = w1.square();
        let t5 = z1.square();
        let mut X = t5.square().mul_small_k1(16 * Self::B1);
        let mut W = x1.mul2() - (t5.mul_small(4) + t4);
        let mut Z = (w1 + z1).square() - (t4 + t5);

        for _ in 2..n {
            let t1 = Z.square();
            let t2 = t1.square();
            let t3 = W.square();
            let t4 = t3.square();
            let t5 = (W + Z).square() - (t1 + t3);
            Z = t5 * ((X + t1).mul2() - t3);
            X = (t2 * t4).mul_small_k1(16 * Self::B1);
            W = -(t4 + t2.mul_small_k1(4 * Self::B1) - t2.mul_small(4));
        }

        let t1 = W.square();
        let t2 = Z.square();
        let t3 = (W + Z).square() - (t1 + t2);
        let w1 = t1 - (X + t2).mul2();
        self.X = t3.square().mul_small_k1(Self::B1);
        self.Z = w1.square();
        self.U = t3 * w1;
        self.T = t1.mul2() * (t1 - t2.mul2()) - self.Z;
    }

    /// Doubles this point n times.
    #[inline(always)]
    pub fn xdouble(self, n: u32) -> Self {
        let mut r = self;
        r.set_xdouble(n);
        r
    }

    /// Negates this point (in place).
    #[inline(always)]
    pub fn set_neg(&mut self) {
        self.U.set_neg();
    }

    /// Subtract another point (`rhs`) from this point.
    fn set_sub(&mut self, rhs: &Self) {
        self.set_add(&-rhs);
    }

    /// Compares two points for equality.
    ///
    /// Returned value is 0xFFFFFFFF if the two points are equal,
    /// 0x00000000 otherwise.
    #[inline]
    pub fn equals(self, rhs: Self) -> u32 {
        // Coordinate u = x/y uniquely identifies a group element (the
        // neutral being the only one with u = 0).
        (self.U * rhs.T).equals(rhs.U * self.T)
    }

    /// Tests whether this point is the neutral.
    ///
    /// Returned value is 0xFFFFFFFF for the neutral, 0x00000000
    /// otherwise.
    #[inline(always)]
    pub fn isneutral(self) -> u32 {
        self.U.iszero()
    }

    /// Conditionally copies the provided point (`P`) into `self`.
    ///
    ///  - If `ctl` = 0xFFFFFFFF, then the value of `P` is copied into `self`.
    ///
    ///  - If `ctl` = 0x00000000, then the value of `self` is unchanged.
    ///
    /// `ctl` MUST be equal to 0x00000000 or 0xFFFFFFFF.
    #[inline]
    pub fn set_cond(&mut self, P: &Self, ctl: u32) {
        self.X.set_cond(&P.X, ctl);
        self.Z.set_cond(&P.Z, ctl);
        self.U.set_cond(&P.U, ctl);
        self.T.set_cond(&P.T, ctl);
    }

    /// Returns a point equal to `P0` (if `ctl` = 0x00000000) or `P1` (if
    /// `ctl` = 0xFFFFFFFF).
    ///
    /// Value `ctl` MUST be either 0x00000000 or 0xFFFFFFFF.
    #[inline(always)]
    pub fn select(P0: &Self, P1: &Self, ctl: u32) -> Self {
        let mut P = *P0;
        P.set_cond(P1, ctl);
        P
    }

    /// Conditionally negates this point.
    ///
    /// This point is negated if `ctl` = 0xFFFFFFFF, but kept unchanged
    /// if `ctl` = 0x00000000. `ctl` MUST be equal to 0x00000000 or
    /// 0xFFFFFFFF.
    #[inline]
    pub fn set_condneg(&mut self, ctl: u32) {
        self.U.set_cond(&-self.U, ctl);
    }

    /// Converts points to affine coordinates.
    ///
    /// Point `src[i]` is converted and written into `dst[i]`; `dst`
    /// MUST be at least as long as `src`. A single inversion in GF(p^5)
    /// is used, regardless of the number of points. This function is
    /// meant for public values only (the inversion of a zero
    /// denominator is not reported).
    pub fn batch_to_affine(src: &[Self], dst: &mut [AffinePoint]) {
        // We use a trick due to Montgomery: to compute the inverse of
        // x and of y, a single inversion suffices, with:
        //    1/x = y*(1/(x*y))
        //    1/y = x*(1/(x*y))
        // This extends to the case of inverting n values, with a total
        // cost of 1 inversion and 3*(n-1) multiplications.
        let n = src.len();
        assert!(dst.len() >= n);
        if n == 0 {
            return;
        }
        if n == 1 {
            let P = &src[0];
            let m = (P.Z * P.T).invert();
            dst[0].x = P.X * P.T * m;
            dst[0].u = P.U * P.Z * m;
            return;
        }

        // Compute product of all values to invert, and invert it.
        // We also use the x and u coordinates of the points in the
        // destination slice to keep track of the partial products.
        let mut m = src[0].Z * src[0].T;
        for i in 1..n {
            dst[i].x = m;
            m *= src[i].Z;
            dst[i].u = m;
            m *= src[i].T;
        }
        m.set_invert();

        // Propagate back inverses.
        for i in (1..n).rev() {
            dst[i].u = src[i].U * dst[i].u * m;
            m *= src[i].T;
            dst[i].x = src[i].X * dst[i].x * m;
            m *= src[i].Z;
        }
        dst[0].u = src[0].U * src[0].Z * m;
        m *= src[0].T;
        dst[0].x = src[0].X * m;
    }

    /// Converts points to affine coordinates, returning a new vector.
    #[cfg(feature = "alloc")]
    pub fn batch_to_affine_vec(src: &[Self]) -> Vec<AffinePoint> {
        let mut dst = Vec::with_capacity(src.len());
        dst.resize(src.len(), AffinePoint::NEUTRAL);
        Self::batch_to_affine(src, &mut dst);
        dst
    }

    /// Computes the window of multiples of this point.
    ///
    /// Returned array contains `i*P` at index `i-1`, for `i` = 1 to 16
    /// (where `P` is this point).
    pub fn make_window_affine(self) -> [AffinePoint; 16] {
        let mut tmp = [Self::NEUTRAL; 16];
        tmp[0] = self;
        for i in 1..16 {
            if (i & 1) == 0 {
                tmp[i] = tmp[i - 1] + self;
            } else {
                tmp[i] = tmp[i >> 1].double();
            }
        }
        let mut win = [AffinePoint::NEUTRAL; 16];
        Self::batch_to_affine(&tmp, &mut win);
        win
    }

    /// Multiplies this point by a scalar (in place).
    ///
    /// This operation is constant-time with regard to the point value.
    /// With regard to the scalar, only the top 5-bit digit (bits 315 to
    /// 318, plus a carry) is used with a variable-time lookup; all
    /// other digits are processed in constant-time.
    pub fn set_mul(&mut self, n: &Scalar) {
        // Make a window with affine points.
        let win = self.make_window_affine();

        // 64 digits of 5 bits cover 320 bits, hence the top digit is
        // nonnegative.
        let mut sd = [0i32; 64];
        n.recode_signed(&mut sd, 5);

        *self = AffinePoint::lookup_vartime(&win, sd[63]).to_point();
        for i in (0..63).rev() {
            self.set_xdouble(5);
            self.set_add_affine(&AffinePoint::lookup(&win, sd[i]));
        }
    }

    /// Sets this point by multiplying the conventional generator by the
    /// provided scalar.
    #[inline]
    pub fn set_mulgen(&mut self, n: &Scalar) {
        *self = Self::BASE;
        self.set_mul(n);
    }

    /// Creates a point by multiplying the conventional generator by the
    /// provided scalar.
    #[inline]
    pub fn mulgen(n: &Scalar) -> Self {
        let mut P = Self::NEUTRAL;
        P.set_mulgen(n);
        P
    }
}

// Return 0xFFFFFFFF if x is a non-zero quadratic residue, 0x00000000
// otherwise.
#[inline]
fn legendre_is_one(x: &GFp5) -> u32 {
    let t = (x.legendre() as u32) ^ 1;
    ((t | t.wrapping_neg()) >> 31).wrapping_sub(1)
}

impl_binop!(Point, Point, Add, add, AddAssign, add_assign, set_add);
impl_binop!(Point, Point, Sub, sub, SubAssign, sub_assign, set_sub);
impl_binop!(Point, Scalar, Mul, mul, MulAssign, mul_assign, set_mul);
impl_neg!(Point);

impl Mul<Point> for Scalar {
    type Output = Point;

    #[inline(always)]
    fn mul(self, other: Point) -> Point {
        let mut r = other;
        r.set_mul(&self);
        r
    }
}

impl Mul<&Point> for Scalar {
    type Output = Point;

    #[inline(always)]
    fn mul(self, other: &Point) -> Point {
        let mut r = *other;
        r.set_mul(&self);
        r
    }
}

impl Mul<Point> for &Scalar {
    type Output = Point;

    #[inline(always)]
    fn mul(self, other: Point) -> Point {
        let mut r = other;
        r.set_mul(self);
        r
    }
}

impl Mul<&Point> for &Scalar {
    type Output = Point;

    #[inline(always)]
    fn mul(self, other: &Point) -> Point {
        let mut r = *other;
        r.set_mul(self);
        r
    }
}

impl AffinePoint {

    /// The neutral, in affine (x,u) coordinates.
    pub const NEUTRAL: Self = Self {
        x: GFp5::ZERO,
        u: GFp5::ZERO,
    };

    /// Converts this point into fractional coordinates.
    #[inline(always)]
    pub fn to_point(self) -> Point {
        Point {
            X: self.x,
            Z: GFp5::ONE,
            U: self.u,
            T: GFp5::ONE,
        }
    }

    /// Negates this point (in place).
    #[inline(always)]
    pub fn set_neg(&mut self) {
        self.u.set_neg();
    }

    /// Looks up a point in a window (constant-time).
    ///
    /// `win[i]` MUST contain `(i+1)*P` for some point `P`. The index
    /// `k` is an integer in the `-win.len()..+win.len()` range; this
    /// point is set to `k*P`. If `k` is out of range, then this point
    /// is set to the neutral. The value of `k` is not leaked through
    /// timing-based side channels.
    pub fn set_lookup(&mut self, win: &[Self], k: i32) {
        // Split k into its sign s (0xFFFFFFFF for negative) and
        // absolute value (f).
        let s = (k >> 31) as u32;
        let f = ((k as u32) ^ s).wrapping_sub(s);
        *self = Self::NEUTRAL;
        for i in 0..win.len() {
            // win[i] contains (i+1)*P; we want to keep it if (and only if)
            // i+1 == f.
            // Values a-b and b-a both have their high bit equal to 0 only
            // if a == b.
            let j = (i as u32) + 1;
            let w = !(f.wrapping_sub(j) | j.wrapping_sub(f));
            let w = ((w as i32) >> 31) as u32;

            self.x.set_cond(&win[i].x, w);
            self.u.set_cond(&win[i].u, w);
        }

        // Negate the returned value if needed.
        self.u.set_cond(&-self.u, s);
    }

    /// Looks up a point in a window (constant-time).
    ///
    /// See `set_lookup()` for the requirements on `win` and `k`.
    #[inline]
    pub fn lookup(win: &[Self], k: i32) -> Self {
        let mut P = Self::NEUTRAL;
        P.set_lookup(win, k);
        P
    }

    /// Looks up a point in a window (variable-time).
    ///
    /// This is the same as `lookup()`, except that the index value
    /// MUST be in range, and it is leaked through timing-based side
    /// channels (in particular through memory access patterns).
    pub fn lookup_vartime(win: &[Self], k: i32) -> Self {
        if k == 0 {
            Self::NEUTRAL
        } else if k > 0 {
            win[(k - 1) as usize]
        } else {
            let mut P = win[(-k - 1) as usize];
            P.set_neg();
            P
        }
    }
}

// ========================================================================
