//! Short Weierstrass representation of ECgFp5 group elements.
//!
//! The curve `y^2 = x*(x^2 + a*x + b)` is isomorphic to the short
//! Weierstrass curve `Y^2 = X^3 + A*X + B'`, through `X = x + a/3`
//! and `Y = y`, with `A = (3*b - a^2)/3`. Points are represented here
//! in plain affine coordinates, with an explicit flag for the point at
//! infinity (which stands for the group neutral). All operations use
//! field divisions and are variable-time; this representation is used
//! for public computations only, mainly the dual multiplication of
//! signature verification. Group elements use the same encoding as
//! with `Point`: for a non-neutral element, `w = Y/(a/3 - X)`; the
//! neutral encodes as zero.

#![allow(non_snake_case)]

use super::field::GFp5;
use super::scalar::Scalar;
use super::ecgfp5::Point;

#[cfg(feature = "alloc")]
use super::Vec;

/// A group element in short Weierstrass affine coordinates.
#[derive(Clone, Copy, Debug)]
pub struct WeierstrassPoint {
    X: GFp5,
    Y: GFp5,
    inf: bool,
}

impl WeierstrassPoint {

    /// The group neutral (point at infinity).
    pub const NEUTRAL: Self = Self {
        X: GFp5::ZERO,
        Y: GFp5::ZERO,
        inf: true,
    };

    /// The conventional base point, in Weierstrass coordinates.
    pub const BASE: Self = Self {
        X: GFp5::w64le([
            11712523173042564207,
            14090224426659529053,
            13197813503519687414,
            16280770174934269299,
            15998333998318935536,
        ]),
        Y: GFp5::w64le([
            14639054205878357578,
            17426078571020221072,
            2548978194165003307,
            8663895577921260088,
            9793640284382595140,
        ]),
        inf: false,
    };

    /// The Weierstrass curve `A` constant: `(3*b - a^2)/3`.
    pub const A: GFp5 = GFp5::w64le([6148914689804861439, 263, 0, 0, 0]);

    // a/3, with a being the curve constant of the fractional
    // representation.
    const A_DIV3: GFp5 = GFp5::w64le([6148914689804861441, 0, 0, 0, 0]);

    /// Returns the affine coordinates `(X, Y)` of this point, or
    /// `None` for the point at infinity.
    #[inline]
    pub fn coordinates(self) -> Option<(GFp5, GFp5)> {
        if self.inf {
            None
        } else {
            Some((self.X, self.Y))
        }
    }

    /// Tests whether this point is the neutral (point at infinity).
    #[inline(always)]
    pub fn isneutral(self) -> bool {
        self.inf
    }

    /// Compares two points for equality.
    pub fn equals(self, rhs: Self) -> bool {
        if self.inf || rhs.inf {
            return self.inf && rhs.inf;
        }
        self.X.equals(rhs.X) == 0xFFFFFFFF && self.Y.equals(rhs.Y) == 0xFFFFFFFF
    }

    /// Encodes this point into a field element (zero for the neutral).
    pub fn encode(self) -> GFp5 {
        if self.inf {
            return GFp5::ZERO;
        }
        self.Y / (Self::A_DIV3 - self.X)
    }

    /// Decodes a point from its encoding.
    ///
    /// This function returns `None` if `w` is not the encoding of a
    /// group element. Decoding is variable-time.
    pub fn decode(w: &GFp5) -> Option<Self> {
        // Same equation as for Point decoding, but here we keep the
        // root x which is a square, and set y = -w*x; encode() maps
        // the result back to w.
        let e = w.square() - Point::A;
        let delta = e.square() - Point::B_MUL4;
        let (r, c) = delta.canonical_sqrt();
        if c == 0 {
            if w.iszero() == 0xFFFFFFFF {
                return Some(Self::NEUTRAL);
            }
            return None;
        }

        let x1 = (e + r).half();
        let x2 = (e - r).half();
        let x = if x1.legendre() == 1 { x1 } else { x2 };
        Some(Self {
            X: x + Self::A_DIV3,
            Y: -(w * x),
            inf: false,
        })
    }

    /// Converts a group element into Weierstrass coordinates.
    pub fn from_point(P: &Point) -> Self {
        // Encodings of group elements always decode.
        match Self::decode(&P.encode()) {
            Some(Q) => Q,
            None => Self::NEUTRAL,
        }
    }

    /// Converts this point into the fractional representation.
    pub fn to_point(self) -> Point {
        match Point::decode(&self.encode()) {
            Some(P) => P,
            None => Point::NEUTRAL,
        }
    }

    /// Adds point `rhs` to `self`.
    fn set_add(&mut self, rhs: &Self) {
        if self.inf {
            *self = *rhs;
            return;
        }
        if rhs.inf {
            return;
        }

        let (x1, y1) = (self.X, self.Y);
        let (x2, y2) = (rhs.X, rhs.Y);

        let same_x = x1.equals(x2) == 0xFFFFFFFF;
        if same_x && y1.equals(y2) == 0 {
            // y2 = -y1: the sum is the point at infinity.
            *self = Self::NEUTRAL;
            return;
        }
        let (num, den) = if same_x {
            (x1.square().mul3() + Self::A, y1.mul2())
        } else {
            (y2 - y1, x2 - x1)
        };
        assert!(den.iszero() == 0, "point of order 2 in Weierstrass addition");
        let lambda = num / den;

        let x3 = lambda.square() - x1 - x2;
        let y3 = lambda * (x1 - x3) - y1;
        self.X = x3;
        self.Y = y3;
    }

    /// Doubles this point (in place).
    pub fn set_double(&mut self) {
        if self.inf {
            return;
        }
        let (x, y) = (self.X, self.Y);
        let den = y.mul2();
        assert!(den.iszero() == 0, "point of order 2 in Weierstrass doubling");
        let lambda = (x.square().mul3() + Self::A) / den;
        let x2 = lambda.square() - x.mul2();
        self.Y = lambda * (x - x2) - y;
        self.X = x2;
    }

    /// Doubles this point.
    #[inline(always)]
    pub fn double(self) -> Self {
        let mut r = self;
        r.set_double();
        r
    }

    /// Negates this point (in place).
    #[inline(always)]
    pub fn set_neg(&mut self) {
        self.Y.set_neg();
    }

    fn set_sub(&mut self, rhs: &Self) {
        self.set_add(&-rhs);
    }

    /// Fills a window with the multiples of this point.
    ///
    /// On output, `win[i]` contains `i*P` (with `P` being this point),
    /// starting with the neutral at index 0. The window MUST have at
    /// least 4 entries (i.e. a window width of at least 2 bits).
    pub fn fill_window(self, win: &mut [Self]) {
        assert!(win.len() >= 4, "window must have at least 2 bits");
        win[0] = Self::NEUTRAL;
        win[1] = self;
        win[2] = self.double();
        for i in 3..win.len() {
            win[i] = self + win[i - 1];
        }
    }

    /// Computes the window of multiples `i*P` for `i` = 0 to
    /// `2^bits - 1`, with `P` being this point. The window width
    /// (`bits`) MUST be at least 2.
    #[cfg(feature = "alloc")]
    pub fn precompute_window(self, bits: u32) -> Vec<Self> {
        assert!(bits >= 2 && bits < 32, "invalid window width");
        let mut win = Vec::with_capacity(1usize << bits);
        win.resize(1usize << bits, Self::NEUTRAL);
        self.fill_window(&mut win);
        win
    }

    /// Computes `sa*A + sb*B` (variable-time).
    ///
    /// Both scalars are split into 4-bit digits and processed with
    /// Straus's interleaving over 16-entry windows. This function is
    /// meant for public inputs only (e.g. signature verification).
    pub fn mul_add2_vartime(A: &Self, B: &Self, sa: &Scalar, sb: &Scalar)
        -> Self
    {
        let mut wa = [Self::NEUTRAL; 16];
        A.fill_window(&mut wa);
        let mut wb = [Self::NEUTRAL; 16];
        B.fill_window(&mut wb);
        let da = sa.split_to_4bit_limbs();
        let db = sb.split_to_4bit_limbs();

        let mut R = wa[da[79] as usize] + wb[db[79] as usize];
        for i in (0..79).rev() {
            for _ in 0..4 {
                R.set_double();
            }
            R += wa[da[i] as usize] + wb[db[i] as usize];
        }
        R
    }
}

impl_binop!(WeierstrassPoint, WeierstrassPoint, Add, add, AddAssign, add_assign, set_add);
impl_binop!(WeierstrassPoint, WeierstrassPoint, Sub, sub, SubAssign, sub_assign, set_sub);
impl_neg!(WeierstrassPoint);

// ========================================================================
