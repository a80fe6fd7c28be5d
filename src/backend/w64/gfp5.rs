use super::gfp::GFp;
use rand_core::{CryptoRng, RngCore};

/// Element of GF(p^5), with p = 2^64 - 2^32 + 1.
///
/// The extension is GF(p)[z]/(z^5 - 3); an element is the polynomial
/// `a0 + a1*z + a2*z^2 + a3*z^3 + a4*z^4`, stored as its five
/// coefficients in ascending degree order.
#[derive(Clone, Copy, Debug)]
pub struct GFp5([GFp; 5]);

impl GFp5 {

    // Element encoding length (in bytes).
    pub const ENC_LEN: usize = 40;

    pub const ZERO: GFp5 = GFp5([GFp::ZERO; 5]);
    pub const ONE: GFp5 = GFp5([GFp::ONE, GFp::ZERO, GFp::ZERO, GFp::ZERO, GFp::ZERO]);
    pub const TWO: GFp5 = GFp5([GFp::TWO, GFp::ZERO, GFp::ZERO, GFp::ZERO, GFp::ZERO]);

    // Frobenius: (a_i z^i)^p = a_i*(z^(p-1))^i*z^i, and z^(p-1) = 3^((p-1)/5)
    // is a primitive 5th root of unity (ROOT5). FROB1[i] = ROOT5^i,
    // FROB2[i] = ROOT5^(2*i).
    const FROB1: [GFp; 5] = [
        GFp::w64(1),
        GFp::w64(1041288259238279555),
        GFp::w64(15820824984080659046),
        GFp::w64(211587555138949697),
        GFp::w64(1373043270956696022),
    ];
    const FROB2: [GFp; 5] = [
        GFp::w64(1),
        GFp::w64(15820824984080659046),
        GFp::w64(1373043270956696022),
        GFp::w64(1041288259238279555),
        GFp::w64(211587555138949697),
    ];

    // Create an element from its five coefficients, given as 64-bit
    // integers (each implicitly reduced modulo p).
    pub const fn w64le(x: [u64; 5]) -> Self {
        Self([
            GFp::w64(x[0]),
            GFp::w64(x[1]),
            GFp::w64(x[2]),
            GFp::w64(x[3]),
            GFp::w64(x[4]),
        ])
    }

    // Same as w64le(), but constant-time.
    pub fn from_w64le(x: [u64; 5]) -> Self {
        Self([
            GFp::from_u64(x[0]),
            GFp::from_u64(x[1]),
            GFp::from_u64(x[2]),
            GFp::from_u64(x[3]),
            GFp::from_u64(x[4]),
        ])
    }

    // Get the five coefficients, as integers in the 0 to p-1 range.
    pub fn to_w64le(self) -> [u64; 5] {
        [
            self.0[0].to_u64(),
            self.0[1].to_u64(),
            self.0[2].to_u64(),
            self.0[3].to_u64(),
            self.0[4].to_u64(),
        ]
    }

    // Embed a base field element.
    #[inline(always)]
    pub fn from_gfp(x: GFp) -> Self {
        Self([x, GFp::ZERO, GFp::ZERO, GFp::ZERO, GFp::ZERO])
    }

    #[inline(always)]
    pub fn from_u64(x: u64) -> Self {
        Self::from_gfp(GFp::from_u64(x))
    }

    #[inline(always)]
    pub fn from_coeffs(c: [GFp; 5]) -> Self {
        Self(c)
    }

    // Get the coefficients as base field elements.
    #[inline(always)]
    pub fn coeffs(self) -> [GFp; 5] {
        self.0
    }

    #[inline]
    fn set_add(&mut self, rhs: &Self) {
        for i in 0..5 {
            self.0[i] += rhs.0[i];
        }
    }

    #[inline]
    fn set_sub(&mut self, rhs: &Self) {
        for i in 0..5 {
            self.0[i] -= rhs.0[i];
        }
    }

    // Negate this value (in place).
    #[inline]
    pub fn set_neg(&mut self) {
        for i in 0..5 {
            self.0[i].set_neg();
        }
    }

    #[inline]
    fn set_mul(&mut self, rhs: &Self) {
        let (a0, a1, a2, a3, a4) = (self.0[0], self.0[1], self.0[2], self.0[3], self.0[4]);
        let (b0, b1, b2, b3, b4) = (rhs.0[0], rhs.0[1], rhs.0[2], rhs.0[3], rhs.0[4]);

        // z^5 = 3: products whose degree reaches 5 or more wrap around
        // with a factor 3.
        let c0 = a0 * b0 + (a1 * b4 + a2 * b3 + a3 * b2 + a4 * b1).mul_small(3);
        let c1 = a0 * b1 + a1 * b0 + (a2 * b4 + a3 * b3 + a4 * b2).mul_small(3);
        let c2 = a0 * b2 + a1 * b1 + a2 * b0 + (a3 * b4 + a4 * b3).mul_small(3);
        let c3 = a0 * b3 + a1 * b2 + a2 * b1 + a3 * b0 + (a4 * b4).mul_small(3);
        let c4 = a0 * b4 + a1 * b3 + a2 * b2 + a3 * b1 + a4 * b0;

        self.0 = [c0, c1, c2, c3, c4];
    }

    // Square this value (in place).
    #[inline]
    pub fn set_square(&mut self) {
        let (a0, a1, a2, a3, a4) = (self.0[0], self.0[1], self.0[2], self.0[3], self.0[4]);
        let d0 = a0.mul2();
        let d1 = a1.mul2();

        let c0 = a0.square() + (a1 * a4 + a2 * a3).mul_small(6);
        let c1 = d0 * a1 + (a2 * a4).mul_small(6) + a3.square().mul_small(3);
        let c2 = d0 * a2 + a1.square() + (a3 * a4).mul_small(6);
        let c3 = d0 * a3 + d1 * a2 + a4.square().mul_small(3);
        let c4 = d0 * a4 + d1 * a3 + a2.square();

        self.0 = [c0, c1, c2, c3, c4];
    }

    #[inline(always)]
    pub fn square(self) -> Self {
        let mut r = self;
        r.set_square();
        r
    }

    // Square this value n times (in place).
    pub fn set_xsquare(&mut self, n: u32) {
        for _ in 0..n {
            self.set_square();
        }
    }

    #[inline(always)]
    pub fn xsquare(self, n: u32) -> Self {
        let mut r = self;
        r.set_xsquare(n);
        r
    }

    // Multiply this value by 2 (in place).
    #[inline]
    pub fn set_mul2(&mut self) {
        for i in 0..5 {
            self.0[i].set_mul2();
        }
    }

    #[inline(always)]
    pub fn mul2(self) -> Self {
        let mut r = self;
        r.set_mul2();
        r
    }

    // Divide this value by 2 (in place).
    #[inline]
    pub fn set_half(&mut self) {
        for i in 0..5 {
            self.0[i].set_half();
        }
    }

    #[inline(always)]
    pub fn half(self) -> Self {
        let mut r = self;
        r.set_half();
        r
    }

    // Multiply this value by a small integer (in place).
    #[inline]
    pub fn set_mul_small(&mut self, x: u32) {
        for i in 0..5 {
            self.0[i].set_mul_small(x);
        }
    }

    #[inline(always)]
    pub fn mul_small(self, x: u32) -> Self {
        let mut r = self;
        r.set_mul_small(x);
        r
    }

    // Multiply this value by 3 (in place).
    #[inline(always)]
    pub fn set_mul3(&mut self) {
        self.set_mul_small(3);
    }

    #[inline(always)]
    pub fn mul3(self) -> Self {
        self.mul_small(3)
    }

    // Multiply this value by k*z, for a small integer k (in place).
    // Curve constants of the form k*z make this much cheaper than a
    // generic multiplication.
    #[inline]
    pub fn set_mul_small_k1(&mut self, k: u32) {
        let (a0, a1, a2, a3, a4) = (self.0[0], self.0[1], self.0[2], self.0[3], self.0[4]);
        self.0 = [
            a4.mul_small(3 * k),
            a0.mul_small(k),
            a1.mul_small(k),
            a2.mul_small(k),
            a3.mul_small(k),
        ];
    }

    #[inline(always)]
    pub fn mul_small_k1(self, k: u32) -> Self {
        let mut r = self;
        r.set_mul_small_k1(k);
        r
    }

    // Multiply this value by a base field element (in place).
    #[inline]
    pub fn set_mul_gfp(&mut self, x: &GFp) {
        for i in 0..5 {
            self.0[i] *= x;
        }
    }

    #[inline(always)]
    pub fn mul_gfp(self, x: &GFp) -> Self {
        let mut r = self;
        r.set_mul_gfp(x);
        r
    }

    // Frobenius automorphism: return self^p.
    #[inline]
    pub fn frobenius(self) -> Self {
        let mut r = self;
        for i in 1..5 {
            r.0[i] *= Self::FROB1[i];
        }
        r
    }

    // Apply the Frobenius automorphism twice: return self^(p^2).
    #[inline]
    pub fn frobenius2(self) -> Self {
        let mut r = self;
        for i in 1..5 {
            r.0[i] *= Self::FROB2[i];
        }
        r
    }

    // For the value x = self, compute f = x^(r-1) with
    // r = 1 + p + p^2 + p^3 + p^4; then x*f = x^r is the norm of x,
    // which is in GF(p), and its value is returned as well.
    fn norm_cofactor(self) -> (Self, GFp) {
        let x = self;
        let d = x.frobenius();
        let e = d * d.frobenius();
        let f = e * e.frobenius2();

        // Only the constant coefficient of x*f must be computed.
        let g = x.0[0] * f.0[0]
            + (x.0[1] * f.0[4] + x.0[2] * f.0[3]
            + x.0[3] * f.0[2] + x.0[4] * f.0[1]).mul_small(3);
        (f, g)
    }

    // Invert this value (in place); zero is "inverted" into zero.
    pub fn set_invert(&mut self) {
        // 1/x = x^(r-1)/x^r, with x^r in the base field.
        let (f, g) = self.norm_cofactor();
        *self = f.mul_gfp(&g.invert());
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
        // x is a square in GF(p^5) if and only if its norm is a square
        // in GF(p) (the degree of the extension is odd).
        let (_, g) = self.norm_cofactor();
        g.legendre()
    }

    // Set this value to one of its square roots. Returned value is
    // 0xFFFFFFFF on success, 0 if the value is not a quadratic residue
    // (in which case this element is set to zero).
    pub fn set_sqrt(&mut self) -> u32 {
        // With v = x^(2^31) and d = x^(2^63 - 2^31 + 1), the value
        // e = d^(p + p^3) satisfies x*e^2 = g, with g in GF(p). The root
        // is then sqrt(g)/e.
        let x = *self;
        let v = x.xsquare(31);
        let d = x * v.xsquare(32) * v.invert();
        let e = (d * d.frobenius2()).frobenius();
        let f = e.square();
        let g = x.0[0] * f.0[0]
            + (x.0[1] * f.0[4] + x.0[2] * f.0[3]
            + x.0[3] * f.0[2] + x.0[4] * f.0[1]).mul_small(3);
        let (s, r) = g.sqrt();
        let mut y = e.invert().mul_gfp(&s);
        let ok = r & y.square().equals(x);
        y.set_cond(&Self::ZERO, !ok);
        *self = y;
        ok
    }

    #[inline(always)]
    pub fn sqrt(self) -> (Self, u32) {
        let mut x = self;
        let r = x.set_sqrt();
        (x, r)
    }

    // Return 0xFFFFFFFF if the first non-zero coefficient of this value
    // is even, 0 otherwise (including when the value is zero).
    #[inline]
    fn sgn0(self) -> u32 {
        let mut sign = 0u32;
        let mut zero = 0xFFFFFFFFu32;
        for i in 0..5 {
            let c = self.0[i];
            let nz = !c.iszero();
            let even = ((c.to_u64() & 1) as u32).wrapping_sub(1);
            sign |= zero & nz & even;
            zero &= !nz;
        }
        sign
    }

    // Compute the canonical square root of this value: among the two
    // roots, the one whose first non-zero coefficient is odd. Returned
    // values are as for sqrt().
    // This is not the same as testing only the parity of coefficient 0:
    // the two rules differ when coefficient 0 is zero. Point decoding
    // does not depend on which root is returned.
    pub fn canonical_sqrt(self) -> (Self, u32) {
        let (mut y, r) = self.sqrt();
        let neg = -y;
        y.set_cond(&neg, y.sgn0());
        (y, r)
    }

    // Conditionally copy the provided value ('a') into self:
    //  - If ctl == 0xFFFFFFFF, then the value of 'a' is copied into self.
    //  - If ctl == 0, then the value of self is unchanged.
    // ctl MUST be equal to 0 or 0xFFFFFFFF.
    #[inline]
    pub fn set_cond(&mut self, a: &Self, ctl: u32) {
        for i in 0..5 {
            self.0[i].set_cond(&a.0[i], ctl);
        }
    }

    // Return a value equal to either a0 (if ctl == 0) or a1 (if
    // ctl == 0xFFFFFFFF). Value ctl MUST be either 0 or 0xFFFFFFFF.
    #[inline(always)]
    pub fn select(a0: &Self, a1: &Self, ctl: u32) -> Self {
        let mut r = *a0;
        r.set_cond(a1, ctl);
        r
    }

    // Conditionally swap two elements (if ctl == 0xFFFFFFFF).
    #[inline]
    pub fn cswap(a: &mut Self, b: &mut Self, ctl: u32) {
        for i in 0..5 {
            GFp::cswap(&mut a.0[i], &mut b.0[i], ctl);
        }
    }

    // Equality check between two field elements (constant-time);
    // returned value is 0xFFFFFFFF on equality, 0 otherwise.
    #[inline]
    pub fn equals(self, rhs: Self) -> u32 {
        self.0[0].equals(rhs.0[0])
            & self.0[1].equals(rhs.0[1])
            & self.0[2].equals(rhs.0[2])
            & self.0[3].equals(rhs.0[3])
            & self.0[4].equals(rhs.0[4])
    }

    // Compare this value with zero (constant-time); returned value
    // is 0xFFFFFFFF if this element is zero, 0 otherwise.
    #[inline]
    pub fn iszero(self) -> u32 {
        self.0[0].iszero()
            & self.0[1].iszero()
            & self.0[2].iszero()
            & self.0[3].iszero()
            & self.0[4].iszero()
    }

    // Encode this value over exactly 40 bytes: each coefficient is
    // encoded over 8 bytes (canonical, little-endian), lowest degree
    // first.
    pub fn encode(self) -> [u8; 40] {
        let mut d = [0u8; 40];
        for i in 0..5 {
            d[(8 * i)..(8 * i + 8)].copy_from_slice(&self.0[i].encode());
        }
        d
    }

    // Decode the element from the provided bytes. If the source slice
    // does not have length exactly 40 bytes, or if any coefficient is
    // not canonical, then this element is set to zero and 0 is returned.
    // Otherwise, 0xFFFFFFFF is returned.
    pub fn set_decode40(&mut self, buf: &[u8]) -> u32 {
        if buf.len() != 40 {
            *self = Self::ZERO;
            return 0;
        }
        let mut cc = 0xFFFFFFFFu32;
        for i in 0..5 {
            let (x, c) = GFp::decode8(&buf[(8 * i)..(8 * i + 8)]);
            self.0[i] = x;
            cc &= c;
        }
        let z = Self::ZERO;
        self.set_cond(&z, !cc);
        cc
    }

    // Decode an element from 40 bytes; returns (value, 0xFFFFFFFF) on
    // success, (0, 0) on failure.
    #[inline(always)]
    pub fn decode40(buf: &[u8]) -> (Self, u32) {
        let mut r = Self::ZERO;
        let cc = r.set_decode40(buf);
        (r, cc)
    }

    // Decode an element from 40 bytes; `None` is returned on failure.
    #[inline(always)]
    pub fn decode(buf: &[u8]) -> Option<Self> {
        let (r, cc) = Self::decode40(buf);
        if cc != 0 {
            Some(r)
        } else {
            None
        }
    }

    // Get a uniformly random element.
    pub fn random<T: CryptoRng + RngCore>(rng: &mut T) -> Self {
        Self([
            GFp::random(rng),
            GFp::random(rng),
            GFp::random(rng),
            GFp::random(rng),
            GFp::random(rng),
        ])
    }
}

impl_binop!(GFp5, GFp5, Add, add, AddAssign, add_assign, set_add);
impl_binop!(GFp5, GFp5, Sub, sub, SubAssign, sub_assign, set_sub);
impl_binop!(GFp5, GFp5, Mul, mul, MulAssign, mul_assign, set_mul);
impl_binop!(GFp5, GFp5, Div, div, DivAssign, div_assign, set_div);
impl_neg!(GFp5);

// ========================================================================
