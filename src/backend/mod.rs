//! Architecture-specific implementations of finite fields.
//!
//! This module provides the structures that implement the base field
//! GF(p), with p = 2^64 - 2^32 + 1, and its degree-5 extension
//! GF(p^5) = GF(p)\[z\]/(z^5 - 3). Only a 64-bit implementation exists;
//! it relies on the `u128` type, which the compiler supports on all
//! targets.
//!
//! In general, the following properties apply to both field types:
//!
//!  - An instance encapsulates a field element, always in canonical
//!    form.
//!
//!  - The constant values `Self::ZERO` and `Self::ONE` contain the
//!    elements of value 0 and 1, respectively.
//!
//!  - Usual arithmetic operators can be used on field elements (`+`, `-`,
//!    `*`, `/`, and the compound assignments `+=`, `-=`, `*=` and `/=`).
//!    Division by zero is tolerated, and yields zero (regardless of the
//!    dividend). Operators can use both the raw types, and references
//!    thereof.
//!
//!  - Function `set_square(&mut self)` squares a field element (in place).
//!    Corresponding function `square(self) -> Self` returns the result
//!    as a new instance. Sequences of multiple squarings can be performed
//!    with `set_xsquare(&mut self, n: u32)` (and a corresponding `xsquare()`
//!    to get the result as a new instance).
//!
//!  - Function `set_neg(&mut self)` negates the instance on which it is
//!    applied.
//!
//!  - Function `set_cond(&mut self, a: &Self, ctl: u32)` sets
//!    the instance to the value of the other instance `a` if `ctl` is
//!    equal to 0xFFFFFFFF, or leaves the instance value unmodified if
//!    `ctl` is equal to 0x00000000.
//!
//!  - Function `select(a0: &Self, a1: &Self, ctl: u32) -> Self` returns
//!    a copy of `a0` if `ctl` is 0x00000000, or a copy of `a1` if
//!    `ctl` is 0xFFFFFFFF.
//!
//!  - Function `cswap(a: &mut Self, b: &mut Self, ctl: u32)`
//!    exchanges the contents of `a` and `b` if `ctl` is 0xFFFFFFFF,
//!    or leaves them unmodified if `ctl` is 0x00000000.
//!
//!  - Functions `set_half()` and `set_mul2()` multiply their operand (in
//!    place) by 1/2 or 2, respectively; `set_mul_small(x)` multiplies by
//!    a small 32-bit integer provided at runtime. Corresponding functions
//!    `half()`, `mul2()` and `mul_small()` return a new instance.
//!
//!  - `GFp5` also provides `set_mul_small_k1(k)` (multiplication by
//!    `k*z`), `set_mul_gfp(x)` (multiplication by a base field element),
//!    and the Frobenius automorphism (`frobenius()` and `frobenius2()`).
//!
//!  - Constant values can be defined with the const-qualified `w64()`
//!    (for `GFp`) and `w64le()` (for `GFp5`, with five coefficients)
//!    functions. Each 64-bit value is implicitly reduced modulo p. The
//!    non-const functions `from_u64()` and `from_w64le()` yield the same
//!    output in constant-time.
//!
//!  - Function `equals(self, rhs: Self) -> u32` returns 0xFFFFFFFF
//!    if `self` and `rhs` represent the same value, or 0x00000000
//!    otherwise. Function `iszero(self) -> u32` is a specialized
//!    subcase that compares `self` with zero.
//!
//!  - The `legendre(self) -> i32` function returns the Legendre symbol
//!    for an element (0 for zero, +1 for non-zero squares, -1 for
//!    non-squares). In `GFp5`, it is computed through the norm into
//!    `GFp`.
//!
//!  - The `set_sqrt(&mut self) -> u32` function computes the square root
//!    of an element. On success, 0xFFFFFFFF is returned. On failure (input
//!    is not a square), the element is set to zero, and 0x00000000 is
//!    returned. In `GFp`, the returned root is the one whose integer
//!    representation is even. In `GFp5`, `canonical_sqrt()` returns the
//!    root whose first non-zero coefficient is odd. The non-in-place
//!    variant of this function is `sqrt(self) -> (Self, u32)`.
//!
//!  - Function `encode(self)` encodes an element as exactly 8 (`GFp`) or
//!    40 (`GFp5`) bytes. Unsigned little-endian convention is used, and
//!    encoding is always canonical.
//!
//!  - Functions `decode8()` and `decode40()` decode some bytes. If the
//!    source slice does not have the exact encoding length, or if any
//!    value is not canonical, then decoding fails. On success, the
//!    decoded value and 0xFFFFFFFF are returned; on failure, zero and
//!    0x00000000 are returned. Function `decode()` returns an `Option`
//!    instead.

pub mod w64;

/// Finite field: integers modulo p = 2^64 - 2^32 + 1.
pub type GFp = w64::GFp;

/// Finite field: GF(p^5), defined as GF(p)\[z\]/(z^5 - 3).
pub type GFp5 = w64::GFp5;

/// Signed 161-bit integer (variable-time).
pub type Signed161 = w64::Signed161;

/// Signed 640-bit integer (variable-time).
pub type Signed640 = w64::Signed640;
