//! Ecgfp5 is a Rust implementation of the ECgFp5 elliptic curve.
//!
//! ECgFp5 is a prime-order group built over an elliptic curve defined
//! over GF(p^5), where p = 2^64 - 2^32 + 1 is the "Goldilocks" prime and
//! the extension is GF(p)\[z\]/(z^5 - 3). The group order `n` is a
//! prime integer slightly below 2^319. The curve is meant to be used in
//! systems where computations over the Goldilocks field are cheap (e.g.
//! in STARK-friendly circuits); a group element is compressed into a
//! single GF(p^5) element, and the challenge of a Schnorr signature
//! is obtained by hashing base field elements into GF(p^5).
//!
//! The base field and its extension are implemented in `backend` (and
//! re-exported by `field`). Scalars (integers modulo `n`) are defined in
//! `scalar`. Group elements are implemented in `ecgfp5` with
//! complete formulas over fractional (X:Z:U:T) coordinates; the short
//! Weierstrass representation in `weierstrass` is used for the
//! variable-time dual multiplication of signature verification. The
//! `hash` module defines the hash-to-extension interface, and the
//! `schnorr` module implements the signature scheme itself.
//!
//! # Usage
//!
//! The library is `no_std`. By default, it compiles against the
//! standard library, which only enables `std::error::Error` on the
//! signature error type; the `alloc` feature enables a few functions
//! that return vectors. All other functionality is available without
//! any of these features.
//!
//! # Conventions
//!
//! All implemented functions should be strictly constant-time, unless
//! explicitly documented otherwise (non-constant-time functions normally
//! have "vartime" in their name). In order to avoid unwanted side-channel
//! leaks, Booleans are avoided (compilers tend to "optimize" things a bit
//! too eagerly when handling `bool` values). All functions that return or
//! use a potentially secret Boolean value use the `u32` type; the convention
//! is that 0xFFFFFFFF means "true", and 0x00000000 means "false". No other
//! value shall be used, for they would lead to unpredictable results.
//! Similarly, the `Eq` or `PartialEq` traits are not implemented on
//! field elements, scalars and points.
//!
//! Algebraic operations on field elements, scalars and curve points are
//! performed with the usual operators (e.g. `+`); appropriate traits are
//! defined so that structure types and pointers to structure types can
//! be used more or less interchangeably. Throughout the code, functions
//! that modify the object on which they are called tend to have a name in
//! `set_*()` (e.g. for a curve point `P`, if we want to compute the
//! double of that point, then `P.set_double()` modifies the point
//! structure in place, while `P.double()` leaves `P` unmodified and
//! returns the double as a new structure instance).
//!
//! No inline assembly is used. On x86-64 architectures, the
//! `_addcarry_u64()` and `_subborrow_u64()` intrinsics are used
//! (from `core::arch::x86_64`); however, plain implementations with
//! no intrinsics are available (and used on other architectures).

#![no_std]

#[cfg(all(feature = "alloc", not(feature = "std")))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(all(feature = "alloc", not(feature = "std")))]
pub(crate) use alloc::vec::Vec;

#[cfg(feature = "std")]
pub(crate) use std::vec::Vec;

pub use rand_core::{CryptoRng, RngCore, Error as RngError};

// Implement a binary operator trait (and the compound assignment trait)
// for all combinations of values and references, on top of an in-place
// function `$set(&mut self, rhs: &$rhs)`.
macro_rules! impl_binop {
    ($typename:ident, $rhs:ident, $tr:ident, $fname:ident,
     $atr:ident, $afname:ident, $set:ident) => {

        impl core::ops::$tr<$rhs> for $typename {
            type Output = $typename;

            #[inline(always)]
            fn $fname(self, other: $rhs) -> $typename {
                let mut r = self;
                r.$set(&other);
                r
            }
        }

        impl core::ops::$tr<&$rhs> for $typename {
            type Output = $typename;

            #[inline(always)]
            fn $fname(self, other: &$rhs) -> $typename {
                let mut r = self;
                r.$set(other);
                r
            }
        }

        impl core::ops::$tr<$rhs> for &$typename {
            type Output = $typename;

            #[inline(always)]
            fn $fname(self, other: $rhs) -> $typename {
                let mut r = *self;
                r.$set(&other);
                r
            }
        }

        impl core::ops::$tr<&$rhs> for &$typename {
            type Output = $typename;

            #[inline(always)]
            fn $fname(self, other: &$rhs) -> $typename {
                let mut r = *self;
                r.$set(other);
                r
            }
        }

        impl core::ops::$atr<$rhs> for $typename {
            #[inline(always)]
            fn $afname(&mut self, other: $rhs) {
                self.$set(&other);
            }
        }

        impl core::ops::$atr<&$rhs> for $typename {
            #[inline(always)]
            fn $afname(&mut self, other: &$rhs) {
                self.$set(other);
            }
        }
    }
}

// Implement the Neg trait (on values and references) on top of an
// in-place `set_neg(&mut self)` function.
macro_rules! impl_neg {
    ($typename:ident) => {

        impl core::ops::Neg for $typename {
            type Output = $typename;

            #[inline(always)]
            fn neg(self) -> $typename {
                let mut r = self;
                r.set_neg();
                r
            }
        }

        impl core::ops::Neg for &$typename {
            type Output = $typename;

            #[inline(always)]
            fn neg(self) -> $typename {
                let mut r = *self;
                r.set_neg();
                r
            }
        }
    }
}

pub mod backend;
pub mod field;
pub mod scalar;
pub mod ecgfp5;
pub mod weierstrass;
pub mod hash;
pub mod schnorr;
