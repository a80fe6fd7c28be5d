//! Finite fields.
//!
//! This module exposes the base field GF(p) (p = 2^64 - 2^32 + 1) and
//! its degree-5 extension GF(p^5) over which the ECgFp5 curve is
//! defined. These are the backend-provided `GFp` and `GFp5` types.

pub use crate::backend::{GFp, GFp5};
