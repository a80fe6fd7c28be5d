//! Schnorr signatures over ECgFp5.
//!
//! The signed message is not raw data but a GF(p^5) element, normally
//! the output of a hash function over the actual message (as is done in
//! circuit-oriented systems, where the message is itself a sequence of
//! base field elements). The signature process is the following:
//!
//!  - A per-signature secret scalar `k` is chosen; the commitment is
//!    `r = encode(k*G)` (a GF(p^5) element).
//!  - The challenge is `e = H(r || m)`, where `H` hashes the ten base
//!    field coefficients of `r` and `m` into GF(p^5); the result is
//!    converted into a scalar (as a 320-bit integer, reduced modulo `n`).
//!  - The response is `s = k - e*sk`.
//!
//! The signature is the pair `(s, e)`, encoded over 80 bytes (`s` then
//! `e`, each over 40 bytes in unsigned little-endian convention). To
//! verify, the public key is decoded into a Weierstrass point `Q`, and
//! `r_v = encode(s*G + e*Q)` is computed; the signature is accepted if
//! `H(r_v || m)` yields `e` again.
//!
//! The hash function `H` is provided by the caller through the
//! `HashToExtension` trait; `Shake256Hash` is a ready-made choice.
//! Signatures are only interoperable between systems that use the same
//! function.

#![allow(non_snake_case)]

use core::fmt;
use super::ecgfp5::Point;
use super::field::{GFp, GFp5};
use super::hash::HashToExtension;
use super::scalar::Scalar;
use super::weierstrass::WeierstrassPoint;
use super::{CryptoRng, RngCore};

/// A Schnorr private key.
///
/// Such a key wraps around a secret non-zero scalar. It also contains
/// a copy of the public key.
#[derive(Clone, Copy, Debug)]
pub struct PrivateKey {
    sec: Scalar,                // secret scalar
    pub public_key: PublicKey,  // public key
}

/// A Schnorr public key.
///
/// It wraps around a group element, but also includes a copy of the
/// encoded point (a GF(p^5) element). The point and its encoded version
/// can be accessed directly; if modified, then the two values MUST match.
#[derive(Clone, Copy, Debug)]
pub struct PublicKey {
    pub point: Point,
    pub encoded: GFp5,
}

/// A Schnorr signature.
#[derive(Clone, Copy, Debug)]
pub struct Signature {
    pub s: Scalar,
    pub e: Scalar,
}

/// Error type for signature validation over encoded values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureError {
    /// The public key is not a canonical encoding of a GF(p^5) element,
    /// or that element does not encode a group element.
    InvalidPublicKey,
    /// The hashed message is not a canonical encoding of a GF(p^5)
    /// element.
    InvalidMessage,
    /// The signature does not have length exactly 80 bytes.
    InvalidSignatureLength,
    /// One of the two signature halves is not a canonical scalar.
    InvalidScalar,
    /// The signature is well-formed but does not verify.
    VerificationFailed,
}

impl fmt::Display for SignatureError {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureError::InvalidPublicKey =>
                f.write_str("invalid public key encoding"),
            SignatureError::InvalidMessage =>
                f.write_str("invalid hashed message encoding"),
            SignatureError::InvalidSignatureLength =>
                write!(f, "signature length should be {} bytes",
                    Signature::ENC_LEN),
            SignatureError::InvalidScalar =>
                f.write_str("non-canonical scalar in signature"),
            SignatureError::VerificationFailed =>
                f.write_str("signature is invalid"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SignatureError { }

impl PrivateKey {

    /// Generates a new private key from a cryptographically secure RNG.
    pub fn generate<T: CryptoRng + RngCore>(rng: &mut T) -> Self {
        loop {
            let sec = Scalar::random(rng);
            if sec.iszero() == 0 {
                return Self::from_scalar(&sec);
            }
        }
    }

    /// Instantiates a private key from a secret scalar.
    ///
    /// If the provided scalar is zero, then a panic is triggered.
    pub fn from_scalar(sec: &Scalar) -> Self {
        assert!(sec.iszero() == 0);
        let point = Point::mulgen(sec);
        let encoded = point.encode();
        Self { sec: *sec, public_key: PublicKey { point, encoded } }
    }

    /// Instantiates a private key by decoding it from bytes.
    ///
    /// The source must have length exactly 40 bytes and contain the
    /// canonical encoding of a non-zero scalar; otherwise, `None` is
    /// returned.
    pub fn decode(buf: &[u8]) -> Option<Self> {
        let (sec, mut ok) = Scalar::decode40(buf);
        ok &= !sec.iszero();
        if ok != 0 {
            Some(Self::from_scalar(&sec))
        } else {
            None
        }
    }

    /// Encode a private key into bytes.
    ///
    /// This encodes the private scalar into exactly 40 bytes.
    pub fn encode(self) -> [u8; 40] {
        self.sec.encode()
    }

    /// Signs a (hashed) message with this private key.
    ///
    /// The per-signature secret scalar is obtained from the provided
    /// random source, which MUST be cryptographically secure: a
    /// predictable or repeated nonce reveals the private key.
    pub fn sign<T: CryptoRng + RngCore, H: HashToExtension + ?Sized>(self,
        rng: &mut T, hashed_msg: &GFp5, hasher: &H) -> Signature
    {
        loop {
            let k = Scalar::random(rng);
            if k.iszero() == 0 {
                return self.sign_with_nonce(&k, hashed_msg, hasher);
            }
        }
    }

    /// Signs a (hashed) message with this private key and an explicit
    /// per-signature secret scalar `k`.
    ///
    /// This is meant for reproducing test vectors. The nonce `k` MUST be
    /// secret, uniformly random, and never reused for another message.
    pub fn sign_with_nonce<H: HashToExtension + ?Sized>(self, k: &Scalar,
        hashed_msg: &GFp5, hasher: &H) -> Signature
    {
        let r = Point::mulgen(k).encode();
        let e = make_challenge(&r, hashed_msg, hasher);
        Signature { s: k - e * self.sec, e }
    }
}

impl PublicKey {

    /// Creates an instance from a curve point.
    ///
    /// A panic is triggered if the point is the neutral.
    pub fn from_point(point: &Point) -> Self {
        assert!(point.isneutral() == 0);
        Self { point: *point, encoded: point.encode() }
    }

    /// Creates an instance from an encoded point.
    ///
    /// This returns `None` if `w` does not encode a group element, or
    /// encodes the neutral.
    pub fn from_encoded(w: &GFp5) -> Option<Self> {
        let point = Point::decode(w)?;
        if point.isneutral() != 0 {
            return None;
        }
        Some(Self { point, encoded: *w })
    }

    /// Decodes the provided bytes as a public key.
    ///
    /// If the source slice does not have length exactly 40 bytes, or
    /// the bytes are not a canonical field element, or that element
    /// does not encode a group element, or it encodes the neutral,
    /// then this function returns `None`.
    pub fn decode(buf: &[u8]) -> Option<Self> {
        Self::from_encoded(&GFp5::decode(buf)?)
    }

    /// Encode this public key into exactly 40 bytes.
    pub fn encode(self) -> [u8; 40] {
        self.encoded.encode()
    }

    /// Verifies a signature on a (hashed) message against this public
    /// key.
    ///
    /// Note: this function is not constant-time; it assumes that the
    /// public key and signature value are public data.
    pub fn verify<H: HashToExtension + ?Sized>(self, sig: &Signature,
        hashed_msg: &GFp5, hasher: &H) -> bool
    {
        match WeierstrassPoint::decode(&self.encoded) {
            Some(Q) => verify_inner(&Q, sig, hashed_msg, hasher),
            None => false,
        }
    }
}

impl Signature {

    /// Length of an encoded signature, in bytes.
    pub const ENC_LEN: usize = 80;

    /// Encodes this signature into exactly 80 bytes (`s` then `e`).
    pub fn encode(self) -> [u8; 80] {
        let mut d = [0u8; 80];
        d[..40].copy_from_slice(&self.s.encode());
        d[40..].copy_from_slice(&self.e.encode());
        d
    }

    /// Decodes a signature from exactly 80 bytes.
    ///
    /// Both halves must be canonical scalar encodings; otherwise (or if
    /// the source length is not 80 bytes), `None` is returned.
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() != Self::ENC_LEN {
            return None;
        }
        let (s, ok1) = Scalar::decode40(&buf[..40]);
        let (e, ok2) = Scalar::decode40(&buf[40..]);
        if (ok1 & ok2) != 0 {
            Some(Self { s, e })
        } else {
            None
        }
    }

    /// Gets the signature as ten 64-bit words (limbs of `s`, then limbs
    /// of `e`, least significant first).
    pub fn to_w64le(self) -> [u64; 10] {
        let mut r = [0u64; 10];
        r[..5].copy_from_slice(&self.s.to_w64le());
        r[5..].copy_from_slice(&self.e.to_w64le());
        r
    }
}

/// Validates a signature given in encoded format.
///
/// The public key and the hashed message are 40-byte encodings of
/// GF(p^5) elements; the signature is 80 bytes. Each malformed input is
/// reported with a distinct error. This function is not constant-time.
pub fn validate<H: HashToExtension + ?Sized>(pk: &[u8], hashed_msg: &[u8],
    sig: &[u8], hasher: &H) -> Result<(), SignatureError>
{
    let pk = GFp5::decode(pk).ok_or(SignatureError::InvalidPublicKey)?;
    let m = GFp5::decode(hashed_msg).ok_or(SignatureError::InvalidMessage)?;
    if sig.len() != Signature::ENC_LEN {
        return Err(SignatureError::InvalidSignatureLength);
    }
    let sig = Signature::decode(sig).ok_or(SignatureError::InvalidScalar)?;
    let Q = WeierstrassPoint::decode(&pk)
        .ok_or(SignatureError::InvalidPublicKey)?;
    if verify_inner(&Q, &sig, &m, hasher) {
        Ok(())
    } else {
        Err(SignatureError::VerificationFailed)
    }
}

// Core verification: recompute r_v = s*G + e*Q and the challenge.
fn verify_inner<H: HashToExtension + ?Sized>(Q: &WeierstrassPoint,
    sig: &Signature, hashed_msg: &GFp5, hasher: &H) -> bool
{
    let rv = WeierstrassPoint::mul_add2_vartime(
        &WeierstrassPoint::BASE, Q, &sig.s, &sig.e).encode();
    let ev = make_challenge(&rv, hashed_msg, hasher);
    ev.equals(sig.e) != 0
}

/// Computes the challenge of a signature.
///
/// The commitment `r` and the hashed message are injected as ten base
/// field elements (coefficients of `r`, then of the message). This
/// function is used for both signature generation and verification.
fn make_challenge<H: HashToExtension + ?Sized>(r: &GFp5, hashed_msg: &GFp5,
    hasher: &H) -> Scalar
{
    let mut pre = [GFp::ZERO; 10];
    pre[..5].copy_from_slice(&r.coeffs());
    pre[5..].copy_from_slice(&hashed_msg.coeffs());
    Scalar::from_gfp5(&hasher.hash_to_extension(&pre))
}

// ========================================================================

#[cfg(test)]
mod tests {

    use super::{PrivateKey, PublicKey, Signature, SignatureError, validate};
    use crate::ecgfp5::Point;
    use crate::field::{GFp, GFp5};
    use crate::hash::{HashToExtension, Shake256Hash};
    use crate::scalar::Scalar;
    use crate::{CryptoRng, RngCore, RngError};
    use sha2::{Sha512, Digest};

    // A pretend RNG for test purposes (deterministic from a given seed).
    struct DRNG {
        buf: [u8; 64],
        ptr: usize,
    }

    impl DRNG {

        fn from_seed(seed: &[u8]) -> Self {
            let mut d = Self {
                buf: [0u8; 64],
                ptr: 0,
            };
            let mut sh = Sha512::new();
            sh.update(seed);
            d.buf[..].copy_from_slice(&sh.finalize());
            d
        }
    }

    impl RngCore for DRNG {

        fn next_u32(&mut self) -> u32 {
            let mut buf = [0u8; 4];
            self.fill_bytes(&mut buf);
            u32::from_le_bytes(buf)
        }

        fn next_u64(&mut self) -> u64 {
            let mut buf = [0u8; 8];
            self.fill_bytes(&mut buf);
            u64::from_le_bytes(buf)
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let len = dest.len();
            let mut off = 0;
            while off < len {
                let mut clen = 32 - self.ptr;
                if clen > (len - off) {
                    clen = len - off;
                }
                dest[off .. off + clen].copy_from_slice(
                    &self.buf[self.ptr .. self.ptr + clen]);
                self.ptr += clen;
                off += clen;
                if self.ptr == 32 {
                    let mut sh = Sha512::new();
                    sh.update(&self.buf);
                    self.buf[..].copy_from_slice(&sh.finalize());
                    self.ptr = 0;
                }
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8])
            -> Result<(), RngError>
        {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    impl CryptoRng for DRNG { }

    // A hash function that checks the challenge input and returns a
    // fixed value. The expected input is the commitment r = encode(k*G)
    // followed by the hashed message; a mismatch means that the signer
    // or the verifier computed a wrong commitment.
    struct FixedHash {
        r: GFp5,
        m: GFp5,
        out: GFp5,
    }

    impl HashToExtension for FixedHash {

        fn hash_to_extension(&self, input: &[GFp]) -> GFp5 {
            assert!(input.len() == 10);
            let r = self.r.coeffs();
            let m = self.m.coeffs();
            for i in 0..5 {
                assert!(input[i].equals(r[i]) == 0xFFFFFFFF);
                assert!(input[i + 5].equals(m[i]) == 0xFFFFFFFF);
            }
            self.out
        }
    }

    // Private keys, hashed messages, nonces, and the resulting (s, e).
    // The challenges e were obtained with a Poseidon2-based hash; they
    // are injected here through FixedHash, so that the test covers the
    // signing equation and the verification multiplication.
    const KAT_SK: [[u64; 5]; 3] = [
        [12235002942052073545, 1175977464658719998, 8536934969147463310,
         6524687619313720391, 2922072024880609112],
        [14609471659974493146, 15558617123161593410, 853367204868339037,
         17594253198278631904, 368396584122947478],
        [846395111423676945, 1354180063821346280, 5751371120309175011,
         4898038106472090654, 1076345918732914302],
    ];
    const KAT_MSG: [[u64; 5]; 3] = [
        [8398652514106806347, 11069112711939986896, 9732488227085561369,
         18076754337204438535, 17155407358725346236],
        [14569490467507212064, 2707063505563578676, 7506743487465742335,
         12569771346154554175, 4305083698940175790],
        [17529153479246803593, 1743712677205511695, 4834285972617397460,
         5486672566342530358, 7254989001695704129],
    ];
    const KAT_K: [[u64; 5]; 3] = [
        [5245666847777449560, 15178169970799106939, 4403065012435293749,
         15306540389399388999, 8935555081913173844],
        [1980123857560067020, 10696795398834097509, 3211831869376171671,
         6194822139276031840, 3482023782412490864],
        [10299597990997564957, 8547298489021408803, 12250978550108858722,
         5282281975236198197, 5328603554431393061],
    ];
    const KAT_S: [[u64; 5]; 3] = [
        [6950590877883398434, 17178336263794770543, 11012823478139181320,
         16445091359523510936, 5882925226143600273],
        [15189311883262425203, 16924634885527914505, 11098200095411565797,
         11441434601417451505, 2245797172600273048],
        [1747989245728027396, 18083435619737379521, 18276259610811995786,
         15101757397705334408, 5007814817019340642],
    ];
    const KAT_E: [[u64; 5]; 3] = [
        [4544744459434870309, 4180764085957612004, 3024669018778978615,
         15433417688859446606, 6775027260348937828],
        [4905460437060282008, 9275377852059362729, 10383772785796962929,
         6858067464918579610, 7078247668913970626],
        [4911725746357568132, 12205663641120664338, 16433506899074513700,
         14763562571101437023, 2547950465160283358],
    ];

    #[test]
    fn sign_kat() {
        for i in 0..KAT_SK.len() {
            let sk = PrivateKey::from_scalar(&Scalar::from_w64le(KAT_SK[i]));
            let k = Scalar::from_w64le(KAT_K[i]);
            let m = GFp5::w64le(KAT_MSG[i]);
            let hf = FixedHash {
                r: Point::mulgen(&k).encode(),
                m,
                out: GFp5::w64le(KAT_E[i]),
            };
            let sig = sk.sign_with_nonce(&k, &m, &hf);
            assert!(sig.s.to_w64le() == KAT_S[i]);
            assert!(sig.e.to_w64le() == KAT_E[i]);

            // The verifier must recompute the same commitment (this is
            // checked by FixedHash).
            assert!(sk.public_key.verify(&sig, &m, &hf));
            let sig2 = Signature {
                s: Scalar::from_w64le(KAT_S[i]),
                e: Scalar::from_w64le(KAT_E[i]),
            };
            assert!(validate(&sk.public_key.encode(), &m.encode(),
                &sig2.encode(), &hf) == Ok(()));
        }
    }

    #[test]
    fn sign_verify() {
        let hf = Shake256Hash;
        let mut rng = DRNG::from_seed(b"sign_verify");
        for i in 0..10 {
            let sk = PrivateKey::generate(&mut rng);
            let pk = sk.public_key;
            let m = GFp5::random(&mut rng);
            let sig = sk.sign(&mut rng, &m, &hf);
            assert!(pk.verify(&sig, &m, &hf));

            // Key round trips.
            let sk2 = PrivateKey::decode(&sk.encode()).unwrap();
            assert!(sk2.public_key.encoded.equals(pk.encoded) == 0xFFFFFFFF);
            let pk2 = PublicKey::decode(&pk.encode()).unwrap();
            assert!(pk2.point.equals(pk.point) == 0xFFFFFFFF);
            assert!(pk2.verify(&sig, &m, &hf));
            let pk3 = PublicKey::from_point(&pk.point);
            assert!(pk3.encoded.equals(pk.encoded) == 0xFFFFFFFF);

            // Signature round trip.
            let bb = sig.encode();
            let sig2 = Signature::decode(&bb).unwrap();
            assert!(sig2.s.equals(sig.s) == 0xFFFFFFFF);
            assert!(sig2.e.equals(sig.e) == 0xFFFFFFFF);
            let w = sig.to_w64le();
            assert!(w[..5] == sig.s.to_w64le());
            assert!(w[5..] == sig.e.to_w64le());
            assert!(validate(&pk.encode(), &m.encode(), &bb, &hf) == Ok(()));

            // Modified message.
            let m2 = m + GFp5::from_u64(1 + i);
            assert!(!pk.verify(&sig, &m2, &hf));

            // Modified key.
            let sk3 = PrivateKey::generate(&mut rng);
            assert!(!sk3.public_key.verify(&sig, &m, &hf));

            // Modified signature.
            let sig3 = Signature { s: sig.s + Scalar::ONE, e: sig.e };
            assert!(!pk.verify(&sig3, &m, &hf));
            let sig4 = Signature { s: sig.s, e: sig.e - Scalar::ONE };
            assert!(!pk.verify(&sig4, &m, &hf));
        }
    }

    #[test]
    fn sign_with_nonce() {
        let hf = Shake256Hash;
        let sk = PrivateKey::from_scalar(&Scalar::from_seed(b"key"));
        let k = Scalar::from_seed(b"nonce");
        let m = GFp5::w64le([1, 2, 3, 4, 5]);
        let sig1 = sk.sign_with_nonce(&k, &m, &hf);
        let sig2 = sk.sign_with_nonce(&k, &m, &hf);
        assert!(sig1.encode() == sig2.encode());
        assert!(sk.public_key.verify(&sig1, &m, &hf));

        // s = k - e*sk
        let sec = Scalar::from_seed(b"key");
        assert!((sig1.s + sig1.e * sec).equals(k) == 0xFFFFFFFF);

        // A different nonce yields a different (still valid) signature.
        let sig3 = sk.sign_with_nonce(&Scalar::from_seed(b"nonce2"), &m, &hf);
        assert!(sig3.e.equals(sig1.e) == 0);
        assert!(sk.public_key.verify(&sig3, &m, &hf));
    }

    #[test]
    fn decode_errors() {
        // Zero is not a valid private key.
        assert!(PrivateKey::decode(&[0u8; 40]).is_none());
        assert!(PrivateKey::decode(&[1u8; 39]).is_none());
        assert!(PrivateKey::decode(&Scalar::MINUS_ONE.encode()).is_some());
        let mut bb = Scalar::MINUS_ONE.encode();
        bb[0] = bb[0].wrapping_add(1);
        assert!(PrivateKey::decode(&bb).is_none());

        // Neutral is not a valid public key.
        assert!(PublicKey::decode(&[0u8; 40]).is_none());
        assert!(PublicKey::from_encoded(&GFp5::ZERO).is_none());
        // Non-canonical field element.
        assert!(PublicKey::decode(&[0xFFu8; 40]).is_none());
        // Not a group element.
        let w = GFp5::w64le([13557832913345268708, 15669280705791538619,
            8534654657267986396, 12533218303838131749, 5058070698878426028]);
        assert!(PublicKey::from_encoded(&w).is_none());
        assert!(PublicKey::decode(&w.encode()).is_none());

        assert!(Signature::decode(&[0u8; 79]).is_none());
        assert!(Signature::decode(&[0u8; 81]).is_none());
        assert!(Signature::decode(&[0u8; 80]).is_some());
        assert!(Signature::decode(&[0xFFu8; 80]).is_none());
    }

    #[test]
    fn validate_errors() {
        let hf = Shake256Hash;
        let mut rng = DRNG::from_seed(b"validate_errors");
        let sk = PrivateKey::generate(&mut rng);
        let pk = sk.public_key.encode();
        let m = GFp5::random(&mut rng);
        let mb = m.encode();
        let sig = sk.sign(&mut rng, &m, &hf).encode();
        assert!(validate(&pk, &mb, &sig, &hf) == Ok(()));

        let bad = [0xFFu8; 40];
        assert!(validate(&bad, &mb, &sig, &hf)
            == Err(SignatureError::InvalidPublicKey));
        assert!(validate(&pk[..39], &mb, &sig, &hf)
            == Err(SignatureError::InvalidPublicKey));
        assert!(validate(&pk, &bad, &sig, &hf)
            == Err(SignatureError::InvalidMessage));
        assert!(validate(&pk, &mb, &sig[..79], &hf)
            == Err(SignatureError::InvalidSignatureLength));
        let mut sig2 = sig;
        sig2[40..].copy_from_slice(&[0xFFu8; 40]);
        assert!(validate(&pk, &mb, &sig2, &hf)
            == Err(SignatureError::InvalidScalar));
        let mut sig3 = sig;
        sig3[0] ^= 0x01;
        assert!(validate(&pk, &mb, &sig3, &hf)
            == Err(SignatureError::VerificationFailed));
        let m2 = (m + GFp5::ONE).encode();
        assert!(validate(&pk, &m2, &sig, &hf)
            == Err(SignatureError::VerificationFailed));
    }
}
