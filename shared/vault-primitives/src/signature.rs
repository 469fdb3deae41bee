//! Wire-format signature parsing and the `ecrecover` precompile payload.
//!
//! The wire format is the fixed 65-byte `r || s || v` encoding. Parsing is
//! strict: the recovery id is normalized into {27, 28} and rejected otherwise,
//! and `s` must sit in the lower half of the curve order so the mathematically
//! equivalent high-s twin of a signature never verifies.

use alloy_primitives::{B256, U256};

/// Exact length of the wire signature.
pub const SIGNATURE_LEN: usize = 65;

/// Upper bound on `s`: secp256k1 group order / 2.
const HALF_CURVE_ORDER: U256 = U256::from_limbs([
    0xdfe9_2f46_681b_20a0,
    0x5d57_6e73_57a4_501d,
    0xffff_ffff_ffff_ffff,
    0x7fff_ffff_ffff_ffff,
]);

/// A validated `(r, s, v)` signature, `v` normalized to 27 or 28.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoverableSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub v: u8,
}

/// Signature wire-format rejections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureError {
    /// Not exactly 65 bytes.
    InvalidLength,
    /// Recovery id outside {0, 1, 27, 28}.
    InvalidV,
    /// `s` above the half curve order (malleable twin).
    InvalidS,
}

/// Parse and validate a wire signature.
pub fn parse_signature(bytes: &[u8]) -> Result<RecoverableSignature, SignatureError> {
    if bytes.len() != SIGNATURE_LEN {
        return Err(SignatureError::InvalidLength);
    }

    let v = match bytes[64] {
        v @ (27 | 28) => v,
        v @ (0 | 1) => v + 27,
        _ => return Err(SignatureError::InvalidV),
    };

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&bytes[0..32]);
    s.copy_from_slice(&bytes[32..64]);

    if U256::from_be_bytes(s) > HALF_CURVE_ORDER {
        return Err(SignatureError::InvalidS);
    }

    Ok(RecoverableSignature { r, s, v })
}

/// Build the 128-byte input for the `ecrecover` precompile (address 0x01):
/// digest || v as a 32-byte word || r || s.
pub fn ecrecover_input(digest: B256, sig: &RecoverableSignature) -> [u8; 128] {
    let mut input = [0u8; 128];
    input[0..32].copy_from_slice(digest.as_slice());
    input[63] = sig.v;
    input[64..96].copy_from_slice(&sig.r);
    input[96..128].copy_from_slice(&sig.s);
    input
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_sig(v: u8) -> [u8; 65] {
        let mut sig = [0u8; 65];
        sig[0..32].copy_from_slice(&[0x11; 32]);
        sig[32..64].copy_from_slice(&[0x22; 32]);
        sig[64] = v;
        sig
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(parse_signature(&[0u8; 64]), Err(SignatureError::InvalidLength));
        assert_eq!(parse_signature(&[0u8; 66]), Err(SignatureError::InvalidLength));
        assert_eq!(parse_signature(&[]), Err(SignatureError::InvalidLength));
    }

    #[test]
    fn normalizes_v() {
        assert_eq!(parse_signature(&raw_sig(0)).unwrap().v, 27);
        assert_eq!(parse_signature(&raw_sig(1)).unwrap().v, 28);
        assert_eq!(parse_signature(&raw_sig(27)).unwrap().v, 27);
        assert_eq!(parse_signature(&raw_sig(28)).unwrap().v, 28);
    }

    #[test]
    fn rejects_unknown_v() {
        for v in [2u8, 26, 29, 255] {
            assert_eq!(parse_signature(&raw_sig(v)), Err(SignatureError::InvalidV));
        }
    }

    #[test]
    fn rejects_high_s() {
        let mut sig = raw_sig(27);
        // s = half order + 1
        let high_s = HALF_CURVE_ORDER + U256::from(1u64);
        sig[32..64].copy_from_slice(&high_s.to_be_bytes::<32>());
        assert_eq!(parse_signature(&sig), Err(SignatureError::InvalidS));
    }

    #[test]
    fn accepts_boundary_s() {
        let mut sig = raw_sig(27);
        sig[32..64].copy_from_slice(&HALF_CURVE_ORDER.to_be_bytes::<32>());
        assert!(parse_signature(&sig).is_ok());
    }

    #[test]
    fn precompile_input_layout() {
        let sig = parse_signature(&raw_sig(28)).unwrap();
        let digest = B256::from([0xAA; 32]);
        let input = ecrecover_input(digest, &sig);
        assert_eq!(&input[0..32], digest.as_slice());
        assert_eq!(input[63], 28);
        assert_eq!(&input[32..63], &[0u8; 31]);
        assert_eq!(&input[64..96], &[0x11; 32]);
        assert_eq!(&input[96..128], &[0x22; 32]);
    }
}
