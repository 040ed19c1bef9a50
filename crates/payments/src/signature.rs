//! Payment signature computation and verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::GatewayError;

type HmacSha256 = Hmac<Sha256>;

/// Checks the signature the gateway attaches to a completed payment.
///
/// The signature is the hex-encoded HMAC-SHA256 of `"{order_id}|{payment_id}"`
/// keyed with the merchant's shared secret.
#[derive(Clone)]
pub struct SignatureVerifier {
    mac: HmacSha256,
}

impl SignatureVerifier {
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, GatewayError> {
        let mac = HmacSha256::new_from_slice(secret.as_ref())
            .map_err(|e| GatewayError::InvalidKey(e.to_string()))?;
        Ok(Self { mac })
    }

    /// Computes the expected signature for an order/payment pair.
    pub fn sign(&self, order_id: &str, payment_id: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(payload(order_id, payment_id).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Returns true when `signature` matches. Malformed hex is a mismatch.
    ///
    /// The byte comparison runs in constant time.
    pub fn verify(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        let Ok(expected) = hex::decode(signature.trim()) else {
            return false;
        };

        let mut mac = self.mac.clone();
        mac.update(payload(order_id, payment_id).as_bytes());
        mac.verify_slice(&expected).is_ok()
    }
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier").finish_non_exhaustive()
    }
}

fn payload(order_id: &str, payment_id: &str) -> String {
    format!("{order_id}|{payment_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier() -> SignatureVerifier {
        SignatureVerifier::new("test_secret").unwrap()
    }

    #[test]
    fn sign_matches_reference_hmac() {
        // Reference value: HMAC-SHA256("key", "The quick brown fox jumps over the lazy dog")
        let v = SignatureVerifier::new("key").unwrap();
        let mut mac = v.mac.clone();
        mac.update(b"The quick brown fox jumps over the lazy dog");
        assert_eq!(
            hex::encode(mac.finalize().into_bytes()),
            "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    #[test]
    fn correct_signature_verifies() {
        let v = verifier();
        let sig = v.sign("order_1", "pay_1");
        assert_eq!(sig.len(), 64);
        assert!(v.verify("order_1", "pay_1", &sig));
    }

    #[test]
    fn verification_is_deterministic() {
        let v = verifier();
        let sig = v.sign("order_1", "pay_1");
        let outcomes: Vec<bool> = (0..5).map(|_| v.verify("order_1", "pay_1", &sig)).collect();
        assert!(outcomes.iter().all(|ok| *ok));

        let bad: Vec<bool> = (0..5)
            .map(|_| v.verify("order_1", "pay_1", "deadbeef"))
            .collect();
        assert!(bad.iter().all(|ok| !*ok));
    }

    #[test]
    fn mismatches_are_false_not_errors() {
        let v = verifier();
        let sig = v.sign("order_1", "pay_1");

        assert!(!v.verify("order_2", "pay_1", &sig));
        assert!(!v.verify("order_1", "pay_2", &sig));
        assert!(!v.verify("order_1", "pay_1", "not-hex"));
        assert!(!v.verify("order_1", "pay_1", ""));

        let other = SignatureVerifier::new("other_secret").unwrap();
        assert!(!other.verify("order_1", "pay_1", &sig));
    }

    #[test]
    fn separator_is_part_of_payload() {
        let v = verifier();
        assert_ne!(v.sign("order_1", "pay_1"), v.sign("order_1pay_1", ""));
    }

    #[test]
    fn debug_hides_key() {
        let rendered = format!("{:?}", verifier());
        assert!(!rendered.contains("test_secret"));
    }
}
