//! Decoding-key construction.
//!
//! Maps an algorithm identifier plus raw key material (an HMAC secret,
//! or a PEM-encoded public key for the asymmetric families) to a
//! `jsonwebtoken` decoding key. Done once at startup; the decision
//! path only ever sees the finished key handle.

use jsonwebtoken::{Algorithm, DecodingKey};

/// Build the decoding key matching the signing algorithm's family.
pub fn build_decoding_key(
    algorithm: Algorithm,
    key: &[u8],
) -> Result<DecodingKey, jsonwebtoken::errors::Error> {
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
            Ok(DecodingKey::from_secret(key))
        }
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => DecodingKey::from_rsa_pem(key),
        Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(key),
        Algorithm::EdDSA => DecodingKey::from_ed_pem(key),
    }
}
