use sha2::{Digest, Sha256};

/// Compute SHA256 hash of input bytes
pub fn sha256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hasher.finalize().into()
}

/// Short, stable identifier for a bearer token that is safe to log.
///
/// First 16 hex characters of the token's SHA-256 digest.
pub fn token_fingerprint(token: &str) -> String {
    let digest = hex::encode(sha256(token.as_bytes()));
    digest[..16].to_string()
}
