/// Password-reset token generation and hashing.
///
/// The raw token goes out through the delivery collaborator; only its
/// SHA-256 hash is stored on the account.
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};

/// Token length before hashing (32 alphanumeric chars, ~190 bits)
const TOKEN_LENGTH: usize = 32;

/// Generate a secure random reset token
pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Hash a token using SHA-256
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
