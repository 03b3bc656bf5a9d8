use argon2::Config;
use rand::Rng;

use crate::error::Result;

/// Hash an admin password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    // 16 bytes is recommended for password hashing:
    //  https://en.wikipedia.org/wiki/Argon2
    let mut salt = [0_u8; 16];
    rand::thread_rng().fill(&mut salt);
    let hash = argon2::hash_encoded(password.as_bytes(), &salt, &Config::default())?;
    Ok(hash)
}

/// Check a password against an encoded hash. A malformed hash never matches.
pub fn verify_password(hash: &str, password: &str) -> bool {
    argon2::verify_encoded(hash, password.as_bytes()).unwrap_or(false)
}
