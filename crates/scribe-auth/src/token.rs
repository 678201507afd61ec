//! Opaque token generation.

use rand::TryRng;

/// Number of random bytes backing a refresh token.
const REFRESH_TOKEN_BYTES: usize = 64;

/// Generate an opaque refresh token: 64 random bytes, hex-encoded.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    fill_random(&mut bytes);
    to_hex(&bytes)
}

/// Generate a short random token for password-reset links.
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; 32];
    fill_random(&mut bytes);
    to_hex(&bytes)
}

fn fill_random(bytes: &mut [u8]) {
    // The thread-local RNG does not fail outside of OS entropy exhaustion,
    // which is unrecoverable anyway.
    rand::rng()
        .try_fill_bytes(bytes)
        .expect("thread rng failure");
}

fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_token_is_128_hex_chars() {
        let token = generate_refresh_token();
        assert_eq!(token.len(), 128);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_are_unique() {
        assert_ne!(generate_refresh_token(), generate_refresh_token());
        assert_ne!(generate_reset_token(), generate_reset_token());
    }
}
