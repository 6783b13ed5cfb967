/// TOTP second factor per RFC 4226/6238: HMAC-SHA1, 30-second step,
/// 6-digit codes, base32 shared secrets
use crate::error::{AuthError, Result};
use base64::{engine::general_purpose::STANDARD as base64_engine, Engine as _};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha1::Sha1;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha1 = Hmac<Sha1>;

/// Time step in seconds (standard TOTP)
const TIME_STEP_SECS: u64 = 30;

/// Accepted clock skew, in time steps, in either direction
const SKEW_STEPS: i64 = 1;

const SECRET_BYTES: usize = 20;

/// Generate a fresh shared secret, base32-encoded for authenticator apps
pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    base32_encode(&bytes)
}

/// Build the otpauth:// provisioning URI scanned during enrollment
pub fn provisioning_uri(issuer: &str, email: &str, secret: &str) -> String {
    format!(
        "otpauth://totp/{issuer}:{account}?secret={secret}&issuer={issuer}&algorithm=SHA1&digits=6&period={TIME_STEP_SECS}",
        account = urlencoding::encode(email),
    )
}

/// Render a provisioning URI as an SVG QR code, returned as a data URL
pub fn qr_code_data_url(uri: &str) -> Result<String> {
    let code = qrcode::QrCode::new(uri)
        .map_err(|e| AuthError::Internal(format!("Failed to generate QR code: {}", e)))?;
    let svg = code.render::<qrcode::render::svg::Color>().build();

    Ok(format!(
        "data:image/svg+xml;base64,{}",
        base64_engine.encode(svg.as_bytes())
    ))
}

/// Verify a submitted 6-digit code against the stored secret, tolerating
/// one time step of clock skew in either direction
pub fn verify_code(secret: &str, code: &str) -> Result<bool> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AuthError::Internal(format!("System time error: {}", e)))?
        .as_secs();

    verify_code_at(secret, code, now)
}

/// Verification against an explicit timestamp; `verify_code` passes now
pub fn verify_code_at(secret: &str, code: &str, unix_time: u64) -> Result<bool> {
    if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
        return Ok(false);
    }

    let secret_bytes = base32_decode(secret)
        .ok_or_else(|| AuthError::Internal("Stored TOTP secret is not valid base32".to_string()))?;

    let current_counter = (unix_time / TIME_STEP_SECS) as i64;

    for offset in -SKEW_STEPS..=SKEW_STEPS {
        let counter = current_counter + offset;
        if counter < 0 {
            continue;
        }
        let expected = hotp(&secret_bytes, counter as u64)?;
        if constant_time_eq(code.as_bytes(), expected.as_bytes()) {
            return Ok(true);
        }
    }

    Ok(false)
}

/// The code an authenticator app would show at `unix_time`
pub fn code_at(secret: &str, unix_time: u64) -> Result<String> {
    let secret_bytes = base32_decode(secret)
        .ok_or_else(|| AuthError::Internal("Stored TOTP secret is not valid base32".to_string()))?;
    hotp(&secret_bytes, unix_time / TIME_STEP_SECS)
}

/// HOTP value for one counter (RFC 4226 §5.3 dynamic truncation)
fn hotp(secret: &[u8], counter: u64) -> Result<String> {
    let mut mac = HmacSha1::new_from_slice(secret)
        .map_err(|e| AuthError::Internal(format!("Invalid HMAC key: {}", e)))?;
    mac.update(&counter.to_be_bytes());
    let hash = mac.finalize().into_bytes();

    let offset = (hash[hash.len() - 1] & 0x0f) as usize;
    let binary = u32::from_be_bytes([
        hash[offset] & 0x7f,
        hash[offset + 1],
        hash[offset + 2],
        hash[offset + 3],
    ]);

    Ok(format!("{:06}", binary % 1_000_000))
}

/// Base32 encoding (RFC 4648), no padding for whole-quantum input
fn base32_encode(data: &[u8]) -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
    let mut output = String::new();
    let mut buffer = 0u32;
    let mut bits = 0;

    for byte in data {
        buffer = (buffer << 8) | u32::from(*byte);
        bits += 8;

        while bits >= 5 {
            bits -= 5;
            output.push(ALPHABET[((buffer >> bits) & 0x1f) as usize] as char);
        }
    }

    if bits > 0 {
        buffer <<= 5 - bits;
        output.push(ALPHABET[(buffer & 0x1f) as usize] as char);
    }

    output
}

/// Base32 decoding (RFC 4648); returns None on any non-alphabet character
fn base32_decode(data: &str) -> Option<Vec<u8>> {
    let data = data.trim_end_matches('=');
    let mut buffer = 0u32;
    let mut bits = 0;
    let mut output = Vec::new();

    for ch in data.chars() {
        let value = match ch {
            'A'..='Z' => (ch as u32) - ('A' as u32),
            '2'..='7' => (ch as u32) - ('2' as u32) + 26,
            _ => return None,
        };

        buffer = (buffer << 5) | value;
        bits += 5;

        if bits >= 8 {
            bits -= 8;
            output.push(((buffer >> bits) & 0xff) as u8);
        }
    }

    Some(output)
}

/// Constant-time comparison so verification cost does not depend on how
/// many leading digits match
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }

    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    /// RFC 6238 appendix B secret ("12345678901234567890" in ASCII)
    const RFC_SECRET_B32: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

    #[test]
    fn test_rfc6238_vectors() {
        // 6 low-order digits of the appendix B SHA-1 reference values
        assert_eq!(code_at(RFC_SECRET_B32, 59).unwrap(), "287082");
        assert_eq!(code_at(RFC_SECRET_B32, 1_111_111_109).unwrap(), "081804");
        assert_eq!(code_at(RFC_SECRET_B32, 1_111_111_111).unwrap(), "050471");
        assert_eq!(code_at(RFC_SECRET_B32, 1_234_567_890).unwrap(), "005924");
        assert_eq!(code_at(RFC_SECRET_B32, 2_000_000_000).unwrap(), "279037");
    }

    #[test]
    fn test_skew_window_accepts_adjacent_steps() {
        let now = 1_111_111_109u64;
        let previous = code_at(RFC_SECRET_B32, now - TIME_STEP_SECS).unwrap();
        let next = code_at(RFC_SECRET_B32, now + TIME_STEP_SECS).unwrap();

        assert!(verify_code_at(RFC_SECRET_B32, &previous, now).unwrap());
        assert!(verify_code_at(RFC_SECRET_B32, &next, now).unwrap());

        // Two steps away is outside the window
        let stale = code_at(RFC_SECRET_B32, now - 2 * TIME_STEP_SECS).unwrap();
        assert!(!verify_code_at(RFC_SECRET_B32, &stale, now).unwrap());
    }

    #[test]
    fn test_rejects_malformed_codes() {
        assert!(!verify_code_at(RFC_SECRET_B32, "12345", 59).unwrap());
        assert!(!verify_code_at(RFC_SECRET_B32, "1234567", 59).unwrap());
        assert!(!verify_code_at(RFC_SECRET_B32, "28708a", 59).unwrap());
    }

    #[test]
    fn test_invalid_secret_is_an_error() {
        assert!(verify_code_at("not base32!", "123456", 59).is_err());
    }

    #[test]
    fn test_generated_secret_roundtrips() {
        let secret = generate_secret();
        assert_eq!(secret.len(), 32); // 20 bytes -> 32 base32 chars
        let decoded = base32_decode(&secret).unwrap();
        assert_eq!(decoded.len(), 20);
        assert_eq!(base32_encode(&decoded), secret);
    }

    #[test]
    fn test_provisioning_uri_shape() {
        let uri = provisioning_uri("PledgeHub", "a@x.com", "SECRETB32");
        assert!(uri.starts_with("otpauth://totp/PledgeHub:"));
        assert!(uri.contains("a%40x.com"));
        assert!(uri.contains("secret=SECRETB32"));
        assert!(uri.contains("period=30"));
    }

    #[test]
    fn test_qr_code_data_url() {
        let uri = provisioning_uri("PledgeHub", "a@x.com", &generate_secret());
        let data_url = qr_code_data_url(&uri).unwrap();
        assert!(data_url.starts_with("data:image/svg+xml;base64,"));
    }
}
