//! API key obfuscation for the local settings file
//!
//! XOR with a fixed key followed by base64. This only keeps the key from
//! being read at a glance; anyone with the settings file can reverse it.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};

/// Fixed XOR key, shared with the browser extension's storage format
pub const OBFUSCATION_KEY: &str = "PrPlease2024ExtKey";

fn xor_with_key(bytes: &[u8]) -> Vec<u8> {
    let key = OBFUSCATION_KEY.as_bytes();
    bytes
        .iter()
        .zip(key.iter().cycle())
        .map(|(byte, k)| byte ^ k)
        .collect()
}

/// Encode a plaintext API key for storage
pub fn obfuscate_api_key(plaintext: &str) -> String {
    STANDARD.encode(xor_with_key(plaintext.as_bytes()))
}

/// Decode a stored API key; malformed input yields an empty string
pub fn deobfuscate_api_key(encoded: &str) -> String {
    STANDARD
        .decode(encoded.trim())
        .ok()
        .and_then(|bytes| String::from_utf8(xor_with_key(&bytes)).ok())
        .unwrap_or_default()
}

/// Mask a key for display, e.g. `AIza...9xQk`
pub fn mask_api_key(key: &SecretString) -> String {
    let exposed = key.expose_secret();
    let chars: Vec<char> = exposed.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}
