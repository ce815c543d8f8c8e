//! At-rest encoding of the per-user Gemini API key.
//!
//! Keys are base64-encoded before storage and decoded per request. Decode
//! failure degrades to treating the stored value as plaintext so older
//! records written before encoding was introduced still resolve.

use base64::{engine::general_purpose::STANDARD, Engine};

pub fn encode_credential(plain: &str) -> String {
    STANDARD.encode(plain.as_bytes())
}

pub fn decode_credential(stored: &str) -> String {
    match STANDARD
        .decode(stored)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
    {
        Some(plain) => plain,
        None => {
            tracing::warn!("Stored credential is not valid base64, treating as plaintext");
            stored.to_string()
        }
    }
}
