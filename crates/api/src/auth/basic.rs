//! HTTP Basic credential parsing and comparison for the account-creation
//! guard on `POST /user`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sha2::{Digest, Sha256};

/// Parse an `Authorization: Basic <base64>` header value into
/// `(username, password)`.
pub fn parse_basic_credentials(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Compare two credential strings without leaking their length or content
/// through timing. Both sides are hashed first so the comparison always
/// runs over fixed-size digests.
pub fn credentials_match(provided: &str, expected: &str) -> bool {
    let a = Sha256::digest(provided.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    a == b
}
