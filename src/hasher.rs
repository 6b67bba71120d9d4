//! BLAKE3 content fingerprinting.
//!
//! The fingerprint of an image's raw bytes is the dedup key for the whole
//! cache: two downloads with the same fingerprint are the same image, no
//! matter which date or title they were requested under.

/// Compute the hex-encoded BLAKE3 fingerprint of raw image bytes.
///
/// Deterministic: the same bytes always produce the same digest, and the
/// digest is cryptographically collision resistant. Any byte sequence,
/// including the empty one, is valid input.
///
/// # Example
///
/// ```
/// use apodcache::hasher::fingerprint;
///
/// let a = fingerprint(b"starfield");
/// let b = fingerprint(b"starfield");
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 64); // 32 bytes, hex encoded
/// ```
#[must_use]
pub fn fingerprint(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}
