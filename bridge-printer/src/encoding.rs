//! Latin-1 helpers for the raw-payload fallback
//!
//! When a transport has no raw-append capability, raw control bytes are
//! re-encoded as text. ISO-8859-1 maps every byte 0-255 to the code
//! point of the same value, so the round trip is lossless for arbitrary
//! printer control streams (unlike UTF-8, which rejects stray high
//! bytes, and unlike the WHATWG "latin1" label, which is windows-1252
//! and remaps 0x80-0x9F).

/// Decode bytes as ISO-8859-1 text (total, never fails)
pub fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Encode a string back to ISO-8859-1 bytes
///
/// Code points above U+00FF are replaced with `?` - they cannot have
/// come from `latin1_to_string`.
pub fn string_to_latin1(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| if (c as u32) < 256 { c as u8 } else { b'?' })
        .collect()
}
