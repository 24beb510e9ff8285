//! Classifying a subscription body as base64 or raw text.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// How a fetched body is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// The whole trimmed body is canonical standard base64.
    Base64,
    /// The body is newline-separated entries as-is.
    Raw,
}

/// Classify a body.
///
/// A body is base64 only if its trimmed form decodes strictly and encoding
/// the decoded bytes gives back exactly the same string. Plenty of plain
/// text decodes by accident; the round trip is what tells them apart.
/// An empty body is raw.
pub fn classify(body: &str) -> Encoding {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Encoding::Raw;
    }
    match STANDARD.decode(trimmed) {
        Ok(bytes) if STANDARD.encode(&bytes) == trimmed => Encoding::Base64,
        _ => Encoding::Raw,
    }
}
