//! Text sanitization for SVG markup.
//!
//! Some hand-edited SVGs carry stray control characters or Windows-1252
//! punctuation, either of which makes them invalid XML. The sanitizer
//! repairs the text encoding and drops every character XML 1.0 forbids,
//! leaving tags, attributes, coordinates and whitespace untouched.

use crate::{Error, Result, SanitizedMarkup, SourceEncoding, VectorAsset};
use std::borrow::Cow;

/// Whitespace control characters XML 1.0 allows.
const ALLOWED_CONTROLS: &[char] = &['\t', '\n', '\r'];

/// The C1 control block (DEL through APC), rejected alongside C0.
const C1_CONTROLS: std::ops::RangeInclusive<u32> = 0x7F..=0x9F;

/// Whether a character may appear in sanitized markup.
///
/// Keeps tab, newline and carriage return, plus anything at or above
/// U+0020 that is outside U+007F..=U+009F.
pub fn is_allowed_char(c: char) -> bool {
    if ALLOWED_CONTROLS.contains(&c) {
        return true;
    }
    let code = c as u32;
    code >= 0x20 && !C1_CONTROLS.contains(&code)
}

/// Sanitizer for raw vector-image bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sanitizer;

impl Sanitizer {
    /// Create a new sanitizer.
    pub fn new() -> Self {
        Self
    }

    /// Decode raw bytes as UTF-8, falling back to Windows-1252.
    ///
    /// Returns `None` only if the fallback decoder reports malformed input,
    /// which cannot happen for a single-byte table covering 0x00..=0xFF.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Option<(Cow<'a, str>, SourceEncoding)> {
        if let Ok(text) = std::str::from_utf8(bytes) {
            return Some((Cow::Borrowed(text), SourceEncoding::Utf8));
        }

        let (text, had_errors) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
        if had_errors {
            return None;
        }
        Some((text, SourceEncoding::Windows1252))
    }

    /// Drop every disallowed character from `text`.
    ///
    /// Returns the cleaned text and the number of characters removed.
    pub fn sanitize_str(&self, text: &str) -> (String, usize) {
        let mut output = String::with_capacity(text.len());
        let mut removed = 0;

        for c in text.chars() {
            if is_allowed_char(c) {
                output.push(c);
            } else {
                removed += 1;
            }
        }

        (output, removed)
    }

    /// Decode and filter raw bytes, re-encoding the result as UTF-8.
    ///
    /// Returns `None` if the bytes cannot be decoded.
    pub fn sanitize_bytes(&self, bytes: &[u8]) -> Option<(Vec<u8>, SourceEncoding, usize)> {
        let (text, encoding) = self.decode(bytes)?;
        let (cleaned, removed) = self.sanitize_str(&text);
        Some((cleaned.into_bytes(), encoding, removed))
    }

    /// Sanitize one asset.
    pub fn sanitize(&self, asset: &VectorAsset) -> Result<SanitizedMarkup> {
        let (bytes, encoding, removed) =
            self.sanitize_bytes(&asset.bytes).ok_or_else(|| Error::Decode {
                path: asset.path.clone(),
            })?;

        if encoding == SourceEncoding::Windows1252 {
            log::warn!(
                "{} is not valid UTF-8; decoded as Windows-1252",
                asset.path.display()
            );
        }
        if removed > 0 {
            log::warn!(
                "Stripped {} control character(s) from {}",
                removed,
                asset.path.display()
            );
        }
        log::debug!(
            "Sanitized {} ({} -> {} bytes)",
            asset.path.display(),
            asset.bytes.len(),
            bytes.len()
        );

        Ok(SanitizedMarkup {
            stem: asset.stem.clone(),
            source: asset.path.clone(),
            bytes,
            encoding,
            removed,
        })
    }
}
