/*!
 * Decoding of caption text embedded in editor project files.
 *
 * The editor stores a caption's source text as a base64 blob. Once decoded it is
 * big-endian UTF-16 mixed with font and style records; the text the editor's
 * user typed follows the font name.
 */

use base64::{Engine as _, engine::general_purpose};
use log::debug;

/// Font name that precedes caption text in the default title template
pub const DEFAULT_FONT_MARKER: &str = "KozMinPro-Regular";

/// Extracts human-authored caption text from encoded payloads
#[derive(Debug, Clone)]
pub struct CaptionDecoder {
    font_marker: String,
}

impl Default for CaptionDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_MARKER)
    }
}

impl CaptionDecoder {
    /// Create a decoder that looks for text after `font_marker`
    pub fn new(font_marker: impl Into<String>) -> Self {
        Self {
            font_marker: font_marker.into(),
        }
    }

    /// Decode a base64 caption payload into its text.
    ///
    /// Returns an empty string when the payload is not valid base64, when the
    /// font marker is missing, or when nothing readable follows it.
    pub fn decode(&self, base64_blob: &str) -> String {
        let compact: String = base64_blob.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = match general_purpose::STANDARD.decode(compact.as_bytes()) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!("Caption payload is not valid base64: {}", e);
                return String::new();
            }
        };

        let text = decode_utf16_be(&bytes);
        self.extract_caption(&text).unwrap_or_default()
    }

    fn extract_caption(&self, decoded: &str) -> Option<String> {
        let marker_at = decoded.find(&self.font_marker)?;
        let after_marker = decoded[marker_at + self.font_marker.len()..].trim_start();

        let trimmed = after_marker
            .trim_matches(|c: char| matches!(c, '\0' | '\r' | '\n' | '\t' | ' '));

        let run: String = trimmed
            .chars()
            .skip_while(|&c| is_control(c))
            .take_while(|&c| !is_control(c))
            .collect();

        let run = run.trim();
        if run.is_empty() {
            None
        } else {
            Some(run.to_string())
        }
    }
}

/// Decode big-endian UTF-16, substituting U+FFFD for unpaired surrogates.
/// A dangling odd byte is dropped.
fn decode_utf16_be(bytes: &[u8]) -> String {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));

    char::decode_utf16(units)
        .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// C0 and C1 control ranges plus DEL
fn is_control(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{1F}' | '\u{7F}'..='\u{9F}')
}
