/*!
 * Common test utilities for the syncraft test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use anyhow::Result;
use base64::{Engine as _, engine::general_purpose};
use tempfile::TempDir;

use syncraft::caption_decoder::DEFAULT_FONT_MARKER;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Pasted caption export with front matter and three blocks.
///
/// The first two blocks are 10 frames apart and read as one utterance.
pub const SAMPLE_SCRIPT: &str = "Sequence 01 caption export
(do not edit above this line)

00;00;01;00 - 00;00;03;20
Nこんにちは

00;00;04;00 - 00;00;06;15
今日はいい天気です

00;00;10;12 - 00;00;12;05
ｎ：まとめ ABC 123
";

/// Creates a sample caption export for testing
pub fn create_test_script(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_SCRIPT)
}

/// Base64 caption payload in the editor's layout: a style record, the font
/// name, a control separator and the caption text, all UTF-16BE
pub fn encode_caption(text: &str) -> String {
    let decoded = format!("\u{1}\u{0}{}\u{0}\u{2}{}\u{0}\u{3}", DEFAULT_FONT_MARKER, text);
    let bytes: Vec<u8> = decoded
        .encode_utf16()
        .flat_map(|unit| unit.to_be_bytes())
        .collect();
    general_purpose::STANDARD.encode(bytes)
}

/// A caption clip for `sequence_xml`
pub struct TestClip<'a> {
    pub start: i64,
    pub end: i64,
    pub hash: &'a str,
    /// Payload text; `None` for a clip that only references the hash
    pub text: Option<&'a str>,
}

impl<'a> TestClip<'a> {
    pub fn new(start: i64, end: i64, hash: &'a str, text: Option<&'a str>) -> Self {
        Self { start, end, hash, text }
    }
}

/// Builds a minimal sequence document, shaped like an editor export, holding
/// the given caption clips
pub fn sequence_xml(clips: &[TestClip<'_>]) -> String {
    let clip_items: String = clips
        .iter()
        .enumerate()
        .map(|(i, clip)| {
            let value = clip
                .text
                .map(|text| format!("<value>{}</value>", encode_caption(text)))
                .unwrap_or_default();
            format!(
                r#"<clipitem id="clipitem-{}">
  <start>{}</start>
  <end>{}</end>
  <filter><effect>
    <parameter><parameterid>2</parameterid><value>ignored</value></parameter>
    <parameter>
      <parameterid>1</parameterid>
      <hash>{}</hash>
      {}
    </parameter>
  </effect></filter>
</clipitem>"#,
                i + 1,
                clip.start,
                clip.end,
                clip.hash,
                value
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE xmeml>
<xmeml version="4">
  <sequence id="sequence-1">
    <rate><timebase>30</timebase><ntsc>TRUE</ntsc></rate>
    <media><video><track>
{}
    </track></video></media>
  </sequence>
</xmeml>"#,
        clip_items
    )
}
