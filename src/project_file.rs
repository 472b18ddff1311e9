/*!
 * Sequence XML import.
 *
 * Reads the interchange XML an editor exports for a sequence and recovers the
 * caption clips on it. Caption text lives in `parameter` nodes as base64
 * payloads; clips that reuse a caption only carry its hash, so payloads are
 * decoded once per hash and looked up from every clip:
 *
 * ```xml
 * <clipitem id="clipitem-1">
 *   <start>90</start>
 *   <end>180</end>
 *   <filter><effect>
 *     <parameter>
 *       <parameterid>1</parameterid>
 *       <hash>c2f1...</hash>
 *       <value>AAAA...</value>
 *     </parameter>
 *   </effect></filter>
 * </clipitem>
 * ```
 */

use std::collections::HashMap;

use log::{debug, info};
use roxmltree::{Document, Node, ParsingOptions};

use crate::caption_decoder::{CaptionDecoder, DEFAULT_FONT_MARKER};
use crate::errors::ProjectFileError;
use crate::script::TextBlock;
use crate::timecode::TimeRange;

/// Parameter id of the caption source text
pub const DEFAULT_CAPTION_PARAMETER_ID: &str = "1";

/// Frame rate settings read from `sequence/rate`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceRate {
    pub timebase: Option<u32>,
    pub ntsc: bool,
}

impl SequenceRate {
    /// 30 fps timebase flagged NTSC, i.e. a 29.97 drop-frame timeline
    pub fn is_drop_frame(&self) -> bool {
        self.timebase == Some(30) && self.ntsc
    }
}

/// Caption clips recovered from a sequence
#[derive(Debug, Clone)]
pub struct ProjectFile {
    pub rate: Option<SequenceRate>,
    pub blocks: Vec<TextBlock>,
}

impl ProjectFile {
    /// Render the blocks as `HH;MM;SS;FF - HH;MM;SS;FF` lines each followed by
    /// the caption, blocks separated by a blank line
    pub fn to_script_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| format!("{}\n{}", block.time_label, block.raw_text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Parser for sequence XML
#[derive(Debug, Clone)]
pub struct ProjectFileParser {
    caption_parameter_id: String,
    decoder: CaptionDecoder,
}

impl Default for ProjectFileParser {
    fn default() -> Self {
        Self::new(DEFAULT_CAPTION_PARAMETER_ID, DEFAULT_FONT_MARKER)
    }
}

impl ProjectFileParser {
    pub fn new(caption_parameter_id: impl Into<String>, font_marker: impl Into<String>) -> Self {
        Self {
            caption_parameter_id: caption_parameter_id.into(),
            decoder: CaptionDecoder::new(font_marker),
        }
    }

    /// Parse a sequence document.
    ///
    /// Clips without a start, end, caption hash or decodable text are skipped.
    /// Fails when the document is not well-formed, or when no clip survives.
    pub fn parse(&self, xml: &str) -> Result<ProjectFile, ProjectFileError> {
        // Editor exports carry a `<!DOCTYPE xmeml>` declaration
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = Document::parse_with_options(xml, options)
            .map_err(|e| ProjectFileError::Malformed(e.to_string()))?;

        let rate = read_sequence_rate(&doc);
        match rate {
            Some(rate) if !rate.is_drop_frame() => {
                debug!("Sequence rate {:?} is not NTSC 30; converting as drop-frame anyway", rate)
            }
            Some(_) => debug!("Sequence is 29.97 drop-frame"),
            None => debug!("Sequence rate not found; assuming drop-frame"),
        }

        let captions = self.decode_captions(&doc);
        debug!("Decoded {} unique caption payloads", captions.len());

        let blocks: Vec<TextBlock> = doc
            .descendants()
            .filter(|n| n.has_tag_name("clipitem"))
            .filter_map(|clip| self.clip_block(&clip, &captions))
            .collect();

        if blocks.is_empty() {
            return Err(ProjectFileError::NoCaptions);
        }

        info!("Recovered {} caption blocks from sequence", blocks.len());
        Ok(ProjectFile { rate, blocks })
    }

    /// Parse a sequence document straight to the text form fed to the
    /// script parser, or the error message when parsing fails
    pub fn parse_to_script_text(&self, xml: &str) -> String {
        match self.parse(xml) {
            Ok(project) => project.to_script_text(),
            Err(e) => e.to_string(),
        }
    }

    /// Decode every caption payload once, keyed by its hash; the first payload
    /// seen for a hash wins
    fn decode_captions(&self, doc: &Document<'_>) -> HashMap<String, String> {
        let mut captions = HashMap::new();

        for param in doc.descendants().filter(|n| self.is_caption_parameter(n)) {
            let (Some(hash), Some(value)) = (child_text(&param, "hash"), child_text(&param, "value")) else {
                continue;
            };
            if captions.contains_key(hash) {
                continue;
            }
            captions.insert(hash.to_string(), self.decoder.decode(value));
        }

        captions
    }

    fn clip_block(&self, clip: &Node<'_, '_>, captions: &HashMap<String, String>) -> Option<TextBlock> {
        let clip_id = clip.attribute("id").unwrap_or("?");

        let start = child_text(clip, "start").and_then(|t| t.parse::<i64>().ok());
        let end = child_text(clip, "end").and_then(|t| t.parse::<i64>().ok());
        let (Some(start), Some(end)) = (start, end) else {
            debug!("Skipping clip {}: missing start or end", clip_id);
            return None;
        };

        let hash = clip
            .descendants()
            .filter(|n| self.is_caption_parameter(n))
            .find_map(|param| child_text(&param, "hash"));
        let Some(hash) = hash else {
            debug!("Skipping clip {}: no caption parameter hash", clip_id);
            return None;
        };

        let text = captions.get(hash).filter(|t| !t.is_empty())?;

        let time_range = TimeRange::from_frames(start, end);
        Some(TextBlock::new(time_range, time_range.to_string(), text.clone()))
    }

    fn is_caption_parameter(&self, node: &Node<'_, '_>) -> bool {
        node.has_tag_name("parameter")
            && child_text(node, "parameterid") == Some(self.caption_parameter_id.as_str())
    }
}

fn read_sequence_rate(doc: &Document<'_>) -> Option<SequenceRate> {
    let rate = doc
        .descendants()
        .find(|n| n.has_tag_name("sequence"))?
        .children()
        .find(|n| n.has_tag_name("rate"))?;

    Some(SequenceRate {
        timebase: child_text(&rate, "timebase").and_then(|t| t.parse().ok()),
        ntsc: child_text(&rate, "ntsc").is_some_and(|t| t.eq_ignore_ascii_case("true")),
    })
}

/// Trimmed text of the first child element named `name`
fn child_text<'a>(node: &Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.children()
        .find(|n| n.has_tag_name(name))
        .and_then(|n| n.text())
        .map(str::trim)
}
