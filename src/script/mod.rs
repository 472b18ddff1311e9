/*!
 * Narration script conversion.
 *
 * - `parser`: pasted text to timed blocks
 * - `renderer`: timed blocks to the studio narration layout
 * - `width`: half-width / full-width character mapping
 */

use std::collections::BTreeSet;

use crate::errors::ScriptError;
use crate::timecode::TimeRange;

pub mod parser;
pub mod renderer;
pub mod width;

pub use parser::{ScriptBlocks, parse_script, parse_time_range};
pub use renderer::{AiBlock, RenderOptions, RenderedScript, ScriptRenderer};

/// Zero-based block indices to flag on the second render pass
pub type HighlightSet = BTreeSet<usize>;

/// One timed block of narration or caption text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    /// Parsed start and end
    pub time_range: TimeRange,
    /// The timecode line as it appeared in the input
    pub time_label: String,
    /// Body text, possibly several lines, untouched
    pub raw_text: String,
}

impl TextBlock {
    pub fn new(time_range: TimeRange, time_label: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            time_range,
            time_label: time_label.into(),
            raw_text: raw_text.into(),
        }
    }
}

/// Parse and render in one step
pub fn try_convert_script(
    text: &str,
    options: &RenderOptions,
    highlights: &HighlightSet,
) -> Result<RenderedScript, ScriptError> {
    let blocks = parse_script(text)?;
    Ok(ScriptRenderer::new(options.clone()).render(&blocks, highlights))
}

/// Parse and render, folding a parse failure into the script text.
///
/// On failure the error message takes the place of the script and both side
/// channels are empty.
pub fn convert_script(text: &str, options: &RenderOptions, highlights: &HighlightSet) -> RenderedScript {
    try_convert_script(text, options, highlights).unwrap_or_else(|e| RenderedScript {
        script_text: e.to_string(),
        ai_data: Vec::new(),
        start_times: Vec::new(),
    })
}
