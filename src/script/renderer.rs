/*!
 * Narration script renderer.
 *
 * Each block becomes one or more lines of the form
 *
 * ```text
 * ０１２３　　　Ｎ　本文 ／２８
 * ```
 *
 * i.e. a full-width `mmss` start label, a spacer, an optional speaker tag and
 * the full-width body, closed by an end-time annotation. Rendering a block only
 * needs its neighbours: the previous block's end hour decides hour markers and
 * the next block's start decides whether the two are one continuous utterance.
 */

use log::debug;
use serde::{Deserialize, Serialize};

use super::width::{FULL_WIDTH_SPACE, digits_to_full_width, is_blank, to_full_width, trim_blanks};
use super::{HighlightSet, TextBlock};
use crate::timecode::{NOMINAL_FRAME_RATE, TimeRange};

/// Silence shorter than one second and ten frames joins two blocks
pub const CONNECTION_THRESHOLD_FRAMES: i64 = NOMINAL_FRAME_RATE as i64 + 10;

/// Shown in place of a block body that is empty
pub const EMPTY_BODY_PLACEHOLDER: &str = "※注意！本文なし！";

/// Prefixed to the first line of a flagged block
pub const HIGHLIGHT_MARKER: &str = "🔴";

/// Full-width narration speaker tag
pub const SPEAKER_TAG: char = 'Ｎ';

/// Separator placed before the end-time annotation
const END_TIME_SEPARATOR: &str = " ／";

/// Formatting switches supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Always emit the `Ｎ` speaker tag, removing one already typed in the body
    #[serde(default = "default_true")]
    pub force_speaker_tag: bool,

    /// Write start labels as `ｍｍ：ｓｓ` instead of `ｍｍｓｓ`
    #[serde(default)]
    pub colon_style: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            force_speaker_tag: true,
            colon_style: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// A block as handed to the proofreading service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiBlock {
    /// Timecode line as typed
    pub time: String,
    /// Body before any formatting
    pub text: String,
}

/// Output of one render pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedScript {
    pub script_text: String,
    pub ai_data: Vec<AiBlock>,
    /// Rendered start label of every block, by block index
    pub start_times: Vec<String>,
}

/// A block together with its neighbours
#[derive(Debug, Clone, Copy)]
pub struct BlockWindow<'a> {
    pub previous: Option<&'a TextBlock>,
    pub current: &'a TextBlock,
    pub next: Option<&'a TextBlock>,
}

/// Slide a previous/current/next window over `blocks`
pub fn block_windows(blocks: &[TextBlock]) -> impl Iterator<Item = BlockWindow<'_>> {
    blocks.iter().enumerate().map(move |(i, current)| BlockWindow {
        previous: i.checked_sub(1).and_then(|p| blocks.get(p)),
        current,
        next: blocks.get(i + 1),
    })
}

/// Everything one block contributes to the script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock {
    /// Hour to announce before the block, if any
    pub hour_marker: Option<u32>,
    pub lines: Vec<String>,
    pub start_label: String,
    /// False when the block runs straight into the next one
    pub separated: bool,
}

/// Start label plus the blank spacer that follows it
#[derive(Debug, Clone, PartialEq, Eq)]
struct StartLabel {
    label: String,
    spacer_width: usize,
}

/// Renders parsed blocks into the narration layout
#[derive(Debug, Clone, Default)]
pub struct ScriptRenderer {
    options: RenderOptions,
}

impl ScriptRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render all blocks, flagging the ones listed in `highlights`
    pub fn render(&self, blocks: &[TextBlock], highlights: &HighlightSet) -> RenderedScript {
        let mut output: Vec<String> = Vec::new();
        let mut ai_data = Vec::with_capacity(blocks.len());
        let mut start_times = Vec::with_capacity(blocks.len());
        let last_index = blocks.len().saturating_sub(1);

        for (index, window) in block_windows(blocks).enumerate() {
            let rendered = self.render_block(&window, highlights.contains(&index));

            if let Some(hour) = rendered.hour_marker {
                output.push(String::new());
                output.push(hour_marker_line(hour));
            }
            output.extend(rendered.lines);
            if rendered.separated && index < last_index {
                output.push(String::new());
            }

            ai_data.push(AiBlock {
                time: window.current.time_label.trim().to_string(),
                text: window.current.raw_text.trim().to_string(),
            });
            start_times.push(rendered.start_label);
        }

        debug!("Rendered {} blocks into {} lines", blocks.len(), output.len());

        RenderedScript {
            script_text: output.join("\n"),
            ai_data,
            start_times,
        }
    }

    /// Render a single block from its window
    pub fn render_block(&self, window: &BlockWindow<'_>, highlighted: bool) -> RenderedBlock {
        let range = &window.current.time_range;
        let hour_marker = hour_marker(window);
        let start = self.start_label(range);

        let separated = window
            .next
            .is_none_or(|next| range.gap_frames_to(&next.time_range.start) >= CONNECTION_THRESHOLD_FRAMES);
        let end_annotation = if separated {
            end_time_annotation(range)
        } else {
            String::new()
        };

        let mut prefix = start.label.clone();
        prefix.extend(std::iter::repeat_n(FULL_WIDTH_SPACE, start.spacer_width));
        if self.options.force_speaker_tag {
            prefix.push(SPEAKER_TAG);
            prefix.push(FULL_WIDTH_SPACE);
        }
        let indent: String = std::iter::repeat_n(FULL_WIDTH_SPACE, prefix.chars().count()).collect();

        let body = self.body_text(&window.current.raw_text);
        let body_lines: Vec<&str> = body.split('\n').collect();
        let last_line = body_lines.len() - 1;

        let lines = body_lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let line = line.trim_start_matches(is_blank);
                let end = if i == last_line { end_annotation.as_str() } else { "" };
                if i == 0 {
                    let marker = if highlighted { HIGHLIGHT_MARKER } else { "" };
                    format!("{}{}{}{}", marker, prefix, line, end)
                } else {
                    format!("{}{}{}", indent, line, end)
                }
            })
            .collect();

        RenderedBlock {
            hour_marker,
            lines,
            start_label: start.label,
            separated,
        }
    }

    /// Start label from the start minute and second.
    ///
    /// Frames 0-9 round down, 10-22 read as a half second (`半`), and 23-29
    /// carry into the next second.
    fn start_label(&self, range: &TimeRange) -> StartLabel {
        let start = &range.start;
        let in_cycle = (start.minutes % 60) * 60 + start.seconds;

        let (in_cycle, spacer_width, half) = match start.frames {
            0..=9 => (in_cycle, 3, false),
            10..=22 => (in_cycle, 2, true),
            _ => (in_cycle + 1, 3, false),
        };

        let minutes = (in_cycle / 60) % 60;
        let seconds = in_cycle % 60;
        let digits = if self.options.colon_style {
            format!("{:02}：{:02}", minutes, seconds)
        } else {
            format!("{:02}{:02}", minutes, seconds)
        };

        let mut label = digits_to_full_width(&digits);
        if half {
            label.push('半');
        }

        StartLabel { label, spacer_width }
    }

    /// Trimmed, speaker-stripped, full-width body
    fn body_text(&self, raw_text: &str) -> String {
        let text = trim_blanks(raw_text);
        let body = if self.options.force_speaker_tag {
            strip_speaker_tag(text).unwrap_or(text)
        } else {
            text
        };

        let body = trim_blanks(body);
        if body.is_empty() {
            EMPTY_BODY_PLACEHOLDER.to_string()
        } else {
            to_full_width(body)
        }
    }
}

/// Remove a typed narration tag (`N`, `n`, `Ｎ`, `ｎ`, optionally followed by
/// a colon) from the start of `text`.
///
/// A tag directly followed by an ASCII letter or digit is part of a word and
/// is left alone. Returns `None` when there is no tag.
pub fn strip_speaker_tag(text: &str) -> Option<&str> {
    let rest = text.trim_start();
    let mut chars = rest.chars();
    if !matches!(chars.next(), Some('N' | 'n' | 'Ｎ' | 'ｎ')) {
        return None;
    }
    let after_tag = chars.as_str();

    let not_word = |s: &str| !s.chars().next().is_some_and(|c| c.is_ascii_alphanumeric());

    let after_spaces = after_tag.trim_start();
    let mut colon = after_spaces.chars();
    if matches!(colon.next(), Some(':' | '：')) && not_word(colon.as_str()) {
        return Some(colon.as_str().trim_start());
    }

    if not_word(after_tag) {
        Some(after_tag.trim_start())
    } else {
        None
    }
}

/// Hour to announce before the current block.
///
/// The first block announces a non-zero start hour. Later blocks announce
/// when their start hour is behind the previous block's end hour or their own
/// end hour (a rollback or a block straddling the hour), using the later of
/// the two, or when they start in an hour past the previous end hour.
fn hour_marker(window: &BlockWindow<'_>) -> Option<u32> {
    let range = &window.current.time_range;
    let start_hour = range.start.hours;

    let Some(previous) = window.previous else {
        return (start_hour > 0).then_some(start_hour);
    };

    let previous_end_hour = previous.time_range.end.hours;
    let ceiling = previous_end_hour.max(range.end.hours);
    if start_hour < ceiling {
        Some(ceiling)
    } else if start_hour > previous_end_hour {
        Some(start_hour)
    } else {
        None
    }
}

fn hour_marker_line(hour: u32) -> String {
    format!("【{}Ｈ】", digits_to_full_width(&hour.to_string()))
}

/// End-time annotation such as ` ／２８` or ` ／０１０２`.
///
/// An end frame of 0-9 rounds back one second. Only the seconds are written
/// when the end falls in the start's hour and minute.
fn end_time_annotation(range: &TimeRange) -> String {
    let (start, end) = (&range.start, &range.end);

    let mut minutes = i64::from(end.minutes);
    let mut seconds = i64::from(end.seconds);
    if end.frames <= 9 {
        seconds -= 1;
    }
    if seconds < 0 {
        seconds = 59;
        minutes -= 1;
    }
    let minutes = minutes.rem_euclid(60);

    let same_minute = start.hours == end.hours && i64::from(start.minutes % 60) == minutes;
    let digits = if same_minute {
        format!("{:02}", seconds)
    } else {
        format!("{:02}{:02}", minutes, seconds)
    };

    format!("{}{}", END_TIME_SEPARATOR, digits_to_full_width(&digits))
}
