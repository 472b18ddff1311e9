/*!
 * Tolerant parser for pasted timestamp + text blocks.
 *
 * Input is whatever the editor's caption export (or a hand-written draft)
 * looks like: front matter, then lines such as
 *
 * ```text
 * 00;00;01;15 - 00;00;04;02
 * Nナレーション本文
 * ```
 *
 * Timecodes may use full-width digits, a full-width colon, `~`/`〜` as the
 * range separator, or omit the frame field entirely.
 */

use std::iter::Peekable;
use std::str::Lines;

use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::TextBlock;
use super::width::time_to_half_width;
use crate::errors::ScriptError;
use crate::timecode::{TimeRange, Timecode};

/// `HH[:;]MM[:;]SS[;.]FF - HH[:;]MM[:;]SS[;.]FF`, anchored at the line start
static TIME_RANGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([0-9]{2})[:;]([0-9]{2})[:;]([0-9]{2})[;.]([0-9]{2})\s*-\s*([0-9]{2})[:;]([0-9]{2})[:;]([0-9]{2})[;.]([0-9]{2})",
    )
    .unwrap()
});

/// A colon clock, with its frame or sub-second field when one follows
static CLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]{2}:[0-9]{2}:[0-9]{2})([:;.][0-9]{2})?").unwrap()
});

/// Normalize a candidate timecode line: half-width digits and punctuation,
/// `~` as `-`, and `.00` appended to every bare `HH:MM:SS`
pub fn normalize_time_line(line: &str) -> String {
    let half = time_to_half_width(line.trim());
    let with_frames = CLOCK_REGEX.replace_all(&half, |caps: &Captures| {
        if caps.get(2).is_some() {
            caps[0].to_string()
        } else {
            format!("{}.00", &caps[1])
        }
    });
    with_frames.replace('~', "-")
}

/// Match a line against the time-range grammar
pub fn parse_time_range(line: &str) -> Option<TimeRange> {
    let normalized = normalize_time_line(line);
    let caps = TIME_RANGE_REGEX.captures(&normalized)?;

    let field = |i: usize| -> u32 {
        caps.get(i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };

    Some(TimeRange::new(
        Timecode::new(field(1), field(2), field(3), field(4)),
        Timecode::new(field(5), field(6), field(7), field(8)),
    ))
}

/// Lazy sequence of blocks read from pasted text.
///
/// Lines that neither match the grammar nor belong to a block are skipped,
/// so anything before the first timecode line never reaches the output.
/// Cloning the iterator restarts from its current position.
#[derive(Debug, Clone)]
pub struct ScriptBlocks<'a> {
    lines: Peekable<Lines<'a>>,
}

impl<'a> ScriptBlocks<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.trim().lines().peekable(),
        }
    }

    /// Collect body lines up to the next blank line or timecode line
    fn take_body(&mut self) -> String {
        let mut body = Vec::new();
        while let Some(line) = self.lines.peek() {
            if line.trim().is_empty() || parse_time_range(line).is_some() {
                break;
            }
            body.push(*line);
            self.lines.next();
        }
        body.join("\n")
    }
}

impl Iterator for ScriptBlocks<'_> {
    type Item = TextBlock;

    fn next(&mut self) -> Option<TextBlock> {
        while let Some(line) = self.lines.next() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let Some(time_range) = parse_time_range(line) else {
                continue;
            };

            let raw_text = self.take_body();
            return Some(TextBlock::new(time_range, line, raw_text));
        }
        None
    }
}

/// Parse pasted text into blocks.
///
/// Fails only when no line in the whole input matches the time-range grammar.
pub fn parse_script(text: &str) -> Result<Vec<TextBlock>, ScriptError> {
    let blocks: Vec<TextBlock> = ScriptBlocks::new(text).collect();
    if blocks.is_empty() {
        return Err(ScriptError::NoTimecode);
    }

    debug!("Parsed {} script blocks", blocks.len());
    Ok(blocks)
}
