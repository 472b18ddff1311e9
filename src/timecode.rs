/*!
 * Drop-frame timecode handling.
 *
 * Editor project files store clip positions as plain frame counts on a
 * 29.97 fps timeline. Scripts want broadcast drop-frame timecode, written
 * `HH;MM;SS;FF` with semicolons to set it apart from colon-separated
 * non-drop notation.
 */

use std::fmt;

/// Nominal frame rate of the drop-frame grid
pub const NOMINAL_FRAME_RATE: u32 = 30;

/// Real frames in one ten-minute span (the first minute keeps all its numbers)
const FRAMES_PER_10_MINUTES: i64 = 17982;

/// Real frames in a minute that drops two frame numbers
const FRAMES_PER_DROP_MINUTE: i64 = 1798;

/// A single point on the 30 fps nominal grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timecode {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    /// Frame number within the second, 0..=29
    pub frames: u32,
}

impl Timecode {
    /// Create a timecode from its four fields
    pub fn new(hours: u32, minutes: u32, seconds: u32, frames: u32) -> Self {
        Self { hours, minutes, seconds, frames }
    }

    /// Convert a real frame count into drop-frame timecode.
    ///
    /// Every ten-minute span holds 17982 real frames. Inside a span the first
    /// minute keeps all frame numbers and each later minute skips numbers 0
    /// and 1. Skipped numbers are added back to get a non-drop count, which is
    /// then split at exactly 30 frames per second. Negative input yields zero,
    /// hours accumulate without a day rollover and saturate at `u32::MAX`.
    pub fn from_frames(total_frames: i64) -> Self {
        if total_frames < 0 {
            return Self::default();
        }

        let chunks_10 = total_frames / FRAMES_PER_10_MINUTES;
        let remainder = total_frames % FRAMES_PER_10_MINUTES;
        let chunks_1 = (remainder / FRAMES_PER_DROP_MINUTE).min(9);

        let dropped = 18 * chunks_10 + 2 * chunks_1;
        // Absurd frame counts saturate instead of wrapping
        let non_drop = total_frames.saturating_add(dropped);

        let rate = i64::from(NOMINAL_FRAME_RATE);
        let frames = non_drop % rate;
        let total_seconds = non_drop / rate;
        let seconds = total_seconds % 60;
        let total_minutes = total_seconds / 60;
        let minutes = total_minutes % 60;
        let hours = total_minutes / 60;

        Self {
            hours: u32::try_from(hours).unwrap_or(u32::MAX),
            minutes: minutes as u32,
            seconds: seconds as u32,
            frames: frames as u32,
        }
    }

    /// Position on the nominal grid counted in frames, 30 per second
    pub fn nominal_frames(&self) -> i64 {
        let seconds = (i64::from(self.hours) * 60 + i64::from(self.minutes)) * 60
            + i64::from(self.seconds);
        seconds * i64::from(NOMINAL_FRAME_RATE) + i64::from(self.frames)
    }

    /// Elapsed time in seconds, frames counted as fractions of a 30 fps second
    pub fn total_seconds(&self) -> f64 {
        f64::from(self.hours) * 3600.0
            + f64::from(self.minutes) * 60.0
            + f64::from(self.seconds)
            + f64::from(self.frames) / f64::from(NOMINAL_FRAME_RATE)
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02};{:02};{:02};{:02}",
            self.hours, self.minutes, self.seconds, self.frames
        )
    }
}

/// Convert a frame count to its `HH;MM;SS;FF` drop-frame string
pub fn frames_to_timecode(total_frames: i64) -> String {
    Timecode::from_frames(total_frames).to_string()
}

/// Start and end of a caption or narration block.
///
/// The end is expected to lie at or after the start, but nothing downstream
/// relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeRange {
    pub start: Timecode,
    pub end: Timecode,
}

impl TimeRange {
    pub fn new(start: Timecode, end: Timecode) -> Self {
        Self { start, end }
    }

    /// Build a range from the frame counts stored in a project file
    pub fn from_frames(start_frames: i64, end_frames: i64) -> Self {
        Self {
            start: Timecode::from_frames(start_frames),
            end: Timecode::from_frames(end_frames),
        }
    }

    /// Nominal frames of silence between the end of this range and `next_start`.
    /// Negative when the next block starts before this one ends.
    pub fn gap_frames_to(&self, next_start: &Timecode) -> i64 {
        next_start.nominal_frames() - self.end.nominal_frames()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}
