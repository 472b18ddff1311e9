/*!
 * Half-width / full-width character mapping.
 *
 * Narration scripts are typeset entirely in full-width forms. Pasted timecodes
 * arrive in either width and are normalized to ASCII before matching.
 */

/// Offset between ASCII `!`..=`~` and the Fullwidth Forms block
const FULL_WIDTH_OFFSET: u32 = 0xFEE0;

/// Ideographic space, the full-width counterpart of U+0020
pub const FULL_WIDTH_SPACE: char = '\u{3000}';

/// Half-width symbols that body text converts alongside letters and digits
const CONVERTED_SYMBOLS: &str = "!@#$%&-+=";

/// Map one ASCII character onto its full-width form
fn widen(c: char) -> char {
    char::from_u32(c as u32 + FULL_WIDTH_OFFSET).unwrap_or(c)
}

/// Convert ASCII digits to full-width digits, leaving everything else alone
pub fn digits_to_full_width(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_digit() { widen(c) } else { c })
        .collect()
}

/// Convert body text to full-width.
///
/// Latin letters, digits, the half-width space and `!@#$%&-+=` are mapped;
/// every other character passes through unchanged.
pub fn to_full_width(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            ' ' => FULL_WIDTH_SPACE,
            c if c.is_ascii_alphanumeric() || CONVERTED_SYMBOLS.contains(c) => widen(c),
            c => c,
        })
        .collect()
}

/// Bring a timecode line to ASCII form: full-width digits and colon become
/// half-width, and both wave dash and full-width tilde become `~`
pub fn time_to_half_width(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - FULL_WIDTH_OFFSET).unwrap_or(c),
            '：' => ':',
            '〜' | '～' => '~',
            c => c,
        })
        .collect()
}

/// Half-width space or ideographic space
pub fn is_blank(c: char) -> bool {
    c == ' ' || c == FULL_WIDTH_SPACE
}

/// Trim half-width and ideographic spaces from both ends
pub fn trim_blanks(text: &str) -> &str {
    text.trim_matches(is_blank)
}
