/*!
 * Mapping of proofreading results back onto script blocks.
 *
 * The service answers in free text that should contain a table such as
 *
 * ```text
 * | No. | 修正提案 | 理由 |
 * |---|---|---|
 * | 3 | 以外 → 意外 | 変換ミス |
 * ```
 *
 * Rows are keyed by the 1-based block number from the request, in either
 * half- or full-width digits. The mapper
 * turns them into block indices for highlighting and rewrites the table with
 * each block's rendered start label in place of its number.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::script::HighlightSet;
use crate::script::width::time_to_half_width;

/// Phrase the service answers with when it finds nothing
pub const NO_ISSUES_SENTINEL: &str = "問題ありませんでした";

/// Shown when the response had rows but none of them named a known block
pub const NO_FINDINGS_MESSAGE: &str = "AIによる指摘事項はありませんでした。";

/// Label of the number column in the request's table
const NUMBER_COLUMN_LABEL: &str = "No.";

const REPORT_HEADER: &str = "| タイム | 修正提案 | 理由 |\n|---|---|---|";

static NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());

/// One row of the service's table, resolved to a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Zero-based block index
    pub index: usize,
    /// Rendered start label of the block
    pub start_time: String,
    pub suggestion: String,
    pub reason: String,
}

/// What the caller shows and highlights after a proofreading round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProofreadReport {
    pub highlights: HighlightSet,
    pub findings: Vec<Finding>,
    /// Markdown to display next to the script
    pub display_text: String,
}

/// Map a proofreading response onto the blocks whose labels are `start_times`.
///
/// An empty response or one containing the no-issues sentinel is displayed
/// as-is with nothing highlighted.
pub fn map_response(response: &str, start_times: &[String]) -> ProofreadReport {
    if response.trim().is_empty() || response.contains(NO_ISSUES_SENTINEL) {
        return ProofreadReport {
            display_text: response.to_string(),
            ..Default::default()
        };
    }

    let findings: Vec<Finding> = response
        .lines()
        .filter_map(|line| parse_row(line, start_times))
        .collect();

    debug!("Proofreading response mapped to {} findings", findings.len());

    let highlights = findings.iter().map(|f| f.index).collect();
    let display_text = if findings.is_empty() {
        NO_FINDINGS_MESSAGE.to_string()
    } else {
        let rows: Vec<String> = findings
            .iter()
            .map(|f| format!("| {} | {} | {} |", f.start_time, f.suggestion, f.reason))
            .collect();
        format!("{}\n{}", REPORT_HEADER, rows.join("\n"))
    };

    ProofreadReport {
        highlights,
        findings,
        display_text,
    }
}

/// Parse one table row; header, separator and malformed rows yield `None`
fn parse_row(line: &str, start_times: &[String]) -> Option<Finding> {
    let line = line.trim();
    if !line.starts_with('|') || line.contains("---") || line.contains(NUMBER_COLUMN_LABEL) {
        return None;
    }

    let cells: Vec<&str> = line.trim_matches('|').split('|').map(str::trim).collect();
    if cells.len() < 3 {
        return None;
    }

    let number_cell = time_to_half_width(cells[0]);
    let number: usize = NUMBER_REGEX.find(&number_cell)?.as_str().parse().ok()?;
    let index = number.checked_sub(1)?;
    let start_time = start_times.get(index)?;

    Some(Finding {
        index,
        start_time: start_time.clone(),
        suggestion: cells[1].to_string(),
        reason: cells[2].to_string(),
    })
}
