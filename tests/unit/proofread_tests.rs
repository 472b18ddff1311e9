/*!
 * Tests for the proofreading round trip: prompt, result mapping and cache
 */

use syncraft::proofread::mapper::{NO_FINDINGS_MESSAGE, NO_ISSUES_SENTINEL};
use syncraft::proofread::{PromptTemplate, ProofreadCache, map_response, proofread_script};
use syncraft::providers::MockProofreader;
use syncraft::script::{AiBlock, HighlightSet, RenderOptions, convert_script};

use crate::common;

fn labels() -> Vec<String> {
    vec!["０００１".to_string(), "０００４".to_string(), "００１０半".to_string()]
}

#[test]
fn test_prompt_render_shouldNumberBlocksFromOne() {
    let template = PromptTemplate::new("校正:\n{blocks}\n以上");
    let blocks = vec![
        AiBlock { time: "00;00;01;00 - 00;00;02;00".to_string(), text: "一".to_string() },
        AiBlock { time: "00;00;03;00 - 00;00;04;00".to_string(), text: "二".to_string() },
    ];

    assert_eq!(template.render(&blocks), "校正:\nNo.1: 一\nNo.2: 二\n以上");
}

#[test]
fn test_default_prompt_shouldContainPlaceholderAndSentinel() {
    assert!(PromptTemplate::PROOFREADER.contains("{blocks}"));
    assert!(PromptTemplate::PROOFREADER.contains(NO_ISSUES_SENTINEL));
}

#[test]
fn test_map_response_withTable_shouldHighlightAndRelabel() {
    let response = "以下の通りです。\n\n| No. | 修正提案 | 理由 |\n|---|---|---|\n| 2 | 天気 → 天候 | 表記の揺れ |\n| 3 | ABC → ＡＢＣ | 全角の誤り |\n| No.1 | 見出し行 | 無視される |";
    let report = map_response(response, &labels());

    let expected: HighlightSet = [1, 2].into_iter().collect();
    assert_eq!(report.highlights, expected);
    assert_eq!(report.findings.len(), 2);
    assert_eq!(report.findings[0].start_time, "０００４");
    assert_eq!(report.findings[0].suggestion, "天気 → 天候");
    assert_eq!(
        report.display_text,
        "| タイム | 修正提案 | 理由 |\n|---|---|---|\n| ０００４ | 天気 → 天候 | 表記の揺れ |\n| ００１０半 | ABC → ＡＢＣ | 全角の誤り |"
    );
}

#[test]
fn test_map_response_withFullWidthNumbers_shouldHighlightBlocks() {
    let response = "| No. | 修正提案 | 理由 |\n|---|---|---|\n| ３ | 以外 → 意外 | 変換ミス |\n| １ | 今日わ → 今日は | 誤字 |";
    let report = map_response(response, &labels());

    let expected: HighlightSet = [0, 2].into_iter().collect();
    assert_eq!(report.highlights, expected);
    assert_eq!(
        report.display_text,
        "| タイム | 修正提案 | 理由 |\n|---|---|---|\n| ００１０半 | 以外 → 意外 | 変換ミス |\n| ０００１ | 今日わ → 今日は | 誤字 |"
    );
}

#[test]
fn test_map_response_withSentinel_shouldPassThroughUnchanged() {
    let response = format!("{}。", NO_ISSUES_SENTINEL);
    let report = map_response(&response, &labels());

    assert!(report.highlights.is_empty());
    assert_eq!(report.display_text, response);
}

#[test]
fn test_map_response_withOutOfRangeRows_shouldReportNoFindings() {
    let response = "| No. | 修正提案 | 理由 |\n|---|---|---|\n| 9 | x | y |\n| abc | x | y |";
    let report = map_response(response, &labels());

    assert!(report.highlights.is_empty());
    assert!(report.findings.is_empty());
    assert_eq!(report.display_text, NO_FINDINGS_MESSAGE);
}

#[test]
fn test_map_response_withEmptyResponse_shouldHighlightNothing() {
    let report = map_response("  ", &labels());
    assert!(report.highlights.is_empty());
    assert!(report.findings.is_empty());
}

#[test]
fn test_cache_withSameInput_shouldHit() {
    let cache = ProofreadCache::new();
    assert!(cache.get("原稿").is_none());

    cache.store("原稿", "結果");
    assert_eq!(cache.get("  原稿\n"), Some("結果".to_string()));

    let (hits, misses, hit_rate) = cache.stats();
    assert_eq!(hits, 1);
    assert_eq!(misses, 1);
    assert!((hit_rate - 0.5).abs() < f64::EPSILON);
}

#[test]
fn test_cache_withChangedInput_shouldInvalidateSlot() {
    let cache = ProofreadCache::new();
    cache.store("原稿A", "結果A");

    assert!(cache.get("原稿B").is_none());
    assert!(cache.is_empty());
    assert!(cache.get("原稿A").is_none());
}

#[test]
fn test_cache_invalidate_shouldEmptySlot() {
    let cache = ProofreadCache::new();
    cache.store("原稿", "結果");
    cache.invalidate();
    assert!(cache.is_empty());
}

#[test]
fn test_cache_key_for_shouldIgnoreSurroundingWhitespace() {
    assert_eq!(ProofreadCache::key_for("abc"), ProofreadCache::key_for("\n abc \t"));
    assert_ne!(ProofreadCache::key_for("abc"), ProofreadCache::key_for("abd"));
    assert_eq!(ProofreadCache::key_for("abc").len(), 64);
}

#[test]
fn test_proofread_script_withCachedResult_shouldCallServiceOnce() {
    let mock = MockProofreader::with_response("| 1 | こんにちは → こんばんは | 時間帯 |");
    let cache = ProofreadCache::new();
    let template = PromptTemplate::default();
    let first_pass = convert_script(common::SAMPLE_SCRIPT, &RenderOptions::default(), &HighlightSet::new());

    let first = tokio_test::block_on(proofread_script(&mock, &cache, &template, common::SAMPLE_SCRIPT, &first_pass));
    let second = tokio_test::block_on(proofread_script(&mock, &cache, &template, common::SAMPLE_SCRIPT, &first_pass));

    assert_eq!(mock.request_count(), 1);
    assert_eq!(first, second);
    assert!(first.highlights.contains(&0));

    let prompt = mock.last_prompt().unwrap();
    assert!(prompt.contains("No.1: Nこんにちは"));
    assert!(prompt.contains("No.3: ｎ：まとめ ABC 123"));
}

#[test]
fn test_proofread_script_withFailingService_shouldReportErrorAndCacheNothing() {
    let mock = MockProofreader::failing();
    let cache = ProofreadCache::new();
    let first_pass = convert_script(common::SAMPLE_SCRIPT, &RenderOptions::default(), &HighlightSet::new());

    let report = tokio_test::block_on(proofread_script(
        &mock,
        &cache,
        &PromptTemplate::default(),
        common::SAMPLE_SCRIPT,
        &first_pass,
    ));

    assert!(report.highlights.is_empty());
    assert!(report.display_text.starts_with("Proofreading service error:"));
    assert!(cache.is_empty());
}

#[test]
fn test_proofread_script_withNoBlocks_shouldNotCallService() {
    let mock = MockProofreader::clean();
    let first_pass = convert_script("メモだけ", &RenderOptions::default(), &HighlightSet::new());

    let report = tokio_test::block_on(proofread_script(
        &mock,
        &ProofreadCache::new(),
        &PromptTemplate::default(),
        "メモだけ",
        &first_pass,
    ));

    assert_eq!(mock.request_count(), 0);
    assert!(report.display_text.is_empty());
}
