/*!
 * Tests for sequence XML import
 */

use syncraft::errors::ProjectFileError;
use syncraft::project_file::ProjectFileParser;
use syncraft::script::parse_script;
use syncraft::timecode::Timecode;

use crate::common::{self, TestClip};

#[test]
fn test_parse_withTwoClips_shouldProduceBlocksInDocumentOrder() {
    let xml = common::sequence_xml(&[
        TestClip::new(90, 180, "h1", Some("一つ目")),
        TestClip::new(300, 450, "h2", Some("二つ目")),
    ]);

    let project = ProjectFileParser::default().parse(&xml).unwrap();

    assert_eq!(project.blocks.len(), 2);
    assert_eq!(project.blocks[0].time_label, "00;00;03;00 - 00;00;06;00");
    assert_eq!(project.blocks[0].raw_text, "一つ目");
    assert_eq!(project.blocks[1].time_label, "00;00;10;00 - 00;00;15;00");
    assert_eq!(project.blocks[1].raw_text, "二つ目");
    assert!(project.rate.is_some_and(|rate| rate.is_drop_frame()));
}

#[test]
fn test_parse_withDoctypeDeclaration_shouldAcceptEditorExport() {
    let xml = common::sequence_xml(&[TestClip::new(90, 180, "h1", Some("字幕"))]);
    assert!(xml.contains("<!DOCTYPE xmeml>"));

    let project = ProjectFileParser::default().parse(&xml).unwrap();

    assert_eq!(project.blocks.len(), 1);
    assert_eq!(project.blocks[0].raw_text, "字幕");
}

#[test]
fn test_parse_withHugeFrameCounts_shouldSaturateInsteadOfOverflowing() {
    let xml = common::sequence_xml(&[TestClip::new(i64::MAX - 1, i64::MAX, "h1", Some("字幕"))]);

    let project = ProjectFileParser::default().parse(&xml).unwrap();

    let range = project.blocks[0].time_range;
    assert_eq!(range.start.hours, u32::MAX);
    assert_eq!(range.end.hours, u32::MAX);
    assert_ne!(range.end, Timecode::default());
}

#[test]
fn test_parse_withSharedHash_shouldReuseFirstPayload() {
    let xml = common::sequence_xml(&[
        TestClip::new(0, 60, "same", Some("最初")),
        TestClip::new(120, 180, "same", None),
        TestClip::new(240, 300, "same", Some("後から")),
    ]);

    let project = ProjectFileParser::default().parse(&xml).unwrap();

    let texts: Vec<&str> = project.blocks.iter().map(|b| b.raw_text.as_str()).collect();
    assert_eq!(texts, vec!["最初", "最初", "最初"]);
}

#[test]
fn test_parse_withUndecodableCaption_shouldSkipClip() {
    let xml = common::sequence_xml(&[
        TestClip::new(0, 60, "good", Some("残る")),
        TestClip::new(120, 180, "orphan", None),
    ]);

    let project = ProjectFileParser::default().parse(&xml).unwrap();

    assert_eq!(project.blocks.len(), 1);
    assert_eq!(project.blocks[0].raw_text, "残る");
}

#[test]
fn test_parse_withMalformedXml_shouldFail() {
    let result = ProjectFileParser::default().parse("<xmeml><sequence>");
    assert!(matches!(result, Err(ProjectFileError::Malformed(_))));
}

#[test]
fn test_parse_withNoCaptionClips_shouldFail() {
    let xml = common::sequence_xml(&[TestClip::new(0, 60, "orphan", None)]);
    let result = ProjectFileParser::default().parse(&xml);
    assert_eq!(result.unwrap_err(), ProjectFileError::NoCaptions);
}

#[test]
fn test_parse_withOtherParameterId_shouldFindNothing() {
    let xml = common::sequence_xml(&[TestClip::new(0, 60, "h1", Some("字幕"))]);
    let parser = ProjectFileParser::new("99", "KozMinPro-Regular");
    assert!(parser.parse(&xml).is_err());
}

#[test]
fn test_parse_to_script_text_shouldFeedScriptParser() {
    let xml = common::sequence_xml(&[
        TestClip::new(90, 180, "h1", Some("一つ目")),
        TestClip::new(17982, 18100, "h2", Some("十分後")),
    ]);

    let text = ProjectFileParser::default().parse_to_script_text(&xml);
    assert_eq!(
        text,
        "00;00;03;00 - 00;00;06;00\n一つ目\n\n00;10;00;00 - 00;10;03;28\n十分後"
    );

    let blocks = parse_script(&text).unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[1].raw_text, "十分後");
}

#[test]
fn test_parse_to_script_text_withMalformedXml_shouldReturnErrorMessage() {
    let text = ProjectFileParser::default().parse_to_script_text("not xml");
    assert!(text.starts_with("Error: failed to parse the XML file"));
}
