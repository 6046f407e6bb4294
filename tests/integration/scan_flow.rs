//! Contrast scans over loaded viewports.

use breakpoint::a11y::{ContrastLevel, ContrastScanner, DocumentSnapshot, ElementId, ScanLimits};

use super::common::documents::{article, styled, FixtureSubstrate};
use super::common::host::ScriptedHost;
use super::common::{eager_config, harness};

#[test]
fn test_scan_reports_faint_caption_and_skips_cross_origin() {
    let mut h = harness(&eager_config());
    let mut host = ScriptedHost::new(800.0);
    h.workbench
        .restore("?u=https://example.com&w=360px,768px", &mut host);
    let ids: Vec<_> = h.workbench.frames().into_iter().map(|f| f.id).collect();

    let mut substrate = FixtureSubstrate::default().with_document(&ids[0], article());
    let reports = h.workbench.scan(&mut substrate);
    assert_eq!(reports.len(), 1);

    let report = &reports[&ids[0]];
    assert_eq!(report.scanned, 3);
    assert_eq!(report.passed, 2);
    assert_eq!(report.failed, 1);

    let issue = &report.issues[0];
    assert_eq!(issue.sample_text, "Photo credit");
    assert_eq!(issue.level, ContrastLevel::Fail);
    assert_eq!(issue.locator_path, "html > body > main > small");
    assert_eq!(issue.background.to_hex(), "#ffffff");
    assert_eq!(substrate.outlined, vec![(ids[0].clone(), ElementId(5))]);
}

#[test]
fn test_scan_report_serializes_for_the_cli() {
    let report = ContrastScanner::new(ScanLimits::default()).scan_document(&article());
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["failed"], 1);
    assert_eq!(json["issues"][0]["level"], "fail");
    assert_eq!(json["issues"][0]["foreground"], "#cccccc");
    assert!(json["issues"][0].get("element").is_none());
}

#[test]
fn test_snapshot_json_round_trips_through_the_scanner() {
    let raw = r#"{
        "baseBackground": "rgb(0, 0, 0)",
        "elements": [
            {"tag": "body", "style": {"color": "rgb(255, 255, 255)", "backgroundColor": "transparent"}},
            {"tag": "h1", "parent": 0, "text": "Night mode", "style": {"color": "rgb(100, 100, 100)", "fontSize": "32px", "fontWeight": "700"}}
        ]
    }"#;
    let doc: DocumentSnapshot = serde_json::from_str(raw).unwrap();
    let report = ContrastScanner::default().scan_document(&doc);
    assert_eq!(report.scanned, 1);
    assert_eq!(report.passed, 1);
}

#[test]
fn test_element_budget_limits_the_scan() {
    let mut doc = DocumentSnapshot::new();
    for i in 0..10 {
        doc.push("p", None, &format!("line {i}"), styled("#999999", "#ffffff"));
    }
    let limits = ScanLimits {
        max_elements: 4,
        ..ScanLimits::default()
    };
    let report = ContrastScanner::new(limits).scan_document(&doc);
    assert_eq!(report.scanned, 4);
    assert_eq!(report.failed, 4);
    assert_eq!(report.issues[1].locator_path, "p:nth-of-type(2)");
}
