//! Integration tests for the bundled dataset, timeline order and background

use std::time::Duration;

use career_dashboard::core::calendar::YearMonth;
use career_dashboard::core::config::AppConfig;
use career_dashboard::core::error::PortfolioError;
use career_dashboard::data::loader::Dataset;
use career_dashboard::data::validation::{validate, Finding};
use career_dashboard::ui::{timeline, timeline_entries, AmbientBackground, BlobFrame, Session};

fn today() -> YearMonth {
    YearMonth::new(2026, 10).unwrap()
}

#[test]
fn test_bundled_dataset_is_clean() {
    let dataset = Dataset::bundled().unwrap();
    assert_eq!(dataset.len(), 11);
    assert_eq!(dataset.taxonomy().branches().len(), 3);

    let report = validate(&dataset, today());
    assert!(report.is_clean(), "unexpected findings: {:?}", report.findings);
    assert_eq!(report.experiences_checked, 11);
}

#[test]
fn test_timeline_is_descending_and_stable() {
    let dataset = Dataset::bundled().unwrap();
    let records = timeline(&dataset, None, today());
    let ids: Vec<&str> = records.iter().map(|record| record.id.as_str()).collect();

    assert_eq!(ids.first(), Some(&"boring-business"));
    assert_eq!(ids.last(), Some(&"early-seo-roots"));

    // same start month: authored order wins
    let media = ids.iter().position(|id| *id == "digitopia-media").unwrap();
    let pm = ids.iter().position(|id| *id == "digitopia-pm").unwrap();
    assert_eq!(pm, media + 1);

    let entries = timeline_entries(&dataset, None, today());
    assert_eq!(entries.len(), dataset.len());
    assert_eq!(entries[0].period, "Jan 2026 – Present");
}

#[test]
fn test_findings_for_broken_dataset() {
    let dataset = Dataset::from_toml_strs(
        r#"
[[experiences]]
id = "broken"
title = "Broken"
org = "Org"
role = "Role"
start = "2020-01"
end = "Jan 2019"
category = "personal"
summary = "Summary."

[experiences.sections.growth]
skills = ["Paid Social", "Juggling"]
tools = ["Abacus"]
"#,
        r#"
[[branches]]
id = "growth"
name = "Growth"
description = "Demand."

[[branches.groups]]
id = "paid-growth"
name = "Paid Growth"
description = "Paid media."

[[branches.groups.skills]]
id = "paid-social"
name = "Paid Social"
description = "Social ads."
tools = ["Meta Ads"]
"#,
        "",
    )
    .unwrap();

    let report = validate(&dataset, today());
    assert!(!report.is_clean());
    assert!(report
        .findings
        .iter()
        .any(|finding| matches!(finding, Finding::UnresolvedSkill { name, .. } if name == "Juggling")));
    assert!(report
        .findings
        .iter()
        .any(|finding| matches!(finding, Finding::UnresolvedTool { name, .. } if name == "Abacus")));
    assert!(report
        .findings
        .iter()
        .any(|finding| matches!(finding, Finding::UnparseablePeriod { .. })));
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let record = r#"
[[experiences]]
id = "twice"
title = "Twice"
org = "Org"
role = "Role"
start = "Jan 2020"
end = "Present"
category = "personal"
summary = "Summary."
"#;
    let taxonomy = r#"
[[branches]]
id = "growth"
name = "Growth"
description = "Demand."
"#;
    let err = Dataset::from_toml_strs(&format!("{record}{record}"), taxonomy, "").unwrap_err();
    match err {
        PortfolioError::InvalidDataset(problems) => {
            assert!(problems.iter().any(|problem| problem.contains("twice")));
        }
        other => panic!("expected InvalidDataset, got {other:?}"),
    }
}

#[test]
fn test_reduced_motion_renders_once() {
    let mut background = AmbientBackground::new(true);
    assert!(background.tick(0).is_some());
    for elapsed in (50..60_000).step_by(50) {
        assert!(background.tick(elapsed).is_none());
    }
    assert_eq!(background.frames_rendered(), 1);
    assert_eq!(background.current(), Some(&BlobFrame::initial()));
}

#[test]
fn test_animated_background_changes_over_time() {
    let mut background = AmbientBackground::new(false);
    let first = background.tick(0).cloned().unwrap();
    let later = background.tick(10_000).cloned().unwrap();
    assert_ne!(first, later);
    assert_eq!(background.frames_rendered(), 2);

    let svg = later.to_svg();
    assert!(svg.starts_with("<svg"));
    assert_eq!(svg.matches("<path").count(), 4);
}

#[test]
fn test_session_frame_loop_with_motion() {
    let dataset = Dataset::bundled().unwrap();
    let config = AppConfig {
        highlight_interval_ms: 200,
        ..AppConfig::default()
    };
    let mut session = Session::with_clock(&dataset, &config, today);
    let dt = Duration::from_millis(50);
    for frame in 0..5u32 {
        assert!(session.on_frame(dt * frame, dt));
    }
    assert_eq!(session.background().frames_rendered(), 5);
    if session.carousel().len() > 1 {
        assert_eq!(session.carousel().index(), 1);
    }
}
