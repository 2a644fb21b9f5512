//! Integration tests for taxonomy navigation against the bundled dataset

use career_dashboard::core::calendar::YearMonth;
use career_dashboard::core::config::AppConfig;
use career_dashboard::core::error::PortfolioError;
use career_dashboard::core::types::{BranchId, GroupId, SkillId, TaxonomyLevel};
use career_dashboard::data::loader::Dataset;
use career_dashboard::data::taxonomy::SkillLocation;
use career_dashboard::skills::aggregate::Aggregator;
use career_dashboard::skills::resolution::JumpTarget;
use career_dashboard::ui::{Action, Focus, NavLevel, Navigator, Session};

fn today() -> YearMonth {
    YearMonth::new(2026, 10).unwrap()
}

fn paid_social() -> SkillLocation {
    SkillLocation {
        branch: BranchId::new("growth"),
        group: GroupId::new("paid-growth"),
        skill: SkillId::new("paid-social"),
    }
}

/// Drill down growth → paid growth → paid social → Meta Ads
#[test]
fn test_full_drill_down() {
    let dataset = Dataset::bundled().unwrap();
    let taxonomy = dataset.taxonomy();
    let mut navigator = Navigator::new();
    navigator.open();
    assert_eq!(navigator.level(), NavLevel::BranchList);

    navigator.select_branch(taxonomy, &BranchId::new("growth")).unwrap();
    assert_eq!(navigator.level(), NavLevel::GroupList);
    navigator.select_group(taxonomy, &GroupId::new("paid-growth")).unwrap();
    assert_eq!(navigator.level(), NavLevel::SkillList);
    navigator.select_skill(taxonomy, &SkillId::new("paid-social")).unwrap();
    assert_eq!(navigator.level(), NavLevel::SkillDetail);
    navigator.toggle_tool(taxonomy, "Meta Ads").unwrap();
    assert_eq!(navigator.level(), NavLevel::SkillDetail);

    let labels: Vec<String> = navigator
        .breadcrumbs(taxonomy)
        .into_iter()
        .map(|crumb| crumb.label)
        .collect();
    assert_eq!(labels, vec!["Growth", "Paid Growth", "Paid Social", "Meta Ads"]);

    let aggregator = Aggregator::new(&dataset, today());
    let with_tool = aggregator.view(navigator.selection()).unwrap();
    navigator.toggle_tool(taxonomy, "Meta Ads").unwrap();
    let skill_only = aggregator.view(navigator.selection()).unwrap();

    let with_tool = with_tool.filtered.unwrap();
    let skill_only = skill_only.filtered.unwrap();
    assert!(!with_tool.matches.is_empty());
    assert!(with_tool.matches.iter().all(|id| skill_only.matches.contains(id)));
    assert!(with_tool.total_months <= skill_only.total_months);
}

#[test]
fn test_reselect_and_breadcrumbs_step_back() {
    let dataset = Dataset::bundled().unwrap();
    let taxonomy = dataset.taxonomy();
    let mut navigator = Navigator::new();
    navigator.jump_to_location(taxonomy, &paid_social()).unwrap();
    assert_eq!(navigator.level(), NavLevel::SkillDetail);

    navigator.activate_breadcrumb(TaxonomyLevel::Branch);
    assert_eq!(navigator.level(), NavLevel::GroupList);
    assert!(navigator.selection().group().is_none());

    // clicking the selected branch again collapses to the branch list
    navigator.select_branch(taxonomy, &BranchId::new("growth")).unwrap();
    assert_eq!(navigator.level(), NavLevel::BranchList);

    navigator.step_back();
    assert_eq!(navigator.level(), NavLevel::Closed);
}

#[test]
fn test_unknown_nodes_leave_state_untouched() {
    let dataset = Dataset::bundled().unwrap();
    let taxonomy = dataset.taxonomy();
    let mut navigator = Navigator::new();
    navigator.open();
    navigator.select_branch(taxonomy, &BranchId::new("growth")).unwrap();
    let before = navigator.clone();

    let err = navigator.select_group(taxonomy, &GroupId::new("system-design")).unwrap_err();
    assert!(matches!(
        err,
        PortfolioError::UnknownTaxonomyNode {
            level: TaxonomyLevel::Group,
            ..
        }
    ));
    assert_eq!(navigator, before);

    let bogus = JumpTarget::Tool {
        location: paid_social(),
        tool: "Ahrefs".to_string(),
    };
    assert!(navigator.jump_to(taxonomy, &bogus).is_err());
    assert_eq!(navigator, before);
}

#[test]
fn test_session_nav_items_and_meters() {
    let dataset = Dataset::bundled().unwrap();
    let mut session = Session::with_clock(&dataset, &AppConfig::default(), today);
    session.apply(Action::OpenNavigator);
    assert_eq!(session.focus(), Focus::Navigator);

    let branches = session.nav_items();
    let ids: Vec<&str> = branches.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["product", "growth", "ops"]);
    assert!(branches.iter().any(|item| item.fill == 1.0));
    assert!(branches.iter().all(|item| (0.0..=1.0).contains(&item.fill)));

    // move to "growth" and select it
    session.apply(Action::CursorDown);
    session.apply(Action::Activate);
    assert_eq!(session.navigator().level(), NavLevel::GroupList);
    assert_eq!(session.navigator().selection().branch().map(|b| b.as_str()), Some("growth"));
    assert!(session.view().is_union_consistent());

    let groups = session.nav_items();
    assert!(groups.iter().all(|item| item.level == TaxonomyLevel::Group));

    session.apply(Action::Back);
    assert_eq!(session.navigator().level(), NavLevel::BranchList);
    assert_eq!(session.visible().len(), dataset.len());
}

#[test]
fn test_session_jump_to_tool_filters_timeline() {
    let dataset = Dataset::bundled().unwrap();
    let mut session = Session::with_clock(&dataset, &AppConfig::default(), today);
    session.jump(&JumpTarget::Tool {
        location: paid_social(),
        tool: "Meta Ads".to_string(),
    });

    assert_eq!(session.navigator().level(), NavLevel::SkillDetail);
    assert_eq!(session.navigator().selection().tool(), Some("Meta Ads"));
    let filtered = session.view().filter_set().unwrap();
    assert_eq!(session.visible().len(), filtered.len());
    for id in session.visible() {
        let record = dataset.experience(id).unwrap();
        assert!(record
            .sections
            .iter()
            .any(|(_, section)| section.has_skill("Paid Social") && section.has_tool("Meta Ads")));
    }
}
