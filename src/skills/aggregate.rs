//! Per-level aggregation for the comparative meters
//!
//! Each taxonomy level that is currently expanded gets its own row of meters:
//! every branch always, the groups of the selected branch, the skills of the
//! selected group, and the tools of the selected skill. A meter carries the
//! node's match set, its deduplicated month total and the largest total among
//! its siblings (the bar's 100% mark).
//!
//! Parent and child meters are computed independently from their own skill
//! scopes. A branch's match set must still equal the union of its groups'
//! match sets (and a group's the union of its skills'); debug builds check
//! this after each view and log a warning on mismatch.

use ahash::AHashSet;
use serde::Serialize;

use crate::core::calendar::YearMonth;
use crate::core::error::{PortfolioError, Result};
use crate::core::types::TaxonomyLevel;
use crate::data::loader::Dataset;
use crate::data::taxonomy::{Branch, Skill, SkillGroup};
use crate::skills::display::meter_fill;
use crate::skills::matching::{matching_experience_ids, total_months, MatchSet};
use crate::skills::selection::FilterSelection;

/// Match set with its month total
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregate {
    pub matches: MatchSet,
    pub total_months: u32,
}

/// One bar in a meter row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeMeter {
    /// Taxonomy id, or the tool name for tool meters
    pub id: String,
    pub label: String,
    pub matches: MatchSet,
    pub total_months: u32,
    pub max_months_among_siblings: u32,
    pub selected: bool,
}

impl NodeMeter {
    /// Bar fill in 0.0..=1.0
    pub fn fill(&self) -> f32 {
        meter_fill(self.total_months, self.max_months_among_siblings)
    }
}

/// Sibling meters at one level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelMeters {
    pub level: TaxonomyLevel,
    pub meters: Vec<NodeMeter>,
}

impl LevelMeters {
    fn new(level: TaxonomyLevel, nodes: Vec<(String, String, Aggregate, bool)>) -> Self {
        let max = nodes
            .iter()
            .map(|(_, _, aggregate, _)| aggregate.total_months)
            .max()
            .unwrap_or(0);
        let meters = nodes
            .into_iter()
            .map(|(id, label, aggregate, selected)| NodeMeter {
                id,
                label,
                matches: aggregate.matches,
                total_months: aggregate.total_months,
                max_months_among_siblings: max,
                selected,
            })
            .collect();
        Self { level, meters }
    }

    pub fn max_months(&self) -> u32 {
        self.meters.first().map(|m| m.max_months_among_siblings).unwrap_or(0)
    }

    pub fn selected(&self) -> Option<&NodeMeter> {
        self.meters.iter().find(|meter| meter.selected)
    }

    /// Union of every sibling's match set
    pub fn union(&self) -> MatchSet {
        self.meters
            .iter()
            .fold(MatchSet::new(), |acc, meter| acc.union(&meter.matches))
    }
}

/// Everything the page shows for one selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationView {
    pub selection: FilterSelection,
    pub branches: LevelMeters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<LevelMeters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<LevelMeters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<LevelMeters>,
    /// Skill (or skill+tool) result; `None` until a skill is selected
    pub filtered: Option<Aggregate>,
}

/// Computes aggregates against a dataset as of a given month
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    dataset: &'a Dataset,
    today: YearMonth,
}

impl<'a> Aggregator<'a> {
    pub fn new(dataset: &'a Dataset, today: YearMonth) -> Self {
        Self { dataset, today }
    }

    pub fn today(&self) -> YearMonth {
        self.today
    }

    /// Match set and months for an arbitrary scope
    pub fn aggregate(&self, scope: &AHashSet<&str>, tool: Option<&str>) -> Aggregate {
        let matches = matching_experience_ids(self.dataset.experiences(), scope, tool);
        let total_months = total_months(self.dataset, matches.iter(), self.today);
        Aggregate {
            matches,
            total_months,
        }
    }

    pub fn branch(&self, branch: &Branch) -> Aggregate {
        self.aggregate(&branch.skill_names(), None)
    }

    pub fn group(&self, group: &SkillGroup) -> Aggregate {
        self.aggregate(&group.skill_names(), None)
    }

    pub fn skill(&self, skill: &Skill, tool: Option<&str>) -> Aggregate {
        let scope: AHashSet<&str> = std::iter::once(skill.name.as_str()).collect();
        self.aggregate(&scope, tool)
    }

    /// Compute every expanded meter row plus the filtered result
    ///
    /// Fails with `UnknownTaxonomyNode` when the selection names ids that are
    /// not in the taxonomy.
    pub fn view(&self, selection: &FilterSelection) -> Result<AggregationView> {
        let taxonomy = self.dataset.taxonomy();

        let branch = selection
            .branch()
            .map(|id| {
                taxonomy
                    .branch(id)
                    .ok_or_else(|| PortfolioError::unknown_node(TaxonomyLevel::Branch, id.as_str()))
            })
            .transpose()?;
        let group = match (branch, selection.group()) {
            (Some(branch), Some(id)) => Some(
                branch
                    .group(id)
                    .ok_or_else(|| PortfolioError::unknown_node(TaxonomyLevel::Group, id.as_str()))?,
            ),
            _ => None,
        };
        let skill = match (group, selection.skill()) {
            (Some(group), Some(id)) => Some(
                group
                    .skill(id)
                    .ok_or_else(|| PortfolioError::unknown_node(TaxonomyLevel::Skill, id.as_str()))?,
            ),
            _ => None,
        };
        if let (Some(skill), Some(tool)) = (skill, selection.tool()) {
            if !skill.has_tool(tool) {
                return Err(PortfolioError::unknown_node(TaxonomyLevel::Tool, tool));
            }
        }

        Ok(self.build(selection, branch, group, skill))
    }

    /// View for the empty selection: the branch row only
    pub fn overview(&self) -> AggregationView {
        self.build(&FilterSelection::new(), None, None, None)
    }

    fn build(
        &self,
        selection: &FilterSelection,
        branch: Option<&Branch>,
        group: Option<&SkillGroup>,
        skill: Option<&Skill>,
    ) -> AggregationView {
        let taxonomy = self.dataset.taxonomy();
        let branches = LevelMeters::new(
            TaxonomyLevel::Branch,
            taxonomy
                .branches()
                .iter()
                .map(|b| {
                    let selected = branch.is_some_and(|sel| sel.id == b.id);
                    (b.id.to_string(), b.name.clone(), self.branch(b), selected)
                })
                .collect(),
        );

        let groups = branch.map(|branch| {
            LevelMeters::new(
                TaxonomyLevel::Group,
                branch
                    .groups
                    .iter()
                    .map(|g| {
                        let selected = group.is_some_and(|sel| sel.id == g.id);
                        (g.id.to_string(), g.name.clone(), self.group(g), selected)
                    })
                    .collect(),
            )
        });

        let skills = group.map(|group| {
            LevelMeters::new(
                TaxonomyLevel::Skill,
                group
                    .skills
                    .iter()
                    .map(|s| {
                        let selected = skill.is_some_and(|sel| sel.id == s.id);
                        (s.id.to_string(), s.name.clone(), self.skill(s, None), selected)
                    })
                    .collect(),
            )
        });

        let tools = skill.map(|skill| {
            LevelMeters::new(
                TaxonomyLevel::Tool,
                skill
                    .tools
                    .iter()
                    .map(|tool| {
                        let selected = selection.tool() == Some(tool.as_str());
                        (tool.clone(), tool.clone(), self.skill(skill, Some(tool)), selected)
                    })
                    .collect(),
            )
        });

        // branch and group selections only expand meter rows
        let filtered = skill.map(|skill| self.skill(skill, selection.tool()));

        let view = AggregationView {
            selection: selection.clone(),
            branches,
            groups,
            skills,
            tools,
            filtered,
        };

        #[cfg(debug_assertions)]
        view.check_union_consistency();

        view
    }
}

impl AggregationView {
    /// Whether each expanded parent equals the union of its children
    pub fn is_union_consistent(&self) -> bool {
        let groups_ok = match (self.branches.selected(), &self.groups) {
            (Some(parent), Some(children)) => parent.matches == children.union(),
            _ => true,
        };
        let skills_ok = match (self.groups.as_ref().and_then(|g| g.selected()), &self.skills) {
            (Some(parent), Some(children)) => parent.matches == children.union(),
            _ => true,
        };
        groups_ok && skills_ok
    }

    #[cfg(debug_assertions)]
    fn check_union_consistency(&self) {
        if !self.is_union_consistent() {
            tracing::warn!(
                selection = ?self.selection,
                "aggregation union check failed: parent match set differs from union of children"
            );
        }
    }

    /// Records to show in the timeline, or `None` for "show everything"
    pub fn filter_set(&self) -> Option<&MatchSet> {
        self.filtered.as_ref().map(|aggregate| &aggregate.matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SkillId;

    const TAXONOMY: &str = r#"
[[branches]]
id = "growth"
name = "Growth"
description = "Demand."

[[branches.groups]]
id = "paid-growth"
name = "Paid Growth"
description = "Paid media."

[[branches.groups.skills]]
id = "paid-search"
name = "Paid Search"
description = "Search ads."
tools = ["Google Ads"]

[[branches.groups.skills]]
id = "paid-social"
name = "Paid Social"
description = "Social ads."
tools = ["Meta Ads"]

[[branches.groups]]
id = "organic-growth"
name = "Organic Growth"
description = "Content."

[[branches.groups.skills]]
id = "local-seo"
name = "Local SEO"
description = "Maps."
tools = []

[[branches]]
id = "ops"
name = "Ops & Strategy"
description = "Running things."

[[branches.groups]]
id = "finance"
name = "Financial Operations"
description = "Money."

[[branches.groups.skills]]
id = "billing"
name = "Billing & Disputes"
description = "Chargebacks."
tools = ["Stripe"]
"#;

    const EXPERIENCES: &str = r#"
[[experiences]]
id = "agency"
title = "Agency"
org = "Org"
role = "Buyer"
start = "Jan 2020"
end = "Dec 2020"
category = "flagship"
summary = "Search and social."

[experiences.sections.growth]
skills = ["Paid Search", "Paid Social"]
tools = ["Google Ads"]

[[experiences]]
id = "shop"
title = "Shop"
org = "Org"
role = "Marketer"
start = "Jan 2021"
end = "Jun 2021"
category = "flagship"
summary = "Social and maps."

[experiences.sections.growth]
skills = ["Paid Social", "Local SEO"]
tools = ["Meta Ads"]

[experiences.sections.ops]
skills = ["Billing & Disputes"]
tools = ["Stripe"]
"#;

    fn dataset() -> Dataset {
        Dataset::from_toml_strs(EXPERIENCES, TAXONOMY, "").unwrap()
    }

    fn today() -> YearMonth {
        YearMonth::new(2026, 10).unwrap()
    }

    fn skill_selection() -> FilterSelection {
        let mut selection = FilterSelection::new();
        selection.set_branch("growth".into());
        selection.set_group("paid-growth".into());
        selection.set_skill("paid-social".into());
        selection
    }

    #[test]
    fn test_empty_selection_shows_branch_row_only() {
        let ds = dataset();
        let view = Aggregator::new(&ds, today()).view(&FilterSelection::new()).unwrap();
        assert_eq!(view.branches.meters.len(), 2);
        assert!(view.groups.is_none());
        assert!(view.filtered.is_none());
        assert_eq!(view.branches.meters[0].total_months, 18);
        assert_eq!(view.branches.meters[1].total_months, 6);
        assert_eq!(view.branches.max_months(), 18);
        assert!((view.branches.meters[1].fill() - 6.0 / 18.0).abs() < 1e-6);
    }

    #[test]
    fn test_skill_selection_expands_every_level() {
        let ds = dataset();
        let view = Aggregator::new(&ds, today()).view(&skill_selection()).unwrap();

        let groups = view.groups.as_ref().unwrap();
        assert_eq!(groups.selected().unwrap().id, "paid-growth");
        let skills = view.skills.as_ref().unwrap();
        assert_eq!(skills.meters.len(), 2);
        let tools = view.tools.as_ref().unwrap();
        assert_eq!(tools.level, TaxonomyLevel::Tool);
        assert_eq!(tools.meters[0].id, "Meta Ads");
        assert_eq!(tools.meters[0].matches.len(), 1);

        let filtered = view.filtered.as_ref().unwrap();
        assert_eq!(filtered.matches.len(), 2);
        assert_eq!(filtered.total_months, 18);
        assert!(view.is_union_consistent());
    }

    #[test]
    fn test_tool_narrows_filtered_result() {
        let ds = dataset();
        let mut selection = skill_selection();
        selection.set_tool("Meta Ads");
        let view = Aggregator::new(&ds, today()).view(&selection).unwrap();
        let filtered = view.filtered.unwrap();
        assert_eq!(filtered.matches.len(), 1);
        assert!(filtered.matches.contains(&"shop".into()));
        assert_eq!(filtered.total_months, 6);
    }

    #[test]
    fn test_branch_and_group_selection_leave_timeline_unfiltered() {
        let ds = dataset();
        let mut selection = FilterSelection::new();
        selection.set_branch("ops".into());
        let view = Aggregator::new(&ds, today()).view(&selection).unwrap();
        assert!(view.filtered.is_none());
        assert!(view.filter_set().is_none());
        assert_eq!(view.branches.selected().unwrap().matches.len(), 1);
        assert!(view.groups.is_some());
        assert!(view.skills.is_none());

        let mut selection = FilterSelection::new();
        selection.set_branch("growth".into());
        selection.set_group("paid-growth".into());
        let view = Aggregator::new(&ds, today()).view(&selection).unwrap();
        assert!(view.filtered.is_none());
        assert!(view.skills.is_some());
    }

    #[test]
    fn test_unknown_ids_are_errors() {
        let ds = dataset();
        let mut selection = FilterSelection::new();
        selection.set_branch("design".into());
        let err = Aggregator::new(&ds, today()).view(&selection).unwrap_err();
        assert!(matches!(
            err,
            PortfolioError::UnknownTaxonomyNode { level: TaxonomyLevel::Branch, .. }
        ));

        let mut selection = skill_selection();
        selection.set_tool("Bing Ads");
        assert!(Aggregator::new(&ds, today()).view(&selection).is_err());
    }

    #[test]
    fn test_skill_meter_months() {
        let ds = dataset();
        let tax = ds.taxonomy();
        let skill = tax
            .skill(&"growth".into(), &"paid-growth".into(), &SkillId::from("paid-search"))
            .unwrap();
        let aggregate = Aggregator::new(&ds, today()).skill(skill, None);
        assert_eq!(aggregate.total_months, 12);
    }
}
