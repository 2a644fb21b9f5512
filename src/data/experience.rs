//! Experience records: one job, role, project or life chapter each

use serde::{Deserialize, Serialize};

use crate::core::calendar::{months_between, parse_period_at, YearMonth};
use crate::core::types::{ExperienceId, SectionTheme};

/// Closed set of record categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Flagship,
    SideExperiment,
    Certification,
    Personal,
}

impl Category {
    /// Badge text shown next to the record
    pub fn badge(&self) -> &'static str {
        match self {
            Category::Flagship => "Core Experience",
            Category::SideExperiment => "Experiment",
            Category::Certification => "Certification",
            Category::Personal => "Personal",
        }
    }
}

/// Optional headline number for a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineMetric {
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tradeoff {
    pub chose: String,
    pub instead_of: String,
    pub because: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Proof,
    Press,
    Site,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub href: String,
    #[serde(default)]
    pub kind: Option<LinkKind>,
}

/// One thematic breakdown of a record
///
/// `skills` and `tools` join against the taxonomy by display name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
}

impl Section {
    pub fn has_skill(&self, name: &str) -> bool {
        self.skills.iter().any(|skill| skill == name)
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.iter().any(|tool| tool == name)
    }
}

/// Up to three sections, one per theme
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Sections {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth: Option<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ops: Option<Section>,
}

impl Sections {
    pub fn get(&self, theme: SectionTheme) -> Option<&Section> {
        match theme {
            SectionTheme::Product => self.product.as_ref(),
            SectionTheme::Growth => self.growth.as_ref(),
            SectionTheme::Ops => self.ops.as_ref(),
        }
    }

    /// Present sections in display order
    pub fn iter(&self) -> impl Iterator<Item = (SectionTheme, &Section)> + '_ {
        SectionTheme::all()
            .iter()
            .filter_map(move |&theme| self.get(theme).map(|section| (theme, section)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// A single entry in the career dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRecord {
    pub id: ExperienceId,
    pub title: String,
    pub org: String,
    pub role: String,
    /// Period string, e.g. "Oct 2023"
    pub start: String,
    /// Period string, or "Present" for ongoing roles
    pub end: String,
    pub category: Category,
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metric: Option<HeadlineMetric>,
    #[serde(default)]
    pub sections: Sections,
    #[serde(default)]
    pub learned: Option<String>,
    #[serde(default)]
    pub tradeoff: Option<Tradeoff>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl ExperienceRecord {
    /// Parsed start and end months, with "Present" resolved to `today`
    pub fn span_at(&self, today: YearMonth) -> (YearMonth, YearMonth) {
        (parse_period_at(&self.start, today), parse_period_at(&self.end, today))
    }

    /// Inclusive months covered by this record
    pub fn duration_months_at(&self, today: YearMonth) -> u32 {
        let (start, end) = self.span_at(today);
        months_between(start, end)
    }

    /// "Oct 2023 – Jun 2025" as authored
    pub fn period_label(&self) -> String {
        format!("{} – {}", self.start, self.end)
    }

    /// Whether any section lists this skill name
    pub fn mentions_skill(&self, name: &str) -> bool {
        self.sections.iter().any(|(_, section)| section.has_skill(name))
    }

    /// Every skill name referenced across sections (may repeat)
    pub fn skill_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.sections
            .iter()
            .flat_map(|(_, section)| section.skills.iter().map(String::as_str))
    }

    /// Every tool name referenced across sections (may repeat)
    pub fn tool_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.sections
            .iter()
            .flat_map(|(_, section)| section.tools.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ExperienceRecord {
        toml::from_str(
            r#"
id = "kompete-scale"
title = "KOMPETE (Scale)"
org = "KOMPETE"
role = "Founding COO"
start = "Oct 2023"
end = "Jun 2025"
category = "flagship"
summary = "Scaled a live game economy."

[sections.ops]
items = ["Served as communications lead."]
skills = ["Stakeholder Communication"]
tools = ["Google Workspace"]

[sections.product]
skills = ["Economic & Incentive Design"]
tools = ["Dune"]
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_sections_iterate_in_theme_order() {
        let record = record();
        let themes: Vec<_> = record.sections.iter().map(|(theme, _)| theme).collect();
        assert_eq!(themes, vec![SectionTheme::Product, SectionTheme::Ops]);
        assert!(record.sections.growth.is_none());
    }

    #[test]
    fn test_duration_is_inclusive() {
        let today = YearMonth::new(2026, 10).unwrap();
        assert_eq!(record().duration_months_at(today), 21);
    }

    #[test]
    fn test_present_end_tracks_today() {
        let mut record = record();
        record.end = "Present".into();
        assert_eq!(record.duration_months_at(YearMonth::new(2023, 12).unwrap()), 3);
        assert_eq!(record.duration_months_at(YearMonth::new(2024, 10).unwrap()), 13);
    }

    #[test]
    fn test_skill_and_tool_lookup() {
        let record = record();
        assert!(record.mentions_skill("Stakeholder Communication"));
        assert!(!record.mentions_skill("Paid Search"));
        assert_eq!(record.tool_names().collect::<Vec<_>>(), vec!["Dune", "Google Workspace"]);
    }

    #[test]
    fn test_unknown_section_theme_is_rejected() {
        let result: Result<Sections, _> = toml::from_str("[operations]\nitems = []\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_category_badges() {
        assert_eq!(Category::Flagship.badge(), "Core Experience");
        assert_eq!(Category::SideExperiment.badge(), "Experiment");
    }
}
