//! Resolve skill and tool chips back to taxonomy locations
//!
//! Chips in the detail drawer carry display names only. A skill name maps to
//! the first leaf with that name; a tool needs a skill context, taken from
//! the section the chip was rendered in.

use crate::data::experience::Section;
use crate::data::taxonomy::{SkillLocation, SkillTaxonomy};
use crate::skills::selection::FilterSelection;

/// Where a chip click should land in the navigator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JumpTarget {
    Skill(SkillLocation),
    Tool { location: SkillLocation, tool: String },
}

impl JumpTarget {
    pub fn location(&self) -> &SkillLocation {
        match self {
            JumpTarget::Skill(location) => location,
            JumpTarget::Tool { location, .. } => location,
        }
    }

    pub fn tool(&self) -> Option<&str> {
        match self {
            JumpTarget::Skill(_) => None,
            JumpTarget::Tool { tool, .. } => Some(tool),
        }
    }

    /// The selection a user would reach by clicking through
    pub fn selection(&self) -> FilterSelection {
        let mut selection = FilterSelection::at_skill(self.location());
        if let Some(tool) = self.tool() {
            selection.set_tool(tool);
        }
        selection
    }
}

impl From<SkillLocation> for JumpTarget {
    fn from(location: SkillLocation) -> Self {
        JumpTarget::Skill(location)
    }
}

pub fn resolve_skill_chip(taxonomy: &SkillTaxonomy, name: &str) -> Option<JumpTarget> {
    taxonomy.locate_skill(name).map(JumpTarget::Skill)
}

/// Resolve a tool chip rendered inside `section`
///
/// Context skill, in order of preference: the first skill of the same section
/// whose taxonomy entry lists the tool, then the first taxonomy skill listing
/// it anywhere.
pub fn resolve_tool_chip(taxonomy: &SkillTaxonomy, section: &Section, tool: &str) -> Option<JumpTarget> {
    let in_section = section.skills.iter().find_map(|name| {
        taxonomy
            .leaves()
            .find(|(_, skill)| &skill.name == name && skill.has_tool(tool))
            .map(|(location, _)| location)
    });

    let location = in_section.or_else(|| {
        taxonomy
            .skills_with_tool(tool)
            .next()
            .map(|(location, _)| location)
    })?;

    Some(JumpTarget::Tool {
        location,
        tool: tool.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SkillId;

    fn taxonomy() -> SkillTaxonomy {
        toml::from_str(
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
id = "paid-search"
name = "Paid Search"
description = "Search ads."
tools = ["Google Ads", "Google Analytics"]

[[branches.groups.skills]]
id = "performance"
name = "Performance Optimization"
description = "Tuning."
tools = ["Google Analytics"]
"#,
        )
        .unwrap()
    }

    fn section(skills: &[&str]) -> Section {
        Section {
            items: vec![],
            skills: skills.iter().map(|s| s.to_string()).collect(),
            tools: vec![],
        }
    }

    #[test]
    fn test_skill_chip_resolves_by_name() {
        let target = resolve_skill_chip(&taxonomy(), "Performance Optimization").unwrap();
        assert_eq!(target.location().skill, SkillId::from("performance"));
        assert!(target.tool().is_none());
        assert!(resolve_skill_chip(&taxonomy(), "Growth Hacking").is_none());
    }

    #[test]
    fn test_tool_chip_prefers_section_context() {
        let tax = taxonomy();
        let target = resolve_tool_chip(
            &tax,
            &section(&["Paid Social", "Performance Optimization"]),
            "Google Analytics",
        )
        .unwrap();
        assert_eq!(target.location().skill, SkillId::from("performance"));
        assert_eq!(target.tool(), Some("Google Analytics"));
    }

    #[test]
    fn test_tool_chip_falls_back_to_first_taxonomy_skill() {
        let tax = taxonomy();
        let target = resolve_tool_chip(&tax, &section(&[]), "Google Analytics").unwrap();
        assert_eq!(target.location().skill, SkillId::from("paid-search"));
        assert!(resolve_tool_chip(&tax, &section(&["Paid Search"]), "Bing Ads").is_none());
    }

    #[test]
    fn test_jump_selection_includes_tool() {
        let tax = taxonomy();
        let selection = resolve_tool_chip(&tax, &section(&[]), "Google Ads")
            .unwrap()
            .selection();
        assert_eq!(selection.skill(), Some(&SkillId::from("paid-search")));
        assert_eq!(selection.tool(), Some("Google Ads"));
    }
}
