//! Three-level skill taxonomy: branch → skill group → skill
//!
//! Leaf skills list the tools associated with them. Experience records
//! reference skills and tools by display name, not by id; the lookups here
//! are the only bridge between the two.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::types::{BranchId, GroupId, SkillId};

/// Leaf node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub tools: Vec<String>,
}

impl Skill {
    pub fn has_tool(&self, tool: &str) -> bool {
        self.tools.iter().any(|candidate| candidate == tool)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub id: GroupId,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

impl SkillGroup {
    pub fn skill(&self, id: &SkillId) -> Option<&Skill> {
        self.skills.iter().find(|skill| &skill.id == id)
    }

    /// Display names of every skill in this group
    pub fn skill_names(&self) -> AHashSet<&str> {
        self.skills.iter().map(|skill| skill.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: BranchId,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub groups: Vec<SkillGroup>,
}

impl Branch {
    pub fn group(&self, id: &GroupId) -> Option<&SkillGroup> {
        self.groups.iter().find(|group| &group.id == id)
    }

    /// Display names of every skill under this branch
    pub fn skill_names(&self) -> AHashSet<&str> {
        self.groups
            .iter()
            .flat_map(|group| group.skills.iter().map(|skill| skill.name.as_str()))
            .collect()
    }
}

/// Address of a leaf skill in the taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillLocation {
    pub branch: BranchId,
    pub group: GroupId,
    pub skill: SkillId,
}

/// The whole tree, in authored order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillTaxonomy {
    #[serde(default)]
    pub branches: Vec<Branch>,
}

impl SkillTaxonomy {
    pub fn new(branches: Vec<Branch>) -> Self {
        Self { branches }
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn branch(&self, id: &BranchId) -> Option<&Branch> {
        self.branches.iter().find(|branch| &branch.id == id)
    }

    pub fn group(&self, branch: &BranchId, group: &GroupId) -> Option<&SkillGroup> {
        self.branch(branch)?.group(group)
    }

    pub fn skill(&self, branch: &BranchId, group: &GroupId, skill: &SkillId) -> Option<&Skill> {
        self.group(branch, group)?.skill(skill)
    }

    /// Resolve a full location to its three nodes
    pub fn resolve(&self, location: &SkillLocation) -> Option<(&Branch, &SkillGroup, &Skill)> {
        let branch = self.branch(&location.branch)?;
        let group = branch.group(&location.group)?;
        let skill = group.skill(&location.skill)?;
        Some((branch, group, skill))
    }

    /// All leaves with their locations, depth-first in authored order
    pub fn leaves(&self) -> impl Iterator<Item = (SkillLocation, &Skill)> + '_ {
        self.branches.iter().flat_map(|branch| {
            branch.groups.iter().flat_map(move |group| {
                group.skills.iter().map(move |skill| {
                    (
                        SkillLocation {
                            branch: branch.id.clone(),
                            group: group.id.clone(),
                            skill: skill.id.clone(),
                        },
                        skill,
                    )
                })
            })
        })
    }

    /// First leaf whose display name matches
    pub fn locate_skill(&self, name: &str) -> Option<SkillLocation> {
        self.leaves()
            .find(|(_, skill)| skill.name == name)
            .map(|(location, _)| location)
    }

    /// Every leaf that lists this tool, in authored order
    pub fn skills_with_tool<'a>(
        &'a self,
        tool: &'a str,
    ) -> impl Iterator<Item = (SkillLocation, &'a Skill)> + 'a {
        self.leaves().filter(move |(_, skill)| skill.has_tool(tool))
    }

    pub fn skill_names(&self) -> AHashSet<&str> {
        self.leaves().map(|(_, skill)| skill.name.as_str()).collect()
    }

    pub fn tool_names(&self) -> AHashSet<&str> {
        self.leaves()
            .flat_map(|(_, skill)| skill.tools.iter().map(String::as_str))
            .collect()
    }

    /// Structural problems: empty tree and duplicate sibling ids
    pub fn structural_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.branches.is_empty() {
            errors.push("taxonomy has no branches".to_string());
        }

        let mut branch_ids = AHashSet::new();
        for branch in &self.branches {
            if !branch_ids.insert(branch.id.as_str()) {
                errors.push(format!("duplicate branch id '{}'", branch.id));
            }

            let mut group_ids = AHashSet::new();
            for group in &branch.groups {
                if !group_ids.insert(group.id.as_str()) {
                    errors.push(format!("duplicate group id '{}' in branch '{}'", group.id, branch.id));
                }

                let mut skill_ids = AHashSet::new();
                for skill in &group.skills {
                    if !skill_ids.insert(skill.id.as_str()) {
                        errors.push(format!(
                            "duplicate skill id '{}' in group '{}/{}'",
                            skill.id, branch.id, group.id
                        ));
                    }
                }
            }
        }

        errors
    }
}
