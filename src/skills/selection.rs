//! The current taxonomy drill-down
//!
//! Each level is meaningful only when its ancestor is set, and changing an
//! ancestor clears everything below it. The setters here are the only way to
//! mutate a selection, so that rule holds by construction.

use serde::Serialize;

use crate::core::types::{BranchId, GroupId, SkillId, TaxonomyLevel};
use crate::data::taxonomy::SkillLocation;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    branch: Option<BranchId>,
    group: Option<GroupId>,
    skill: Option<SkillId>,
    tool: Option<String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection pointing at a single skill, no tool
    pub fn at_skill(location: &SkillLocation) -> Self {
        Self {
            branch: Some(location.branch.clone()),
            group: Some(location.group.clone()),
            skill: Some(location.skill.clone()),
            tool: None,
        }
    }

    pub fn branch(&self) -> Option<&BranchId> {
        self.branch.as_ref()
    }

    pub fn group(&self) -> Option<&GroupId> {
        self.group.as_ref()
    }

    pub fn skill(&self) -> Option<&SkillId> {
        self.skill.as_ref()
    }

    pub fn tool(&self) -> Option<&str> {
        self.tool.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.branch.is_none()
    }

    /// Deepest level that is set
    pub fn depth(&self) -> Option<TaxonomyLevel> {
        if self.tool.is_some() {
            Some(TaxonomyLevel::Tool)
        } else if self.skill.is_some() {
            Some(TaxonomyLevel::Skill)
        } else if self.group.is_some() {
            Some(TaxonomyLevel::Group)
        } else if self.branch.is_some() {
            Some(TaxonomyLevel::Branch)
        } else {
            None
        }
    }

    /// Full location once a skill is chosen
    pub fn location(&self) -> Option<SkillLocation> {
        Some(SkillLocation {
            branch: self.branch.clone()?,
            group: self.group.clone()?,
            skill: self.skill.clone()?,
        })
    }

    pub fn set_branch(&mut self, branch: BranchId) {
        self.branch = Some(branch);
        self.clear_group();
    }

    /// Ignored unless a branch is set
    pub fn set_group(&mut self, group: GroupId) {
        if self.branch.is_some() {
            self.group = Some(group);
            self.clear_skill();
        }
    }

    /// Ignored unless a group is set
    pub fn set_skill(&mut self, skill: SkillId) {
        if self.group.is_some() {
            self.skill = Some(skill);
            self.clear_tool();
        }
    }

    /// Ignored unless a skill is set
    pub fn set_tool(&mut self, tool: impl Into<String>) {
        if self.skill.is_some() {
            self.tool = Some(tool.into());
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn clear_group(&mut self) {
        self.group = None;
        self.clear_skill();
    }

    pub fn clear_skill(&mut self) {
        self.skill = None;
        self.clear_tool();
    }

    pub fn clear_tool(&mut self) {
        self.tool = None;
    }
}
