//! Taxonomy browser state machine
//!
//! ```text
//! Closed → BranchList → GroupList → SkillList → SkillDetail
//! ```
//!
//! Selecting a node moves forward and clears everything below it; selecting
//! the already-selected node deselects it and moves back one state; `clear`
//! collapses straight to `Closed`. Tools toggle inside `SkillDetail` without
//! changing the state.
//!
//! The state is derived from whether the browser is open plus how deep the
//! selection goes, so the two can never disagree.

use serde::Serialize;

use crate::core::error::{PortfolioError, Result};
use crate::core::types::{BranchId, GroupId, SkillId, TaxonomyLevel};
use crate::data::taxonomy::{SkillLocation, SkillTaxonomy};
use crate::skills::resolution::JumpTarget;
use crate::skills::selection::FilterSelection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NavLevel {
    Closed,
    BranchList,
    GroupList,
    SkillList,
    SkillDetail,
}

/// One step of the selection path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub level: TaxonomyLevel,
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    open: bool,
    selection: FilterSelection,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> NavLevel {
        if !self.open {
            return NavLevel::Closed;
        }
        match self.selection.depth() {
            None => NavLevel::BranchList,
            Some(TaxonomyLevel::Branch) => NavLevel::GroupList,
            Some(TaxonomyLevel::Group) => NavLevel::SkillList,
            Some(TaxonomyLevel::Skill) | Some(TaxonomyLevel::Tool) => NavLevel::SkillDetail,
        }
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    fn transition(&self, from: NavLevel, action: &str) {
        tracing::debug!(
            from = ?from,
            to = ?self.level(),
            action,
            selection = ?self.selection,
            "navigator transition"
        );
    }

    fn unresolved(level: TaxonomyLevel, id: &str) -> PortfolioError {
        tracing::warn!(%level, id, "navigator selection does not resolve");
        PortfolioError::unknown_node(level, id)
    }

    /// Show the branch list; no-op when already open
    pub fn open(&mut self) {
        if !self.open {
            let from = self.level();
            self.open = true;
            self.transition(from, "open");
        }
    }

    pub fn select_branch(&mut self, taxonomy: &SkillTaxonomy, id: &BranchId) -> Result<()> {
        if taxonomy.branch(id).is_none() {
            return Err(Self::unresolved(TaxonomyLevel::Branch, id.as_str()));
        }
        let from = self.level();
        self.open = true;
        if self.selection.branch() == Some(id) {
            self.selection.clear();
            self.transition(from, "deselect branch");
        } else {
            self.selection.set_branch(id.clone());
            self.transition(from, "select branch");
        }
        Ok(())
    }

    pub fn select_group(&mut self, taxonomy: &SkillTaxonomy, id: &GroupId) -> Result<()> {
        let branch = self
            .selection
            .branch()
            .and_then(|branch| taxonomy.branch(branch))
            .ok_or_else(|| Self::unresolved(TaxonomyLevel::Group, id.as_str()))?;
        if branch.group(id).is_none() {
            return Err(Self::unresolved(TaxonomyLevel::Group, id.as_str()));
        }
        let from = self.level();
        if self.selection.group() == Some(id) {
            self.selection.clear_group();
            self.transition(from, "deselect group");
        } else {
            self.selection.set_group(id.clone());
            self.transition(from, "select group");
        }
        Ok(())
    }

    pub fn select_skill(&mut self, taxonomy: &SkillTaxonomy, id: &SkillId) -> Result<()> {
        let group = match (self.selection.branch(), self.selection.group()) {
            (Some(branch), Some(group)) => taxonomy.group(branch, group),
            _ => None,
        }
        .ok_or_else(|| Self::unresolved(TaxonomyLevel::Skill, id.as_str()))?;
        if group.skill(id).is_none() {
            return Err(Self::unresolved(TaxonomyLevel::Skill, id.as_str()));
        }
        let from = self.level();
        if self.selection.skill() == Some(id) {
            self.selection.clear_skill();
            self.transition(from, "deselect skill");
        } else {
            self.selection.set_skill(id.clone());
            self.transition(from, "select skill");
        }
        Ok(())
    }

    /// Toggle a tool of the selected skill; stays in `SkillDetail`
    pub fn toggle_tool(&mut self, taxonomy: &SkillTaxonomy, tool: &str) -> Result<()> {
        let skill = self
            .selection
            .location()
            .and_then(|location| taxonomy.resolve(&location))
            .map(|(_, _, skill)| skill)
            .ok_or_else(|| Self::unresolved(TaxonomyLevel::Tool, tool))?;
        if !skill.has_tool(tool) {
            return Err(Self::unresolved(TaxonomyLevel::Tool, tool));
        }
        let from = self.level();
        if self.selection.tool() == Some(tool) {
            self.selection.clear_tool();
            self.transition(from, "deselect tool");
        } else {
            self.selection.set_tool(tool);
            self.transition(from, "select tool");
        }
        Ok(())
    }

    /// Move back one state, dropping the deepest taxonomy selection
    ///
    /// A selected tool is part of `SkillDetail`, so stepping back from there
    /// drops both skill and tool.
    pub fn step_back(&mut self) {
        let from = self.level();
        match from {
            NavLevel::Closed => return,
            NavLevel::BranchList => self.open = false,
            NavLevel::GroupList => self.selection.clear(),
            NavLevel::SkillList => self.selection.clear_group(),
            NavLevel::SkillDetail => self.selection.clear_skill(),
        }
        self.transition(from, "back");
    }

    /// Collapse to `Closed` and drop the whole selection
    pub fn clear(&mut self) {
        let from = self.level();
        self.open = false;
        self.selection.clear();
        if from != NavLevel::Closed {
            self.transition(from, "clear");
        }
    }

    /// Selection path with display labels
    pub fn breadcrumbs(&self, taxonomy: &SkillTaxonomy) -> Vec<Breadcrumb> {
        let mut crumbs = Vec::new();
        let Some(branch) = self.selection.branch().and_then(|id| taxonomy.branch(id)) else {
            return crumbs;
        };
        crumbs.push(Breadcrumb {
            level: TaxonomyLevel::Branch,
            id: branch.id.to_string(),
            label: branch.name.clone(),
        });

        let Some(group) = self.selection.group().and_then(|id| branch.group(id)) else {
            return crumbs;
        };
        crumbs.push(Breadcrumb {
            level: TaxonomyLevel::Group,
            id: group.id.to_string(),
            label: group.name.clone(),
        });

        let Some(skill) = self.selection.skill().and_then(|id| group.skill(id)) else {
            return crumbs;
        };
        crumbs.push(Breadcrumb {
            level: TaxonomyLevel::Skill,
            id: skill.id.to_string(),
            label: skill.name.clone(),
        });

        if let Some(tool) = self.selection.tool() {
            crumbs.push(Breadcrumb {
                level: TaxonomyLevel::Tool,
                id: tool.to_string(),
                label: tool.to_string(),
            });
        }
        crumbs
    }

    /// Return to a crumb, clearing everything below it
    pub fn activate_breadcrumb(&mut self, level: TaxonomyLevel) {
        let from = self.level();
        match level {
            TaxonomyLevel::Branch => self.selection.clear_group(),
            TaxonomyLevel::Group => self.selection.clear_skill(),
            TaxonomyLevel::Skill => self.selection.clear_tool(),
            TaxonomyLevel::Tool => return,
        }
        self.transition(from, "breadcrumb");
    }

    /// Reproduce the clicks leading to `location`, ending in `SkillDetail`
    pub fn jump_to_location(&mut self, taxonomy: &SkillTaxonomy, location: &SkillLocation) -> Result<()> {
        self.jump_to(taxonomy, &JumpTarget::Skill(location.clone()))
    }

    /// Reproduce the clicks leading to `target`, ending in `SkillDetail`
    ///
    /// On failure the previous state is kept.
    pub fn jump_to(&mut self, taxonomy: &SkillTaxonomy, target: &JumpTarget) -> Result<()> {
        let location = target.location();
        let mut next = Navigator::new();
        next.open();
        next.select_branch(taxonomy, &location.branch)?;
        next.select_group(taxonomy, &location.group)?;
        next.select_skill(taxonomy, &location.skill)?;
        if let Some(tool) = target.tool() {
            next.toggle_tool(taxonomy, tool)?;
        }

        let from = self.level();
        *self = next;
        self.transition(from, "jump");
        Ok(())
    }
}
