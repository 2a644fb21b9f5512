//! Which experience records match a skill scope
//!
//! A scope is a set of leaf-skill display names (one skill, a group's skills
//! or a branch's skills), optionally narrowed by a tool. With a tool, the
//! tool and a scope skill have to appear in the *same* section of a record;
//! a tool in one section and the skill in another is not a match.

use ahash::AHashSet;
use serde::{Serialize, Serializer};

use crate::core::calendar::YearMonth;
use crate::core::types::ExperienceId;
use crate::data::experience::{ExperienceRecord, Section};
use crate::data::loader::Dataset;

/// Deduplicated set of matching record ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    ids: AHashSet<ExperienceId>,
}

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the id was already present
    pub fn insert(&mut self, id: ExperienceId) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: &ExperienceId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExperienceId> {
        self.ids.iter()
    }

    pub fn union(&self, other: &MatchSet) -> MatchSet {
        self.ids.union(&other.ids).cloned().collect()
    }

    /// Matching records in authored order
    pub fn records<'a>(&self, dataset: &'a Dataset) -> Vec<&'a ExperienceRecord> {
        dataset
            .experiences()
            .iter()
            .filter(|record| self.contains(&record.id))
            .collect()
    }

    /// Ids sorted, for stable output
    pub fn sorted(&self) -> Vec<&ExperienceId> {
        let mut ids: Vec<_> = self.ids.iter().collect();
        ids.sort();
        ids
    }
}

impl FromIterator<ExperienceId> for MatchSet {
    fn from_iter<I: IntoIterator<Item = ExperienceId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl Serialize for MatchSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.sorted())
    }
}

fn section_matches(section: &Section, scope: &AHashSet<&str>, tool: Option<&str>) -> bool {
    let has_scope_skill = section.skills.iter().any(|skill| scope.contains(skill.as_str()));
    match tool {
        Some(tool) => has_scope_skill && section.has_tool(tool),
        None => has_scope_skill,
    }
}

/// Ids of records where some section lists a scope skill (and `tool`, if given)
pub fn matching_experience_ids(
    records: &[ExperienceRecord],
    scope: &AHashSet<&str>,
    tool: Option<&str>,
) -> MatchSet {
    records
        .iter()
        .filter(|record| {
            record
                .sections
                .iter()
                .any(|(_, section)| section_matches(section, scope, tool))
        })
        .map(|record| record.id.clone())
        .collect()
}

/// Sum of inclusive months over distinct ids
///
/// Duplicate ids are counted once; ids missing from the dataset count zero.
pub fn total_months<'a>(
    dataset: &Dataset,
    ids: impl IntoIterator<Item = &'a ExperienceId>,
    today: YearMonth,
) -> u32 {
    let mut seen = AHashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(*id))
        .filter_map(|id| dataset.experience(id))
        .map(|record| record.duration_months_at(today))
        .sum()
}
