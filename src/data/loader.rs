//! Load the portfolio dataset from TOML
//!
//! Three files make up a dataset: `experiences.toml` (ordered records),
//! `taxonomy.toml` (the skill tree) and `profile.toml` (page content). The
//! copy under `data/portfolio/` is compiled into the crate so the binary runs
//! without any files on disk.

use std::path::Path;

use ahash::{AHashMap, AHashSet};
use serde::Deserialize;

use crate::core::error::{PortfolioError, Result};
use crate::core::types::ExperienceId;
use crate::data::experience::ExperienceRecord;
use crate::data::profile::Profile;
use crate::data::taxonomy::SkillTaxonomy;

pub const EXPERIENCES_FILE: &str = "experiences.toml";
pub const TAXONOMY_FILE: &str = "taxonomy.toml";
pub const PROFILE_FILE: &str = "profile.toml";

const BUNDLED_EXPERIENCES: &str = include_str!("../../data/portfolio/experiences.toml");
const BUNDLED_TAXONOMY: &str = include_str!("../../data/portfolio/taxonomy.toml");
const BUNDLED_PROFILE: &str = include_str!("../../data/portfolio/profile.toml");

#[derive(Deserialize)]
struct ExperienceFile {
    #[serde(default)]
    experiences: Vec<ExperienceRecord>,
}

/// Immutable, read-only content for one page session
#[derive(Debug, Clone)]
pub struct Dataset {
    experiences: Vec<ExperienceRecord>,
    /// Position of each record in `experiences`
    index: AHashMap<ExperienceId, usize>,
    taxonomy: SkillTaxonomy,
    profile: Profile,
}

fn parse_toml<T: serde::de::DeserializeOwned>(content: &str, file: &str) -> Result<T> {
    toml::from_str(content).map_err(|source| PortfolioError::TomlError {
        file: file.to_string(),
        source,
    })
}

impl Dataset {
    /// The dataset compiled into the crate
    pub fn bundled() -> Result<Self> {
        Self::from_toml_strs(BUNDLED_EXPERIENCES, BUNDLED_TAXONOMY, BUNDLED_PROFILE)
    }

    /// Load from a directory; `profile.toml` may be absent
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let experiences = std::fs::read_to_string(dir.join(EXPERIENCES_FILE))?;
        let taxonomy = std::fs::read_to_string(dir.join(TAXONOMY_FILE))?;
        let profile_path = dir.join(PROFILE_FILE);
        let profile = if profile_path.exists() {
            std::fs::read_to_string(profile_path)?
        } else {
            tracing::debug!(dir = %dir.display(), "no profile.toml, using an empty profile");
            String::new()
        };

        let dataset = Self::from_toml_strs(&experiences, &taxonomy, &profile)?;
        tracing::info!(
            dir = %dir.display(),
            experiences = dataset.experiences.len(),
            "loaded portfolio dataset"
        );
        Ok(dataset)
    }

    /// Parse the three documents from strings
    pub fn from_toml_strs(experiences: &str, taxonomy: &str, profile: &str) -> Result<Self> {
        let experiences: ExperienceFile = parse_toml(experiences, EXPERIENCES_FILE)?;
        let taxonomy: SkillTaxonomy = parse_toml(taxonomy, TAXONOMY_FILE)?;
        let profile: Profile = parse_toml(profile, PROFILE_FILE)?;
        Self::from_parts(experiences.experiences, taxonomy, profile)
    }

    /// Assemble a dataset, rejecting structural problems
    ///
    /// Duplicate experience ids, duplicate taxonomy ids and an empty taxonomy
    /// are hard errors. Name-join mismatches are not; see `validation`.
    pub fn from_parts(
        experiences: Vec<ExperienceRecord>,
        taxonomy: SkillTaxonomy,
        profile: Profile,
    ) -> Result<Self> {
        let mut errors = taxonomy.structural_errors();

        let mut index = AHashMap::with_capacity(experiences.len());
        let mut seen = AHashSet::with_capacity(experiences.len());
        for (position, record) in experiences.iter().enumerate() {
            if record.id.as_str().trim().is_empty() {
                errors.push(format!("experience #{} has an empty id", position + 1));
                continue;
            }
            if !seen.insert(record.id.clone()) {
                errors.push(format!("duplicate experience id '{}'", record.id));
                continue;
            }
            index.insert(record.id.clone(), position);
        }

        if !errors.is_empty() {
            return Err(PortfolioError::InvalidDataset(errors));
        }

        Ok(Self {
            experiences,
            index,
            taxonomy,
            profile,
        })
    }

    /// Records in authored order
    pub fn experiences(&self) -> &[ExperienceRecord] {
        &self.experiences
    }

    pub fn experience(&self, id: &ExperienceId) -> Option<&ExperienceRecord> {
        self.index.get(id).map(|&position| &self.experiences[position])
    }

    /// Like `experience`, for callers that treat a missing record as an error
    pub fn require(&self, id: &ExperienceId) -> Result<&ExperienceRecord> {
        self.experience(id)
            .ok_or_else(|| PortfolioError::UnknownExperience(id.clone()))
    }

    /// Look up a record by its fragment string
    pub fn experience_by_str(&self, id: &str) -> Option<&ExperienceRecord> {
        self.experience(&ExperienceId::from(id))
    }

    /// Authored position, used as the stable tie-break
    pub fn position(&self, id: &ExperienceId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &ExperienceId) -> bool {
        self.index.contains_key(id)
    }

    pub fn taxonomy(&self) -> &SkillTaxonomy {
        &self.taxonomy
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn len(&self) -> usize {
        self.experiences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.experiences.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
"#;

    fn record(id: &str) -> String {
        format!(
            r#"
[[experiences]]
id = "{id}"
title = "Title"
org = "Org"
role = "Role"
start = "Jan 2020"
end = "Dec 2020"
category = "flagship"
summary = "Summary."
"#
        )
    }

    #[test]
    fn test_bundled_dataset_loads() {
        let dataset = Dataset::bundled().unwrap();
        assert!(!dataset.is_empty());
        assert_eq!(dataset.taxonomy().branches().len(), 3);
        assert!(dataset.experience_by_str("kompete-scale").is_some());
        assert!(!dataset.profile().highlights.is_empty());
    }

    #[test]
    fn test_index_preserves_authored_order() {
        let experiences = format!("{}{}", record("first"), record("second"));
        let dataset = Dataset::from_toml_strs(&experiences, TAXONOMY, "").unwrap();
        assert_eq!(dataset.position(&"first".into()), Some(0));
        assert_eq!(dataset.position(&"second".into()), Some(1));
        assert_eq!(dataset.experiences()[1].id.as_str(), "second");

        let missing = dataset.require(&"third".into()).unwrap_err();
        assert!(matches!(missing, PortfolioError::UnknownExperience(id) if id.as_str() == "third"));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let experiences = format!("{}{}", record("same"), record("same"));
        let err = Dataset::from_toml_strs(&experiences, TAXONOMY, "").unwrap_err();
        match err {
            PortfolioError::InvalidDataset(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("same"));
            }
            other => panic!("expected InvalidDataset, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_taxonomy_is_rejected() {
        let err = Dataset::from_toml_strs(&record("only"), "", "").unwrap_err();
        assert!(matches!(err, PortfolioError::InvalidDataset(_)));
    }

    #[test]
    fn test_toml_errors_name_the_file() {
        let err = Dataset::from_toml_strs("experiences = 3", TAXONOMY, "").unwrap_err();
        match err {
            PortfolioError::TomlError { file, .. } => assert_eq!(file, EXPERIENCES_FILE),
            other => panic!("expected TomlError, got {other:?}"),
        }
    }
}
