//! Core type definitions used throughout the codebase

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Stable identifier of an experience record
///
/// Doubles as the address fragment value that opens the record's drawer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExperienceId(pub String);

impl ExperienceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ExperienceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Identifier of a top-level taxonomy branch
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchId(pub String);

/// Identifier of a skill group, unique within its branch
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

/// Identifier of a leaf skill, unique within its group
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(pub String);

macro_rules! str_id {
    ($($name:ident),*) => {
        $(
            impl $name {
                pub fn new(id: impl Into<String>) -> Self {
                    Self(id.into())
                }

                pub fn as_str(&self) -> &str {
                    &self.0
                }
            }

            impl From<&str> for $name {
                fn from(id: &str) -> Self {
                    Self(id.to_string())
                }
            }
        )*
    };
}

str_id!(BranchId, GroupId, SkillId);

/// Depth in the skill taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxonomyLevel {
    Branch,
    Group,
    Skill,
    Tool,
}

impl TaxonomyLevel {
    pub fn name(&self) -> &'static str {
        match self {
            TaxonomyLevel::Branch => "branch",
            TaxonomyLevel::Group => "skill group",
            TaxonomyLevel::Skill => "skill",
            TaxonomyLevel::Tool => "tool",
        }
    }
}

impl std::fmt::Display for TaxonomyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed thematic sections of an experience record, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionTheme {
    Product,
    Growth,
    Ops,
}

impl SectionTheme {
    pub fn all() -> &'static [SectionTheme] {
        &[SectionTheme::Product, SectionTheme::Growth, SectionTheme::Ops]
    }

    pub fn title(&self) -> &'static str {
        match self {
            SectionTheme::Product => "Product",
            SectionTheme::Growth => "Growth",
            SectionTheme::Ops => "Ops & Strategy",
        }
    }
}
