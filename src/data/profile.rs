//! Page-level content: hero, contacts, metric strip, highlights, certifications

use serde::{Deserialize, Serialize};

use crate::core::types::ExperienceId;
use crate::data::taxonomy::SkillLocation;

/// Static files served alongside the page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assets {
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub resume: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactLink {
    pub label: String,
    pub href: String,
}

/// One cell of the metric strip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripMetric {
    pub label: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// Where activating a highlight leads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightTarget<'a> {
    /// Open this record through the fragment
    Role(&'a ExperienceId),
    /// Jump the navigator to this skill
    Filter(&'a SkillLocation),
}

/// A carousel card
///
/// Exactly one of `target_role` and `target_filter` should be set; when both
/// are present the role wins, and the integrity pass reports the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub header: String,
    pub subheader: String,
    #[serde(default)]
    pub proof: Option<String>,
    #[serde(default)]
    pub target_role: Option<ExperienceId>,
    #[serde(default)]
    pub target_filter: Option<SkillLocation>,
}

impl Highlight {
    pub fn target(&self) -> Option<HighlightTarget<'_>> {
        match (&self.target_role, &self.target_filter) {
            (Some(role), _) => Some(HighlightTarget::Role(role)),
            (None, Some(filter)) => Some(HighlightTarget::Filter(filter)),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub year: u16,
    #[serde(default)]
    pub relevance: Option<String>,
}

/// Owner profile; every field is optional in the file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub headline: String,
    pub overview: Vec<String>,
    pub assets: Assets,
    pub contacts: Vec<ContactLink>,
    pub metrics: Vec<StripMetric>,
    pub highlights: Vec<Highlight>,
    pub certifications: Vec<Certification>,
}
